use anyhow::Result;
use clap::Parser;
use image_label_recorder::{create_clients, prepare, run, Cli};
use itertools::Itertools;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();

    let (settings, clients) = prepare(cli, |k| env::var(k).ok(), create_clients).await?;
    let summary = run(
        &settings,
        &clients.s3,
        &clients.rekognition,
        &clients.dynamodb,
    )
    .await?;

    let labels = summary
        .record
        .labels
        .iter()
        .map(|label| format!("{} ({})", label.name, label.confidence))
        .join(", ");

    println!("Successfully processed {}", summary.image.filename);
    println!("S3: {}", summary.object);
    println!("Labels written to DynamoDB table: {}", settings.table);
    println!("Labels: {labels}");

    Ok(())
}
