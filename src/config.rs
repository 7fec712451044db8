use clap::Parser;
use std::path::PathBuf;

use crate::error::Error;
use crate::labels::DEFAULT_MAX_LABELS;
use crate::record::DEFAULT_BRANCH;
use crate::selector::DEFAULT_IMAGES_DIR;

pub const DEFAULT_PREFIX: &str = "rekognition-input";
pub const BUCKET_ENV: &str = "S3_BUCKET";
pub const BRANCH_ENV: &str = "BRANCH_NAME";

#[derive(Debug, Parser)]
#[command(name = "analyze-image")]
#[command(about = "Upload image -> Rekognition labels -> write to DynamoDB")]
pub struct Cli {
    /// DynamoDB table name to write results to
    #[arg(long, env = "OUTPUT_TABLE")]
    pub output_table: String,

    /// Directory containing images
    #[arg(long, default_value = DEFAULT_IMAGES_DIR)]
    pub images_dir: PathBuf,

    /// Max labels to request from Rekognition
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_LABELS,
        value_parser = clap::value_parser!(i32).range(1..)
    )]
    pub max_labels: i32,

    /// S3 key prefix for uploaded images
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// AWS region, overriding the default provider chain
    #[arg(long)]
    pub region: Option<String>,

    /// Also request dominant colors and image quality (logged, not stored)
    #[arg(long)]
    pub image_properties: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything one run needs, resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bucket: String,
    pub table: String,
    pub branch: String,
    pub images_dir: PathBuf,
    pub prefix: String,
    pub max_labels: i32,
    pub region: Option<String>,
    pub image_properties: bool,
}

impl Settings {
    pub fn new(bucket: impl Into<String>, table: impl Into<String>) -> Self {
        Settings {
            bucket: bucket.into(),
            table: table.into(),
            branch: DEFAULT_BRANCH.to_string(),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            max_labels: DEFAULT_MAX_LABELS,
            region: None,
            image_properties: false,
        }
    }

    /// `env` looks up one variable; pass `|k| std::env::var(k).ok()` in
    /// production.
    pub fn from_cli(cli: Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let bucket = env(BUCKET_ENV)
            .filter(|b| !b.is_empty())
            .ok_or(Error::MissingEnv(BUCKET_ENV))?;
        let branch = env(BRANCH_ENV).unwrap_or(DEFAULT_BRANCH.into());

        Ok(Settings {
            bucket,
            table: cli.output_table,
            branch,
            images_dir: cli.images_dir,
            prefix: cli.prefix,
            max_labels: cli.max_labels,
            region: cli.region,
            image_properties: cli.image_properties,
        })
    }
}
