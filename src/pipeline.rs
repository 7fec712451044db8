use anyhow::Result;
use chrono::Utc;
use std::fmt;
use std::future::Future;

use crate::config::{Cli, Settings};
use crate::labels::{LabelDetection, LabelObservation};
use crate::record::AnalysisRecord;
use crate::selector::{find_first_image, ImageReference};
use crate::services::{DetectRequest, LabelService, ObjectStore, RecordTable};

/// Where an image ended up in object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for UploadedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub image: ImageReference,
    pub object: UploadedObject,
    pub record: AnalysisRecord,
}

/// Resolves settings from the command line and `env`, then calls `connect`
/// with the region. A missing bucket fails before `connect` runs, so no
/// client is ever built and no request is made.
pub async fn prepare<C, F, Fut>(
    cli: Cli,
    env: impl Fn(&str) -> Option<String>,
    connect: F,
) -> Result<(Settings, C)>
where
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = C>,
{
    let settings = Settings::from_cli(cli, env)?;
    let clients = connect(settings.region.clone()).await;
    Ok((settings, clients))
}

pub async fn upload_image(
    store: &dyn ObjectStore,
    image: &ImageReference,
    bucket: &str,
    prefix: &str,
) -> Result<UploadedObject> {
    let key = format!("{prefix}/{}", image.filename);
    let path = image.path.display();
    tracing::info!("uploading {path} to s3://{bucket}/{key}");
    store
        .upload(&image.path, bucket, &key, image.content_type())
        .await?;

    Ok(UploadedObject {
        bucket: bucket.to_string(),
        key,
    })
}

pub async fn detect_labels(
    service: &dyn LabelService,
    request: &DetectRequest,
) -> Result<LabelDetection> {
    tracing::info!("detecting up to {} labels", request.max_labels);
    let detection = service.detect(request).await?;
    detection.log_details();
    Ok(detection)
}

pub async fn write_record(
    table: &dyn RecordTable,
    table_name: &str,
    filename: &str,
    labels: &[LabelObservation],
    branch: &str,
) -> Result<AnalysisRecord> {
    let record = AnalysisRecord::new(filename, labels, branch, Utc::now())?;
    let count = record.labels.len();
    tracing::info!("writing {count} label(s) for {filename} to {table_name}");
    tracing::debug!("record: {}", serde_json::to_string(&record)?);
    table.put_record(table_name, &record).await?;
    Ok(record)
}

/// Selects, uploads, labels and records one image. Stops at the first error;
/// an upload that already happened is left in place.
pub async fn run(
    settings: &Settings,
    store: &dyn ObjectStore,
    service: &dyn LabelService,
    table: &dyn RecordTable,
) -> Result<RunSummary> {
    let image = find_first_image(&settings.images_dir)?;
    let (bucket, prefix) = (&settings.bucket, &settings.prefix);
    let object = upload_image(store, &image, bucket, prefix).await?;

    let request = DetectRequest {
        bucket: object.bucket.clone(),
        key: object.key.clone(),
        max_labels: settings.max_labels,
        image_properties: settings.image_properties,
    };
    let detection = detect_labels(service, &request).await?;
    let cap = usize::try_from(settings.max_labels).unwrap_or(0);
    let labels = detection.reduce(cap);

    let record = write_record(
        table,
        &settings.table,
        &image.filename,
        &labels,
        &settings.branch,
    )
    .await?;

    Ok(RunSummary {
        image,
        object,
        record,
    })
}
