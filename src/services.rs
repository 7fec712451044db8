//! Narrow seams around the three remote calls a run makes.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::labels::LabelDetection;
use crate::record::AnalysisRecord;

/// Object storage that accepts whole-file uploads.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, path: &Path, bucket: &str, key: &str, content_type: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectRequest {
    pub bucket: String,
    pub key: String,
    pub max_labels: i32,
    pub image_properties: bool,
}

/// A vision service that labels an already-stored object.
#[async_trait]
pub trait LabelService: Send + Sync {
    async fn detect(&self, request: &DetectRequest) -> Result<LabelDetection>;
}

/// A key-value table with replace-on-put semantics.
#[async_trait]
pub trait RecordTable: Send + Sync {
    async fn put_record(&self, table: &str, record: &AnalysisRecord) -> Result<()>;
}
