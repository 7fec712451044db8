use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required env var: {0}")]
    MissingEnv(&'static str),

    #[error("Images directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No images found in {}/ (expected .jpg/.jpeg/.png)", .0.display())]
    NoImagesFound(PathBuf),

    #[error("Label {label:?} has a confidence of {value}, which has no decimal form")]
    NonFiniteConfidence { label: String, value: f64 },
}
