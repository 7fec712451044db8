pub mod aws;
pub mod config;
pub mod error;
pub mod labels;
pub mod pipeline;
pub mod record;
pub mod selector;
pub mod services;

pub use aws::{create_clients, AwsClients};
pub use config::{Cli, Settings};
pub use error::Error;
pub use labels::{LabelDetection, LabelObservation};
pub use pipeline::{prepare, run, RunSummary, UploadedObject};
pub use record::{AnalysisRecord, Decimal};
pub use selector::{find_first_image, ImageReference};
