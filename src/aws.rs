use anyhow::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_rekognition::types::{
    DetectLabelsFeatureName, DetectLabelsImageProperties, DetectLabelsImageQuality, Image,
    S3Object,
};
use aws_sdk_s3::primitives::ByteStream;
use std::collections::HashMap;
use std::path::Path;

use crate::labels::{
    BoundingBox, DetectedLabel, DominantColor, ImageProperties, ImageQuality, LabelDetection,
    LabelInstance,
};
use crate::record::{AnalysisRecord, StoredLabel};
use crate::services::{DetectRequest, LabelService, ObjectStore, RecordTable};

pub struct AwsClients {
    pub s3: aws_sdk_s3::Client,
    pub rekognition: aws_sdk_rekognition::Client,
    pub dynamodb: aws_sdk_dynamodb::Client,
}

pub async fn create_clients(region: Option<String>) -> AwsClients {
    let mut builder = aws_config::load_defaults(BehaviorVersion::v2024_03_28())
        .await
        .into_builder();
    if let Some(region) = region {
        builder = builder.region(Region::new(region));
    }
    let config = builder.build();

    AwsClients {
        s3: aws_sdk_s3::Client::new(&config),
        rekognition: aws_sdk_rekognition::Client::new(&config),
        dynamodb: aws_sdk_dynamodb::Client::new(&config),
    }
}

#[async_trait]
impl ObjectStore for aws_sdk_s3::Client {
    async fn upload(&self, path: &Path, bucket: &str, key: &str, content_type: &str) -> Result<()> {
        let body = ByteStream::from_path(path).await?;
        self.put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await?;
        Ok(())
    }
}

fn names<'a>(names: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    names.flatten().map(str::to_owned).collect()
}

fn quality(value: &DetectLabelsImageQuality) -> ImageQuality {
    ImageQuality {
        brightness: value.brightness(),
        sharpness: value.sharpness(),
        contrast: value.contrast(),
    }
}

fn color(value: &aws_sdk_rekognition::types::DominantColor) -> DominantColor {
    DominantColor {
        css_color: value.css_color().map(str::to_owned),
        simplified_color: value.simplified_color().map(str::to_owned),
        hex_code: value.hex_code().map(str::to_owned),
        pixel_percent: value.pixel_percent(),
    }
}

fn properties(value: &DetectLabelsImageProperties) -> ImageProperties {
    ImageProperties {
        quality: value.quality().map(quality),
        dominant_colors: value.dominant_colors().iter().map(color).collect(),
        foreground_quality: value.foreground().and_then(|f| f.quality()).map(quality),
        background_quality: value.background().and_then(|b| b.quality()).map(quality),
    }
}

fn instance(value: &aws_sdk_rekognition::types::Instance) -> LabelInstance {
    LabelInstance {
        bounding_box: value.bounding_box().map(|bbox| BoundingBox {
            width: bbox.width().unwrap_or_default(),
            height: bbox.height().unwrap_or_default(),
            left: bbox.left().unwrap_or_default(),
            top: bbox.top().unwrap_or_default(),
        }),
        confidence: value.confidence(),
    }
}

fn label(value: &aws_sdk_rekognition::types::Label) -> DetectedLabel {
    DetectedLabel {
        name: value.name().map(str::to_owned),
        confidence: value.confidence(),
        instances: value.instances().iter().map(instance).collect(),
        parents: names(value.parents().iter().map(|p| p.name())),
        aliases: names(value.aliases().iter().map(|a| a.name())),
        categories: names(value.categories().iter().map(|c| c.name())),
    }
}

#[async_trait]
impl LabelService for aws_sdk_rekognition::Client {
    async fn detect(&self, request: &DetectRequest) -> Result<LabelDetection> {
        let object = S3Object::builder()
            .bucket(&request.bucket)
            .name(&request.key)
            .build();
        let image = Image::builder().s3_object(object).build();

        let mut call = self
            .detect_labels()
            .image(image)
            .max_labels(request.max_labels);
        if request.image_properties {
            call = call
                .features(DetectLabelsFeatureName::GeneralLabels)
                .features(DetectLabelsFeatureName::ImageProperties);
        }
        let response = call.send().await?;

        Ok(LabelDetection {
            labels: response.labels().iter().map(label).collect(),
            image_properties: response.image_properties().map(properties),
        })
    }
}

fn string_attr(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

fn label_item(label: &StoredLabel) -> AttributeValue {
    let name = string_attr(&label.name);
    let confidence = AttributeValue::N(label.confidence.to_string());
    AttributeValue::M(HashMap::from([
        ("Name".to_string(), name),
        ("Confidence".to_string(), confidence),
    ]))
}

/// DynamoDB item for a record; confidences go out as number (`N`) values.
pub fn record_item(record: &AnalysisRecord) -> HashMap<String, AttributeValue> {
    let labels = record.labels.iter().map(label_item).collect();

    HashMap::from([
        ("filename".to_string(), string_attr(&record.filename)),
        ("labels".to_string(), AttributeValue::L(labels)),
        ("timestamp".to_string(), string_attr(&record.timestamp)),
        ("branch".to_string(), string_attr(&record.branch)),
    ])
}

#[async_trait]
impl RecordTable for aws_sdk_dynamodb::Client {
    async fn put_record(&self, table: &str, record: &AnalysisRecord) -> Result<()> {
        self.put_item()
            .table_name(table)
            .set_item(Some(record_item(record)))
            .send()
            .await?;
        Ok(())
    }
}
