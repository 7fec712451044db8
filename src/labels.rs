use itertools::Itertools;
use serde::Serialize;

pub const DEFAULT_MAX_LABELS: i32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
    pub left: f32,
    pub top: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelInstance {
    pub bounding_box: Option<BoundingBox>,
    pub confidence: Option<f32>,
}

/// One label as the vision service returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectedLabel {
    pub name: Option<String>,
    pub confidence: Option<f32>,
    pub instances: Vec<LabelInstance>,
    pub parents: Vec<String>,
    pub aliases: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageQuality {
    pub brightness: Option<f32>,
    pub sharpness: Option<f32>,
    pub contrast: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DominantColor {
    pub css_color: Option<String>,
    pub simplified_color: Option<String>,
    pub hex_code: Option<String>,
    pub pixel_percent: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageProperties {
    pub quality: Option<ImageQuality>,
    pub dominant_colors: Vec<DominantColor>,
    pub foreground_quality: Option<ImageQuality>,
    pub background_quality: Option<ImageQuality>,
}

/// Full response of a label detection call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelDetection {
    pub labels: Vec<DetectedLabel>,
    pub image_properties: Option<ImageProperties>,
}

/// The part of a detected label that gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelObservation {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

/// Widens a service confidence through its shortest decimal text, so that
/// `87.65f32` becomes `87.65f64` rather than `87.65000152587891`.
pub fn widen_confidence(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

impl LabelDetection {
    /// Reduces the response to name/confidence pairs, in service order.
    pub fn reduce(&self, max_labels: usize) -> Vec<LabelObservation> {
        self.labels
            .iter()
            .take(max_labels)
            .map(|label| LabelObservation {
                name: label.name.clone().unwrap_or_default(),
                confidence: label.confidence.map(widen_confidence).unwrap_or(0.0),
            })
            .collect()
    }

    pub fn log_details(&self) {
        for label in &self.labels {
            tracing::debug!(
                "label {:?} ({:?}): {} instance(s), parents [{}], aliases [{}], categories [{}]",
                label.name.as_deref().unwrap_or(""),
                label.confidence,
                label.instances.len(),
                label.parents.iter().join(", "),
                label.aliases.iter().join(", "),
                label.categories.iter().join(", "),
            );
            for instance in &label.instances {
                if let Some(bbox) = instance.bounding_box {
                    tracing::debug!(
                        "  instance ({:?}): left={} top={} width={} height={}",
                        instance.confidence,
                        bbox.left,
                        bbox.top,
                        bbox.width,
                        bbox.height
                    );
                }
            }
        }

        if let Some(properties) = &self.image_properties {
            if let Some(quality) = &properties.quality {
                tracing::debug!("image quality: {quality:?}");
            }
            let colors = properties
                .dominant_colors
                .iter()
                .filter_map(|c| c.simplified_color.as_deref().or(c.css_color.as_deref()))
                .join(", ");
            tracing::debug!("dominant colors: [{colors}]");
            if let Some(quality) = &properties.foreground_quality {
                tracing::debug!("foreground quality: {quality:?}");
            }
            if let Some(quality) = &properties.background_quality {
                tracing::debug!("background quality: {quality:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str, confidence: Option<f32>) -> DetectedLabel {
        DetectedLabel {
            name: Some(name.to_string()),
            confidence,
            ..Default::default()
        }
    }

    fn observation(name: &str, confidence: f64) -> LabelObservation {
        LabelObservation {
            name: name.to_string(),
            confidence,
        }
    }

    #[test]
    fn reduce_keeps_name_and_confidence_in_order() {
        let detection = LabelDetection {
            labels: vec![
                DetectedLabel {
                    parents: vec!["Animal".into(), "Pet".into()],
                    aliases: vec!["Kitty".into()],
                    instances: vec![LabelInstance {
                        bounding_box: Some(BoundingBox {
                            width: 0.5,
                            height: 0.5,
                            left: 0.1,
                            top: 0.2,
                        }),
                        confidence: Some(90.0),
                    }],
                    ..label("Cat", Some(87.65))
                },
                label("Sofa", Some(55.5)),
            ],
            image_properties: None,
        };

        let reduced = detection.reduce(10);
        assert_eq!(
            reduced,
            vec![observation("Cat", 87.65), observation("Sofa", 55.5)]
        );
    }

    #[test]
    fn missing_confidence_defaults_to_zero() {
        let detection = LabelDetection {
            labels: vec![label("Mystery", None)],
            image_properties: None,
        };
        assert_eq!(detection.reduce(10)[0].confidence, 0.0);
    }

    #[test]
    fn reduce_is_capped_at_max_labels() {
        let detection = LabelDetection {
            labels: (0..5)
                .map(|i| label(&format!("L{i}"), Some(50.0)))
                .collect(),
            image_properties: None,
        };
        assert_eq!(detection.reduce(10).len(), 5);
        assert_eq!(detection.reduce(3).len(), 3);
        assert!(LabelDetection::default().reduce(10).is_empty());
    }

    #[test]
    fn widening_keeps_the_decimal_text() {
        assert_eq!(widen_confidence(87.65), 87.65);
        assert_eq!(widen_confidence(12.5), 12.5);
        assert_eq!(widen_confidence(100.0), 100.0);
    }

    #[test]
    fn observation_serializes_with_service_field_names() {
        let json = serde_json::to_value(observation("Cat", 87.65)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Name": "Cat", "Confidence": 87.65 })
        );
    }
}
