use serde::{Deserialize, Serialize};
use crate::common::BBox;
use crate::detection_runners::ort_detector::nms::Nms;

/// One object found by a detector.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: usize,
    pub bbox: BBox,
    pub label: Option<String>,
    pub confidence: f32,
}

impl Nms for Detection {
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl Detection {
    pub fn new(class_id: usize, bbox: BBox, label: Option<String>, confidence: f32) -> Self {
        Self {
            class_id,
            bbox,
            label,
            confidence,
        }
    }

    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or("Unknown".to_string())
    }
}

/// Result of one detector pass over an image.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
    pub image_width: u32,
    pub image_height: u32,
    /// Time spent in the inference engine, in milliseconds.
    pub inference_time_ms: f32,
}

impl DetectionResult {
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// One class score from a classifier.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub class_id: usize,
    pub label: Option<String>,
    pub score: f32,
}

/// Result of one classifier pass, highest score first.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub top: Vec<Classification>,
    pub inference_time_ms: f32,
}

impl ClassificationResult {
    pub fn best(&self) -> Option<&Classification> {
        self.top.first()
    }
}
