mod yolo_classifier;
mod yolo_detector;

pub use yolo_classifier::{ClassifyHead, YoloClassifier};
pub use yolo_detector::{DetectHead, YoloDetector};
