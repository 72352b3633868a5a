mod label_set;
mod time_calc;
pub mod send_channels;

pub use label_set::LabelSet;
pub use time_calc::TimeCalc;

pub use crate::detection_runners::ort_detector::image_ops::ImageTransformInfo;
pub use crate::detection_runners::ort_detector::input_wrapper::X;
