mod bbox;
mod detection;
mod inference_device;
mod model_config;
mod predict_image;

pub use bbox::*;
pub use detection::*;
pub use inference_device::*;
pub use model_config::*;
pub use predict_image::*;
