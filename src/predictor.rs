mod callbacks;
mod state;

pub use callbacks::{CallbackSlot, FloatResultCallback};
pub use state::PredictorState;

use crate::common::{ModelBundle, PredictImage};
use crate::data::LabelSet;
use crate::Result;

/// Lifecycle shared by every predictor variant.
///
/// A predictor starts unloaded. `load_model` moves it to ready; a failed load leaves it unloaded
/// with labels and input size as they were before the call. `predict` on an unloaded predictor
/// fails with [`PredictError::NotLoaded`](crate::errors::PredictError::NotLoaded).
pub trait Predictor {
    type Output;

    fn load_model(&mut self, bundle: &ModelBundle, use_acceleration: bool) -> Result<()>;

    /// Runs one inference pass. Timing callbacks fire before this returns.
    fn predict(&mut self, image: &PredictImage) -> Result<Self::Output>;

    fn is_loaded(&self) -> bool;

    fn state(&self) -> &PredictorState;

    fn state_mut(&mut self) -> &mut PredictorState;

    fn set_confidence_threshold(&mut self, confidence: f32) {
        self.state_mut().set_confidence_threshold(confidence);
    }

    fn set_inference_time_callback(&mut self, callback: Option<FloatResultCallback>) {
        self.state_mut().set_inference_time_callback(callback);
    }

    fn set_fps_rate_callback(&mut self, callback: Option<FloatResultCallback>) {
        self.state_mut().set_fps_rate_callback(callback);
    }

    fn confidence_threshold(&self) -> f32 {
        self.state().confidence_threshold()
    }

    fn labels(&self) -> &LabelSet {
        self.state().labels()
    }

    fn input_size(&self) -> u32 {
        self.state().input_size()
    }
}
