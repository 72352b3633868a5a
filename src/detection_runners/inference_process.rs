use std::time::Instant;
use ndarray::{Array, ArrayViewD, IxDyn};
use crate::common::{InferenceDevice, ModelBundle, PredictImage, PredictorConfig};
use crate::data::{ImageTransformInfo, X};
use crate::errors::{ModelLoadError, PredictError};
use crate::predictor::PredictorState;
use crate::utils;

/// The neural-network runtime behind a predictor.
pub trait InferenceEngine: Sized {
    /// Prepares the runtime for the bundle's weights on `device`.
    fn load(bundle: &ModelBundle, device: InferenceDevice, config: &PredictorConfig) -> Result<Self, ModelLoadError>;

    /// Executes the model on one preprocessed input and returns its first output.
    fn run(&mut self, input: X) -> Result<Array<f32, IxDyn>, PredictError>;

    /// Device the engine actually ended up on.
    fn device(&self) -> InferenceDevice;
}

/// Pre- and post-processing specific to one kind of model head.
pub trait InferenceProcess {
    type Output;

    /// Pre-process the input data.
    fn preprocess(&self, image: &PredictImage, input_size: u32) -> Result<(X, ImageTransformInfo), PredictError>;

    /// Post-process the model's output.
    fn postprocess(&self, ys: ArrayViewD<'_, f32>, transform: &ImageTransformInfo, state: &PredictorState) -> Result<Self::Output, PredictError>;

    /// Executes the full pipeline, publishing its timings through `state`.
    ///
    /// Returns the output together with the inference time in milliseconds.
    fn forward<E: InferenceEngine>(&self, engine: &mut E, image: &PredictImage, state: &mut PredictorState) -> Result<(Self::Output, f32), PredictError> {
        let detect_time = Instant::now();
        let mut _detect_elapsed = detect_time.elapsed();

        let (xs, transform) = self.preprocess(image, state.input_size())?;
        _detect_elapsed = utils::trace("TIME", "Preprocessing input", detect_time, _detect_elapsed);

        let t_exe = Instant::now();
        let ys = engine.run(xs)?;
        let t_exe = t_exe.elapsed();
        _detect_elapsed = utils::trace("TIME", "Detection run", detect_time, _detect_elapsed);

        let output = self.postprocess(ys.view(), &transform, state)?;
        utils::trace("TIME", "Postprocessing", detect_time, _detect_elapsed);

        let inference_time_ms = state.report_frame(t_exe, detect_time.elapsed());
        Ok((output, inference_time_ms))
    }
}
