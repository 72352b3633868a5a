use std::io::Read;
use std::time::Duration;
use crate::common::{InferenceDevice, ModelBundle, PredictorConfig};
use crate::data::{LabelSet, TimeCalc};
use crate::detection_runners::InferenceEngine;
use crate::errors::{MetadataError, ModelLoadError};
use crate::metadata::ModelMetadata;
use crate::predictor::{CallbackSlot, FloatResultCallback};

/// State every predictor variant carries: model metadata, filtering knobs and callbacks.
#[derive(Debug, Default)]
pub struct PredictorState {
    metadata: ModelMetadata,
    config: PredictorConfig,
    inference_time_callback: CallbackSlot,
    fps_callback: CallbackSlot,
    frame_times: TimeCalc,
}

impl PredictorState {
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn labels(&self) -> &LabelSet {
        self.metadata.labels()
    }

    pub fn input_size(&self) -> u32 {
        self.metadata.input_size()
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.config.conf_threshold
    }

    pub fn iou_threshold(&self) -> f32 {
        self.config.iou_threshold
    }

    pub fn max_results(&self) -> usize {
        self.config.max_results
    }

    pub fn set_confidence_threshold(&mut self, confidence: f32) {
        if !confidence.is_finite() {
            log::warn!("Ignoring non-finite confidence threshold {confidence}");
            return;
        }
        self.config.conf_threshold = confidence;
    }

    pub fn set_inference_time_callback(&mut self, callback: Option<FloatResultCallback>) {
        self.inference_time_callback.set(callback);
    }

    pub fn set_fps_rate_callback(&mut self, callback: Option<FloatResultCallback>) {
        self.fps_callback.set(callback);
    }

    /// Runs the metadata loader against `reader`, updating labels and input size.
    pub fn load_metadata<R: Read>(&mut self, reader: R) -> Result<(), MetadataError> {
        self.metadata.load_from(reader)
    }

    /// Loads metadata and initializes an engine for `bundle`.
    ///
    /// Labels and input size are only replaced once the engine is up, so a failed load leaves
    /// them exactly as they were.
    pub fn load_model<E: InferenceEngine>(
        &mut self,
        bundle: &ModelBundle,
        use_acceleration: bool,
    ) -> Result<E, ModelLoadError> {
        if !bundle.has_weights() {
            return Err(ModelLoadError::MissingWeights(bundle.weights_path.clone()));
        }

        let mut staged = self.metadata.clone();
        staged.load_from(bundle.open_metadata()?)?;

        let device = InferenceDevice::select(use_acceleration, self.config.accelerator);
        let engine = E::load(bundle, device, &self.config)?;

        log::info!(
            "Model ready | Device: {} | Input size: {} | Labels: {}",
            engine.device(),
            staged.input_size(),
            staged.labels().len()
        );

        self.metadata = staged;
        self.frame_times.clear();
        Ok(engine)
    }

    /// Publishes the timings of one `predict` call and returns the inference time in milliseconds.
    pub(crate) fn report_frame(&mut self, inference: Duration, frame: Duration) -> f32 {
        let inference_ms = inference.as_secs_f32() * 1000.;
        self.frame_times.push(frame);

        self.inference_time_callback.emit(inference_ms);
        self.fps_callback.emit(self.frame_times.per_second());
        inference_ms
    }
}
