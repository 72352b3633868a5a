use std::cmp::Ordering;
use ndarray::ArrayViewD;
use crate::common::{Classification, ClassificationResult, ModelBundle, PredictImage, PredictorConfig};
use crate::data::{ImageTransformInfo, X};
use crate::detection_runners::image_ops;
use crate::detection_runners::{InferenceEngine, InferenceProcess, OrtEngine};
use crate::errors::PredictError;
use crate::predictor::{Predictor, PredictorState};
use crate::Result;

/// Classification head emitting one score per class for the whole frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassifyHead;

impl InferenceProcess for ClassifyHead {
    type Output = Vec<Classification>;

    fn preprocess(&self, image: &PredictImage, input_size: u32) -> Result<(X, ImageTransformInfo)> {
        image_ops::fit_exact(image, input_size)
    }

    fn postprocess(&self, ys: ArrayViewD<'_, f32>, _transform: &ImageTransformInfo, state: &PredictorState) -> Result<Vec<Classification>> {
        if ys.is_empty() {
            return Err(PredictError::inference("classifier returned no scores"));
        }
        if ys.ndim() > 1 && ys.shape()[0] != 1 {
            return Err(PredictError::inference(format!("expected a single batch, got shape {:?}", ys.shape())));
        }

        let threshold = state.confidence_threshold();
        let labels = state.labels();

        let mut top: Vec<Classification> = ys
            .iter()
            .enumerate()
            .filter(|&(_, &score)| score >= threshold)
            .map(|(class_id, &score)| Classification {
                class_id,
                label: labels.label(class_id).map(str::to_string),
                score,
            })
            .collect();

        top.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        top.truncate(state.max_results());
        Ok(top)
    }
}

/// Whole-image classifier ranking classes by score.
#[derive(Debug)]
pub struct YoloClassifier<E: InferenceEngine = OrtEngine> {
    state: PredictorState,
    engine: Option<E>,
}

impl<E: InferenceEngine> Default for YoloClassifier<E> {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}

impl<E: InferenceEngine> YoloClassifier<E> {
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            state: PredictorState::new(config),
            engine: None,
        }
    }
}

impl<E: InferenceEngine> Predictor for YoloClassifier<E> {
    type Output = ClassificationResult;

    fn load_model(&mut self, bundle: &ModelBundle, use_acceleration: bool) -> Result<()> {
        self.engine = None;
        self.engine = Some(self.state.load_model(bundle, use_acceleration)?);
        Ok(())
    }

    fn predict(&mut self, image: &PredictImage) -> Result<ClassificationResult> {
        let engine = self.engine.as_mut().ok_or(PredictError::NotLoaded)?;
        let (top, inference_time_ms) = ClassifyHead.forward(engine, image, &mut self.state)?;
        Ok(ClassificationResult { top, inference_time_ms })
    }

    fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    fn state(&self) -> &PredictorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PredictorState {
        &mut self.state
    }
}
