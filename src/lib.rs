mod utils;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod errors;
pub mod metadata;
pub mod predictor;
pub mod predictors;
pub mod tracking;
pub mod worker;

use std::time::Instant;
use anyhow::Context;
use crate::common::{DetectionResult, ModelBundle, PredictImage, PredictorConfig};
use crate::errors::PredictError;
use crate::predictor::Predictor;
use crate::predictors::YoloDetector;
use crate::tracking::{CountedFrame, CountingSession};

pub type Result<T, E = PredictError> = std::result::Result<T, E>;

/// Builds an ONNX Runtime detector and loads `bundle` into it.
pub fn init_predictor(bundle: &ModelBundle, config: PredictorConfig, use_acceleration: bool) -> anyhow::Result<YoloDetector> {
    log::info!("Initializing predictor\n{bundle}");

    let mut predictor = YoloDetector::new(config);
    predictor
        .load_model(bundle, use_acceleration)
        .with_context(|| format!("loading {}", bundle.weights_path.display()))?;
    Ok(predictor)
}

pub fn run_prediction<P: Predictor>(predictor: &mut P, image: impl Into<PredictImage>) -> anyhow::Result<P::Output> {
    let now = Instant::now();

    let output = predictor.predict(&image.into())?;

    log::debug!("Processing time: {:?}", now.elapsed());
    Ok(output)
}

/// Runs a detector and feeds its result through `session`.
///
/// Tracking output is empty while the session is not active.
pub fn run_counting<P>(predictor: &mut P, session: &mut CountingSession, image: impl Into<PredictImage>) -> anyhow::Result<CountedFrame>
where
    P: Predictor<Output = DetectionResult>,
{
    let result = run_prediction(predictor, image)?;
    let (tracked, crossings) = session.update(&result);

    if !crossings.is_empty() {
        log::info!("{} new crossing(s), total {}", crossings.len(), session.stats().total);
    }
    Ok(CountedFrame { result, tracked, crossings })
}
