use ndarray::{ArrayViewD, Axis, Ix2};
use crate::common::{BBox, Detection, DetectionResult, ModelBundle, PredictImage, PredictorConfig};
use crate::data::{ImageTransformInfo, X};
use crate::detection_runners::image_ops;
use crate::detection_runners::nms::nms;
use crate::detection_runners::{InferenceEngine, InferenceProcess, OrtEngine};
use crate::errors::PredictError;
use crate::predictor::{Predictor, PredictorState};
use crate::Result;

/// Box coordinates lead every prediction row, class scores follow.
const BOX_CHANNELS: usize = 4;

/// YOLOv8-style detection head: `cx, cy, w, h` followed by one score per class.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetectHead;

impl InferenceProcess for DetectHead {
    type Output = Vec<Detection>;

    fn preprocess(&self, image: &PredictImage, input_size: u32) -> Result<(X, ImageTransformInfo)> {
        image_ops::letterbox(image, input_size)
    }

    fn postprocess(&self, ys: ArrayViewD<'_, f32>, transform: &ImageTransformInfo, state: &PredictorState) -> Result<Vec<Detection>> {
        let preds = match ys.ndim() {
            3 => ys.index_axis_move(Axis(0), 0),
            2 => ys,
            n => return Err(PredictError::inference(format!("unexpected detector output rank {n}"))),
        };
        let preds = preds
            .into_dimensionality::<Ix2>()
            .map_err(|err| PredictError::inference(err.to_string()))?;

        let (rows, cols) = preds.dim();
        let labels = state.labels();
        let anchors_last = if !labels.is_empty() && rows == BOX_CHANNELS + labels.len() {
            true
        } else if !labels.is_empty() && cols == BOX_CHANNELS + labels.len() {
            false
        } else {
            // exported heads carry far more anchors than channels
            rows < cols
        };
        let preds = if anchors_last { preds.reversed_axes() } else { preds };

        if preds.ncols() <= BOX_CHANNELS {
            return Err(PredictError::inference(format!(
                "detector output has {} channels, expected more than {}",
                preds.ncols(), BOX_CHANNELS
            )));
        }

        let threshold = state.confidence_threshold();
        let mut detections: Vec<Detection> = preds
            .axis_iter(Axis(0))
            .filter_map(|row| {
                let (class_id, score) = row
                    .iter()
                    .skip(BOX_CHANNELS)
                    .enumerate()
                    .fold((0, f32::NEG_INFINITY), |best, (i, &s)| if s > best.1 { (i, s) } else { best });

                if !(score >= threshold) {
                    return None;
                }

                let bbox = transform.to_source(BBox::from_cxcy_wh(row[0], row[1], row[2], row[3]));
                if bbox.area() <= 0. {
                    return None;
                }

                let label = labels.label(class_id).map(str::to_string);
                Some(Detection::new(class_id, bbox, label, score))
            })
            .collect();

        nms(&mut detections, state.iou_threshold());
        detections.truncate(state.max_results());
        Ok(detections)
    }
}

/// Object detector producing labelled bounding boxes.
#[derive(Debug)]
pub struct YoloDetector<E: InferenceEngine = OrtEngine> {
    state: PredictorState,
    engine: Option<E>,
}

impl<E: InferenceEngine> Default for YoloDetector<E> {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}

impl<E: InferenceEngine> YoloDetector<E> {
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            state: PredictorState::new(config),
            engine: None,
        }
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }
}

impl<E: InferenceEngine> Predictor for YoloDetector<E> {
    type Output = DetectionResult;

    fn load_model(&mut self, bundle: &ModelBundle, use_acceleration: bool) -> Result<()> {
        self.engine = None;
        self.engine = Some(self.state.load_model(bundle, use_acceleration)?);
        Ok(())
    }

    fn predict(&mut self, image: &PredictImage) -> Result<DetectionResult> {
        let engine = self.engine.as_mut().ok_or(PredictError::NotLoaded)?;
        let (detections, inference_time_ms) = DetectHead.forward(engine, image, &mut self.state)?;

        Ok(DetectionResult {
            detections,
            image_width: image.width(),
            image_height: image.height(),
            inference_time_ms,
        })
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

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn identity_transform(size: u32) -> ImageTransformInfo {
        ImageTransformInfo {
            width_src: size,
            height_src: size,
            width_dst: size,
            height_dst: size,
            width_scale: 1.,
            height_scale: 1.,
            width_pad: 0.,
            height_pad: 0.,
        }
    }

    #[test]
    fn decodes_anchors_last_output() {
        // 4 box channels + 2 classes, 8 anchors, only anchors 1 and 5 score
        let mut ys = Array::<f32, _>::zeros((1, 6, 8));
        for (anchor, cx, class, score) in [(1, 20., 0, 0.9), (5, 60., 1, 0.8)] {
            ys[[0, 0, anchor]] = cx;
            ys[[0, 1, anchor]] = 20.;
            ys[[0, 2, anchor]] = 10.;
            ys[[0, 3, anchor]] = 10.;
            ys[[0, 4 + class, anchor]] = score;
        }

        let state = PredictorState::default();
        let out = DetectHead.postprocess(ys.view().into_dyn(), &identity_transform(100), &state).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].class_id, 0);
        assert_eq!(out[0].bbox, BBox::new(15., 15., 25., 25.));
        assert_eq!(out[1].class_id, 1);
        assert!((out[1].confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn rejects_output_without_class_channels() {
        let ys = Array::<f32, _>::zeros((1, 10, 4));
        let state = PredictorState::default();
        assert!(DetectHead.postprocess(ys.view().into_dyn(), &identity_transform(10), &state).is_err());
    }
}
