use crossbeam_channel::{Receiver, Sender};
use crate::common::PredictImage;
use crate::errors::PredictError;

/// Ends of the worker channels owned by the prediction thread.
#[derive(Debug)]
pub struct PredictionState<T> {
    pub image_rx: Receiver<Box<PredictImage>>,
    pub result_tx: Sender<Result<T, PredictError>>,
}

/// Ends of the worker channels owned by the caller.
#[derive(Debug)]
pub struct SendState<T> {
    pub image_tx: Sender<Box<PredictImage>>,
    pub result_rx: Receiver<Result<T, PredictError>>,
}

/// Creates both sides of an unbounded image/result channel pair.
pub fn channel_pair<T>() -> (SendState<T>, PredictionState<T>) {
    let (image_tx, image_rx) = crossbeam_channel::unbounded();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    (SendState { image_tx, result_rx }, PredictionState { image_rx, result_tx })
}
