use std::thread::{self, JoinHandle};
use crossbeam_channel::{RecvError, SendError};
use crate::common::PredictImage;
use crate::data::send_channels::{channel_pair, PredictionState, SendState};
use crate::errors::PredictError;
use crate::predictor::Predictor;
use crate::Result;

/// Runs a predictor on its own thread, fed through channels.
///
/// Results come back in submission order. Dropping or joining the worker closes the image channel,
/// which ends the loop and hands the predictor back through [`join`](Self::join).
pub struct PredictorWorker<P: Predictor> {
    send_state: SendState<P::Output>,
    handle: JoinHandle<P>,
}

impl<P> PredictorWorker<P>
where
    P: Predictor + Send + 'static,
    P::Output: Send + 'static,
{
    pub fn spawn(predictor: P) -> std::io::Result<Self> {
        let (send_state, prediction_state) = channel_pair();
        let handle = thread::Builder::new()
            .name("yolo-predict".to_string())
            .spawn(move || prediction_loop(predictor, prediction_state))?;

        Ok(Self { send_state, handle })
    }

    pub fn send(&self, image: PredictImage) -> Result<(), SendError<Box<PredictImage>>> {
        self.send_state.image_tx.send(Box::new(image))
    }

    /// Blocks until the next result is ready.
    pub fn recv(&self) -> Result<Result<P::Output>, RecvError> {
        self.send_state.result_rx.recv()
    }

    /// Stops the loop once queued images are processed and returns the predictor.
    pub fn join(self) -> Result<P> {
        let Self { send_state, handle } = self;
        drop(send_state);
        handle
            .join()
            .map_err(|_| PredictError::inference("prediction thread panicked"))
    }
}

fn prediction_loop<P: Predictor>(mut predictor: P, state: PredictionState<P::Output>) -> P {
    log::debug!("Prediction thread started");
    while let Ok(image) = state.image_rx.recv() {
        let result = predictor.predict(&image);
        if let Err(err) = &result {
            log::error!("Prediction failed: {err}");
        }
        if state.result_tx.send(result).is_err() {
            break;
        }
    }
    log::debug!("Prediction thread stopped");
    predictor
}
