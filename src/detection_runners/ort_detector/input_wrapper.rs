//! File/code adapted from https://github.com/jamjamjon/usls

use ndarray::{Array, IxDyn};
use crate::errors::PredictError;

/// Model input, wrapper over [`Array<f32, IxDyn>`]
#[derive(Debug, Clone, Default)]
pub struct X(pub Array<f32, IxDyn>);

impl From<Array<f32, IxDyn>> for X {
    fn from(x: Array<f32, IxDyn>) -> Self {
        Self(x)
    }
}

impl std::ops::Deref for X {
    type Target = Array<f32, IxDyn>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl X {
    pub fn from_shape_vec(shape: &[usize], xs: Vec<f32>) -> Result<Self, PredictError> {
        Array::from_shape_vec(shape, xs)
            .map(Self::from)
            .map_err(|err| PredictError::preprocess(err.to_string()))
    }

    pub fn into_inner(self) -> Array<f32, IxDyn> {
        self.0
    }
}
