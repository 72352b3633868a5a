use std::path::PathBuf;

/// Failures while reading the metadata sidecar. These abort the enclosing model load.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to read metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode metadata: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("metadata document is not a mapping (found {0})")]
    NotAMapping(&'static str),
}

/// A single metadata field that is present but unusable.
///
/// Never leaves the loader: the field keeps its prior value and the error is logged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("cannot convert {0:?} to an integer")]
    NotNumeric(String),

    #[error("cannot convert a {0} value to an integer")]
    UnsupportedType(&'static str),

    #[error("input size {0} is not a positive integer")]
    NotPositive(i64),

    #[error("input size {0} is out of range")]
    OutOfRange(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model weights not found at {}", .0.display())]
    MissingWeights(PathBuf),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("inference engine refused to initialize: {0}")]
    Engine(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("model load failed: {0}")]
    ModelLoad(#[from] ModelLoadError),

    #[error("no model loaded, call load_model first")]
    NotLoaded,

    #[error("failed to prepare input: {0}")]
    Preprocess(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn preprocess(msg: impl Into<String>) -> Self {
        Self::Preprocess(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn is_model_load(&self) -> bool {
        matches!(self, Self::ModelLoad(_))
    }
}

impl From<MetadataError> for PredictError {
    fn from(err: MetadataError) -> Self {
        Self::ModelLoad(ModelLoadError::Metadata(err))
    }
}
