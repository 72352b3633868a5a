use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use crate::common::InferenceDevice;
use crate::errors::MetadataError;

pub const WEIGHTS_FILE: &str = "model.onnx";
pub const METADATA_FILE: &str = "metadata.yaml";

/// A model artifact and the metadata sidecar shipped with it.
#[derive(Default, Debug, Clone)]
pub struct ModelBundle {
    pub weights_path: PathBuf,
    pub metadata_path: PathBuf,
    /// Location of the onnxruntime shared library, `ORT_DYLIB_PATH` is used when unset.
    pub ort_lib_path: Option<PathBuf>,
}

impl ModelBundle {
    pub fn new(weights_path: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            weights_path: weights_path.into(),
            metadata_path: metadata_path.into(),
            ort_lib_path: None,
        }
    }

    /// Bundle laid out as a directory holding `model.onnx` and `metadata.yaml`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(WEIGHTS_FILE), dir.join(METADATA_FILE))
    }

    pub fn with_ort_lib_path(mut self, ort_lib_path: impl Into<PathBuf>) -> Self {
        self.ort_lib_path = Some(ort_lib_path.into());
        self
    }

    /// Opens the metadata sidecar for reading. The handle closes when dropped.
    pub fn open_metadata(&self) -> Result<BufReader<File>, MetadataError> {
        Ok(BufReader::new(File::open(&self.metadata_path)?))
    }

    pub fn has_weights(&self) -> bool {
        self.weights_path.is_file()
    }
}

impl fmt::Display for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weights File Path: {}", self.weights_path.display())?;
        writeln!(f, "Metadata Path: {}", self.metadata_path.display())?;
        match &self.ort_lib_path {
            Some(path) => write!(f, "OnnxRuntime Lib Path: {}", path.display()),
            None => write!(f, "OnnxRuntime Lib Path: <env>"),
        }
    }
}

/// Tunables shared by all predictor variants.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub max_results: usize,
    pub num_threads: usize,
    /// Accelerator to use when `load_model` is asked for acceleration.
    pub accelerator: Option<InferenceDevice>,
}

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.5;

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            conf_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            max_results: 100,
            num_threads: 2,
            accelerator: None,
        }
    }
}

impl PredictorConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_confidence(mut self, x: f32) -> Self {
        self.conf_threshold = x;
        self
    }

    pub fn with_iou(mut self, x: f32) -> Self {
        self.iou_threshold = x;
        self
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = n.max(1);
        self
    }

    pub fn with_accelerator(mut self, device: InferenceDevice) -> Self {
        self.accelerator = Some(device);
        self
    }
}
