//! File/code adapted from https://github.com/jamjamjon/usls

use ndarray::{Array, IxDyn};
use ort::{
    execution_providers::{ExecutionProvider,
                          CPUExecutionProvider,
                          CUDAExecutionProvider,
                          TensorRTExecutionProvider,
                          CoreMLExecutionProvider},
    session::builder::{GraphOptimizationLevel, SessionBuilder},
    session::{Session, SessionInputValue},
    value::Value
};
use crate::common::{InferenceDevice, ModelBundle, PredictorConfig};
use crate::detection_runners::InferenceEngine;
use crate::detection_runners::ort_detector::input_wrapper::X;
use crate::errors::{ModelLoadError, PredictError};

const CROSS_MARK: &str = "❌";

fn engine_err(err: impl std::fmt::Display) -> ModelLoadError {
    ModelLoadError::Engine(err.to_string())
}

/// ONNXRuntime Backend
#[derive(Debug)]
pub struct OrtEngine {
    session: Session,
    device: InferenceDevice,
    input_name: String,
    output_name: String,
}

impl InferenceEngine for OrtEngine {
    fn load(bundle: &ModelBundle, device: InferenceDevice, config: &PredictorConfig) -> Result<Self, ModelLoadError> {
        if let Some(ort_lib_path) = &bundle.ort_lib_path {
            // Dynamically load the library from given path
            match ort::init_from(ort_lib_path.display().to_string()).commit() {
                Ok(_) => {},
                Err(e) => {
                    log::error!("ORT commit failed! Error: {:?}", e);
                    return Err(engine_err(e));
                }
            };
        }

        let mut builder = Session::builder().map_err(engine_err)?;

        let mut device = device;
        match device {
            InferenceDevice::TensorRT(device_id) => Self::build_trt(&mut builder, device_id).unwrap_or_else(|err| {
                log::warn!("{err}, Using cpu");
                device = InferenceDevice::CPU;
            }),
            InferenceDevice::CUDA(device_id) => Self::build_cuda(&mut builder, device_id).unwrap_or_else(|err| {
                log::warn!("{err}, Using cpu");
                device = InferenceDevice::CPU;
            }),
            InferenceDevice::CoreML => Self::build_coreml(&mut builder).unwrap_or_else(|err| {
                log::warn!("{err}, Using cpu");
                device = InferenceDevice::CPU;
            }),
            InferenceDevice::CPU => {}
        }
        if device == InferenceDevice::CPU {
            Self::build_cpu(&mut builder)?;
        }

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3).map_err(engine_err)?
            .with_intra_threads(config.num_threads).map_err(engine_err)?
            .commit_from_file(&bundle.weights_path).map_err(engine_err)?;

        let input_name = match session.inputs.first() {
            Some(input) => input.name.clone(),
            None => return Err(ModelLoadError::Engine("model declares no inputs".to_string())),
        };
        let output_name = match session.outputs.first() {
            Some(output) => output.name.clone(),
            None => return Err(ModelLoadError::Engine("model declares no outputs".to_string())),
        };

        log::info!("Backend: ONNXRuntime | Device: {} | Input: {} | Output: {}", device, input_name, output_name);

        Ok(Self {
            session,
            device,
            input_name,
            output_name,
        })
    }

    fn run(&mut self, input: X) -> Result<Array<f32, IxDyn>, PredictError> {
        let tensor = Value::from_array(input.into_inner())
            .map_err(|err| PredictError::inference(err.to_string()))?
            .into_dyn();
        let inputs = [Into::<SessionInputValue<'_>>::into(tensor)];

        let outputs = self.session
            .run(&inputs[..])
            .map_err(|err| PredictError::inference(err.to_string()))?;

        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|err| PredictError::inference(err.to_string()))?;
        Ok(output.view().into_owned())
    }

    fn device(&self) -> InferenceDevice {
        self.device
    }
}

impl OrtEngine {
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    fn build_trt(builder: &mut SessionBuilder, device_id: usize) -> Result<(), ModelLoadError> {
        let trt = TensorRTExecutionProvider::default()
            .with_device_id(device_id as i32)
            .with_engine_cache(true)
            .with_engine_cache_path("trt-cache");
        if trt.is_available().map_err(engine_err)? {
            match trt.register(builder) {
                Ok(_) => { }
                Err(err) => { return Err(engine_err(format!("{CROSS_MARK} TensorRT initialization failed: {:?}", err))) }
            }
            log::info!("Initial model serialization with TensorRT may takes some time...");
            Ok(())
        } else {
            Err(engine_err(format!("{CROSS_MARK} TensorRT execution provider not available")))
        }
    }

    fn build_cuda(builder: &mut SessionBuilder, device_id: usize) -> Result<(), ModelLoadError> {
        let ep = CUDAExecutionProvider::default()
            .with_device_id(device_id as i32);
        if ep.is_available().map_err(engine_err)? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { return Err(engine_err(format!("{CROSS_MARK} CUDA initialization failed: {:?}", err))) }
            }
            Ok(())
        } else {
            Err(engine_err(format!("{CROSS_MARK} CUDA execution provider not available")))
        }
    }

    fn build_coreml(builder: &mut SessionBuilder) -> Result<(), ModelLoadError> {
        let ep = CoreMLExecutionProvider::default()
            .with_subgraphs(false);
        if ep.is_available().map_err(engine_err)? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { return Err(engine_err(format!("{CROSS_MARK} CoreML initialization failed: {:?}", err))) }
            }
            Ok(())
        } else {
            Err(engine_err(format!("{CROSS_MARK} CoreML execution provider not available")))
        }
    }

    fn build_cpu(builder: &mut SessionBuilder) -> Result<(), ModelLoadError> {
        let ep = CPUExecutionProvider::default();
        if ep.is_available().map_err(engine_err)? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { return Err(engine_err(format!("{CROSS_MARK} CPU initialization failed: {:?}", err))) }
            }
            Ok(())
        } else {
            Err(engine_err(format!("{CROSS_MARK} CPU execution provider not available")))
        }
    }
}
