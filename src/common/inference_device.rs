#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InferenceDevice {
    #[default] CPU,
    CUDA(usize),
    TensorRT(usize),
    CoreML,
}

// Display spelling, matched case-insensitively when parsing.
const CPU: &str = "CPU";
const CUDA: &str = "CUDA";
const TENSOR_RT: &str = "TensorRT";
const CORE_ML: &str = "CoreML";

impl InferenceDevice {
    pub fn from_str(device: &str, device_id: usize) -> Option<Self> {
        [
            InferenceDevice::CPU,
            InferenceDevice::CUDA(device_id),
            InferenceDevice::TensorRT(device_id),
            InferenceDevice::CoreML,
        ]
        .into_iter()
        .find(|d| d.str().eq_ignore_ascii_case(device))
    }

    /// The accelerator to try when a host asks for acceleration without naming one.
    pub fn platform_accelerator() -> Self {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            InferenceDevice::CoreML
        } else {
            InferenceDevice::CUDA(0)
        }
    }

    /// Maps the `use_acceleration` flag of `load_model` onto a device.
    pub fn select(use_acceleration: bool, preferred: Option<InferenceDevice>) -> Self {
        if use_acceleration {
            preferred
                .filter(InferenceDevice::is_accelerated)
                .unwrap_or_else(InferenceDevice::platform_accelerator)
        } else {
            InferenceDevice::CPU
        }
    }

    pub fn is_accelerated(&self) -> bool {
        !matches!(self, InferenceDevice::CPU)
    }

    pub fn str(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => CPU,
            InferenceDevice::CUDA(_) => CUDA,
            InferenceDevice::TensorRT(_) => TENSOR_RT,
            InferenceDevice::CoreML => CORE_ML,
        }
    }
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceDevice::CUDA(id) | InferenceDevice::TensorRT(id) => write!(f, "{}:{}", self.str(), id),
            _ => f.write_str(self.str()),
        }
    }
}
