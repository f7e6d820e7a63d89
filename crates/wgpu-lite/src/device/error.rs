use std::fmt;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Failure while bringing up a GPU device.
#[derive(Debug)]
pub enum InitError {
    /// The host exposes no usable GPU adapter. Not retried.
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter refused to create a device with the requested features/limits.
    Device(wgpu::RequestDeviceError),
    /// The presentation surface could not be created or has no usable format.
    Surface(String),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NoAdapter(e) => write!(
                f,
                "no GPU adapter available (is hardware acceleration enabled?): {e}"
            ),
            InitError::Device(e) => write!(f, "failed to create GPU device: {e}"),
            InitError::Surface(msg) => write!(f, "surface setup failed: {msg}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::NoAdapter(e) => Some(e),
            InitError::Device(e) => Some(e),
            InitError::Surface(_) => None,
        }
    }
}
