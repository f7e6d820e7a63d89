use std::fmt;

use crate::color::ColorRgba;
use crate::device::SurfaceErrorAction;

use super::PipelineMode;

/// A submission was rejected before any GPU work was encoded.
#[derive(Debug)]
pub enum SubmitError {
    /// The call needs a pipeline of the other kind.
    WrongMode {
        expected: PipelineMode,
        actual: PipelineMode,
    },
    /// `render` was called on a session without a presentation surface.
    NoSurface,
    /// The clear color has a NaN or infinite component.
    InvalidClearColor(ColorRgba),
    /// Auxiliary data was supplied but the session was created without the slot.
    AuxiliaryDisabled,
    /// The dispatch exceeds a device limit.
    TooLarge {
        what: &'static str,
        requested: u64,
        limit: u64,
    },
    /// The next surface texture could not be acquired.
    Surface {
        error: wgpu::SurfaceError,
        action: SurfaceErrorAction,
    },
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::WrongMode { expected, actual } => write!(
                f,
                "operation needs a {expected:?} session, this one is {actual:?}"
            ),
            SubmitError::NoSurface => write!(f, "session has no presentation surface"),
            SubmitError::InvalidClearColor(c) => write!(f, "clear color is not finite: {c:?}"),
            SubmitError::AuxiliaryDisabled => write!(
                f,
                "auxiliary data supplied but the session was created without the auxiliary slot"
            ),
            SubmitError::TooLarge {
                what,
                requested,
                limit,
            } => write!(f, "{what} {requested} exceeds the device limit of {limit}"),
            SubmitError::Surface { error, action } => {
                write!(f, "failed to acquire surface texture ({action:?}): {error}")
            }
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Surface { error, .. } => Some(error),
            _ => None,
        }
    }
}
