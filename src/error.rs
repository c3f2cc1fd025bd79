// src/error.rs
//! Error taxonomy shared by the event loop and the native pump.
//!
//! Setup and allocation failures are fatal: they reach the application's
//! `fail` callback and stop the run. Encoding failures are recoverable and
//! never leave the event channel or title encoder.

use std::fmt;

/// Stable codes handed to `Application::fail` for errors without an OS code.
pub const ERROR_CODE_ALLOCATION: i32 = -2;
pub const ERROR_CODE_ENCODING: i32 = -3;
pub const ERROR_CODE_PROTOCOL: i32 = -4;

/// Errors raised by eva.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaError {
    /// DPI awareness, window class, or window creation failed.
    PlatformSetup { code: i32, message: String },

    /// Framebuffer storage could not be grown to the requested capacity.
    Allocation { pitch: usize, max_height: usize },

    /// Text could not be converted between native and UTF-8 encodings.
    Encoding { context: &'static str, detail: String },
}

impl EvaError {
    pub fn platform_setup(code: i32, message: impl Into<String>) -> Self {
        EvaError::PlatformSetup {
            code,
            message: message.into(),
        }
    }

    /// Code reported through the `fail` callback.
    pub fn error_code(&self) -> i32 {
        match self {
            EvaError::PlatformSetup { code, .. } => *code,
            EvaError::Allocation { .. } => ERROR_CODE_ALLOCATION,
            EvaError::Encoding { .. } => ERROR_CODE_ENCODING,
        }
    }

    /// Whether the run loop must stop on this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EvaError::Encoding { .. })
    }
}

impl fmt::Display for EvaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaError::PlatformSetup { code, message } => {
                write!(f, "platform setup failed ({}): {}", code, message)
            }
            EvaError::Allocation { pitch, max_height } => write!(
                f,
                "failed to allocate a {}x{} framebuffer",
                pitch, max_height
            ),
            EvaError::Encoding { context, detail } => {
                write!(f, "failed to encode {}: {}", context, detail)
            }
        }
    }
}

impl std::error::Error for EvaError {}
