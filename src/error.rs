//! Error type for the sandbox core.
//!
//! Only spawn validation and configuration loading can fail. Degenerate
//! geometry inside a step is skipped locally and never surfaces here.

use std::fmt;

use crate::utils::allocator::BodyId;

#[derive(Debug, Clone, PartialEq)]
pub enum SandboxError {
    /// Spawn arguments describe a shape that cannot exist.
    InvalidShape { reason: &'static str },
    /// A handle that does not (or no longer) refer to a live body.
    UnknownBody(BodyId),
    /// Startup configuration could not be parsed.
    Config(String),
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { reason } => write!(f, "invalid shape: {reason}"),
            Self::UnknownBody(id) => write!(f, "unknown body {id}"),
            Self::Config(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for SandboxError {}

impl From<serde_json::Error> for SandboxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SandboxError>;
