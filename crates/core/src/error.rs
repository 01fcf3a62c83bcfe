//! Error type for the simulation boundary.
//!
//! Under normal operation nothing here is produced by `step`: field setters
//! clamp bad input instead of failing, and unknown field ids are ignored.
//! Errors surface only from configuration, particle indexing and buffer
//! allocation.

use std::fmt;

/// Errors that can occur when configuring or resizing a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A parameter was rejected at a validation boundary
    InvalidParameter { name: &'static str, reason: String },
    /// Particle index past the end of the ensemble
    IndexOutOfRange { index: usize, count: usize },
    /// Particle buffers could not grow to the requested count
    AllocationFailed { requested: usize },
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{name}': {reason}")
            }
            SimError::IndexOutOfRange { index, count } => {
                write!(f, "Particle index {index} out of range for {count} particles")
            }
            SimError::AllocationFailed { requested } => {
                write!(f, "Failed to allocate buffers for {requested} particles")
            }
        }
    }
}

impl std::error::Error for SimError {}
