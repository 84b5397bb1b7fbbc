//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, PortError};

use crate::approval::ApproverRole;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Claim not found: {0}")]
    NotFound(ClaimId),

    #[error("Role {role} is not authorized to decide on claims")]
    Unauthorized { role: ApproverRole },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Auto-verification already applied to claim {0}")]
    AlreadyVerified(ClaimId),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }
}
