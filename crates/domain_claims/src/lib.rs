//! Lecturer Claims Domain
//!
//! This crate implements the pay-claim lifecycle from submission through
//! automated policy verification and the multi-role review protocol.
//!
//! # Claim Lifecycle
//!
//! ```text
//! (submit) -> Submitted -> Approved
//!                       -> Rejected
//! ```
//!
//! Automated verification at submission annotates the claim (flag + notes)
//! but never changes the initial status; reviewers retain full authority to
//! override a flagged claim, with the override recorded in the approval's
//! comments.

pub mod approval;
pub mod claim;
pub mod error;
pub mod ports;
pub mod verification;
pub mod workflow;

pub use approval::{Approval, ApproverRole};
pub use claim::{Claim, ClaimStatus};
pub use error::ClaimError;
pub use ports::ClaimStore;
pub use verification::{evaluate, HoursBand, PolicyViolation, VerificationResult};
pub use workflow::{
    ClaimWorkflow, DecisionOutcome, DecisionRequest, SubmissionOutcome, SubmitClaim,
};
