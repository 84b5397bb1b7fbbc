//! Storage port for the claims workflow
//!
//! The workflow treats durable storage as an external collaborator behind
//! this trait. Adapters live in `infra_db`.

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, PortError, UserId};

use crate::approval::Approval;
use crate::claim::Claim;

/// Durable store of claims, approvals, and document metadata
///
/// `record_decision` must apply the claim update and the approval insert as
/// one atomic unit; a partial write is a correctness violation. The store is
/// also required to serialize the read-modify-write of a single claim's
/// status so no approval row is silently lost under concurrent decisions.
#[async_trait]
pub trait ClaimStore: DomainPort {
    /// Retrieves a claim by id
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Persists a newly submitted claim
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Atomically persists an updated claim status together with its
    /// approval record; on failure neither is applied
    async fn record_decision(&self, claim: &Claim, approval: &Approval) -> Result<(), PortError>;

    /// All claims owned by a lecturer, newest first
    async fn claims_for_lecturer(&self, lecturer_id: UserId) -> Result<Vec<Claim>, PortError>;

    /// Submitted claims awaiting a review decision, newest first
    async fn claims_pending_review(&self) -> Result<Vec<Claim>, PortError>;

    /// Approval trail for a claim, newest first
    async fn approvals_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Approval>, PortError>;

    /// Number of supporting documents linked to a claim
    ///
    /// Used only for user-facing messaging, never for policy decisions.
    async fn document_count(&self, claim_id: ClaimId) -> Result<u64, PortError>;
}
