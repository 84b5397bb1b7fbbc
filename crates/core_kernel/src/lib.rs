//! Core Kernel - Foundational types and utilities for the claims system
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Strongly-typed identifiers for claims, approvals, documents, and users
//! - Port infrastructure (shared error type for storage adapters)

pub mod identifiers;
pub mod ports;

pub use identifiers::{ApprovalId, ClaimId, DocumentId, UserId};
pub use ports::{DomainPort, PortError};
