//! Claims store implementation
//!
//! Implements the domain's [`ClaimStore`] port on SQLite. Decimals are
//! stored as TEXT to keep exact precision, timestamps as RFC 3339 TEXT,
//! identifiers as canonical UUID strings.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use core_kernel::{ApprovalId, ClaimId, DomainPort, PortError, UserId};
use domain_claims::approval::{Approval, ApproverRole};
use domain_claims::claim::{Claim, ClaimStatus};
use domain_claims::ports::ClaimStore;

use crate::error::DatabaseError;
use crate::pool::DbPool;

const CLAIM_COLUMNS: &str = "claim_id, lecturer_id, claim_month, hours_worked, hourly_rate, \
     total_amount, description, status, submitted_at, is_auto_flagged, \
     auto_verification_notes, auto_verified_at";

/// SQLite-backed store for claims, approvals, and document metadata
#[derive(Debug, Clone)]
pub struct SqliteClaimStore {
    pool: DbPool,
}

impl SqliteClaimStore {
    /// Creates a new store over the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for SqliteClaimStore {}

fn sql_err(e: sqlx::Error) -> PortError {
    DatabaseError::from(e).into()
}

fn parse_status(s: &str) -> Result<ClaimStatus, DatabaseError> {
    match s {
        "Draft" => Ok(ClaimStatus::Draft),
        "Submitted" => Ok(ClaimStatus::Submitted),
        "UnderReview" => Ok(ClaimStatus::UnderReview),
        "Approved" => Ok(ClaimStatus::Approved),
        "Rejected" => Ok(ClaimStatus::Rejected),
        "Completed" => Ok(ClaimStatus::Completed),
        other => Err(DatabaseError::decode("status", format!("unknown status {other}"))),
    }
}

fn get_text(row: &SqliteRow, column: &str) -> Result<String, DatabaseError> {
    row.try_get::<String, _>(column)
        .map_err(|e| DatabaseError::decode(column, e))
}

fn parse_uuid(column: &str, value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|e| DatabaseError::decode(column, e))
}

fn parse_decimal(column: &str, value: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(value).map_err(|e| DatabaseError::decode(column, e))
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::decode(column, e))
}

fn row_to_claim(row: &SqliteRow) -> Result<Claim, DatabaseError> {
    let claim_month = NaiveDate::parse_from_str(&get_text(row, "claim_month")?, "%Y-%m-%d")
        .map_err(|e| DatabaseError::decode("claim_month", e))?;

    let auto_verified_at = row
        .try_get::<Option<String>, _>("auto_verified_at")
        .map_err(|e| DatabaseError::decode("auto_verified_at", e))?
        .map(|s| parse_timestamp("auto_verified_at", &s))
        .transpose()?;

    Ok(Claim {
        id: ClaimId::from_uuid(parse_uuid("claim_id", &get_text(row, "claim_id")?)?),
        lecturer_id: UserId::from_uuid(parse_uuid("lecturer_id", &get_text(row, "lecturer_id")?)?),
        claim_month,
        hours_worked: parse_decimal("hours_worked", &get_text(row, "hours_worked")?)?,
        hourly_rate: parse_decimal("hourly_rate", &get_text(row, "hourly_rate")?)?,
        total_amount: parse_decimal("total_amount", &get_text(row, "total_amount")?)?,
        description: row
            .try_get::<Option<String>, _>("description")
            .map_err(|e| DatabaseError::decode("description", e))?,
        status: parse_status(&get_text(row, "status")?)?,
        submitted_at: parse_timestamp("submitted_at", &get_text(row, "submitted_at")?)?,
        is_auto_flagged: row
            .try_get::<bool, _>("is_auto_flagged")
            .map_err(|e| DatabaseError::decode("is_auto_flagged", e))?,
        auto_verification_notes: row
            .try_get::<Option<String>, _>("auto_verification_notes")
            .map_err(|e| DatabaseError::decode("auto_verification_notes", e))?,
        auto_verified_at,
    })
}

fn row_to_approval(row: &SqliteRow) -> Result<Approval, DatabaseError> {
    let role = get_text(row, "approver_role")?
        .parse::<ApproverRole>()
        .map_err(|e| DatabaseError::decode("approver_role", e))?;

    Ok(Approval::from_stored(
        ApprovalId::from_uuid(parse_uuid("approval_id", &get_text(row, "approval_id")?)?),
        ClaimId::from_uuid(parse_uuid("claim_id", &get_text(row, "claim_id")?)?),
        UserId::from_uuid(parse_uuid("approver_id", &get_text(row, "approver_id")?)?),
        role,
        row.try_get::<bool, _>("is_approved")
            .map_err(|e| DatabaseError::decode("is_approved", e))?,
        get_text(row, "comments")?,
        parse_timestamp("decided_at", &get_text(row, "decided_at")?)?,
    ))
}

#[async_trait]
impl ClaimStore for SqliteClaimStore {
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        let query = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = ?");
        let row = sqlx::query(&query)
            .bind(id.as_uuid().to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(sql_err)?
            .ok_or_else(|| PortError::not_found("Claim", id))?;

        Ok(row_to_claim(&row)?)
    }

    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
        sqlx::query(
            "INSERT INTO claims (claim_id, lecturer_id, claim_month, hours_worked, hourly_rate, \
             total_amount, description, status, submitted_at, is_auto_flagged, \
             auto_verification_notes, auto_verified_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(claim.id.as_uuid().to_string())
        .bind(claim.lecturer_id.as_uuid().to_string())
        .bind(claim.claim_month.format("%Y-%m-%d").to_string())
        .bind(claim.hours_worked.to_string())
        .bind(claim.hourly_rate.to_string())
        .bind(claim.total_amount.to_string())
        .bind(&claim.description)
        .bind(claim.status.as_str())
        .bind(claim.submitted_at.to_rfc3339())
        .bind(claim.is_auto_flagged)
        .bind(&claim.auto_verification_notes)
        .bind(claim.auto_verified_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(sql_err)?;

        debug!(claim_id = %claim.id, "claim inserted");
        Ok(())
    }

    async fn record_decision(&self, claim: &Claim, approval: &Approval) -> Result<(), PortError> {
        // One transaction: the status update and the approval row land
        // together or not at all.
        let mut tx = self.pool.begin().await.map_err(sql_err)?;

        let updated = sqlx::query(
            "UPDATE claims SET status = ?, total_amount = ?, is_auto_flagged = ?, \
             auto_verification_notes = ?, auto_verified_at = ? \
             WHERE claim_id = ?",
        )
        .bind(claim.status.as_str())
        .bind(claim.total_amount.to_string())
        .bind(claim.is_auto_flagged)
        .bind(&claim.auto_verification_notes)
        .bind(claim.auto_verified_at.map(|dt| dt.to_rfc3339()))
        .bind(claim.id.as_uuid().to_string())
        .execute(&mut *tx)
        .await
        .map_err(sql_err)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(sql_err)?;
            return Err(PortError::not_found("Claim", claim.id));
        }

        sqlx::query(
            "INSERT INTO approvals (approval_id, claim_id, approver_id, approver_role, \
             is_approved, comments, decided_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(approval.id().as_uuid().to_string())
        .bind(approval.claim_id().as_uuid().to_string())
        .bind(approval.approver_id().as_uuid().to_string())
        .bind(approval.role().as_str())
        .bind(approval.approved())
        .bind(approval.comments())
        .bind(approval.decided_at().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(sql_err)?;

        tx.commit().await.map_err(sql_err)?;

        debug!(claim_id = %claim.id, approval_id = %approval.id(), "decision recorded");
        Ok(())
    }

    async fn claims_for_lecturer(&self, lecturer_id: UserId) -> Result<Vec<Claim>, PortError> {
        let query = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE lecturer_id = ? ORDER BY submitted_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(lecturer_id.as_uuid().to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(sql_err)?;

        Ok(rows
            .iter()
            .map(row_to_claim)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn claims_pending_review(&self) -> Result<Vec<Claim>, PortError> {
        let query = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE status = ? ORDER BY submitted_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(ClaimStatus::Submitted.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(sql_err)?;

        Ok(rows
            .iter()
            .map(row_to_claim)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn approvals_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Approval>, PortError> {
        let rows = sqlx::query(
            "SELECT approval_id, claim_id, approver_id, approver_role, is_approved, comments, \
             decided_at FROM approvals WHERE claim_id = ? ORDER BY decided_at DESC",
        )
        .bind(claim_id.as_uuid().to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(sql_err)?;

        Ok(rows
            .iter()
            .map(row_to_approval)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn document_count(&self, claim_id: ClaimId) -> Result<u64, PortError> {
        let count = sqlx::query("SELECT COUNT(*) AS count FROM documents WHERE claim_id = ?")
            .bind(claim_id.as_uuid().to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(sql_err)?
            .try_get::<i64, _>("count")
            .map_err(|e| DatabaseError::decode("count", e))?;

        Ok(count.max(0) as u64)
    }
}
