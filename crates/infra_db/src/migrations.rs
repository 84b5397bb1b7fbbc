//! Schema migrations

use sqlx::migrate::{MigrateError, Migrator};

use crate::pool::DbPool;

/// Embedded migrations from the workspace `migrations/` directory
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies any pending migrations
pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::pool::connect;

    #[tokio::test]
    async fn migrations_create_baseline_tables() {
        let pool = connect("sqlite::memory:").await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for table in ["claims", "approvals", "documents"] {
            let count = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .expect("check table")
            .get::<i64, _>("count");
            assert_eq!(count, 1, "missing table {table}");
        }
    }
}
