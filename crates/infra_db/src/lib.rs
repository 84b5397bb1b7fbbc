//! Database infrastructure layer
//!
//! SQLite adapter for the claims domain: connection pooling, embedded
//! migrations, and the [`SqliteClaimStore`] implementation of the domain's
//! storage port.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repositories;

pub use config::DatabaseConfig;
pub use error::DatabaseError;
pub use migrations::{run_pending, MIGRATOR};
pub use pool::{connect, connect_with_config, DbPool};
pub use repositories::SqliteClaimStore;
