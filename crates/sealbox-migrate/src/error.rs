//! Migration error types.

use thiserror::Error;

/// Boxed error type for migrator transform failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error from migrator construction or chain execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MigrateError {
    /// A migrator must move the version forward.
    #[error("migrator must move forward, got v{from} -> v{to}")]
    InvalidMigrator { from: u32, to: u32 },

    /// No contiguous chain of registered migrators reaches the target.
    #[error(
        "no migration path for '{type_id}': chain breaks at v{at_version} before reaching v{target_version}"
    )]
    ChainBroken {
        type_id: String,
        at_version: u32,
        target_version: u32,
    },

    /// A migrator's own transform failed mid-chain.
    #[error("migration step v{from} -> v{to} failed")]
    StepFailed {
        from: u32,
        to: u32,
        #[source]
        source: BoxError,
    },
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
