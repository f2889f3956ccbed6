use thiserror::Error;

/// Errors surfaced by the storage, configuration, and serialization layers.
///
/// Domain outcomes that the dashboard reports as plain booleans (duplicate
/// usernames, failed logins, unknown users) are not errors; the operations
/// involved return `Ok(false)` or `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable seed configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },

    /// Underlying SeaORM / SQLite failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A value could not be encoded as JSON for storage.
    ///
    /// Decoding failures never surface here: corrupt stored values are
    /// logged and replaced by defaults at the read site.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure while reading configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
