//! Database configuration module for the ledger's storage area.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! The whole persistence model is one key-value table of JSON text, so table
//! creation generates its SQL from the entity definition via
//! `Schema::create_table_from_entity` and is safe to run on every boot.

use crate::entities::StorageEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default on-disk location of the storage area.
///
/// `mode=rwc` lets `SQLite` create the file on first boot.
const DEFAULT_STORAGE_URL: &str = "sqlite://data/hoze_ledger.sqlite?mode=rwc";

/// Gets the storage URL from the `STORAGE_URL` environment variable or
/// returns the default local `SQLite` path.
#[must_use]
pub fn get_storage_url() -> String {
    std::env::var("STORAGE_URL").unwrap_or_else(|_| DEFAULT_STORAGE_URL.to_string())
}

/// Establishes a connection to the `SQLite` storage area.
///
/// Falls back to a default local `SQLite` file if `STORAGE_URL` is not set.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let storage_url = get_storage_url();
    Database::connect(&storage_url).await.map_err(Into::into)
}

/// Creates the storage table if it does not exist yet.
///
/// Restarting against an existing file is the normal case, hence
/// `if_not_exists`.
///
/// # Errors
/// Returns an error if the schema statement fails to execute.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut storage_table = schema.create_table_from_entity(StorageEntry);
    storage_table.if_not_exists();

    db.execute(builder.build(&storage_table)).await?;

    Ok(())
}
