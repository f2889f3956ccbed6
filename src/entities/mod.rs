//! Entity module - Contains all SeaORM entity definitions for the database.
//! The ledger persists everything in one key-value table of JSON text,
//! mirroring the local-storage layout of the dashboard it serves.

pub mod storage_entry;

// Re-export specific types to avoid conflicts
pub use storage_entry::{
    Column as StorageEntryColumn, Entity as StorageEntry, Model as StorageEntryModel,
};
