//! Persistent storage - the local key-value area backing every record.

pub mod keys;
pub mod store;

pub use keys::{StorageKey, sanitize_storage_slug};
pub use store::Store;
