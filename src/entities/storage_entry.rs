//! Storage entry entity - the single key-value table backing the ledger.
//! Every persisted record of the system (users, session, activity logs,
//! concert overrides, digital income, notes, theme) is one row keyed by a
//! well-known string and holding a JSON-encoded text value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Storage entry database model - one JSON text value per well-known key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_entries")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Well-known storage key (e.g., `"system_users"`, `"activity_logs"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Value stored as JSON-encoded text
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTime,
}

/// Storage entries have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
