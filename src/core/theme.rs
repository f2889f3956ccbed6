//! UI theme preference.
//!
//! Stored under the `theme` key as a JSON string, like every other
//! persisted value. Anything that does not decode to a known theme reads
//! as the light theme.

use crate::{
    errors::Result,
    storage::{StorageKey, Store},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two themes the dashboard ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Default appearance
    #[default]
    Light,
    /// Dark appearance
    Dark,
}

impl Theme {
    /// Stable name, matching the stored JSON string.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme, for toggle buttons.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Loads the stored theme, defaulting to light when nothing valid is
/// stored.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn load_theme(store: &Store) -> Result<Theme> {
    store.load_or_default(&StorageKey::theme()).await
}

/// Persists the theme choice.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn save_theme(store: &Store, theme: Theme) -> Result<()> {
    store.save_json(&StorageKey::theme(), &theme).await
}
