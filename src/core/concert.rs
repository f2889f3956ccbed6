//! Concert settlement records - stable identities, manual overrides, and the
//! derived breakdown.
//!
//! Every concert owns an override map stored under `concertAmounts_<id>`.
//! The map is created on the first view of the concert's breakdown, seeded
//! from its default amounts for every category except crew (crew money is
//! represented by payroll line items until someone overrides it). Concerts
//! removed from the catalog leave their override records behind; nothing
//! cleans them up.

use crate::{
    config::seed::{ConcertConfig, CrewMember},
    core::digital::Month,
    core::finance::{
        self, CategoryAmounts, ConcertCategory, ConcertShares, LineItem, LineItemMap,
    },
    errors::Result,
    storage::{StorageKey, Store, sanitize_storage_slug},
};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use tracing::{debug, warn};

/// Stable identifier of a concert, used in storage keys.
///
/// Catalog concerts declare their ids in config.toml; concerts added at
/// runtime get one generated from the display name and the creation instant.
/// Two concerts sharing a display name therefore never share an override
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConcertId(String);

impl ConcertId {
    /// Wraps a configured id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates an id for a concert created at `created_at`.
    #[must_use]
    pub fn generate(name: &str, created_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}",
            sanitize_storage_slug(name),
            created_at.timestamp_millis()
        ))
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One concert of the season.
#[derive(Debug, Clone, PartialEq)]
pub struct Concert {
    /// Stable identifier
    pub id: ConcertId,
    /// Display name
    pub name: String,
    /// Month the concert belongs to
    pub month: Month,
    /// Concert date
    pub date: NaiveDate,
    /// Recorded HOZE income entry for the month view, in TRY
    pub hoze_income: f64,
    /// Seeded default category amounts
    pub defaults: CategoryAmounts,
}

impl Concert {
    /// Builds the runtime model of a catalog concert.
    #[must_use]
    pub fn from_config(config: &ConcertConfig) -> Self {
        Self {
            id: ConcertId::new(config.id.clone()),
            name: config.name.clone(),
            month: config.month,
            date: config.date,
            hoze_income: config.hoze_income,
            defaults: config.amounts.clone(),
        }
    }

    /// Creates a concert outside the catalog with a generated id and no
    /// default amounts.
    #[must_use]
    pub fn create(
        name: impl Into<String>,
        month: Month,
        date: NaiveDate,
        hoze_income: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        Self {
            id: ConcertId::generate(&name, created_at),
            name,
            month,
            date,
            hoze_income,
            defaults: CategoryAmounts::new(),
        }
    }

    /// Storage key of this concert's override map.
    #[must_use]
    pub fn overrides_key(&self) -> StorageKey {
        StorageKey::concert_amounts(self.id.as_str())
    }
}

/// Builds the line-item map a concert starts with: the shared default crew
/// payroll under the crew category.
#[must_use]
pub fn default_line_items(crew: &[CrewMember]) -> LineItemMap {
    let mut items = LineItemMap::new();
    if !crew.is_empty() {
        items.insert(
            ConcertCategory::Crew,
            crew.iter()
                .map(|member| LineItem::new(member.name.clone(), member.amount))
                .collect(),
        );
    }
    items
}

/// Loads a concert's override map, seeding it on the first view.
///
/// The seed writes an explicit amount for every category except crew, using
/// the concert's defaults and falling back to zero. A corrupt stored map
/// logs a warning and comes back empty; the stored bytes stay untouched
/// until the next save replaces them.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn load_or_seed_overrides(store: &Store, concert: &Concert) -> Result<CategoryAmounts> {
    let key = concert.overrides_key();
    match store.read_raw(&key).await? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(overrides) => Ok(overrides),
            Err(error) => {
                warn!(
                    concert = concert.id.as_str(),
                    %error,
                    "corrupt override map, starting empty"
                );
                Ok(CategoryAmounts::new())
            }
        },
        None => {
            let seeded: CategoryAmounts = ConcertCategory::ALL
                .iter()
                .filter(|&&category| category != ConcertCategory::Crew)
                .map(|&category| {
                    (
                        category,
                        concert.defaults.get(&category).copied().unwrap_or(0.0),
                    )
                })
                .collect();
            store.save_json(&key, &seeded).await?;
            debug!(concert = concert.id.as_str(), "seeded override map");
            Ok(seeded)
        }
    }
}

/// Loads a concert's override map without seeding. Absent and corrupt maps
/// both read as empty.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn load_overrides(store: &Store, concert_id: &ConcertId) -> Result<CategoryAmounts> {
    store
        .load_or_default(&StorageKey::concert_amounts(concert_id.as_str()))
        .await
}

/// Writes one manual override, keeping the rest of the map intact. The
/// stored amount wins over line items and defaults until cleared or
/// replaced.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn persist_override(
    store: &Store,
    concert_id: &ConcertId,
    category: ConcertCategory,
    amount: f64,
) -> Result<()> {
    let key = StorageKey::concert_amounts(concert_id.as_str());
    let mut overrides: CategoryAmounts = store.load_or_default(&key).await?;
    overrides.insert(category, amount);
    store.save_json(&key, &overrides).await
}

/// Removes one manual override so line items or defaults apply again.
/// Clearing a category that has no override is a no-op.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn clear_override(
    store: &Store,
    concert_id: &ConcertId,
    category: ConcertCategory,
) -> Result<()> {
    let key = StorageKey::concert_amounts(concert_id.as_str());
    let mut overrides: CategoryAmounts = store.load_or_default(&key).await?;
    if overrides.remove(&category).is_some() {
        store.save_json(&key, &overrides).await?;
    }
    Ok(())
}

/// A concert's full settlement view: the resolved amount of every category
/// plus the derived shares.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcertBreakdown {
    /// Effective amount per category after override resolution
    pub totals: CategoryAmounts,
    /// Expense total, net profit, and the settlement split
    pub shares: ConcertShares,
}

/// Resolves a concert's categories against its stored overrides and line
/// items, then derives the settlement shares.
///
/// Opening the breakdown counts as the concert's first view, so an unseen
/// concert gets its override map seeded here.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn breakdown(
    store: &Store,
    concert: &Concert,
    line_items: &LineItemMap,
) -> Result<ConcertBreakdown> {
    let overrides = load_or_seed_overrides(store, concert).await?;
    let totals = finance::resolve_all_categories(&overrides, line_items, &concert.defaults);
    let shares = finance::compute_concert_shares(&totals);
    Ok(ConcertBreakdown { totals, shares })
}
