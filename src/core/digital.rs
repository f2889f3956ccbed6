//! Digital income records - one stored record per month of the season.
//!
//! Each month's record keeps the gross USD figure and the three percentages
//! and rates the split derives from. Storage keys use the raw Turkish month
//! name (`digitalIncomeData_Haziran`); a record is created on first view,
//! seeded from the configured defaults, and replaced wholesale on save.

use crate::{
    config::seed::DigitalIncomeDefaults,
    core::finance::DigitalIncomeRecord,
    errors::Result,
    storage::{StorageKey, Store},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// The year every record of the managed season belongs to.
pub const SEASON_YEAR: i32 = 2025;

/// Months of the managed season, June through December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    /// Haziran
    #[serde(rename = "Haziran")]
    June,
    /// Temmuz
    #[serde(rename = "Temmuz")]
    July,
    /// Ağustos
    #[serde(rename = "Ağustos")]
    August,
    /// Eylül
    #[serde(rename = "Eylül")]
    September,
    /// Ekim
    #[serde(rename = "Ekim")]
    October,
    /// Kasım
    #[serde(rename = "Kasım")]
    November,
    /// Aralık
    #[serde(rename = "Aralık")]
    December,
}

impl Month {
    /// Every month of the season, in calendar order.
    pub const ALL: [Self; 7] = [
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Turkish display name, also the storage-key spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::June => "Haziran",
            Self::July => "Temmuz",
            Self::August => "Ağustos",
            Self::September => "Eylül",
            Self::October => "Ekim",
            Self::November => "Kasım",
            Self::December => "Aralık",
        }
    }

    /// Calendar month number (June is 6).
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::June => 6,
            Self::July => 7,
            Self::August => 8,
            Self::September => 9,
            Self::October => 10,
            Self::November => 11,
            Self::December => 12,
        }
    }

    /// Last day of this month in the season year, used to date month-end
    /// income entries.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        let day = match self {
            Self::June | Self::September | Self::November => 30,
            _ => 31,
        };
        NaiveDate::from_ymd_opt(SEASON_YEAR, self.number(), day).unwrap_or_default()
    }

    /// The storage key of this month's record.
    #[must_use]
    pub fn storage_key(self) -> StorageKey {
        StorageKey::digital_income(self.name())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the default record for `month` from the configured rates and
/// opening totals.
#[must_use]
pub fn default_record(month: Month, defaults: &DigitalIncomeDefaults) -> DigitalIncomeRecord {
    DigitalIncomeRecord {
        total_digital_income: defaults.opening_total(month),
        tax_rate: defaults.tax_rate,
        hoze_share_rate: defaults.hoze_share_rate,
        usd_to_try_rate: defaults.usd_to_try_rate,
    }
}

/// Loads the stored record for `month`, creating it from defaults when
/// viewed for the first time.
///
/// A corrupt stored record logs a warning and yields the defaults without
/// overwriting whatever is on disk; the next save replaces it.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn load_or_seed(
    store: &Store,
    month: Month,
    defaults: &DigitalIncomeDefaults,
) -> Result<DigitalIncomeRecord> {
    let key = month.storage_key();
    match store.read_raw(&key).await? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(record) => Ok(record),
            Err(error) => {
                warn!(month = month.name(), %error, "corrupt digital income record, using defaults");
                Ok(default_record(month, defaults))
            }
        },
        None => {
            let record = default_record(month, defaults);
            store.save_json(&key, &record).await?;
            debug!(month = month.name(), "seeded digital income record");
            Ok(record)
        }
    }
}

/// Persists `record` as the month's new stored state.
///
/// The underlying write notifies subscribed views, which is how dashboards
/// pick up edits made in the income editor.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn save(store: &Store, month: Month, record: &DigitalIncomeRecord) -> Result<()> {
    store.save_json(&month.storage_key(), record).await
}

/// Seeds a default record for every month that has none yet, returning how
/// many were created. Runs at boot so dashboards always find all seven
/// records in place.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn seed_missing_months(
    store: &Store,
    defaults: &DigitalIncomeDefaults,
) -> Result<usize> {
    let mut seeded = 0;
    for month in Month::ALL {
        if !store.contains(&month.storage_key()).await? {
            store
                .save_json(&month.storage_key(), &default_record(month, defaults))
                .await?;
            seeded += 1;
        }
    }
    Ok(seeded)
}
