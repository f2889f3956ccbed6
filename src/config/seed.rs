//! Seed data loading from config.toml
//!
//! The concert catalog, default crew payroll, digital income defaults, and
//! recurring monthly expenses ship as data, not code. The file is parsed
//! once at boot; the result seeds missing storage records and supplies the
//! defaults that month views and settlement breakdowns start from.

use crate::core::digital::Month;
use crate::core::finance::CategoryAmounts;
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Default rates and opening totals for digital income records
    pub digital_income: DigitalIncomeDefaults,
    /// Default crew payroll rows, shared by concerts without their own list
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    /// The concert catalog
    #[serde(default)]
    pub concerts: Vec<ConcertConfig>,
    /// Recurring operating expenses per month
    #[serde(default)]
    pub monthly_expenses: Vec<MonthlyExpenseConfig>,
}

impl SeedConfig {
    /// Checks the invariants the parser cannot express: concert ids must be
    /// non-empty and unique, every amount must be finite.
    fn validate(&self) -> Result<()> {
        let mut seen_ids = BTreeSet::new();
        for concert in &self.concerts {
            if concert.id.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("concert {:?} has an empty id", concert.name),
                });
            }
            if !seen_ids.insert(concert.id.as_str()) {
                return Err(Error::Config {
                    message: format!("duplicate concert id {:?}", concert.id),
                });
            }
            if !concert.hoze_income.is_finite() {
                return Err(Error::Config {
                    message: format!("concert {:?} has a non-finite income", concert.id),
                });
            }
            for (category, amount) in &concert.amounts {
                if !amount.is_finite() {
                    return Err(Error::Config {
                        message: format!(
                            "concert {:?} has a non-finite amount for {category}",
                            concert.id
                        ),
                    });
                }
            }
        }

        for member in &self.crew {
            if !member.amount.is_finite() {
                return Err(Error::Config {
                    message: format!("crew member {:?} has a non-finite amount", member.name),
                });
            }
        }

        for expense in &self.monthly_expenses {
            if !expense.amount.is_finite() {
                return Err(Error::Config {
                    message: format!(
                        "expense {:?} in {} has a non-finite amount",
                        expense.description,
                        expense.month.name()
                    ),
                });
            }
        }

        let rates = [
            self.digital_income.tax_rate,
            self.digital_income.hoze_share_rate,
            self.digital_income.usd_to_try_rate,
        ];
        if rates.iter().any(|rate| !rate.is_finite()) {
            return Err(Error::Config {
                message: "digital income rates must be finite".to_owned(),
            });
        }
        for balance in &self.digital_income.opening {
            if !balance.total_usd.is_finite() {
                return Err(Error::Config {
                    message: format!(
                        "opening digital income for {} is not finite",
                        balance.month.name()
                    ),
                });
            }
        }

        Ok(())
    }

    /// Concerts scheduled in `month`, in catalog order.
    #[must_use]
    pub fn concerts_in(&self, month: Month) -> Vec<&ConcertConfig> {
        self.concerts
            .iter()
            .filter(|concert| concert.month == month)
            .collect()
    }

    /// Expense seed rows for `month`, in catalog order.
    #[must_use]
    pub fn expenses_in(&self, month: Month) -> Vec<&MonthlyExpenseConfig> {
        self.monthly_expenses
            .iter()
            .filter(|expense| expense.month == month)
            .collect()
    }

    /// Looks up a concert by its stable id.
    #[must_use]
    pub fn concert_by_id(&self, id: &str) -> Option<&ConcertConfig> {
        self.concerts.iter().find(|concert| concert.id == id)
    }
}

/// Default rates plus month-specific opening totals for digital income.
#[derive(Debug, Clone, Deserialize)]
pub struct DigitalIncomeDefaults {
    /// Tax percentage withheld first
    pub tax_rate: f64,
    /// Management percentage applied to the after-tax figure
    pub hoze_share_rate: f64,
    /// USD to TRY conversion rate
    pub usd_to_try_rate: f64,
    /// Months that start with a known gross total
    #[serde(default)]
    pub opening: Vec<OpeningBalance>,
}

impl DigitalIncomeDefaults {
    /// The opening gross total for `month`, zero when none is configured.
    #[must_use]
    pub fn opening_total(&self, month: Month) -> f64 {
        self.opening
            .iter()
            .find(|balance| balance.month == month)
            .map_or(0.0, |balance| balance.total_usd)
    }
}

/// A month that starts with a known gross digital income total.
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningBalance {
    /// Which month the total belongs to
    pub month: Month,
    /// Gross total in USD
    pub total_usd: f64,
}

/// One default crew payroll row.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// Crew member name
    pub name: String,
    /// Payroll amount in TRY
    pub amount: f64,
}

/// Catalog entry for one concert.
#[derive(Debug, Clone, Deserialize)]
pub struct ConcertConfig {
    /// Stable identifier used in storage keys; must be unique
    pub id: String,
    /// Display name
    pub name: String,
    /// Month the concert belongs to
    pub month: Month,
    /// Concert date
    pub date: NaiveDate,
    /// Recorded HOZE income entry for the month view, in TRY
    pub hoze_income: f64,
    /// Default category amounts, keyed by label
    #[serde(default)]
    pub amounts: CategoryAmounts,
}

/// One recurring operating expense row.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyExpenseConfig {
    /// Month the expense belongs to
    pub month: Month,
    /// Expense category display name (e.g., "Personel Maaş")
    pub category: String,
    /// Booking date
    pub date: NaiveDate,
    /// Amount in TRY
    pub amount: f64,
    /// Line description
    pub description: String,
    /// Campaign link; advertising rows only
    #[serde(default)]
    pub link: Option<String>,
    /// Whether the row counts toward advertising cost; advertising rows only
    #[serde(default)]
    pub include_in_cost: Option<bool>,
    /// Percentage of the amount that counts; advertising rows only
    #[serde(default)]
    pub cost_percentage: Option<f64>,
}

/// Loads and validates seed configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid or uses unknown month/category labels
/// - Concert ids collide or amounts are non-finite
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses and validates seed configuration from TOML text.
///
/// # Errors
/// Same conditions as [`load_config`], minus the file read.
pub fn parse_config(contents: &str) -> Result<SeedConfig> {
    let config: SeedConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    config.validate()?;
    Ok(config)
}

/// Loads seed configuration from the default location (./config.toml).
///
/// # Errors
/// Same conditions as [`load_config`].
pub fn load_default_config() -> Result<SeedConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::core::finance::ConcertCategory;

    const FIXTURE: &str = r#"
        [digital_income]
        tax_rate = 20.0
        hoze_share_rate = 30.0
        usd_to_try_rate = 38.2

        [[digital_income.opening]]
        month = "Haziran"
        total_usd = 13871.0

        [[crew]]
        name = "Ses Teknisyeni"
        amount = 12000.0

        [[crew]]
        name = "Işıkçı"
        amount = 12000.0

        [[concerts]]
        id = "buyukcekmece"
        name = "Büyükçekmece Konseri"
        month = "Haziran"
        date = "2025-06-05"
        hoze_income = 43600.0

        [concerts.amounts]
        "Kaşe" = 350000.0
        "Ekip" = 122000.0
        "Ulaşım" = 20000.0

        [[concerts]]
        id = "kibris-avlu"
        name = "Kıbrıs Avlu"
        month = "Haziran"
        date = "2025-06-14"
        hoze_income = 15600.0

        [[monthly_expenses]]
        month = "Haziran"
        category = "Reklam"
        date = "2025-06-15"
        amount = 34200.0
        description = "Sosyal Medya Reklamları"
        link = "https://ads.example.com/kampanya"
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config = parse_config(FIXTURE).unwrap();

        assert_eq!(config.digital_income.tax_rate, 20.0);
        assert_eq!(config.digital_income.opening_total(Month::June), 13_871.0);
        assert_eq!(config.digital_income.opening_total(Month::July), 0.0);

        assert_eq!(config.crew.len(), 2);
        assert_eq!(config.crew[0].name, "Ses Teknisyeni");

        assert_eq!(config.concerts.len(), 2);
        let concert = config.concert_by_id("buyukcekmece").unwrap();
        assert_eq!(concert.name, "Büyükçekmece Konseri");
        assert_eq!(concert.amounts[&ConcertCategory::Fee], 350_000.0);
        assert_eq!(concert.amounts[&ConcertCategory::Crew], 122_000.0);
        assert!(config.concert_by_id("kibris-avlu").unwrap().amounts.is_empty());

        let expenses = config.expenses_in(Month::June);
        assert_eq!(expenses.len(), 1);
        assert_eq!(
            expenses[0].link.as_deref(),
            Some("https://ads.example.com/kampanya")
        );
        assert!(expenses[0].include_in_cost.is_none());
    }

    #[test]
    fn test_concerts_filter_by_month() {
        let config = parse_config(FIXTURE).unwrap();
        assert_eq!(config.concerts_in(Month::June).len(), 2);
        assert!(config.concerts_in(Month::July).is_empty());
    }

    #[test]
    fn test_duplicate_concert_id_is_rejected() {
        let doubled = format!(
            "{FIXTURE}\n\
             [[concerts]]\n\
             id = \"buyukcekmece\"\n\
             name = \"Mükerrer\"\n\
             month = \"Temmuz\"\n\
             date = \"2025-07-01\"\n\
             hoze_income = 0.0\n"
        );

        let error = parse_config(&doubled).unwrap_err();
        match error {
            Error::Config { message } => assert!(message.contains("duplicate concert id")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_concert_id_is_rejected() {
        let config = r#"
            [digital_income]
            tax_rate = 20.0
            hoze_share_rate = 30.0
            usd_to_try_rate = 38.2

            [[concerts]]
            id = "  "
            name = "Adsız"
            month = "Haziran"
            date = "2025-06-01"
            hoze_income = 0.0
        "#;

        let error = parse_config(config).unwrap_err();
        match error {
            Error::Config { message } => assert!(message.contains("empty id")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_income_is_rejected() {
        let config = r#"
            [digital_income]
            tax_rate = 20.0
            hoze_share_rate = 30.0
            usd_to_try_rate = 38.2

            [[concerts]]
            id = "bozuk"
            name = "Bozuk"
            month = "Haziran"
            date = "2025-06-01"
            hoze_income = inf
        "#;

        let error = parse_config(config).unwrap_err();
        match error {
            Error::Config { message } => assert!(message.contains("non-finite income")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_category_label_is_rejected() {
        let config = r#"
            [digital_income]
            tax_rate = 20.0
            hoze_share_rate = 30.0
            usd_to_try_rate = 38.2

            [[concerts]]
            id = "etiket"
            name = "Etiket"
            month = "Haziran"
            date = "2025-06-01"
            hoze_income = 0.0

            [concerts.amounts]
            "Bilinmeyen" = 5.0
        "#;

        let error = parse_config(config).unwrap_err();
        match error {
            Error::Config { message } => assert!(message.contains("Failed to parse")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_reports_config_error() {
        let error = load_config("definitely/not/here.toml").unwrap_err();
        match error {
            Error::Config { message } => assert!(message.contains("Failed to read")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }
}
