//! Shared test utilities for the HOZE ledger.
//!
//! This module provides common helper functions for setting up test stores
//! and building seed fixtures with sensible defaults.

use crate::{
    config::seed::{
        ConcertConfig, CrewMember, DigitalIncomeDefaults, MonthlyExpenseConfig, OpeningBalance,
        SeedConfig,
    },
    core::auth::Page,
    core::digital::Month,
    core::finance::{CategoryAmounts, ConcertCategory},
    core::users::NewUser,
    errors::Result,
    storage::Store,
};
use chrono::NaiveDate;

/// Creates a store over an in-memory `SQLite` database with all tables
/// initialized. This is the standard setup for all integration tests.
pub async fn setup_test_store() -> Result<Store> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(Store::new(db))
}

fn fixture_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn crew_member(name: &str, amount: f64) -> CrewMember {
    CrewMember {
        name: name.to_owned(),
        amount,
    }
}

/// Builds the seed catalog the integration tests run against: two June
/// concerts, a three-person crew, June's opening digital income, and one
/// month of expenses including an advertising row.
///
/// The amounts line up with the reference settlement figures asserted
/// across the test suite (a 350 000 fee with 142 000 of expenses, and a
/// 13 871 USD opening balance at 20% tax / 30% share / 38.2 TRY per USD).
#[must_use]
pub fn fixture_seed_config() -> SeedConfig {
    SeedConfig {
        digital_income: DigitalIncomeDefaults {
            tax_rate: 20.0,
            hoze_share_rate: 30.0,
            usd_to_try_rate: 38.2,
            opening: vec![OpeningBalance {
                month: Month::June,
                total_usd: 13_871.0,
            }],
        },
        crew: vec![
            crew_member("Elibol", 12_000.0),
            crew_member("Safa", 15_000.0),
            crew_member("Mert", 9_000.0),
        ],
        concerts: vec![
            ConcertConfig {
                id: "buyukcekmece".to_owned(),
                name: "Büyükçekmece Konseri".to_owned(),
                month: Month::June,
                date: fixture_date(2025, 6, 5),
                hoze_income: 43_600.0,
                amounts: CategoryAmounts::from([
                    (ConcertCategory::Fee, 350_000.0),
                    (ConcertCategory::Crew, 122_000.0),
                    (ConcertCategory::Transport, 20_000.0),
                ]),
            },
            ConcertConfig {
                id: "kibris-avlu".to_owned(),
                name: "Kıbrıs Avlu Konseri".to_owned(),
                month: Month::June,
                date: fixture_date(2025, 6, 12),
                hoze_income: 15_600.0,
                amounts: CategoryAmounts::new(),
            },
        ],
        monthly_expenses: vec![
            MonthlyExpenseConfig {
                month: Month::June,
                category: "Personel Maaş".to_owned(),
                date: fixture_date(2025, 6, 1),
                amount: 45_000.0,
                description: "Aylık Maaş Ödemeleri".to_owned(),
                link: None,
                include_in_cost: None,
                cost_percentage: None,
            },
            MonthlyExpenseConfig {
                month: Month::June,
                category: "Kira".to_owned(),
                date: fixture_date(2025, 6, 1),
                amount: 25_000.0,
                description: "Ofis Kirası".to_owned(),
                link: None,
                include_in_cost: None,
                cost_percentage: None,
            },
            MonthlyExpenseConfig {
                month: Month::June,
                category: "Reklam".to_owned(),
                date: fixture_date(2025, 6, 15),
                amount: 34_200.0,
                description: "Sosyal Medya Reklamları".to_owned(),
                link: Some("https://ads.facebook.com".to_owned()),
                include_in_cost: None,
                cost_percentage: None,
            },
        ],
    }
}

/// Creates a test user input with sensible defaults.
///
/// # Defaults
/// * `is_admin`: false
/// * `has_full_access`: false
/// * `permissions`: the home page only
#[must_use]
pub fn new_standard_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        password: password.to_owned(),
        is_admin: false,
        has_full_access: false,
        permissions: [Page::Home].into_iter().collect(),
    }
}
