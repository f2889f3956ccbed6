//! The month view - income and expense listings with their summary totals.
//!
//! A month shows two income groups (concert income from the catalog, plus
//! one derived digital income row) and whatever expense groups the config
//! declares for it. Totals always sum the raw row amounts; the advertising
//! cost weighting only affects the campaign cost view, never the month
//! totals.
//!
//! Views are rebuilt from scratch on demand. Anything that edits stored
//! values announces itself through the store's change feed, so a listener
//! that sees a key change simply builds the month again.

use crate::{
    config::seed::SeedConfig,
    core::concert::ConcertId,
    core::digital::{self, Month},
    core::finance,
    errors::Result,
    storage::Store,
};
use chrono::NaiveDate;

/// Group name of the concert income rows.
pub const CONCERT_INCOME_CATEGORY: &str = "Konser Gelirleri";
/// Group name of the derived digital income row.
pub const DIGITAL_INCOME_CATEGORY: &str = "Dijital Gelir";
/// Row label of the derived digital income entry.
pub const DIGITAL_INCOME_DESCRIPTION: &str = "Aylık Dijital Gelir Payı";

/// One income row.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeEntry {
    /// Booking date
    pub date: NaiveDate,
    /// Amount in TRY; cancellations and write-offs go negative
    pub amount: f64,
    /// Row label, usually the concert name
    pub description: String,
    /// The concert behind the row, when there is one
    pub concert_id: Option<ConcertId>,
}

/// What kind of cost an expense row is.
///
/// Advertising rows carry their campaign fields directly, so nothing ever
/// has to guess from the category name.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseKind {
    /// Plain operating cost
    Standard,
    /// Advertising spend with its campaign metadata
    Advertising {
        /// Campaign link, when one was recorded
        link: Option<String>,
        /// Whether the row counts toward campaign cost at all
        include_in_cost: bool,
        /// Percentage of the amount that counts toward campaign cost
        cost_percentage: f64,
    },
}

/// One expense row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseEntry {
    /// Payment date
    pub date: NaiveDate,
    /// Amount in TRY
    pub amount: f64,
    /// Row label
    pub description: String,
    /// What kind of cost this is
    pub kind: ExpenseKind,
}

impl ExpenseEntry {
    /// Builds a plain operating cost row.
    #[must_use]
    pub fn standard(date: NaiveDate, amount: f64, description: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
            kind: ExpenseKind::Standard,
        }
    }

    /// Builds an advertising row. Omitted campaign fields default to
    /// counting the full amount.
    #[must_use]
    pub fn advertising(
        date: NaiveDate,
        amount: f64,
        description: impl Into<String>,
        link: Option<String>,
        include_in_cost: Option<bool>,
        cost_percentage: Option<f64>,
    ) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
            kind: ExpenseKind::Advertising {
                link,
                include_in_cost: include_in_cost.unwrap_or(true),
                cost_percentage: cost_percentage.unwrap_or(100.0),
            },
        }
    }

    /// The portion of the amount that counts toward campaign cost: zero
    /// for excluded rows, the configured percentage for advertising rows,
    /// the full amount for everything else.
    #[must_use]
    pub fn cost_weighted_amount(&self) -> f64 {
        match &self.kind {
            ExpenseKind::Standard => self.amount,
            ExpenseKind::Advertising {
                include_in_cost: false,
                ..
            } => 0.0,
            ExpenseKind::Advertising {
                cost_percentage, ..
            } => self.amount * cost_percentage / 100.0,
        }
    }
}

/// A named income group and its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeCategory {
    /// Group name shown as the card title
    pub name: String,
    /// Rows in catalog order
    pub entries: Vec<IncomeEntry>,
}

/// A named expense group and its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseCategory {
    /// Group name shown as the card title
    pub name: String,
    /// Rows in config order
    pub entries: Vec<ExpenseEntry>,
}

impl ExpenseCategory {
    /// Whether any row in the group is advertising spend.
    #[must_use]
    pub fn is_advertising(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry.kind, ExpenseKind::Advertising { .. }))
    }
}

/// Everything one month shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthData {
    /// Which month this is
    pub month: Month,
    /// Income groups in display order
    pub incomes: Vec<IncomeCategory>,
    /// Expense groups in display order
    pub expenses: Vec<ExpenseCategory>,
}

/// Builds the month view from the catalog and the stored digital record.
///
/// The digital group always exists; its single row carries the month's TRY
/// share rounded to whole lira and is left out entirely when that rounds
/// to zero. Building an unseen month seeds its digital record, so this is
/// the "first view" that later reads rely on.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn build_month_data(
    store: &Store,
    config: &SeedConfig,
    month: Month,
) -> Result<MonthData> {
    let concert_entries: Vec<IncomeEntry> = config
        .concerts_in(month)
        .into_iter()
        .map(|concert| IncomeEntry {
            date: concert.date,
            amount: concert.hoze_income,
            description: concert.name.clone(),
            concert_id: Some(ConcertId::new(concert.id.clone())),
        })
        .collect();

    let record = digital::load_or_seed(store, month, &config.digital_income).await?;
    let split = finance::compute_digital_income_split(&record);
    let rounded_share = split.hoze_share_local.round();
    let digital_entries = if rounded_share.abs() > 0.0 {
        vec![IncomeEntry {
            date: month.last_day(),
            amount: rounded_share,
            description: DIGITAL_INCOME_DESCRIPTION.to_owned(),
            concert_id: None,
        }]
    } else {
        Vec::new()
    };

    let incomes = vec![
        IncomeCategory {
            name: CONCERT_INCOME_CATEGORY.to_owned(),
            entries: concert_entries,
        },
        IncomeCategory {
            name: DIGITAL_INCOME_CATEGORY.to_owned(),
            entries: digital_entries,
        },
    ];

    let mut expenses: Vec<ExpenseCategory> = Vec::new();
    for row in config.expenses_in(month) {
        let has_campaign_fields =
            row.link.is_some() || row.include_in_cost.is_some() || row.cost_percentage.is_some();
        let entry = if has_campaign_fields {
            ExpenseEntry::advertising(
                row.date,
                row.amount,
                row.description.clone(),
                row.link.clone(),
                row.include_in_cost,
                row.cost_percentage,
            )
        } else {
            ExpenseEntry::standard(row.date, row.amount, row.description.clone())
        };

        match expenses
            .iter_mut()
            .find(|category| category.name == row.category)
        {
            Some(category) => category.entries.push(entry),
            None => expenses.push(ExpenseCategory {
                name: row.category.clone(),
                entries: vec![entry],
            }),
        }
    }

    Ok(MonthData {
        month,
        incomes,
        expenses,
    })
}

/// Total, share, and row count of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Group name
    pub name: String,
    /// Sum of the group's raw amounts in TRY
    pub total: f64,
    /// Share of the side's total in percent; zero when the side has no
    /// positive total
    pub percentage: f64,
    /// Number of rows in the group
    pub entry_count: usize,
}

/// A month's totals with per-group breakdowns.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// Which month this summarizes
    pub month: Month,
    /// Sum of every income row
    pub total_income: f64,
    /// Sum of every expense row
    pub total_expense: f64,
    /// Income minus expenses
    pub net_profit: f64,
    /// Per-group income totals in display order
    pub income_totals: Vec<CategoryTotal>,
    /// Per-group expense totals in display order
    pub expense_totals: Vec<CategoryTotal>,
}

fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

fn income_total(category: &IncomeCategory) -> f64 {
    category.entries.iter().map(|entry| entry.amount).sum()
}

fn expense_total(category: &ExpenseCategory) -> f64 {
    category.entries.iter().map(|entry| entry.amount).sum()
}

/// Sums a month view into its headline numbers.
#[must_use]
pub fn summarize_month(data: &MonthData) -> MonthlySummary {
    let total_income: f64 = data.incomes.iter().map(income_total).sum();
    let total_expense: f64 = data.expenses.iter().map(expense_total).sum();

    let income_totals = data
        .incomes
        .iter()
        .map(|category| {
            let total = income_total(category);
            CategoryTotal {
                name: category.name.clone(),
                total,
                percentage: percentage_of(total, total_income),
                entry_count: category.entries.len(),
            }
        })
        .collect();
    let expense_totals = data
        .expenses
        .iter()
        .map(|category| {
            let total = expense_total(category);
            CategoryTotal {
                name: category.name.clone(),
                total,
                percentage: percentage_of(total, total_expense),
                entry_count: category.entries.len(),
            }
        })
        .collect();

    MonthlySummary {
        month: data.month,
        total_income,
        total_expense,
        net_profit: total_income - total_expense,
        income_totals,
        expense_totals,
    }
}

/// Builds and summarizes every month of the season in calendar order.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn season_overview(store: &Store, config: &SeedConfig) -> Result<Vec<MonthlySummary>> {
    let mut summaries = Vec::with_capacity(Month::ALL.len());
    for month in Month::ALL {
        let data = build_month_data(store, config, month).await?;
        summaries.push(summarize_month(&data));
    }
    Ok(summaries)
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a TRY amount the way the listings show it: rounded to whole
/// lira, dots between thousands, the sign ahead of the currency mark
/// (`₺350.000`, `-₺27.500`).
#[must_use]
pub fn format_try(amount: f64) -> String {
    let rounded = amount.round();
    let grouped = group_digits(&format!("{:.0}", rounded.abs()), '.');
    if rounded < 0.0 {
        format!("-₺{grouped}")
    } else {
        format!("₺{grouped}")
    }
}

/// [`format_try`] with an explicit `+` on non-negative amounts, used where
/// income and expense rows sit in the same list.
#[must_use]
pub fn format_try_signed(amount: f64) -> String {
    let formatted = format_try(amount);
    if amount >= 0.0 {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// Formats a USD amount with two decimals and commas between thousands
/// (`$3,329.04`).
#[must_use]
pub fn format_usd(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let grouped = group_digits(whole, ',');
    if amount < 0.0 {
        format!("-${grouped}.{cents}")
    } else {
        format!("${grouped}.{cents}")
    }
}
