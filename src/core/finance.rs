//! Financial derivation engine - pure computation of concert settlements and
//! digital income splits.
//!
//! Everything in this module is synchronous and total: categories missing
//! from an input map resolve to zero, out-of-range percentages flow through
//! the arithmetic exactly as entered, and no rounding happens before display.
//! Persistence of the inputs lives in [`crate::core::concert`] and
//! [`crate::core::digital`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Concert cost and income categories, identified by a fixed Turkish label
/// set. The labels double as the storage spelling of override maps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ConcertCategory {
    /// Crew payroll (`Ekip`)
    #[serde(rename = "Ekip")]
    Crew,
    /// Transport (`Ulaşım`)
    #[serde(rename = "Ulaşım")]
    Transport,
    /// Advertising (`Reklam`)
    #[serde(rename = "Reklam")]
    Advertising,
    /// Lodging (`Konaklama`)
    #[serde(rename = "Konaklama")]
    Lodging,
    /// Miscellaneous extras (`Ekstra`)
    #[serde(rename = "Ekstra")]
    Extra,
    /// Catering (`Yemek`)
    #[serde(rename = "Yemek")]
    Food,
    /// Performance fee (`Kaşe`) - the income side of the settlement
    #[serde(rename = "Kaşe")]
    Fee,
}

impl ConcertCategory {
    /// The six expense categories, in display order.
    pub const EXPENSES: [Self; 6] = [
        Self::Crew,
        Self::Transport,
        Self::Advertising,
        Self::Lodging,
        Self::Extra,
        Self::Food,
    ];

    /// Every category, expenses first, fee last.
    pub const ALL: [Self; 7] = [
        Self::Crew,
        Self::Transport,
        Self::Advertising,
        Self::Lodging,
        Self::Extra,
        Self::Food,
        Self::Fee,
    ];

    /// Turkish display label, identical to the stored spelling.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Crew => "Ekip",
            Self::Transport => "Ulaşım",
            Self::Advertising => "Reklam",
            Self::Lodging => "Konaklama",
            Self::Extra => "Ekstra",
            Self::Food => "Yemek",
            Self::Fee => "Kaşe",
        }
    }

    /// True for cost categories, false for the fee.
    #[must_use]
    pub const fn is_expense(self) -> bool {
        !matches!(self, Self::Fee)
    }
}

impl fmt::Display for ConcertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category amounts, used for seeded defaults, manual overrides, and
/// fully resolved totals alike.
pub type CategoryAmounts = BTreeMap<ConcertCategory, f64>;

/// A single row of a category breakdown (one crew member, one hotel bill).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Who or what the amount belongs to
    pub name: String,
    /// Amount in TRY
    pub amount: f64,
}

impl LineItem {
    /// Builds a line item from a name and amount.
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Per-category line item lists.
pub type LineItemMap = BTreeMap<ConcertCategory, Vec<LineItem>>;

/// Resolves the effective total for one category.
///
/// Precedence: a manual override always wins; otherwise a non-empty line-item
/// list sums; otherwise the seeded default applies; otherwise zero. An
/// override of `0.0` is a real override, not an absence.
#[must_use]
pub fn resolve_category_total(
    category: ConcertCategory,
    overrides: &CategoryAmounts,
    line_items: &LineItemMap,
    defaults: &CategoryAmounts,
) -> f64 {
    if let Some(amount) = overrides.get(&category) {
        return *amount;
    }
    if let Some(items) = line_items.get(&category) {
        if !items.is_empty() {
            return items.iter().map(|item| item.amount).sum();
        }
    }
    defaults.get(&category).copied().unwrap_or(0.0)
}

/// Resolves every category of [`ConcertCategory::ALL`] in one pass.
#[must_use]
pub fn resolve_all_categories(
    overrides: &CategoryAmounts,
    line_items: &LineItemMap,
    defaults: &CategoryAmounts,
) -> CategoryAmounts {
    ConcertCategory::ALL
        .iter()
        .map(|&category| {
            (
                category,
                resolve_category_total(category, overrides, line_items, defaults),
            )
        })
        .collect()
}

/// Derived settlement figures for one concert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcertShares {
    /// Sum of the six expense categories
    pub total_expenses: f64,
    /// Fee minus total expenses
    pub net_profit: f64,
    /// Artist share, four fifths of net profit
    pub emre_share: f64,
    /// Management share, one fifth of net profit
    pub hoze_share: f64,
}

/// Computes the expense total, net profit, and the fixed four-fifths /
/// one-fifth settlement split from resolved category totals.
///
/// Categories missing from `totals` count as zero. A loss-making concert
/// produces negative shares; nothing clamps or rounds here.
#[must_use]
pub fn compute_concert_shares(totals: &CategoryAmounts) -> ConcertShares {
    let amount_for = |category: ConcertCategory| totals.get(&category).copied().unwrap_or(0.0);

    let total_expenses: f64 = ConcertCategory::EXPENSES
        .iter()
        .map(|&category| amount_for(category))
        .sum();
    let net_profit = amount_for(ConcertCategory::Fee) - total_expenses;

    ConcertShares {
        total_expenses,
        net_profit,
        emre_share: net_profit / 5.0 * 4.0,
        hoze_share: net_profit / 5.0,
    }
}

/// Stored inputs of one month's digital income record.
///
/// The gross figure and the management share are USD amounts; the conversion
/// rate turns the final share into TRY.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalIncomeRecord {
    /// Gross platform income in USD
    pub total_digital_income: f64,
    /// Tax percentage withheld first
    pub tax_rate: f64,
    /// Management percentage applied to the after-tax figure
    pub hoze_share_rate: f64,
    /// USD to TRY conversion rate
    pub usd_to_try_rate: f64,
}

/// Derived figures of one month's digital income split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DigitalIncomeSplit {
    /// Withheld tax in USD
    pub tax_amount: f64,
    /// Income remaining after tax, in USD
    pub after_tax: f64,
    /// Management share in USD
    pub hoze_share_usd: f64,
    /// Management share converted to TRY
    pub hoze_share_local: f64,
}

/// Applies the tax, share, and conversion chain to one month's record.
///
/// Percentages are taken exactly as entered; a tax rate above one hundred
/// yields a negative after-tax figure rather than an error.
#[must_use]
pub fn compute_digital_income_split(record: &DigitalIncomeRecord) -> DigitalIncomeSplit {
    let tax_amount = record.total_digital_income * record.tax_rate / 100.0;
    let after_tax = record.total_digital_income - tax_amount;
    let hoze_share_usd = after_tax * record.hoze_share_rate / 100.0;
    let hoze_share_local = hoze_share_usd * record.usd_to_try_rate;

    DigitalIncomeSplit {
        tax_amount,
        after_tax,
        hoze_share_usd,
        hoze_share_local,
    }
}
