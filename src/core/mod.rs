//! Core business logic for the ledger.
//!
//! Everything in here is framework-agnostic: functions take a
//! [`Store`](crate::storage::Store) handle plus plain values and return
//! plain values, so the same operations back whatever surface sits on top.

/// Activity logging with a capped, newest-first history
pub mod activity;
/// Login, sessions, roles, and page permissions
pub mod auth;
/// Concert records, override maps, and settlement breakdowns
pub mod concert;
/// Month views and their summary totals
pub mod dashboard;
/// Per-month digital income records
pub mod digital;
/// Settlement arithmetic - category resolution and share splits
pub mod finance;
/// Plain and structured notes on expense entries
pub mod notes;
/// UI theme preference
pub mod theme;
/// Stored user records and form validation
pub mod users;
