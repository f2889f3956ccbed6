//! Storage key layout and display-name sanitization.
//!
//! The key set is closed: five fixed singleton keys plus four per-entity
//! families built from a prefix and an identifier. Month-keyed records use
//! the raw Turkish month name; category-keyed note records run the display
//! name through [`sanitize_storage_slug`] first.

use std::fmt;

const CONCERT_AMOUNTS_PREFIX: &str = "concertAmounts_";
const DIGITAL_INCOME_PREFIX: &str = "digitalIncomeData_";
const EXPENSE_NOTES_PREFIX: &str = "expenseNotes_";
const STRUCTURED_NOTES_PREFIX: &str = "structuredNotes_";

/// A well-known storage key.
///
/// Construct these through the associated functions; free-form keys are not
/// part of the layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Registered user records (`system_users`).
    #[must_use]
    pub fn system_users() -> Self {
        Self("system_users".to_owned())
    }

    /// The authenticated session's user record (`hoze_user`).
    #[must_use]
    pub fn session_user() -> Self {
        Self("hoze_user".to_owned())
    }

    /// Activity log entries, newest first (`activity_logs`).
    #[must_use]
    pub fn activity_logs() -> Self {
        Self("activity_logs".to_owned())
    }

    /// Reserved for the to-do list (`hoze_todos`); the ledger itself never
    /// reads or writes it.
    #[must_use]
    pub fn todos() -> Self {
        Self("hoze_todos".to_owned())
    }

    /// UI theme preference (`theme`).
    #[must_use]
    pub fn theme() -> Self {
        Self("theme".to_owned())
    }

    /// Manual category overrides for one concert, keyed by its stable id.
    #[must_use]
    pub fn concert_amounts(concert_id: &str) -> Self {
        Self(format!("{CONCERT_AMOUNTS_PREFIX}{concert_id}"))
    }

    /// Digital income record for one month, keyed by the raw month name
    /// (`digitalIncomeData_Haziran`). Month names are not sanitized.
    #[must_use]
    pub fn digital_income(month_name: &str) -> Self {
        Self(format!("{DIGITAL_INCOME_PREFIX}{month_name}"))
    }

    /// Free-text notes for one expense category.
    #[must_use]
    pub fn expense_notes(category: &str) -> Self {
        Self(format!(
            "{EXPENSE_NOTES_PREFIX}{}",
            sanitize_storage_slug(category)
        ))
    }

    /// Structured note rows for one expense category.
    #[must_use]
    pub fn structured_notes(category: &str) -> Self {
        Self(format!(
            "{STRUCTURED_NOTES_PREFIX}{}",
            sanitize_storage_slug(category)
        ))
    }

    /// The raw key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives a storage-safe slug from a display name.
///
/// Each whitespace run collapses to a single underscore, then every
/// character outside `[A-Za-z0-9_]` is dropped. Case is preserved.
/// Non-ASCII letters (the Turkish alphabet included) do not survive, so
/// `"Büyükçekmece Konseri"` becomes `"Bykekmece_Konseri"`.
#[must_use]
pub fn sanitize_storage_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if pending_separator {
            slug.push('_');
            pending_separator = false;
        }
        if ch == '_' || ch.is_ascii_alphanumeric() {
            slug.push(ch);
        }
    }
    if pending_separator {
        slug.push('_');
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_whitespace_runs_with_one_underscore() {
        assert_eq!(sanitize_storage_slug("Yaz Turnesi"), "Yaz_Turnesi");
        assert_eq!(sanitize_storage_slug("Yaz \t Turnesi"), "Yaz_Turnesi");
        assert_eq!(sanitize_storage_slug(" Yaz Turnesi "), "_Yaz_Turnesi_");
    }

    #[test]
    fn test_sanitize_strips_turkish_letters() {
        assert_eq!(
            sanitize_storage_slug("Büyükçekmece Konseri"),
            "Bykekmece_Konseri"
        );
        assert_eq!(sanitize_storage_slug("Personel Maaş"), "Personel_Maa");
        // Dotted capital İ is outside [A-Za-z] and gets dropped too.
        assert_eq!(sanitize_storage_slug("İzmir"), "zmir");
    }

    #[test]
    fn test_sanitize_preserves_case_and_underscores() {
        assert_eq!(sanitize_storage_slug("Kira_2025 Ek"), "Kira_2025_Ek");
        assert_eq!(sanitize_storage_slug("REKLAM"), "REKLAM");
    }

    #[test]
    fn test_singleton_keys_match_layout() {
        assert_eq!(StorageKey::system_users().as_str(), "system_users");
        assert_eq!(StorageKey::session_user().as_str(), "hoze_user");
        assert_eq!(StorageKey::activity_logs().as_str(), "activity_logs");
        assert_eq!(StorageKey::todos().as_str(), "hoze_todos");
        assert_eq!(StorageKey::theme().as_str(), "theme");
    }

    #[test]
    fn test_family_keys_compose_prefix_and_identifier() {
        assert_eq!(
            StorageKey::concert_amounts("buyukcekmece").as_str(),
            "concertAmounts_buyukcekmece"
        );
        // Month names stay raw, Turkish characters included.
        assert_eq!(
            StorageKey::digital_income("Ağustos").as_str(),
            "digitalIncomeData_Ağustos"
        );
        assert_eq!(
            StorageKey::expense_notes("Personel Maaş").as_str(),
            "expenseNotes_Personel_Maa"
        );
        assert_eq!(
            StorageKey::structured_notes("Kira").as_str(),
            "structuredNotes_Kira"
        );
    }
}
