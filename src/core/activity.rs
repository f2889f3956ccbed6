//! Activity logging - who did what, newest first, capped at a thousand.
//!
//! Every entry is attributed to a signed-in session; calls without one are
//! silently dropped so callers never have to guard their logging. The log
//! is a single stored JSON array and old entries fall off the end once the
//! cap is reached.

use crate::{
    core::auth::{Page, Session},
    errors::Result,
    storage::{StorageKey, Store},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Most entries the log keeps; the oldest beyond this are discarded.
pub const MAX_LOG_ENTRIES: usize = 1000;

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    /// Millisecond timestamp as text; entries in the same millisecond
    /// share an id
    pub id: String,
    /// Who did it
    pub username: String,
    /// What they did, e.g. `Giriş Yaptı`
    pub action: String,
    /// Page the action happened on, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Free-form extra context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Records an action for the given session.
///
/// Without a session this is a no-op: nothing to attribute the entry to.
/// The new entry goes to the front and anything past [`MAX_LOG_ENTRIES`]
/// is dropped.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn log_activity(
    store: &Store,
    session: Option<&Session>,
    action: &str,
    page: Option<Page>,
    details: Option<&str>,
) -> Result<()> {
    let Some(session) = session else {
        debug!(action, "skipping activity log entry with no session");
        return Ok(());
    };

    let now = Utc::now();
    let entry = ActivityLogEntry {
        id: now.timestamp_millis().to_string(),
        username: session.username().to_owned(),
        action: action.to_owned(),
        page,
        timestamp: now,
        details: details.map(str::to_owned),
    };

    let mut entries = get_activity_logs(store).await?;
    entries.insert(0, entry);
    entries.truncate(MAX_LOG_ENTRIES);
    store
        .save_json(&StorageKey::activity_logs(), &entries)
        .await
}

/// Loads the log, newest first. Absent and corrupt logs read as empty.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_activity_logs(store: &Store) -> Result<Vec<ActivityLogEntry>> {
    store.load_or_default(&StorageKey::activity_logs()).await
}

/// Criteria for narrowing a log listing. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Case-insensitive fragment of the username
    pub username_contains: Option<String>,
    /// Case-insensitive fragment of the action text
    pub action_contains: Option<String>,
    /// Keep entries at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Keep entries at or before this instant
    pub to: Option<DateTime<Utc>>,
}

impl LogFilter {
    fn matches(&self, entry: &ActivityLogEntry) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| {
            needle.as_ref().is_none_or(|fragment| {
                haystack
                    .to_lowercase()
                    .contains(&fragment.to_lowercase())
            })
        };

        contains(&entry.username, &self.username_contains)
            && contains(&entry.action, &self.action_contains)
            && self.from.is_none_or(|from| entry.timestamp >= from)
            && self.to.is_none_or(|to| entry.timestamp <= to)
    }
}

/// Keeps the entries matching the filter, preserving order.
#[must_use]
pub fn filter_logs<'a>(
    entries: &'a [ActivityLogEntry],
    filter: &LogFilter,
) -> Vec<&'a ActivityLogEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::core::auth::login;
    use crate::test_utils::setup_test_store;
    use chrono::TimeZone;

    fn entry_at(username: &str, action: &str, timestamp: DateTime<Utc>) -> ActivityLogEntry {
        ActivityLogEntry {
            id: timestamp.timestamp_millis().to_string(),
            username: username.to_owned(),
            action: action.to_owned(),
            page: None,
            timestamp,
            details: None,
        }
    }

    #[tokio::test]
    async fn test_logging_without_a_session_is_a_no_op() -> Result<()> {
        let store = setup_test_store().await?;
        log_activity(&store, None, "Giriş Yaptı", None, None).await?;

        assert!(get_activity_logs(&store).await?.is_empty());
        assert!(!store.contains(&StorageKey::activity_logs()).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_entries_are_prepended() -> Result<()> {
        let store = setup_test_store().await?;
        let session = login(&store, "admin", "hoze2025").await?.unwrap();

        log_activity(&store, Some(&session), "Giriş Yaptı", None, None).await?;
        log_activity(
            &store,
            Some(&session),
            "Kullanıcı Ekledi",
            Some(Page::Settings),
            Some("deniz"),
        )
        .await?;

        let logs = get_activity_logs(&store).await?;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, "Kullanıcı Ekledi");
        assert_eq!(logs[0].page, Some(Page::Settings));
        assert_eq!(logs[0].details.as_deref(), Some("deniz"));
        assert_eq!(logs[1].action, "Giriş Yaptı");
        Ok(())
    }

    #[tokio::test]
    async fn test_log_drops_oldest_past_the_cap() -> Result<()> {
        let store = setup_test_store().await?;
        let session = login(&store, "admin", "hoze2025").await?.unwrap();

        // Newest first, like the real log: entry 0 is the most recent.
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let full: Vec<ActivityLogEntry> = (0..MAX_LOG_ENTRIES)
            .map(|index| {
                entry_at(
                    "Admin",
                    &format!("islem {index}"),
                    base - chrono::Duration::seconds(i64::try_from(index).unwrap()),
                )
            })
            .collect();
        store.save_json(&StorageKey::activity_logs(), &full).await?;

        log_activity(&store, Some(&session), "Çıkış Yaptı", None, None).await?;

        let logs = get_activity_logs(&store).await?;
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].action, "Çıkış Yaptı");
        // The oldest entry fell off the end.
        assert_eq!(logs[MAX_LOG_ENTRIES - 1].action, "islem 998");
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_log_reads_as_empty() -> Result<()> {
        let store = setup_test_store().await?;
        store
            .write_raw(&StorageKey::activity_logs(), "not json".to_owned())
            .await?;

        assert!(get_activity_logs(&store).await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_filters_combine_and_ignore_case() {
        let base = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let entries = vec![
            entry_at("Admin", "Giriş Yaptı", base),
            entry_at("deniz", "Giriş Yaptı", base + chrono::Duration::days(1)),
            entry_at("deniz", "Çıkış Yaptı", base + chrono::Duration::days(2)),
        ];

        let by_user = filter_logs(
            &entries,
            &LogFilter {
                username_contains: Some("DEN".to_owned()),
                ..LogFilter::default()
            },
        );
        assert_eq!(by_user.len(), 2);

        let by_action = filter_logs(
            &entries,
            &LogFilter {
                username_contains: Some("deniz".to_owned()),
                action_contains: Some("çıkış".to_owned()),
                ..LogFilter::default()
            },
        );
        assert_eq!(by_action.len(), 1);
        assert_eq!(by_action[0].action, "Çıkış Yaptı");

        // Range bounds are inclusive on both ends.
        let by_range = filter_logs(
            &entries,
            &LogFilter {
                from: Some(base + chrono::Duration::days(1)),
                to: Some(base + chrono::Duration::days(2)),
                ..LogFilter::default()
            },
        );
        assert_eq!(by_range.len(), 2);

        let all = filter_logs(&entries, &LogFilter::default());
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_entry_serializes_without_absent_fields() {
        let entry = entry_at(
            "Admin",
            "Giriş Yaptı",
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"page\""));
        assert!(!json.contains("\"details\""));
        assert!(json.contains("\"username\":\"Admin\""));
    }
}
