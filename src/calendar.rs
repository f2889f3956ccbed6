//! Upcoming-events listing behind a calendar provider seam.
//!
//! The dashboard's calendar page shows the next handful of events from an
//! external account. Which backend supplies them is hidden behind
//! [`CalendarProvider`] so the listing logic and its error texts can be
//! exercised without network access or a signed-in account.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Most events a listing shows.
pub const UPCOMING_EVENT_LIMIT: usize = 10;

/// One calendar event as the listing shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Provider-assigned event id
    pub id: String,
    /// Event title
    pub summary: String,
    /// When the event starts
    pub start: DateTime<Utc>,
    /// When the event ends; absent on all-day entries
    pub end: Option<DateTime<Utc>>,
    /// Venue text, when the event has one
    pub location: Option<String>,
    /// Free-form event notes
    pub description: Option<String>,
}

/// Why a calendar listing could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// No provider has been connected yet
    #[error("calendar provider is not configured")]
    NotConfigured,
    /// The provider rejected the sign-in
    #[error("calendar sign-in failed")]
    SignInFailed,
    /// The provider could not be reached
    #[error("calendar backend is unavailable")]
    Unavailable,
}

impl CalendarError {
    /// The message shown on the calendar page, with a next step the
    /// reader can act on.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::NotConfigured => {
                "Takvim bağlantısı yapılandırılmamış. Ayarlar sayfasından bir takvim hesabı bağlayın."
            }
            Self::SignInFailed => "Google ile giriş yapılamadı. Lütfen tekrar deneyin.",
            Self::Unavailable => "Takvim yüklenemedi. İnternet bağlantınızı kontrol edip sayfayı yenileyin.",
        }
    }
}

/// A source of calendar events.
pub trait CalendarProvider {
    /// Lists events starting at or after `from`. Order and count are up
    /// to the provider; [`fetch_upcoming`] normalizes both.
    fn upcoming_events(
        &self,
        from: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<CalendarEvent>, CalendarError>> + Send;
}

/// Fetches the events the calendar page shows: everything the provider
/// returns from `from` onward, in start order, capped at
/// [`UPCOMING_EVENT_LIMIT`].
///
/// # Errors
/// Returns the provider's error unchanged; [`CalendarError::user_message`]
/// turns it into the page text.
pub async fn fetch_upcoming<P: CalendarProvider>(
    provider: &P,
    from: DateTime<Utc>,
) -> Result<Vec<CalendarEvent>, CalendarError> {
    let mut events = provider.upcoming_events(from).await?;
    events.retain(|event| event.start >= from);
    events.sort_by_key(|event| event.start);
    events.truncate(UPCOMING_EVENT_LIMIT);
    Ok(events)
}
