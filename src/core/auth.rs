//! Login, sessions, and page-level permissions.
//!
//! Authentication is deliberately local: credentials live in the storage
//! table next to everything else and there is no directory service behind
//! it. A fixed super-admin pair (`admin` / `hoze2025`) always works so the
//! owner cannot lock themselves out by deleting every record.
//!
//! Stored passwords go through a [`CredentialScheme`]. The default,
//! [`PlaintextCredentials`], stores them as typed - a known weakness kept
//! for compatibility with existing tables. Swapping in a hashing scheme is
//! a matter of implementing the trait and passing it to the `_with_scheme`
//! entry points; records written by one scheme verify only under that
//! scheme.

use crate::{
    core::{
        activity,
        users::{self, User, UserPatch},
    },
    errors::Result,
    storage::{StorageKey, Store},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// Username of the always-available super admin.
pub const SUPER_ADMIN_USERNAME: &str = "admin";
/// Password of the always-available super admin.
pub const SUPER_ADMIN_PASSWORD: &str = "hoze2025";

/// The pages a permission grant can name.
///
/// Serialized forms match the page ids in stored permission lists, so the
/// Finance variant keeps its Turkish id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Dashboard landing page
    Home,
    /// Income, expense, and settlement views
    #[serde(rename = "finans")]
    Finance,
    /// Concert calendar
    Calendar,
    /// User and permission management
    Settings,
}

impl Page {
    /// Every page, in sidebar order.
    pub const ALL: [Self; 4] = [Self::Home, Self::Finance, Self::Calendar, Self::Settings];

    /// Stable page id as stored in permission lists.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Finance => "finans",
            Self::Calendar => "calendar",
            Self::Settings => "settings",
        }
    }

    /// Menu label shown for the page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Ana Sayfa",
            Self::Finance => "Finans",
            Self::Calendar => "Takvim",
            Self::Settings => "Ayarlar",
        }
    }

    /// A grant covering every page.
    #[must_use]
    pub fn full_set() -> BTreeSet<Self> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// What a signed-in account is allowed to do.
///
/// Roles are derived, not stored: the record keeps its two flags and the
/// role is read off them at login. Admins edit and see everything; viewers
/// see whatever their grants name but change nothing; standard accounts
/// are limited to their grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The built-in `admin` account
    SuperAdmin,
    /// A stored record with the admin flag
    Admin,
    /// Read-only account, typically granted every page
    Viewer,
    /// Regular account limited to its page grants
    Standard,
}

impl Role {
    /// Derives the role of a stored record from its flags. The admin flag
    /// wins when both are set.
    #[must_use]
    pub const fn from_flags(is_admin: bool, has_full_access: bool) -> Self {
        if is_admin {
            Self::Admin
        } else if has_full_access {
            Self::Viewer
        } else {
            Self::Standard
        }
    }

    /// Whether this role may change data.
    #[must_use]
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Whether this role opens every page regardless of grants. Full
    /// access alone does not: viewers still go through their permission
    /// list.
    #[must_use]
    pub const fn bypasses_page_grants(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

/// How passwords are encoded at rest and checked at login.
pub trait CredentialScheme {
    /// Encodes a password as typed into its stored form.
    fn protect(&self, plain: &str) -> String;

    /// Checks a password as typed against a stored form.
    fn verify(&self, plain: &str, stored: &str) -> bool;
}

/// Stores passwords exactly as typed.
///
/// This matches the existing tables and keeps old records working, at the
/// obvious cost that anyone who can read the storage file can read every
/// password.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCredentials;

impl CredentialScheme for PlaintextCredentials {
    fn protect(&self, plain: &str) -> String {
        plain.to_owned()
    }

    fn verify(&self, plain: &str, stored: &str) -> bool {
        plain == stored
    }
}

/// A signed-in account: the record that logged in plus its derived role.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    record: User,
    role: Role,
}

impl Session {
    /// Username of the signed-in account.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.record.username
    }

    /// Derived role of the signed-in account.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The stored record behind this session.
    #[must_use]
    pub const fn record(&self) -> &User {
        &self.record
    }

    /// Whether this session may open the given page: admins always, every
    /// other role only with a matching grant.
    #[must_use]
    pub fn has_page_access(&self, page: Page) -> bool {
        self.role.bypasses_page_grants() || self.record.permissions.contains(&page)
    }

    /// Whether this session may change data.
    #[must_use]
    pub const fn can_edit(&self) -> bool {
        self.role.can_edit()
    }
}

/// Signs in with the default plaintext scheme. See [`login_with_scheme`].
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn login(store: &Store, username: &str, password: &str) -> Result<Option<Session>> {
    login_with_scheme(store, &PlaintextCredentials, username, password).await
}

/// Signs in, returning the session on success and `None` on bad
/// credentials.
///
/// The built-in pair is checked first, byte for byte, and never consults
/// the stored table; it signs in even when the table is empty or broken.
/// Stored accounts verify through the scheme and get their last-login
/// stamp updated. Either way the session record is persisted so a restart
/// can pick it back up.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn login_with_scheme(
    store: &Store,
    scheme: &impl CredentialScheme,
    username: &str,
    password: &str,
) -> Result<Option<Session>> {
    let now = Utc::now();

    if username == SUPER_ADMIN_USERNAME && password == SUPER_ADMIN_PASSWORD {
        let record = User {
            username: "Admin".to_owned(),
            password: SUPER_ADMIN_PASSWORD.to_owned(),
            is_admin: true,
            has_full_access: true,
            permissions: Page::full_set(),
            created_at: None,
            last_login: Some(now),
        };
        store.save_json(&StorageKey::session_user(), &record).await?;
        debug!(username, "super admin signed in");
        return Ok(Some(Session {
            record,
            role: Role::SuperAdmin,
        }));
    }

    let Some(mut record) = users::find_user(store, username).await? else {
        return Ok(None);
    };
    if !scheme.verify(password, &record.password) {
        return Ok(None);
    }

    users::update_user(
        store,
        username,
        UserPatch {
            last_login: Some(now),
            ..UserPatch::default()
        },
    )
    .await?;
    record.last_login = Some(now);
    store.save_json(&StorageKey::session_user(), &record).await?;

    let role = Role::from_flags(record.is_admin, record.has_full_access);
    debug!(username, ?role, "user signed in");
    Ok(Some(Session { record, role }))
}

/// Restores the session persisted by the last login, if any.
///
/// A record that no longer parses is dropped from storage and treated as
/// signed out rather than surfaced as an error.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn resume_session(store: &Store) -> Result<Option<Session>> {
    let key = StorageKey::session_user();
    let Some(raw) = store.read_raw(&key).await? else {
        return Ok(None);
    };

    match serde_json::from_str::<User>(&raw) {
        Ok(record) => {
            let role = Role::from_flags(record.is_admin, record.has_full_access);
            Ok(Some(Session { record, role }))
        }
        Err(error) => {
            warn!(key = key.as_str(), %error, "discarding corrupt session record");
            store.remove(&key).await?;
            Ok(None)
        }
    }
}

/// Signs the session out: records the logout in the activity log, then
/// drops the persisted session.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn logout(store: &Store, session: Session) -> Result<()> {
    activity::log_activity(store, Some(&session), "Çıkış Yaptı", None, None).await?;
    store.remove(&StorageKey::session_user()).await
}
