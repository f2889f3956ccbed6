//! User records - CRUD over the stored user table plus form validation.
//!
//! Records live as one JSON array under `system_users`. Username uniqueness
//! is the only rule the store itself enforces; everything the settings
//! screen checks before submitting (blank fields, password confirmation, an
//! empty permission grant) lives in [`NewUserForm::validate`] so the
//! Turkish messages stay next to their rules.
//!
//! Credentials pass through a [`CredentialScheme`]; the default keeps them
//! in plain text. See [`crate::core::auth`] for that trade-off.

use crate::{
    core::auth::{CredentialScheme, Page, PlaintextCredentials},
    errors::Result,
    storage::{StorageKey, Store},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// A registered user record as stored under `system_users`.
///
/// Field names keep the storage layout's camelCase spelling so existing
/// records load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique, case-sensitive login name
    pub username: String,
    /// Stored credential, encoded by the active scheme
    pub password: String,
    /// Grants editing rights and bypasses page checks
    #[serde(default)]
    pub is_admin: bool,
    /// Marks a read-only account expected to hold every page grant
    #[serde(default)]
    pub has_full_access: bool,
    /// Pages this user may open
    #[serde(default)]
    pub permissions: BTreeSet<Page>,
    /// When the record was created; absent on the built-in session record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last successful login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Input for [`add_user`]: everything but the creation stamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique, case-sensitive login name
    pub username: String,
    /// Password as typed; the scheme encodes it before storage
    pub password: String,
    /// Grants editing rights and bypasses page checks
    pub is_admin: bool,
    /// Marks a read-only full-access account
    pub has_full_access: bool,
    /// Pages the user may open
    pub permissions: BTreeSet<Page>,
}

/// Partial update for [`update_user`]; `None` fields keep their stored
/// value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// Replacement password as typed
    pub password: Option<String>,
    /// Replacement admin flag
    pub is_admin: Option<bool>,
    /// Replacement full-access flag
    pub has_full_access: Option<bool>,
    /// Replacement page grants
    pub permissions: Option<BTreeSet<Page>>,
    /// New last-login stamp
    pub last_login: Option<DateTime<Utc>>,
}

/// Loads every user record. Absent and corrupt tables read as empty.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_users(store: &Store) -> Result<Vec<User>> {
    store.load_or_default(&StorageKey::system_users()).await
}

async fn save_users(store: &Store, users: &[User]) -> Result<()> {
    store.save_json(&StorageKey::system_users(), users).await
}

/// Writes an empty user table on the very first run so later reads find a
/// well-formed value. Returns whether the table had to be created.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn ensure_user_table(store: &Store) -> Result<bool> {
    if store.contains(&StorageKey::system_users()).await? {
        return Ok(false);
    }
    save_users(store, &[]).await?;
    Ok(true)
}

/// Finds one record by exact username. Lookups are case-sensitive.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_user(store: &Store, username: &str) -> Result<Option<User>> {
    Ok(get_all_users(store)
        .await?
        .into_iter()
        .find(|user| user.username == username))
}

/// Adds a record unless the username is already taken.
///
/// Returns `Ok(false)` on a duplicate; how to phrase that is the caller's
/// business.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn add_user(store: &Store, new_user: NewUser) -> Result<bool> {
    add_user_with_scheme(store, &PlaintextCredentials, new_user).await
}

/// [`add_user`] with an explicit credential scheme.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn add_user_with_scheme(
    store: &Store,
    scheme: &impl CredentialScheme,
    new_user: NewUser,
) -> Result<bool> {
    let mut users = get_all_users(store).await?;
    if users.iter().any(|user| user.username == new_user.username) {
        return Ok(false);
    }

    users.push(User {
        username: new_user.username,
        password: scheme.protect(&new_user.password),
        is_admin: new_user.is_admin,
        has_full_access: new_user.has_full_access,
        permissions: new_user.permissions,
        created_at: Some(Utc::now()),
        last_login: None,
    });
    save_users(store, &users).await?;
    Ok(true)
}

/// Applies a partial update to the named record. Returns `Ok(false)` when
/// no record matches.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn update_user(store: &Store, username: &str, patch: UserPatch) -> Result<bool> {
    update_user_with_scheme(store, &PlaintextCredentials, username, patch).await
}

/// [`update_user`] with an explicit credential scheme.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn update_user_with_scheme(
    store: &Store,
    scheme: &impl CredentialScheme,
    username: &str,
    patch: UserPatch,
) -> Result<bool> {
    let mut users = get_all_users(store).await?;
    let Some(user) = users.iter_mut().find(|user| user.username == username) else {
        return Ok(false);
    };

    if let Some(password) = patch.password {
        user.password = scheme.protect(&password);
    }
    if let Some(is_admin) = patch.is_admin {
        user.is_admin = is_admin;
    }
    if let Some(has_full_access) = patch.has_full_access {
        user.has_full_access = has_full_access;
    }
    if let Some(permissions) = patch.permissions {
        user.permissions = permissions;
    }
    if let Some(last_login) = patch.last_login {
        user.last_login = Some(last_login);
    }

    save_users(store, &users).await?;
    Ok(true)
}

/// Removes the named record, rewriting the table without it.
///
/// Reports success even when nothing matched, so deleting twice is
/// harmless; callers who care can diff [`get_all_users`] around the call.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn delete_user(store: &Store, username: &str) -> Result<bool> {
    let users = get_all_users(store).await?;
    let remaining: Vec<User> = users
        .into_iter()
        .filter(|user| user.username != username)
        .collect();
    save_users(store, &remaining).await?;
    Ok(true)
}

/// Why an add-user form was rejected before touching the store.
///
/// The display strings are exactly what the settings screen flashes for
/// three seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserFormError {
    /// Username missing or whitespace
    #[error("Kullanıcı adı boş olamaz!")]
    EmptyUsername,
    /// Password missing or whitespace
    #[error("Şifre boş olamaz!")]
    EmptyPassword,
    /// Password and confirmation differ
    #[error("Şifreler eşleşmiyor!")]
    PasswordMismatch,
    /// No page grant selected
    #[error("En az bir sayfa izni seçmelisiniz!")]
    NoPermissions,
}

/// The add-user form as typed, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewUserForm {
    /// Login name as typed
    pub username: String,
    /// Password as typed
    pub password: String,
    /// Second password field
    pub confirm_password: String,
    /// Selected page grants
    pub permissions: BTreeSet<Page>,
}

impl NewUserForm {
    /// Checks the form rules in screen order and converts to a [`NewUser`]
    /// with both role flags off; accounts get promoted separately.
    ///
    /// The username is checked trimmed but stored as typed.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn validate(self) -> std::result::Result<NewUser, UserFormError> {
        if self.username.trim().is_empty() {
            return Err(UserFormError::EmptyUsername);
        }
        if self.password.trim().is_empty() {
            return Err(UserFormError::EmptyPassword);
        }
        if self.password != self.confirm_password {
            return Err(UserFormError::PasswordMismatch);
        }
        if self.permissions.is_empty() {
            return Err(UserFormError::NoPermissions);
        }

        Ok(NewUser {
            username: self.username,
            password: self.password,
            is_admin: false,
            has_full_access: false,
            permissions: self.permissions,
        })
    }
}
