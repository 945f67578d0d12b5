//! The user record, its public projection, and the email lookup index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Error, PasswordHash, dates, keys,
    store::{Item, SingleTable},
};

/// A user of the application, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's unique ID.
    pub id: String,
    /// The user's email address, lowercased.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// The user's bcrypt password hash.
    pub password: PasswordHash,
    /// The ISO 4217 code of the user's preferred currency.
    pub default_currency: String,
    /// The user's canonical timezone name, e.g. "Pacific/Auckland".
    pub timezone: String,
    /// When the record was created, as an RFC 3339 string.
    pub created_at: String,
    /// When the record was last updated, as an RFC 3339 string.
    pub updated_at: String,
}

/// The subset of a user record that is safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    /// The user's unique ID.
    pub id: String,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
}

/// The payload of the email index record mapping an email to a user ID.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailIndex {
    user_id: String,
}

impl User {
    /// Build a new user record with a fresh ID and the default preferences.
    ///
    /// `email` must already be normalized with
    /// [crate::validation::normalize_email].
    pub fn build(email: String, name: String, password: PasswordHash) -> Self {
        let now = dates::now_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password,
            default_currency: "USD".to_owned(),
            timezone: "UTC".to_owned(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// The client-facing projection of the record.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Insert a user record and its email index record.
///
/// These are two independent writes with no transaction around them: a crash
/// between the puts leaves an email index entry without a backing user. The
/// registration flow tolerates that by treating a dangling index entry as a
/// taken email.
///
/// # Errors
///
/// Returns an error if either write fails or a payload cannot be serialized.
pub fn insert_user(user: &User, store: &SingleTable) -> Result<(), Error> {
    let user_payload =
        serde_json::to_string(user).map_err(|e| Error::PayloadSerialization(e.to_string()))?;

    store.put(&Item {
        pk: keys::user_pk(&user.id),
        sk: keys::user_sk(&user.id),
        payload: user_payload,
    })?;

    let index = EmailIndex {
        user_id: user.id.clone(),
    };
    let index_payload =
        serde_json::to_string(&index).map_err(|e| Error::PayloadSerialization(e.to_string()))?;

    store.put(&Item {
        pk: keys::email_key(&user.email),
        sk: keys::email_key(&user.email),
        payload: index_payload,
    })?;

    Ok(())
}

/// Get the user with an ID equal to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered
/// user, or an error if the store could not be read.
pub fn get_user_by_id(user_id: &str, store: &SingleTable) -> Result<User, Error> {
    let item = store
        .get(&keys::user_pk(user_id), &keys::user_sk(user_id))?
        .ok_or(Error::NotFound)?;

    serde_json::from_str(&item.payload).map_err(|e| Error::PayloadSerialization(e.to_string()))
}

/// Look up the ID of the user registered with `email`, if any.
///
/// `email` must already be normalized with
/// [crate::validation::normalize_email].
///
/// # Errors
///
/// Returns an error if the store could not be read.
pub fn find_user_id_by_email(email: &str, store: &SingleTable) -> Result<Option<String>, Error> {
    let key = keys::email_key(email);

    match store.get(&key, &key)? {
        Some(item) => {
            let index: EmailIndex = serde_json::from_str(&item.payload)
                .map_err(|e| Error::PayloadSerialization(e.to_string()))?;

            Ok(Some(index.user_id))
        }
        None => Ok(None),
    }
}
