//! Account and cache record types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AccountId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A durable account row.
///
/// The hash is serialized under `password` to keep the wire shape callers
/// already consume. Accounts returned from register have it cleared.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

impl Account {
    /// Returns a copy with the password hash cleared.
    #[must_use]
    pub fn redacted(mut self) -> Self {
        self.password_hash.clear();
        self
    }

    /// The identity-only projection stored in the session cache.
    #[must_use]
    pub fn cache_record(&self) -> CacheRecord {
        CacheRecord {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hash = if self.password_hash.is_empty() {
            ""
        } else {
            "[REDACTED]"
        };
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &hash)
            .finish()
    }
}

/// Identity projection of an [`Account`] held in the session cache.
///
/// There is intentionally no password slot here: nothing that reaches the
/// cache can carry a hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub id: AccountId,
    pub email: String,
}

impl CacheRecord {
    /// Cache field holding the account id.
    pub const FIELD_ID: &'static str = "id";
    /// Cache field holding the email.
    pub const FIELD_EMAIL: &'static str = "email";

    /// Flattens the record into cache fields.
    #[must_use]
    pub fn to_fields(&self) -> [(&'static str, String); 2] {
        [
            (Self::FIELD_ID, self.id.to_string()),
            (Self::FIELD_EMAIL, self.email.clone()),
        ]
    }

    /// Rebuilds a record from cache fields.
    ///
    /// Returns `None` when the map is empty, a field is missing, the id is
    /// not an integer, the stored email differs from the key it was read
    /// under, or the entry carries any field besides `id` and `email`.
    #[must_use]
    pub fn from_fields(fields: &HashMap<String, String>, expected_email: &str) -> Option<Self> {
        if fields.len() != 2 {
            return None;
        }
        let id = fields.get(Self::FIELD_ID)?.parse::<i64>().ok()?;
        let email = fields.get(Self::FIELD_EMAIL)?;
        if email != expected_email {
            return None;
        }
        Some(Self {
            id: AccountId(id),
            email: email.clone(),
        })
    }
}

/// Result of a successful authenticate call.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub id: AccountId,
    pub email: String,
    pub token: String,
}

impl AuthenticatedSession {
    /// Header name and value the boundary sets on the response.
    #[must_use]
    pub fn authorization_header(&self) -> (&'static str, &str) {
        (crate::boundary::AUTHORIZATION_HEADER, &self.token)
    }
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
