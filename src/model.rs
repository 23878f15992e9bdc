//! Core data types shared across screens.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an account record, owned by the persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login form payload. The password is a `SecretString` so it never leaks
/// through `Debug` or log output; it lives only for the input session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: SecretString,
}

/// Account creation payload, submitted to the backend as one unit.
/// There is no partial submission.
#[derive(Debug, Clone)]
pub struct AccountFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
}

/// Local reference to a user-selected profile image. Square aspect ratio,
/// full quality. Valid only within the current process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedImage {
    pub uri: String,
}

/// Local reference to a user-selected resume document, with the display
/// name shown in the UI after a successful pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedDocument {
    pub uri: String,
    pub display_name: String,
}

/// Profile payload. Resource handles stay local until submission, when all
/// four fields are written to the signed-in account in a single update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub bio: String,
    pub work_experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<PickedDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<PickedImage>,
}

/// Ambient authenticated session, owned by the persistence boundary and
/// read-only to the rest of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub account_id: AccountId,
    pub started_at: DateTime<Utc>,
}
