/*
    user.rs - User accounts

    The stored record keeps the password exactly as the caller supplied it.
    Anything handed back across the store boundary for display goes through
    `UserView`, which has no password field at all.
*/

use super::types::UserId;
use serde::{Deserialize, Serialize};

/// Event name the billing webhook sends when a user pays for Chirpy Red
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    /// Upgraded ("Chirpy Red") membership flag
    #[serde(default)]
    pub is_chirpy_red: bool,

    pub id: UserId,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, password: impl Into<String>) -> Self {
        User {
            email: email.into(),
            password: password.into(),
            is_chirpy_red: false,
            id,
        }
    }

    /// Public projection of this record
    pub fn view(&self) -> UserView {
        UserView::from(self)
    }
}

/// Public view of a user: never carries the password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id,
            email: user.email.clone(),
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// Payload of the membership webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeEvent {
    pub event: String,
    pub data: UpgradeEventData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeEventData {
    pub user_id: UserId,
}

impl UpgradeEvent {
    pub fn user_upgraded(user_id: UserId) -> Self {
        UpgradeEvent {
            event: USER_UPGRADED_EVENT.to_string(),
            data: UpgradeEventData { user_id },
        }
    }

    pub fn is_upgrade(&self) -> bool {
        self.event == USER_UPGRADED_EVENT
    }
}
