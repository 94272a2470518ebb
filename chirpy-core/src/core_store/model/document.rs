/*
    document.rs - The persisted aggregate

    One JSON object with three independent maps. Missing maps read as empty,
    so `{}` is a valid empty document.
*/

use super::chirp::Chirp;
use super::token::RevokedToken;
use super::types::{ChirpId, RevocationKey, UserId};
use super::user::User;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub chirps: HashMap<ChirpId, Chirp>,

    #[serde(default)]
    pub users: HashMap<UserId, User>,

    #[serde(default)]
    pub tokens: HashMap<RevocationKey, RevokedToken>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }
}
