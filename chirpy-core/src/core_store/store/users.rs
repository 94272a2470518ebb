/*
    users.rs - User operations on the store
*/

use crate::core_store::model::{next_id, UpgradeEvent, User, UserId, UserView};
use crate::core_store::store::errors::{StoreError, StoreResult};
use crate::core_store::store::file_store::{ascending, user_not_found, Store};
use tracing::{info, warn};

impl Store {
    /// Create a user. Fails with `Conflict` if the email is taken
    /// (exact, case-sensitive comparison).
    pub fn create_user(&self, email: &str, password: &str) -> StoreResult<UserView> {
        self.mutate(|doc| {
            if doc.find_user_by_email(email).is_some() {
                warn!(email, "Rejected duplicate email");
                return Err(StoreError::Conflict(format!("user {} already exists", email)));
            }

            let id = UserId(next_id(doc.users.len()));
            let user = User::new(id, email, password);
            let view = user.view();
            if doc.users.insert(id, user).is_some() {
                warn!(user_id = %id, "Reassigned identifier replaced an existing user");
            }

            info!(user_id = %id, "Created user");
            Ok(view)
        })
    }

    /// Replace email and password of an existing user; the upgraded flag
    /// is kept.
    pub fn update_user(&self, id: UserId, email: &str, password: &str) -> StoreResult<UserView> {
        self.mutate(|doc| {
            let user = doc.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
            user.email = email.to_string();
            user.password = password.to_string();

            info!(user_id = %id, "Updated user");
            Ok(user.view())
        })
    }

    /// Set the upgraded flag. Upgrading an upgraded user succeeds.
    pub fn upgrade_user(&self, id: UserId) -> StoreResult<User> {
        self.mutate(|doc| {
            let user = doc.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
            user.is_chirpy_red = true;

            info!(user_id = %id, "Upgraded user");
            Ok(user.clone())
        })
    }

    /// Apply a membership webhook payload. Events other than
    /// `user.upgraded` are ignored and leave the file untouched.
    pub fn apply_upgrade_event(&self, event: &UpgradeEvent) -> StoreResult<Option<User>> {
        if !event.is_upgrade() {
            info!(event = %event.event, "Ignoring membership event");
            return Ok(None);
        }
        self.upgrade_user(event.data.user_id).map(Some)
    }

    /// Find the user with exactly this email and password.
    ///
    /// Unknown email and wrong password both yield `AuthFailed`.
    pub fn login(&self, email: &str, password: &str) -> StoreResult<UserView> {
        self.read(|doc| {
            doc.users
                .values()
                .find(|u| u.email == email && u.password == password)
                .map(User::view)
                .ok_or_else(|| {
                    warn!("Login rejected");
                    StoreError::AuthFailed
                })
        })
    }

    pub fn get_user(&self, id: UserId) -> StoreResult<User> {
        self.read(|doc| doc.users.get(&id).cloned().ok_or_else(|| user_not_found(id)))
    }

    /// All users, ascending by id
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        self.read(|doc| Ok(ascending(doc.users.values().cloned(), |u| u.id)))
    }
}
