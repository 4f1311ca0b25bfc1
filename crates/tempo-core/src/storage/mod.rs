//! Storage of users and purchases.

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;
use crate::models::profile::{NewUser, ProfileUpdate, User};
use crate::models::purchase::{NewPurchase, Purchase};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Create/read/update for users, create/read/delete for purchases.
pub trait Storage {
    /// Look up a user by numeric id.
    fn get_user(&self, id: u64) -> Result<Option<User>>;

    /// Look up a user by external uid.
    fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>>;

    /// Create a user. Fails if the uid is taken.
    fn create_user(&mut self, user: NewUser) -> Result<User>;

    /// Apply a partial update. `None` if the user does not exist.
    fn update_user(&mut self, uid: &str, updates: ProfileUpdate) -> Result<Option<User>>;

    /// Purchases of a user, newest first.
    fn purchases_by_user(&self, user_id: u64) -> Result<Vec<Purchase>>;

    /// Record a purchase.
    fn create_purchase(&mut self, purchase: NewPurchase) -> Result<Purchase>;

    /// Delete a purchase owned by `user_id`. `false` if missing or owned by someone else.
    fn delete_purchase(&mut self, id: u64, user_id: u64) -> Result<bool>;

    /// Return the user with this uid, creating it if needed.
    fn ensure_user(&mut self, uid: &str, email: &str) -> Result<User> {
        if let Some(user) = self.get_user_by_uid(uid)? {
            return Ok(user);
        }

        self.create_user(NewUser {
            uid: uid.to_string(),
            email: email.to_string(),
            ..Default::default()
        })
    }
}
