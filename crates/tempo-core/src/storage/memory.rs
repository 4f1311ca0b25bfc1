//! In-memory storage.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Result, Storage};
use crate::error::StorageError;
use crate::models::profile::{NewUser, ProfileUpdate, User};
use crate::models::purchase::{NewPurchase, Purchase};

/// Users and purchases held in ordered maps. Ids start at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStorage {
    users: BTreeMap<u64, User>,
    purchases: BTreeMap<u64, Purchase>,
    next_user_id: u64,
    next_purchase_id: u64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            purchases: BTreeMap::new(),
            next_user_id: 1,
            next_purchase_id: 1,
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn get_user(&self, id: u64) -> Result<Option<User>> {
        Ok(self.users.get(&id).cloned())
    }

    fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>> {
        Ok(self.users.values().find(|u| u.uid == uid).cloned())
    }

    fn create_user(&mut self, user: NewUser) -> Result<User> {
        if user.uid.trim().is_empty() {
            return Err(StorageError::Invalid {
                field: "uid".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.users.values().any(|u| u.uid == user.uid) {
            return Err(StorageError::DuplicateUser(user.uid));
        }

        let id = self.next_user_id;
        self.next_user_id += 1;

        let user = User {
            id,
            uid: user.uid,
            email: user.email,
            monthly_salary: user.monthly_salary,
            weekly_hours: user.weekly_hours,
            created_at: Utc::now(),
        };

        info!("Created user {} ({})", user.id, user.uid);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    fn update_user(&mut self, uid: &str, updates: ProfileUpdate) -> Result<Option<User>> {
        let Some(user) = self.users.values_mut().find(|u| u.uid == uid) else {
            return Ok(None);
        };

        updates.apply(user);
        debug!("Updated user {}", uid);
        Ok(Some(user.clone()))
    }

    fn purchases_by_user(&self, user_id: u64) -> Result<Vec<Purchase>> {
        let mut purchases: Vec<Purchase> = self
            .purchases
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();

        purchases.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(purchases)
    }

    fn create_purchase(&mut self, purchase: NewPurchase) -> Result<Purchase> {
        purchase.validate()?;

        let id = self.next_purchase_id;
        self.next_purchase_id += 1;

        let purchase = Purchase {
            id,
            user_id: purchase.user_id,
            value: purchase.value,
            time_hours: purchase.time_hours,
            time_minutes: purchase.time_minutes,
            image_url: purchase.image_url,
            description: purchase.description,
            kind: purchase.kind,
            created_at: Utc::now(),
        };

        info!("Recorded purchase {} of {} for user {}", purchase.id, purchase.value, purchase.user_id);
        self.purchases.insert(id, purchase.clone());
        Ok(purchase)
    }

    fn delete_purchase(&mut self, id: u64, user_id: u64) -> Result<bool> {
        match self.purchases.get(&id) {
            Some(p) if p.user_id == user_id => {
                self.purchases.remove(&id);
                info!("Deleted purchase {}", id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
