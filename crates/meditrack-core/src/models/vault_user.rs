//! Vault user models (MediVault schema).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::now_millis;

/// A user of the vault, keyed by an externally supplied id.
///
/// Distinct from [`UserProfile`](super::UserProfile): the two live in
/// different databases and are never converted into one another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaultUser {
    /// Externally supplied user id
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VaultUser {
    /// Create a vault user for an id issued elsewhere.
    pub fn new(user_id: String, name: String) -> Self {
        let now = now_millis();
        Self {
            user_id,
            name,
            email: None,
            phone: None,
            date_of_birth: None,
            blood_type: None,
            allergies: None,
            emergency_contact: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a vault user with a locally generated id.
    pub fn with_generated_id(name: String) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), name)
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}
