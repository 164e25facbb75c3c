//! User profile models (MediTrack schema).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::now_millis;

/// A user profile: the primary user or a family member.
///
/// Exactly one stored profile may carry `is_main_profile`; the database
/// enforces this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Row id. `0` until the profile is first stored.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub gender: String,
    pub blood_type: Option<String>,
    /// Height in centimeters
    pub height: Option<f32>,
    /// Weight in kilograms
    pub weight: Option<f32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    /// Additional notes about the user's health
    pub notes: Option<String>,
    /// Marks the primary user's profile
    pub is_main_profile: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new, unsaved profile with required fields.
    pub fn new(
        first_name: String,
        last_name: String,
        date_of_birth: DateTime<Utc>,
        gender: String,
    ) -> Self {
        let now = now_millis();
        Self {
            id: 0,
            first_name,
            last_name,
            date_of_birth: crate::convert::truncate_to_millis(date_of_birth),
            gender,
            blood_type: None,
            height: None,
            weight: None,
            phone: None,
            email: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            emergency_contact_relation: None,
            allergies: None,
            chronic_conditions: None,
            notes: None,
            is_main_profile: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the profile has been stored and assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// "First Last", trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether an emergency contact can be reached.
    pub fn has_emergency_contact(&self) -> bool {
        self.emergency_contact_name.is_some() && self.emergency_contact_phone.is_some()
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}
