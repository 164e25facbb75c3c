//! Medical record models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::{now_millis, truncate_to_millis};

/// Kind of medical record.
///
/// Known kinds map to fixed names; anything else is kept verbatim so free-text
/// types written by older clients survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    Diagnosis,
    LabResult,
    Prescription,
    Other(CustomRecordType),
}

/// Free-text record type name.
///
/// Never holds one of the known names, so every `RecordType` has exactly one
/// stored form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomRecordType(String);

impl CustomRecordType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RecordType {
    /// Build a type from any name; known names resolve to their variant.
    pub fn other(name: impl Into<String>) -> Self {
        let name = name.into();
        match RecordType::known(&name) {
            Some(known) => known,
            None => RecordType::Other(CustomRecordType(name)),
        }
    }

    /// Stored name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Diagnosis => "DIAGNOSIS",
            RecordType::LabResult => "LAB_RESULT",
            RecordType::Prescription => "PRESCRIPTION",
            RecordType::Other(custom) => custom.as_str(),
        }
    }

    /// Parse a stored name. Never fails.
    pub fn parse(name: &str) -> Self {
        RecordType::known(name)
            .unwrap_or_else(|| RecordType::Other(CustomRecordType(name.to_string())))
    }

    fn known(name: &str) -> Option<Self> {
        match name {
            "DIAGNOSIS" => Some(RecordType::Diagnosis),
            "LAB_RESULT" => Some(RecordType::LabResult),
            "PRESCRIPTION" => Some(RecordType::Prescription),
            _ => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RecordType {
    fn from(name: String) -> Self {
        RecordType::other(name)
    }
}

impl From<&str> for RecordType {
    fn from(name: &str) -> Self {
        RecordType::parse(name)
    }
}

impl From<RecordType> for String {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Other(custom) => custom.0,
            known => known.as_str().to_string(),
        }
    }
}

/// A single medical record owned by a vault user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    /// Externally supplied record id
    pub id: String,
    /// Owning user id
    pub user_id: String,
    pub record_type: RecordType,
    pub title: String,
    pub date: DateTime<Utc>,
    pub doctor_name: Option<String>,
    pub description: Option<String>,
    /// Ordered attachment references (file paths or URIs)
    pub attachments: Vec<String>,
}

impl MedicalRecord {
    /// Create a new record with a generated id, dated now.
    pub fn new(user_id: String, record_type: RecordType, title: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            record_type,
            title,
            date: now_millis(),
            doctor_name: None,
            description: None,
            attachments: Vec::new(),
        }
    }

    /// Set the record date, truncated to stored precision.
    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = truncate_to_millis(date);
        self
    }

    /// Whether the record has any attachments.
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
