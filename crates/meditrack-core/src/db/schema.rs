//! SQLite schema definitions.
//!
//! Column names follow the layout already on devices (camelCase, dates as
//! millisecond integers) so existing database files open unchanged.

use serde::{Deserialize, Serialize};

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

pub const USER_PROFILES_TABLE: &str = "user_profiles";
pub const MEDICAL_RECORDS_TABLE: &str = "medical_records";

/// MediTrack schema: family profiles with a single main profile.
pub const MEDITRACK_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS user_profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    firstName TEXT NOT NULL,
    lastName TEXT NOT NULL,
    dateOfBirth INTEGER NOT NULL,                -- ms since epoch
    gender TEXT NOT NULL,
    bloodType TEXT,
    height REAL,                                 -- cm
    weight REAL,                                 -- kg
    phone TEXT,
    email TEXT,
    address TEXT,
    emergencyContactName TEXT,
    emergencyContactPhone TEXT,
    emergencyContactRelation TEXT,
    allergies TEXT,
    chronicConditions TEXT,
    notes TEXT,
    isMainProfile INTEGER NOT NULL DEFAULT 0,
    createdAt INTEGER NOT NULL,
    updatedAt INTEGER NOT NULL
);

-- At most one main profile
CREATE UNIQUE INDEX IF NOT EXISTS idx_user_profiles_single_main
    ON user_profiles(isMainProfile) WHERE isMainProfile = 1;

CREATE INDEX IF NOT EXISTS idx_user_profiles_first_name ON user_profiles(firstName);
"#;

/// MediVault schema: externally keyed users and their medical records.
pub const MEDIVAULT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS user_profiles (
    userId TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    dateOfBirth INTEGER,                         -- ms since epoch
    bloodType TEXT,
    allergies TEXT,
    emergencyContact TEXT,
    createdAt INTEGER NOT NULL,
    updatedAt INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS medical_records (
    id TEXT PRIMARY KEY NOT NULL,
    userId TEXT NOT NULL,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    date INTEGER NOT NULL,                       -- ms since epoch
    doctorName TEXT,
    description TEXT,
    attachments TEXT NOT NULL DEFAULT '[]'       -- JSON array of strings
);

CREATE INDEX IF NOT EXISTS idx_medical_records_user_type ON medical_records(userId, type);
"#;

/// Which of the two application schemas a database file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// `user_profiles` with integer ids and a main-profile flag
    MediTrack,
    /// `user_profiles` keyed by user id, plus `medical_records`
    MediVault,
}

impl SchemaKind {
    /// DDL for this schema.
    pub fn sql(&self) -> &'static str {
        match self {
            SchemaKind::MediTrack => MEDITRACK_SCHEMA,
            SchemaKind::MediVault => MEDIVAULT_SCHEMA,
        }
    }

    /// Tables created by this schema.
    pub fn tables(&self) -> &'static [&'static str] {
        match self {
            SchemaKind::MediTrack => &[USER_PROFILES_TABLE],
            SchemaKind::MediVault => &[USER_PROFILES_TABLE, MEDICAL_RECORDS_TABLE],
        }
    }

    /// Default database file name on the device.
    pub fn default_database_name(&self) -> &'static str {
        match self {
            SchemaKind::MediTrack => crate::config::MEDITRACK_DATABASE_NAME,
            SchemaKind::MediVault => crate::config::MEDIVAULT_DATABASE_NAME,
        }
    }
}
