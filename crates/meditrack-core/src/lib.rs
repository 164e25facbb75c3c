//! MediTrack Core Library
//!
//! Local storage for personal medical records and family health profiles.
//!
//! # Architecture
//!
//! ```text
//! UI screen ──intent──► view model ──► repository ──► DAO ──► SQLite
//!     ▲                                                         │
//!     └──── state ◄──── LiveQuery ◄──── update hook ◄───────────┘
//! ```
//!
//! Two database flavors ship with the app and are kept apart:
//!
//! - **MediTrack**: family profiles with a single main profile
//! - **MediVault**: vault users and their medical records
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer, DAO contracts and live queries
//! - [`models`]: Domain types (UserProfile, VaultUser, MedicalRecord)
//! - [`convert`]: Stored value converters (timestamps, string lists)
//! - [`repository`]: Pass-through repositories used by the UI layer
//! - [`config`]: Application constants and runtime configuration
//! - [`logging`]: Tracing subscriber setup

pub mod config;
pub mod convert;
pub mod db;
pub mod logging;
pub mod models;
pub mod repository;

// Re-export commonly used types
pub use db::{
    Database, DbError, DbResult, LiveQuery, MediTrackDatabase, MediVaultDatabase,
    MedicalRecordDao, SchemaKind, UserProfileDao, VaultUserDao,
};
pub use models::{MedicalRecord, RecordType, UserProfile, VaultUser};
pub use repository::{
    MedicalRecordRepository, RepoResult, RepositoryError, UserProfileRepository,
    VaultUserRepository,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};
use std::time::Duration;

use config::CoreConfig;
use convert::{date_to_timestamp, timestamp_to_date};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MediTrackError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<DbError> for MediTrackError {
    fn from(e: DbError) -> Self {
        MediTrackError::DatabaseError(e.to_string())
    }
}

impl From<RepositoryError> for MediTrackError {
    fn from(e: RepositoryError) -> Self {
        MediTrackError::DatabaseError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MediTrackError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MediTrackError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn date_from_ffi(field: &str, millis: i64) -> Result<chrono::DateTime<chrono::Utc>, MediTrackError> {
    timestamp_to_date(millis)
        .ok_or_else(|| MediTrackError::InvalidInput(format!("{field} out of range: {millis}")))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the log subscriber. Later calls are ignored.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) {
    logging::init(filter.as_deref());
}

/// Open or create a MediTrack profile database at the given path.
#[uniffi::export]
pub fn open_meditrack(path: String) -> Result<Arc<MediTrackCore>, MediTrackError> {
    Ok(Arc::new(MediTrackCore::new(MediTrackDatabase::open(&path)?)))
}

/// Create an in-memory MediTrack database (for testing).
#[uniffi::export]
pub fn open_meditrack_in_memory() -> Result<Arc<MediTrackCore>, MediTrackError> {
    Ok(Arc::new(MediTrackCore::new(MediTrackDatabase::open_in_memory()?)))
}

/// Open or create a MediVault record database at the given path.
#[uniffi::export]
pub fn open_medivault(path: String) -> Result<Arc<MediVaultCore>, MediTrackError> {
    Ok(Arc::new(MediVaultCore::new(MediVaultDatabase::open(&path)?)))
}

/// Create an in-memory MediVault database (for testing).
#[uniffi::export]
pub fn open_medivault_in_memory() -> Result<Arc<MediVaultCore>, MediTrackError> {
    Ok(Arc::new(MediVaultCore::new(MediVaultDatabase::open_in_memory()?)))
}

/// Parse a JSON configuration, install logging with its filter and check
/// that it names the expected flavor.
fn load_config(config_json: &str, expected: SchemaKind) -> Result<CoreConfig, MediTrackError> {
    let config = CoreConfig::from_json(config_json)
        .map_err(|e| MediTrackError::InvalidInput(format!("config: {e}")))?;
    if config.flavor != expected {
        return Err(MediTrackError::InvalidInput(format!(
            "config flavor {:?} does not match {:?}",
            config.flavor, expected
        )));
    }
    logging::init(Some(config.log_filter()));
    Ok(config)
}

/// Open the MediTrack database described by a JSON configuration.
///
/// The database file lives at `<data_dir>/meditrack_database`.
#[uniffi::export]
pub fn open_meditrack_with_config(
    config_json: String,
) -> Result<Arc<MediTrackCore>, MediTrackError> {
    let config = load_config(&config_json, SchemaKind::MediTrack)?;
    Ok(Arc::new(MediTrackCore::new(MediTrackDatabase::open(
        config.database_path(),
    )?)))
}

/// Open the MediVault database described by a JSON configuration.
#[uniffi::export]
pub fn open_medivault_with_config(
    config_json: String,
) -> Result<Arc<MediVaultCore>, MediTrackError> {
    let config = load_config(&config_json, SchemaKind::MediVault)?;
    Ok(Arc::new(MediVaultCore::new(MediVaultDatabase::open(
        config.database_path(),
    )?)))
}

// =========================================================================
// Profile API Object
// =========================================================================

/// Profile storage for the MediTrack app.
#[derive(uniffi::Object)]
pub struct MediTrackCore {
    profiles: UserProfileRepository<MediTrackDatabase>,
}

impl MediTrackCore {
    pub fn new(db: MediTrackDatabase) -> Self {
        Self {
            profiles: UserProfileRepository::new(db),
        }
    }

    pub fn profiles(&self) -> &UserProfileRepository<MediTrackDatabase> {
        &self.profiles
    }
}

#[uniffi::export]
impl MediTrackCore {
    /// Create and store a new profile.
    pub fn create_profile(
        &self,
        first_name: String,
        last_name: String,
        date_of_birth: i64,
        gender: String,
    ) -> Result<FfiUserProfile, MediTrackError> {
        let dob = date_from_ffi("date_of_birth", date_of_birth)?;
        let mut profile = UserProfile::new(first_name, last_name, dob, gender);
        profile.id = self.profiles.insert_user_profile(&profile)?;
        Ok(profile.into())
    }

    /// Insert or replace a profile. Returns its id.
    pub fn save_profile(&self, profile: FfiUserProfile) -> Result<i64, MediTrackError> {
        let profile = UserProfile::try_from(profile)?;
        Ok(self.profiles.insert_user_profile(&profile)?)
    }

    /// Overwrite an existing profile. Fails with `NotFound` for unknown ids.
    pub fn update_profile(&self, profile: FfiUserProfile) -> Result<(), MediTrackError> {
        let mut profile = UserProfile::try_from(profile)?;
        profile.touch();
        match self.profiles.update_user_profile(&profile)? {
            0 => Err(MediTrackError::NotFound(format!("profile {}", profile.id))),
            _ => Ok(()),
        }
    }

    /// Delete a profile. Returns true if it existed.
    pub fn delete_profile(&self, id: i64) -> Result<bool, MediTrackError> {
        Ok(self.profiles.delete_user_profile_by_id(id)? > 0)
    }

    pub fn get_profile(&self, id: i64) -> Result<Option<FfiUserProfile>, MediTrackError> {
        Ok(self.profiles.get_user_profile_by_id(id)?.map(Into::into))
    }

    pub fn get_main_profile(&self) -> Result<Option<FfiUserProfile>, MediTrackError> {
        Ok(self.profiles.get_main_user_profile()?.map(Into::into))
    }

    /// Make the given profile the main one.
    pub fn set_main_profile(&self, id: i64) -> Result<(), MediTrackError> {
        if self.profiles.set_main_user_profile(id)? {
            Ok(())
        } else {
            Err(MediTrackError::NotFound(format!("profile {id}")))
        }
    }

    pub fn list_profiles(&self) -> Result<Vec<FfiUserProfile>, MediTrackError> {
        let profiles = self.profiles.list_user_profiles()?;
        Ok(profiles.into_iter().map(Into::into).collect())
    }

    /// Profiles whose first or last name contains `query`.
    pub fn search_profiles(&self, query: String) -> Result<Vec<FfiUserProfile>, MediTrackError> {
        let profiles = self.profiles.find_user_profiles(&query)?;
        Ok(profiles.into_iter().map(Into::into).collect())
    }

    /// Subscribe to the full profile list.
    pub fn observe_profiles(&self) -> Arc<ProfileFeed> {
        ProfileFeed::new(self.profiles.get_all_user_profiles())
    }

    /// Subscribe to the profiles matching `query`.
    pub fn observe_profile_search(&self, query: String) -> Arc<ProfileFeed> {
        ProfileFeed::new(self.profiles.search_user_profiles(&query))
    }
}

// =========================================================================
// Vault API Object
// =========================================================================

/// User and record storage for the MediVault app.
#[derive(uniffi::Object)]
pub struct MediVaultCore {
    users: VaultUserRepository<MediVaultDatabase>,
    records: MedicalRecordRepository<MediVaultDatabase>,
}

impl MediVaultCore {
    pub fn new(db: MediVaultDatabase) -> Self {
        Self {
            users: VaultUserRepository::new(db.clone()),
            records: MedicalRecordRepository::new(db),
        }
    }

    pub fn users(&self) -> &VaultUserRepository<MediVaultDatabase> {
        &self.users
    }

    pub fn records(&self) -> &MedicalRecordRepository<MediVaultDatabase> {
        &self.records
    }
}

#[uniffi::export]
impl MediVaultCore {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert or replace a user.
    pub fn save_user(&self, user: FfiVaultUser) -> Result<(), MediTrackError> {
        let user = VaultUser::try_from(user)?;
        Ok(self.users.save_user(&user)?)
    }

    /// Overwrite an existing user. Fails with `NotFound` for unknown ids.
    pub fn update_user(&self, user: FfiVaultUser) -> Result<(), MediTrackError> {
        let mut user = VaultUser::try_from(user)?;
        user.touch();
        match self.users.update_user(&user)? {
            0 => Err(MediTrackError::NotFound(format!("user {}", user.user_id))),
            _ => Ok(()),
        }
    }

    pub fn get_user(&self, user_id: String) -> Result<Option<FfiVaultUser>, MediTrackError> {
        Ok(self.users.get_user_by_id(&user_id)?.map(Into::into))
    }

    pub fn list_users(&self) -> Result<Vec<FfiVaultUser>, MediTrackError> {
        let users = self.users.get_all_users()?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Delete a user. Their records are kept.
    pub fn delete_user(&self, user_id: String) -> Result<bool, MediTrackError> {
        Ok(self.users.delete_user_by_id(&user_id)? > 0)
    }

    /// Subscribe to one user.
    pub fn observe_user(&self, user_id: String) -> Arc<UserFeed> {
        let live = self.users.observe_user(&user_id).map(|user| UserSnapshot {
            user: user.map(Into::into),
        });
        Arc::new(UserFeed {
            live: Mutex::new(live),
        })
    }

    /// Subscribe to the full user list.
    pub fn observe_users(&self) -> Arc<UserListFeed> {
        let live = self
            .users
            .observe_all_users()
            .map(|users| users.into_iter().map(Into::into).collect());
        Arc::new(UserListFeed {
            live: Mutex::new(live),
        })
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Insert or replace a record.
    pub fn save_record(&self, record: FfiMedicalRecord) -> Result<(), MediTrackError> {
        let record = MedicalRecord::try_from(record)?;
        Ok(self.records.save_record(&record)?)
    }

    /// Overwrite an existing record. Fails with `NotFound` for unknown ids.
    pub fn update_record(&self, record: FfiMedicalRecord) -> Result<(), MediTrackError> {
        let record = MedicalRecord::try_from(record)?;
        match self.records.update_record(&record)? {
            0 => Err(MediTrackError::NotFound(format!("record {}", record.id))),
            _ => Ok(()),
        }
    }

    /// Delete a record. Returns true if it existed.
    pub fn delete_record(&self, id: String) -> Result<bool, MediTrackError> {
        Ok(self.records.delete_record_by_id(&id)? > 0)
    }

    pub fn get_record(&self, id: String) -> Result<Option<FfiMedicalRecord>, MediTrackError> {
        Ok(self.records.get_record_by_id(&id)?.map(Into::into))
    }

    /// A user's records, newest first.
    pub fn records_for_user(&self, user_id: String) -> Result<Vec<FfiMedicalRecord>, MediTrackError> {
        let records = self.records.list_records_for_user(&user_id)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub fn records_by_type(
        &self,
        user_id: String,
        record_type: String,
    ) -> Result<Vec<FfiMedicalRecord>, MediTrackError> {
        let records = self
            .records
            .list_records_by_type(&user_id, &RecordType::parse(&record_type))?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub fn count_records(&self, user_id: String) -> Result<u32, MediTrackError> {
        Ok(self.records.count_records_for_user(&user_id)? as u32)
    }

    /// Subscribe to a user's records.
    pub fn observe_records(&self, user_id: String) -> Arc<RecordFeed> {
        RecordFeed::new(self.records.get_records_by_user_id(&user_id))
    }

    /// Subscribe to a user's records of one type.
    pub fn observe_records_by_type(&self, user_id: String, record_type: String) -> Arc<RecordFeed> {
        RecordFeed::new(
            self.records
                .get_records_by_type(&user_id, &RecordType::parse(&record_type)),
        )
    }
}

// =========================================================================
// Live Feeds
// =========================================================================

/// Live profile list. Call from a worker thread; `next` blocks.
#[derive(uniffi::Object)]
pub struct ProfileFeed {
    live: Mutex<LiveQuery<Vec<FfiUserProfile>>>,
}

impl ProfileFeed {
    fn new(live: LiveQuery<Vec<UserProfile>>) -> Arc<Self> {
        let live = live.map(|profiles| profiles.into_iter().map(Into::into).collect());
        Arc::new(Self {
            live: Mutex::new(live),
        })
    }
}

#[uniffi::export]
impl ProfileFeed {
    /// Wait up to `timeout_ms` for a change. `None` on timeout.
    pub fn next(&self, timeout_ms: u64) -> Result<Option<Vec<FfiUserProfile>>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.next_timeout(Duration::from_millis(timeout_ms)).transpose()?)
    }

    /// Latest result if something changed, without waiting.
    pub fn poll(&self) -> Result<Option<Vec<FfiUserProfile>>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.try_next().transpose()?)
    }
}

/// Live record list. Call from a worker thread; `next` blocks.
#[derive(uniffi::Object)]
pub struct RecordFeed {
    live: Mutex<LiveQuery<Vec<FfiMedicalRecord>>>,
}

impl RecordFeed {
    fn new(live: LiveQuery<Vec<MedicalRecord>>) -> Arc<Self> {
        let live = live.map(|records| records.into_iter().map(Into::into).collect());
        Arc::new(Self {
            live: Mutex::new(live),
        })
    }
}

#[uniffi::export]
impl RecordFeed {
    /// Wait up to `timeout_ms` for a change. `None` on timeout.
    pub fn next(&self, timeout_ms: u64) -> Result<Option<Vec<FfiMedicalRecord>>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.next_timeout(Duration::from_millis(timeout_ms)).transpose()?)
    }

    /// Latest result if something changed, without waiting.
    pub fn poll(&self) -> Result<Option<Vec<FfiMedicalRecord>>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.try_next().transpose()?)
    }
}

/// One emission of a [`UserFeed`]. `user` is `None` while the user does not exist.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct UserSnapshot {
    pub user: Option<FfiVaultUser>,
}

/// Live view of a single vault user.
#[derive(uniffi::Object)]
pub struct UserFeed {
    live: Mutex<LiveQuery<UserSnapshot>>,
}

#[uniffi::export]
impl UserFeed {
    /// Wait up to `timeout_ms` for a change. `None` on timeout.
    pub fn next(&self, timeout_ms: u64) -> Result<Option<UserSnapshot>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.next_timeout(Duration::from_millis(timeout_ms)).transpose()?)
    }

    pub fn poll(&self) -> Result<Option<UserSnapshot>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.try_next().transpose()?)
    }
}

/// Live vault user list.
#[derive(uniffi::Object)]
pub struct UserListFeed {
    live: Mutex<LiveQuery<Vec<FfiVaultUser>>>,
}

#[uniffi::export]
impl UserListFeed {
    pub fn next(&self, timeout_ms: u64) -> Result<Option<Vec<FfiVaultUser>>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.next_timeout(Duration::from_millis(timeout_ms)).transpose()?)
    }

    pub fn poll(&self) -> Result<Option<Vec<FfiVaultUser>>, MediTrackError> {
        let mut live = self.live.lock()?;
        Ok(live.try_next().transpose()?)
    }
}

// =========================================================================
// FFI-Safe Types
// =========================================================================

/// FFI-safe user profile. Dates are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiUserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: i64,
    pub gender: String,
    pub blood_type: Option<String>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub notes: Option<String>,
    pub is_main_profile: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<UserProfile> for FfiUserProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            date_of_birth: date_to_timestamp(&profile.date_of_birth),
            gender: profile.gender,
            blood_type: profile.blood_type,
            height: profile.height,
            weight: profile.weight,
            phone: profile.phone,
            email: profile.email,
            address: profile.address,
            emergency_contact_name: profile.emergency_contact_name,
            emergency_contact_phone: profile.emergency_contact_phone,
            emergency_contact_relation: profile.emergency_contact_relation,
            allergies: profile.allergies,
            chronic_conditions: profile.chronic_conditions,
            notes: profile.notes,
            is_main_profile: profile.is_main_profile,
            created_at: date_to_timestamp(&profile.created_at),
            updated_at: date_to_timestamp(&profile.updated_at),
        }
    }
}

impl TryFrom<FfiUserProfile> for UserProfile {
    type Error = MediTrackError;

    fn try_from(profile: FfiUserProfile) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            date_of_birth: date_from_ffi("date_of_birth", profile.date_of_birth)?,
            gender: profile.gender,
            blood_type: profile.blood_type,
            height: profile.height,
            weight: profile.weight,
            phone: profile.phone,
            email: profile.email,
            address: profile.address,
            emergency_contact_name: profile.emergency_contact_name,
            emergency_contact_phone: profile.emergency_contact_phone,
            emergency_contact_relation: profile.emergency_contact_relation,
            allergies: profile.allergies,
            chronic_conditions: profile.chronic_conditions,
            notes: profile.notes,
            is_main_profile: profile.is_main_profile,
            created_at: date_from_ffi("created_at", profile.created_at)?,
            updated_at: date_from_ffi("updated_at", profile.updated_at)?,
        })
    }
}

/// FFI-safe vault user.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiVaultUser {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<i64>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<VaultUser> for FfiVaultUser {
    fn from(user: VaultUser) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            date_of_birth: user.date_of_birth.as_ref().map(date_to_timestamp),
            blood_type: user.blood_type,
            allergies: user.allergies,
            emergency_contact: user.emergency_contact,
            created_at: date_to_timestamp(&user.created_at),
            updated_at: date_to_timestamp(&user.updated_at),
        }
    }
}

impl TryFrom<FfiVaultUser> for VaultUser {
    type Error = MediTrackError;

    fn try_from(user: FfiVaultUser) -> Result<Self, Self::Error> {
        Ok(VaultUser {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            date_of_birth: user
                .date_of_birth
                .map(|millis| date_from_ffi("date_of_birth", millis))
                .transpose()?,
            blood_type: user.blood_type,
            allergies: user.allergies,
            emergency_contact: user.emergency_contact,
            created_at: date_from_ffi("created_at", user.created_at)?,
            updated_at: date_from_ffi("updated_at", user.updated_at)?,
        })
    }
}

/// FFI-safe medical record.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiMedicalRecord {
    pub id: String,
    pub user_id: String,
    pub record_type: String,
    pub title: String,
    pub date: i64,
    pub doctor_name: Option<String>,
    pub description: Option<String>,
    pub attachments: Vec<String>,
}

impl From<MedicalRecord> for FfiMedicalRecord {
    fn from(record: MedicalRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            record_type: record.record_type.into(),
            title: record.title,
            date: date_to_timestamp(&record.date),
            doctor_name: record.doctor_name,
            description: record.description,
            attachments: record.attachments,
        }
    }
}

impl TryFrom<FfiMedicalRecord> for MedicalRecord {
    type Error = MediTrackError;

    fn try_from(record: FfiMedicalRecord) -> Result<Self, Self::Error> {
        Ok(MedicalRecord {
            id: record.id,
            user_id: record.user_id,
            record_type: RecordType::from(record.record_type),
            title: record.title,
            date: date_from_ffi("date", record.date)?,
            doctor_name: record.doctor_name,
            description: record.description,
            attachments: record.attachments,
        })
    }
}
