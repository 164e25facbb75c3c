//! Data-access contracts, one per entity type.
//!
//! Repositories are generic over these traits so callers never depend on the
//! SQLite implementation directly.

use super::{DbResult, LiveQuery};
use crate::models::{MedicalRecord, RecordType, UserProfile, VaultUser};

/// Operations on MediTrack user profiles.
pub trait UserProfileDao {
    /// Insert or replace a profile. An id of 0 allocates a new id.
    ///
    /// Returns the stored id. Inserting a main profile demotes the current one.
    fn insert_profile(&self, profile: &UserProfile) -> DbResult<i64>;

    /// Overwrite an existing profile. Returns rows affected (0 if the id is unknown).
    fn update_profile(&self, profile: &UserProfile) -> DbResult<usize>;

    /// Delete a profile by its id. Returns rows removed.
    fn delete_profile(&self, profile: &UserProfile) -> DbResult<usize>;

    fn delete_profile_by_id(&self, id: i64) -> DbResult<usize>;

    fn get_profile(&self, id: i64) -> DbResult<Option<UserProfile>>;

    fn get_main_profile(&self) -> DbResult<Option<UserProfile>>;

    /// Make `id` the only main profile. Returns false if the id is unknown.
    fn set_main_profile(&self, id: i64) -> DbResult<bool>;

    /// All profiles ordered by first name.
    fn list_profiles(&self) -> DbResult<Vec<UserProfile>>;

    /// Profiles whose first or last name contains `query`.
    fn search_profiles(&self, query: &str) -> DbResult<Vec<UserProfile>>;

    fn observe_profiles(&self) -> LiveQuery<Vec<UserProfile>>;

    fn observe_profile_search(&self, query: &str) -> LiveQuery<Vec<UserProfile>>;
}

/// Operations on MediVault users.
pub trait VaultUserDao {
    /// Insert or replace a user.
    fn insert_user(&self, user: &VaultUser) -> DbResult<()>;

    fn update_user(&self, user: &VaultUser) -> DbResult<usize>;

    fn delete_user(&self, user: &VaultUser) -> DbResult<usize>;

    fn delete_user_by_id(&self, user_id: &str) -> DbResult<usize>;

    fn get_user(&self, user_id: &str) -> DbResult<Option<VaultUser>>;

    fn list_users(&self) -> DbResult<Vec<VaultUser>>;

    fn observe_user(&self, user_id: &str) -> LiveQuery<Option<VaultUser>>;

    fn observe_users(&self) -> LiveQuery<Vec<VaultUser>>;
}

/// Operations on medical records.
pub trait MedicalRecordDao {
    /// Insert or replace a record.
    fn insert_record(&self, record: &MedicalRecord) -> DbResult<()>;

    fn update_record(&self, record: &MedicalRecord) -> DbResult<usize>;

    fn delete_record(&self, record: &MedicalRecord) -> DbResult<usize>;

    fn delete_record_by_id(&self, id: &str) -> DbResult<usize>;

    fn get_record(&self, id: &str) -> DbResult<Option<MedicalRecord>>;

    /// Records owned by `user_id`, newest first.
    fn list_records_for_user(&self, user_id: &str) -> DbResult<Vec<MedicalRecord>>;

    fn list_records_by_type(
        &self,
        user_id: &str,
        record_type: &RecordType,
    ) -> DbResult<Vec<MedicalRecord>>;

    fn count_records_for_user(&self, user_id: &str) -> DbResult<usize>;

    fn observe_records_for_user(&self, user_id: &str) -> LiveQuery<Vec<MedicalRecord>>;

    fn observe_records_by_type(
        &self,
        user_id: &str,
        record_type: &RecordType,
    ) -> LiveQuery<Vec<MedicalRecord>>;
}
