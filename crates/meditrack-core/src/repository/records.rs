//! Medical record repository.

use super::RepoResult;
use crate::db::{LiveQuery, MedicalRecordDao};
use crate::models::{MedicalRecord, RecordType};

/// Access to medical records for the UI layer.
pub struct MedicalRecordRepository<D> {
    dao: D,
}

impl<D: MedicalRecordDao> MedicalRecordRepository<D> {
    pub fn new(dao: D) -> Self {
        Self { dao }
    }

    /// Insert or replace a record.
    pub fn save_record(&self, record: &MedicalRecord) -> RepoResult<()> {
        Ok(self.dao.insert_record(record)?)
    }

    pub fn update_record(&self, record: &MedicalRecord) -> RepoResult<usize> {
        Ok(self.dao.update_record(record)?)
    }

    pub fn delete_record(&self, record: &MedicalRecord) -> RepoResult<usize> {
        Ok(self.dao.delete_record(record)?)
    }

    pub fn delete_record_by_id(&self, id: &str) -> RepoResult<usize> {
        Ok(self.dao.delete_record_by_id(id)?)
    }

    pub fn get_record_by_id(&self, id: &str) -> RepoResult<Option<MedicalRecord>> {
        Ok(self.dao.get_record(id)?)
    }

    pub fn count_records_for_user(&self, user_id: &str) -> RepoResult<usize> {
        Ok(self.dao.count_records_for_user(user_id)?)
    }

    pub fn list_records_for_user(&self, user_id: &str) -> RepoResult<Vec<MedicalRecord>> {
        Ok(self.dao.list_records_for_user(user_id)?)
    }

    pub fn list_records_by_type(
        &self,
        user_id: &str,
        record_type: &RecordType,
    ) -> RepoResult<Vec<MedicalRecord>> {
        Ok(self.dao.list_records_by_type(user_id, record_type)?)
    }

    /// A user's records, newest first, re-emitted on every change.
    pub fn get_records_by_user_id(&self, user_id: &str) -> LiveQuery<Vec<MedicalRecord>> {
        self.dao.observe_records_for_user(user_id)
    }

    pub fn get_records_by_type(
        &self,
        user_id: &str,
        record_type: &RecordType,
    ) -> LiveQuery<Vec<MedicalRecord>> {
        self.dao.observe_records_by_type(user_id, record_type)
    }
}
