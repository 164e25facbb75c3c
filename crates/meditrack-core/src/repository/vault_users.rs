//! Vault user repository.

use super::RepoResult;
use crate::db::{LiveQuery, VaultUserDao};
use crate::models::VaultUser;

/// Access to vault users for the UI layer.
pub struct VaultUserRepository<D> {
    dao: D,
}

impl<D: VaultUserDao> VaultUserRepository<D> {
    pub fn new(dao: D) -> Self {
        Self { dao }
    }

    pub fn save_user(&self, user: &VaultUser) -> RepoResult<()> {
        Ok(self.dao.insert_user(user)?)
    }

    pub fn update_user(&self, user: &VaultUser) -> RepoResult<usize> {
        Ok(self.dao.update_user(user)?)
    }

    pub fn delete_user(&self, user: &VaultUser) -> RepoResult<usize> {
        Ok(self.dao.delete_user(user)?)
    }

    pub fn delete_user_by_id(&self, user_id: &str) -> RepoResult<usize> {
        Ok(self.dao.delete_user_by_id(user_id)?)
    }

    pub fn get_user_by_id(&self, user_id: &str) -> RepoResult<Option<VaultUser>> {
        Ok(self.dao.get_user(user_id)?)
    }

    pub fn get_all_users(&self) -> RepoResult<Vec<VaultUser>> {
        Ok(self.dao.list_users()?)
    }

    pub fn observe_user(&self, user_id: &str) -> LiveQuery<Option<VaultUser>> {
        self.dao.observe_user(user_id)
    }

    pub fn observe_all_users(&self) -> LiveQuery<Vec<VaultUser>> {
        self.dao.observe_users()
    }
}
