//! User profile repository.

use super::RepoResult;
use crate::db::{LiveQuery, UserProfileDao};
use crate::models::UserProfile;

/// Access to user profiles for the UI layer.
pub struct UserProfileRepository<D> {
    dao: D,
}

impl<D: UserProfileDao> UserProfileRepository<D> {
    pub fn new(dao: D) -> Self {
        Self { dao }
    }

    /// Insert or replace a profile, returning its id.
    pub fn insert_user_profile(&self, profile: &UserProfile) -> RepoResult<i64> {
        Ok(self.dao.insert_profile(profile)?)
    }

    /// Returns rows affected; 0 when the profile does not exist.
    pub fn update_user_profile(&self, profile: &UserProfile) -> RepoResult<usize> {
        Ok(self.dao.update_profile(profile)?)
    }

    pub fn delete_user_profile(&self, profile: &UserProfile) -> RepoResult<usize> {
        Ok(self.dao.delete_profile(profile)?)
    }

    pub fn delete_user_profile_by_id(&self, id: i64) -> RepoResult<usize> {
        Ok(self.dao.delete_profile_by_id(id)?)
    }

    pub fn get_user_profile_by_id(&self, id: i64) -> RepoResult<Option<UserProfile>> {
        Ok(self.dao.get_profile(id)?)
    }

    /// The profile marked as the primary user, if any.
    pub fn get_main_user_profile(&self) -> RepoResult<Option<UserProfile>> {
        Ok(self.dao.get_main_profile()?)
    }

    pub fn set_main_user_profile(&self, id: i64) -> RepoResult<bool> {
        Ok(self.dao.set_main_profile(id)?)
    }

    /// Snapshot of all profiles by first name.
    pub fn list_user_profiles(&self) -> RepoResult<Vec<UserProfile>> {
        Ok(self.dao.list_profiles()?)
    }

    pub fn find_user_profiles(&self, query: &str) -> RepoResult<Vec<UserProfile>> {
        Ok(self.dao.search_profiles(query)?)
    }

    /// All profiles by first name, re-emitted on every change.
    pub fn get_all_user_profiles(&self) -> LiveQuery<Vec<UserProfile>> {
        self.dao.observe_profiles()
    }

    pub fn search_user_profiles(&self, query: &str) -> LiveQuery<Vec<UserProfile>> {
        self.dao.observe_profile_search(query)
    }
}
