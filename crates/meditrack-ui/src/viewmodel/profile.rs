//! Profile view model.

use meditrack_core::db::UserProfileDao;
use meditrack_core::models::UserProfile;
use meditrack_core::repository::UserProfileRepository;

use super::{StateHolder, SubscriptionId};
use crate::screens;
use crate::view::View;

/// State behind the profile screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUiState {
    /// Profile on screen; the main profile after [`ProfileViewModel::load_main_profile`]
    pub profile: Option<UserProfile>,
    pub is_loading: bool,
    pub is_updating: bool,
    /// Outcome of the last save or update
    pub update_success: bool,
    pub error: Option<String>,
}

pub struct ProfileViewModel<D> {
    repository: UserProfileRepository<D>,
    state: StateHolder<ProfileUiState>,
}

impl<D: UserProfileDao> ProfileViewModel<D> {
    pub fn new(repository: UserProfileRepository<D>) -> Self {
        Self {
            repository,
            state: StateHolder::default(),
        }
    }

    pub fn state(&self) -> &ProfileUiState {
        self.state.get()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&ProfileUiState) + 'static,
    {
        self.state.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn load_main_profile(&mut self) {
        self.begin_loading();
        let result = self.repository.get_main_user_profile();
        self.finish_loading(result.map_err(|e| e.to_string()));
    }

    pub fn load_profile(&mut self, id: i64) {
        self.begin_loading();
        let result = self.repository.get_user_profile_by_id(id);
        self.finish_loading(result.map_err(|e| e.to_string()));
    }

    /// Store `profile` as the main profile and show it. Returns the new id.
    pub fn create_main_profile(&mut self, mut profile: UserProfile) -> Option<i64> {
        profile.is_main_profile = true;
        self.save(profile, true)
    }

    /// Store a family member. The profile on screen does not change.
    pub fn add_family_member(&mut self, mut profile: UserProfile) -> Option<i64> {
        profile.is_main_profile = false;
        self.save(profile, false)
    }

    /// Store edits to an existing profile.
    ///
    /// A profile saved as main replaces whatever is on screen, since storage
    /// demotes the previous main profile.
    pub fn update_profile(&mut self, mut profile: UserProfile) {
        profile.touch();
        self.begin_updating();

        let outcome = match self.repository.update_user_profile(&profile) {
            Ok(0) => Err(format!("Profile {} not found", profile.id)),
            Ok(_) => Ok(()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(()) => self.state.update(|s| {
                s.is_updating = false;
                s.update_success = true;
                let shown = s.profile.as_ref().map(|p| p.id) == Some(profile.id);
                if shown || profile.is_main_profile {
                    s.profile = Some(profile);
                }
            }),
            Err(error) => self.fail_update(error),
        }
    }

    pub fn render(&self) -> View {
        screens::profile::render(self.state())
    }

    fn save(&mut self, mut profile: UserProfile, show: bool) -> Option<i64> {
        self.begin_updating();
        match self.repository.insert_user_profile(&profile) {
            Ok(id) => {
                profile.id = id;
                self.state.update(|s| {
                    s.is_updating = false;
                    s.update_success = true;
                    if show {
                        s.profile = Some(profile);
                    }
                });
                Some(id)
            }
            Err(e) => {
                self.fail_update(e.to_string());
                None
            }
        }
    }

    fn begin_loading(&mut self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn finish_loading(&mut self, result: Result<Option<UserProfile>, String>) {
        match result {
            Ok(profile) => self.state.update(|s| {
                s.is_loading = false;
                s.profile = profile;
            }),
            Err(error) => {
                tracing::warn!(%error, "profile load failed");
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(error);
                });
            }
        }
    }

    fn begin_updating(&mut self) {
        self.state.update(|s| {
            s.is_updating = true;
            s.update_success = false;
            s.error = None;
        });
    }

    fn fail_update(&mut self, error: String) {
        tracing::warn!(%error, "profile update failed");
        self.state.update(|s| {
            s.is_updating = false;
            s.update_success = false;
            s.error = Some(error);
        });
    }
}
