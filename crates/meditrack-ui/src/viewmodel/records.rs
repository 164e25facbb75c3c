//! Records view model: a user's record list plus the selected record.

use std::time::Duration;

use meditrack_core::db::{DbResult, LiveQuery, MedicalRecordDao};
use meditrack_core::models::MedicalRecord;
use meditrack_core::repository::MedicalRecordRepository;

use super::{StateHolder, SubscriptionId};
use crate::intent::Intent;
use crate::screens;
use crate::view::View;

/// State behind the record list and detail screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsUiState {
    pub user_id: String,
    /// Newest first
    pub records: Vec<MedicalRecord>,
    /// Record shown on the detail screen
    pub selected: Option<MedicalRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct RecordsViewModel<D> {
    repository: MedicalRecordRepository<D>,
    live: LiveQuery<Vec<MedicalRecord>>,
    state: StateHolder<RecordsUiState>,
}

impl<D: MedicalRecordDao> RecordsViewModel<D> {
    /// Start observing `user_id`'s records. Nothing is loaded until
    /// [`refresh`](Self::refresh) or [`wait_for_change`](Self::wait_for_change).
    pub fn new(repository: MedicalRecordRepository<D>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let live = repository.get_records_by_user_id(&user_id);
        Self {
            repository,
            live,
            state: StateHolder::new(RecordsUiState {
                user_id,
                is_loading: true,
                ..RecordsUiState::default()
            }),
        }
    }

    pub fn state(&self) -> &RecordsUiState {
        self.state.get()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&RecordsUiState) + 'static,
    {
        self.state.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Apply the latest pending emission, if any. Never blocks.
    pub fn refresh(&mut self) -> bool {
        let mut latest = None;
        while let Some(result) = self.live.try_next() {
            latest = Some(result);
        }
        match latest {
            Some(result) => {
                self.apply(result);
                true
            }
            None => false,
        }
    }

    /// Block up to `timeout` for a change and apply it.
    pub fn wait_for_change(&mut self, timeout: Duration) -> bool {
        match self.live.next_timeout(timeout) {
            Some(result) => {
                self.apply(result);
                true
            }
            None => false,
        }
    }

    /// Handle an intent. Intents this view model does not own are handed back.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Intent> {
        tracing::debug!(?intent, user_id = %self.state().user_id, "records intent");
        match intent {
            Intent::OpenRecord(id) => {
                self.select(&id);
                None
            }
            Intent::Back if self.state().selected.is_some() => {
                self.state.update(|s| s.selected = None);
                None
            }
            Intent::Delete if self.state().selected.is_some() => {
                self.delete_selected();
                None
            }
            other => Some(other),
        }
    }

    pub fn render_list(&self) -> View {
        screens::records::render(self.state())
    }

    pub fn render_detail(&self) -> View {
        screens::record_detail::render(self.state().selected.as_ref())
    }

    pub fn render_dashboard(&self) -> View {
        screens::dashboard::render(&self.state().records)
    }

    fn apply(&mut self, result: DbResult<Vec<MedicalRecord>>) {
        match result {
            Ok(records) => self.state.update(|s| {
                s.selected = s
                    .selected
                    .as_ref()
                    .and_then(|selected| records.iter().find(|r| r.id == selected.id).cloned());
                s.records = records;
                s.is_loading = false;
                s.error = None;
            }),
            Err(e) => {
                tracing::warn!(error = %e, "record query failed");
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
            }
        }
    }

    fn select(&mut self, id: &str) {
        let cached = self.state().records.iter().find(|r| r.id == id).cloned();
        let found = match cached {
            Some(record) => Ok(Some(record)),
            None => self.repository.get_record_by_id(id),
        };
        match found {
            Ok(record) => self.state.update(|s| {
                s.selected = record;
                s.error = None;
            }),
            Err(e) => self.state.update(|s| s.error = Some(e.to_string())),
        }
    }

    fn delete_selected(&mut self) {
        let Some(record) = self.state().selected.clone() else {
            return;
        };
        match self.repository.delete_record(&record) {
            Ok(_) => {
                self.state.update(|s| s.selected = None);
                self.refresh();
            }
            Err(e) => self.state.update(|s| s.error = Some(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meditrack_core::db::MediVaultDatabase;
    use meditrack_core::models::RecordType;

    fn make_record(id: &str, user_id: &str, millis: i64) -> MedicalRecord {
        let mut record = MedicalRecord::new(user_id.into(), RecordType::Diagnosis, format!("Record {id}"))
            .dated(meditrack_core::convert::timestamp_to_date(millis).unwrap());
        record.id = id.into();
        record
    }

    fn setup() -> (MediVaultDatabase, RecordsViewModel<MediVaultDatabase>) {
        let db = MediVaultDatabase::open_in_memory().unwrap();
        let vm = RecordsViewModel::new(MedicalRecordRepository::new(db.clone()), "user1");
        (db, vm)
    }

    #[test]
    fn test_initial_refresh() {
        let (db, mut vm) = setup();
        MedicalRecordRepository::new(db)
            .save_record(&make_record("rec1", "user1", 1_000))
            .unwrap();

        assert!(vm.state().is_loading);
        assert!(vm.refresh());
        assert!(!vm.state().is_loading);
        assert_eq!(vm.state().records.len(), 1);
        assert!(!vm.refresh());
    }

    #[test]
    fn test_refresh_picks_up_writes() {
        let (db, mut vm) = setup();
        vm.refresh();
        let repo = MedicalRecordRepository::new(db);

        repo.save_record(&make_record("rec1", "user1", 1_000)).unwrap();
        repo.save_record(&make_record("rec2", "user1", 2_000)).unwrap();
        repo.save_record(&make_record("rec3", "user2", 3_000)).unwrap();

        assert!(vm.refresh());
        let ids: Vec<&str> = vm.state().records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec2", "rec1"]);
    }

    #[test]
    fn test_open_back_and_delete() {
        let (db, mut vm) = setup();
        MedicalRecordRepository::new(db)
            .save_record(&make_record("rec1", "user1", 1_000))
            .unwrap();
        vm.refresh();

        let intent = vm.render_list().click_text("Record rec1").unwrap();
        assert_eq!(vm.dispatch(intent), None);
        assert_eq!(vm.render_detail().text_of("record_title"), Some("Record rec1"));

        let back = vm.render_detail().click("back_button").unwrap();
        assert_eq!(vm.dispatch(back), None);
        assert!(vm.state().selected.is_none());
        assert_eq!(vm.dispatch(Intent::Back), Some(Intent::Back));

        vm.dispatch(Intent::OpenRecord("rec1".into()));
        let delete = vm.render_detail().click("delete_button").unwrap();
        assert_eq!(vm.dispatch(delete), None);
        assert!(vm.state().selected.is_none());
        assert!(vm.state().records.is_empty());
        assert!(vm.render_detail().contains_text(screens::record_detail::NO_RECORD));
    }

    #[test]
    fn test_unhandled_intents_returned() {
        let (_db, mut vm) = setup();
        assert_eq!(vm.dispatch(Intent::Edit), Some(Intent::Edit));
        assert_eq!(vm.dispatch(Intent::AddRecord), Some(Intent::AddRecord));
        assert_eq!(vm.dispatch(Intent::Delete), Some(Intent::Delete));
    }

    #[test]
    fn test_open_unknown_record() {
        let (_db, mut vm) = setup();
        vm.refresh();
        vm.dispatch(Intent::OpenRecord("missing".into()));
        assert!(vm.state().selected.is_none());
        assert!(vm.state().error.is_none());
    }

    #[test]
    fn test_selection_follows_updates() {
        let (db, mut vm) = setup();
        let repo = MedicalRecordRepository::new(db);
        let mut record = make_record("rec1", "user1", 1_000);
        repo.save_record(&record).unwrap();
        vm.refresh();
        vm.dispatch(Intent::OpenRecord("rec1".into()));

        record.title = "Renamed".into();
        repo.update_record(&record).unwrap();
        vm.refresh();
        assert_eq!(vm.state().selected.as_ref().map(|r| r.title.as_str()), Some("Renamed"));

        repo.delete_record(&record).unwrap();
        vm.refresh();
        assert!(vm.state().selected.is_none());
    }

    #[test]
    fn test_wait_for_change_times_out() {
        let (_db, mut vm) = setup();
        assert!(vm.wait_for_change(Duration::from_millis(10)));
        assert!(!vm.wait_for_change(Duration::from_millis(10)));
    }
}
