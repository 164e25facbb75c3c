//! Record list for one user.

use super::record_item;
use crate::intent::Intent;
use crate::view::{Node, View};
use crate::viewmodel::RecordsUiState;

pub const LOADING: &str = "Loading...";

pub fn render(state: &RecordsUiState) -> View {
    let mut children = vec![Node::row(vec![
        Node::heading("Records"),
        Node::icon_button("Add Record", Intent::AddRecord).tagged("add_record_button"),
    ])];

    if let Some(error) = &state.error {
        children.push(Node::text(error.clone()).tagged("error_message"));
    }

    if state.is_loading {
        children.push(Node::text(LOADING).tagged("loading"));
    } else if state.records.is_empty() {
        children.push(
            Node::text(super::dashboard::NO_RECORDS)
                .tagged("empty_records")
                .clickable(Intent::AddRecord),
        );
    } else {
        children.push(
            Node::column(state.records.iter().map(record_item::render).collect())
                .tagged("record_list"),
        );
    }

    View::new(Node::column(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meditrack_core::models::{MedicalRecord, RecordType};

    fn state() -> RecordsUiState {
        RecordsUiState {
            user_id: "user1".into(),
            ..RecordsUiState::default()
        }
    }

    #[test]
    fn test_loading() {
        let view = render(&RecordsUiState {
            is_loading: true,
            ..state()
        });
        assert!(view.contains_text(LOADING));
        assert!(view.find_by_tag("record_list").is_none());
    }

    #[test]
    fn test_empty_list() {
        let view = render(&state());
        assert_eq!(view.click("empty_records"), Some(Intent::AddRecord));
    }

    #[test]
    fn test_list_and_error() {
        let record = MedicalRecord::new("user1".into(), RecordType::Diagnosis, "Flu".into());
        let view = render(&RecordsUiState {
            records: vec![record.clone()],
            error: Some("Storage error: database is locked".into()),
            ..state()
        });
        assert_eq!(view.find_by_tag("record_list").map(|n| n.children.len()), Some(1));
        assert_eq!(view.text_of("error_message"), Some("Storage error: database is locked"));
        assert_eq!(view.click_text("Flu"), Some(Intent::OpenRecord(record.id)));
    }
}
