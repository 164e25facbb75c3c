//! A medical record in a list.

use meditrack_core::models::MedicalRecord;

use crate::intent::Intent;
use crate::text::format_date;
use crate::view::Node;

pub const NO_DOCTOR: &str = "No doctor specified";

/// Card showing title, type, date and doctor. Clicking it opens the record.
pub fn render(record: &MedicalRecord) -> Node {
    let doctor = record.doctor_name.as_deref().unwrap_or(NO_DOCTOR);
    Node::card(vec![
        Node::subtitle(record.title.clone()).tagged("record_item_title"),
        Node::row(vec![
            Node::text(record.record_type.as_str()).tagged("record_item_type"),
            Node::text(format_date(&record.date)).tagged("record_item_date"),
        ]),
        Node::text(doctor).tagged("record_item_doctor"),
    ])
    .tagged(format!("record_item_{}", record.id))
    .clickable(Intent::OpenRecord(record.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::View;
    use chrono::{TimeZone, Utc};
    use meditrack_core::models::RecordType;

    fn test_record() -> MedicalRecord {
        let mut record = MedicalRecord::new(
            "test-user-id".into(),
            RecordType::Diagnosis,
            "Test Record".into(),
        )
        .dated(Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap());
        record.id = "test-record-id".into();
        record.doctor_name = Some("Dr. Smith".into());
        record
    }

    #[test]
    fn test_displays_record_fields() {
        let view = View::new(render(&test_record()));
        for text in ["Test Record", "DIAGNOSIS", "Jan 01, 2023", "Dr. Smith"] {
            assert!(view.contains_text(text), "missing {text}");
        }
    }

    #[test]
    fn test_click_opens_record() {
        let view = View::new(render(&test_record()));
        assert_eq!(
            view.click_text("Test Record"),
            Some(Intent::OpenRecord("test-record-id".into()))
        );
    }

    #[test]
    fn test_missing_doctor() {
        let mut record = test_record();
        record.doctor_name = None;
        let view = View::new(render(&record));
        assert_eq!(view.text_of("record_item_doctor"), Some(NO_DOCTOR));
    }
}
