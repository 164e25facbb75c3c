//! Full view of one medical record.

use meditrack_core::models::MedicalRecord;

use crate::intent::Intent;
use crate::text::format_date;
use crate::view::{Node, View};

pub const NO_RECORD: &str = "No record found";

fn toolbar() -> Node {
    Node::row(vec![
        Node::icon_button("Back", Intent::Back).tagged("back_button"),
        Node::subtitle("Medical Record"),
        Node::row(vec![
            Node::icon_button("Edit", Intent::Edit).tagged("edit_button"),
            Node::icon_button("Delete", Intent::Delete).tagged("delete_button"),
        ]),
    ])
}

pub fn render(record: Option<&MedicalRecord>) -> View {
    let body = match record {
        None => Node::column(vec![Node::text(NO_RECORD).tagged("no_record")]),
        Some(record) => {
            let mut fields = vec![
                Node::heading(record.title.clone()).tagged("record_title"),
                Node::text(format!("Type: {}", record.record_type)).tagged("record_type"),
                Node::text(format!("Date: {}", format_date(&record.date))).tagged("record_date"),
            ];
            if let Some(doctor) = &record.doctor_name {
                fields.push(Node::text(format!("Doctor: {doctor}")).tagged("record_doctor"));
            }
            if let Some(description) = &record.description {
                fields.push(Node::subtitle("Description:"));
                fields.push(Node::text(description.clone()).tagged("record_description"));
            }
            if record.has_attachments() {
                fields.push(Node::subtitle("Attachments:"));
                fields.extend(
                    record
                        .attachments
                        .iter()
                        .map(|attachment| Node::text(attachment.clone()).tagged("record_attachment")),
                );
            }
            Node::column(fields)
        }
    };

    View::new(Node::column(vec![toolbar(), body]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use meditrack_core::models::RecordType;

    fn test_record() -> MedicalRecord {
        let mut record = MedicalRecord::new("user456".into(), RecordType::Diagnosis, "Annual Checkup".into())
            .dated(Utc.timestamp_millis_opt(1_672_531_200_000).unwrap());
        record.id = "rec123".into();
        record.doctor_name = Some("Dr. Smith".into());
        record.description = Some("Regular checkup, all clear.".into());
        record.attachments = vec!["blood_test.pdf".into(), "xray.jpg".into()];
        record
    }

    #[test]
    fn test_displays_fields() {
        let record = test_record();
        let view = render(Some(&record));
        assert_eq!(view.text_of("record_title"), Some("Annual Checkup"));
        assert_eq!(view.text_of("record_type"), Some("Type: DIAGNOSIS"));
        assert_eq!(view.text_of("record_date"), Some("Date: Jan 01, 2023"));
        assert_eq!(view.text_of("record_doctor"), Some("Doctor: Dr. Smith"));
        assert_eq!(view.text_of("record_description"), Some("Regular checkup, all clear."));
    }

    #[test]
    fn test_displays_attachments() {
        let record = test_record();
        let view = render(Some(&record));
        assert!(view.contains_text("Attachments:"));
        let attachments: Vec<&str> = view
            .find_all_by_tag("record_attachment")
            .into_iter()
            .filter_map(|node| node.text.as_deref())
            .collect();
        assert_eq!(attachments, vec!["blood_test.pdf", "xray.jpg"]);
    }

    #[test]
    fn test_optional_sections_hidden() {
        let mut record = test_record();
        record.doctor_name = None;
        record.description = None;
        record.attachments.clear();
        let view = render(Some(&record));

        assert!(view.find_by_tag("record_doctor").is_none());
        assert!(view.find_by_tag("record_description").is_none());
        assert!(!view.contains_text("Attachments:"));
    }

    #[test]
    fn test_toolbar_intents() {
        let record = test_record();
        let view = render(Some(&record));
        assert_eq!(view.click("back_button"), Some(Intent::Back));
        assert_eq!(view.click("edit_button"), Some(Intent::Edit));
        assert_eq!(view.click("delete_button"), Some(Intent::Delete));
    }

    #[test]
    fn test_missing_record() {
        let view = render(None);
        assert!(view.contains_text(NO_RECORD));
        assert!(view.find_by_tag("record_title").is_none());
        assert_eq!(view.click("back_button"), Some(Intent::Back));
    }
}
