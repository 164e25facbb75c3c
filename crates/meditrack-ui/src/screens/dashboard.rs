//! Dashboard: overview cards for records, appointments and medications.

use meditrack_core::models::MedicalRecord;

use super::navigation::Route;
use super::record_item;
use crate::intent::Intent;
use crate::view::{Node, View};

/// Recent records shown on the dashboard.
pub const RECENT_RECORD_LIMIT: usize = 5;

pub const NO_RECORDS: &str = "No records yet. Click to add your first record.";
pub const NO_APPOINTMENTS: &str = "No upcoming appointments. Click to schedule one.";
pub const NO_MEDICATIONS: &str = "No medications added yet. Click to add medications.";

fn overview_card(title: &str, tag: &str, body: Vec<Node>, intent: Intent) -> Node {
    let mut children = vec![Node::subtitle(title)];
    children.extend(body);
    Node::card(children).tagged(tag).clickable(intent)
}

/// Render the dashboard. `records` is expected newest first.
pub fn render(records: &[MedicalRecord]) -> View {
    let recent = if records.is_empty() {
        overview_card(
            "Recent Records",
            "recent_records_card",
            vec![Node::text(NO_RECORDS)],
            Intent::AddRecord,
        )
    } else {
        overview_card(
            "Recent Records",
            "recent_records_card",
            records
                .iter()
                .take(RECENT_RECORD_LIMIT)
                .map(record_item::render)
                .collect(),
            Intent::Navigate(Route::Records),
        )
    };

    View::new(Node::column(vec![
        Node::heading("Dashboard"),
        recent,
        overview_card(
            "Upcoming Appointments",
            "appointments_card",
            vec![Node::text(NO_APPOINTMENTS)],
            Intent::ScheduleAppointment,
        ),
        overview_card(
            "My Medications",
            "medications_card",
            vec![Node::text(NO_MEDICATIONS)],
            Intent::AddMedication,
        ),
    ]))
}
