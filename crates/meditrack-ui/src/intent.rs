//! User actions emitted by screens.

use crate::screens::navigation::Route;

/// An action a user can trigger from a screen.
///
/// `Edit` and `Delete` refer to whatever the current screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Back,
    Edit,
    Delete,
    Navigate(Route),
    OpenRecord(String),
    AddRecord,
    ScheduleAppointment,
    AddMedication,
    CreateProfile,
    AddFamilyMember,
    EditProfile(i64),
}
