//! Screens. Each `render` is a pure function of the state it is given.

pub mod app;
pub mod dashboard;
pub mod navigation;
pub mod profile;
pub mod record_detail;
pub mod record_item;
pub mod records;
