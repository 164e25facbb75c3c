//! MediTrack UI Layer
//!
//! Platform-neutral screens and view models on top of `meditrack-core`.
//!
//! Screens are pure functions from state to a [`View`] tree. Clickable nodes
//! carry an [`Intent`]; the host looks it up with [`View::click`] and hands
//! it to a view model, which updates its state and notifies subscribers.
//!
//! # Modules
//!
//! - [`view`]: View tree, nodes and test-tag lookup
//! - [`intent`]: User actions emitted by screens
//! - [`screens`]: Dashboard, profile, record list/detail and navigation
//! - [`viewmodel`]: State holders for profiles and records
//! - [`text`]: Display formatting helpers

pub mod intent;
pub mod screens;
pub mod text;
pub mod view;
pub mod viewmodel;

pub use intent::Intent;
pub use screens::navigation::{Navigator, Route};
pub use view::{Node, NodeKind, View};
pub use viewmodel::{
    ProfileUiState, ProfileViewModel, RecordsUiState, RecordsViewModel, StateHolder,
};
