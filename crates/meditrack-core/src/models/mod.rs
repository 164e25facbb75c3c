//! Domain models for MediTrack.

mod profile;
mod record;
mod vault_user;

pub use profile::*;
pub use record::*;
pub use vault_user::*;
