//! Repositories: pass-through wrappers over the data-access contracts.
//!
//! Every operation forwards its arguments to the DAO unchanged and returns the
//! DAO's result, with storage failures surfaced as [`RepositoryError`]. There
//! is no caching or retrying here.

mod profiles;
mod records;
mod vault_users;

pub use profiles::*;
pub use records::*;
pub use vault_users::*;

use thiserror::Error;

use crate::db::DbError;

/// Repository errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type RepoResult<T> = Result<T, RepositoryError>;
