//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::SchemaKind;

/// Application-level constants
pub const APP_NAME: &str = "MediTrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::db::SCHEMA_VERSION;

pub const MEDITRACK_DATABASE_NAME: &str = "meditrack_database";
pub const MEDIVAULT_DATABASE_NAME: &str = "medivault_database";

/// Log filter used when neither the caller nor `RUST_LOG` supplies one.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "meditrack_core=debug"
    } else {
        "meditrack_core=info"
    }
}

/// Runtime settings handed over by the host app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Directory that holds the database file
    pub data_dir: PathBuf,
    #[serde(default = "default_flavor")]
    pub flavor: SchemaKind,
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_flavor() -> SchemaKind {
    SchemaKind::MediTrack
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P, flavor: SchemaKind) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            flavor,
            log_filter: None,
        }
    }

    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Full path of the database file for the configured flavor.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(self.flavor.default_database_name())
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(default_log_filter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_meditrack() {
        assert_eq!(APP_NAME, "MediTrack");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn database_path_per_flavor() {
        let track = CoreConfig::new("/data/app", SchemaKind::MediTrack);
        assert_eq!(
            track.database_path(),
            PathBuf::from("/data/app").join(MEDITRACK_DATABASE_NAME)
        );

        let vault = CoreConfig::new("/data/app", SchemaKind::MediVault);
        assert!(vault.database_path().ends_with(MEDIVAULT_DATABASE_NAME));
    }

    #[test]
    fn from_json_defaults() {
        let config = CoreConfig::from_json(r#"{"data_dir": "/tmp/meditrack"}"#).unwrap();
        assert_eq!(config.flavor, SchemaKind::MediTrack);
        assert_eq!(config.log_filter(), default_log_filter());
    }

    #[test]
    fn from_json_full() {
        let config = CoreConfig::from_json(
            r#"{"data_dir": "/tmp/vault", "flavor": "medivault", "log_filter": "warn"}"#,
        )
        .unwrap();
        assert_eq!(config.flavor, SchemaKind::MediVault);
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn from_json_rejects_missing_dir() {
        assert!(CoreConfig::from_json("{}").is_err());
    }
}
