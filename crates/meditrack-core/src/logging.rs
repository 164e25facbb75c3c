//! Logging initialization.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::config::default_log_filter;

static INIT_ONCE: Once = Once::new();

/// Install the fmt subscriber.
///
/// `RUST_LOG` wins over `filter`, which wins over [`default_log_filter`].
/// Only the first call has any effect. A subscriber installed by the host
/// process beforehand is left in place.
pub fn init(filter: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(default_log_filter())));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init()
            .is_ok();
        if installed {
            tracing::info!("{} core v{}", crate::config::APP_NAME, crate::config::APP_VERSION);
        }
    });
}
