//! Logging setup.
//!
//! The subscriber is built from [`LoggingConfig`] into a [`Dispatch`] owned by
//! the composition root, which installs it exactly once at startup.

use tracing::Dispatch;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Map a configured level to a filter directive; unknown values yield `None`.
fn level_directive(level: &str) -> Option<&'static str> {
    let level = level.trim().to_ascii_lowercase();
    LEVELS.into_iter().find(|known| *known == level)
}

/// A built, not yet installed, logging pipeline.
pub struct Logging {
    dispatch: Dispatch,
    filter: String,
    rejected: Option<String>,
}

impl Logging {
    /// Build the subscriber described by `config`.
    ///
    /// A full `filter` directive wins over `level`. An unknown `level` or an
    /// unparsable `filter` falls back to `info`; the rejected value is
    /// reported once the pipeline is installed.
    #[must_use]
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut rejected = None;

        let env_filter = match config.filter.as_deref().map(EnvFilter::try_new) {
            Some(Ok(filter)) => filter,
            other => {
                if let Some(Err(_)) = other {
                    rejected = config.filter.clone();
                }
                let level = level_directive(&config.level).unwrap_or_else(|| {
                    if rejected.is_none() {
                        rejected = Some(config.level.clone());
                    }
                    "info"
                });
                EnvFilter::new(level)
            }
        };
        let filter = env_filter.to_string();

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
            filter,
            rejected,
        }
    }

    /// Install this pipeline as the process-wide subscriber.
    ///
    /// # Errors
    ///
    /// Fails if a subscriber was already installed.
    pub fn install(self) -> Result<(), SetGlobalDefaultError> {
        tracing::dispatcher::set_global_default(self.dispatch)?;
        if let Some(value) = self.rejected {
            tracing::warn!(value, fallback = "info", "unusable log level, falling back");
        }
        tracing::info!(filter = %self.filter, "logging initialized");
        Ok(())
    }
}
