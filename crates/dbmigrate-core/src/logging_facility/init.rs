//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.
//! Output goes to stderr so that command results printed on stdout stay
//! machine readable.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output with debug level
    Development,
    /// JSON structured output with info level
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "dbmigrate=debug",
            Profile::Production => "dbmigrate=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at application startup; later calls are ignored, and so is a
/// call made after some other global subscriber was installed. `RUST_LOG`
/// overrides the profile's default filter.
///
/// # Example
///
/// ```
/// use dbmigrate_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .finish()
                    .try_init()
                    .ok();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .finish()
                    .try_init()
                    .ok();
            }
            Profile::Test => {
                // Test capture is installed separately via init_test_capture()
                tracing_subscriber::registry().try_init().ok();
            }
        }
    });
}
