//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development and the CLI
    Development,
    /// JSON structured output for unattended scheduler runs
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

const DEV_FILTER: &str = "fintrack=debug,fintrack_core=debug,fintrack_store=debug,fintrack_engine=debug";
const PROD_FILTER: &str = "fintrack=info,fintrack_core=info,fintrack_store=info,fintrack_engine=info";

/// Initialize the logging facility
///
/// Call once at process startup. Later calls are ignored. `RUST_LOG`
/// overrides the profile's default filter.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEV_FILTER)),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(PROD_FILTER)),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Test => {
            // Capture is installed through init_test_capture()
            tracing_subscriber::registry().init();
        }
    });
}
