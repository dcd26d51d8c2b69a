//! Shared tracing setup for the workspace binaries.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a configured filter is present.
pub const DEFAULT_FILTER: &str = "data_pipeline=info,report_common=info,remainders=info,\
turnovers=info,utils=info,settings_loader=info,ingest_reports=info,search_products=info";

/// Picks the filter directive: `RUST_LOG` first, then the configured value, then the default.
pub fn resolve_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = configured
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}

/// Initialize tracing for a binary. Calling it twice is harmless.
pub fn init(configured: Option<&str>) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(configured))
        .with_target(true)
        .try_init();

    if result.is_ok() {
        tracing::debug!("Logger initialized");
    }
}
