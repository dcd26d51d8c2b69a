//! # Settings Loader
//!
//! Centralized settings loading for the report ingestion tools.
//! It reads the `settings.json` file that holds the database directory, the collection
//! names records are appended to and an optional log filter.
//!
//! ## Features
//!
//! - Load settings from specified file paths
//! - Load settings from default location (`settings.json`)
//! - Fall back to built-in defaults when no settings file exists
//! - Apply `DATABASE_DIR` / `LOG_FILTER` environment overrides
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/my_settings.json")?;
//!
//! // Provided path, then settings.json, then defaults; env overrides on top
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_effective_settings(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";
pub const DATABASE_DIR_ENV: &str = "DATABASE_DIR";
pub const LOG_FILTER_ENV: &str = "LOG_FILTER";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from an explicit path when given, otherwise from `settings.json` if it
/// exists, otherwise the defaults.
///
/// An explicit path that cannot be read is an error; a missing default file is not.
pub fn load_settings_or_default(path: Option<&PathBuf>) -> Result<Settings> {
    if let Some(settings_path) = path {
        return load_settings(settings_path);
    }

    if settings_file_exists(DEFAULT_SETTINGS_FILE) {
        return load_settings(DEFAULT_SETTINGS_FILE);
    }

    tracing::debug!("No settings file found, using defaults");
    Ok(Settings::default())
}

/// Overrides fields from the environment. Empty variables are ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(
        settings,
        env::var(DATABASE_DIR_ENV).ok(),
        env::var(LOG_FILTER_ENV).ok(),
    );
}

fn apply_overrides(settings: &mut Settings, database_dir: Option<String>, log_filter: Option<String>) {
    if let Some(dir) = database_dir.filter(|d| !d.trim().is_empty()) {
        settings.database_dir = PathBuf::from(dir);
    }
    if let Some(filter) = log_filter.filter(|f| !f.trim().is_empty()) {
        settings.log_filter = Some(filter);
    }
}

/// Settings as the binaries use them: file (or defaults) plus environment overrides.
pub fn load_effective_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let mut settings = load_settings_or_default(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "database_dir": "/tmp/reports", "turnover_collection": "oborot" }}"#
        )
        .unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.database_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(settings.turnover_collection, "oborot");
        assert_eq!(settings.remainder_collection, "remainders");
    }

    #[test]
    fn test_load_settings_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_settings(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parsing settings JSON"));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_settings_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_overrides_replace_non_empty_values() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, Some("/data/db".to_string()), Some("  ".to_string()));

        assert_eq!(settings.database_dir, PathBuf::from("/data/db"));
        assert!(settings.log_filter.is_none());

        apply_overrides(&mut settings, None, Some("debug".to_string()));
        assert_eq!(settings.database_dir, PathBuf::from("/data/db"));
        assert_eq!(settings.log_filter.as_deref(), Some("debug"));
    }
}
