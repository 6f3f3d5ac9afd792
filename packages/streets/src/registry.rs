//! Compile-time registry of the default dataset sources, plus operator
//! config loading.
//!
//! The default street-name and road-intersection sources are TOML files
//! under `datasets/`, embedded at compile time. Deployments that mirror
//! the layers elsewhere point [`CONFIG_ENV_VAR`] (or the CLI's `--config`)
//! at a TOML file with `[streets]` and `[intersections]` tables.

use std::path::Path;

use beavernet_streets_models::{IntersectionSource, ResolverConfig, StreetSource};

use crate::StreetsError;

/// Environment variable naming an operator config file.
pub const CONFIG_ENV_VAR: &str = "BEAVERNET_DATASETS";

/// Default HTTP timeout applied to the embedded configuration.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const STREET_SOURCE_TOML: &str = include_str!("../datasets/street_names.toml");
const INTERSECTION_SOURCE_TOML: &str = include_str!("../datasets/road_intersections.toml");

/// Returns the embedded street-name index source.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a compile-time
/// constant, a parse failure is a development error caught by the tests.
#[must_use]
pub fn street_source() -> StreetSource {
    toml::de::from_str(STREET_SOURCE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse dataset source 'street_names': {e}"))
}

/// Returns the embedded road-intersection index source.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse.
#[must_use]
pub fn intersection_source() -> IntersectionSource {
    toml::de::from_str(INTERSECTION_SOURCE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse dataset source 'road_intersections': {e}"))
}

/// Returns the configuration built from the embedded sources.
#[must_use]
pub fn default_config() -> ResolverConfig {
    ResolverConfig {
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        streets: street_source(),
        intersections: intersection_source(),
    }
}

/// Parses a resolver configuration from TOML text.
///
/// # Errors
///
/// Returns [`StreetsError::Config`] if the TOML is malformed or missing
/// a required table.
pub fn parse_config(toml_str: &str) -> Result<ResolverConfig, StreetsError> {
    toml::de::from_str(toml_str).map_err(|e| StreetsError::Config {
        message: e.to_string(),
    })
}

/// Loads a resolver configuration from a TOML file.
///
/// # Errors
///
/// Returns [`StreetsError`] if the file cannot be read or parsed.
pub fn config_from_path(path: &Path) -> Result<ResolverConfig, StreetsError> {
    let toml_str = std::fs::read_to_string(path).map_err(|e| StreetsError::Config {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    parse_config(&toml_str)
}

/// Resolves the configuration to use: an explicit path wins, then
/// [`CONFIG_ENV_VAR`], then the embedded defaults.
///
/// # Errors
///
/// Returns [`StreetsError`] if an explicitly named file cannot be read
/// or parsed.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ResolverConfig, StreetsError> {
    if let Some(path) = explicit {
        log::info!("Loading dataset config from {}", path.display());
        return config_from_path(path);
    }

    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            log::info!("Loading dataset config from {CONFIG_ENV_VAR}={path}");
            config_from_path(Path::new(path.trim()))
        }
        _ => {
            log::debug!("Using embedded dataset config");
            Ok(default_config())
        }
    }
}
