// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rxplan.toml` > `~/.config/rxplan/rxplan.toml` > `/etc/rxplan/rxplan.toml`
//! with environment variable overrides via `RXPLAN_` prefix and a bare `PORT`.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RxplanConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rxplan/rxplan.toml` (system-wide)
/// 3. `~/.config/rxplan/rxplan.toml` (user XDG config)
/// 4. `./rxplan.toml` (local directory)
/// 5. `PORT` (platform-provided listen port)
/// 6. `RXPLAN_*` environment variables
pub fn load_config() -> Result<RxplanConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RxplanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RxplanConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RxplanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RxplanConfig::default()))
        .merge(Toml::file(path))
        .merge(port_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RxplanConfig::default()))
        .merge(Toml::file("/etc/rxplan/rxplan.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rxplan/rxplan.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rxplan.toml"))
        .merge(port_provider())
        .merge(env_provider())
}

/// Maps the conventional `PORT` variable onto `server.port`.
fn port_provider() -> Env {
    Env::raw().only(&["PORT"]).map(|_| "server.port".into())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `RXPLAN_REFERENCE_PARTD_URL` must map to `reference.partd_url`,
/// not `reference.partd.url`.
fn env_provider() -> Env {
    Env::prefixed("RXPLAN_").map(|key| {
        // figment hands over the stripped key in its original case.
        let key = key.as_str().to_ascii_lowercase();
        for section in ["server", "reference", "classifier"] {
            if let Some(field) = key
                .strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return format!("{section}.{field}").into();
            }
        }
        key.into()
    })
}
