//! CLI argument definitions for the Vitrine terminal client.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Vitrine, a terminal client for the storefront shopping assistant.
#[derive(Parser, Debug)]
#[command(name = "vitrine", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Backend API base URL (e.g. http://localhost:8000/api/v1).
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Bearer token for an authenticated customer session.
    #[arg(short = 't', long = "token")]
    pub token: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VITRINE_CONFIG env var > ~/.vitrine/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VITRINE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the bearer token.
    ///
    /// Priority: --token flag > VITRINE_TOKEN env var > config file value.
    pub fn resolve_token(&self, config_token: Option<&str>) -> Option<String> {
        if let Some(ref t) = self.token {
            return Some(t.clone());
        }
        if let Ok(t) = std::env::var("VITRINE_TOKEN") {
            return Some(t);
        }
        config_token.map(str::to_string)
    }
}

fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".vitrine").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".vitrine").join("config.toml");
    }
    PathBuf::from("config.toml")
}
