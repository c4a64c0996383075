//! `apigen.toml` configuration.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILENAME: &str = "apigen.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "./src/api/generated";

/// Settings as written by the user, in the config file or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigInput {
    pub input: Option<String>,
    pub output: Option<PathBuf>,
    pub pretty: Option<bool>,
}

impl ConfigInput {
    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: ConfigInput) -> ConfigInput {
        ConfigInput {
            input: overrides.input.or(self.input),
            output: overrides.output.or(self.output),
            pretty: overrides.pretty.or(self.pretty),
        }
    }
}

/// Settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File path or `http(s)://` URL of the document.
    pub input: String,
    /// Directory the IR is written to.
    pub output: PathBuf,
    /// Pretty-print the IR JSON.
    pub pretty: bool,
}

pub fn resolve_config(input: ConfigInput) -> Result<Config, String> {
    let source = input.input.filter(|value| !value.trim().is_empty()).ok_or_else(|| {
        format!("No input given. Pass --input or set `input` in {CONFIG_FILENAME}.")
    })?;
    Ok(Config {
        input: source,
        output: input
            .output
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        pretty: input.pretty.unwrap_or(true),
    })
}

pub fn read_config_file(path: &Path) -> Result<ConfigInput, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    toml::from_str(&contents).map_err(|err| format!("Failed to parse {}: {err}", path.display()))
}

/// Read the explicit config file, or `apigen.toml` in `dir` when present.
///
/// An explicit path that does not exist is an error; a missing default file
/// just means no file-level settings.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<ConfigInput, String> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }
        return read_config_file(path);
    }

    let default_path = dir.join(CONFIG_FILENAME);
    if default_path.is_file() {
        debug!(path = %default_path.display(), "Using config file.");
        return read_config_file(&default_path);
    }
    Ok(ConfigInput::default())
}
