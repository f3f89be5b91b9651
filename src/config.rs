//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/acqcfg/acqcfg.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `ACQCFG_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::FormatOptions;

/// Data directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = "data/handcarry22/rootified";

/// Setting queried when `get` is called without arguments.
pub const DEFAULT_SETTING: &str = "radiant.scalers.use_pps";

/// Group rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FormatSettings {
    /// Expand groups nested inside groups (false: legacy one-level output)
    pub expand_nested_groups: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            expand_nested_groups: true,
        }
    }
}

impl FormatSettings {
    pub fn options(&self) -> FormatOptions {
        FormatOptions {
            expand_nested_groups: self.expand_nested_groups,
        }
    }
}

/// Raw format settings for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFormatSettings {
    pub expand_nested_groups: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub default_setting: Option<String>,
    pub aliases: BTreeMap<String, String>,
    pub format: RawFormatSettings,
}

/// Unified configuration for acqcfg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the rootified run data (default: data/handcarry22/rootified)
    pub data_dir: PathBuf,
    /// Alias or path queried by default
    pub default_setting: String,
    /// Extra aliases, merged over the built-in ones
    pub aliases: BTreeMap<String, String>,
    /// Group rendering
    pub format: FormatSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_setting: DEFAULT_SETTING.to_string(),
            aliases: BTreeMap::new(),
            format: FormatSettings::default(),
        }
    }
}

/// Get the XDG config directory for acqcfg.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "acqcfg").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("acqcfg.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("load: explicit config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Defaults overlaid with a single file; no global config, no environment.
    pub fn load_from(path: &Path) -> ApplicationResult<Self> {
        let mut settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.expand_paths();
        Ok(settings)
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Aliases: key-wise union, overlay wins on conflicts
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut aliases = self.aliases.clone();
        aliases.extend(overlay.aliases.clone());
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            default_setting: overlay
                .default_setting
                .clone()
                .unwrap_or_else(|| self.default_setting.clone()),
            aliases,
            format: FormatSettings {
                expand_nested_groups: overlay
                    .format
                    .expand_nested_groups
                    .unwrap_or(self.format.expand_nested_groups),
            },
        }
    }

    /// Apply ACQCFG_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ACQCFG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("default_setting") {
            settings.default_setting = val;
        }
        if let Ok(val) = config.get_bool("format.expand_nested_groups") {
            settings.format.expand_nested_groups = val;
        }

        Ok(settings)
    }

    /// Expand `~` and `$VAR` in the data directory.
    fn expand_paths(&mut self) {
        let raw = self.data_dir.to_string_lossy().into_owned();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.data_dir = PathBuf::from(expanded.into_owned());
        }
    }

    /// Render as TOML (for `config show`).
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.data_dir, PathBuf::from("data/handcarry22/rootified"));
        assert_eq!(settings.default_setting, "radiant.scalers.use_pps");
        assert!(settings.aliases.is_empty());
        assert!(settings.format.expand_nested_groups);
    }

    #[test]
    fn test_merge_keeps_unspecified_values() {
        let base = Settings::default();
        let overlay = RawSettings {
            default_setting: Some("rf0_enabled".into()),
            aliases: BTreeMap::from([("period".to_string(), "radiant.scalers.period".to_string())]),
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.data_dir, base.data_dir);
        assert_eq!(merged.default_setting, "rf0_enabled");
        assert_eq!(
            merged.aliases.get("period").map(String::as_str),
            Some("radiant.scalers.period")
        );
        assert!(merged.format.expand_nested_groups);
    }

    #[test]
    fn test_merge_unions_aliases() {
        let base = Settings::default().merge_with(&RawSettings {
            aliases: BTreeMap::from([("a".to_string(), "x.a".to_string())]),
            ..Default::default()
        });
        let merged = base.merge_with(&RawSettings {
            aliases: BTreeMap::from([
                ("a".to_string(), "y.a".to_string()),
                ("b".to_string(), "y.b".to_string()),
            ]),
            format: RawFormatSettings {
                expand_nested_groups: Some(false),
            },
            ..Default::default()
        });
        assert_eq!(merged.aliases.len(), 2);
        assert_eq!(merged.aliases["a"], "y.a");
        assert!(!merged.format.options().expand_nested_groups);
    }

    #[test]
    fn test_to_toml_lists_effective_values() {
        let text = Settings::default().to_toml().unwrap();
        assert!(text.contains("data_dir = \"data/handcarry22/rootified\""));
        assert!(text.contains("default_setting = \"radiant.scalers.use_pps\""));
        assert!(text.contains("expand_nested_groups = true"));
    }
}
