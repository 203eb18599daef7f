//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursetree/coursetree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `COURSETREE_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::IdStrategy;

/// Interactive shell settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt shown before each command
    pub prompt: String,
    /// Colored output (NO_COLOR still wins)
    pub color: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "coursetree>".into(),
            color: true,
        }
    }
}

/// Unified configuration for coursetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How node ids are issued: "counter" or "clock"
    pub id_strategy: IdStrategy,
    /// Scheme prefix of image/PDF payload references
    pub blob_scheme: String,
    /// Text of the help alert
    pub help_message: String,
    /// Text of the contact alert
    pub contact_message: String,
    /// Shell settings
    pub shell: ShellConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Counter,
            blob_scheme: "blob".into(),
            help_message: "Help: This is a Course Builder tool where you can create courses, \
                           add modules, and attach resources."
                .into(),
            contact_message: "Contact Us: For any inquiries, please reach out to us at \
                              support@example.com."
                .into(),
            shell: ShellConfig::default(),
        }
    }
}

/// Get the XDG config directory for coursetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursetree.toml"))
}

impl Settings {
    /// Load settings from all layers.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("id_strategy", defaults.id_strategy.to_string())
            .map_err(config_err)?
            .set_default("blob_scheme", defaults.blob_scheme.clone())
            .map_err(config_err)?
            .set_default("help_message", defaults.help_message.clone())
            .map_err(config_err)?
            .set_default("contact_message", defaults.contact_message.clone())
            .map_err(config_err)?
            .set_default("shell.prompt", defaults.shell.prompt.clone())
            .map_err(config_err)?
            .set_default("shell.color", defaults.shell.color)
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("COURSETREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        let scheme_ok = !self.blob_scheme.is_empty()
            && self
                .blob_scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(ApplicationError::Config {
                message: format!("invalid blob_scheme: {:?}", self.blob_scheme),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coursetree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/coursetree/coursetree.toml
#   Explicit: --config <file>
#   Env:      COURSETREE_* environment variables (COURSETREE_SHELL__PROMPT for [shell] prompt)

# How node ids are issued: "counter" (1, 2, 3, ...) or "clock" (millisecond timestamps)
# id_strategy = "counter"

# Scheme of references created for image and PDF files
# blob_scheme = "blob"

# help_message = "Help: ..."
# contact_message = "Contact Us: ..."

[shell]
# prompt = "coursetree>"
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_validating_then_ok() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.id_strategy, IdStrategy::Counter);
        assert_eq!(settings.blob_scheme, "blob");
    }

    #[test]
    fn given_scheme_with_colon_when_validating_then_rejected() {
        let settings = Settings {
            blob_scheme: "blob:".into(),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("invalid blob_scheme"));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let parsed: Settings = toml::from_str(&Settings::template()).expect("template parses");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_settings_when_serialized_then_parses_back() {
        let settings = Settings {
            id_strategy: IdStrategy::Clock,
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("id_strategy = \"clock\""));
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
