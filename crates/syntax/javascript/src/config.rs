//! `sprig.toml` configuration.
//!
//! Example:
//! ```toml
//! [globals]
//! defaults = true
//! include = ["React"]
//! exclude = ["name"]
//!
//! [output]
//! format = "compact"
//! ```

use std::path::{Path, PathBuf};

use rhizome_sprig_ir::{CompactFormatter, Formatter, RawFormatter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::globals::GlobalSet;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "sprig.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Which names count as host globals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalsConfig {
    /// Start from the built-in browser/Node snapshot.
    pub defaults: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for GlobalsConfig {
    fn default() -> Self {
        Self {
            defaults: true,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Compact,
    Raw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub globals: GlobalsConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `sprig.toml` from `dir` if it exists, otherwise the defaults.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn global_set(&self) -> GlobalSet {
        let mut globals = if self.globals.defaults {
            GlobalSet::host_default()
        } else {
            GlobalSet::empty()
        };
        for name in &self.globals.include {
            globals.include(name.as_str());
        }
        for name in &self.globals.exclude {
            globals.exclude(name);
        }
        globals
    }

    pub fn formatter(&self) -> Box<dyn Formatter> {
        match self.output.format {
            OutputFormat::Compact => Box::new(CompactFormatter),
            OutputFormat::Raw => Box::new(RawFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globals::GlobalScope;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.globals.defaults);
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert!(config.global_set().is_global("setTimeout"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml_str("[output]\nformat = \"raw\"\n").unwrap();
        assert!(config.globals.defaults);
        assert_eq!(config.output.format, OutputFormat::Raw);
        assert_eq!(config.formatter().format("(a\n\n)").unwrap(), "(a\n\n)");
    }

    #[test]
    fn test_global_overrides() {
        let config = Config::from_toml_str(
            r#"
[globals]
defaults = false
include = ["React", "name"]
exclude = ["name"]
"#,
        )
        .unwrap();
        let globals = config.global_set();
        assert!(globals.is_global("React"));
        assert!(!globals.is_global("name"));
        assert!(!globals.is_global("setTimeout"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("[globals]\nfoo = 1\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE)).unwrap();
        writeln!(file, "[globals]\ninclude = [\"React\"]").unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.globals.include, vec!["React".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::from_file(&dir.path().join("nope.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
