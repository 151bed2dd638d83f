//! Command-line interface configuration
//!
//! The [Config] type provides defaults for the flash geometry used when an
//! `erase-region` invocation does not spell out the region explicitly. It is
//! read from an optional `uf2patch.toml`, looked up first in the working
//! directory and then in the platform configuration directory.

use std::{fs::read_to_string, path::PathBuf};

use directories::ProjectDirs;
use log::debug;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};

/// Flash geometry and fill defaults
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default, rename_all = "kebab-case")]
pub struct FlashConfig {
    /// Total flash capacity in bytes
    pub capacity: u32,
    /// Size of the reserved region at the top of flash, in bytes
    pub reserved: u32,
    /// Byte value erased flash reads back as
    pub fill_byte: u8,
}

impl Default for FlashConfig {
    fn default() -> Self {
        // The blackbird reservation: the last 16 KiB of a 2 MiB flash.
        Self {
            capacity: 2 * 1024 * 1024,
            reserved: 16 * 1024,
            fill_byte: 0xFF,
        }
    }
}

/// Deserialized `uf2patch.toml`
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Flash layout defaults
    pub flash: FlashConfig,
}

impl Config {
    /// Load the configuration file, or the built-in defaults when none
    /// exists.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        let raw = read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to parse {}", path.display()))?;

        debug!("config loaded from {}: {:#?}", path.display(), config);
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        const FILENAME: &str = "uf2patch.toml";

        if let Ok(current_dir) = std::env::current_dir() {
            let local = current_dir.join(FILENAME);
            if local.exists() {
                return Some(local);
            }
        }

        let project_dirs = ProjectDirs::from("", "", "uf2patch")?;
        let global = project_dirs.config_dir().join(FILENAME);
        global.exists().then_some(global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_two_mebibyte_flash() {
        let config = Config::default();
        assert_eq!(config.flash.capacity, 0x20_0000);
        assert_eq!(config.flash.reserved, 0x4000);
        assert_eq!(config.flash.fill_byte, 0xFF);
    }

    #[test]
    fn partial_files_keep_remaining_defaults() {
        let config: Config = toml::from_str(
            r#"
            [flash]
            reserved = 8192
            "#,
        )
        .unwrap();

        assert_eq!(config.flash.reserved, 8192);
        assert_eq!(config.flash.capacity, 2 * 1024 * 1024);
        assert_eq!(config.flash.fill_byte, 0xFF);
    }

    #[test]
    fn kebab_case_keys_are_accepted() {
        let config: Config = toml::from_str(
            r#"
            [flash]
            fill-byte = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.flash.fill_byte, 0x00);
    }
}
