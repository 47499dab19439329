//! TOML configuration and command-line overrides.
//!
//! Every value is optional. Resolution order for each field:
//! command-line flag, then config file, then the built-in default.
//!
//! ```toml
//! [section]
//! diameter = 400.0
//! bar_diameter = 20.0
//! bar_count = 3
//! cover = 30.0
//!
//! [materials]
//! fc = 32.0
//! fy = 500.0
//!
//! [output]
//! dir = "concol-output"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use concol_core::ColumnInput;
use serde::{Deserialize, Serialize};

/// Output directory used when neither the config nor the flags set one
pub const DEFAULT_OUT_DIR: &str = "concol-output";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConcolConfig {
    pub section: SectionConfig,
    pub materials: MaterialsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionConfig {
    pub label: Option<String>,
    pub diameter: Option<f64>,
    pub bar_diameter: Option<f64>,
    pub bar_count: Option<u32>,
    pub cover: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialsConfig {
    pub fc: Option<f64>,
    pub fy: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
}

impl ConcolConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("TOML parsing error")
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub label: Option<String>,
    pub diameter: Option<f64>,
    pub bar_diameter: Option<f64>,
    pub bar_count: Option<u32>,
    pub cover: Option<f64>,
    pub fc: Option<f64>,
    pub fy: Option<f64>,
    pub out_dir: Option<PathBuf>,
}

/// Merge flags, config and defaults into the column input and output directory.
pub fn resolve(config: &ConcolConfig, overrides: &Overrides) -> (ColumnInput, PathBuf) {
    let defaults = ColumnInput::default();
    let section = &config.section;
    let materials = &config.materials;

    let input = ColumnInput {
        label: overrides
            .label
            .clone()
            .or_else(|| section.label.clone())
            .unwrap_or(defaults.label),
        diameter: overrides
            .diameter
            .or(section.diameter)
            .unwrap_or(defaults.diameter),
        bar_diameter: overrides
            .bar_diameter
            .or(section.bar_diameter)
            .unwrap_or(defaults.bar_diameter),
        bar_count: overrides
            .bar_count
            .or(section.bar_count)
            .unwrap_or(defaults.bar_count),
        cover: overrides.cover.or(section.cover).unwrap_or(defaults.cover),
        fc: overrides.fc.or(materials.fc).unwrap_or(defaults.fc),
        fy: overrides.fy.or(materials.fy).unwrap_or(defaults.fy),
    };

    let out_dir = overrides
        .out_dir
        .clone()
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    (input, out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[section]
diameter = 600.0
bar_count = 8

[materials]
fc = 40.0

[output]
dir = "out"
"#;

    #[test]
    fn test_parse_sample() {
        let config = ConcolConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.section.diameter, Some(600.0));
        assert_eq!(config.section.bar_count, Some(8));
        assert_eq!(config.section.cover, None);
        assert_eq!(config.materials.fc, Some(40.0));
        assert_eq!(config.output.dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_empty_config_gives_defaults() {
        let config = ConcolConfig::from_toml_str("").unwrap();
        let (input, out_dir) = resolve(&config, &Overrides::default());
        assert_eq!(input, ColumnInput::default());
        assert_eq!(out_dir, PathBuf::from(DEFAULT_OUT_DIR));
    }

    #[test]
    fn test_precedence_flag_over_config_over_default() {
        let config = ConcolConfig::from_toml_str(SAMPLE).unwrap();
        let overrides = Overrides {
            diameter: Some(500.0),
            out_dir: Some(PathBuf::from("flag-dir")),
            ..Overrides::default()
        };
        let (input, out_dir) = resolve(&config, &overrides);
        // flag
        assert_eq!(input.diameter, 500.0);
        assert_eq!(out_dir, PathBuf::from("flag-dir"));
        // config
        assert_eq!(input.bar_count, 8);
        assert_eq!(input.fc, 40.0);
        // default
        assert_eq!(input.cover, 30.0);
        assert_eq!(input.fy, 500.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ConcolConfig::from_toml_str("[section]\ndiamter = 400.0\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = ConcolConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read config file"));
    }
}
