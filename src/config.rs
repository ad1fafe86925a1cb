use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

pub const DEFAULT_INPUT_PATH: &str = "data/ibtracs_all_list_v04r01.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/ibtracs_first_locations.csv";
pub const DEFAULT_YEAR_MIN: i32 = 2005;
pub const DEFAULT_YEAR_MAX: i32 = 2025;

/// Everything a run needs. Missing keys in a YAML file fall back to the
/// IBTrACS defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Inclusive lower bound of the year window.
    pub year_min: i32,
    /// Inclusive upper bound of the year window.
    pub year_max: i32,
    pub sid_column: String,
    pub number_column: String,
    pub time_column: String,
    /// Name of the derived year column in the output.
    pub year_column: String,
    /// Create the output's parent directory instead of failing when it is missing.
    pub create_output_dir: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            year_min: DEFAULT_YEAR_MIN,
            year_max: DEFAULT_YEAR_MAX,
            sid_column: "SID".into(),
            number_column: "NUMBER".into(),
            time_column: "ISO_TIME".into(),
            year_column: "YEAR".into(),
            create_output_dir: false,
        }
    }
}

impl PipelineConfig {
    /// Load a YAML config file. Keys not present keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let cfg: PipelineConfig = serde_yaml::from_str(&text)
            .map_err(|e| PipelineError::Config(format!("parsing {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), ?cfg, "loaded config file");
        Ok(cfg)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.year_min > self.year_max {
            return Err(PipelineError::Config(format!(
                "year_min ({}) is greater than year_max ({})",
                self.year_min, self.year_max
            )));
        }

        let keys = [
            ("sid_column", &self.sid_column),
            ("number_column", &self.number_column),
            ("time_column", &self.time_column),
            ("year_column", &self.year_column),
        ];
        for (key, name) in keys {
            if name.trim().is_empty() {
                return Err(PipelineError::Config(format!("{} must not be empty", key)));
            }
        }
        if self.year_column == self.sid_column
            || self.year_column == self.number_column
            || self.year_column == self.time_column
        {
            return Err(PipelineError::Config(format!(
                "year_column `{}` would overwrite a key column",
                self.year_column
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_ibtracs_layout() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(cfg.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!((cfg.year_min, cfg.year_max), (2005, 2025));
        assert_eq!(cfg.sid_column, "SID");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "year_min: 2010\noutput_path: out/first.csv")?;

        let cfg = PipelineConfig::from_yaml_file(f.path())?;
        assert_eq!(cfg.year_min, 2010);
        assert_eq!(cfg.year_max, DEFAULT_YEAR_MAX);
        assert_eq!(cfg.output_path, PathBuf::from("out/first.csv"));
        assert_eq!(cfg.time_column, "ISO_TIME");
        Ok(())
    }

    #[test]
    fn unknown_yaml_key_is_config_error() -> Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "year_minimum: 2010")?;

        let err = PipelineConfig::from_yaml_file(f.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        Ok(())
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = PipelineConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let cfg = PipelineConfig {
            year_min: 2020,
            year_max: 2019,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn year_column_cannot_shadow_sid() {
        let cfg = PipelineConfig {
            year_column: "SID".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
