use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::strategy::{SolverConfig, StrategyKind};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// `[game]` section.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// The human drops the first puck of every game.
    pub human_starts: bool,
    pub strategy: StrategyKind,
    /// Seed for the random strategy; unseeded when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            human_starts: true,
            strategy: StrategyKind::First,
            seed: None,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub solver: SolverConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solver.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "solver.timeout_ms must be > 0".into(),
            ));
        }
        if self.game.strategy == StrategyKind::Solver
            && self.solver.program.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "solver.program must be set when game.strategy = \"solver\"".into(),
            ));
        }
        if self.logging.level_filter().is_none() {
            return Err(ConfigError::Validation(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        if self.logging.output.uses_file() && self.logging.logfile.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "logging.logfile must be set when logging to a file".into(),
            ));
        }
        Ok(())
    }

    /// TOML string with all default values, for writing an initial config file.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogOutput;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[game]
human_starts = false
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.game.human_starts);
        assert_eq!(config.game.strategy, StrategyKind::First);
        assert_eq!(config.solver, SolverConfig::default());
        assert_eq!(config.logging.output, LogOutput::Both);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.solver.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_solver_program() {
        let mut config = AppConfig::default();
        config.game.strategy = StrategyKind::Solver;
        config.solver.program = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_level() {
        let mut config = AppConfig::default();
        config.logging.level = "chatty".into();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "config validation error: logging.level 'chatty' is not a log level"
        );
    }

    #[test]
    fn test_validation_rejects_missing_logfile() {
        let mut config = AppConfig::default();
        config.logging.output = LogOutput::File;
        config.logging.logfile = PathBuf::new();
        assert!(config.validate().is_err());
        config.logging.output = LogOutput::Stdout;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_robot.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robot.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[game]
strategy = "solver"

[solver]
program = "/opt/c4/solver"
book = "/opt/c4/7x6.book"
timeout_ms = 2500
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.strategy, StrategyKind::Solver);
        assert_eq!(config.solver.program, PathBuf::from("/opt/c4/solver"));
        assert_eq!(config.solver.book, Some(PathBuf::from("/opt/c4/7x6.book")));
        assert_eq!(config.solver.timeout_ms, 2500);
        assert!(config.game.human_starts);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robot.toml");
        std::fs::write(&path, "[game\nhuman_starts = ").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
