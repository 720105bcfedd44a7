use crate::consts;
use crate::game::{GridUnit, Rules, TailRule};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Gameplay settings
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// Settings about the log file
    #[serde(default)]
    pub(crate) log: LogConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }
}

/// Settings that shape a game session
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGameConfig")]
pub(crate) struct GameConfig {
    /// The size of one board cell in the terminal
    pub(crate) grid_unit: GridUnit,

    /// Time between movements of the snake
    pub(crate) tick_interval: Duration,

    /// Length of the snake at the start of a game
    pub(crate) initial_length: usize,

    pub(crate) rules: Rules,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            grid_unit: GridUnit::default(),
            tick_interval: consts::DEFAULT_TICK_INTERVAL,
            initial_length: consts::DEFAULT_INITIAL_LENGTH,
            rules: Rules::default(),
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct RawGameConfig {
    grid_unit: u16,
    tick_interval_ms: u64,
    score_increment: u32,
    initial_length: usize,
    tail_rule: TailRule,
}

impl Default for RawGameConfig {
    fn default() -> RawGameConfig {
        let defaults = GameConfig::default();
        RawGameConfig {
            grid_unit: defaults.grid_unit.columns(),
            tick_interval_ms: consts::DEFAULT_TICK_INTERVAL_MS,
            score_increment: defaults.rules.score_increment,
            initial_length: defaults.initial_length,
            tail_rule: defaults.rules.tail_rule,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = SettingError;

    fn try_from(value: RawGameConfig) -> Result<GameConfig, SettingError> {
        let grid_unit = GridUnit::new(value.grid_unit).ok_or(SettingError::ZeroGridUnit)?;
        if value.tick_interval_ms == 0 {
            return Err(SettingError::ZeroTickInterval);
        }
        if value.initial_length == 0 {
            return Err(SettingError::ZeroInitialLength);
        }
        if value.initial_length > usize::from(consts::MAX_INITIAL_LENGTH) {
            return Err(SettingError::InitialLengthTooLong(value.initial_length));
        }
        Ok(GameConfig {
            grid_unit,
            tick_interval: Duration::from_millis(value.tick_interval_ms),
            initial_length: value.initial_length,
            rules: Rules {
                score_increment: value.score_increment,
                tail_rule: value.tail_rule,
            },
        })
    }
}

/// Where & how verbosely to log
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawLogConfig")]
pub(crate) struct LogConfig {
    /// File to write log messages to; nothing is logged if this is `None`
    pub(crate) file: Option<PathBuf>,

    /// Most verbose level of messages to write
    pub(crate) level: Level,
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            file: None,
            level: Level::INFO,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct RawLogConfig {
    file: Option<String>,
    level: Option<String>,
}

impl TryFrom<RawLogConfig> for LogConfig {
    type Error = SettingError;

    fn try_from(value: RawLogConfig) -> Result<LogConfig, SettingError> {
        let level = match value.level {
            Some(s) => s
                .parse::<Level>()
                .map_err(|_| SettingError::InvalidLevel(s))?,
            None => Level::INFO,
        };
        Ok(LogConfig {
            file: value
                .file
                .map(expanduser::expanduser)
                .transpose()
                .map_err(SettingError::Path)?,
            level,
        })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

/// A configuration value that parsed but makes no sense
#[derive(Debug, Error)]
pub(crate) enum SettingError {
    #[error("grid-unit must be at least 1")]
    ZeroGridUnit,
    #[error("tick-interval-ms must be at least 1")]
    ZeroTickInterval,
    #[error("initial-length must be at least 1")]
    ZeroInitialLength,
    #[error("initial-length {0} is too long; the most allowed is {max}", max = consts::MAX_INITIAL_LENGTH)]
    InitialLengthTooLong(usize),
    #[error("invalid log level {0:?}; expected trace, debug, info, warn, or error")]
    InvalidLevel(String),
    #[error("failed to expand log file path")]
    Path(#[source] std::io::Error),
}
