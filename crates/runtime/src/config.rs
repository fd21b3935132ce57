//! Runtime configuration and its environment loader.
use std::env;
use std::path::{Path, PathBuf};

/// Log output settings consumed by [`crate::logging::init`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
    /// Also write logs to `{dir}/tactics.log` when set.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            dir: None,
        }
    }
}

/// Runtime configuration shared across the orchestrator and worker.
///
/// Rule tuning is content, not runtime configuration: it is read from
/// `config.toml` by `tactics_content::ContentFactory`.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// End the player phase once every party unit has acted.
    pub auto_end_player_phase: bool,
    /// Debug override that lifts the acted/moved restrictions.
    pub free_control: bool,
    pub save_dir: Option<PathBuf>,
    pub session_id: String,
    pub log: LogConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            auto_end_player_phase: true,
            free_control: false,
            save_dir: None,
            session_id: "default".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables, after
    /// loading an optional `.env` file.
    ///
    /// Environment variables:
    /// - `TACTICS_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `TACTICS_FREE_CONTROL` - Lift acted/moved checks (default: false)
    /// - `TACTICS_SAVE_DIR` - Directory for session files (default: none)
    /// - `TACTICS_SESSION_ID` - Session identifier (default: `default`)
    /// - `TACTICS_LOG` - Default log filter directive (default: `info`)
    /// - `TACTICS_LOG_DIR` - Also log to a file in this directory
    pub fn from_env() -> Self {
        if let Err(err) = load_env_file(None) {
            tracing::warn!("ignoring malformed .env file: {}", err);
        }

        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("TACTICS_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(enable) = read_env::<bool>("TACTICS_FREE_CONTROL") {
            config.free_control = enable;
        }
        config.save_dir = env::var("TACTICS_SAVE_DIR").ok().map(PathBuf::from);
        if let Ok(id) = env::var("TACTICS_SESSION_ID")
            && !id.is_empty()
        {
            config.session_id = id;
        }
        if let Ok(filter) = env::var("TACTICS_LOG") {
            config.log.filter = filter;
        }
        config.log.dir = env::var("TACTICS_LOG_DIR").ok().map(PathBuf::from);

        config
    }

    /// Configured save directory, else the platform data directory.
    pub fn save_dir_or_default(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(default_save_dir)
    }
}

/// Platform data directory for session files.
///
/// - macOS: `~/Library/Application Support/tactics/sessions`
/// - Linux: `~/.local/share/tactics/sessions`
/// - Windows: `%APPDATA%\tactics\sessions`
/// - Fallback: `./save_data/sessions`
pub fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "tactics")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("sessions")
}

/// Loads `path` (or a `.env` found from the working directory) into the
/// process environment. Returns `Ok(false)` when there is no such file.
pub(crate) fn load_env_file(path: Option<&Path>) -> Result<bool, dotenvy::Error> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    match loaded {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
