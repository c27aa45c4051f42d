/*
 * Manages application-specific configuration: the user-editable settings
 * (`settings.json`) and the last directory a search was started in
 * (`last_search_directory.txt`). Both live in the per-user local configuration
 * directory resolved by `path_utils`.
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) so that the presenter
 * can be tested with a mock; `CoreConfigManager` is the file-backed implementation.
 */
use crate::core::path_utils;
use crate::core::search_tool::{DEFAULT_FILE_EXTENSION, DEFAULT_TOOL_EXECUTABLE};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const SETTINGS_FILENAME: &str = "settings.json";
const LAST_SEARCH_DIRECTORY_FILENAME: &str = "last_search_directory.txt";

pub const DEFAULT_COMPLETION_HOLD_MS: u64 = 1000;

/*
 * User-tunable settings. Every field has a default, so a partial or missing
 * settings file still yields a complete configuration.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Executable invoked as `<tool_executable> grep ...`.
    pub tool_executable: String,
    // Extension (without dot) of the files included in the search glob.
    pub file_extension: String,
    // How long "Status: Complete" stays visible before returning to idle.
    pub completion_hold_ms: u64,
    pub remember_last_directory: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            tool_executable: DEFAULT_TOOL_EXECUTABLE.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            completion_hold_ms: DEFAULT_COMPLETION_HOLD_MS,
            remember_last_directory: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Json(e) => write!(f, "Configuration file format error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_settings(&self, app_name: &str) -> Result<AppSettings>;
    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()>;
    fn load_last_search_directory(&self, app_name: &str) -> Result<Option<PathBuf>>;
    fn save_last_search_directory(&self, app_name: &str, directory: Option<&Path>) -> Result<()>;
}

pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    /// Uses `config_dir` instead of the per-user directory. The directory must exist.
    #[cfg(test)]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        CoreConfigManager {
            config_dir_override: Some(config_dir),
        }
    }

    fn config_dir(&self, app_name: &str) -> Result<PathBuf> {
        match &self.config_dir_override {
            Some(dir) => Ok(dir.clone()),
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory),
        }
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the settings file. A missing file yields the defaults; a file that
     * exists but is not valid JSON is reported as `ConfigError::Json`.
     */
    fn load_settings(&self, app_name: &str) -> Result<AppSettings> {
        let file_path = self.config_dir(app_name)?.join(SETTINGS_FILENAME);
        if !file_path.exists() {
            log::debug!("CoreConfigManager: No settings file at {file_path:?}, using defaults.");
            return Ok(AppSettings::default());
        }
        let file = File::open(&file_path)?;
        let settings: AppSettings = serde_json::from_reader(io::BufReader::new(file))?;
        log::debug!("CoreConfigManager: Loaded settings from {file_path:?}: {settings:?}");
        Ok(settings)
    }

    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()> {
        let file_path = self.config_dir(app_name)?.join(SETTINGS_FILENAME);
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&file_path, json)?;
        log::debug!("CoreConfigManager: Saved settings to {file_path:?}.");
        Ok(())
    }

    fn load_last_search_directory(&self, app_name: &str) -> Result<Option<PathBuf>> {
        log::trace!("CoreConfigManager: Loading last search directory for app '{app_name}'");
        let file_path = self
            .config_dir(app_name)?
            .join(LAST_SEARCH_DIRECTORY_FILENAME);

        if !file_path.exists() {
            log::debug!("CoreConfigManager: No last search directory file at {file_path:?}.");
            return Ok(None);
        }

        let mut file = File::open(&file_path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let path_text = contents.trim();
        if path_text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(path_text)))
        }
    }

    /*
     * Stores the directory of the last started search. Passing `None` clears the
     * stored value.
     */
    fn save_last_search_directory(&self, app_name: &str, directory: Option<&Path>) -> Result<()> {
        let file_path = self
            .config_dir(app_name)?
            .join(LAST_SEARCH_DIRECTORY_FILENAME);
        let mut file = File::create(&file_path)?;
        if let Some(path) = directory {
            file.write_all(path.to_string_lossy().as_bytes())?;
        }
        log::trace!("CoreConfigManager: Saved last search directory {directory:?}.");
        Ok(())
    }
}
