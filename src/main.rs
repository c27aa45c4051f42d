mod app_logic;
mod core;
mod platform_layer;
mod ui_description_layer;

use crate::app_logic::handler::SearchController;
use crate::app_logic::ui_constants::{APP_NAME, APP_TITLE};
use crate::core::{
    AppSettings, ConfigManagerOperations, CoreConfigManager, CoreP4GrepTool, PathHelper,
    path_utils,
};
use crate::platform_layer::{
    PlatformError, PlatformEventHandler, PlatformInterface, PlatformResult, WindowConfig,
};
use clap::Parser;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const LOG_FILE_NAME: &str = "p4_search.log";
const MAIN_WINDOW_WIDTH: i32 = 800;
const MAIN_WINDOW_HEIGHT: i32 = 600;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search Perforce-tracked files with p4 grep", long_about = None)]
struct Args {
    /// Search tool executable, invoked as `<tool> grep ...`
    #[arg(long = "tool")]
    tool: Option<String>,

    /// Extension of the files to search, without the dot
    #[arg(long = "extension")]
    extension: Option<String>,

    /// How long "Status: Complete" stays visible, in milliseconds
    #[arg(long = "hold-ms")]
    hold_ms: Option<u64>,

    /// Terminal log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

impl Args {
    // Command line values override the stored settings for this session only.
    fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(tool) = &self.tool {
            settings.tool_executable = tool.clone();
        }
        if let Some(extension) = &self.extension {
            settings.file_extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(hold_ms) = self.hold_ms {
            settings.completion_hold_ms = hold_ms;
        }
    }
}

/*
 * Installs a terminal logger at `term_level` and, when the per-user config
 * directory is available, a debug-level file logger next to the settings.
 * Failing to set up either logger never stops the application.
 */
fn setup_logging(term_level: LevelFilter) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let mut file_problem = None;
    match path_utils::get_base_app_config_local_dir(APP_NAME) {
        Some(dir) => {
            let log_path = dir.join(LOG_FILE_NAME);
            match File::create(&log_path) {
                Ok(file) => {
                    loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file))
                }
                Err(e) => {
                    file_problem = Some(format!("Could not create log file {log_path:?}: {e}"))
                }
            }
        }
        None => file_problem = Some("No config directory for the log file".to_string()),
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logging: {e}");
        return;
    }
    if let Some(problem) = file_problem {
        log::warn!("Main: {problem}");
    }
}

#[cfg(test)]
pub(crate) fn initialize_logging() {
    // Only the first test to get here installs the logger.
    let _ = simplelog::SimpleLogger::init(LevelFilter::Debug, Config::default());
}

/*
 * Loads the stored settings and writes them back, so the settings file lists
 * every key with its effective value. A file that fails to load is left
 * untouched and the defaults are used.
 */
fn load_settings(config_manager: &dyn ConfigManagerOperations) -> AppSettings {
    match config_manager.load_settings(APP_NAME) {
        Ok(settings) => {
            if let Err(e) = config_manager.save_settings(APP_NAME, &settings) {
                log::warn!("Main: Could not write back settings: {e}");
            }
            settings
        }
        Err(e) => {
            log::error!("Main: Failed to load settings, using defaults: {e}");
            AppSettings::default()
        }
    }
}

fn main() -> PlatformResult<()> {
    let args = Args::parse();
    let term_level = LevelFilter::from_str(&args.log_level).unwrap_or(LevelFilter::Info);
    setup_logging(term_level);
    log::info!("Main: {APP_TITLE} v{} starting.", env!("CARGO_PKG_VERSION"));

    let config_manager = Arc::new(CoreConfigManager::new());
    let mut settings = load_settings(config_manager.as_ref());
    args.apply_to(&mut settings);
    log::debug!("Main: Effective settings: {settings:?}");

    let path_helper = PathHelper::new().map_err(|e| {
        PlatformError::InitializationFailed(format!("Could not read the current directory: {e}"))
    })?;

    let platform_interface = PlatformInterface::new(APP_NAME.to_string())?;
    let main_window_id = platform_interface.create_window(WindowConfig {
        title: APP_TITLE,
        width: MAIN_WINDOW_WIDTH,
        height: MAIN_WINDOW_HEIGHT,
    })?;

    for command in ui_description_layer::build_main_window_static_layout(main_window_id) {
        platform_interface.execute_command(command)?;
    }

    let search_tool = Arc::new(CoreP4GrepTool::new(settings.tool_executable.clone()));
    log::debug!("Main: Search tool executable: {}", search_tool.executable());
    let controller = SearchController::new(
        search_tool,
        Arc::new(path_helper),
        config_manager,
        settings,
    );
    let event_handler: Arc<Mutex<dyn PlatformEventHandler>> = Arc::new(Mutex::new(controller));

    let result = platform_interface.run(event_handler);
    match &result {
        Ok(()) => log::info!("Main: Application exited normally."),
        Err(e) => log::error!("Main: Application exited with error: {e}"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_overrides_settings() {
        let args = Args::parse_from([
            "p4_search",
            "--tool",
            "/opt/p4",
            "--extension",
            ".rs",
            "--hold-ms",
            "0",
        ]);
        let mut settings = AppSettings::default();
        args.apply_to(&mut settings);

        assert_eq!(settings.tool_executable, "/opt/p4");
        assert_eq!(settings.file_extension, "rs");
        assert_eq!(settings.completion_hold_ms, 0);
        assert!(settings.remember_last_directory);
    }

    #[test]
    fn test_no_arguments_keep_settings() {
        let args = Args::parse_from(["p4_search"]);
        let mut settings = AppSettings::default();
        args.apply_to(&mut settings);

        assert_eq!(settings, AppSettings::default());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_load_settings_writes_back_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());
        std::fs::write(dir.path().join("settings.json"), r#"{"file_extension": "rs"}"#).unwrap();

        let settings = load_settings(&manager);
        assert_eq!(settings.file_extension, "rs");
        assert_eq!(settings.tool_executable, AppSettings::default().tool_executable);

        let written = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(written.contains("\"tool_executable\""));
        assert!(written.contains("\"remember_last_directory\""));
    }

    #[test]
    fn test_load_settings_keeps_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();

        assert_eq!(load_settings(&manager), AppSettings::default());
        let untouched = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert_eq!(untouched, "not json");
    }

    #[test]
    fn test_initialize_logging_can_be_called_repeatedly() {
        initialize_logging();
        initialize_logging();
        log::debug!("Main: Logging initialized twice.");
        assert!(log::max_level() >= LevelFilter::Debug);
    }
}
