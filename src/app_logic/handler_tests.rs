use super::handler::*;
use crate::app_logic::ui_constants;

use crate::core::config::ConfigError;
use crate::core::path_helper::PathHelperError;
use crate::core::search_tool::{SearchToolError, ToolOutput};
use crate::core::{
    AppSettings, ConfigManagerOperations, SearchToolOperations, WorkingDirectoryOperations,
};
use crate::platform_layer::{
    AppEvent, ControlId, DialogOutcome, FormSnapshot, MessageBoxButtons, MessageBoxIcon,
    MessageBoxRequest, MessageSeverity, PlatformCommand, PlatformEventHandler, WindowId,
};

use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/*
 * This module contains unit tests for `SearchController` from the `super::handler`
 * module. It uses mock implementations of the search tool, the working directory
 * and the config manager to isolate the controller, and checks the commands it
 * dequeues for each event.
 */

// --- Mock Structures (SearchTool, WorkingDirectory, ConfigManager) ---
struct MockSearchTool {
    scripted_results: Mutex<VecDeque<Result<ToolOutput, SearchToolError>>>,
    received_arguments: Mutex<Vec<Vec<String>>>,
}

impl MockSearchTool {
    fn new() -> Self {
        MockSearchTool {
            scripted_results: Mutex::new(VecDeque::new()),
            received_arguments: Mutex::new(Vec::new()),
        }
    }
    fn push_output(&self, stdout: &str, stderr: &str) {
        self.scripted_results.lock().unwrap().push_back(Ok(ToolOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }));
    }
    fn push_error(&self, error: SearchToolError) {
        self.scripted_results.lock().unwrap().push_back(Err(error));
    }
    fn calls(&self) -> Vec<Vec<String>> {
        self.received_arguments.lock().unwrap().clone()
    }
}

impl SearchToolOperations for MockSearchTool {
    fn run(&self, arguments: &[String]) -> Result<ToolOutput, SearchToolError> {
        self.received_arguments
            .lock()
            .unwrap()
            .push(arguments.to_vec());
        self.scripted_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ToolOutput::default()))
    }
}
// --- End MockSearchTool ---

struct MockWorkingDirectory {
    directories: Mutex<HashSet<String>>,
    change_directory_error: Mutex<Option<PathHelperError>>,
    current_directory: Mutex<PathBuf>,
    changed_to: Mutex<Vec<String>>,
}

impl MockWorkingDirectory {
    fn new() -> Self {
        MockWorkingDirectory {
            directories: Mutex::new(HashSet::new()),
            change_directory_error: Mutex::new(None),
            current_directory: Mutex::new(PathBuf::from("/start")),
            changed_to: Mutex::new(Vec::new()),
        }
    }
    fn add_directory(&self, path: &str) {
        self.directories.lock().unwrap().insert(path.to_string());
    }
    fn fail_change_directory(&self, error: PathHelperError) {
        *self.change_directory_error.lock().unwrap() = Some(error);
    }
    fn changed_to(&self) -> Vec<String> {
        self.changed_to.lock().unwrap().clone()
    }
}

impl WorkingDirectoryOperations for MockWorkingDirectory {
    fn is_directory(&self, path: &str) -> Result<bool, PathHelperError> {
        Ok(self.directories.lock().unwrap().contains(path))
    }
    fn get_base_name(&self, path: &str) -> Result<String, PathHelperError> {
        Ok(Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }
    fn change_directory(&self, path: &str) -> Result<(), PathHelperError> {
        if let Some(error) = self.change_directory_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.changed_to.lock().unwrap().push(path.to_string());
        *self.current_directory.lock().unwrap() = PathBuf::from(path);
        Ok(())
    }
    fn get_current_directory(&self) -> Result<PathBuf, PathHelperError> {
        Ok(self.current_directory.lock().unwrap().clone())
    }
}
// --- End MockWorkingDirectory ---

struct MockConfigManager {
    last_search_directory: Mutex<Option<PathBuf>>,
    fail_load: Mutex<bool>,
    saved_directories: Mutex<Vec<(String, Option<PathBuf>)>>,
}

impl MockConfigManager {
    fn new() -> Self {
        MockConfigManager {
            last_search_directory: Mutex::new(None),
            fail_load: Mutex::new(false),
            saved_directories: Mutex::new(Vec::new()),
        }
    }
    fn set_last_search_directory(&self, path: &str) {
        *self.last_search_directory.lock().unwrap() = Some(PathBuf::from(path));
    }
    fn set_fail_load(&self, fail: bool) {
        *self.fail_load.lock().unwrap() = fail;
    }
    fn saved_directories(&self) -> Vec<(String, Option<PathBuf>)> {
        self.saved_directories.lock().unwrap().clone()
    }
}

impl ConfigManagerOperations for MockConfigManager {
    fn load_settings(&self, _app_name: &str) -> Result<AppSettings, ConfigError> {
        Ok(AppSettings::default())
    }
    fn save_settings(&self, _app_name: &str, _settings: &AppSettings) -> Result<(), ConfigError> {
        Ok(())
    }
    fn load_last_search_directory(&self, _app_name: &str) -> Result<Option<PathBuf>, ConfigError> {
        if *self.fail_load.lock().unwrap() {
            return Err(ConfigError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "mocked io error",
            )));
        }
        Ok(self.last_search_directory.lock().unwrap().clone())
    }
    fn save_last_search_directory(
        &self,
        app_name: &str,
        directory: Option<&Path>,
    ) -> Result<(), ConfigError> {
        self.saved_directories
            .lock()
            .unwrap()
            .push((app_name.to_string(), directory.map(Path::to_path_buf)));
        Ok(())
    }
}
// --- End MockConfigManager ---

struct Fixture {
    controller: SearchController,
    tool: Arc<MockSearchTool>,
    directories: Arc<MockWorkingDirectory>,
    config: Arc<MockConfigManager>,
    window_id: WindowId,
}

fn setup_with_settings(settings: AppSettings) -> Fixture {
    crate::initialize_logging();
    let tool = Arc::new(MockSearchTool::new());
    let directories = Arc::new(MockWorkingDirectory::new());
    let config = Arc::new(MockConfigManager::new());
    directories.add_directory("/repo");
    let controller = SearchController::new(
        tool.clone(),
        directories.clone(),
        config.clone(),
        settings,
    );
    Fixture {
        controller,
        tool,
        directories,
        config,
        window_id: WindowId::new(1),
    }
}

fn setup() -> Fixture {
    setup_with_settings(AppSettings {
        completion_hold_ms: 250,
        ..AppSettings::default()
    })
}

fn drain_commands(controller: &mut SearchController) -> Vec<PlatformCommand> {
    let mut commands = Vec::new();
    while let Some(command) = controller.try_dequeue_command() {
        commands.push(command);
    }
    commands
}

fn form(path: &str, pattern: &str, case_sensitive: bool) -> FormSnapshot {
    let mut form = FormSnapshot::default();
    form.texts
        .insert(ui_constants::PATH_INPUT_ID, path.to_string());
    form.texts
        .insert(ui_constants::PATTERN_INPUT_ID, pattern.to_string());
    form.checks
        .insert(ui_constants::CASE_SENSITIVE_CHECKBOX_ID, case_sensitive);
    form
}

fn submit_event(window_id: WindowId, form: FormSnapshot) -> AppEvent {
    AppEvent::FormSubmitted {
        window_id,
        control_id: ui_constants::SEARCH_BUTTON_ID,
        form,
    }
}

fn status_update(window_id: WindowId, text: &str) -> PlatformCommand {
    PlatformCommand::UpdateLabelText {
        window_id,
        control_id: ui_constants::STATUS_LABEL_ID,
        text: text.to_string(),
        severity: MessageSeverity::Information,
    }
}

fn error_dialog(window_id: WindowId, text: &str, buttons: MessageBoxButtons) -> PlatformCommand {
    PlatformCommand::ShowMessageBox {
        window_id,
        request: MessageBoxRequest {
            title: ui_constants::APP_TITLE.to_string(),
            text: text.to_string(),
            buttons,
            icon: MessageBoxIcon::Error,
        },
    }
}

fn set_output(window_id: WindowId, text: &str) -> PlatformCommand {
    PlatformCommand::SetInputText {
        window_id,
        control_id: ui_constants::OUTPUT_PANEL_ID,
        text: text.to_string(),
    }
}

// Brings the fixture to the state right after the window became visible.
fn open_main_window(fixture: &mut Fixture) {
    fixture
        .controller
        .handle_event(AppEvent::MainWindowUISetupComplete {
            window_id: fixture.window_id,
        });
    drain_commands(&mut fixture.controller);
}

// Submits a valid form and returns the commands queued up to the dispatch signal.
fn submit_valid(fixture: &mut Fixture, case_sensitive: bool) -> Vec<PlatformCommand> {
    fixture
        .controller
        .handle_event(submit_event(fixture.window_id, form("/repo", "TODO", case_sensitive)));
    drain_commands(&mut fixture.controller)
}

fn dispatch(fixture: &mut Fixture) -> Vec<PlatformCommand> {
    fixture
        .controller
        .handle_event(AppEvent::SearchDispatchReady {
            window_id: fixture.window_id,
        });
    drain_commands(&mut fixture.controller)
}

#[test]
fn test_setup_complete_prefills_last_directory_and_shows_window() {
    let mut fixture = setup();
    fixture.config.set_last_search_directory("/repo");

    fixture
        .controller
        .handle_event(AppEvent::MainWindowUISetupComplete {
            window_id: fixture.window_id,
        });
    let commands = drain_commands(&mut fixture.controller);

    assert_eq!(
        commands,
        vec![
            PlatformCommand::SetInputText {
                window_id: fixture.window_id,
                control_id: ui_constants::PATH_INPUT_ID,
                text: "/repo".to_string(),
            },
            PlatformCommand::ShowWindow {
                window_id: fixture.window_id
            },
        ]
    );
    assert_eq!(fixture.controller.main_window_id, Some(fixture.window_id));
}

#[test]
fn test_setup_complete_without_saved_directory_only_shows_window() {
    let mut fixture = setup();
    fixture.config.set_fail_load(true);

    fixture
        .controller
        .handle_event(AppEvent::MainWindowUISetupComplete {
            window_id: fixture.window_id,
        });

    assert_eq!(
        drain_commands(&mut fixture.controller),
        vec![PlatformCommand::ShowWindow {
            window_id: fixture.window_id
        }]
    );
}

#[test]
fn test_setup_complete_ignores_saved_directory_when_disabled() {
    let mut fixture = setup_with_settings(AppSettings {
        remember_last_directory: false,
        ..AppSettings::default()
    });
    fixture.config.set_last_search_directory("/repo");

    fixture
        .controller
        .handle_event(AppEvent::MainWindowUISetupComplete {
            window_id: fixture.window_id,
        });

    assert_eq!(
        drain_commands(&mut fixture.controller),
        vec![PlatformCommand::ShowWindow {
            window_id: fixture.window_id
        }]
    );
}

#[test]
fn test_successful_search_renders_summary_and_returns_to_idle() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    let window_id = fixture.window_id;
    let stdout = "a.py:3:# TODO fix\nb.py:9:# TODO\n";
    fixture.tool.push_output(stdout, "");

    let submit_commands = submit_valid(&mut fixture, false);
    assert_eq!(
        submit_commands,
        vec![
            set_output(window_id, ""),
            status_update(window_id, ui_constants::STATUS_IN_PROGRESS),
            PlatformCommand::SignalSearchDispatch { window_id },
        ]
    );
    assert!(matches!(
        fixture.controller.phase(),
        SearchPhase::Running { .. }
    ));
    assert_eq!(fixture.directories.changed_to(), vec!["/repo".to_string()]);
    assert!(fixture.tool.calls().is_empty(), "tool runs only on dispatch");

    let dispatch_commands = dispatch(&mut fixture);
    assert_eq!(
        dispatch_commands,
        vec![
            set_output(
                window_id,
                "**2 matches found**\na.py:3:# TODO fix\nb.py:9:# TODO\n"
            ),
            status_update(window_id, ui_constants::STATUS_COMPLETE),
            PlatformCommand::HoldDisplay {
                window_id,
                duration: Duration::from_millis(250),
            },
            status_update(window_id, ui_constants::STATUS_IDLE),
        ]
    );
    assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);
    assert_eq!(
        fixture.tool.calls(),
        vec![vec!["-i", "-n", "-s", "-e", "TODO", "repo\\*\\*.py"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()]
    );
}

#[test]
fn test_case_sensitive_search_omits_insensitive_flag() {
    let mut fixture = setup();
    open_main_window(&mut fixture);

    submit_valid(&mut fixture, true);
    dispatch(&mut fixture);

    let calls = fixture.tool.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].contains(&"-i".to_string()));
    assert_eq!(calls[0][..3], ["-n", "-s", "-e"]);
}

#[test]
fn test_empty_output_reports_zero_matches() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    fixture.tool.push_output("", "");

    submit_valid(&mut fixture, false);
    let commands = dispatch(&mut fixture);

    assert_eq!(
        commands.first(),
        Some(&set_output(fixture.window_id, "**0 matches found**\n"))
    );
}

#[test]
fn test_successful_search_remembers_directory() {
    let mut fixture = setup();
    open_main_window(&mut fixture);

    submit_valid(&mut fixture, false);

    assert_eq!(
        fixture.config.saved_directories(),
        vec![(
            ui_constants::APP_NAME.to_string(),
            Some(PathBuf::from("/repo"))
        )]
    );
}

#[test]
fn test_validation_errors_are_reported_in_order() {
    let cases = [
        ("", "TODO", "Missing path"),
        ("", "", "Missing path"),
        ("/nowhere", "TODO", "Invalid path"),
        ("/nowhere", "", "Invalid path"),
        ("/repo", "", "Missing pattern"),
    ];

    for (path, pattern, expected) in cases {
        let mut fixture = setup();
        open_main_window(&mut fixture);

        fixture
            .controller
            .handle_event(submit_event(fixture.window_id, form(path, pattern, false)));
        let commands = drain_commands(&mut fixture.controller);

        assert_eq!(
            commands,
            vec![error_dialog(fixture.window_id, expected, MessageBoxButtons::Ok)],
            "path={path:?} pattern={pattern:?}"
        );
        assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);
        assert!(fixture.directories.changed_to().is_empty());
        assert!(fixture.tool.calls().is_empty());
        assert!(fixture.config.saved_directories().is_empty());
    }
}

#[test]
fn test_acknowledging_validation_error_keeps_idle() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    fixture
        .controller
        .handle_event(submit_event(fixture.window_id, form("", "TODO", false)));
    drain_commands(&mut fixture.controller);

    fixture
        .controller
        .handle_event(AppEvent::MessageBoxCompleted {
            window_id: fixture.window_id,
            outcome: DialogOutcome::Ok,
        });

    assert!(drain_commands(&mut fixture.controller).is_empty());
    assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);
}

#[test]
fn test_change_directory_failure_shows_error_and_stays_idle() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    fixture
        .directories
        .fail_change_directory(PathHelperError::PermissionDenied);

    let commands = submit_valid(&mut fixture, false);

    assert_eq!(
        commands,
        vec![
            set_output(fixture.window_id, ""),
            error_dialog(
                fixture.window_id,
                "Insufficient file permissions",
                MessageBoxButtons::Ok
            ),
        ]
    );
    assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);
}

#[test]
fn test_stderr_then_cancel_returns_to_idle_without_output() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    let window_id = fixture.window_id;
    fixture.tool.push_output("", "Perforce client error: connect failed\n");

    submit_valid(&mut fixture, false);
    let commands = dispatch(&mut fixture);
    assert_eq!(
        commands,
        vec![error_dialog(
            window_id,
            "Perforce client error: connect failed\n",
            MessageBoxButtons::RetryCancel
        )]
    );
    assert!(matches!(
        fixture.controller.phase(),
        SearchPhase::RetryWait { .. }
    ));

    fixture
        .controller
        .handle_event(AppEvent::MessageBoxCompleted {
            window_id,
            outcome: DialogOutcome::Cancel,
        });
    let commands = drain_commands(&mut fixture.controller);

    assert_eq!(
        commands,
        vec![status_update(window_id, ui_constants::STATUS_IDLE)]
    );
    assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);
    assert_eq!(fixture.tool.calls().len(), 1);
}

#[test]
fn test_retry_reissues_identical_arguments() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    let window_id = fixture.window_id;
    fixture.tool.push_output("", "transient error\n");
    fixture.tool.push_output("a.py:1:TODO\n", "");

    submit_valid(&mut fixture, false);
    dispatch(&mut fixture);
    fixture
        .controller
        .handle_event(AppEvent::MessageBoxCompleted {
            window_id,
            outcome: DialogOutcome::Retry,
        });
    let commands = drain_commands(&mut fixture.controller);
    assert_eq!(
        commands,
        vec![PlatformCommand::SignalSearchDispatch { window_id }]
    );
    assert!(matches!(
        fixture.controller.phase(),
        SearchPhase::Running { .. }
    ));

    let commands = dispatch(&mut fixture);
    assert_eq!(
        commands.first(),
        Some(&set_output(window_id, "**1 matches found**\na.py:1:TODO\n"))
    );
    assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);

    let calls = fixture.tool.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[test]
fn test_launch_failure_shows_error_and_resets_status() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    let window_id = fixture.window_id;
    fixture.tool.push_error(SearchToolError::Launch(io::Error::new(
        io::ErrorKind::NotFound,
        "program not found",
    )));

    submit_valid(&mut fixture, false);
    let commands = dispatch(&mut fixture);

    assert_eq!(
        commands,
        vec![
            error_dialog(
                window_id,
                "Failed to launch search tool: program not found",
                MessageBoxButtons::Ok
            ),
            status_update(window_id, ui_constants::STATUS_IDLE),
        ]
    );
    assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);
}

#[test]
fn test_submit_while_running_is_ignored() {
    let mut fixture = setup();
    open_main_window(&mut fixture);

    submit_valid(&mut fixture, false);
    let second = submit_valid(&mut fixture, true);

    assert!(second.is_empty());
    assert_eq!(fixture.directories.changed_to().len(), 1);
    match fixture.controller.phase() {
        SearchPhase::Running { arguments } => assert_eq!(arguments[0], "-i"),
        other => panic!("unexpected phase {other:?}"),
    }
}

#[test]
fn test_dispatch_without_running_search_is_ignored() {
    let mut fixture = setup();
    open_main_window(&mut fixture);

    let commands = dispatch(&mut fixture);

    assert!(commands.is_empty());
    assert!(fixture.tool.calls().is_empty());
}

#[test]
fn test_submit_from_other_control_is_ignored() {
    let mut fixture = setup();
    open_main_window(&mut fixture);

    fixture.controller.handle_event(AppEvent::FormSubmitted {
        window_id: fixture.window_id,
        control_id: ControlId::new(9999),
        form: form("/repo", "TODO", false),
    });

    assert!(drain_commands(&mut fixture.controller).is_empty());
    assert_eq!(fixture.controller.phase(), &SearchPhase::Idle);
}

#[test]
fn test_browse_opens_folder_picker_at_current_directory() {
    let mut fixture = setup();
    open_main_window(&mut fixture);

    fixture.controller.handle_event(AppEvent::ButtonClicked {
        window_id: fixture.window_id,
        control_id: ui_constants::BROWSE_BUTTON_ID,
    });

    assert_eq!(
        drain_commands(&mut fixture.controller),
        vec![PlatformCommand::ShowFolderPickerDialog {
            window_id: fixture.window_id,
            title: FOLDER_PICKER_TITLE.to_string(),
            initial_dir: Some(PathBuf::from("/start")),
        }]
    );
}

#[test]
fn test_folder_picker_result_fills_path_input() {
    let mut fixture = setup();
    open_main_window(&mut fixture);

    fixture
        .controller
        .handle_event(AppEvent::FolderPickerDialogCompleted {
            window_id: fixture.window_id,
            path: Some(PathBuf::from("/repo")),
        });
    fixture
        .controller
        .handle_event(AppEvent::FolderPickerDialogCompleted {
            window_id: fixture.window_id,
            path: None,
        });

    assert_eq!(
        drain_commands(&mut fixture.controller),
        vec![PlatformCommand::SetInputText {
            window_id: fixture.window_id,
            control_id: ui_constants::PATH_INPUT_ID,
            text: "/repo".to_string(),
        }]
    );
}

#[test]
fn test_close_request_then_destroy_quits() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    let window_id = fixture.window_id;

    fixture
        .controller
        .handle_event(AppEvent::WindowCloseRequestedByUser { window_id });
    assert_eq!(
        drain_commands(&mut fixture.controller),
        vec![PlatformCommand::CloseWindow { window_id }]
    );

    fixture
        .controller
        .handle_event(AppEvent::WindowDestroyed { window_id });
    assert_eq!(
        drain_commands(&mut fixture.controller),
        vec![PlatformCommand::QuitApplication]
    );
    assert_eq!(fixture.controller.main_window_id, None);
}

#[test]
fn test_events_for_unknown_window_are_ignored() {
    let mut fixture = setup();
    open_main_window(&mut fixture);
    let stranger = WindowId::new(42);

    fixture
        .controller
        .handle_event(submit_event(stranger, form("/repo", "TODO", false)));
    fixture
        .controller
        .handle_event(AppEvent::WindowCloseRequestedByUser { window_id: stranger });

    assert!(drain_commands(&mut fixture.controller).is_empty());
    assert!(fixture.directories.changed_to().is_empty());
}
