use crate::app_logic::ui_constants;
use crate::core::{
    AppSettings, ConfigManagerOperations, SearchRequest, SearchResult, SearchToolOperations,
    WorkingDirectoryOperations, build_grep_arguments,
};
use crate::platform_layer::{
    AppEvent, ControlId, DialogOutcome, FormSnapshot, MessageBoxButtons, MessageBoxIcon,
    MessageBoxRequest, MessageSeverity, PlatformCommand, PlatformEventHandler, WindowId,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub(crate) const MISSING_PATH_MESSAGE: &str = "Missing path";
pub(crate) const INVALID_PATH_MESSAGE: &str = "Invalid path";
pub(crate) const MISSING_PATTERN_MESSAGE: &str = "Missing pattern";
pub(crate) const FOLDER_PICKER_TITLE: &str = "Select the folder to search";

/*
 * Where the controller is in the lifecycle of one search. `Running` and
 * `RetryWait` carry the argument vector so that a retry reissues exactly the
 * arguments that produced the error.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Validating,
    Running { arguments: Vec<String> },
    RetryWait { arguments: Vec<String> },
}

/*
 * The presenter for the search form. It validates the submitted form, drives the
 * external search tool through `SearchToolOperations`, and turns its output (or
 * failures) into platform commands: output panel text, status line updates and
 * error dialogs with a Retry/Cancel loop.
 *
 * All work happens on the UI thread. The tool is run when the platform answers
 * `SignalSearchDispatch` with `SearchDispatchReady`, so the "In Progress" status
 * is on screen before the blocking call starts.
 */
pub struct SearchController {
    pub(crate) main_window_id: Option<WindowId>,
    pub(crate) phase: SearchPhase,
    settings: AppSettings,
    synchronous_command_queue: VecDeque<PlatformCommand>,
    search_tool: Arc<dyn SearchToolOperations>,
    working_directory: Arc<dyn WorkingDirectoryOperations>,
    config_manager: Arc<dyn ConfigManagerOperations>,
}

impl SearchController {
    pub fn new(
        search_tool: Arc<dyn SearchToolOperations>,
        working_directory: Arc<dyn WorkingDirectoryOperations>,
        config_manager: Arc<dyn ConfigManagerOperations>,
        settings: AppSettings,
    ) -> Self {
        SearchController {
            main_window_id: None,
            phase: SearchPhase::Idle,
            settings,
            synchronous_command_queue: VecDeque::new(),
            search_tool,
            working_directory,
            config_manager,
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.synchronous_command_queue.push_back(command);
    }

    fn set_status(&mut self, window_id: WindowId, text: &str) {
        self.enqueue_command(PlatformCommand::UpdateLabelText {
            window_id,
            control_id: ui_constants::STATUS_LABEL_ID,
            text: text.to_string(),
            severity: MessageSeverity::Information,
        });
    }

    fn show_error(&mut self, window_id: WindowId, text: &str, buttons: MessageBoxButtons) {
        self.enqueue_command(PlatformCommand::ShowMessageBox {
            window_id,
            request: MessageBoxRequest {
                title: ui_constants::APP_TITLE.to_string(),
                text: text.to_string(),
                buttons,
                icon: MessageBoxIcon::Error,
            },
        });
    }

    fn is_main_window(&self, window_id: WindowId) -> bool {
        if self.main_window_id == Some(window_id) {
            true
        } else {
            log::warn!("SearchController: Ignoring event for unknown window {window_id:?}.");
            false
        }
    }

    /*
     * The static UI exists. Pre-fills the path with the directory of the last
     * started search, when enabled, then shows the window.
     */
    fn on_main_window_ui_setup_complete(&mut self, window_id: WindowId) {
        log::debug!("SearchController: Main window {window_id:?} UI setup complete.");
        self.main_window_id = Some(window_id);

        if self.settings.remember_last_directory {
            match self
                .config_manager
                .load_last_search_directory(ui_constants::APP_NAME)
            {
                Ok(Some(directory)) => {
                    log::debug!("SearchController: Restoring last search directory {directory:?}.");
                    self.enqueue_command(PlatformCommand::SetInputText {
                        window_id,
                        control_id: ui_constants::PATH_INPUT_ID,
                        text: directory.to_string_lossy().into_owned(),
                    });
                }
                Ok(None) => {}
                Err(e) => log::warn!("SearchController: Could not load last search directory: {e}"),
            }
        }
        self.enqueue_command(PlatformCommand::ShowWindow { window_id });
    }

    /// Checks the request in order, returning the message of the first failure.
    fn validate(&self, request: &SearchRequest) -> Result<(), &'static str> {
        if request.directory.is_empty() {
            return Err(MISSING_PATH_MESSAGE);
        }
        match self.working_directory.is_directory(&request.directory) {
            Ok(true) => {}
            Ok(false) => return Err(INVALID_PATH_MESSAGE),
            Err(e) => {
                log::warn!(
                    "SearchController: Could not check directory '{}': {e}",
                    request.directory
                );
                return Err(INVALID_PATH_MESSAGE);
            }
        }
        if request.pattern.is_empty() {
            return Err(MISSING_PATTERN_MESSAGE);
        }
        Ok(())
    }

    fn on_form_submitted(
        &mut self,
        window_id: WindowId,
        control_id: ControlId,
        form: FormSnapshot,
    ) {
        if control_id != ui_constants::SEARCH_BUTTON_ID {
            log::debug!("SearchController: Ignoring submit from {control_id:?}.");
            return;
        }
        if self.phase != SearchPhase::Idle {
            log::warn!(
                "SearchController: Search requested while {:?}, ignoring.",
                self.phase
            );
            return;
        }

        self.phase = SearchPhase::Validating;
        let request = SearchRequest {
            directory: form.text(ui_constants::PATH_INPUT_ID).to_string(),
            pattern: form.text(ui_constants::PATTERN_INPUT_ID).to_string(),
            case_sensitive: form.is_checked(ui_constants::CASE_SENSITIVE_CHECKBOX_ID),
        };
        log::debug!("SearchController: Validating {request:?}");

        match self.validate(&request) {
            Ok(()) => self.start_search(window_id, request),
            Err(message) => {
                log::debug!("SearchController: Validation failed: {message}");
                self.show_error(window_id, message, MessageBoxButtons::Ok);
                self.phase = SearchPhase::Idle;
            }
        }
    }

    /*
     * Clears the output, moves the process into the search directory, builds the
     * tool arguments and asks the platform to hand control back once the
     * "In Progress" status has been painted.
     */
    fn start_search(&mut self, window_id: WindowId, request: SearchRequest) {
        self.enqueue_command(PlatformCommand::SetInputText {
            window_id,
            control_id: ui_constants::OUTPUT_PANEL_ID,
            text: String::new(),
        });

        let base_name = match self
            .working_directory
            .change_directory(&request.directory)
            .and_then(|()| self.working_directory.get_base_name(&request.directory))
        {
            Ok(base_name) => base_name,
            Err(e) => {
                log::error!(
                    "SearchController: Could not enter directory '{}': {e}",
                    request.directory
                );
                self.show_error(window_id, &e.to_string(), MessageBoxButtons::Ok);
                self.phase = SearchPhase::Idle;
                return;
            }
        };

        let arguments = build_grep_arguments(&request, &base_name, &self.settings.file_extension);
        log::info!("SearchController: Starting search with arguments {arguments:?}");
        self.set_status(window_id, ui_constants::STATUS_IN_PROGRESS);

        if self.settings.remember_last_directory {
            if let Err(e) = self.config_manager.save_last_search_directory(
                ui_constants::APP_NAME,
                Some(Path::new(&request.directory)),
            ) {
                log::warn!("SearchController: Could not save last search directory: {e}");
            }
        }

        self.phase = SearchPhase::Running { arguments };
        self.enqueue_command(PlatformCommand::SignalSearchDispatch { window_id });
    }

    /*
     * Runs the external tool with the arguments of the current run. Tool-reported
     * errors (non-empty stderr) open a Retry/Cancel dialog; anything printed on
     * stdout otherwise is rendered as the result.
     */
    fn on_search_dispatch_ready(&mut self, window_id: WindowId) {
        let arguments = match &self.phase {
            SearchPhase::Running { arguments } => arguments.clone(),
            other => {
                log::warn!("SearchController: Dispatch signal received while {other:?}, ignoring.");
                return;
            }
        };

        match self.search_tool.run(&arguments) {
            Err(e) => {
                log::error!("SearchController: Search tool failed: {e}");
                self.show_error(window_id, &e.to_string(), MessageBoxButtons::Ok);
                self.set_status(window_id, ui_constants::STATUS_IDLE);
                self.phase = SearchPhase::Idle;
            }
            Ok(output) if !output.stderr.is_empty() => {
                log::warn!("SearchController: Search tool reported: {}", output.stderr.trim_end());
                self.show_error(window_id, &output.stderr, MessageBoxButtons::RetryCancel);
                self.phase = SearchPhase::RetryWait { arguments };
            }
            Ok(output) => {
                let result = SearchResult::from_stdout(output.stdout);
                log::info!("SearchController: {} matches found.", result.match_count);
                self.enqueue_command(PlatformCommand::SetInputText {
                    window_id,
                    control_id: ui_constants::OUTPUT_PANEL_ID,
                    text: result.render(),
                });
                self.set_status(window_id, ui_constants::STATUS_COMPLETE);
                self.enqueue_command(PlatformCommand::HoldDisplay {
                    window_id,
                    duration: Duration::from_millis(self.settings.completion_hold_ms),
                });
                self.set_status(window_id, ui_constants::STATUS_IDLE);
                self.phase = SearchPhase::Idle;
            }
        }
    }

    fn on_message_box_completed(&mut self, window_id: WindowId, outcome: DialogOutcome) {
        let phase = std::mem::replace(&mut self.phase, SearchPhase::Idle);
        match phase {
            SearchPhase::RetryWait { arguments } if outcome == DialogOutcome::Retry => {
                log::debug!("SearchController: Retrying search.");
                self.phase = SearchPhase::Running { arguments };
                self.enqueue_command(PlatformCommand::SignalSearchDispatch { window_id });
            }
            SearchPhase::RetryWait { .. } => {
                log::debug!("SearchController: Search abandoned with {outcome}.");
                self.set_status(window_id, ui_constants::STATUS_IDLE);
            }
            other => {
                // An acknowledged validation or launch error; nothing is pending.
                self.phase = other;
            }
        }
    }

    fn on_browse_clicked(&mut self, window_id: WindowId) {
        let initial_dir: Option<PathBuf> = match self.working_directory.get_current_directory() {
            Ok(directory) => Some(directory),
            Err(e) => {
                log::warn!("SearchController: No current directory for the folder picker: {e}");
                None
            }
        };
        self.enqueue_command(PlatformCommand::ShowFolderPickerDialog {
            window_id,
            title: FOLDER_PICKER_TITLE.to_string(),
            initial_dir,
        });
    }
}

impl PlatformEventHandler for SearchController {
    fn handle_event(&mut self, event: AppEvent) {
        log::trace!("SearchController: Handling {event:?}");
        match event {
            AppEvent::MainWindowUISetupComplete { window_id } => {
                self.on_main_window_ui_setup_complete(window_id)
            }
            AppEvent::FormSubmitted {
                window_id,
                control_id,
                form,
            } => {
                if self.is_main_window(window_id) {
                    self.on_form_submitted(window_id, control_id, form);
                }
            }
            AppEvent::ButtonClicked {
                window_id,
                control_id,
            } => {
                if self.is_main_window(window_id) && control_id == ui_constants::BROWSE_BUTTON_ID {
                    self.on_browse_clicked(window_id);
                }
            }
            AppEvent::FolderPickerDialogCompleted { window_id, path } => {
                if let (true, Some(path)) = (self.is_main_window(window_id), path) {
                    self.enqueue_command(PlatformCommand::SetInputText {
                        window_id,
                        control_id: ui_constants::PATH_INPUT_ID,
                        text: path.to_string_lossy().into_owned(),
                    });
                }
            }
            AppEvent::MessageBoxCompleted { window_id, outcome } => {
                if self.is_main_window(window_id) {
                    self.on_message_box_completed(window_id, outcome);
                }
            }
            AppEvent::SearchDispatchReady { window_id } => {
                if self.is_main_window(window_id) {
                    self.on_search_dispatch_ready(window_id);
                }
            }
            AppEvent::WindowCloseRequestedByUser { window_id } => {
                if self.is_main_window(window_id) {
                    log::debug!("SearchController: Main window close requested.");
                    self.enqueue_command(PlatformCommand::CloseWindow { window_id });
                }
            }
            AppEvent::WindowDestroyed { window_id } => {
                if self.is_main_window(window_id) {
                    log::debug!("SearchController: Main window destroyed, quitting.");
                    self.main_window_id = None;
                    self.phase = SearchPhase::Idle;
                    self.enqueue_command(PlatformCommand::QuitApplication);
                }
            }
        }
    }

    fn on_quit(&mut self) {
        log::debug!("SearchController: Application quitting.");
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.synchronous_command_queue.pop_front()
    }
}
