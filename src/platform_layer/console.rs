/*
 * A line-oriented host for platforms without a native Win32 UI. It executes the
 * same `PlatformCommand`s as the Win32 backend and produces the same `AppEvent`s,
 * rendering the window as a sequence of prompts on a text stream:
 *
 * - every input is prompted as `hint [current]:`, an empty reply keeps the value,
 * - checkboxes are asked as `text (y/N) [current]:`,
 * - after the last prompt the form is submitted through the default button,
 * - `:browse` at any prompt clicks the first non-submitting button,
 * - `:q` or end of input requests the window to close.
 *
 * Message boxes list their buttons as numbered choices; the reply may be the
 * number or the outcome name. End of input picks the last choice, which is the
 * cancelling one for every button set that has one.
 */

use super::error::{PlatformError, Result as PlatformResult};
use super::message_box::{DialogOutcome, MessageBoxRequest};
use super::types::{
    AppEvent, ControlId, FormSnapshot, PlatformCommand, PlatformEventHandler, WindowConfig,
    WindowId,
};

use std::collections::VecDeque;
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

const QUIT_REPLY: &str = ":q";
const BROWSE_REPLY: &str = ":browse";

#[derive(Debug, Clone, PartialEq)]
enum ConsoleControl {
    Label {
        text: String,
    },
    Input {
        text: String,
        hint: String,
    },
    Button {
        text: String,
        submits_form: bool,
        is_default: bool,
    },
    Checkbox {
        text: String,
        checked: bool,
    },
    TextPanel {
        text: String,
    },
}

#[derive(Debug)]
struct ConsoleWindow {
    id: WindowId,
    title: String,
    controls: Vec<(ControlId, ConsoleControl)>,
    visible: bool,
}

impl ConsoleWindow {
    fn control_mut(&mut self, control_id: ControlId) -> PlatformResult<&mut ConsoleControl> {
        self.controls
            .iter_mut()
            .find(|(id, _)| *id == control_id)
            .map(|(_, control)| control)
            .ok_or_else(|| {
                PlatformError::InvalidHandle(format!(
                    "Control {control_id:?} not found in window {:?}",
                    self.id
                ))
            })
    }

    fn add_control(
        &mut self,
        control_id: ControlId,
        control: ConsoleControl,
    ) -> PlatformResult<()> {
        if self.controls.iter().any(|(id, _)| *id == control_id) {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Control {control_id:?} already exists in window {:?}",
                self.id
            )));
        }
        self.controls.push((control_id, control));
        Ok(())
    }

    fn submit_button(&self) -> Option<ControlId> {
        let submitting = |control: &ConsoleControl| {
            matches!(control, ConsoleControl::Button { submits_form: true, .. })
        };
        self.controls
            .iter()
            .find(|(_, control)| {
                matches!(control, ConsoleControl::Button { is_default: true, .. })
                    && submitting(control)
            })
            .or_else(|| self.controls.iter().find(|(_, control)| submitting(control)))
            .map(|(id, _)| *id)
    }

    fn browse_button(&self) -> Option<ControlId> {
        self.controls
            .iter()
            .find(|(_, control)| {
                matches!(control, ConsoleControl::Button { submits_form: false, .. })
            })
            .map(|(id, _)| *id)
    }

    fn snapshot(&self) -> FormSnapshot {
        let mut form = FormSnapshot::default();
        for (id, control) in &self.controls {
            match control {
                ConsoleControl::Input { text, .. } => {
                    form.texts.insert(*id, text.clone());
                }
                ConsoleControl::Checkbox { checked, .. } => {
                    form.checks.insert(*id, *checked);
                }
                _ => {}
            }
        }
        form
    }
}

enum PromptReply {
    Value(String),
    Browse,
    Quit,
}

/*
 * The console host proper, generic over its streams so that tests can drive it
 * with in-memory buffers.
 */
pub(crate) struct ConsoleHost<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    windows: Vec<ConsoleWindow>,
    next_window_id: usize,
    pending_events: VecDeque<AppEvent>,
    quit_requested: bool,
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    pub(crate) fn new(reader: R, writer: W) -> Self {
        ConsoleHost {
            reader,
            writer,
            windows: Vec::new(),
            next_window_id: 1,
            pending_events: VecDeque::new(),
            quit_requested: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn writer(&self) -> &W {
        &self.writer
    }

    pub(crate) fn create_window(&mut self, config: WindowConfig) -> PlatformResult<WindowId> {
        if config.width <= 0 || config.height <= 0 {
            return Err(PlatformError::WindowCreationFailed(format!(
                "'{}' has an empty size {}x{}",
                config.title, config.width, config.height
            )));
        }
        let id = WindowId::new(self.next_window_id);
        self.next_window_id += 1;
        self.windows.push(ConsoleWindow {
            id,
            title: config.title.to_string(),
            controls: Vec::new(),
            visible: false,
        });
        log::debug!("Console: Created window {id:?} '{}'.", config.title);
        Ok(id)
    }

    fn window_mut(&mut self, window_id: WindowId) -> PlatformResult<&mut ConsoleWindow> {
        self.windows
            .iter_mut()
            .find(|window| window.id == window_id)
            .ok_or_else(|| {
                PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
            })
    }

    pub(crate) fn execute_command(&mut self, command: PlatformCommand) -> PlatformResult<()> {
        log::trace!("Console: Executing command {command:?}");
        match command {
            PlatformCommand::CreateLabel {
                window_id,
                control_id,
                text,
            } => self
                .window_mut(window_id)?
                .add_control(control_id, ConsoleControl::Label { text }),
            PlatformCommand::CreateInput {
                window_id,
                control_id,
                initial_text,
                hint,
            } => self.window_mut(window_id)?.add_control(
                control_id,
                ConsoleControl::Input {
                    text: initial_text,
                    hint,
                },
            ),
            PlatformCommand::CreateButton {
                window_id,
                control_id,
                text,
                submits_form,
                is_default,
            } => self.window_mut(window_id)?.add_control(
                control_id,
                ConsoleControl::Button {
                    text,
                    submits_form,
                    is_default,
                },
            ),
            PlatformCommand::CreateCheckbox {
                window_id,
                control_id,
                text,
                checked,
            } => self
                .window_mut(window_id)?
                .add_control(control_id, ConsoleControl::Checkbox { text, checked }),
            PlatformCommand::CreateTextPanel {
                window_id,
                control_id,
            } => self.window_mut(window_id)?.add_control(
                control_id,
                ConsoleControl::TextPanel {
                    text: String::new(),
                },
            ),
            PlatformCommand::DefineLayout { window_id, rules } => {
                self.window_mut(window_id)?;
                log::debug!("Console: Ignoring {} layout rules for {window_id:?}.", rules.len());
                Ok(())
            }
            PlatformCommand::SignalMainWindowUISetupComplete { window_id } => {
                self.pending_events
                    .push_back(AppEvent::MainWindowUISetupComplete { window_id });
                Ok(())
            }
            PlatformCommand::ShowWindow { window_id } => {
                let window = self.window_mut(window_id)?;
                window.visible = true;
                let banner = format!("== {} ==", window.title);
                writeln!(self.writer, "{banner}")?;
                Ok(())
            }
            PlatformCommand::SetInputText {
                window_id,
                control_id,
                text,
            } => {
                let control = self.window_mut(window_id)?.control_mut(control_id)?;
                match control {
                    ConsoleControl::Input { text: current, .. } => *current = text,
                    ConsoleControl::TextPanel { text: current } => {
                        *current = text.clone();
                        if !text.is_empty() {
                            writeln!(self.writer, "{}", text.trim_end_matches('\n'))?;
                        }
                    }
                    other => {
                        return Err(PlatformError::OperationFailed(format!(
                            "SetInputText on non-text control {control_id:?}: {other:?}"
                        )));
                    }
                }
                Ok(())
            }
            PlatformCommand::UpdateLabelText {
                window_id,
                control_id,
                text,
                severity,
            } => {
                let control = self.window_mut(window_id)?.control_mut(control_id)?;
                if let ConsoleControl::Label { text: current } = control {
                    *current = text.clone();
                }
                log::debug!("Console: Label {control_id:?} ({severity:?}): {text}");
                writeln!(self.writer, "{text}")?;
                Ok(())
            }
            PlatformCommand::ShowMessageBox { window_id, request } => {
                let outcome = self.show_message_box(&request)?;
                self.pending_events
                    .push_back(AppEvent::MessageBoxCompleted { window_id, outcome });
                Ok(())
            }
            PlatformCommand::ShowFolderPickerDialog {
                window_id,
                title,
                initial_dir,
            } => {
                let path = self.pick_folder(&title, initial_dir)?;
                self.pending_events
                    .push_back(AppEvent::FolderPickerDialogCompleted { window_id, path });
                Ok(())
            }
            PlatformCommand::SignalSearchDispatch { window_id } => {
                self.writer.flush()?;
                self.pending_events
                    .push_back(AppEvent::SearchDispatchReady { window_id });
                Ok(())
            }
            PlatformCommand::HoldDisplay {
                window_id,
                duration,
            } => {
                self.window_mut(window_id)?;
                self.writer.flush()?;
                std::thread::sleep(duration);
                Ok(())
            }
            PlatformCommand::CloseWindow { window_id } => {
                self.window_mut(window_id)?;
                self.windows.retain(|window| window.id != window_id);
                self.pending_events
                    .push_back(AppEvent::WindowDestroyed { window_id });
                Ok(())
            }
            PlatformCommand::QuitApplication => {
                self.quit_requested = true;
                Ok(())
            }
        }
    }

    /*
     * Delivers events until the application quits. Events produced by commands
     * are delivered first; the form is prompted only when nothing is pending.
     */
    pub(crate) fn run(
        &mut self,
        event_handler: &Arc<Mutex<dyn PlatformEventHandler>>,
    ) -> PlatformResult<()> {
        while !self.quit_requested {
            let event = match self.pending_events.pop_front() {
                Some(event) => event,
                None => match self.next_user_event()? {
                    Some(event) => event,
                    None => {
                        log::debug!("Console: No visible window left, leaving the event loop.");
                        break;
                    }
                },
            };
            self.dispatch(event_handler, event)?;
        }
        if let Ok(mut handler_guard) = event_handler.lock() {
            handler_guard.on_quit();
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        event_handler: &Arc<Mutex<dyn PlatformEventHandler>>,
        event: AppEvent,
    ) -> PlatformResult<()> {
        log::trace!("Console: Dispatching {event:?}");
        event_handler
            .lock()
            .map_err(|_| PlatformError::OperationFailed("Event handler lock poisoned".into()))?
            .handle_event(event);
        loop {
            // Dequeue under a short-lived lock; commands are executed without it.
            let next_command = event_handler
                .lock()
                .map_err(|_| PlatformError::OperationFailed("Event handler lock poisoned".into()))?
                .try_dequeue_command();
            let Some(command) = next_command else {
                break;
            };
            if let Err(e) = self.execute_command(command) {
                log::error!("Console: Error executing command: {e}");
            }
        }
        Ok(())
    }

    fn next_user_event(&mut self) -> PlatformResult<Option<AppEvent>> {
        let Some(window_index) = self.windows.iter().position(|window| window.visible) else {
            return Ok(None);
        };
        let window_id = self.windows[window_index].id;
        let control_ids: Vec<ControlId> = self.windows[window_index]
            .controls
            .iter()
            .map(|(id, _)| *id)
            .collect();

        for control_id in control_ids {
            let prompt = match self.windows[window_index].control_mut(control_id)? {
                ConsoleControl::Input { text, hint } => format!("{hint} [{text}]: "),
                ConsoleControl::Checkbox { text, checked } => {
                    format!("{text} (y/N) [{}]: ", if *checked { "y" } else { "n" })
                }
                _ => continue,
            };
            let reply = match self.prompt(&prompt)? {
                PromptReply::Quit => {
                    return Ok(Some(AppEvent::WindowCloseRequestedByUser { window_id }));
                }
                PromptReply::Browse => match self.windows[window_index].browse_button() {
                    Some(button_id) => {
                        return Ok(Some(AppEvent::ButtonClicked {
                            window_id,
                            control_id: button_id,
                        }));
                    }
                    None => continue,
                },
                PromptReply::Value(reply) => reply,
            };
            if reply.is_empty() {
                continue;
            }
            match self.windows[window_index].control_mut(control_id)? {
                ConsoleControl::Input { text, .. } => *text = reply,
                ConsoleControl::Checkbox { checked, .. } => {
                    *checked = matches!(reply.to_ascii_lowercase().as_str(), "y" | "yes");
                }
                _ => {}
            }
        }

        let window = &self.windows[window_index];
        match window.submit_button() {
            Some(control_id) => Ok(Some(AppEvent::FormSubmitted {
                window_id,
                control_id,
                form: window.snapshot(),
            })),
            None => Ok(Some(AppEvent::WindowCloseRequestedByUser { window_id })),
        }
    }

    fn read_reply(&mut self) -> PlatformResult<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, prompt: &str) -> PlatformResult<PromptReply> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;
        Ok(match self.read_reply()? {
            None => PromptReply::Quit,
            Some(reply) if reply.trim() == QUIT_REPLY => PromptReply::Quit,
            Some(reply) if reply.trim() == BROWSE_REPLY => PromptReply::Browse,
            Some(reply) => PromptReply::Value(reply.trim().to_string()),
        })
    }

    fn show_message_box(&mut self, request: &MessageBoxRequest) -> PlatformResult<DialogOutcome> {
        let choices = request.buttons.choices();
        match request.icon.caption_tag() {
            Some(tag) => writeln!(self.writer, "[{tag}] {}", request.title)?,
            None => writeln!(self.writer, "{}", request.title)?,
        }
        writeln!(self.writer, "{}", request.text.trim_end_matches('\n'))?;
        for (index, outcome) in choices.iter().enumerate() {
            writeln!(self.writer, "  {}) {outcome}", index + 1)?;
        }
        let fallback = choices
            .last()
            .copied()
            .unwrap_or(DialogOutcome::Cancel);

        loop {
            write!(self.writer, "Choice: ")?;
            self.writer.flush()?;
            let Some(reply) = self.read_reply()? else {
                return Ok(fallback);
            };
            let reply = reply.trim();
            if let Ok(number) = reply.parse::<usize>() {
                if let Some(outcome) = number.checked_sub(1).and_then(|i| choices.get(i)) {
                    return Ok(*outcome);
                }
            } else if let Ok(outcome) = reply.parse::<DialogOutcome>() {
                if choices.contains(&outcome) {
                    return Ok(outcome);
                }
            }
            writeln!(self.writer, "Please pick one of the listed choices.")?;
        }
    }

    fn pick_folder(
        &mut self,
        title: &str,
        initial_dir: Option<PathBuf>,
    ) -> PlatformResult<Option<PathBuf>> {
        let current = initial_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
        write!(self.writer, "{title} [{current}]: ")?;
        self.writer.flush()?;
        Ok(match self.read_reply()? {
            Some(reply) if !reply.trim().is_empty() => Some(PathBuf::from(reply.trim())),
            _ => None,
        })
    }
}

/// The primary interface to the platform abstraction layer.
pub struct PlatformInterface {
    host: Mutex<ConsoleHost<StdinLock<'static>, Stdout>>,
}

impl PlatformInterface {
    pub fn new(app_name: String) -> PlatformResult<Self> {
        log::debug!("Platform: Starting console host for '{app_name}'.");
        let stdin: Stdin = io::stdin();
        Ok(PlatformInterface {
            host: Mutex::new(ConsoleHost::new(stdin.lock(), io::stdout())),
        })
    }

    fn host(&self) -> PlatformResult<MutexGuard<'_, ConsoleHost<StdinLock<'static>, Stdout>>> {
        self.host
            .lock()
            .map_err(|_| PlatformError::OperationFailed("Console host lock poisoned".into()))
    }

    pub fn create_window(&self, config: WindowConfig) -> PlatformResult<WindowId> {
        self.host()?.create_window(config)
    }

    /// Executes a command outside of event handling, e.g. the initial UI description.
    pub fn execute_command(&self, command: PlatformCommand) -> PlatformResult<()> {
        self.host()?.execute_command(command)
    }

    pub fn run(&self, event_handler: Arc<Mutex<dyn PlatformEventHandler>>) -> PlatformResult<()> {
        self.host()?.run(&event_handler)
    }
}
