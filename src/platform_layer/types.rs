/*
 * This module defines core data types used for communication between the
 * application logic and the platform layer. It includes identifiers for windows
 * and controls, layout primitives, platform-agnostic event types (`AppEvent`),
 * commands for the platform layer (`PlatformCommand`), severity levels for status
 * messages (`MessageSeverity`), and the `PlatformEventHandler` trait that the
 * application logic must implement.
 */

use super::message_box::{DialogOutcome, MessageBoxRequest};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

// An opaque identifier for a native window, managed by the platform layer.
//
// The application logic layer uses this ID to refer to specific windows
// when sending commands or receiving events, without needing to know about
// native window handles like HWND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

impl WindowId {
    // Only the platform backends and tests mint window IDs.
    pub(crate) fn new(raw: usize) -> Self {
        WindowId(raw)
    }
}

// A logical identifier for a control within a window. Defined by the UI
// description and mapped to native handles by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(i32);

impl ControlId {
    pub const fn new(raw: i32) -> Self {
        ControlId(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }
}

// Configuration for creating a new native window.
#[derive(Debug, Clone)]
pub struct WindowConfig<'a> {
    pub title: &'a str,
    pub width: i32,
    pub height: i32,
}

/*
 * The values of a window's editable controls at the moment a submit button was
 * activated: single-line input texts and checkbox states, keyed by control ID.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub texts: HashMap<ControlId, String>,
    pub checks: HashMap<ControlId, bool>,
}

impl FormSnapshot {
    /// Returns the captured text of an input, or an empty string if it was not captured.
    pub fn text(&self, control_id: ControlId) -> &str {
        self.texts.get(&control_id).map(String::as_str).unwrap_or("")
    }

    pub fn is_checked(&self, control_id: ControlId) -> bool {
        self.checks.get(&control_id).copied().unwrap_or(false)
    }
}

// --- Layout Primitives ---

/*
 * Defines how a control docks within its parent container. Top/Bottom take a
 * fixed height from the respective edge, Left/Right a fixed width, and Fill takes
 * whatever space remains after all other siblings have been placed.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockStyle {
    Top,
    Bottom,
    Left,
    Right,
    Fill,
}

/*
 * A rule that associates a control (by its ID) with a docking style inside a
 * parent. `parent_control_id` of `None` means the window's client area; any other
 * ID names a container, which may be a purely logical row with no native control.
 * Lower `order` values are placed first.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRule {
    pub control_id: ControlId,
    pub parent_control_id: Option<ControlId>,
    pub dock_style: DockStyle,
    pub order: u32,
    pub fixed_size: Option<i32>,
    pub margin: (i32, i32, i32, i32), // (top, right, bottom, left)
}

// --- Events from Platform to App Logic ---

/*
 * Represents platform-agnostic UI events generated by the host toolkit.
 * The platform layer translates native events into these types and sends them
 * to the application logic layer for handling.
 */
#[derive(Debug, Clone)]
pub enum AppEvent {
    // Signals that the initial static UI setup for the main window is complete.
    MainWindowUISetupComplete {
        window_id: WindowId,
    },
    // A submitting button (or the Return key) was activated.
    FormSubmitted {
        window_id: WindowId,
        control_id: ControlId,
        form: FormSnapshot,
    },
    // A plain, non-submitting button was clicked.
    ButtonClicked {
        window_id: WindowId,
        control_id: ControlId,
    },
    FolderPickerDialogCompleted {
        window_id: WindowId,
        path: Option<PathBuf>,
    },
    MessageBoxCompleted {
        window_id: WindowId,
        outcome: DialogOutcome,
    },
    // Answer to `PlatformCommand::SignalSearchDispatch`, delivered once every
    // command queued before it has been executed and painted.
    SearchDispatchReady {
        window_id: WindowId,
    },
    WindowCloseRequestedByUser {
        window_id: WindowId,
    },
    // The window and its native resources are gone; the ID is invalid afterwards.
    WindowDestroyed {
        window_id: WindowId,
    },
}

// Defines the severity of a message shown in a label, e.g. the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

// Represents platform-agnostic commands sent from the application logic to the
// platform layer. Commands are executed strictly in the order they were queued.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCommand {
    CreateLabel {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    CreateInput {
        window_id: WindowId,
        control_id: ControlId,
        initial_text: String,
        // Shown as a cue banner, and used as the prompt by text-mode hosts.
        hint: String,
    },
    CreateButton {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
        // Activating the button sends `FormSubmitted` instead of `ButtonClicked`.
        submits_form: bool,
        // The button activated by the Return key.
        is_default: bool,
    },
    CreateCheckbox {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
        checked: bool,
    },
    // A read-only, multi-line, scrollable text area.
    CreateTextPanel {
        window_id: WindowId,
        control_id: ControlId,
    },
    DefineLayout {
        window_id: WindowId,
        rules: Vec<LayoutRule>,
    },
    // Signals to the platform layer that all initial UI description commands
    // for the main window have been enqueued.
    SignalMainWindowUISetupComplete {
        window_id: WindowId,
    },
    ShowWindow {
        window_id: WindowId,
    },
    // Replaces the text of an input or text panel.
    SetInputText {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    UpdateLabelText {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
        severity: MessageSeverity,
    },
    // Shows a blocking modal message box; the platform answers with
    // `AppEvent::MessageBoxCompleted`.
    ShowMessageBox {
        window_id: WindowId,
        request: MessageBoxRequest,
    },
    ShowFolderPickerDialog {
        window_id: WindowId,
        title: String,
        initial_dir: Option<PathBuf>,
    },
    // Asks the platform to hand control back via `AppEvent::SearchDispatchReady`.
    SignalSearchDispatch {
        window_id: WindowId,
    },
    // Repaints the window and blocks the UI thread for `duration`.
    HoldDisplay {
        window_id: WindowId,
        duration: Duration,
    },
    CloseWindow {
        window_id: WindowId,
    },
    QuitApplication,
}

// --- Trait for App Logic to Handle Events ---

// A trait to be implemented by the application logic layer to handle UI events.
//
// The platform layer calls methods on this trait to notify the application
// logic about user interactions or system events.
pub trait PlatformEventHandler: Send + Sync + 'static {
    // Called by the platform layer when a native UI event has been processed.
    // The implementor should handle the event and enqueue `PlatformCommand`s
    // for the platform layer to execute.
    fn handle_event(&mut self, event: AppEvent);

    // Called by the platform layer when the application is about to exit its main loop.
    fn on_quit(&mut self) {}

    // Attempts to dequeue a single `PlatformCommand` from the internal queue.
    // This is called by the platform layer after every delivered event.
    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;
}
