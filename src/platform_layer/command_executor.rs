/*
 * This module is responsible for executing `PlatformCommand`s on Win32. It maps
 * each command to the control handler that owns it, and implements the
 * window-level commands (layout, visibility, dispatch signals, shutdown)
 * directly.
 */

use super::app::Win32ApiInternalState;
use super::controls::{button_handler, dialog_handler, input_handler, label_handler};
use super::error::Result as PlatformResult;
use super::types::{LayoutRule, PlatformCommand, WindowId};
use super::window_common::{self, WM_APP_MAIN_WINDOW_UI_SETUP_COMPLETE, WM_APP_SEARCH_DISPATCH};

use std::sync::Arc;
use std::time::Duration;
use windows::Win32::{
    Foundation::{LPARAM, WPARAM},
    Graphics::Gdi::UpdateWindow,
    UI::WindowsAndMessaging::{DestroyWindow, PostMessageW, PostQuitMessage, SW_SHOW, ShowWindow},
};

pub(crate) fn execute(
    internal_state: &Arc<Win32ApiInternalState>,
    command: PlatformCommand,
) -> PlatformResult<()> {
    match command {
        PlatformCommand::CreateLabel {
            window_id,
            control_id,
            text,
        } => {
            label_handler::handle_create_label_command(internal_state, window_id, control_id, text)
        }
        PlatformCommand::CreateInput {
            window_id,
            control_id,
            initial_text,
            hint,
        } => input_handler::handle_create_input_command(
            internal_state,
            window_id,
            control_id,
            initial_text,
            hint,
        ),
        PlatformCommand::CreateButton {
            window_id,
            control_id,
            text,
            submits_form,
            is_default,
        } => button_handler::handle_create_button_command(
            internal_state,
            window_id,
            control_id,
            text,
            submits_form,
            is_default,
        ),
        PlatformCommand::CreateCheckbox {
            window_id,
            control_id,
            text,
            checked,
        } => button_handler::handle_create_checkbox_command(
            internal_state,
            window_id,
            control_id,
            text,
            checked,
        ),
        PlatformCommand::CreateTextPanel {
            window_id,
            control_id,
        } => input_handler::handle_create_text_panel_command(internal_state, window_id, control_id),
        PlatformCommand::DefineLayout { window_id, rules } => {
            execute_define_layout(internal_state, window_id, rules)
        }
        PlatformCommand::SignalMainWindowUISetupComplete { window_id } => {
            post_to_window(internal_state, window_id, WM_APP_MAIN_WINDOW_UI_SETUP_COMPLETE)
        }
        PlatformCommand::ShowWindow { window_id } => {
            let hwnd = internal_state.get_hwnd(window_id)?;
            unsafe {
                let _ = ShowWindow(hwnd, SW_SHOW);
                let _ = UpdateWindow(hwnd);
            }
            Ok(())
        }
        PlatformCommand::SetInputText {
            window_id,
            control_id,
            text,
        } => input_handler::handle_set_input_text_command(
            internal_state,
            window_id,
            control_id,
            text,
        ),
        PlatformCommand::UpdateLabelText {
            window_id,
            control_id,
            text,
            severity,
        } => label_handler::handle_update_label_text_command(
            internal_state,
            window_id,
            control_id,
            text,
            severity,
        ),
        PlatformCommand::ShowMessageBox { window_id, request } => {
            dialog_handler::handle_show_message_box_command(internal_state, window_id, request)
        }
        PlatformCommand::ShowFolderPickerDialog {
            window_id,
            title,
            initial_dir,
        } => dialog_handler::handle_show_folder_picker_dialog_command(
            internal_state,
            window_id,
            title,
            initial_dir,
        ),
        PlatformCommand::SignalSearchDispatch { window_id } => {
            // Paint pending updates (the status line) before the blocking search runs;
            // posted messages are otherwise retrieved ahead of WM_PAINT.
            let hwnd = internal_state.get_hwnd(window_id)?;
            let _ = unsafe { UpdateWindow(hwnd) };
            post_to_window(internal_state, window_id, WM_APP_SEARCH_DISPATCH)
        }
        PlatformCommand::HoldDisplay {
            window_id,
            duration,
        } => execute_hold_display(internal_state, window_id, duration),
        PlatformCommand::CloseWindow { window_id } => {
            let hwnd = internal_state.get_hwnd(window_id)?;
            log::debug!("CommandExecutor: Destroying window {window_id:?}.");
            unsafe { DestroyWindow(hwnd)? };
            Ok(())
        }
        PlatformCommand::QuitApplication => {
            log::debug!("CommandExecutor: Posting WM_QUIT.");
            unsafe { PostQuitMessage(0) };
            Ok(())
        }
    }
}

/*
 * Stores the layout rules for the window and applies them right away, since
 * the window may already have received its initial WM_SIZE.
 */
fn execute_define_layout(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    rules: Vec<LayoutRule>,
) -> PlatformResult<()> {
    log::debug!(
        "CommandExecutor: execute_define_layout for WinID {window_id:?}, with {} rules.",
        rules.len()
    );
    internal_state.with_window_data_write(window_id, |window_data| {
        window_data.layout_rules = Some(rules);
        Ok(())
    })?;
    window_common::relayout(internal_state, window_id)
}

fn execute_hold_display(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    duration: Duration,
) -> PlatformResult<()> {
    let hwnd = internal_state.get_hwnd(window_id)?;
    let _ = unsafe { UpdateWindow(hwnd) };
    std::thread::sleep(duration);
    Ok(())
}

fn post_to_window(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    message: u32,
) -> PlatformResult<()> {
    let hwnd = internal_state.get_hwnd(window_id)?;
    unsafe { PostMessageW(Some(hwnd), message, WPARAM(0), LPARAM(0))? };
    Ok(())
}
