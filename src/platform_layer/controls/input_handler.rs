/*
 * Provides handling for input (EDIT) controls: single-line form inputs with a
 * cue banner, and the read-only multi-line output panel.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::controls::create_child_control;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{ControlId, WindowId};
use crate::platform_layer::window_common::WC_EDIT;

use std::sync::Arc;
use windows::{
    Win32::{
        Foundation::{LPARAM, WPARAM},
        UI::{
            Controls::EM_SETCUEBANNER,
            WindowsAndMessaging::{
                ES_AUTOHSCROLL, ES_AUTOVSCROLL, ES_MULTILINE, ES_READONLY, SendMessageW,
                SetWindowTextW, WINDOW_STYLE, WS_EX_CLIENTEDGE, WS_HSCROLL, WS_TABSTOP, WS_VSCROLL,
            },
        },
    },
    core::HSTRING,
};

pub(crate) fn handle_create_input_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    initial_text: String,
    hint: String,
) -> PlatformResult<()> {
    log::debug!(
        "InputHandler: handle_create_input_command for WinID {window_id:?}, ControlID {control_id:?}"
    );
    let hwnd_edit = create_child_control(
        internal_state,
        window_id,
        control_id,
        WC_EDIT,
        &initial_text,
        WS_TABSTOP | WINDOW_STYLE(ES_AUTOHSCROLL as u32),
        WS_EX_CLIENTEDGE,
    )?;
    if !hint.is_empty() {
        let hint_hstring = HSTRING::from(hint.as_str());
        unsafe {
            SendMessageW(
                hwnd_edit,
                EM_SETCUEBANNER,
                Some(WPARAM(0)),
                Some(LPARAM(hint_hstring.as_ptr() as isize)),
            );
        }
    }
    internal_state.with_window_data_write(window_id, |window_data| {
        window_data.form_inputs.push(control_id);
        Ok(())
    })
}

pub(crate) fn handle_create_text_panel_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
) -> PlatformResult<()> {
    log::debug!(
        "InputHandler: handle_create_text_panel_command for WinID {window_id:?}, ControlID {control_id:?}"
    );
    create_child_control(
        internal_state,
        window_id,
        control_id,
        WC_EDIT,
        "",
        WS_VSCROLL
            | WS_HSCROLL
            | WINDOW_STYLE((ES_MULTILINE | ES_READONLY | ES_AUTOVSCROLL | ES_AUTOHSCROLL) as u32),
        WS_EX_CLIENTEDGE,
    )?;
    Ok(())
}

/*
 * Replaces the text of an input or text panel. Line breaks are normalized to
 * CRLF, which is what multi-line EDIT controls render as new lines.
 */
pub(crate) fn handle_set_input_text_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    text: String,
) -> PlatformResult<()> {
    let hwnd_edit = internal_state.with_window_data_read(window_id, |window_data| {
        window_data.get_control_hwnd(control_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!(
                "Input {control_id:?} not found for SetInputText in WinID {window_id:?}"
            ))
        })
    })?;
    let display_text = to_crlf(&text);
    unsafe { SetWindowTextW(hwnd_edit, &HSTRING::from(display_text.as_str()))? };
    Ok(())
}

fn to_crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}
