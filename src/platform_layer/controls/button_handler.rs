/*
 * Encapsulates Win32-specific operations for button controls: push buttons
 * (plain or form-submitting, optionally the default button) and auto-checkboxes.
 * Translates BN_CLICKED notifications, and the Return key reported as IDOK,
 * into platform-agnostic `AppEvent`s.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::controls::create_child_control;
use crate::platform_layer::error::Result as PlatformResult;
use crate::platform_layer::types::{AppEvent, ControlId, FormSnapshot, WindowId};
use crate::platform_layer::window_common::WC_BUTTON;

use std::sync::Arc;
use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::{
        Controls::BST_CHECKED,
        WindowsAndMessaging::{
            BM_GETCHECK, BM_SETCHECK, BS_AUTOCHECKBOX, BS_DEFPUSHBUTTON, BS_PUSHBUTTON,
            GetWindowTextLengthW, GetWindowTextW, SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE,
            WS_TABSTOP,
        },
    },
};

pub(crate) fn handle_create_button_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    text: String,
    submits_form: bool,
    is_default: bool,
) -> PlatformResult<()> {
    log::debug!(
        "ButtonHandler: handle_create_button_command for WinID {window_id:?}, ControlID {control_id:?}, Text: '{text}'"
    );
    let button_style = if is_default {
        BS_DEFPUSHBUTTON
    } else {
        BS_PUSHBUTTON
    };
    create_child_control(
        internal_state,
        window_id,
        control_id,
        WC_BUTTON,
        &text,
        WS_TABSTOP | WINDOW_STYLE(button_style as u32),
        WINDOW_EX_STYLE(0),
    )?;

    internal_state.with_window_data_write(window_id, |window_data| {
        if submits_form {
            window_data.submit_buttons.insert(control_id);
        }
        if is_default {
            window_data.default_button = Some(control_id);
        }
        Ok(())
    })
}

pub(crate) fn handle_create_checkbox_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    text: String,
    checked: bool,
) -> PlatformResult<()> {
    log::debug!(
        "ButtonHandler: handle_create_checkbox_command for WinID {window_id:?}, ControlID {control_id:?}, Text: '{text}'"
    );
    let hwnd_checkbox = create_child_control(
        internal_state,
        window_id,
        control_id,
        WC_BUTTON,
        &text,
        WS_TABSTOP | WINDOW_STYLE(BS_AUTOCHECKBOX as u32),
        WINDOW_EX_STYLE(0),
    )?;
    if checked {
        unsafe {
            SendMessageW(
                hwnd_checkbox,
                BM_SETCHECK,
                Some(WPARAM(BST_CHECKED.0 as usize)),
                Some(LPARAM(0)),
            );
        }
    }
    internal_state.with_window_data_write(window_id, |window_data| {
        window_data.form_checkboxes.push(control_id);
        Ok(())
    })
}

/*
 * Translates a BN_CLICKED notification. Submitting buttons produce a
 * `FormSubmitted` with a snapshot of the form; checkboxes toggle themselves and
 * produce nothing.
 */
pub(crate) fn handle_bn_clicked(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
) -> Option<AppEvent> {
    log::debug!("ButtonHandler: BN_CLICKED for {control_id:?} in WinID {window_id:?}");
    let (is_submit, is_checkbox) = internal_state
        .with_window_data_read(window_id, |window_data| {
            Ok((
                window_data.submit_buttons.contains(&control_id),
                window_data.form_checkboxes.contains(&control_id),
            ))
        })
        .ok()?;

    if is_checkbox {
        None
    } else if is_submit {
        let form = capture_form(internal_state, window_id).ok()?;
        Some(AppEvent::FormSubmitted {
            window_id,
            control_id,
            form,
        })
    } else {
        Some(AppEvent::ButtonClicked {
            window_id,
            control_id,
        })
    }
}

/// Activates the default button of the window, as if it had been clicked.
pub(crate) fn default_button_activation(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> Option<AppEvent> {
    let default_button = internal_state
        .with_window_data_read(window_id, |window_data| Ok(window_data.default_button))
        .ok()
        .flatten()?;
    handle_bn_clicked(internal_state, window_id, default_button)
}

/*
 * Reads the current text of every form input and the state of every checkbox.
 * The HWNDs are collected first so that no lock is held while messages are sent.
 */
fn capture_form(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<FormSnapshot> {
    let (inputs, checkboxes) = internal_state.with_window_data_read(window_id, |window_data| {
        let collect = |ids: &[ControlId]| -> Vec<(ControlId, HWND)> {
            ids.iter()
                .filter_map(|id| window_data.get_control_hwnd(*id).map(|hwnd| (*id, hwnd)))
                .collect()
        };
        Ok((
            collect(&window_data.form_inputs),
            collect(&window_data.form_checkboxes),
        ))
    })?;

    let mut form = FormSnapshot::default();
    for (control_id, hwnd) in inputs {
        form.texts.insert(control_id, read_window_text(hwnd));
    }
    for (control_id, hwnd) in checkboxes {
        let state = unsafe { SendMessageW(hwnd, BM_GETCHECK, Some(WPARAM(0)), Some(LPARAM(0))) };
        form.checks
            .insert(control_id, state.0 == BST_CHECKED.0 as isize);
    }
    Ok(form)
}

pub(crate) fn read_window_text(hwnd: HWND) -> String {
    unsafe {
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return String::new();
        }
        let mut buffer: Vec<u16> = vec![0; len as usize + 1];
        let copied = GetWindowTextW(hwnd, &mut buffer);
        String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
    }
}
