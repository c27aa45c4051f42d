/*
 * Handles label (STATIC) controls: creation, text updates carrying a severity,
 * and severity-based text coloring through WM_CTLCOLORSTATIC.
 */

use crate::platform_layer::{
    app::Win32ApiInternalState,
    controls::create_child_control,
    error::{PlatformError, Result as PlatformResult},
    types::{ControlId, MessageSeverity, WindowId},
    window_common::{SS_CENTERIMAGE, SS_LEFT, WC_STATIC},
};

use std::sync::Arc;
use windows::{
    Win32::{
        Foundation::{COLORREF, GetLastError, LRESULT},
        Graphics::Gdi::{
            COLOR_WINDOW, COLOR_WINDOWTEXT, GetSysColor, GetSysColorBrush, HDC, InvalidateRect,
            SetBkMode, SetTextColor, TRANSPARENT,
        },
        UI::WindowsAndMessaging::{SetWindowTextW, WINDOW_EX_STYLE},
    },
    core::HSTRING,
};

pub(crate) fn handle_create_label_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    label_id: ControlId,
    initial_text: String,
) -> PlatformResult<()> {
    log::debug!(
        "LabelHandler: handle_create_label_command for WinID {window_id:?}, LabelID: {label_id:?}, Text: '{initial_text}'"
    );
    create_child_control(
        internal_state,
        window_id,
        label_id,
        WC_STATIC,
        &initial_text,
        SS_LEFT | SS_CENTERIMAGE,
        WINDOW_EX_STYLE(0),
    )?;
    internal_state.with_window_data_write(window_id, |window_data| {
        window_data
            .label_severities
            .insert(label_id, MessageSeverity::Information);
        Ok(())
    })
}

/*
 * Updates a label's text and severity. The severity is stored under the write
 * lock, which is released before SetWindowTextW since that call synchronously
 * dispatches WM_CTLCOLORSTATIC back into this window.
 */
pub(crate) fn handle_update_label_text_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    label_id: ControlId,
    text: String,
    severity: MessageSeverity,
) -> PlatformResult<()> {
    let hwnd_label = internal_state.with_window_data_write(window_id, |window_data| {
        let hwnd = window_data.get_control_hwnd(label_id).ok_or_else(|| {
            log::warn!(
                "LabelHandler: Label {label_id:?} not found for UpdateLabelText in WinID {window_id:?}."
            );
            PlatformError::InvalidHandle(format!(
                "Label {label_id:?} not found for UpdateLabelText in WinID {window_id:?}"
            ))
        })?;
        window_data.label_severities.insert(label_id, severity);
        Ok(hwnd)
    })?;

    unsafe {
        if SetWindowTextW(hwnd_label, &HSTRING::from(text.as_str())).is_err() {
            let last_error = GetLastError();
            log::error!("LabelHandler: SetWindowTextW for {label_id:?} failed: {last_error:?}");
            return Err(PlatformError::OperationFailed(format!(
                "SetWindowTextW for label {label_id:?} failed: {last_error:?}"
            )));
        }
        let _ = InvalidateRect(Some(hwnd_label), None, true);
    }
    Ok(())
}

pub(crate) fn handle_wm_ctlcolorstatic(hdc_static_ctrl: HDC, severity: MessageSeverity) -> LRESULT {
    let color = match severity {
        MessageSeverity::Error => COLORREF(0x0000_00FF),
        MessageSeverity::Warning => COLORREF(0x0000_A5FF),
        MessageSeverity::Information => COLORREF(unsafe { GetSysColor(COLOR_WINDOWTEXT) }),
    };
    unsafe {
        SetTextColor(hdc_static_ctrl, color);
        SetBkMode(hdc_static_ctrl, TRANSPARENT);
        let brush = GetSysColorBrush(COLOR_WINDOW);
        LRESULT(brush.0 as isize)
    }
}
