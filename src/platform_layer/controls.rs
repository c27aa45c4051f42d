/*
 * Win32 control handlers. Each sub-module owns the creation of one kind of
 * native control and the translation of its notifications into `AppEvent`s.
 * `create_child_control` holds the creation steps they all share.
 */
pub(crate) mod button_handler;
pub(crate) mod dialog_handler;
pub(crate) mod input_handler;
pub(crate) mod label_handler;

use super::app::Win32ApiInternalState;
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{ControlId, WindowId};

use std::sync::Arc;
use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, WPARAM},
        Graphics::Gdi::{DEFAULT_GUI_FONT, GetStockObject},
        UI::WindowsAndMessaging::{
            CreateWindowExW, DestroyWindow, HMENU, SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE,
            WM_SETFONT, WS_CHILD, WS_VISIBLE,
        },
    },
    core::{HSTRING, PCWSTR},
};

/*
 * Creates a child control of the window's client area with the logical ID as
 * its HMENU, gives it the default GUI font and registers its HWND. The window
 * map lock is not held during CreateWindowExW, which sends messages to the parent.
 */
pub(crate) fn create_child_control(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    class_name: PCWSTR,
    text: &str,
    style: WINDOW_STYLE,
    ex_style: WINDOW_EX_STYLE,
) -> PlatformResult<HWND> {
    let hwnd_parent = internal_state.with_window_data_read(window_id, |window_data| {
        if window_data.has_control(control_id) {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Control {control_id:?} already exists for window {window_id:?}"
            )));
        }
        if window_data.this_window_hwnd.is_invalid() {
            return Err(PlatformError::InvalidHandle(format!(
                "Parent HWND invalid for control {control_id:?} (WinID: {window_id:?})"
            )));
        }
        Ok(window_data.this_window_hwnd)
    })?;

    let hwnd_control = unsafe {
        CreateWindowExW(
            ex_style,
            class_name,
            &HSTRING::from(text),
            WS_CHILD | WS_VISIBLE | style,
            0,
            0,
            10,
            10,
            Some(hwnd_parent),
            Some(HMENU(control_id.raw() as isize as *mut _)),
            Some(internal_state.h_instance),
            None,
        )
        .map_err(|e| {
            PlatformError::ControlCreationFailed(format!("CreateWindowExW for {control_id:?}: {e}"))
        })?
    };

    unsafe {
        let font = GetStockObject(DEFAULT_GUI_FONT);
        SendMessageW(
            hwnd_control,
            WM_SETFONT,
            Some(WPARAM(font.0 as usize)),
            Some(LPARAM(1)),
        );
    }

    let registered = internal_state.with_window_data_write(window_id, |window_data| {
        window_data.register_control_hwnd(control_id, hwnd_control);
        Ok(())
    });
    if let Err(e) = registered {
        log::warn!("Controls: Window {window_id:?} disappeared before registering {control_id:?}.");
        let _ = unsafe { DestroyWindow(hwnd_control) };
        return Err(e);
    }
    Ok(hwnd_control)
}
