/*
 * Window-level Win32 plumbing: the per-window native data, window class
 * registration, window creation and the `WndProc` that translates native
 * messages into `AppEvent`s. Control-specific work lives in `controls`.
 */

use super::app::Win32ApiInternalState;
use super::controls::{button_handler, label_handler};
use super::error::{PlatformError, Result as PlatformResult};
use super::layout;
use super::types::{AppEvent, ControlId, LayoutRule, MessageSeverity, WindowId};

use windows::{
    Win32::{
        Foundation::{GetLastError, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{COLOR_WINDOW, HBRUSH, HDC},
        UI::WindowsAndMessaging::*,
    },
    core::{HSTRING, PCWSTR, w},
};

use std::collections::{HashMap, HashSet};
use std::ffi::c_void;
use std::sync::Arc;

pub(crate) const WC_BUTTON: PCWSTR = w!("BUTTON");
pub(crate) const WC_EDIT: PCWSTR = w!("EDIT");
pub(crate) const WC_STATIC: PCWSTR = w!("STATIC");
pub(crate) const SS_LEFT: WINDOW_STYLE = WINDOW_STYLE(0x0000_0000);
pub(crate) const SS_CENTERIMAGE: WINDOW_STYLE = WINDOW_STYLE(0x0000_0200);

// Posted to the main window to hand control back to the application logic.
pub(crate) const WM_APP_MAIN_WINDOW_UI_SETUP_COMPLETE: u32 = WM_APP + 0x101;
pub(crate) const WM_APP_SEARCH_DISPATCH: u32 = WM_APP + 0x102;

/// Native data associated with one window managed by the platform layer.
#[derive(Debug)]
pub(crate) struct NativeWindowData {
    pub(crate) this_window_hwnd: HWND,
    pub(crate) logical_window_id: WindowId,
    pub(crate) control_hwnd_map: HashMap<ControlId, HWND>,
    pub(crate) layout_rules: Option<Vec<LayoutRule>>,
    // Buttons that report `FormSubmitted` rather than `ButtonClicked`.
    pub(crate) submit_buttons: HashSet<ControlId>,
    pub(crate) default_button: Option<ControlId>,
    // Single-line inputs and checkboxes captured in a `FormSnapshot`.
    pub(crate) form_inputs: Vec<ControlId>,
    pub(crate) form_checkboxes: Vec<ControlId>,
    pub(crate) label_severities: HashMap<ControlId, MessageSeverity>,
}

impl NativeWindowData {
    pub(crate) fn new(logical_window_id: WindowId) -> Self {
        NativeWindowData {
            this_window_hwnd: HWND(std::ptr::null_mut()),
            logical_window_id,
            control_hwnd_map: HashMap::new(),
            layout_rules: None,
            submit_buttons: HashSet::new(),
            default_button: None,
            form_inputs: Vec::new(),
            form_checkboxes: Vec::new(),
            label_severities: HashMap::new(),
        }
    }

    pub(crate) fn has_control(&self, control_id: ControlId) -> bool {
        self.control_hwnd_map.contains_key(&control_id)
    }

    pub(crate) fn get_control_hwnd(&self, control_id: ControlId) -> Option<HWND> {
        self.control_hwnd_map.get(&control_id).copied()
    }

    pub(crate) fn register_control_hwnd(&mut self, control_id: ControlId, hwnd: HWND) {
        self.control_hwnd_map.insert(control_id, hwnd);
    }

    fn control_id_for_hwnd(&self, hwnd: HWND) -> Option<ControlId> {
        self.control_hwnd_map
            .iter()
            .find(|(_, control_hwnd)| **control_hwnd == hwnd)
            .map(|(control_id, _)| *control_id)
    }
}

/// Context passed to `CreateWindowExW` via `lpCreateParams`.
struct WindowCreationContext {
    internal_state_arc: Arc<Win32ApiInternalState>,
    window_id: WindowId,
}

fn window_class_name(internal_state: &Win32ApiInternalState) -> HSTRING {
    HSTRING::from(format!(
        "{}_PlatformWindowClass",
        internal_state.app_name_for_class
    ))
}

/*
 * Registers the main window class for the application. Calling it again after a
 * successful registration is a no-op.
 */
pub(crate) fn register_window_class(
    internal_state: &Arc<Win32ApiInternalState>,
) -> PlatformResult<()> {
    let class_name_hstring = window_class_name(internal_state);
    let class_name_pcwstr = PCWSTR(class_name_hstring.as_ptr());

    unsafe {
        let mut wc_test = WNDCLASSEXW::default();
        if GetClassInfoExW(
            Some(internal_state.h_instance),
            class_name_pcwstr,
            &mut wc_test,
        )
        .is_ok()
        {
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(facade_wnd_proc_router),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: internal_state.h_instance,
            hIcon: LoadIconW(None, IDI_APPLICATION)?,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as *mut c_void),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: class_name_pcwstr,
            hIconSm: LoadIconW(None, IDI_APPLICATION)?,
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed: {error:?}"
            )))
        } else {
            Ok(())
        }
    }
}

pub(crate) fn create_native_window(
    internal_state_arc: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: &str,
    width: i32,
    height: i32,
) -> PlatformResult<HWND> {
    let class_name_hstring = window_class_name(internal_state_arc);
    let creation_context = Box::new(WindowCreationContext {
        internal_state_arc: Arc::clone(internal_state_arc),
        window_id,
    });

    unsafe {
        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            &class_name_hstring,
            &HSTRING::from(title),
            WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            width,
            height,
            None,
            None,
            Some(internal_state_arc.h_instance),
            Some(Box::into_raw(creation_context) as *mut c_void),
        )
        .map_err(|e| PlatformError::WindowCreationFailed(format!("CreateWindowExW: {e}")))?;
        Ok(hwnd)
    }
}

/*
 * The WndProc shared by every window of the class. It recovers the creation
 * context stored in GWLP_USERDATA and forwards to `handle_window_message`.
 */
unsafe extern "system" fn facade_wnd_proc_router(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context_raw_ptr = create_struct.lpCreateParams as *mut WindowCreationContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context_raw_ptr as isize) };
        context_raw_ptr
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowCreationContext }
    };

    if context_ptr.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    let context = unsafe { &*context_ptr };
    let internal_state_arc = Arc::clone(&context.internal_state_arc);
    let window_id = context.window_id;

    let result = handle_window_message(&internal_state_arc, hwnd, msg, wparam, lparam, window_id);

    if msg == WM_NCDESTROY {
        drop(unsafe { Box::from_raw(context_ptr) });
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
    }

    result
}

fn handle_window_message(
    internal_state: &Arc<Win32ApiInternalState>,
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    window_id: WindowId,
) -> LRESULT {
    match msg {
        WM_SIZE => {
            let width = loword_from_lparam(lparam);
            let height = hiword_from_lparam(lparam);
            apply_layout(internal_state, window_id, width, height);
            LRESULT(0)
        }
        WM_COMMAND => {
            let notification_code = hiword_from_wparam(wparam);
            let control_id = loword_from_wparam(wparam);
            let hwnd_control = HWND(lparam.0 as *mut c_void);

            // IsDialogMessageW reports the Return key as IDOK without a control HWND.
            if hwnd_control.is_invalid() && control_id == IDOK.0 {
                if let Some(event) =
                    button_handler::default_button_activation(internal_state, window_id)
                {
                    internal_state.send_event(event);
                }
                return LRESULT(0);
            }
            if notification_code == BN_CLICKED as i32 {
                if let Some(event) = button_handler::handle_bn_clicked(
                    internal_state,
                    window_id,
                    ControlId::new(control_id),
                ) {
                    internal_state.send_event(event);
                }
                return LRESULT(0);
            }
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }
        WM_CTLCOLORSTATIC => {
            let hdc = HDC(wparam.0 as *mut c_void);
            let hwnd_static = HWND(lparam.0 as *mut c_void);
            let severity = internal_state
                .with_window_data_read(window_id, |window_data| {
                    Ok(window_data
                        .control_id_for_hwnd(hwnd_static)
                        .and_then(|id| window_data.label_severities.get(&id).copied()))
                })
                .ok()
                .flatten();
            match severity {
                Some(severity) => label_handler::handle_wm_ctlcolorstatic(hdc, severity),
                None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
            }
        }
        WM_APP_MAIN_WINDOW_UI_SETUP_COMPLETE => {
            internal_state.send_event(AppEvent::MainWindowUISetupComplete { window_id });
            LRESULT(0)
        }
        WM_APP_SEARCH_DISPATCH => {
            internal_state.send_event(AppEvent::SearchDispatchReady { window_id });
            LRESULT(0)
        }
        WM_CLOSE => {
            log::debug!("Platform: WM_CLOSE for WindowId {window_id:?}.");
            internal_state.send_event(AppEvent::WindowCloseRequestedByUser { window_id });
            // Destruction is decided by the application logic via CloseWindow.
            LRESULT(0)
        }
        WM_DESTROY => {
            log::debug!("Platform: WM_DESTROY for WindowId {window_id:?}.");
            if let Ok(mut windows_guard) = internal_state.active_windows.write() {
                windows_guard.remove(&window_id);
            }
            internal_state.send_event(AppEvent::WindowDestroyed { window_id });
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/*
 * Positions every native control of the window according to its stored layout
 * rules. Logical containers (rows) have no HWND and are only used to nest their
 * children.
 */
fn apply_layout(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    width: i32,
    height: i32,
) {
    let placements: Vec<(HWND, layout::Rect)> = match internal_state.with_window_data_read(
        window_id,
        |window_data| {
            let Some(rules) = &window_data.layout_rules else {
                return Ok(Vec::new());
            };
            let rects = layout::calculate_layout(rules, width, height);
            Ok(rects
                .into_iter()
                .filter_map(|(control_id, rect)| {
                    window_data
                        .get_control_hwnd(control_id)
                        .map(|hwnd| (hwnd, rect))
                })
                .collect())
        },
    ) {
        Ok(placements) => placements,
        Err(e) => {
            log::warn!("Platform: Could not apply layout for {window_id:?}: {e}");
            return;
        }
    };

    for (hwnd_control, rect) in placements {
        if let Err(e) =
            unsafe { MoveWindow(hwnd_control, rect.x, rect.y, rect.width, rect.height, true) }
        {
            log::warn!("Platform: MoveWindow failed for {hwnd_control:?}: {e}");
        }
    }
}

/*
 * Re-applies the layout using the current client size. Used after DefineLayout,
 * which may arrive after the window already received its first WM_SIZE.
 */
pub(crate) fn relayout(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<()> {
    let hwnd = internal_state.get_hwnd(window_id)?;
    if hwnd.is_invalid() {
        return Ok(());
    }
    let mut client_rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut client_rect)? };
    apply_layout(
        internal_state,
        window_id,
        client_rect.right - client_rect.left,
        client_rect.bottom - client_rect.top,
    );
    Ok(())
}

#[inline]
pub(crate) fn loword_from_lparam(lparam: LPARAM) -> i32 {
    (lparam.0 & 0xFFFF) as i32
}

#[inline]
pub(crate) fn hiword_from_lparam(lparam: LPARAM) -> i32 {
    ((lparam.0 >> 16) & 0xFFFF) as i32
}

#[inline]
fn loword_from_wparam(wparam: WPARAM) -> i32 {
    (wparam.0 & 0xFFFF) as i32
}

#[inline]
fn hiword_from_wparam(wparam: WPARAM) -> i32 {
    ((wparam.0 >> 16) & 0xFFFF) as i32
}
