use super::command_executor;
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{AppEvent, PlatformCommand, PlatformEventHandler, WindowConfig, WindowId};
use super::window_common::{self, NativeWindowData};

use windows::{
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, RPC_E_CHANGED_MODE, S_FALSE},
        System::{
            Com::{COINIT_APARTMENTTHREADED, CoInitializeEx, CoUninitialize},
            LibraryLoader::GetModuleHandleW,
        },
        UI::{
            Controls::{ICC_STANDARD_CLASSES, INITCOMMONCONTROLSEX, InitCommonControlsEx},
            WindowsAndMessaging::{
                DispatchMessageW, GA_ROOT, GetAncestor, GetMessageW, IsDialogMessageW, MSG,
                TranslateMessage,
            },
        },
    },
    core::PCWSTR,
};

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, RwLock, Weak,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

/*
 * Internal state for the Win32 platform layer.
 *
 * Holds the module instance, the per-window native data (HWNDs of every control,
 * layout rules, which buttons submit the form) and a weak reference to the
 * application's event handler. It is shared with the `WndProc` through the window
 * creation context, and with the command executor.
 */
pub(crate) struct Win32ApiInternalState {
    pub(crate) h_instance: HINSTANCE,
    next_window_id_counter: AtomicUsize,
    pub(crate) active_windows: RwLock<HashMap<WindowId, NativeWindowData>>,
    // Weak so that a handler holding the platform interface does not form a cycle.
    application_event_handler: Mutex<Option<Weak<Mutex<dyn PlatformEventHandler>>>>,
    pub(crate) app_name_for_class: String,
    // Set while the command queue is being drained, so that events sent from
    // inside a modal loop (message box, folder picker) do not start a second drain.
    is_draining: AtomicBool,
}

impl Win32ApiInternalState {
    pub(crate) fn new(app_name_for_class: String) -> PlatformResult<Arc<Self>> {
        unsafe {
            let hr = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
            if hr.is_err() && hr != S_FALSE && hr != RPC_E_CHANGED_MODE {
                return Err(PlatformError::InitializationFailed(format!(
                    "CoInitializeEx failed: {hr:?}"
                )));
            }

            let icex = INITCOMMONCONTROLSEX {
                dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
                dwICC: ICC_STANDARD_CLASSES,
            };
            if !InitCommonControlsEx(&icex).as_bool() {
                log::warn!(
                    "Platform: InitCommonControlsEx failed. Error: {:?}",
                    GetLastError()
                );
            }

            let h_instance = HINSTANCE(GetModuleHandleW(PCWSTR::null())?.0);
            Ok(Arc::new(Self {
                h_instance,
                next_window_id_counter: AtomicUsize::new(1),
                active_windows: RwLock::new(HashMap::new()),
                application_event_handler: Mutex::new(None),
                app_name_for_class,
                is_draining: AtomicBool::new(false),
            }))
        }
    }

    pub(crate) fn generate_window_id(&self) -> WindowId {
        WindowId::new(self.next_window_id_counter.fetch_add(1, Ordering::Relaxed))
    }

    /*
     * Runs `f` with shared access to the data of `window_id`. The lock is released
     * before returning, so `f` must not call into Win32 functions that send
     * messages back to this window.
     */
    pub(crate) fn with_window_data_read<T>(
        &self,
        window_id: WindowId,
        f: impl FnOnce(&NativeWindowData) -> PlatformResult<T>,
    ) -> PlatformResult<T> {
        let windows_guard = self.active_windows.read().map_err(|_| {
            log::error!("Platform: Failed to acquire read lock on windows map.");
            PlatformError::OperationFailed("Failed to acquire read lock on windows map".into())
        })?;
        let window_data = windows_guard.get(&window_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
        })?;
        f(window_data)
    }

    pub(crate) fn with_window_data_write<T>(
        &self,
        window_id: WindowId,
        f: impl FnOnce(&mut NativeWindowData) -> PlatformResult<T>,
    ) -> PlatformResult<T> {
        let mut windows_guard = self.active_windows.write().map_err(|_| {
            log::error!("Platform: Failed to acquire write lock on windows map.");
            PlatformError::OperationFailed("Failed to acquire write lock on windows map".into())
        })?;
        let window_data = windows_guard.get_mut(&window_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
        })?;
        f(window_data)
    }

    pub(crate) fn get_hwnd(&self, window_id: WindowId) -> PlatformResult<HWND> {
        self.with_window_data_read(window_id, |window_data| Ok(window_data.this_window_hwnd))
    }

    fn upgraded_event_handler(&self) -> Option<Arc<Mutex<dyn PlatformEventHandler>>> {
        self.application_event_handler
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().and_then(Weak::upgrade))
    }

    /*
     * Delivers `event` to the application's event handler, then executes every
     * command the handler queued. When called while a drain is already in
     * progress (from inside a modal dialog), the outer drain picks up the new
     * commands instead.
     */
    pub(crate) fn send_event(self: &Arc<Self>, event: AppEvent) {
        let Some(handler_arc) = self.upgraded_event_handler() else {
            log::warn!("Platform: Event handler not available, dropping event {event:?}.");
            return;
        };
        match handler_arc.lock() {
            Ok(mut handler_guard) => handler_guard.handle_event(event),
            Err(_) => {
                log::error!("Platform: Failed to lock event handler for {event:?}.");
                return;
            }
        }
        self.drain_commands(&handler_arc);
    }

    fn drain_commands(self: &Arc<Self>, handler_arc: &Arc<Mutex<dyn PlatformEventHandler>>) {
        if self.is_draining.swap(true, Ordering::SeqCst) {
            return;
        }
        loop {
            // The handler lock must not be held while a command executes; commands
            // such as ShowMessageBox send events back to the handler.
            let next_command = match handler_arc.lock() {
                Ok(mut handler_guard) => handler_guard.try_dequeue_command(),
                Err(_) => {
                    log::error!("Platform: Failed to lock event handler while draining commands.");
                    None
                }
            };
            let Some(command) = next_command else {
                break;
            };
            if let Err(e) = self.execute_platform_command(command) {
                log::error!("Platform: Error executing command: {e}");
            }
        }
        self.is_draining.store(false, Ordering::SeqCst);
    }

    pub(crate) fn execute_platform_command(
        self: &Arc<Self>,
        command: PlatformCommand,
    ) -> PlatformResult<()> {
        log::trace!("Platform: Executing command {command:?}");
        command_executor::execute(self, command)
    }
}

impl Drop for Win32ApiInternalState {
    fn drop(&mut self) {
        log::debug!("Platform: Win32ApiInternalState dropped, calling CoUninitialize.");
        unsafe { CoUninitialize() };
    }
}

/// The primary interface to the platform abstraction layer.
pub struct PlatformInterface {
    internal_state: Arc<Win32ApiInternalState>,
}

impl PlatformInterface {
    pub fn new(app_name_for_class: String) -> PlatformResult<Self> {
        let internal_state = Win32ApiInternalState::new(app_name_for_class)?;
        window_common::register_window_class(&internal_state)?;
        log::debug!("Platform: Window class registered.");
        Ok(PlatformInterface { internal_state })
    }

    pub fn create_window(&self, config: WindowConfig) -> PlatformResult<WindowId> {
        let window_id = self.internal_state.generate_window_id();

        // The entry must exist before CreateWindowExW, since WM_CREATE and WM_SIZE
        // arrive during the call.
        self.internal_state
            .active_windows
            .write()
            .map_err(|_| {
                PlatformError::OperationFailed("Failed to lock windows map for insert".into())
            })?
            .insert(window_id, NativeWindowData::new(window_id));

        let hwnd = match window_common::create_native_window(
            &self.internal_state,
            window_id,
            config.title,
            config.width,
            config.height,
        ) {
            Ok(hwnd) => hwnd,
            Err(e) => {
                if let Ok(mut windows_guard) = self.internal_state.active_windows.write() {
                    windows_guard.remove(&window_id);
                }
                return Err(e);
            }
        };

        self.internal_state
            .with_window_data_write(window_id, |window_data| {
                window_data.this_window_hwnd = hwnd;
                Ok(())
            })?;
        log::debug!("Platform: Created window {window_id:?} with HWND {hwnd:?}.");
        Ok(window_id)
    }

    /// Executes a command outside of event handling, e.g. the initial UI description.
    pub fn execute_command(&self, command: PlatformCommand) -> PlatformResult<()> {
        self.internal_state.execute_platform_command(command)
    }

    pub fn run(&self, event_handler: Arc<Mutex<dyn PlatformEventHandler>>) -> PlatformResult<()> {
        if let Ok(mut handler_slot) = self.internal_state.application_event_handler.lock() {
            *handler_slot = Some(Arc::downgrade(&event_handler));
        }
        unsafe {
            let mut msg = MSG::default();
            loop {
                let result = GetMessageW(&mut msg, None, 0, 0);
                if result.0 > 0 {
                    // Gives Tab navigation and turns Return into IDOK for the default button.
                    let root = GetAncestor(msg.hwnd, GA_ROOT);
                    if !root.is_invalid() && IsDialogMessageW(root, &msg).as_bool() {
                        continue;
                    }
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                } else if result.0 == 0 {
                    log::debug!("Platform: WM_QUIT received, exiting message loop.");
                    break;
                } else {
                    let last_error = GetLastError();
                    log::error!("Platform: GetMessageW failed. LastError: {last_error:?}");
                    return Err(PlatformError::OperationFailed(format!(
                        "GetMessageW failed: {}",
                        windows::core::Error::from_hresult(last_error.to_hresult())
                    )));
                }
            }
        }
        if let Ok(mut handler_guard) = event_handler.lock() {
            handler_guard.on_quit();
        }
        if let Ok(mut handler_slot) = self.internal_state.application_event_handler.lock() {
            *handler_slot = None;
        }
        log::debug!("Platform: Message loop exited cleanly.");
        Ok(())
    }
}
