/*
 * Handles the modal dialogs shown on behalf of the application logic: message
 * boxes through `MessageBoxW` and the folder picker through `IFileOpenDialog`.
 * Both block the UI thread until dismissed, then report the result back with an
 * `AppEvent`.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::message_box::{DialogOutcome, MessageBoxRequest};
use crate::platform_layer::types::{AppEvent, WindowId};

use std::ffi::c_void;
use std::path::PathBuf;
use std::sync::Arc;

use windows::{
    Win32::{
        Foundation::HWND,
        System::Com::{CLSCTX_INPROC_SERVER, CoCreateInstance, CoTaskMemFree},
        UI::Shell::{
            FOS_PICKFOLDERS, FileOpenDialog, IFileOpenDialog, IShellItem,
            SHCreateItemFromParsingName, SIGDN_FILESYSPATH,
        },
        UI::WindowsAndMessaging::{MESSAGEBOX_STYLE, MessageBoxW},
    },
    core::HSTRING,
};

pub(crate) fn get_hwnd_owner(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<HWND> {
    let hwnd = internal_state.get_hwnd(window_id)?;
    if hwnd.is_invalid() {
        log::warn!("DialogHandler: Invalid HWND for WindowId {window_id:?}");
        return Err(PlatformError::InvalidHandle(format!(
            "HWND for WindowId {window_id:?} is invalid"
        )));
    }
    Ok(hwnd)
}

/*
 * Shows a modal message box owned by the window and sends
 * `AppEvent::MessageBoxCompleted` with the pressed button. A failed call (result
 * 0) is reported as Cancel so that a pending retry is abandoned.
 */
pub(crate) fn handle_show_message_box_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    request: MessageBoxRequest,
) -> PlatformResult<()> {
    log::debug!(
        "DialogHandler: Showing message box '{}' with {} / {} for WinID {window_id:?}",
        request.title,
        request.buttons,
        request.icon
    );
    let hwnd_owner = get_hwnd_owner(internal_state, window_id).ok();
    let result = unsafe {
        MessageBoxW(
            hwnd_owner,
            &HSTRING::from(request.text.as_str()),
            &HSTRING::from(request.title.as_str()),
            MESSAGEBOX_STYLE(request.style_flags()),
        )
    };
    let outcome = DialogOutcome::from_native_id(result.0).unwrap_or_else(|| {
        log::error!("DialogHandler: MessageBoxW returned unexpected result {}", result.0);
        DialogOutcome::Cancel
    });
    log::debug!("DialogHandler: Message box dismissed with {outcome}.");
    internal_state.send_event(AppEvent::MessageBoxCompleted { window_id, outcome });
    Ok(())
}

/*
 * Handles the `ShowFolderPickerDialog` command with `IFileOpenDialog` and
 * `FOS_PICKFOLDERS`. Sends `AppEvent::FolderPickerDialogCompleted` with the
 * chosen folder, or `None` when cancelled or on failure.
 */
pub(crate) fn handle_show_folder_picker_dialog_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: String,
    initial_dir: Option<PathBuf>,
) -> PlatformResult<()> {
    log::debug!(
        "DialogHandler: Showing Folder Picker Dialog. Title: '{title}', Initial Dir: {initial_dir:?}"
    );
    let hwnd_owner = get_hwnd_owner(internal_state, window_id)?;
    let mut path_result: Option<PathBuf> = None;

    let file_dialog: IFileOpenDialog =
        match unsafe { CoCreateInstance(&FileOpenDialog, None, CLSCTX_INPROC_SERVER) } {
            Ok(dialog) => dialog,
            Err(e) => {
                let err_msg = format!("CoCreateInstance for IFileOpenDialog failed: {e:?}");
                log::error!("DialogHandler: {err_msg}");
                internal_state.send_event(AppEvent::FolderPickerDialogCompleted {
                    window_id,
                    path: None,
                });
                return Err(PlatformError::OperationFailed(err_msg));
            }
        };

    unsafe {
        if let Err(e_opts) = file_dialog.SetOptions(FOS_PICKFOLDERS) {
            log::error!("DialogHandler: IFileOpenDialog::SetOptions failed: {e_opts:?}");
        }
        if let Err(e_title) = file_dialog.SetTitle(&HSTRING::from(title.as_str())) {
            log::error!("DialogHandler: IFileOpenDialog::SetTitle failed: {e_title:?}");
        }
        if let Some(dir_path) = &initial_dir {
            let dir_hstring = HSTRING::from(dir_path.as_os_str());
            match SHCreateItemFromParsingName::<_, _, IShellItem>(&dir_hstring, None) {
                Ok(item) => {
                    if let Err(e_sdf) = file_dialog.SetFolder(&item) {
                        log::error!("DialogHandler: IFileOpenDialog::SetFolder failed: {e_sdf:?}");
                    }
                }
                Err(e) => log::warn!(
                    "DialogHandler: Initial folder {dir_path:?} could not be opened: {e:?}"
                ),
            }
        }

        if file_dialog.Show(Some(hwnd_owner)).is_ok() {
            match file_dialog.GetResult() {
                Ok(shell_item) => match shell_item.GetDisplayName(SIGDN_FILESYSPATH) {
                    Ok(pwstr_path) => {
                        let path_string = pwstr_path.to_string().unwrap_or_default();
                        CoTaskMemFree(Some(pwstr_path.as_ptr() as *const c_void));
                        if !path_string.is_empty() {
                            path_result = Some(PathBuf::from(path_string));
                        }
                    }
                    Err(e) => log::warn!("DialogHandler: GetDisplayName failed: {e:?}"),
                },
                Err(_) => log::debug!("DialogHandler: No folder selected."),
            }
        } else {
            log::debug!("DialogHandler: Folder picker was cancelled.");
        }
    }

    internal_state.send_event(AppEvent::FolderPickerDialogCompleted {
        window_id,
        path: path_result,
    });
    Ok(())
}
