/*
 * This module provides utility functions for locating application-specific
 * directories. It centralizes the per-user directory logic used by the settings
 * store and the log file.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Retrieves the application's local configuration directory, creating it if
 * necessary. The path is derived without an organization qualifier, placing it
 * directly under the user's local application data directory structure
 * (e.g. AppData/Local on Windows, ~/.config on Linux).
 *
 * Returns `None` if no suitable location can be determined or created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Attempting to get base app config local dir for '{app_name}'");
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {config_path:?}: {e}"
                );
                return None;
            }
            log::debug!("PathUtils: Created base app config directory: {config_path:?}");
        }
        Some(config_path.to_path_buf())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_base_app_config_local_dir_creates_if_not_exists() {
        let unique_app_name = format!("TestApp_P4Search_{}", rand::random::<u64>());
        let Some(path) = get_base_app_config_local_dir(&unique_app_name) else {
            // No home directory in this environment; nothing to verify.
            return;
        };

        assert!(path.exists());
        assert!(path.is_dir());
        assert!(
            path.to_string_lossy()
                .to_lowercase()
                .contains(&unique_app_name.to_lowercase())
        );

        // A second call finds the existing directory.
        assert_eq!(get_base_app_config_local_dir(&unique_app_name), Some(path.clone()));

        let _ = fs::remove_dir_all(&path);
    }
}
