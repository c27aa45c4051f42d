/*
 * Defines shared constants for logical UI control identifiers.
 * These IDs are used by the `ui_description_layer` to define the initial UI
 * structure and by the `app_logic` (Presenter) to target specific controls
 * for dynamic updates. The `platform_layer` maps these logical IDs to native
 * UI element handles.
 */

use crate::platform_layer::types::ControlId;

// Window title, also used as the title of every message box.
pub const APP_TITLE: &str = "P4 Search";

// Name of the per-user configuration directory and the window class.
pub const APP_NAME: &str = "P4Search";

// --- Path row ---
pub const PATH_LABEL_ID: ControlId = ControlId::new(1001);
pub const PATH_ROW_ID: ControlId = ControlId::new(1002);
pub const PATH_INPUT_ID: ControlId = ControlId::new(1003);
pub const BROWSE_BUTTON_ID: ControlId = ControlId::new(1004);

// --- Pattern row ---
pub const PATTERN_LABEL_ID: ControlId = ControlId::new(1011);
pub const PATTERN_ROW_ID: ControlId = ControlId::new(1012);
pub const PATTERN_INPUT_ID: ControlId = ControlId::new(1013);
// The form's submit button, also activated by the Return key.
pub const SEARCH_BUTTON_ID: ControlId = ControlId::new(1014);

pub const CASE_SENSITIVE_CHECKBOX_ID: ControlId = ControlId::new(1021);

// --- Output ---
pub const OUTPUT_LABEL_ID: ControlId = ControlId::new(1031);
pub const OUTPUT_PANEL_ID: ControlId = ControlId::new(1032);

// --- Status row ---
pub const STATUS_ROW_ID: ControlId = ControlId::new(1041);
pub const STATUS_LABEL_ID: ControlId = ControlId::new(1042);
pub const VERSION_LABEL_ID: ControlId = ControlId::new(1043);

// Status line texts.
pub const STATUS_IDLE: &str = "Status: Idle";
pub const STATUS_IN_PROGRESS: &str = "Status: In Progress";
pub const STATUS_COMPLETE: &str = "Status: Complete";
