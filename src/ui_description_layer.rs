/*
 * This module is responsible for defining the static structure of the UI.
 * It generates a series of `PlatformCommand`s that describe the controls of the
 * search form and how they are docked, decoupling the form definition from the
 * platform-specific implementation.
 */
use crate::app_logic::ui_constants;

use crate::platform_layer::types::{ControlId, DockStyle, LayoutRule, PlatformCommand, WindowId};

const LABEL_HEIGHT: i32 = 20;
const ROW_HEIGHT: i32 = 26;
const CHECKBOX_HEIGHT: i32 = 24;
const STATUS_ROW_HEIGHT: i32 = 22;
const ROW_BUTTON_WIDTH: i32 = 90;
const VERSION_LABEL_WIDTH: i32 = 80;
const EDGE: i32 = 8;

fn rule(
    control_id: ControlId,
    parent_control_id: Option<ControlId>,
    dock_style: DockStyle,
    order: u32,
    fixed_size: Option<i32>,
    margin: (i32, i32, i32, i32),
) -> LayoutRule {
    LayoutRule {
        control_id,
        parent_control_id,
        dock_style,
        order,
        fixed_size,
        margin,
    }
}

/*
 * Generates the commands that build the main search window: a path row with a
 * Browse button, a pattern row with the Search button, the case-sensitivity
 * checkbox, the read-only output panel and a bottom status row with the
 * version. Input controls are created in the order they are filled in, which
 * text-mode hosts use as their prompt order.
 *
 * The final command signals that the static UI is complete, after which the
 * application logic takes over. Intended to be called once per window.
 */
pub fn build_main_window_static_layout(window_id: WindowId) -> Vec<PlatformCommand> {
    log::debug!("ui_description_layer: build_main_window_static_layout called.");

    let mut commands = vec![
        PlatformCommand::CreateLabel {
            window_id,
            control_id: ui_constants::PATH_LABEL_ID,
            text: "Path".to_string(),
        },
        PlatformCommand::CreateInput {
            window_id,
            control_id: ui_constants::PATH_INPUT_ID,
            initial_text: String::new(),
            hint: "Folder path to search".to_string(),
        },
        PlatformCommand::CreateButton {
            window_id,
            control_id: ui_constants::BROWSE_BUTTON_ID,
            text: "Browse...".to_string(),
            submits_form: false,
            is_default: false,
        },
        PlatformCommand::CreateLabel {
            window_id,
            control_id: ui_constants::PATTERN_LABEL_ID,
            text: "Pattern".to_string(),
        },
        PlatformCommand::CreateInput {
            window_id,
            control_id: ui_constants::PATTERN_INPUT_ID,
            initial_text: String::new(),
            hint: "Search pattern to match (literal text or regex)".to_string(),
        },
        PlatformCommand::CreateButton {
            window_id,
            control_id: ui_constants::SEARCH_BUTTON_ID,
            text: "Search".to_string(),
            submits_form: true,
            is_default: true,
        },
        PlatformCommand::CreateCheckbox {
            window_id,
            control_id: ui_constants::CASE_SENSITIVE_CHECKBOX_ID,
            text: "Case Sensitive".to_string(),
            checked: false,
        },
        PlatformCommand::CreateLabel {
            window_id,
            control_id: ui_constants::OUTPUT_LABEL_ID,
            text: "Output".to_string(),
        },
        PlatformCommand::CreateTextPanel {
            window_id,
            control_id: ui_constants::OUTPUT_PANEL_ID,
        },
        PlatformCommand::CreateLabel {
            window_id,
            control_id: ui_constants::STATUS_LABEL_ID,
            text: ui_constants::STATUS_IDLE.to_string(),
        },
        PlatformCommand::CreateLabel {
            window_id,
            control_id: ui_constants::VERSION_LABEL_ID,
            text: format!("v{}", env!("CARGO_PKG_VERSION")),
        },
    ];

    // The two rows and the status row are logical containers without a native control.
    let path_row = Some(ui_constants::PATH_ROW_ID);
    let pattern_row = Some(ui_constants::PATTERN_ROW_ID);
    let status_row = Some(ui_constants::STATUS_ROW_ID);
    #[rustfmt::skip]
    let layout_rules = vec![
        rule(ui_constants::PATH_LABEL_ID, None, DockStyle::Top, 0, Some(LABEL_HEIGHT), (EDGE, EDGE, 0, EDGE)),
        rule(ui_constants::PATH_ROW_ID, None, DockStyle::Top, 1, Some(ROW_HEIGHT), (2, EDGE, 0, EDGE)),
        rule(ui_constants::BROWSE_BUTTON_ID, path_row, DockStyle::Right, 0, Some(ROW_BUTTON_WIDTH), (0, 0, 0, 6)),
        rule(ui_constants::PATH_INPUT_ID, path_row, DockStyle::Fill, 1, None, (0, 0, 0, 0)),
        rule(ui_constants::PATTERN_LABEL_ID, None, DockStyle::Top, 2, Some(LABEL_HEIGHT), (EDGE, EDGE, 0, EDGE)),
        rule(ui_constants::PATTERN_ROW_ID, None, DockStyle::Top, 3, Some(ROW_HEIGHT), (2, EDGE, 0, EDGE)),
        rule(ui_constants::SEARCH_BUTTON_ID, pattern_row, DockStyle::Right, 0, Some(ROW_BUTTON_WIDTH), (0, 0, 0, 6)),
        rule(ui_constants::PATTERN_INPUT_ID, pattern_row, DockStyle::Fill, 1, None, (0, 0, 0, 0)),
        rule(ui_constants::CASE_SENSITIVE_CHECKBOX_ID, None, DockStyle::Top, 4, Some(CHECKBOX_HEIGHT), (6, EDGE, 0, EDGE)),
        rule(ui_constants::OUTPUT_LABEL_ID, None, DockStyle::Top, 5, Some(LABEL_HEIGHT), (6, EDGE, 0, EDGE)),
        rule(ui_constants::STATUS_ROW_ID, None, DockStyle::Bottom, 6, Some(STATUS_ROW_HEIGHT), (4, EDGE, 6, EDGE)),
        rule(ui_constants::VERSION_LABEL_ID, status_row, DockStyle::Right, 0, Some(VERSION_LABEL_WIDTH), (0, 0, 0, 0)),
        rule(ui_constants::STATUS_LABEL_ID, status_row, DockStyle::Fill, 1, None, (0, 0, 0, 0)),
        rule(ui_constants::OUTPUT_PANEL_ID, None, DockStyle::Fill, 7, None, (2, EDGE, 0, EDGE)),
    ];

    commands.push(PlatformCommand::DefineLayout {
        window_id,
        rules: layout_rules,
    });
    commands.push(PlatformCommand::SignalMainWindowUISetupComplete { window_id });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform_layer::layout::calculate_layout;
    use std::collections::HashSet;

    fn created_control_ids(commands: &[PlatformCommand]) -> Vec<ControlId> {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                PlatformCommand::CreateLabel { control_id, .. }
                | PlatformCommand::CreateInput { control_id, .. }
                | PlatformCommand::CreateButton { control_id, .. }
                | PlatformCommand::CreateCheckbox { control_id, .. }
                | PlatformCommand::CreateTextPanel { control_id, .. } => Some(*control_id),
                _ => None,
            })
            .collect()
    }

    fn layout_rules(commands: &[PlatformCommand]) -> Vec<LayoutRule> {
        commands
            .iter()
            .find_map(|cmd| match cmd {
                PlatformCommand::DefineLayout { rules, .. } => Some(rules.clone()),
                _ => None,
            })
            .expect("layout must be defined")
    }

    #[test]
    fn test_setup_complete_signal_is_last() {
        let window_id = WindowId::new(1);
        let commands = build_main_window_static_layout(window_id);
        assert_eq!(
            commands.last(),
            Some(&PlatformCommand::SignalMainWindowUISetupComplete { window_id })
        );
        assert!(commands.iter().all(|cmd| match cmd {
            PlatformCommand::CreateLabel { window_id: w, .. }
            | PlatformCommand::CreateInput { window_id: w, .. }
            | PlatformCommand::DefineLayout { window_id: w, .. } => *w == window_id,
            _ => true,
        }));
    }

    #[test]
    fn test_inputs_are_created_in_form_order() {
        let commands = build_main_window_static_layout(WindowId::new(1));
        let created = created_control_ids(&commands);
        let position = |id: ControlId| created.iter().position(|c| *c == id).unwrap();

        assert!(position(ui_constants::PATH_INPUT_ID) < position(ui_constants::PATTERN_INPUT_ID));
        assert!(
            position(ui_constants::PATTERN_INPUT_ID)
                < position(ui_constants::CASE_SENSITIVE_CHECKBOX_ID)
        );
        let unique: HashSet<_> = created.iter().collect();
        assert_eq!(unique.len(), created.len(), "control IDs must be unique");
    }

    #[test]
    fn test_search_is_the_only_submitting_default_button() {
        let commands = build_main_window_static_layout(WindowId::new(1));
        let buttons: Vec<_> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                PlatformCommand::CreateButton {
                    control_id,
                    submits_form,
                    is_default,
                    ..
                } => Some((*control_id, *submits_form, *is_default)),
                _ => None,
            })
            .collect();
        assert_eq!(
            buttons,
            vec![
                (ui_constants::BROWSE_BUTTON_ID, false, false),
                (ui_constants::SEARCH_BUTTON_ID, true, true),
            ]
        );
    }

    #[test]
    fn test_initial_status_and_version_labels() {
        let commands = build_main_window_static_layout(WindowId::new(1));
        let label_text = |wanted: ControlId| {
            commands.iter().find_map(|cmd| match cmd {
                PlatformCommand::CreateLabel {
                    control_id, text, ..
                } if *control_id == wanted => Some(text.clone()),
                _ => None,
            })
        };
        assert_eq!(
            label_text(ui_constants::STATUS_LABEL_ID).as_deref(),
            Some("Status: Idle")
        );
        assert_eq!(
            label_text(ui_constants::VERSION_LABEL_ID),
            Some(format!("v{}", env!("CARGO_PKG_VERSION")))
        );
    }

    #[test]
    fn test_every_control_has_a_layout_rule() {
        let commands = build_main_window_static_layout(WindowId::new(1));
        let rules = layout_rules(&commands);
        let ruled: HashSet<ControlId> = rules.iter().map(|r| r.control_id).collect();
        for control_id in created_control_ids(&commands) {
            assert!(ruled.contains(&control_id), "{control_id:?} has no layout rule");
        }
    }

    #[test]
    fn test_layout_gives_output_panel_the_remaining_space() {
        let commands = build_main_window_static_layout(WindowId::new(1));
        let rects = calculate_layout(&layout_rules(&commands), 640, 480);

        let output = rects[&ui_constants::OUTPUT_PANEL_ID];
        let checkbox = rects[&ui_constants::CASE_SENSITIVE_CHECKBOX_ID];
        let status = rects[&ui_constants::STATUS_LABEL_ID];
        assert!(output.height > 200, "output panel too small: {output:?}");
        assert!(output.y > checkbox.y + checkbox.height);
        assert!(output.y + output.height <= status.y);

        let input = rects[&ui_constants::PATH_INPUT_ID];
        let browse = rects[&ui_constants::BROWSE_BUTTON_ID];
        assert_eq!(browse.width, ROW_BUTTON_WIDTH);
        assert!(input.x + input.width <= browse.x);
        assert_eq!(input.y, browse.y);
    }
}
