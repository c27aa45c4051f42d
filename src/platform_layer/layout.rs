/*
 * Turns the declarative `LayoutRule`s of a window into concrete rectangles.
 * This is pure arithmetic with no native calls, so the Win32 `WM_SIZE` handler
 * and the tests share the exact same placement logic.
 *
 * Children of a container are placed in ascending `order`. Top/Bottom/Left/Right
 * children each take a slot of `fixed_size` (plus their margins) from the matching
 * edge of the space that is still free; Fill children share whatever remains
 * once every edge-docked sibling has been placed. A rule's own rectangle then
 * becomes the available area for its children, which is how logical rows nest.
 */

use super::types::{ControlId, DockStyle, LayoutRule};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    // (top, right, bottom, left)
    fn inset(self, margin: (i32, i32, i32, i32)) -> Rect {
        let (top, right, bottom, left) = margin;
        Rect::new(
            self.x + left,
            self.y + top,
            self.width - left - right,
            self.height - top - bottom,
        )
    }
}

/*
 * Computes the rectangle of every control named in `rules` for a client area of
 * `width` x `height`. Rules whose parent never receives a rectangle (an unknown
 * container, or a cycle) are left out of the result.
 */
pub fn calculate_layout(rules: &[LayoutRule], width: i32, height: i32) -> HashMap<ControlId, Rect> {
    let mut placed = HashMap::new();
    let mut visited = HashSet::new();
    place_children(
        rules,
        None,
        Rect::new(0, 0, width, height),
        &mut placed,
        &mut visited,
    );
    placed
}

fn place_children(
    rules: &[LayoutRule],
    parent: Option<ControlId>,
    area: Rect,
    placed: &mut HashMap<ControlId, Rect>,
    visited: &mut HashSet<ControlId>,
) {
    let mut children: Vec<&LayoutRule> = rules
        .iter()
        .filter(|rule| rule.parent_control_id == parent)
        .collect();
    children.sort_by_key(|rule| rule.order);

    let mut free = area;
    let mut fill_children = Vec::new();

    for rule in children {
        if !visited.insert(rule.control_id) {
            log::warn!(
                "Layout: Control {:?} appears more than once in the layout tree, skipping.",
                rule.control_id
            );
            continue;
        }
        let (top, right, bottom, left) = rule.margin;
        let size = rule.fixed_size.unwrap_or(0);
        let slot = match rule.dock_style {
            DockStyle::Top => {
                let slot_height = (size + top + bottom).min(free.height);
                let slot = Rect::new(free.x, free.y, free.width, slot_height);
                free = Rect::new(
                    free.x,
                    free.y + slot_height,
                    free.width,
                    free.height - slot_height,
                );
                slot
            }
            DockStyle::Bottom => {
                let slot_height = (size + top + bottom).min(free.height);
                let slot = Rect::new(
                    free.x,
                    free.y + free.height - slot_height,
                    free.width,
                    slot_height,
                );
                free = Rect::new(free.x, free.y, free.width, free.height - slot_height);
                slot
            }
            DockStyle::Left => {
                let slot_width = (size + left + right).min(free.width);
                let slot = Rect::new(free.x, free.y, slot_width, free.height);
                free = Rect::new(free.x + slot_width, free.y, free.width - slot_width, free.height);
                slot
            }
            DockStyle::Right => {
                let slot_width = (size + left + right).min(free.width);
                let slot = Rect::new(
                    free.x + free.width - slot_width,
                    free.y,
                    slot_width,
                    free.height,
                );
                free = Rect::new(free.x, free.y, free.width - slot_width, free.height);
                slot
            }
            DockStyle::Fill => {
                fill_children.push(rule);
                continue;
            }
        };
        placed.insert(rule.control_id, slot.inset(rule.margin));
    }

    for rule in &fill_children {
        placed.insert(rule.control_id, free.inset(rule.margin));
    }

    let containers: Vec<(ControlId, Rect)> = rules
        .iter()
        .filter(|rule| rule.parent_control_id == parent)
        .filter_map(|rule| placed.get(&rule.control_id).map(|rect| (rule.control_id, *rect)))
        .collect();
    for (control_id, rect) in containers {
        if rules
            .iter()
            .any(|rule| rule.parent_control_id == Some(control_id))
        {
            place_children(rules, Some(control_id), rect, placed, visited);
        }
    }
}
