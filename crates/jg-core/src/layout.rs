//! Tree layout policy.
//!
//! Containers are laid out top-down: a container's entries sit one row
//! below it, spread in fixed-width slots centered under the container, and a
//! nested container sits two rows below its parent container, directly under
//! the entry node that holds it. The extra row keeps key labels apart from the
//! values they nest.

use serde::{Deserialize, Serialize};

/// Vertical distance between two depth rows.
pub const ROW_HEIGHT: f64 = 100.0;

/// Horizontal slot width per sibling entry.
pub const SPACING: f64 = 150.0;

/// Rows between a container and its entry nodes.
pub const ENTRY_ROW_STEP: u32 = 1;

/// Rows between a container and a container nested in one of its entries.
pub const NESTED_DEPTH_STEP: u32 = 2;

/// Vertical offset for a descendant seeded without a live position.
pub const FALLBACK_OFFSET: f64 = 50.0;

/// Layout configuration. `Default` uses the module constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutPolicy {
    pub row_height: f64,
    pub spacing: f64,
    pub entry_row_step: u32,
    pub nested_depth_step: u32,
    pub fallback_offset: f64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            row_height: ROW_HEIGHT,
            spacing: SPACING,
            entry_row_step: ENTRY_ROW_STEP,
            nested_depth_step: NESTED_DEPTH_STEP,
            fallback_offset: FALLBACK_OFFSET,
        }
    }
}

impl LayoutPolicy {
    /// y coordinate of a depth row.
    pub fn row_y(&self, depth: u32) -> f64 {
        f64::from(depth) * self.row_height
    }

    /// Depth of the entry nodes of a container at `depth`.
    pub fn entry_depth(&self, depth: u32) -> u32 {
        depth + self.entry_row_step
    }

    /// Depth of a container nested in an entry of a container at `depth`.
    pub fn nested_depth(&self, depth: u32) -> u32 {
        depth + self.nested_depth_step
    }

    /// x coordinate of slot `index` out of `count`, centered on `center_x`.
    pub fn slot_x(&self, center_x: f64, count: usize, index: usize) -> f64 {
        let total_width = count as f64 * self.spacing;
        let start_x = center_x - total_width / 2.0 + self.spacing / 2.0;
        start_x + index as f64 * self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_scale_with_depth() {
        let p = LayoutPolicy::default();
        assert_eq!(p.row_y(0), 0.0);
        assert_eq!(p.row_y(3), 300.0);
    }

    #[test]
    fn nested_containers_skip_a_row() {
        let p = LayoutPolicy::default();
        assert_eq!(p.entry_depth(0), 1);
        assert_eq!(p.nested_depth(0), 2);
        assert_eq!(p.entry_depth(p.nested_depth(0)), 3);
    }

    #[test]
    fn single_slot_is_centered() {
        let p = LayoutPolicy::default();
        assert_eq!(p.slot_x(40.0, 1, 0), 40.0);
    }

    #[test]
    fn slots_are_symmetric() {
        let p = LayoutPolicy::default();
        assert_eq!(p.slot_x(0.0, 2, 0), -75.0);
        assert_eq!(p.slot_x(0.0, 2, 1), 75.0);
        assert_eq!(p.slot_x(0.0, 3, 0), -150.0);
        assert_eq!(p.slot_x(0.0, 3, 1), 0.0);
        assert_eq!(p.slot_x(0.0, 3, 2), 150.0);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let p: LayoutPolicy = serde_json::from_str(r#"{"rowHeight": 80}"#).unwrap();
        assert_eq!(p.row_height, 80.0);
        assert_eq!(p.spacing, SPACING);
        assert_eq!(p.nested_depth_step, NESTED_DEPTH_STEP);
    }
}
