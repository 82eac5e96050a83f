// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::geometry::Point;

/// Fixed constants the radial layout is computed against. All values are canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub center: Point,
    pub radius_level1: f64,
    pub radius_step: f64,
    /// Level-1 directions in round-robin order: up, left, right, down.
    pub directions: [f64; 4],
    pub root_width: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub perp_gap: f64,
    pub connector_bow: f64,
    /// Square canvas edge; the center sits at its midpoint by default.
    pub canvas_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: Point::new(2000.0, 2000.0),
            radius_level1: 380.0,
            radius_step: 320.0,
            directions: [270.0, 180.0, 0.0, 90.0],
            root_width: 260.0,
            node_width: 200.0,
            node_height: 80.0,
            perp_gap: 100.0,
            connector_bow: 80.0,
            canvas_size: 4000.0,
        }
    }
}

impl LayoutConfig {
    /// Default box width for a node at `level`.
    pub fn width_for_level(&self, level: u32) -> f64 {
        if level == 0 {
            self.root_width
        } else {
            self.node_width
        }
    }

    pub fn direction_for(&self, sibling_index: usize) -> f64 {
        self.directions[sibling_index % self.directions.len()]
    }
}
