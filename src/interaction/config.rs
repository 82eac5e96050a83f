// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Tunables for pointer handling and labels. Distances are in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// A node drag counts as a drag (and suppresses selection) once either axis moves past this.
    pub drag_threshold: f64,
    pub menu_width: f64,
    pub menu_height: f64,
    /// Minimum gap kept between the context menu and the viewport edges.
    pub menu_padding: f64,
    /// Characters taken from the question text when a node has no usable title.
    pub title_chars: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 2.0,
            menu_width: 200.0,
            menu_height: 140.0,
            menu_padding: 8.0,
            title_chars: 7,
        }
    }
}
