// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::config::InteractionConfig;
use crate::layout::Point;
use crate::model::{Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Answer,
    SpawnFollowUp,
    Tips,
}

impl MenuAction {
    pub const ALL: [Self; 3] = [Self::Answer, Self::SpawnFollowUp, Self::Tips];

    pub fn label(self) -> &'static str {
        match self {
            Self::Answer => "Answer",
            Self::SpawnFollowUp => "Spawn follow-up",
            Self::Tips => "Tips",
        }
    }

    /// Hotkey shown next to the label.
    pub fn key(self) -> char {
        match self {
            Self::Answer => 'a',
            Self::SpawnFollowUp => 's',
            Self::Tips => 't',
        }
    }

    /// Whether the action does something for `node` (rather than only explaining why not).
    pub fn is_effective_for(self, node: &Node) -> bool {
        match self {
            Self::Answer => !node.is_root() && !node.is_answered(),
            Self::SpawnFollowUp | Self::Tips => true,
        }
    }
}

/// An open context menu. `left`/`top` are screen pixels, already clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub node_id: NodeId,
    pub left: f64,
    pub top: f64,
}

impl ContextMenu {
    pub fn open_at(node_id: NodeId, pointer: Point, viewport: Point, config: &InteractionConfig) -> Self {
        let origin = clamp_menu_origin(pointer, viewport, config);
        Self { node_id, left: origin.x, top: origin.y }
    }

    pub fn contains(&self, point: Point, config: &InteractionConfig) -> bool {
        point.x >= self.left
            && point.x <= self.left + config.menu_width
            && point.y >= self.top
            && point.y <= self.top + config.menu_height
    }
}

/// Keeps a `menu_width` x `menu_height` box anchored at `pointer` inside `viewport`.
///
/// The far edges win first; the near edges then win over them, so a viewport smaller than
/// the menu pins it to the top-left padding.
pub fn clamp_menu_origin(pointer: Point, viewport: Point, config: &InteractionConfig) -> Point {
    let pad = config.menu_padding;
    let mut x = pointer.x;
    let mut y = pointer.y;
    if x + config.menu_width + pad > viewport.x {
        x = viewport.x - config.menu_width - pad;
    }
    if y + config.menu_height + pad > viewport.y {
        y = viewport.y - config.menu_height - pad;
    }
    Point::new(x.max(pad), y.max(pad))
}
