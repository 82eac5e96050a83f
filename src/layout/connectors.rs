// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use super::config::LayoutConfig;
use super::geometry::{quadratic_control_point, Point};
use super::radial::MindMapLayout;
use crate::model::{Node, NodeId, NodeStatus, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorColor {
    /// Tip or AI-answered child.
    Accent,
    Answered,
    Unanswered,
}

impl ConnectorColor {
    pub fn for_node(node: &Node) -> Self {
        if node.renders_as_tip() {
            return Self::Accent;
        }
        match node.status() {
            NodeStatus::Green => Self::Answered,
            NodeStatus::Red | NodeStatus::Ai => Self::Unanswered,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Self::Accent => "#1E88E5",
            Self::Answered => "#34A853",
            Self::Unanswered => "#EA4335",
        }
    }
}

/// One parent→child edge as a quadratic curve between box centers.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveDescriptor {
    pub parent_id: NodeId,
    pub child_id: NodeId,
    pub from: Point,
    pub control: Point,
    pub to: Point,
    pub color: ConnectorColor,
}

impl CurveDescriptor {
    /// SVG path data (`M sx sy Q cx cy ex ey`).
    pub fn svg_path(&self) -> String {
        let mut out = String::with_capacity(48);
        let _ = write!(
            out,
            "M {} {} Q {} {} {} {}",
            self.from.x, self.from.y, self.control.x, self.control.y, self.to.x, self.to.y
        );
        out
    }
}

/// Builds one curve per non-root node whose parent and own position are both resolved.
///
/// Edges with an unresolved endpoint are skipped; this happens transiently while the tree
/// cache is being refreshed.
pub fn synthesize_connectors(
    tree: &Tree,
    layout: &MindMapLayout,
    config: &LayoutConfig,
) -> Vec<CurveDescriptor> {
    let mut curves = Vec::with_capacity(tree.len().saturating_sub(1));
    for node in tree.nodes() {
        let Some(parent_id) = node.parent_id() else {
            continue;
        };
        let (Some(parent), Some(child)) = (layout.position(parent_id), layout.position(node.id()))
        else {
            continue;
        };

        let from = parent.center(config.node_height);
        let to = child.center(config.node_height);
        curves.push(CurveDescriptor {
            parent_id: parent_id.clone(),
            child_id: node.id().clone(),
            from,
            control: quadratic_control_point(from, to, config.connector_bow),
            to,
            color: ConnectorColor::for_node(node),
        });
    }
    curves
}
