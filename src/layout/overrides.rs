// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::model::{NodeId, Tree};

/// A manual node placement (top-left corner plus optional box width).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeOverride {
    pub left: f64,
    pub top: f64,
    pub width: Option<f64>,
}

impl NodeOverride {
    pub fn new(left: f64, top: f64, width: Option<f64>) -> Self {
        Self { left, top, width }
    }
}

/// Per-node positions that win over computed layout.
///
/// Entries are written by layout finalization and by node drags and never expire. An entry
/// for a node that left the tree is inert: layout only consults ids it is placing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideStore {
    entries: BTreeMap<NodeId, NodeOverride>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&NodeOverride> {
        self.entries.get(node_id)
    }

    pub fn set(&mut self, node_id: NodeId, value: NodeOverride) {
        self.entries.insert(node_id, value);
    }

    /// Moves an existing entry, keeping its width. Returns `false` if there is no entry.
    pub fn move_to(&mut self, node_id: &NodeId, left: f64, top: f64) -> bool {
        let Some(entry) = self.entries.get_mut(node_id) else {
            return false;
        };
        entry.left = left;
        entry.top = top;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries for nodes absent from `tree`. Not called by reconciliation; stale
    /// entries are harmless for a session-scoped store.
    pub fn retain_existing(&mut self, tree: &Tree) -> usize {
        let before = self.entries.len();
        self.entries.retain(|node_id, _| tree.contains(node_id));
        before - self.entries.len()
    }
}
