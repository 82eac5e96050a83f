// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use super::ids::NodeId;
use super::node::{Node, NodeStatus};

type ChildSlots = SmallVec<[usize; 4]>;

/// Local cache of a project's node set.
///
/// The cache is never diffed against the service: a successful round trip replaces it
/// wholesale via [`Tree::replace`]. Narrow patches exist only as fallbacks when the follow-up
/// full fetch fails.
///
/// Malformed sets (no root, dangling parents, cycles) are stored as-is; consumers walk from
/// the root and simply never reach broken nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    children: HashMap<NodeId, ChildSlots>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        let mut tree = Self { nodes, index: HashMap::new(), children: HashMap::new() };
        tree.reindex();
        tree
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.children.clear();
        for (slot, node) in self.nodes.iter().enumerate() {
            self.index.entry(node.id().clone()).or_insert(slot);
            if let Some(parent_id) = node.parent_id() {
                self.children.entry(parent_id.clone()).or_default().push(slot);
            }
        }

        let nodes = &self.nodes;
        for slots in self.children.values_mut() {
            // Stable: equal order_index keeps array order.
            slots.sort_by_key(|slot| nodes[*slot].order_index());
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&Node> {
        self.index.get(node_id).map(|slot| &self.nodes[*slot])
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.index.contains_key(node_id)
    }

    /// The first node at level 0, in array order.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_root())
    }

    /// Children of `node_id`, ordered by `order_index` with array order breaking ties.
    pub fn children(&self, node_id: &NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.children
            .get(node_id)
            .map(|slots| slots.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|slot| &self.nodes[*slot])
    }

    pub fn child_count(&self, node_id: &NodeId) -> usize {
        self.children.get(node_id).map_or(0, |slots| slots.len())
    }

    /// Authoritative reconciliation: swap in a freshly fetched node set.
    pub fn replace(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
        self.reindex();
    }

    /// Fallback patch: overwrite the cached copy of `node` if it is present.
    ///
    /// Returns `false` when the node is unknown locally, in which case nothing changes.
    pub fn merge_node(&mut self, node: Node) -> bool {
        let Some(slot) = self.index.get(node.id()).copied() else {
            return false;
        };
        self.nodes[slot] = node;
        self.reindex();
        true
    }

    /// Fallback patch: append nodes that are not cached yet. Returns how many were added.
    pub fn append_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> usize {
        let mut added = 0;
        for node in nodes {
            if self.index.contains_key(node.id()) {
                continue;
            }
            self.index.insert(node.id().clone(), self.nodes.len());
            self.nodes.push(node);
            added += 1;
        }
        if added > 0 {
            self.reindex();
        }
        added
    }

    pub fn set_status(&mut self, node_id: &NodeId, status: NodeStatus) -> Option<NodeStatus> {
        let slot = *self.index.get(node_id)?;
        let previous = self.nodes[slot].status();
        self.nodes[slot].set_status(status);
        Some(previous)
    }

    pub fn set_title(&mut self, node_id: &NodeId, title: impl Into<String>) -> bool {
        let Some(slot) = self.index.get(node_id).copied() else {
            return false;
        };
        self.nodes[slot].set_title(Some(title.into()));
        true
    }

    /// Local progress estimate, counted the way the service counts it.
    pub fn progress(&self) -> ProjectProgress {
        ProjectProgress::from_nodes(&self.nodes)
    }

    /// Depth-first listing of the tree below the root, siblings in order.
    ///
    /// Useful for deterministic iteration (e.g. "next unanswered node" searches).
    pub fn walk_from_root(&self) -> Vec<&Node> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root() else {
            return out;
        };
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id()) {
                continue;
            }
            out.push(node);
            let children = self.children(node.id()).collect::<SmallVec<[&Node; 8]>>();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

/// Completion ratio over non-root question nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectProgress {
    pub total: u32,
    pub green: u32,
    pub percent: u32,
}

impl ProjectProgress {
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let questions = nodes.iter().filter(|node| !node.is_tip() && !node.is_root());
        let (total, green) = questions.fold((0u32, 0u32), |(total, green), node| {
            (total + 1, green + u32::from(node.is_answered()))
        });
        let percent = if total == 0 {
            0
        } else {
            ((f64::from(green) / f64::from(total)) * 100.0).round_ties_even() as u32
        };
        Self { total, green, percent }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.total == self.green
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectProgress, Tree};
    use crate::model::fixtures::{nid, question};
    use crate::model::{Node, NodeStatus, NodeType};

    #[test]
    fn children_are_sorted_by_order_index_with_stable_ties() {
        let tree = Tree::new(vec![
            question("root", None, 0, 0),
            question("c", Some("root"), 1, 2),
            question("a", Some("root"), 1, 1),
            question("b", Some("root"), 1, 1),
        ]);

        let ids = tree.children(&nid("root")).map(|n| n.id().as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn replace_drops_nodes_missing_from_fresh_fetch() {
        let mut tree = Tree::new(vec![question("root", None, 0, 0), question("a", Some("root"), 1, 0)]);
        tree.replace(vec![question("root", None, 0, 0)]);

        assert!(tree.get(&nid("a")).is_none());
        assert_eq!(tree.child_count(&nid("root")), 0);
    }

    #[test]
    fn append_skips_known_ids() {
        let mut tree = Tree::new(vec![question("root", None, 0, 0)]);
        let added = tree.append_nodes([question("root", None, 0, 0), question("x", Some("root"), 1, 0)]);

        assert_eq!(added, 1);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.child_count(&nid("root")), 1);
    }

    #[test]
    fn merge_ignores_unknown_nodes() {
        let mut tree = Tree::new(vec![question("root", None, 0, 0)]);
        assert!(!tree.merge_node(question("ghost", Some("root"), 1, 0)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn progress_ignores_root_and_tips() {
        let nodes = vec![
            question("root", None, 0, 0).with_status(NodeStatus::Green),
            question("a", Some("root"), 1, 0).with_status(NodeStatus::Green),
            question("b", Some("root"), 1, 1),
            question("c", Some("root"), 1, 2).with_status(NodeStatus::Ai),
            Node::new(nid("t"), Some(nid("a")), 2, 0).with_node_type(NodeType::Tip),
        ];

        let progress = ProjectProgress::from_nodes(&nodes);
        assert_eq!(progress, ProjectProgress { total: 3, green: 2, percent: 67 });
        assert!(!progress.is_complete());
    }

    #[test]
    fn progress_rounds_halves_to_even() {
        let mut nodes = vec![question("root", None, 0, 0)];
        for idx in 0..8 {
            let node = question(&format!("q{idx}"), Some("root"), 1, idx);
            nodes.push(if idx < 1 { node.with_status(NodeStatus::Green) } else { node });
        }
        assert_eq!(ProjectProgress::from_nodes(&nodes).percent, 12);

        nodes[2] = nodes[2].clone().with_status(NodeStatus::Green);
        nodes[3] = nodes[3].clone().with_status(NodeStatus::Green);
        assert_eq!(ProjectProgress::from_nodes(&nodes).percent, 38);
    }

    #[test]
    fn walk_from_root_is_depth_first_in_sibling_order() {
        let tree = Tree::new(vec![
            question("root", None, 0, 0),
            question("b", Some("root"), 1, 1),
            question("a", Some("root"), 1, 0),
            question("a1", Some("a"), 2, 0),
            question("orphan", Some("missing"), 2, 0),
        ]);

        let ids = tree.walk_from_root().into_iter().map(|n| n.id().as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["root", "a", "a1", "b"]);
    }
}
