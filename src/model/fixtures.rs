// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;
use super::node::Node;
use super::tree::Tree;

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn question(id: &str, parent: Option<&str>, level: u32, order_index: i64) -> Node {
    Node::new(nid(id), parent.map(nid), level, order_index).with_question(format!("What about {id}?"))
}

/// Root with `count` level-1 children named `c0`, `c1`, ...
pub(crate) fn root_with_children(count: usize) -> Tree {
    let mut nodes = vec![question("root", None, 0, 0)];
    for idx in 0..count {
        nodes.push(question(&format!("c{idx}"), Some("root"), 1, idx as i64));
    }
    Tree::new(nodes)
}

/// Root -> four branches; `c0` has three children, `c0a` has one grandchild.
pub(crate) fn branching_tree() -> Tree {
    let mut nodes = vec![question("root", None, 0, 0)];
    for idx in 0..4 {
        nodes.push(question(&format!("c{idx}"), Some("root"), 1, idx));
    }
    nodes.push(question("c0a", Some("c0"), 2, 0));
    nodes.push(question("c0b", Some("c0"), 2, 1));
    nodes.push(question("c0c", Some("c0"), 2, 2));
    nodes.push(question("c0a1", Some("c0a"), 3, 0));
    Tree::new(nodes)
}
