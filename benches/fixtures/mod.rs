// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use mindweave::model::{Node, NodeId, NodeStatus, ProjectId, Tree};
use mindweave::sync::ProjectSnapshot;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// Root plus the four level-1 branches.
    Small,
    /// Four branches, each fanning out three ways for three more levels.
    Medium,
    /// A few very deep chains.
    Deep,
}

fn node_id(raw: &str) -> NodeId {
    NodeId::new(raw).expect("node id")
}

fn node(id: &str, parent: Option<&str>, level: u32, order_index: i64) -> Node {
    let status = if order_index % 3 == 0 { NodeStatus::Green } else { NodeStatus::Red };
    Node::new(node_id(id), parent.map(node_id), level, order_index)
        .with_question(format!("How should {id} be scoped for the first release?"))
        .with_status(status)
}

/// Full tree with `fanout` children per node below level 1, down to `depth`.
pub fn tree(branches: usize, fanout: usize, depth: u32) -> Tree {
    let mut nodes = vec![node("root", None, 0, 0)];
    let mut frontier = Vec::new();
    for idx in 0..branches {
        let id = format!("b{idx}");
        nodes.push(node(&id, Some("root"), 1, idx as i64));
        frontier.push(id);
    }

    for level in 2..=depth {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for parent in &frontier {
            for idx in 0..fanout {
                let id = format!("{parent}_{idx}");
                nodes.push(node(&id, Some(parent), level, idx as i64));
                next.push(id);
            }
        }
        frontier = next;
    }

    Tree::new(nodes)
}

pub fn fixture(case: Case) -> Tree {
    match case {
        Case::Small => tree(4, 0, 1),
        Case::Medium => tree(4, 3, 4),
        Case::Deep => tree(4, 1, 40),
    }
}

pub fn snapshot(tree: &Tree) -> ProjectSnapshot {
    ProjectSnapshot {
        id: ProjectId::new("bench").expect("project id"),
        name: "Bench".to_owned(),
        idea_text: String::new(),
        nodes: tree.nodes().to_vec(),
        progress: tree.progress(),
    }
}
