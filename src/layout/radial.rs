// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, VecDeque};

use super::config::LayoutConfig;
use super::geometry::{fan_offset, Point};
use super::overrides::{NodeOverride, OverrideStore};
use crate::model::{Node, NodeId, Tree};

/// Resolved box for one node. `x`/`y` are the top-left corner in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub level: u32,
    /// Branch direction in degrees, inherited from the level-1 ancestor. `None` for the root.
    pub angle: Option<f64>,
}

impl Position {
    fn centered_at(center: Point, width: f64, height: f64, level: u32, angle: Option<f64>) -> Self {
        Self { x: center.x - width / 2.0, y: center.y - height / 2.0, width, level, angle }
    }

    pub fn center(&self, node_height: f64) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + node_height / 2.0)
    }

    pub fn contains(&self, point: Point, node_height: f64) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + node_height
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MindMapLayout {
    positions: BTreeMap<NodeId, Position>,
}

impl MindMapLayout {
    pub fn positions(&self) -> &BTreeMap<NodeId, Position> {
        &self.positions
    }

    pub fn position(&self, node_id: &NodeId) -> Option<&Position> {
        self.positions.get(node_id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Moves one node's box without touching any other placement.
    pub fn move_node(&mut self, node_id: &NodeId, left: f64, top: f64) -> bool {
        let Some(position) = self.positions.get_mut(node_id) else {
            return false;
        };
        position.x = left;
        position.y = top;
        true
    }

    /// Topmost node (last in tree order) whose box contains `point`.
    pub fn hit_test(&self, tree: &Tree, point: Point, node_height: f64) -> Option<&NodeId> {
        tree.nodes().iter().rev().find_map(|node| {
            let (node_id, position) = self.positions.get_key_value(node.id())?;
            position.contains(point, node_height).then_some(node_id)
        })
    }
}

/// Computes the radial layout for `tree` and merges it with `overrides`.
///
/// Every resolved position is written back into `overrides`, so the first layout of a
/// session becomes the baseline later drags are measured from. Returns an empty layout when
/// the tree has no root.
pub fn layout_mind_map(
    tree: &Tree,
    config: &LayoutConfig,
    overrides: &mut OverrideStore,
) -> MindMapLayout {
    let mut layout = compute_radial_positions(tree, config);

    for node in tree.nodes() {
        let Some(position) = layout.positions.get_mut(node.id()) else {
            continue;
        };
        if let Some(saved) = overrides.get(node.id()) {
            position.x = saved.left;
            position.y = saved.top;
            if let Some(width) = saved.width {
                position.width = width;
            }
        }
        overrides.set(
            node.id().clone(),
            NodeOverride::new(position.x, position.y, Some(position.width)),
        );
    }

    layout
}

/// The structural layout alone, ignoring any overrides.
pub fn compute_radial_positions(tree: &Tree, config: &LayoutConfig) -> MindMapLayout {
    let mut positions = BTreeMap::new();
    let Some(root) = tree.root() else {
        return MindMapLayout { positions };
    };

    positions.insert(
        root.id().clone(),
        Position::centered_at(config.center, config.root_width, config.node_height, 0, None),
    );

    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        let Some(parent) = positions.get(node.id()).copied() else {
            continue;
        };
        let children = tree
            .children(node.id())
            .filter(|child| !positions.contains_key(child.id()))
            .collect::<Vec<&Node>>();
        let count = children.len();

        for (idx, child) in children.into_iter().enumerate() {
            let position = if parent.level == 0 {
                let angle = config.direction_for(idx);
                let center = config.center.offset_polar(angle, config.radius_level1);
                Position::centered_at(center, config.node_width, config.node_height, 1, Some(angle))
            } else {
                let angle = parent.angle.unwrap_or(0.0);
                let center = parent
                    .center(config.node_height)
                    .offset_polar(angle, config.radius_step)
                    .offset_polar(angle + 90.0, fan_offset(idx, count, config.perp_gap));
                Position::centered_at(
                    center,
                    config.node_width,
                    config.node_height,
                    parent.level + 1,
                    Some(angle),
                )
            };
            positions.insert(child.id().clone(), position);
            queue.push_back(child);
        }
    }

    MindMapLayout { positions }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{compute_radial_positions, layout_mind_map, MindMapLayout};
    use crate::layout::{LayoutConfig, NodeOverride, OverrideStore, Point};
    use crate::model::fixtures::{branching_tree, nid, question, root_with_children};
    use crate::model::Tree;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn center_of(layout: &MindMapLayout, id: &str) -> Point {
        layout.position(&nid(id)).expect("position").center(LayoutConfig::default().node_height)
    }

    #[test]
    fn missing_root_yields_empty_layout() {
        let tree = Tree::new(vec![question("a", Some("root"), 1, 0)]);
        let mut overrides = OverrideStore::new();
        let layout = layout_mind_map(&tree, &LayoutConfig::default(), &mut overrides);

        assert!(layout.is_empty());
        assert!(overrides.is_empty());
    }

    #[test]
    fn root_is_centered_regardless_of_shape() {
        let config = LayoutConfig::default();
        for tree in [root_with_children(0), root_with_children(7), branching_tree()] {
            let layout = compute_radial_positions(&tree, &config);
            let root = layout.position(&nid("root")).unwrap();
            assert_eq!((root.x, root.y, root.width), (1870.0, 1960.0, 260.0));
            assert_eq!(root.angle, None);
            assert_eq!(root.level, 0);
        }
    }

    #[test]
    fn level_one_children_round_robin_over_four_directions() {
        let layout = compute_radial_positions(&root_with_children(5), &LayoutConfig::default());
        let angles = (0..5)
            .map(|idx| layout.position(&nid(&format!("c{idx}"))).unwrap().angle.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(angles, vec![270.0, 180.0, 0.0, 90.0, 270.0]);

        let up = center_of(&layout, "c0");
        assert!(approx(up.x, 2000.0) && approx(up.y, 1620.0));
        let left = center_of(&layout, "c1");
        assert!(approx(left.x, 1620.0) && approx(left.y, 2000.0));
    }

    #[rstest]
    #[case("c0a", -100.0)]
    #[case("c0b", 0.0)]
    #[case("c0c", 100.0)]
    fn deeper_children_fan_perpendicular_to_branch(#[case] id: &str, #[case] expected_dx: f64) {
        let layout = compute_radial_positions(&branching_tree(), &LayoutConfig::default());
        // Branch c0 points up (270°): step is -y, perpendicular axis (360°) is +x.
        let parent = center_of(&layout, "c0");
        let child = center_of(&layout, id);

        assert!(approx(child.y, parent.y - 320.0), "{id} y={}", child.y);
        assert!(approx(child.x - parent.x, expected_dx), "{id} dx={}", child.x - parent.x);
        assert_eq!(layout.position(&nid(id)).unwrap().angle, Some(270.0));
    }

    #[test]
    fn levels_increase_by_one_along_every_edge() {
        let tree = branching_tree();
        let layout = compute_radial_positions(&tree, &LayoutConfig::default());
        for node in tree.nodes() {
            let Some(parent_id) = node.parent_id() else { continue };
            let child = layout.position(node.id()).unwrap();
            let parent = layout.position(parent_id).unwrap();
            assert_eq!(child.level, parent.level + 1);
            assert!(child.x.is_finite() && child.y.is_finite());
        }
        assert_eq!(layout.len(), tree.len());
    }

    #[test]
    fn dangling_parent_is_omitted_without_panicking() {
        let tree = Tree::new(vec![
            question("root", None, 0, 0),
            question("a", Some("root"), 1, 0),
            question("stray", Some("ghost"), 2, 0),
        ]);
        let layout = compute_radial_positions(&tree, &LayoutConfig::default());

        assert!(layout.position(&nid("stray")).is_none());
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn layout_is_idempotent_without_overrides() {
        let tree = branching_tree();
        let config = LayoutConfig::default();
        assert_eq!(compute_radial_positions(&tree, &config), compute_radial_positions(&tree, &config));

        let mut overrides = OverrideStore::new();
        let first = layout_mind_map(&tree, &config, &mut overrides);
        let second = layout_mind_map(&tree, &config, &mut overrides);
        assert_eq!(first, second);
    }

    #[test]
    fn first_layout_seeds_the_override_store() {
        let tree = root_with_children(2);
        let mut overrides = OverrideStore::new();
        let layout = layout_mind_map(&tree, &LayoutConfig::default(), &mut overrides);

        let c0 = layout.position(&nid("c0")).unwrap();
        assert_eq!(
            overrides.get(&nid("c0")),
            Some(&NodeOverride::new(c0.x, c0.y, Some(200.0)))
        );
        assert_eq!(overrides.len(), 3);
    }

    #[test]
    fn override_wins_across_unrelated_tree_changes() {
        let config = LayoutConfig::default();
        let mut overrides = OverrideStore::new();
        overrides.set(nid("c1"), NodeOverride::new(12.0, 34.0, None));

        let layout = layout_mind_map(&root_with_children(2), &config, &mut overrides);
        let c1 = layout.position(&nid("c1")).unwrap();
        assert_eq!((c1.x, c1.y, c1.width), (12.0, 34.0, 200.0));
        assert_eq!(c1.angle, Some(180.0));

        let layout = layout_mind_map(&root_with_children(6), &config, &mut overrides);
        let c1 = layout.position(&nid("c1")).unwrap();
        assert_eq!((c1.x, c1.y), (12.0, 34.0));
    }

    #[test]
    fn hit_test_prefers_later_nodes() {
        let tree = root_with_children(1);
        let layout = compute_radial_positions(&tree, &LayoutConfig::default());
        let center = center_of(&layout, "c0");

        assert_eq!(layout.hit_test(&tree, center, 80.0), Some(&nid("c0")));
        assert_eq!(layout.hit_test(&tree, Point::new(0.0, 0.0), 80.0), None);
    }
}
