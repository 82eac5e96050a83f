// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashMap, HashSet};

use super::command::Command;
use super::config::InteractionConfig;
use super::menu::ContextMenu;
use super::notice::{Notice, NoticeQueue};
use super::title;
use crate::layout::{
    layout_mind_map, synthesize_connectors, CurveDescriptor, LayoutConfig, MindMapLayout,
    NodeOverride, OverrideStore, Point,
};
use crate::model::{Node, NodeId, NodeStatus, ProjectId, ProjectProgress, Tree};
use crate::sync::error::Workflow;
use crate::sync::service::ProjectSnapshot;

/// What a candidate list in the detail panel is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePurpose {
    /// Content for an unresolved tip node.
    ChooseTip,
    /// Suggested answers for an open question; each can become an answer or a tip.
    AnswerQuestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    Viewing,
    Answering,
    TipsChoosing(CandidatePurpose),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub node_id: NodeId,
    pub panel: PanelMode,
}

type InFlightKey = (Workflow, Option<NodeId>);

/// Everything the map view knows: the cached tree, its layout, the viewport and the
/// per-node interaction flags. Mutated only on the event-loop thread.
#[derive(Debug, Clone)]
pub struct AppState {
    project_id: Option<ProjectId>,
    project_name: String,
    tree: Tree,
    progress: ProjectProgress,
    layout_config: LayoutConfig,
    config: InteractionConfig,
    overrides: OverrideStore,
    layout: MindMapLayout,
    connectors: Vec<CurveDescriptor>,
    pan: Point,
    viewport: Point,
    selection: Option<Selection>,
    panel_visible: bool,
    menu: Option<ContextMenu>,
    titled: HashSet<NodeId>,
    in_flight: HashSet<InFlightKey>,
    candidates: HashMap<NodeId, Vec<String>>,
    answer_rollback: HashMap<NodeId, NodeStatus>,
    answer_draft: String,
    merged_document: Option<String>,
    notices: NoticeQueue,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), InteractionConfig::default())
    }
}

impl AppState {
    pub fn new(layout_config: LayoutConfig, config: InteractionConfig) -> Self {
        Self {
            project_id: None,
            project_name: String::new(),
            tree: Tree::default(),
            progress: ProjectProgress::default(),
            layout_config,
            config,
            overrides: OverrideStore::new(),
            layout: MindMapLayout::default(),
            connectors: Vec::new(),
            pan: Point::new(0.0, 0.0),
            viewport: Point::new(0.0, 0.0),
            selection: None,
            panel_visible: false,
            menu: None,
            titled: HashSet::new(),
            in_flight: HashSet::new(),
            candidates: HashMap::new(),
            answer_rollback: HashMap::new(),
            answer_draft: String::new(),
            merged_document: None,
            notices: NoticeQueue::default(),
        }
    }

    pub fn load_project(&mut self, snapshot: ProjectSnapshot) {
        tracing::info!(project = %snapshot.id, nodes = snapshot.nodes.len(), "project loaded");
        self.project_id = Some(snapshot.id);
        self.project_name = snapshot.name;
        self.replace_tree(snapshot.nodes, Some(snapshot.progress));
    }

    /// Swaps in a complete node set and re-lays out. Selection and menu drop nodes that left.
    pub fn replace_tree(&mut self, nodes: Vec<Node>, progress: Option<ProjectProgress>) {
        self.tree.replace(nodes);
        self.progress = progress.unwrap_or_else(|| self.tree.progress());
        self.answer_rollback.retain(|node_id, _| self.tree.contains(node_id));
        self.validate_focus();
        self.relayout();
    }

    pub(crate) fn validate_focus(&mut self) {
        if let Some(menu) = &self.menu {
            if !self.tree.contains(&menu.node_id) {
                self.menu = None;
            }
        }
        let Some(selection) = &mut self.selection else {
            return;
        };
        match self.tree.get(&selection.node_id) {
            None => {
                self.selection = None;
                self.panel_visible = false;
            }
            Some(node) => {
                let stale_tip_panel = selection.panel
                    == PanelMode::TipsChoosing(CandidatePurpose::ChooseTip)
                    && !node.awaits_tip_selection();
                if stale_tip_panel {
                    selection.panel = PanelMode::Viewing;
                }
            }
        }
    }

    pub fn relayout(&mut self) {
        self.layout = layout_mind_map(&self.tree, &self.layout_config, &mut self.overrides);
        self.refresh_connectors();
    }

    pub(crate) fn refresh_connectors(&mut self) {
        self.connectors = synthesize_connectors(&self.tree, &self.layout, &self.layout_config);
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn progress(&self) -> ProjectProgress {
        self.progress
    }

    pub(crate) fn set_progress(&mut self, progress: ProjectProgress) {
        self.progress = progress;
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout_config
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    pub fn layout(&self) -> &MindMapLayout {
        &self.layout
    }

    pub fn connectors(&self) -> &[CurveDescriptor] {
        &self.connectors
    }

    // Viewport ----------------------------------------------------------------------------

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Point::new(width.max(0.0), height.max(0.0));
    }

    pub fn viewport(&self) -> Point {
        self.viewport
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Shifts the canvas. Never touches node positions.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.x / 2.0, self.viewport.y / 2.0)
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        world - self.layout_config.center + self.viewport_center() + self.pan
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        screen - self.viewport_center() - self.pan + self.layout_config.center
    }

    pub fn node_at(&self, screen: Point) -> Option<&NodeId> {
        let world = self.screen_to_world(screen);
        self.layout.hit_test(&self.tree, world, self.layout_config.node_height)
    }

    /// Pans so the node's box center lands on the viewport center.
    pub fn center_on(&mut self, node_id: &NodeId) -> bool {
        let Some(position) = self.layout.position(node_id) else {
            return false;
        };
        let center = position.center(self.layout_config.node_height);
        self.pan = self.layout_config.center - center;
        true
    }

    /// Live drag update: store first, then the one box and the curves.
    pub fn move_node_live(&mut self, node_id: &NodeId, left: f64, top: f64) -> bool {
        let Some(width) = self.layout.position(node_id).map(|position| position.width) else {
            return false;
        };
        if !self.overrides.move_to(node_id, left, top) {
            self.overrides.set(node_id.clone(), NodeOverride::new(left, top, Some(width)));
        }
        self.layout.move_node(node_id, left, top);
        self.refresh_connectors();
        true
    }

    // Selection and panel -----------------------------------------------------------------

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn active_id(&self) -> Option<&NodeId> {
        self.selection.as_ref().map(|selection| &selection.node_id)
    }

    pub fn active_node(&self) -> Option<&Node> {
        self.active_id().and_then(|node_id| self.tree.get(node_id))
    }

    pub fn panel_mode(&self) -> Option<PanelMode> {
        self.selection.as_ref().map(|selection| selection.panel)
    }

    pub(crate) fn set_panel(&mut self, panel: PanelMode) {
        if let Some(selection) = &mut self.selection {
            selection.panel = panel;
        }
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub(crate) fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    /// Makes `node_id` active, centers it and opens its panel.
    ///
    /// Returns the fetches this triggers (candidates for an unresolved tip, a generated
    /// title for an unnamed question), already registered as in flight.
    pub fn select_node(&mut self, node_id: &NodeId) -> Vec<Command> {
        let mut commands = Vec::new();
        let Some(node) = self.tree.get(node_id) else {
            return commands;
        };
        let awaits_tip = node.awaits_tip_selection();
        let wants_title = title::wants_generated_title(node);

        if self.active_id() != Some(node_id) {
            self.answer_draft.clear();
        }
        let panel = if awaits_tip {
            PanelMode::TipsChoosing(CandidatePurpose::ChooseTip)
        } else {
            PanelMode::Viewing
        };
        self.selection = Some(Selection { node_id: node_id.clone(), panel });
        self.panel_visible = true;
        self.center_on(node_id);

        if awaits_tip && !self.candidates.contains_key(node_id) {
            self.request(Command::FetchTipCandidates { node_id: node_id.clone() }, &mut commands);
        }
        if wants_title {
            self.request_title(node_id, &mut commands);
        }
        commands
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.panel_visible = false;
        self.answer_draft.clear();
    }

    pub fn answer_draft(&self) -> &str {
        &self.answer_draft
    }

    pub fn answer_draft_mut(&mut self) -> &mut String {
        &mut self.answer_draft
    }

    // Menu --------------------------------------------------------------------------------

    pub fn menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    pub(crate) fn open_menu(&mut self, node_id: NodeId, pointer: Point) {
        self.menu = Some(ContextMenu::open_at(node_id, pointer, self.viewport, &self.config));
    }

    pub fn close_menu(&mut self) -> bool {
        self.menu.take().is_some()
    }

    // Titles and candidates ---------------------------------------------------------------

    pub fn label_for(&self, node: &Node) -> String {
        title::display_label(node, self.is_fetching_title(node.id()), self.config.title_chars)
    }

    pub fn is_titled(&self, node_id: &NodeId) -> bool {
        self.titled.contains(node_id)
    }

    pub(crate) fn mark_titled(&mut self, node_id: NodeId) {
        self.titled.insert(node_id);
    }

    pub fn is_fetching_title(&self, node_id: &NodeId) -> bool {
        self.in_flight.contains(&(Workflow::FetchShortTitle, Some(node_id.clone())))
    }

    pub(crate) fn request_title(&mut self, node_id: &NodeId, out: &mut Vec<Command>) {
        self.request(Command::FetchShortTitle { node_id: node_id.clone() }, out);
    }

    /// Title fetches for every node that should carry a generated title.
    pub fn request_missing_titles(&mut self) -> Vec<Command> {
        let wanted = self
            .tree
            .nodes()
            .iter()
            .filter(|node| title::wants_generated_title(node))
            .map(|node| node.id().clone())
            .collect::<Vec<_>>();
        let mut commands = Vec::new();
        for node_id in &wanted {
            self.request_title(node_id, &mut commands);
        }
        commands
    }

    pub fn candidates(&self, node_id: &NodeId) -> Option<&[String]> {
        self.candidates.get(node_id).map(Vec::as_slice)
    }

    pub(crate) fn store_candidates(&mut self, node_id: NodeId, candidates: Vec<String>) {
        self.candidates.insert(node_id, candidates);
    }

    pub(crate) fn forget_candidates(&mut self, node_id: &NodeId) {
        self.candidates.remove(node_id);
    }

    pub fn is_loading_candidates(&self, node_id: &NodeId) -> bool {
        self.in_flight.contains(&(Workflow::FetchTipCandidates, Some(node_id.clone())))
    }

    // In-flight bookkeeping ---------------------------------------------------------------

    /// Registers `command` as dispatched and applies its optimistic effect.
    ///
    /// Returns `false` (and changes nothing) when an identical fetch is already in flight or
    /// the node already carries a generated title.
    pub fn begin(&mut self, command: &Command) -> bool {
        if let Command::FetchShortTitle { node_id } = command {
            if self.titled.contains(node_id) {
                return false;
            }
        }
        if let Some(key) = in_flight_key(command) {
            if !self.in_flight.insert(key) {
                tracing::debug!(workflow = command.workflow().as_str(), node = ?command.node_id(), "duplicate request ignored");
                return false;
            }
        }

        if let Command::SubmitAnswer { node_id, by_ai, .. } = command {
            let optimistic = if *by_ai { NodeStatus::Ai } else { NodeStatus::Green };
            if let Some(previous) = self.tree.set_status(node_id, optimistic) {
                self.answer_rollback.entry(node_id.clone()).or_insert(previous);
                self.progress = self.tree.progress();
                self.refresh_connectors();
            }
        }
        true
    }

    pub(crate) fn finish(&mut self, command: &Command) {
        if let Some(key) = in_flight_key(command) {
            self.in_flight.remove(&key);
        }
    }

    pub fn is_in_flight(&self, command: &Command) -> bool {
        in_flight_key(command).is_some_and(|key| self.in_flight.contains(&key))
    }

    pub fn has_pending_work(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub(crate) fn take_answer_rollback(&mut self, node_id: &NodeId) -> Option<NodeStatus> {
        self.answer_rollback.remove(node_id)
    }

    pub(crate) fn request(&mut self, command: Command, out: &mut Vec<Command>) {
        if self.begin(&command) {
            out.push(command);
        }
    }

    // Output ------------------------------------------------------------------------------

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeQueue {
        &mut self.notices
    }

    pub fn merged_document(&self) -> Option<&str> {
        self.merged_document.as_deref()
    }

    pub(crate) fn set_merged_document(&mut self, document: String) {
        self.merged_document = Some(document);
    }

    pub fn close_merged_document(&mut self) -> bool {
        self.merged_document.take().is_some()
    }
}

/// Spawns and tip creations may legitimately repeat; everything else is one-at-a-time per node.
fn in_flight_key(command: &Command) -> Option<InFlightKey> {
    match command {
        Command::SpawnFollowUp { .. } | Command::CreateTip { .. } => None,
        other => Some((other.workflow(), other.node_id().cloned())),
    }
}
