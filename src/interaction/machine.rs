// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer and action handling for the map view.
//!
//! [`InteractionMachine`] owns the [`AppState`] and turns host events into state changes and
//! [`Command`]s. It never awaits; every command it returns has already been registered as
//! in flight and must be dispatched by the host.

use super::command::Command;
use super::menu::MenuAction;
use super::notice::Notice;
use super::state::{AppState, CandidatePurpose, PanelMode};
use crate::layout::Point;
use crate::model::{NodeId, NodeStatus};
use crate::sync::controller::Completion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// What is under the pointer, as resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Canvas,
    Node(NodeId),
    /// The detail panel or any other chrome that swallows pointer input.
    Panel,
    Menu,
    MenuItem(MenuAction),
}

/// Pointer input in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, position: Point, target: PointerTarget },
    Move { position: Point },
    Up { position: Point },
}

/// The pointer-level state. `MenuOpen` is reported while idle with a context menu showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    CanvasPanning,
    NodeDragging,
    MenuOpen,
}

/// How a candidate from the detail panel should be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateUse {
    /// Choose it for an unresolved tip, or submit it as an AI answer for a question.
    Primary,
    /// Attach it to a question as a new tip.
    AsTip,
}

#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    node_id: NodeId,
    pointer_start: Point,
    origin: Point,
    dragged: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum PointerMode {
    Idle,
    CanvasPanning { last: Point },
    NodeDragging(DragSession),
}

#[derive(Debug, Clone)]
pub struct InteractionMachine {
    state: AppState,
    pointer: PointerMode,
}

impl InteractionMachine {
    pub fn new(state: AppState) -> Self {
        Self { state, pointer: PointerMode::Idle }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn mode(&self) -> InteractionMode {
        match self.pointer {
            PointerMode::CanvasPanning { .. } => InteractionMode::CanvasPanning,
            PointerMode::NodeDragging(_) => InteractionMode::NodeDragging,
            PointerMode::Idle if self.state.menu().is_some() => InteractionMode::MenuOpen,
            PointerMode::Idle => InteractionMode::Idle,
        }
    }

    /// Resolves what sits under `position`, ignoring host chrome.
    pub fn target_at(&self, position: Point) -> PointerTarget {
        if let Some(menu) = self.state.menu() {
            if menu.contains(position, self.state.config()) {
                return PointerTarget::Menu;
            }
        }
        match self.state.node_at(position) {
            Some(node_id) => PointerTarget::Node(node_id.clone()),
            None => PointerTarget::Canvas,
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Command> {
        match event {
            PointerEvent::Down { button, position, target } => self.pointer_down(button, position, target),
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                Vec::new()
            }
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    fn pointer_down(&mut self, button: PointerButton, position: Point, target: PointerTarget) -> Vec<Command> {
        match (&target, button) {
            (PointerTarget::MenuItem(action), _) => return self.choose_menu_action(*action),
            (PointerTarget::Menu, _) => return Vec::new(),
            _ => {}
        }
        self.state.close_menu();

        match (target, button) {
            (PointerTarget::Node(node_id), PointerButton::Secondary) => {
                let commands = self.state.select_node(&node_id);
                if self.state.tree().contains(&node_id) {
                    self.state.open_menu(node_id, position);
                }
                commands
            }
            (PointerTarget::Node(node_id), PointerButton::Primary) => {
                if let Some(placed) = self.state.layout().position(&node_id) {
                    self.pointer = PointerMode::NodeDragging(DragSession {
                        node_id,
                        pointer_start: position,
                        origin: Point::new(placed.x, placed.y),
                        dragged: false,
                    });
                }
                Vec::new()
            }
            (PointerTarget::Canvas, PointerButton::Primary) => {
                self.state.set_panel_visible(false);
                self.pointer = PointerMode::CanvasPanning { last: position };
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn pointer_move(&mut self, position: Point) {
        let threshold = self.state.config().drag_threshold;
        match &mut self.pointer {
            PointerMode::Idle => {}
            PointerMode::CanvasPanning { last } => {
                let delta = position - *last;
                *last = position;
                self.state.pan_by(delta);
            }
            PointerMode::NodeDragging(session) => {
                let delta = position - session.pointer_start;
                if delta.x.abs() > threshold || delta.y.abs() > threshold {
                    session.dragged = true;
                }
                let target = session.origin + delta;
                let node_id = session.node_id.clone();
                self.state.move_node_live(&node_id, target.x, target.y);
            }
        }
    }

    fn pointer_up(&mut self, position: Point) -> Vec<Command> {
        match std::mem::replace(&mut self.pointer, PointerMode::Idle) {
            PointerMode::Idle => Vec::new(),
            PointerMode::CanvasPanning { .. } => {
                if self.state.selection().is_some() {
                    self.state.set_panel_visible(true);
                }
                Vec::new()
            }
            PointerMode::NodeDragging(session) => {
                self.pointer_move_final(&session, position);
                if session.dragged {
                    if let Some(saved) = self.state.overrides().get(&session.node_id) {
                        tracing::debug!(node = %session.node_id, left = saved.left, top = saved.top, "node drag committed");
                    }
                    self.state.refresh_connectors();
                    Vec::new()
                } else {
                    self.state.select_node(&session.node_id)
                }
            }
        }
    }

    fn pointer_move_final(&mut self, session: &DragSession, position: Point) {
        if !session.dragged {
            return;
        }
        let target = session.origin + (position - session.pointer_start);
        self.state.move_node_live(&session.node_id, target.x, target.y);
    }

    /// Runs a context-menu action for the menu's node and closes the menu.
    pub fn choose_menu_action(&mut self, action: MenuAction) -> Vec<Command> {
        let Some(menu) = self.state.menu().cloned() else {
            return Vec::new();
        };
        self.state.close_menu();
        self.trigger_action(&menu.node_id, action)
    }

    /// Runs `action` for `node_id` as if chosen from its context menu.
    pub fn trigger_action(&mut self, node_id: &NodeId, action: MenuAction) -> Vec<Command> {
        let Some(node) = self.state.tree().get(node_id) else {
            self.state.close_menu();
            return Vec::new();
        };
        let is_root = node.is_root();
        let answered = node.is_answered();

        let mut commands = self.state.select_node(node_id);
        match action {
            MenuAction::Answer if is_root => {
                self.state.notify(Notice::info("The root frames the whole project and needs no answer."));
            }
            MenuAction::Answer if answered => {
                self.state.notify(Notice::info("This node is already answered. Use Tips to add more."));
            }
            MenuAction::Answer => self.state.set_panel(PanelMode::Answering),
            MenuAction::SpawnFollowUp => {
                self.state.request(Command::SpawnFollowUp { node_id: node_id.clone() }, &mut commands);
            }
            MenuAction::Tips if answered => {
                self.state.request(Command::CreateTip { node_id: node_id.clone(), content: None }, &mut commands);
            }
            MenuAction::Tips => {
                self.state.set_panel(PanelMode::TipsChoosing(CandidatePurpose::AnswerQuestion));
                self.state.forget_candidates(node_id);
                self.state.request(Command::FetchTipCandidates { node_id: node_id.clone() }, &mut commands);
            }
        }
        commands
    }

    /// Submits the typed answer for the active node.
    pub fn submit_answer(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        let Some(selection) = self.state.selection() else {
            return commands;
        };
        if selection.panel != PanelMode::Answering {
            return commands;
        }
        let node_id = selection.node_id.clone();
        let content = self.state.answer_draft().trim().to_owned();
        if content.is_empty() {
            return commands;
        }
        self.state.request(Command::SubmitAnswer { node_id, content, by_ai: false }, &mut commands);
        commands
    }

    /// Acts on candidate `index` of the active node's panel.
    pub fn choose_candidate(&mut self, index: usize, usage: CandidateUse) -> Vec<Command> {
        let mut commands = Vec::new();
        let Some(selection) = self.state.selection() else {
            return commands;
        };
        let PanelMode::TipsChoosing(purpose) = selection.panel else {
            return commands;
        };
        let node_id = selection.node_id.clone();
        let Some(content) = self
            .state
            .candidates(&node_id)
            .and_then(|candidates| candidates.get(index))
            .map(|candidate| candidate.trim().to_owned())
            .filter(|candidate| !candidate.is_empty())
        else {
            return commands;
        };

        let command = match (purpose, usage) {
            (CandidatePurpose::ChooseTip, _) => Command::ChooseTip { node_id, content },
            (CandidatePurpose::AnswerQuestion, CandidateUse::Primary) => {
                Command::SubmitAnswer { node_id, content, by_ai: true }
            }
            (CandidatePurpose::AnswerQuestion, CandidateUse::AsTip) => {
                Command::CreateTip { node_id, content: Some(content) }
            }
        };
        self.state.request(command, &mut commands);
        commands
    }

    pub fn request_merge(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        self.state.request(Command::MergeProject, &mut commands);
        commands
    }

    /// Selects the first open question after the active one, in depth-first order.
    pub fn select_next_open(&mut self) -> Vec<Command> {
        let open = self
            .state
            .tree()
            .walk_from_root()
            .into_iter()
            .filter(|node| !node.is_root() && !node.is_tip() && node.status() == NodeStatus::Red)
            .map(|node| node.id().clone())
            .collect::<Vec<_>>();
        let start = self
            .state
            .active_id()
            .and_then(|active| open.iter().position(|node_id| node_id == active))
            .map_or(0, |idx| idx + 1);
        match open.get(start).or_else(|| open.first()) {
            Some(next) => {
                let next = next.clone();
                self.state.select_node(&next)
            }
            None => Vec::new(),
        }
    }

    /// Backs out one level: menu, then panel sub-state, then selection.
    pub fn dismiss(&mut self) {
        if self.state.close_merged_document() || self.state.close_menu() {
            return;
        }
        match self.state.panel_mode() {
            Some(PanelMode::Answering) | Some(PanelMode::TipsChoosing(CandidatePurpose::AnswerQuestion)) => {
                self.state.set_panel(PanelMode::Viewing);
            }
            Some(_) => self.state.clear_selection(),
            None => {}
        }
    }

    pub fn apply_completion(&mut self, completion: Completion) -> Vec<Command> {
        self.state.apply_completion(completion)
    }
}

#[cfg(test)]
mod tests;
