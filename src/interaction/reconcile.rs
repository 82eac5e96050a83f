// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Applying finished workflows to [`AppState`].
//!
//! Each completion is applied in one call: the narrow patch from the workflow's own response
//! goes in first, then the full refetch (when it succeeded) replaces the cache wholesale.
//! Layout runs once, on the final tree.

use super::command::Command;
use super::notice::Notice;
use super::state::{AppState, PanelMode};
use super::title;
use crate::model::NodeId;
use crate::sync::controller::{Completion, WorkflowOutput};
use crate::sync::error::{ServiceError, Workflow};

impl AppState {
    /// Applies `completion` and returns the follow-up fetches it triggers.
    pub fn apply_completion(&mut self, completion: Completion) -> Vec<Command> {
        let Completion { command, result, refreshed } = completion;
        self.finish(&command);

        if let Ok(output) = &result {
            self.apply_patch(&command, output);
        }
        match refreshed {
            Some(Ok(snapshot)) => {
                tracing::debug!(nodes = snapshot.nodes.len(), "reconciled with full project fetch");
                self.tree_mut().replace(snapshot.nodes);
                self.set_progress(snapshot.progress);
                self.validate_focus();
            }
            Some(Err(_)) => {
                tracing::info!(workflow = command.workflow().as_str(), "using local patch");
            }
            None => {}
        }
        self.relayout();

        let mut follow_ups = Vec::new();
        match result {
            Ok(output) => self.after_success(&command, output, &mut follow_ups),
            Err(error) => self.after_failure(&command, &error),
        }
        follow_ups
    }

    fn apply_patch(&mut self, command: &Command, output: &WorkflowOutput) {
        match output {
            WorkflowOutput::Answered(outcome) => {
                self.take_answer_rollback(&outcome.node_id);
                self.tree_mut().set_status(&outcome.node_id, outcome.status);
                self.tree_mut().append_nodes(outcome.added_nodes.iter().cloned());
                self.set_progress(outcome.progress);
            }
            WorkflowOutput::FollowUpSpawned(node) | WorkflowOutput::TipCreated(node) => {
                self.tree_mut().append_nodes([node.clone()]);
            }
            WorkflowOutput::TipChosen(node) => {
                if !self.tree_mut().merge_node(node.clone()) {
                    self.tree_mut().append_nodes([node.clone()]);
                }
            }
            WorkflowOutput::Title(raw) => {
                let Some(node_id) = command.node_id() else {
                    return;
                };
                let Some(node) = self.tree().get(node_id) else {
                    return;
                };
                let generated = raw.trim();
                let title = if generated.is_empty() {
                    title::fallback_label(node.question(), self.config().title_chars)
                        .unwrap_or_else(|| title::GENERIC_LABEL.to_owned())
                } else {
                    generated.to_owned()
                };
                let node_id = node_id.clone();
                self.tree_mut().set_title(&node_id, title);
                self.mark_titled(node_id);
            }
            WorkflowOutput::Candidates(_) | WorkflowOutput::Merged(_) => {}
        }
    }

    fn after_success(&mut self, command: &Command, output: WorkflowOutput, out: &mut Vec<Command>) {
        match output {
            WorkflowOutput::Answered(outcome) => {
                let by_ai = matches!(command, Command::SubmitAnswer { by_ai: true, .. });
                if by_ai {
                    self.notify(Notice::success("AI suggestion applied as the answer."));
                    self.forget_candidates(&outcome.node_id);
                    if self.tree().contains(&outcome.node_id) {
                        out.extend(self.select_node(&outcome.node_id));
                    }
                    return;
                }
                self.notify(Notice::success("Answer saved."));
                if self.active_id() == Some(&outcome.node_id) {
                    self.answer_draft_mut().clear();
                    self.set_panel(PanelMode::Viewing);
                }
                if let Some(next) = outcome.next_node_id.filter(|next| self.tree().contains(next)) {
                    out.extend(self.select_node(&next));
                }
            }
            WorkflowOutput::FollowUpSpawned(node) => {
                self.notify(Notice::info("Follow-up question added."));
                if self.tree().contains(node.id()) {
                    out.extend(self.select_node(node.id()));
                    self.request_title(node.id(), out);
                }
            }
            WorkflowOutput::TipCreated(node) => {
                self.notify(Notice::info("Tip node added."));
                if self.tree().contains(node.id()) {
                    out.extend(self.select_node(node.id()));
                }
            }
            WorkflowOutput::TipChosen(node) => {
                self.notify(Notice::info("Tip applied."));
                self.forget_candidates(node.id());
                if self.tree().contains(node.id()) {
                    self.mark_titled(node.id().clone());
                    out.extend(self.select_node(node.id()));
                }
            }
            WorkflowOutput::Candidates(raw) => {
                let Some(node_id) = command.node_id() else {
                    return;
                };
                if !self.tree().contains(node_id) {
                    return;
                }
                let candidates = raw
                    .into_iter()
                    .map(|candidate| candidate.trim().to_owned())
                    .filter(|candidate| !candidate.is_empty())
                    .collect::<Vec<_>>();
                if candidates.is_empty() {
                    self.notify(Notice::info("No suggestions right now. Try again later."));
                }
                self.store_candidates(node_id.clone(), candidates);
            }
            WorkflowOutput::Title(_) => {}
            WorkflowOutput::Merged(document) => {
                self.notify(Notice::success("Merged document ready."));
                self.set_merged_document(document);
            }
        }
    }

    fn after_failure(&mut self, command: &Command, error: &ServiceError) {
        let workflow = command.workflow();
        match command {
            Command::SubmitAnswer { node_id, .. } => {
                if let Some(previous) = self.take_answer_rollback(node_id) {
                    self.tree_mut().set_status(node_id, previous);
                    let progress = self.tree().progress();
                    self.set_progress(progress);
                    self.refresh_connectors();
                }
                self.settle_panel(node_id);
            }
            Command::FetchTipCandidates { node_id } => self.settle_panel(node_id),
            _ => {}
        }

        if workflow == Workflow::FetchShortTitle {
            // The derived label stays; a later selection retries.
            tracing::warn!(node = ?command.node_id(), error = %error, "title generation failed");
            return;
        }
        self.notify(Notice::error(error.user_message(workflow)));
    }

    /// Drops a pending panel state for `node_id` back to plain viewing.
    fn settle_panel(&mut self, node_id: &NodeId) {
        if self.active_id() != Some(node_id) {
            return;
        }
        if matches!(self.panel_mode(), Some(PanelMode::Answering | PanelMode::TipsChoosing(_))) {
            self.set_panel(PanelMode::Viewing);
        }
    }
}
