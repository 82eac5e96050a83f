// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::rc::Rc;

use tokio::sync::mpsc;

use super::error::ServiceError;
use super::service::{AnswerOutcome, ProjectService, ProjectSnapshot};
use crate::interaction::Command;
use crate::model::{Node, ProjectId};

/// What a successful workflow produced, before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutput {
    Answered(AnswerOutcome),
    FollowUpSpawned(Node),
    TipCreated(Node),
    TipChosen(Node),
    Candidates(Vec<String>),
    Title(String),
    Merged(String),
}

/// A finished workflow, applied to the app state in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub command: Command,
    pub result: Result<WorkflowOutput, ServiceError>,
    /// The follow-up full fetch, for workflows that change the tree. `None` when the
    /// workflow does not reconcile or the service rejected it before changing anything.
    pub refreshed: Option<Result<ProjectSnapshot, ServiceError>>,
}

/// Runs `command` against `service` to completion. Never fails; errors travel in the result.
pub async fn run_workflow<S: ProjectService>(
    service: &S,
    project_id: &ProjectId,
    command: Command,
) -> Completion {
    let workflow = command.workflow();
    tracing::debug!(workflow = workflow.as_str(), node = ?command.node_id(), "workflow started");

    let (result, mutated) = match &command {
        Command::SubmitAnswer { node_id, content, by_ai } => {
            let result = service.submit_answer(project_id, node_id, content, *by_ai).await;
            let mutated = result.is_ok();
            (result.map(WorkflowOutput::Answered), mutated)
        }
        Command::SpawnFollowUp { node_id } => {
            let result = service.spawn_follow_up(project_id, node_id).await;
            let mutated = result.is_ok();
            (result.map(WorkflowOutput::FollowUpSpawned), mutated)
        }
        Command::CreateTip { node_id, content: None } => {
            let result = service.create_tip(project_id, node_id).await;
            let mutated = result.is_ok();
            (result.map(WorkflowOutput::TipCreated), mutated)
        }
        Command::CreateTip { node_id, content: Some(content) } => {
            match service.create_tip(project_id, node_id).await {
                // The tip exists even if choosing fails, so the tree is refetched either way.
                Ok(tip) => {
                    let chosen = service.choose_tip(project_id, tip.id(), content).await;
                    (chosen.map(WorkflowOutput::TipChosen), true)
                }
                Err(err) => (Err(err), false),
            }
        }
        Command::FetchTipCandidates { node_id } => {
            let result = service.fetch_tip_candidates(project_id, node_id).await;
            (result.map(WorkflowOutput::Candidates), false)
        }
        Command::ChooseTip { node_id, content } => {
            let result = service.choose_tip(project_id, node_id, content).await;
            let mutated = result.is_ok();
            (result.map(WorkflowOutput::TipChosen), mutated)
        }
        Command::FetchShortTitle { node_id } => {
            let result = service.fetch_short_title(project_id, node_id).await;
            (result.map(WorkflowOutput::Title), false)
        }
        Command::MergeProject => {
            let result = service.merge_project(project_id).await;
            (result.map(WorkflowOutput::Merged), false)
        }
    };

    let refreshed = if mutated && command.reconciles() {
        let snapshot = service.get_project(project_id).await;
        if let Err(err) = &snapshot {
            tracing::warn!(workflow = workflow.as_str(), error = %err, "reconciliation fetch failed; keeping local patch");
        }
        Some(snapshot)
    } else {
        None
    };

    match &result {
        Ok(_) => tracing::info!(workflow = workflow.as_str(), node = ?command.node_id(), "workflow finished"),
        Err(err) => tracing::info!(workflow = workflow.as_str(), node = ?command.node_id(), error = %err, "workflow failed"),
    }

    Completion { command, result, refreshed }
}

/// Dispatches workflows as local tasks and hands their completions back over a channel.
///
/// [`SyncController::dispatch`] must be called from within a [`tokio::task::LocalSet`].
pub struct SyncController<S> {
    service: Rc<S>,
    project_id: ProjectId,
    completions: mpsc::UnboundedSender<Completion>,
}

impl<S: ProjectService + 'static> SyncController<S> {
    pub fn new(service: Rc<S>, project_id: ProjectId) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        (Self { service, project_id, completions }, receiver)
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn service(&self) -> &Rc<S> {
        &self.service
    }

    pub fn dispatch(&self, command: Command) {
        let service = Rc::clone(&self.service);
        let project_id = self.project_id.clone();
        let completions = self.completions.clone();
        tokio::task::spawn_local(async move {
            let completion = run_workflow(service.as_ref(), &project_id, command).await;
            if completions.send(completion).is_err() {
                tracing::debug!("completion dropped; event loop has shut down");
            }
        });
    }

    pub fn dispatch_all(&self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }
}
