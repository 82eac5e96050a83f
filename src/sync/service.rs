// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;

use super::error::ServiceError;
use super::types::{
    AnswerResponse, DraftMessageResponse, WireNode, WireProgress, WireProject,
};
use crate::model::{
    DraftId, Id, Node, NodeId, NodeStatus, NodeType, ProjectId, ProjectProgress,
};

/// How thoroughly the drafting dialogue should probe before a project is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftMode {
    Brief,
    #[default]
    Detail,
    Deep,
}

impl DraftMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Detail => "detail",
            Self::Deep => "deep",
        }
    }
}

impl FromStr for DraftMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brief" => Ok(Self::Brief),
            "detail" => Ok(Self::Detail),
            "deep" => Ok(Self::Deep),
            other => Err(format!("unknown draft mode '{other}' (expected brief, detail or deep)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub id: ProjectId,
    pub name: String,
    pub idea_text: String,
    pub nodes: Vec<Node>,
    pub progress: ProjectProgress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftReply {
    pub need_more: bool,
    pub reply: String,
    pub title: Option<String>,
    pub initial_questions: Vec<String>,
}

/// Result of recording an answer.
///
/// `added_nodes` are the anchor children the service attached below the answered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub node_id: NodeId,
    pub status: NodeStatus,
    pub answers: Vec<String>,
    pub progress: ProjectProgress,
    pub next_node_id: Option<NodeId>,
    pub added_nodes: Vec<Node>,
}

/// The remote project store the engine mirrors.
///
/// Implementations run on a single-threaded runtime; returned futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait ProjectService {
    async fn create_draft(&self, mode: DraftMode) -> Result<DraftId, ServiceError>;

    async fn post_draft_message(
        &self,
        draft_id: &DraftId,
        content: &str,
    ) -> Result<DraftReply, ServiceError>;

    async fn materialize_project(&self, draft_id: &DraftId)
        -> Result<ProjectSnapshot, ServiceError>;

    async fn get_project(&self, project_id: &ProjectId) -> Result<ProjectSnapshot, ServiceError>;

    async fn submit_answer(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
        content: &str,
        by_ai: bool,
    ) -> Result<AnswerOutcome, ServiceError>;

    async fn spawn_follow_up(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Node, ServiceError>;

    async fn create_tip(&self, project_id: &ProjectId, node_id: &NodeId)
        -> Result<Node, ServiceError>;

    async fn fetch_tip_candidates(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Vec<String>, ServiceError>;

    async fn choose_tip(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
        content: &str,
    ) -> Result<Node, ServiceError>;

    async fn fetch_short_title(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<String, ServiceError>;

    async fn merge_project(&self, project_id: &ProjectId) -> Result<String, ServiceError>;

    /// Extracts plain text from an uploaded project document (`.txt`, `.pdf`, `.docx`).
    async fn parse_document(&self, filename: &str, bytes: &[u8]) -> Result<String, ServiceError>;
}

pub(crate) fn parse_id<T>(raw: &str, field: &str) -> Result<Id<T>, ServiceError> {
    Id::new(raw).map_err(|err| ServiceError::Decode {
        detail: format!("invalid {field} '{raw}': {err}"),
    })
}

/// Maps a wire status onto the three rendering states.
///
/// The service tags chosen tips with `tip`; those render like AI content. Anything else
/// unknown is treated as unanswered.
pub(crate) fn status_from_wire(raw: &str, node_type: NodeType) -> NodeStatus {
    match NodeStatus::from_str(raw) {
        Ok(status) => status,
        Err(_) if raw == "tip" || node_type == NodeType::Tip => NodeStatus::Ai,
        Err(err) => {
            tracing::warn!(status = raw, error = %err, "unknown node status; rendering as unanswered");
            NodeStatus::Red
        }
    }
}

pub(crate) fn node_from_wire(wire: WireNode) -> Result<Node, ServiceError> {
    let id = parse_id(&wire.id, "node id")?;
    let parent_id = wire.parent_id.as_deref().map(|raw| parse_id(raw, "parent id")).transpose()?;
    let node_type = NodeType::from_wire(wire.node_type.as_deref());
    let status = status_from_wire(&wire.status, node_type);

    let mut node = Node::new(id, parent_id, wire.level, wire.order_index)
        .with_question(wire.question)
        .with_status(status)
        .with_node_type(node_type);
    if !wire.title.trim().is_empty() {
        node = node.with_title(wire.title);
    }
    Ok(node)
}

pub(crate) fn progress_from_wire(wire: WireProgress) -> ProjectProgress {
    ProjectProgress { total: wire.total, green: wire.green, percent: wire.percent }
}

pub(crate) fn snapshot_from_wire(wire: WireProject) -> Result<ProjectSnapshot, ServiceError> {
    let nodes = wire.nodes.into_iter().map(node_from_wire).collect::<Result<Vec<_>, _>>()?;
    let progress = match wire.progress {
        Some(progress) => progress_from_wire(progress),
        None => ProjectProgress::from_nodes(&nodes),
    };
    Ok(ProjectSnapshot {
        id: parse_id(&wire.id, "project id")?,
        name: wire.name,
        idea_text: wire.idea_text,
        nodes,
        progress,
    })
}

pub(crate) fn answer_from_wire(wire: AnswerResponse) -> Result<AnswerOutcome, ServiceError> {
    let added_nodes = wire
        .added_nodes
        .unwrap_or_default()
        .into_iter()
        .map(node_from_wire)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AnswerOutcome {
        node_id: parse_id(&wire.updated_node.id, "node id")?,
        status: status_from_wire(&wire.updated_node.status, NodeType::Question),
        answers: wire.updated_node.answers,
        progress: progress_from_wire(wire.project_progress),
        next_node_id: wire.next_node_id.as_deref().map(|raw| parse_id(raw, "next node id")).transpose()?,
        added_nodes,
    })
}

pub(crate) fn draft_reply_from_wire(wire: DraftMessageResponse) -> DraftReply {
    DraftReply {
        need_more: wire.need_more,
        reply: wire.reply,
        title: wire.title.filter(|title| !title.trim().is_empty()),
        initial_questions: wire.initial_questions.unwrap_or_default(),
    }
}
