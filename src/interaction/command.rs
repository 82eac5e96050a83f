// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::NodeId;
use crate::sync::error::Workflow;

/// A remote round trip requested by the interaction layer.
///
/// Commands are scoped to the session's project; the sync controller supplies the project id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SubmitAnswer { node_id: NodeId, content: String, by_ai: bool },
    SpawnFollowUp { node_id: NodeId },
    /// Adds a tip below `node_id`. With `content`, the new tip is chosen immediately.
    CreateTip { node_id: NodeId, content: Option<String> },
    FetchTipCandidates { node_id: NodeId },
    ChooseTip { node_id: NodeId, content: String },
    FetchShortTitle { node_id: NodeId },
    MergeProject,
}

impl Command {
    pub fn workflow(&self) -> Workflow {
        match self {
            Self::SubmitAnswer { .. } => Workflow::SubmitAnswer,
            Self::SpawnFollowUp { .. } => Workflow::SpawnFollowUp,
            Self::CreateTip { .. } => Workflow::CreateTip,
            Self::FetchTipCandidates { .. } => Workflow::FetchTipCandidates,
            Self::ChooseTip { .. } => Workflow::ChooseTip,
            Self::FetchShortTitle { .. } => Workflow::FetchShortTitle,
            Self::MergeProject => Workflow::MergeProject,
        }
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::SubmitAnswer { node_id, .. }
            | Self::SpawnFollowUp { node_id }
            | Self::CreateTip { node_id, .. }
            | Self::FetchTipCandidates { node_id }
            | Self::ChooseTip { node_id, .. }
            | Self::FetchShortTitle { node_id } => Some(node_id),
            Self::MergeProject => None,
        }
    }

    /// Whether success is followed by a full project refetch.
    pub fn reconciles(&self) -> bool {
        matches!(
            self,
            Self::SubmitAnswer { .. }
                | Self::SpawnFollowUp { .. }
                | Self::CreateTip { .. }
                | Self::ChooseTip { .. }
        )
    }
}
