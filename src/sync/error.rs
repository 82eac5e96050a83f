// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// Error code the service returns when a node has no recorded answer yet.
pub const NO_ANSWER: &str = "no_answer";
pub const PROJECT_NOT_COMPLETED: &str = "project_not_completed";

const NOTICE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached at all.
    Connectivity { detail: String },
    /// The request was understood but a precondition failed (HTTP 400 + code).
    Precondition { code: String },
    /// Project or node unknown to the service (HTTP 404 + code).
    NotFound { code: String },
    Unexpected { status: Option<u16>, detail: String },
    /// The response body did not match the expected shape.
    Decode { detail: String },
}

impl ServiceError {
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            400 => Self::Precondition { code: detail },
            404 => Self::NotFound { code: detail },
            _ => Self::Unexpected { status: Some(status), detail },
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Precondition { code } | Self::NotFound { code } => Some(code),
            _ => None,
        }
    }

    pub fn is_no_answer(&self) -> bool {
        self.code() == Some(NO_ANSWER)
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// Short notification text for a failed `workflow`.
    pub fn user_message(&self, workflow: Workflow) -> String {
        if self.is_connectivity() {
            return "Cannot reach the project service. Start the backend (uvicorn backend.main:app --reload) and retry."
                .to_owned();
        }

        match (workflow, self.code()) {
            (Workflow::SpawnFollowUp, Some(NO_ANSWER)) => {
                return "Answer this node first, then spawn a follow-up.".to_owned();
            }
            (Workflow::CreateTip, Some(NO_ANSWER)) => {
                return "Answer this node first, then request tips.".to_owned();
            }
            (Workflow::MergeProject, Some(PROJECT_NOT_COMPLETED)) => {
                return "Not every question is answered yet; merging is unavailable.".to_owned();
            }
            _ => {}
        }

        match workflow {
            Workflow::SubmitAnswer => "Submitting the answer failed. Is the backend running?".to_owned(),
            Workflow::FetchTipCandidates => "Fetching tip suggestions failed.".to_owned(),
            Workflow::ChooseTip => "Applying the selected tip failed.".to_owned(),
            Workflow::FetchShortTitle => "Naming the node failed.".to_owned(),
            _ => truncate_for_notice(&self.to_string()),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connectivity { detail } => write!(f, "project service unreachable: {detail}"),
            Self::Precondition { code } => write!(f, "API 400: {code}"),
            Self::NotFound { code } => write!(f, "API 404: {code}"),
            Self::Unexpected { status: Some(status), detail } => write!(f, "API {status}: {detail}"),
            Self::Unexpected { status: None, detail } => write!(f, "unexpected service error: {detail}"),
            Self::Decode { detail } => write!(f, "malformed service response: {detail}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// The remote round trips the engine performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    SubmitAnswer,
    SpawnFollowUp,
    CreateTip,
    FetchTipCandidates,
    ChooseTip,
    FetchShortTitle,
    MergeProject,
}

impl Workflow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubmitAnswer => "submit_answer",
            Self::SpawnFollowUp => "spawn_follow_up",
            Self::CreateTip => "create_tip",
            Self::FetchTipCandidates => "fetch_tip_candidates",
            Self::ChooseTip => "choose_tip",
            Self::FetchShortTitle => "fetch_short_title",
            Self::MergeProject => "merge_project",
        }
    }
}

pub(crate) fn truncate_for_notice(message: &str) -> String {
    if message.chars().count() <= NOTICE_MAX_CHARS {
        return message.to_owned();
    }
    let mut out = message.chars().take(NOTICE_MAX_CHARS - 3).collect::<String>();
    out.push_str("...");
    out
}
