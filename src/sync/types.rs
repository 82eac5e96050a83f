// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON shapes exchanged with the project service.
//!
//! Field names follow the service verbatim, which mixes `snake_case` node records with
//! `camelCase` project and answer envelopes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WireNode {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub parent_id: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub question: String,
    pub status: String,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub node_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WireProgress {
    pub total: u32,
    pub green: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WireProject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub idea_text: String,
    #[serde(default)]
    pub status: String,
    pub nodes: Vec<WireNode>,
    pub progress: Option<WireProgress>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnswerRequest {
    pub content: String,
    pub by_ai: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WireNodeWithAnswers {
    pub id: String,
    pub level: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub question: String,
    pub status: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub updated_node: WireNodeWithAnswers,
    pub project_progress: WireProgress,
    #[serde(default)]
    pub next_node_id: Option<String>,
    #[serde(default)]
    pub added_nodes: Option<Vec<WireNode>>,
}

/// Candidate lists arrive either wrapped or as a bare array.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CandidatesResponse {
    Wrapped { candidates: Vec<String> },
    Bare(Vec<String>),
}

impl CandidatesResponse {
    pub fn into_candidates(self) -> Vec<String> {
        match self {
            Self::Wrapped { candidates } | Self::Bare(candidates) => candidates,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TitleResponse {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MergeResponse {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftCreateRequest {
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftCreateResponse {
    pub draft_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftMessageResponse {
    pub need_more: bool,
    #[serde(default)]
    pub reply: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub initial_questions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FromDraftRequest {
    pub draft_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParseDocumentRequest {
    pub filename: String,
    pub content_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParseDocumentResponse {
    pub text: String,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn detail_text(&self) -> String {
        match &self.detail {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// JSON Schemas of the service payloads the client consumes, keyed by type name.
pub fn contract_schema() -> serde_json::Value {
    serde_json::json!({
        "WireProject": schemars::schema_for!(WireProject),
        "WireNode": schemars::schema_for!(WireNode),
        "AnswerResponse": schemars::schema_for!(AnswerResponse),
        "DraftMessageResponse": schemars::schema_for!(DraftMessageResponse),
        "CandidatesResponse": schemars::schema_for!(CandidatesResponse),
    })
}
