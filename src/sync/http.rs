// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ServiceError;
use super::service::{
    answer_from_wire, draft_reply_from_wire, node_from_wire, parse_id, snapshot_from_wire,
    AnswerOutcome, DraftMode, DraftReply, ProjectService, ProjectSnapshot,
};
use super::types::{
    AnswerRequest, AnswerResponse, CandidatesResponse, ContentRequest, DraftCreateRequest,
    DraftCreateResponse, DraftMessageResponse, ErrorBody, FromDraftRequest, MergeResponse,
    ParseDocumentRequest, ParseDocumentResponse, TitleResponse, WireNode, WireProject,
};
use crate::model::{DraftId, Node, NodeId, ProjectId};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// Title and candidate generation call a language model upstream, so requests may be slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// [`ProjectService`] over the project service's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpProjectService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProjectService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mindweave/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ServiceError::Unexpected {
                status: None,
                detail: format!("failed to build HTTP client: {err}"),
            })?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn node_path(project_id: &ProjectId, node_id: &NodeId, action: &str) -> String {
        format!("/api/projects/{project_id}/nodes/{node_id}/{action}")
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let request = self.client.get(self.url(path));
        self.execute(path, request).await
    }

    async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(path, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        tracing::debug!(path, "project service request");
        let response = request.send().await.map_err(|err| {
            tracing::warn!(path, error = %err, "project service unreachable");
            ServiceError::Connectivity { detail: err.to_string() }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| ServiceError::Connectivity {
            detail: format!("failed to read response body: {err}"),
        })?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .map(|parsed| parsed.detail_text())
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            tracing::info!(path, status = status.as_u16(), detail = %detail, "project service rejected request");
            return Err(ServiceError::from_status(status.as_u16(), detail));
        }

        serde_json::from_slice(&body).map_err(|err| ServiceError::Decode {
            detail: format!("{path}: {err}"),
        })
    }
}

impl ProjectService for HttpProjectService {
    async fn create_draft(&self, mode: DraftMode) -> Result<DraftId, ServiceError> {
        let body = DraftCreateRequest { mode: mode.as_str().to_owned() };
        let response: DraftCreateResponse = self.post_json("/api/draft", Some(&body)).await?;
        parse_id(&response.draft_id, "draft id")
    }

    async fn post_draft_message(
        &self,
        draft_id: &DraftId,
        content: &str,
    ) -> Result<DraftReply, ServiceError> {
        let body = ContentRequest { content: content.to_owned() };
        let path = format!("/api/draft/{draft_id}/message");
        let response: DraftMessageResponse = self.post_json(&path, Some(&body)).await?;
        Ok(draft_reply_from_wire(response))
    }

    async fn materialize_project(
        &self,
        draft_id: &DraftId,
    ) -> Result<ProjectSnapshot, ServiceError> {
        let body = FromDraftRequest { draft_id: draft_id.to_string() };
        let response: WireProject =
            self.post_json("/api/projects/from-draft", Some(&body)).await?;
        snapshot_from_wire(response)
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<ProjectSnapshot, ServiceError> {
        let response: WireProject = self.get_json(&format!("/api/projects/{project_id}")).await?;
        snapshot_from_wire(response)
    }

    async fn submit_answer(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
        content: &str,
        by_ai: bool,
    ) -> Result<AnswerOutcome, ServiceError> {
        let body = AnswerRequest { content: content.to_owned(), by_ai };
        let path = Self::node_path(project_id, node_id, "answer");
        let response: AnswerResponse = self.post_json(&path, Some(&body)).await?;
        answer_from_wire(response)
    }

    async fn spawn_follow_up(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Node, ServiceError> {
        let path = Self::node_path(project_id, node_id, "spawn");
        let response: WireNode = self.post_json::<(), _>(&path, None).await?;
        node_from_wire(response)
    }

    async fn create_tip(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Node, ServiceError> {
        let path = Self::node_path(project_id, node_id, "tips");
        let response: WireNode = self.post_json::<(), _>(&path, None).await?;
        node_from_wire(response)
    }

    async fn fetch_tip_candidates(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Vec<String>, ServiceError> {
        let path = Self::node_path(project_id, node_id, "tips/candidates");
        let response: CandidatesResponse = self.post_json::<(), _>(&path, None).await?;
        Ok(response.into_candidates())
    }

    async fn choose_tip(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
        content: &str,
    ) -> Result<Node, ServiceError> {
        let body = ContentRequest { content: content.to_owned() };
        let path = Self::node_path(project_id, node_id, "tips/choose");
        let response: WireNode = self.post_json(&path, Some(&body)).await?;
        node_from_wire(response)
    }

    async fn fetch_short_title(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<String, ServiceError> {
        let path = Self::node_path(project_id, node_id, "title");
        let response: TitleResponse = self.post_json::<(), _>(&path, None).await?;
        Ok(response.title)
    }

    async fn merge_project(&self, project_id: &ProjectId) -> Result<String, ServiceError> {
        let path = format!("/api/projects/{project_id}/merge");
        let response: MergeResponse = self.post_json::<(), _>(&path, None).await?;
        Ok(response.content)
    }

    async fn parse_document(&self, filename: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let body = ParseDocumentRequest {
            filename: filename.to_owned(),
            content_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        };
        let response: ParseDocumentResponse =
            self.post_json("/api/parse-document", Some(&body)).await?;
        Ok(response.text)
    }
}
