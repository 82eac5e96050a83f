// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drafting dialogue.
//!
//! Before a map exists the idea is refined in a short line-oriented conversation with the
//! project service. Once the service stops asking for more, the draft is materialized into a
//! project whose tree is handed to the map view.

use std::fmt;
use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::model::DraftId;
use crate::sync::error::ServiceError;
use crate::sync::service::{DraftMode, DraftReply, ProjectService, ProjectSnapshot};

/// Largest document accepted for import.
pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

const SUPPORTED_DOCUMENTS: [&str; 3] = ["txt", "pdf", "docx"];
const QUIT_COMMAND: &str = "/quit";

#[derive(Debug)]
pub enum DraftError {
    Service(ServiceError),
    Io(std::io::Error),
    UnsupportedDocument { path: String },
    DocumentTooLarge { bytes: u64 },
    EmptyDocument,
    /// Input ended or the user quit before the draft was ready.
    Aborted,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::UnsupportedDocument { path } => {
                write!(f, "unsupported document (expected .txt, .pdf or .docx): {path}")
            }
            Self::DocumentTooLarge { bytes } => {
                write!(f, "document too large: {bytes} bytes (max {MAX_DOCUMENT_BYTES})")
            }
            Self::EmptyDocument => write!(f, "document contains no text"),
            Self::Aborted => write!(f, "drafting aborted before the project was ready"),
        }
    }
}

impl std::error::Error for DraftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for DraftError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<std::io::Error> for DraftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Reads `path`, checks type and size locally, and returns the text the service extracted.
pub async fn load_document<S: ProjectService>(service: &S, path: &Path) -> Result<String, DraftError> {
    let shown = path.display().to_string();
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| SUPPORTED_DOCUMENTS.contains(&ext.as_str()));
    if !supported {
        return Err(DraftError::UnsupportedDocument { path: shown });
    }

    let bytes = std::fs::metadata(path)?.len();
    if bytes > MAX_DOCUMENT_BYTES {
        return Err(DraftError::DocumentTooLarge { bytes });
    }
    let content = std::fs::read(path)?;
    let filename = path.file_name().and_then(|name| name.to_str()).unwrap_or(&shown);

    let text = service.parse_document(filename, &content).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(DraftError::EmptyDocument);
    }
    tracing::info!(document = %shown, chars = text.chars().count(), "document imported");
    Ok(text.to_owned())
}

/// Runs the drafting dialogue and materializes the resulting project.
///
/// `seed` is sent as the first message when present; otherwise the first non-empty input
/// line is. Every later reply the service asks for is read from `input`. A line reading
/// `/quit`, or the end of input, aborts.
pub async fn run_drafting<S, R, W>(
    service: &S,
    mode: DraftMode,
    seed: Option<String>,
    input: &mut R,
    output: &mut W,
) -> Result<ProjectSnapshot, DraftError>
where
    S: ProjectService,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let draft_id = service.create_draft(mode).await?;
    tracing::info!(draft = %draft_id, mode = mode.as_str(), "draft started");

    let mut message = match seed.map(|seed| seed.trim().to_owned()).filter(|seed| !seed.is_empty()) {
        Some(seed) => seed,
        None => {
            say(output, "Describe your idea:").await?;
            next_message(input, output).await?
        }
    };

    let reply = loop {
        let reply = service.post_draft_message(&draft_id, &message).await?;
        say(output, &format!("> {}", reply.reply.trim())).await?;
        if !reply.need_more {
            break reply;
        }
        message = next_message(input, output).await?;
    };

    announce(output, &reply).await?;
    materialize(service, &draft_id).await
}

async fn materialize<S: ProjectService>(service: &S, draft_id: &DraftId) -> Result<ProjectSnapshot, DraftError> {
    let snapshot = service.materialize_project(draft_id).await?;
    tracing::info!(draft = %draft_id, project = %snapshot.id, nodes = snapshot.nodes.len(), "draft materialized");
    Ok(snapshot)
}

async fn announce<W: AsyncWrite + Unpin>(output: &mut W, reply: &DraftReply) -> Result<(), DraftError> {
    if let Some(title) = reply.title.as_deref().map(str::trim).filter(|title| !title.is_empty()) {
        say(output, &format!("Project: {title}")).await?;
    }
    for (idx, question) in reply.initial_questions.iter().enumerate() {
        say(output, &format!("  {}. {}", idx + 1, question.trim())).await?;
    }
    Ok(())
}

async fn next_message<R, W>(input: &mut R, output: &mut W) -> Result<String, DraftError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        output.write_all(b"you> ").await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            return Err(DraftError::Aborted);
        }
        let message = line.trim();
        if message == QUIT_COMMAND {
            return Err(DraftError::Aborted);
        }
        if !message.is_empty() {
            return Ok(message.to_owned());
        }
    }
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), DraftError> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{load_document, run_drafting, DraftError};
    use crate::sync::error::ServiceError;
    use crate::sync::memory::{InMemoryProjectService, Operation};
    use crate::sync::service::DraftMode;

    fn temp_file(name: &str, content: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mindweave-draft-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write temp file");
        path
    }

    #[tokio::test]
    async fn seeded_brief_draft_needs_no_input() {
        let service = InMemoryProjectService::new();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        let snapshot = run_drafting(
            &service,
            DraftMode::Brief,
            Some("A seed library for the street".to_owned()),
            &mut input,
            &mut output,
        )
        .await
        .expect("draft materializes");

        assert_eq!(snapshot.nodes.len(), 4);
        let transcript = String::from_utf8(output).expect("utf8");
        assert!(transcript.contains("Project: A seed library for the"));
        assert!(transcript.contains("  1. Who is the primary user?"));
        assert_eq!(service.call_count(Operation::MaterializeProject), 1);
    }

    #[tokio::test]
    async fn detail_draft_reads_follow_up_lines() {
        let service = InMemoryProjectService::new();
        let mut input: &[u8] = b"A repair cafe\n\n   \nRetired engineers, weekly\n";
        let mut output = Vec::new();

        let snapshot = run_drafting(&service, DraftMode::Detail, None, &mut input, &mut output)
            .await
            .expect("draft materializes");

        assert_eq!(service.call_count(Operation::PostDraftMessage), 2);
        let root = snapshot.nodes.iter().find(|node| node.is_root()).expect("root");
        assert!(root.question().contains("Retired engineers"));
    }

    #[tokio::test]
    async fn end_of_input_aborts() {
        let service = InMemoryProjectService::new();
        let mut input: &[u8] = b"Only one line\n";
        let mut output = Vec::new();

        let err = run_drafting(&service, DraftMode::Deep, None, &mut input, &mut output)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Aborted));
        assert_eq!(service.call_count(Operation::MaterializeProject), 0);
    }

    #[tokio::test]
    async fn quit_command_aborts() {
        let service = InMemoryProjectService::new();
        let mut input: &[u8] = b"/quit\n";
        let mut output = Vec::new();

        let err = run_drafting(&service, DraftMode::Brief, None, &mut input, &mut output)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Aborted));
    }

    #[tokio::test]
    async fn service_failure_surfaces() {
        let service = InMemoryProjectService::new();
        service.fail_next(Operation::CreateDraft, ServiceError::Connectivity { detail: "down".to_owned() });
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        let err = run_drafting(&service, DraftMode::Brief, Some("x".to_owned()), &mut input, &mut output)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Service(ServiceError::Connectivity { .. })));
    }

    #[tokio::test]
    async fn text_document_is_imported() {
        let service = InMemoryProjectService::new();
        let path = temp_file("idea.txt", b"  Community fridge with sensors  \n");

        let text = load_document(&service, &path).await.expect("document text");
        assert_eq!(text, "Community fridge with sensors");
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected_locally() {
        let service = InMemoryProjectService::new();
        let path = temp_file("idea.md", b"# idea");

        let err = load_document(&service, &path).await.unwrap_err();
        assert!(matches!(err, DraftError::UnsupportedDocument { .. }));
        assert_eq!(service.call_count(Operation::ParseDocument), 0);
    }

    #[tokio::test]
    async fn empty_document_is_rejected() {
        let service = InMemoryProjectService::new();
        let path = temp_file("blank.txt", b"   \n");

        let err = load_document(&service, &path).await.unwrap_err();
        assert!(matches!(err, DraftError::Service(ServiceError::Precondition { .. })));
    }
}
