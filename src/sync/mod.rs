// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub mod controller;
pub mod error;
pub mod http;
pub mod memory;
pub mod service;
pub mod types;

pub use controller::{run_workflow, Completion, SyncController, WorkflowOutput};
pub use error::{ServiceError, Workflow};
pub use http::{HttpProjectService, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use memory::{InMemoryProjectService, Operation};
pub use service::{AnswerOutcome, DraftMode, DraftReply, ProjectService, ProjectSnapshot};
