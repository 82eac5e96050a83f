// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A project is a tree of question/tip nodes owned by the project service; the engine keeps a
//! cached copy in [`Tree`].

#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod tree;

pub use ids::{DraftId, Id, IdError, NodeId, ProjectId};
pub use node::{Node, NodeStatus, NodeType, ParseNodeStatusError, TIP_AWAITING_SELECTION};
pub use tree::{ProjectProgress, Tree};
