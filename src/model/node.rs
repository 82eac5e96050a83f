// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::ids::NodeId;

/// Question text the project service stores on a tip node whose content has not been chosen yet.
pub const TIP_AWAITING_SELECTION: &str = "信息待选择";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeType {
    #[default]
    Question,
    Tip,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Tip => "tip",
        }
    }

    /// Lenient parse used for wire data; anything that is not `tip` is a question node.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("tip") => Self::Tip,
            _ => Self::Question,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeStatus {
    /// Unanswered.
    #[default]
    Red,
    /// Answered by the user.
    Green,
    /// Answered with an AI suggestion.
    Ai,
}

impl NodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Ai => "ai",
        }
    }

    pub fn is_answered(self) -> bool {
        matches!(self, Self::Green | Self::Ai)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeStatusError {
    raw: String,
}

impl fmt::Display for ParseNodeStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node status '{}' (expected red, green or ai)", self.raw)
    }
}

impl std::error::Error for ParseNodeStatusError {}

impl FromStr for NodeStatus {
    type Err = ParseNodeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "ai" => Ok(Self::Ai),
            other => Err(ParseNodeStatusError { raw: other.to_owned() }),
        }
    }
}

/// A question or tip in a project tree, mirrored from the project service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    parent_id: Option<NodeId>,
    level: u32,
    order_index: i64,
    node_type: NodeType,
    status: NodeStatus,
    question: String,
    title: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, parent_id: Option<NodeId>, level: u32, order_index: i64) -> Self {
        Self {
            id,
            parent_id,
            level,
            order_index,
            node_type: NodeType::Question,
            status: NodeStatus::Red,
            question: String::new(),
            title: None,
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    pub fn order_index(&self) -> i64 {
        self.order_index
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn set_status(&mut self, status: NodeStatus) {
        self.status = status;
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn is_tip(&self) -> bool {
        self.node_type == NodeType::Tip
    }

    /// Tips and AI-answered nodes share the informational (blue) rendering.
    pub fn renders_as_tip(&self) -> bool {
        self.is_tip() || self.status == NodeStatus::Ai
    }

    pub fn is_answered(&self) -> bool {
        self.status.is_answered()
    }

    /// A tip whose content is still one of several candidates.
    pub fn awaits_tip_selection(&self) -> bool {
        self.is_tip() && self.question == TIP_AWAITING_SELECTION
    }
}
