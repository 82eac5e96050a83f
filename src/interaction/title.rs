// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Node labels.
//!
//! Precedence: an in-flight title fetch shows [`NAMING_PLACEHOLDER`]; a real title is used
//! verbatim; otherwise the label is derived from the question text.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::Node;

pub const NAMING_PLACEHOLDER: &str = "Naming…";
pub const GENERIC_LABEL: &str = "Node";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(疑问|追问|Question|Follow-up)\s*\d+$").expect("placeholder title pattern")
    })
}

fn trailing_punctuation() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[？?。！!，,、\s]+$").expect("trailing punctuation pattern"))
}

/// Auto-numbered labels like `Question 3` that carry no meaning of their own.
pub fn is_placeholder_title(title: &str) -> bool {
    placeholder_pattern().is_match(title.trim())
}

/// A title worth showing, if the node has one.
pub fn meaningful_title(node: &Node) -> Option<&str> {
    let title = node.title()?.trim();
    (!title.is_empty() && !is_placeholder_title(title)).then_some(title)
}

/// First `max_chars` characters of `question` without trailing punctuation.
pub fn fallback_label(question: &str, max_chars: usize) -> Option<String> {
    let question = question.trim();
    let stripped = trailing_punctuation().replace(question, "");
    let label = stripped.chars().take(max_chars).collect::<String>();
    (!label.is_empty()).then_some(label)
}

pub fn display_label(node: &Node, fetching: bool, max_chars: usize) -> String {
    if fetching {
        return NAMING_PLACEHOLDER.to_owned();
    }
    if let Some(title) = meaningful_title(node) {
        return title.to_owned();
    }
    fallback_label(node.question(), max_chars)
        .or_else(|| node.title().map(str::trim).filter(|title| !title.is_empty()).map(str::to_owned))
        .unwrap_or_else(|| GENERIC_LABEL.to_owned())
}

/// Whether selecting `node` should request a generated title. Tips get theirs when chosen.
pub fn wants_generated_title(node: &Node) -> bool {
    !node.is_root() && !node.is_tip()
}
