// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Header, footer, detail panel and overlay text used by TUI rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
};

use super::theme::TuiTheme;
use crate::interaction::{AppState, CandidatePurpose, Notice, PanelMode};

const PROGRESS_BAR_CELLS: usize = 20;
pub(crate) const PANEL_WIDTH: u16 = 44;

pub(crate) fn header_line(state: &AppState, theme: &TuiTheme) -> Line<'static> {
    let progress = state.progress();
    let filled = (progress.percent.min(100) as usize * PROGRESS_BAR_CELLS) / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(PROGRESS_BAR_CELLS - filled));
    let name = if state.project_name().trim().is_empty() { "Untitled project" } else { state.project_name() };

    Line::from(vec![
        Span::raw(format!(" {name}  ")),
        Span::styled(bar, theme.progress_style(progress.is_complete())),
        Span::raw(format!(" {}/{} answered ({}%)", progress.green, progress.total, progress.percent)),
    ])
}

pub(crate) fn footer_line(toast: Option<&Notice>, state: &AppState, theme: &TuiTheme) -> Line<'static> {
    if let Some(notice) = toast {
        return Line::from(Span::styled(format!(" {}", notice.text), theme.notice_style(notice.tone)));
    }

    let mut hints = vec![("a", "answer"), ("s", "follow-up"), ("t", "tips"), ("Tab", "next open")];
    if state.has_pending_work() {
        hints.push(("…", "syncing"));
    }
    hints.extend([("m", "merge"), ("Esc", "back"), ("q", "quit")]);

    let mut spans = vec![Span::raw(" ")];
    for (idx, (key, label)) in hints.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" · ", theme.muted_style()));
        }
        spans.push(Span::styled(key, theme.key_style()));
        spans.push(Span::raw(format!(" {label}")));
    }
    Line::from(spans)
}

/// Panel title for the active node.
pub(crate) fn panel_title(state: &AppState) -> String {
    state.active_node().map(|node| state.label_for(node)).unwrap_or_default()
}

pub(crate) fn panel_lines(state: &AppState, theme: &TuiTheme) -> Vec<Line<'static>> {
    let (Some(node), Some(mode)) = (state.active_node(), state.panel_mode()) else {
        return Vec::new();
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", theme.muted_style()),
            Span::raw(node.status().as_str().to_owned()),
            Span::styled(format!("  ({})", node.node_type().as_str()), theme.muted_style()),
        ]),
        Line::default(),
        Line::from(node.question().to_owned()),
        Line::default(),
    ];

    match mode {
        PanelMode::Viewing => {
            let hint = if node.awaits_tip_selection() {
                "Suggestions are on their way."
            } else {
                "a answer · s follow-up · t tips"
            };
            lines.push(Line::from(Span::styled(hint, theme.muted_style())));
        }
        PanelMode::Answering => {
            lines.push(Line::from(Span::styled(
                "Your answer (Enter submits, Esc cancels):",
                theme.muted_style(),
            )));
            lines.push(Line::from(format!("{}▏", state.answer_draft())));
        }
        PanelMode::TipsChoosing(purpose) => {
            let hint = match purpose {
                CandidatePurpose::ChooseTip => "1-9 choose a suggestion",
                CandidatePurpose::AnswerQuestion => "1-9 use as answer · Alt+1-9 add as tip",
            };
            lines.push(Line::from(Span::styled(hint, theme.muted_style())));
            match state.candidates(node.id()) {
                _ if state.is_loading_candidates(node.id()) => {
                    lines.push(Line::from("Fetching suggestions…"));
                }
                Some(candidates) if !candidates.is_empty() => {
                    for (idx, candidate) in candidates.iter().enumerate().take(9) {
                        lines.push(Line::from(vec![
                            Span::styled(format!("{}. ", idx + 1), theme.key_style()),
                            Span::raw(candidate.clone()),
                        ]));
                    }
                }
                _ => lines.push(Line::from("No suggestions.")),
            }
        }
    }
    lines
}

/// Splits the body into the map and, when the panel is showing, the panel column.
pub(crate) fn split_body(body: Rect, panel_visible: bool) -> (Rect, Option<Rect>) {
    if !panel_visible || body.width <= PANEL_WIDTH * 2 {
        return (body, None);
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(PANEL_WIDTH)])
        .split(body);
    (columns[0], Some(columns[1]))
}

pub(crate) fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y.min(100)) / 100) as u16;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
