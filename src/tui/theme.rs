// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::interaction::NoticeTone;
use crate::layout::ConnectorColor;
use crate::model::{Node, NodeStatus};

const PALETTE_ENV: &str = "MINDWEAVE_TUI_PALETTE";

/// Colors for the map. Defaults follow the connector hex values; `MINDWEAVE_TUI_PALETTE`
/// (`answered,unanswered,accent,selection`) overrides them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TuiTheme {
    answered: Color,
    unanswered: Color,
    accent: Color,
    selection: Color,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self {
            answered: hex_or(ConnectorColor::Answered.hex(), Color::Green),
            unanswered: hex_or(ConnectorColor::Unanswered.hex(), Color::Red),
            accent: hex_or(ConnectorColor::Accent.hex(), Color::Blue),
            selection: Color::Yellow,
        }
    }
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(PALETTE_ENV) {
            Ok(value) if value.trim().is_empty() => Ok(Self::default()),
            Ok(value) => Self::parse_csv(value.trim()).map_err(|error| ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_owned(),
                value: format!("{} ({error})", value.trim()),
            }),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            }),
        }
    }

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts = value.split(',').map(str::trim).collect::<Vec<_>>();
        let [answered, unanswered, accent, selection] = parts.as_slice() else {
            return Err(format!(
                "expected 4 comma-separated colors (answered,unanswered,accent,selection), got {}",
                parts.len()
            ));
        };
        Ok(Self {
            answered: parse_color(answered)?,
            unanswered: parse_color(unanswered)?,
            accent: parse_color(accent)?,
            selection: parse_color(selection)?,
        })
    }

    pub(crate) fn connector_color(&self, color: ConnectorColor) -> Color {
        match color {
            ConnectorColor::Accent => self.accent,
            ConnectorColor::Answered => self.answered,
            ConnectorColor::Unanswered => self.unanswered,
        }
    }

    pub(crate) fn node_color(&self, node: &Node) -> Color {
        if node.renders_as_tip() {
            return self.accent;
        }
        match node.status() {
            NodeStatus::Green => self.answered,
            NodeStatus::Red | NodeStatus::Ai => self.unanswered,
        }
    }

    pub(crate) fn node_border_style(&self, node: &Node, active: bool) -> Style {
        if active {
            Style::default().fg(self.selection).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.node_color(node))
        }
    }

    pub(crate) fn node_label_style(&self, node: &Node) -> Style {
        let style = Style::default().fg(self.node_color(node));
        if node.is_root() {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub(crate) fn notice_style(&self, tone: NoticeTone) -> Style {
        match tone {
            NoticeTone::Info => Style::default().fg(Color::Cyan),
            NoticeTone::Success => Style::default().fg(self.answered),
            NoticeTone::Error => Style::default().fg(self.unanswered).add_modifier(Modifier::BOLD),
        }
    }

    pub(crate) fn panel_border_style(&self) -> Style {
        Style::default().fg(self.selection)
    }

    pub(crate) fn muted_style(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub(crate) fn key_style(&self) -> Style {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn progress_style(&self, complete: bool) -> Style {
        if complete {
            Style::default().fg(self.answered).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.selection)
        }
    }
}

fn hex_or(hex: &str, fallback: Color) -> Color {
    parse_color(hex).unwrap_or(fallback)
}

/// Accepts `#RRGGBB`, `0xRRGGBB` or `rgb:RR/GG/BB`.
fn parse_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    if let Some(rest) = trimmed.to_ascii_lowercase().strip_prefix("rgb:") {
        let channels = rest
            .split('/')
            .map(|channel| u8::from_str_radix(channel.trim(), 16))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| format!("invalid rgb: value: {trimmed}"))?;
        return match channels.as_slice() {
            [r, g, b] => Ok(Color::Rgb(*r, *g, *b)),
            _ => Err(format!("invalid rgb: value: {trimmed}")),
        };
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
