// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rasterizing the pixel-space map into terminal cells.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::theme::TuiTheme;
use crate::interaction::{AppState, MenuAction};
use crate::layout::geometry::quadratic_point;
use crate::layout::Point;

/// Screen pixels per terminal column.
pub const PX_PER_COL: f64 = 10.0;
/// Screen pixels per terminal row.
pub const PX_PER_ROW: f64 = 20.0;

/// Pixel size of a map area of `width` x `height` cells.
pub(crate) fn viewport_px(area: Rect) -> Point {
    Point::new(f64::from(area.width) * PX_PER_COL, f64::from(area.height) * PX_PER_ROW)
}

/// Center of the cell at (`col`, `row`) relative to the map area, in screen pixels.
pub(crate) fn cell_center_px(col: u16, row: u16) -> Point {
    Point::new(
        (f64::from(col) + 0.5) * PX_PER_COL,
        (f64::from(row) + 0.5) * PX_PER_ROW,
    )
}

/// Cell holding screen pixel `point`, relative to the map area. May be negative.
pub(crate) fn px_to_cell(point: Point) -> (i32, i32) {
    ((point.x / PX_PER_COL).floor() as i32, (point.y / PX_PER_ROW).floor() as i32)
}

/// The part of a (possibly off-screen) cell rectangle that falls inside `area`.
pub(crate) fn clip_cells(area: Rect, col: i32, row: i32, width: i32, height: i32) -> Option<Rect> {
    let left = (i32::from(area.x) + col).max(i32::from(area.x));
    let top = (i32::from(area.y) + row).max(i32::from(area.y));
    let right = (i32::from(area.x) + col + width).min(i32::from(area.right()));
    let bottom = (i32::from(area.y) + row + height).min(i32::from(area.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(left as u16, top as u16, (right - left) as u16, (bottom - top) as u16))
}

pub(crate) fn cell_in(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Cell rectangle of the open context menu, in absolute buffer cells.
pub(crate) fn menu_rect(state: &AppState, area: Rect) -> Option<Rect> {
    let menu = state.menu()?;
    let (col, row) = px_to_cell(Point::new(menu.left, menu.top));
    let width = (state.config().menu_width / PX_PER_COL).round() as i32;
    let height = (state.config().menu_height / PX_PER_ROW).round() as i32;
    clip_cells(area, col, row, width, height)
}

/// Menu item on absolute cell row `row`, if any.
pub(crate) fn menu_item_at(menu: Rect, row: u16) -> Option<MenuAction> {
    let index = row.checked_sub(menu.y + 1)?;
    MenuAction::ALL.get(usize::from(index)).copied()
}

/// The node map: connectors underneath, node boxes on top, then the context menu.
pub(crate) struct MapCanvas<'a> {
    pub(crate) state: &'a AppState,
    pub(crate) theme: &'a TuiTheme,
}

impl Widget for MapCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_connectors(area, buf);
        self.render_nodes(area, buf);
        self.render_menu(area, buf);
    }
}

impl MapCanvas<'_> {
    fn render_connectors(&self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        for curve in state.connectors() {
            let from = state.world_to_screen(curve.from);
            let control = state.world_to_screen(curve.control);
            let to = state.world_to_screen(curve.to);
            let steps = ((to - from).length() / (PX_PER_COL / 2.0)).ceil().max(2.0) as usize;
            let style = Style::default().fg(self.theme.connector_color(curve.color));

            for step in 0..=steps {
                let point = quadratic_point(from, control, to, step as f64 / steps as f64);
                let (col, row) = px_to_cell(point);
                if let Some(cell) = clip_cells(area, col, row, 1, 1) {
                    buf.set_string(cell.x, cell.y, "·", style);
                }
            }
        }
    }

    fn render_nodes(&self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let node_height = state.layout_config().node_height;
        let height = (node_height / PX_PER_ROW).round() as i32;

        for node in state.tree().nodes() {
            let Some(position) = state.layout().position(node.id()) else {
                continue;
            };
            let top_left = state.world_to_screen(Point::new(position.x, position.y));
            let (col, row) = px_to_cell(top_left);
            let width = (position.width / PX_PER_COL).round() as i32;
            let Some(rect) = clip_cells(area, col, row, width, height) else {
                continue;
            };

            let active = state.active_id() == Some(node.id());
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.node_border_style(node, active));
            let label = state.label_for(node);
            Clear.render(rect, buf);
            Paragraph::new(label)
                .style(self.theme.node_label_style(node))
                .block(block)
                .render(rect, buf);
        }
    }

    fn render_menu(&self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let Some(rect) = menu_rect(state, area) else {
            return;
        };
        let node = state.menu().and_then(|menu| state.tree().get(&menu.node_id));

        Clear.render(rect, buf);
        Block::default()
            .borders(Borders::ALL)
            .title("Actions")
            .border_style(self.theme.panel_border_style())
            .render(rect, buf);

        for (idx, action) in MenuAction::ALL.iter().enumerate() {
            let row = rect.y + 1 + idx as u16;
            if row + 1 >= rect.bottom() {
                break;
            }
            let effective = node.is_some_and(|node| action.is_effective_for(node));
            let style = if effective { Style::default() } else { self.theme.muted_style() };
            let text = format!("[{}] {}", action.key(), action.label());
            buf.set_stringn(rect.x + 1, row, text, usize::from(rect.width.saturating_sub(2)), style);
        }
    }
}
