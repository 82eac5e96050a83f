// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts the map view in a ratatui + crossterm terminal. Mouse input becomes pointer events in
//! screen pixels (one column is 10 px, one row 20 px), keys map onto the same actions as the
//! context menu, and workflows run as local tasks whose completions are applied between
//! frames.

use std::{
    error::Error,
    io,
    rc::Rc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::interaction::{
    AppState, CandidateUse, Command, InteractionMachine, MenuAction, Notice, PanelMode,
    PointerButton, PointerEvent, PointerTarget,
};
use crate::layout::Point;
use crate::sync::{Completion, ProjectService, ProjectSnapshot, SyncController};

mod canvas;
mod chrome;
mod theme;

pub use canvas::{PX_PER_COL, PX_PER_ROW};

use canvas::{cell_center_px, cell_in, menu_item_at, menu_rect, viewport_px, MapCanvas};
use theme::TuiTheme;

const FRAME_INTERVAL: Duration = Duration::from_millis(30);
const TOAST_TTL: Duration = Duration::from_secs(4);
const PAN_STEP_PX: f64 = 40.0;

/// Opens the map for `snapshot` and runs until the user quits.
///
/// Must be awaited inside a [`tokio::task::LocalSet`]: workflows are spawned as local tasks.
/// With `request_titles`, every node that should carry a generated title gets one requested
/// up front (used right after a draft was materialized).
pub async fn run_map<S: ProjectService + 'static>(
    service: Rc<S>,
    snapshot: ProjectSnapshot,
    request_titles: bool,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let project_id = snapshot.id.clone();
    let mut state = AppState::default();
    state.load_project(snapshot);
    let mut view = MapView::new(InteractionMachine::new(state), theme);

    let (controller, mut completions) = SyncController::new(service, project_id);
    if request_titles {
        controller.dispatch_all(view.machine.state_mut().request_missing_titles());
    }

    let mut terminal = TerminalSession::new()?;
    while !view.should_quit() {
        while let Ok(completion) = completions.try_recv() {
            controller.dispatch_all(view.apply_completion(completion));
        }
        view.absorb_notices(Instant::now());
        terminal.draw(|frame| view.draw(frame))?;

        while event::poll(Duration::ZERO)? {
            let commands = view.handle_event(event::read()?);
            controller.dispatch_all(commands);
        }
        tokio::time::sleep(FRAME_INTERVAL).await;
    }

    tracing::info!(pending = view.machine.state().has_pending_work(), "map closed");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Areas {
    header: Rect,
    map: Rect,
    panel: Option<Rect>,
    footer: Rect,
}

/// The map screen: interaction state plus everything the terminal host needs to map cells to
/// pixels and to show notices.
pub(crate) struct MapView {
    machine: InteractionMachine,
    theme: TuiTheme,
    areas: Areas,
    toast: Option<(Notice, Instant)>,
    document_scroll: u16,
    should_quit: bool,
}

impl MapView {
    fn new(machine: InteractionMachine, theme: TuiTheme) -> Self {
        Self {
            machine,
            theme,
            areas: Areas::default(),
            toast: None,
            document_scroll: 0,
            should_quit: false,
        }
    }

    pub(crate) fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Splits `area` into header, map, panel and footer and resizes the viewport to the map.
    fn layout_for(&mut self, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let state = self.machine.state();
        let panel_visible = state.panel_visible() && state.selection().is_some();
        let (map, panel) = chrome::split_body(rows[1], panel_visible);

        self.areas = Areas { header: rows[0], map, panel, footer: rows[2] };
        let viewport = viewport_px(map);
        self.machine.state_mut().set_viewport(viewport.x, viewport.y);
    }

    fn apply_completion(&mut self, completion: Completion) -> Vec<Command> {
        self.machine.apply_completion(completion)
    }

    /// Moves the newest queued notice into the footer and expires an old one.
    fn absorb_notices(&mut self, now: Instant) {
        if let Some(latest) = self.machine.state_mut().notices_mut().drain().last() {
            self.toast = Some((latest, now));
        }
        if self.toast.as_ref().is_some_and(|(_, shown)| now.duration_since(*shown) >= TOAST_TTL) {
            self.toast = None;
        }
    }

    fn handle_event(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => Vec::new(),
        }
    }

    /// Pointer position in map pixels for an absolute cell. Cells left of or above the map
    /// give negative coordinates.
    fn pointer_px(&self, column: u16, row: u16) -> Point {
        let map = self.areas.map;
        let col_offset = f64::from(column) - f64::from(map.x);
        let row_offset = f64::from(row) - f64::from(map.y);
        if col_offset >= 0.0 && row_offset >= 0.0 {
            return cell_center_px(column - map.x, row - map.y);
        }
        Point::new((col_offset + 0.5) * PX_PER_COL, (row_offset + 0.5) * PX_PER_ROW)
    }

    fn target_for_cell(&self, column: u16, row: u16, position: Point) -> PointerTarget {
        if !cell_in(self.areas.map, column, row) {
            return PointerTarget::Panel;
        }
        if let Some(menu) = menu_rect(self.machine.state(), self.areas.map) {
            if cell_in(menu, column, row) {
                return menu_item_at(menu, row).map_or(PointerTarget::Menu, PointerTarget::MenuItem);
            }
        }
        self.machine.target_at(position)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Command> {
        let position = self.pointer_px(mouse.column, mouse.row);
        let button = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(PointerButton::Primary),
            MouseEventKind::Down(MouseButton::Right) => Some(PointerButton::Secondary),
            _ => None,
        };
        if let Some(button) = button {
            let target = self.target_for_cell(mouse.column, mouse.row, position);
            return self.machine.handle_pointer(PointerEvent::Down { button, position, target });
        }

        match mouse.kind {
            MouseEventKind::Drag(MouseButton::Left) => {
                self.machine.handle_pointer(PointerEvent::Move { position })
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.machine.handle_pointer(PointerEvent::Up { position })
            }
            MouseEventKind::ScrollUp => self.pan(0.0, PAN_STEP_PX),
            MouseEventKind::ScrollDown => self.pan(0.0, -PAN_STEP_PX),
            _ => Vec::new(),
        }
    }

    fn pan(&mut self, dx: f64, dy: f64) -> Vec<Command> {
        self.machine.state_mut().pan_by(Point::new(dx, dy));
        Vec::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }
        if self.machine.state().merged_document().is_some() {
            return self.handle_document_key(key);
        }
        // A panel hidden by an ongoing pan takes no typing.
        let state = self.machine.state();
        if state.panel_visible() && state.panel_mode() == Some(PanelMode::Answering) {
            if let Some(commands) = self.handle_answer_key(key) {
                return commands;
            }
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Esc => {
                self.machine.dismiss();
                Vec::new()
            }
            KeyCode::Char('m') => self.machine.request_merge(),
            KeyCode::Tab => self.machine.select_next_open(),
            KeyCode::Char(ch @ '1'..='9') => {
                let usage = if key.modifiers.contains(KeyModifiers::ALT) {
                    CandidateUse::AsTip
                } else {
                    CandidateUse::Primary
                };
                let index = (ch as usize) - ('1' as usize);
                self.machine.choose_candidate(index, usage)
            }
            KeyCode::Char(ch) => match MenuAction::ALL.into_iter().find(|action| action.key() == ch) {
                Some(action) => self.run_action(action),
                None => Vec::new(),
            },
            KeyCode::Left => self.pan(PAN_STEP_PX, 0.0),
            KeyCode::Right => self.pan(-PAN_STEP_PX, 0.0),
            KeyCode::Up => self.pan(0.0, PAN_STEP_PX),
            KeyCode::Down => self.pan(0.0, -PAN_STEP_PX),
            _ => Vec::new(),
        }
    }

    /// Menu actions go to the menu's node when it is open, else to the active node.
    fn run_action(&mut self, action: MenuAction) -> Vec<Command> {
        if self.machine.state().menu().is_some() {
            return self.machine.choose_menu_action(action);
        }
        match self.machine.state().active_id().cloned() {
            Some(node_id) => self.machine.trigger_action(&node_id, action),
            None => Vec::new(),
        }
    }

    /// Text entry while answering. `None` lets the key fall through to the map bindings.
    fn handle_answer_key(&mut self, key: KeyEvent) -> Option<Vec<Command>> {
        match key.code {
            KeyCode::Enter => Some(self.machine.submit_answer()),
            KeyCode::Backspace => {
                self.machine.state_mut().answer_draft_mut().pop();
                Some(Vec::new())
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.machine.state_mut().answer_draft_mut().push(ch);
                Some(Vec::new())
            }
            _ => None,
        }
    }

    fn handle_document_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.machine.dismiss();
                self.document_scroll = 0;
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.document_scroll = self.document_scroll.saturating_sub(1),
            KeyCode::Down => self.document_scroll = self.document_scroll.saturating_add(1),
            KeyCode::PageUp => self.document_scroll = self.document_scroll.saturating_sub(10),
            KeyCode::PageDown => self.document_scroll = self.document_scroll.saturating_add(10),
            _ => {}
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        self.layout_for(frame.size());
        let areas = self.areas;
        let state = self.machine.state();
        let theme = &self.theme;

        frame.render_widget(Paragraph::new(chrome::header_line(state, theme)), areas.header);
        frame.render_widget(MapCanvas { state, theme }, areas.map);

        if let Some(panel) = areas.panel {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(chrome::panel_title(state))
                .border_style(theme.panel_border_style());
            frame.render_widget(
                Paragraph::new(chrome::panel_lines(state, theme))
                    .block(block)
                    .wrap(Wrap { trim: false }),
                panel,
            );
        }

        let toast = self.toast.as_ref().map(|(notice, _)| notice);
        frame.render_widget(Paragraph::new(chrome::footer_line(toast, state, theme)), areas.footer);

        if let Some(document) = state.merged_document() {
            let area = chrome::centered_rect(frame.size(), 80, 80);
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(document.to_owned())
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Merged document (Esc closes)")
                            .border_style(theme.panel_border_style()),
                    )
                    .wrap(Wrap { trim: false })
                    .scroll((self.document_scroll, 0)),
                area,
            );
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
}
