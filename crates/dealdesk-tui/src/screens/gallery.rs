//! Gallery screen — paged media grid.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::{MediaItem, PagePhase, Pager};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_age, fmt_size, truncate_text};

const GALLERY_TAKE: usize = 24;
const GRID_COLS: usize = 3;
const TILE_HEIGHT: u16 = 4;

pub struct GalleryScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    pager: Pager<MediaItem>,
    selected: usize,
    error: Option<String>,
    row_offset: Cell<usize>,
}

impl GalleryScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            pager: Pager::new(GALLERY_TAKE),
            selected: 0,
            error: None,
            row_offset: Cell::new(0),
        }
    }

    fn select(&mut self, idx: usize) {
        let len = self.pager.len();
        self.selected = if len == 0 { 0 } else { idx.min(len - 1) };
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) -> Option<Action> {
        let len = self.pager.len();
        if len == 0 {
            return None;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.select(next as usize);
        if self.selected + 1 == len {
            return self.fetch_next();
        }
        None
    }

    fn fetch_first(&mut self) -> Option<Action> {
        self.selected = 0;
        self.error = None;
        Some(Action::FetchMedia {
            request: self.pager.first_page(),
        })
    }

    fn fetch_next(&mut self) -> Option<Action> {
        self.pager
            .next_page()
            .map(|request| Action::FetchMedia { request })
    }

    fn selected_item(&self) -> Option<&MediaItem> {
        self.pager.items().get(self.selected)
    }

    fn render_tile(&self, frame: &mut Frame, area: Rect, item: &MediaItem, is_selected: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if is_selected {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let name_style = if is_selected {
            Style::default()
                .fg(theme::MAGENTA)
                .add_modifier(ratatui::style::Modifier::BOLD)
        } else {
            Style::default().fg(theme::SOFT_WHITE)
        };
        let lines = vec![
            Line::from(Span::styled(
                truncate_text(item.display_name(), usize::from(inner.width)),
                name_style,
            )),
            Line::from(Span::styled(
                format!(
                    "{} · {}",
                    item.mime_type.as_deref().unwrap_or("?"),
                    fmt_size(item.size_bytes)
                ),
                Style::default().fg(theme::SLATE),
            )),
        ];
        let mut text = lines;
        if inner.height > 2 {
            text.push(Line::from(Span::styled(
                fmt_age(item.created_at),
                Style::default().fg(theme::SLATE),
            )));
        }
        frame.render_widget(Paragraph::new(text), inner);
    }
}

impl Component for GalleryScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    #[allow(clippy::cast_possible_wrap, clippy::as_conversions)]
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => Ok(self.move_selection(1)),
            KeyCode::Char('h') | KeyCode::Left => Ok(self.move_selection(-1)),
            KeyCode::Char('j') | KeyCode::Down => Ok(self.move_selection(GRID_COLS as isize)),
            KeyCode::Char('k') | KeyCode::Up => Ok(self.move_selection(-(GRID_COLS as isize))),
            KeyCode::Char('g') => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') => {
                if let Some(last) = self.pager.len().checked_sub(1) {
                    self.select(last);
                }
                Ok(None)
            }
            KeyCode::Char('d') => {
                if let Some(item) = self.selected_item() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteMedia {
                        id: item.id.clone(),
                        name: item.display_name().to_string(),
                    })))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('r') => Ok(self.fetch_first()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Connected => return Ok(self.fetch_first()),
            Action::MediaPage(request, result) => match result {
                Ok(page) => {
                    if self.pager.apply_page(*request, page.clone()) {
                        self.error = None;
                        self.select(self.selected);
                    }
                }
                Err(message) => {
                    if self.pager.apply_failure(*request) {
                        self.error = Some(message.clone());
                    }
                }
            },
            Action::Mutated(ConfirmAction::DeleteMedia { .. }) => {
                return Ok(self.fetch_first());
            }
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let suffix = if self.pager.has_more() { "+" } else { "" };
        let title = format!(" Gallery ({}{suffix}) ", self.pager.len());
        let block = theme::panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // grid
            Constraint::Length(1), // hints / error
        ])
        .split(inner);

        if self.pager.phase() == PagePhase::FetchingFirst {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  Loading media…",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else if self.pager.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  Gallery is empty",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else {
            let items = self.pager.items();
            let visible_rows = usize::from(layout[0].height / TILE_HEIGHT).max(1);
            let selected_row = self.selected / GRID_COLS;
            let mut offset = self.row_offset.get();
            if selected_row < offset {
                offset = selected_row;
            } else if selected_row >= offset + visible_rows {
                offset = selected_row + 1 - visible_rows;
            }
            self.row_offset.set(offset);

            let mut grid_y = layout[0].y;
            for row in offset..offset + visible_rows {
                let start = row * GRID_COLS;
                if start >= items.len() {
                    break;
                }
                let row_area = Rect {
                    x: layout[0].x,
                    y: grid_y,
                    width: layout[0].width,
                    height: TILE_HEIGHT.min(layout[0].bottom().saturating_sub(grid_y)),
                };
                if row_area.height < 3 {
                    break;
                }
                let cells = Layout::horizontal([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(row_area);
                for col in 0..GRID_COLS {
                    let idx = start + col;
                    if let Some(item) = items.get(idx) {
                        self.render_tile(frame, cells[col], item, idx == self.selected);
                    }
                }
                grid_y += TILE_HEIGHT;
            }
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("  ✗ {error}"),
                    Style::default().fg(theme::SIGNAL_RED),
                ))),
                layout[1],
            );
        } else {
            let mut hints = vec![
                Span::styled("  h/j/k/l ", theme::key_hint_key()),
                Span::styled("navigate  ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("refresh", theme::key_hint()),
            ];
            if self.pager.phase() == PagePhase::FetchingNext {
                hints.push(Span::styled("   fetching more…", theme::key_hint()));
            }
            frame.render_widget(Paragraph::new(Line::from(hints)), layout[1]);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "gallery"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn media(id: &str, name: &str) -> MediaItem {
        MediaItem {
            id: id.into(),
            url: format!("https://cdn.example.com/{name}"),
            name: Some(name.into()),
            size_bytes: Some(2048),
            mime_type: Some("image/png".into()),
            created_at: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn grid_navigation_moves_by_rows_and_columns() {
        let mut screen = GalleryScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchMedia { request }) = fetch else {
            panic!("expected fetch");
        };
        let page: Vec<MediaItem> = (0..7).map(|i| media(&format!("m-{i}"), &format!("img{i}.png"))).collect();
        screen
            .update(&Action::MediaPage(request, Ok(page)))
            .expect("update");

        screen.handle_key_event(key(KeyCode::Char('j'))).expect("key");
        assert_eq!(screen.selected, 3, "j drops one grid row");
        screen.handle_key_event(key(KeyCode::Char('l'))).expect("key");
        assert_eq!(screen.selected, 4);
        screen.handle_key_event(key(KeyCode::Char('k'))).expect("key");
        assert_eq!(screen.selected, 1);
    }

    #[test]
    fn delete_names_the_selected_file() {
        let mut screen = GalleryScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchMedia { request }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::MediaPage(request, Ok(vec![media("m-1", "hero.png")])))
            .expect("update");
        let action = screen.handle_key_event(key(KeyCode::Char('d'))).expect("key");
        match action {
            Some(Action::ShowConfirm(ConfirmAction::DeleteMedia { name, .. })) => {
                assert_eq!(name, "hero.png");
            }
            other => panic!("expected ShowConfirm, got {other:?}"),
        }
    }
}
