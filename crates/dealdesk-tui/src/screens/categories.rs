//! Categories screen — position-ordered category table with keyboard and
//! mouse-drag reordering.
//!
//! Edits accumulate locally in an [`OrderedList`] until `s` persists the
//! arrangement. A refresh (including the one that follows a successful
//! save) replaces the list with server state and clears the dirty flag.

use std::cell::Cell;
use std::cmp::Ordering;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell as TableCell, Paragraph, Row, Table};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::{Category, DragSession, OrderedList};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::truncate_text;

pub struct CategoriesScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    list: OrderedList<Category>,
    selected: usize,
    drag: Option<DragSession>,
    last_drag_row: u16,
    loading: bool,
    // Written during render, read by mouse hit-testing.
    rows_area: Cell<Rect>,
    scroll_offset: Cell<usize>,
}

impl CategoriesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            list: OrderedList::new(Vec::new()),
            selected: 0,
            drag: None,
            last_drag_row: 0,
            loading: true,
            rows_area: Cell::new(Rect::default()),
            scroll_offset: Cell::new(0),
        }
    }

    fn select(&mut self, idx: usize) {
        let len = self.list.len();
        self.selected = if len == 0 { 0 } else { idx.min(len - 1) };
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.list.len();
        if len == 0 {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.select(next as usize);
    }

    /// Swap the selected row with its neighbour and follow it.
    fn reorder_selection(&mut self, delta: isize) {
        let from = self.selected;
        let to = if delta > 0 {
            from.saturating_add(1)
        } else {
            from.saturating_sub(1)
        };
        if self.list.move_item(from, to) {
            self.select(to);
        }
    }

    fn selected_category(&self) -> Option<&Category> {
        self.list.get(self.selected)
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn start_drag(&mut self, mouse: &MouseEvent) {
        let area = self.rows_area.get();
        if !area.contains(ratatui::layout::Position::new(mouse.column, mouse.row)) {
            return;
        }
        let offset = self.scroll_offset.get();
        let idx = offset + usize::from(mouse.row - area.y);
        if idx >= self.list.len() {
            return;
        }
        self.select(idx);
        // The list may be scrolled, so the virtual top of row 0 can sit
        // above the visible area.
        let list_top = f32::from(area.y) - offset as f32;
        self.drag = Some(DragSession::new(idx, list_top, 1.0));
        self.last_drag_row = mouse.row;
    }

    fn drag_to(&mut self, mouse: &MouseEvent) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        // Terminal cells are coarse: bias the sample toward the travel
        // direction so the midpoint rule fires once per cell crossed and
        // jiggling inside one cell stays inert.
        let bias = match mouse.row.cmp(&self.last_drag_row) {
            Ordering::Greater => 0.75,
            Ordering::Less => 0.25,
            Ordering::Equal => 0.5,
        };
        let pointer_y = f32::from(mouse.row) + bias;
        if let Some((from, to)) = drag.update(pointer_y, self.list.len()) {
            if self.list.move_item(from, to) {
                self.selected = to;
            }
        }
        self.last_drag_row = mouse.row;
    }
}

impl Component for CategoriesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') => {
                if let Some(last) = self.list.len().checked_sub(1) {
                    self.select(last);
                }
                Ok(None)
            }
            KeyCode::Char('J') => {
                self.reorder_selection(1);
                Ok(None)
            }
            KeyCode::Char('K') => {
                self.reorder_selection(-1);
                Ok(None)
            }
            KeyCode::Char('s') => {
                if self.list.is_dirty() {
                    Ok(Some(Action::SaveCategoryOrder(self.list.order())))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('d') => {
                if let Some(category) = self.selected_category() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteCategory {
                        id: category.id.clone(),
                        name: category.name.clone(),
                    })))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('r') => Ok(Some(Action::RefreshCategories)),
            _ => Ok(None),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start_drag(&mouse);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.drag_to(&mouse);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag = None;
            }
            MouseEventKind::ScrollDown => {
                self.move_selection(1);
            }
            MouseEventKind::ScrollUp => {
                self.move_selection(-1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::CategoriesUpdated(categories) = action {
            self.list.replace(categories.as_ref().clone());
            self.loading = false;
            self.drag = None;
            self.select(self.selected);
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let mut title = format!(" Categories ({}) ", self.list.len());
        if self.list.is_dirty() {
            title.push_str("· unsaved ");
        }
        let mut block = theme::panel_block(title, self.focused);
        if self.list.is_dirty() {
            block = block
                .title_style(Style::default().fg(theme::AMBER).add_modifier(Modifier::BOLD));
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        if self.loading {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  Loading categories…",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  No categories yet",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else {
            // One header line plus uniform one-line rows. Windowing is done
            // here rather than by the widget so mouse rows map back to
            // indices exactly.
            let viewport = usize::from(layout[0].height.saturating_sub(1));
            let mut offset = self.scroll_offset.get().min(self.list.len().saturating_sub(1));
            if viewport > 0 {
                if self.selected < offset {
                    offset = self.selected;
                } else if self.selected >= offset + viewport {
                    offset = self.selected + 1 - viewport;
                }
            }
            self.scroll_offset.set(offset);
            self.rows_area.set(Rect {
                x: layout[0].x,
                y: layout[0].y + 1,
                width: layout[0].width,
                height: layout[0].height.saturating_sub(1),
            });

            let header = Row::new(vec![
                TableCell::from("  Name").style(theme::table_header()),
                TableCell::from("Description").style(theme::table_header()),
                TableCell::from("Img").style(theme::table_header()),
            ]);

            let dragging = self.drag.as_ref().map(DragSession::source);
            let rows: Vec<Row> = self
                .list
                .items()
                .iter()
                .enumerate()
                .skip(offset)
                .take(viewport)
                .map(|(i, category)| {
                    let is_selected = i == self.selected;
                    let prefix = if is_selected { "▸ " } else { "  " };
                    let indent = if category.is_root() { "" } else { "└ " };
                    let name = format!("{prefix}{indent}{}", category.name);
                    let image = if category.image_url.is_some() { "✓" } else { "─" };

                    let row_style = if Some(i) == dragging {
                        Style::default().bg(theme::BG_HIGHLIGHT).fg(theme::MAGENTA)
                    } else if is_selected {
                        theme::table_selected()
                    } else {
                        theme::table_row()
                    };

                    Row::new(vec![
                        TableCell::from(name),
                        TableCell::from(truncate_text(&category.description, 48)),
                        TableCell::from(image),
                    ])
                    .style(row_style)
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Fill(1),
                    Constraint::Fill(2),
                    Constraint::Length(4),
                ],
            )
            .header(header);
            frame.render_widget(table, layout[0]);
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("J/K ", theme::key_hint_key()),
            Span::styled("reorder  ", theme::key_hint()),
            Span::styled("drag ", theme::key_hint_key()),
            Span::styled("reorder  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("save order  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "categories"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn category(id: &str, name: &str, position: u32) -> Category {
        Category {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            position,
            parent_id: None,
            image_url: None,
        }
    }

    fn screen_with(names: &[&str]) -> CategoriesScreen {
        let mut screen = CategoriesScreen::new();
        let categories: Vec<Category> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
                category(&format!("cat-{i}"), name, i as u32)
            })
            .collect();
        screen
            .update(&Action::CategoriesUpdated(categories.into()))
            .expect("update");
        screen
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn shift_j_moves_the_row_and_follows_it() {
        let mut screen = screen_with(&["Food", "Fashion", "Fitness"]);
        let action = screen.handle_key_event(key(KeyCode::Char('J'))).expect("key");
        assert!(action.is_none());
        let names: Vec<&str> = screen.list.items().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Fashion", "Food", "Fitness"]);
        assert_eq!(screen.selected, 1);
        assert!(screen.list.is_dirty());
    }

    #[test]
    fn save_emits_the_current_arrangement_only_when_dirty() {
        let mut screen = screen_with(&["Food", "Fashion"]);
        let action = screen.handle_key_event(key(KeyCode::Char('s'))).expect("key");
        assert!(action.is_none(), "clean list has nothing to save");

        screen.handle_key_event(key(KeyCode::Char('J'))).expect("key");
        let action = screen.handle_key_event(key(KeyCode::Char('s'))).expect("key");
        match action {
            Some(Action::SaveCategoryOrder(order)) => {
                let ids: Vec<String> = order.iter().map(|(id, _)| id.to_string()).collect();
                assert_eq!(ids, ["cat-1", "cat-0"]);
                assert_eq!(order[0].1, 0);
                assert_eq!(order[1].1, 1);
            }
            other => panic!("expected SaveCategoryOrder, got {other:?}"),
        }
    }

    #[test]
    fn refresh_snapshot_clears_the_dirty_flag() {
        let mut screen = screen_with(&["Food", "Fashion"]);
        screen.handle_key_event(key(KeyCode::Char('J'))).expect("key");
        assert!(screen.list.is_dirty());

        let fresh = vec![category("cat-1", "Fashion", 0), category("cat-0", "Food", 1)];
        screen
            .update(&Action::CategoriesUpdated(fresh.into()))
            .expect("update");
        assert!(!screen.list.is_dirty());
    }

    #[test]
    fn delete_asks_for_confirmation_with_the_row_name() {
        let mut screen = screen_with(&["Food", "Fashion"]);
        screen.handle_key_event(key(KeyCode::Char('j'))).expect("key");
        let action = screen.handle_key_event(key(KeyCode::Char('d'))).expect("key");
        match action {
            Some(Action::ShowConfirm(ConfirmAction::DeleteCategory { name, .. })) => {
                assert_eq!(name, "Fashion");
            }
            other => panic!("expected ShowConfirm, got {other:?}"),
        }
    }

    #[test]
    fn mouse_drag_crosses_one_row_per_midpoint() {
        let mut screen = screen_with(&["Food", "Fashion", "Fitness", "Travel"]);
        // Rows start at terminal row 3 (row 2 is the header).
        screen.rows_area.set(Rect::new(0, 3, 40, 10));
        screen.scroll_offset.set(0);

        let press = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 3,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        screen.handle_mouse_event(press).expect("mouse");
        assert_eq!(screen.selected, 0);
        assert!(screen.drag.is_some());

        // Dragging down across two rows reorders twice.
        for (row, expected) in [(4, vec!["Fashion", "Food", "Fitness", "Travel"]),
                                (5, vec!["Fashion", "Fitness", "Food", "Travel"])] {
            let drag = MouseEvent {
                kind: MouseEventKind::Drag(MouseButton::Left),
                column: 5,
                row,
                modifiers: crossterm::event::KeyModifiers::NONE,
            };
            screen.handle_mouse_event(drag).expect("mouse");
            let names: Vec<&str> = screen.list.items().iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, expected);
        }

        let release = MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        screen.handle_mouse_event(release).expect("mouse");
        assert!(screen.drag.is_none());
        assert!(screen.list.is_dirty());
    }
}
