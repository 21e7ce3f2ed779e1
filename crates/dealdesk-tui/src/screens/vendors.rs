//! Vendors screen — paged vendor directory with approve/block moderation.
//!
//! Search goes to the backend: submitting `/` re-fetches the first page
//! with the term instead of filtering loaded rows.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell as TableCell, Paragraph, Row, Table};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::{PagePhase, Pager, Vendor};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_age, truncate_text};

const VENDORS_TAKE: usize = 25;

pub(super) fn standing_color(standing: &str) -> Color {
    match standing {
        "approved" => theme::MINT,
        "blocked" => theme::SIGNAL_RED,
        _ => theme::AMBER,
    }
}

pub struct VendorsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    pager: Pager<Vendor>,
    search: Option<String>,
    pending_query: String,
    selected: usize,
    error: Option<String>,
    scroll_offset: Cell<usize>,
}

impl VendorsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            pager: Pager::new(VENDORS_TAKE),
            search: None,
            pending_query: String::new(),
            selected: 0,
            error: None,
            scroll_offset: Cell::new(0),
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
        Some(Action::FetchVendors {
            request: self.pager.first_page(),
            search: self.search.clone(),
        })
    }

    fn fetch_next(&mut self) -> Option<Action> {
        self.pager.next_page().map(|request| Action::FetchVendors {
            request,
            search: self.search.clone(),
        })
    }

    fn selected_vendor(&self) -> Option<&Vendor> {
        self.pager.items().get(self.selected)
    }
}

impl Component for VendorsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Ok(self.move_selection(1)),
            KeyCode::Char('k') | KeyCode::Up => Ok(self.move_selection(-1)),
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
            KeyCode::Char('a') => {
                if let Some(vendor) = self.selected_vendor() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::ApproveVendor {
                        id: vendor.id.clone(),
                        name: vendor.name.clone(),
                    })))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('b') => {
                if let Some(vendor) = self.selected_vendor() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::BlockVendor {
                        id: vendor.id.clone(),
                        name: vendor.name.clone(),
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
            Action::VendorsPage(request, result) => match result {
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
            Action::SearchInput(query) => {
                self.pending_query.clone_from(query);
            }
            Action::SearchSubmit => {
                let query = self.pending_query.trim();
                self.search = if query.is_empty() {
                    None
                } else {
                    Some(query.to_string())
                };
                return Ok(self.fetch_first());
            }
            Action::CloseSearch => {
                self.pending_query.clear();
                if self.search.take().is_some() {
                    return Ok(self.fetch_first());
                }
            }
            Action::Mutated(
                ConfirmAction::ApproveVendor { .. } | ConfirmAction::BlockVendor { .. },
            ) => {
                return Ok(self.fetch_first());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let suffix = if self.pager.has_more() { "+" } else { "" };
        let mut title = format!(" Vendors ({}{suffix}) ", self.pager.len());
        if let Some(search) = &self.search {
            title.push_str(&format!("[\"{search}\"] "));
        }
        let block = theme::panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints / error
        ])
        .split(inner);

        if self.pager.phase() == PagePhase::FetchingFirst {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  Loading vendors…",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else if self.pager.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  No vendors match",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else {
            let rows_data = self.pager.items();
            let viewport = usize::from(layout[0].height.saturating_sub(1));
            let mut offset = self.scroll_offset.get().min(rows_data.len().saturating_sub(1));
            if viewport > 0 {
                if self.selected < offset {
                    offset = self.selected;
                } else if self.selected >= offset + viewport {
                    offset = self.selected + 1 - viewport;
                }
            }
            self.scroll_offset.set(offset);

            let header = Row::new(vec![
                TableCell::from("  Name").style(theme::table_header()),
                TableCell::from("Email").style(theme::table_header()),
                TableCell::from("Standing").style(theme::table_header()),
                TableCell::from("Joined").style(theme::table_header()),
            ]);

            let body: Vec<Row> = rows_data
                .iter()
                .enumerate()
                .skip(offset)
                .take(viewport)
                .map(|(i, vendor)| {
                    let is_selected = i == self.selected;
                    let prefix = if is_selected { "▸ " } else { "  " };
                    let standing = vendor.standing();
                    let row_style = if is_selected {
                        theme::table_selected()
                    } else {
                        theme::table_row()
                    };
                    let email = if vendor.email.is_empty() {
                        "─".to_string()
                    } else {
                        vendor.email.clone()
                    };
                    Row::new(vec![
                        TableCell::from(format!("{prefix}{}", truncate_text(&vendor.name, 28))),
                        TableCell::from(email),
                        TableCell::from(standing)
                            .style(Style::default().fg(standing_color(standing))),
                        TableCell::from(fmt_age(vendor.created_at)),
                    ])
                    .style(row_style)
                })
                .collect();

            let table = Table::new(
                body,
                [
                    Constraint::Fill(1),
                    Constraint::Fill(1),
                    Constraint::Length(10),
                    Constraint::Length(10),
                ],
            )
            .header(header);
            frame.render_widget(table, layout[0]);
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
                Span::styled("  j/k ", theme::key_hint_key()),
                Span::styled("navigate  ", theme::key_hint()),
                Span::styled("/ ", theme::key_hint_key()),
                Span::styled("search  ", theme::key_hint()),
                Span::styled("a ", theme::key_hint_key()),
                Span::styled("approve  ", theme::key_hint()),
                Span::styled("b ", theme::key_hint_key()),
                Span::styled("block  ", theme::key_hint()),
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
        "vendors"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vendor(id: &str, name: &str) -> Vendor {
        Vendor {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            description: String::new(),
            logo_url: None,
            approved: false,
            blocked: false,
            created_at: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn submitted_search_refetches_server_side() {
        let mut screen = VendorsScreen::new();
        screen.update(&Action::Connected).expect("update");
        screen
            .update(&Action::SearchInput("crafts".into()))
            .expect("update");
        let action = screen.update(&Action::SearchSubmit).expect("update");
        match action {
            Some(Action::FetchVendors { request, search }) => {
                assert_eq!(search.as_deref(), Some("crafts"));
                assert_eq!(request.skip, 0);
            }
            other => panic!("expected FetchVendors, got {other:?}"),
        }
    }

    #[test]
    fn closing_an_active_search_clears_the_term() {
        let mut screen = VendorsScreen::new();
        screen.update(&Action::Connected).expect("update");
        screen.update(&Action::SearchInput("x".into())).expect("update");
        screen.update(&Action::SearchSubmit).expect("update");

        let action = screen.update(&Action::CloseSearch).expect("update");
        match action {
            Some(Action::FetchVendors { search, .. }) => assert_eq!(search, None),
            other => panic!("expected unfiltered refetch, got {other:?}"),
        }

        // A second close with no active search is a no-op.
        let action = screen.update(&Action::CloseSearch).expect("update");
        assert!(action.is_none());
    }

    #[test]
    fn moderation_keys_confirm_with_the_vendor_name() {
        let mut screen = VendorsScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchVendors { request, .. }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::VendorsPage(request, Ok(vec![vendor("v-1", "Patio & Co")])))
            .expect("update");

        let action = screen.handle_key_event(key(KeyCode::Char('b'))).expect("key");
        match action {
            Some(Action::ShowConfirm(ConfirmAction::BlockVendor { name, .. })) => {
                assert_eq!(name, "Patio & Co");
            }
            other => panic!("expected ShowConfirm, got {other:?}"),
        }
    }
}
