//! Influencers screen — paged influencer directory with moderation and
//! wallet credits.
//!
//! `w` opens a small amount prompt; the entered value still passes through
//! the usual confirm dialog before any money moves.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell as TableCell, Clear, Paragraph, Row, Table,
};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use dealdesk_core::{EntityId, Influencer, PagePhase, Pager};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_age, fmt_money, truncate_text};

use super::vendors::standing_color;

const INFLUENCERS_TAKE: usize = 25;

struct WalletPrompt {
    target_id: EntityId,
    target_name: String,
    input: Input,
    error: Option<String>,
}

pub struct InfluencersScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    pager: Pager<Influencer>,
    search: Option<String>,
    pending_query: String,
    selected: usize,
    wallet: Option<WalletPrompt>,
    error: Option<String>,
    scroll_offset: Cell<usize>,
}

impl InfluencersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            pager: Pager::new(INFLUENCERS_TAKE),
            search: None,
            pending_query: String::new(),
            selected: 0,
            wallet: None,
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
        Some(Action::FetchInfluencers {
            request: self.pager.first_page(),
            search: self.search.clone(),
        })
    }

    fn fetch_next(&mut self) -> Option<Action> {
        self.pager.next_page().map(|request| Action::FetchInfluencers {
            request,
            search: self.search.clone(),
        })
    }

    fn selected_influencer(&self) -> Option<&Influencer> {
        self.pager.items().get(self.selected)
    }

    /// Keys while the amount prompt is open. Enter validates and hands the
    /// result to the confirm dialog.
    fn handle_wallet_key(&mut self, key: KeyEvent) -> Option<Action> {
        let prompt = self.wallet.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.wallet = None;
                Some(Action::Render)
            }
            KeyCode::Enter => match prompt.input.value().trim().parse::<f64>() {
                Ok(amount) if amount > 0.0 => {
                    let action = Action::ShowConfirm(ConfirmAction::CreditWallet {
                        id: prompt.target_id.clone(),
                        name: prompt.target_name.clone(),
                        amount,
                    });
                    self.wallet = None;
                    Some(action)
                }
                _ => {
                    prompt.error = Some("enter a positive amount".into());
                    None
                }
            },
            _ => {
                prompt.input.handle_event(&CrosstermEvent::Key(key));
                prompt.error = None;
                None
            }
        }
    }

    fn render_wallet_prompt(&self, frame: &mut Frame, area: Rect, prompt: &WalletPrompt) {
        let width = 46.min(area.width);
        let height = 5;
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Credit wallet ")
            .title_style(Style::default().fg(theme::AMBER).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::AMBER));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let amount_line = Line::from(vec![
            Span::styled(
                format!(" {} $", truncate_text(&prompt.target_name, 24)),
                Style::default().fg(theme::SOFT_WHITE),
            ),
            Span::styled(
                format!("{}█", prompt.input.value()),
                Style::default().fg(theme::AQUA),
            ),
        ]);
        let second = prompt.error.as_ref().map_or_else(
            || {
                Line::from(vec![
                    Span::styled(" Enter ", theme::key_hint_key()),
                    Span::styled("credit  ", theme::key_hint()),
                    Span::styled("Esc ", theme::key_hint_key()),
                    Span::styled("cancel", theme::key_hint()),
                ])
            },
            |error| {
                Line::from(Span::styled(
                    format!(" ✗ {error}"),
                    Style::default().fg(theme::SIGNAL_RED),
                ))
            },
        );
        frame.render_widget(Paragraph::new(vec![amount_line, Line::from(""), second]), inner);
    }
}

impl Component for InfluencersScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.wallet.is_some() {
            return Ok(self.handle_wallet_key(key));
        }

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
                if let Some(influencer) = self.selected_influencer() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::ApproveInfluencer {
                        id: influencer.id.clone(),
                        name: influencer.name.clone(),
                    })))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('b') => {
                if let Some(influencer) = self.selected_influencer() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::BlockInfluencer {
                        id: influencer.id.clone(),
                        name: influencer.name.clone(),
                    })))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('w') => {
                if let Some(influencer) = self.selected_influencer() {
                    self.wallet = Some(WalletPrompt {
                        target_id: influencer.id.clone(),
                        target_name: influencer.name.clone(),
                        input: Input::default(),
                        error: None,
                    });
                }
                Ok(None)
            }
            KeyCode::Char('r') => Ok(self.fetch_first()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Connected => return Ok(self.fetch_first()),
            Action::InfluencersPage(request, result) => match result {
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
                ConfirmAction::ApproveInfluencer { .. }
                | ConfirmAction::BlockInfluencer { .. }
                | ConfirmAction::CreditWallet { .. },
            ) => {
                return Ok(self.fetch_first());
            }
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let suffix = if self.pager.has_more() { "+" } else { "" };
        let mut title = format!(" Influencers ({}{suffix}) ", self.pager.len());
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
                    "  Loading influencers…",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else if self.pager.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  No influencers match",
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
                TableCell::from("Wallet").style(theme::table_header()),
                TableCell::from("Joined").style(theme::table_header()),
            ]);

            let body: Vec<Row> = rows_data
                .iter()
                .enumerate()
                .skip(offset)
                .take(viewport)
                .map(|(i, influencer)| {
                    let is_selected = i == self.selected;
                    let prefix = if is_selected { "▸ " } else { "  " };
                    let standing = influencer.standing();
                    let wallet = influencer
                        .wallet_balance
                        .map_or_else(|| "─".into(), fmt_money);
                    let email = if influencer.email.is_empty() {
                        "─".to_string()
                    } else {
                        influencer.email.clone()
                    };
                    let row_style = if is_selected {
                        theme::table_selected()
                    } else {
                        theme::table_row()
                    };
                    Row::new(vec![
                        TableCell::from(format!(
                            "{prefix}{}",
                            truncate_text(&influencer.name, 28)
                        )),
                        TableCell::from(email),
                        TableCell::from(standing)
                            .style(Style::default().fg(standing_color(standing))),
                        TableCell::from(wallet).style(Style::default().fg(theme::SKY_BLUE)),
                        TableCell::from(fmt_age(influencer.created_at)),
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
                Span::styled("w ", theme::key_hint_key()),
                Span::styled("credit  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("refresh", theme::key_hint()),
            ];
            if self.pager.phase() == PagePhase::FetchingNext {
                hints.push(Span::styled("   fetching more…", theme::key_hint()));
            }
            frame.render_widget(Paragraph::new(Line::from(hints)), layout[1]);
        }

        if let Some(prompt) = &self.wallet {
            self.render_wallet_prompt(frame, area, prompt);
        }
    }

    fn captures_input(&self) -> bool {
        self.wallet.is_some()
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "influencers"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn influencer(id: &str, name: &str) -> Influencer {
        Influencer {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            photo_url: None,
            approved: true,
            blocked: false,
            wallet_balance: Some(12.5),
            created_at: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn loaded_screen() -> InfluencersScreen {
        let mut screen = InfluencersScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchInfluencers { request, .. }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::InfluencersPage(request, Ok(vec![influencer("i-1", "June")])))
            .expect("update");
        screen
    }

    #[test]
    fn wallet_prompt_validates_before_confirming() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char('w'))).expect("key");
        assert!(screen.wallet.is_some());

        // Junk input is rejected in place.
        for c in "abc".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).expect("key");
        }
        let action = screen.handle_key_event(key(KeyCode::Enter)).expect("key");
        assert!(action.is_none());
        assert!(screen.wallet.as_ref().and_then(|w| w.error.as_ref()).is_some());

        // Replace with a valid amount.
        for _ in 0..3 {
            screen.handle_key_event(key(KeyCode::Backspace)).expect("key");
        }
        for c in "25.50".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).expect("key");
        }
        let action = screen.handle_key_event(key(KeyCode::Enter)).expect("key");
        match action {
            Some(Action::ShowConfirm(ConfirmAction::CreditWallet { name, amount, .. })) => {
                assert_eq!(name, "June");
                assert!((amount - 25.5).abs() < f64::EPSILON);
            }
            other => panic!("expected CreditWallet confirm, got {other:?}"),
        }
        assert!(screen.wallet.is_none());
    }

    #[test]
    fn escape_dismisses_the_wallet_prompt() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char('w'))).expect("key");
        screen.handle_key_event(key(KeyCode::Esc)).expect("key");
        assert!(screen.wallet.is_none());
    }
}
