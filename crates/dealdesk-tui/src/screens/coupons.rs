//! Coupons screen — redemption review queue.
//!
//! Two scopes mirror the moderation flow: pending redemptions awaiting a
//! decision and the archive of used ones. Approving or marking used only
//! makes sense in the pending scope, so those keys are inert elsewhere.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell as TableCell, Paragraph, Row, Table};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::{PagePhase, Pager, Redemption, RedemptionScope, RedemptionStatus};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_age, truncate_text};
use crate::widgets::sub_tabs;

const COUPONS_TAKE: usize = 25;
const SCOPE_TABS: [&str; 2] = ["Pending", "Used"];

pub struct CouponsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    pager: Pager<Redemption>,
    scope: RedemptionScope,
    selected: usize,
    detail_open: bool,
    error: Option<String>,
    scroll_offset: Cell<usize>,
}

impl CouponsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            pager: Pager::new(COUPONS_TAKE),
            scope: RedemptionScope::PendingApproval,
            selected: 0,
            detail_open: false,
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
        self.detail_open = false;
        Some(Action::FetchCoupons {
            request: self.pager.first_page(),
            scope: self.scope,
        })
    }

    fn fetch_next(&mut self) -> Option<Action> {
        self.pager.next_page().map(|request| Action::FetchCoupons {
            request,
            scope: self.scope,
        })
    }

    fn selected_redemption(&self) -> Option<&Redemption> {
        self.pager.items().get(self.selected)
    }

    /// Short handle for dialogs: the coupon code when present, else the
    /// deal title, else the id.
    fn label_of(redemption: &Redemption) -> String {
        redemption
            .coupon_code
            .clone()
            .or_else(|| redemption.deal_title.clone())
            .unwrap_or_else(|| redemption.id.to_string())
    }

    fn status_cell(status: &RedemptionStatus) -> (String, Color) {
        match status {
            RedemptionStatus::Pending => ("pending".into(), theme::AMBER),
            RedemptionStatus::Approved => ("approved".into(), theme::MINT),
            RedemptionStatus::Used => ("used".into(), theme::SKY_BLUE),
            RedemptionStatus::Rejected => ("rejected".into(), theme::SIGNAL_RED),
            other => (other.to_string(), theme::SOFT_WHITE),
        }
    }

    fn scope_index(&self) -> usize {
        match self.scope {
            RedemptionScope::PendingApproval => 0,
            RedemptionScope::Used => 1,
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, redemption: &Redemption) {
        let title = format!(" {} ", Self::label_of(redemption));
        let block = theme::panel_block(title, true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme::SLATE));
        let value =
            |text: String| Span::styled(text, Style::default().fg(theme::SOFT_WHITE));
        let dash = || "─".to_string();

        let (status_str, status_color) = Self::status_cell(&redemption.status);
        let engagement = format!(
            "{} views · {} likes · {} comments",
            redemption.total_views, redemption.total_likes, redemption.total_comments
        );

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                label("  Deal        "),
                value(redemption.deal_title.clone().unwrap_or_else(dash)),
            ]),
            Line::from(vec![
                label("  Influencer  "),
                value(redemption.influencer_name.clone().unwrap_or_else(dash)),
            ]),
            Line::from(vec![
                label("  Status      "),
                Span::styled(status_str, Style::default().fg(status_color)),
            ]),
            Line::from(vec![label("  Engagement  "), value(engagement)]),
            Line::from(vec![
                label("  Proof       "),
                value(redemption.proof_image_url.clone().unwrap_or_else(dash)),
            ]),
            Line::from(vec![
                label("  Social      "),
                value(redemption.social_media_link.clone().unwrap_or_else(dash)),
            ]),
            Line::from(vec![
                label("  Notes       "),
                value(redemption.notes.clone().unwrap_or_else(dash)),
            ]),
            Line::from(vec![
                label("  Submitted   "),
                value(fmt_age(redemption.created_at)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), layout[0]);

        let hints = Line::from(vec![
            Span::styled("  a ", theme::key_hint_key()),
            Span::styled("approve  ", theme::key_hint()),
            Span::styled("u ", theme::key_hint_key()),
            Span::styled("mark used  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("back", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}

impl Component for CouponsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Review keys work from both the table and the detail pane.
        match key.code {
            KeyCode::Esc if self.detail_open => {
                self.detail_open = false;
                return Ok(Some(Action::Render));
            }
            KeyCode::Char('a') if self.scope == RedemptionScope::PendingApproval => {
                if let Some(redemption) = self.selected_redemption() {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::ApproveCoupon {
                        id: redemption.id.clone(),
                        label: Self::label_of(redemption),
                    })));
                }
                return Ok(None);
            }
            KeyCode::Char('u') if self.scope == RedemptionScope::PendingApproval => {
                if let Some(redemption) = self.selected_redemption() {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::MarkCouponUsed {
                        id: redemption.id.clone(),
                        label: Self::label_of(redemption),
                    })));
                }
                return Ok(None);
            }
            _ => {}
        }
        if self.detail_open {
            return Ok(None);
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
            KeyCode::Tab => {
                self.scope = match self.scope {
                    RedemptionScope::PendingApproval => RedemptionScope::Used,
                    RedemptionScope::Used => RedemptionScope::PendingApproval,
                };
                Ok(self.fetch_first())
            }
            KeyCode::Enter => {
                if self.selected_redemption().is_some() {
                    self.detail_open = true;
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
            Action::CouponsPage(request, result) => match result {
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
            Action::Mutated(
                ConfirmAction::ApproveCoupon { .. } | ConfirmAction::MarkCouponUsed { .. },
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
        let title = format!(" Coupons ({}{suffix}) ", self.pager.len());
        let block = theme::panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (table_area, detail_area) = if self.detail_open {
            let [top, bottom] =
                Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .areas(inner);
            (top, Some(bottom))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([
            Constraint::Length(1), // scope tabs
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints / error
        ])
        .split(table_area);

        frame.render_widget(
            Paragraph::new(sub_tabs::sub_tab_line(&SCOPE_TABS, self.scope_index())),
            layout[0],
        );

        if self.pager.phase() == PagePhase::FetchingFirst {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  Loading redemptions…",
                    theme::key_hint(),
                ))),
                layout[1],
            );
        } else if self.pager.is_empty() {
            let empty = match self.scope {
                RedemptionScope::PendingApproval => "  Review queue is empty",
                RedemptionScope::Used => "  No used redemptions",
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(empty, theme::key_hint()))),
                layout[1],
            );
        } else {
            let rows_data = self.pager.items();
            let viewport = usize::from(layout[1].height.saturating_sub(1));
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
                TableCell::from("  Code").style(theme::table_header()),
                TableCell::from("Deal").style(theme::table_header()),
                TableCell::from("Influencer").style(theme::table_header()),
                TableCell::from("Status").style(theme::table_header()),
                TableCell::from("Views").style(theme::table_header()),
                TableCell::from("Submitted").style(theme::table_header()),
            ]);

            let body: Vec<Row> = rows_data
                .iter()
                .enumerate()
                .skip(offset)
                .take(viewport)
                .map(|(i, redemption)| {
                    let is_selected = i == self.selected;
                    let prefix = if is_selected { "▸ " } else { "  " };
                    let (status_str, status_color) = Self::status_cell(&redemption.status);
                    let row_style = if is_selected {
                        theme::table_selected()
                    } else {
                        theme::table_row()
                    };
                    Row::new(vec![
                        TableCell::from(format!(
                            "{prefix}{}",
                            redemption.coupon_code.as_deref().unwrap_or("─")
                        )),
                        TableCell::from(truncate_text(
                            redemption.deal_title.as_deref().unwrap_or("─"),
                            28,
                        )),
                        TableCell::from(
                            redemption.influencer_name.clone().unwrap_or_else(|| "─".into()),
                        ),
                        TableCell::from(status_str).style(Style::default().fg(status_color)),
                        TableCell::from(redemption.total_views.to_string())
                            .style(Style::default().fg(theme::SKY_BLUE)),
                        TableCell::from(fmt_age(redemption.created_at)),
                    ])
                    .style(row_style)
                })
                .collect();

            let table = Table::new(
                body,
                [
                    Constraint::Length(16),
                    Constraint::Fill(2),
                    Constraint::Fill(1),
                    Constraint::Length(9),
                    Constraint::Length(8),
                    Constraint::Length(10),
                ],
            )
            .header(header);
            frame.render_widget(table, layout[1]);
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("  ✗ {error}"),
                    Style::default().fg(theme::SIGNAL_RED),
                ))),
                layout[2],
            );
        } else {
            let mut hints = vec![
                Span::styled("  j/k ", theme::key_hint_key()),
                Span::styled("navigate  ", theme::key_hint()),
                Span::styled("Tab ", theme::key_hint_key()),
                Span::styled("scope  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("detail  ", theme::key_hint()),
            ];
            if self.scope == RedemptionScope::PendingApproval {
                hints.extend([
                    Span::styled("a ", theme::key_hint_key()),
                    Span::styled("approve  ", theme::key_hint()),
                    Span::styled("u ", theme::key_hint_key()),
                    Span::styled("mark used  ", theme::key_hint()),
                ]);
            }
            hints.extend([
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("refresh", theme::key_hint()),
            ]);
            if self.pager.phase() == PagePhase::FetchingNext {
                hints.push(Span::styled("   fetching more…", theme::key_hint()));
            }
            frame.render_widget(Paragraph::new(Line::from(hints)), layout[2]);
        }

        if let (Some(detail_area), Some(redemption)) = (detail_area, self.selected_redemption()) {
            self.render_detail(frame, detail_area, redemption);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "coupons"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn redemption(id: &str, code: &str) -> Redemption {
        Redemption {
            id: id.into(),
            status: RedemptionStatus::Pending,
            coupon_code: Some(code.into()),
            proof_image_url: None,
            social_media_link: None,
            notes: None,
            total_views: 0,
            total_likes: 0,
            total_comments: 0,
            influencer_id: None,
            influencer_name: None,
            deal_id: None,
            deal_title: None,
            created_at: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn loaded_screen() -> CouponsScreen {
        let mut screen = CouponsScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchCoupons { request, .. }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::CouponsPage(
                request,
                Ok(vec![redemption("r-1", "SAVE10"), redemption("r-2", "SAVE20")]),
            ))
            .expect("update");
        screen
    }

    #[test]
    fn scope_toggle_refetches_from_the_start() {
        let mut screen = loaded_screen();
        let action = screen.handle_key_event(key(KeyCode::Tab)).expect("key");
        match action {
            Some(Action::FetchCoupons { request, scope }) => {
                assert_eq!(scope, RedemptionScope::Used);
                assert_eq!(request.skip, 0);
            }
            other => panic!("expected FetchCoupons, got {other:?}"),
        }
    }

    #[test]
    fn approve_confirms_with_the_coupon_code() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char('j'))).expect("key");
        let action = screen.handle_key_event(key(KeyCode::Char('a'))).expect("key");
        match action {
            Some(Action::ShowConfirm(ConfirmAction::ApproveCoupon { label, .. })) => {
                assert_eq!(label, "SAVE20");
            }
            other => panic!("expected ShowConfirm, got {other:?}"),
        }
    }

    #[test]
    fn review_keys_are_inert_in_the_used_scope() {
        let mut screen = loaded_screen();
        let fetch = screen.handle_key_event(key(KeyCode::Tab)).expect("key");
        let Some(Action::FetchCoupons { request, .. }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::CouponsPage(request, Ok(vec![redemption("r-3", "OLD")])))
            .expect("update");
        let action = screen.handle_key_event(key(KeyCode::Char('a'))).expect("key");
        assert!(action.is_none());
    }

    #[test]
    fn a_decision_refetches_the_queue() {
        let mut screen = loaded_screen();
        let action = screen
            .update(&Action::Mutated(ConfirmAction::ApproveCoupon {
                id: "r-1".into(),
                label: "SAVE10".into(),
            }))
            .expect("update");
        match action {
            Some(Action::FetchCoupons { request, scope }) => {
                assert_eq!(scope, RedemptionScope::PendingApproval);
                assert_eq!(request.skip, 0);
            }
            other => panic!("expected refetch, got {other:?}"),
        }
    }
}
