//! Orders screen — paged order table with a line-item detail pane.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell as TableCell, Paragraph, Row, Table};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::{Order, OrderStatus, PagePhase, Pager};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_age, fmt_money, truncate_text};

const ORDERS_TAKE: usize = 25;

pub struct OrdersScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    pager: Pager<Order>,
    selected: usize,
    detail_open: bool,
    error: Option<String>,
    scroll_offset: Cell<usize>,
}

impl OrdersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            pager: Pager::new(ORDERS_TAKE),
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
        Some(Action::FetchOrders {
            request: self.pager.first_page(),
        })
    }

    fn fetch_next(&mut self) -> Option<Action> {
        self.pager
            .next_page()
            .map(|request| Action::FetchOrders { request })
    }

    fn selected_order(&self) -> Option<&Order> {
        self.pager.items().get(self.selected)
    }

    fn status_cell(status: &OrderStatus) -> (String, Color) {
        match status {
            OrderStatus::Pending => ("pending".into(), theme::AMBER),
            OrderStatus::Processing => ("processing".into(), theme::SKY_BLUE),
            OrderStatus::Shipped => ("shipped".into(), theme::AQUA),
            OrderStatus::Delivered => ("delivered".into(), theme::MINT),
            OrderStatus::Cancelled => ("cancelled".into(), theme::SIGNAL_RED),
            other => (other.to_string(), theme::SOFT_WHITE),
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, order: &Order) {
        let customer = order.customer_name.as_deref().unwrap_or("unknown customer");
        let title = format!(" Order {} · {customer} ", order.id);
        let block = theme::panel_block(title, true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from("")];
        for item in &order.items {
            let variant = item
                .variant_name
                .as_deref()
                .map(|v| format!(" ({v})"))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}× ", item.quantity),
                    Style::default().fg(theme::SKY_BLUE),
                ),
                Span::styled(
                    format!("{}{variant}", truncate_text(&item.product_title, 42)),
                    Style::default().fg(theme::SOFT_WHITE),
                ),
                Span::styled(
                    format!("  {}", fmt_money(item.unit_price)),
                    Style::default().fg(theme::SKY_BLUE),
                ),
            ]));
        }
        lines.push(Line::from(""));
        if let Some(tracking) = order.tracking_number.as_deref() {
            lines.push(Line::from(vec![
                Span::styled("  Tracking  ", Style::default().fg(theme::SLATE)),
                Span::styled(tracking.to_string(), Style::default().fg(theme::AQUA)),
            ]));
        }
        if let Some(notes) = order.notes.as_deref() {
            lines.push(Line::from(vec![
                Span::styled("  Notes     ", Style::default().fg(theme::SLATE)),
                Span::styled(notes.to_string(), Style::default().fg(theme::SOFT_WHITE)),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("  Total     ", Style::default().fg(theme::SLATE)),
            Span::styled(
                fmt_money(order.total),
                Style::default().fg(theme::SKY_BLUE).add_modifier(ratatui::style::Modifier::BOLD),
            ),
        ]));

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        frame.render_widget(Paragraph::new(lines), layout[0]);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("  Esc ", theme::key_hint_key()),
                Span::styled("back", theme::key_hint()),
            ])),
            layout[1],
        );
    }
}

impl Component for OrdersScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.detail_open {
            if key.code == KeyCode::Esc {
                self.detail_open = false;
                return Ok(Some(Action::Render));
            }
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
            KeyCode::Enter => {
                if self.selected_order().is_some() {
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
            Action::OrdersPage(request, result) => match result {
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
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let suffix = if self.pager.has_more() { "+" } else { "" };
        let title = format!(" Orders ({}{suffix}) ", self.pager.len());
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
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints / error
        ])
        .split(table_area);

        if self.pager.phase() == PagePhase::FetchingFirst {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  Loading orders…",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else if self.pager.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled("  No orders yet", theme::key_hint()))),
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
                TableCell::from("  Order").style(theme::table_header()),
                TableCell::from("Customer").style(theme::table_header()),
                TableCell::from("Items").style(theme::table_header()),
                TableCell::from("Total").style(theme::table_header()),
                TableCell::from("Status").style(theme::table_header()),
                TableCell::from("Placed").style(theme::table_header()),
            ]);

            let body: Vec<Row> = rows_data
                .iter()
                .enumerate()
                .skip(offset)
                .take(viewport)
                .map(|(i, order)| {
                    let is_selected = i == self.selected;
                    let prefix = if is_selected { "▸ " } else { "  " };
                    let (status_str, status_color) = Self::status_cell(&order.status);
                    let row_style = if is_selected {
                        theme::table_selected()
                    } else {
                        theme::table_row()
                    };
                    Row::new(vec![
                        TableCell::from(format!(
                            "{prefix}{}",
                            truncate_text(&order.id.to_string(), 14)
                        )),
                        TableCell::from(
                            order.customer_name.clone().unwrap_or_else(|| "─".into()),
                        ),
                        TableCell::from(order.item_count().to_string()),
                        TableCell::from(fmt_money(order.total))
                            .style(Style::default().fg(theme::SKY_BLUE)),
                        TableCell::from(status_str).style(Style::default().fg(status_color)),
                        TableCell::from(fmt_age(order.created_at)),
                    ])
                    .style(row_style)
                })
                .collect();

            let table = Table::new(
                body,
                [
                    Constraint::Length(16),
                    Constraint::Fill(1),
                    Constraint::Length(6),
                    Constraint::Length(10),
                    Constraint::Length(11),
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
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("detail  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("refresh", theme::key_hint()),
            ];
            if self.pager.phase() == PagePhase::FetchingNext {
                hints.push(Span::styled("   fetching more…", theme::key_hint()));
            }
            frame.render_widget(Paragraph::new(Line::from(hints)), layout[1]);
        }

        if let (Some(detail_area), Some(order)) = (detail_area, self.selected_order()) {
            self.render_detail(frame, detail_area, order);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "orders"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn order(id: &str) -> Order {
        Order {
            id: id.into(),
            status: OrderStatus::Pending,
            total: 42.0,
            customer_id: None,
            customer_name: Some("Ada".into()),
            items: Vec::new(),
            tracking_number: None,
            notes: None,
            created_at: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn detail_opens_only_with_a_row_under_the_cursor() {
        let mut screen = OrdersScreen::new();
        screen.handle_key_event(key(KeyCode::Enter)).expect("key");
        assert!(!screen.detail_open, "no rows, nothing to open");

        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchOrders { request }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::OrdersPage(request, Ok(vec![order("ord-1")])))
            .expect("update");
        screen.handle_key_event(key(KeyCode::Enter)).expect("key");
        assert!(screen.detail_open);

        screen.handle_key_event(key(KeyCode::Esc)).expect("key");
        assert!(!screen.detail_open);
    }

    #[test]
    fn stale_pages_are_discarded() {
        let mut screen = OrdersScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchOrders { request: stale }) = fetch else {
            panic!("expected fetch");
        };
        // A refresh supersedes the in-flight request.
        let refetch = screen.handle_key_event(key(KeyCode::Char('r'))).expect("key");
        let Some(Action::FetchOrders { request: fresh }) = refetch else {
            panic!("expected refetch");
        };

        screen
            .update(&Action::OrdersPage(stale, Ok(vec![order("old")])))
            .expect("update");
        assert!(screen.pager.is_empty(), "stale page must not land");

        screen
            .update(&Action::OrdersPage(fresh, Ok(vec![order("new")])))
            .expect("update");
        assert_eq!(screen.pager.len(), 1);
    }
}
