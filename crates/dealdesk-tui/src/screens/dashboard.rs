//! Dashboard screen — the work queue and marketplace pulse at a glance.
//!
//! Counts come from cheap first-page probes fanned out by the app, so a
//! full queue reads "25+" rather than an exact total. Top deals and the
//! catalog summary ride on the shared reference-data snapshots.

use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell as TableCell, Paragraph, Row, Table};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::{AdminProfile, Category, Deal, DealStatus, Plan};

use crate::action::{Action, DashboardData, ProbedCount};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_age, fmt_money, truncate_text};

/// Age label for the last data refresh, matching what the toasts use.
fn refresh_age_str(last: Option<Instant>) -> String {
    match last {
        None => "never".to_string(),
        Some(at) => {
            let secs = at.elapsed().as_secs();
            if secs < 5 {
                "just now".to_string()
            } else if secs < 60 {
                format!("{secs}s ago")
            } else {
                format!("{}m ago", secs / 60)
            }
        }
    }
}

pub struct DashboardScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    categories: Arc<Vec<Category>>,
    top_deals: Arc<Vec<Deal>>,
    plans: Arc<Vec<Arc<Plan>>>,
    profile: Option<Arc<AdminProfile>>,
    data: DashboardData,
    last_refresh: Option<Instant>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            categories: Arc::new(Vec::new()),
            top_deals: Arc::new(Vec::new()),
            plans: Arc::new(Vec::new()),
            profile: None,
            data: DashboardData::default(),
            last_refresh: None,
        }
    }

    fn queue_line(label: &'static str, count: ProbedCount) -> Line<'static> {
        let color = if count.count == 0 {
            theme::MINT
        } else {
            theme::AMBER
        };
        Line::from(vec![
            Span::styled(format!("  {label:<22}"), Style::default().fg(theme::SOFT_WHITE)),
            Span::styled(count.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    }

    fn render_work_queue(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Review Queue ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::from(""),
            Self::queue_line("Coupons pending", self.data.pending_coupons),
            Self::queue_line("Vendors pending", self.data.pending_vendors),
            Self::queue_line("Influencers pending", self.data.pending_influencers),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Marketplace ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let admin = self.profile.as_ref().map_or_else(
            || "—".to_string(),
            |p| {
                let role = p.role.as_deref().unwrap_or("admin");
                format!("{} ({role})", p.name)
            },
        );

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Signed in as  ", Style::default().fg(theme::SLATE)),
                Span::styled(admin, Style::default().fg(theme::AQUA)),
            ]),
            Line::from(vec![
                Span::styled("  Categories    ", Style::default().fg(theme::SLATE)),
                Span::styled(
                    self.categories.len().to_string(),
                    Style::default().fg(theme::SKY_BLUE),
                ),
                Span::styled("    Plans  ", Style::default().fg(theme::SLATE)),
                Span::styled(
                    self.plans.len().to_string(),
                    Style::default().fg(theme::SKY_BLUE),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Refreshed     ", Style::default().fg(theme::SLATE)),
                Span::styled(
                    refresh_age_str(self.last_refresh),
                    Style::default().fg(theme::SOFT_WHITE),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn deal_status_color(status: &DealStatus) -> Color {
        match status {
            DealStatus::Active => theme::MINT,
            DealStatus::Inactive => theme::SLATE,
            DealStatus::Expired => theme::SIGNAL_RED,
            _ => theme::SOFT_WHITE,
        }
    }

    fn render_top_deals(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Top Deals ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.top_deals.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled("  No deals yet", theme::key_hint()))),
                inner,
            );
            return;
        }

        let header = Row::new(vec![
            TableCell::from("Deal").style(theme::table_header()),
            TableCell::from("Vendor").style(theme::table_header()),
            TableCell::from("Status").style(theme::table_header()),
            TableCell::from("Uses").style(theme::table_header()),
        ]);
        let rows: Vec<Row> = self
            .top_deals
            .iter()
            .take(usize::from(inner.height.saturating_sub(1)))
            .map(|deal| {
                Row::new(vec![
                    TableCell::from(truncate_text(&deal.title, 30)),
                    TableCell::from(deal.vendor_name.clone().unwrap_or_else(|| "─".into())),
                    TableCell::from(deal.status.to_string())
                        .style(Style::default().fg(Self::deal_status_color(&deal.status))),
                    TableCell::from(deal.redemption_count.to_string())
                        .style(Style::default().fg(theme::SKY_BLUE)),
                ])
                .style(theme::table_row())
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Length(9),
                Constraint::Length(6),
            ],
        )
        .header(header);
        frame.render_widget(table, inner);
    }

    fn render_recent_orders(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Recent Orders ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.data.recent_orders.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled("  No orders yet", theme::key_hint()))),
                inner,
            );
            return;
        }

        let header = Row::new(vec![
            TableCell::from("Order").style(theme::table_header()),
            TableCell::from("Customer").style(theme::table_header()),
            TableCell::from("Total").style(theme::table_header()),
            TableCell::from("Placed").style(theme::table_header()),
        ]);
        let rows: Vec<Row> = self
            .data
            .recent_orders
            .iter()
            .take(usize::from(inner.height.saturating_sub(1)))
            .map(|order| {
                Row::new(vec![
                    TableCell::from(truncate_text(&order.id.to_string(), 12)),
                    TableCell::from(order.customer_name.clone().unwrap_or_else(|| "─".into())),
                    TableCell::from(fmt_money(order.total))
                        .style(Style::default().fg(theme::SKY_BLUE)),
                    TableCell::from(fmt_age(order.created_at)),
                ])
                .style(theme::table_row())
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Fill(1),
                Constraint::Length(10),
                Constraint::Length(10),
            ],
        )
        .header(header);
        frame.render_widget(table, inner);
    }
}

impl Component for DashboardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => Ok(Some(Action::FetchDashboard)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Connected => return Ok(Some(Action::FetchDashboard)),
            Action::CategoriesUpdated(categories) => {
                self.categories = Arc::clone(categories);
            }
            Action::TopDealsUpdated(deals) => {
                self.top_deals = Arc::clone(deals);
                self.last_refresh = Some(Instant::now());
            }
            Action::PlansUpdated(plans) => {
                self.plans = Arc::clone(plans);
            }
            Action::ProfileUpdated(profile) => {
                self.profile.clone_from(profile);
            }
            Action::DashboardUpdated(data) => {
                self.data = data.clone();
                self.last_refresh = Some(Instant::now());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        // Tiny terminals get a one-line digest instead of panels.
        if area.height < 12 {
            let digest = format!(
                "  {} coupons · {} vendors · {} influencers pending — refreshed {}",
                self.data.pending_coupons,
                self.data.pending_vendors,
                self.data.pending_influencers,
                refresh_age_str(self.last_refresh),
            );
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    digest,
                    Style::default().fg(theme::SOFT_WHITE),
                ))),
                area,
            );
            return;
        }

        let rows = Layout::vertical([Constraint::Length(7), Constraint::Min(8)]).split(area);
        let top = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);
        let bottom = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);

        self.render_work_queue(frame, top[0]);
        self.render_overview(frame, top[1]);
        self.render_top_deals(frame, bottom[0]);
        self.render_recent_orders(frame, bottom[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "dashboard"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn connect_kicks_off_a_dashboard_probe() {
        let mut screen = DashboardScreen::new();
        let action = screen.update(&Action::Connected).expect("update");
        assert!(matches!(action, Some(Action::FetchDashboard)));
    }

    #[test]
    fn refresh_age_goes_from_never_to_just_now() {
        assert_eq!(refresh_age_str(None), "never");
        assert_eq!(refresh_age_str(Some(Instant::now())), "just now");
    }
}
