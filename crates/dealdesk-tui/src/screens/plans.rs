//! Plans screen — subscription plan cards.
//!
//! Plans are reference data: every mutation writes through the shared
//! cache, so this screen only ever renders the latest snapshot pushed by
//! the session bridge and never fetches on its own.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;
use tui_widget_list::{ListBuilder, ListState, ListView};

use dealdesk_core::Plan;

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::truncate_text;

const CARD_HEIGHT: u16 = 4;

pub struct PlansScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    plans: Arc<Vec<Arc<Plan>>>,
    selected: usize,
    loading: bool,
}

impl PlansScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            plans: Arc::new(Vec::new()),
            selected: 0,
            loading: true,
        }
    }

    fn select(&mut self, idx: usize) {
        let len = self.plans.len();
        self.selected = if len == 0 { 0 } else { idx.min(len - 1) };
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.plans.len();
        if len == 0 {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.select(next as usize);
    }

    fn selected_plan(&self) -> Option<&Arc<Plan>> {
        self.plans.get(self.selected)
    }

    fn plan_card(plan: &Plan, is_selected: bool) -> Paragraph<'static> {
        let prefix = if is_selected { "▸ " } else { "  " };
        let mut name_spans = vec![Span::styled(
            format!("{prefix}{}", plan.name),
            Style::default().fg(theme::AQUA).add_modifier(Modifier::BOLD),
        )];
        if !plan.is_active {
            name_spans.push(Span::styled(
                "  inactive",
                Style::default().fg(theme::SLATE),
            ));
        }

        let mut terms = plan.price_label();
        if let Some(days) = plan.trial_days {
            terms.push_str(&format!(" · {days}d trial"));
        }
        if let Some(max) = plan.max_deals {
            terms.push_str(&format!(" · up to {max} deals"));
        }

        let description = plan
            .description
            .as_deref()
            .map_or_else(String::new, |d| truncate_text(d, 64));

        let lines = vec![
            Line::from(name_spans),
            Line::from(Span::styled(
                format!("  {terms}"),
                Style::default().fg(theme::SKY_BLUE),
            )),
            Line::from(Span::styled(
                format!("  {description}"),
                Style::default().fg(theme::SLATE),
            )),
            Line::from(""),
        ];

        let card = Paragraph::new(lines);
        if is_selected {
            card.style(Style::default().bg(theme::BG_HIGHLIGHT))
        } else {
            card
        }
    }
}

impl Component for PlansScreen {
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
                if let Some(last) = self.plans.len().checked_sub(1) {
                    self.select(last);
                }
                Ok(None)
            }
            KeyCode::Char('d') => {
                if let Some(plan) = self.selected_plan() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::DeletePlan {
                        id: plan.id.clone(),
                        name: plan.name.clone(),
                    })))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('r') => Ok(Some(Action::RefreshPlans)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::PlansUpdated(plans) = action {
            self.plans = Arc::clone(plans);
            self.loading = false;
            self.select(self.selected);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Plans ({}) ", self.plans.len());
        let block = theme::panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // cards
            Constraint::Length(1), // hints
        ])
        .split(inner);

        if self.loading {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  Loading plans…",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else if self.plans.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled("  No plans yet", theme::key_hint()))),
                layout[0],
            );
        } else {
            let plans = Arc::clone(&self.plans);
            let selected = self.selected;
            let builder = ListBuilder::new(move |context| {
                let plan = &plans[context.index];
                (Self::plan_card(plan, context.index == selected), CARD_HEIGHT)
            });
            let view = ListView::new(builder, self.plans.len());
            let mut state = ListState::default();
            state.select(Some(self.selected));
            frame.render_stateful_widget(view, layout[0], &mut state);
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
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
        "plans"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use dealdesk_core::BillingInterval;

    use super::*;

    fn plan(id: &str, name: &str) -> Arc<Plan> {
        Arc::new(Plan {
            id: id.into(),
            name: name.into(),
            description: None,
            amount: 29.99,
            interval: BillingInterval::Month,
            is_active: true,
            trial_days: None,
            max_deals: None,
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn snapshot_updates_keep_the_selection_in_range() {
        let mut screen = PlansScreen::new();
        screen
            .update(&Action::PlansUpdated(Arc::new(vec![
                plan("p-1", "Starter"),
                plan("p-2", "Growth"),
                plan("p-3", "Scale"),
            ])))
            .expect("update");
        screen.handle_key_event(key(KeyCode::Char('G'))).expect("key");
        assert_eq!(screen.selected, 2);

        // The snapshot shrank underneath the cursor.
        screen
            .update(&Action::PlansUpdated(Arc::new(vec![plan("p-1", "Starter")])))
            .expect("update");
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn delete_goes_through_the_confirm_dialog() {
        let mut screen = PlansScreen::new();
        screen
            .update(&Action::PlansUpdated(Arc::new(vec![plan("p-1", "Starter")])))
            .expect("update");
        let action = screen.handle_key_event(key(KeyCode::Char('d'))).expect("key");
        match action {
            Some(Action::ShowConfirm(ConfirmAction::DeletePlan { name, .. })) => {
                assert_eq!(name, "Starter");
            }
            other => panic!("expected ShowConfirm, got {other:?}"),
        }
    }
}
