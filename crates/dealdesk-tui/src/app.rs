//! The application shell: it owns every screen, pumps the action queue,
//! and draws the chrome around whichever screen has focus.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dealdesk_core::{Backoffice, Command, RedemptionScope, ReviewDecision};

use crate::action::{Action, ConfirmAction, DashboardData, Notification, ProbedCount};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{create_screens, settings::SettingsScreen};
use crate::theme;
use crate::tui::Tui;

/// Page size for the dashboard's work-queue probes.
const DASHBOARD_PROBE_TAKE: usize = 25;
/// How many orders the dashboard's recent-orders panel shows.
const RECENT_ORDERS_TAKE: usize = 8;

/// Session liveness, as surfaced in the status bar.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Owns the screens, the action queue, and everything drawn around them.
pub struct App {
    active_screen: ScreenId,
    /// Where Esc lands when the active screen has nothing left to close.
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection_status: ConnectionStatus,
    show_help: bool,
    searching: bool,
    search_query: String,
    /// Tracked so the tab bar can shorten its labels on narrow terminals.
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// `None` until a profile has passed its connection test.
    backoffice: Option<Backoffice>,
    /// Tears down the session bridge when the profile changes or we quit.
    data_cancel: CancellationToken,
    /// While set, y and n are the only keys that do anything.
    pending_confirm: Option<ConfirmAction>,
    toast: Option<(Notification, Instant)>,
}

impl App {
    /// Build the app with every tab screen registered. Without a
    /// [`Backoffice`] (first run, no profile yet) the settings form
    /// opens instead of the dashboard.
    pub fn new(backoffice: Option<Backoffice>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        let active_screen = match backoffice {
            Some(_) => ScreenId::Dashboard,
            None => {
                screens.insert(ScreenId::Settings, Box::new(SettingsScreen::new()));
                ScreenId::Settings
            }
        };

        Self {
            active_screen,
            previous_screen: None,
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            show_help: false,
            searching: false,
            search_query: String::new(),
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            backoffice,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            toast: None,
        }
    }

    /// Hand every screen the action sender, then focus the landing screen.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        self.set_screen_focus(self.active_screen, true);
        Ok(())
    }

    /// Launch the background task that feeds live data into the action
    /// queue until `data_cancel` fires.
    fn spawn_session_bridge(&self, backoffice: Backoffice) {
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            crate::data_bridge::run_session_bridge(backoffice, tx, cancel).await;
        });
    }

    /// Take over the terminal and cycle events through the action queue
    /// until something sets `running` to false.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_screens()?;

        if let Some(backoffice) = self.backoffice.clone() {
            self.spawn_session_bridge(backoffice);
        }

        // 4 Hz state tick, ~30 fps draw cadence.
        let mut events = EventReader::new(Duration::from_millis(250), Duration::from_millis(33));

        info!("event loop running");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Mouse(mouse) => self.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            // Work the queue dry before sleeping again; a frame is drawn
            // only when a Render action comes through.
            while let Ok(action) = self.action_rx.try_recv() {
                let draw = matches!(action, Action::Render);
                self.process_action(&action)?;
                if draw {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("event loop stopped");
        Ok(())
    }

    /// Turn a keystroke into an action. Captured modes and overlays get
    /// first refusal, then the global chords, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // The settings form reads every key itself. Ctrl+C stays reserved.
        if self.active_screen == ScreenId::Settings {
            if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
                return Ok(Some(Action::Quit));
            }
            return self.forward_key(key);
        }

        // A pending confirm swallows everything until it is answered.
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        // So does a screen with an open text prompt.
        let prompt_open = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|screen| screen.captures_input());
        if prompt_open {
            if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
                return Ok(Some(Action::Quit));
            }
            return self.forward_key(key);
        }

        // Search bar: the listing filters live as the query changes.
        if self.searching {
            return Ok(match key.code {
                KeyCode::Esc => {
                    self.search_query.clear();
                    Some(Action::CloseSearch)
                }
                KeyCode::Enter => Some(Action::SearchSubmit),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                _ => None,
            });
        }

        // Help overlay: the keys that open it also dismiss it.
        if self.show_help {
            let close = matches!(key.code, KeyCode::Esc | KeyCode::Char('?'));
            return Ok(close.then_some(Action::ToggleHelp));
        }

        // Chords. Anything unclaimed still reaches the screen below.
        if key.modifiers == KeyModifiers::CONTROL {
            if key.code == KeyCode::Char('c') {
                return Ok(Some(Action::Quit));
            }
            return self.forward_key(key);
        }
        if key.modifiers == KeyModifiers::SHIFT && key.code == KeyCode::BackTab {
            return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
        }
        if key.modifiers != KeyModifiers::NONE {
            return self.forward_key(key);
        }

        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::Quit)),
            KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
            KeyCode::Char('/') => Ok(Some(Action::OpenSearch)),
            KeyCode::Char(',') => Ok(Some(Action::OpenSettings)),
            KeyCode::Char(c @ '1'..='9') => match ScreenId::from_number(c as u8 - b'0') {
                Some(target) => Ok(Some(Action::SwitchScreen(target))),
                None => self.forward_key(key),
            },
            // Tab advances the tab strip unless the screen runs its own
            // sub-tabs (products, coupons).
            KeyCode::Tab => match self.forward_key(key)? {
                Some(action) => Ok(Some(action)),
                None => Ok(Some(Action::SwitchScreen(self.active_screen.next()))),
            },
            // Esc closes whatever the screen has open before walking back.
            KeyCode::Esc => match self.forward_key(key)? {
                Some(action) => Ok(Some(action)),
                None => Ok(Some(Action::GoBack)),
            },
            _ => self.forward_key(key),
        }
    }

    /// Pass a key the app did not claim to the screen holding focus.
    fn forward_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    /// Mouse input always belongs to the focused screen.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_mouse_event(mouse),
            None => Ok(None),
        }
    }

    /// Apply one action to app state, spawning work or fanning it out to
    /// the screens as needed.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => self.terminal_size = (*w, *h),

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!(from = %self.active_screen, to = %target, "switch screen");
                    self.set_screen_focus(self.active_screen, false);
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    self.set_screen_focus(*target, true);
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => self.show_help = !self.show_help,

            Action::OpenSearch => {
                self.searching = true;
                self.search_query.clear();
            }

            Action::CloseSearch | Action::SearchSubmit => {
                self.searching = false;
                // Dropping the bar clears the filter; submitting keeps it.
                if matches!(action, Action::CloseSearch) {
                    self.search_query.clear();
                }
                self.forward_to(self.active_screen, action)?;
            }

            // Connection changes recolor the status dot and fan out so
            // screens can kick off their first fetch.
            Action::Connected => {
                self.connection_status = ConnectionStatus::Connected;
                self.broadcast(action)?;
            }

            Action::Disconnected(reason) => {
                self.connection_status = ConnectionStatus::Disconnected;
                if !reason.is_empty() {
                    self.action_tx
                        .send(Action::Notify(Notification::error(format!(
                            "Disconnected: {reason}"
                        ))))?;
                }
                self.broadcast(action)?;
            }

            Action::Reconnecting => {
                self.connection_status = ConnectionStatus::Reconnecting;
                self.broadcast(action)?;
            }

            Action::Render => {}

            Action::Tick => {
                // Toasts retire themselves after a few seconds.
                let stale = self
                    .toast
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > Duration::from_secs(3));
                if stale {
                    self.toast = None;
                }
                // The settings throbber animates off the tick.
                if self.active_screen == ScreenId::Settings {
                    self.forward_to(ScreenId::Settings, action)?;
                }
            }

            // Store snapshots and page results keep every screen current,
            // not just the one that asked.
            Action::CategoriesUpdated(_)
            | Action::TopDealsUpdated(_)
            | Action::PlansUpdated(_)
            | Action::ProfileUpdated(_)
            | Action::ProductsPage(..)
            | Action::CouponsPage(..)
            | Action::OrdersPage(..)
            | Action::VendorsPage(..)
            | Action::InfluencersPage(..)
            | Action::MediaPage(..)
            | Action::DashboardUpdated(_)
            | Action::Mutated(_) => {
                self.broadcast(action)?;
            }

            // ── Paged fetches ─────────────────────────────────────────

            Action::FetchProducts { request, filter } => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                let request = *request;
                let filter = filter.clone();
                tokio::spawn(async move {
                    let result = backoffice
                        .fetch_products(&filter, request.take, request.skip)
                        .await;
                    let _ = tx.send(Action::ProductsPage(
                        request,
                        result.map_err(|e| format!("{e}")),
                    ));
                });
            }

            Action::FetchCoupons { request, scope } => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                let request = *request;
                let scope = *scope;
                tokio::spawn(async move {
                    let result = backoffice
                        .fetch_redemptions(scope, request.take, request.skip)
                        .await;
                    let _ = tx.send(Action::CouponsPage(
                        request,
                        result.map_err(|e| format!("{e}")),
                    ));
                });
            }

            Action::FetchOrders { request } => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                let request = *request;
                tokio::spawn(async move {
                    let result = backoffice.fetch_orders(request.take, request.skip).await;
                    let _ = tx.send(Action::OrdersPage(
                        request,
                        result.map_err(|e| format!("{e}")),
                    ));
                });
            }

            Action::FetchVendors { request, search } => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                let request = *request;
                let search = search.clone();
                tokio::spawn(async move {
                    let result = backoffice
                        .fetch_vendors(search.as_deref(), request.take, request.skip)
                        .await;
                    let _ = tx.send(Action::VendorsPage(
                        request,
                        result.map_err(|e| format!("{e}")),
                    ));
                });
            }

            Action::FetchInfluencers { request, search } => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                let request = *request;
                let search = search.clone();
                tokio::spawn(async move {
                    let result = backoffice
                        .fetch_influencers(search.as_deref(), request.take, request.skip)
                        .await;
                    let _ = tx.send(Action::InfluencersPage(
                        request,
                        result.map_err(|e| format!("{e}")),
                    ));
                });
            }

            Action::FetchMedia { request } => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                let request = *request;
                tokio::spawn(async move {
                    let result = backoffice.fetch_media(request.take, request.skip).await;
                    let _ = tx.send(Action::MediaPage(
                        request,
                        result.map_err(|e| format!("{e}")),
                    ));
                });
            }

            Action::FetchDashboard => self.fetch_dashboard(),

            // ── Reference data ────────────────────────────────────────

            Action::RefreshCategories => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    match backoffice.refresh_categories().await {
                        Ok(()) => {
                            let _ = tx.send(Action::CategoriesUpdated(backoffice.categories()));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
                        }
                    }
                });
            }

            Action::RefreshPlans => {
                let Some(backoffice) = self.backoffice.clone() else {
                    return Ok(());
                };
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    match backoffice.refresh_plans().await {
                        Ok(()) => {
                            let _ = tx.send(Action::PlansUpdated(backoffice.plans_snapshot()));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
                        }
                    }
                });
            }

            // ── Mutations and confirms ────────────────────────────────

            Action::SaveCategoryOrder(order) => {
                self.execute_command(
                    Command::SaveCategoryOrder {
                        order: order.clone(),
                    },
                    "Saved category order".into(),
                    vec![Action::RefreshCategories],
                );
            }

            Action::SaveProductOrder(order) => {
                self.execute_command(
                    Command::SaveProductOrder {
                        order: order.clone(),
                    },
                    "Saved product order".into(),
                    Vec::new(),
                );
            }

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }

            Action::ConfirmNo => self.pending_confirm = None,

            // ── Settings and session swap ─────────────────────────────

            Action::OpenSettings => {
                if self.active_screen != ScreenId::Settings {
                    let mut screen = SettingsScreen::new();
                    screen.init(self.action_tx.clone())?;
                    self.screens.insert(ScreenId::Settings, Box::new(screen));
                    self.set_screen_focus(self.active_screen, false);
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = ScreenId::Settings;
                    self.set_screen_focus(ScreenId::Settings, true);
                }
            }

            Action::CloseSettings => {
                // On first run there is no screen behind the form yet.
                if self.backoffice.is_some() {
                    self.screens.remove(&ScreenId::Settings);
                    let target = self.previous_screen.take().unwrap_or(ScreenId::Dashboard);
                    self.active_screen = target;
                    self.set_screen_focus(target, true);
                }
            }

            Action::SettingsTestResult(_) => {
                self.forward_to(ScreenId::Settings, action)?;
            }

            Action::SettingsApply { config, .. } => {
                // Retire the old bridge before standing up its replacement.
                self.data_cancel.cancel();
                self.data_cancel = CancellationToken::new();

                let backoffice = Backoffice::new(*config.clone());
                self.backoffice = Some(backoffice.clone());
                self.spawn_session_bridge(backoffice);

                self.screens.remove(&ScreenId::Settings);
                self.previous_screen = None;
                self.active_screen = ScreenId::Dashboard;
                self.set_screen_focus(ScreenId::Dashboard, true);

                self.action_tx.send(Action::Notify(Notification::success(
                    "Profile saved, reconnecting\u{2026}",
                )))?;
            }

            Action::Notify(n) => self.toast = Some((n.clone(), Instant::now())),

            Action::DismissNotification => self.toast = None,

            // Everything else concerns the active screen alone.
            other => self.forward_to(self.active_screen, other)?,
        }

        Ok(())
    }

    /// Let one screen observe an action, re-queueing any follow-up.
    fn forward_to(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Show an action to every tab screen, in tab order.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for id in ScreenId::ALL {
            self.forward_to(id, action)?;
        }
        Ok(())
    }

    fn set_screen_focus(&mut self, id: ScreenId, focused: bool) {
        if let Some(screen) = self.screens.get_mut(&id) {
            screen.set_focused(focused);
        }
    }

    // ── Backoffice work ───────────────────────────────────────────

    /// Run a backoffice command off the UI thread. The outcome arrives
    /// as a toast; follow-ups fire only after success.
    fn execute_command(&self, command: Command, success_msg: String, follow_ups: Vec<Action>) {
        let Some(backoffice) = self.backoffice.clone() else {
            let _ = self
                .action_tx
                .send(Action::Notify(Notification::error("No active session")));
            return;
        };
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match backoffice.execute(command).await {
                Err(e) => {
                    warn!(error = %e, "backoffice command failed");
                    let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
                }
                Ok(_) => {
                    let _ = tx.send(Action::Notify(Notification::success(success_msg)));
                    for follow_up in follow_ups {
                        let _ = tx.send(follow_up);
                    }
                }
            }
        });
    }

    /// A confirmed dialog becomes a [`Command`]. Once it lands, the
    /// confirm is rebroadcast as [`Action::Mutated`] so the owning
    /// screen refetches its listing.
    fn execute_confirm(&self, confirm: ConfirmAction) {
        let (command, success_msg) = match &confirm {
            ConfirmAction::DeleteCategory { id, name } => (
                Command::DeleteCategory { id: id.clone() },
                format!("Deleted {name}"),
            ),
            ConfirmAction::DeleteProduct { id, name } => (
                Command::DeleteProduct { id: id.clone() },
                format!("Deleted {name}"),
            ),
            ConfirmAction::ApproveVendor { id, name } => (
                Command::ApproveVendor { id: id.clone() },
                format!("Approved {name}"),
            ),
            ConfirmAction::BlockVendor { id, name } => (
                Command::BlockVendor { id: id.clone() },
                format!("Blocked {name}"),
            ),
            ConfirmAction::ApproveInfluencer { id, name } => (
                Command::ApproveInfluencer { id: id.clone() },
                format!("Approved {name}"),
            ),
            ConfirmAction::BlockInfluencer { id, name } => (
                Command::BlockInfluencer { id: id.clone() },
                format!("Blocked {name}"),
            ),
            ConfirmAction::CreditWallet { id, name, amount } => (
                Command::CreditWallet {
                    user_id: id.clone(),
                    amount: *amount,
                },
                format!("Credited ${amount:.2} to {name}"),
            ),
            ConfirmAction::ApproveCoupon { id, label } => (
                Command::ReviewRedemption {
                    id: id.clone(),
                    decision: ReviewDecision::Approve,
                },
                format!("Approved {label}"),
            ),
            ConfirmAction::MarkCouponUsed { id, label } => (
                Command::ReviewRedemption {
                    id: id.clone(),
                    decision: ReviewDecision::MarkUsed,
                },
                format!("Marked {label} used"),
            ),
            ConfirmAction::DeletePlan { id, name } => (
                Command::DeletePlan { id: id.clone() },
                format!("Deleted {name}"),
            ),
            ConfirmAction::DeleteMedia { id, name } => (
                Command::DeleteMedia { id: id.clone() },
                format!("Deleted {name}"),
            ),
        };

        let mut follow_ups = vec![Action::Mutated(confirm.clone())];
        // The category tree is reference data; reload it after a delete.
        if matches!(confirm, ConfirmAction::DeleteCategory { .. }) {
            follow_ups.push(Action::RefreshCategories);
        }

        self.execute_command(command, success_msg, follow_ups);
    }

    /// Refresh the dashboard: top deals and profile, then concurrent
    /// first-page probes for the work queue and the order feed.
    fn fetch_dashboard(&self) {
        let Some(backoffice) = self.backoffice.clone() else {
            return;
        };
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = backoffice.refresh_top_deals().await {
                warn!(error = %e, "top deals refresh failed");
            } else {
                let _ = tx.send(Action::TopDealsUpdated(backoffice.top_deals()));
            }
            // The profile watch pushes the update through the bridge.
            if let Err(e) = backoffice.refresh_profile().await {
                warn!(error = %e, "profile refresh failed");
            }

            let take = DASHBOARD_PROBE_TAKE;
            let (coupons, vendors, influencers, orders) = tokio::join!(
                backoffice.fetch_redemptions(RedemptionScope::PendingApproval, take, 0),
                backoffice.fetch_vendors(None, take, 0),
                backoffice.fetch_influencers(None, take, 0),
                backoffice.fetch_orders(RECENT_ORDERS_TAKE, 0),
            );

            let mut data = DashboardData::default();
            if let Ok(rows) = coupons {
                data.pending_coupons = ProbedCount::new(rows.len(), rows.len() >= take);
            }
            if let Ok(rows) = vendors {
                let pending = rows.iter().filter(|v| v.standing() == "pending").count();
                data.pending_vendors = ProbedCount::new(pending, rows.len() >= take);
            }
            if let Ok(rows) = influencers {
                let pending = rows.iter().filter(|i| i.standing() == "pending").count();
                data.pending_influencers = ProbedCount::new(pending, rows.len() >= take);
            }
            if let Ok(rows) = orders {
                data.recent_orders = rows;
            }

            let _ = tx.send(Action::DashboardUpdated(data));
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    /// Draw one frame: the active screen, the chrome, then any overlays.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // The settings form paints the whole frame itself.
        if self.active_screen == ScreenId::Settings {
            if let Some(form) = self.screens.get(&ScreenId::Settings) {
                form.render(frame, area);
            }
            return;
        }

        let [content, tab_row, status_row] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content);
        }
        self.render_tab_bar(frame, tab_row);
        self.render_status_bar(frame, status_row);

        // Overlays stack back to front: toast, confirm, help.
        if let Some((notif, _)) = &self.toast {
            self.render_notification(frame, area, notif);
        }
        if let Some(confirm) = &self.pending_confirm {
            self.render_confirm_dialog(frame, area, confirm);
        }
        if self.show_help {
            self.render_help_overlay(frame, area);
        }
    }

    /// The numbered tab strip along the bottom.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        // Short labels below 120 columns keep all nine tabs visible.
        let narrow = self.terminal_size.0 < 120;
        let selected = ScreenId::ALL
            .iter()
            .position(|&id| id == self.active_screen);

        let titles = ScreenId::ALL.iter().map(|&id| {
            let label = if narrow { id.label_short() } else { id.label() };
            let style = if id == self.active_screen {
                theme::tab_active()
            } else {
                theme::tab_inactive()
            };
            Line::styled(format!(" {} {} ", id.number(), label), style)
        });

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    /// Connection dot plus key hints; doubles as the search input row.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = if self.searching {
            Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::MAGENTA)),
                Span::styled(self.search_query.as_str(), Style::default().fg(theme::AQUA)),
                Span::styled("\u{2588}", Style::default().fg(theme::AQUA)),
                Span::styled("  Esc ", theme::key_hint_key()),
                Span::styled("cancel  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("apply", theme::key_hint()),
            ])
        } else {
            let (dot, tone) = match self.connection_status {
                ConnectionStatus::Connected => ("\u{25cf} connected", theme::MINT),
                ConnectionStatus::Disconnected => ("\u{25cb} disconnected", theme::SIGNAL_RED),
                ConnectionStatus::Reconnecting => ("\u{25d0} reconnecting", theme::AMBER),
                ConnectionStatus::Connecting => ("\u{25d0} connecting", theme::AMBER),
            };

            let mut spans = vec![
                Span::raw(" "),
                Span::styled(dot, Style::default().fg(tone)),
                Span::styled(" \u{2502} ", theme::key_hint()),
            ];
            for (kb, what) in [("?", "help"), ("/", "search"), (",", "settings"), ("q", "quit")] {
                spans.push(Span::styled(format!("{kb} "), theme::key_hint_key()));
                spans.push(Span::styled(format!("{what}  "), theme::key_hint()));
            }
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Centered keymap reference.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        const NAVIGATION: [(&str, &str); 6] = [
            ("1-9", "Jump to screen"),
            ("Tab", "Next screen / next sub-tab"),
            ("j/k \u{2191}/\u{2193}", "Move up / down"),
            ("g/G", "Top / bottom"),
            ("Enter", "Open detail"),
            ("Esc", "Close pane / previous tab"),
        ];
        const ACTIONS: [(&str, &str); 7] = [
            ("a / b", "Approve / block partner"),
            ("u", "Mark coupon used"),
            ("J/K", "Reorder row"),
            ("s", "Save order"),
            ("w", "Credit wallet"),
            ("d", "Delete"),
            ("r", "Refresh listing"),
        ];
        const GLOBAL: [(&str, &str); 4] = [
            ("/", "Search"),
            ("?", "This help"),
            (",", "Settings"),
            ("q", "Quit"),
        ];
        let sections: [(&str, &[(&str, &str)]); 3] = [
            ("Navigation", &NAVIGATION),
            ("Actions", &ACTIONS),
            ("Global", &GLOBAL),
        ];

        let panel = centered_rect(area, 46, 28);
        let inner = overlay_panel(
            frame,
            panel,
            Some(" Keyboard Shortcuts "),
            theme::border_focused(),
        );

        let mut lines = vec![Line::default()];
        for (heading, rows) in sections {
            lines.push(Line::styled(
                format!("  {heading}"),
                Style::default().fg(theme::AQUA),
            ));
            for &(kb, what) in rows {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {kb:<9} "), theme::key_hint_key()),
                    Span::styled(what, theme::key_hint()),
                ]));
            }
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "  Esc or ? closes this panel",
            theme::key_hint(),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Small centered y/n dialog guarding destructive operations.
    #[allow(clippy::unused_self)]
    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog = centered_rect(area, 54, 5);
        let inner = overlay_panel(
            frame,
            dialog,
            Some(" Confirm "),
            Style::default().fg(theme::AMBER),
        );

        let text = vec![
            Line::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::SOFT_WHITE),
            ),
            Line::default(),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("yes    ", theme::key_hint()),
                Span::styled("n/Esc ", theme::key_hint_key()),
                Span::styled("no", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Toast in the bottom-right corner, one row above the status bar.
    #[allow(clippy::unused_self)]
    fn render_notification(&self, frame: &mut Frame, area: Rect, notif: &Notification) {
        use crate::action::NotificationLevel;

        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60);
        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(5);
        let toast = Rect::new(area.x + x, area.y + y, width, 3);

        let (accent, icon) = match notif.level {
            NotificationLevel::Success => (theme::MINT, "\u{2713}"),
            NotificationLevel::Error => (theme::SIGNAL_RED, "\u{2717}"),
            NotificationLevel::Warning => (theme::AMBER, "!"),
            NotificationLevel::Info => (theme::AQUA, "\u{b7}"),
        };

        let inner = overlay_panel(frame, toast, None, Style::default().fg(accent));
        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(accent)),
            Span::styled(
                notif.message.as_str(),
                Style::default().fg(theme::SOFT_WHITE),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

// ── Overlay scaffolding ───────────────────────────────────────────

/// A `width`-by-`height` rect centered in `area`, shrunk to keep a margin.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Wash the backdrop dark and draw a rounded panel; returns the inner
/// area to render content into.
fn overlay_panel(frame: &mut Frame, area: Rect, title: Option<&str>, border: Style) -> Rect {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        area,
    );

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    if let Some(title) = title {
        block = block.title(title).title_style(theme::title_style());
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}
