//! Settings screen — edit the backoffice profile from within the TUI.
//!
//! Opened with `,`, not in the tab bar; also shown on first run when no
//! usable profile exists. Esc cancels without saving. On a successful
//! connection test, saves the profile and emits `SettingsApply` so the
//! app can reconnect with the new configuration.

use std::path::PathBuf;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::Backoffice;

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;

// ── Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsState {
    Editing,
    Testing,
}

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsField {
    ApiUrl,
    IdentityUrl,
    Email,
    Password,
    Insecure,
}

impl SettingsField {
    /// All fields in tab order.
    const ALL: [SettingsField; 5] = [
        Self::ApiUrl,
        Self::IdentityUrl,
        Self::Email,
        Self::Password,
        Self::Insecure,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::ApiUrl => "  API URL",
            Self::IdentityUrl => "  Identity URL",
            Self::Email => "  Email",
            Self::Password => "  Password",
            Self::Insecure => "Skip TLS verification (insecure)",
        }
    }

    /// Screen rows the field occupies: label plus bordered box for text
    /// inputs, a single line for the toggle.
    fn rows(self) -> u16 {
        match self {
            Self::Insecure => 1,
            _ => 4,
        }
    }
}

// ── Component ────────────────────────────────────────────────────────

pub struct SettingsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    state: SettingsState,
    active_field: SettingsField,
    // Form data
    api_url_input: String,
    identity_url_input: String,
    email_input: String,
    password_input: String,
    insecure: bool,
    show_password: bool,
    // Profile name we're editing
    profile_name: String,
    // Profile fields the form does not edit, carried through on save
    saved_refresh_token: Option<String>,
    saved_ca_cert: Option<PathBuf>,
    saved_timeout_secs: Option<u64>,
    saved_default_take: Option<usize>,
    // Test state
    test_error: Option<String>,
    throbber_state: throbber_widgets_tui::ThrobberState,
    // Last full-screen area, for mouse hit-testing
    last_area: std::cell::Cell<Rect>,
}

impl SettingsScreen {
    /// Create a new settings screen, pre-populated from the saved config.
    pub fn new() -> Self {
        let mut screen = Self::blank();
        screen.load_from_config();
        screen
    }

    fn blank() -> Self {
        Self {
            focused: false,
            action_tx: None,
            state: SettingsState::Editing,
            active_field: SettingsField::ApiUrl,
            api_url_input: String::new(),
            identity_url_input: String::new(),
            email_input: String::new(),
            password_input: String::new(),
            insecure: false,
            show_password: false,
            profile_name: "default".into(),
            saved_refresh_token: None,
            saved_ca_cert: None,
            saved_timeout_secs: None,
            saved_default_take: None,
            test_error: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            last_area: std::cell::Cell::new(Rect::default()),
        }
    }

    /// Pre-populate form fields from the saved config file.
    fn load_from_config(&mut self) {
        let cfg = dealdesk_config::load_config_or_default();
        let profile_name = cfg.default_profile.as_deref().unwrap_or("default");
        let Some(profile) = cfg.profiles.get(profile_name) else {
            return;
        };

        self.profile_name = profile_name.to_string();
        self.api_url_input.clone_from(&profile.api_url);
        self.identity_url_input.clone_from(&profile.identity_url);
        self.insecure = profile.insecure.unwrap_or(false);

        if let Some(ref email) = profile.email {
            self.email_input.clone_from(email);
        }
        if let Some(ref password) = profile.password {
            self.password_input.clone_from(password);
        }

        self.saved_refresh_token.clone_from(&profile.refresh_token);
        self.saved_ca_cert.clone_from(&profile.ca_cert);
        self.saved_timeout_secs = profile.timeout_secs;
        self.saved_default_take = profile.default_take;
    }

    // ── Field navigation ─────────────────────────────────────────────

    fn focus_next(&mut self) {
        let pos = SettingsField::ALL
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field = SettingsField::ALL[(pos + 1) % SettingsField::ALL.len()];
    }

    fn focus_prev(&mut self) {
        let pos = SettingsField::ALL
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field =
            SettingsField::ALL[(pos + SettingsField::ALL.len() - 1) % SettingsField::ALL.len()];
    }

    // ── Active input ─────────────────────────────────────────────────

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            SettingsField::ApiUrl => Some(&mut self.api_url_input),
            SettingsField::IdentityUrl => Some(&mut self.identity_url_input),
            SettingsField::Email => Some(&mut self.email_input),
            SettingsField::Password => Some(&mut self.password_input),
            SettingsField::Insecure => None,
        }
    }

    fn field_value(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::ApiUrl => &self.api_url_input,
            SettingsField::IdentityUrl => &self.identity_url_input,
            SettingsField::Email => &self.email_input,
            SettingsField::Password => &self.password_input,
            SettingsField::Insecure => "",
        }
    }

    // ── Validation & submission ──────────────────────────────────────

    fn validate(&self) -> std::result::Result<(), String> {
        let api = self.api_url_input.trim();
        if api.is_empty() {
            return Err("API URL cannot be empty".into());
        }
        if api.parse::<url::Url>().is_err() {
            return Err("Invalid API URL".into());
        }
        let identity = self.identity_url_input.trim();
        if identity.is_empty() {
            return Err("Identity URL cannot be empty".into());
        }
        if identity.parse::<url::Url>().is_err() {
            return Err("Invalid identity URL".into());
        }
        if self.email_input.trim().is_empty() {
            return Err("Email cannot be empty".into());
        }
        // A saved refresh token can sign in without a password.
        if self.password_input.is_empty() && self.saved_refresh_token.is_none() {
            return Err("Password cannot be empty".into());
        }
        Ok(())
    }

    fn build_profile(&self) -> dealdesk_config::Profile {
        dealdesk_config::Profile {
            api_url: self.api_url_input.trim().to_string(),
            identity_url: self.identity_url_input.trim().to_string(),
            email: Some(self.email_input.trim().to_string()),
            password: if self.password_input.is_empty() {
                None
            } else {
                Some(self.password_input.clone())
            },
            refresh_token: self.saved_refresh_token.clone(),
            ca_cert: self.saved_ca_cert.clone(),
            insecure: Some(self.insecure),
            timeout_secs: self.saved_timeout_secs,
            default_take: self.saved_default_take,
        }
    }

    fn start_connection_test(&mut self) {
        self.state = SettingsState::Testing;
        self.test_error = None;

        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let profile = self.build_profile();
        let profile_name = self.profile_name.clone();

        tokio::spawn(async move {
            let outcome = probe_and_save(profile_name, profile).await;
            let _ = tx.send(Action::SettingsTestResult(outcome));
        });
    }

    fn submit(&mut self) {
        match self.validate() {
            Ok(()) => self.start_connection_test(),
            Err(msg) => self.test_error = Some(msg),
        }
    }

    fn send_apply(&self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };

        let defaults = dealdesk_config::load_config_or_default().defaults;
        let built = dealdesk_config::profile_to_session_config(
            &self.build_profile(),
            &self.profile_name,
            &defaults,
        );
        let action = match built {
            Ok(config) => Action::SettingsApply {
                profile_name: self.profile_name.clone(),
                config: Box::new(config),
            },
            Err(e) => Action::Notify(Notification::error(e.to_string())),
        };
        let _ = tx.send(action);
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[allow(clippy::unused_self)]
    fn render_centered_panel(&self, frame: &mut Frame, area: Rect) -> Rect {
        let panel_w = 58u16.min(area.width.saturating_sub(4));
        let panel_h = 24u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(panel_w)) / 2;
        let y = (area.height.saturating_sub(panel_h)) / 2;
        let panel = Rect::new(area.x + x, area.y + y, panel_w, panel_h);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(Line::styled(
                " Settings ",
                Style::default().fg(theme::AQUA).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::MAGENTA));

        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        inner
    }

    fn render_input_field(&self, frame: &mut Frame, area: Rect, field: SettingsField, masked: bool) {
        if area.height < 3 {
            return;
        }

        let active = self.active_field == field;
        let (label_fg, border_fg) = if active {
            (theme::AQUA, theme::MAGENTA)
        } else {
            (theme::SLATE, theme::SLATE)
        };

        let [label_row, box_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(field.label(), Style::default().fg(label_fg))),
            label_row,
        );

        let mut text = if masked {
            "\u{25CF}".repeat(self.field_value(field).chars().count())
        } else {
            self.field_value(field).to_string()
        };
        if active {
            text.push('\u{2588}'); // block cursor
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_fg));
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme::SOFT_WHITE))),
            inner,
        );
    }

    #[allow(clippy::unused_self)]
    fn render_toggle(&self, frame: &mut Frame, area: Rect, label: &str, value: bool, active: bool) {
        if area.height < 1 {
            return;
        }

        let marker = if value { "[\u{2713}]" } else { "[ ]" };
        let marker_fg = match (active, value) {
            (true, _) => theme::MAGENTA,
            (false, true) => theme::MINT,
            (false, false) => theme::SLATE,
        };
        let label_fg = if active { theme::AQUA } else { theme::SLATE };

        let line = Line::from(vec![
            Span::styled(format!("  {marker} "), Style::default().fg(marker_fg)),
            Span::styled(label, Style::default().fg(label_fg)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_editing(&self, frame: &mut Frame, area: Rect) {
        let fields_area = Rect::new(area.x + 1, area.y, area.width.saturating_sub(2), area.height);
        let constraints = SettingsField::ALL
            .iter()
            .map(|f| Constraint::Length(f.rows()))
            .chain(std::iter::once(Constraint::Min(0)));
        let chunks = Layout::vertical(constraints).split(fields_area);

        for (field, slot) in SettingsField::ALL.into_iter().zip(chunks.iter()) {
            match field {
                SettingsField::Insecure => self.render_toggle(
                    frame,
                    *slot,
                    field.label(),
                    self.insecure,
                    self.active_field == field,
                ),
                SettingsField::Password => {
                    self.render_input_field(frame, *slot, field, !self.show_password);
                }
                _ => self.render_input_field(frame, *slot, field, false),
            }
        }
    }

    fn render_testing(&self, frame: &mut Frame, area: Rect) {
        let [spinner_row, detail_row] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(2)])
                .flex(Flex::Center)
                .areas(area);

        let throbber = throbber_widgets_tui::Throbber::default()
            .label("  Checking the connection...")
            .style(Style::default().fg(theme::AQUA))
            .throbber_style(Style::default().fg(theme::MAGENTA));
        frame.render_stateful_widget(throbber, spinner_row, &mut self.throbber_state.clone());

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("  Signing in at {}", self.identity_url_input.trim()),
                Style::default().fg(theme::SLATE),
            )),
            detail_row,
        );
    }

    fn render_key_hints(&self, frame: &mut Frame, area: Rect) {
        let mut hints = Vec::new();
        if self.state == SettingsState::Testing {
            hints.extend([
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]);
        } else {
            match self.active_field {
                SettingsField::Insecure => hints.extend([
                    Span::styled("Space ", theme::key_hint_key()),
                    Span::styled("toggle  ", theme::key_hint()),
                ]),
                SettingsField::Password => hints.extend([
                    Span::styled("Ctrl+U ", theme::key_hint_key()),
                    Span::styled("reveal  ", theme::key_hint()),
                ]),
                _ => hints.extend([
                    Span::styled("Shift+Tab ", theme::key_hint_key()),
                    Span::styled("prev  ", theme::key_hint()),
                ]),
            }
            hints.extend([
                Span::styled("Tab ", theme::key_hint_key()),
                Span::styled("next  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("test & save  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]);
        }

        frame.render_widget(
            Paragraph::new(Line::from(hints)).alignment(Alignment::Center),
            area,
        );
    }
}

/// Sign in once with the candidate profile, then persist it. The saved
/// profile becomes the default when no default exists yet.
async fn probe_and_save(
    profile_name: String,
    profile: dealdesk_config::Profile,
) -> std::result::Result<(), String> {
    let mut cfg = dealdesk_config::load_config_or_default();
    let config = dealdesk_config::profile_to_session_config(&profile, &profile_name, &cfg.defaults)
        .map_err(|e| e.to_string())?;

    let backoffice = Backoffice::new(config);
    backoffice.connect().await.map_err(|e| e.to_string())?;
    backoffice.disconnect().await;

    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name);
    }
    dealdesk_config::save_config(&cfg)
        .map_err(|e| format!("Connected, but could not save config: {e}"))
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for SettingsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.state == SettingsState::Testing {
            // Only Esc is live while the probe runs.
            if key.code == KeyCode::Esc {
                self.state = SettingsState::Editing;
                self.test_error = None;
            }
            return Ok(None);
        }

        // A fresh keystroke retires any stale validation message.
        self.test_error = None;

        // Keys that work from every field.
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::CloseSettings)),
            KeyCode::Tab => {
                self.focus_next();
                return Ok(None);
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return Ok(None);
            }
            KeyCode::Enter => {
                self.submit();
                return Ok(None);
            }
            _ => {}
        }

        if self.active_field == SettingsField::Insecure {
            if key.code == KeyCode::Char(' ') {
                self.insecure = !self.insecure;
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Backspace => {
                if let Some(field) = self.active_input_mut() {
                    field.pop();
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.show_password = !self.show_password;
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.active_input_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }

        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.state != SettingsState::Editing
            || mouse.kind != MouseEventKind::Down(MouseButton::Left)
        {
            return Ok(None);
        }

        let area = self.last_area.get();
        if area.width == 0 {
            return Ok(None);
        }

        // The form begins two rows below the panel top: border, then spacer.
        let panel_h = 24u16.min(area.height.saturating_sub(2));
        let panel_y = area.y + area.height.saturating_sub(panel_h) / 2;
        let Some(offset) = mouse.row.checked_sub(panel_y + 2) else {
            return Ok(None);
        };

        // Walk the field bands until the click lands in one.
        let mut top = 0u16;
        for field in SettingsField::ALL {
            let rows = field.rows();
            if offset < top + rows {
                self.active_field = field;
                if field == SettingsField::Insecure {
                    self.insecure = !self.insecure;
                }
                break;
            }
            top += rows;
        }

        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // A passing probe already saved the profile; hand the session
            // config to the app so it can reconnect.
            Action::SettingsTestResult(Ok(())) => self.send_apply(),
            Action::SettingsTestResult(Err(msg)) => {
                self.state = SettingsState::Editing;
                self.test_error = Some(msg.clone());
            }
            Action::Tick if self.state == SettingsState::Testing => {
                self.throbber_state.calc_next();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.last_area.set(area);

        // Wash the whole frame dark; the form floats on top.
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            area,
        );

        let inner = self.render_centered_panel(frame, area);
        let [_, content, error_row, hint_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        match self.state {
            SettingsState::Editing => self.render_editing(frame, content),
            SettingsState::Testing => self.render_testing(frame, content),
        }

        if let Some(err) = &self.test_error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    err.as_str(),
                    Style::default().fg(theme::SIGNAL_RED),
                ))
                .alignment(Alignment::Center),
                error_row,
            );
        }

        self.render_key_hints(frame, hint_row);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "settings"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tab_cycles_through_every_field_and_wraps() {
        let mut screen = SettingsScreen::blank();
        assert_eq!(screen.active_field, SettingsField::ApiUrl);
        for _ in 0..SettingsField::ALL.len() {
            screen.focus_next();
        }
        assert_eq!(screen.active_field, SettingsField::ApiUrl);
        screen.focus_prev();
        assert_eq!(screen.active_field, SettingsField::Insecure);
    }

    #[test]
    fn typed_characters_land_in_the_active_field() {
        let mut screen = SettingsScreen::blank();
        screen.focus_next(); // IdentityUrl
        screen.focus_next(); // Email
        for c in "a@b.co".chars() {
            screen
                .handle_key_event(key(KeyCode::Char(c)))
                .expect("key");
        }
        assert_eq!(screen.email_input, "a@b.co");
        screen.handle_key_event(key(KeyCode::Backspace)).expect("key");
        assert_eq!(screen.email_input, "a@b.c");
    }

    #[test]
    fn validate_walks_the_form_top_to_bottom() {
        let mut screen = SettingsScreen::blank();
        assert_eq!(screen.validate(), Err("API URL cannot be empty".into()));

        screen.api_url_input = "not a url".into();
        assert_eq!(screen.validate(), Err("Invalid API URL".into()));

        screen.api_url_input = "https://api.dealdesk.test".into();
        screen.identity_url_input = "https://id.dealdesk.test".into();
        assert_eq!(screen.validate(), Err("Email cannot be empty".into()));

        screen.email_input = "ops@dealdesk.test".into();
        assert_eq!(screen.validate(), Err("Password cannot be empty".into()));

        screen.password_input = "hunter2".into();
        assert_eq!(screen.validate(), Ok(()));
    }

    #[test]
    fn saved_refresh_token_stands_in_for_a_password() {
        let mut screen = SettingsScreen::blank();
        screen.api_url_input = "https://api.dealdesk.test".into();
        screen.identity_url_input = "https://id.dealdesk.test".into();
        screen.email_input = "ops@dealdesk.test".into();
        screen.saved_refresh_token = Some("tok".into());
        assert_eq!(screen.validate(), Ok(()));
    }

    #[test]
    fn enter_surfaces_the_first_validation_error() {
        let mut screen = SettingsScreen::blank();
        let action = screen.handle_key_event(key(KeyCode::Enter)).expect("key");
        assert!(action.is_none());
        assert_eq!(screen.test_error.as_deref(), Some("API URL cannot be empty"));
    }

    #[test]
    fn esc_closes_the_screen_without_saving() {
        let mut screen = SettingsScreen::blank();
        let action = screen.handle_key_event(key(KeyCode::Esc)).expect("key");
        assert!(matches!(action, Some(Action::CloseSettings)));
    }

    #[test]
    fn space_flips_the_insecure_toggle() {
        let mut screen = SettingsScreen::blank();
        screen.active_field = SettingsField::Insecure;
        screen
            .handle_key_event(key(KeyCode::Char(' ')))
            .expect("key");
        assert!(screen.insecure);
        screen
            .handle_key_event(key(KeyCode::Char(' ')))
            .expect("key");
        assert!(!screen.insecure);
    }
}
