//! "Night Market" palette — warm accents on a dark storefront ground.
//!
//! Every style used by more than one screen lives here so the whole UI
//! shifts together when the palette changes.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

// ── Palette ──────────────────────────────────────────────────────────

/// Primary accent. Focused borders, active tab, drag highlights.
pub const MAGENTA: Color = Color::Rgb(255, 92, 168);

/// Secondary accent. Titles, table headers, key-hint keys.
pub const AQUA: Color = Color::Rgb(102, 230, 216);

/// Warning accent. Confirm dialogs, unsaved-order markers.
pub const AMBER: Color = Color::Rgb(255, 196, 84);

/// Success notifications and approved/active badges.
pub const MINT: Color = Color::Rgb(92, 242, 132);

/// Error notifications and blocked/expired badges.
pub const SIGNAL_RED: Color = Color::Rgb(255, 96, 96);

/// Default body text.
pub const SOFT_WHITE: Color = Color::Rgb(198, 202, 214);

/// Unfocused borders, separators, key-hint text.
pub const SLATE: Color = Color::Rgb(99, 110, 148);

/// Secondary data accent (counts, money columns).
pub const SKY_BLUE: Color = Color::Rgb(134, 206, 252);

/// Selection row background.
pub const BG_HIGHLIGHT: Color = Color::Rgb(44, 42, 58);

/// Overlay/dialog background.
pub const BG_DARK: Color = Color::Rgb(26, 27, 38);

// ── Shared styles ────────────────────────────────────────────────────

/// Panel title style.
pub fn title_style() -> Style {
    Style::default().fg(AQUA).add_modifier(Modifier::BOLD)
}

/// Border of the focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(MAGENTA)
}

/// Border of every other panel.
pub fn border_default() -> Style {
    Style::default().fg(SLATE)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(AQUA)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Regular table row.
pub fn table_row() -> Style {
    Style::default().fg(SOFT_WHITE)
}

/// Selected table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(MAGENTA)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(MAGENTA).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(SLATE)
}

/// Key-hint descriptive text ("quit", "next page").
pub fn key_hint() -> Style {
    Style::default().fg(SLATE)
}

/// Key-hint key text ("q", "Tab").
pub fn key_hint_key() -> Style {
    Style::default().fg(AQUA).add_modifier(Modifier::BOLD)
}

// ── Shared chrome ────────────────────────────────────────────────────

/// The rounded, focus-aware panel every listing screen draws around its
/// table. Chain further builder calls on the result for one-off tweaks.
pub fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        border_focused()
    } else {
        border_default()
    };
    Block::default()
        .title(title)
        .title_style(title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
}
