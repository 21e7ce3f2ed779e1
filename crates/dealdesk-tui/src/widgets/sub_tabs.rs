//! Horizontal sub-tab line for use inside screens (coupon scopes, product
//! detail tabs).

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// One-line tab row with the active label bracketed.
pub fn sub_tab_line<'a>(labels: &[&'a str], active: usize) -> Line<'a> {
    let mut line = Line::default();
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            line.push_span(Span::styled("  ", theme::key_hint()));
        }
        let span = if i == active {
            Span::styled(
                format!("[{label}]"),
                theme::tab_active().add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(*label, theme::tab_inactive())
        };
        line.push_span(span);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_label_is_bracketed() {
        let line = sub_tab_line(&["All", "Pending", "Used"], 1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "All  [Pending]  Used");
    }

    #[test]
    fn single_label_has_no_separator() {
        let line = sub_tab_line(&["Only"], 0);
        assert_eq!(line.spans.len(), 1);
    }
}
