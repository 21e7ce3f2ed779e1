//! Human-readable formatting helpers for table cells.

use bytesize::ByteSize;
use chrono::{DateTime, Utc};

/// Format an amount of money as "$12.34".
///
/// The backoffice trades in a single currency, so the symbol is fixed.
pub fn fmt_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Format a file size like "1.2 MB", or a dash when unknown.
pub fn fmt_size(size_bytes: Option<u64>) -> String {
    match size_bytes {
        Some(bytes) => ByteSize::b(bytes).to_string(),
        None => "—".to_string(),
    }
}

/// Compact age of a timestamp: "just now", "5m ago", "3h ago", "12d ago".
pub fn fmt_age(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(ts) = timestamp else {
        return "—".to_string();
    };
    let elapsed = Utc::now().signed_duration_since(ts);
    let secs = elapsed.num_seconds();
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

/// Truncate text to `max_len` characters, appending `…` when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn money_keeps_two_decimals_and_the_sign() {
        assert_eq!(fmt_money(0.0), "$0.00");
        assert_eq!(fmt_money(1234.5), "$1234.50");
        assert_eq!(fmt_money(-12.0), "-$12.00");
    }

    #[test]
    fn sizes_fall_back_to_a_dash() {
        assert_eq!(fmt_size(None), "—");
        assert_eq!(fmt_size(Some(0)), "0 B");
    }

    #[test]
    fn ages_scale_with_elapsed_time() {
        assert_eq!(fmt_age(None), "—");
        let now = Utc::now();
        assert_eq!(fmt_age(Some(now)), "just now");
        assert_eq!(fmt_age(Some(now - chrono::Duration::minutes(5))), "5m ago");
        assert_eq!(fmt_age(Some(now - chrono::Duration::hours(3))), "3h ago");
        assert_eq!(fmt_age(Some(now - chrono::Duration::days(12))), "12d ago");
    }

    #[test]
    fn truncation_marks_the_cut() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a very long product name", 10), "a very lo…");
    }
}
