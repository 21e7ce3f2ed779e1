//! `--output` rendering for every command.
//!
//! Four families: `table` (tabled, rounded borders), `json`/`json-compact`
//! and `yaml` (serde against the source data), and `plain` (bare ids for
//! shell pipelines).

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color ────────────────────────────────────────────────────────────

pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
    }
}

/// A success marker for mutation feedback, green when color is on.
pub fn check_mark(mode: &ColorMode) -> String {
    if should_color(mode) {
        "✓".green().to_string()
    } else {
        "✓".to_string()
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Render a slice of items in the selected format.
///
/// Table output goes through `to_row` (a `Tabled` projection), plain output
/// prints one `id_fn` result per line, and the serde formats serialize the
/// source items rather than the projected rows.
pub fn render_list<T: serde::Serialize, R: Tabled>(
    format: &OutputFormat,
    data: &[T],
    row_of: impl Fn(&T) -> R,
    id_of: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => {
            let rows = data.iter().map(row_of).collect::<Vec<_>>();
            Table::new(&rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Plain => {
            let ids: Vec<String> = data.iter().map(&id_of).collect();
            ids.join("\n")
        }
        structured => serialize(structured, data),
    }
}

/// Render one item. Detail views are hand-formatted strings rather than
/// `Tabled` rows, so table output delegates to `detail_of`.
pub fn render_single<T: serde::Serialize>(
    format: &OutputFormat,
    data: &T,
    detail_of: impl Fn(&T) -> String,
    id_of: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => detail_of(data),
        OutputFormat::Plain => id_of(data),
        structured => serialize(structured, data),
    }
}

/// Write rendered output to stdout unless quiet mode suppressed it.
pub fn print_output(output: &str, quiet: bool) {
    if !quiet && !output.is_empty() {
        let _ = writeln!(io::stdout().lock(), "{output}");
    }
}

// Never reached with Table or Plain; those need the item closures.
fn serialize<T: serde::Serialize + ?Sized>(format: &OutputFormat, data: &T) -> String {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
    };
    rendered.expect("serializable data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Item {
        id: String,
        count: u32,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: "a".into(), count: 1 },
            Item { id: "b".into(), count: 2 },
        ]
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let out = render_list(
            &OutputFormat::Plain,
            &items(),
            |i| ItemRow { id: i.id.clone() },
            |i| i.id.clone(),
        );
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn json_serializes_the_source_data_not_the_rows() {
        let out = render_list(
            &OutputFormat::JsonCompact,
            &items(),
            |i| ItemRow { id: i.id.clone() },
            |i| i.id.clone(),
        );
        assert_eq!(out, r#"[{"id":"a","count":1},{"id":"b","count":2}]"#);
    }

    #[test]
    fn table_single_uses_the_detail_closure() {
        let item = Item { id: "a".into(), count: 7 };
        let out = render_single(
            &OutputFormat::Table,
            &item,
            |i| format!("ID: {}\nCount: {}", i.id, i.count),
            |i| i.id.clone(),
        );
        assert!(out.starts_with("ID: a"));
    }

    #[test]
    fn color_mode_always_and_never_are_unconditional() {
        assert!(should_color(&ColorMode::Always));
        assert!(!should_color(&ColorMode::Never));
    }
}
