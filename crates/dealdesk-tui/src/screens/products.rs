//! Products screen — paged catalog table with server-side filtering.
//!
//! Filtering (state tabs, `/` search) is pushed to the backend through
//! [`ProductFilter`]; the screen never filters rows locally. When no
//! filter is active the loaded rows double as an [`OrderedList`] so the
//! catalog display order can be rearranged and saved.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell as TableCell, Paragraph, Row, Table};
use tokio::sync::mpsc::UnboundedSender;

use dealdesk_core::{OrderedList, PagePhase, Pager, Product, ProductFilter, ProductState};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_age, fmt_money, truncate_text};
use crate::widgets::sub_tabs;

const PRODUCTS_TAKE: usize = 25;
const STATE_TABS: [&str; 4] = ["All", "Active", "Inactive", "Draft"];

pub struct ProductsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    pager: Pager<Product>,
    /// Mirror of the loaded rows, used for reordering. Only meaningful
    /// while no filter is active.
    list: OrderedList<Product>,
    filter: ProductFilter,
    pending_query: String,
    state_tab: usize,
    selected: usize,
    error: Option<String>,
    scroll_offset: Cell<usize>,
}

impl ProductsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            pager: Pager::new(PRODUCTS_TAKE),
            list: OrderedList::new(Vec::new()),
            filter: ProductFilter::default(),
            pending_query: String::new(),
            state_tab: 0,
            selected: 0,
            error: None,
            scroll_offset: Cell::new(0),
        }
    }

    /// Rows currently shown: the reorderable mirror when unfiltered,
    /// the raw page buffer otherwise.
    fn rows(&self) -> &[Product] {
        if self.filter.is_empty() {
            self.list.items()
        } else {
            self.pager.items()
        }
    }

    fn select(&mut self, idx: usize) {
        let len = self.rows().len();
        self.selected = if len == 0 { 0 } else { idx.min(len - 1) };
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) -> Option<Action> {
        let len = self.rows().len();
        if len == 0 {
            return None;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.select(next as usize);
        // Reaching the last loaded row pulls the next page in.
        if self.selected + 1 == len {
            return self.fetch_next();
        }
        None
    }

    fn fetch_first(&mut self) -> Option<Action> {
        self.selected = 0;
        self.error = None;
        Some(Action::FetchProducts {
            request: self.pager.first_page(),
            filter: self.filter.clone(),
        })
    }

    fn fetch_next(&mut self) -> Option<Action> {
        self.pager.next_page().map(|request| Action::FetchProducts {
            request,
            filter: self.filter.clone(),
        })
    }

    fn apply_state_tab(&mut self) -> Option<Action> {
        self.filter.state = match self.state_tab {
            1 => Some(ProductState::Active),
            2 => Some(ProductState::Inactive),
            3 => Some(ProductState::Draft),
            _ => None,
        };
        self.fetch_first()
    }

    fn selected_product(&self) -> Option<&Product> {
        self.rows().get(self.selected)
    }

    fn state_cell(state: &ProductState) -> (String, Color) {
        match state {
            ProductState::Active => ("active".into(), theme::MINT),
            ProductState::Inactive => ("inactive".into(), theme::SLATE),
            ProductState::Draft => ("draft".into(), theme::AMBER),
            other => (other.to_string(), theme::SOFT_WHITE),
        }
    }
}

impl Component for ProductsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Ok(self.move_selection(1)),
            KeyCode::Char('k') | KeyCode::Up => Ok(self.move_selection(-1)),
            KeyCode::Char('g') => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') => {
                if let Some(last) = self.rows().len().checked_sub(1) {
                    self.select(last);
                }
                Ok(None)
            }
            KeyCode::Tab => {
                self.state_tab = (self.state_tab + 1) % STATE_TABS.len();
                Ok(self.apply_state_tab())
            }
            KeyCode::Char('J') if self.filter.is_empty() => {
                let to = self.selected.saturating_add(1);
                if self.list.move_item(self.selected, to) {
                    self.selected = to;
                }
                Ok(None)
            }
            KeyCode::Char('K') if self.filter.is_empty() => {
                let to = self.selected.saturating_sub(1);
                if self.list.move_item(self.selected, to) {
                    self.selected = to;
                }
                Ok(None)
            }
            KeyCode::Char('s') if self.filter.is_empty() => {
                if self.list.is_dirty() {
                    let order = self.list.order();
                    // The arrangement being saved is exactly what is on
                    // screen, so clear the marker right away; a failure
                    // comes back as an error toast.
                    self.list.mark_saved();
                    Ok(Some(Action::SaveProductOrder(order)))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('d') => {
                if let Some(product) = self.selected_product() {
                    Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteProduct {
                        id: product.id.clone(),
                        name: product.title.clone(),
                    })))
                } else {
                    Ok(None)
                }
            }
            KeyCode::Char('r') => Ok(self.fetch_first()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Connected => return Ok(self.fetch_first()),
            Action::ProductsPage(request, result) => match result {
                Ok(page) => {
                    if self.pager.apply_page(*request, page.clone()) {
                        self.error = None;
                        if self.filter.is_empty() {
                            self.list.replace(self.pager.items().to_vec());
                        }
                        self.select(self.selected);
                    }
                }
                Err(message) => {
                    if self.pager.apply_failure(*request) {
                        self.error = Some(message.clone());
                    }
                }
            },
            Action::SearchInput(query) => {
                self.pending_query.clone_from(query);
            }
            Action::SearchSubmit => {
                let query = self.pending_query.trim();
                self.filter.query = if query.is_empty() {
                    None
                } else {
                    Some(query.to_string())
                };
                return Ok(self.fetch_first());
            }
            Action::CloseSearch => {
                self.pending_query.clear();
                if self.filter.query.take().is_some() {
                    return Ok(self.fetch_first());
                }
            }
            Action::Mutated(ConfirmAction::DeleteProduct { .. }) => {
                return Ok(self.fetch_first());
            }
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = self.rows();
        let suffix = if self.pager.has_more() { "+" } else { "" };
        let mut title = format!(" Products ({}{suffix}) ", rows.len());
        if self.filter.is_empty() && self.list.is_dirty() {
            title.push_str("· unsaved ");
        }
        if let Some(query) = &self.filter.query {
            title.push_str(&format!("[\"{query}\"] "));
        }

        let block = theme::panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // state tabs
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints / error
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(sub_tabs::sub_tab_line(&STATE_TABS, self.state_tab)),
            layout[0],
        );

        match self.pager.phase() {
            PagePhase::FetchingFirst => {
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        "  Loading products…",
                        theme::key_hint(),
                    ))),
                    layout[1],
                );
            }
            _ if rows.is_empty() => {
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        "  No products match",
                        theme::key_hint(),
                    ))),
                    layout[1],
                );
            }
            _ => {
                let viewport = usize::from(layout[1].height.saturating_sub(1));
                let mut offset = self.scroll_offset.get().min(rows.len().saturating_sub(1));
                if viewport > 0 {
                    if self.selected < offset {
                        offset = self.selected;
                    } else if self.selected >= offset + viewport {
                        offset = self.selected + 1 - viewport;
                    }
                }
                self.scroll_offset.set(offset);

                let header = Row::new(vec![
                    TableCell::from("  Title").style(theme::table_header()),
                    TableCell::from("Price").style(theme::table_header()),
                    TableCell::from("State").style(theme::table_header()),
                    TableCell::from("Category").style(theme::table_header()),
                    TableCell::from("Vendor").style(theme::table_header()),
                    TableCell::from("Listed").style(theme::table_header()),
                ]);

                let body: Vec<Row> = rows
                    .iter()
                    .enumerate()
                    .skip(offset)
                    .take(viewport)
                    .map(|(i, product)| {
                        let is_selected = i == self.selected;
                        let prefix = if is_selected { "▸ " } else { "  " };
                        let (state_str, state_color) = Self::state_cell(&product.state);
                        let row_style = if is_selected {
                            theme::table_selected()
                        } else {
                            theme::table_row()
                        };
                        Row::new(vec![
                            TableCell::from(format!(
                                "{prefix}{}",
                                truncate_text(&product.title, 38)
                            )),
                            TableCell::from(fmt_money(product.price))
                                .style(Style::default().fg(theme::SKY_BLUE)),
                            TableCell::from(state_str).style(Style::default().fg(state_color)),
                            TableCell::from(product.category_name.clone().unwrap_or_else(|| "─".into())),
                            TableCell::from(product.vendor_name.clone().unwrap_or_else(|| "─".into())),
                            TableCell::from(fmt_age(product.created_at)),
                        ])
                        .style(row_style)
                    })
                    .collect();

                let table = Table::new(
                    body,
                    [
                        Constraint::Fill(2),
                        Constraint::Length(10),
                        Constraint::Length(9),
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                        Constraint::Length(10),
                    ],
                )
                .header(header);
                frame.render_widget(table, layout[1]);
            }
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
                Span::styled("state  ", theme::key_hint()),
                Span::styled("/ ", theme::key_hint_key()),
                Span::styled("search  ", theme::key_hint()),
            ];
            if self.filter.is_empty() {
                hints.extend([
                    Span::styled("J/K ", theme::key_hint_key()),
                    Span::styled("reorder  ", theme::key_hint()),
                    Span::styled("s ", theme::key_hint_key()),
                    Span::styled("save  ", theme::key_hint()),
                ]);
            }
            hints.extend([
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("refresh", theme::key_hint()),
            ]);
            if self.pager.phase() == PagePhase::FetchingNext {
                hints.push(Span::styled("   fetching more…", theme::key_hint()));
            }
            frame.render_widget(Paragraph::new(Line::from(hints)), layout[2]);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "products"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn product(id: &str, title: &str, position: u32) -> Product {
        Product {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            price: 10.0,
            state: ProductState::Active,
            position,
            category_id: None,
            category_name: None,
            vendor_id: None,
            vendor_name: None,
            images: Vec::new(),
            created_at: None,
        }
    }

    fn page(names: &[&str]) -> Vec<Product> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
                product(&format!("prod-{i}"), name, i as u32)
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn connect_triggers_the_first_fetch() {
        let mut screen = ProductsScreen::new();
        let action = screen.update(&Action::Connected).expect("update");
        match action {
            Some(Action::FetchProducts { request, filter }) => {
                assert_eq!(request.skip, 0);
                assert_eq!(request.take, PRODUCTS_TAKE);
                assert!(filter.is_empty());
            }
            other => panic!("expected FetchProducts, got {other:?}"),
        }
    }

    #[test]
    fn reaching_the_last_row_pulls_the_next_page() {
        let mut screen = ProductsScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchProducts { request, .. }) = fetch else {
            panic!("expected fetch");
        };

        // A full page leaves more to fetch.
        let names: Vec<String> = (0..PRODUCTS_TAKE).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        screen
            .update(&Action::ProductsPage(request, Ok(page(&refs))))
            .expect("update");
        assert_eq!(screen.rows().len(), PRODUCTS_TAKE);

        for _ in 0..PRODUCTS_TAKE - 2 {
            assert!(screen.handle_key_event(key(KeyCode::Char('j'))).expect("key").is_none());
        }
        let action = screen.handle_key_event(key(KeyCode::Char('j'))).expect("key");
        match action {
            Some(Action::FetchProducts { request, .. }) => {
                assert_eq!(request.skip, PRODUCTS_TAKE);
            }
            other => panic!("expected next-page fetch, got {other:?}"),
        }
    }

    #[test]
    fn state_tab_resets_to_a_filtered_first_page() {
        let mut screen = ProductsScreen::new();
        screen.update(&Action::Connected).expect("update");
        let action = screen.handle_key_event(key(KeyCode::Tab)).expect("key");
        match action {
            Some(Action::FetchProducts { request, filter }) => {
                assert_eq!(request.skip, 0);
                assert_eq!(filter.state, Some(ProductState::Active));
            }
            other => panic!("expected filtered fetch, got {other:?}"),
        }
    }

    #[test]
    fn reorder_is_disabled_while_filtered() {
        let mut screen = ProductsScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchProducts { request, .. }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::ProductsPage(request, Ok(page(&["A", "B"]))))
            .expect("update");

        screen.handle_key_event(key(KeyCode::Char('J'))).expect("key");
        assert!(screen.list.is_dirty(), "unfiltered reorder marks dirty");

        // Activate the state filter; J must no longer touch the list.
        let fetch = screen.handle_key_event(key(KeyCode::Tab)).expect("key");
        let Some(Action::FetchProducts { request, .. }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::ProductsPage(request, Ok(page(&["A"]))))
            .expect("update");
        let before: Vec<String> = screen.rows().iter().map(|p| p.title.clone()).collect();
        screen.handle_key_event(key(KeyCode::Char('J'))).expect("key");
        let after: Vec<String> = screen.rows().iter().map(|p| p.title.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn failed_page_keeps_rows_and_surfaces_the_error() {
        let mut screen = ProductsScreen::new();
        let fetch = screen.update(&Action::Connected).expect("update");
        let Some(Action::FetchProducts { request, .. }) = fetch else {
            panic!("expected fetch");
        };
        screen
            .update(&Action::ProductsPage(request, Err("boom".into())))
            .expect("update");
        assert_eq!(screen.error.as_deref(), Some("boom"));
        assert!(screen.rows().is_empty());
    }
}
