//! Factions screen: directory of fetched factions plus built-in
//! sub-factions. Enter opens a unit search filtered to the selection.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use grimdarkly_core::{Faction, FactionEntry, RecordKind, faction_directory};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

pub struct FactionsScreen {
    focused: bool,
    load: LoadState,
    fetched: Arc<Vec<Faction>>,
    show_variants: bool,
    entries: Vec<FactionEntry>,
    table_state: TableState,
    throbber_state: ThrobberState,
    /// Table area from the last render, for mouse selection.
    last_table: std::cell::Cell<Rect>,
}

impl FactionsScreen {
    pub fn new(show_variants: bool) -> Self {
        Self {
            focused: false,
            load: LoadState::Loading,
            fetched: Arc::new(Vec::new()),
            show_variants,
            entries: Vec::new(),
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
            last_table: std::cell::Cell::new(Rect::default()),
        }
    }

    fn rebuild(&mut self) {
        let selected = self.selected().map(|e| e.name.clone());
        self.entries = faction_directory(&self.fetched, self.show_variants);
        let idx = selected
            .and_then(|name| self.entries.iter().position(|e| e.name == name))
            .unwrap_or(0);
        self.select(idx);
    }

    fn selected(&self) -> Option<&FactionEntry> {
        self.entries.get(self.table_state.selected().unwrap_or(0))
    }

    fn select(&mut self, idx: usize) {
        if self.entries.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(self.entries.len() - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let current = self.table_state.selected().unwrap_or(0);
        self.select(current.saturating_add_signed(delta));
    }

    fn open_selected(&self) -> Option<Action> {
        self.selected().map(|entry| Action::OpenSearch {
            kind: RecordKind::Unit,
            query: entry.units_query(),
        })
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        self.last_table.set(area);
        let header = Row::new(["Name", "Category", "Parent"]).style(theme::table_header());
        let rows = self.entries.iter().map(|e| {
            let style = if e.is_sub_faction() {
                Style::default().fg(theme::WARP_TEAL)
            } else {
                theme::table_row()
            };
            Row::new([
                Cell::from(e.name.clone()),
                Cell::from(e.category.clone()),
                Cell::from(e.parent.clone().unwrap_or_else(|| "─".into())),
            ])
            .style(style)
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(45),
                Constraint::Percentage(30),
                Constraint::Percentage(25),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }
}

impl Component for FactionsScreen {
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
            KeyCode::Char('g') | KeyCode::Home => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.select(usize::MAX);
                Ok(None)
            }
            KeyCode::Enter => Ok(self.open_selected()),
            KeyCode::Char('v') => Ok(Some(Action::ToggleVariants)),
            KeyCode::Char('r') => Ok(Some(Action::LoadFactions)),
            _ => Ok(None),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                let area = self.last_table.get();
                // Row 0 is the header.
                if mouse.row > area.y && mouse.row < area.bottom() {
                    let offset = self.table_state.offset();
                    let clicked = offset + usize::from(mouse.row - area.y - 1);
                    if self.table_state.selected() == Some(clicked) {
                        return Ok(self.open_selected());
                    }
                    self.select(clicked);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoadFactions => self.load = LoadState::Loading,
            Action::FactionsLoaded(Ok(factions)) => {
                self.fetched = Arc::clone(factions);
                self.load = LoadState::Loaded;
                self.rebuild();
            }
            Action::FactionsLoaded(Err(e)) => {
                self.load = LoadState::Failed(e.to_string());
                // Sub-factions stay browsable without the API.
                self.rebuild();
            }
            Action::VariantsChanged(show) => {
                self.show_variants = *show;
                self.rebuild();
            }
            Action::Tick if self.load == LoadState::Loading => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let variants = if self.show_variants { "shown" } else { "hidden" };
        let block = Block::default()
            .title(format!(" Factions ({}) ", self.entries.len()))
            .title_bottom(Line::from(format!(" variants {variants} ")).right_aligned())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // status
            Constraint::Min(1),    // table
            Constraint::Length(2), // lore
            Constraint::Length(1), // hints
        ])
        .split(inner);

        match &self.load {
            LoadState::Loading => {
                let throbber = Throbber::default()
                    .label(" Loading factions...")
                    .style(Style::default().fg(theme::BONE))
                    .throbber_style(Style::default().fg(theme::BLOOD_RED));
                frame.render_stateful_widget(
                    throbber,
                    layout[0],
                    &mut self.throbber_state.clone(),
                );
            }
            LoadState::Failed(msg) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!(" Failed to load factions: {msg}  (r to retry)"),
                        theme::error(),
                    )),
                    layout[0],
                );
            }
            LoadState::Loaded => {}
        }

        self.render_table(frame, layout[1]);

        if let Some(entry) = self.selected() {
            frame.render_widget(
                Paragraph::new(Span::styled(entry.description.clone(), theme::muted()))
                    .wrap(Wrap { trim: true }),
                layout[2],
            );
        }

        let hints = Line::from(vec![
            Span::styled(" Enter ", theme::key_hint_key()),
            Span::styled("search units  ", theme::key_hint()),
            Span::styled("v ", theme::key_hint_key()),
            Span::styled("toggle variants  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("reload", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[3]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "factions"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use grimdarkly_core::Category;
    use pretty_assertions::assert_eq;

    fn faction(id: u32, name: &str) -> Faction {
        Faction {
            id,
            name: name.into(),
            category: Category {
                id: 1,
                name: "Imperium".into(),
            },
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(show_variants: bool) -> FactionsScreen {
        let mut screen = FactionsScreen::new(show_variants);
        let fetched = Arc::new(vec![faction(1, "Space Marines"), faction(2, "Adeptus Custodes")]);
        screen.update(&Action::FactionsLoaded(Ok(fetched))).unwrap();
        screen
    }

    #[test]
    fn variant_toggle_hides_built_in_chapters() {
        let mut screen = loaded(true);
        assert_eq!(screen.entries.len(), 11);

        let action = screen.handle_key_event(key(KeyCode::Char('v'))).unwrap();
        assert!(matches!(action, Some(Action::ToggleVariants)));

        screen.update(&Action::VariantsChanged(false)).unwrap();
        let names: Vec<_> = screen.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Adeptus Custodes", "Space Marines"]);
    }

    #[test]
    fn enter_opens_prefilled_unit_search() {
        let mut screen = loaded(true);
        let idx = screen
            .entries
            .iter()
            .position(|e| e.name == "Ultramarines")
            .unwrap();
        screen.select(idx);

        match screen.handle_key_event(key(KeyCode::Enter)).unwrap() {
            Some(Action::OpenSearch { kind, query }) => {
                assert_eq!(kind, RecordKind::Unit);
                assert_eq!(query, "?faction=Space+Marines&keyword=Ultramarines");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn selected_faction_lore_is_rendered() {
        use ratatui::{Terminal, backend::TestBackend};

        let mut screen = loaded(false);
        let idx = screen
            .entries
            .iter()
            .position(|e| e.name == "Adeptus Custodes")
            .unwrap();
        screen.select(idx);

        let mut terminal = Terminal::new(TestBackend::new(160, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("personal bodyguards"));
    }

    #[test]
    fn selection_survives_variant_toggle() {
        let mut screen = loaded(true);
        let idx = screen
            .entries
            .iter()
            .position(|e| e.name == "Space Marines")
            .unwrap();
        screen.select(idx);
        screen.update(&Action::VariantsChanged(false)).unwrap();
        assert_eq!(screen.selected().unwrap().name, "Space Marines");
    }
}
