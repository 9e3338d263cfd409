//! Unit and weapon detail screens.
//!
//! One record at a time, reached from a search card (`o`) or from a link on
//! another detail screen. Weapon and unit back-references are navigable
//! links; long ability text is collapsed until `e` is pressed.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use grimdarkly_core::presentation::{DEFAULT_TEXT_LIMIT, collapse_text};
use grimdarkly_core::{
    DetailState, ExpansionState, RecordKind, SubList, ToggleInput, Unit, Weapon,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::tag_list;

#[derive(Debug, Clone)]
enum Record {
    Unit(DetailState<Unit>),
    Weapon(DetailState<Weapon>),
}

/// A navigable reference to another record.
#[derive(Debug, Clone)]
struct Link {
    id: u32,
    label: String,
}

pub struct DetailScreen {
    focused: bool,
    record: Record,
    show_variants: bool,
    expansion: ExpansionState,
    /// Full ability descriptions instead of collapsed ones.
    full_text: bool,
    link_cursor: usize,
    scroll: u16,
    throbber_state: ThrobberState,
    /// Toggle control from the last render, for mouse clicks.
    control_hit: Cell<Option<Rect>>,
}

impl DetailScreen {
    pub fn new(kind: RecordKind, show_variants: bool) -> Self {
        let record = match kind {
            RecordKind::Unit => Record::Unit(DetailState::Loading),
            RecordKind::Weapon => Record::Weapon(DetailState::Loading),
        };
        Self {
            focused: false,
            record,
            show_variants,
            expansion: ExpansionState::default(),
            full_text: false,
            link_cursor: 0,
            scroll: 0,
            throbber_state: ThrobberState::default(),
            control_hit: Cell::new(None),
        }
    }

    fn kind(&self) -> RecordKind {
        match self.record {
            Record::Unit(_) => RecordKind::Unit,
            Record::Weapon(_) => RecordKind::Weapon,
        }
    }

    fn reset_view(&mut self) {
        self.expansion.reset();
        self.full_text = false;
        self.link_cursor = 0;
        self.scroll = 0;
    }

    fn is_loading(&self) -> bool {
        matches!(
            self.record,
            Record::Unit(DetailState::Loading) | Record::Weapon(DetailState::Loading)
        )
    }

    /// Links to other records, in display order.
    fn links(&self) -> Vec<Link> {
        match &self.record {
            Record::Unit(DetailState::Loaded(u)) => u
                .weapons
                .iter()
                .map(|w| Link {
                    id: w.id,
                    label: w.name.clone(),
                })
                .collect(),
            Record::Weapon(DetailState::Loaded(w)) => w
                .units
                .iter()
                .map(|u| Link {
                    id: u.id,
                    label: format!("{} ({})", u.name, u.faction),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn open_link(&self) -> Option<Action> {
        let link = self.links().into_iter().nth(self.link_cursor)?;
        Some(match self.kind() {
            RecordKind::Unit => Action::OpenWeapon(link.id),
            RecordKind::Weapon => Action::OpenUnit(link.id),
        })
    }

    /// The capped tag list on this screen: `(record id, list, items)`.
    fn tag_list(&self) -> Option<(u32, SubList, Vec<String>)> {
        match &self.record {
            Record::Unit(DetailState::Loaded(u)) => Some((
                u.id,
                SubList::Keywords,
                u.visible_keywords(self.show_variants)
                    .map(|k| k.name.clone())
                    .collect(),
            )),
            Record::Weapon(DetailState::Loaded(w)) => Some((
                w.id,
                SubList::Abilities,
                w.abilities.iter().map(grimdarkly_core::WeaponAbility::label).collect(),
            )),
            _ => None,
        }
    }

    fn toggle_tags(&mut self, input: ToggleInput) {
        if let Some((id, list, items)) = self.tag_list() {
            self.expansion.activate(id, list, items.len(), input);
        }
    }

    // ── Line builders ───────────────────────────────────────────────

    fn section(title: &str) -> Line<'static> {
        Line::from(Span::styled(
            format!("─ {title} "),
            theme::title_style().add_modifier(Modifier::BOLD),
        ))
    }

    fn link_lines(&self, lines: &mut Vec<Line<'static>>) {
        let links = self.links();
        if links.is_empty() {
            lines.push(Line::from(Span::styled("  none", theme::muted())));
        }
        for (i, link) in links.into_iter().enumerate() {
            let selected = i == self.link_cursor;
            let style = if selected && self.focused {
                theme::table_selected()
            } else {
                Style::default().fg(theme::WARP_TEAL)
            };
            let marker = if selected { "▸ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(link.label, style.add_modifier(Modifier::UNDERLINED)),
            ]));
        }
    }

    /// Append the capped tag list and remember which line holds its control.
    fn tag_lines(&self, lines: &mut Vec<Line<'static>>, width: u16) -> Option<(usize, tag_list::ControlPos)> {
        let (id, list, items) = self.tag_list()?;
        let block = tag_list::tag_block(
            list.title(),
            &items,
            self.expansion.get(id, list),
            self.expansion.max_visible(),
            width,
            self.focused,
        );
        let start = lines.len();
        lines.extend(block.lines);
        block.control.map(|c| (start + c.row, c))
    }

    fn ability_line(&self, name: &str, description: &str) -> Line<'static> {
        let text = if self.full_text {
            description.to_owned()
        } else {
            collapse_text(description, DEFAULT_TEXT_LIMIT).unwrap_or_else(|| description.to_owned())
        };
        Line::from(vec![
            Span::styled(format!("  {name}: "), theme::field_label()),
            Span::styled(text, Style::default().fg(theme::BONE)),
        ])
    }

    fn unit_lines(&self, u: &Unit, width: u16) -> (Vec<Line<'static>>, Option<(usize, tag_list::ControlPos)>) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled(u.name.clone(), theme::title_style().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {} · {} · {}", u.faction.name, u.faction.category.name, u.unit_type),
                    theme::muted(),
                ),
            ]),
            Line::default(),
        ];

        let mut stats = vec![Span::raw("  ")];
        for (label, value) in [
            ("M", u.movement.map_or_else(|| "-".into(), |m| format!("{m}\""))),
            ("T", u.toughness.to_string()),
            ("Sv", format!("{}+", u.save)),
            ("W", u.wounds.to_string()),
            ("Ld", format!("{}+", u.leadership)),
            ("OC", u.objective_control.to_string()),
        ] {
            stats.extend(tag_list::stat(label, value));
        }
        lines.push(Line::from(stats));
        // Keep the tag list above anything that can wrap.
        let control = self.tag_lines(&mut lines, width);
        lines.push(Line::default());

        lines.push(Self::section("Points"));
        if u.configurations.is_empty() {
            lines.push(Line::from(Span::styled("  none", theme::muted())));
        }
        for c in &u.configurations {
            let models = if c.model_count == 1 { "model" } else { "models" };
            let mut spans = vec![
                Span::styled(format!("  {} {models}", c.model_count), theme::field_value()),
                Span::styled(format!("  {} pts", c.points), Style::default().fg(theme::BRASS)),
            ];
            if !c.description.is_empty() {
                spans.push(Span::styled(format!("  {}", c.description), theme::muted()));
            }
            lines.push(Line::from(spans));
        }

        if !u.compositions.is_empty() {
            lines.push(Line::default());
            lines.push(Self::section("Composition"));
            for c in &u.compositions {
                let count = match (c.min_count, c.max_count) {
                    (Some(lo), Some(hi)) if lo == hi => format!("{lo}x "),
                    (Some(lo), Some(hi)) => format!("{lo}-{hi}x "),
                    (Some(lo), None) => format!("{lo}+ "),
                    (None, Some(hi)) => format!("up to {hi} "),
                    (None, None) => String::new(),
                };
                let prefix = if c.is_alternative { "  or " } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(prefix, theme::muted()),
                    Span::styled(count, Style::default().fg(theme::BRASS)),
                    Span::styled(c.description.clone(), theme::field_value()),
                ]));
            }
        }

        if !u.options.is_empty() {
            lines.push(Line::default());
            lines.push(Self::section("Wargear options"));
            for o in &u.options {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {} ", o.button), theme::field_label()),
                    Span::styled(o.description.clone(), theme::field_value()),
                ]));
            }
        }

        lines.push(Line::default());
        lines.push(Self::section("Weapons"));
        self.link_lines(&mut lines);

        lines.push(Line::default());
        lines.push(Self::section("Abilities"));
        if u.abilities.is_empty() {
            lines.push(Line::from(Span::styled("  none", theme::muted())));
        }
        for a in &u.abilities {
            lines.push(self.ability_line(&a.name, &a.description));
        }
        (lines, control)
    }

    fn weapon_lines(&self, w: &Weapon, width: u16) -> (Vec<Line<'static>>, Option<(usize, tag_list::ControlPos)>) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled(w.name.clone(), theme::title_style().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", w.weapon_type), theme::muted()),
            ]),
            Line::default(),
        ];

        let mut stats = vec![Span::raw("  ")];
        for (label, value) in [
            ("Range", w.range_label()),
            ("A", w.attacks.clone()),
            ("Skill", w.skill_label()),
            ("S", w.strength.clone()),
            ("AP", w.ap_label()),
            ("D", w.damage.clone()),
        ] {
            stats.extend(tag_list::stat(label, value));
        }
        lines.push(Line::from(stats));
        lines.push(Line::default());

        let control = self.tag_lines(&mut lines, width);

        lines.push(Line::default());
        lines.push(Self::section("Used by"));
        self.link_lines(&mut lines);
        (lines, control)
    }

    fn state_message(&self) -> Option<(String, Style)> {
        let noun = self.kind().noun();
        let (not_found, failed) = match &self.record {
            Record::Unit(s) => (
                matches!(s, DetailState::NotFound),
                match s {
                    DetailState::Failed(m) => Some(m.clone()),
                    _ => None,
                },
            ),
            Record::Weapon(s) => (
                matches!(s, DetailState::NotFound),
                match s {
                    DetailState::Failed(m) => Some(m.clone()),
                    _ => None,
                },
            ),
        };
        if not_found {
            return Some((format!(" This {noun} does not exist."), theme::muted()));
        }
        failed.map(|m| (format!(" Failed to load {noun}: {m}"), theme::error()))
    }
}

impl Component for DetailScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let links = self.links().len();
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => return Ok(Some(Action::GoBack)),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.link_cursor + 1 < links {
                    self.link_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.link_cursor = self.link_cursor.saturating_sub(1);
            }
            KeyCode::PageDown | KeyCode::Char('J') => self.scroll = self.scroll.saturating_add(5),
            KeyCode::PageUp | KeyCode::Char('K') => self.scroll = self.scroll.saturating_sub(5),
            KeyCode::Enter | KeyCode::Char('o') => return Ok(self.open_link()),
            KeyCode::Char(' ') => self.toggle_tags(ToggleInput::Space),
            KeyCode::Char('t') => self.toggle_tags(ToggleInput::Enter),
            KeyCode::Char('e') => self.full_text = !self.full_text,
            _ => {}
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let pos = Position::new(mouse.column, mouse.row);
                if self.control_hit.get().is_some_and(|r| r.contains(pos)) {
                    self.toggle_tags(ToggleInput::Click);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::OpenUnit(_) if self.kind() == RecordKind::Unit => {
                self.record = Record::Unit(DetailState::Loading);
                self.reset_view();
            }
            Action::OpenWeapon(_) if self.kind() == RecordKind::Weapon => {
                self.record = Record::Weapon(DetailState::Loading);
                self.reset_view();
            }
            Action::UnitLoaded(state) if self.kind() == RecordKind::Unit => {
                self.record = Record::Unit((**state).clone());
                self.reset_view();
            }
            Action::WeaponLoaded(state) if self.kind() == RecordKind::Weapon => {
                self.record = Record::Weapon((**state).clone());
                self.reset_view();
            }
            Action::VariantsChanged(show) => self.show_variants = *show,
            Action::Tick if self.is_loading() => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.kind() {
            RecordKind::Unit => " Unit ",
            RecordKind::Weapon => " Weapon ",
        };
        let block = Block::default()
            .title(title)
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

        let [body, hints_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        self.control_hit.set(None);

        if self.is_loading() {
            let throbber = Throbber::default()
                .label(format!(" Loading {}...", self.kind().noun()))
                .style(Style::default().fg(theme::BONE))
                .throbber_style(Style::default().fg(theme::BLOOD_RED));
            frame.render_stateful_widget(throbber, body, &mut self.throbber_state.clone());
        } else if let Some((msg, style)) = self.state_message() {
            frame.render_widget(Paragraph::new(Span::styled(msg, style)), body);
        } else {
            let (lines, control) = match &self.record {
                Record::Unit(DetailState::Loaded(u)) => self.unit_lines(u, body.width),
                Record::Weapon(DetailState::Loaded(w)) => self.weapon_lines(w, body.width),
                _ => (Vec::new(), None),
            };
            let max_scroll = u16::try_from(lines.len().saturating_sub(usize::from(body.height)))
                .unwrap_or(u16::MAX);
            let scroll = self.scroll.min(max_scroll);

            if let Some((line, ctl)) = control {
                let line = u16::try_from(line).unwrap_or(u16::MAX);
                if line >= scroll && line - scroll < body.height {
                    let rect = Rect::new(body.x + ctl.col, body.y + line - scroll, ctl.width, 1)
                        .intersection(body);
                    self.control_hit.set(Some(rect));
                }
            }

            // Ability text wraps; the tag list lays itself out.
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0)),
                body,
            );
        }

        let hints = Line::from(vec![
            Span::styled(" Esc ", theme::key_hint_key()),
            Span::styled("back  ", theme::key_hint()),
            Span::styled("j/k ", theme::key_hint_key()),
            Span::styled("select link  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("open  ", theme::key_hint()),
            Span::styled("Space ", theme::key_hint_key()),
            Span::styled("expand tags  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("full text", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        match self.kind() {
            RecordKind::Unit => "unit-detail",
            RecordKind::Weapon => "weapon-detail",
        }
    }
}
