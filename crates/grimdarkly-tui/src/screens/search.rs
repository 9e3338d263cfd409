//! Search screen: filter form on the left, sortable result cards on the
//! right. One instance per record kind.
//!
//! The form edits a [`SearchPage`]; every keystroke is pushed into the
//! page's `FilterForm` so the typed params and the share link always
//! reflect what is on screen. Fetching happens in the app loop: submitting
//! returns [`Action::RequestSearch`] and the outcome comes back as
//! [`Action::SearchCompleted`].

use std::cell::RefCell;
use std::collections::BTreeMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use strum::IntoEnumIterator;
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::{Input, InputRequest};

use grimdarkly_core::search::field::FieldShape;
use grimdarkly_core::sort::SortKey;
use grimdarkly_core::{
    FilterField, PageSort, RecordKind, SearchPage, SearchPhase, SearchResults, SortState, SubList,
    ToggleInput, Unit, UnitType, Weapon, WeaponType,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{sub_tabs, tag_list};

const FORM_WIDTH: u16 = 44;
const LABEL_WIDTH: u16 = 19;

/// Focusable form controls, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Field(FilterField),
    Keywords,
    Clear,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Form(usize),
    Results,
}

/// Render-ready summary of one result.
struct CardView {
    id: u32,
    title: String,
    subtitle: String,
    stats: Vec<(&'static str, String)>,
    lists: Vec<(SubList, Vec<String>)>,
}

impl CardView {
    fn unit(u: &Unit, show_variants: bool) -> Self {
        Self {
            id: u.id,
            title: u.name.clone(),
            subtitle: format!("{} · {}", u.faction.name, u.unit_type),
            stats: vec![
                ("M", u.movement.map_or_else(|| "-".into(), |m| format!("{m}\""))),
                ("T", u.toughness.to_string()),
                ("Sv", format!("{}+", u.save)),
                ("W", u.wounds.to_string()),
                ("Ld", format!("{}+", u.leadership)),
                ("OC", u.objective_control.to_string()),
                (
                    "Pts",
                    u.min_points().map_or_else(|| "-".into(), |p| p.to_string()),
                ),
            ],
            lists: vec![
                (
                    SubList::Weapons,
                    u.weapons.iter().map(|w| w.name.clone()).collect(),
                ),
                (
                    SubList::Keywords,
                    u.visible_keywords(show_variants)
                        .map(|k| k.name.clone())
                        .collect(),
                ),
                (
                    SubList::Abilities,
                    u.abilities.iter().map(|a| a.name.clone()).collect(),
                ),
            ],
        }
    }

    fn weapon(w: &Weapon) -> Self {
        Self {
            id: w.id,
            title: w.name.clone(),
            subtitle: w.weapon_type.to_string(),
            stats: vec![
                ("Range", w.range_label()),
                ("A", w.attacks.clone()),
                ("Skill", w.skill_label()),
                ("S", w.strength.clone()),
                ("AP", w.ap_label()),
                ("D", w.damage.clone()),
            ],
            lists: vec![
                (
                    SubList::Abilities,
                    w.abilities.iter().map(grimdarkly_core::WeaponAbility::label).collect(),
                ),
                (
                    SubList::Units,
                    w.units
                        .iter()
                        .map(|u| format!("{} ({})", u.name, u.faction))
                        .collect(),
                ),
            ],
        }
    }
}

/// A toggle control drawn in the last frame.
#[derive(Debug, Clone, Copy)]
struct ToggleHit {
    rect: Rect,
    card: usize,
    card_id: u32,
    list: SubList,
    len: usize,
}

/// Map a key to a text-editing request.
fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char(c) if !ctrl => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

/// Selector options for a choice field; the empty string means "any".
fn choice_options(field: FilterField) -> Vec<String> {
    let mut options = vec![String::new()];
    match field {
        FilterField::UnitType => options.extend(UnitType::iter().map(|t| t.to_string())),
        FilterField::WeaponType => options.extend(WeaponType::iter().map(|t| t.to_string())),
        _ => {}
    }
    options
}

/// Sort criteria labels and the active index.
fn sort_labels<K: SortKey>(state: SortState<K>) -> (Vec<&'static str>, usize) {
    let keys: Vec<K> = K::iter().collect();
    let active = keys.iter().position(|k| *k == state.criteria).unwrap_or(0);
    (keys.into_iter().map(SortKey::label).collect(), active)
}

/// Move `idx` by `delta` within `0..len`, wrapping at both ends.
fn wrap_step(idx: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let step = delta.unsigned_abs() % len;
    if delta < 0 {
        (idx + len - step) % len
    } else {
        (idx + step) % len
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

pub struct SearchScreen {
    focused: bool,
    page: SearchPage,
    controls: Vec<Control>,
    focus: Focus,
    inputs: BTreeMap<FilterField, Input>,
    keyword_input: Input,
    notice: Option<String>,
    show_variants: bool,
    selected: usize,
    /// Index into the selected card's expandable lists.
    sub_cursor: usize,
    throbber_state: ThrobberState,
    // Hit areas from the last render, for mouse handling
    toggle_hits: RefCell<Vec<ToggleHit>>,
    card_rows: RefCell<Vec<(usize, Rect)>>,
    control_hits: RefCell<Vec<(usize, Rect)>>,
}

impl SearchScreen {
    pub fn new(kind: RecordKind, show_variants: bool) -> Self {
        let page = SearchPage::new(kind);
        let mut controls: Vec<Control> = page
            .form()
            .fields()
            .into_iter()
            .map(Control::Field)
            .collect();
        controls.extend([Control::Keywords, Control::Clear, Control::Search]);

        let mut screen = Self {
            focused: false,
            page,
            controls,
            focus: Focus::Form(0),
            inputs: BTreeMap::new(),
            keyword_input: Input::default(),
            notice: None,
            show_variants,
            selected: 0,
            sub_cursor: 0,
            throbber_state: ThrobberState::default(),
            toggle_hits: RefCell::new(Vec::new()),
            card_rows: RefCell::new(Vec::new()),
            control_hits: RefCell::new(Vec::new()),
        };
        screen.sync_inputs();
        screen
    }

    fn kind(&self) -> RecordKind {
        self.page.kind()
    }

    /// Rebuild the input widgets from the form, e.g. after a link seeded it.
    fn sync_inputs(&mut self) {
        self.inputs = self
            .page
            .form()
            .fields()
            .into_iter()
            .filter(|f| f.shape() != FieldShape::Choice)
            .map(|f| (f, Input::new(self.page.form().raw_value(f).to_owned())))
            .collect();
        self.keyword_input = Input::new(self.page.form().keywords().pending().to_owned());
    }

    fn focused_control(&self) -> Option<Control> {
        match self.focus {
            Focus::Form(idx) => self.controls.get(idx).copied(),
            Focus::Results => None,
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.controls.len();
        let current = match self.focus {
            Focus::Form(idx) => idx,
            Focus::Results => 0,
        };
        self.focus = Focus::Form(wrap_step(current, len, delta));
    }

    // ── Form editing ────────────────────────────────────────────────

    fn edit_field(&mut self, field: FilterField, req: InputRequest) {
        let Some(input) = self.inputs.get_mut(&field) else {
            return;
        };
        let mut candidate = input.clone();
        candidate.handle(req);
        if candidate.value() == input.value() {
            *input = candidate;
            return;
        }

        let form = self.page.form_mut();
        if field.is_numeric() {
            match form.numeric_field_change(field, candidate.value()) {
                Ok(true) => {
                    *input = candidate;
                    self.notice = None;
                }
                Ok(false) => {
                    self.notice = Some(format!("{} takes whole numbers only", field.label()));
                }
                Err(e) => self.notice = Some(e.to_string()),
            }
        } else {
            match form.set_field(field, Some(candidate.value())) {
                Ok(()) => {
                    *input = candidate;
                    self.notice = None;
                }
                Err(e) => self.notice = Some(e.to_string()),
            }
        }
    }

    fn cycle_choice(&mut self, field: FilterField, delta: isize) {
        let options = choice_options(field);
        let current = self.page.form().raw_value(field);
        let idx = options
            .iter()
            .position(|o| o.eq_ignore_ascii_case(current))
            .unwrap_or(0);
        let next = wrap_step(idx, options.len(), delta);
        let value = options.get(next).map_or("", String::as_str);
        if let Err(e) = self.page.form_mut().set_field(field, Some(value)) {
            self.notice = Some(e.to_string());
        }
    }

    fn edit_keywords(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Backspace && self.keyword_input.value().is_empty() {
            if let Some(removed) = self.page.form_mut().keywords_mut().on_backspace_empty() {
                self.notice = Some(format!("Removed keyword '{removed}'"));
            }
            return;
        }
        let Some(req) = input_request(key) else {
            return;
        };
        self.keyword_input.handle(req);
        self.keyword_text_changed();
    }

    /// Feed the keyword buffer to the accumulator; anything up to the last
    /// comma becomes tags and only the remainder stays in the input.
    fn keyword_text_changed(&mut self) {
        let text = self.keyword_input.value().to_owned();
        let errors = self.page.form_mut().keywords_mut().on_text_change(&text);
        if text.contains(',') {
            self.keyword_input =
                Input::new(self.page.form().keywords().pending().to_owned());
            self.notice = errors.first().map(ToString::to_string);
        }
    }

    /// Bracketed paste: keywords split on commas and line breaks, text
    /// fields take the characters one by one so numeric checks still apply.
    fn paste(&mut self, text: &str) {
        match self.focused_control() {
            Some(Control::Keywords) => {
                for c in text.chars().filter(|c| *c != '\r') {
                    let c = if c == '\n' { ',' } else { c };
                    if !c.is_control() {
                        self.keyword_input.handle(InputRequest::InsertChar(c));
                    }
                }
                self.keyword_text_changed();
            }
            Some(Control::Field(field)) if field.shape() != FieldShape::Choice => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.edit_field(field, InputRequest::InsertChar(c));
                }
            }
            _ => {}
        }
    }

    fn commit_keyword(&mut self) {
        let result = self.page.form_mut().keywords_mut().on_commit();
        self.keyword_input = Input::default();
        self.notice = result.err().as_ref().map(ToString::to_string);
    }

    // ── Submission ──────────────────────────────────────────────────

    fn submit(&mut self) -> Option<Action> {
        if !self.page.form().has_active_filters() {
            self.notice = Some(format!(
                "Set at least one filter to search {}s.",
                self.kind().noun()
            ));
            return None;
        }
        let params = self.page.submit()?;
        self.notice = None;
        self.selected = 0;
        self.sub_cursor = 0;
        Some(Action::RequestSearch(params))
    }

    /// Clear needs an active filter; Search also needs no request in flight.
    fn button_enabled(&self, control: Control) -> bool {
        let form = self.page.form();
        match control {
            Control::Clear => form.has_active_filters(),
            Control::Search => form.has_active_filters() && !form.is_in_flight(),
            Control::Field(_) | Control::Keywords => true,
        }
    }

    fn clear(&mut self) {
        self.page.clear();
        self.sync_inputs();
        self.notice = None;
        self.selected = 0;
        self.sub_cursor = 0;
    }

    fn handle_form_key(&mut self, idx: usize, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::Results;
                return None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(1);
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(-1);
                return None;
            }
            _ => {}
        }

        let control = self.controls.get(idx).copied()?;
        match control {
            Control::Field(field) if field.shape() == FieldShape::Choice => match key.code {
                KeyCode::Left => self.cycle_choice(field, -1),
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_choice(field, 1),
                KeyCode::Enter => return self.submit(),
                _ => {}
            },
            Control::Field(field) => {
                if key.code == KeyCode::Enter {
                    return self.submit();
                }
                if let Some(req) = input_request(key) {
                    self.edit_field(field, req);
                }
            }
            Control::Keywords => {
                if key.code == KeyCode::Enter {
                    if self.keyword_input.value().trim().is_empty() {
                        return self.submit();
                    }
                    self.commit_keyword();
                } else {
                    self.edit_keywords(key);
                }
            }
            Control::Clear | Control::Search
                if !matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
                    || !self.button_enabled(control) => {}
            Control::Clear => self.clear(),
            Control::Search => return self.submit(),
        }
        None
    }

    // ── Results ─────────────────────────────────────────────────────

    fn cards(&self) -> Vec<CardView> {
        match self.page.sorted_results() {
            Some(SearchResults::Units(units)) => units
                .iter()
                .map(|u| CardView::unit(u, self.show_variants))
                .collect(),
            Some(SearchResults::Weapons(weapons)) => weapons.iter().map(CardView::weapon).collect(),
            None => Vec::new(),
        }
    }

    /// Lists of `card` that have a toggle control.
    fn expandable(&self, card: &CardView) -> Vec<(SubList, usize)> {
        let max = self.page.expansion().max_visible();
        card.lists
            .iter()
            .filter(|(_, items)| items.len() > max)
            .map(|(list, items)| (*list, items.len()))
            .collect()
    }

    fn active_list(&self, card: &CardView) -> Option<(SubList, usize)> {
        self.expandable(card).get(self.sub_cursor).copied()
    }

    fn select_card(&mut self, idx: usize, count: usize) {
        self.selected = idx.min(count.saturating_sub(1));
        self.sub_cursor = 0;
    }

    fn toggle_active(&mut self, input: ToggleInput) -> bool {
        let cards = self.cards();
        let Some(card) = cards.get(self.selected) else {
            return false;
        };
        let Some((list, len)) = self.active_list(card) else {
            return false;
        };
        let id = card.id;
        self.page.expansion_mut().activate(id, list, len, input);
        true
    }

    fn open_selected(&self) -> Option<Action> {
        let cards = self.cards();
        let card = cards.get(self.selected)?;
        Some(match self.kind() {
            RecordKind::Unit => Action::OpenUnit(card.id),
            RecordKind::Weapon => Action::OpenWeapon(card.id),
        })
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Option<Action> {
        let count = self.cards().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_card(self.selected.saturating_add(1), count);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_card(self.selected.saturating_sub(1), count);
            }
            KeyCode::Char('g') | KeyCode::Home => self.select_card(0, count),
            KeyCode::Char('G') | KeyCode::End => self.select_card(usize::MAX, count),
            KeyCode::Char('l') | KeyCode::Right => {
                let cards = self.cards();
                let lists = cards.get(self.selected).map_or(0, |c| self.expandable(c).len());
                if self.sub_cursor + 1 < lists {
                    self.sub_cursor += 1;
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.sub_cursor = self.sub_cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') => {
                self.toggle_active(ToggleInput::Space);
            }
            KeyCode::Enter => {
                if !self.toggle_active(ToggleInput::Enter) {
                    return self.open_selected();
                }
            }
            KeyCode::Char('o') => return self.open_selected(),
            KeyCode::Char('s') => {
                let next = self.page.sort().cycled();
                self.page.set_sort(next);
            }
            KeyCode::Char('d') => {
                let next = self.page.sort().toggled();
                self.page.set_sort(next);
            }
            KeyCode::Char('c') if self.button_enabled(Control::Clear) => self.clear(),
            KeyCode::Char('f' | '/' | 'i') => self.focus = Focus::Form(0),
            _ => {}
        }
        None
    }

    fn handle_click(&mut self, col: u16, row: u16) -> Option<Action> {
        let pos = Position::new(col, row);

        let toggle = self
            .toggle_hits
            .borrow()
            .iter()
            .find(|h| h.rect.contains(pos))
            .copied();
        if let Some(hit) = toggle {
            self.focus = Focus::Results;
            self.selected = hit.card;
            self.page
                .expansion_mut()
                .activate(hit.card_id, hit.list, hit.len, ToggleInput::Click);
            return None;
        }

        let card = self
            .card_rows
            .borrow()
            .iter()
            .find(|(_, r)| r.contains(pos))
            .map(|(idx, _)| *idx);
        if let Some(idx) = card {
            self.focus = Focus::Results;
            if idx != self.selected {
                self.selected = idx;
                self.sub_cursor = 0;
            }
            return None;
        }

        let control = self
            .control_hits
            .borrow()
            .iter()
            .find(|(_, r)| r.contains(pos))
            .map(|(idx, _)| *idx);
        if let Some(idx) = control {
            self.focus = Focus::Form(idx);
            match self.controls.get(idx).copied() {
                Some(c @ (Control::Clear | Control::Search)) if !self.button_enabled(c) => {}
                Some(Control::Clear) => self.clear(),
                Some(Control::Search) => return self.submit(),
                Some(Control::Field(f)) if f.shape() == FieldShape::Choice => {
                    self.cycle_choice(f, 1);
                }
                _ => {}
            }
        }
        None
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn field_row(&self, frame: &mut Frame, row: Rect, field: FilterField, focused: bool) {
        let [label_area, value_area] =
            Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)]).areas(row);

        let marker = if focused { "▸" } else { " " };
        let label_style = if focused {
            theme::tab_active()
        } else {
            theme::field_label()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("{marker}{}", field.label()), label_style)),
            label_area,
        );

        if field.shape() == FieldShape::Choice {
            let raw = self.page.form().raw_value(field);
            let shown = if raw.is_empty() { "Any" } else { raw };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("‹ {shown} ›"), theme::field_value())),
                value_area,
            );
            return;
        }

        let Some(input) = self.inputs.get(&field) else {
            return;
        };
        let hint = field
            .range_hint()
            .map_or_else(String::new, |(lo, hi)| format!(" {lo}..{hi}"));
        let hint_w = clamp_u16(hint.chars().count());
        let [text_area, hint_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(hint_w)]).areas(value_area);

        let scroll = input.visual_scroll(usize::from(text_area.width.saturating_sub(1)));
        let mut style = theme::field_value();
        if focused {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        frame.render_widget(
            Paragraph::new(Span::styled(input.value().to_owned(), style))
                .scroll((0, clamp_u16(scroll))),
            text_area,
        );
        frame.render_widget(Paragraph::new(Span::styled(hint, theme::muted())), hint_area);

        if focused {
            let x = input.visual_cursor().saturating_sub(scroll);
            frame.set_cursor_position(Position::new(text_area.x + clamp_u16(x), text_area.y));
        }
    }

    #[allow(clippy::too_many_lines)]
    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let form_focused = matches!(self.focus, Focus::Form(_));
        let block = Block::default()
            .title(" Filters ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if form_focused && self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut hits = Vec::with_capacity(self.controls.len());
        let mut y = inner.y;
        let bottom = inner.bottom();
        let row_at = |y: u16| Rect::new(inner.x, y, inner.width, 1);

        for (idx, control) in self.controls.iter().enumerate() {
            if y >= bottom {
                break;
            }
            let focused = self.focus == Focus::Form(idx);
            match *control {
                Control::Field(field) => {
                    let row = row_at(y);
                    self.field_row(frame, row, field, focused);
                    hits.push((idx, row));
                    y += 1;
                }
                Control::Keywords => {
                    y += 1;
                    if y + 1 >= bottom {
                        break;
                    }
                    let chips: Vec<Span> = self
                        .page
                        .form()
                        .keywords()
                        .keywords()
                        .iter()
                        .flat_map(|k| [Span::styled(format!("[{k}]"), theme::tag()), Span::raw(" ")])
                        .collect();
                    let label_style = if focused {
                        theme::tab_active()
                    } else {
                        theme::field_label()
                    };
                    let marker = if focused { "▸" } else { " " };
                    let mut line = vec![Span::styled(format!("{marker}Keywords  "), label_style)];
                    if chips.is_empty() {
                        line.push(Span::styled("none", theme::muted()));
                    } else {
                        line.extend(chips);
                    }
                    frame.render_widget(Paragraph::new(Line::from(line)), row_at(y));
                    y += 1;

                    let row = row_at(y);
                    let [pad, text_area] =
                        Layout::horizontal([Constraint::Length(2), Constraint::Min(1)]).areas(row);
                    let scroll = self
                        .keyword_input
                        .visual_scroll(usize::from(text_area.width.saturating_sub(1)));
                    frame.render_widget(Paragraph::new("›"), pad);
                    let text = if self.keyword_input.value().is_empty() && !focused {
                        Span::styled("type, comma or Enter to add", theme::muted())
                    } else {
                        Span::styled(
                            self.keyword_input.value().to_owned(),
                            theme::field_value().add_modifier(Modifier::UNDERLINED),
                        )
                    };
                    frame.render_widget(
                        Paragraph::new(text).scroll((0, clamp_u16(scroll))),
                        text_area,
                    );
                    if focused {
                        let x = self.keyword_input.visual_cursor().saturating_sub(scroll);
                        frame.set_cursor_position(Position::new(
                            text_area.x + clamp_u16(x),
                            text_area.y,
                        ));
                    }
                    hits.push((idx, row));
                    y += 2;
                }
                Control::Clear | Control::Search => {
                    let (label, x) = if *control == Control::Clear {
                        (" Clear ", inner.x + 1)
                    } else {
                        (" Search ", inner.x + 11)
                    };
                    let style = match (self.button_enabled(*control), focused) {
                        (false, _) => theme::button_disabled(),
                        (true, true) => theme::table_selected().add_modifier(Modifier::REVERSED),
                        (true, false) => Style::default().fg(theme::BONE).bg(theme::BG_HIGHLIGHT),
                    };
                    let width = clamp_u16(label.chars().count()).min(inner.right().saturating_sub(x));
                    let rect = Rect::new(x, y, width, 1);
                    frame.render_widget(Paragraph::new(Span::styled(label, style)), rect);
                    hits.push((idx, rect));
                    if *control == Control::Search {
                        y += 2;
                    }
                }
            }
        }
        *self.control_hits.borrow_mut() = hits;

        // Notice, share link and hints fill the remaining rows.
        if let Some(notice) = &self.notice {
            if y < bottom {
                frame.render_widget(
                    Paragraph::new(Span::styled(notice.clone(), theme::error())),
                    row_at(y),
                );
            }
        }
        y += 1;
        let link = self.page.form().params().to_query_string();
        if y < bottom && !link.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Link ", theme::field_label()),
                    Span::styled(link, theme::muted()),
                ])),
                row_at(y),
            );
        }

        if bottom > inner.y {
            let hints = if form_focused {
                "Tab next  Enter search  Esc results"
            } else {
                "f edit filters"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(hints, theme::key_hint())),
                row_at(bottom - 1),
            );
        }
    }

    fn render_sort_bar(&self, frame: &mut Frame, area: Rect) {
        let (labels, active, arrow) = match self.page.sort() {
            PageSort::Unit(s) => {
                let (l, a) = sort_labels(s);
                (l, a, s.direction.arrow())
            }
            PageSort::Weapon(s) => {
                let (l, a) = sort_labels(s);
                (l, a, s.direction.arrow())
            }
        };
        let mut line = sub_tabs::render_sub_tabs(&labels, active);
        line.spans.insert(0, Span::styled("Sort ", theme::field_label()));
        line.spans.push(Span::styled(format!("  {arrow}"), theme::tab_active()));
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let status = self.page.status_line();
        match self.page.phase() {
            SearchPhase::Loading => {
                let throbber = Throbber::default()
                    .label(status)
                    .style(Style::default().fg(theme::BONE))
                    .throbber_style(Style::default().fg(theme::BLOOD_RED));
                frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            }
            SearchPhase::Failed(_) => {
                frame.render_widget(Paragraph::new(Span::styled(status, theme::error())), area);
            }
            SearchPhase::Loaded(_) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(status, Style::default().fg(theme::PLAGUE_GREEN))),
                    area,
                );
            }
            SearchPhase::Idle | SearchPhase::NoResults => {
                frame.render_widget(Paragraph::new(Span::styled(status, theme::muted())), area);
            }
        }
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let cards = self.cards();
        let results_focused = self.focus == Focus::Results;
        let expansion = self.page.expansion();
        let max = expansion.max_visible();

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut starts = Vec::with_capacity(cards.len());
        // (line index, control, card index, card id, list, len)
        let mut controls = Vec::new();

        for (i, card) in cards.iter().enumerate() {
            starts.push(lines.len());
            let selected = i == self.selected;
            let active = if selected && results_focused {
                self.active_list(card).map(|(l, _)| l)
            } else {
                None
            };

            let title_style = if selected {
                theme::table_selected()
            } else {
                theme::title_style()
            };
            lines.push(Line::from(vec![
                Span::styled(if selected { "▸ " } else { "  " }, title_style),
                Span::styled(card.title.clone(), title_style),
                Span::styled(format!("  {}", card.subtitle), theme::muted()),
            ]));

            let mut stats = vec![Span::raw("  ")];
            for (label, value) in &card.stats {
                stats.extend(tag_list::stat(label, value.clone()));
            }
            lines.push(Line::from(stats));

            for (list, items) in &card.lists {
                let block = tag_list::tag_block(
                    list.title(),
                    items,
                    expansion.get(card.id, *list),
                    max,
                    area.width,
                    active == Some(*list),
                );
                if let Some(ctl) = block.control {
                    controls.push((lines.len() + ctl.row, ctl, i, card.id, *list, items.len()));
                }
                lines.extend(block.lines);
            }
            lines.push(Line::default());
        }

        let height = usize::from(area.height);
        let offset = starts
            .get(self.selected)
            .copied()
            .unwrap_or(0)
            .min(lines.len().saturating_sub(height));
        let visible = offset..offset + height;

        let to_row = |line: usize| area.y + clamp_u16(line - offset);
        *self.toggle_hits.borrow_mut() = controls
            .into_iter()
            .filter(|(line, ..)| visible.contains(line))
            .map(|(line, ctl, card, card_id, list, len)| ToggleHit {
                rect: Rect::new(area.x + ctl.col, to_row(line), ctl.width, 1).intersection(area),
                card,
                card_id,
                list,
                len,
            })
            .collect();

        let mut rows = Vec::with_capacity(starts.len());
        for (i, start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(lines.len());
            let top = (*start).max(offset);
            let bottom = end.min(offset + height);
            if top < bottom {
                rows.push((i, Rect::new(area.x, to_row(top), area.width, clamp_u16(bottom - top))));
            }
        }
        *self.card_rows.borrow_mut() = rows;

        frame.render_widget(Paragraph::new(lines).scroll((clamp_u16(offset), 0)), area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let results_focused = self.focus == Focus::Results;
        let block = Block::default()
            .title(format!(" {}s ", capitalize(self.kind().noun())))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if results_focused && self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // sort bar
            Constraint::Length(1), // status
            Constraint::Min(1),    // cards
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_sort_bar(frame, layout[0]);
        self.render_status(frame, layout[1]);
        self.render_cards(frame, layout[2]);

        let hints = Line::from(vec![
            Span::styled("j/k ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("h/l ", theme::key_hint_key()),
            Span::styled("list  ", theme::key_hint()),
            Span::styled("Enter/Space ", theme::key_hint_key()),
            Span::styled("expand  ", theme::key_hint()),
            Span::styled("o ", theme::key_hint_key()),
            Span::styled("open  ", theme::key_hint()),
            Span::styled("s/d ", theme::key_hint_key()),
            Span::styled("sort  ", theme::key_hint()),
            Span::styled("c ", theme::key_hint_key()),
            Span::styled("clear", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[3]);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl Component for SearchScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match self.focus {
            Focus::Form(idx) => self.handle_form_key(idx, key),
            Focus::Results => self.handle_results_key(key),
        })
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        self.paste(text);
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let count = self.cards().len();
        Ok(match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.column, mouse.row),
            MouseEventKind::ScrollDown => {
                self.select_card(self.selected.saturating_add(1), count);
                None
            }
            MouseEventKind::ScrollUp => {
                self.select_card(self.selected.saturating_sub(1), count);
                None
            }
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::MountQuery { kind, query } if *kind == self.kind() => {
                let params = self.page.mount(query);
                self.sync_inputs();
                self.focus = Focus::Results;
                self.selected = 0;
                self.sub_cursor = 0;
                return Ok(params.map(Action::RequestSearch));
            }
            Action::SearchCompleted { kind, result } if *kind == self.kind() => {
                self.page.complete(result.clone());
                self.selected = 0;
                self.sub_cursor = 0;
            }
            Action::VariantsChanged(show) => self.show_variants = *show,
            Action::Tick if matches!(self.page.phase(), SearchPhase::Loading) => {
                self.throbber_state.calc_next();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [form_area, results_area] =
            Layout::horizontal([Constraint::Length(FORM_WIDTH), Constraint::Min(20)]).areas(area);
        self.render_form(frame, form_area);
        self.render_results(frame, results_area);
    }

    fn captures_input(&self) -> bool {
        self.focused_control().is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        match self.kind() {
            RecordKind::Unit => "units",
            RecordKind::Weapon => "weapons",
        }
    }
}
