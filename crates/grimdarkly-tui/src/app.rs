//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use grimdarkly_core::{Catalog, DetailState, PreferenceStore, Preferences, RecordKind};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const TOAST_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App<S: PreferenceStore> {
    catalog: Catalog,
    prefs: Preferences<S>,
    /// Current active screen.
    active_screen: ScreenId,
    /// Screens to return to on GoBack, most recent last.
    history: Vec<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    help_visible: bool,
    /// Search to mount once the loop starts (`--query`).
    initial_query: Option<(RecordKind, String)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    /// Bumped on every detail request so a slow response for a record the
    /// user already left is dropped.
    detail_generation: Arc<AtomicU64>,
}

impl<S: PreferenceStore> App<S> {
    pub fn new(
        catalog: Catalog,
        prefs: Preferences<S>,
        initial_query: Option<(RecordKind, String)>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(prefs.show_variants()).into_iter().collect();

        Self {
            catalog,
            prefs,
            active_screen: ScreenId::Factions,
            history: Vec::new(),
            screens,
            running: true,
            help_visible: false,
            initial_query,
            action_tx,
            action_rx,
            notification: None,
            detail_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        self.action_tx.send(Action::LoadFactions)?;
        if let Some((kind, query)) = self.initial_query.take() {
            self.action_tx.send(Action::OpenSearch { kind, query })?;
        }

        let mut events = EventReader::new(
            Duration::from_millis(100), // spinner tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(api_url = self.catalog.api_url(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => {
                    if let Some(action) = self.handle_paste(&text)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    fn active_captures_input(&self) -> bool {
        self.screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        // A focused text input gets every other key.
        let captured = self.active_captures_input();
        if !captured {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                    let n = u8::try_from(c).unwrap_or(b'0') - b'0';
                    if let Some(screen) = ScreenId::from_number(n) {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                (KeyModifiers::NONE, KeyCode::Tab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.tab().next())));
                }
                (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.tab().prev())));
                }
                _ => {}
            }
        }

        let mut action = None;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            action = screen.handle_key_event(key)?;
        }
        // Unhandled Esc walks back.
        if action.is_none() && key.code == KeyCode::Esc && !captured {
            return Ok(Some(Action::GoBack));
        }
        Ok(action)
    }

    /// Handle mouse events (delegate to active screen).
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_paste(text);
        }
        Ok(None)
    }

    fn switch_to(&mut self, target: ScreenId, remember: bool) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        if remember {
            self.history.push(self.active_screen);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Deliver an action to every screen, queueing their follow-ups.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn forward(&mut self, target: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&target) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Process a single action: update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render => {}

            Action::Resize(w, h) => debug!(w, h, "terminal resized"),

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, created)| created.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
                self.forward(self.active_screen, action)?;
            }

            Action::SwitchScreen(target) => self.switch_to(*target, true),

            Action::GoBack => {
                if let Some(prev) = self.history.pop() {
                    self.switch_to(prev, false);
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::LoadFactions => {
                self.forward(ScreenId::Factions, action)?;
                self.fetch_factions();
            }

            Action::OpenSearch { kind, query } => {
                let target = match kind {
                    RecordKind::Unit => ScreenId::Units,
                    RecordKind::Weapon => ScreenId::Weapons,
                };
                self.switch_to(target, true);
                self.action_tx.send(Action::MountQuery {
                    kind: *kind,
                    query: query.clone(),
                })?;
            }

            Action::RequestSearch(params) => self.fetch_search(params.clone()),

            Action::OpenUnit(id) => {
                self.switch_to(ScreenId::UnitDetail, true);
                self.forward(ScreenId::UnitDetail, action)?;
                self.fetch_unit(*id);
            }

            Action::OpenWeapon(id) => {
                self.switch_to(ScreenId::WeaponDetail, true);
                self.forward(ScreenId::WeaponDetail, action)?;
                self.fetch_weapon(*id);
            }

            Action::ToggleVariants => {
                let show = match self.prefs.toggle_variants() {
                    Ok(show) => {
                        let state = if show { "shown" } else { "hidden" };
                        self.action_tx.send(Action::Notify(Notification::success(format!(
                            "Variant content {state}"
                        ))))?;
                        show
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to save preference");
                        self.action_tx.send(Action::Notify(Notification::error(format!(
                            "Preference not saved: {e}"
                        ))))?;
                        self.prefs.show_variants()
                    }
                };
                self.action_tx.send(Action::VariantsChanged(show))?;
            }

            // Data updates go to every screen; each filters by kind.
            Action::FactionsLoaded(_)
            | Action::MountQuery { .. }
            | Action::SearchCompleted { .. }
            | Action::UnitLoaded(_)
            | Action::WeaponLoaded(_)
            | Action::VariantsChanged(_) => self.broadcast(action)?,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
        }

        Ok(())
    }

    // ── Catalog requests ────────────────────────────────────────────

    fn fetch_factions(&self) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = catalog.factions().await.map(Arc::new);
            if let Err(e) = &result {
                warn!(error = %e, "faction fetch failed");
            }
            let _ = tx.send(Action::FactionsLoaded(result));
        });
    }

    fn fetch_search(&self, params: grimdarkly_core::SearchParams) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let kind = params.kind();
            let result = catalog.search(&params).await;
            match &result {
                Ok(r) => debug!(kind = kind.noun(), count = r.len(), "search completed"),
                Err(e) => warn!(kind = kind.noun(), error = %e, "search failed"),
            }
            let _ = tx.send(Action::SearchCompleted { kind, result });
        });
    }

    fn fetch_unit(&self, id: u32) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        let generation = Arc::clone(&self.detail_generation);
        let mine = generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::spawn(async move {
            let state = DetailState::from_result(catalog.unit(id).await);
            if generation.load(Ordering::SeqCst) == mine {
                let _ = tx.send(Action::UnitLoaded(Box::new(state)));
            } else {
                debug!(id, "dropping stale unit response");
            }
        });
    }

    fn fetch_weapon(&self, id: u32) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        let generation = Arc::clone(&self.detail_generation);
        let mine = generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::spawn(async move {
            let state = DetailState::from_result(catalog.weapon(id).await);
            if generation.load(Ordering::SeqCst) == mine {
                let _ = tx.send(Action::WeaponLoaded(Box::new(state)));
            } else {
                debug!(id, "dropping stale weapon response");
            }
        });
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Length(1), // Tab bar
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_tab_bar(frame, layout[0]);
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }
        self.render_status_bar(frame, layout[2]);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active_tab = self.active_screen.tab();
        let mut titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == active_tab {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();
        if active_tab != self.active_screen {
            titles.push(Line::from(Span::styled(
                format!(" › {} ", self.active_screen.label()),
                theme::tab_active(),
            )));
        }

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == active_tab)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let variants = if self.prefs.show_variants() {
            Span::styled("● variants", Style::default().fg(theme::WARP_TEAL))
        } else {
            Span::styled("○ variants", theme::muted())
        };
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(self.catalog.api_url().to_owned(), theme::muted()),
            Span::styled(" │ ", theme::key_hint()),
            variants,
            Span::styled(" │ ? help  Tab next  Esc back  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

fn help_row(keys: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<14}"), theme::key_hint_key()),
        Span::styled(desc, theme::key_hint()),
    ])
}

fn help_heading(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::BRASS)))
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 64, 28);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let text = vec![
        help_heading("Global"),
        help_row("1-3 / Tab", "Switch screen"),
        help_row("Esc", "Back"),
        help_row("?", "This help"),
        help_row("q / Ctrl+c", "Quit"),
        Line::default(),
        help_heading("Factions"),
        help_row("Enter", "Search units of the faction"),
        help_row("v", "Show / hide variant content"),
        help_row("r", "Reload"),
        Line::default(),
        help_heading("Search form"),
        help_row("Tab / ↑↓", "Next / previous field"),
        help_row("←/→ Space", "Change type"),
        help_row(", or Enter", "Add keyword"),
        help_row("Backspace", "Remove last keyword (empty input)"),
        help_row("Enter", "Search"),
        help_row("Esc", "Go to results"),
        Line::default(),
        help_heading("Results"),
        help_row("j/k  h/l", "Select card / list"),
        help_row("Enter/Space", "Expand or collapse list"),
        help_row("o", "Open details"),
        help_row("s / d", "Sort criterion / direction"),
        help_row("f  c", "Edit filters / clear"),
        Line::default(),
        Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 1);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let color = match notif.level {
        NotificationLevel::Success => theme::PLAGUE_GREEN,
        NotificationLevel::Error => theme::ERROR_RED,
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {} ", notif.level), Style::default().fg(color)),
        Span::styled(notif.message.clone(), Style::default().fg(theme::BONE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
