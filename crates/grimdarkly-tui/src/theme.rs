//! Grimdark palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const BLOOD_RED: Color = Color::Rgb(196, 30, 58); // #c41e3a
pub const BRASS: Color = Color::Rgb(205, 164, 82); // #cda452
pub const BONE: Color = Color::Rgb(232, 223, 200); // #e8dfc8
pub const WARP_TEAL: Color = Color::Rgb(94, 200, 190); // #5ec8be
pub const PLAGUE_GREEN: Color = Color::Rgb(132, 204, 92); // #84cc5c
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const ASH: Color = Color::Rgb(150, 146, 138); // #96928a
pub const BORDER_GRAY: Color = Color::Rgb(88, 84, 96); // #585460
pub const BG_HIGHLIGHT: Color = Color::Rgb(48, 36, 40); // #302428
pub const BG_DARK: Color = Color::Rgb(24, 20, 22); // #181416

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(BRASS).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(BLOOD_RED)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(BRASS)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(BONE)
}

/// Selected / highlighted row or card.
pub fn table_selected() -> Style {
    Style::default()
        .fg(BLOOD_RED)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(BLOOD_RED).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(ASH)
}

/// Field label in the filter form.
pub fn field_label() -> Style {
    Style::default().fg(ASH)
}

/// Field value text.
pub fn field_value() -> Style {
    Style::default().fg(BONE)
}

/// Keyword chip.
pub fn tag() -> Style {
    Style::default().fg(WARP_TEAL)
}

/// "+K more" / "Show less" controls.
pub fn toggle_control() -> Style {
    Style::default()
        .fg(BRASS)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn error() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn muted() -> Style {
    Style::default().fg(ASH).add_modifier(Modifier::ITALIC)
}

/// Inert form buttons.
pub fn button_disabled() -> Style {
    Style::default().fg(BORDER_GRAY).add_modifier(Modifier::DIM)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(BRASS).add_modifier(Modifier::BOLD)
}
