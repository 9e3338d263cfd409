//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use grimdarkly_core::{
    CoreError, DetailState, Faction, RecordKind, SearchParams, SearchResults, Unit, Weapon,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Factions ──────────────────────────────────────────────────
    LoadFactions,
    FactionsLoaded(Result<Arc<Vec<Faction>>, CoreError>),

    // ── Search ────────────────────────────────────────────────────
    /// Open a search screen and mount it with a query string.
    OpenSearch { kind: RecordKind, query: String },
    /// Delivered to the search screen of `kind` after it became active.
    MountQuery { kind: RecordKind, query: String },
    /// Fetch a submitted search.
    RequestSearch(SearchParams),
    SearchCompleted {
        kind: RecordKind,
        result: Result<SearchResults, CoreError>,
    },

    // ── Detail ────────────────────────────────────────────────────
    OpenUnit(u32),
    OpenWeapon(u32),
    UnitLoaded(Box<DetailState<Unit>>),
    WeaponLoaded(Box<DetailState<Weapon>>),

    // ── Preferences ───────────────────────────────────────────────
    ToggleVariants,
    VariantsChanged(bool),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "✓",
            Self::Error => "✗",
        })
    }
}
