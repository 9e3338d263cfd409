//! Screen identifier enum.

use std::fmt;

/// Identifies each TUI screen. The first three sit in the tab bar and are
/// reachable by number keys; detail screens are opened from results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Factions, // 1
    Units,   // 2
    Weapons, // 3
    UnitDetail,
    WeaponDetail,
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Factions, Self::Units, Self::Weapons];

    /// Numeric key for this screen. Detail screens have none.
    pub fn number(self) -> u8 {
        match self {
            Self::Factions => 1,
            Self::Units => 2,
            Self::Weapons => 3,
            Self::UnitDetail | Self::WeaponDetail => 0,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Factions),
            2 => Some(Self::Units),
            3 => Some(Self::Weapons),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Factions => "Factions",
            Self::Units => "Units",
            Self::Weapons => "Weapons",
            Self::UnitDetail => "Unit",
            Self::WeaponDetail => "Weapon",
        }
    }

    /// Tab that stays highlighted while this screen is shown.
    pub fn tab(self) -> Self {
        match self {
            Self::UnitDetail => Self::Units,
            Self::WeaponDetail => Self::Weapons,
            other => other,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
