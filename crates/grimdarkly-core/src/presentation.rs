// ── Result presentation ──
//
// Expand/collapse state for capped tag lists on result cards, and
// "read more" truncation for long ability text.

use std::collections::HashMap;

/// Items shown per sub-list before the "+K more" control.
pub const DEFAULT_MAX_VISIBLE: usize = 3;

/// Characters shown of a collapsed description.
pub const DEFAULT_TEXT_LIMIT: usize = 90;

/// How a toggle control was activated. Every variant produces the same
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleInput {
    Click,
    Enter,
    Space,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disclosure {
    #[default]
    Collapsed,
    Expanded,
}

/// Control rendered after the visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleControl {
    /// `+K more`
    More(usize),
    /// `Show less`
    ShowLess,
}

impl ToggleControl {
    pub fn label(self) -> String {
        match self {
            Self::More(k) => format!("+{k} more"),
            Self::ShowLess => "Show less".into(),
        }
    }
}

/// What to draw for one sub-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a, T> {
    pub items: &'a [T],
    pub control: Option<ToggleControl>,
}

impl Disclosure {
    /// Visible slice plus control for a list of `items`.
    pub fn view<'a, T>(self, items: &'a [T], max_visible: usize) -> ListView<'a, T> {
        if items.len() <= max_visible {
            return ListView {
                items,
                control: None,
            };
        }
        match self {
            Self::Collapsed => ListView {
                items: items.get(..max_visible).unwrap_or(items),
                control: Some(ToggleControl::More(items.len() - max_visible)),
            },
            Self::Expanded => ListView {
                items,
                control: Some(ToggleControl::ShowLess),
            },
        }
    }

    /// Apply a toggle activation. Lists that fit have no control, so the
    /// activation does nothing.
    pub fn activate(self, _input: ToggleInput, len: usize, max_visible: usize) -> Self {
        if len <= max_visible {
            return self;
        }
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

/// Sub-lists a card can cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubList {
    Weapons,
    Keywords,
    Abilities,
    Configurations,
    Units,
}

impl SubList {
    pub fn title(self) -> &'static str {
        match self {
            Self::Weapons => "Weapons",
            Self::Keywords => "Keywords",
            Self::Abilities => "Abilities",
            Self::Configurations => "Points",
            Self::Units => "Used by",
        }
    }
}

/// Expansion state of every `(card, sub-list)` pair on a page.
#[derive(Debug, Clone)]
pub struct ExpansionState {
    max_visible: usize,
    states: HashMap<(u32, SubList), Disclosure>,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VISIBLE)
    }
}

impl ExpansionState {
    pub fn new(max_visible: usize) -> Self {
        Self {
            max_visible,
            states: HashMap::new(),
        }
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    pub fn get(&self, card: u32, list: SubList) -> Disclosure {
        self.states.get(&(card, list)).copied().unwrap_or_default()
    }

    pub fn view<'a, T>(&self, card: u32, list: SubList, items: &'a [T]) -> ListView<'a, T> {
        self.get(card, list).view(items, self.max_visible)
    }

    /// Toggle one sub-list of a card; returns the new state.
    pub fn activate(&mut self, card: u32, list: SubList, len: usize, input: ToggleInput) -> Disclosure {
        let next = self.get(card, list).activate(input, len, self.max_visible);
        self.states.insert((card, list), next);
        next
    }

    /// Back to all-collapsed, e.g. when a new result set arrives.
    pub fn reset(&mut self) {
        self.states.clear();
    }
}

/// Collapsed form of a long description.
///
/// Cuts at `max_len` characters; when the last space before the cut lies
/// beyond 80% of `max_len` the cut moves back to that space. Returns `None`
/// when the text already fits.
pub fn collapse_text(text: &str, max_len: usize) -> Option<String> {
    if text.chars().count() <= max_len {
        return None;
    }
    let head: String = text.chars().take(max_len).collect();
    let threshold = max_len * 4 / 5;
    let cut = match head.rfind(' ') {
        Some(idx) if head[..idx].chars().count() > threshold => &head[..idx],
        _ => head.as_str(),
    };
    Some(format!("{}...", cut.trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_shows_first_three_and_more() {
        let items = [1, 2, 3, 4, 5];
        let view = Disclosure::Collapsed.view(&items, 3);
        assert_eq!(view.items, &[1, 2, 3]);
        assert_eq!(view.control, Some(ToggleControl::More(2)));
        assert_eq!(view.control.map(ToggleControl::label).as_deref(), Some("+2 more"));
    }

    #[test]
    fn expanded_shows_all_and_show_less() {
        let items = [1, 2, 3, 4];
        let view = Disclosure::Expanded.view(&items, 3);
        assert_eq!(view.items.len(), 4);
        assert_eq!(view.control, Some(ToggleControl::ShowLess));
    }

    #[test]
    fn short_lists_have_no_control() {
        let items = [1, 2, 3];
        let view = Disclosure::Collapsed.view(&items, 3);
        assert_eq!(view.items.len(), 3);
        assert_eq!(view.control, None);
        assert_eq!(Disclosure::Collapsed.activate(ToggleInput::Click, 3, 3), Disclosure::Collapsed);
    }

    #[test]
    fn every_input_toggles_identically() {
        for input in [ToggleInput::Click, ToggleInput::Enter, ToggleInput::Space] {
            let mut state = ExpansionState::default();
            assert_eq!(state.activate(7, SubList::Weapons, 5, input), Disclosure::Expanded);
            assert_eq!(state.activate(7, SubList::Weapons, 5, input), Disclosure::Collapsed);
        }
    }

    #[test]
    fn cards_and_lists_are_independent() {
        let mut state = ExpansionState::default();
        state.activate(1, SubList::Keywords, 9, ToggleInput::Enter);
        assert_eq!(state.get(1, SubList::Keywords), Disclosure::Expanded);
        assert_eq!(state.get(1, SubList::Weapons), Disclosure::Collapsed);
        assert_eq!(state.get(2, SubList::Keywords), Disclosure::Collapsed);
        state.reset();
        assert_eq!(state.get(1, SubList::Keywords), Disclosure::Collapsed);
    }

    #[test]
    fn short_text_is_not_collapsed() {
        assert_eq!(collapse_text("Deep Strike", 90), None);
    }

    #[test]
    fn long_text_cuts_at_word_boundary() {
        let text = "Each time this unit makes a Charge move, until the end of the turn, \
                    add 1 to the Strength characteristic of melee weapons equipped by models in this unit.";
        let collapsed = collapse_text(text, 90).unwrap_or_default();
        assert!(collapsed.ends_with("..."));
        let body = collapsed.trim_end_matches("...");
        assert!(text.starts_with(body));
        assert!(body.chars().count() <= 90);
        assert!(body.chars().count() > 72);
        assert!(!body.ends_with(' '));
    }

    #[test]
    fn text_without_late_space_cuts_hard() {
        let text = format!("short {}", "x".repeat(120));
        let collapsed = collapse_text(&text, 90).unwrap_or_default();
        assert_eq!(collapsed.chars().count(), 93);
    }
}
