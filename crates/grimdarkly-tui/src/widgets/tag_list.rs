//! Capped tag lists on result cards.
//!
//! Lays a titled list out over as many rows as the width needs and reports
//! where the "+K more" / "Show less" control landed so mouse clicks can be
//! mapped back to it.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use grimdarkly_core::Disclosure;

use crate::theme;

/// Where a toggle control was drawn, relative to the block's first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPos {
    pub row: usize,
    pub col: u16,
    pub width: u16,
}

#[derive(Debug, Clone, Default)]
pub struct TagBlock {
    pub lines: Vec<Line<'static>>,
    pub control: Option<ControlPos>,
}

struct Layouter {
    width: u16,
    indent: u16,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    col: u16,
}

impl Layouter {
    fn new(width: u16, indent: u16) -> Self {
        Self {
            width: width.max(indent + 1),
            indent,
            lines: Vec::new(),
            current: Vec::new(),
            col: 0,
        }
    }

    fn break_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
        self.current.push(Span::raw(" ".repeat(usize::from(self.indent))));
        self.col = self.indent;
    }

    /// Place a span, wrapping first when it would overflow a non-empty row.
    /// Returns the row and column it starts at.
    fn push(&mut self, span: Span<'static>) -> (usize, u16) {
        let w = u16::try_from(span.width()).unwrap_or(u16::MAX);
        if self.col > self.indent && self.col.saturating_add(w) > self.width {
            self.break_line();
        }
        let pos = (self.lines.len(), self.col);
        self.col = self.col.saturating_add(w);
        self.current.push(span);
        pos
    }

    /// Place a span after a one-column gap; the gap is dropped when the
    /// span moves to a new row.
    fn push_spaced(&mut self, span: Span<'static>) -> (usize, u16) {
        let w = u16::try_from(span.width()).unwrap_or(u16::MAX);
        if self.col > self.indent && self.col.saturating_add(w).saturating_add(1) > self.width {
            self.break_line();
        } else {
            self.current.push(Span::raw(" "));
            self.col = self.col.saturating_add(1);
        }
        self.push(span)
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() {
            self.lines.push(Line::from(self.current));
        }
        self.lines
    }
}

/// Lay out `title: a, b, c +K more` within `width` columns.
///
/// `active` highlights the control (keyboard focus on this sub-list).
pub fn tag_block(
    title: &str,
    items: &[String],
    disclosure: Disclosure,
    max_visible: usize,
    width: u16,
    active: bool,
) -> TagBlock {
    let view = disclosure.view(items, max_visible);
    let head = format!("  {title}: ");
    let indent = u16::try_from(head.chars().count()).unwrap_or(0);

    let mut layout = Layouter::new(width, indent);
    layout.push(Span::styled(head, theme::field_label()));

    if items.is_empty() {
        layout.push(Span::styled("none", theme::muted()));
    }
    let last = view.items.len().saturating_sub(1);
    for (i, item) in view.items.iter().enumerate() {
        let text = if i < last {
            format!("{item}, ")
        } else {
            item.clone()
        };
        layout.push(Span::styled(text, theme::tag()));
    }

    let mut control = None;
    if let Some(ctl) = view.control {
        let label = ctl.label();
        let width = u16::try_from(label.chars().count()).unwrap_or(0);
        let style = if active {
            theme::toggle_control().add_modifier(Modifier::REVERSED)
        } else {
            theme::toggle_control()
        };
        let (row, col) = layout.push_spaced(Span::styled(label, style));
        control = Some(ControlPos { row, col, width });
    }

    TagBlock {
        lines: layout.finish(),
        control,
    }
}

/// Plain "label value" pair used on card headers.
pub fn stat(label: &'static str, value: String) -> [Span<'static>; 2] {
    [
        Span::styled(format!("{label} "), theme::field_label()),
        Span::styled(format!("{value}  "), Style::default().fg(theme::BONE)),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Gun {i}")).collect()
    }

    #[test]
    fn collapsed_list_shows_more_control() {
        let block = tag_block("Weapons", &names(5), Disclosure::Collapsed, 3, 80, false);
        assert_eq!(block.lines.len(), 1);
        assert_eq!(
            text(&block.lines[0]),
            "  Weapons: Gun 1, Gun 2, Gun 3 +2 more"
        );
        assert_eq!(
            block.control,
            Some(ControlPos {
                row: 0,
                col: 31,
                width: 7
            })
        );
    }

    #[test]
    fn short_list_has_no_control() {
        let block = tag_block("Keywords", &names(2), Disclosure::Collapsed, 3, 80, false);
        assert_eq!(block.control, None);
        assert_eq!(text(&block.lines[0]), "  Keywords: Gun 1, Gun 2");
    }

    #[test]
    fn expanded_list_wraps_under_title() {
        let block = tag_block("Weapons", &names(5), Disclosure::Expanded, 3, 30, false);
        assert!(block.lines.len() > 1);
        assert!(text(&block.lines[1]).starts_with(&format!("{}Gun 3", " ".repeat(11))));
        let ctl = block.control.unwrap();
        assert_eq!(ctl.row, block.lines.len() - 1);
        assert!(text(&block.lines[ctl.row]).ends_with("Show less"));
    }

    #[test]
    fn empty_list_says_none() {
        let block = tag_block("Abilities", &[], Disclosure::Collapsed, 3, 40, false);
        assert_eq!(text(&block.lines[0]), "  Abilities: none");
    }
}
