use crate::app::ChartView;
use crate::themes::Theme;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

/// Application title shown on the first header line.
pub const TITLE: &str = "CPI EVENT STUDY";

/// Three-line header above the charts:
///
/// 1. Title followed by a tab per chart, the active one highlighted.
/// 2. A `=` separator.
/// 3. Key hints for the active chart.
pub struct Header<'a> {
    pub active: ChartView,
    /// Separator width in columns.
    pub width: u16,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(active: ChartView, width: u16, theme: &'a Theme) -> Self {
        Self {
            active,
            width,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut title = vec![Span::styled(format!("{}  ", TITLE), self.theme.header)];
        for view in [ChartView::Change, ChartView::Prices] {
            let tab = format!(" [{}] {} ", view.key(), view.name());
            let style = if view == self.active {
                self.theme.value.add_modifier(Modifier::REVERSED)
            } else {
                self.theme.label
            };
            title.push(Span::styled(tab, style));
            title.push(Span::raw(" "));
        }

        let mut hints = vec![
            Span::styled("Tab", self.theme.key_hint),
            Span::styled(" switch  ", self.theme.dim),
        ];
        if self.active == ChartView::Prices {
            hints.extend([
                Span::styled("0-9", self.theme.key_hint),
                Span::styled(" toggle series  ", self.theme.dim),
                Span::styled("a", self.theme.key_hint),
                Span::styled(" show all  ", self.theme.dim),
                Span::styled("r", self.theme.key_hint),
                Span::styled(" reset  ", self.theme.dim),
            ]);
        }
        hints.extend([
            Span::styled("q", self.theme.key_hint),
            Span::styled(" quit", self.theme.dim),
        ]);

        vec![
            Line::from(title),
            Line::from(Span::styled(
                "=".repeat(self.width as usize),
                self.theme.separator,
            )),
            Line::from(hints),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new(ChartView::Change, 60, &theme).to_lines();
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_header_title_line_lists_both_charts() {
        let theme = Theme::dark();
        let lines = Header::new(ChartView::Change, 60, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.starts_with(TITLE));
        assert!(title.contains("[b] Change"), "{title}");
        assert!(title.contains("[l] Prices"), "{title}");
    }

    #[test]
    fn test_header_active_tab_highlighted() {
        let theme = Theme::dark();
        let lines = Header::new(ChartView::Prices, 60, &theme).to_lines();
        let prices = lines[0]
            .spans
            .iter()
            .find(|s| s.content.contains("Prices"))
            .unwrap();
        assert!(prices.style.add_modifier.contains(Modifier::REVERSED));
        let change = lines[0]
            .spans
            .iter()
            .find(|s| s.content.contains("Change"))
            .unwrap();
        assert!(!change.style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_header_separator_matches_width() {
        let theme = Theme::dark();
        let lines = Header::new(ChartView::Change, 42, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 42);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_toggle_hints_only_on_price_chart() {
        let theme = Theme::dark();
        let change = text(&Header::new(ChartView::Change, 60, &theme).to_lines()[2]);
        let prices = text(&Header::new(ChartView::Prices, 60, &theme).to_lines()[2]);
        assert!(!change.contains("toggle series"));
        assert!(prices.contains("toggle series"));
        assert!(change.contains("quit") && prices.contains("quit"));
    }
}
