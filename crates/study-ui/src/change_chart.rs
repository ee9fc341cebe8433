//! Overall price change per category, drawn as horizontal bars diverging
//! from a zero axis: falls extend left, rises extend right.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use study_core::formatting::{format_percent, format_signed_percent};

use crate::chart_data::{ChangeBar, ChartData};
use crate::components::logo::Logo;
use crate::themes::Theme;

const VALUE_WIDTH: usize = 9;
const MAX_LABEL_WIDTH: usize = 32;

// ── Layout helpers ────────────────────────────────────────────────────────────

/// Pad or truncate `text` to exactly `width` display columns.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    for ch in text.chars() {
        // Leave one column for the ellipsis.
        if out.width() + ch.to_string().width() > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    let pad = width.saturating_sub(out.width());
    out + &" ".repeat(pad)
}

/// Number of cells a bar of `change` fills on one side of the axis.
fn bar_cells(change: f64, scale: f64, half: usize) -> usize {
    if change == 0.0 || scale <= 0.0 || half == 0 {
        return 0;
    }
    let cells = (change.abs() / scale * half as f64).round() as usize;
    cells.clamp(1, half)
}

fn label_width(bars: &[ChangeBar], width: usize) -> usize {
    bars.iter()
        .map(|b| b.label.width())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH)
        .min(width / 3)
}

// ── Line builders ─────────────────────────────────────────────────────────────

/// Build one line per bar plus a scale line and the axis caption, sized to
/// `width` columns.
pub fn build_change_lines<'a>(data: &ChartData, width: u16, theme: &'a Theme) -> Vec<Line<'a>> {
    let width = width as usize;
    let label_w = label_width(&data.bars, width);
    let half = width.saturating_sub(label_w + VALUE_WIDTH + 3) / 2;
    let scale = data
        .bars
        .iter()
        .map(|b| b.change.abs())
        .fold(0.0_f64, f64::max);

    let mut lines: Vec<Line<'a>> = Vec::with_capacity(data.bars.len() + 3);

    for bar in &data.bars {
        let cells = bar_cells(bar.change, scale, half);
        let style = theme.change_style(bar.change, bar.is_target);
        let label_style = if bar.is_target { theme.value } else { theme.label };

        let (left, right) = if bar.change < 0.0 {
            (
                vec![
                    Span::raw(" ".repeat(half - cells)),
                    Span::styled("█".repeat(cells), style),
                ],
                vec![Span::raw(" ".repeat(half))],
            )
        } else {
            (
                vec![Span::raw(" ".repeat(half))],
                vec![
                    Span::styled("█".repeat(cells), style),
                    Span::raw(" ".repeat(half - cells)),
                ],
            )
        };

        let mut spans = Vec::with_capacity(8);
        spans.push(Span::styled(fit(&bar.label, label_w), label_style));
        spans.push(Span::raw(" "));
        spans.extend(left);
        spans.push(Span::styled("│", theme.zero_axis));
        spans.extend(right);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{:>width$}", format_signed_percent(bar.change, 2), width = VALUE_WIDTH),
            style,
        ));
        lines.push(Line::from(spans));
    }

    // ── Scale ────────────────────────────────────────────────────────────────
    let low = format!("-{}", format_percent(scale, 0));
    let high = format!("+{}", format_percent(scale, 0));
    let left_gap = half.saturating_sub(low.width());
    let right_gap = half.saturating_sub(high.width());
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(label_w + 1)),
        Span::styled(low, theme.axis),
        Span::raw(" ".repeat(left_gap)),
        Span::styled("0", theme.zero_axis),
        Span::raw(" ".repeat(right_gap)),
        Span::styled(high, theme.axis),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("% change", theme.axis)).alignment(Alignment::Center));

    lines
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the change chart into `area`, with the logo in the top-right
/// corner when one is loaded.
pub fn render_change_chart(
    frame: &mut Frame,
    area: Rect,
    data: &ChartData,
    theme: &Theme,
    logo: Option<&Logo>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", data.change_title), theme.header));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = build_change_lines(data, inner.width, theme);
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    if let Some(logo) = logo {
        logo.render_corner(frame, inner);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::tests::sample_chart_data;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("Ebooks", 8), "Ebooks  ");
        let cut = fit("Music streaming subscriptions", 10);
        assert_eq!(cut.width(), 10);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_bar_cells() {
        assert_eq!(bar_cells(0.0, 0.2, 20), 0);
        assert_eq!(bar_cells(-0.2, 0.2, 20), 20);
        assert_eq!(bar_cells(0.1, 0.2, 20), 10);
        // Tiny but non-zero changes stay visible.
        assert_eq!(bar_cells(0.0001, 0.2, 20), 1);
    }

    #[test]
    fn test_negative_bar_extends_left_of_axis() {
        let theme = Theme::dark();
        let data = sample_chart_data();
        let lines = build_change_lines(&data, 80, &theme);

        let ebooks = line_text(&lines[0]);
        assert!(ebooks.starts_with("Ebooks"));
        let axis = ebooks.find('│').unwrap();
        let first_block = ebooks.find('█').unwrap();
        assert!(first_block < axis);
        assert!(ebooks.trim_end().ends_with("-19.00%"));
    }

    #[test]
    fn test_positive_bar_extends_right_of_axis() {
        let theme = Theme::dark();
        let data = sample_chart_data();
        let lines = build_change_lines(&data, 80, &theme);

        let software = line_text(&lines[2]);
        let axis = software.find('│').unwrap();
        let first_block = software.find('█').unwrap();
        assert!(first_block > axis);
        assert!(software.trim_end().ends_with("+4.50%"));
    }

    #[test]
    fn test_zero_change_has_no_bar() {
        let theme = Theme::dark();
        let data = sample_chart_data();
        let lines = build_change_lines(&data, 80, &theme);
        let music = line_text(&lines[1]);
        assert!(!music.contains('█'));
        assert!(music.contains("0.00%"));
    }

    #[test]
    fn test_axes_aligned_across_lines() {
        let theme = Theme::dark();
        let data = sample_chart_data();
        let lines = build_change_lines(&data, 100, &theme);
        let columns: Vec<usize> = lines[..data.bars.len()]
            .iter()
            .map(|l| line_text(l).chars().position(|c| c == '│').unwrap())
            .collect();
        assert!(columns.windows(2).all(|w| w[0] == w[1]), "{columns:?}");
    }

    #[test]
    fn test_scale_and_caption_lines() {
        let theme = Theme::dark();
        let data = sample_chart_data();
        let lines = build_change_lines(&data, 80, &theme);
        assert_eq!(lines.len(), data.bars.len() + 3);
        let scale = line_text(&lines[data.bars.len()]);
        assert!(scale.contains("-19%"));
        assert!(scale.contains("+19%"));
        assert_eq!(line_text(lines.last().unwrap()), "% change");
    }

    #[test]
    fn test_narrow_width_does_not_panic() {
        let theme = Theme::dark();
        let data = sample_chart_data();
        for width in [0, 1, 5, 12] {
            let _ = build_change_lines(&data, width, &theme);
        }
    }

    #[test]
    fn test_render_change_chart_shows_title() {
        let backend = TestBackend::new(120, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let data = sample_chart_data();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_change_chart(frame, area, &data, &theme, None);
            })
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let top: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect();
        assert!(top.contains("The 20% ebook VAT cut"), "{top}");
    }
}
