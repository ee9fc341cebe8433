//! Normalised index lines over time, with a dotted marker at the reference
//! month and a legend whose entries can be toggled.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use study_core::formatting::format_percent;
use study_core::Month;

use crate::chart_data::{ChartData, PriceLine};
use crate::components::logo::Logo;
use crate::themes::Theme;

const LEGEND_WIDTH: u16 = 36;
const Y_TICKS: usize = 5;
const MAX_X_LABELS: usize = 6;
const MARKER_POINTS: usize = 60;

type Point = (f64, f64);

// ── Geometry ──────────────────────────────────────────────────────────────────

fn to_points(values: &[f64]) -> Vec<Point> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// Alternate drawn and skipped month-to-month segments.
pub fn dash_segments(points: &[Point]) -> Vec<&[Point]> {
    points.windows(2).step_by(2).collect()
}

/// Value range over the visible lines, padded so lines do not touch the
/// frame.  Falls back to `[0.9, 1.1]` when nothing is visible.
pub fn y_bounds(lines: &[PriceLine], visible: &[bool]) -> [f64; 2] {
    let (min, max) = lines
        .iter()
        .zip(visible)
        .filter(|(_, &shown)| shown)
        .flat_map(|(line, _)| line.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return [0.9, 1.1];
    }
    let pad = if max - min > 1e-9 {
        (max - min) * 0.05
    } else {
        0.05
    };
    [min - pad, max + pad]
}

/// Evenly spaced percentage labels across `bounds`.
pub fn y_labels(bounds: [f64; 2]) -> Vec<String> {
    let step = (bounds[1] - bounds[0]) / (Y_TICKS - 1) as f64;
    (0..Y_TICKS)
        .map(|i| format_percent(bounds[0] + step * i as f64, 0))
        .collect()
}

/// `Mon YYYY` labels for months spread evenly across the axis, matching the
/// positions ratatui places axis labels at.
pub fn x_labels(months: &[Month]) -> Vec<String> {
    match months.len() {
        0 => Vec::new(),
        1 => vec![months[0].short_label()],
        n => {
            let k = n.min(MAX_X_LABELS);
            (0..k)
                .map(|j| {
                    let idx = (j as f64 * (n - 1) as f64 / (k - 1) as f64).round() as usize;
                    months[idx].short_label()
                })
                .collect()
        }
    }
}

fn marker_points(x: f64, bounds: [f64; 2]) -> Vec<Point> {
    let step = (bounds[1] - bounds[0]) / (MARKER_POINTS - 1) as f64;
    (0..MARKER_POINTS)
        .map(|i| (x, bounds[0] + step * i as f64))
        .collect()
}

// ── Legend ────────────────────────────────────────────────────────────────────

/// Legend entries with their toggle keys, followed by the marker annotation.
pub fn build_legend_lines<'a>(data: &ChartData, visible: &[bool], theme: &'a Theme) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled("Series", theme.header)), Line::from("")];

    for (idx, line) in data.lines.iter().enumerate() {
        let shown = visible.get(idx).copied().unwrap_or(false);
        let key = if idx <= 9 {
            format!("[{}] ", idx)
        } else {
            "    ".to_string()
        };
        let swatch = if line.dashed { "╍╍ " } else { "── " };
        let style = if shown {
            Style::default().fg(theme.series_color(idx))
        } else {
            theme.legend_hidden
        };
        lines.push(Line::from(vec![
            Span::styled(key, theme.key_hint),
            Span::styled(swatch, style),
            Span::styled(line.label.clone(), if shown { theme.text } else { theme.legend_hidden }),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("┊  ", theme.marker),
        Span::styled(data.annotation.clone(), theme.marker),
    ]));
    lines.push(Line::from(Span::styled(
        format!("   {}", data.reference_month.short_label()),
        theme.dim,
    )));
    lines
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the price chart (and its legend when there is room) into `area`.
pub fn render_price_chart(
    frame: &mut Frame,
    area: Rect,
    data: &ChartData,
    visible: &[bool],
    theme: &Theme,
    logo: Option<&Logo>,
) {
    let (chart_area, legend_area) = if area.width > LEGEND_WIDTH * 2 {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(LEGEND_WIDTH)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let bounds = y_bounds(&data.lines, visible);
    let points: Vec<Vec<Point>> = data.lines.iter().map(|l| to_points(&l.values)).collect();
    let marker = marker_points(data.reference_index as f64, bounds);

    let mut datasets = Vec::new();
    for (idx, (line, pts)) in data.lines.iter().zip(&points).enumerate() {
        if !visible.get(idx).copied().unwrap_or(false) {
            continue;
        }
        let style = Style::default().fg(theme.series_color(idx));
        let segments: Vec<&[Point]> = if line.dashed {
            dash_segments(pts)
        } else {
            vec![pts.as_slice()]
        };
        for segment in segments {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(style)
                    .data(segment),
            );
        }
    }
    datasets.push(
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(theme.marker)
            .data(&marker),
    );

    let max_x = data.months.len().saturating_sub(1).max(1) as f64;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", data.price_title), theme.header));
    let inner = block.inner(chart_area);

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(None)
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, max_x])
                .labels(x_labels(&data.months)),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds(bounds)
                .labels(y_labels(bounds)),
        );
    frame.render_widget(chart, chart_area);

    if let Some(logo) = logo {
        logo.render_corner(frame, inner);
    }

    if let Some(legend_area) = legend_area {
        let legend = Paragraph::new(Text::from(build_legend_lines(data, visible, theme))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border),
        );
        frame.render_widget(legend, legend_area);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
