use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
    Frame,
};
use tracing::{debug, warn};

/// Share of the chart width the logo occupies.
pub const LOGO_WIDTH_FRACTION: f64 = 0.1;

/// Upper bound on the stored source width; terminal cells never need more.
const MAX_SOURCE_WIDTH: u32 = 256;

/// Branding image drawn in the corner of each chart.
///
/// Each terminal cell shows two vertically stacked pixels using an upper
/// half block with the top pixel as foreground and the bottom as background.
#[derive(Debug, Clone)]
pub struct Logo {
    image: RgbImage,
}

impl Logo {
    /// Decode the image at `path`.
    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        let image = image::open(path)?;
        debug!(
            "Loaded logo {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_image(image))
    }

    /// Like [`Logo::load`], but a missing or unreadable file only logs a
    /// warning.
    pub fn try_load(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(logo) => Some(logo),
            Err(e) => {
                warn!("Logo {} not loaded, charts drawn without it: {}", path.display(), e);
                None
            }
        }
    }

    pub fn from_image(image: DynamicImage) -> Self {
        let image = if image.width() > MAX_SOURCE_WIDTH {
            image.resize(MAX_SOURCE_WIDTH, u32::MAX, FilterType::Triangle)
        } else {
            image
        };
        Self {
            image: image.to_rgb8(),
        }
    }

    /// Terminal rows needed to draw the logo `columns` cells wide while
    /// keeping its aspect ratio.
    pub fn rows_for(&self, columns: u16) -> u16 {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 || columns == 0 {
            return 0;
        }
        let pixel_rows = (f64::from(columns) * f64::from(h) / f64::from(w)).round().max(1.0);
        (pixel_rows / 2.0).ceil() as u16
    }

    /// `(top, bottom)` colour pairs, row-major, for a `columns` x `rows` grid.
    pub fn cells(&self, columns: u16, rows: u16) -> Vec<Vec<(Color, Color)>> {
        if columns == 0 || rows == 0 || self.image.width() == 0 || self.image.height() == 0 {
            return Vec::new();
        }
        let scaled = image::imageops::resize(
            &self.image,
            u32::from(columns),
            u32::from(rows) * 2,
            FilterType::Triangle,
        );
        let color = |x: u32, y: u32| {
            let [r, g, b] = scaled.get_pixel(x, y).0;
            Color::Rgb(r, g, b)
        };
        (0..u32::from(rows))
            .map(|row| {
                (0..u32::from(columns))
                    .map(|col| (color(col, row * 2), color(col, row * 2 + 1)))
                    .collect()
            })
            .collect()
    }

    /// Draw the logo in the top-right corner of `area`.
    pub fn render_corner(&self, frame: &mut Frame, area: Rect) {
        let columns = ((f64::from(area.width) * LOGO_WIDTH_FRACTION).round() as u16).max(1);
        let rows = self.rows_for(columns).min(area.height);
        frame.render_widget(self, corner_area(area, columns, rows));
    }
}

impl Widget for &Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (dy, row) in self.cells(area.width, area.height).iter().enumerate() {
            for (dx, &(top, bottom)) in row.iter().enumerate() {
                let position = (area.x + dx as u16, area.y + dy as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// A `columns` x `rows` rectangle in the top-right corner of `area`.
pub fn corner_area(area: Rect, columns: u16, rows: u16) -> Rect {
    let width = columns.min(area.width);
    Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: rows.min(area.height),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
