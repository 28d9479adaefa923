use quizdeck::chart::{PixelSurface, RadialChart, Rgb, SurfaceSize, Tooltip};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Clear, Widget};

use crate::ui::theme::Theme;

/// Each terminal row holds two raster rows via the upper half block.
pub const PIXELS_PER_ROW: f64 = 2.0;

/// Smallest area, in cells, the ring is drawn into.
pub const MIN_CHART_COLS: u16 = 12;
pub const MIN_CHART_ROWS: u16 = 6;

pub fn surface_size(area: Rect) -> SurfaceSize {
    SurfaceSize::new(area.width as f64, area.height as f64 * PIXELS_PER_ROW, 1.0)
}

pub fn fits(area: Rect) -> bool {
    area.width >= MIN_CHART_COLS && area.height >= MIN_CHART_ROWS
}

/// Map a terminal cell to the CSS point at its center, or None outside `area`.
pub fn cell_to_point(area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }
    let x = (column - area.x) as f64 + 0.5;
    let y = (row - area.y) as f64 * PIXELS_PER_ROW + PIXELS_PER_ROW / 2.0;
    Some((x, y))
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub struct RadialChartView<'a> {
    chart: &'a RadialChart<PixelSurface>,
    theme: &'a Theme,
}

impl<'a> RadialChartView<'a> {
    pub fn new(chart: &'a RadialChart<PixelSurface>, theme: &'a Theme) -> Self {
        Self { chart, theme }
    }

    fn render_tooltip(&self, tip: &Tooltip, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let x = area.x + tip.x.floor() as u16;
        let y = area.y + (tip.y / PIXELS_PER_ROW).floor() as u16;
        let w = (tip.width.ceil() as u16).min(area.right().saturating_sub(x));
        let h = ((tip.height / PIXELS_PER_ROW).ceil() as u16).min(area.bottom().saturating_sub(y));
        let rect = Rect::new(x, y, w, h);
        if rect.width < 3 || rect.height < 3 {
            return;
        }

        Clear.render(rect, buf);
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.selected_bg()).fg(colors.fg()));
        let inner = block.inner(rect);
        block.render(rect, buf);
        for (i, line) in tip.lines().iter().enumerate() {
            let row = inner.y + i as u16;
            if row >= inner.bottom() {
                break;
            }
            let style = if i == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            buf.set_stringn(inner.x, row, line, inner.width as usize, style);
        }
    }
}

impl Widget for RadialChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let surface = self.chart.surface();
        let bg = self.theme.colors.bg();

        for row in 0..area.height {
            for col in 0..area.width {
                let top = surface.pixel(col as usize, row as usize * 2);
                let bottom = surface.pixel(col as usize, row as usize * 2 + 1);
                if top.is_none() && bottom.is_none() {
                    continue;
                }
                let fg = top.map(color).unwrap_or(bg);
                let cell_bg = bottom.map(color).unwrap_or(bg);
                buf[(area.x + col, area.y + row)]
                    .set_symbol("▀")
                    .set_fg(fg)
                    .set_bg(cell_bg);
            }
        }

        for label in surface.labels() {
            let len = label.text.chars().count() as f64;
            let x = (label.x - len / 2.0).max(0.0) as u16;
            let y = (label.y / PIXELS_PER_ROW) as u16;
            if x >= area.width || y >= area.height {
                continue;
            }
            buf.set_stringn(
                area.x + x,
                area.y + y,
                &label.text,
                (area.width - x) as usize,
                Style::default()
                    .fg(color(label.color))
                    .add_modifier(Modifier::BOLD),
            );
        }

        if let Some(tip) = self.chart.tooltip() {
            self.render_tooltip(tip, area, buf);
        }
    }
}
