use tracing::debug;

use crate::chart::geometry::{ChartGeometry, SurfaceSize, place_tooltip};
use crate::chart::surface::{DrawSurface, Rgb};
use crate::engine::ChartEntry;
use crate::engine::mastery::totals;
use crate::error::{QuizError, QuizResult};

const HOVER_BRIGHTEN: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPalette {
    /// Sector color at 0% mastery.
    pub low: Rgb,
    /// Sector color at 100% mastery.
    pub high: Rgb,
    pub stroke: Rgb,
    pub text: Rgb,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            low: Rgb(0xf3, 0x8b, 0xa8),
            high: Rgb(0xa6, 0xe3, 0xa1),
            stroke: Rgb(0x11, 0x11, 0x1b),
            text: Rgb(0xcd, 0xd6, 0xf4),
        }
    }
}

/// How text occupies CSS space on the target surface, for tooltip sizing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
    /// Gap between pointer and tooltip corner.
    pub offset: f64,
}

impl Default for TooltipMetrics {
    // One terminal cell is 1 CSS unit wide and 2 tall on the half-block raster.
    fn default() -> Self {
        Self {
            char_width: 1.0,
            line_height: 2.0,
            padding: 1.0,
            offset: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub index: usize,
    pub label: String,
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
    /// Top-left corner, CSS units, already clamped to the viewport.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Tooltip {
    pub fn lines(&self) -> Vec<String> {
        tooltip_lines(&self.label, self.correct, self.total, self.percent)
    }
}

fn tooltip_lines(label: &str, correct: u32, total: u32, percent: u32) -> Vec<String> {
    vec![label.to_string(), format!("{correct}/{total} ({percent}%)")]
}

/// Interactive radial mastery chart bound to one drawing surface.
///
/// Sector angle is proportional to a topic's weight and outer radius to its
/// mastery ratio. Pointer input is routed in by the owner; `destroy` hands
/// the surface back and nothing can reach the chart afterwards.
pub struct RadialChart<S: DrawSurface> {
    surface: S,
    entries: Vec<ChartEntry>,
    palette: ChartPalette,
    metrics: TooltipMetrics,
    size: SurfaceSize,
    geometry: ChartGeometry,
    hovered: Option<usize>,
    tooltip: Option<Tooltip>,
}

impl<S: DrawSurface> RadialChart<S> {
    pub fn attach(
        surface: Option<S>,
        entries: Vec<ChartEntry>,
        palette: ChartPalette,
        size: SurfaceSize,
    ) -> QuizResult<Self> {
        let surface =
            surface.ok_or_else(|| QuizError::SurfaceUnavailable("no drawing surface".to_string()))?;
        if !surface.supports_2d() {
            return Err(QuizError::SurfaceUnavailable(
                "surface has no 2D context".to_string(),
            ));
        }

        let geometry = ChartGeometry::compute(&entries, size.css_width, size.css_height);
        let mut chart = Self {
            surface,
            entries,
            palette,
            metrics: TooltipMetrics::default(),
            size,
            geometry,
            hovered: None,
            tooltip: None,
        };
        chart.resize(size);
        Ok(chart)
    }

    pub fn with_tooltip_metrics(mut self, metrics: TooltipMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Resize the backing store to `css * dpr`, scale drawing back to CSS
    /// units, and redraw.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.surface
            .resize(size.backing_width(), size.backing_height());
        self.surface.set_scale(size.device_pixel_ratio);
        self.geometry = ChartGeometry::compute(&self.entries, size.css_width, size.css_height);
        // Sector positions moved under the pointer.
        self.hovered = None;
        self.tooltip = None;
        self.draw();
    }

    pub fn update(&mut self, entries: Vec<ChartEntry>) {
        self.entries = entries;
        self.geometry =
            ChartGeometry::compute(&self.entries, self.size.css_width, self.size.css_height);
        // The tooltip copied the old entry; the next pointer move rebuilds it.
        self.hovered = None;
        self.tooltip = None;
        self.draw();
    }

    pub fn draw(&mut self) {
        let g = &self.geometry;
        let surface = &mut self.surface;
        surface.clear();

        for sector in g.sectors.iter().filter(|s| s.sweep > 0.0) {
            let mut color = self.palette.low.mix(self.palette.high, sector.mastery);
            let mut radius = sector.outer_radius;
            if self.hovered == Some(sector.index) {
                color = color.brighten(HOVER_BRIGHTEN);
                radius += g.hover_grow();
            }
            let (start, end) = (sector.canvas_start(), sector.canvas_end());
            surface.fill_wedge(g.cx, g.cy, radius, start, end, color);
            surface.clear_disk(g.cx, g.cy, g.r0);
            surface.stroke_arc(g.cx, g.cy, radius, start, end, self.palette.stroke);
        }

        if !self.entries.is_empty() {
            let (correct, total) = totals(&self.entries);
            surface.fill_text(g.cx, g.cy, &format!("{correct}/{total}"), self.palette.text);
        }
    }

    /// Route a pointer position (CSS units relative to the surface). Returns
    /// the tooltip to show, if any. Redraws only when the highlight changes.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<&Tooltip> {
        let hit = self.geometry.hit_test(x, y);
        if hit != self.hovered {
            debug!(?hit, "chart hover changed");
            self.hovered = hit;
            self.draw();
        }

        self.tooltip = hit.and_then(|index| {
            let entry = self.entries.get(index)?;
            let percent = entry.percent();
            let lines = tooltip_lines(&entry.label, entry.correct, entry.total, percent);
            let m = self.metrics;
            let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let width = longest as f64 * m.char_width + 2.0 * m.padding * m.char_width;
            let height = lines.len() as f64 * m.line_height + 2.0 * m.padding * m.line_height;
            let (tx, ty) = place_tooltip(
                (x, y),
                (width, height),
                (self.size.css_width, self.size.css_height),
                m.offset,
            );
            Some(Tooltip {
                index,
                label: entry.label.clone(),
                correct: entry.correct,
                total: entry.total,
                percent,
                x: tx,
                y: ty,
                width,
                height,
            })
        });
        self.tooltip.as_ref()
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip = None;
        if self.hovered.take().is_some() {
            self.draw();
        }
    }

    /// Detach: drop hover state and the tooltip, and return the surface.
    pub fn destroy(mut self) -> S {
        self.tooltip = None;
        self.hovered = None;
        self.surface
    }
}
