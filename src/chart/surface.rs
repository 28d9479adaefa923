//! Drawing surfaces for the radial chart.
//!
//! The renderer only talks to [`DrawSurface`]; [`PixelSurface`] is an RGB
//! raster used by the terminal widget and by tests.

use std::f64::consts::TAU;

use crate::chart::geometry::normalize_angle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        Some(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Linear blend; `t = 0` is `self`, `t = 1` is `other`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(lerp(self.0, other.0), lerp(self.1, other.1), lerp(self.2, other.2))
    }

    pub fn brighten(self, amount: f64) -> Rgb {
        self.mix(Rgb(255, 255, 255), amount)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    /// CSS units, centered horizontally on `x`.
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Rgb,
}

/// Minimal 2D drawing contract. Coordinates are CSS units; the surface
/// applies its own scale to reach backing pixels. Angles use the canvas
/// convention (0 = 3 o'clock, clockwise with y down).
pub trait DrawSurface {
    /// Whether the surface can accept 2D drawing at all.
    fn supports_2d(&self) -> bool {
        true
    }
    /// Resize the backing store in device pixels. Clears it.
    fn resize(&mut self, width: usize, height: usize);
    /// CSS-to-device scale applied to later drawing calls.
    fn set_scale(&mut self, scale: f64);
    fn clear(&mut self);
    fn fill_wedge(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: Rgb);
    /// Destination-out: erase everything inside the disk.
    fn clear_disk(&mut self, cx: f64, cy: f64, radius: f64);
    fn stroke_arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: Rgb);
    fn fill_text(&mut self, x: f64, y: f64, text: &str, color: Rgb);
}

pub struct PixelSurface {
    width: usize,
    height: usize,
    scale: f64,
    pixels: Vec<Option<Rgb>>,
    labels: Vec<TextLabel>,
}

impl Default for PixelSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl PixelSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
            pixels: vec![None; width * height],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y * self.width + x]
    }

    /// Pixel under a CSS-unit point.
    pub fn pixel_at_css(&self, x: f64, y: f64) -> Option<Rgb> {
        let px = x * self.scale;
        let py = y * self.scale;
        if px < 0.0 || py < 0.0 {
            return None;
        }
        self.pixel(px as usize, py as usize)
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn painted_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    /// Visit every backing pixel whose center falls inside `radius` (device
    /// units) of the device-space center, passing its distance and angle.
    fn for_each_in_disk(&mut self, cx: f64, cy: f64, radius: f64, mut f: impl FnMut(f64, f64, &mut Option<Rgb>)) {
        if self.width == 0 || self.height == 0 || radius <= 0.0 {
            return;
        }
        let x_min = ((cx - radius).floor().max(0.0)) as usize;
        let y_min = ((cy - radius).floor().max(0.0)) as usize;
        let x_max = ((cx + radius).ceil().max(0.0) as usize).min(self.width);
        let y_max = ((cy + radius).ceil().max(0.0) as usize).min(self.height);
        for y in y_min..y_max {
            for x in x_min..x_max {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let dist = dx.hypot(dy);
                if dist <= radius {
                    f(dist, normalize_angle(dy.atan2(dx)), &mut self.pixels[y * self.width + x]);
                }
            }
        }
    }
}

/// Whether canvas-convention `angle` (already in `[0, 2π)`) lies in the
/// clockwise span from `start` to `end`.
fn in_span(angle: f64, start: f64, end: f64) -> bool {
    let sweep = end - start;
    if sweep >= TAU {
        return true;
    }
    if sweep <= 0.0 {
        return false;
    }
    normalize_angle(angle - start) < sweep
}

impl DrawSurface for PixelSurface {
    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![None; width * height];
        self.labels.clear();
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = if scale > 0.0 { scale } else { 1.0 };
    }

    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = None);
        self.labels.clear();
    }

    fn fill_wedge(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: Rgb) {
        let s = self.scale;
        self.for_each_in_disk(cx * s, cy * s, radius * s, |_, angle, px| {
            if in_span(angle, start, end) {
                *px = Some(color);
            }
        });
    }

    fn clear_disk(&mut self, cx: f64, cy: f64, radius: f64) {
        let s = self.scale;
        self.for_each_in_disk(cx * s, cy * s, radius * s, |_, _, px| *px = None);
    }

    fn stroke_arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: Rgb) {
        let s = self.scale;
        let r = radius * s;
        // One device pixel wide, just inside the arc.
        self.for_each_in_disk(cx * s, cy * s, r, |dist, angle, px| {
            if dist >= r - 1.0 && in_span(angle, start, end) {
                *px = Some(color);
            }
        });
    }

    fn fill_text(&mut self, x: f64, y: f64, text: &str, color: Rgb) {
        self.labels.push(TextLabel {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }
}
