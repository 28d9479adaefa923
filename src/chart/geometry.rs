//! Pure geometry for the radial mastery chart.
//!
//! Angles are measured from 12 o'clock, clockwise, in `[0, 2π)`, in a
//! y-down coordinate space. A sector's angular span encodes how many
//! questions the topic saw; its outer radius encodes mastery.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::engine::ChartEntry;

pub const INNER_RADIUS_FRACTION: f64 = 0.18;
pub const OUTER_RADIUS_FRACTION: f64 = 0.48;
/// Extra outer radius on the hovered sector, as a fraction of the short side.
pub const HOVER_GROW_FRACTION: f64 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    pub index: usize,
    /// Offset from 12 o'clock, clockwise.
    pub start: f64,
    pub sweep: f64,
    pub mastery: f64,
    pub outer_radius: f64,
}

impl Sector {
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    /// Start angle in canvas convention (0 = 3 o'clock, y down).
    pub fn canvas_start(&self) -> f64 {
        self.start - FRAC_PI_2
    }

    pub fn canvas_end(&self) -> f64 {
        self.end() - FRAC_PI_2
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        self.sweep > 0.0 && angle >= self.start && angle < self.end()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub cx: f64,
    pub cy: f64,
    pub r0: f64,
    pub r1: f64,
    pub sectors: Vec<Sector>,
}

impl ChartGeometry {
    /// Lay out `entries` on a `width` x `height` area (CSS units). O(entries).
    pub fn compute(entries: &[ChartEntry], width: f64, height: f64) -> Self {
        let short = width.min(height).max(0.0);
        let r0 = short * INNER_RADIUS_FRACTION;
        let r1 = short * OUTER_RADIUS_FRACTION;
        let total: f64 = entries.iter().map(|e| e.value.max(0.0)).sum();

        let mut sectors = Vec::with_capacity(entries.len());
        let mut cursor = 0.0;
        for (index, entry) in entries.iter().enumerate() {
            let sweep = if total > 0.0 {
                entry.value.max(0.0) / total * TAU
            } else {
                0.0
            };
            let mastery = entry.mastery_ratio().clamp(0.0, 1.0);
            sectors.push(Sector {
                index,
                start: cursor,
                sweep,
                mastery,
                outer_radius: r0 + (r1 - r0) * mastery,
            });
            cursor += sweep;
        }

        // Close the ring exactly so the last sector owns angles up to 2π.
        if let Some(last) = sectors.iter_mut().rev().find(|s| s.sweep > 0.0) {
            last.sweep = TAU - last.start;
        }

        Self {
            width,
            height,
            cx: width / 2.0,
            cy: height / 2.0,
            r0,
            r1,
            sectors,
        }
    }

    pub fn hover_grow(&self) -> f64 {
        self.width.min(self.height).max(0.0) * HOVER_GROW_FRACTION
    }

    /// Index of the sector under `(x, y)`, or None outside the `[r0, r1]` band.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        let (dist, angle) = polar(self.cx, self.cy, x, y);
        if dist < self.r0 || dist > self.r1 {
            return None;
        }
        self.sectors
            .iter()
            .find(|s| s.contains_angle(angle))
            .or_else(|| {
                // float residue just below 2π past the last sector's end
                self.sectors
                    .iter()
                    .rev()
                    .find(|s| s.sweep > 0.0)
                    .filter(|s| angle >= s.start)
            })
            .map(|s| s.index)
    }
}

/// Distance and 12-o'clock clockwise angle of `(x, y)` around `(cx, cy)`.
pub fn polar(cx: f64, cy: f64, x: f64, y: f64) -> (f64, f64) {
    let dx = x - cx;
    let dy = y - cy;
    (dx.hypot(dy), normalize_angle(dy.atan2(dx) + FRAC_PI_2))
}

/// Angle of the pointer around the chart center; see [`polar`].
pub fn pointer_angle(cx: f64, cy: f64, x: f64, y: f64) -> f64 {
    polar(cx, cy, x, y).1
}

pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// CSS size plus device pixel ratio; the backing store is the product.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            device_pixel_ratio: if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 },
        }
    }

    pub fn backing_width(&self) -> usize {
        (self.css_width * self.device_pixel_ratio).round() as usize
    }

    pub fn backing_height(&self) -> usize {
        (self.css_height * self.device_pixel_ratio).round() as usize
    }
}

/// Place a `w` x `h` box near the pointer, flipping to the other side and
/// clamping so it stays inside the viewport.
pub fn place_tooltip(
    pointer: (f64, f64),
    size: (f64, f64),
    viewport: (f64, f64),
    offset: f64,
) -> (f64, f64) {
    let (px, py) = pointer;
    let (w, h) = size;
    let (vw, vh) = viewport;

    let mut x = px + offset;
    if x + w > vw {
        x = px - offset - w;
    }
    let mut y = py + offset;
    if y + h > vh {
        y = py - offset - h;
    }
    (
        x.clamp(0.0, (vw - w).max(0.0)),
        y.clamp(0.0, (vh - h).max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn entry(label: &str, correct: u32, total: u32, value: f64) -> ChartEntry {
        ChartEntry {
            label: label.to_string(),
            correct,
            total,
            value,
        }
    }

    fn random_entries(rng: &mut SmallRng) -> Vec<ChartEntry> {
        let n = rng.gen_range(1..9);
        let mut entries: Vec<ChartEntry> = (0..n)
            .map(|i| {
                let total = rng.gen_range(0..20);
                let correct = if total == 0 { 0 } else { rng.gen_range(0..=total) };
                entry(&format!("t{i}"), correct, total, correct as f64)
            })
            .collect();
        if entries.iter().all(|e| e.value == 0.0) {
            entries.iter_mut().for_each(|e| e.value = 1.0);
        }
        entries
    }

    /// Canvas-space point at a given chart angle and radius.
    fn point_at(g: &ChartGeometry, angle: f64, radius: f64) -> (f64, f64) {
        let a = angle - FRAC_PI_2;
        (g.cx + radius * a.cos(), g.cy + radius * a.sin())
    }

    #[test]
    fn test_radii_scale_with_short_side() {
        let g = ChartGeometry::compute(&[entry("a", 1, 1, 1.0)], 400.0, 200.0);
        assert!((g.r0 - 36.0).abs() < 1e-9);
        assert!((g.r1 - 96.0).abs() < 1e-9);
        assert_eq!((g.cx, g.cy), (200.0, 100.0));
        assert!((g.sectors[0].outer_radius - g.r1).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_proportional_to_value_and_radius_to_mastery() {
        let g = ChartGeometry::compute(
            &[entry("big", 3, 12, 3.0), entry("small", 1, 1, 1.0)],
            100.0,
            100.0,
        );
        let s = &g.sectors;
        assert!((s[0].sweep - TAU * 0.75).abs() < 1e-9);
        assert!((s[1].start - TAU * 0.75).abs() < 1e-9);
        // "big" covers more of the circle but is shorter.
        assert!(s[0].outer_radius < s[1].outer_radius);
        assert!((s[0].outer_radius - (g.r0 + (g.r1 - g.r0) * 0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_angles_partition_full_circle() {
        let mut rng = SmallRng::seed_from_u64(21);
        for _ in 0..300 {
            let entries = random_entries(&mut rng);
            let g = ChartGeometry::compute(&entries, 320.0, 240.0);
            let sum: f64 = g.sectors.iter().map(|s| s.sweep).sum();
            assert!((sum - TAU).abs() < 1e-9, "sum {sum}");
        }
    }

    #[test]
    fn test_no_value_no_sweep() {
        let g = ChartGeometry::compute(&[entry("a", 0, 0, 0.0)], 100.0, 100.0);
        assert_eq!(g.sectors[0].sweep, 0.0);
        assert_eq!(g.hit_test(50.0, 20.0), None);
        let empty = ChartGeometry::compute(&[], 100.0, 100.0);
        assert!(empty.sectors.is_empty());
    }

    #[test]
    fn test_polar_convention() {
        let (d, a) = polar(0.0, 0.0, 0.0, -10.0);
        assert!((d - 10.0).abs() < 1e-12);
        assert!(a.abs() < 1e-12, "12 o'clock is zero");
        let (_, a) = polar(0.0, 0.0, 10.0, 0.0);
        assert!((a - FRAC_PI_2).abs() < 1e-12, "3 o'clock is a quarter turn");
        let (_, a) = polar(0.0, 0.0, -10.0, 0.0);
        assert!((a - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((pointer_angle(5.0, 5.0, 5.0, 9.0) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_hit_test_band_limits() {
        let g = ChartGeometry::compute(&[entry("a", 1, 2, 1.0)], 100.0, 100.0);
        assert_eq!(g.hit_test(g.cx, g.cy), None);
        let (x, y) = point_at(&g, 1.0, g.r1 + 1.0);
        assert_eq!(g.hit_test(x, y), None);
        let (x, y) = point_at(&g, 1.0, (g.r0 + g.r1) / 2.0);
        assert_eq!(g.hit_test(x, y), Some(0));
    }

    #[test]
    fn test_hit_test_inverse() {
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..300 {
            let entries = random_entries(&mut rng);
            let g = ChartGeometry::compute(&entries, 300.0, 200.0);
            for s in g.sectors.iter().filter(|s| s.sweep > 1e-6) {
                let angle = s.start + s.sweep * rng.gen_range(0.01..0.99);
                let radius = g.r0 + (g.r1 - g.r0) * rng.gen_range(0.01..0.99);
                let (x, y) = point_at(&g, angle, radius);
                assert_eq!(g.hit_test(x, y), Some(s.index));
            }
        }
    }

    #[test]
    fn test_surface_size_scales_backing_store() {
        let size = SurfaceSize::new(150.0, 80.0, 2.0);
        assert_eq!((size.backing_width(), size.backing_height()), (300, 160));
        let bad = SurfaceSize::new(10.0, 10.0, 0.0);
        assert_eq!(bad.device_pixel_ratio, 1.0);
    }

    #[test]
    fn test_tooltip_stays_in_viewport() {
        assert_eq!(place_tooltip((10.0, 10.0), (30.0, 5.0), (100.0, 50.0), 2.0), (12.0, 12.0));
        // Flips left and up near the far corner.
        assert_eq!(place_tooltip((90.0, 48.0), (30.0, 5.0), (100.0, 50.0), 2.0), (58.0, 41.0));
        // Bigger than the viewport pins to the origin.
        assert_eq!(place_tooltip((5.0, 5.0), (200.0, 80.0), (100.0, 50.0), 2.0), (0.0, 0.0));
    }
}
