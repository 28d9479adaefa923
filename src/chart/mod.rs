pub mod geometry;
pub mod renderer;
pub mod surface;

pub use geometry::{ChartGeometry, Sector, SurfaceSize};
pub use renderer::{ChartPalette, RadialChart, Tooltip, TooltipMetrics};
pub use surface::{DrawSurface, PixelSurface, Rgb};
