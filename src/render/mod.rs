//! Backend seams: raster primitives and the filter/combine capability, with their
//! implementations.

/// Raster primitive trait and glyph quads.
pub mod backend;
/// `vello_cpu` + Parley raster backend.
pub mod cpu;
/// In-process filter backend.
pub mod cpu_filter;
/// Filter operations, chains and the filter capability trait.
pub mod filter;
/// ImageMagick filter backend.
pub mod magick;


pub use backend::{GlyphStyle, Quad, RasterBackend, TextPaint};
pub use cpu::CpuRaster;
pub use cpu_filter::CpuFilters;
pub use filter::{FilterBackend, FilterChain, FilterOp, TempDirNamer, TempNamer};
pub use magick::ImageMagick;

/// The backends one render draws with.
///
/// `filters` is `None` when external effects are disabled; effects that need it fall back or
/// are skipped.
pub struct Backends<'a> {
    pub raster: &'a mut dyn RasterBackend,
    pub filters: Option<&'a dyn FilterBackend>,
}
