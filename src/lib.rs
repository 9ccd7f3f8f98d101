#![forbid(unsafe_code)]
//! Layered raster compositing and text layout for generated menu and button graphics.
//!
//! A [`GraphicSetup`] tree (canvas properties plus numbered `TEXT`, `IMAGE`, `BOX`, `EFFECT`,
//! ... instructions) is resolved into a [`ResolvedSetup`] and rendered in key order onto a
//! [`Canvas`] through a [`RasterBackend`], with blur-based effects delegated to an optional
//! [`FilterBackend`].

pub mod assets;
pub mod compose;
pub mod composition;
pub mod effects;
pub mod expression;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod text;

mod foundation;

pub use assets::color::ColorSpec;
pub use assets::decode::OutputFormat;
pub use assets::locator::{DirLocator, ResourceLocator};
pub use composition::{GraphicSetup, ResolvedSetup, resolve_setup};
pub use foundation::core::{Bitmap, Canvas, IntRect, Rgba8Premul};
pub use foundation::error::{ForgeError, ForgeResult};
pub use pipeline::{BatchJob, EngineOpts, FilterMode, Renderer, render_batch, render_setup};
pub use render::{CpuFilters, CpuRaster, FilterBackend, RasterBackend};
