//! Source-side helpers: colors, image codecs and resource location.

/// Color spec parsing and palette unification.
pub mod color;
/// Image decode/encode and output format selection.
pub mod decode;
/// Resource locator seam.
pub mod locator;
