//! Bounding boxes, work area tracking and object placement.

/// Per-position bounding-box side table.
pub mod bbox;
/// Alignment and offset placement.
pub mod position;
/// Current/default clip rectangle.
pub mod workarea;
