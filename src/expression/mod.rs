//! Offset and dimension expressions (`"10+[20.w],max(3,[5.h])"`).

pub(crate) mod lexer;
/// Comma-list resolution with bounding-box references.
pub mod offset;
