//! Text layout: normalize, autofit, split into styled segments, measure, position and draw.

pub mod measure;
pub mod normalize;
pub mod render;
pub mod run;
pub mod split;

pub use measure::{calc_bbox, font_resize};
pub use render::make_text;
pub use run::{NiceText, SplitKind, SplitRendering, SplitRule, TextBox, TextRun};
