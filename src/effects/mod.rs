//! Pixel effects: blur, compositing arithmetic, levels, and the derived text effects.

pub mod blur;
pub mod composite;
pub mod levels;
pub mod outline;
pub mod shadow;

pub use outline::{OutlineSpec, make_outline};
pub use shadow::{EmbossSpec, ShadowSpec, make_emboss, make_shadow};
