//! Bitmap compositing: tiled clipped copies and masked images.

pub mod blit;
pub mod mask;

pub use blit::{Placement, copy_gif_onto_gif, copy_resized};
pub use mask::mask_image_onto_image;
