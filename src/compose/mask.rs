use crate::compose::blit::{Placement, copy_gif_onto_gif};
use crate::foundation::core::{Bitmap, Canvas, IntRect, Rgba8Premul};
use crate::foundation::error::ForgeResult;
use crate::render::backend::RasterBackend;
use crate::render::filter::FilterBackend;

/// Composite `image` onto the canvas through `mask`, both placed by `placement`.
///
/// Image and mask are each positioned onto a black canvas-sized layer; the filter backend then
/// blends the image layer over the canvas weighted by the mask layer's luminance and the
/// result replaces the canvas. A failed combine leaves the canvas unchanged.
#[tracing::instrument(skip_all)]
pub fn mask_image_onto_image(
    raster: &mut dyn RasterBackend,
    filters: &dyn FilterBackend,
    canvas: &mut Canvas,
    image: &Bitmap,
    mask: &Bitmap,
    placement: &Placement,
    work_area: IntRect,
) -> ForgeResult<()> {
    let (w, h) = (canvas.width(), canvas.height());
    let black = Rgba8Premul::opaque(0, 0, 0);

    let mut mask_layer = raster.allocate(w, h)?;
    mask_layer.fill(black);
    copy_gif_onto_gif(&mut mask_layer, mask, placement, work_area, false)?;

    let mut image_layer = raster.allocate(w, h)?;
    image_layer.fill(black);
    copy_gif_onto_gif(&mut image_layer, image, placement, work_area, false)?;

    match filters.combine(&canvas.bitmap, &image_layer, &mask_layer) {
        Ok(out) => canvas.bitmap = out,
        Err(err) => {
            tracing::warn!(backend = filters.name(), error = %err, "masked image not combined");
        }
    }
    Ok(())
}
