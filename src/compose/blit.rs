use crate::effects::composite::over_region;
use crate::foundation::core::{Bitmap, IntRect, Rgba8Premul};
use crate::foundation::error::ForgeResult;
use crate::layout::position::{ObjAlign, obj_position};

/// Upper bound for either tile count.
pub const MAX_TILES: i32 = 20;

/// Where and how often a source bitmap is placed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub align: ObjAlign,
    pub offset: Vec<i32>,
    /// Repetitions across and down, each clamped to `1..=MAX_TILES`.
    pub tile: (i32, i32),
}

impl Placement {
    pub fn tiles(&self) -> (i32, i32) {
        (
            self.tile.0.clamp(1, MAX_TILES),
            self.tile.1.clamp(1, MAX_TILES),
        )
    }
}

/// Place `src` (tiled) inside `work_area` and composite every visible part onto `dst`.
///
/// The tile grid is aligned as one object; each tile is clipped to the work area and tiles
/// entirely outside it are skipped. Returns the number of tiles copied.
pub fn copy_gif_onto_gif(
    dst: &mut Bitmap,
    src: &Bitmap,
    placement: &Placement,
    work_area: IntRect,
    preserve_alpha: bool,
) -> ForgeResult<usize> {
    let (tx, ty) = placement.tiles();
    let (cw, ch) = (src.width() as i32, src.height() as i32);
    let grid = obj_position(
        placement.align,
        &placement.offset,
        work_area,
        (cw.saturating_mul(tx), ch.saturating_mul(ty)),
    );

    let mut copied = 0usize;
    for xt in 0..tx {
        for yt in 0..ty {
            let tile = IntRect::new(
                grid.x.saturating_add(cw.saturating_mul(xt)),
                grid.y.saturating_add(ch.saturating_mul(yt)),
                cw,
                ch,
            );
            let Some(visible) = tile.intersect(work_area) else {
                continue;
            };
            let cut = IntRect::new(
                visible.x.saturating_sub(tile.x),
                visible.y.saturating_sub(tile.y),
                visible.w,
                visible.h,
            );
            copy_resized(dst, src, cut, (visible.x, visible.y), preserve_alpha)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Composite `src_rect` of `src` onto `dst` at `at`.
///
/// An alpha-preserving destination is blended directly. Otherwise the destination region is
/// first lifted into a true-color scratch buffer, blended there, and written back opaque, so a
/// destination without an alpha channel never receives partial alpha.
pub fn copy_resized(
    dst: &mut Bitmap,
    src: &Bitmap,
    src_rect: IntRect,
    at: (i32, i32),
    preserve_alpha: bool,
) -> ForgeResult<()> {
    if preserve_alpha {
        over_region(dst, src, src_rect, at);
        return Ok(());
    }

    let target = IntRect::new(at.0, at.1, src_rect.w, src_rect.h);
    let Some(target) = target.intersect(dst.bounds()) else {
        return Ok(());
    };
    let mut scratch = dst.crop(target, Rgba8Premul::transparent())?;
    over_region(
        &mut scratch,
        src,
        src_rect,
        (at.0.saturating_sub(target.x), at.1.saturating_sub(target.y)),
    );
    for y in 0..target.h {
        for x in 0..target.w {
            let mut px = scratch.pixel(x as u32, y as u32);
            px[3] = 255;
            dst.set_pixel((target.x + x) as u32, (target.y + y) as u32, px);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blit.rs"]
mod tests;
