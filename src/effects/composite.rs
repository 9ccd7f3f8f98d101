use crate::foundation::core::{Bitmap, IntRect};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, scaled by `opacity` in `0..=1`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ForgeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ForgeError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src_rect` of `src` over `dst` with its top-left at `at`.
///
/// Both rectangles are clipped to their buffers; nothing outside `dst` is touched.
pub fn over_region(dst: &mut Bitmap, src: &Bitmap, src_rect: IntRect, at: (i32, i32)) {
    let Some(sr) = src_rect.intersect(src.bounds()) else {
        return;
    };
    let shifted = (
        at.0.saturating_add(sr.x.saturating_sub(src_rect.x)),
        at.1.saturating_add(sr.y.saturating_sub(src_rect.y)),
    );
    let dst_rect = IntRect::new(shifted.0, shifted.1, sr.w, sr.h);
    let Some(dr) = dst_rect.intersect(dst.bounds()) else {
        return;
    };

    let sx0 = sr.x.saturating_add(dr.x.saturating_sub(dst_rect.x));
    let sy0 = sr.y.saturating_add(dr.y.saturating_sub(dst_rect.y));
    for row in 0..dr.h {
        for col in 0..dr.w {
            let s = src.pixel((sx0 + col) as u32, (sy0 + row) as u32);
            if s[3] == 0 {
                continue;
            }
            let (dx, dy) = ((dr.x + col) as u32, (dr.y + row) as u32);
            let d = dst.pixel(dx, dy);
            dst.set_pixel(dx, dy, over(d, s, 1.0));
        }
    }
}

/// Perceptual luminance of a premultiplied pixel; transparent reads as black.
pub fn luminance(px: PremulRgba8) -> u8 {
    let l = 299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2]);
    ((l + 500) / 1000).min(255) as u8
}

/// Blend `fg` over `base` with the per-pixel opacity taken from `mask` luminance.
///
/// A white mask yields `fg` over `base`; a black mask leaves `base` untouched.
pub fn mask_blend(base: &Bitmap, fg: &Bitmap, mask: &Bitmap) -> ForgeResult<Bitmap> {
    if base.bounds() != fg.bounds() || base.bounds() != mask.bounds() {
        return Err(ForgeError::validation(
            "mask_blend expects equally sized base, foreground and mask",
        ));
    }
    let mut out = base.clone();
    for ((d, f), m) in out
        .data_mut()
        .chunks_exact_mut(4)
        .zip(fg.data().chunks_exact(4))
        .zip(mask.data().chunks_exact(4))
    {
        let m = luminance([m[0], m[1], m[2], m[3]]);
        if m == 0 {
            continue;
        }
        let px = over(
            [d[0], d[1], d[2], d[3]],
            [f[0], f[1], f[2], f[3]],
            f32::from(m) / 255.0,
        );
        d.copy_from_slice(&px);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
