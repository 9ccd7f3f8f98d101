use crate::assets::decode::{from_straight_rgba, resize_premul, to_straight_rgba};
use crate::effects::blur::{blur_premul, effective_radius};
use crate::effects::composite::{luminance, mask_blend};
use crate::foundation::core::Bitmap;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::render::filter::{FilterBackend, FilterChain, FilterOp};

const EDGE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
const EMBOSS_KERNEL: [f32; 9] = [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0];

/// In-process filter backend on top of `image::imageops` and the gaussian blur.
///
/// Operations that need a full image processor (swirl, wave, charcoal, color reduction, shear,
/// free rotation, raw arguments) fail with [`ForgeError::Filter`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuFilters;

impl CpuFilters {
    pub fn new() -> Self {
        Self
    }
}

impl FilterBackend for CpuFilters {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn apply_chain(&self, src: &Bitmap, chain: &FilterChain) -> ForgeResult<Bitmap> {
        let mut out = src.clone();
        for op in chain.ops() {
            out = apply_op(out, op)?;
        }
        Ok(out)
    }

    fn combine(&self, base: &Bitmap, fg: &Bitmap, mask: &Bitmap) -> ForgeResult<Bitmap> {
        mask_blend(base, fg, mask)
    }
}

fn unsupported(op: &FilterOp) -> ForgeError {
    ForgeError::filter(format!(
        "'{}' needs an external image processor",
        op.magick_args().join(" ")
    ))
}

fn apply_op(src: Bitmap, op: &FilterOp) -> ForgeResult<Bitmap> {
    use image::imageops;

    match op {
        FilterOp::Blur { radius, sigma } => {
            let sigma = if *sigma > 0.0 {
                *sigma
            } else {
                radius.max(1.0) / 2.0
            };
            blur_premul(&src, effective_radius(*radius, sigma), sigma)
        }
        FilterOp::Sharpen { sigma, .. } => {
            let rgba = to_straight_rgba(&src)?;
            from_straight_rgba(imageops::unsharpen(&rgba, sigma.max(0.1), 0))
        }
        FilterOp::Negate => Ok(map_straight(src, |c| 255 - c)),
        FilterOp::Resize { width, height } => {
            if *width == 0 || *height == 0 {
                return Err(ForgeError::filter("resize target must be > 0"));
            }
            resize_premul(&src, *width, *height)
        }
        FilterOp::Gamma(g) => {
            if !g.is_finite() || *g <= 0.0 {
                return Err(ForgeError::filter(format!("invalid gamma {g}")));
            }
            let inv = 1.0 / f64::from(*g);
            Ok(map_straight(src, |c| {
                (255.0 * (f64::from(c) / 255.0).powf(inv)).round().clamp(0.0, 255.0) as u8
            }))
        }
        FilterOp::Rotate(deg) => {
            let rgba = to_straight_rgba(&src)?;
            let rotated = match deg.rem_euclid(360) {
                0 => return Ok(src),
                90 => imageops::rotate90(&rgba),
                180 => imageops::rotate180(&rgba),
                270 => imageops::rotate270(&rgba),
                _ => return Err(unsupported(op)),
            };
            from_straight_rgba(rotated)
        }
        FilterOp::Solarize(pct) => {
            let threshold = (f64::from(*pct).clamp(0.0, 100.0) / 100.0 * 255.0).round() as u8;
            Ok(map_straight(src, |c| if c > threshold { 255 - c } else { c }))
        }
        FilterOp::Gray => {
            let mut out = src;
            for px in out.data_mut().chunks_exact_mut(4) {
                let l = luminance([px[0], px[1], px[2], px[3]]);
                px[0] = l;
                px[1] = l;
                px[2] = l;
            }
            Ok(out)
        }
        FilterOp::Edge(_) => convolve(&src, &EDGE_KERNEL),
        FilterOp::Emboss => convolve(&src, &EMBOSS_KERNEL),
        FilterOp::Flip => {
            let rgba = to_straight_rgba(&src)?;
            from_straight_rgba(imageops::flip_vertical(&rgba))
        }
        FilterOp::Flop => {
            let rgba = to_straight_rgba(&src)?;
            from_straight_rgba(imageops::flip_horizontal(&rgba))
        }
        FilterOp::Swirl(_)
        | FilterOp::Wave { .. }
        | FilterOp::Charcoal(_)
        | FilterOp::Colors(_)
        | FilterOp::Shear(_)
        | FilterOp::Raw(_) => Err(unsupported(op)),
    }
}

/// Apply `f` to straight RGB, keeping alpha.
fn map_straight(mut bitmap: Bitmap, f: impl Fn(u8) -> u8) -> Bitmap {
    use crate::foundation::math::{premultiply, unpremultiply};

    for px in bitmap.data_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let s = unpremultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&premultiply([f(s[0]), f(s[1]), f(s[2]), s[3]]));
    }
    bitmap
}

/// 3x3 convolution of the color channels; alpha is kept from the source.
fn convolve(src: &Bitmap, kernel: &[f32; 9]) -> ForgeResult<Bitmap> {
    let rgba = to_straight_rgba(src)?;
    let mut filtered = image::imageops::filter3x3(&rgba, kernel);
    for (out, orig) in filtered.pixels_mut().zip(rgba.pixels()) {
        out.0[3] = orig.0[3];
    }
    from_straight_rgba(filtered)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu_filter.rs"]
mod tests;
