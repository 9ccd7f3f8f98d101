//! Drop shadows and the two-shadow emboss bevel.

use crate::assets::color::ColorSpec;
use crate::effects::levels::LevelsOp;
use crate::foundation::core::{Bitmap, IntRect, Rgba8Premul};
use crate::foundation::error::ForgeResult;
use crate::render::Backends;
use crate::render::backend::TextPaint;
use crate::render::filter::{FilterChain, blur_for_strength};
use crate::text::render::{make_text, render_glyphs, text_origin};
use crate::text::run::TextRun;

/// Margin around the shadow mask so the blur does not clip at the canvas edge.
const BLUR_BORDER: i32 = 3;

const DEFAULT_INTENSITY: i32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowSpec {
    pub offset: (i32, i32),
    /// 0..=99; 0 draws a hard shadow.
    pub blur: i32,
    /// 0..=100; 0 means the default of 40.
    pub intensity: i32,
    /// 0..=100; 0 and 100 leave the mask range untouched.
    pub opacity: i32,
    pub color: ColorSpec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmbossSpec {
    pub offset: (i32, i32),
    pub high_color: ColorSpec,
    pub low_color: ColorSpec,
    pub blur: i32,
    pub intensity: i32,
    pub opacity: i32,
}

impl EmbossSpec {
    /// The highlight shadow, or with `low` the opposite-offset dark one.
    pub fn shadow(&self, low: bool) -> ShadowSpec {
        let (offset, color) = if low {
            ((-self.offset.0, -self.offset.1), self.low_color)
        } else {
            (self.offset, self.high_color)
        };
        ShadowSpec {
            offset,
            blur: self.blur,
            intensity: self.intensity,
            opacity: self.opacity,
            color,
        }
    }
}

/// Draw the shadow of `run` onto `dst`.
///
/// Without blur or without a filter backend the text is simply redrawn in the shadow color at
/// the offset. Otherwise a white-on-black mask is blurred, leveled and used to blend a flat
/// shadow-color layer; a failed filter call leaves `dst` unchanged.
#[tracing::instrument(skip_all)]
pub fn make_shadow(
    backends: &mut Backends<'_>,
    dst: &mut Bitmap,
    run: &TextRun,
    work_area: IntRect,
    spec: ShadowSpec,
) -> ForgeResult<()> {
    let area = work_area.translate(spec.offset.0, spec.offset.1);
    let blur = spec.blur.clamp(0, 99);
    let filters = match backends.filters {
        Some(f) if blur > 0 => f,
        _ => return make_text(backends, dst, run, area, spec.color),
    };
    if run.hide {
        return Ok(());
    }

    let (w, h) = (dst.width(), dst.height());
    let border = BLUR_BORDER as u32;
    let mut mask = backends.raster.allocate(w + 2 * border, h + 2 * border)?;
    mask.fill(Rgba8Premul::opaque(0, 0, 0));
    let paint = TextPaint {
        color: ColorSpec::WHITE,
        antialias: run.antialias,
    };
    let pos = text_origin(run, area.translate(BLUR_BORDER, BLUR_BORDER));
    render_glyphs(backends.raster, &mut mask, run, pos, paint, 1.0, true);

    let chain: FilterChain = blur_for_strength(i64::from(blur) + 1).into_iter().collect();
    let blurred = match filters.apply_chain(&mask, &chain) {
        Ok(b) => b,
        Err(err) => {
            tracing::warn!(backend = filters.name(), error = %err, "shadow blur failed");
            return Ok(());
        }
    };
    let mut mask = blurred.crop(
        IntRect::new(BLUR_BORDER, BLUR_BORDER, w as i32, h as i32),
        Rgba8Premul::opaque(0, 0, 0),
    )?;

    let intensity = if spec.intensity != 0 {
        spec.intensity.clamp(0, 100)
    } else {
        DEFAULT_INTENSITY
    };
    let high = (255.0 - f64::from(intensity) / 100.0 * 255.0).ceil() as i32;
    backends
        .raster
        .levels_adjust(&mut mask, LevelsOp::Input { low: 0, high });

    let opacity = spec.opacity.clamp(0, 100);
    if opacity > 0 && opacity < 100 {
        let high = (255.0 * f64::from(opacity) / 100.0).ceil() as i32;
        backends
            .raster
            .levels_adjust(&mut mask, LevelsOp::Output { low: 0, high });
    }

    let mut layer = backends.raster.allocate(w, h)?;
    layer.fill(spec.color.to_premul());
    match filters.combine(dst, &layer, &mask) {
        Ok(out) => *dst = out,
        Err(err) => {
            tracing::warn!(backend = filters.name(), error = %err, "shadow combine failed");
        }
    }
    Ok(())
}

/// Highlight shadow at `offset`, then the dark shadow at the negated offset.
#[tracing::instrument(skip_all)]
pub fn make_emboss(
    backends: &mut Backends<'_>,
    dst: &mut Bitmap,
    run: &TextRun,
    work_area: IntRect,
    spec: EmbossSpec,
) -> ForgeResult<()> {
    make_shadow(backends, dst, run, work_area, spec.shadow(false))?;
    make_shadow(backends, dst, run, work_area, spec.shadow(true))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
