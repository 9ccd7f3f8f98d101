use crate::assets::color::ColorSpec;
use crate::foundation::core::{Bitmap, IntRect};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::layout::position::txt_position;
use crate::render::Backends;
use crate::render::backend::{GlyphStyle, RasterBackend, TextPaint};
use crate::render::filter::{FilterBackend, FilterChain, FilterOp, sharpen_for_strength};
use crate::text::measure::{bbox_wrapper, break_lines, break_space, calc_bbox};
use crate::text::run::{NiceText, TextRun, scale};
use crate::text::split::split_string;

/// Draw `run` onto `dst` inside `work_area` using `color` for every segment without its own.
///
/// Hidden runs draw nothing. Nice text goes through the filter backend when one is available
/// and falls back to direct glyph rendering otherwise. Only allocation failures are returned.
#[tracing::instrument(skip_all, fields(text = %run.text))]
pub fn make_text(
    backends: &mut Backends<'_>,
    dst: &mut Bitmap,
    run: &TextRun,
    work_area: IntRect,
    color: ColorSpec,
) -> ForgeResult<()> {
    if run.hide {
        return Ok(());
    }
    let pos = text_origin(run, work_area);

    if let Some(nice) = &run.nice_text {
        if let Some(filters) = backends.filters {
            return nice_text(backends.raster, filters, dst, run, pos, color, nice);
        }
        tracing::debug!("no filter backend; nice text rendered directly");
    }

    let paint = TextPaint {
        color,
        antialias: run.antialias,
    };
    for _ in 0..run.iterations.max(1) {
        render_glyphs(backends.raster, dst, run, pos, paint, 1.0, false);
    }
    Ok(())
}

/// Pen origin of the first glyph of `run` inside `work_area`.
pub fn text_origin(run: &TextRun, work_area: IntRect) -> (i32, i32) {
    txt_position(
        run.align,
        run.angle,
        (run.bbox.w, run.bbox.h),
        run.bbox.straight_w,
        &run.offset,
        work_area,
    )
}

/// Draw all lines (or spaced characters/words) of `run` at pen position `pos` scaled by `sf`.
///
/// With `mask_mode`, per-segment colors are ignored so the output stays a clean mask.
pub(crate) fn render_glyphs(
    raster: &mut dyn RasterBackend,
    dst: &mut Bitmap,
    run: &TextRun,
    pos: (i32, i32),
    paint: TextPaint,
    sf: f32,
    mask_mode: bool,
) {
    let origin = (
        (pos.0 as f32 * sf).ceil() as i32,
        (pos.1 as f32 * sf).ceil() as i32,
    );

    if run.has_spacing() {
        let (spacing, word_spacing) = run.spacing_at(sf);
        let mut x = origin.0;
        if spacing == 0 {
            for word in run.text.split(' ') {
                let word = format!("{word} ");
                let q = bbox_wrapper(raster, run, &word, sf);
                draw_line(raster, dst, run, &word, (x, origin.1), paint, sf, mask_mode);
                x += q[2] - q[0] + word_spacing;
            }
        } else {
            let mut buf = [0u8; 4];
            for c in run.text.chars() {
                let s = c.encode_utf8(&mut buf);
                let q = bbox_wrapper(raster, run, s, sf);
                draw_line(raster, dst, run, s, (x, origin.1), paint, sf, mask_mode);
                x += q[2] - q[0] + if c == ' ' { word_spacing } else { spacing };
            }
        }
        return;
    }

    let lines = break_lines(raster, run, &run.text);
    let step = if lines.len() > 1 {
        let line_height = if run.bbox.line_height > 0 {
            run.bbox.line_height
        } else {
            calc_bbox(raster, run).line_height
        };
        scale(break_space(run, line_height), sf)
    } else {
        0
    };
    let mut y = origin.1;
    for line in &lines {
        draw_line(raster, dst, run, line, (origin.0, y), paint, sf, mask_mode);
        y += step;
    }
}

/// Draw one line segment by segment, advancing the pen by each measured segment.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    raster: &mut dyn RasterBackend,
    dst: &mut Bitmap,
    run: &TextRun,
    text: &str,
    origin: (i32, i32),
    paint: TextPaint,
    sf: f32,
    mask_mode: bool,
) {
    let comp_x = scale(run.split.comp_x, sf);
    let comp_y = scale(run.split.comp_y, sf);
    let (mut x, mut y) = origin;

    for (i, seg) in split_string(text, &run.base_style(sf), &run.split, sf)
        .into_iter()
        .enumerate()
    {
        let color = match seg.style.color {
            Some(c) if !mask_mode => c,
            _ => paint.color,
        };
        if i > 0 {
            x += seg.style.x_space_before;
            y -= seg.style.y_space_before;
        }
        let style = GlyphStyle {
            font: seg.style.font.clone(),
            size: seg.style.size,
            angle: run.angle,
        };
        let seg_paint = TextPaint { color, ..paint };
        if let Err(err) = raster.draw_text(dst, &style, (x, y), seg_paint, &seg.text) {
            tracing::warn!(font = %style.font.display(), error = %err, "text segment not drawn");
            continue;
        }
        let Ok(q) = raster.measure_text(&style, &seg.text) else {
            continue;
        };
        x += q[2] - q[0] + comp_x + seg.style.x_space_after;
        y += q[5] - q[7] - comp_y - seg.style.y_space_after;
    }
}

/// Render black-on-white at `scale_factor`, downscale and negate through the filter backend,
/// then blend a flat `color` layer onto `dst` through the resulting mask.
fn nice_text(
    raster: &mut dyn RasterBackend,
    filters: &dyn FilterBackend,
    dst: &mut Bitmap,
    run: &TextRun,
    pos: (i32, i32),
    color: ColorSpec,
    nice: &NiceText,
) -> ForgeResult<()> {
    let sf = nice.scale_factor.clamp(2, 5);
    let (w, h) = (dst.width(), dst.height());
    let (big_w, big_h) = w
        .checked_mul(sf)
        .zip(h.checked_mul(sf))
        .ok_or_else(|| ForgeError::allocation("nice text mask size overflow"))?;

    let mut mask = raster.allocate(big_w, big_h)?;
    mask.fill(ColorSpec::WHITE.to_premul());
    let paint = TextPaint {
        color: ColorSpec::BLACK,
        antialias: true,
    };
    for _ in 0..run.iterations.max(1) {
        render_glyphs(raster, &mut mask, run, pos, paint, sf as f32, true);
    }

    let mut chain = FilterChain::parse_magick(&nice.before);
    chain.push(FilterOp::Resize {
        width: w,
        height: h,
    });
    chain.extend(FilterChain::parse_magick(&nice.after));
    chain.push(FilterOp::Negate);
    if let Some(op) = sharpen_for_strength(nice.sharpen) {
        chain.push(op);
    }

    let mask = match filters.apply_chain(&mask, &chain) {
        Ok(m) => m,
        Err(err) => {
            tracing::warn!(backend = filters.name(), error = %err, "nice text mask failed");
            return Ok(());
        }
    };

    let mut layer = raster.allocate(w, h)?;
    layer.fill(color.to_premul());
    match filters.combine(dst, &layer, &mask) {
        Ok(out) => *dst = out,
        Err(err) => {
            tracing::warn!(backend = filters.name(), error = %err, "nice text combine failed");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/render.rs"]
mod tests;
