use crate::render::backend::{GlyphStyle, Quad, RasterBackend};
use crate::text::run::{TextBox, TextRun, scale};
use crate::text::split::split_string;

/// Accumulated glyph box of `text` across all split-rendering segments at scale `sf`.
///
/// A segment whose font cannot be read is logged and contributes nothing.
pub fn bbox_wrapper(raster: &mut dyn RasterBackend, run: &TextRun, text: &str, sf: f32) -> Quad {
    bbox_wrapper_at_angle(raster, run, text, sf, run.angle)
}

fn bbox_wrapper_at_angle(
    raster: &mut dyn RasterBackend,
    run: &TextRun,
    text: &str,
    sf: f32,
    angle: i32,
) -> Quad {
    let comp_x = scale(run.split.comp_x, sf);
    let comp_y = scale(run.split.comp_y, sf);
    let mut acc: Option<Quad> = None;

    for seg in split_string(text, &run.base_style(sf), &run.split, sf) {
        let style = GlyphStyle {
            font: seg.style.font.clone(),
            size: seg.style.size,
            angle,
        };
        let calc = match raster.measure_text(&style, &seg.text) {
            Ok(q) => q,
            Err(err) => {
                tracing::warn!(font = %style.font.display(), error = %err, "text segment skipped");
                continue;
            }
        };
        match acc.as_mut() {
            None => acc = Some(calc),
            Some(q) => {
                let dx = comp_x + seg.style.x_space_before + seg.style.x_space_after;
                let dy = comp_y + seg.style.y_space_before + seg.style.y_space_after;
                q[2] += calc[2] - calc[0] + dx;
                q[3] += calc[3] - calc[1] - dy;
                q[4] += calc[4] - calc[6] + dx;
                q[5] += calc[5] - calc[7] - dy;
            }
        }
    }
    acc.unwrap_or_default()
}

/// Horizontal extent used for autosizing and line breaking; which corners count depends on
/// the rotation direction.
pub fn rendered_width(raster: &mut dyn RasterBackend, run: &TextRun, text: &str, sf: f32) -> i32 {
    let b = bbox_wrapper(raster, run, text, sf);
    let w = if run.angle < 0 {
        b[4] - b[0]
    } else if run.angle > 0 {
        b[2] - b[6]
    } else {
        b[4] - b[6]
    };
    w.abs()
}

/// Largest font size not above the configured one whose rendered width fits `max_width`.
///
/// Only applies when `max_width` is set and no letter/word spacing is configured; never goes
/// below 1.
pub fn font_resize(raster: &mut dyn RasterBackend, run: &TextRun) -> i32 {
    if run.max_width <= 0 || run.has_spacing() {
        return run.font_size;
    }
    let mut trial = run.clone();
    loop {
        if rendered_width(raster, &trial, &trial.text, 1.0) <= run.max_width {
            break;
        }
        trial.font_size -= 1;
        if trial.font_size <= 1 {
            break;
        }
    }
    trial.font_size.max(1)
}

fn is_break_delimiter(c: char) -> bool {
    matches!(c, '-' | ' ' | '.' | ',' | '!' | ':')
}

/// Split into `word + following delimiter run` pairs; concatenating them restores `text`.
pub fn word_pairs(text: &str) -> Vec<String> {
    let mut pairs = Vec::new();
    let mut current = String::new();
    let mut in_delims = false;
    for c in text.chars() {
        let delim = is_break_delimiter(c);
        if in_delims && !delim {
            pairs.push(std::mem::take(&mut current));
        }
        in_delims = delim;
        current.push(c);
    }
    if !current.is_empty() {
        pairs.push(current);
    }
    pairs
}

/// Greedy line breaking against `break_width`, in unscaled pixels.
///
/// Returns a single line when breaking is off or the text already fits. A line always takes
/// at least one pair, even one wider than the limit.
pub fn break_lines(raster: &mut dyn RasterBackend, run: &TextRun, text: &str) -> Vec<String> {
    if run.break_width <= 0 || rendered_width(raster, run, text, 1.0) <= run.break_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut phrase = String::new();
    let mut current = 0i32;
    for (i, pair) in word_pairs(text).into_iter().enumerate() {
        let w = rendered_width(raster, run, &pair, 1.0);
        if i == 0 || current + w <= run.break_width {
            current += w;
            phrase.push_str(&pair);
        } else {
            lines.push(std::mem::replace(&mut phrase, pair));
            current = w;
        }
    }
    if !phrase.is_empty() {
        lines.push(phrase);
    }
    lines
}

/// Vertical advance between wrapped lines.
pub fn break_space(run: &TextRun, line_height: i32) -> i32 {
    (run.break_space * f64::from(line_height)).round() as i32
}

/// Bounding box of a normalized text run in unscaled pixels.
pub fn calc_bbox(raster: &mut dyn RasterBackend, run: &TextRun) -> TextBox {
    let quad = bbox_wrapper(raster, run, &run.text, 1.0);
    let (mut w, mut h) = quad_extent(quad, run.angle != 0);

    let line_height = run.line_height.filter(|v| *v != 0).unwrap_or(h);

    let (spacing, word_spacing) = run.spacing_at(1.0);
    if spacing != 0 || word_spacing != 0 {
        w = 0;
        if spacing == 0 {
            for word in run.text.split(' ') {
                let q = bbox_wrapper(raster, run, &format!("{word} "), 1.0);
                w += q[2] - q[0] + word_spacing;
            }
        } else {
            let mut buf = [0u8; 4];
            for c in run.text.chars() {
                let q = bbox_wrapper(raster, run, c.encode_utf8(&mut buf), 1.0);
                w += q[2] - q[0] + if c == ' ' { word_spacing } else { spacing };
            }
        }
    } else if run.break_width > 0 {
        let lines = break_lines(raster, run, &run.text);
        if lines.len() > 1 {
            w = lines
                .iter()
                .map(|l| rendered_width(raster, run, l, 1.0))
                .max()
                .unwrap_or(0);
            h += break_space(run, line_height) * (lines.len() as i32 - 1);
        }
    }

    let straight_w = if run.angle == 0 {
        w
    } else {
        let q = bbox_wrapper_at_angle(raster, run, &run.text, 1.0, 0);
        q[2] - q[0]
    };

    TextBox {
        w,
        h,
        line_height,
        quad,
        straight_w,
    }
}

fn quad_extent(q: Quad, rotated: bool) -> (i32, i32) {
    if rotated {
        let xs = [q[0], q[2], q[4], q[6]];
        let ys = [q[1], q[3], q[5], q[7]];
        let span = |v: [i32; 4]| v.iter().max().unwrap_or(&0) - v.iter().min().unwrap_or(&0);
        (span(xs), span(ys))
    } else {
        (q[2] - q[0], q[1] - q[7])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
