//! First stage of a text instruction: clean the string, then fit and measure it.

use crate::render::backend::RasterBackend;
use crate::text::measure::{calc_bbox, font_resize};
use crate::text::run::TextRun;

/// Default `textMaxLength`.
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// Remove markup tags; an unterminated `<` drops the rest of the string.
pub fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match (in_tag, c) {
            (false, '<') => in_tag = true,
            (false, c) => out.push(c),
            (true, '>') => in_tag = false,
            (true, _) => {}
        }
    }
    out
}

/// The first `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Markup stripping and length limiting as applied to the raw `text` property.
///
/// A `max_len` of 0 means the default; truncation is skipped when line breaking is active.
pub fn clean_text(raw: &str, strip: bool, max_len: usize, breaking: bool) -> String {
    let text = if strip {
        strip_html(raw)
    } else {
        raw.to_string()
    };
    if breaking {
        return text;
    }
    let max_len = if max_len == 0 {
        DEFAULT_MAX_LENGTH
    } else {
        max_len
    };
    truncate_chars(&text, max_len).to_string()
}

/// Clamp the angle, autofit the font size and record the bounding box.
///
/// Returns `None` for an empty string, which removes the instruction.
pub fn prepare_run(raster: &mut dyn RasterBackend, mut run: TextRun) -> Option<TextRun> {
    if run.text.is_empty() {
        return None;
    }
    run.angle = if run.has_spacing() {
        0
    } else {
        run.angle.clamp(-90, 90)
    };
    run.font_size = font_resize(raster, &run);
    run.bbox = calc_bbox(raster, &run);
    Some(run)
}

#[cfg(test)]
#[path = "../../tests/unit/text/normalize.rs"]
mod tests;
