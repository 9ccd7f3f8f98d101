//! Color specs: named colors, `#rrggbb`, `r,g,b`, plus `:*factor` / `:+delta` modifiers.

use crate::foundation::core::{Bitmap, Rgba8Premul};
use crate::foundation::math::{clamp_int, lenient_float, lenient_int};

/// A resolved RGB color with an optional derived alpha (straight, 0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSpec {
    pub rgb: [u8; 3],
    pub alpha: Option<u8>,
}

const NAMED: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("silver", [192, 192, 192]),
    ("teal", [0, 128, 128]),
    ("yellow", [255, 255, 0]),
    ("white", [255, 255, 255]),
];

impl ColorSpec {
    pub const BLACK: ColorSpec = ColorSpec::rgb(0, 0, 0);
    pub const WHITE: ColorSpec = ColorSpec::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: [r, g, b],
            alpha: None,
        }
    }

    /// Parse a color spec. Unknown names and malformed parts resolve to black.
    ///
    /// The optional modifier after `:` either scales (`*0.5`) or offsets (`+20`, `-20`) every
    /// channel, clamped to `0..=255`.
    pub fn parse(spec: &str) -> Self {
        let (base, modifier) = match spec.split_once(':') {
            Some((b, m)) => (b, Some(m.trim())),
            None => (spec, None),
        };

        let mut rgb = if base.contains('#') {
            parse_hex(base)
        } else if base.contains(',') {
            let digits: String = base
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == ',')
                .collect();
            let mut parts = digits.split(',').map(lenient_int);
            let mut next = || clamp_int(parts.next().unwrap_or(0), 0, 255) as u8;
            [next(), next(), next()]
        } else {
            let name = base.trim().to_ascii_lowercase();
            NAMED
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, c)| *c)
                .unwrap_or([0, 0, 0])
        };

        if let Some(m) = modifier.filter(|m| !m.is_empty()) {
            if let Some(factor) = m.strip_prefix('*') {
                let f = lenient_float(factor);
                for c in &mut rgb {
                    *c = clamp_int((f64::from(*c) * f) as i64, 0, 255) as u8;
                }
            } else {
                let delta = lenient_int(m);
                for c in &mut rgb {
                    *c = clamp_int(i64::from(*c) + delta, 0, 255) as u8;
                }
            }
        }

        Self { rgb, alpha: None }
    }

    /// Attach an alpha derived from a 1..=100 opacity percentage.
    pub fn with_opacity(self, opacity_pct: i64) -> Self {
        let pct = clamp_int(opacity_pct, 1, 100);
        let alpha = ((pct as f64) * 255.0 / 100.0).round() as u8;
        Self {
            alpha: Some(alpha),
            ..self
        }
    }

    pub fn to_premul(self) -> Rgba8Premul {
        let [r, g, b] = self.rgb;
        Rgba8Premul::from_straight_rgba(r, g, b, self.alpha.unwrap_or(255))
    }

    pub fn hex(self) -> String {
        let [r, g, b] = self.rgb;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

fn parse_hex(s: &str) -> [u8; 3] {
    let hex: String = s.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    let byte = |i: usize| {
        hex.get(i..i + 2)
            .or_else(|| hex.get(i..))
            .filter(|p| !p.is_empty())
            .and_then(|p| u8::from_str_radix(p, 16).ok())
            .unwrap_or(0)
    };
    [byte(0), byte(2), byte(4)]
}

/// Rewrite every opaque pixel matching one of `colors[1..]` to `colors[0]`.
///
/// Returns the unified color, or `None` for an empty list. With `closest`, pixels within a
/// small per-channel distance of a listed color also match.
pub fn unify_colors(bitmap: &mut Bitmap, colors: &[ColorSpec], closest: bool) -> Option<ColorSpec> {
    let (first, rest) = colors.split_first()?;
    let target = first.rgb;
    let tolerance: i16 = if closest { 8 } else { 0 };
    let matches = |px: &[u8], c: [u8; 3]| {
        (0..3).all(|i| (i16::from(px[i]) - i16::from(c[i])).abs() <= tolerance)
    };

    for px in bitmap.data_mut().chunks_exact_mut(4) {
        if px[3] != 255 {
            continue;
        }
        if matches(px, target) || rest.iter().any(|c| matches(px, c.rgb)) {
            px[0] = target[0];
            px[1] = target[1];
            px[2] = target[2];
        }
    }
    Some(*first)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
