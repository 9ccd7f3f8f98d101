//! Channel level adjustments used by ADJUST instructions and shadow masks.

use crate::foundation::core::Bitmap;
use crate::foundation::math::{clamp_int, premultiply, unpremultiply};

/// A levels request as parsed from an ADJUST value or built by the shadow effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelsOp {
    /// Stretch `low..=high` onto `0..=255`.
    Input { low: i32, high: i32 },
    /// Compress `0..=255` into `low..=high`; `low > high` also inverts.
    Output { low: i32, high: i32 },
    /// Input levels from the darkest and brightest gray in the image.
    Auto,
}

pub fn apply_levels(bitmap: &mut Bitmap, op: LevelsOp) {
    match op {
        LevelsOp::Input { low, high } => input_levels(bitmap, low, high),
        LevelsOp::Output { low, high } => output_levels(bitmap, low, high),
        LevelsOp::Auto => auto_levels(bitmap),
    }
}

/// No-op unless `low < high`.
pub fn input_levels(bitmap: &mut Bitmap, low: i32, high: i32) {
    if low >= high {
        return;
    }
    let low = clamp_int(low.into(), 0, 255) as f64;
    let high = clamp_int(high.into(), 0, 255) as f64;
    let delta = high - low;
    if delta <= 0.0 {
        return;
    }
    map_channels(bitmap, |c| {
        clamp_int(((f64::from(c) - low) / delta * 255.0) as i64, 0, 255) as u8
    });
}

pub fn output_levels(bitmap: &mut Bitmap, low: i32, high: i32) {
    let (low, high, swap) = if low > high {
        (high, low, true)
    } else {
        (low, high, false)
    };
    let low = clamp_int(low.into(), 0, 255) as f64;
    let delta = clamp_int(high.into(), 0, 255) as f64 - low;
    map_channels(bitmap, |c| {
        let v = clamp_int((low + (f64::from(c) / 255.0 * delta).floor()) as i64, 0, 255) as u8;
        if swap { 255 - v } else { v }
    });
}

pub fn auto_levels(bitmap: &mut Bitmap) {
    let grays = bitmap.data().chunks_exact(4).filter(|px| px[3] != 0).map(|px| {
        let s = unpremultiply([px[0], px[1], px[2], px[3]]);
        ((u32::from(s[0]) + u32::from(s[1]) + u32::from(s[2])) as f64 / 3.0).round() as i64
    });
    let (min, max) = grays.fold((255i64, 0i64), |(lo, hi), g| (lo.min(g), hi.max(g)));
    let delta = max - min;
    if delta <= 0 {
        return;
    }
    map_channels(bitmap, |c| {
        clamp_int(
            ((i64::from(c) - min) as f64 / delta as f64 * 255.0) as i64,
            0,
            255,
        ) as u8
    });
}

/// Apply `f` to the straight RGB channels of every pixel, keeping alpha.
fn map_channels(bitmap: &mut Bitmap, f: impl Fn(u8) -> u8) {
    for px in bitmap.data_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let s = unpremultiply([px[0], px[1], px[2], px[3]]);
        let mapped = premultiply([f(s[0]), f(s[1]), f(s[2]), s[3]]);
        px.copy_from_slice(&mapped);
    }
}
