use crate::assets::color::ColorSpec;
use crate::foundation::core::{Bitmap, IntRect};
use crate::foundation::error::ForgeResult;
use crate::render::Backends;
use crate::text::render::make_text;
use crate::text::run::TextRun;

/// Outline settings of a TEXT (`outline.*`) or a standalone OUTLINE instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineSpec {
    /// 1 or 2 pixels; 0 keeps the text color and draws at distance 1.
    pub thickness: i32,
    pub color: ColorSpec,
}

/// `n` integer pixel offsets evenly spaced on a circle of `distance`, starting one step past 0°.
///
/// Each component is rounded on a ×100 grid, then pushed away from zero to a whole pixel.
pub fn circle_offset(distance: i32, n: usize) -> Vec<(i32, i32)> {
    let snap = |v: f64| -> i32 {
        let v = (v * 100.0 * f64::from(distance)).round();
        if v == 0.0 {
            0
        } else {
            ((v / 100.0).abs().ceil() * v.signum()) as i32
        }
    };
    (0..n)
        .map(|a| {
            let t = std::f64::consts::TAU / n as f64 * (a + 1) as f64;
            (snap(t.cos()), snap(t.sin()))
        })
        .collect()
}

/// Draw `run` repeatedly around its position: 8 replicas at distance 1, plus 16 at distance 2
/// for a thickness of 2.
#[tracing::instrument(skip_all)]
pub fn make_outline(
    backends: &mut Backends<'_>,
    dst: &mut Bitmap,
    run: &TextRun,
    work_area: IntRect,
    spec: OutlineSpec,
) -> ForgeResult<()> {
    let color = if spec.thickness != 0 {
        spec.color
    } else {
        run.color
    };
    for distance in 1..=spec.thickness.clamp(1, 2) {
        let n = if distance == 1 { 8 } else { 16 };
        for (dx, dy) in circle_offset(distance, n) {
            make_text(backends, dst, run, work_area.translate(dx, dy), color)?;
        }
    }
    Ok(())
}
