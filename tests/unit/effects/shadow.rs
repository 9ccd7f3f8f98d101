use super::*;
use crate::render::filter::{FilterBackend, FilterOp};
use crate::render::testing::{FixedAdvance, WhiteFilters};

const GRAY: ColorSpec = ColorSpec::rgb(50, 50, 50);

fn run() -> TextRun {
    let mut run = TextRun::new("ab", "sans.ttf");
    run.offset = vec![4, 16];
    run
}

fn spec(blur: i32) -> ShadowSpec {
    ShadowSpec {
        offset: (2, 3),
        blur,
        intensity: 0,
        opacity: 0,
        color: GRAY,
    }
}

fn shadow(
    be: &mut FixedAdvance,
    filters: Option<&dyn FilterBackend>,
    spec: ShadowSpec,
) -> Bitmap {
    let mut dst = Bitmap::new(30, 20).unwrap();
    let area = dst.bounds();
    let mut backends = Backends { raster: be, filters };
    make_shadow(&mut backends, &mut dst, &run(), area, spec).unwrap();
    dst
}

#[test]
fn unblurred_shadow_redraws_text_at_offset() {
    let mut be = FixedAdvance::new();
    let filters = WhiteFilters::default();
    shadow(&mut be, Some(&filters), spec(0));

    assert_eq!(be.draws.len(), 1);
    assert_eq!(be.draws[0].origin, (6, 19));
    assert_eq!(be.draws[0].paint.color, GRAY);
    assert!(filters.recorded().is_empty());
}

#[test]
fn blur_without_filters_falls_back_to_hard_shadow() {
    let mut be = FixedAdvance::new();
    shadow(&mut be, None, spec(20));
    assert_eq!(be.draws.len(), 1);
    assert_eq!(be.draws[0].paint.color, GRAY);
}

#[test]
fn blurred_shadow_draws_white_mask_in_border_and_blends_color() {
    let mut be = FixedAdvance::new();
    let filters = WhiteFilters::default();
    let dst = shadow(&mut be, Some(&filters), spec(20));

    assert_eq!(be.draws.len(), 1);
    assert_eq!(be.draws[0].origin, (9, 22));
    assert_eq!(be.draws[0].paint.color, ColorSpec::WHITE);

    let chains = filters.recorded();
    assert_eq!(
        chains[0].ops(),
        &[FilterOp::Blur {
            radius: 3.0,
            sigma: 6.0
        }]
    );
    assert_eq!(dst.pixel(0, 0), [50, 50, 50, 255]);
}

#[test]
fn failed_blur_leaves_canvas_unchanged() {
    let mut be = FixedAdvance::new();
    let filters = WhiteFilters::failing();
    let dst = shadow(&mut be, Some(&filters), spec(20));
    assert_eq!(dst, Bitmap::new(30, 20).unwrap());
}

#[test]
fn emboss_draws_high_then_low_at_opposite_offsets() {
    let mut be = FixedAdvance::new();
    let mut dst = Bitmap::new(30, 20).unwrap();
    let area = dst.bounds();
    let spec = EmbossSpec {
        offset: (1, 1),
        high_color: ColorSpec::WHITE,
        low_color: ColorSpec::BLACK,
        blur: 0,
        intensity: 0,
        opacity: 0,
    };
    let mut backends = Backends {
        raster: &mut be,
        filters: None,
    };
    make_emboss(&mut backends, &mut dst, &run(), area, spec).unwrap();

    let draws: Vec<_> = be.draws.iter().map(|d| (d.origin, d.paint.color)).collect();
    assert_eq!(
        draws,
        vec![((5, 17), ColorSpec::WHITE), ((3, 15), ColorSpec::BLACK)]
    );
}
