use super::*;
use crate::render::testing::{FixedAdvance, WhiteFilters};
use crate::text::measure::calc_bbox;
use crate::text::run::{SplitKind, SplitRule};

const AREA: IntRect = IntRect {
    x: 10,
    y: 10,
    w: 100,
    h: 50,
};

fn measured(be: &mut FixedAdvance, mut run: TextRun) -> TextRun {
    run.bbox = calc_bbox(be, &run);
    run
}

fn draw(be: &mut FixedAdvance, filters: Option<&dyn FilterBackend>, run: &TextRun) -> Bitmap {
    let mut dst = Bitmap::new(100, 50).unwrap();
    let mut backends = Backends {
        raster: be,
        filters,
    };
    make_text(&mut backends, &mut dst, run, AREA, run.color).unwrap();
    dst
}

#[test]
fn hidden_text_draws_nothing() {
    let mut be = FixedAdvance::new();
    let mut run = measured(&mut be, TextRun::new("ab", "sans.ttf"));
    run.hide = true;
    let dst = draw(&mut be, None, &run);
    assert!(be.draws.is_empty());
    assert_eq!(dst, Bitmap::new(100, 50).unwrap());
}

#[test]
fn plain_text_starts_at_offset_inside_work_area() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("ab", "sans.ttf");
    run.offset = vec![5, 20];
    run.iterations = 3;
    let run = measured(&mut be, run);
    draw(&mut be, None, &run);

    assert_eq!(be.draws.len(), 3);
    assert!(be.draws.iter().all(|d| d.origin == (15, 30)));
    assert!(be.draws.iter().all(|d| d.size == 12.0));
}

#[test]
fn split_segments_keep_their_own_color_and_advance() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("xAx", "sans.ttf");
    run.offset = vec![0, 20];
    run.split.rules = vec![SplitRule {
        color: Some(ColorSpec::rgb(255, 0, 0)),
        ..SplitRule::new(SplitKind::HighlightWord("A".into()))
    }];
    let run = measured(&mut be, run);
    draw(&mut be, None, &run);

    let origins: Vec<_> = be.draws.iter().map(|d| d.origin).collect();
    assert_eq!(origins, vec![(10, 30), (16, 30), (22, 30)]);
    assert_eq!(be.draws[1].paint.color, ColorSpec::rgb(255, 0, 0));
    assert_eq!(be.draws[2].paint.color, ColorSpec::BLACK);
}

#[test]
fn wrapped_lines_share_x_and_step_by_break_space() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("aaaa bbbb cccc", "sans.ttf");
    run.break_width = 60;
    run.offset = vec![0, 12];
    let run = measured(&mut be, run);
    draw(&mut be, None, &run);

    let lines: Vec<_> = be.draws.iter().map(|d| (d.text.as_str(), d.origin)).collect();
    assert_eq!(lines, vec![("aaaa bbbb ", (10, 22)), ("cccc", (10, 34))]);
}

#[test]
fn letter_spacing_places_every_character() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("ab", "sans.ttf");
    run.spacing = 2;
    let run = measured(&mut be, run);
    draw(&mut be, None, &run);

    let xs: Vec<_> = be.draws.iter().map(|d| d.origin.0).collect();
    assert_eq!(xs, vec![10, 18]);
}

#[test]
fn nice_text_renders_scaled_mask_and_blends_color() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("ab", "sans.ttf");
    run.offset = vec![5, 20];
    run.color = ColorSpec::rgb(255, 0, 0);
    run.nice_text = Some(NiceText {
        scale_factor: 2,
        before: String::new(),
        after: String::new(),
        sharpen: 0,
    });
    let run = measured(&mut be, run);
    let filters = WhiteFilters::default();
    let dst = draw(&mut be, Some(&filters), &run);

    assert_eq!(be.draws.len(), 1);
    assert_eq!(be.draws[0].origin, (30, 60));
    assert_eq!(be.draws[0].size, 24.0);
    assert_eq!(be.draws[0].paint.color, ColorSpec::BLACK);

    let chains = filters.recorded();
    assert_eq!(
        chains[0].ops(),
        &[
            FilterOp::Resize {
                width: 100,
                height: 50
            },
            FilterOp::Negate
        ]
    );
    assert_eq!(dst.pixel(0, 0), [255, 0, 0, 255]);
}

#[test]
fn nice_text_repeats_iterations_on_the_mask() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("ab", "sans.ttf");
    run.offset = vec![5, 20];
    run.iterations = 3;
    run.nice_text = Some(NiceText {
        scale_factor: 2,
        before: String::new(),
        after: String::new(),
        sharpen: 0,
    });
    let run = measured(&mut be, run);
    let filters = WhiteFilters::default();
    draw(&mut be, Some(&filters), &run);

    assert_eq!(be.draws.len(), 3);
    assert!(be.draws.iter().all(|d| d.origin == (30, 60)));
    assert!(be.draws.iter().all(|d| d.size == 24.0));
}

#[test]
fn nice_text_without_filters_draws_directly() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("ab", "sans.ttf");
    run.nice_text = Some(NiceText {
        scale_factor: 3,
        before: String::new(),
        after: String::new(),
        sharpen: 0,
    });
    let run = measured(&mut be, run);
    draw(&mut be, None, &run);

    assert_eq!(be.draws.len(), 1);
    assert_eq!(be.draws[0].size, 12.0);
}

#[test]
fn failed_nice_text_filter_leaves_canvas_unchanged() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("ab", "sans.ttf");
    run.offset = vec![0, 20];
    run.nice_text = Some(NiceText {
        scale_factor: 2,
        before: String::new(),
        after: String::new(),
        sharpen: 0,
    });
    let run = measured(&mut be, run);
    let filters = WhiteFilters::failing();
    let dst = draw(&mut be, Some(&filters), &run);
    assert_eq!(dst, Bitmap::new(100, 50).unwrap());
}
