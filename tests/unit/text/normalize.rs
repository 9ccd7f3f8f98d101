use super::*;
use crate::render::testing::FixedAdvance;

#[test]
fn markup_is_stripped_and_text_kept() {
    assert_eq!(strip_html("<b>Sale</b> now"), "Sale now");
    assert_eq!(strip_html("a < b"), "a ");
    assert_eq!(strip_html("plain"), "plain");
}

#[test]
fn truncation_counts_characters_not_bytes() {
    assert_eq!(truncate_chars("äöüß", 2), "äö");
    assert_eq!(truncate_chars("ab", 5), "ab");
}

#[test]
fn clean_text_respects_markup_flag_and_length_limit() {
    assert_eq!(clean_text("<i>abcdef</i>", true, 3, false), "abc");
    assert_eq!(clean_text("<i>ab</i>", false, 0, false), "<i>ab</i>");
    let long = "x".repeat(150);
    assert_eq!(clean_text(&long, true, 0, false).len(), DEFAULT_MAX_LENGTH);
    // line breaking keeps the whole string
    assert_eq!(clean_text(&long, true, 10, true).len(), 150);
}

#[test]
fn empty_text_is_dropped() {
    let mut be = FixedAdvance::new();
    assert!(prepare_run(&mut be, TextRun::new("", "sans.ttf")).is_none());
}

#[test]
fn prepare_clamps_angle_and_measures() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("abcd", "sans.ttf");
    run.angle = 135;
    let run = prepare_run(&mut be, run).unwrap();
    assert_eq!(run.angle, 90);
    assert_eq!((run.bbox.w, run.bbox.h), (12, 24));
}

#[test]
fn spacing_forces_unrotated_text() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("abcd", "sans.ttf");
    run.angle = 30;
    run.spacing = 1;
    assert_eq!(prepare_run(&mut be, run).unwrap().angle, 0);
}

#[test]
fn prepare_autofits_font_size() {
    let mut be = FixedAdvance::new();
    let mut run = TextRun::new("abcdefghij", "sans.ttf");
    run.max_width = 40;
    let run = prepare_run(&mut be, run).unwrap();
    assert_eq!(run.font_size, 8);
    assert_eq!(run.bbox.w, 40);
}
