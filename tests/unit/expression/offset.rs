use super::*;
use crate::layout::bbox::{BoundingBox, BoundingBoxes, TextMetrics};

fn none() -> BoundingBoxes {
    BoundingBoxes::new()
}

#[test]
fn evaluates_each_comma_term_independently() {
    assert_eq!(resolve("2+2,2*3,123", &none()), vec![4, 6, 123]);
    assert_eq!(resolve(" 10 , -4 ", &none()), vec![10, -4]);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(resolve("2+3*4", &none()), vec![14]);
    assert_eq!(resolve("(2+3)*4", &none()), vec![20]);
    assert_eq!(resolve("10-2-3", &none()), vec![5]);
}

#[test]
fn results_round_to_nearest() {
    assert_eq!(resolve("7/2,1.4,-2.6", &none()), vec![4, 1, -3]);
}

#[test]
fn max_picks_largest_argument() {
    assert_eq!(resolve("max(3,7),1", &none()), vec![7, 1]);
    assert_eq!(resolve("MAX(1+1, 4*2, 5)+1", &none()), vec![9]);
    assert_eq!(resolve("max(max(1,9),4)", &none()), vec![9]);
    assert_eq!(resolve("max(-3,-7)", &none()), vec![-3]);
}

#[test]
fn references_substitute_bounding_box_fields() {
    let mut boxes = BoundingBoxes::new();
    boxes.record(10, BoundingBox::new(45, 12));
    boxes.record(
        20,
        BoundingBox {
            w: 80,
            h: 30,
            metrics: Some(TextMetrics {
                line_height: 14,
                quad: [0; 8],
            }),
        },
    );

    assert_eq!(resolve("[10.w]", &boxes), vec![45]);
    assert_eq!(resolve("[10.h]+[20.lineHeight]", &boxes), vec![26]);
    assert_eq!(resolve("max([10.w],[20.w])/2,5", &boxes), vec![40, 5]);
}

#[test]
fn missing_reference_reads_as_zero() {
    assert_eq!(resolve("[99.w]", &none()), vec![0]);
    assert_eq!(resolve("5+[99.lineHeight]", &none()), vec![5]);
    assert_eq!(resolve("[abc.w]+1", &none()), vec![1]);
}

#[test]
fn negative_reference_values_keep_their_sign() {
    let mut boxes = BoundingBoxes::new();
    boxes.record(1, BoundingBox::new(-5, 0));
    assert_eq!(resolve("10-[1.w]", &boxes), vec![15]);
}

#[test]
fn division_and_modulo_by_zero_keep_the_accumulator() {
    assert_eq!(resolve("10/0", &none()), vec![10]);
    assert_eq!(resolve("10%0", &none()), vec![10]);
    assert_eq!(resolve("3+10/0", &none()), vec![13]);
    assert_eq!(resolve("10%3", &none()), vec![1]);
}

#[test]
fn malformed_input_degrades_to_zero() {
    assert_eq!(resolve("abc", &none()), vec![0]);
    assert_eq!(resolve("abc+2", &none()), vec![2]);
    assert_eq!(resolve("2+,)(", &none()), vec![2, 0]);
    assert_eq!(resolve("max(1,2", &none()), vec![2]);
    assert_eq!(resolve("[10.w", &none()), vec![0]);
    assert_eq!(resolve("((4", &none()), vec![4]);
    // i64::MIN % -1 overflows; the accumulator is kept
    assert_eq!(resolve("-99999999999999999999%-1", &none()), vec![i32::MIN]);
}

#[test]
fn deep_nesting_evaluates_to_zero() {
    let signs = format!("{}1", "-".repeat(200_000));
    assert_eq!(resolve(&signs, &none()), vec![0]);

    let parens = format!("{}7{}", "(".repeat(100_000), ")".repeat(100_000));
    assert_eq!(resolve(&parens, &none()), vec![0]);

    let maxes = format!("{}1{}", "max(".repeat(50_000), ")".repeat(50_000));
    assert_eq!(resolve(&format!("{maxes}+2"), &none()), vec![2]);

    // shallow nesting is unaffected
    assert_eq!(resolve("--(((3)))", &none()), vec![3]);
}

#[test]
fn empty_input_yields_no_components() {
    assert!(resolve("   ", &none()).is_empty());
    assert_eq!(component(&[], 1), 0);
    assert_eq!(component(&[3, 4], 1), 4);
}
