use super::*;

#[test]
fn obj_align_reads_first_letters() {
    assert_eq!(
        ObjAlign::parse("c,b"),
        ObjAlign {
            h: HAlign::Center,
            v: VAlign::Bottom
        }
    );
    assert_eq!(
        ObjAlign::parse(" Right , Center"),
        ObjAlign {
            h: HAlign::Right,
            v: VAlign::Center
        }
    );
    assert_eq!(ObjAlign::parse(""), ObjAlign::default());
}

#[test]
fn obj_position_aligns_then_offsets_then_moves_into_work_area() {
    let wa = IntRect::new(10, 20, 100, 50);
    let r = obj_position(ObjAlign::parse("r,b"), &[1, 2], wa, (30, 10));
    assert_eq!(r, IntRect::new(10 + 70 + 1, 20 + 40 + 2, 30, 10));

    let r = obj_position(ObjAlign::parse("c,c"), &[], wa, (31, 11));
    // (100-31)/2 = 34.5 -> 35, (50-11)/2 = 19.5 -> 20
    assert_eq!(r, IntRect::new(45, 40, 31, 11));
}

#[test]
fn obj_position_saturates_extreme_sizes_and_offsets() {
    let wa = IntRect::new(0, 0, -10, 10);
    let r = obj_position(ObjAlign::parse("r,b"), &[], wa, (i32::MAX, i32::MAX));
    assert_eq!((r.x, r.y), (i32::MIN, 10 - i32::MAX));

    let wa = IntRect::new(5, 5, 10, 10);
    let r = obj_position(ObjAlign::default(), &[i32::MAX, i32::MIN], wa, (2, 2));
    assert_eq!((r.x, r.y), (i32::MAX, i32::MIN + 5));
}

#[test]
fn text_left_only_applies_offsets() {
    let wa = IntRect::new(5, 5, 200, 40);
    assert_eq!(
        txt_position(TextAlign::Left, 0, (80, 12), 80, &[3, 30], wa),
        (8, 35)
    );
}

#[test]
fn text_right_and_center_use_the_work_area_width() {
    let wa = IntRect::new(0, 0, 200, 40);
    assert_eq!(
        txt_position(TextAlign::Right, 0, (80, 12), 80, &[0, 20], wa),
        (120, 20)
    );
    assert_eq!(
        txt_position(TextAlign::Center, 0, (80, 12), 80, &[0, 20], wa),
        (60, 20)
    );
}

#[test]
fn rotated_right_alignment_blends_widths() {
    let wa = IntRect::new(0, 0, 200, 200);
    let (x, y) = txt_position(TextAlign::Right, 90, (12, 80), 80, &[], wa);
    // cos(90°) is ~0, so the horizontal anchor barely moves off the right edge.
    assert!((199..=200).contains(&x), "x = {x}");
    assert_eq!(y, 80);
}

#[test]
fn apply_offset_tolerates_short_lists() {
    assert_eq!(apply_offset((1, 1), &[]), (1, 1));
    assert_eq!(apply_offset((1, 1), &[4]), (5, 1));
}
