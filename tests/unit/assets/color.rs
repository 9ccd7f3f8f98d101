use super::*;

#[test]
fn parses_names_hex_and_triplets() {
    assert_eq!(ColorSpec::parse("red").rgb, [255, 0, 0]);
    assert_eq!(ColorSpec::parse(" Navy ").rgb, [0, 0, 128]);
    assert_eq!(ColorSpec::parse("#ff8000").rgb, [255, 128, 0]);
    // hex is read in pairs; there is no three-digit shorthand
    assert_eq!(ColorSpec::parse("#f00").rgb, [240, 0, 0]);
    assert_eq!(ColorSpec::parse("10, 20,30").rgb, [10, 20, 30]);
}

#[test]
fn unknown_name_and_garbage_resolve_to_black() {
    assert_eq!(ColorSpec::parse("chartreuse-ish").rgb, [0, 0, 0]);
    assert_eq!(ColorSpec::parse("#zz").rgb, [0, 0, 0]);
    assert_eq!(ColorSpec::parse("").rgb, [0, 0, 0]);
}

#[test]
fn multiplicative_modifier_scales_and_clamps() {
    assert_eq!(ColorSpec::parse("#808080:*0.5").rgb, [64, 64, 64]);
    assert_eq!(ColorSpec::parse("200,100,50:*2").rgb, [255, 200, 100]);
}

#[test]
fn additive_modifier_offsets_and_clamps() {
    assert_eq!(ColorSpec::parse("white:-55").rgb, [200, 200, 200]);
    assert_eq!(ColorSpec::parse("black:+20").rgb, [20, 20, 20]);
    assert_eq!(ColorSpec::parse("250,10,0:+10").rgb, [255, 20, 10]);
}

#[test]
fn opacity_derives_alpha_and_premultiplies() {
    let c = ColorSpec::parse("white").with_opacity(50);
    assert_eq!(c.alpha, Some(128));
    assert_eq!(c.to_premul().to_array(), [128, 128, 128, 128]);
    assert_eq!(ColorSpec::BLACK.with_opacity(0).alpha, Some(3));
}

#[test]
fn unify_rewrites_listed_colors_to_first() {
    let mut bmp = Bitmap::new(3, 1).unwrap();
    bmp.set_pixel(0, 0, [255, 0, 0, 255]);
    bmp.set_pixel(1, 0, [0, 0, 255, 255]);
    bmp.set_pixel(2, 0, [0, 255, 0, 255]);

    let unified = unify_colors(
        &mut bmp,
        &[ColorSpec::parse("red"), ColorSpec::parse("blue")],
        false,
    )
    .unwrap();
    assert_eq!(unified.rgb, [255, 0, 0]);
    assert_eq!(bmp.pixel(1, 0), [255, 0, 0, 255]);
    assert_eq!(bmp.pixel(2, 0), [0, 255, 0, 255]);
}

#[test]
fn unify_empty_list_is_none() {
    let mut bmp = Bitmap::new(1, 1).unwrap();
    assert!(unify_colors(&mut bmp, &[], false).is_none());
}
