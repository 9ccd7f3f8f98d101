use super::*;

#[test]
fn intersect_clips_and_rejects_disjoint() {
    let a = IntRect::new(0, 0, 10, 10);
    let b = IntRect::new(5, 5, 10, 10);
    assert_eq!(a.intersect(b), Some(IntRect::new(5, 5, 5, 5)));

    let c = IntRect::new(10, 0, 4, 4);
    assert_eq!(a.intersect(c), None);
}

#[test]
fn intersect_saturates_at_the_integer_limits() {
    let far = IntRect::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX);
    assert_eq!(far.right(), i32::MAX);
    assert_eq!(IntRect::new(0, 0, 10, 10).intersect(far), None);

    let huge = IntRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
    assert_eq!(huge.intersect(huge), Some(huge));
    let wide = IntRect::new(-5, -5, i32::MAX, i32::MAX);
    assert_eq!(
        IntRect::new(0, 0, 4, 4).intersect(wide),
        Some(IntRect::new(0, 0, 4, 4))
    );
}

#[test]
fn bitmap_rejects_zero_dimensions_as_allocation_error() {
    let err = Bitmap::new(0, 4).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn fill_rect_is_clipped_to_bounds() {
    let mut bmp = Bitmap::new(4, 4).unwrap();
    bmp.fill_rect(IntRect::new(2, 2, 10, 10), Rgba8Premul::opaque(9, 9, 9));
    assert_eq!(bmp.pixel(3, 3), [9, 9, 9, 255]);
    assert_eq!(bmp.pixel(1, 1), [0, 0, 0, 0]);
}

#[test]
fn from_premul_checks_length() {
    assert!(Bitmap::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Bitmap::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn straight_to_premul_rounds() {
    let px = Rgba8Premul::from_straight_rgba(200, 100, 0, 128);
    assert_eq!(px.to_array(), [100, 50, 0, 128]);
}

#[test]
fn crop_fills_outside_area_with_background() {
    let mut bmp = Bitmap::new(4, 4).unwrap();
    bmp.set_pixel(3, 3, [1, 2, 3, 255]);
    let out = bmp
        .crop(IntRect::new(2, 2, 4, 4), Rgba8Premul::opaque(9, 9, 9))
        .unwrap();
    assert_eq!((out.width(), out.height()), (4, 4));
    assert_eq!(out.pixel(1, 1), [1, 2, 3, 255]);
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(3, 3), [9, 9, 9, 255]);
}
