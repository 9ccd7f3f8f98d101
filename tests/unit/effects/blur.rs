use super::*;
use crate::foundation::core::Rgba8Premul;

#[test]
fn radius_0_is_identity() {
    let src = Bitmap::from_premul(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    let out = blur_premul(&src, 0, 1.0).unwrap();
    assert_eq!(out.data(), src.data());
}

#[test]
fn constant_image_is_identity() {
    let src = Bitmap::filled(4, 3, Rgba8Premul { r: 10, g: 20, b: 30, a: 40 }).unwrap();
    let out = blur_premul(&src, 3, 2.0).unwrap();
    assert_eq!(out.data(), src.data());
}

#[test]
fn single_pixel_energy_spreads_and_is_preserved() {
    let mut src = Bitmap::new(5, 5).unwrap();
    src.set_pixel(2, 2, [255, 255, 255, 255]);

    let out = blur_premul(&src, 2, 1.2).unwrap();

    let nonzero = out.data().chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.data().chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn invalid_sigma_is_rejected() {
    let src = Bitmap::new(2, 2).unwrap();
    assert!(blur_premul(&src, 2, 0.0).is_err());
}

#[test]
fn effective_radius_derives_from_sigma_when_unset() {
    assert_eq!(effective_radius(0.0, 2.0), 6);
    assert_eq!(effective_radius(3.0, 6.0), 3);
}
