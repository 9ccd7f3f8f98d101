use super::*;
use crate::foundation::core::Rgba8Premul;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Bitmap {
    Bitmap::filled(w, h, Rgba8Premul { r: px[0], g: px[1], b: px[2], a: px[3] }).unwrap()
}

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255], 1.0), [9, 8, 7, 255]);
}

#[test]
fn over_transparent_src_is_identity() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 0], 1.0), [1, 2, 3, 255]);
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255], 0.0), [1, 2, 3, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn over_region_clips_to_destination() {
    let mut dst = solid(4, 4, [0, 0, 0, 255]);
    let src = solid(3, 3, [255, 0, 0, 255]);
    over_region(&mut dst, &src, src.bounds(), (2, -1));

    assert_eq!(dst.pixel(2, 0), [255, 0, 0, 255]);
    assert_eq!(dst.pixel(3, 1), [255, 0, 0, 255]);
    assert_eq!(dst.pixel(3, 2), [0, 0, 0, 255]);
    assert_eq!(dst.pixel(1, 0), [0, 0, 0, 255]);
}

#[test]
fn white_mask_equals_plain_over() {
    let base = solid(2, 2, [10, 20, 30, 255]);
    let fg = solid(2, 2, [100, 50, 0, 200]);
    let mask = solid(2, 2, [255, 255, 255, 255]);

    let out = mask_blend(&base, &fg, &mask).unwrap();
    let mut expected = base.clone();
    over_in_place(expected.data_mut(), fg.data(), 1.0).unwrap();
    assert_eq!(out.data(), expected.data());
}

#[test]
fn black_mask_leaves_base_unchanged() {
    let base = solid(2, 2, [10, 20, 30, 255]);
    let fg = solid(2, 2, [200, 200, 200, 255]);
    let mask = solid(2, 2, [0, 0, 0, 255]);

    let out = mask_blend(&base, &fg, &mask).unwrap();
    assert_eq!(out.data(), base.data());
}

#[test]
fn gray_mask_blends_halfway() {
    let base = solid(1, 1, [0, 0, 0, 255]);
    let fg = solid(1, 1, [255, 255, 255, 255]);
    let mask = solid(1, 1, [128, 128, 128, 255]);

    let px = mask_blend(&base, &fg, &mask).unwrap().pixel(0, 0);
    assert!((127..=129).contains(&px[0]), "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn mask_blend_requires_equal_sizes() {
    let a = solid(2, 2, [0, 0, 0, 255]);
    let b = solid(3, 2, [0, 0, 0, 255]);
    assert!(mask_blend(&a, &b, &a).is_err());
}
