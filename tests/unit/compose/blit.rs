use super::*;
use crate::layout::position::{HAlign, VAlign};

const RED: [u8; 4] = [255, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn red(w: u32, h: u32) -> Bitmap {
    Bitmap::filled(w, h, Rgba8Premul::opaque(255, 0, 0)).unwrap()
}

fn white(w: u32, h: u32) -> Bitmap {
    Bitmap::filled(w, h, Rgba8Premul::opaque(255, 255, 255)).unwrap()
}

fn at(offset: [i32; 2], tile: (i32, i32)) -> Placement {
    Placement {
        offset: offset.to_vec(),
        tile,
        ..Placement::default()
    }
}

#[test]
fn single_copy_lands_at_offset() {
    let mut dst = white(10, 10);
    let area = dst.bounds();
    let n = copy_gif_onto_gif(&mut dst, &red(2, 2), &at([3, 4], (1, 1)), area, false).unwrap();
    assert_eq!(n, 1);
    assert_eq!(dst.pixel(3, 4), RED);
    assert_eq!(dst.pixel(4, 5), RED);
    assert_eq!(dst.pixel(5, 4), WHITE);
}

#[test]
fn tiles_repeat_across_and_down() {
    let mut dst = white(10, 10);
    let area = dst.bounds();
    let n = copy_gif_onto_gif(&mut dst, &red(2, 2), &at([0, 0], (3, 2)), area, false).unwrap();
    assert_eq!(n, 6);
    assert_eq!(dst.pixel(5, 3), RED);
    assert_eq!(dst.pixel(6, 0), WHITE);
    assert_eq!(dst.pixel(0, 4), WHITE);
}

#[test]
fn copy_is_clipped_to_work_area() {
    let mut dst = white(10, 10);
    let area = IntRect::new(0, 0, 5, 5);
    copy_gif_onto_gif(&mut dst, &red(4, 4), &at([3, 3], (1, 1)), area, false).unwrap();
    assert_eq!(dst.pixel(4, 4), RED);
    assert_eq!(dst.pixel(5, 5), WHITE);
    assert_eq!(dst.pixel(6, 3), WHITE);
}

#[test]
fn tiles_outside_work_area_are_skipped() {
    let mut dst = white(20, 10);
    let area = IntRect::new(0, 0, 5, 5);
    let n = copy_gif_onto_gif(&mut dst, &red(4, 4), &at([0, 0], (3, 1)), area, false).unwrap();
    assert_eq!(n, 2);
    assert_eq!(dst.pixel(9, 0), WHITE);
}

#[test]
fn alignment_places_the_whole_grid() {
    let mut dst = white(10, 10);
    let area = dst.bounds();
    let placement = Placement {
        align: ObjAlign {
            h: HAlign::Right,
            v: VAlign::Bottom,
        },
        ..at([0, 0], (2, 1))
    };
    copy_gif_onto_gif(&mut dst, &red(2, 2), &placement, area, false).unwrap();
    assert_eq!(dst.pixel(6, 8), RED);
    assert_eq!(dst.pixel(9, 9), RED);
    assert_eq!(dst.pixel(5, 9), WHITE);
}

#[test]
fn tile_counts_are_clamped() {
    assert_eq!(at([0, 0], (0, 50)).tiles(), (1, MAX_TILES));
}

#[test]
fn alpha_mode_decides_whether_partial_alpha_survives() {
    let half = Bitmap::filled(1, 1, Rgba8Premul::from_straight_rgba(255, 0, 0, 128)).unwrap();

    let mut keep = Bitmap::new(1, 1).unwrap();
    copy_resized(&mut keep, &half, half.bounds(), (0, 0), true).unwrap();
    assert_eq!(keep.pixel(0, 0)[3], 128);

    let mut flat = Bitmap::new(1, 1).unwrap();
    copy_resized(&mut flat, &half, half.bounds(), (0, 0), false).unwrap();
    assert_eq!(flat.pixel(0, 0)[3], 255);
}

#[test]
fn extreme_offsets_place_every_tile_outside() {
    let mut dst = white(6, 6);
    let area = dst.bounds();
    let src = red(2, 2);
    for offset in [[i32::MAX, 0], [0, i32::MAX], [i32::MIN, i32::MIN]] {
        let n = copy_gif_onto_gif(&mut dst, &src, &at(offset, (3, 3)), area, false).unwrap();
        assert_eq!(n, 0);
    }
    assert!(dst.data().chunks_exact(4).all(|px| px == WHITE.as_slice()));

    // the last tile of a row ending at the right edge is still drawn
    let n = copy_gif_onto_gif(&mut dst, &src, &at([2, 0], (2, 1)), area, true).unwrap();
    assert_eq!(n, 2);
    assert_eq!(dst.pixel(5, 1), RED);
}
