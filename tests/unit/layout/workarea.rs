use super::*;

#[test]
fn empty_spec_covers_the_canvas_shifted_by_the_global_offset() {
    let mut wa = WorkAreaStack::new(200, 100, (5, 7), &[]);
    assert_eq!(wa.current(), IntRect::new(5, 7, 200, 100));
    wa.set_current(&[1, 1, 2, 2]);
    wa.reset_to_default();
    assert_eq!(wa.current(), IntRect::new(5, 7, 200, 100));
}

#[test]
fn missing_dimensions_fall_back_to_canvas_extent() {
    let mut wa = WorkAreaStack::new(200, 100, (0, 0), &[]);
    wa.set_current(&[10, 20]);
    assert_eq!(wa.current(), IntRect::new(10, 20, 200, 100));
    wa.set_current(&[10, 20, 30]);
    assert_eq!(wa.current(), IntRect::new(10, 20, 30, 100));
    wa.set_current(&[1, 2, -4, 0]);
    assert_eq!(wa.current(), IntRect::new(1, 2, 200, 100));
}

#[test]
fn reset_restores_the_initial_snapshot_after_many_sets() {
    let mut wa = WorkAreaStack::new(300, 300, (2, 3), &[10, 10, 50, 50]);
    let initial = wa.current();
    assert_eq!(initial, IntRect::new(12, 13, 50, 50));

    for i in 0..10 {
        wa.set_current(&[i, i * 2, 5 + i, 9]);
    }
    assert_ne!(wa.current(), initial);

    wa.reset_to_default();
    assert_eq!(wa.current(), initial);
}

#[test]
fn canvas_reset_tracks_the_new_size_but_keeps_the_default() {
    let mut wa = WorkAreaStack::new(100, 100, (0, 0), &[10, 10, 20, 20]);
    wa.reset_to_canvas(40, 30);
    assert_eq!(wa.current(), IntRect::new(0, 0, 40, 30));
    wa.reset_to_default();
    assert_eq!(wa.current(), IntRect::new(10, 10, 20, 20));
}
