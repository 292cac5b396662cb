// src/grid/tests.rs

use super::*;
use test_log::test;

fn numbered(width: usize, height: usize) -> Grid<u32> {
    Grid::from_fn(width, height, |x, y| (y * width + x) as u32)
}

#[test]
fn it_should_rotate_clockwise_by_one_quarter_turn() {
    // 0 1 2        3 0
    // 3 4 5   ->   4 1
    //              5 2
    let g = numbered(3, 2);
    let r = rotate_90(&g, 1);
    assert_eq!(r.dimensions(), (2, 3));
    assert_eq!(r.cells(), &[3, 0, 4, 1, 5, 2]);
}

#[test]
fn it_should_rotate_half_a_turn_without_swapping_dimensions() {
    let g = numbered(3, 2);
    let r = rotate_90(&g, 2);
    assert_eq!(r.dimensions(), (3, 2));
    assert_eq!(r.cells(), &[5, 4, 3, 2, 1, 0]);
}

#[test]
fn it_should_rotate_three_quarter_turns_counter_clockwise_equivalent() {
    // 0 1 2        2 5
    // 3 4 5   ->   1 4
    //              0 3
    let g = numbered(3, 2);
    let r = rotate_90(&g, 3);
    assert_eq!(r.dimensions(), (2, 3));
    assert_eq!(r.cells(), &[2, 5, 1, 4, 0, 3]);
}

#[test]
fn it_should_restore_the_original_after_one_and_three_turns() {
    for (w, h) in [(1, 1), (1, 7), (7, 1), (4, 4), (5, 3), (172, 320)] {
        let g = numbered(w, h);
        let back = rotate_90(&rotate_90(&g, 1), 3);
        assert_eq!(back, g, "{}x{}", w, h);
    }
}

#[test]
fn it_should_treat_turns_modulo_four() {
    let g = numbered(4, 3);
    assert_eq!(rotate_90(&g, 0), g);
    assert_eq!(rotate_90(&g, 4), g);
    assert_eq!(rotate_90(&g, 5), rotate_90(&g, 1));
}

#[test]
fn it_should_move_the_top_left_corner_to_the_top_right() {
    let mut cells = vec![0u8; 6 * 2];
    cells[0] = 9;
    let g = Grid::from_cells(6, 2, cells).unwrap();
    let r = g.rotate_90(1);
    assert_eq!(r.get(r.width() - 1, 0), Some(9));
}

#[test]
fn it_should_reject_cells_that_do_not_match_the_dimensions() {
    assert!(Grid::from_cells(3, 3, vec![0u8; 8]).is_none());
    assert!(Grid::from_cells(3, 3, vec![0u8; 9]).is_some());
}

#[test]
fn it_should_yield_one_slice_per_row() {
    let g = numbered(3, 2);
    let rows: Vec<&[u32]> = g.rows().collect();
    assert_eq!(rows, vec![&[0, 1, 2][..], &[3, 4, 5][..]]);
}
