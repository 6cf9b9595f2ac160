// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-square boolean membership tables for files and ranks, shared by all
//! piece variants in `movegen`.
//!
//! Coordinate arithmetic on a linear board can cross a rank boundary and
//! still produce an in-range index; a knight on h4 jumping "+10" lands on
//! b6, visually wrapping around the board edge. Every offset the engine
//! uses is therefore vetted against these tables before it is applied,
//! keyed by the square the step originates from.

use crate::core::Square;

const fn file_table(file: u8) -> [bool; 64] {
    let mut table = [false; 64];
    let mut square = 0;
    while square < 64 {
        table[square] = (square as u8) % 8 == file;
        square += 1;
    }
    table
}

const fn rank_table(rank: u8) -> [bool; 64] {
    let mut table = [false; 64];
    let mut square = 0;
    while square < 64 {
        table[square] = (square as u8) / 8 == rank;
        square += 1;
    }
    table
}

pub const FILE_A_SQUARES: [bool; 64] = file_table(0);
pub const FILE_B_SQUARES: [bool; 64] = file_table(1);
pub const FILE_G_SQUARES: [bool; 64] = file_table(6);
pub const FILE_H_SQUARES: [bool; 64] = file_table(7);

/// White's pawn start rank.
pub const RANK_2_SQUARES: [bool; 64] = rank_table(1);
/// Black's pawn start rank.
pub const RANK_7_SQUARES: [bool; 64] = rank_table(6);

/// Reports whether applying `offset` from `from` would wrap around a board
/// edge: the arithmetic stays within 0..64 but the destination lands on the
/// wrong row. Offsets with no horizontal component never wrap.
///
/// Covers every offset in the engine's tables: single steps (king, sliding
/// rays, pawn captures) and knight jumps.
pub const fn wraps_file_boundary(from: Square, offset: i32) -> bool {
    let index = from.index();
    match offset {
        // One file to the west: steps -9/-1/7, knight jumps -17/15.
        -17 | -9 | -1 | 7 | 15 => FILE_A_SQUARES[index],
        // One file to the east: steps -7/1/9, knight jumps -15/17.
        -15 | -7 | 1 | 9 | 17 => FILE_H_SQUARES[index],
        // Two files to the west: knight jumps -10/6.
        -10 | 6 => FILE_A_SQUARES[index] || FILE_B_SQUARES[index],
        // Two files to the east: knight jumps -6/10.
        -6 | 10 => FILE_G_SQUARES[index] || FILE_H_SQUARES[index],
        _ => false,
    }
}
