// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Perft: exhaustive move-path counting, the standard correctness check
//! for move generation and execution.
//!
//! A node is counted only when its move actually commits; candidates that
//! the player rejects for king safety contribute nothing, so perft totals
//! exercise the whole legality pipeline and not just generation.

use tracing::debug;

use crate::player::PlayerError;
use crate::Board;

/// Counts the leaf positions reachable from `board` in exactly `depth`
/// committed moves.
pub fn perft(board: &Board, depth: u32) -> Result<u64, PlayerError> {
    if depth == 0 {
        return Ok(1);
    }

    let player = board.current_player()?;
    let mut nodes = 0;
    for &mov in player.legal_moves() {
        let transition = player.make_move(mov);
        if !transition.status().is_done() {
            continue;
        }
        nodes += if depth == 1 {
            1
        } else {
            perft(transition.board(), depth - 1)?
        };
    }
    Ok(nodes)
}

/// Per-root-move breakdown of a perft count, sorted by move, for narrowing
/// down a divergence against a reference engine.
pub fn divide(board: &Board, depth: u32) -> Result<Vec<(String, u64)>, PlayerError> {
    assert!(depth > 0, "divide requires at least one ply");

    let player = board.current_player()?;
    let mut entries = Vec::new();
    for &mov in player.legal_moves() {
        let transition = player.make_move(mov);
        if !transition.status().is_done() {
            continue;
        }
        let nodes = perft(transition.board(), depth - 1)?;
        debug!(%mov, nodes, "divide");
        entries.push((mov.to_string(), nodes));
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Board {
        Board::from_start_position()
    }

    #[test]
    fn perft_zero_is_one() {
        assert_eq!(1, perft(&start(), 0).unwrap());
    }

    #[test]
    fn perft_start_depth_1() {
        assert_eq!(20, perft(&start(), 1).unwrap());
    }

    #[test]
    fn perft_start_depth_2() {
        assert_eq!(400, perft(&start(), 2).unwrap());
    }

    #[test]
    fn perft_start_depth_3() {
        assert_eq!(8902, perft(&start(), 3).unwrap());
    }

    #[test]
    #[ignore = "slow; run with --ignored"]
    fn perft_start_depth_4() {
        assert_eq!(197_281, perft(&start(), 4).unwrap());
    }

    #[test]
    fn perft_of_mate_is_zero() {
        let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(0, perft(&board, 1).unwrap());
    }

    #[test]
    fn perft_of_kingless_board_is_an_error() {
        let board = Board::from_fen("8/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(perft(&board, 1).is_err());
    }

    #[test]
    fn divide_sums_to_perft() {
        let entries = divide(&start(), 2).unwrap();
        assert_eq!(20, entries.len());
        assert_eq!(400, entries.iter().map(|(_, n)| n).sum::<u64>());
    }

    #[test]
    fn divide_is_sorted_by_move() {
        let entries = divide(&start(), 1).unwrap();
        let mut sorted = entries.clone();
        sorted.sort();
        assert_eq!(sorted, entries);
    }
}
