// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation, per piece kind, from constant coordinate
//! offset tables.
//!
//! "Pseudo-legal" means the geometry and occupancy rules are honored but
//! king safety is not: a generated move may still leave the mover's own
//! king attacked. The player layer filters those at execution time.
//!
//! Offsets that would take a piece off the board are silently skipped, by
//! range ([`Square::offset`]) and by file wrap
//! ([`masks::wraps_file_boundary`]); an invalid destination is simply never
//! added to the result.

use crate::core::{masks, Color, Move, Piece, PieceKind, Square};
use crate::Board;

/// The knight's eight L-shaped jumps.
pub const KNIGHT_OFFSETS: [i32; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

/// The king's eight single steps.
pub const KING_OFFSETS: [i32; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

/// The rook's four orthogonal ray directions.
pub const ROOK_DIRECTIONS: [i32; 4] = [-8, -1, 1, 8];

/// The bishop's four diagonal ray directions.
pub const BISHOP_DIRECTIONS: [i32; 4] = [-9, -7, 7, 9];

/// The queen's eight ray directions.
pub const QUEEN_DIRECTIONS: [i32; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

/// Generates every pseudo-legal move for one side. Output order follows
/// board order and carries no meaning.
pub fn generate_moves(us: Color, board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    for piece in board.pieces(us) {
        piece_moves(&piece, board, &mut moves);
    }
    moves
}

/// Generates the pseudo-legal moves of a single piece, appending them to
/// `moves`.
pub fn piece_moves(piece: &Piece, board: &Board, moves: &mut Vec<Move>) {
    match piece.kind() {
        PieceKind::Pawn => pawn_moves(piece, board, moves),
        PieceKind::Knight => jumping_moves(piece, board, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop => sliding_moves(piece, board, &BISHOP_DIRECTIONS, moves),
        PieceKind::Rook => sliding_moves(piece, board, &ROOK_DIRECTIONS, moves),
        PieceKind::Queen => sliding_moves(piece, board, &QUEEN_DIRECTIONS, moves),
        PieceKind::King => jumping_moves(piece, board, &KING_OFFSETS, moves),
    }
}

/// Jumping pieces (knight, king) apply each offset once; every offset is
/// independent of the others.
fn jumping_moves(piece: &Piece, board: &Board, offsets: &[i32], moves: &mut Vec<Move>) {
    for &offset in offsets {
        if masks::wraps_file_boundary(piece.square(), offset) {
            continue;
        }
        let destination = match piece.square().offset(offset) {
            Some(square) => square,
            None => continue,
        };

        match board.piece_at(destination) {
            None => moves.push(Move::quiet(*piece, destination)),
            Some(occupant) if occupant.color() != piece.color() => {
                moves.push(Move::capture(*piece, destination, occupant))
            }
            Some(_) => {}
        }
    }
}

/// Stepping pieces (rook, bishop, queen) extend each ray square by square.
/// The wrap exclusion is applied to the square being stepped from, before
/// advancing; a ray ends at the board edge or at the first occupied square,
/// which is captured when it holds an enemy piece. A piece never sees past
/// the first obstruction.
fn sliding_moves(piece: &Piece, board: &Board, directions: &[i32], moves: &mut Vec<Move>) {
    for &direction in directions {
        let mut from = piece.square();
        loop {
            if masks::wraps_file_boundary(from, direction) {
                break;
            }
            let destination = match from.offset(direction) {
                Some(square) => square,
                None => break,
            };

            match board.piece_at(destination) {
                None => {
                    moves.push(Move::quiet(*piece, destination));
                    from = destination;
                }
                Some(occupant) => {
                    if occupant.color() != piece.color() {
                        moves.push(Move::capture(*piece, destination, occupant));
                    }
                    break;
                }
            }
        }
    }
}

/// Pawn offsets are scaled by the side's march direction. The single push
/// requires an empty destination; the double push additionally requires an
/// unmoved pawn on its start rank and an empty intermediate square;
/// diagonal captures require an enemy occupant and respect the A/H-file
/// edge exclusions. En passant and promotion are not modeled.
fn pawn_moves(piece: &Piece, board: &Board, moves: &mut Vec<Move>) {
    let sign = piece.color().sign();
    let from = piece.square();

    if let Some(one_up) = from.offset(8 * sign) {
        if board.piece_at(one_up).is_none() {
            moves.push(Move::quiet(*piece, one_up));

            let start_rank = match piece.color() {
                Color::White => masks::RANK_2_SQUARES,
                Color::Black => masks::RANK_7_SQUARES,
            };
            if piece.is_first_move() && start_rank[from.index()] {
                if let Some(two_up) = from.offset(16 * sign) {
                    if board.piece_at(two_up).is_none() {
                        moves.push(Move::quiet(*piece, two_up));
                    }
                }
            }
        }
    }

    for capture_offset in [7 * sign, 9 * sign] {
        if masks::wraps_file_boundary(from, capture_offset) {
            continue;
        }
        let destination = match from.offset(capture_offset) {
            Some(square) => square,
            None => continue,
        };
        if let Some(occupant) = board.piece_at(destination) {
            if occupant.color() != piece.color() {
                moves.push(Move::capture(*piece, destination, occupant));
            }
        }
    }
}

/// The pseudo-legal destinations of one piece; convenience for callers and
/// tests that only care about geometry.
pub fn piece_destinations(piece: &Piece, board: &Board) -> Vec<Square> {
    let mut moves = Vec::new();
    piece_moves(piece, board, &mut moves);
    moves.iter().map(|mov| mov.destination()).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::generate_moves;
    use crate::core::*;
    use crate::Board;

    fn assert_moves_generated(fen: &'static str, expected: &[(Square, Square)]) {
        let board = Board::from_fen(fen).unwrap();
        let generated = generate_moves(board.side_to_move(), &board);
        let got: HashSet<_> = generated
            .iter()
            .map(|mov| (mov.source(), mov.destination()))
            .collect();
        let want: HashSet<_> = expected.iter().copied().collect();
        if got != want {
            println!("{}", board);
            for mov in &generated {
                println!("   > {}", mov);
            }
            panic!("move set mismatch");
        }
    }

    fn assert_moves_contains(fen: &'static str, expected: &[(Square, Square)]) {
        let board = Board::from_fen(fen).unwrap();
        let generated = generate_moves(board.side_to_move(), &board);
        let got: HashSet<_> = generated
            .iter()
            .map(|mov| (mov.source(), mov.destination()))
            .collect();
        for pair in expected {
            if !got.contains(pair) {
                println!("{}", board);
                panic!("move {}{} was not generated", pair.0, pair.1);
            }
        }
    }

    fn assert_moves_does_not_contain(fen: &'static str, banned: &[(Square, Square)]) {
        let board = Board::from_fen(fen).unwrap();
        let generated = generate_moves(board.side_to_move(), &board);
        let got: HashSet<_> = generated
            .iter()
            .map(|mov| (mov.source(), mov.destination()))
            .collect();
        for pair in banned {
            if got.contains(pair) {
                println!("{}", board);
                panic!("move list contained banned move: {}{}", pair.0, pair.1);
            }
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn centered_knight_hits_all_eight() {
            assert_moves_generated(
                "8/8/8/8/3N4/8/8/8 w - - 0 1",
                &[
                    (D4, B3),
                    (D4, B5),
                    (D4, C2),
                    (D4, C6),
                    (D4, E2),
                    (D4, E6),
                    (D4, F3),
                    (D4, F5),
                ],
            );
        }

        #[test]
        fn corner_knight_does_not_wrap() {
            // A knight on a1 has exactly two jumps; the rest wrap around
            // the A/B files or fall off the bottom of the board.
            assert_moves_generated("8/8/8/8/8/8/8/N7 w - - 0 1", &[(A1, B3), (A1, C2)]);
        }

        #[test]
        fn h_file_knight_does_not_wrap() {
            assert_moves_generated(
                "8/8/8/8/7N/8/8/8 w - - 0 1",
                &[(H4, G2), (H4, F3), (H4, F5), (H4, G6)],
            );
        }

        #[test]
        fn knight_captures_enemy_skips_friend() {
            // Friendly pawn on b3, enemy pawn on f5.
            assert_moves_contains("8/8/8/5p2/3N4/1P6/8/8 w - - 0 1", &[(D4, F5)]);
            assert_moves_does_not_contain("8/8/8/5p2/3N4/1P6/8/8 w - - 0 1", &[(D4, B3)]);
        }
    }

    mod rooks {
        use super::*;

        #[test]
        fn open_board_rook() {
            assert_moves_generated(
                "8/8/8/8/8/8/8/R7 w - - 0 1",
                &[
                    (A1, B1),
                    (A1, C1),
                    (A1, D1),
                    (A1, E1),
                    (A1, F1),
                    (A1, G1),
                    (A1, H1),
                    (A1, A2),
                    (A1, A3),
                    (A1, A4),
                    (A1, A5),
                    (A1, A6),
                    (A1, A7),
                    (A1, A8),
                ],
            );
        }

        #[test]
        fn rook_stops_at_first_obstruction() {
            // Enemy pawn on d4 is capturable; nothing beyond it on the d-file
            // may appear. The friendly pawn on f1 blocks east without a
            // capture.
            assert_moves_generated(
                "8/8/8/8/3p4/8/8/3R1P2 w - - 0 1",
                &[
                    (D1, A1),
                    (D1, B1),
                    (D1, C1),
                    (D1, E1),
                    (D1, D2),
                    (D1, D3),
                    (D1, D4),
                    (F1, F2),
                ],
            );
        }

        #[test]
        fn rook_does_not_wrap_files() {
            // A rook on h4 stepping east must stop at the board edge, not
            // reappear on the a-file of the next rank. The westward slide
            // along rank 4 all the way to a4 is legitimate.
            assert_moves_does_not_contain("8/8/8/8/7R/8/8/8 w - - 0 1", &[(H4, A5), (H4, B5)]);
            assert_moves_contains("8/8/8/8/7R/8/8/8 w - - 0 1", &[(H4, A4)]);
        }
    }

    mod bishops_and_queens {
        use super::*;

        #[test]
        fn open_board_bishop() {
            assert_moves_generated(
                "8/8/8/8/3B4/8/8/8 w - - 0 1",
                &[
                    (D4, E5),
                    (D4, F6),
                    (D4, G7),
                    (D4, H8),
                    (D4, E3),
                    (D4, F2),
                    (D4, G1),
                    (D4, C3),
                    (D4, B2),
                    (D4, A1),
                    (D4, C5),
                    (D4, B6),
                    (D4, A7),
                ],
            );
        }

        #[test]
        fn bishop_capture_ends_ray() {
            assert_moves_contains("8/8/8/2p1p3/3B4/2p1p3/8/8 w - - 0 1", &[(D4, E5), (D4, C3)]);
            assert_moves_does_not_contain(
                "8/8/8/2p1p3/3B4/2p1p3/8/8 w - - 0 1",
                &[(D4, F6), (D4, B2), (D4, B6), (D4, F2)],
            );
        }

        #[test]
        fn queen_is_rook_plus_bishop() {
            assert_moves_contains(
                "8/8/8/8/3Q4/8/8/8 w - - 0 1",
                &[(D4, D8), (D4, H4), (D4, A1), (D4, G7), (D4, A4), (D4, D1)],
            );
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn centered_king() {
            assert_moves_generated(
                "8/8/8/8/3K4/8/8/8 w - - 0 1",
                &[
                    (D4, C3),
                    (D4, C4),
                    (D4, C5),
                    (D4, D3),
                    (D4, D5),
                    (D4, E3),
                    (D4, E4),
                    (D4, E5),
                ],
            );
        }

        #[test]
        fn a_file_king_does_not_wrap() {
            assert_moves_generated(
                "8/8/8/8/K7/8/8/8 w - - 0 1",
                &[(A4, A3), (A4, A5), (A4, B3), (A4, B4), (A4, B5)],
            );
        }
    }

    mod pawns {
        use super::*;

        #[test]
        fn white_pawn_single_push() {
            assert_moves_generated("8/8/8/8/5P2/8/8/8 w - - 0 1", &[(F4, F5)]);
        }

        #[test]
        fn white_pawn_start_rank_double_push() {
            assert_moves_generated("8/8/8/8/8/8/4P3/8 w - - 0 1", &[(E2, E3), (E2, E4)]);
        }

        #[test]
        fn black_pawn_marches_down() {
            assert_moves_generated("8/4p3/8/8/8/8/8/8 b - - 0 1", &[(E7, E6), (E7, E5)]);
        }

        #[test]
        fn no_push_when_blocked() {
            assert_moves_does_not_contain(
                "8/8/8/8/4p3/4P3/8/8 w - - 0 1",
                &[(E3, E4)],
            );
        }

        #[test]
        fn no_double_push_through_blocker() {
            // The intermediate square is occupied; both the single and the
            // double push are gone.
            assert_moves_does_not_contain(
                "8/8/8/8/8/4p3/4P3/8 w - - 0 1",
                &[(E2, E3), (E2, E4)],
            );
        }

        #[test]
        fn no_double_push_onto_occupied_square() {
            assert_moves_generated("8/8/8/8/4p3/8/4P3/8 w - - 0 1", &[(E2, E3)]);
        }

        #[test]
        fn diagonal_captures() {
            assert_moves_generated(
                "8/8/8/3p1p2/4P3/8/8/8 w - - 0 1",
                &[(E4, E5), (E4, D5), (E4, F5)],
            );
        }

        #[test]
        fn no_diagonal_onto_empty_square() {
            assert_moves_does_not_contain("8/8/8/8/4P3/8/8/8 w - - 0 1", &[(E4, D5), (E4, F5)]);
        }

        #[test]
        fn a_file_pawn_cannot_capture_west() {
            // An enemy pawn on h4 is *not* capturable by the a-file pawn
            // even though a4 + 7 == h4 in linear coordinates.
            assert_moves_generated("8/8/8/8/P6p/8/8/8 w - - 0 1", &[(A4, A5)]);
        }

        #[test]
        fn h_file_pawn_cannot_capture_east() {
            assert_moves_generated("8/8/8/P7/7P/8/8/8 w - - 0 1", &[(H4, H5), (A5, A6)]);
        }

        #[test]
        fn moved_pawn_cannot_double_push() {
            // A pawn artificially returned to its start rank with the
            // first-move flag cleared gets no double push.
            let pawn = Piece::new(Color::White, PieceKind::Pawn, E3)
                .relocated(E2);
            let board = Board::empty().with_piece(pawn);
            let moves = generate_moves(Color::White, &board);
            let destinations: Vec<_> = moves.iter().map(|m| m.destination()).collect();
            assert_eq!(vec![E3], destinations);
        }
    }

    mod properties {
        use super::*;

        // Spot-checks over a busy middlegame position: no generated move
        // lands on a friendly piece, and every generated knight move spans
        // a geometrically valid file distance.
        const BUSY: &str = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2NP1N2/PPP2PPP/R1BQK2R w KQkq - 0 1";

        #[test]
        fn never_lands_on_friendly_piece() {
            let board = Board::from_fen(BUSY).unwrap();
            for color in [Color::White, Color::Black] {
                for mov in generate_moves(color, &board) {
                    if let Some(occupant) = board.piece_at(mov.destination()) {
                        assert_ne!(color, occupant.color(), "move {}", mov);
                    }
                }
            }
        }

        #[test]
        fn knight_file_distance_is_one_or_two() {
            let board = Board::from_fen(BUSY).unwrap();
            for color in [Color::White, Color::Black] {
                for mov in generate_moves(color, &board) {
                    if mov.moved_piece().kind() == PieceKind::Knight {
                        let from = mov.source().file().as_u8() as i32;
                        let to = mov.destination().file().as_u8() as i32;
                        assert!((1..=2).contains(&(from - to).abs()), "move {}", mov);
                    }
                }
            }
        }

        #[test]
        fn king_and_pawn_file_distance_is_at_most_one() {
            let board = Board::from_fen(BUSY).unwrap();
            for color in [Color::White, Color::Black] {
                for mov in generate_moves(color, &board) {
                    let kind = mov.moved_piece().kind();
                    if kind == PieceKind::King || kind == PieceKind::Pawn {
                        let from = mov.source().file().as_u8() as i32;
                        let to = mov.destination().file().as_u8() as i32;
                        assert!((from - to).abs() <= 1, "move {}", mov);
                    }
                }
            }
        }

        #[test]
        fn all_destinations_in_range() {
            let board = Board::from_fen(BUSY).unwrap();
            for color in [Color::White, Color::Black] {
                for mov in generate_moves(color, &board) {
                    assert!(mov.destination().as_u8() < 64);
                }
            }
        }
    }
}
