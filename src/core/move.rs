// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use crate::core::{Piece, Square};

/// The rook leg of a castle: the rook that accompanies the king and the
/// square it lands on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CastleRook {
    pub rook: Piece,
    pub destination: Square,
}

/// A candidate move: the piece being moved (which knows its source square),
/// the destination, and the captured piece when the destination is held by
/// the opponent. Moves are immutable values with structural equality and are
/// only meaningful against the board they were generated from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    piece: Piece,
    destination: Square,
    captured: Option<Piece>,
    castle: Option<CastleRook>,
}

impl Move {
    /// Constructs a quiet move onto an unoccupied square.
    pub fn quiet(piece: Piece, destination: Square) -> Move {
        Move {
            piece,
            destination,
            captured: None,
            castle: None,
        }
    }

    /// Constructs an attack move onto a square held by `captured`.
    pub fn capture(piece: Piece, destination: Square, captured: Piece) -> Move {
        Move {
            piece,
            destination,
            captured: Some(captured),
            castle: None,
        }
    }

    /// Constructs a castle: the king two files toward the rook, the rook
    /// onto the square the king crossed. Which side is being castled is
    /// determined entirely by the squares involved.
    pub fn castle(king: Piece, destination: Square, rook: Piece, rook_destination: Square) -> Move {
        Move {
            piece: king,
            destination,
            captured: None,
            castle: Some(CastleRook {
                rook,
                destination: rook_destination,
            }),
        }
    }

    /// The square the moved piece departs from.
    pub fn source(&self) -> Square {
        self.piece.square()
    }

    /// The square the moved piece lands on.
    pub const fn destination(&self) -> Square {
        self.destination
    }

    pub const fn moved_piece(&self) -> Piece {
        self.piece
    }

    pub const fn captured_piece(&self) -> Option<Piece> {
        self.captured
    }

    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// The rook leg of a castle, when this move is one.
    pub const fn castle_rook(&self) -> Option<CastleRook> {
        self.castle
    }

    pub const fn is_castle(&self) -> bool {
        self.castle.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source(), self.destination())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, PieceKind, E2, E4, F4};

    #[test]
    fn quiet_move_accessors() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn, E2);
        let mov = Move::quiet(pawn, E4);
        assert_eq!(E2, mov.source());
        assert_eq!(E4, mov.destination());
        assert_eq!(pawn, mov.moved_piece());
        assert!(!mov.is_capture());
        assert!(!mov.is_castle());
        assert_eq!("e2e4", format!("{}", mov));
    }

    #[test]
    fn capture_records_victim() {
        let bishop = Piece::new(Color::White, PieceKind::Bishop, E2);
        let victim = Piece::new(Color::Black, PieceKind::Knight, F4);
        let mov = Move::capture(bishop, F4, victim);
        assert!(mov.is_capture());
        assert_eq!(Some(victim), mov.captured_piece());
    }

    #[test]
    fn equality_is_structural() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn, E2);
        assert_eq!(Move::quiet(pawn, E4), Move::quiet(pawn, E4));
        assert_ne!(Move::quiet(pawn, E4), Move::quiet(pawn, F4));
    }
}
