// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The player layer: aggregation of a side's legal moves, check and
//! terminal-state classification, and the move-execution protocol.
//!
//! A [`Player`] is an immutable view derived from a board snapshot. Playing
//! a move goes through [`Player::make_move`], which either rejects the
//! candidate (returning the original board untouched) or commits a new
//! board in which the mover's king is guaranteed not to be under attack.

use std::cell::OnceCell;

use thiserror::Error;
use tracing::{debug, trace};

use crate::core::{king_home, masks, rook_homes, Color, Move, Piece, PieceKind, Square};
use crate::{movegen, Board};

/// The single hard fault of the engine: a board with no king for a side is
/// a corrupted position, not a representable game state, and no player can
/// be derived from it.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum PlayerError {
    #[error("invalid board: no {0} king")]
    MissingKing(Color),
}

/// The outcome of offering a move to [`Player::make_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveStatus {
    /// The move was committed; the transition carries the successor board.
    Done,
    /// The move is not a member of the mover's legal-move set.
    IllegalMove,
    /// The move is geometrically legal but would expose the mover's own
    /// king to attack.
    LeavesPlayerInCheck,
}

impl MoveStatus {
    pub fn is_done(self) -> bool {
        self == MoveStatus::Done
    }
}

/// The result of one `make_move` call: the move, its status, and the board
/// to continue from. For rejected moves that board is the original,
/// unchanged position.
#[derive(Clone, Debug)]
pub struct MoveTransition {
    board: Board,
    mov: Move,
    status: MoveStatus,
}

impl MoveTransition {
    /// The board resulting from this transition: the successor position for
    /// a committed move, the untouched original otherwise.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn mov(&self) -> Move {
        self.mov
    }

    pub fn status(&self) -> MoveStatus {
        self.status
    }
}

/// One side of a position: its king, its full legal-move set, and its check
/// status, all computed at construction from an immutable board snapshot.
#[derive(Debug)]
pub struct Player {
    board: Board,
    color: Color,
    king: Piece,
    legal_moves: Vec<Move>,
    opponent_moves: Vec<Move>,
    in_check: bool,
    // Escape search is expensive (it simulates every legal move); computed
    // at most once since the player never changes.
    has_escape: OnceCell<bool>,
}

impl Player {
    /// Derives the player of `color` from a board snapshot. Fails only when
    /// the board has no king for that side.
    pub fn new(board: Board, color: Color) -> Result<Player, PlayerError> {
        let legal_moves = movegen::generate_moves(color, &board);
        let opponent_moves = movegen::generate_moves(color.toggle(), &board);
        let king = board.king(color).ok_or(PlayerError::MissingKing(color))?;
        let in_check = !attacks_on(king.square(), &opponent_moves).is_empty();

        let mut player = Player {
            board,
            color,
            king,
            legal_moves,
            opponent_moves,
            in_check,
            has_escape: OnceCell::new(),
        };
        let castles = player.castle_moves();
        player.legal_moves.extend(castles);
        Ok(player)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn king(&self) -> Piece {
        self.king
    }

    /// This side's aggregated legal-move set: piece-generated moves plus
    /// castles. Moves in this set may still be rejected at execution time
    /// for king safety.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// Membership test against the legal-move set; equality is structural.
    pub fn is_move_legal(&self, mov: &Move) -> bool {
        self.legal_moves.contains(mov)
    }

    /// True when the opponent's move set contains at least one move landing
    /// on this side's king.
    pub fn is_in_check(&self) -> bool {
        self.in_check
    }

    /// In check with no move that resolves to a safe position.
    pub fn is_in_checkmate(&self) -> bool {
        self.in_check && !self.has_escape_moves()
    }

    /// Not in check, but without any legal move at all.
    pub fn is_in_stalemate(&self) -> bool {
        !self.in_check && !self.has_escape_moves()
    }

    /// Whether any legal move survives execution. Simulates every candidate
    /// through `make_move` and discards the resulting boards.
    pub fn has_escape_moves(&self) -> bool {
        *self.has_escape.get_or_init(|| {
            self.legal_moves
                .iter()
                .any(|&mov| self.make_move(mov).status().is_done())
        })
    }

    /// Offers a move for execution.
    ///
    /// The transition has exactly one of three outcomes:
    /// - the move is not in the legal-move set: `IllegalMove`, original
    ///   board;
    /// - executing it would leave the mover's king attacked:
    ///   `LeavesPlayerInCheck`, original board, tentative board discarded;
    /// - otherwise `Done` with the successor board committed.
    ///
    /// A committed board therefore never has its just-moved side's king
    /// under attack.
    pub fn make_move(&self, mov: Move) -> MoveTransition {
        if !self.is_move_legal(&mov) {
            debug!(%mov, color = %self.color, "rejected: not in the legal move set");
            return MoveTransition {
                board: self.board.clone(),
                mov,
                status: MoveStatus::IllegalMove,
            };
        }

        let tentative = self.board.execute(mov);
        let replies = movegen::generate_moves(self.color.toggle(), &tentative);
        let king_square = tentative
            .king(self.color)
            .expect("mover's king disappeared during execution")
            .square();
        if !attacks_on(king_square, &replies).is_empty() {
            debug!(%mov, color = %self.color, "rejected: leaves the king in check");
            return MoveTransition {
                board: self.board.clone(),
                mov,
                status: MoveStatus::LeavesPlayerInCheck,
            };
        }

        trace!(%mov, color = %self.color, "committed");
        MoveTransition {
            board: tentative,
            mov,
            status: MoveStatus::Done,
        }
    }

    /// The castling hook: castle moves are aggregated into the legal-move
    /// set from both sides' piece moves rather than generated per piece.
    ///
    /// A castle requires an unmoved king and rook on their home squares,
    /// every square between them empty, the king not currently in check,
    /// and the king's transit and destination squares unattacked by the
    /// opponent's move set.
    fn castle_moves(&self) -> Vec<Move> {
        let mut castles = Vec::new();
        if self.in_check || !self.king.is_first_move() || self.king.square() != king_home(self.color)
        {
            return castles;
        }

        let (queenside_rook_home, kingside_rook_home) = rook_homes(self.color);

        if self.board.castle_pieces_kingside(self.color) {
            let (transit, destination) = match self.color {
                Color::White => (crate::core::F1, crate::core::G1),
                Color::Black => (crate::core::F8, crate::core::G8),
            };
            if self.board.piece_at(transit).is_none()
                && self.board.piece_at(destination).is_none()
                && attacks_on(transit, &self.opponent_moves).is_empty()
                && attacks_on(destination, &self.opponent_moves).is_empty()
                && !self.pawn_covers(transit)
                && !self.pawn_covers(destination)
            {
                // castle_pieces_kingside guarantees a friendly rook here.
                let rook = self
                    .board
                    .piece_at(kingside_rook_home)
                    .expect("castle rook vanished");
                castles.push(Move::castle(self.king, destination, rook, transit));
            }
        }

        if self.board.castle_pieces_queenside(self.color) {
            let (knight_square, destination, transit) = match self.color {
                Color::White => (crate::core::B1, crate::core::C1, crate::core::D1),
                Color::Black => (crate::core::B8, crate::core::C8, crate::core::D8),
            };
            if self.board.piece_at(knight_square).is_none()
                && self.board.piece_at(destination).is_none()
                && self.board.piece_at(transit).is_none()
                && attacks_on(transit, &self.opponent_moves).is_empty()
                && attacks_on(destination, &self.opponent_moves).is_empty()
                && !self.pawn_covers(transit)
                && !self.pawn_covers(destination)
            {
                let rook = self
                    .board
                    .piece_at(queenside_rook_home)
                    .expect("castle rook vanished");
                castles.push(Move::castle(self.king, destination, rook, transit));
            }
        }

        castles
    }

    /// True when an enemy pawn's diagonal covers `square`. Pawn captures
    /// onto empty squares are not moves and so never appear in the
    /// opponent's move set; the castling transit checks ask the board
    /// directly.
    fn pawn_covers(&self, square: Square) -> bool {
        let them = self.color.toggle();
        [7 * them.sign(), 9 * them.sign()].iter().any(|&offset| {
            let from = match square.offset(-offset) {
                Some(from) => from,
                None => return false,
            };
            if masks::wraps_file_boundary(from, offset) {
                return false;
            }
            self.board.piece_at(from).map_or(false, |piece| {
                piece.color() == them && piece.kind() == PieceKind::Pawn
            })
        })
    }
}

/// Filters a move collection down to the moves landing on `square`. Used
/// for check detection and for king-safety verification after a
/// hypothetical move.
pub fn attacks_on(square: Square, moves: &[Move]) -> Vec<Move> {
    moves
        .iter()
        .filter(|mov| mov.destination() == square)
        .copied()
        .collect()
}

impl Board {
    /// Derives the player view for one side of this position.
    pub fn player(&self, color: Color) -> Result<Player, PlayerError> {
        Player::new(self.clone(), color)
    }

    /// Derives the player whose turn it is.
    pub fn current_player(&self) -> Result<Player, PlayerError> {
        self.player(self.side_to_move())
    }
}
