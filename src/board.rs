// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The mailbox board: 64 tiles, each empty or holding exactly one piece.
//!
//! Boards are persistent snapshots. [`Board::execute`] is a pure function
//! producing the successor board for a move; the board a move was generated
//! against is never modified and may be held indefinitely by callers.

use std::{convert::TryFrom, fmt::{self, Write as _}};

use thiserror::Error;

use crate::core::{self, *};

/// A chess position: the piece arrangement plus the side to move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    side_to_move: Color,
}

impl Board {
    /// An empty board with White to move.
    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
            side_to_move: Color::White,
        }
    }

    /// Returns a board with `piece` placed on its square. Any piece already
    /// on that square is replaced. Builder for tests and position setup.
    pub fn with_piece(mut self, piece: Piece) -> Board {
        self.squares[piece.square().index()] = Some(piece);
        self
    }

    pub fn with_side_to_move(mut self, side_to_move: Color) -> Board {
        self.side_to_move = side_to_move;
        self
    }

    /// The tile lookup: the piece on `square`, or `None` for an empty tile.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// All of a side's active pieces, in board order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.squares
            .iter()
            .filter_map(move |slot| slot.filter(|piece| piece.color() == color))
    }

    /// A side's king, if one is on the board. A board with no king for a
    /// side is not a representable game position; `Player` construction
    /// turns this into a hard error.
    pub fn king(&self, color: Color) -> Option<Piece> {
        self.pieces(color)
            .find(|piece| piece.kind() == PieceKind::King)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// True when `color`'s king and kingside rook both stand unmoved on
    /// their home squares. Path emptiness and attack checks are the
    /// player's concern.
    pub fn castle_pieces_kingside(&self, color: Color) -> bool {
        self.castle_pieces(color, rook_homes(color).1)
    }

    /// True when `color`'s king and queenside rook both stand unmoved on
    /// their home squares.
    pub fn castle_pieces_queenside(&self, color: Color) -> bool {
        self.castle_pieces(color, rook_homes(color).0)
    }

    fn castle_pieces(&self, color: Color, rook_home: Square) -> bool {
        let king_ok = self
            .piece_at(king_home(color))
            .map_or(false, |piece| {
                piece.kind() == PieceKind::King && piece.color() == color && piece.is_first_move()
            });
        let rook_ok = self.piece_at(rook_home).map_or(false, |piece| {
            piece.kind() == PieceKind::Rook && piece.color() == color && piece.is_first_move()
        });
        king_ok && rook_ok
    }

    /// Executes a move, producing the successor board: the moved piece is
    /// relocated (first-move flag cleared), the captured piece if any is
    /// removed, the rook leg of a castle is applied, and the side to move
    /// flips. The receiver is unchanged.
    pub fn execute(&self, mov: Move) -> Board {
        debug_assert_eq!(
            Some(mov.moved_piece()),
            self.piece_at(mov.source()),
            "move does not belong to this board"
        );

        let mut squares = self.squares;
        squares[mov.source().index()] = None;
        if let Some(captured) = mov.captured_piece() {
            squares[captured.square().index()] = None;
        }
        squares[mov.destination().index()] = Some(mov.moved_piece().relocated(mov.destination()));
        if let Some(leg) = mov.castle_rook() {
            squares[leg.rook.square().index()] = None;
            squares[leg.destination.index()] = Some(leg.rook.relocated(leg.destination));
        }

        Board {
            squares,
            side_to_move: self.side_to_move.toggle(),
        }
    }
}

//
// FEN parsing and generation.
//
// Boards are constructed from FEN, the standard notation for chess
// positions. The en-passant and clock fields are validated but not
// retained: neither en passant nor draw clocks are modeled here. The castle
// field seeds the first-move flags of kings and rooks, since a castling
// right implies an unmoved king/rook pair.
//

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error("invalid en-passant")]
    InvalidEnPassant,
    #[error("empty halfmove")]
    EmptyHalfmove,
    #[error("invalid halfmove")]
    InvalidHalfmove,
    #[error("empty fullmove")]
    EmptyFullmove,
    #[error("invalid fullmove")]
    InvalidFullmove,
}

#[derive(Default)]
struct CastleField {
    white_kingside: bool,
    white_queenside: bool,
    black_kingside: bool,
    black_queenside: bool,
}

impl Board {
    /// The standard chess starting position.
    pub fn from_start_position() -> Board {
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("start position FEN is well-formed")
    }

    /// Constructs a new board from a FEN representation of a position.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<Board, FenParseError> {
        use std::{iter::Peekable, str::Chars};

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance(iter: &mut Stream<'_>) {
            let _ = iter.next();
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
            iter.peek().copied().ok_or(FenParseError::UnexpectedEnd)
        }

        fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            advance(iter);
            Ok(side)
        }

        fn eat_castle_field(iter: &mut Stream<'_>) -> Result<CastleField, FenParseError> {
            let mut field = CastleField::default();
            if peek(iter)? == '-' {
                advance(iter);
                return Ok(field);
            }

            for _ in 0..4 {
                match peek(iter)? {
                    'K' => field.white_kingside = true,
                    'Q' => field.white_queenside = true,
                    'k' => field.black_kingside = true,
                    'q' => field.black_queenside = true,
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                advance(iter);
            }

            Ok(field)
        }

        fn eat_en_passant(iter: &mut Stream<'_>) -> Result<(), FenParseError> {
            // Validated but discarded; en passant is not modeled.
            let c = peek(iter)?;
            if c == '-' {
                advance(iter);
                return Ok(());
            }

            if File::try_from(c).is_err() {
                return Err(FenParseError::InvalidEnPassant);
            }
            advance(iter);
            if Rank::try_from(peek(iter)?).is_err() {
                return Err(FenParseError::InvalidEnPassant);
            }
            advance(iter);
            Ok(())
        }

        fn eat_clock(
            iter: &mut Stream<'_>,
            empty: FenParseError,
            invalid: FenParseError,
            terminated: bool,
        ) -> Result<(), FenParseError> {
            // Validated but discarded; draw clocks are not modeled.
            let mut buf = String::new();
            loop {
                let c = match iter.peek() {
                    Some(c) => *c,
                    None if terminated => break,
                    None => return Err(FenParseError::UnexpectedEnd),
                };
                if !c.is_ascii_digit() {
                    break;
                }

                buf.push(c);
                advance(iter);
            }

            if buf.is_empty() {
                return Err(empty);
            }

            buf.parse::<u16>().map_err(|_| invalid)?;
            Ok(())
        }

        let mut board = Board::empty();
        let str_ref = fen.as_ref();
        let iter = &mut str_ref.chars().peekable();
        for rank in core::ranks().rev() {
            let mut file = 0;
            while file <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate runs of empty squares.
                if c.is_ascii_digit() {
                    if !('1'..='8').contains(&c) {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += c as usize - '0' as usize;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    advance(iter);
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let (color, kind) = piece_from_char(c)
                    .map_err(|_| FenParseError::UnknownPiece(c))?;
                let square = Square::of(rank, File::try_from(file as u8).unwrap());
                board.squares[square.index()] = Some(Piece::new(color, kind, square));
                advance(iter);
                file += 1;
            }

            if rank != core::RANK_1 {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        board.side_to_move = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        let castle_field = eat_castle_field(iter)?;
        eat(iter, ' ')?;
        eat_en_passant(iter)?;
        eat(iter, ' ')?;
        eat_clock(
            iter,
            FenParseError::EmptyHalfmove,
            FenParseError::InvalidHalfmove,
            false,
        )?;
        eat(iter, ' ')?;
        eat_clock(
            iter,
            FenParseError::EmptyFullmove,
            FenParseError::InvalidFullmove,
            true,
        )?;

        board.apply_castle_field(castle_field);
        Ok(board)
    }

    /// Reconciles king/rook first-move flags with the FEN castle field: a
    /// right implies an unmoved king/rook pair, and an absent right means
    /// the pair no longer counts as unmoved even if it stands on its home
    /// squares.
    fn apply_castle_field(&mut self, field: CastleField) {
        let rights = [
            (Color::White, field.white_kingside, field.white_queenside),
            (Color::Black, field.black_kingside, field.black_queenside),
        ];

        for (color, kingside, queenside) in rights {
            let (queenside_home, kingside_home) = rook_homes(color);
            self.set_first_move(color, PieceKind::King, king_home(color), kingside || queenside);
            self.set_first_move(color, PieceKind::Rook, kingside_home, kingside);
            self.set_first_move(color, PieceKind::Rook, queenside_home, queenside);
        }
    }

    fn set_first_move(&mut self, color: Color, kind: PieceKind, square: Square, first_move: bool) {
        if let Some(piece) = self.squares[square.index()] {
            if piece.color() == color && piece.kind() == kind {
                self.squares[square.index()] = Some(piece.with_first_move(first_move));
            }
        }
    }

    /// Emits this board as a FEN string. The en-passant and clock fields,
    /// which the board does not track, are emitted as `- 0 1`.
    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for rank in core::ranks().rev() {
            let mut empty_squares = 0;
            for file in core::files() {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != core::RANK_1 {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.side_to_move() {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }
        buf.push(' ');
        let mut any_castle = false;
        for (castleable, c) in [
            (self.castle_pieces_kingside(Color::White), 'K'),
            (self.castle_pieces_queenside(Color::White), 'Q'),
            (self.castle_pieces_kingside(Color::Black), 'k'),
            (self.castle_pieces_queenside(Color::Black), 'q'),
        ] {
            if castleable {
                buf.push(c);
                any_castle = true;
            }
        }
        if !any_castle {
            buf.push('-');
        }
        buf.push_str(" - 0 1");
        buf
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}
