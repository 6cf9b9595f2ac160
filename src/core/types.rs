// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SquareParseError {
    #[error("square index out of range: {0}")]
    OutOfRange(u8),
}

#[derive(Debug, Error)]
pub enum RankParseError {
    #[error("rank index out of range: {0}")]
    OutOfRange(u8),
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

#[derive(Debug, Error)]
pub enum FileParseError {
    #[error("file index out of range: {0}")]
    OutOfRange(u8),
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

#[derive(Debug, Error)]
pub enum PieceParseError {
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

/// A square on the chessboard, indexed 0 through 63 in row-major order with
/// a1 at index 0 and h8 at index 63.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square(pub(in crate::core) u8);

impl Square {
    /// Returns the rank of this square on the chessboard.
    pub const fn rank(self) -> Rank {
        Rank(self.0 >> 3)
    }

    /// Returns the file of this square on the chessboard.
    pub const fn file(self) -> File {
        File(self.0 & 7)
    }

    /// Creates a new Square composed of a given rank and file.
    pub const fn of(rank: Rank, file: File) -> Square {
        Square(rank.0 * 8 + file.0)
    }

    /// The square's linear index, suitable for indexing the 64-entry lookup
    /// tables in `core::masks` and the board's square array.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Offsets this square by a signed coordinate delta. Returns `None` when
    /// the result falls outside the board; off-board candidates are filtered,
    /// never reported as errors.
    ///
    /// A `Some` result only means the index is in range. Offsets that cross a
    /// rank boundary still land on a real square on the wrong row; callers
    /// must apply `masks::wraps_file_boundary` themselves.
    pub fn offset(self, delta: i32) -> Option<Square> {
        let target = self.0 as i32 + delta;
        if (0..64).contains(&target) {
            Some(Square(target as u8))
        } else {
            None
        }
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 64 {
            return Err(SquareParseError::OutOfRange(value));
        }

        Ok(Square(value))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

pub const A1: Square = Square(0);
pub const B1: Square = Square(1);
pub const C1: Square = Square(2);
pub const D1: Square = Square(3);
pub const E1: Square = Square(4);
pub const F1: Square = Square(5);
pub const G1: Square = Square(6);
pub const H1: Square = Square(7);
pub const A2: Square = Square(8);
pub const B2: Square = Square(9);
pub const C2: Square = Square(10);
pub const D2: Square = Square(11);
pub const E2: Square = Square(12);
pub const F2: Square = Square(13);
pub const G2: Square = Square(14);
pub const H2: Square = Square(15);
pub const A3: Square = Square(16);
pub const B3: Square = Square(17);
pub const C3: Square = Square(18);
pub const D3: Square = Square(19);
pub const E3: Square = Square(20);
pub const F3: Square = Square(21);
pub const G3: Square = Square(22);
pub const H3: Square = Square(23);
pub const A4: Square = Square(24);
pub const B4: Square = Square(25);
pub const C4: Square = Square(26);
pub const D4: Square = Square(27);
pub const E4: Square = Square(28);
pub const F4: Square = Square(29);
pub const G4: Square = Square(30);
pub const H4: Square = Square(31);
pub const A5: Square = Square(32);
pub const B5: Square = Square(33);
pub const C5: Square = Square(34);
pub const D5: Square = Square(35);
pub const E5: Square = Square(36);
pub const F5: Square = Square(37);
pub const G5: Square = Square(38);
pub const H5: Square = Square(39);
pub const A6: Square = Square(40);
pub const B6: Square = Square(41);
pub const C6: Square = Square(42);
pub const D6: Square = Square(43);
pub const E6: Square = Square(44);
pub const F6: Square = Square(45);
pub const G6: Square = Square(46);
pub const H6: Square = Square(47);
pub const A7: Square = Square(48);
pub const B7: Square = Square(49);
pub const C7: Square = Square(50);
pub const D7: Square = Square(51);
pub const E7: Square = Square(52);
pub const F7: Square = Square(53);
pub const G7: Square = Square(54);
pub const H7: Square = Square(55);
pub const A8: Square = Square(56);
pub const B8: Square = Square(57);
pub const C8: Square = Square(58);
pub const D8: Square = Square(59);
pub const E8: Square = Square(60);
pub const F8: Square = Square(61);
pub const G8: Square = Square(62);
pub const H8: Square = Square(63);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rank(pub(in crate::core) u8);

impl Rank {
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rank {
    type Error = RankParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 8 {
            return Err(RankParseError::OutOfRange(value));
        }

        Ok(Rank(value))
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank(value as u8 - b'1')),
            c => Err(RankParseError::InvalidChar(c)),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

pub const RANK_1: Rank = Rank(0);
pub const RANK_2: Rank = Rank(1);
pub const RANK_3: Rank = Rank(2);
pub const RANK_4: Rank = Rank(3);
pub const RANK_5: Rank = Rank(4);
pub const RANK_6: Rank = Rank(5);
pub const RANK_7: Rank = Rank(6);
pub const RANK_8: Rank = Rank(7);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct File(pub(in crate::core) u8);

impl File {
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for File {
    type Error = FileParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 8 {
            return Err(FileParseError::OutOfRange(value));
        }

        Ok(File(value))
    }
}

impl TryFrom<char> for File {
    type Error = FileParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File(value as u8 - b'a')),
            c => Err(FileParseError::InvalidChar(c)),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'a' + self.0) as char)
    }
}

pub const FILE_A: File = File(0);
pub const FILE_B: File = File(1);
pub const FILE_C: File = File(2);
pub const FILE_D: File = File(3);
pub const FILE_E: File = File(4);
pub const FILE_F: File = File(5);
pub const FILE_G: File = File(6);
pub const FILE_H: File = File(7);

/// A side in the game. White moves first and marches its pawns toward
/// increasing square indices; Black marches toward decreasing ones.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn is_white(self) -> bool {
        self == Color::White
    }

    pub fn is_black(self) -> bool {
        self == Color::Black
    }

    /// The pawn march direction multiplier: coordinate offsets for this
    /// side's pawns are scaled by this sign.
    pub const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank this side's pawns start on.
    pub const fn pawn_start_rank(self) -> Rank {
        match self {
            Color::White => RANK_2,
            Color::Black => RANK_7,
        }
    }

    /// The rank this side's king and rooks start on.
    pub const fn back_rank(self) -> Rank {
        match self {
            Color::White => RANK_1,
            Color::Black => RANK_8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        write!(f, "{}", c)
    }
}

/// Parses a FEN piece character into its color and kind. Uppercase letters
/// are White, lowercase are Black.
pub fn piece_from_char(value: char) -> Result<(Color, PieceKind), PieceParseError> {
    let color = if value.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match value.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        c => return Err(PieceParseError::InvalidChar(c)),
    };

    Ok((color, kind))
}

/// A single piece standing on the board. Pieces are immutable values: a
/// piece never changes position. Moving one produces a fresh piece at the
/// destination via [`Piece::relocated`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    square: Square,
    first_move: bool,
}

impl Piece {
    /// Creates a piece at the given square. The first-move flag is inferred
    /// from the piece's conventional home squares: pawns on their start
    /// rank, kings and rooks on their back-rank home squares. Pieces placed
    /// anywhere else are assumed to have moved already.
    pub fn new(color: Color, kind: PieceKind, square: Square) -> Piece {
        let first_move = match kind {
            PieceKind::Pawn => square.rank().0 == color.pawn_start_rank().0,
            PieceKind::King => square == king_home(color),
            PieceKind::Rook => {
                let (queenside, kingside) = rook_homes(color);
                square == queenside || square == kingside
            }
            _ => false,
        };

        Piece {
            color,
            kind,
            square,
            first_move,
        }
    }

    pub const fn color(self) -> Color {
        self.color
    }

    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    pub const fn square(self) -> Square {
        self.square
    }

    pub const fn is_first_move(self) -> bool {
        self.first_move
    }

    /// The piece produced by moving this one to `destination`: same color,
    /// same kind, first-move flag cleared. The receiver is unchanged.
    pub const fn relocated(self, destination: Square) -> Piece {
        Piece {
            color: self.color,
            kind: self.kind,
            square: destination,
            first_move: false,
        }
    }

    /// Overrides the first-move flag chosen at construction; used when a
    /// position's history (e.g. the FEN castle field) says a piece on its
    /// home square has in fact moved.
    pub(crate) const fn with_first_move(self, first_move: bool) -> Piece {
        Piece { first_move, ..self }
    }

    /// The FEN character for this piece.
    pub fn as_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        if self.color.is_white() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The home square of a side's king.
pub const fn king_home(color: Color) -> Square {
    match color {
        Color::White => E1,
        Color::Black => E8,
    }
}

/// The home squares of a side's rooks, queenside first.
pub const fn rook_homes(color: Color) -> (Square, Square) {
    match color {
        Color::White => (A1, H1),
        Color::Black => (A8, H8),
    }
}

pub fn squares() -> impl DoubleEndedIterator<Item = Square> {
    (0..64).map(Square)
}

pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
    (0..8).map(Rank)
}

pub fn files() -> impl DoubleEndedIterator<Item = File> {
    (0..8).map(File)
}
