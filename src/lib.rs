// Copyright 2024 the arbiter developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `arbiter` is a chess rules engine: given a board position it enumerates
//! the legal moves for each piece, aggregates them into a side's legal-move
//! set, detects check, checkmate, and stalemate, and applies candidate moves
//! to produce new, immutable boards.
//!
//! Boards are persistent snapshots. Executing a move never mutates the board
//! it was played on; [`Player::make_move`] either rejects the candidate or
//! hands back a fresh [`Board`] inside a [`MoveTransition`], and a committed
//! board never has its just-moved side's king under attack. `arbiter` does
//! not search or evaluate positions; it only adjudicates the rules.

pub mod board;
pub mod core;
pub mod movegen;
pub mod perft;
pub mod player;

pub use board::{Board, FenParseError};
pub use crate::core::Move;
pub use player::{MoveStatus, MoveTransition, Player, PlayerError};
