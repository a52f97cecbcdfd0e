//! Implementation of the tic-tac-toe board, its rules and the move notation
//! used to talk to the outside world.

pub mod bitboard;
pub mod core;
pub mod position;
