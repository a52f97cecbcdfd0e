//! Parsing of input lines: commands typed into the interactive loop and the
//! move and action-count lines of the harness protocol.

use crate::error::Error;
use crate::game::core::Move;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Opponent's move, [`None`] for "-1 -1" (engine moves first).
    Play(Option<Move>),
    /// Print the board.
    Show,
    NewGame,
    Quit,
    /// Anything else, with the reason it was rejected.
    Invalid(Error),
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        match input.trim() {
            "d" | "board" => Self::Show,
            "new" => Self::NewGame,
            "quit" | "exit" => Self::Quit,
            notation => match Move::from_notation(notation) {
                Ok(opponent_move) => Self::Play(opponent_move),
                Err(e) => Self::Invalid(e),
            },
        }
    }
}

/// First line of each harness turn: the move the other side just made.
pub(super) fn parse_opponent_move(line: &str) -> Result<Option<Move>, Error> {
    Move::from_notation(line)
}

/// Second line of each harness turn: how many lines with valid actions
/// follow. The engine does not need them, they are only skipped.
pub(super) fn parse_action_count(line: &str) -> anyhow::Result<usize> {
    let line = line.trim();
    line.parse()
        .map_err(|e| anyhow::anyhow!("expected the number of valid actions, got {line:?}: {e}"))
}
