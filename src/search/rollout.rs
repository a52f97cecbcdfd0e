//! Random playouts: the "simulation" step of MCTS.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::core::Outcome;
use crate::game::position::Position;

/// Plays uniformly random legal moves from `position` until the game ends.
///
/// The winner is read off the final board (whoever owns a complete line)
/// rather than assumed to be the last mover.
pub fn play_out<R: Rng + ?Sized>(mut position: Position, rng: &mut R) -> Outcome {
    while !position.is_terminal() {
        let moves = position.available_moves();
        let Some(&next_move) = moves.choose(rng) else {
            break;
        };
        position = position.play(next_move);
    }
    position.winner().map_or(Outcome::Draw, Outcome::Win)
}
