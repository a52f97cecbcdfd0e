//! Fixed-size search workload for measuring the engine's speed. The output is a
//! single `<nodes> nodes <nps> nps` line so that runs can be compared across
//! builds.

use std::io::Write;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::game::core::Player;
use crate::game::position::Position;
use crate::search::{Config, Mcts};

/// Select cycles spent on each position.
const ITERATIONS: u32 = 50_000;

fn positions() -> anyhow::Result<Vec<Position>> {
    Ok(vec![
        Position::empty(),
        // X in the center, O in a corner.
        Position::from_bits(0b000_010_000, 0b000_000_001, Player::X)?,
        // X: corners 0 and 8, O: center and 2. X to move.
        Position::from_bits(0b100_000_001, 0b000_010_100, Player::X)?,
        // O to move: cell 8 both wins the diagonal and blocks the bottom row.
        Position::from_bits(0b011_000_100, 0b000_010_001, Player::O)?,
    ])
}

/// Runs the search on a small set of positions and reports the total number of
/// iterations and the throughput.
///
/// # Errors
///
/// If writing to `out` fails.
pub fn bench(out: &mut impl Write) -> anyhow::Result<()> {
    let mut total_nodes = 0u64;
    let timer = Instant::now();

    for position in positions()? {
        let mut mcts = Mcts::from_position(
            position,
            Config::default(),
            ChaCha8Rng::seed_from_u64(0),
        );
        let _ = mcts.run_iterations(ITERATIONS)?;
        total_nodes += u64::from(mcts.iterations());
    }

    let elapsed = timer.elapsed();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let nps = (total_nodes as f64 / elapsed.as_secs_f64()) as u64;
    writeln!(out, "{total_nodes} nodes {nps} nps")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_positions_are_in_progress() {
        for position in positions().unwrap() {
            assert!(!position.is_terminal(), "{position:?}");
        }
    }
}
