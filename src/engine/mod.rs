//! The engine puts all pieces together: it reads the other side's moves from
//! the input stream, feeds them to the search and writes the replies back.
//!
//! Two line-based protocols are supported:
//!
//! - [`Engine::interactive_loop`] for a human at the terminal, with prompts,
//!   diagnostics and a few helper commands.
//! - [`Engine::harness_loop`] for a match runner: one opponent move in, one
//!   move out and nothing else on stdout.

use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::{info, warn};

use crate::engine::protocol::Command;
use crate::error::Error;
use crate::search::Mcts;

mod bench;
mod protocol;

pub use bench::bench;

/// The Engine connects the search with the I/O.
pub struct Engine<R: BufRead, W: Write> {
    mcts: Mcts,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Engine<R, W> {
    /// Creates a new instance of the engine with the given search controller
    /// and I/O.
    #[must_use]
    pub const fn new(mcts: Mcts, input: R, output: W) -> Self {
        Self {
            mcts,
            input,
            output,
        }
    }

    /// Gives the search controller back, e.g. to inspect the final position.
    #[must_use]
    pub fn into_mcts(self) -> Mcts {
        self.mcts
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        match self
            .input
            .read_line(&mut line)
            .context("error reading from input")?
        {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }

    /// Plays one game against a human. Every move typed in is answered with
    /// the engine's move and the number of iterations the search ran; the loop
    /// ends when the game is over, on `quit` or at the end of input.
    ///
    /// Malformed and illegal moves are reported and the prompt is repeated.
    ///
    /// # Errors
    ///
    /// If reading the input or writing the output fails.
    pub fn interactive_loop(&mut self) -> anyhow::Result<()> {
        loop {
            write!(self.output, "Enter move: ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match Command::parse(&line) {
                Command::Play(opponent_move) => {
                    match self.mcts.respond(opponent_move) {
                        Ok(reply) => {
                            writeln!(self.output, "Computer plays: {reply}")?;
                            writeln!(self.output, "Iterations: {}", self.mcts.iterations())?;
                        },
                        // The opponent's move ended the game.
                        Err(Error::GameOver) => {},
                        Err(e) => {
                            writeln!(self.output, "Error: {e}")?;
                            continue;
                        },
                    }
                    if let Some(outcome) = self.mcts.outcome() {
                        writeln!(self.output, "{}", self.mcts.position())?;
                        writeln!(self.output, "{outcome}")?;
                        break;
                    }
                },
                Command::Show => writeln!(self.output, "{:?}", self.mcts.position())?,
                Command::NewGame => {
                    self.mcts.new_game();
                    writeln!(self.output, "New game")?;
                },
                Command::Quit => break,
                Command::Invalid(e) => writeln!(self.output, "Error: {e}")?,
            }
        }
        Ok(())
    }

    /// Talks to a match runner. Each turn consists of the opponent's move
    /// ("-1 -1" if we move first), a line with the number N of valid actions
    /// and N lines listing them, which are skipped. The engine answers each
    /// turn with exactly one line containing its move.
    ///
    /// # Errors
    ///
    /// Malformed or illegal moves from the runner are protocol violations and
    /// stop the loop, as do I/O failures.
    pub fn harness_loop(&mut self) -> anyhow::Result<()> {
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                continue;
            }
            let opponent_move = protocol::parse_opponent_move(&line)?;
            let reply = match self.mcts.respond(opponent_move) {
                Ok(reply) => reply,
                Err(Error::GameOver) => {
                    info!(outcome = ?self.mcts.outcome(), "game over");
                    break;
                },
                Err(e) => {
                    warn!(%e, line = line.trim(), "protocol violation");
                    return Err(e).context("rejected opponent move");
                },
            };
            writeln!(self.output, "{reply}")?;
            self.output.flush()?;
            info!(%reply, iterations = self.mcts.iterations(), "replied");

            let Some(count) = self.read_line()? else {
                break;
            };
            for _ in 0..protocol::parse_action_count(&count)? {
                if self.read_line()?.is_none() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::game::core::Move;
    use crate::search::Config;

    fn mcts() -> Mcts {
        Mcts::new(Config {
            budget: Duration::from_millis(2),
            first_move_bonus: Duration::from_millis(2),
            seed: Some(3),
            ..Config::default()
        })
    }

    fn run_interactive(input: &str) -> (String, Mcts) {
        let mut output = Vec::new();
        let mut engine = Engine::new(mcts(), input.as_bytes(), &mut output);
        engine.interactive_loop().unwrap();
        let mcts = engine.into_mcts();
        (String::from_utf8(output).unwrap(), mcts)
    }

    fn run_harness(input: &str) -> anyhow::Result<(Vec<String>, Mcts)> {
        let mut output = Vec::new();
        let mut engine = Engine::new(mcts(), input.as_bytes(), &mut output);
        engine.harness_loop()?;
        let mcts = engine.into_mcts();
        let lines = String::from_utf8(output)?
            .lines()
            .map(str::to_string)
            .collect();
        Ok((lines, mcts))
    }

    #[test]
    fn interactive_reply() {
        let (output, mcts) = run_interactive("-1 -1\nquit\n");
        assert!(output.starts_with("Enter move: Computer plays: "), "{output}");
        assert!(output.contains("Iterations: "));
        assert_eq!(mcts.position().ply(), 1);
    }

    #[test]
    fn interactive_errors_are_reported() {
        let (output, mcts) = run_interactive("9 9\n1 1\n1 1\n-1 -1\nd\n");
        assert!(output.contains("Error: invalid move notation '9 9'"), "{output}");
        assert!(output.contains("Error: missing move"), "{output}");
        assert!(output.contains("Error: illegal move 1 1"), "{output}");
        assert!(output.contains("to move, ply 2/9"), "{output}");
        assert_eq!(mcts.position().ply(), 2);
    }

    #[test]
    fn interactive_new_game() {
        let (output, mcts) = run_interactive("0 0\nnew\n");
        assert!(output.contains("New game"));
        assert_eq!(mcts.position().ply(), 0);
    }

    #[test]
    fn interactive_game_ends() {
        // Keep feeding free cells until the game is decided.
        let mut input = String::new();
        for row in 0..3 {
            for column in 0..3 {
                input.push_str(&format!("{column} {row}\n"));
            }
        }
        let (output, mcts) = run_interactive(&input);
        assert!(mcts.is_game_over());
        assert!(
            output.trim_end().ends_with("Game is drawn")
                || output.trim_end().ends_with("Game is won by X")
                || output.trim_end().ends_with("Game is won by O"),
            "{output}"
        );
    }

    #[test]
    fn harness_replies_one_line_per_turn() {
        let (lines, mcts) = run_harness("-1 -1\n9\n0 0\n1 0\n2 0\n0 1\n1 1\n2 1\n0 2\n1 2\n2 2\n").unwrap();
        assert_eq!(lines.len(), 1);
        let reply = Move::try_from(lines[0].as_str()).unwrap();
        assert!(mcts.position().occupancy(mcts.position().they()).contains(reply));
    }

    #[test]
    fn harness_opponent_first() {
        let (lines, mcts) = run_harness("1 1\n0\n").unwrap();
        assert_eq!(lines.len(), 1);
        assert_ne!(lines[0], "1 1");
        assert_eq!(mcts.position().ply(), 2);
    }

    #[test]
    fn harness_rejects_bad_input() {
        assert!(run_harness("1 1\n0\n1 1\n0\n").is_err());
        assert!(run_harness("hello\n").is_err());
        assert!(run_harness("1 1\nmany\n").is_err());

        // "-1 -1" after the game started must not make us move for the other side.
        let mut output = Vec::new();
        let mut engine = Engine::new(mcts(), "1 1\n0\n-1 -1\n0\n".as_bytes(), &mut output);
        assert!(engine.harness_loop().is_err());
        assert_eq!(engine.into_mcts().position().ply(), 2);
        assert_eq!(String::from_utf8(output).unwrap().lines().count(), 1);
    }
}
