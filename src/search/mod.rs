//! Implements [Monte Carlo Tree Search] (MCTS) with the UCT selection policy.
//!
//! 1. Selection: starting from the root, descend into the child with the
//!    highest UCT score while the current node is fully expanded.
//! 2. Expansion: add one random untried move of that node as a new child.
//! 3. Simulation: play random moves from the new child until the game ends.
//! 4. Backpropagation: update visit and win counters on the path back to the
//!    root.
//!
//! [`Mcts`] repeats these steps until the time budget runs out, commits to
//! the child with the best win rate and keeps its subtree for the next move.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::error::Error;
use crate::game::core::{Move, Outcome, Player};
use crate::game::position::Position;

pub mod policy;
pub mod rollout;
pub mod tree;

use tree::{NodeIndex, Tree, ROOT};

/// Parameters of the search. They do not change during a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Weight of the exploration term in UCT.
    pub exploration: f64,
    /// Wall-clock time spent on each move.
    pub budget: Duration,
    /// Extra time for the first search of a game, when there are no
    /// statistics to reuse yet.
    pub first_move_bonus: Duration,
    /// Seed for the random number generator. [`None`] seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exploration: 0.8,
            budget: Duration::from_millis(90),
            first_move_bonus: Duration::from_millis(900),
            seed: None,
        }
    }
}

/// Search controller: owns the tree and moves its root along with the game.
#[derive(Debug)]
pub struct Mcts<R: Rng = ChaCha8Rng> {
    tree: Tree,
    config: Config,
    rng: R,
    first_search: bool,
    /// Root visits at the time of the last root swap.
    iterations: u32,
}

impl Mcts<ChaCha8Rng> {
    /// Creates the controller for a new game, seeding the generator from
    /// [`Config::seed`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rng = config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Mcts<R> {
    /// Creates the controller for a new game with a given random number
    /// generator. [`Config::seed`] is ignored.
    #[must_use]
    pub fn with_rng(config: Config, rng: R) -> Self {
        Self::from_position(Position::empty(), config, rng)
    }

    /// Starts searching from an arbitrary position.
    #[must_use]
    pub fn from_position(position: Position, config: Config, rng: R) -> Self {
        Self {
            tree: Tree::new(position),
            config,
            rng,
            first_search: true,
            iterations: 0,
        }
    }

    /// Forgets the current game and starts from the empty board.
    pub fn new_game(&mut self) {
        self.tree = Tree::new(Position::empty());
        self.first_search = true;
        self.iterations = 0;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Current position of the game, i.e. the root of the tree.
    #[must_use]
    pub fn position(&self) -> &Position {
        self.tree.root().position()
    }

    /// Number of iterations that went into the last committed root: its visit
    /// count when it was replaced.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.position().is_terminal()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.position().outcome()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.position().winner()
    }

    fn time_budget(&self) -> Duration {
        if self.first_search {
            self.config.budget + self.config.first_move_bonus
        } else {
            self.config.budget
        }
    }

    /// Searches until the time budget is spent (at least one iteration),
    /// commits to the best move and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] if the current position is terminal.
    pub fn run(&mut self) -> Result<Move, Error> {
        if self.is_game_over() {
            return Err(Error::GameOver);
        }
        let budget = self.time_budget();
        let timer = Instant::now();
        let mut iterations = 0u32;
        loop {
            let _ = self.tree.select(self.config.exploration, &mut self.rng);
            iterations += 1;
            if timer.elapsed() >= budget {
                break;
            }
        }
        self.first_search = false;
        debug!(
            iterations,
            root_visits = self.tree.root().visits(),
            nodes = self.tree.len(),
            elapsed = ?timer.elapsed(),
            "search finished"
        );
        self.choose_best()
    }

    /// Runs exactly `iterations` select cycles (at least one) regardless of
    /// the clock, then commits to the best move.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] if the current position is terminal.
    pub fn run_iterations(&mut self, iterations: u32) -> Result<Move, Error> {
        if self.is_game_over() {
            return Err(Error::GameOver);
        }
        for _ in 0..iterations.max(1) {
            let _ = self.tree.select(self.config.exploration, &mut self.rng);
        }
        self.first_search = false;
        self.choose_best()
    }

    /// Commits to the root's child with the best win rate. A root that has
    /// not been expanded yet gets one select cycle first.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] if the current position is terminal.
    pub fn choose_best(&mut self) -> Result<Move, Error> {
        if self.is_game_over() {
            return Err(Error::GameOver);
        }
        if self.tree.root().children().is_empty() {
            let _ = self.tree.select(self.config.exploration, &mut self.rng);
        }
        let (best, best_move) = self
            .tree
            .best_child(ROOT)
            .and_then(|child| self.tree.get(child).last_move().map(|m| (child, m)))
            .ok_or(Error::GameOver)?;
        debug!(
            best_move = %best_move,
            visits = self.tree.get(best).visits(),
            wins = self.tree.get(best).wins(),
            win_rate = self.tree.calc_win_rate(best),
            "committing to the best child"
        );
        self.swap_root(best);
        Ok(best_move)
    }

    /// Makes the given node the new root, dropping everything outside of its
    /// subtree.
    pub fn swap_root(&mut self, index: NodeIndex) {
        self.iterations = self.tree.root().visits();
        self.tree.reroot(index);
        trace!(nodes = self.tree.len(), "root swapped");
    }

    /// Advances the game by a move made by the other side. The matching child
    /// keeps its statistics; a move that was never expanded starts a fresh
    /// tree.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the cell is taken and [`Error::GameOver`] if
    /// the game has already ended.
    pub fn set_root_to_move(&mut self, next_move: Move) -> Result<(), Error> {
        if self.is_game_over() {
            return Err(Error::GameOver);
        }
        if let Some(child) = self.tree.find_child(ROOT, next_move) {
            debug!(%next_move, visits = self.tree.get(child).visits(), "reusing subtree");
            self.swap_root(child);
            return Ok(());
        }
        let position = self.position().apply_move(next_move)?;
        debug!(%next_move, "move was not explored, starting a fresh tree");
        self.iterations = self.tree.root().visits();
        self.tree.replace_root(position, Some(next_move));
        Ok(())
    }

    /// Applies the other side's move given in "column row" notation ("-1 -1"
    /// if we move first), searches and answers with our move in the same
    /// notation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNotation`] and [`Error::IllegalMove`] for bad input,
    /// [`Error::GameOver`] if there is nothing left to search after the move.
    pub fn apply_opponent_move_and_respond(&mut self, notation: &str) -> Result<String, Error> {
        let reply = self.respond(Move::from_notation(notation)?)?;
        Ok(reply.to_string())
    }

    /// Typed version of [`Mcts::apply_opponent_move_and_respond`]: applies the
    /// other side's move (if any) and searches for the reply.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the cell is taken, [`Error::GameOver`] if the
    /// game is over before or after the opponent's move. In the latter case
    /// the move has been applied. [`Error::MissingMove`] if no move is given
    /// after the game has started.
    pub fn respond(&mut self, opponent_move: Option<Move>) -> Result<Move, Error> {
        match opponent_move {
            Some(opponent_move) => self.set_root_to_move(opponent_move)?,
            None if self.is_game_over() => return Err(Error::GameOver),
            None if self.position().ply() > 0 => {
                return Err(Error::MissingMove {
                    ply: self.position().ply(),
                })
            },
            None => {},
        }
        self.run()
    }
}
