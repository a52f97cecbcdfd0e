//! Search tree stored as an arena: nodes live in one [`Vec`] and refer to each
//! other by index. Children are owned through the arena, the parent link is a
//! plain index used to walk back up during backpropagation, so there are no
//! reference cycles and dropping the arena frees the whole tree.

use std::mem;

use rand::Rng;

use crate::game::core::{Move, MoveList, Outcome};
use crate::game::position::Position;
use crate::search::{policy, rollout};

/// Index of a node in the arena.
pub type NodeIndex = usize;

/// The root always lives at the start of the arena.
pub const ROOT: NodeIndex = 0;

/// A position in the search tree together with the statistics gathered for it.
#[derive(Debug, Clone)]
pub struct Node {
    position: Position,
    parent: Option<NodeIndex>,
    /// Move that led from the parent to this node. [`None`] for a root that
    /// starts the game.
    last_move: Option<Move>,
    /// Moves not expanded into children yet. A move is either here or in one
    /// of the children, never both.
    untried: MoveList,
    children: Vec<NodeIndex>,
    visits: u32,
    /// Playouts through this node won by the player who moved into it.
    wins: u32,
    /// UCT score from the most recent selection pass over the parent.
    uct: f64,
}

impl Node {
    fn new(position: Position, parent: Option<NodeIndex>, last_move: Option<Move>) -> Self {
        let untried = if position.is_terminal() {
            MoveList::new()
        } else {
            position.available_moves()
        };
        Self {
            position,
            parent,
            last_move,
            untried,
            children: Vec::new(),
            visits: 0,
            wins: 0,
            uct: 0.0,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn untried_moves(&self) -> &[Move] {
        &self.untried
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn visits(&self) -> u32 {
        self.visits
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    /// Last computed UCT score, 0 until the parent has been selected through.
    #[must_use]
    pub const fn uct(&self) -> f64 {
        self.uct
    }

    /// Node is fully expanded and has nothing below it: the game is over here.
    #[must_use]
    pub fn is_terminal_leaf(&self) -> bool {
        self.untried.is_empty() && self.children.is_empty()
    }

    /// Result to backpropagate when selection ends in this leaf.
    fn leaf_outcome(&self) -> Outcome {
        self.position.winner().map_or(Outcome::Draw, Outcome::Win)
    }
}

/// Arena of [`Node`]s rooted at [`ROOT`].
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates a tree with a single unexpanded root.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self::with_root(position, None)
    }

    /// Creates a tree whose root was reached by `last_move`.
    #[must_use]
    pub fn with_root(position: Position, last_move: Option<Move>) -> Self {
        Self {
            nodes: vec![Node::new(position, None, last_move)],
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn root(&self) -> &Node {
        self.get(ROOT)
    }

    /// # Panics
    ///
    /// If the index does not belong to this tree.
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// One MCTS iteration starting at the root. Descends through fully expanded
    /// nodes by UCT until it reaches a node with untried moves (or a terminal
    /// leaf), expands it and backpropagates the playout result.
    ///
    /// Returns the node the result was propagated from.
    pub fn select<R: Rng + ?Sized>(&mut self, exploration: f64, rng: &mut R) -> NodeIndex {
        let mut current = ROOT;
        loop {
            let node = &self.nodes[current];
            if !node.untried.is_empty() || node.children.is_empty() {
                return self.expand(current, rng);
            }
            let parent_visits = node.visits;
            for k in 0..self.nodes[current].children.len() {
                let child = self.nodes[current].children[k];
                let child_node = &mut self.nodes[child];
                child_node.uct = policy::uct(
                    child_node.wins,
                    child_node.visits,
                    parent_visits,
                    exploration,
                );
            }
            match policy::first_max_by(self.nodes[current].children.iter().copied(), |&child| {
                self.nodes[child].uct
            }) {
                Some(next) => current = next,
                None => return self.expand(current, rng),
            }
        }
    }

    /// Expands one random untried move of `index` into a new child and
    /// simulates from it. A terminal leaf is not expanded, its own result is
    /// backpropagated instead.
    ///
    /// Returns the node the result was propagated from.
    pub fn expand<R: Rng + ?Sized>(&mut self, index: NodeIndex, rng: &mut R) -> NodeIndex {
        let node = &mut self.nodes[index];
        if node.untried.is_empty() {
            let outcome = node.leaf_outcome();
            self.backprop(index, outcome);
            return index;
        }
        let next_move = node.untried.remove(rng.gen_range(0..node.untried.len()));
        let child = self.add_child(index, next_move);
        self.simulate(child, rng);
        child
    }

    /// Creates the child of `parent` reached by `next_move` without simulating
    /// from it. The move must be free in the parent's position and not
    /// expanded yet.
    pub(crate) fn add_child(&mut self, parent: NodeIndex, next_move: Move) -> NodeIndex {
        let untried = &mut self.nodes[parent].untried;
        if let Some(k) = untried.iter().position(|&m| m == next_move) {
            let _ = untried.remove(k);
        }
        let position = self.nodes[parent].position.play(next_move);
        let child = self.nodes.len();
        self.nodes.push(Node::new(position, Some(parent), Some(next_move)));
        self.nodes[parent].children.push(child);
        child
    }

    /// Plays a random game from the node and backpropagates its result.
    pub fn simulate<R: Rng + ?Sized>(&mut self, index: NodeIndex, rng: &mut R) {
        let outcome = rollout::play_out(self.nodes[index].position, rng);
        self.backprop(index, outcome);
    }

    /// Walks from `index` up to the root, counting a visit in every node and a
    /// win in every node whose mover won the game.
    pub fn backprop(&mut self, index: NodeIndex, outcome: Outcome) {
        let mut current = Some(index);
        while let Some(index) = current {
            let node = &mut self.nodes[index];
            node.visits += 1;
            if outcome == Outcome::Win(node.position.they()) {
                node.wins += 1;
            }
            current = node.parent;
        }
    }

    /// UCT score of a node relative to its parent. The root has no parent and
    /// is scored as if its parent was never visited.
    #[must_use]
    pub fn calc_uct(&self, index: NodeIndex, exploration: f64) -> f64 {
        let node = &self.nodes[index];
        let parent_visits = node.parent.map_or(0, |parent| self.nodes[parent].visits);
        policy::uct(node.wins, node.visits, parent_visits, exploration)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn calc_win_rate(&self, index: NodeIndex) -> f64 {
        let node = &self.nodes[index];
        policy::win_rate(node.wins, node.visits)
    }

    /// Child with the highest win rate, the first one on ties. Exploration
    /// plays no part here.
    #[must_use]
    pub fn best_child(&self, index: NodeIndex) -> Option<NodeIndex> {
        policy::first_max_by(self.nodes[index].children.iter().copied(), |&child| {
            self.calc_win_rate(child)
        })
    }

    /// Child of `index` reached by `next_move`, if it has been expanded.
    #[must_use]
    pub fn find_child(&self, index: NodeIndex, next_move: Move) -> Option<NodeIndex> {
        self.nodes[index]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].last_move == Some(next_move))
    }

    /// Makes `index` the new root. Its subtree is kept with all statistics and
    /// moved to the front of a fresh arena; everything else (the old root and
    /// all siblings' subtrees) is dropped right away.
    pub fn reroot(&mut self, index: NodeIndex) {
        // Breadth-first order of the kept subtree; the new root comes first.
        let mut order = vec![index];
        let mut next = 0;
        while next < order.len() {
            order.extend_from_slice(&self.nodes[order[next]].children);
            next += 1;
        }
        let mut remap = vec![None; self.nodes.len()];
        for (new_index, &old_index) in order.iter().enumerate() {
            remap[old_index] = Some(new_index);
        }
        let mut old_nodes: Vec<Option<Node>> = mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();
        self.nodes = order
            .iter()
            .filter_map(|&old_index| old_nodes[old_index].take())
            .map(|mut node| {
                node.parent = node.parent.and_then(|parent| remap[parent]);
                node.children = node
                    .children
                    .iter()
                    .filter_map(|&child| remap[child])
                    .collect();
                node
            })
            .collect();
        debug_assert!(self.nodes[ROOT].parent.is_none());
    }

    /// Replaces the whole tree with a fresh root.
    pub fn replace_root(&mut self, position: Position, last_move: Option<Move>) {
        *self = Self::with_root(position, last_move);
    }
}
