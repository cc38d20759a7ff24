//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Each node links back to its parent by index; the arena owns every node,
//! and the whole tree is dropped when the search call returns.
//!
//! Wins are always counted for the side to move at the root. Selection reads
//! them from the point of view of the side choosing at each node, so the
//! opponent's replies are explored adversarially.

use crate::traits::GameState;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub struct SearchNode<S: GameState> {
    pub wins: u32,
    pub simulations: u32,
    pub state: S,
    /// Move that led here from the parent; `None` only for the root.
    pub game_move: Option<S::Move>,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Legal moves without a child yet; empty for a finished game.
    untried: Vec<S::Move>,
}

impl<S: GameState> SearchNode<S> {
    fn new(state: S, game_move: Option<S::Move>, parent: Option<NodeId>) -> Self {
        let untried = if state.is_terminal() {
            Vec::new()
        } else {
            state.legal_moves()
        };
        Self {
            wins: 0,
            simulations: 0,
            state,
            game_move,
            parent,
            children: Vec::new(),
            untried,
        }
    }

    /// Fraction of simulations won; 0 for a node never simulated.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.simulations)
        }
    }

    pub fn untried_moves(&self) -> &[S::Move] {
        &self.untried
    }

    /// Selection stops here: some move has no child yet, or there are no
    /// moves at all.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.untried.is_empty() || self.children.is_empty()
    }

    /// `win_rate + sqrt(c * ln(N) / n)`, with the win rate flipped when the
    /// parent is the opponent's choice. Unvisited nodes are always preferred.
    pub fn uct(&self, parent_simulations: u32, exploration: f64, engine_chooses: bool) -> f64 {
        if self.simulations == 0 {
            return f64::INFINITY;
        }
        let parent_simulations = f64::from(parent_simulations.max(1));
        let simulations = f64::from(self.simulations);
        let exploitation = if engine_chooses {
            self.win_rate()
        } else {
            1.0 - self.win_rate()
        };
        exploitation + (exploration * parent_simulations.ln() / simulations).sqrt()
    }
}

#[derive(Debug)]
pub struct SearchTree<S: GameState> {
    nodes: Vec<SearchNode<S>>,
    /// Side to move at the root; every win is counted for it.
    engine: S::Side,
}

impl<S: GameState> SearchTree<S> {
    pub fn new(root_state: S) -> Self {
        let engine = root_state.side_to_move();
        Self {
            nodes: vec![SearchNode::new(root_state, None, None)],
            engine,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<S> {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds the position reached by `game_move` from `parent` and returns the
    /// new child's id. The move no longer counts as untried.
    pub fn add_child(&mut self, parent: NodeId, game_move: S::Move) -> NodeId {
        let state = self.get(parent).state.play(&game_move);
        let id = NodeId(self.nodes.len() as u32);
        let parent_node = self.get_mut(parent);
        if let Some(index) = parent_node.untried.iter().position(|m| *m == game_move) {
            parent_node.untried.swap_remove(index);
        }
        parent_node.children.push(id);
        self.nodes.push(SearchNode::new(state, Some(game_move), Some(parent)));
        id
    }

    /// Child of `id` with the highest UCT value; `None` without children.
    /// Ties go to the earliest child.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let engine_chooses = node.state.side_to_move() == self.engine;
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let value = self.get(child_id).uct(node.simulations, exploration, engine_chooses);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((child_id, value)),
            }
        }
        best.map(|(child_id, _)| child_id)
    }

    /// Descends from the root by UCT through fully expanded nodes and returns
    /// the first [leaf](SearchNode::is_leaf) on the way.
    pub fn select_leaf(&self, exploration: f64) -> NodeId {
        let mut current = self.root();
        while !self.get(current).is_leaf() {
            match self.select_child(current, exploration) {
                Some(child) => current = child,
                None => break,
            }
        }
        current
    }

    /// Adds the results to `id` and every ancestor up to the root, inclusive.
    pub fn backpropagate(&mut self, id: NodeId, wins: u32, simulations: u32) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.wins += wins;
            node.simulations += simulations;
            current = node.parent;
        }
    }

    /// Root child with the highest win rate; ties go to the child with more
    /// simulations, then to the earliest.
    pub fn best_root_child(&self) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child_id in &self.get(self.root()).children {
            let child = self.get(child_id);
            let better = match best {
                None => true,
                Some(best_id) => {
                    let current = self.get(best_id);
                    child.win_rate() > current.win_rate()
                        || (child.win_rate() == current.win_rate()
                            && child.simulations > current.simulations)
                }
            };
            if better {
                best = Some(child_id);
            }
        }
        best
    }

    /// Deepest level below the root that holds a node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        for node in &self.nodes {
            let mut depth = 0;
            let mut current = node.parent;
            while let Some(parent) = current {
                depth += 1;
                current = self.get(parent).parent;
            }
            deepest = deepest.max(depth);
        }
        deepest
    }
}
