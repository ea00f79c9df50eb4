use std::collections::VecDeque;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move};
use crate::error::{KhetError, KhetResult};
use crate::piece::Color;
use crate::tree::{NodeId, SearchSession, SearchTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Horizon of the adversarial search, in plies from the tree root.
    #[serde(default = "default_search_depth")]
    pub search_depth: u32,
    /// Magnitude of a Pharaoh capture before depth decay.
    #[serde(default = "default_win_reward")]
    pub win_reward: f64,
    /// Per-ply factor applied to terminal values so that quicker wins score higher.
    #[serde(default = "default_depth_decay")]
    pub depth_decay: f64,
    /// Node budget of the single-agent forced-mate search.
    #[serde(default = "default_max_single_agent_nodes")]
    pub max_single_agent_nodes: u64,
    /// Compact the tree around the cursor before every interactive reply so each reply gets a
    /// full horizon. Stored values are dropped, so received moves are never compared with an
    /// earlier evaluation in this mode.
    #[serde(default)]
    pub reroot_between_moves: bool,
}

fn default_search_depth() -> u32 {
    4
}
fn default_win_reward() -> f64 {
    1_000_000.0
}
fn default_depth_decay() -> f64 {
    0.9
}
fn default_max_single_agent_nodes() -> u64 {
    2_000_000
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            search_depth: default_search_depth(),
            win_reward: default_win_reward(),
            depth_decay: default_depth_decay(),
            max_single_agent_nodes: default_max_single_agent_nodes(),
            reroot_between_moves: false,
        }
    }
}

/// Search engine for one player.
///
/// The solver owns a search tree rooted at the starting board and a cursor into it. The side to
/// move alternates with depth, starting from `root_mover`; the configured `player` maximizes.
pub struct Solver {
    config: SolverConfig,
    player: Color,
    root_mover: Color,
    tree: SearchTree,
    current: NodeId,
    session: SearchSession,
}

impl Solver {
    /// Solver for `player`, who also moves first.
    pub fn new(board: Board, player: Color, config: SolverConfig) -> Self {
        Self::with_side_to_move(board, player, player, config)
    }

    /// Solver for `player` on a board where `to_move` has the next ply.
    pub fn with_side_to_move(
        board: Board,
        player: Color,
        to_move: Color,
        config: SolverConfig,
    ) -> Self {
        let tree = SearchTree::new(board);
        let current = tree.root();
        Self {
            config,
            player,
            root_mover: to_move,
            tree,
            current,
            session: SearchSession::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn player(&self) -> Color {
        self.player
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn current_node(&self) -> NodeId {
        self.current
    }

    pub fn current_board(&self) -> &Board {
        &self.tree[self.current].board
    }

    pub fn root_value(&self) -> Option<f64> {
        self.tree[self.tree.root()].value
    }

    pub fn side_to_move(&self, node: NodeId) -> Color {
        if self.tree[node].depth % 2 == 0 {
            self.root_mover
        } else {
            self.root_mover.opponent()
        }
    }

    /// Drop the tree and search counters, keeping the root board.
    fn reset_tree(&mut self) {
        let root = self.tree.root();
        let board = self.tree[root].board.clone();
        self.tree = SearchTree::new(board);
        self.current = self.tree.root();
        self.session.reset();
    }

    /// Shortest sequence of the player's own moves that shoots the opponent's Pharaoh, assuming
    /// the opponent never moves. Runs on a scratch tree; the interactive tree is untouched.
    /// An empty sequence means the opponent has no Pharaoh to begin with.
    pub fn solve_single_agent(&mut self) -> KhetResult<Vec<Move>> {
        self.session.reset();
        let attacker = self.player;
        let defender = attacker.opponent();
        let start = self.tree[self.tree.root()].board.clone();
        if start.pharaoh(defender).is_none() {
            return Ok(Vec::new());
        }

        let mut tree = SearchTree::new(start);
        let root = tree.root();
        self.session.mark_visited(&tree[root].board);
        let mut queue = VecDeque::from([root]);

        while let Some(id) = queue.pop_front() {
            let moves = tree[id].board.get_all_possible_moves(attacker);
            for mv in moves {
                let mut board = tree[id].board.make_move(&mv)?;
                let destroyed = board.fire_laser(attacker);
                match destroyed {
                    Some(piece) if piece.is_pharaoh() && piece.color() == defender => {
                        self.session.record_node_created();
                        let winner = tree.add_child(id, mv, board, destroyed);
                        let line = tree.path_to(winner);
                        debug!(
                            "forced mate in {} for {attacker} after {} nodes",
                            line.len(),
                            self.session.nodes_created()
                        );
                        return Ok(line);
                    }
                    Some(piece) if piece.is_pharaoh() => continue,
                    _ => {}
                }
                if !self.session.mark_visited(&board) {
                    continue;
                }
                if self.session.nodes_created() >= self.config.max_single_agent_nodes {
                    debug!(
                        "forced-mate search for {attacker} hit its budget of {} nodes",
                        self.config.max_single_agent_nodes
                    );
                    return Err(KhetError::NoSolution);
                }
                self.session.record_node_created();
                let child = tree.add_child(id, mv, board, destroyed);
                queue.push_back(child);
            }
        }
        debug!(
            "forced-mate search for {attacker} exhausted {} positions",
            self.session.visited_count()
        );
        Err(KhetError::NoSolution)
    }

    /// Alpha-beta search from the root to `search_depth`; returns the principal variation.
    pub fn solve_multi_agent(&mut self) -> KhetResult<Vec<Move>> {
        self.reset_tree();
        let root = self.tree.root();
        let value = self.alpha_beta(
            root,
            self.config.search_depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )?;
        debug!(
            "alpha-beta depth {}: value {value}, {} nodes created, {} evaluated",
            self.config.search_depth,
            self.session.nodes_created(),
            self.session.nodes_evaluated()
        );
        self.finish_line(root)
    }

    /// Same contract as [`Solver::solve_multi_agent`] without pruning or early exits.
    pub fn solve_minimax(&mut self) -> KhetResult<Vec<Move>> {
        self.reset_tree();
        let root = self.tree.root();
        let value = self.minimax(root, self.config.search_depth)?;
        debug!(
            "minimax depth {}: value {value}, {} nodes evaluated",
            self.config.search_depth,
            self.session.nodes_evaluated()
        );
        self.finish_line(root)
    }

    fn finish_line(&self, root: NodeId) -> KhetResult<Vec<Move>> {
        let line = self.tree.principal_variation(root);
        if line.is_empty() {
            return Err(KhetError::NoSolution);
        }
        Ok(line)
    }

    pub fn principal_variation(&self, from: NodeId) -> Vec<Move> {
        self.tree.principal_variation(from)
    }

    /// Leaf value from the player's point of view: a captured Pharaoh is worth `±win_reward`
    /// decayed by depth, everything else is 0.
    pub fn grade_board(&self, node: NodeId) -> f64 {
        let node = &self.tree[node];
        match node.captured_pharaoh() {
            Some(loser) => {
                let magnitude =
                    self.config.win_reward * self.config.depth_decay.powi(node.depth as i32);
                if loser == self.player {
                    -magnitude
                } else {
                    magnitude
                }
            }
            None => 0.0,
        }
    }

    fn is_cutoff(&self, node: NodeId, depth_left: u32) -> bool {
        depth_left == 0 || self.tree[node].captured_pharaoh().is_some()
    }

    fn settle_leaf(&mut self, node: NodeId) -> f64 {
        let value = self.grade_board(node);
        let entry = &mut self.tree[node];
        entry.value = Some(value);
        entry.best_child = None;
        value
    }

    /// Child of `node` reached by `mv`, reusing an existing one or applying the move and firing
    /// the mover's laser.
    fn child_for(&mut self, node: NodeId, mv: Move, mover: Color) -> KhetResult<NodeId> {
        if let Some(child) = self.tree.get_child(node, &mv) {
            return Ok(child);
        }
        let mut board = self.tree[node].board.make_move(&mv)?;
        let destroyed = board.fire_laser(mover);
        self.session.record_node_created();
        Ok(self.tree.add_child(node, mv, board, destroyed))
    }

    /// Fail-soft alpha-beta. Records `value` and `best_child` on every node it visits.
    pub fn alpha_beta(
        &mut self,
        node: NodeId,
        depth_left: u32,
        mut alpha: f64,
        mut beta: f64,
    ) -> KhetResult<f64> {
        self.session.record_evaluation();
        if self.is_cutoff(node, depth_left) {
            return Ok(self.settle_leaf(node));
        }
        let mover = self.side_to_move(node);
        let maximizing = mover == self.player;
        let moves = self.tree[node].board.get_all_possible_moves(mover);
        if moves.is_empty() {
            return Ok(self.settle_leaf(node));
        }

        let mut best_value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_child = None;
        for mv in moves {
            let child = self.child_for(node, mv, mover)?;
            let value = self.alpha_beta(child, depth_left - 1, alpha, beta)?;
            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_child = Some(child);
                }
                alpha = alpha.max(best_value);
                if self.tree[child].captured_pharaoh() == Some(mover.opponent()) {
                    break;
                }
            } else {
                if value < best_value {
                    best_value = value;
                    best_child = Some(child);
                }
                beta = beta.min(best_value);
            }
            if alpha >= beta {
                break;
            }
        }

        let entry = &mut self.tree[node];
        entry.value = Some(best_value);
        entry.best_child = best_child;
        Ok(best_value)
    }

    /// Exhaustive minimax with the same move order and tie-breaking as [`Solver::alpha_beta`].
    pub fn minimax(&mut self, node: NodeId, depth_left: u32) -> KhetResult<f64> {
        self.session.record_evaluation();
        if self.is_cutoff(node, depth_left) {
            return Ok(self.settle_leaf(node));
        }
        let mover = self.side_to_move(node);
        let maximizing = mover == self.player;
        let moves = self.tree[node].board.get_all_possible_moves(mover);
        if moves.is_empty() {
            return Ok(self.settle_leaf(node));
        }

        let mut best: Option<(f64, NodeId)> = None;
        for mv in moves {
            let child = self.child_for(node, mv, mover)?;
            let value = self.minimax(child, depth_left - 1)?;
            let better = match best {
                None => true,
                Some((current, _)) if maximizing => value > current,
                Some((current, _)) => value < current,
            };
            if better {
                best = Some((value, child));
            }
        }

        let entry = &mut self.tree[node];
        entry.value = best.map(|(value, _)| value);
        entry.best_child = best.map(|(_, child)| child);
        Ok(best.map_or(0.0, |(value, _)| value))
    }

    fn search_from(&mut self, node: NodeId) -> KhetResult<f64> {
        let budget = self
            .config
            .search_depth
            .saturating_sub(self.tree[node].depth);
        self.alpha_beta(node, budget, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// One step of interactive play.
    ///
    /// With no `received` move the cursor advances along the engine's best line, searching the
    /// cursor first if it has not been expanded. With a move, the move is applied at the cursor
    /// (reusing the explored child when there is one), searched for the remaining horizon, and
    /// the engine's best reply is returned. The cursor ends on the node after the returned move.
    pub fn get_next_best_move(&mut self, received: Option<Move>) -> KhetResult<Move> {
        if self.config.reroot_between_moves {
            self.reroot();
        }
        let node = match received {
            None => {
                if self.tree[self.current].best_child.is_none() {
                    self.search_from(self.current)?;
                }
                self.current
            }
            Some(mv) => self.receive_move(mv)?,
        };
        let best = self.tree[node].best_child.ok_or(KhetError::OutOfMoves)?;
        let mv = self.tree[best].mv.ok_or(KhetError::OutOfMoves)?;
        self.current = best;
        Ok(mv)
    }

    /// Apply the opponent's move at the cursor and search the resulting node. The cursor is moved
    /// onto that node.
    fn receive_move(&mut self, mv: Move) -> KhetResult<NodeId> {
        let current = self.current;
        let mover = self.side_to_move(current);
        if mover == self.player || mv.piece.is_some_and(|piece| piece.color() != mover) {
            return Err(KhetError::OutOfTurn { expected: mover });
        }
        self.tree[current].board.validate_move(&mv)?;

        let predicted = self.tree[current].best_child;
        let prior_value = self
            .tree
            .get_child(current, &mv)
            .and_then(|explored| self.tree[explored].value);
        let child = self.child_for(current, mv, mover)?;
        let value = self.search_from(child)?;

        if predicted.is_some_and(|expected| expected != child) {
            debug!("{mover} played {mv}, off the expected line");
        }
        if let Some(prior) = prior_value {
            if prior != value {
                info!("{mover} played {mv}: valued {prior} earlier, {value} now");
                // same tree, same horizon: the refresh reproduces the first result
                let refreshed = self.search_from(child)?;
                debug!("refreshed {mv} to {refreshed}");
            }
        }
        self.current = child;
        Ok(child)
    }

    /// Make the cursor the tree root, discarding every node outside its subtree.
    pub fn reroot(&mut self) {
        if self.current == self.tree.root() {
            return;
        }
        self.root_mover = self.side_to_move(self.current);
        self.tree = self.tree.subtree(self.current);
        self.current = self.tree.root();
        debug!("re-rooted search tree, {} nodes kept", self.tree.node_count());
    }
}
