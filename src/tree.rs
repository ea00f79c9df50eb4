//! Arena-backed search tree.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]; the tree owns every node and
//! children never own their parent. Per-search state (the visited-board set and node counters)
//! lives in [`SearchSession`], owned by the solver and reset for each independent search.

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use hashbrown::{HashMap, HashSet};

use crate::board::{Board, Move};
use crate::piece::{Color, Piece};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    pub board: Board,
    pub parent: Option<NodeId>,
    pub children: HashMap<Move, NodeId>,
    /// Move that produced this node from its parent; `None` at the root.
    pub mv: Option<Move>,
    /// Plies from the root.
    pub depth: u32,
    /// Piece destroyed by the laser fired after `mv`.
    pub destroyed: Option<Piece>,
    pub value: Option<f64>,
    pub best_child: Option<NodeId>,
}

impl SearchNode {
    fn new(board: Board, parent: Option<NodeId>, mv: Option<Move>, depth: u32) -> Self {
        Self {
            board,
            parent,
            children: HashMap::new(),
            mv,
            depth,
            destroyed: None,
            value: None,
            best_child: None,
        }
    }

    /// Colour whose Pharaoh fell on the ply that produced this node.
    pub fn captured_pharaoh(&self) -> Option<Color> {
        self.destroyed
            .filter(|piece| piece.is_pharaoh())
            .map(|piece| piece.color())
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new(root: Board) -> Self {
        Self {
            nodes: vec![SearchNode::new(root, None, None, 0)],
        }
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included; never zero.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id.0)
    }

    /// Register a child reached from `parent` by `mv`. An existing child under the same move is
    /// replaced in the parent's map.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        mv: Move,
        board: Board,
        destroyed: Option<Piece>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self[parent].depth + 1;
        let mut node = SearchNode::new(board, Some(parent), Some(mv), depth);
        node.destroyed = destroyed;
        self.nodes.push(node);
        self[parent].children.insert(mv, id);
        id
    }

    pub fn get_child(&self, parent: NodeId, mv: &Move) -> Option<NodeId> {
        self[parent].children.get(mv).copied()
    }

    /// Moves from the root down to `id`, recovered through parent links.
    pub fn path_to(&self, id: NodeId) -> Vec<Move> {
        let mut moves = VecDeque::new();
        let mut cursor = id;
        while let Some(node) = self.get(cursor) {
            let (Some(parent), Some(mv)) = (node.parent, node.mv) else {
                break;
            };
            moves.push_front(mv);
            cursor = parent;
        }
        moves.into()
    }

    /// Follow best-child links from `from` until a node without one.
    pub fn principal_variation(&self, from: NodeId) -> Vec<Move> {
        let mut line = Vec::new();
        let mut cursor = self.get(from).and_then(|node| node.best_child);
        while let Some(id) = cursor {
            let node = &self[id];
            if let Some(mv) = node.mv {
                line.push(mv);
            }
            cursor = node.best_child;
        }
        line
    }

    /// Copy out the subtree below `new_root` as a fresh tree (depths rebased to zero).
    /// Evaluations are cleared because they were computed against the old horizon; boards and
    /// child links are kept so expanded positions are not regenerated. With no stored values, a
    /// solver that re-roots before every reply never reports a re-evaluated opponent move.
    pub fn subtree(&self, new_root: NodeId) -> SearchTree {
        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();
        let mut order = vec![new_root];
        let mut cursor = 0;
        while cursor < order.len() {
            let id = order[cursor];
            remap.insert(id, NodeId(cursor));
            let mut children: Vec<NodeId> = self[id].children.values().copied().collect();
            children.sort_unstable();
            order.extend(children);
            cursor += 1;
        }

        let base_depth = self[new_root].depth;
        let nodes = order
            .iter()
            .map(|id| {
                let old = &self[*id];
                let is_root = *id == new_root;
                let mut node = SearchNode::new(
                    old.board.clone(),
                    if is_root { None } else { old.parent.and_then(|p| remap.get(&p).copied()) },
                    if is_root { None } else { old.mv },
                    old.depth - base_depth,
                );
                node.destroyed = if is_root { None } else { old.destroyed };
                node.children = old
                    .children
                    .iter()
                    .filter_map(|(mv, child)| Some((*mv, *remap.get(child)?)))
                    .collect();
                node
            })
            .collect();
        SearchTree { nodes }
    }
}

impl Index<NodeId> for SearchTree {
    type Output = SearchNode;

    fn index(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for SearchTree {
    fn index_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }
}

/// Bookkeeping for one top-level search invocation.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    visited: HashSet<Board>,
    nodes_created: u64,
    nodes_evaluated: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.visited.clear();
        self.nodes_created = 0;
        self.nodes_evaluated = 0;
    }

    pub fn is_visited(&self, board: &Board) -> bool {
        self.visited.contains(board)
    }

    /// Returns `true` when `board` had not been seen before.
    pub fn mark_visited(&mut self, board: &Board) -> bool {
        if self.visited.contains(board) {
            return false;
        }
        self.visited.insert(board.clone())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn nodes_created(&self) -> u64 {
        self.nodes_created
    }

    pub fn nodes_evaluated(&self) -> u64 {
        self.nodes_evaluated
    }

    pub(crate) fn record_node_created(&mut self) {
        self.nodes_created += 1;
    }

    pub(crate) fn record_evaluation(&mut self) {
        self.nodes_evaluated += 1;
    }
}
