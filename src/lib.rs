#![deny(clippy::unwrap_used)]
//! Khet (laser chess) rules engine and solver, usable natively or through WebAssembly.
//!
//! The crate is organised in three layers:
//!
//! * Rules: [`Piece`], [`Board`] and [`Move`] model the grid, the five piece kinds with their
//!   per-side surfaces, move legality (including the Scarab swap) and the laser. A [`Board`] is
//!   a plain value; [`Board::make_move`] returns a new board and equal positions hash equally,
//!   which is what transposition detection relies on.
//! * Search: [`Solver`] owns an arena [`SearchTree`] and a [`SearchSession`]. It offers a
//!   breadth-first forced-mate finder where only the attacker moves
//!   ([`Solver::solve_single_agent`]), alpha-beta over alternating turns
//!   ([`Solver::solve_multi_agent`]) with an unpruned minimax reference
//!   ([`Solver::solve_minimax`]), and interactive play that keeps the explored tree between
//!   turns ([`Solver::get_next_best_move`]).
//! * Boundary: [`BoardDescription`] and the cell-string grid importer translate front-end data,
//!   [`KhetGame`] keeps a plain game record, and [`KhetEngine`] wraps a solver for JavaScript.
//!
//! Errors are reported as [`KhetError`] values; across the wasm boundary they become
//! `"<code>: <message>"` strings so callers can branch on the code.

mod board;
mod description;
mod error;
mod game;
mod logger;
mod piece;
mod solver;
mod tree;

pub use board::{
    ActionList, Board, LaserOutcome, LaserTrace, Move, DEFAULT_HEIGHT, DEFAULT_WIDTH,
    MAX_DIMENSION,
};
pub use description::{parse_cell, BoardDescription, PieceDescription};
pub use error::{KhetError, KhetResult};
pub use game::{KhetGame, TurnOutcome};
pub use logger::{init as init_logger, parse_level};
pub use piece::{Action, Color, Direction, Piece, PieceKind, Position, Surface};
pub use solver::{Solver, SolverConfig};
pub use tree::{NodeId, SearchNode, SearchSession, SearchTree};

use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Install a panic hook sending Rust panics to the browser console. The hook is only compiled in
/// when the `console_error_panic_hook` feature is enabled (default).
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route engine logs to the console at `level` (`"error"` .. `"trace"`, or `"off"`).
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) -> bool {
    logger::init(parse_level(level))
}

fn to_js_error(err: KhetError) -> JsValue {
    JsValue::from_str(&format!("{}: {}", err.code(), err))
}

fn parse_color(name: &str) -> Result<Color, JsValue> {
    Color::parse(name).ok_or_else(|| {
        to_js_error(KhetError::InvalidNotation(format!("unknown colour {name:?}")))
    })
}

fn notation(moves: &[Move]) -> Vec<String> {
    moves.iter().map(ToString::to_string).collect()
}

/// Laser shot as seen from JS.
#[derive(Debug, Clone, Serialize)]
struct LaserReport {
    /// `[x, y]` of every cell the beam entered.
    path: Vec<[u8; 2]>,
    /// One of `no_sphinx`, `dissipated`, `blocked`, `hit`, `looped`.
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hit: Option<PieceDescription>,
}

impl From<LaserTrace> for LaserReport {
    fn from(trace: LaserTrace) -> Self {
        let (outcome, direction, hit) = match trace.outcome {
            LaserOutcome::NoSphinx => ("no_sphinx", None, None),
            LaserOutcome::Dissipated { direction } => ("dissipated", Some(direction), None),
            LaserOutcome::Blocked { .. } => ("blocked", None, None),
            LaserOutcome::Hit(piece) => ("hit", None, Some(PieceDescription::from_piece(&piece))),
            LaserOutcome::Looped => ("looped", None, None),
        };
        Self {
            path: trace.path.iter().map(|p| [p.x, p.y]).collect(),
            outcome,
            direction,
            hit,
        }
    }
}

/// Read a board given either as `{ width, height, pieces }` or as rows of cell strings, top
/// row first.
fn board_from_js(value: JsValue) -> Result<Board, JsValue> {
    let description = if js_sys::Array::is_array(&value) {
        let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(value)?;
        BoardDescription::from_cell_rows(&rows).map_err(to_js_error)?
    } else {
        serde_wasm_bindgen::from_value(value)?
    };
    description.to_board().map_err(to_js_error)
}

/// Solver handle exported to JavaScript. Moves cross the boundary in `"x,y,ACTION"` notation.
#[wasm_bindgen]
pub struct KhetEngine {
    solver: Solver,
}

#[wasm_bindgen]
impl KhetEngine {
    /// `config` may be `undefined` for defaults; `to_move` defaults to `player`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        board: JsValue,
        player: &str,
        config: JsValue,
        to_move: Option<String>,
    ) -> Result<KhetEngine, JsValue> {
        let board = board_from_js(board)?;
        let player = parse_color(player)?;
        let to_move = match to_move {
            Some(name) => parse_color(&name)?,
            None => player,
        };
        let cfg: SolverConfig = if config.is_undefined() || config.is_null() {
            SolverConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            solver: Solver::with_side_to_move(board, player, to_move, cfg),
        })
    }

    #[wasm_bindgen(js_name = defaultConfig)]
    pub fn default_config() -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&SolverConfig::default())?)
    }

    #[wasm_bindgen(js_name = solveSingleAgent)]
    pub fn solve_single_agent(&mut self) -> Result<JsValue, JsValue> {
        let line = self.solver.solve_single_agent().map_err(to_js_error)?;
        Ok(serde_wasm_bindgen::to_value(&notation(&line))?)
    }

    #[wasm_bindgen(js_name = solveMultiAgent)]
    pub fn solve_multi_agent(&mut self) -> Result<JsValue, JsValue> {
        let line = self.solver.solve_multi_agent().map_err(to_js_error)?;
        Ok(serde_wasm_bindgen::to_value(&notation(&line))?)
    }

    /// Engine reply. Pass the opponent's move when one was played since the last call.
    #[wasm_bindgen(js_name = nextMove)]
    pub fn next_move(&mut self, received: Option<String>) -> Result<String, JsValue> {
        let received = match received {
            Some(text) => {
                Some(Move::parse(&text, self.solver.current_board()).map_err(to_js_error)?)
            }
            None => None,
        };
        let reply = self
            .solver
            .get_next_best_move(received)
            .map_err(to_js_error)?;
        Ok(reply.to_string())
    }

    /// Legal moves for `color` on the board at the engine's cursor.
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self, color: &str) -> Result<JsValue, JsValue> {
        let color = parse_color(color)?;
        let moves = self.solver.current_board().get_all_possible_moves(color);
        Ok(serde_wasm_bindgen::to_value(&notation(&moves))?)
    }

    #[wasm_bindgen(js_name = traceLaser)]
    pub fn trace_laser(&self, color: &str) -> Result<JsValue, JsValue> {
        let color = parse_color(color)?;
        let report = LaserReport::from(self.solver.current_board().trace_laser(color));
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    #[wasm_bindgen(js_name = currentBoard)]
    pub fn current_board(&self) -> Result<JsValue, JsValue> {
        let description = BoardDescription::from_board(self.solver.current_board());
        Ok(serde_wasm_bindgen::to_value(&description)?)
    }

    #[wasm_bindgen(js_name = nodesCreated)]
    pub fn nodes_created(&self) -> f64 {
        self.solver.session().nodes_created() as f64
    }

    pub fn reroot(&mut self) {
        self.solver.reroot();
    }
}
