use log::debug;

use crate::board::{Board, Move};
use crate::error::{KhetError, KhetResult};
use crate::piece::{Action, Color, Piece, Position};

/// Result of a single turn: what the laser destroyed and whether that ended the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub destroyed: Option<Piece>,
    pub winner: Option<Color>,
}

/// A game in progress. Each turn is one move followed by the mover's laser; the turn passes to
/// the other colour until a Pharaoh is destroyed.
#[derive(Debug, Clone)]
pub struct KhetGame {
    boards: Vec<Board>,
    moves: Vec<Move>,
    turn: Color,
    winner: Option<Color>,
}

impl KhetGame {
    /// Game from `board` with Silver to move.
    pub fn new(board: Board) -> Self {
        Self::with_turn(board, Color::Silver)
    }

    pub fn with_turn(board: Board, turn: Color) -> Self {
        Self {
            boards: vec![board],
            moves: Vec::new(),
            turn,
            winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        // the history always holds at least the starting board
        &self.boards[self.boards.len() - 1]
    }

    /// Every board the game has passed through, starting position first.
    pub fn history(&self) -> &[Board] {
        &self.boards
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        self.board().get_all_possible_moves(self.turn)
    }

    /// Play `action` with whatever piece stands on `position`.
    pub fn make_move_at(&mut self, position: Position, action: Action) -> KhetResult<TurnOutcome> {
        let piece = *self
            .board()
            .get(position)
            .ok_or(KhetError::NoPieceAt(position))?;
        self.make_move(Move::new(piece, action))
    }

    pub fn make_move(&mut self, mv: Move) -> KhetResult<TurnOutcome> {
        if let Some(winner) = self.winner {
            return Err(KhetError::GameOver { winner });
        }
        if mv.piece.is_some_and(|piece| piece.color() != self.turn) {
            return Err(KhetError::OutOfTurn { expected: self.turn });
        }
        let mut next = self.board().make_move(&mv)?;
        let destroyed = next.fire_laser(self.turn);
        if let Some(piece) = destroyed.filter(Piece::is_pharaoh) {
            self.winner = Some(piece.color().opponent());
        }
        debug!("{} plays {mv}, laser destroys {destroyed:?}", self.turn);

        self.boards.push(next);
        self.moves.push(mv);
        self.turn = self.turn.opponent();
        Ok(TurnOutcome {
            destroyed,
            winner: self.winner,
        })
    }
}
