use std::fmt;

use log::{trace, warn};
use smallvec::SmallVec;

use crate::error::{KhetError, KhetResult};
use crate::piece::{Action, Color, Direction, Piece, PieceKind, Position, Surface};

pub const DEFAULT_WIDTH: u8 = 10;
pub const DEFAULT_HEIGHT: u8 = 8;
pub const MAX_DIMENSION: u8 = 64;

/// Legal actions of a single piece; no kind has more than ten.
pub type ActionList = SmallVec<[Action; 10]>;

/// A move is the moving piece (as it stands before the move) plus the action. A piece-less
/// `PASS` is the only move without a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: Option<Piece>,
    pub action: Action,
}

impl Move {
    pub const fn new(piece: Piece, action: Action) -> Self {
        Self {
            piece: Some(piece),
            action,
        }
    }

    pub const fn pass() -> Self {
        Self {
            piece: None,
            action: Action::Pass,
        }
    }
}

/// `x,y,ACTION` for a piece move, bare `PASS` otherwise.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.piece {
            Some(piece) => write!(f, "{},{}", piece.position(), self.action),
            None => write!(f, "{}", self.action),
        }
    }
}

/// What happened to a laser shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserOutcome {
    /// The colour has no Sphinx on the board.
    NoSphinx,
    /// The beam left the board travelling in `direction`.
    Dissipated { direction: Direction },
    /// A blocking or emitting side stopped the beam.
    Blocked { position: Position },
    /// A vulnerable side was struck.
    Hit(Piece),
    /// The step guard tripped; no piece is affected.
    Looped,
}

/// Beam path (every cell entered, excluding the Sphinx's own cell) plus the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaserTrace {
    pub path: Vec<Position>,
    pub outcome: LaserOutcome,
}

/// Row-major grid of optional pieces. Every piece's stored position matches the cell holding it.
/// Equality and hashing are by content, so transposed positions compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Box<[Option<Piece>]>,
}

impl Board {
    pub fn new(width: u8, height: u8) -> KhetResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(KhetError::InvalidBoard(format!(
                "dimensions {width}x{height} outside 1..={MAX_DIMENSION}"
            )));
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize].into_boxed_slice(),
        })
    }

    /// Build a board from placed pieces, rejecting off-board or doubly occupied cells and a
    /// second Sphinx for the same colour.
    pub fn with_pieces(
        width: u8,
        height: u8,
        pieces: impl IntoIterator<Item = Piece>,
    ) -> KhetResult<Self> {
        let mut board = Self::new(width, height)?;
        for piece in pieces {
            let position = piece.position();
            let index = board.index(position).ok_or_else(|| {
                KhetError::InvalidBoard(format!("{piece} lies outside the {width}x{height} board"))
            })?;
            if let Some(existing) = &board.cells[index] {
                return Err(KhetError::InvalidBoard(format!(
                    "{position} holds both {existing} and {piece}"
                )));
            }
            if piece.kind() == PieceKind::Sphinx && board.sphinx(piece.color()).is_some() {
                return Err(KhetError::InvalidBoard(format!(
                    "{} has more than one sphinx",
                    piece.color()
                )));
            }
            board.cells[index] = Some(piece);
        }
        Ok(board)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Unit step from `position`, `None` when it leaves the board.
    fn step(&self, position: Position, delta: (i8, i8)) -> Option<Position> {
        position.offset(delta).filter(|next| self.contains(*next))
    }

    pub fn get(&self, position: Position) -> Option<&Piece> {
        self.index(position)
            .and_then(|index| self.cells[index].as_ref())
    }

    /// Place (or clear) a cell, returning the previous occupant. A placed piece takes the
    /// cell's position.
    pub fn set(&mut self, position: Position, piece: Option<Piece>) -> KhetResult<Option<Piece>> {
        let index = self
            .index(position)
            .ok_or_else(|| KhetError::InvalidBoard(format!("{position} is outside the board")))?;
        let piece = piece.map(|mut piece| {
            piece.set_position(position);
            piece
        });
        Ok(std::mem::replace(&mut self.cells[index], piece))
    }

    /// All pieces in board-scan order: rows from `y = 0` upwards, columns left to right.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |piece| piece.color() == color)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    pub fn sphinx(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color)
            .find(|piece| piece.kind() == PieceKind::Sphinx)
    }

    pub fn pharaoh(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color).find(|piece| piece.is_pharaoh())
    }

    /// Explain why a move is illegal, if it is.
    pub fn validate_move(&self, mv: &Move) -> KhetResult<()> {
        self.move_error(mv).map_or(Ok(()), |reason| {
            Err(KhetError::InvalidMove {
                notation: mv.to_string(),
                reason,
            })
        })
    }

    pub fn check_move(&self, mv: &Move) -> bool {
        self.move_error(mv).is_none()
    }

    fn move_error(&self, mv: &Move) -> Option<&'static str> {
        let Some(piece) = &mv.piece else {
            return (mv.action != Action::Pass).then_some("no piece to move");
        };
        if self.get(piece.position()) != Some(piece) {
            return Some("piece is not on the board");
        }
        if !piece.allows(mv.action) {
            return Some("action not allowed for this piece");
        }
        if mv.action.is_rotation() {
            return None;
        }
        let Some(destination) = self.step(piece.position(), mv.action.delta()) else {
            return Some("destination is off the board");
        };
        match self.get(destination) {
            None => None,
            Some(occupant)
                if piece.kind().can_initiate_swap() && occupant.kind().can_be_swapped() =>
            {
                None
            }
            Some(_) => Some("destination is occupied"),
        }
    }

    /// Legal actions for `piece`, in the kind's declared order.
    pub fn list_possible_moves(&self, piece: &Piece) -> ActionList {
        piece
            .kind()
            .allowed_actions()
            .iter()
            .copied()
            .filter(|action| self.check_move(&Move::new(*piece, *action)))
            .collect()
    }

    /// Every legal move for `color`: pieces in board-scan order, each contributing its actions
    /// in declared order. Search move ordering depends on this sequence.
    pub fn get_all_possible_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for piece in self.pieces_of(color) {
            moves.extend(
                self.list_possible_moves(piece)
                    .into_iter()
                    .map(|action| Move::new(*piece, action)),
            );
        }
        moves
    }

    /// Apply a legal move to a copy of the board. The laser is not fired.
    pub fn make_move(&self, mv: &Move) -> KhetResult<Board> {
        self.validate_move(mv)?;
        let mut next = self.clone();
        let Some(piece) = mv.piece else {
            return Ok(next);
        };
        let source = piece.position();
        match mv.action {
            Action::Pass => {}
            Action::RotateCw | Action::RotateCcw => {
                if let Some(index) = next.index(source) {
                    if let Some(rotated) = next.cells[index].as_mut() {
                        if mv.action == Action::RotateCw {
                            rotated.rotate_cw();
                        } else {
                            rotated.rotate_ccw();
                        }
                    }
                }
            }
            _ => {
                let destination = self.step(source, mv.action.delta()).ok_or_else(|| {
                    KhetError::InvalidMove {
                        notation: mv.to_string(),
                        reason: "destination is off the board",
                    }
                })?;
                let occupant = next.set(destination, Some(piece))?;
                next.set(source, occupant)?;
            }
        }
        Ok(next)
    }

    /// Follow the beam of `color`'s Sphinx without touching the board.
    pub fn trace_laser(&self, color: Color) -> LaserTrace {
        let mut path = Vec::new();
        let Some((mut position, mut direction)) = self
            .sphinx(color)
            .and_then(|sphinx| Some((sphinx.position(), sphinx.laser_direction()?)))
        else {
            return LaserTrace {
                path,
                outcome: LaserOutcome::NoSphinx,
            };
        };

        // A beam cannot visit the same (cell, direction) twice; this bound is never reached on a
        // consistent board.
        let max_steps = self.cells.len() * 4 + 1;
        for _ in 0..max_steps {
            let Some(next) = self.step(position, direction.delta()) else {
                return LaserTrace {
                    path,
                    outcome: LaserOutcome::Dissipated { direction },
                };
            };
            position = next;
            path.push(position);
            let Some(piece) = self.get(position) else {
                continue;
            };
            let surface = piece.surface_hit(direction);
            trace!("{color} laser reaches {piece} travelling {direction:?}: {surface:?}");
            match surface {
                Surface::Blocker | Surface::EmitsLaser => {
                    return LaserTrace {
                        path,
                        outcome: LaserOutcome::Blocked { position },
                    };
                }
                Surface::ReflectCw | Surface::ReflectCcw => {
                    if let Some(reflected) = direction.reflect(surface) {
                        direction = reflected;
                    }
                }
                Surface::Vulnerable => {
                    return LaserTrace {
                        path,
                        outcome: LaserOutcome::Hit(*piece),
                    };
                }
            }
        }
        warn!("{color} laser exceeded {max_steps} steps");
        LaserTrace {
            path,
            outcome: LaserOutcome::Looped,
        }
    }

    /// Fire `color`'s laser, removing and returning the piece it destroys.
    pub fn fire_laser(&mut self, color: Color) -> Option<Piece> {
        match self.trace_laser(color).outcome {
            LaserOutcome::Hit(piece) => {
                if let Some(index) = self.index(piece.position()) {
                    self.cells[index] = None;
                }
                Some(piece)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    fn at(kind: PieceKind, color: Color, x: u8, y: u8, orientation: u8) -> Piece {
        Piece::new(kind, color, Position::new(x, y), orientation)
    }

    fn board(pieces: &[Piece]) -> Board {
        Board::with_pieces(DEFAULT_WIDTH, DEFAULT_HEIGHT, pieces.iter().copied())
            .expect("valid test board")
    }

    fn piece_at(board: &Board, x: u8, y: u8) -> Piece {
        *board.get(Position::new(x, y)).expect("piece present")
    }

    #[test]
    fn construction_rejects_malformed_boards() {
        assert!(matches!(Board::new(0, 8), Err(KhetError::InvalidBoard(_))));
        let outside = at(PieceKind::Pharaoh, Color::Red, 10, 0, 0);
        assert!(Board::with_pieces(10, 8, [outside]).is_err());
        let a = at(PieceKind::Pharaoh, Color::Red, 1, 1, 0);
        let b = at(PieceKind::Anubis, Color::Silver, 1, 1, 0);
        assert!(Board::with_pieces(10, 8, [a, b]).is_err());
        let s1 = at(PieceKind::Sphinx, Color::Red, 0, 0, 0);
        let s2 = at(PieceKind::Sphinx, Color::Red, 9, 7, 2);
        assert!(Board::with_pieces(10, 8, [s1, s2]).is_err());
    }

    #[test]
    fn set_updates_piece_position() {
        let mut board = Board::new(4, 4).expect("board");
        let pyramid = at(PieceKind::Pyramid, Color::Red, 0, 0, 1);
        assert_eq!(board.set(Position::new(2, 3), Some(pyramid)), Ok(None));
        assert_eq!(piece_at(&board, 2, 3).position(), Position::new(2, 3));
        let removed = board.set(Position::new(2, 3), None).expect("on board");
        assert_eq!(removed.map(|p| p.kind()), Some(PieceKind::Pyramid));
        assert!(board.set(Position::new(4, 0), None).is_err());
    }

    #[test]
    fn check_move_rejects_illegal_moves() {
        let sphinx = at(PieceKind::Sphinx, Color::Silver, 0, 0, 0);
        let pharaoh = at(PieceKind::Pharaoh, Color::Silver, 9, 7, 0);
        let anubis = at(PieceKind::Anubis, Color::Silver, 4, 4, 0);
        let pyramid = at(PieceKind::Pyramid, Color::Red, 5, 4, 0);
        let scarab = at(PieceKind::Scarab, Color::Red, 4, 5, 0);
        let red_pharaoh = at(PieceKind::Pharaoh, Color::Red, 3, 5, 0);
        let board = board(&[sphinx, pharaoh, anubis, pyramid, scarab, red_pharaoh]);

        // not in the allowed set
        assert!(!board.check_move(&Move::new(sphinx, Action::North)));
        assert!(!board.check_move(&Move::new(pharaoh, Action::RotateCw)));
        assert!(!board.check_move(&Move::new(scarab, Action::RotateCcw)));
        assert!(!board.check_move(&Move::new(anubis, Action::Pass)));
        // off grid
        assert!(!board.check_move(&Move::new(pharaoh, Action::North)));
        assert!(!board.check_move(&Move::new(pharaoh, Action::East)));
        // occupied, mover cannot initiate a swap
        assert!(!board.check_move(&Move::new(anubis, Action::East)));
        assert!(!board.check_move(&Move::new(anubis, Action::North)));
        // scarab onto a piece that cannot be swapped
        assert!(!board.check_move(&Move::new(scarab, Action::West)));
        // piece-less moves
        assert!(board.check_move(&Move::pass()));
        assert!(!board.check_move(&Move {
            piece: None,
            action: Action::North
        }));
        // stale piece value
        let mut rotated = anubis;
        rotated.rotate_cw();
        assert!(!board.check_move(&Move::new(rotated, Action::South)));

        // legal ones
        assert!(board.check_move(&Move::new(sphinx, Action::RotateCw)));
        assert!(board.check_move(&Move::new(scarab, Action::South)));
        assert!(board.check_move(&Move::new(pharaoh, Action::SouthWest)));
        assert!(board.check_move(&Move::new(anubis, Action::RotateCcw)));
    }

    #[test]
    fn make_move_refuses_illegal_moves() {
        let pharaoh = at(PieceKind::Pharaoh, Color::Silver, 9, 7, 0);
        let board = board(&[pharaoh]);
        let result = board.make_move(&Move::new(pharaoh, Action::North));
        assert_eq!(
            result,
            Err(KhetError::InvalidMove {
                notation: "9,7,NORTH".to_string(),
                reason: "destination is off the board",
            })
        );
        assert_eq!(piece_at(&board, 9, 7), pharaoh);
    }

    #[test]
    fn moves_are_listed_in_declared_order() {
        let scarab = at(PieceKind::Scarab, Color::Silver, 0, 0, 0);
        let anubis = at(PieceKind::Anubis, Color::Silver, 1, 0, 0);
        let sphinx = at(PieceKind::Sphinx, Color::Silver, 9, 0, 1);
        let red = at(PieceKind::Pharaoh, Color::Red, 0, 1, 0);
        let board = board(&[red, scarab, anubis, sphinx]);

        assert_eq!(
            board.list_possible_moves(&anubis).as_slice(),
            &[
                Action::North,
                Action::NorthEast,
                Action::East,
                Action::RotateCw,
                Action::RotateCcw
            ]
        );

        let moves = board.get_all_possible_moves(Color::Silver);
        let rendered: Vec<String> = moves.iter().map(ToString::to_string).collect();
        // Scarab at (0,0) first: north is a non-swappable pharaoh, east swaps the anubis.
        assert_eq!(
            rendered,
            vec![
                "0,0,NORTH_EAST",
                "0,0,EAST",
                "0,0,ROTATE_CW",
                "1,0,NORTH",
                "1,0,NORTH_EAST",
                "1,0,EAST",
                "1,0,ROTATE_CW",
                "1,0,ROTATE_CCW",
                "9,0,ROTATE_CW",
                "9,0,ROTATE_CCW",
            ]
        );
        assert!(board
            .get_all_possible_moves(Color::Red)
            .iter()
            .all(|mv| mv.piece.is_some_and(|p| p.color() == Color::Red)));
    }

    #[test]
    fn make_move_returns_independent_copy() {
        let anubis = at(PieceKind::Anubis, Color::Red, 2, 2, 0);
        let original = board(&[anubis]);
        let moved = original
            .make_move(&Move::new(anubis, Action::NorthEast))
            .expect("legal");
        assert_eq!(piece_at(&original, 2, 2), anubis);
        assert!(moved.get(Position::new(2, 2)).is_none());
        assert_eq!(piece_at(&moved, 3, 3).position(), Position::new(3, 3));

        let rotated = original
            .make_move(&Move::new(anubis, Action::RotateCcw))
            .expect("legal");
        assert_eq!(piece_at(&rotated, 2, 2).orientation(), 3);
        assert_eq!(original.make_move(&Move::pass()), Ok(original.clone()));
    }

    #[test]
    fn directional_moves_are_locally_reversible() {
        let anubis = at(PieceKind::Anubis, Color::Red, 2, 2, 1);
        let start = board(&[anubis]);
        let there = start
            .make_move(&Move::new(anubis, Action::SouthWest))
            .expect("legal");
        let back = there
            .make_move(&Move::new(piece_at(&there, 1, 1), Action::NorthEast))
            .expect("legal");
        assert_eq!(back, start);
    }

    #[test]
    fn swap_exchanges_both_pieces_and_reverses() {
        let scarab = at(PieceKind::Scarab, Color::Silver, 3, 3, 1);
        let pyramid = at(PieceKind::Pyramid, Color::Red, 4, 3, 2);
        let start = board(&[scarab, pyramid]);
        let swapped = start
            .make_move(&Move::new(scarab, Action::East))
            .expect("scarab may swap");
        assert_eq!(piece_at(&swapped, 4, 3).kind(), PieceKind::Scarab);
        assert_eq!(piece_at(&swapped, 3, 3).kind(), PieceKind::Pyramid);
        assert_eq!(piece_at(&swapped, 3, 3).position(), Position::new(3, 3));
        assert_eq!(piece_at(&swapped, 3, 3).orientation(), 2);

        let restored = swapped
            .make_move(&Move::new(piece_at(&swapped, 4, 3), Action::West))
            .expect("swap back");
        assert_eq!(restored, start);
    }

    #[test]
    fn laser_without_sphinx_hits_nothing() {
        let mut board = board(&[at(PieceKind::Pharaoh, Color::Red, 0, 5, 0)]);
        assert_eq!(board.trace_laser(Color::Silver).outcome, LaserOutcome::NoSphinx);
        assert_eq!(board.fire_laser(Color::Silver), None);
    }

    #[test]
    fn laser_leaves_board_when_path_is_clear() {
        let sphinx = at(PieceKind::Sphinx, Color::Silver, 0, 0, 0);
        let mut board = board(&[sphinx, at(PieceKind::Pharaoh, Color::Red, 1, 5, 0)]);
        let before = board.clone();
        let trace = board.trace_laser(Color::Silver);
        assert_eq!(
            trace.outcome,
            LaserOutcome::Dissipated {
                direction: Direction::North
            }
        );
        assert_eq!(trace.path.len(), 7);
        assert_eq!(board.fire_laser(Color::Silver), None);
        assert_eq!(board, before);
    }

    #[test]
    fn blocker_stops_the_beam() {
        let sphinx = at(PieceKind::Sphinx, Color::Silver, 0, 0, 0);
        let anubis = at(PieceKind::Anubis, Color::Red, 0, 3, 2);
        let mut board = board(&[sphinx, anubis]);
        let before = board.clone();
        assert_eq!(
            board.trace_laser(Color::Silver).outcome,
            LaserOutcome::Blocked {
                position: Position::new(0, 3)
            }
        );
        assert_eq!(board.fire_laser(Color::Silver), None);
        assert_eq!(board, before);
    }

    #[test]
    fn emitting_side_and_sphinx_body_block() {
        let silver = at(PieceKind::Sphinx, Color::Silver, 0, 0, 1);
        let red = at(PieceKind::Sphinx, Color::Red, 6, 0, 3);
        let mut board = board(&[silver, red]);
        assert_eq!(board.fire_laser(Color::Silver), None);
        assert_eq!(board.fire_laser(Color::Red), None);
        assert_eq!(board.piece_count(), 2);
    }

    #[test]
    fn vulnerable_side_is_destroyed() {
        let sphinx = at(PieceKind::Sphinx, Color::Silver, 0, 0, 0);
        let anubis = at(PieceKind::Anubis, Color::Red, 0, 3, 0);
        let mut board = board(&[sphinx, anubis]);
        assert_eq!(board.fire_laser(Color::Silver), Some(anubis));
        assert!(board.get(Position::new(0, 3)).is_none());
        assert_eq!(board.piece_count(), 1);
    }

    #[test]
    fn pyramid_bends_beam_into_pharaoh() {
        let sphinx = at(PieceKind::Sphinx, Color::Silver, 0, 0, 1);
        let pyramid = at(PieceKind::Pyramid, Color::Silver, 5, 0, 3);
        let pharaoh = at(PieceKind::Pharaoh, Color::Red, 5, 5, 0);
        let mut board = board(&[sphinx, pyramid, pharaoh]);
        let trace = board.trace_laser(Color::Silver);
        assert_eq!(trace.outcome, LaserOutcome::Hit(pharaoh));
        assert_eq!(trace.path.first(), Some(&Position::new(1, 0)));
        assert_eq!(trace.path.last(), Some(&Position::new(5, 5)));
        assert_eq!(board.fire_laser(Color::Silver), Some(pharaoh));
        assert!(board.pharaoh(Color::Red).is_none());
    }

    #[test]
    fn pyramid_back_is_vulnerable() {
        let sphinx = at(PieceKind::Sphinx, Color::Silver, 0, 0, 1);
        let pyramid = at(PieceKind::Pyramid, Color::Silver, 5, 0, 0);
        let mut board = board(&[sphinx, pyramid]);
        assert_eq!(board.fire_laser(Color::Silver), Some(pyramid));
    }

    #[test]
    fn scarab_reflects_from_both_faces() {
        // Beam travels north, the scarab turns it west, a pyramid turns it south into an anubis
        // whose north side is vulnerable.
        let sphinx = at(PieceKind::Sphinx, Color::Red, 5, 0, 0);
        let scarab = at(PieceKind::Scarab, Color::Red, 5, 4, 0);
        let pyramid = at(PieceKind::Pyramid, Color::Silver, 2, 4, 1);
        let anubis = at(PieceKind::Anubis, Color::Silver, 2, 1, 2);
        let mut bent = board(&[sphinx, scarab, pyramid, anubis]);
        // scarab orientation 0 has a CW south side: north-bound beam exits west
        assert_eq!(scarab.reflect(Direction::North), Some(Direction::West));
        // pyramid orientation 1 has a CW east side: west-bound beam exits south
        assert_eq!(pyramid.reflect(Direction::West), Some(Direction::South));
        assert_eq!(bent.fire_laser(Color::Red), Some(anubis));

        // the other face of the scarab sends an east-bound beam north
        let sphinx = at(PieceKind::Sphinx, Color::Red, 0, 4, 1);
        let target = at(PieceKind::Pharaoh, Color::Silver, 5, 7, 0);
        let mut south = board(&[sphinx, scarab, target]);
        assert_eq!(scarab.reflect(Direction::East), Some(Direction::South));
        assert_eq!(south.fire_laser(Color::Red), None);
        let mut flipped = south
            .make_move(&Move::new(scarab, Action::RotateCw))
            .expect("legal");
        assert_eq!(flipped.fire_laser(Color::Red), Some(target));
    }

    #[test]
    fn transposed_boards_are_equal_and_collide() {
        let a = at(PieceKind::Anubis, Color::Silver, 1, 1, 0);
        let b = at(PieceKind::Pyramid, Color::Red, 6, 2, 1);
        let start = board(&[a, b]);

        let first = start.make_move(&Move::new(a, Action::North)).expect("legal");
        let first = first
            .make_move(&Move::new(piece_at(&first, 6, 2), Action::RotateCw))
            .expect("legal");

        let second = start.make_move(&Move::new(b, Action::RotateCw)).expect("legal");
        let second = second
            .make_move(&Move::new(piece_at(&second, 1, 1), Action::North))
            .expect("legal");

        assert_eq!(first, second);
        let mut seen = HashSet::new();
        assert!(seen.insert(first));
        assert!(!seen.insert(second));

        let reordered = Board::with_pieces(DEFAULT_WIDTH, DEFAULT_HEIGHT, [b, a]).expect("valid");
        assert_eq!(reordered, start);
    }

    #[test]
    fn move_notation() {
        let anubis = at(PieceKind::Anubis, Color::Red, 7, 3, 0);
        assert_eq!(Move::new(anubis, Action::RotateCw).to_string(), "7,3,ROTATE_CW");
        assert_eq!(Move::pass().to_string(), "PASS");
    }
}
