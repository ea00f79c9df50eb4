//! External board and move formats.
//!
//! Front ends describe a board either as a list of placed pieces ([`BoardDescription`]) or as
//! rows of cell strings such as `"red_pyramid,up"`. In the row form the first row is the *top*
//! of the board, so row `r` maps to `y = height - 1 - r`; columns map straight to `x`. Moves are
//! exchanged as `"x,y,ACTION"` and resolved against a board with [`Move::parse`].

use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{KhetError, KhetResult};
use crate::piece::{Action, Color, Piece, PieceKind, Position};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDescription {
    /// Kind name, e.g. `"pyramid"`; parsed case-insensitively.
    pub kind: String,
    pub color: Color,
    pub x: u8,
    pub y: u8,
    #[serde(default)]
    pub orientation: u8,
}

impl PieceDescription {
    pub fn to_piece(&self) -> KhetResult<Piece> {
        let kind = PieceKind::parse(&self.kind)?;
        if self.orientation > 3 {
            return Err(KhetError::InvalidBoard(format!(
                "orientation {} of {} at {},{} is not in 0..=3",
                self.orientation, self.kind, self.x, self.y
            )));
        }
        Ok(Piece::new(
            kind,
            self.color,
            Position::new(self.x, self.y),
            self.orientation,
        ))
    }

    pub fn from_piece(piece: &Piece) -> Self {
        Self {
            kind: piece.kind().name().to_string(),
            color: piece.color(),
            x: piece.position().x,
            y: piece.position().y,
            orientation: piece.orientation(),
        }
    }
}

fn default_width() -> u8 {
    DEFAULT_WIDTH
}
fn default_height() -> u8 {
    DEFAULT_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDescription {
    #[serde(default = "default_width")]
    pub width: u8,
    #[serde(default = "default_height")]
    pub height: u8,
    #[serde(default)]
    pub pieces: Vec<PieceDescription>,
}

impl Default for BoardDescription {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            pieces: Vec::new(),
        }
    }
}

impl BoardDescription {
    pub fn to_board(&self) -> KhetResult<Board> {
        let pieces = self
            .pieces
            .iter()
            .map(PieceDescription::to_piece)
            .collect::<KhetResult<Vec<_>>>()?;
        Board::with_pieces(self.width, self.height, pieces)
    }

    pub fn from_board(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            pieces: board.pieces().map(PieceDescription::from_piece).collect(),
        }
    }

    /// Read rows of cell strings, top row first. Every row must have the same length.
    pub fn from_cell_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> KhetResult<Self> {
        let height = u8::try_from(rows.len())
            .map_err(|_| KhetError::InvalidBoard(format!("{} rows is too many", rows.len())))?;
        let columns = rows.first().map_or(0, Vec::len);
        let width = u8::try_from(columns)
            .map_err(|_| KhetError::InvalidBoard(format!("{columns} columns is too many")))?;

        let mut pieces = Vec::new();
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(KhetError::InvalidBoard(format!(
                    "row {row_index} has {} cells, expected {columns}",
                    row.len()
                )));
            }
            // row_index < height, so the subtraction cannot underflow
            let y = height - 1 - row_index as u8;
            for (x, cell) in row.iter().enumerate() {
                let position = Position::new(x as u8, y);
                if let Some(piece) = parse_cell(cell.as_ref(), position)? {
                    pieces.push(PieceDescription::from_piece(&piece));
                }
            }
        }
        Ok(Self {
            width,
            height,
            pieces,
        })
    }
}

/// Parse one cell string: `"<color>_<kind>[,<up|right|down|left>]"`. Blank cells are empty.
pub fn parse_cell(cell: &str, position: Position) -> KhetResult<Option<Piece>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    let (color, rest) = cell.split_once('_').ok_or_else(|| {
        KhetError::InvalidBoard(format!("cell {cell:?} at {position} has no colour"))
    })?;
    let color = Color::parse(color).ok_or_else(|| {
        KhetError::InvalidBoard(format!("unknown colour {color:?} at {position}"))
    })?;
    let (kind, orientation) = match rest.split_once(',') {
        Some((kind, facing)) => (kind, parse_facing(facing, position)?),
        None => (rest, 0),
    };
    let kind = PieceKind::parse(kind)?;
    Ok(Some(Piece::new(kind, color, position, orientation)))
}

fn parse_facing(facing: &str, position: Position) -> KhetResult<u8> {
    match facing.trim().to_ascii_lowercase().as_str() {
        "up" => Ok(0),
        "right" => Ok(1),
        "down" => Ok(2),
        "left" => Ok(3),
        other => Err(KhetError::InvalidBoard(format!(
            "unknown facing {other:?} at {position}"
        ))),
    }
}

impl Move {
    /// Resolve `"x,y,ACTION"` (or `"PASS"`) against `board` and check that it is legal there.
    pub fn parse(notation: &str, board: &Board) -> KhetResult<Move> {
        let trimmed = notation.trim();
        if trimmed.eq_ignore_ascii_case(Action::Pass.name()) {
            return Ok(Move::pass());
        }
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [x, y, action] = parts.as_slice() else {
            return Err(KhetError::InvalidNotation(notation.to_string()));
        };
        let coordinate = |value: &str| {
            value
                .parse::<u8>()
                .map_err(|_| KhetError::InvalidNotation(notation.to_string()))
        };
        let position = Position::new(coordinate(*x)?, coordinate(*y)?);
        let action = Action::from_name(*action)
            .ok_or_else(|| KhetError::InvalidNotation(notation.to_string()))?;

        let mv = match board.get(position) {
            Some(piece) => Move::new(*piece, action),
            None if action == Action::Pass => Move::pass(),
            None => return Err(KhetError::NoPieceAt(position)),
        };
        board.validate_move(&mv)?;
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn cell_strings_parse() {
        let origin = Position::new(0, 0);
        assert_eq!(parse_cell(" ", origin), Ok(None));
        let pyramid = parse_cell("red_pyramid,left", origin)
            .expect("valid")
            .expect("piece");
        assert_eq!(pyramid.kind(), PieceKind::Pyramid);
        assert_eq!(pyramid.color(), Color::Red);
        assert_eq!(pyramid.orientation(), 3);
        let sphinx = parse_cell("silver_sphynx", origin).expect("valid").expect("piece");
        assert_eq!(sphinx.kind(), PieceKind::Sphinx);
        assert_eq!(sphinx.orientation(), 0);
        assert_eq!(
            parse_cell("red_obelisk", origin),
            Err(KhetError::UnknownPieceKind("obelisk".to_string()))
        );
        assert!(matches!(
            parse_cell("green_scarab", origin),
            Err(KhetError::InvalidBoard(_))
        ));
        assert!(matches!(
            parse_cell("red_scarab,sideways", origin),
            Err(KhetError::InvalidBoard(_))
        ));
    }

    #[test]
    fn first_row_is_the_top_of_the_board() {
        let grid = rows(&[
            &["red_pharaoh", "", ""],
            &["", "", ""],
            &["", "", "silver_sphinx,right"],
            &["silver_anubis,down", "", ""],
        ]);
        let description = BoardDescription::from_cell_rows(&grid).expect("valid grid");
        assert_eq!((description.width, description.height), (3, 4));
        let board = description.to_board().expect("valid board");

        let pharaoh = board.get(Position::new(0, 3)).expect("top-left");
        assert_eq!(pharaoh.kind(), PieceKind::Pharaoh);
        let sphinx = board.get(Position::new(2, 1)).expect("third row, last column");
        assert_eq!(sphinx.orientation(), 1);
        let anubis = board.get(Position::new(0, 0)).expect("bottom-left");
        assert_eq!(anubis.orientation(), 2);
        assert_eq!(board.piece_count(), 3);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let grid = rows(&[&["", ""], &[""]]);
        assert!(matches!(
            BoardDescription::from_cell_rows(&grid),
            Err(KhetError::InvalidBoard(_))
        ));
    }

    #[test]
    fn descriptions_round_trip_through_boards() {
        let description = BoardDescription {
            width: 10,
            height: 8,
            pieces: vec![
                PieceDescription {
                    kind: "Scarab".to_string(),
                    color: Color::Silver,
                    x: 4,
                    y: 3,
                    orientation: 3,
                },
                PieceDescription {
                    kind: "pharaoh".to_string(),
                    color: Color::Red,
                    x: 5,
                    y: 7,
                    orientation: 0,
                },
            ],
        };
        let board = description.to_board().expect("valid");
        let back = BoardDescription::from_board(&board);
        // scan order puts the scarab first; its orientation is reduced to the two-fold period
        assert_eq!(back.pieces[0].kind, "scarab");
        assert_eq!(back.pieces[0].orientation, 1);
        assert_eq!(back.to_board().expect("valid"), board);
    }

    #[test]
    fn bad_descriptions_fail() {
        let mut description = BoardDescription::default();
        description.pieces.push(PieceDescription {
            kind: "anubis".to_string(),
            color: Color::Red,
            x: 0,
            y: 0,
            orientation: 4,
        });
        assert!(matches!(description.to_board(), Err(KhetError::InvalidBoard(_))));
        description.pieces[0].orientation = 0;
        description.pieces[0].kind = "ankh".to_string();
        assert_eq!(
            description.to_board(),
            Err(KhetError::UnknownPieceKind("ankh".to_string()))
        );
    }

    #[test]
    fn notation_resolves_against_board() {
        let anubis = Piece::new(PieceKind::Anubis, Color::Red, Position::new(2, 2), 0);
        let board = Board::with_pieces(10, 8, [anubis]).expect("valid");

        let mv = Move::parse("2,2,NORTH_WEST", &board).expect("legal");
        assert_eq!(mv, Move::new(anubis, Action::NorthWest));
        assert_eq!(mv.to_string(), "2,2,NORTH_WEST");
        assert_eq!(
            Move::parse(" 2 , 2 , rotate_cw ", &board).map(|m| m.action),
            Ok(Action::RotateCw)
        );
        assert_eq!(Move::parse("PASS", &board), Ok(Move::pass()));
        assert_eq!(Move::parse("5,5,PASS", &board), Ok(Move::pass()));

        assert_eq!(
            Move::parse("3,3,NORTH", &board),
            Err(KhetError::NoPieceAt(Position::new(3, 3)))
        );
        assert!(matches!(
            Move::parse("2,2", &board),
            Err(KhetError::InvalidNotation(_))
        ));
        assert!(matches!(
            Move::parse("2,2,HOP", &board),
            Err(KhetError::InvalidNotation(_))
        ));
        assert!(matches!(
            Move::parse("-1,2,NORTH", &board),
            Err(KhetError::InvalidNotation(_))
        ));
        assert!(matches!(
            Move::parse("2,2,PASS", &board),
            Err(KhetError::InvalidMove { .. })
        ));
    }
}
