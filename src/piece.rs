use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KhetError, KhetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    #[serde(alias = "silver", alias = "SILVER")]
    Silver,
    #[serde(alias = "red", alias = "RED")]
    Red,
}

impl Color {
    pub const fn opponent(self) -> Self {
        match self {
            Color::Silver => Color::Red,
            Color::Red => Color::Silver,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::Silver => "Silver",
            Color::Red => "Red",
        }
    }

    /// Case-insensitive lookup of `"silver"` / `"red"`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("silver") {
            Some(Color::Silver)
        } else if name.eq_ignore_ascii_case("red") {
            Some(Color::Red)
        } else {
            None
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Laser interaction of one side of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Vulnerable,
    Blocker,
    ReflectCw,
    ReflectCcw,
    EmitsLaser,
}

impl Surface {
    pub const fn is_mirror(self) -> bool {
        matches!(self, Surface::ReflectCw | Surface::ReflectCcw)
    }
}

/// Cardinal direction, used both for piece sides and laser travel. The discriminant doubles as
/// the side index into a surface table (N, E, S, W).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_orientation(orientation: u8) -> Self {
        Self::ALL[(orientation % 4) as usize]
    }

    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Outgoing direction of a beam travelling `self` that strikes a mirror surface. Non-mirror
    /// surfaces do not reflect.
    pub const fn reflect(self, surface: Surface) -> Option<Direction> {
        match (self, surface) {
            (Direction::North, Surface::ReflectCw) => Some(Direction::West),
            (Direction::North, Surface::ReflectCcw) => Some(Direction::East),
            (Direction::East, Surface::ReflectCw) => Some(Direction::North),
            (Direction::East, Surface::ReflectCcw) => Some(Direction::South),
            (Direction::South, Surface::ReflectCw) => Some(Direction::East),
            (Direction::South, Surface::ReflectCcw) => Some(Direction::West),
            (Direction::West, Surface::ReflectCw) => Some(Direction::South),
            (Direction::West, Surface::ReflectCcw) => Some(Direction::North),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    RotateCw,
    RotateCcw,
    Pass,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::North,
        Action::NorthEast,
        Action::East,
        Action::SouthEast,
        Action::South,
        Action::SouthWest,
        Action::West,
        Action::NorthWest,
        Action::RotateCw,
        Action::RotateCcw,
        Action::Pass,
    ];

    /// Unit displacement; zero for rotations and pass.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Action::North => (0, 1),
            Action::NorthEast => (1, 1),
            Action::East => (1, 0),
            Action::SouthEast => (1, -1),
            Action::South => (0, -1),
            Action::SouthWest => (-1, -1),
            Action::West => (-1, 0),
            Action::NorthWest => (-1, 1),
            Action::RotateCw | Action::RotateCcw | Action::Pass => (0, 0),
        }
    }

    /// +1 for a clockwise quarter turn, -1 counter-clockwise, zero otherwise.
    pub const fn rotation(self) -> i8 {
        match self {
            Action::RotateCw => 1,
            Action::RotateCcw => -1,
            _ => 0,
        }
    }

    pub const fn is_rotation(self) -> bool {
        self.rotation() != 0
    }

    pub const fn is_directional(self) -> bool {
        !matches!(self, Action::RotateCw | Action::RotateCcw | Action::Pass)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Action::North => "NORTH",
            Action::NorthEast => "NORTH_EAST",
            Action::East => "EAST",
            Action::SouthEast => "SOUTH_EAST",
            Action::South => "SOUTH",
            Action::SouthWest => "SOUTH_WEST",
            Action::West => "WEST",
            Action::NorthWest => "NORTH_WEST",
            Action::RotateCw => "ROTATE_CW",
            Action::RotateCcw => "ROTATE_CCW",
            Action::Pass => "PASS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use Action::{
    East as E, North as N, NorthEast as NE, NorthWest as NW, RotateCcw as CCW_TURN,
    RotateCw as CW_TURN, South as S, SouthEast as SE, SouthWest as SW, West as W,
};

const PHARAOH_ACTIONS: &[Action] = &[N, NE, E, SE, S, SW, W, NW];
const MOBILE_ACTIONS: &[Action] = &[N, NE, E, SE, S, SW, W, NW, CW_TURN, CCW_TURN];
const SCARAB_ACTIONS: &[Action] = &[N, NE, E, SE, S, SW, W, NW, CW_TURN];
const SPHINX_ACTIONS: &[Action] = &[CW_TURN, CCW_TURN];

use Surface::{
    Blocker as BLK, EmitsLaser as EMIT, ReflectCcw as CCW, ReflectCw as CW, Vulnerable as VUL,
};

// Side order within each row: N, E, S, W.
const PHARAOH_SURFACES: [[Surface; 4]; 1] = [[VUL, VUL, VUL, VUL]];
const ANUBIS_SURFACES: [[Surface; 4]; 4] = [
    [BLK, VUL, VUL, VUL],
    [VUL, BLK, VUL, VUL],
    [VUL, VUL, BLK, VUL],
    [VUL, VUL, VUL, BLK],
];
const PYRAMID_SURFACES: [[Surface; 4]; 4] = [
    [CW, CCW, VUL, VUL],
    [VUL, CW, CCW, VUL],
    [VUL, VUL, CW, CCW],
    [CCW, VUL, VUL, CW],
];
const SCARAB_SURFACES: [[Surface; 4]; 2] = [[CW, CCW, CW, CCW], [CCW, CW, CCW, CW]];
const SPHINX_SURFACES: [[Surface; 4]; 4] = [
    [EMIT, BLK, BLK, BLK],
    [BLK, EMIT, BLK, BLK],
    [BLK, BLK, EMIT, BLK],
    [BLK, BLK, BLK, EMIT],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pharaoh,
    Anubis,
    Pyramid,
    Scarab,
    #[serde(alias = "sphynx")]
    Sphinx,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Pharaoh,
        PieceKind::Anubis,
        PieceKind::Pyramid,
        PieceKind::Scarab,
        PieceKind::Sphinx,
    ];

    /// Legal actions in declaration order; move enumeration follows this order.
    pub const fn allowed_actions(self) -> &'static [Action] {
        match self {
            PieceKind::Pharaoh => PHARAOH_ACTIONS,
            PieceKind::Anubis | PieceKind::Pyramid => MOBILE_ACTIONS,
            PieceKind::Scarab => SCARAB_ACTIONS,
            PieceKind::Sphinx => SPHINX_ACTIONS,
        }
    }

    pub const fn can_initiate_swap(self) -> bool {
        matches!(self, PieceKind::Scarab)
    }

    pub const fn can_be_swapped(self) -> bool {
        matches!(self, PieceKind::Anubis | PieceKind::Pyramid)
    }

    /// Number of distinct orientation states.
    pub const fn orientation_period(self) -> u8 {
        match self {
            PieceKind::Pharaoh => 1,
            PieceKind::Scarab => 2,
            PieceKind::Anubis | PieceKind::Pyramid | PieceKind::Sphinx => 4,
        }
    }

    pub const fn surfaces(self, orientation: u8) -> [Surface; 4] {
        let index = (orientation % self.orientation_period()) as usize;
        match self {
            PieceKind::Pharaoh => PHARAOH_SURFACES[index],
            PieceKind::Anubis => ANUBIS_SURFACES[index],
            PieceKind::Pyramid => PYRAMID_SURFACES[index],
            PieceKind::Scarab => SCARAB_SURFACES[index],
            PieceKind::Sphinx => SPHINX_SURFACES[index],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pharaoh => "pharaoh",
            PieceKind::Anubis => "anubis",
            PieceKind::Pyramid => "pyramid",
            PieceKind::Scarab => "scarab",
            PieceKind::Sphinx => "sphinx",
        }
    }

    /// Resolve an external kind name. `sphynx` is accepted as an alternate spelling.
    pub fn parse(name: &str) -> KhetResult<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "pharaoh" => Ok(PieceKind::Pharaoh),
            "anubis" => Ok(PieceKind::Anubis),
            "pyramid" => Ok(PieceKind::Pyramid),
            "scarab" => Ok(PieceKind::Scarab),
            "sphinx" | "sphynx" => Ok(PieceKind::Sphinx),
            _ => Err(KhetError::UnknownPieceKind(name.to_string())),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid coordinate: `x` is the column, `y` the row, with north pointing towards larger `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Shift by a unit delta. Only rejects negative coordinates; board bounds are the caller's
    /// concern.
    pub fn offset(self, (dx, dy): (i8, i8)) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self { x, y })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A placed piece. Equality and hashing cover kind, colour, position and orientation, which is
/// exactly what board deduplication needs. Surfaces are never stored; they are looked up from
/// the kind's table for the current orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    position: Position,
    orientation: u8,
}

impl Piece {
    /// Orientation is reduced modulo the kind's period (a Pharaoh is always 0, a Scarab 0 or 1).
    pub const fn new(kind: PieceKind, color: Color, position: Position, orientation: u8) -> Self {
        Self {
            kind,
            color,
            position,
            orientation: orientation % kind.orientation_period(),
        }
    }

    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn orientation(&self) -> u8 {
        self.orientation
    }

    pub const fn is_pharaoh(&self) -> bool {
        matches!(self.kind, PieceKind::Pharaoh)
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub const fn surfaces(&self) -> [Surface; 4] {
        self.kind.surfaces(self.orientation)
    }

    pub const fn side(&self, side: Direction) -> Surface {
        self.surfaces()[side.index()]
    }

    /// Surface struck by a beam travelling in `travel`, i.e. the side facing the beam.
    pub const fn surface_hit(&self, travel: Direction) -> Surface {
        self.side(travel.opposite())
    }

    pub const fn reflect(&self, travel: Direction) -> Option<Direction> {
        travel.reflect(self.surface_hit(travel))
    }

    pub fn allows(&self, action: Action) -> bool {
        self.kind.allowed_actions().contains(&action)
    }

    pub fn rotate_cw(&mut self) {
        let period = self.kind.orientation_period();
        self.orientation = (self.orientation + 1) % period;
    }

    pub fn rotate_ccw(&mut self) {
        let period = self.kind.orientation_period();
        self.orientation = (self.orientation + period - 1) % period;
    }

    /// Fire direction; only a Sphinx emits.
    pub const fn laser_direction(&self) -> Option<Direction> {
        match self.kind {
            PieceKind::Sphinx => Some(Direction::from_orientation(self.orientation)),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at {} (orientation {})",
            self.color, self.kind, self.position, self.orientation
        )
    }
}
