use itertools::Itertools;
use std::{
    fmt::{self, Debug, Display, Write as _},
    hash::Hash,
    str::FromStr,
};
use thiserror::Error;

pub mod bitboard;
pub mod facelet;

/// The six faces of the cube. The discriminant doubles as the index of the
/// face's solved color in `Color::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Up,
    Left,
    Front,
    Right,
    Back,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Green,
    Red,
    Blue,
    Orange,
    Yellow,
}

/// The direction a face is turned in. `CounterClockwise` is written with a
/// prime and `Half` with a 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Half,
}

/// One of the 18 face turns of the 3x3x3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("Cannot parse an empty move")]
    Empty,
    #[error("Unknown face `{0}`, expected one of U L F R B D")]
    UnknownFace(char),
    #[error("Unknown turn suffix `{0}`, expected nothing, `'` or `2`")]
    UnknownSuffix(String),
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Left,
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Down,
    ];

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Left => 'L',
            Face::Front => 'F',
            Face::Right => 'R',
            Face::Back => 'B',
            Face::Down => 'D',
        }
    }

    #[must_use]
    pub fn solved_color(self) -> Color {
        Color::ALL[self as usize]
    }
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::Orange,
        Color::Yellow,
    ];

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Green => 'G',
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
        }
    }
}

impl Move {
    /// Every move, grouped by face in the order L R U D F B and within a face
    /// in the order clockwise, counter-clockwise, half turn.
    pub const ALL: [Move; 18] = {
        const FACES: [Face; 6] = [
            Face::Left,
            Face::Right,
            Face::Up,
            Face::Down,
            Face::Front,
            Face::Back,
        ];
        const TURNS: [Turn; 3] = [Turn::Clockwise, Turn::CounterClockwise, Turn::Half];
        let mut arr = [Move::new(Face::Up, Turn::Clockwise); 18];
        let mut i = 0;
        while i < arr.len() {
            arr[i] = Move::new(FACES[i / 3], TURNS[i % 3]);
            i += 1;
        }
        arr
    };

    #[must_use]
    pub const fn new(face: Face, turn: Turn) -> Self {
        Move { face, turn }
    }

    /// The move that undoes `self`. Half turns are their own inverse.
    #[must_use]
    pub fn inverse(self) -> Self {
        let turn = match self.turn {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
            Turn::Half => Turn::Half,
        };
        Move::new(self.face, turn)
    }

    /// The number of clockwise quarter turns equivalent to this move.
    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        match self.turn {
            Turn::Clockwise => 1,
            Turn::Half => 2,
            Turn::CounterClockwise => 3,
        }
    }

    /// The position of this move in `Move::ALL`.
    #[must_use]
    pub fn index(self) -> usize {
        let face_index = match self.face {
            Face::Left => 0,
            Face::Right => 1,
            Face::Up => 2,
            Face::Down => 3,
            Face::Front => 4,
            Face::Back => 5,
        };
        let turn_index = match self.turn {
            Turn::Clockwise => 0,
            Turn::CounterClockwise => 1,
            Turn::Half => 2,
        };
        face_index * 3 + turn_index
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.turn {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Half => "2",
        };
        write!(f, "{}{suffix}", self.face.letter())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = match chars.next() {
            None => return Err(MoveParseError::Empty),
            Some('U') => Face::Up,
            Some('L') => Face::Left,
            Some('F') => Face::Front,
            Some('R') => Face::Right,
            Some('B') => Face::Back,
            Some('D') => Face::Down,
            Some(c) => return Err(MoveParseError::UnknownFace(c)),
        };
        let turn = match chars.as_str() {
            "" => Turn::Clockwise,
            "'" => Turn::CounterClockwise,
            "2" => Turn::Half,
            suffix => return Err(MoveParseError::UnknownSuffix(suffix.to_owned())),
        };
        Ok(Move::new(face, turn))
    }
}

/// Parse a whitespace separated move sequence such as `"R U' F2"`.
///
/// # Errors
///
/// If any of the moves is not valid notation. See `MoveParseError`.
pub fn parse_moves(moves: &str) -> Result<Vec<Move>, MoveParseError> {
    moves.split_whitespace().map(str::parse).collect()
}

/// Format a move sequence back into notation.
#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().join(" ")
}

/// Pick `count` uniformly random moves. The generator is supplied by the
/// caller so that a seeded generator reproduces the same shuffle.
pub fn random_moves(rng: &mut fastrand::Rng, count: usize) -> Vec<Move> {
    (0..count)
        .map(|_| Move::ALL[rng.usize(..Move::ALL.len())])
        .collect()
}

/// The state of a 3x3x3 cube, as seen through its 54 stickers.
///
/// Every encoding must produce identical colors for identical move
/// sequences. Search code only ever interacts with a cube through this trait.
pub trait CubeState: Clone + PartialEq + Eq + Hash + Debug {
    /// The solved cube.
    fn solved() -> Self;

    /// The color of the sticker at `row` and `col` of `face`, where row 0 is
    /// the top row when looking at the face from outside the cube. The Up
    /// face's row 2 borders the Front face and the Down face's row 0 borders
    /// the Front face.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is not in `0..3`.
    fn color(&self, face: Face, row: usize, col: usize) -> Color;

    /// Whether every face shows only its own solved color.
    fn is_solved(&self) -> bool;

    /// Turn `face` clockwise by a quarter turn in place.
    fn apply_quarter_turn(&mut self, face: Face);

    /// Apply `move_` in place.
    fn apply_move(&mut self, move_: Move) {
        for _ in 0..move_.quarter_turns() {
            self.apply_quarter_turn(move_.face);
        }
    }

    /// Apply each move of `moves` in order, in place.
    fn apply_moves(&mut self, moves: &[Move]) {
        for &move_ in moves {
            self.apply_move(move_);
        }
    }

    /// A copy of `self` with `move_` applied. `self` is left untouched.
    #[must_use]
    fn with_move(&self, move_: Move) -> Self {
        let mut next = self.clone();
        next.apply_move(move_);
        next
    }

    /// How many stickers of each color, indexed like `Color::ALL`, are on the
    /// cube.
    fn sticker_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for face in Face::ALL {
            for row in 0..3 {
                for col in 0..3 {
                    counts[self.color(face, row, col) as usize] += 1;
                }
            }
        }
        counts
    }
}

/// Render `state` as a planar cross: Up on top, then Left Front Right Back,
/// then Down.
pub fn render_net<C: CubeState>(state: &C) -> String {
    let mut net = String::new();
    let row_letters = |face: Face, row: usize| {
        (0..3)
            .map(|col| state.color(face, row, col).letter())
            .join(" ")
    };
    for row in 0..3 {
        let _ = writeln!(net, "{:7}{}", "", row_letters(Face::Up, row));
    }
    for row in 0..3 {
        let line = [Face::Left, Face::Front, Face::Right, Face::Back]
            .map(|face| row_letters(face, row))
            .join("  ");
        let _ = writeln!(net, "{line}");
    }
    for row in 0..3 {
        let _ = writeln!(net, "{:7}{}", "", row_letters(Face::Down, row));
    }
    net
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{bitboard::BitboardCube, facelet::FaceletCube, *};

    pub fn apply_moves<C: CubeState>(state: &C, moves: &str, repeat: u32) -> C {
        let moves = parse_moves(moves).unwrap();
        let mut result = state.clone();
        for _ in 0..repeat {
            result.apply_moves(&moves);
        }
        result
    }

    fn solved_is_solved<C: CubeState>() {
        let solved = C::solved();
        assert!(solved.is_solved());
        for face in Face::ALL {
            for row in 0..3 {
                for col in 0..3 {
                    assert_eq!(solved.color(face, row, col), face.solved_color());
                }
            }
        }
    }

    #[test]
    fn test_solved_is_solved() {
        solved_is_solved::<BitboardCube>();
        solved_is_solved::<FaceletCube>();
    }

    fn move_then_inverse<C: CubeState>() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut state = C::solved();
        for _ in 0..20 {
            for move_ in Move::ALL {
                let before = state.clone();
                state.apply_move(move_);
                assert_ne!(state, before, "{move_} must change the cube");
                state.apply_move(move_.inverse());
                assert_eq!(state, before, "{move_} followed by its inverse");
            }
            state.apply_moves(&random_moves(&mut rng, 7));
        }
    }

    #[test]
    fn test_move_then_inverse() {
        move_then_inverse::<BitboardCube>();
        move_then_inverse::<FaceletCube>();
    }

    fn move_order<C: CubeState>() {
        let scrambled = apply_moves(&C::solved(), "F2 L' U2 F U F U L' B U' F' U D2 L F2 B'", 1);
        for move_ in Move::ALL {
            let repeat = if move_.turn == Turn::Half { 2 } else { 4 };
            let mut state = scrambled.clone();
            for i in 1..=repeat {
                state.apply_move(move_);
                if i < repeat {
                    assert_ne!(state, scrambled, "{move_} has order {repeat}");
                }
            }
            assert_eq!(state, scrambled, "{move_} has order {repeat}");
        }
    }

    #[test]
    fn test_move_order() {
        move_order::<BitboardCube>();
        move_order::<FaceletCube>();
    }

    fn sticker_counts_invariant<C: CubeState>() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..50 {
            let mut state = C::solved();
            state.apply_moves(&random_moves(&mut rng, 30));
            assert_eq!(state.sticker_counts(), [9; 6]);
        }
    }

    #[test]
    fn test_sticker_counts_invariant() {
        sticker_counts_invariant::<BitboardCube>();
        sticker_counts_invariant::<FaceletCube>();
    }

    fn with_move_does_not_alias<C: CubeState>() {
        let original = C::solved();
        let mut copy = original.clone();
        copy.apply_move(Move::ALL[0]);
        let branched = original.with_move(Move::ALL[5]);
        assert!(original.is_solved());
        assert!(!copy.is_solved());
        assert!(!branched.is_solved());
        assert_ne!(copy, branched);
    }

    #[test]
    fn test_with_move_does_not_alias() {
        with_move_does_not_alias::<BitboardCube>();
        with_move_does_not_alias::<FaceletCube>();
    }

    fn sexy_move_cycle<C: CubeState>() {
        let solved = C::solved();
        for i in 1..6 {
            assert!(!apply_moves(&solved, "R U R' U'", i).is_solved());
        }
        assert!(apply_moves(&solved, "R U R' U'", 6).is_solved());
        assert!(apply_moves(&solved, "R F", 105).is_solved());
        assert!(!apply_moves(&solved, "R F", 35).is_solved());
    }

    #[test]
    fn test_sexy_move_cycle() {
        sexy_move_cycle::<BitboardCube>();
        sexy_move_cycle::<FaceletCube>();
    }

    #[test]
    fn test_encodings_agree() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let moves = random_moves(&mut rng, 25);
            let mut bitboard = BitboardCube::solved();
            let mut facelet = FaceletCube::solved();
            for &move_ in &moves {
                bitboard.apply_move(move_);
                facelet.apply_move(move_);
                assert_eq!(bitboard.is_solved(), facelet.is_solved());
                for face in Face::ALL {
                    for row in 0..3 {
                        for col in 0..3 {
                            assert_eq!(
                                bitboard.color(face, row, col),
                                facelet.color(face, row, col),
                                "{} differs after {}",
                                face.letter(),
                                format_moves(&moves)
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_turn_geometry() {
        // U moves the front top row to the left face
        let state = apply_moves(&BitboardCube::solved(), "U", 1);
        for col in 0..3 {
            assert_eq!(state.color(Face::Left, 0, col), Color::Red);
            assert_eq!(state.color(Face::Front, 0, col), Color::Blue);
            assert_eq!(state.color(Face::Left, 1, col), Color::Green);
        }
        // R moves the front right column to the up face
        let state = apply_moves(&BitboardCube::solved(), "R", 1);
        for row in 0..3 {
            assert_eq!(state.color(Face::Up, row, 2), Color::Red);
            assert_eq!(state.color(Face::Back, row, 0), Color::White);
            assert_eq!(state.color(Face::Up, row, 1), Color::White);
        }
    }

    #[test]
    fn test_parse_moves() {
        let moves = parse_moves("R U' F2  L").unwrap();
        assert_eq!(
            moves,
            vec![
                Move::new(Face::Right, Turn::Clockwise),
                Move::new(Face::Up, Turn::CounterClockwise),
                Move::new(Face::Front, Turn::Half),
                Move::new(Face::Left, Turn::Clockwise),
            ]
        );
        assert_eq!(format_moves(&moves), "R U' F2 L");
        assert_eq!("X".parse::<Move>(), Err(MoveParseError::UnknownFace('X')));
        assert_eq!(
            "R3".parse::<Move>(),
            Err(MoveParseError::UnknownSuffix("3".to_owned()))
        );
        assert_eq!("".parse::<Move>(), Err(MoveParseError::Empty));
    }

    #[test]
    fn test_move_index() {
        for (i, move_) in Move::ALL.into_iter().enumerate() {
            assert_eq!(move_.index(), i);
            assert_eq!(move_.to_string().parse::<Move>(), Ok(move_));
        }
        assert_eq!(format_moves(&Move::ALL[..3]), "L L' L2");
    }

    #[test]
    fn test_random_moves_are_reproducible() {
        let a = random_moves(&mut fastrand::Rng::with_seed(3), 20);
        let b = random_moves(&mut fastrand::Rng::with_seed(3), 20);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn test_render_net() {
        let net = render_net(&BitboardCube::solved());
        let lines: Vec<_> = net.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "       W W W");
        assert_eq!(lines[3], "G G G  R R R  B B B  O O O");
        assert_eq!(lines[8], "       Y Y Y");
    }
}
