//! A bit-packed cube where every face is a single `u64`.
//!
//! The eight perimeter stickers of a face each take one byte holding a one-hot
//! color (bit `c` set for `Color::ALL[c]`). Stickers are numbered clockwise
//! from the top left corner:
//!
//! ```text
//! 0 1 2
//! 7 8 3
//! 6 5 4
//! ```
//!
//! The center (8) never moves, so it is not stored. With this layout a
//! clockwise quarter turn of the face itself is a rotation of the word by two
//! stickers.

use super::{Color, CubeState, Face, Move};

const STICKER_BITS: u32 = 8;
const STICKER_MASK: u64 = (1 << STICKER_BITS) - 1;
const CENTER: u8 = 8;

const PERIMETER_INDEX: [[u8; 3]; 3] = [[0, 1, 2], [7, CENTER, 3], [6, 5, 4]];

/// The side strips moved by a turn of each face, indexed by `Face`. Each strip
/// is three perimeter stickers starting at the given index and running
/// clockwise. A clockwise quarter turn moves the strip of entry `i + 1` into
/// entry `i`, and the last entry receives the strip of the first.
const SIDE_STRIPS: [[(Face, u8); 4]; 6] = [
    // Up
    [(Face::Front, 0), (Face::Right, 0), (Face::Back, 0), (Face::Left, 0)],
    // Left
    [(Face::Front, 6), (Face::Up, 6), (Face::Back, 2), (Face::Down, 6)],
    // Front
    [(Face::Up, 4), (Face::Left, 2), (Face::Down, 0), (Face::Right, 6)],
    // Right
    [(Face::Up, 2), (Face::Front, 2), (Face::Down, 2), (Face::Back, 6)],
    // Back
    [(Face::Up, 0), (Face::Right, 2), (Face::Down, 4), (Face::Left, 6)],
    // Down
    [(Face::Front, 4), (Face::Left, 4), (Face::Back, 4), (Face::Right, 4)],
];

const STRIP_MASK: u64 = (1 << (3 * STICKER_BITS)) - 1;

fn strip_mask(start: u8) -> u64 {
    STRIP_MASK.rotate_left(STICKER_BITS * u32::from(start))
}

const SOLVED_FACES: [u64; 6] = {
    let mut faces = [0; 6];
    let mut face = 0;
    while face < faces.len() {
        let one_hot = 1 << face;
        let mut sticker = 0;
        while sticker < 8 {
            faces[face] |= one_hot << (STICKER_BITS * sticker);
            sticker += 1;
        }
        face += 1;
    }
    faces
};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct BitboardCube {
    faces: [u64; 6],
}

impl BitboardCube {
    fn sticker(&self, face: Face, index: u8) -> u64 {
        (self.faces[face as usize] >> (STICKER_BITS * u32::from(index))) & STICKER_MASK
    }

    /// Turn `face` clockwise by `quarter_turns` quarter turns. Every strip is
    /// moved as a whole by rotating its source word until the strip lines up
    /// with its destination.
    fn turn(&mut self, face: Face, quarter_turns: u8) {
        let quarter_turns = usize::from(quarter_turns % 4);
        let word = &mut self.faces[face as usize];
        *word = word.rotate_left(2 * STICKER_BITS * quarter_turns as u32);

        let cycle = &SIDE_STRIPS[face as usize];
        let strips = cycle.map(|(side, start)| self.faces[side as usize] & strip_mask(start));
        for (i, &(dst_face, dst_start)) in cycle.iter().enumerate() {
            let src = (i + quarter_turns) % 4;
            let src_start = cycle[src].1;
            let shift = (dst_start + 8 - src_start) % 8;
            let moved = strips[src].rotate_left(STICKER_BITS * u32::from(shift));
            let word = &mut self.faces[dst_face as usize];
            *word = (*word & !strip_mask(dst_start)) | moved;
        }
    }
}

impl CubeState for BitboardCube {
    fn solved() -> Self {
        BitboardCube {
            faces: SOLVED_FACES,
        }
    }

    fn color(&self, face: Face, row: usize, col: usize) -> Color {
        let index = PERIMETER_INDEX[row][col];
        if index == CENTER {
            return face.solved_color();
        }
        Color::ALL[self.sticker(face, index).trailing_zeros() as usize]
    }

    fn is_solved(&self) -> bool {
        self.faces == SOLVED_FACES
    }

    fn apply_quarter_turn(&mut self, face: Face) {
        self.turn(face, 1);
    }

    fn apply_move(&mut self, move_: Move) {
        self.turn(move_.face, move_.quarter_turns());
    }
}
