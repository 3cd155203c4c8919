//! Locating the eight corner cubelets of a cube from its stickers.
//!
//! Every corner has exactly one sticker from each of the color pairs
//! white/yellow, red/orange and blue/green. Which member of each pair is
//! present identifies the cubelet, and where the white/yellow sticker sits
//! identifies its twist.

use crate::puzzle::{Color, CubeState, Face};

pub const CORNER_COUNT: usize = 8;
pub const CORNER_ORIENTATION_COUNT: u8 = 3;

/// The three (face, row, col) coordinates of each corner slot. The first
/// sticker is always on the Up or Down face, the second on Front or Back and
/// the third on Left or Right.
const CORNER_STICKERS: [[(Face, usize, usize); 3]; CORNER_COUNT] = [
    // UFR
    [(Face::Up, 2, 2), (Face::Front, 0, 2), (Face::Right, 0, 0)],
    // UFL
    [(Face::Up, 2, 0), (Face::Front, 0, 0), (Face::Left, 0, 2)],
    // UBL
    [(Face::Up, 0, 0), (Face::Back, 0, 2), (Face::Left, 0, 0)],
    // UBR
    [(Face::Up, 0, 2), (Face::Back, 0, 0), (Face::Right, 0, 2)],
    // DFR
    [(Face::Down, 0, 2), (Face::Front, 2, 2), (Face::Right, 2, 0)],
    // DFL
    [(Face::Down, 0, 0), (Face::Front, 2, 0), (Face::Left, 2, 2)],
    // DBR
    [(Face::Down, 2, 2), (Face::Back, 2, 0), (Face::Right, 2, 2)],
    // DBL
    [(Face::Down, 2, 0), (Face::Back, 2, 2), (Face::Left, 2, 0)],
];

/// Corner queries available on every cube encoding.
pub trait CornerLocator: CubeState {
    /// The colors of the three stickers of corner `slot`, in the slot's fixed
    /// coordinate order.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not in `0..8`.
    fn corner_colors(&self, slot: usize) -> [Color; 3] {
        CORNER_STICKERS[slot].map(|(face, row, col)| self.color(face, row, col))
    }

    /// The corner colors as letters, for example `"WRB"`.
    fn corner_color_string(&self, slot: usize) -> String {
        self.corner_colors(slot).iter().map(|c| c.letter()).collect()
    }

    /// A 3 bit code identifying which cubelet sits in `slot`: bit 2 is set
    /// for yellow, bit 1 for orange and bit 0 for green.
    fn corner_identity(&self, slot: usize) -> u8 {
        self.corner_colors(slot)
            .into_iter()
            .fold(0, |identity, color| match color {
                Color::Yellow => identity | 0b100,
                Color::Orange => identity | 0b010,
                Color::Green => identity | 0b001,
                Color::White | Color::Red | Color::Blue => identity,
            })
    }

    /// The twist of the cubelet in `slot`: the position of its white or
    /// yellow sticker among the slot's three coordinates.
    ///
    /// A corner without a white or yellow sticker cannot come from a real
    /// cube. It panics in debug builds and reads as untwisted otherwise.
    fn corner_orientation(&self, slot: usize) -> u8 {
        let colors = self.corner_colors(slot);
        let position = colors
            .iter()
            .position(|&c| c == Color::White || c == Color::Yellow);
        debug_assert!(
            position.is_some(),
            "corner {slot} has no white or yellow sticker: {colors:?}"
        );
        match position {
            Some(0) | None => 0,
            Some(1) => 1,
            Some(_) => 2,
        }
    }

    /// The cubelet identity of every slot.
    fn corner_permutation(&self) -> [u8; CORNER_COUNT] {
        std::array::from_fn(|slot| self.corner_identity(slot))
    }

    /// The twist of every slot.
    fn corner_orientations(&self) -> [u8; CORNER_COUNT] {
        std::array::from_fn(|slot| self.corner_orientation(slot))
    }
}

impl<C: CubeState> CornerLocator for C {}
