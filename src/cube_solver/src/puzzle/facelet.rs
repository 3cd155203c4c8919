//! A flat array of all 54 stickers, face after face in row-major order.

use super::{Color, CubeState, Face};

const STICKERS_PER_FACE: usize = 9;

type Coord = (usize, usize);

/// The (row, col) coordinates of the side stickers moved by a clockwise
/// quarter turn of each face, indexed by `Face`. Entry `i` of a cycle receives
/// the stickers of entry `i + 1`, and the last entry receives those of the
/// first.
const SIDE_CYCLES: [[(Face, [Coord; 3]); 4]; 6] = [
    // Up
    [
        (Face::Front, [(0, 0), (0, 1), (0, 2)]),
        (Face::Right, [(0, 0), (0, 1), (0, 2)]),
        (Face::Back, [(0, 0), (0, 1), (0, 2)]),
        (Face::Left, [(0, 0), (0, 1), (0, 2)]),
    ],
    // Left
    [
        (Face::Front, [(0, 0), (1, 0), (2, 0)]),
        (Face::Up, [(0, 0), (1, 0), (2, 0)]),
        (Face::Back, [(2, 2), (1, 2), (0, 2)]),
        (Face::Down, [(0, 0), (1, 0), (2, 0)]),
    ],
    // Front
    [
        (Face::Up, [(2, 2), (2, 1), (2, 0)]),
        (Face::Left, [(0, 2), (1, 2), (2, 2)]),
        (Face::Down, [(0, 0), (0, 1), (0, 2)]),
        (Face::Right, [(2, 0), (1, 0), (0, 0)]),
    ],
    // Right
    [
        (Face::Up, [(0, 2), (1, 2), (2, 2)]),
        (Face::Front, [(0, 2), (1, 2), (2, 2)]),
        (Face::Down, [(0, 2), (1, 2), (2, 2)]),
        (Face::Back, [(2, 0), (1, 0), (0, 0)]),
    ],
    // Back
    [
        (Face::Up, [(0, 0), (0, 1), (0, 2)]),
        (Face::Right, [(0, 2), (1, 2), (2, 2)]),
        (Face::Down, [(2, 2), (2, 1), (2, 0)]),
        (Face::Left, [(2, 0), (1, 0), (0, 0)]),
    ],
    // Down
    [
        (Face::Front, [(2, 2), (2, 1), (2, 0)]),
        (Face::Left, [(2, 2), (2, 1), (2, 0)]),
        (Face::Back, [(2, 2), (2, 1), (2, 0)]),
        (Face::Right, [(2, 2), (2, 1), (2, 0)]),
    ],
];

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FaceletCube {
    stickers: [Color; 6 * STICKERS_PER_FACE],
}

fn sticker_index(face: Face, (row, col): Coord) -> usize {
    assert!(row < 3 && col < 3, "sticker ({row}, {col}) is off the face");
    face as usize * STICKERS_PER_FACE + row * 3 + col
}

impl CubeState for FaceletCube {
    fn solved() -> Self {
        FaceletCube {
            stickers: std::array::from_fn(|i| Color::ALL[i / STICKERS_PER_FACE]),
        }
    }

    fn color(&self, face: Face, row: usize, col: usize) -> Color {
        self.stickers[sticker_index(face, (row, col))]
    }

    fn is_solved(&self) -> bool {
        self.stickers
            .chunks_exact(STICKERS_PER_FACE)
            .zip(Color::ALL)
            .all(|(face, color)| face.iter().all(|&sticker| sticker == color))
    }

    fn apply_quarter_turn(&mut self, face: Face) {
        let base = face as usize * STICKERS_PER_FACE;
        let old: [Color; STICKERS_PER_FACE] =
            std::array::from_fn(|i| self.stickers[base + i]);
        for row in 0..3 {
            for col in 0..3 {
                self.stickers[base + row * 3 + col] = old[(2 - col) * 3 + row];
            }
        }

        let cycle = &SIDE_CYCLES[face as usize];
        let (first_face, first_coords) = cycle[0];
        let saved = first_coords.map(|coord| self.stickers[sticker_index(first_face, coord)]);
        for pair in cycle.windows(2) {
            let (dst_face, dst_coords) = pair[0];
            let (src_face, src_coords) = pair[1];
            for (dst, src) in dst_coords.into_iter().zip(src_coords) {
                self.stickers[sticker_index(dst_face, dst)] =
                    self.stickers[sticker_index(src_face, src)];
            }
        }
        let (last_face, last_coords) = cycle[3];
        for (dst, color) in last_coords.into_iter().zip(saved) {
            self.stickers[sticker_index(last_face, dst)] = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_turn_rotates_grid_clockwise() {
        let mut state = FaceletCube::solved();
        // Mark the front face so the rotation itself is observable
        state.stickers[sticker_index(Face::Front, (0, 0))] = Color::Yellow;
        state.apply_quarter_turn(Face::Front);
        assert_eq!(state.color(Face::Front, 0, 2), Color::Yellow);
        assert_eq!(state.color(Face::Front, 0, 0), Color::Red);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no white or yellow sticker")]
    fn test_corner_without_reference_color_panics() {
        use crate::corners::CornerLocator;

        let mut state = FaceletCube::solved();
        // UFR is read from Up (2, 2) first
        state.stickers[sticker_index(Face::Up, (2, 2))] = Color::Red;
        let _ = state.corner_orientation(0);
    }

    #[test]
    #[should_panic(expected = "off the face")]
    fn test_off_face_panics() {
        let _ = FaceletCube::solved().color(Face::Up, 3, 0);
    }
}
