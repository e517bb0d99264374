//! Falling shape instances and the rotation engine

use crate::template::{COLORS, TEMPLATES, Template};
use rand::Rng;

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// One polyomino instance with its color baked into the occupied cells
///
/// Cells use the same convention as the board: zero is empty, anything
/// else is the packed ARGB color of the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    /// Row-major cells, indexed `x + y * width`
    cells: Vec<u32>,
}

impl Shape {
    /// Stamp a template with a color
    pub fn from_template(template: &Template, color: u32) -> Self {
        let cells = template
            .cells
            .iter()
            .map(|&occupied| if occupied != 0 { color } else { 0 })
            .collect();
        Self {
            width: template.width,
            height: template.height,
            cells,
        }
    }

    /// Pick a template and a color uniformly at random
    pub fn random(rng: &mut impl Rng) -> Self {
        let template = &TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
        let color = COLORS[rng.gen_range(0..COLORS.len())];
        Self::from_template(template, color)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell value at (x, y) within the bounding box
    pub fn cell(&self, x: usize, y: usize) -> u32 {
        self.cells[x + y * self.width]
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cell(x, y) != 0
    }

    /// Produce a new shape rotated 90 degrees; the original is untouched
    ///
    /// The bounding box swaps dimensions. Callers validate the candidate
    /// against the board before committing it.
    pub fn rotated(&self, direction: RotationDirection) -> Shape {
        let width = self.height;
        let height = self.width;
        let mut cells = vec![0u32; width * height];

        for px in 0..self.width {
            for py in 0..self.height {
                let (new_x, new_y) = match direction {
                    RotationDirection::CounterClockwise => (self.height - 1 - py, px),
                    RotationDirection::Clockwise => (py, self.width - 1 - px),
                };
                cells[new_x + new_y * width] = self.cell(px, py);
            }
        }

        Shape {
            width,
            height,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{I_TEMPLATE, T_TEMPLATE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_from_template_colors_occupied_cells_only() {
        let shape = Shape::from_template(&T_TEMPLATE, COLORS[0]);
        assert_eq!(shape.cell(0, 0), COLORS[0]);
        assert_eq!(shape.cell(1, 1), COLORS[0]);
        assert_eq!(shape.cell(0, 1), 0);
        assert_eq!(shape.cell(2, 1), 0);
    }

    #[test]
    fn test_random_shape_matches_a_template() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            let shape = Shape::random(&mut rng);
            let occupied = (0..shape.width())
                .flat_map(|x| (0..shape.height()).map(move |y| (x, y)))
                .filter(|&(x, y)| shape.is_occupied(x, y))
                .count();
            assert_eq!(occupied, 4);
        }
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let shape = Shape::from_template(&T_TEMPLATE, COLORS[1]);
        let rotated = shape.rotated(RotationDirection::Clockwise);
        assert_eq!(rotated.width(), shape.height());
        assert_eq!(rotated.height(), shape.width());
    }

    #[test]
    fn test_clockwise_then_counterclockwise_is_identity() {
        for template in &TEMPLATES {
            let shape = Shape::from_template(template, COLORS[2]);
            let round_trip = shape
                .rotated(RotationDirection::Clockwise)
                .rotated(RotationDirection::CounterClockwise);
            assert_eq!(round_trip, shape);
        }
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for direction in [
            RotationDirection::Clockwise,
            RotationDirection::CounterClockwise,
        ] {
            for template in &TEMPLATES {
                let shape = Shape::from_template(template, COLORS[3]);
                let mut turned = shape.clone();
                for _ in 0..4 {
                    turned = turned.rotated(direction);
                }
                assert_eq!(turned, shape);
            }
        }
    }

    #[test]
    fn test_vertical_bar_rotates_flat() {
        let bar = Shape::from_template(&I_TEMPLATE, COLORS[4]);
        let flat = bar.rotated(RotationDirection::CounterClockwise);
        assert_eq!(flat.width(), 4);
        assert_eq!(flat.height(), 1);
        for x in 0..4 {
            assert_eq!(flat.cell(x, 0), COLORS[4]);
        }
    }
}
