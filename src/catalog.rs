// the box catalog: the immutable set of rectangles the search tries to place.
// boxes are referenced everywhere else by their 0-based index into this list.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// one catalog entry. dimensions are in grid cells and never change after setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub width: usize,
    pub height: usize,
}

impl BoxSpec {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// effective (width, height) for evaluation. rotation swaps the axes but
    /// leaves the catalog entry itself untouched.
    pub fn oriented(self, rotated: bool) -> (usize, usize) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// generate a random catalog of `count` boxes with inclusive size bounds.
/// bounds must already be validated (positive, min <= max) at the settings
/// boundary.
pub fn generate_boxes<R: Rng>(
    count: usize,
    min_width: usize,
    max_width: usize,
    min_height: usize,
    max_height: usize,
    rng: &mut R,
) -> Vec<BoxSpec> {
    (0..count)
        .map(|_| {
            BoxSpec::new(
                rng.random_range(min_width..=max_width),
                rng.random_range(min_height..=max_height),
            )
        })
        .collect()
}
