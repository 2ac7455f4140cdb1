// greedy first-fit placement evaluator.
//
// scoring one individual means walking its genes in order and committing each
// box to the first row-major position where its full footprint is inside the
// grid, empty, and available in the mask. genes that find no position are
// skipped; later genes may still fit. the score is the number of genes placed.
//
// evaluation is pure and draws no randomness, so a whole population can be
// scored in parallel: every call allocates its own occupancy grid and reads
// only the shared immutable mask and catalog.

use rayon::prelude::*;

use crate::catalog::BoxSpec;
use crate::dna::Individual;
use crate::grid::Mask;

/// one successfully placed box. `id` is 1-based and sequential within a
/// single evaluation; `width`/`height` are the oriented dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub id: u32,
    pub box_index: usize,
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

/// result of scoring one individual. placements are in gene-processing
/// order, not sorted by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub score: usize,
    pub placements: Vec<Placement>,
}

/// scratch grid for one evaluation: 0 = empty, otherwise the placement id
/// occupying the cell. never shared between evaluations.
struct OccupancyGrid {
    width: usize,
    cells: Vec<u32>,
}

impl OccupancyGrid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            cells: vec![0; width * height],
        }
    }

    fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.width + col]
    }

    fn set(&mut self, row: usize, col: usize, id: u32) {
        self.cells[row * self.width + col] = id;
    }
}

/// whether an `height × width` footprint with its top-left corner at
/// (row, col) lies fully inside the grid, over empty cells, and over
/// available mask cells.
fn can_place(
    grid: &OccupancyGrid,
    mask: &Mask,
    row: usize,
    col: usize,
    width: usize,
    height: usize,
) -> bool {
    if row + height > mask.height() || col + width > mask.width() {
        return false;
    }
    for r in row..row + height {
        for c in col..col + width {
            if grid.get(r, c) != 0 || !mask.is_available(r, c) {
                return false;
            }
        }
    }
    true
}

fn stamp(grid: &mut OccupancyGrid, row: usize, col: usize, width: usize, height: usize, id: u32) {
    for r in row..row + height {
        for c in col..col + width {
            grid.set(r, c, id);
        }
    }
}

/// score one individual against the mask and catalog. pure: no side effects
/// beyond its own fresh occupancy grid, fully deterministic given its inputs.
pub fn evaluate(individual: &Individual, mask: &Mask, boxes: &[BoxSpec]) -> Evaluation {
    profiling::scope!("evaluate");
    let mut grid = OccupancyGrid::new(mask.width(), mask.height());
    let mut placements = Vec::new();
    let mut next_id: u32 = 1;

    for gene in &individual.genes {
        let (width, height) = boxes[gene.box_index].oriented(gene.rotated);

        // first-fit scan: top row first, left to right. commit to the first
        // valid corner; no backtracking, no search for a better one.
        'scan: for row in 0..mask.height() {
            for col in 0..mask.width() {
                if can_place(&grid, mask, row, col, width, height) {
                    stamp(&mut grid, row, col, width, height, next_id);
                    placements.push(Placement {
                        id: next_id,
                        box_index: gene.box_index,
                        row,
                        col,
                        width,
                        height,
                    });
                    next_id += 1;
                    break 'scan;
                }
            }
        }
        // no valid corner: the gene is skipped and scoring continues.
    }

    Evaluation {
        score: placements.len(),
        placements,
    }
}

/// an individual paired with its score.
#[derive(Clone, Debug)]
pub struct ScoredIndividual {
    pub score: usize,
    pub individual: Individual,
}

/// score a whole population in parallel and sort it best-first. the sort is
/// stable, so equal scores keep their prior relative order.
pub fn score_population(
    population: &[Individual],
    mask: &Mask,
    boxes: &[BoxSpec],
) -> Vec<ScoredIndividual> {
    profiling::scope!("score_population");
    let mut scored: Vec<ScoredIndividual> = population
        .par_iter()
        .map(|individual| ScoredIndividual {
            score: evaluate(individual, mask, boxes).score,
            individual: individual.clone(),
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
