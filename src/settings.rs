// run configuration for gridpack.
//
// everything the core assumes about its inputs is checked here, at the
// boundary: the engine and evaluator never re-validate. settings round-trip
// through a JSON file next to the binary so runs are easy to repeat.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::EvolutionParams;
use crate::grid::Mask;

/// a rectangle of grid cells removed from the availability mask.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BlockedRect {
    pub top: usize,
    pub left: usize,
    pub height: usize,
    pub width: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppSettings {
    /// seed for the run's single RNG; identical settings reproduce the run.
    pub seed: u64,

    // grid
    pub grid_width: usize,
    pub grid_height: usize,
    /// regions blocked out of the mask before the search starts.
    pub blocked: Vec<BlockedRect>,

    // catalog
    pub box_count: usize,
    pub min_box_width: usize,
    pub max_box_width: usize,
    pub min_box_height: usize,
    pub max_box_height: usize,

    // evolution
    pub generations: u32,
    pub population_size: usize,
    /// probability each child is mutated, in [0, 1].
    pub mutation_rate: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            seed: 44,
            grid_width: 16,
            grid_height: 16,
            blocked: Vec::new(),
            box_count: 150,
            min_box_width: 1,
            max_box_width: 5,
            min_box_height: 1,
            max_box_height: 5,
            generations: 10,
            population_size: 50,
            mutation_rate: 0.5,
        }
    }
}

/// configuration rejected before any search begins.
#[derive(Debug, PartialEq)]
pub enum SettingsError {
    NonPositive(&'static str),
    BoundsInverted { what: &'static str, min: usize, max: usize },
    MutationRateOutOfRange(f32),
    PopulationTooSmall(usize),
    CatalogTooSmall(usize),
    BlockedRectOutOfGrid { index: usize },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NonPositive(what) => write!(f, "{what} must be positive"),
            SettingsError::BoundsInverted { what, min, max } => {
                write!(f, "{what} bounds inverted: min {min} > max {max}")
            }
            SettingsError::MutationRateOutOfRange(rate) => {
                write!(f, "mutation rate {rate} is outside [0, 1]")
            }
            SettingsError::PopulationTooSmall(size) => {
                write!(f, "population size {size} is below the minimum of 2")
            }
            SettingsError::CatalogTooSmall(count) => {
                write!(f, "box count {count} is below the minimum of 2")
            }
            SettingsError::BlockedRectOutOfGrid { index } => {
                write!(f, "blocked region {index} extends outside the grid")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl AppSettings {
    /// reject every malformed configuration the core is allowed to assume
    /// away: non-positive dimensions, inverted bounds, an out-of-range
    /// mutation rate, and degenerate search parameters.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.grid_width == 0 {
            return Err(SettingsError::NonPositive("grid width"));
        }
        if self.grid_height == 0 {
            return Err(SettingsError::NonPositive("grid height"));
        }
        if self.min_box_width == 0 || self.min_box_height == 0 {
            return Err(SettingsError::NonPositive("box size bounds"));
        }
        if self.min_box_width > self.max_box_width {
            return Err(SettingsError::BoundsInverted {
                what: "box width",
                min: self.min_box_width,
                max: self.max_box_width,
            });
        }
        if self.min_box_height > self.max_box_height {
            return Err(SettingsError::BoundsInverted {
                what: "box height",
                min: self.min_box_height,
                max: self.max_box_height,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SettingsError::MutationRateOutOfRange(self.mutation_rate));
        }
        if self.generations == 0 {
            return Err(SettingsError::NonPositive("generations"));
        }
        if self.population_size < 2 {
            return Err(SettingsError::PopulationTooSmall(self.population_size));
        }
        if self.box_count < 2 {
            return Err(SettingsError::CatalogTooSmall(self.box_count));
        }
        for (index, rect) in self.blocked.iter().enumerate() {
            if rect.width == 0 || rect.height == 0 {
                return Err(SettingsError::NonPositive("blocked region size"));
            }
            if rect.left + rect.width > self.grid_width
                || rect.top + rect.height > self.grid_height
            {
                return Err(SettingsError::BlockedRectOutOfGrid { index });
            }
        }
        Ok(())
    }

    /// build the run's availability mask from the grid dimensions and the
    /// blocked regions. call after `validate`.
    pub fn build_mask(&self) -> Mask {
        let mut mask = Mask::open(self.grid_width, self.grid_height);
        for rect in &self.blocked {
            mask.block_rect(rect.top, rect.left, rect.height, rect.width);
        }
        mask
    }

    pub fn evolution_params(&self) -> EvolutionParams {
        EvolutionParams {
            generations: self.generations,
            population_size: self.population_size,
            mutation_rate: self.mutation_rate,
        }
    }

    /// save settings to a JSON file
    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// load settings from a JSON file
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
