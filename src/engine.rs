// the evolutionary driver.
//
// owns the seeded RNG, the current population, and the running trackers, and
// walks the Initialized -> Evolving -> Finalized lifecycle. every generation
// the whole population is re-scored (scoring is deterministic, so the repeat
// only costs time), sorted best-first, and bred into a full replacement
// population from the top entries.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::time::{Duration, Instant};

use crate::catalog::BoxSpec;
use crate::dna::{Individual, generate_individual};
use crate::fitness::{ScoredIndividual, score_population};
use crate::grid::Mask;
use crate::mutate::{crossover, mutate};

/// parents are drawn uniformly with replacement from this many top entries
/// of the sorted population (fewer if the population is smaller).
const PARENT_POOL_SIZE: usize = 10;

#[derive(Clone, Copy, Debug)]
pub struct EvolutionParams {
    pub generations: u32,
    pub population_size: usize,
    pub mutation_rate: f32,
}

/// summary of one optimization run.
#[derive(Clone, Debug)]
pub struct OptimizationResult {
    /// best-ever individual across all generations, with its score. `None`
    /// only if no generation ever placed a single box.
    pub best: Option<ScoredIndividual>,
    /// lowest-scoring member of the final generation.
    pub worst: ScoredIndividual,
    pub first_gen_best_score: usize,
    pub first_gen_worst_score: usize,
    pub execution_time: Duration,
}

pub struct Engine {
    rng: Pcg32,
    boxes: Vec<BoxSpec>,
    mask: Mask,
    params: EvolutionParams,
    population: Vec<Individual>,
    started: Instant,
    /// generations completed so far.
    pub generation: u32,
    /// best score seen in any scored generation; non-decreasing.
    pub best_score: usize,
    /// worst score seen in any scored generation; non-increasing.
    pub worst_score: usize,
    best: Option<ScoredIndividual>,
    first_gen_best_score: usize,
    first_gen_worst_score: usize,
}

impl Engine {
    /// build and score the initial population. the caller supplies validated
    /// parameters and the run's RNG; degenerate values are a contract
    /// violation, not an input error, and fail loudly here.
    pub fn new(boxes: Vec<BoxSpec>, mask: Mask, params: EvolutionParams, mut rng: Pcg32) -> Self {
        profiling::scope!("Engine::new");
        assert!(params.generations >= 1, "generations must be >= 1");
        assert!(params.population_size >= 2, "population size must be >= 2");
        assert!(boxes.len() >= 2, "catalog must hold at least 2 boxes");

        let population: Vec<Individual> = (0..params.population_size)
            .map(|_| generate_individual(boxes.len(), &mut rng))
            .collect();

        let scored = score_population(&population, &mask, &boxes);
        let first_gen_best_score = scored.first().map_or(0, |s| s.score);
        let first_gen_worst_score = scored.last().map_or(0, |s| s.score);

        let worst_score = boxes.len();
        Self {
            rng,
            boxes,
            mask,
            params,
            population,
            started: Instant::now(),
            generation: 0,
            best_score: 0,
            worst_score,
            best: None,
            first_gen_best_score,
            first_gen_worst_score,
        }
    }

    /// run one generation: score and sort the current population, update the
    /// running trackers, and breed the replacement population.
    pub fn step(&mut self) {
        profiling::scope!("Engine::step");
        let scored = score_population(&self.population, &self.mask, &self.boxes);

        // strict improvement only: ties keep the earlier champion.
        let top = &scored[0];
        if top.score > self.best_score {
            self.best_score = top.score;
            self.best = Some(top.clone());
        }
        let bottom = &scored[scored.len() - 1];
        if bottom.score < self.worst_score {
            self.worst_score = bottom.score;
        }

        self.population = self.breed(&scored);
        self.generation += 1;
    }

    /// build the replacement population: draw parent pairs uniformly with
    /// replacement from the top of the sorted list, cross, independently
    /// mutate each child with probability `mutation_rate`, and append both.
    /// children arrive in pairs, so an odd target size discards the last
    /// surplus child when the buffer is truncated.
    fn breed(&mut self, scored: &[ScoredIndividual]) -> Vec<Individual> {
        profiling::scope!("Engine::breed");
        let pool = &scored[..scored.len().min(PARENT_POOL_SIZE)];
        let target = self.params.population_size;

        let mut next = Vec::with_capacity(target + 1);
        while next.len() < target {
            let p1 = &pool[self.rng.random_range(0..pool.len())].individual;
            let p2 = &pool[self.rng.random_range(0..pool.len())].individual;
            let (mut child1, mut child2) = crossover(p1, p2, &mut self.rng);
            if self.rng.random::<f32>() < self.params.mutation_rate {
                child1 = mutate(&child1, &mut self.rng);
            }
            if self.rng.random::<f32>() < self.params.mutation_rate {
                child2 = mutate(&child2, &mut self.rng);
            }
            next.push(child1);
            next.push(child2);
        }
        next.truncate(target);
        next
    }

    /// run the configured number of generations and finalize: score the last
    /// population once more and report its lowest member as the worst.
    pub fn run(mut self) -> OptimizationResult {
        profiling::scope!("Engine::run");
        for _ in 0..self.params.generations {
            self.step();
        }

        let final_scored = score_population(&self.population, &self.mask, &self.boxes);
        let worst = final_scored
            .last()
            .expect("population is never empty")
            .clone();

        OptimizationResult {
            best: self.best,
            worst,
            first_gen_best_score: self.first_gen_best_score,
            first_gen_worst_score: self.first_gen_worst_score,
            execution_time: self.started.elapsed(),
        }
    }
}

/// the sole entry point collaborators use to run a full search from a seed.
pub fn run_optimization(
    boxes: Vec<BoxSpec>,
    mask: Mask,
    params: EvolutionParams,
    seed: u64,
) -> OptimizationResult {
    Engine::new(boxes, mask, params, Pcg32::seed_from_u64(seed)).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::generate_boxes;
    use crate::fitness::evaluate;

    fn small_setup(seed: u64) -> (Vec<BoxSpec>, Mask) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let boxes = generate_boxes(20, 1, 3, 1, 3, &mut rng);
        (boxes, Mask::open(8, 8))
    }

    #[test]
    fn first_generation_stats_match_the_initial_population() {
        // replicate the engine's draw order: the initial population is the
        // first thing generated from the seed.
        let (boxes, mask) = small_setup(1);
        let seed = 44;

        let mut rng = Pcg32::seed_from_u64(seed);
        let initial: Vec<Individual> = (0..20)
            .map(|_| generate_individual(boxes.len(), &mut rng))
            .collect();
        let scored = score_population(&initial, &mask, &boxes);
        let expected_best = scored.first().unwrap().score;
        let expected_worst = scored.last().unwrap().score;

        let params = EvolutionParams {
            generations: 5,
            population_size: 20,
            mutation_rate: 0.5,
        };
        let result = run_optimization(boxes, mask, params, seed);
        assert_eq!(result.first_gen_best_score, expected_best);
        assert_eq!(result.first_gen_worst_score, expected_worst);
    }

    #[test]
    fn running_best_is_monotone_and_worst_is_antitone() {
        let (boxes, mask) = small_setup(2);
        let params = EvolutionParams {
            generations: 8,
            population_size: 12,
            mutation_rate: 0.5,
        };
        let mut engine = Engine::new(boxes, mask, params, Pcg32::seed_from_u64(99));
        let mut prev_best = engine.best_score;
        let mut prev_worst = engine.worst_score;
        for _ in 0..params.generations {
            engine.step();
            assert!(engine.best_score >= prev_best);
            assert!(engine.worst_score <= prev_worst);
            prev_best = engine.best_score;
            prev_worst = engine.worst_score;
        }
        assert_eq!(engine.generation, params.generations);
    }

    #[test]
    fn best_score_never_falls_below_the_first_generation() {
        let (boxes, mask) = small_setup(3);
        let params = EvolutionParams {
            generations: 6,
            population_size: 16,
            mutation_rate: 0.5,
        };
        let result = run_optimization(boxes, mask, params, 7);
        let best = result.best.expect("some box always fits an open mask");
        assert!(best.score >= result.first_gen_best_score);
        assert!(best.individual.is_permutation());
        assert!(result.worst.individual.is_permutation());
    }

    #[test]
    fn best_score_matches_a_fresh_evaluation() {
        let (boxes, mask) = small_setup(4);
        let params = EvolutionParams {
            generations: 4,
            population_size: 10,
            mutation_rate: 0.5,
        };
        let result = run_optimization(boxes.clone(), mask.clone(), params, 11);
        let best = result.best.unwrap();
        assert_eq!(evaluate(&best.individual, &mask, &boxes).score, best.score);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let (boxes, mask) = small_setup(5);
        let params = EvolutionParams {
            generations: 5,
            population_size: 14,
            mutation_rate: 0.5,
        };
        let a = run_optimization(boxes.clone(), mask.clone(), params, 1234);
        let b = run_optimization(boxes, mask, params, 1234);
        let best_a = a.best.unwrap();
        let best_b = b.best.unwrap();
        assert_eq!(best_a.score, best_b.score);
        assert_eq!(best_a.individual, best_b.individual);
        assert_eq!(a.worst.individual, b.worst.individual);
    }

    #[test]
    fn fully_blocked_mask_yields_no_best() {
        let mut rng = Pcg32::seed_from_u64(6);
        let boxes = generate_boxes(5, 1, 2, 1, 2, &mut rng);
        let mut mask = Mask::open(4, 4);
        mask.block_rect(0, 0, 4, 4);
        let params = EvolutionParams {
            generations: 3,
            population_size: 6,
            mutation_rate: 0.5,
        };
        let result = run_optimization(boxes, mask, params, 8);
        assert!(result.best.is_none());
        assert_eq!(result.first_gen_best_score, 0);
        assert_eq!(result.worst.score, 0);
    }

    #[test]
    fn odd_population_size_is_preserved_across_generations() {
        let (boxes, mask) = small_setup(7);
        let params = EvolutionParams {
            generations: 3,
            population_size: 11,
            mutation_rate: 0.5,
        };
        let mut engine = Engine::new(boxes, mask, params, Pcg32::seed_from_u64(21));
        for _ in 0..3 {
            engine.step();
            assert_eq!(engine.population.len(), 11);
        }
    }

    #[test]
    #[should_panic(expected = "generations must be >= 1")]
    fn zero_generations_is_a_contract_violation() {
        let (boxes, mask) = small_setup(8);
        let params = EvolutionParams {
            generations: 0,
            population_size: 10,
            mutation_rate: 0.5,
        };
        let _ = Engine::new(boxes, mask, params, Pcg32::seed_from_u64(1));
    }
}
