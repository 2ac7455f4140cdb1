// candidate solution encoding: a permutation of catalog indices, each paired
// with an orientation flag. the permutation is the attempt order the
// evaluator walks; the flag decides which way the box lies.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// one entry of an individual: which catalog box, and whether it is rotated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub box_index: usize,
    pub rotated: bool,
}

/// an ordered sequence of genes whose box indices form exactly the set
/// `0..box_count`, each appearing once. crossover and mutation preserve this
/// invariant; the length never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub genes: Vec<Gene>,
}

impl Individual {
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// check the permutation invariant: every box index in `0..len` appears
    /// exactly once. used by tests and debug assertions.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.genes.len()];
        for gene in &self.genes {
            match seen.get_mut(gene.box_index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

/// generate a uniformly random individual: shuffled box indices, each with an
/// independent coin-flip rotation.
pub fn generate_individual<R: Rng>(box_count: usize, rng: &mut R) -> Individual {
    let mut indices: Vec<usize> = (0..box_count).collect();
    indices.shuffle(rng);
    let genes = indices
        .into_iter()
        .map(|box_index| Gene {
            box_index,
            rotated: rng.random(),
        })
        .collect();
    Individual { genes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn generated_individual_is_a_permutation() {
        let mut rng = Pcg32::seed_from_u64(44);
        for _ in 0..20 {
            let ind = generate_individual(30, &mut rng);
            assert_eq!(ind.len(), 30);
            assert!(ind.is_permutation());
        }
    }

    #[test]
    fn permutation_check_rejects_duplicates_and_gaps() {
        let dup = Individual {
            genes: vec![
                Gene { box_index: 0, rotated: false },
                Gene { box_index: 0, rotated: true },
            ],
        };
        assert!(!dup.is_permutation());

        let gap = Individual {
            genes: vec![
                Gene { box_index: 0, rotated: false },
                Gene { box_index: 2, rotated: false },
            ],
        };
        assert!(!gap.is_permutation());
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let mut a = Pcg32::seed_from_u64(123);
        let mut b = Pcg32::seed_from_u64(123);
        assert_eq!(generate_individual(50, &mut a), generate_individual(50, &mut b));
    }
}
