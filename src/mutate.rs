// genetic operators over individuals.
//
// both operators are pure transformations driven by an explicit RNG: they
// return new individuals and never touch the caller's copies. each preserves
// the permutation invariant and the genome length.

use rand::Rng;

use crate::dna::{Gene, Individual};

/// single cut-point crossover with permutation repair.
///
/// the cut is drawn uniformly from `[1, len - 1]`. each child takes one
/// parent's prefix up to the cut, then the other parent's genes in their
/// original order, skipping box indices already present in the prefix. this
/// construction yields a valid permutation for any two equal-length parents.
/// rotation flags travel with their gene.
pub fn crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> (Individual, Individual) {
    let len = parent1.len();
    assert!(len >= 2, "crossover requires individuals of length >= 2");
    assert_eq!(len, parent2.len(), "crossover parents must have equal length");

    let cut = rng.random_range(1..len);
    (splice(parent1, parent2, cut), splice(parent2, parent1, cut))
}

fn splice(prefix_parent: &Individual, suffix_parent: &Individual, cut: usize) -> Individual {
    let len = prefix_parent.len();
    let mut genes: Vec<Gene> = prefix_parent.genes[..cut].to_vec();
    let mut taken = vec![false; len];
    for gene in &genes {
        taken[gene.box_index] = true;
    }
    genes.extend(
        suffix_parent
            .genes
            .iter()
            .filter(|gene| !taken[gene.box_index]),
    );
    Individual { genes }
}

/// apply exactly one of two transformations, each chosen with probability
/// one half: swap the genes at two distinct positions (order change only), or
/// flip the rotation flag at one position (orientation change only).
pub fn mutate<R: Rng>(individual: &Individual, rng: &mut R) -> Individual {
    let len = individual.len();
    assert!(len >= 2, "mutation requires individuals of length >= 2");

    let mut genes = individual.genes.clone();
    if rng.random::<f32>() < 0.5 {
        let i = rng.random_range(0..len);
        // draw the second position from the remaining len - 1 slots so the
        // pair is always distinct.
        let mut j = rng.random_range(0..len - 1);
        if j >= i {
            j += 1;
        }
        genes.swap(i, j);
    } else {
        let i = rng.random_range(0..len);
        genes[i].rotated = !genes[i].rotated;
    }
    Individual { genes }
}
