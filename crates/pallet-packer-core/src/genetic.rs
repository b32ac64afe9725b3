//! Order-optimizing genetic algorithm (C5): searches over permutations of the
//! mix pool for an ordering that, when fed to the Maximal-Rectangles packer,
//! minimizes pallet count and maximizes fill uniformity.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::Options;
use crate::model::{PalletConfig, Product};
use crate::packer::{pack, PackResult};

/// A candidate mix-pool ordering, represented as indices into the pool.
pub type Chromosome = Vec<usize>;

/// The fittest ordering the search found, plus the packing it produced.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    pub order: Chromosome,
    pub result: PackResult,
    pub fitness: f64,
    /// Best-so-far fitness at the end of each generation, for diagnostics.
    pub history: Vec<f64>,
}

/// Runs the genetic search over `pool` and returns the best ordering found.
///
/// Fitness rewards fewer pallets and, among orderings tied on pallet count,
/// a lower variance of per-pallet fill ratios (packed pallets should be
/// uniformly full rather than one near-empty straggler). Both penalties are
/// negated so that higher fitness is always better.
#[tracing::instrument(skip_all, fields(pool_size = pool.len(), generations = options.generations))]
pub fn run_ga(pool: &[Product], pallet: &PalletConfig, options: &Options) -> GaOutcome {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let n = pool.len();
    // The first individual is always the untouched input order, so the GA's
    // best-so-far can never be worse than the greedy baseline (P5).
    let mut population: Vec<Chromosome> = Vec::with_capacity(options.population);
    population.push((0..n).collect());
    for _ in 1..options.population {
        let mut order: Chromosome = (0..n).collect();
        order.shuffle(&mut rng);
        population.push(order);
    }

    let mut best: Option<(Chromosome, PackResult, f64)> = None;
    let mut history: Vec<f64> = Vec::with_capacity(options.generations);

    for generation in 0..options.generations {
        let evaluated = evaluate_population(&population, pool, pallet, options);

        for (order, result, fitness) in &evaluated {
            let is_better = match &best {
                None => true,
                Some((_, _, best_fitness)) => fitness > best_fitness,
            };
            if is_better {
                best = Some((order.clone(), result.clone(), *fitness));
            }
        }
        let best_so_far = best.as_ref().map(|(_, _, f)| *f).unwrap_or(f64::MIN);
        history.push(best_so_far);
        tracing::debug!(generation, best_fitness = best_so_far, "ga generation complete");

        population = next_generation(&evaluated, options, &mut rng);
    }

    // Final evaluation pass, in case the last generation produced no
    // improvement but the loop above still needs at least one record.
    if best.is_none() {
        let evaluated = evaluate_population(&population, pool, pallet, options);
        best = evaluated
            .into_iter()
            .max_by(|a, b| a.2.total_cmp(&b.2));
    }

    let (order, result, fitness) = best.expect("population is never empty");
    GaOutcome {
        order,
        result,
        fitness,
        history,
    }
}

#[cfg(feature = "parallel")]
fn evaluate_population(
    population: &[Chromosome],
    pool: &[Product],
    pallet: &PalletConfig,
    options: &Options,
) -> Vec<(Chromosome, PackResult, f64)> {
    use rayon::prelude::*;

    if options.parallel {
        return population
            .par_iter()
            .map(|order| evaluate_one(order, pool, pallet, options))
            .collect();
    }
    population
        .iter()
        .map(|order| evaluate_one(order, pool, pallet, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_population(
    population: &[Chromosome],
    pool: &[Product],
    pallet: &PalletConfig,
    options: &Options,
) -> Vec<(Chromosome, PackResult, f64)> {
    population
        .iter()
        .map(|order| evaluate_one(order, pool, pallet, options))
        .collect()
}

fn evaluate_one(
    order: &Chromosome,
    pool: &[Product],
    pallet: &PalletConfig,
    options: &Options,
) -> (Chromosome, PackResult, f64) {
    let ordered: Vec<&Product> = order.iter().map(|&i| &pool[i]).collect();
    let result = pack(&ordered, pallet, options);
    let fitness = fitness_of(&result, pallet);
    (order.clone(), result, fitness)
}

/// Higher is better: `-pallet_count * 1000 - variance(fill_ratios)`. The
/// large multiplier keeps pallet count the dominant term; variance only
/// breaks ties between orderings that produce the same count.
fn fitness_of(result: &PackResult, pallet: &PalletConfig) -> f64 {
    let count = result.pallets.len();
    if count == 0 {
        return 0.0;
    }
    let fills: Vec<f64> = result.pallets.iter().map(|p| p.fill_ratio(pallet)).collect();
    let mean = fills.iter().sum::<f64>() / fills.len() as f64;
    let variance = fills.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / fills.len() as f64;
    -(count as f64) * 1000.0 - variance
}

fn next_generation(
    evaluated: &[(Chromosome, PackResult, f64)],
    options: &Options,
    rng: &mut StdRng,
) -> Vec<Chromosome> {
    let mut ranked: Vec<&(Chromosome, PackResult, f64)> = evaluated.iter().collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut next: Vec<Chromosome> = ranked
        .iter()
        .take(options.elitism)
        .map(|(order, _, _)| order.clone())
        .collect();

    while next.len() < options.population {
        let parent_a = tournament_select(&ranked, options.tournament_size, rng);
        let parent_b = tournament_select(&ranked, options.tournament_size, rng);
        let mut child = order_crossover(parent_a, parent_b, rng);
        if rng.gen_bool(options.mutation_rate) {
            mutate(&mut child, rng);
        }
        next.push(child);
    }

    next
}

fn tournament_select<'a>(
    ranked: &[&'a (Chromosome, PackResult, f64)],
    tournament_size: usize,
    rng: &mut StdRng,
) -> &'a Chromosome {
    let mut best: Option<&'a (Chromosome, PackResult, f64)> = None;
    for _ in 0..tournament_size {
        let idx = rng.gen_range(0..ranked.len());
        let candidate = ranked[idx];
        best = match best {
            None => Some(candidate),
            Some(current) if candidate.2 > current.2 => Some(candidate),
            Some(current) => Some(current),
        };
    }
    &best.expect("tournament_size is validated to be >= 1").0
}

/// Order crossover (OX1): copies a contiguous slice from `a` verbatim, then
/// fills the remaining positions with `b`'s elements in `b`'s order, skipping
/// anything already copied.
fn order_crossover(a: &Chromosome, b: &Chromosome, rng: &mut StdRng) -> Chromosome {
    let n = a.len();
    if n == 0 {
        return Vec::new();
    }
    let mut i = rng.gen_range(0..n);
    let mut j = rng.gen_range(0..n);
    if i > j {
        std::mem::swap(&mut i, &mut j);
    }

    let mut child: Vec<Option<usize>> = vec![None; n];
    let mut used = vec![false; n];
    for k in i..=j {
        child[k] = Some(a[k]);
        used[a[k]] = true;
    }

    let mut cursor = (j + 1) % n;
    for &value in b.iter().cycle().skip(j + 1).take(n) {
        if used[value] {
            continue;
        }
        child[cursor] = Some(value);
        used[value] = true;
        cursor = (cursor + 1) % n;
    }

    child.into_iter().map(|slot| slot.expect("every position is filled")).collect()
}

/// Performs up to `ceil(n/20)` random position swaps.
fn mutate(chromosome: &mut Chromosome, rng: &mut StdRng) {
    if chromosome.len() < 2 {
        return;
    }
    let swaps = (chromosome.len() + 19) / 20;
    for _ in 0..swaps.max(1) {
        let i = rng.gen_range(0..chromosome.len());
        let j = rng.gen_range(0..chromosome.len());
        chromosome.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pallet() -> PalletConfig {
        PalletConfig {
            length: 100.0,
            width: 100.0,
            height: 100.0,
            max_weight: 1000.0,
        }
    }

    fn pool(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product {
                id: i.to_string(),
                code: "P".into(),
                length: 30.0,
                width: 30.0,
                height: 30.0,
                weight: 5.0,
                rotatable_horizontal: true,
                strength: 9999.0,
            })
            .collect()
    }

    #[test]
    fn order_crossover_produces_a_valid_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let a: Chromosome = vec![0, 1, 2, 3, 4];
        let b: Chromosome = vec![4, 3, 2, 1, 0];
        let child = order_crossover(&a, &b, &mut rng);
        let mut sorted = child.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn run_ga_is_deterministic_given_a_seed() {
        let products = pool(12);
        let pallet = pallet();
        let options = Options::builder()
            .population(10)
            .generations(5)
            .seed(Some(42))
            .build();

        let first = run_ga(&products, &pallet, &options);
        let second = run_ga(&products, &pallet, &options);
        assert_eq!(first.order, second.order);
        assert_eq!(first.fitness, second.fitness);
    }

    #[test]
    fn run_ga_finds_a_complete_packing_for_a_small_pool() {
        let products = pool(8);
        let pallet = pallet();
        let options = Options::builder()
            .population(8)
            .generations(5)
            .seed(Some(1))
            .build();

        let outcome = run_ga(&products, &pallet, &options);
        assert_eq!(outcome.result.unplaced.len(), 0);
        let mut sorted_order = outcome.order.clone();
        sorted_order.sort_unstable();
        assert_eq!(sorted_order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn run_ga_tracks_one_history_entry_per_generation() {
        let products = pool(6);
        let pallet = pallet();
        let options = Options::builder()
            .population(6)
            .generations(4)
            .seed(Some(3))
            .build();

        let outcome = run_ga(&products, &pallet, &options);
        assert_eq!(outcome.history.len(), 4);
        // Best-so-far is non-decreasing across generations by construction.
        for pair in outcome.history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn run_ga_never_does_worse_than_the_seeded_input_order() {
        let products = pool(9);
        let pallet = pallet();
        let options = Options::builder()
            .population(5)
            .generations(3)
            .seed(Some(5))
            .build();

        let baseline_order: Chromosome = (0..9).collect();
        let refs: Vec<&Product> = baseline_order.iter().map(|&i| &products[i]).collect();
        let baseline_result = pack(&refs, &pallet, &options);
        let baseline_fitness = fitness_of(&baseline_result, &pallet);

        let outcome = run_ga(&products, &pallet, &options);
        assert!(outcome.fitness >= baseline_fitness);
    }
}
