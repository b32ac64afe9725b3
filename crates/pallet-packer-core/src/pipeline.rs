//! Pipeline orchestrator (C6): splits the input population into homogeneous
//! single-SKU pallets and a heterogeneous mix pool, runs the mix pool through
//! the genetic search (or greedy insertion order) and the Maximal-Rectangles
//! packer, then concatenates everything into one `OptimizeResult`.

use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::config::{Algorithm, Options};
use crate::error::{PackerError, Result};
use crate::genetic::run_ga;
use crate::helpers::group_products;
use crate::model::{OptimizeResult, Pallet, PalletConfig, PalletKind, Product, ProductId, Stats};
use crate::packer::pack;
use crate::single_pallet::{grid_placement, simulate_single};

/// Splits `products` into homogeneous single-SKU pallets and a heterogeneous
/// mix pool, packs the mix pool, and returns the concatenated result.
///
/// Validates `options` and every product/pallet dimension before doing any
/// work: a validation failure returns `Err` before any pallet is emitted, per
/// the `InvalidInput` propagation policy. An empty `products` slice is not an
/// error; it yields an empty result with `stats.total_pallets == 0`.
#[instrument(skip_all, fields(products = products.len(), algorithm = ?options.algorithm))]
pub fn optimize(
    products: &[Product],
    pallet: &PalletConfig,
    options: &Options,
) -> Result<OptimizeResult> {
    let started = Instant::now();
    options.validate()?;
    validate_pallet(pallet)?;

    if products.is_empty() {
        return Ok(OptimizeResult {
            pallets: Vec::new(),
            unplaced: Vec::new(),
            stats: Stats {
                total_pallets: 0,
                single_count: 0,
                mix_count: 0,
                avg_fill: 0.0,
                min_fill: 0.0,
                max_fill: 0.0,
                theoretical_min: 0,
                elapsed_ms: elapsed_ms(started),
            },
        });
    }

    for p in products {
        validate_product(p)?;
    }

    let (single_pallets, mix_pool) = split_single_and_mix(products, pallet, options);
    info!(
        single_pallets = single_pallets.len(),
        mix_pool = mix_pool.len(),
        "grouping complete"
    );

    let (mix_pallets, unplaced) = if mix_pool.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        pack_mix_pool(&mix_pool, pallet, options)
    };

    let single_count = single_pallets.len();
    let mix_count = mix_pallets.len();
    let mut pallets = single_pallets;
    pallets.extend(mix_pallets);

    let stats = compute_stats(
        &pallets,
        products,
        pallet,
        single_count,
        mix_count,
        started,
    );
    info!(
        total_pallets = stats.total_pallets,
        avg_fill = stats.avg_fill,
        unplaced = unplaced.len(),
        "optimize complete"
    );

    Ok(OptimizeResult {
        pallets,
        unplaced,
        stats,
    })
}

fn validate_pallet(pallet: &PalletConfig) -> Result<()> {
    if pallet.length <= 0.0 || pallet.width <= 0.0 || pallet.height <= 0.0 {
        return Err(PackerError::InvalidInput(
            "pallet length/width/height must be greater than 0".into(),
        ));
    }
    if pallet.max_weight <= 0.0 {
        return Err(PackerError::InvalidInput(
            "pallet max_weight must be greater than 0".into(),
        ));
    }
    Ok(())
}

fn validate_product(p: &Product) -> Result<()> {
    if p.length <= 0.0 || p.width <= 0.0 || p.height <= 0.0 {
        return Err(PackerError::InvalidInput(format!(
            "product '{}' must have positive length/width/height",
            p.id
        )));
    }
    if p.weight < 0.0 {
        return Err(PackerError::InvalidInput(format!(
            "product '{}' has negative weight",
            p.id
        )));
    }
    Ok(())
}

/// Groups `products` by SKU and, for each group, either lays it out as a full
/// grid of single pallets (plus a possible partial remainder pallet) or
/// pushes the whole group into the returned mix pool.
fn split_single_and_mix(
    products: &[Product],
    pallet: &PalletConfig,
    options: &Options,
) -> (Vec<Pallet>, Vec<Product>) {
    let mut single_pallets = Vec::new();
    let mut mix_pool = Vec::new();

    for group in group_products(products) {
        let representative = &group[0];
        let sim = simulate_single(
            representative,
            pallet,
            options.full_rotation,
            options.single_fill_threshold,
        );

        if !sim.can_be_single {
            mix_pool.extend(group);
            continue;
        }

        let cap = sim.capacity;
        let orientation = sim
            .chosen_orientation
            .expect("can_be_single implies a chosen orientation");
        let full_pallets = group.len() / cap;

        for i in 0..full_pallets {
            let chunk = &group[i * cap..(i + 1) * cap];
            let placements = grid_placement(chunk, pallet, orientation);
            let weight = chunk.iter().map(|p| p.weight).sum();
            single_pallets.push(Pallet {
                kind: PalletKind::Single,
                items: placements,
                weight,
            });
        }

        let remainder = &group[full_pallets * cap..];
        if remainder.is_empty() {
            continue;
        }

        let remainder_fill =
            (remainder.len() as f64 * representative.volume()) / pallet.volume();
        if remainder_fill >= options.partial_fill_threshold {
            let placements = grid_placement(remainder, pallet, orientation);
            let weight = remainder.iter().map(|p| p.weight).sum();
            single_pallets.push(Pallet {
                kind: PalletKind::Single,
                items: placements,
                weight,
            });
        } else {
            mix_pool.extend_from_slice(remainder);
        }
    }

    (single_pallets, mix_pool)
}

fn pack_mix_pool(
    mix_pool: &[Product],
    pallet: &PalletConfig,
    options: &Options,
) -> (Vec<Pallet>, Vec<ProductId>) {
    match options.algorithm {
        Algorithm::Greedy => {
            let ordered: Vec<&Product> = mix_pool.iter().collect();
            let result = pack(&ordered, pallet, options);
            (result.pallets, result.unplaced)
        }
        Algorithm::Genetic => {
            let outcome = run_ga(mix_pool, pallet, options);
            debug!(
                fitness = outcome.fitness,
                generations = outcome.history.len(),
                "genetic search finished"
            );
            (outcome.result.pallets, outcome.result.unplaced)
        }
    }
}

fn compute_stats(
    pallets: &[Pallet],
    products: &[Product],
    pallet: &PalletConfig,
    single_count: usize,
    mix_count: usize,
    started: Instant,
) -> Stats {
    let fills: Vec<f64> = pallets.iter().map(|p| p.fill_ratio(pallet)).collect();
    let (avg_fill, min_fill, max_fill) = if fills.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = fills.iter().sum();
        let min = fills.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = fills.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (sum / fills.len() as f64, min, max)
    };

    let total_volume: f64 = products.iter().map(|p| p.volume()).sum();
    let theoretical_min = (total_volume / pallet.volume()).ceil() as usize;

    Stats {
        total_pallets: pallets.len(),
        single_count,
        mix_count,
        avg_fill,
        min_fill,
        max_fill,
        theoretical_min,
        elapsed_ms: elapsed_ms(started),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn pallet() -> PalletConfig {
        PalletConfig {
            length: 100.0,
            width: 100.0,
            height: 100.0,
            max_weight: 1000.0,
        }
    }

    fn product(id: &str, l: f64, w: f64, h: f64, weight: f64) -> Product {
        Product {
            id: id.into(),
            code: "SKU".into(),
            length: l,
            width: w,
            height: h,
            weight,
            rotatable_horizontal: false,
            strength: 9999.0,
        }
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let result = optimize(&[], &pallet(), &Options::default()).unwrap();
        assert_eq!(result.stats.total_pallets, 0);
        assert!(result.pallets.is_empty());
        assert!(result.unplaced.is_empty());
    }

    #[test]
    fn non_positive_dimension_is_invalid_input() {
        let bad = product("1", 0.0, 10.0, 10.0, 1.0);
        let err = optimize(&[bad], &pallet(), &Options::default()).unwrap_err();
        assert!(matches!(err, PackerError::InvalidInput(_)));
    }

    #[test]
    fn eight_identical_items_become_one_single_pallet() {
        let products: Vec<Product> = (0..8)
            .map(|i| product(&i.to_string(), 50.0, 50.0, 50.0, 10.0))
            .collect();
        let result = optimize(&products, &pallet(), &Options::default()).unwrap();
        assert_eq!(result.stats.total_pallets, 1);
        assert_eq!(result.stats.single_count, 1);
        assert_eq!(result.stats.mix_count, 0);
        assert!((result.stats.max_fill - 1.0).abs() < 1e-9);
    }

    #[test]
    fn nine_identical_items_spill_remainder_into_mix_pallet() {
        let products: Vec<Product> = (0..9)
            .map(|i| product(&i.to_string(), 50.0, 50.0, 50.0, 10.0))
            .collect();
        let result = optimize(&products, &pallet(), &Options::default()).unwrap();
        assert_eq!(result.stats.total_pallets, 2);
        assert_eq!(result.stats.single_count, 1);
        assert_eq!(result.stats.mix_count, 1);
    }

    #[test]
    fn oversized_item_is_reported_unplaced() {
        let products = vec![product("1", 120.0, 50.0, 50.0, 1.0)];
        let result = optimize(&products, &pallet(), &Options::default()).unwrap();
        assert_eq!(result.stats.total_pallets, 0);
        assert_eq!(result.unplaced, vec!["1".to_string()]);
    }
}
