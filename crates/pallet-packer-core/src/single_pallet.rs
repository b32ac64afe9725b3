//! Homogeneous-load sizing: given one SKU, decide whether it packs into a
//! pure axis-aligned grid efficiently enough to skip the Maximal-Rectangles
//! packer entirely.

use crate::helpers::{orientations, Orientation};
use crate::model::{Placement, PalletConfig, Product};

/// Outcome of simulating a single-SKU pallet for one product group.
#[derive(Debug, Clone, Copy)]
pub struct SingleSimResult {
    pub can_be_single: bool,
    pub capacity: usize,
    pub efficiency: f64,
    pub chosen_orientation: Option<Orientation>,
}

/// Chooses the best grid orientation for `representative` and reports the
/// resulting per-pallet capacity and volumetric efficiency.
pub fn simulate_single(
    representative: &Product,
    pallet: &PalletConfig,
    full_rotation: bool,
    single_fill_threshold: f64,
) -> SingleSimResult {
    let mut best: Option<(usize, f64, Orientation)> = None;

    for (l, w, h) in orientations(representative, full_rotation) {
        let nx = (pallet.length / l).floor() as usize;
        let ny = (pallet.width / w).floor() as usize;
        let nz = (pallet.height / h).floor() as usize;
        let mut cap = nx * ny * nz;
        if cap == 0 {
            continue;
        }

        if representative.weight > 0.0 {
            let weight_cap = (pallet.max_weight / representative.weight).floor() as usize;
            cap = cap.min(weight_cap);
        }
        if cap == 0 {
            continue;
        }

        let efficiency = (cap as f64 * l * w * h) / pallet.volume();
        let is_better = match best {
            None => true,
            Some((best_cap, best_efficiency, _)) => {
                cap > best_cap || (cap == best_cap && efficiency > best_efficiency)
            }
        };
        if is_better {
            best = Some((cap, efficiency, (l, w, h)));
        }
    }

    match best {
        Some((capacity, efficiency, orientation)) => SingleSimResult {
            can_be_single: capacity >= 1 && efficiency >= single_fill_threshold,
            capacity,
            efficiency,
            chosen_orientation: Some(orientation),
        },
        None => SingleSimResult {
            can_be_single: false,
            capacity: 0,
            efficiency: 0.0,
            chosen_orientation: None,
        },
    }
}

/// Lays `items` out as a row-major grid (x innermost, then y, then z) in the
/// given orientation, consuming items in order until the grid or the item
/// list is exhausted.
pub fn grid_placement(
    items: &[Product],
    pallet: &PalletConfig,
    orientation: Orientation,
) -> Vec<Placement> {
    let (l, w, h) = orientation;
    let nx = (pallet.length / l).floor() as usize;
    let ny = (pallet.width / w).floor() as usize;
    let nz = (pallet.height / h).floor() as usize;

    let mut placements = Vec::with_capacity(items.len());
    let mut it = items.iter();
    'fill: for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let Some(product) = it.next() else {
                    break 'fill;
                };
                placements.push(Placement {
                    product_id: product.id.clone(),
                    x: i as f64 * l,
                    y: j as f64 * w,
                    z: k as f64 * h,
                    length: l,
                    width: w,
                    height: h,
                });
            }
        }
    }
    placements
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

    fn product(l: f64, w: f64, h: f64, weight: f64) -> Product {
        Product {
            id: "p".into(),
            code: "P".into(),
            length: l,
            width: w,
            height: h,
            weight,
            rotatable_horizontal: false,
            strength: 9999.0,
        }
    }

    #[test]
    fn eight_half_pallets_fill_perfectly() {
        let sim = simulate_single(&product(50.0, 50.0, 50.0, 10.0), &pallet(), false, 0.50);
        assert_eq!(sim.capacity, 8);
        assert!((sim.efficiency - 1.0).abs() < 1e-9);
        assert!(sim.can_be_single);
    }

    #[test]
    fn weight_cap_clips_capacity() {
        let mut p = pallet();
        p.max_weight = 15.0;
        let sim = simulate_single(&product(50.0, 50.0, 50.0, 10.0), &p, false, 0.0);
        // geometric cap is 8, weight allows only 1 item of 10kg (15/10 = 1.5 -> 1)
        assert_eq!(sim.capacity, 1);
    }

    #[test]
    fn grid_placement_is_row_major() {
        let items: Vec<Product> = (0..8)
            .map(|i| {
                let mut p = product(50.0, 50.0, 50.0, 1.0);
                p.id = i.to_string();
                p
            })
            .collect();
        let placements = grid_placement(&items, &pallet(), (50.0, 50.0, 50.0));
        assert_eq!(placements.len(), 8);
        assert_eq!((placements[0].x, placements[0].y, placements[0].z), (0.0, 0.0, 0.0));
        assert_eq!((placements[1].x, placements[1].y, placements[1].z), (50.0, 0.0, 0.0));
        assert_eq!((placements[2].x, placements[2].y, placements[2].z), (0.0, 50.0, 0.0));
        assert_eq!((placements[4].x, placements[4].y, placements[4].z), (0.0, 0.0, 50.0));
    }
}
