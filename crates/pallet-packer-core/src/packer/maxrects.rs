use crate::config::Options;
use crate::geometry::{contains, fits, intersects};
use crate::helpers::orientations;
use crate::model::{Cuboid, Pallet, PalletConfig, PalletKind, Placement, Product, ProductId};

/// Output of a single `pack()` call: the finalized pallets plus any items
/// that could not be placed on any pallet (oversized relative to the empty
/// pallet on every axis and orientation).
#[derive(Debug, Clone)]
pub struct PackResult {
    pub pallets: Vec<Pallet>,
    pub unplaced: Vec<ProductId>,
}

struct OpenPallet {
    placements: Vec<Placement>,
    /// Parallel to `placements`: the supporting item's `strength`.
    strength: Vec<f64>,
    /// Parallel to `placements`: cumulative weight resting directly on top.
    support_load: Vec<f64>,
    weight: f64,
    free: Vec<Cuboid>,
}

impl OpenPallet {
    fn new(pallet: &PalletConfig) -> Self {
        Self {
            placements: Vec::new(),
            strength: Vec::new(),
            support_load: Vec::new(),
            weight: 0.0,
            free: vec![Cuboid::new(0.0, 0.0, 0.0, pallet.length, pallet.width, pallet.height)],
        }
    }

    fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn into_pallet(self) -> Pallet {
        Pallet {
            kind: PalletKind::Mix,
            items: self.placements,
            weight: self.weight,
        }
    }
}

/// Packs `products` (in the given, authoritative order) onto as many pallets
/// as needed. Orientation is chosen per item by the packer; callers never
/// reorder or re-orient on its behalf.
pub fn pack(products: &[&Product], pallet: &PalletConfig, options: &Options) -> PackResult {
    let mut finalized: Vec<Pallet> = Vec::new();
    let mut unplaced: Vec<ProductId> = Vec::new();
    let mut current = OpenPallet::new(pallet);

    for &product in products {
        if product.weight > pallet.max_weight {
            unplaced.push(product.id.clone());
            continue;
        }

        if !current.is_empty() && current.weight + product.weight > pallet.max_weight {
            finalized.push(std::mem::replace(&mut current, OpenPallet::new(pallet)).into_pallet());
        }

        if try_place(&mut current, product, options) {
            continue;
        }

        if !current.is_empty() {
            finalized.push(std::mem::replace(&mut current, OpenPallet::new(pallet)).into_pallet());
        }

        if !try_place(&mut current, product, options) {
            unplaced.push(product.id.clone());
        }
    }

    if !current.is_empty() {
        finalized.push(current.into_pallet());
    }

    PackResult {
        pallets: finalized,
        unplaced,
    }
}

fn try_place(current: &mut OpenPallet, product: &Product, options: &Options) -> bool {
    let orients = orientations(product, options.full_rotation);
    let enforce_strength = options.enforce_strength;

    let placement = find_best_placement(&current.free, &orients, |candidate| {
        !enforce_strength || respects_strength(current, candidate, product.weight)
    });

    let Some((oi, ri)) = placement else {
        return false;
    };
    let (l, w, h) = orients[oi];
    let rect = current.free[ri];
    let placed = Cuboid::new(rect.x, rect.y, rect.z, l, w, h);

    update_support_load(current, &placed, product.weight);
    current.free = split_and_prune(&current.free, &placed);
    current.placements.push(Placement {
        product_id: product.id.clone(),
        x: placed.x,
        y: placed.y,
        z: placed.z,
        length: l,
        width: w,
        height: h,
    });
    current.strength.push(product.strength);
    current.support_load.push(0.0);
    current.weight += product.weight;
    true
}

/// Best Short-Side Fit search across `orientations x free_rects`, skipping
/// any candidate `is_valid` rejects (used for the optional strength check).
/// Ties break on lower volume residual, then earlier orientation index, then
/// earlier free-rect insertion order.
fn find_best_placement(
    free: &[Cuboid],
    orients: &[(f64, f64, f64)],
    mut is_valid: impl FnMut(&Cuboid) -> bool,
) -> Option<(usize, usize)> {
    let mut candidates: Vec<(usize, usize, f64, f64)> = Vec::new();
    for (oi, &(l, w, h)) in orients.iter().enumerate() {
        for (ri, rect) in free.iter().enumerate() {
            if !fits(rect, l, w, h) {
                continue;
            }
            let short_side = (rect.length - l).min(rect.width - w);
            let volume_residual = rect.volume() - l * w * h;
            candidates.push((oi, ri, short_side, volume_residual));
        }
    }

    candidates.sort_by(|a, b| {
        a.2.total_cmp(&b.2)
            .then_with(|| a.3.total_cmp(&b.3))
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.1.cmp(&b.1))
    });

    for (oi, ri, _, _) in candidates {
        let (l, w, h) = orients[oi];
        let rect = &free[ri];
        let candidate_box = Cuboid::new(rect.x, rect.y, rect.z, l, w, h);
        if is_valid(&candidate_box) {
            return Some((oi, ri));
        }
    }
    None
}

fn respects_strength(current: &OpenPallet, candidate: &Cuboid, candidate_weight: f64) -> bool {
    if candidate.z <= 0.0 {
        return true;
    }
    for (idx, existing) in current.placements.iter().enumerate() {
        if !directly_supports(existing, candidate) {
            continue;
        }
        if current.support_load[idx] + candidate_weight > current.strength[idx] {
            return false;
        }
    }
    true
}

fn update_support_load(current: &mut OpenPallet, placed: &Cuboid, weight: f64) {
    for (idx, existing) in current.placements.iter().enumerate() {
        if directly_supports(existing, placed) {
            current.support_load[idx] += weight;
        }
    }
}

/// True if `placed` sits directly on top of `existing`: their footprints
/// overlap in X/Y and `existing`'s top face equals `placed`'s base.
fn directly_supports(existing: &Placement, placed: &Cuboid) -> bool {
    let top = existing.z + existing.height;
    if (top - placed.z).abs() > 1e-9 {
        return false;
    }
    let overlap_x = placed.x < existing.x + existing.length && existing.x < placed.x + placed.length;
    let overlap_y = placed.y < existing.y + existing.width && existing.y < placed.y + placed.width;
    overlap_x && overlap_y
}

/// Removes every free rect that intersects `placed`, replacing each with up
/// to six axis-aligned residual sub-cuboids (left/right/front/back/bottom/top),
/// then prunes rects fully contained in another.
fn split_and_prune(free: &[Cuboid], placed: &Cuboid) -> Vec<Cuboid> {
    let mut next: Vec<Cuboid> = Vec::with_capacity(free.len());

    for rect in free {
        if !intersects(rect, placed) {
            next.push(*rect);
            continue;
        }

        let (px, py, pz) = (placed.x, placed.y, placed.z);
        let (l, w, h) = (placed.length, placed.width, placed.height);

        if rect.x < px {
            next.push(Cuboid::new(rect.x, rect.y, rect.z, px - rect.x, rect.width, rect.height));
        }
        if px + l < rect.x + rect.length {
            next.push(Cuboid::new(
                px + l,
                rect.y,
                rect.z,
                (rect.x + rect.length) - (px + l),
                rect.width,
                rect.height,
            ));
        }
        if rect.y < py {
            next.push(Cuboid::new(rect.x, rect.y, rect.z, rect.length, py - rect.y, rect.height));
        }
        if py + w < rect.y + rect.width {
            next.push(Cuboid::new(
                rect.x,
                py + w,
                rect.z,
                rect.length,
                (rect.y + rect.width) - (py + w),
                rect.height,
            ));
        }
        if rect.z < pz {
            next.push(Cuboid::new(rect.x, rect.y, rect.z, rect.length, rect.width, pz - rect.z));
        }
        if pz + h < rect.z + rect.height {
            next.push(Cuboid::new(
                rect.x,
                rect.y,
                pz + h,
                rect.length,
                rect.width,
                (rect.z + rect.height) - (pz + h),
            ));
        }
    }

    prune(next)
}

/// Keeps the per-pallet free list maximal: drops any rect fully contained in
/// another, so the list stays small even as splits accumulate.
fn prune(mut rects: Vec<Cuboid>) -> Vec<Cuboid> {
    rects.retain(|r| r.length > 0.0 && r.width > 0.0 && r.height > 0.0);

    let mut i = 0;
    while i < rects.len() {
        let mut removed_i = false;
        let mut j = i + 1;
        while j < rects.len() {
            if contains(&rects[j], &rects[i]) {
                rects.remove(i);
                removed_i = true;
                break;
            }
            if contains(&rects[i], &rects[j]) {
                rects.remove(j);
                continue;
            }
            j += 1;
        }
        if !removed_i {
            i += 1;
        }
    }
    rects
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

    fn product(id: &str, l: f64, w: f64, h: f64, weight: f64) -> Product {
        Product {
            id: id.into(),
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
    fn single_item_equal_to_pallet() {
        let p = product("1", 100.0, 100.0, 100.0, 10.0);
        let items = vec![&p];
        let result = pack(&items, &pallet(), &Options::default());
        assert_eq!(result.pallets.len(), 1);
        assert_eq!(result.unplaced.len(), 0);
        let placement = &result.pallets[0].items[0];
        assert_eq!((placement.x, placement.y, placement.z), (0.0, 0.0, 0.0));
        assert!((result.pallets[0].fill_ratio(&pallet()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_item_is_unplaced() {
        let p = product("1", 120.0, 50.0, 50.0, 1.0);
        let items = vec![&p];
        let result = pack(&items, &pallet(), &Options::default());
        assert_eq!(result.pallets.len(), 0);
        assert_eq!(result.unplaced, vec!["1".to_string()]);
    }

    #[test]
    fn weight_cap_forces_a_split() {
        let products: Vec<Product> = (0..10)
            .map(|i| product(&i.to_string(), 40.0, 40.0, 40.0, 11.0))
            .collect();
        let refs: Vec<&Product> = products.iter().collect();
        let mut pallet = pallet();
        pallet.max_weight = 100.0;
        let result = pack(&refs, &pallet, &Options::default());
        assert_eq!(result.pallets.len(), 2);
        assert_eq!(result.pallets[0].items.len(), 9);
        assert_eq!(result.pallets[1].items.len(), 1);
    }

    #[test]
    fn no_overlap_among_placements() {
        let products: Vec<Product> = (0..20)
            .map(|i| product(&i.to_string(), 20.0, 15.0, 10.0, 1.0))
            .collect();
        let refs: Vec<&Product> = products.iter().collect();
        let result = pack(&refs, &pallet(), &Options::default());
        for p in &result.pallets {
            for i in 0..p.items.len() {
                for j in (i + 1)..p.items.len() {
                    assert!(!intersects(&p.items[i].as_cuboid(), &p.items[j].as_cuboid()));
                }
            }
        }
    }
}
