//! Product-level helpers: volume, orientation enumeration, and grouping.

use std::collections::HashMap;

use crate::model::Product;

/// A chosen `(length, width, height)` orientation.
pub type Orientation = (f64, f64, f64);

pub fn volume(p: &Product) -> f64 {
    p.volume()
}

/// Enumerates the distinct orientations a product may be placed in, in
/// preference order. The base `(length, width, height)` triple is always
/// first; the horizontal swap follows when `rotatable_horizontal` is set.
/// When `full_rotation` is true, all six axis permutations are enumerated
/// instead (deduplicated, base triple still first).
pub fn orientations(p: &Product, full_rotation: bool) -> Vec<Orientation> {
    let base = (p.length, p.width, p.height);
    let mut out = Vec::with_capacity(if full_rotation { 6 } else { 2 });
    out.push(base);

    if full_rotation {
        let candidates = [
            (p.width, p.length, p.height),
            (p.length, p.height, p.width),
            (p.height, p.length, p.width),
            (p.width, p.height, p.length),
            (p.height, p.width, p.length),
        ];
        for c in candidates {
            if !out.contains(&c) {
                out.push(c);
            }
        }
    } else if p.rotatable_horizontal {
        let swapped = (p.width, p.length, p.height);
        if swapped != base {
            out.push(swapped);
        }
    }

    out
}

/// Grouping key for identical SKUs: `(code, length, width, height, weight)`.
/// Dimensions/weight are compared by bit pattern so the key is hashable
/// without losing exactness for values that came from the same source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    code: String,
    length_bits: u64,
    width_bits: u64,
    height_bits: u64,
    weight_bits: u64,
}

impl GroupKey {
    fn of(p: &Product) -> Self {
        Self {
            code: p.code.clone(),
            length_bits: p.length.to_bits(),
            width_bits: p.width.to_bits(),
            height_bits: p.height.to_bits(),
            weight_bits: p.weight.to_bits(),
        }
    }
}

/// Groups products by identical SKU, preserving first-seen order both across
/// groups and within each group.
pub fn group_products(products: &[Product]) -> Vec<Vec<Product>> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<Product>> = Vec::new();

    for p in products {
        let key = GroupKey::of(p);
        match index.get(&key) {
            Some(&i) => groups[i].push(p.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![p.clone()]);
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, code: &str, l: f64, w: f64, h: f64) -> Product {
        Product {
            id: id.into(),
            code: code.into(),
            length: l,
            width: w,
            height: h,
            weight: 1.0,
            rotatable_horizontal: true,
            strength: 9999.0,
        }
    }

    #[test]
    fn orientations_base_first_then_swap() {
        let p = product("a", "A", 30.0, 20.0, 10.0);
        let o = orientations(&p, false);
        assert_eq!(o, vec![(30.0, 20.0, 10.0), (20.0, 30.0, 10.0)]);
    }

    #[test]
    fn orientations_dedup_square_base() {
        let p = product("a", "A", 20.0, 20.0, 10.0);
        let o = orientations(&p, false);
        assert_eq!(o, vec![(20.0, 20.0, 10.0)]);
    }

    #[test]
    fn orientations_not_rotatable_is_single() {
        let mut p = product("a", "A", 30.0, 20.0, 10.0);
        p.rotatable_horizontal = false;
        let o = orientations(&p, false);
        assert_eq!(o, vec![(30.0, 20.0, 10.0)]);
    }

    #[test]
    fn orientations_full_rotation_enumerates_up_to_six() {
        let p = product("a", "A", 30.0, 20.0, 10.0);
        let o = orientations(&p, true);
        assert_eq!(o.len(), 6);
        assert_eq!(o[0], (30.0, 20.0, 10.0));
    }

    #[test]
    fn grouping_preserves_insertion_order() {
        let products = vec![
            product("1", "B", 1.0, 1.0, 1.0),
            product("2", "A", 2.0, 2.0, 2.0),
            product("3", "B", 1.0, 1.0, 1.0),
        ];
        let groups = group_products(&products);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0][0].id, "1");
        assert_eq!(groups[1][0].id, "2");
    }
}
