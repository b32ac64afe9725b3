//! Axis-aligned cuboid primitives used by the Maximal-Rectangles packer (C4) and
//! its test suite. Mirrors the 2D `Rect` helpers the packer crate this was grown
//! from uses, extended to three axes.

use crate::model::Cuboid;

/// True if an axis-aligned box of size `(l, w, h)` fits within `rect` without
/// rotation.
pub fn fits(rect: &Cuboid, l: f64, w: f64, h: f64) -> bool {
    rect.length >= l && rect.width >= w && rect.height >= h
}

/// Strict AABB overlap test: touching faces do not count as intersecting.
pub fn intersects(a: &Cuboid, b: &Cuboid) -> bool {
    !(a.x >= b.x + b.length
        || b.x >= a.x + a.length
        || a.y >= b.y + b.width
        || b.y >= a.y + a.width
        || a.z >= b.z + b.height
        || b.z >= a.z + a.height)
}

/// True if `inner` lies fully inside `outer` (inclusive on all six faces).
pub fn contains(outer: &Cuboid, inner: &Cuboid) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.z >= outer.z
        && inner.x + inner.length <= outer.x + outer.length
        && inner.y + inner.width <= outer.y + outer.width
        && inner.z + inner.height <= outer.z + outer.height
}
