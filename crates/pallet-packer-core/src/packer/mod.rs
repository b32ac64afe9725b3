//! The 3D Maximal-Rectangles packer (C4): heterogeneous packing with
//! best-short-side-fit selection, six-way free-rect splitting, and redundancy
//! pruning.

pub mod maxrects;

pub use maxrects::{pack, PackResult};
