//! Core library for 3D bin-packing of palletized shipments.
//!
//! - Geometry: axis-aligned free-cuboid primitives (`geometry`) and orientation/grouping helpers
//!   (`helpers`).
//! - Single-SKU sizing: `single_pallet` computes grid capacity for homogeneous loads.
//! - Heterogeneous packing: `packer::maxrects` is a 3D Maximal-Rectangles packer with
//!   best-short-side-fit selection and auto-orientation.
//! - Search: `genetic` runs an order-optimizing GA over the mix-pool permutation space.
//! - Orchestration: `pipeline::optimize` ties grouping, single-pallet sizing, the GA, and the
//!   packer together into one entry point.
//!
//! Quick example:
//! ```
//! use pallet_packer_core::{optimize, Options, PalletConfig, Product};
//!
//! # fn main() -> pallet_packer_core::Result<()> {
//! let pallet = PalletConfig { length: 100.0, width: 100.0, height: 100.0, max_weight: 1000.0 };
//! let products = vec![Product {
//!     id: "1".into(),
//!     code: "SKU-1".into(),
//!     length: 50.0,
//!     width: 50.0,
//!     height: 50.0,
//!     weight: 10.0,
//!     rotatable_horizontal: false,
//!     strength: 9999.0,
//! }];
//! let result = optimize(&products, &pallet, &Options::default())?;
//! println!("pallets: {}", result.stats.total_pallets);
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod genetic;
pub mod geometry;
pub mod helpers;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod single_pallet;

pub use config::{Algorithm, Options, OptionsBuilder};
pub use error::{PackerError, Result};
pub use model::{
    Cuboid, OptimizeResult, Pallet, PalletConfig, PalletKind, Placement, Product, ProductId, Stats,
};
pub use pipeline::optimize;

/// Convenience prelude for common types and functions.
/// Importing `pallet_packer_core::prelude::*` brings the primary API into scope.
pub mod prelude {
    pub use crate::config::{Algorithm, Options, OptionsBuilder};
    pub use crate::error::{PackerError, Result};
    pub use crate::genetic::{run_ga, GaOutcome};
    pub use crate::model::{
        Cuboid, OptimizeResult, Pallet, PalletConfig, PalletKind, Placement, Product, ProductId,
        Stats,
    };
    pub use crate::packer::{pack, PackResult};
    pub use crate::pipeline::optimize;
}
