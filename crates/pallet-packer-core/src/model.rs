use serde::{Deserialize, Serialize};

/// Stable opaque product identifier.
pub type ProductId = String;

/// A rectangular cuboid item to be packed onto a pallet. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    /// Grouping key shared by identical SKUs.
    pub code: String,
    /// X-axis extent (cm).
    pub length: f64,
    /// Y-axis extent (cm).
    pub width: f64,
    /// Z-axis extent (cm, vertical).
    pub height: f64,
    /// Weight (kg).
    pub weight: f64,
    /// If true, `length`/`width` may be swapped when choosing an orientation.
    pub rotatable_horizontal: bool,
    /// Maximum load (kg) this product can bear on top. Advisory unless
    /// `Options::enforce_strength` is set.
    pub strength: f64,
}

impl Product {
    /// `length * width * height`.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// The pallet envelope: a fixed-size rectangular box with a weight cap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PalletConfig {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
}

impl PalletConfig {
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// An axis-aligned free cuboid: an empty region still available for placement.
/// Always fully inside the owning pallet's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Cuboid {
    pub fn new(x: f64, y: f64, z: f64, length: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            z,
            length,
            width,
            height,
        }
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// One item pinned at coordinates with a chosen orientation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub product_id: ProductId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Chosen orientation: extent along X.
    pub length: f64,
    /// Chosen orientation: extent along Y.
    pub width: f64,
    /// Chosen orientation: extent along Z.
    pub height: f64,
}

impl Placement {
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub fn as_cuboid(&self) -> Cuboid {
        Cuboid::new(self.x, self.y, self.z, self.length, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PalletKind {
    Single,
    Mix,
}

/// A pallet holding an ordered, append-only list of placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pallet {
    pub kind: PalletKind,
    pub items: Vec<Placement>,
    pub weight: f64,
}

impl Pallet {
    pub fn used_volume(&self) -> f64 {
        self.items.iter().map(Placement::volume).sum()
    }

    pub fn fill_ratio(&self, pallet: &PalletConfig) -> f64 {
        let volume = pallet.volume();
        if volume <= 0.0 {
            0.0
        } else {
            self.used_volume() / volume
        }
    }
}

/// Aggregate statistics over a completed `optimize()` run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stats {
    pub total_pallets: usize,
    pub single_count: usize,
    pub mix_count: usize,
    pub avg_fill: f64,
    pub min_fill: f64,
    pub max_fill: f64,
    pub theoretical_min: usize,
    pub elapsed_ms: u64,
}

/// Result of a full `optimize()` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub pallets: Vec<Pallet>,
    pub unplaced: Vec<ProductId>,
    pub stats: Stats,
}
