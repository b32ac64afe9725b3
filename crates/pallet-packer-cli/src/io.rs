//! JSON input/output formats for the pallet-packer CLI (§6 of the engine's
//! interface contract). The engine itself never sees this schema; this module
//! is the external collaborator that translates it into/from `Product` and
//! `PalletConfig` values.

use anyhow::{Context, Result};
use pallet_packer_core::{OptimizeResult, PalletConfig, Product};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub container: ContainerInput,
    pub products: Vec<ProductInput>,
}

#[derive(Debug, Deserialize)]
pub struct ContainerInput {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

impl From<&ContainerInput> for PalletConfig {
    fn from(c: &ContainerInput) -> Self {
        PalletConfig {
            length: c.length,
            width: c.width,
            height: c.height,
            max_weight: c.weight,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub id: String,
    pub code: String,
    /// Length (cm).
    pub boy: f64,
    /// Width (cm).
    pub en: f64,
    /// Height (cm).
    pub yukseklik: f64,
    /// Weight (kg).
    pub agirlik: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub donus_serbest: bool,
    #[serde(default = "default_strength")]
    pub mukavemet: f64,
}

fn default_quantity() -> u32 {
    1
}

fn default_strength() -> f64 {
    f64::MAX
}

/// Expands `quantity > 1` into that many `Product` instances with distinct,
/// stable ids (`"{id}-{index}"`, 1-based, only suffixed when `quantity > 1`).
fn expand(input: &ProductInput) -> Vec<Product> {
    let count = input.quantity.max(1);
    (1..=count)
        .map(|i| Product {
            id: if count > 1 {
                format!("{}-{}", input.id, i)
            } else {
                input.id.clone()
            },
            code: input.code.clone(),
            length: input.boy,
            width: input.en,
            height: input.yukseklik,
            weight: input.agirlik,
            rotatable_horizontal: input.donus_serbest,
            strength: input.mukavemet,
        })
        .collect()
}

/// Reads and parses an input JSON document, returning the pallet config and
/// the fully-expanded product list (quantities flattened).
pub fn read_input(path: &Path) -> Result<(PalletConfig, Vec<Product>)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading input file {}", path.display()))?;
    let doc: InputDoc = serde_json::from_str(&raw)
        .with_context(|| format!("parsing input JSON {}", path.display()))?;

    let pallet = PalletConfig::from(&doc.container);
    let products: Vec<Product> = doc.products.iter().flat_map(expand).collect();
    Ok((pallet, products))
}

#[derive(Debug, Serialize)]
pub struct OutputReport<'a> {
    pub container: &'a PalletConfig,
    pub pallets: Vec<OutputPallet>,
    pub unplaced: &'a [String],
    pub stats: &'a pallet_packer_core::Stats,
}

#[derive(Debug, Serialize)]
pub struct OutputPallet {
    pub kind: pallet_packer_core::PalletKind,
    pub items: Vec<OutputPlacement>,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct OutputPlacement {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(rename = "L")]
    pub length: f64,
    #[serde(rename = "W")]
    pub width: f64,
    #[serde(rename = "H")]
    pub height: f64,
}

/// Builds the output report from an `OptimizeResult` and writes it as JSON to
/// `path`.
pub fn write_output(path: &Path, pallet: &PalletConfig, result: &OptimizeResult) -> Result<()> {
    let pallets = result
        .pallets
        .iter()
        .map(|p| OutputPallet {
            kind: p.kind,
            weight: p.weight,
            items: p
                .items
                .iter()
                .map(|placement| OutputPlacement {
                    id: placement.product_id.clone(),
                    x: placement.x,
                    y: placement.y,
                    z: placement.z,
                    length: placement.length,
                    width: placement.width,
                    height: placement.height,
                })
                .collect(),
        })
        .collect();

    let report = OutputReport {
        container: pallet,
        pallets,
        unplaced: &result.unplaced,
        stats: &result.stats,
    };

    let json = serde_json::to_string_pretty(&report).context("serializing output report")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing output file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_expands_to_distinct_stable_ids() {
        let input = ProductInput {
            id: "sku".into(),
            code: "SKU".into(),
            boy: 10.0,
            en: 10.0,
            yukseklik: 10.0,
            agirlik: 1.0,
            quantity: 3,
            donus_serbest: false,
            mukavemet: default_strength(),
        };
        let products = expand(&input);
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].id, "sku-1");
        assert_eq!(products[1].id, "sku-2");
        assert_eq!(products[2].id, "sku-3");
    }

    #[test]
    fn quantity_one_keeps_the_original_id() {
        let input = ProductInput {
            id: "sku".into(),
            code: "SKU".into(),
            boy: 10.0,
            en: 10.0,
            yukseklik: 10.0,
            agirlik: 1.0,
            quantity: 1,
            donus_serbest: false,
            mukavemet: default_strength(),
        };
        let products = expand(&input);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "sku");
    }
}
