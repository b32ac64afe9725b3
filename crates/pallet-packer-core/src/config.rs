use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selects which strategy fills the mix pool: a full permutation search, or
/// the input order used as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Genetic search over mix-pool orderings (C5).
    Genetic,
    /// Pack the mix pool in input order, skipping C5 entirely.
    Greedy,
}

impl FromStr for Algorithm {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "genetic" => Ok(Self::Genetic),
            "greedy" => Ok(Self::Greedy),
            _ => Err(()),
        }
    }
}

/// Engine-wide tuning knobs. All fields have defaults matching the reference
/// pipeline; only `seed` has no sensible fixed default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Options {
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    /// GA population size.
    #[serde(default = "default_population")]
    pub population: usize,
    /// GA generation count.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Per-chromosome mutation probability, in `[0, 1]`.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Top-N chromosomes carried unchanged into the next generation.
    #[serde(default = "default_elitism")]
    pub elitism: usize,
    /// Tournament-selection sample size.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// RNG seed. `None` draws from entropy (breaks P6 determinism deliberately).
    #[serde(default)]
    pub seed: Option<u64>,

    /// Minimum volumetric efficiency for a homogeneous group to skip C4 (default 0.50).
    #[serde(default = "default_single_fill_threshold")]
    pub single_fill_threshold: f64,
    /// Minimum fill ratio for a remainder group to still become its own single pallet (default 0.90).
    #[serde(default = "default_partial_fill_threshold")]
    pub partial_fill_threshold: f64,

    /// Enumerate all six 3-D rotations per item instead of the default
    /// 2-orientation horizontal swap.
    #[serde(default)]
    pub full_rotation: bool,
    /// Enforce the optional stacking-strength constraint from section 4.4.1. Off by
    /// default; `strength` otherwise remains advisory-only.
    #[serde(default)]
    pub enforce_strength: bool,
    /// Evaluate GA fitness across chromosomes in parallel. Requires the
    /// `parallel` cargo feature; otherwise ignored.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            population: default_population(),
            generations: default_generations(),
            mutation_rate: default_mutation_rate(),
            elitism: default_elitism(),
            tournament_size: default_tournament_size(),
            seed: None,
            single_fill_threshold: default_single_fill_threshold(),
            partial_fill_threshold: default_partial_fill_threshold(),
            full_rotation: false,
            enforce_strength: false,
            parallel: false,
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    /// Validates the tuning knobs. Returns an error if GA parameters are
    /// internally inconsistent (e.g. a tournament larger than the population).
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PackerError;

        if self.population == 0 {
            return Err(PackerError::InvalidConfig(
                "population must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(PackerError::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population {
            return Err(PackerError::InvalidConfig(format!(
                "tournament_size ({}) must be in 1..=population ({})",
                self.tournament_size, self.population
            )));
        }
        if !(0.0..=1.0).contains(&self.single_fill_threshold) {
            return Err(PackerError::InvalidConfig(
                "single_fill_threshold must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.partial_fill_threshold) {
            return Err(PackerError::InvalidConfig(
                "partial_fill_threshold must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

fn default_algorithm() -> Algorithm {
    Algorithm::Genetic
}
fn default_population() -> usize {
    50
}
fn default_generations() -> usize {
    50
}
fn default_mutation_rate() -> f64 {
    0.30
}
fn default_elitism() -> usize {
    2
}
fn default_tournament_size() -> usize {
    3
}
fn default_single_fill_threshold() -> f64 {
    0.50
}
fn default_partial_fill_threshold() -> f64 {
    0.90
}

/// Builder for `Options` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct OptionsBuilder {
    opts: Options,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.opts.algorithm = v;
        self
    }
    pub fn population(mut self, v: usize) -> Self {
        self.opts.population = v;
        self
    }
    pub fn generations(mut self, v: usize) -> Self {
        self.opts.generations = v;
        self
    }
    pub fn mutation_rate(mut self, v: f64) -> Self {
        self.opts.mutation_rate = v;
        self
    }
    pub fn elitism(mut self, v: usize) -> Self {
        self.opts.elitism = v;
        self
    }
    pub fn tournament_size(mut self, v: usize) -> Self {
        self.opts.tournament_size = v;
        self
    }
    pub fn seed(mut self, v: Option<u64>) -> Self {
        self.opts.seed = v;
        self
    }
    pub fn single_fill_threshold(mut self, v: f64) -> Self {
        self.opts.single_fill_threshold = v;
        self
    }
    pub fn partial_fill_threshold(mut self, v: f64) -> Self {
        self.opts.partial_fill_threshold = v;
        self
    }
    pub fn full_rotation(mut self, v: bool) -> Self {
        self.opts.full_rotation = v;
        self
    }
    pub fn enforce_strength(mut self, v: bool) -> Self {
        self.opts.enforce_strength = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.opts.parallel = v;
        self
    }
    pub fn build(self) -> Options {
        self.opts
    }
}
