mod io;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use pallet_packer_core::{optimize, Algorithm, Options};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "pallet-packer",
    about = "Pack palletized shipments into 3D bin-packed loads",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, global = true, help_heading = "Logging")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a product list JSON document into pallets and write a JSON report
    Pack(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Input JSON file (container + products, see the §6 schema)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output JSON report path
    #[arg(short, long, default_value = "report.json", help_heading = "Input/Output")]
    out: PathBuf,

    /// Search strategy for the mix pool: genetic|greedy
    #[arg(long, default_value = "genetic", help_heading = "Algorithm")]
    algorithm: String,
    /// GA population size
    #[arg(long, default_value_t = 50, help_heading = "Algorithm")]
    population: usize,
    /// GA generation count
    #[arg(long, default_value_t = 50, help_heading = "Algorithm")]
    generations: usize,
    /// Per-chromosome mutation probability
    #[arg(long, default_value_t = 0.30, help_heading = "Algorithm")]
    mutation_rate: f64,
    /// Top-N chromosomes carried unchanged into the next generation
    #[arg(long, default_value_t = 2, help_heading = "Algorithm")]
    elitism: usize,
    /// Tournament-selection sample size
    #[arg(long, default_value_t = 3, help_heading = "Algorithm")]
    tournament_size: usize,
    /// RNG seed (omit for nondeterministic entropy)
    #[arg(long, help_heading = "Algorithm")]
    seed: Option<u64>,
    /// Minimum volumetric efficiency for a homogeneous group to skip the packer
    #[arg(long, default_value_t = 0.50, help_heading = "Algorithm")]
    single_fill_threshold: f64,
    /// Minimum fill ratio for a remainder group to still become its own pallet
    #[arg(long, default_value_t = 0.90, help_heading = "Algorithm")]
    partial_fill_threshold: f64,
    /// Enumerate all six 3-D rotations per item instead of the horizontal swap
    #[arg(long, default_value_t = false, help_heading = "Algorithm")]
    full_rotation: bool,
    /// Enforce the optional stacking-strength constraint
    #[arg(long, default_value_t = false, help_heading = "Algorithm")]
    enforce_strength: bool,
    /// Evaluate GA fitness across chromosomes in parallel (requires the `parallel` feature)
    #[arg(long, default_value_t = false, help_heading = "Algorithm")]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
    }
}

fn run_pack(args: &PackArgs) -> anyhow::Result<()> {
    let (pallet, products) = io::read_input(&args.input)?;
    info!(products = products.len(), "loaded input");

    let options = Options::builder()
        .algorithm(
            Algorithm::from_str(&args.algorithm)
                .map_err(|_| anyhow::anyhow!("unknown algorithm '{}', expected genetic|greedy", args.algorithm))?,
        )
        .population(args.population)
        .generations(args.generations)
        .mutation_rate(args.mutation_rate)
        .elitism(args.elitism)
        .tournament_size(args.tournament_size)
        .seed(args.seed)
        .single_fill_threshold(args.single_fill_threshold)
        .partial_fill_threshold(args.partial_fill_threshold)
        .full_rotation(args.full_rotation)
        .enforce_strength(args.enforce_strength)
        .parallel(args.parallel)
        .build();

    let result = optimize(&products, &pallet, &options).context("packing failed")?;
    info!(
        total_pallets = result.stats.total_pallets,
        avg_fill = result.stats.avg_fill,
        unplaced = result.unplaced.len(),
        "packing complete"
    );

    io::write_output(&args.out, &pallet, &result)?;
    info!(out = %args.out.display(), "report written");
    Ok(())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
