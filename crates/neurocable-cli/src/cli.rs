use clap::{Args, Parser, Subcommand};
use neurocable::core::ordering::OrderingStrategy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "neurocable contributors",
    version,
    about = "neurocable CLI - prepares one-dimensional neuron meshes for cable-equation solvers by reordering their degrees of freedom and building the cell graph.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a summary of a UGX grid or SWC morphology as a cable cell.
    Inspect(InspectArgs),
    /// Compare ordering strategies by matrix bandwidth and optionally save the permutation.
    Reorder(ReorderArgs),
    /// Write node, edge and adjacency tables for offline analysis.
    Export(ExportArgs),
}

/// Options shared by every subcommand that computes an ordering.
#[derive(Args, Debug, Clone, Default)]
pub struct OrderingArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the ordering strategy (identity, depth-first, cuthill-mckee).
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<OrderingStrategy>,

    /// Override the subset whose first vertex roots the traversal.
    #[arg(long, value_name = "NAME")]
    pub root_subset: Option<String>,

    /// Number every connected component instead of failing on disconnected grids.
    #[arg(long)]
    pub allow_disconnected: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S ordering.strategy=cuthill-mckee
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the input grid (.ugx) or morphology (.swc).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub ordering: OrderingArgs,

    /// Print every node after the summary.
    #[arg(long)]
    pub nodes: bool,

    /// Print every edge after the summary.
    #[arg(long)]
    pub edges: bool,
}

/// Arguments for the `reorder` subcommand.
#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Path to the input grid (.ugx).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub ordering: OrderingArgs,

    /// Write the selected strategy's `vertex,dof` pairs to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the input grid (.ugx).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory receiving nodes.csv, edges.csv and adjacency.csv.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    #[command(flatten)]
    pub ordering: OrderingArgs,

    /// Also write the dense adjacency matrix, overriding the config file.
    #[arg(long)]
    pub matrix: bool,
}
