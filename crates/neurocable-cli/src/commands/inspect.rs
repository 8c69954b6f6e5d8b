use crate::cli::{InspectArgs, OrderingArgs};
use crate::config::PartialPipelineConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use neurocable::core::diagnostics::CellSummary;
use neurocable::core::models::cell::NeuronCell;
use neurocable::engine::progress::ProgressReporter;
use neurocable::workflows::prepare;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: InspectArgs, progress: &CliProgressHandler) -> Result<()> {
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let cell = if is_swc(&args.input) {
        if has_ordering_options(&args.ordering) {
            warn!("Ordering options have no effect on SWC input and are ignored.");
        }
        info!("Loading SWC morphology from {:?}", &args.input);
        prepare::load_morphology(&args.input, &reporter)?
    } else {
        let config = PartialPipelineConfig::load(&args.ordering)?
            .merge_with_cli(&args.ordering, false)?;
        let (_, prepared) = prepare::prepare_from_path(&args.input, &config, &reporter)?;
        println!(
            "Ordering: {} (bandwidth {})",
            config.ordering.strategy, prepared.bandwidth
        );
        prepared.cell
    };

    println!("{}", CellSummary::from_cell(&cell));
    print_records(&cell, args.nodes, args.edges);
    Ok(())
}

fn has_ordering_options(ordering: &OrderingArgs) -> bool {
    ordering.config.is_some()
        || ordering.strategy.is_some()
        || ordering.root_subset.is_some()
        || ordering.allow_disconnected
        || !ordering.set_values.is_empty()
}

fn is_swc(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("swc"))
}

fn print_records(cell: &NeuronCell, nodes: bool, edges: bool) {
    if nodes {
        println!();
        for node in cell.nodes() {
            println!("{}", node);
        }
    }
    if edges {
        println!();
        for edge in cell.edges() {
            println!("{}", edge);
        }
    }
}
