use crate::cli::ExportArgs;
use crate::config::PartialPipelineConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use neurocable::core::io::export::{
    write_adjacency_matrix_to_path, write_edges_csv, write_nodes_csv,
};
use neurocable::engine::error::EngineError;
use neurocable::engine::progress::ProgressReporter;
use neurocable::workflows::prepare;
use std::fs::{self, File};
use std::io::BufWriter;
use tracing::info;

pub fn run(args: ExportArgs, progress: &CliProgressHandler) -> Result<()> {
    let config =
        PartialPipelineConfig::load(&args.ordering)?.merge_with_cli(&args.ordering, args.matrix)?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let (grid, prepared) = prepare::prepare_from_path(&args.input, &config, &reporter)?;

    fs::create_dir_all(&args.output)?;

    let nodes_path = args.output.join("nodes.csv");
    write_nodes_csv(BufWriter::new(File::create(&nodes_path)?), &prepared.cell)
        .map_err(EngineError::from)?;
    let edges_path = args.output.join("edges.csv");
    write_edges_csv(BufWriter::new(File::create(&edges_path)?), &prepared.cell)
        .map_err(EngineError::from)?;
    info!("Wrote node and edge tables to {:?}", &args.output);
    println!("Node table written to: {}", nodes_path.display());
    println!("Edge table written to: {}", edges_path.display());

    if config.export.adjacency_matrix {
        let matrix_path = args.output.join("adjacency.csv");
        write_adjacency_matrix_to_path(&matrix_path, &grid, Some(&prepared.reordering))
            .map_err(EngineError::from)?;
        println!("Adjacency matrix written to: {}", matrix_path.display());
    }
    Ok(())
}
