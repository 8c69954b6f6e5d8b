use crate::cli::ReorderArgs;
use crate::config::PartialPipelineConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use neurocable::core::io::export::write_permutation_csv;
use neurocable::core::io::{traits::CableFile, ugx::UgxFile};
use neurocable::core::ordering::matrix_bandwidth;
use neurocable::engine::error::EngineError;
use neurocable::engine::progress::ProgressReporter;
use neurocable::workflows::prepare;
use std::fs::File;
use std::io::BufWriter;
use tracing::{info, warn};

pub fn run(args: ReorderArgs, progress: &CliProgressHandler) -> Result<()> {
    let config =
        PartialPipelineConfig::load(&args.ordering)?.merge_with_cli(&args.ordering, false)?;

    info!("Loading grid from {:?}", &args.input);
    let grid = UgxFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let reports = prepare::compare_strategies(&grid, &config.ordering, &reporter);

    println!(
        "Grid: {} vertices, {} edges, native bandwidth {}",
        grid.vertex_count(),
        grid.edge_count(),
        matrix_bandwidth(&grid, None)
    );
    for report in &reports {
        let marker = if report.strategy == config.ordering.strategy {
            "*"
        } else {
            " "
        };
        match &report.bandwidth {
            Ok(bandwidth) => println!("{} {:<14} bandwidth {}", marker, report.strategy, bandwidth),
            Err(e) => {
                warn!("Strategy {} failed: {}", report.strategy, e);
                println!("{} {:<14} failed: {}", marker, report.strategy, e);
            }
        }
    }

    if let Some(output) = &args.output {
        let prepared = prepare::run(&grid, &config, &reporter)?;
        let file = BufWriter::new(File::create(output)?);
        write_permutation_csv(file, &prepared.reordering).map_err(EngineError::from)?;
        info!("Wrote {} permutation to {:?}", config.ordering.strategy, output);
        println!(
            "Permutation ({}) written to: {}",
            config.ordering.strategy,
            output.display()
        );
    }
    Ok(())
}
