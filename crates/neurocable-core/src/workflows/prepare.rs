use crate::core::io::swc::SwcFile;
use crate::core::io::traits::CableFile;
use crate::core::io::ugx::UgxFile;
use crate::core::models::cell::NeuronCell;
use crate::core::models::grid::Grid;
use crate::core::ordering::reordering::{Reordering, ReorderingError};
use crate::core::ordering::strategy::{OrderingStrategy, compute_ordering, matrix_bandwidth, soma_root};
use crate::engine::config::{OrderingConfig, PipelineConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{info, instrument, warn};

/// A cell ready for assembly, together with the numbering that produced it.
#[derive(Debug, Clone)]
pub struct PreparedCell {
    pub reordering: Reordering,
    pub cell: NeuronCell,
    /// Matrix bandwidth of the grid under `reordering`.
    pub bandwidth: usize,
}

/// Bandwidth of one ordering strategy, or why it could not be computed.
#[derive(Debug)]
pub struct StrategyReport {
    pub strategy: OrderingStrategy,
    pub bandwidth: Result<usize, ReorderingError>,
}

#[instrument(skip_all, name = "prepare_workflow")]
pub fn run(
    grid: &Grid,
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<PreparedCell, EngineError> {
    // === Phase 1: Ordering ===
    reporter.report(Progress::PhaseStart { name: "Ordering" });
    let reordering = order_grid(grid, &config.ordering, config.ordering.strategy)?;
    let native_bandwidth = matrix_bandwidth(grid, None);
    let bandwidth = matrix_bandwidth(grid, Some(&reordering));
    info!(
        "{} ordering over {} vertices: bandwidth {} -> {}.",
        config.ordering.strategy,
        grid.vertex_count(),
        native_bandwidth,
        bandwidth
    );
    reporter.report(Progress::Message(format!(
        "Bandwidth {} -> {}",
        native_bandwidth, bandwidth
    )));
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Cell construction ===
    reporter.report(Progress::PhaseStart {
        name: "Building Cell",
    });
    let cell = NeuronCell::build_from_grid_with_soma(
        grid,
        Some(&reordering),
        &config.ordering.root_subset,
    )?;
    if cell.soma_ids().is_empty() {
        warn!(
            "Grid has no '{}' subset; the cell has no soma nodes.",
            config.ordering.root_subset
        );
    }
    reporter.report(Progress::PhaseFinish);

    info!(
        "Workflow complete. Cell has {} nodes and {} edges.",
        cell.vertex_count(),
        cell.edge_count()
    );
    Ok(PreparedCell {
        reordering,
        cell,
        bandwidth,
    })
}

/// Loads a UGX grid and runs [`run`] on it. The grid is returned alongside
/// the prepared cell so callers can export against the original mesh.
pub fn prepare_from_path(
    path: &Path,
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<(Grid, PreparedCell), EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading Grid",
    });
    let grid = UgxFile::read_from_path(path)?;
    info!(
        "Loaded grid from {:?}: {} vertices, {} edges, {} subsets.",
        path,
        grid.vertex_count(),
        grid.edge_count(),
        grid.subsets().len()
    );
    reporter.report(Progress::PhaseFinish);

    let prepared = run(&grid, config, reporter)?;
    Ok((grid, prepared))
}

/// Loads an SWC morphology. SWC samples are already numbered parent before
/// child, so no ordering phase runs.
pub fn load_morphology(path: &Path, reporter: &ProgressReporter) -> Result<NeuronCell, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading Morphology",
    });
    let cell = SwcFile::read_from_path(path)?;
    info!(
        "Loaded morphology from {:?}: {} nodes, {} soma nodes.",
        path,
        cell.vertex_count(),
        cell.soma_ids().len()
    );
    reporter.report(Progress::PhaseFinish);
    Ok(cell)
}

/// Computes the bandwidth every known strategy achieves on `grid`.
///
/// A strategy that fails (for example depth-first on a disconnected grid)
/// is reported with its error instead of aborting the comparison.
#[instrument(skip_all, name = "compare_strategies")]
pub fn compare_strategies(
    grid: &Grid,
    ordering: &OrderingConfig,
    reporter: &ProgressReporter,
) -> Vec<StrategyReport> {
    reporter.report(Progress::TaskStart {
        total_steps: OrderingStrategy::ALL.len() as u64,
    });
    let reports = OrderingStrategy::ALL
        .iter()
        .map(|&strategy| {
            let bandwidth = order_grid(grid, ordering, strategy)
                .map(|reordering| matrix_bandwidth(grid, Some(&reordering)));
            reporter.report(Progress::TaskIncrement);
            StrategyReport {
                strategy,
                bandwidth,
            }
        })
        .collect();
    reporter.report(Progress::TaskFinish);
    reports
}

fn order_grid(
    grid: &Grid,
    ordering: &OrderingConfig,
    strategy: OrderingStrategy,
) -> Result<Reordering, ReorderingError> {
    let root = match strategy {
        OrderingStrategy::Identity => 0,
        _ => soma_root(grid, &ordering.root_subset)?,
    };
    compute_ordering(grid, strategy, root, ordering.disconnected)
}
