mod defaults;

use crate::cli::OrderingArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use neurocable::core::ordering::{DisconnectedPolicy, OrderingStrategy};
use neurocable::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOrderingConfig {
    strategy: Option<OrderingStrategy>,
    #[serde(rename = "root-subset")]
    root_subset: Option<String>,
    disconnected: Option<DisconnectedPolicy>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialExportConfig {
    #[serde(rename = "adjacency-matrix")]
    adjacency_matrix: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialPipelineConfig {
    ordering: Option<PartialOrderingConfig>,
    export: Option<PartialExportConfig>,
}

impl PartialPipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the file named by `--config`, or starts empty without one.
    pub fn load(args: &OrderingArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration. Precedence, highest first: explicit
    /// flags, `-S` overrides, the config file, built-in defaults.
    pub fn merge_with_cli(
        mut self,
        args: &OrderingArgs,
        matrix_flag: bool,
    ) -> Result<core_config::PipelineConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let ordering = self.ordering.take().unwrap_or_default();
        let export = self.export.take().unwrap_or_default();

        let disconnected = if args.allow_disconnected {
            DisconnectedPolicy::PerComponent
        } else {
            ordering.disconnected.unwrap_or(defaults.disconnected)
        };

        core_config::PipelineConfigBuilder::new()
            .strategy(args.strategy.or(ordering.strategy).unwrap_or(defaults.strategy))
            .root_subset(
                args.root_subset
                    .clone()
                    .or(ordering.root_subset)
                    .unwrap_or(defaults.root_subset),
            )
            .disconnected(disconnected)
            .adjacency_matrix(
                matrix_flag || export.adjacency_matrix.unwrap_or(defaults.adjacency_matrix),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "ordering.strategy" => {
                    self.ordering
                        .get_or_insert_with(Default::default)
                        .strategy = Some(
                        value_str
                            .parse::<OrderingStrategy>()
                            .map_err(|e| CliError::Config(e.to_string()))?,
                    );
                }
                "ordering.root-subset" => {
                    self.ordering
                        .get_or_insert_with(Default::default)
                        .root_subset = Some(value_str.to_string());
                }
                "ordering.disconnected" => {
                    let policy = match value_str {
                        "fail" => DisconnectedPolicy::Fail,
                        "per-component" => DisconnectedPolicy::PerComponent,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid value for {}: {} (expected fail or per-component)",
                                key, value_str
                            )));
                        }
                    };
                    self.ordering
                        .get_or_insert_with(Default::default)
                        .disconnected = Some(policy);
                }
                "export.adjacency-matrix" => {
                    self.export
                        .get_or_insert_with(Default::default)
                        .adjacency_matrix = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                    })?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
