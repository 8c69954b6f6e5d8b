use crate::core::models::grid::SOMA_SUBSET_NAME;
use crate::core::ordering::strategy::{DisconnectedPolicy, OrderingStrategy};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingConfig {
    pub strategy: OrderingStrategy,
    /// Subset whose first vertex roots the traversal.
    pub root_subset: String,
    pub disconnected: DisconnectedPolicy,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            strategy: OrderingStrategy::default(),
            root_subset: SOMA_SUBSET_NAME.to_string(),
            disconnected: DisconnectedPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    pub adjacency_matrix: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub ordering: OrderingConfig,
    pub export: ExportConfig,
}

/// Builder for [`PipelineConfig`]. Unset fields fall back to the defaults:
/// depth-first ordering rooted at the `"soma"` subset, failing on
/// disconnected grids, with no adjacency matrix export.
#[derive(Default)]
pub struct PipelineConfigBuilder {
    strategy: Option<OrderingStrategy>,
    root_subset: Option<String>,
    disconnected: Option<DisconnectedPolicy>,
    adjacency_matrix: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: OrderingStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn root_subset(mut self, name: impl Into<String>) -> Self {
        self.root_subset = Some(name.into());
        self
    }
    pub fn disconnected(mut self, policy: DisconnectedPolicy) -> Self {
        self.disconnected = Some(policy);
        self
    }
    pub fn adjacency_matrix(mut self, enabled: bool) -> Self {
        self.adjacency_matrix = Some(enabled);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let defaults = OrderingConfig::default();
        let root_subset = self.root_subset.unwrap_or(defaults.root_subset);
        if root_subset.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "root_subset",
                reason: "subset name must not be empty",
            });
        }
        Ok(PipelineConfig {
            ordering: OrderingConfig {
                strategy: self.strategy.unwrap_or(defaults.strategy),
                root_subset,
                disconnected: self.disconnected.unwrap_or(defaults.disconnected),
            },
            export: ExportConfig {
                adjacency_matrix: self.adjacency_matrix.unwrap_or(false),
            },
        })
    }
}
