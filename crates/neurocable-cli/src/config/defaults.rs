use neurocable::core::models::grid::SOMA_SUBSET_NAME;
use neurocable::core::ordering::{DisconnectedPolicy, OrderingStrategy};

/// Values used when neither the config file nor the command line sets them.
pub struct DefaultsConfig {
    pub strategy: OrderingStrategy,
    pub root_subset: String,
    pub disconnected: DisconnectedPolicy,
    pub adjacency_matrix: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            strategy: OrderingStrategy::DepthFirst,
            root_subset: SOMA_SUBSET_NAME.to_string(),
            disconnected: DisconnectedPolicy::Fail,
            adjacency_matrix: false,
        }
    }
}
