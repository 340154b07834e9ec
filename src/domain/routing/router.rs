//! Strategy selection and budget enforcement

use std::sync::Arc;

use tracing::{debug, warn};

use super::{ComplexityTier, RetrievalStrategy, StrategyTable};

/// Outcome of the per-query cost ceiling check
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDecision {
    pub strategy: RetrievalStrategy,
    pub downgraded: bool,
}

/// Maps complexity tiers (or explicit overrides) to retrieval strategies
#[derive(Debug, Clone)]
pub struct StrategyRouter {
    table: Arc<StrategyTable>,
}

impl StrategyRouter {
    pub fn new(table: Arc<StrategyTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &StrategyTable {
        &self.table
    }

    /// Select a strategy for a tier. A known override name wins unconditionally;
    /// unknown overrides are ignored.
    pub fn select_strategy(
        &self,
        tier: ComplexityTier,
        override_name: Option<&str>,
    ) -> RetrievalStrategy {
        if let Some(name) = override_name {
            match self.table.get(name) {
                Some(strategy) => {
                    debug!(strategy = %name, "Using strategy override");
                    return strategy.clone();
                }
                None => warn!(strategy = %name, "Ignoring unknown strategy override"),
            }
        }

        self.table.for_tier(tier).clone()
    }

    /// Downgrade to the cheapest strategy when the estimated cost exceeds the ceiling
    pub fn apply_budget(&self, strategy: RetrievalStrategy, max_cost: f64) -> BudgetDecision {
        if strategy.estimated_cost > max_cost {
            let cheapest = self.table.cheapest().clone();
            warn!(
                strategy = %strategy.name,
                estimated_cost = strategy.estimated_cost,
                max_cost,
                downgraded_to = %cheapest.name,
                "Strategy exceeds cost budget, downgrading"
            );
            return BudgetDecision {
                strategy: cheapest,
                downgraded: true,
            };
        }

        BudgetDecision {
            strategy,
            downgraded: false,
        }
    }
}

impl Default for StrategyRouter {
    fn default() -> Self {
        Self::new(Arc::new(StrategyTable::standard()))
    }
}
