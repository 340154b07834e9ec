//! Retrieval strategies and the fixed strategy table

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ComplexityTier;
use crate::domain::DomainError;

pub const FAST: &str = "fast";
pub const BALANCED: &str = "balanced";
pub const COMPREHENSIVE: &str = "comprehensive";

/// A named bundle of retrieval parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalStrategy {
    pub name: String,
    pub complexity: ComplexityTier,
    pub top_k: usize,
    pub estimated_cost: f64,
    pub requires_verification: bool,
    pub max_latency_ms: u64,
}

impl RetrievalStrategy {
    pub fn new(
        name: impl Into<String>,
        complexity: ComplexityTier,
        top_k: usize,
        estimated_cost: f64,
        requires_verification: bool,
        max_latency_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            complexity,
            top_k,
            estimated_cost,
            requires_verification,
            max_latency_ms,
        }
    }
}

/// Immutable lookup table of strategies, one row per tier
#[derive(Debug, Clone)]
pub struct StrategyTable {
    strategies: Vec<RetrievalStrategy>,
}

impl StrategyTable {
    /// Build a table from custom rows.
    ///
    /// Every tier needs exactly one row; `top_k` and `estimated_cost` may not
    /// decrease as tiers get harder.
    pub fn new(mut strategies: Vec<RetrievalStrategy>) -> Result<Self, DomainError> {
        let mut names = HashSet::new();

        for strategy in &strategies {
            if strategy.name.trim().is_empty() {
                return Err(DomainError::validation("Strategy name cannot be empty"));
            }
            if !names.insert(strategy.name.clone()) {
                return Err(DomainError::validation(format!(
                    "Duplicate strategy name '{}'",
                    strategy.name
                )));
            }
            if strategy.top_k == 0 {
                return Err(DomainError::validation(format!(
                    "Strategy '{}' must retrieve at least one document",
                    strategy.name
                )));
            }
            if !(strategy.estimated_cost > 0.0) {
                return Err(DomainError::validation(format!(
                    "Strategy '{}' must have a positive estimated cost",
                    strategy.name
                )));
            }
            if strategy.max_latency_ms == 0 {
                return Err(DomainError::validation(format!(
                    "Strategy '{}' must have a positive latency budget",
                    strategy.name
                )));
            }
        }

        for tier in ComplexityTier::ALL {
            let count = strategies.iter().filter(|s| s.complexity == tier).count();
            if count != 1 {
                return Err(DomainError::validation(format!(
                    "Expected exactly one strategy for tier '{}', found {}",
                    tier, count
                )));
            }
        }

        strategies.sort_by_key(|s| s.complexity);

        for pair in strategies.windows(2) {
            let (lower, higher) = (&pair[0], &pair[1]);
            if higher.top_k < lower.top_k || higher.estimated_cost < lower.estimated_cost {
                return Err(DomainError::validation(format!(
                    "Strategy '{}' must not be cheaper or shallower than '{}'",
                    higher.name, lower.name
                )));
            }
        }

        Ok(Self { strategies })
    }

    /// The standard fast / balanced / comprehensive table
    pub fn standard() -> Self {
        Self {
            strategies: vec![
                RetrievalStrategy::new(FAST, ComplexityTier::Simple, 2, 0.003, false, 200),
                RetrievalStrategy::new(BALANCED, ComplexityTier::Moderate, 5, 0.007, false, 500),
                RetrievalStrategy::new(
                    COMPREHENSIVE,
                    ComplexityTier::Complex,
                    10,
                    0.018,
                    true,
                    1000,
                ),
            ],
        }
    }

    /// Look up a strategy by name
    pub fn get(&self, name: &str) -> Option<&RetrievalStrategy> {
        self.strategies.iter().find(|s| s.name == name)
    }

    /// The strategy assigned to a tier
    pub fn for_tier(&self, tier: ComplexityTier) -> &RetrievalStrategy {
        // Construction guarantees one row per tier, sorted by tier.
        &self.strategies[tier as usize]
    }

    /// The strategy with the lowest estimated cost
    pub fn cheapest(&self) -> &RetrievalStrategy {
        self.for_tier(ComplexityTier::Simple)
    }

    /// All strategies ordered by tier
    pub fn all(&self) -> &[RetrievalStrategy] {
        &self.strategies
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::standard()
    }
}
