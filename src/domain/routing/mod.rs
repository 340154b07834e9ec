//! Complexity classification and strategy routing

pub mod classifier;
mod complexity;
mod router;
pub mod strategy;

pub use classifier::{ExternalClassifier, RuleBasedClassifier, normalize_query};
pub use complexity::ComplexityTier;
pub use router::{BudgetDecision, StrategyRouter};
pub use strategy::{RetrievalStrategy, StrategyTable};

#[cfg(test)]
pub use classifier::MockExternalClassifier;
