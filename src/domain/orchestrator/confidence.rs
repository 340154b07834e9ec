//! Confidence scoring from retrieval similarity

use serde::{Deserialize, Serialize};

use crate::domain::routing::RetrievalStrategy;

/// Tunable constants of the confidence heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceParams {
    #[serde(default = "default_score_offset")]
    pub score_offset: f64,
    #[serde(default = "default_score_scale")]
    pub score_scale: f64,
    /// Mean of the top three scores must exceed this to earn the agreement boost
    #[serde(default = "default_boost_mean_threshold")]
    pub boost_mean_threshold: f64,
    #[serde(default = "default_boost_factor")]
    pub boost_factor: f64,
    /// Verified strategies below this confidence are flagged for review
    #[serde(default = "default_verification_threshold")]
    pub verification_threshold: f64,
}

fn default_score_offset() -> f64 {
    0.15
}

fn default_score_scale() -> f64 {
    2.0
}

fn default_boost_mean_threshold() -> f64 {
    0.35
}

fn default_boost_factor() -> f64 {
    1.05
}

fn default_verification_threshold() -> f64 {
    0.90
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            score_offset: default_score_offset(),
            score_scale: default_score_scale(),
            boost_mean_threshold: default_boost_mean_threshold(),
            boost_factor: default_boost_factor(),
            verification_threshold: default_verification_threshold(),
        }
    }
}

/// Maps raw similarity scores (typically 0.3 to 0.7 for good matches) to a 0..=1 confidence
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    params: ConfidenceParams,
}

impl ConfidenceScorer {
    pub fn new(params: ConfidenceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ConfidenceParams {
        &self.params
    }

    /// Score documents ordered best first
    pub fn score(&self, scores: &[f32]) -> f64 {
        let Some(&top) = scores.first() else {
            return 0.0;
        };

        let p = &self.params;
        let mut confidence = ((f64::from(top) + p.score_offset) * p.score_scale).min(1.0);

        if scores.len() >= 2 {
            let top_three = &scores[..scores.len().min(3)];
            let mean =
                top_three.iter().map(|s| f64::from(*s)).sum::<f64>() / top_three.len() as f64;
            if mean > p.boost_mean_threshold {
                confidence = (confidence * p.boost_factor).min(1.0);
            }
        }

        confidence.clamp(0.0, 1.0)
    }

    /// Whether a result must be flagged for review. Never changes the confidence.
    pub fn needs_review(
        &self,
        confidence: f64,
        strategy: &RetrievalStrategy,
        enable_verification: bool,
    ) -> bool {
        enable_verification
            && strategy.requires_verification
            && confidence < self.params.verification_threshold
    }
}
