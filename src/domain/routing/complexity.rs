//! Query complexity tiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Coarse classification of query difficulty used to pick retrieval depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Simple,
    Moderate,
    Complex,
}

impl ComplexityTier {
    /// All tiers in ascending order of difficulty
    pub const ALL: [ComplexityTier; 3] = [Self::Simple, Self::Moderate, Self::Complex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityTier {
    type Err = DomainError;

    /// Parses a tier label, tolerating surrounding whitespace and case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            other => Err(DomainError::validation(format!(
                "Unknown complexity tier '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("simple".parse::<ComplexityTier>().unwrap(), ComplexityTier::Simple);
        assert_eq!(" Moderate\n".parse::<ComplexityTier>().unwrap(), ComplexityTier::Moderate);
        assert_eq!("COMPLEX".parse::<ComplexityTier>().unwrap(), ComplexityTier::Complex);
        assert!("trivial".parse::<ComplexityTier>().is_err());
    }

    #[test]
    fn test_ordering_follows_difficulty() {
        assert!(ComplexityTier::Simple < ComplexityTier::Moderate);
        assert!(ComplexityTier::Moderate < ComplexityTier::Complex);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ComplexityTier::Complex).unwrap(),
            "\"complex\""
        );
        let tier: ComplexityTier = serde_json::from_str("\"simple\"").unwrap();
        assert_eq!(tier, ComplexityTier::Simple);
    }
}
