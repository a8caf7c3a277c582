//! Relation granularity modes

use crate::relation::{ParseError, Relation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label granularity a link set can be collapsed to
///
/// The mode is always passed explicitly; nothing in the workspace holds a
/// process-wide "current mode".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationMode {
    /// Keep every label as is
    #[default]
    Full,
    /// IBEFORE as BEFORE, BEGINS/ENDS as reversed INCLUDES
    Reduced,
    /// Same table as symmetry
    Basic,
    /// Fold containment and identity into OVERLAP
    Symmetry,
    /// BEFORE or NONE
    Before,
    /// TempEval label set
    Tempeval,
}

impl RelationMode {
    /// Every mode
    pub const ALL: [RelationMode; 6] = [
        RelationMode::Full,
        RelationMode::Reduced,
        RelationMode::Basic,
        RelationMode::Symmetry,
        RelationMode::Before,
        RelationMode::Tempeval,
    ];

    /// Lower-case mode name
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationMode::Full => "full",
            RelationMode::Reduced => "reduced",
            RelationMode::Basic => "basic",
            RelationMode::Symmetry => "symmetry",
            RelationMode::Before => "before",
            RelationMode::Tempeval => "tempeval",
        }
    }

    /// Apply this mode's reduction to a bare relation
    ///
    /// For [`RelationMode::Reduced`] the endpoint swap is not visible here;
    /// use [`TLink::reduce`](crate::TLink::reduce) on links.
    pub fn apply(&self, relation: Relation) -> Relation {
        match self {
            RelationMode::Full => relation,
            RelationMode::Reduced => relation.to_reduced(),
            RelationMode::Basic => relation.to_basic(),
            RelationMode::Symmetry => relation.to_symmetry(),
            RelationMode::Before => relation.to_before(),
            RelationMode::Tempeval => relation.to_tempeval(),
        }
    }
}

impl fmt::Display for RelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == lowered)
            .ok_or_else(|| ParseError::UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("FULL".parse::<RelationMode>().unwrap(), RelationMode::Full);
        assert_eq!("tempeval".parse::<RelationMode>().unwrap(), RelationMode::Tempeval);
        assert!(matches!(
            "coarse".parse::<RelationMode>(),
            Err(ParseError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_full_is_identity() {
        for relation in Relation::ALL {
            assert_eq!(RelationMode::Full.apply(relation), relation);
        }
    }

    #[test]
    fn test_basic_matches_symmetry() {
        for relation in Relation::ALL {
            assert_eq!(
                RelationMode::Basic.apply(relation),
                RelationMode::Symmetry.apply(relation)
            );
        }
    }
}
