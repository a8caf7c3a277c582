//! Relation module - the closed temporal relation vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning text into a [`Relation`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text matched no relation or legacy alias
    #[error("Unknown relation: {0}")]
    UnknownRelation(String),

    /// The text matched no relation mode
    #[error("Unknown relation mode: {0}")]
    UnknownMode(String),
}

/// A qualitative temporal relation between two entities
///
/// A link `(id1, id2, r)` reads "id1 `r` id2".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Relation {
    /// id1 ends strictly before id2 starts
    Before,
    /// id1 starts strictly after id2 ends
    After,
    /// id1 ends exactly where id2 starts
    IBefore,
    /// id1 starts exactly where id2 ends
    IAfter,
    /// id2 lies within id1
    Includes,
    /// id1 lies within id2
    IsIncluded,
    /// id1 starts together with id2 and ends first
    Begins,
    /// id2 starts together with id1 and ends first
    BegunBy,
    /// id1 ends together with id2 and starts later
    Ends,
    /// id2 ends together with id1 and starts later
    EndedBy,
    /// Same extent
    Simultaneous,
    /// Some overlap, direction unspecified
    Overlap,
    /// BEFORE or OVERLAP
    BeforeOrOverlap,
    /// OVERLAP or AFTER
    OverlapOrAfter,
    /// Annotators could not decide
    Vague,
    /// No relation
    None,
    /// Not yet labelled
    Unknown,
}

impl Relation {
    /// Every relation, in declaration order
    pub const ALL: [Relation; 17] = [
        Relation::Before,
        Relation::After,
        Relation::IBefore,
        Relation::IAfter,
        Relation::Includes,
        Relation::IsIncluded,
        Relation::Begins,
        Relation::BegunBy,
        Relation::Ends,
        Relation::EndedBy,
        Relation::Simultaneous,
        Relation::Overlap,
        Relation::BeforeOrOverlap,
        Relation::OverlapOrAfter,
        Relation::Vague,
        Relation::None,
        Relation::Unknown,
    ];

    /// Number of relations in the vocabulary
    pub const COUNT: usize = Self::ALL.len();

    /// Canonical upper-case name (e.g. `IS_INCLUDED`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Before => "BEFORE",
            Relation::After => "AFTER",
            Relation::IBefore => "IBEFORE",
            Relation::IAfter => "IAFTER",
            Relation::Includes => "INCLUDES",
            Relation::IsIncluded => "IS_INCLUDED",
            Relation::Begins => "BEGINS",
            Relation::BegunBy => "BEGUN_BY",
            Relation::Ends => "ENDS",
            Relation::EndedBy => "ENDED_BY",
            Relation::Simultaneous => "SIMULTANEOUS",
            Relation::Overlap => "OVERLAP",
            Relation::BeforeOrOverlap => "BEFORE_OR_OVERLAP",
            Relation::OverlapOrAfter => "OVERLAP_OR_AFTER",
            Relation::Vague => "VAGUE",
            Relation::None => "NONE",
            Relation::Unknown => "UNKNOWN",
        }
    }

    /// Position in [`Relation::ALL`], usable as a table index
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Resolve a relation from text
    ///
    /// Handles the legacy aliases `during`, `during_inv` and `identity`,
    /// turns hyphens into underscores and ignores case.
    ///
    /// # Examples
    ///
    /// ```
    /// use caevo_domain::Relation;
    ///
    /// assert_eq!(Relation::normalize("during").unwrap(), Relation::IsIncluded);
    /// assert_eq!(Relation::normalize("begun-by").unwrap(), Relation::BegunBy);
    /// assert!(Relation::normalize("sometime").is_err());
    /// ```
    pub fn normalize(text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("during") {
            return Ok(Relation::IsIncluded);
        }
        if trimmed.eq_ignore_ascii_case("during_inv") {
            return Ok(Relation::Includes);
        }
        if trimmed.eq_ignore_ascii_case("identity") {
            return Ok(Relation::Simultaneous);
        }

        let canonical = trimmed.replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == canonical)
            .ok_or_else(|| ParseError::UnknownRelation(text.to_string()))
    }

    /// The relation seen from the other endpoint
    pub fn invert(&self) -> Self {
        match self {
            Relation::Before => Relation::After,
            Relation::After => Relation::Before,
            Relation::IBefore => Relation::IAfter,
            Relation::IAfter => Relation::IBefore,
            Relation::Includes => Relation::IsIncluded,
            Relation::IsIncluded => Relation::Includes,
            Relation::Begins => Relation::BegunBy,
            Relation::BegunBy => Relation::Begins,
            Relation::Ends => Relation::EndedBy,
            Relation::EndedBy => Relation::Ends,
            Relation::BeforeOrOverlap => Relation::OverlapOrAfter,
            Relation::OverlapOrAfter => Relation::BeforeOrOverlap,
            Relation::Overlap
            | Relation::Simultaneous
            | Relation::Vague
            | Relation::None
            | Relation::Unknown => *self,
        }
    }

    /// True for relations that equal their own inverse
    pub fn is_symmetric(&self) -> bool {
        self.invert() == *self
    }

    /// True for relations that carry no temporal information
    pub fn is_uninformative(&self) -> bool {
        matches!(self, Relation::Vague | Relation::None | Relation::Unknown)
    }

    /// Collapse to the symmetry label set
    pub fn to_symmetry(&self) -> Self {
        match self {
            Relation::IBefore => Relation::Before,
            Relation::Includes | Relation::Begins | Relation::Ends | Relation::Simultaneous => {
                Relation::Overlap
            }
            other => *other,
        }
    }

    /// Collapse to the basic label set
    pub fn to_basic(&self) -> Self {
        self.to_symmetry()
    }

    /// Collapse to BEFORE / NONE
    pub fn to_before(&self) -> Self {
        match self {
            Relation::Before | Relation::IBefore => Relation::Before,
            _ => Relation::None,
        }
    }

    /// Collapse to the reduced label set
    ///
    /// BEGINS and ENDS become INCLUDES, which points the other way: callers
    /// holding a link must swap its endpoints too (see
    /// [`TLink::reduce`](crate::TLink::reduce)).
    pub fn to_reduced(&self) -> Self {
        match self {
            Relation::IBefore => Relation::Before,
            Relation::Begins | Relation::Ends => Relation::Includes,
            other => *other,
        }
    }

    /// True when [`Relation::to_reduced`] reverses the link direction
    pub fn reduction_swaps_endpoints(&self) -> bool {
        matches!(self, Relation::Begins | Relation::Ends)
    }

    /// Collapse to the TempEval label set
    pub fn to_tempeval(&self) -> Self {
        match self {
            Relation::Before
            | Relation::After
            | Relation::None
            | Relation::BeforeOrOverlap
            | Relation::OverlapOrAfter => *self,
            Relation::IBefore => Relation::Before,
            _ => Relation::Overlap,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl TryFrom<String> for Relation {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl From<Relation> for String {
    fn from(relation: Relation) -> Self {
        relation.as_str().to_string()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_relation() -> impl Strategy<Value = Relation> {
        (0..Relation::COUNT).prop_map(|i| Relation::ALL[i])
    }

    proptest! {
        /// Property: inversion is an involution
        #[test]
        fn test_double_inversion(relation in any_relation()) {
            prop_assert_eq!(relation.invert().invert(), relation);
        }

        /// Property: canonical names parse back regardless of case
        #[test]
        fn test_name_roundtrip(relation in any_relation(), lower in any::<bool>()) {
            let name = if lower {
                relation.as_str().to_lowercase()
            } else {
                relation.as_str().to_string()
            };
            prop_assert_eq!(name.parse::<Relation>().unwrap(), relation);
        }

        /// Property: every reduction is idempotent
        #[test]
        fn test_reductions_idempotent(relation in any_relation()) {
            prop_assert_eq!(relation.to_symmetry().to_symmetry(), relation.to_symmetry());
            prop_assert_eq!(relation.to_before().to_before(), relation.to_before());
            prop_assert_eq!(relation.to_tempeval().to_tempeval(), relation.to_tempeval());
            prop_assert_eq!(relation.to_reduced().to_reduced(), relation.to_reduced());
        }
    }
}
