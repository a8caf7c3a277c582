//! TLink module - a labelled temporal link between two entities

use crate::mode::RelationMode;
use crate::record::{LinkRecord, RecordError};
use crate::relation::Relation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an event or time expression
///
/// Ids are owned by the external document model. By corpus convention timex
/// ids start with `t` (`t0`, `t12`) and event instance ids with `e` or `ei`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap a raw id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for an empty or whitespace-only id
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// True when the id names a time expression
    pub fn is_time(&self) -> bool {
        self.0.starts_with('t')
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which kinds of entity a link connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Two events
    EventEvent,
    /// An event and a time expression, in either order
    EventTime,
    /// Two time expressions
    TimeTime,
}

impl LinkKind {
    /// Infer the kind from the id convention
    pub fn infer(id1: &EntityId, id2: &EntityId) -> Self {
        match (id1.is_time(), id2.is_time()) {
            (true, true) => LinkKind::TimeTime,
            (false, false) => LinkKind::EventEvent,
            _ => LinkKind::EventTime,
        }
    }

    /// Short code used in logs and reports
    pub fn code(&self) -> &'static str {
        match self {
            LinkKind::EventEvent => "ee",
            LinkKind::EventTime => "et",
            LinkKind::TimeTime => "tt",
        }
    }

    /// True if at least one endpoint is a time expression
    pub fn involves_time(&self) -> bool {
        !matches!(self, LinkKind::EventEvent)
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A temporal link: "id1 `relation` id2"
///
/// Serialized through [`LinkRecord`], so confidence and kind are not part of
/// the wire form. Kind is re-inferred and confidence defaults to 1.0 on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LinkRecord", into = "LinkRecord")]
pub struct TLink {
    /// First endpoint
    pub id1: EntityId,

    /// Second endpoint
    pub id2: EntityId,

    /// Relation from id1 to id2
    pub relation: Relation,

    /// Name of the sieve (or annotator) that produced the link
    pub origin: Option<String>,

    /// Producer confidence in [0, 1]
    pub confidence: f64,

    /// True for links inferred by closure
    pub closed: bool,

    /// Kinds of the two endpoints
    pub kind: LinkKind,
}

impl TLink {
    /// Create an explicit link with full confidence and inferred kind
    ///
    /// # Examples
    ///
    /// ```
    /// use caevo_domain::{LinkKind, Relation, TLink};
    ///
    /// let link = TLink::new("e1", "t1", Relation::IsIncluded);
    /// assert_eq!(link.kind, LinkKind::EventTime);
    /// assert!(!link.closed);
    /// ```
    pub fn new(id1: impl Into<EntityId>, id2: impl Into<EntityId>, relation: Relation) -> Self {
        let id1 = id1.into();
        let id2 = id2.into();
        let kind = LinkKind::infer(&id1, &id2);
        Self {
            id1,
            id2,
            relation,
            origin: None,
            confidence: 1.0,
            closed: false,
            kind,
        }
    }

    /// Create a link inferred by closure
    pub fn inferred(id1: impl Into<EntityId>, id2: impl Into<EntityId>, relation: Relation) -> Self {
        Self {
            closed: true,
            ..Self::new(id1, id2, relation)
        }
    }

    /// Set the origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Set the confidence, clamped to [0, 1]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    /// Override the inferred kind
    pub fn with_kind(mut self, kind: LinkKind) -> Self {
        self.kind = kind;
        self
    }

    /// True when both links connect the same two entities, in either order
    pub fn covers_same_pair(&self, other: &TLink) -> bool {
        (self.id1 == other.id1 && self.id2 == other.id2)
            || (self.id1 == other.id2 && self.id2 == other.id1)
    }

    /// True when both links state the same fact, allowing for swapped endpoints
    pub fn compare_to_tlink(&self, other: &TLink) -> bool {
        if self.id1 == other.id1 && self.id2 == other.id2 {
            self.relation == other.relation
        } else if self.id1 == other.id2 && self.id2 == other.id1 {
            self.relation.invert() == other.relation
        } else {
            false
        }
    }

    /// True when both links cover the same pair but disagree on the relation
    pub fn conflicts_with(&self, other: &TLink) -> bool {
        self.covers_same_pair(other) && !self.compare_to_tlink(other)
    }

    /// The relation read in lexicographic id order
    pub fn ordered_relation(&self) -> Relation {
        if self.id1 < self.id2 {
            self.relation
        } else {
            self.relation.invert()
        }
    }

    /// The endpoints in lexicographic order
    pub fn ordered_pair(&self) -> (&EntityId, &EntityId) {
        if self.id1 < self.id2 {
            (&self.id1, &self.id2)
        } else {
            (&self.id2, &self.id1)
        }
    }

    /// The same fact with endpoints swapped
    pub fn inverted(&self) -> TLink {
        TLink {
            id1: self.id2.clone(),
            id2: self.id1.clone(),
            relation: self.relation.invert(),
            ..self.clone()
        }
    }

    /// The same fact in canonical lexicographic orientation
    pub fn ordered(&self) -> TLink {
        if self.id1 <= self.id2 {
            self.clone()
        } else {
            self.inverted()
        }
    }

    /// Rewrite backward relations into their forward form
    ///
    /// AFTER, IAFTER, IS_INCLUDED, BEGUN_BY and ENDED_BY links are flipped,
    /// so `(e1, e2, AFTER)` becomes `(e2, e1, BEFORE)`.
    pub fn to_one_direction(&mut self) {
        if matches!(
            self.relation,
            Relation::After
                | Relation::IAfter
                | Relation::IsIncluded
                | Relation::BegunBy
                | Relation::EndedBy
        ) {
            std::mem::swap(&mut self.id1, &mut self.id2);
            self.relation = self.relation.invert();
        }
    }

    /// Collapse the relation to the given granularity
    ///
    /// In [`RelationMode::Reduced`], BEGINS and ENDS links turn into INCLUDES
    /// with the endpoints swapped.
    pub fn reduce(&mut self, mode: RelationMode) {
        if mode == RelationMode::Reduced && self.relation.reduction_swaps_endpoints() {
            std::mem::swap(&mut self.id1, &mut self.id2);
        }
        self.relation = mode.apply(self.relation);
    }

    /// Build the serialization record for this link
    pub fn to_record(&self) -> LinkRecord {
        LinkRecord {
            id1: self.id1.as_str().to_string(),
            id2: self.id2.as_str().to_string(),
            relation: self.relation.as_str().to_string(),
            closed: self.closed,
            origin: self.origin.clone(),
        }
    }

    /// Rebuild a link from a serialization record
    pub fn from_record(record: LinkRecord) -> Result<Self, RecordError> {
        if record.id1.trim().is_empty() || record.id2.trim().is_empty() {
            return Err(RecordError::MissingId);
        }
        let relation = Relation::normalize(&record.relation)?;
        let mut link = TLink::new(record.id1, record.id2, relation);
        link.closed = record.closed;
        link.origin = record.origin;
        Ok(link)
    }
}

impl fmt::Display for TLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id1, self.relation, self.id2)?;
        if self.closed {
            f.write_str(" (closed)")?;
        }
        Ok(())
    }
}

impl TryFrom<LinkRecord> for TLink {
    type Error = RecordError;

    fn try_from(record: LinkRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl From<TLink> for LinkRecord {
    fn from(link: TLink) -> Self {
        link.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_time_convention() {
        assert!(EntityId::new("t0").is_time());
        assert!(!EntityId::new("e12").is_time());
        assert!(!EntityId::new("ei3").is_time());
        assert!(EntityId::new("  ").is_empty());
    }

    #[test]
    fn test_kind_inference() {
        assert_eq!(TLink::new("e1", "e2", Relation::Before).kind, LinkKind::EventEvent);
        assert_eq!(TLink::new("t1", "e2", Relation::Before).kind, LinkKind::EventTime);
        assert_eq!(TLink::new("t1", "t2", Relation::Before).kind, LinkKind::TimeTime);
        assert!(LinkKind::TimeTime.involves_time());
        assert!(!LinkKind::EventEvent.involves_time());
        assert_eq!(LinkKind::EventTime.code(), "et");
    }

    #[test]
    fn test_inverse_links_agree() {
        let l1 = TLink::new("a", "b", Relation::Includes);
        let l2 = TLink::new("b", "a", Relation::IsIncluded);
        assert!(l1.compare_to_tlink(&l2));
        assert!(!l1.conflicts_with(&l2));
        assert!(l1.covers_same_pair(&l2));
    }

    #[test]
    fn test_conflicting_links() {
        let l1 = TLink::new("a", "b", Relation::Before);
        let l2 = TLink::new("a", "b", Relation::After);
        let l3 = TLink::new("b", "a", Relation::Before);
        assert!(l1.conflicts_with(&l2));
        assert!(l1.conflicts_with(&l3));
        assert!(!l1.compare_to_tlink(&l2));
    }

    #[test]
    fn test_different_pairs_never_conflict() {
        let l1 = TLink::new("a", "b", Relation::Before);
        let l2 = TLink::new("a", "c", Relation::After);
        assert!(!l1.conflicts_with(&l2));
        assert!(!l1.compare_to_tlink(&l2));
        assert!(!l1.covers_same_pair(&l2));
    }

    #[test]
    fn test_ordered_relation() {
        let forward = TLink::new("e1", "e2", Relation::Before);
        let backward = TLink::new("e2", "e1", Relation::After);
        assert_eq!(forward.ordered_relation(), Relation::Before);
        assert_eq!(backward.ordered_relation(), Relation::Before);
        assert_eq!(backward.ordered_pair(), (&EntityId::new("e1"), &EntityId::new("e2")));
        assert_eq!(backward.ordered(), forward);
    }

    #[test]
    fn test_to_one_direction() {
        let mut link = TLink::new("e1", "e2", Relation::After);
        link.to_one_direction();
        assert_eq!(link.id1.as_str(), "e2");
        assert_eq!(link.id2.as_str(), "e1");
        assert_eq!(link.relation, Relation::Before);

        let mut link = TLink::new("e1", "e2", Relation::Includes);
        link.to_one_direction();
        assert_eq!(link.id1.as_str(), "e1");
        assert_eq!(link.relation, Relation::Includes);
    }

    #[test]
    fn test_reduce_begins_swaps_endpoints() {
        let mut link = TLink::new("e1", "t1", Relation::Begins);
        link.reduce(RelationMode::Reduced);
        assert_eq!(link.id1.as_str(), "t1");
        assert_eq!(link.id2.as_str(), "e1");
        assert_eq!(link.relation, Relation::Includes);
    }

    #[test]
    fn test_reduce_other_modes_keep_endpoints() {
        let mut link = TLink::new("e1", "t1", Relation::Begins);
        link.reduce(RelationMode::Symmetry);
        assert_eq!(link.id1.as_str(), "e1");
        assert_eq!(link.relation, Relation::Overlap);
    }

    #[test]
    fn test_confidence_clamped() {
        let link = TLink::new("e1", "e2", Relation::Before).with_confidence(1.7);
        assert_eq!(link.confidence, 1.0);
        let link = TLink::new("e1", "e2", Relation::Before).with_confidence(f64::NAN);
        assert_eq!(link.confidence, 0.0);
    }

    #[test]
    fn test_display() {
        let link = TLink::inferred("e1", "e3", Relation::Before);
        assert_eq!(link.to_string(), "e1 BEFORE e3 (closed)");
    }

    #[test]
    fn test_serde_through_record() {
        let link = TLink::new("e1", "t0", Relation::IsIncluded).with_origin("EventCreationTimeSieve");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["relation"], "IS_INCLUDED");
        assert_eq!(json["closed"], false);
        assert_eq!(json["origin"], "EventCreationTimeSieve");

        let back: TLink = serde_json::from_value(json).unwrap();
        assert_eq!(back, link);
    }
}
