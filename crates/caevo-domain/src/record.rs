//! Link serialization record
//!
//! The one wire format the core owns: `id1`, `id2`, `relation`, `closed` and
//! an optional `origin`. Everything else about document I/O lives outside.

use crate::relation::ParseError;
use crate::tlink::TLink;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning a record into a link
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Relation text did not parse
    #[error("Invalid relation: {0}")]
    Relation(#[from] ParseError),

    /// One of the ids is empty
    #[error("Record is missing an entity id")]
    MissingId,
}

/// Serialized form of a [`TLink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// First endpoint id
    pub id1: String,

    /// Second endpoint id
    pub id2: String,

    /// Relation name
    pub relation: String,

    /// Whether closure produced the link
    #[serde(default)]
    pub closed: bool,

    /// Producer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Convert records to links, keeping the failures apart
///
/// Drivers skip bad records instead of aborting the whole file.
pub fn links_from_records(
    records: impl IntoIterator<Item = LinkRecord>,
) -> (Vec<TLink>, Vec<(LinkRecord, RecordError)>) {
    let mut links = Vec::new();
    let mut rejected = Vec::new();
    for record in records {
        match TLink::from_record(record.clone()) {
            Ok(link) => links.push(link),
            Err(e) => rejected.push((record, e)),
        }
    }
    (links, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;

    fn record(id1: &str, id2: &str, relation: &str) -> LinkRecord {
        LinkRecord {
            id1: id1.to_string(),
            id2: id2.to_string(),
            relation: relation.to_string(),
            closed: false,
            origin: None,
        }
    }

    #[test]
    fn test_canonical_record_roundtrip() {
        let original = LinkRecord {
            origin: Some("TimeTimeSieve".to_string()),
            closed: true,
            ..record("t1", "t2", "BEFORE")
        };
        let link = TLink::from_record(original.clone()).unwrap();
        assert_eq!(link.relation, Relation::Before);
        assert!(link.closed);
        assert_eq!(link.to_record(), original);
    }

    #[test]
    fn test_alias_normalizes_on_read() {
        let link = TLink::from_record(record("e1", "e2", "during")).unwrap();
        assert_eq!(link.relation, Relation::IsIncluded);
        assert_eq!(link.to_record().relation, "IS_INCLUDED");
    }

    #[test]
    fn test_bad_records() {
        assert_eq!(
            TLink::from_record(record("e1", "e2", "nearby")).unwrap_err(),
            RecordError::Relation(ParseError::UnknownRelation("nearby".to_string()))
        );
        assert_eq!(
            TLink::from_record(record("", "e2", "BEFORE")).unwrap_err(),
            RecordError::MissingId
        );
    }

    #[test]
    fn test_json_defaults() {
        let parsed: LinkRecord =
            serde_json::from_str(r#"{"id1":"e1","id2":"e2","relation":"AFTER"}"#).unwrap();
        assert!(!parsed.closed);
        assert!(parsed.origin.is_none());

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(!json.contains("origin"));
    }

    #[test]
    fn test_links_from_records_skips_bad() {
        let (links, rejected) = links_from_records(vec![
            record("e1", "e2", "BEFORE"),
            record("e2", "e3", "???"),
            record("e3", "t0", "IS_INCLUDED"),
        ]);
        assert_eq!(links.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0.id1, "e2");
    }
}
