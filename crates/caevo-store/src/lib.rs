//! Caevo Storage Layer
//!
//! Holds the relation graph a document accumulates while the sieves run.
//!
//! # Architecture
//!
//! - One [`LinkGraph`] per document, never shared between documents
//! - Unordered pair index: `{id1, id2}` maps to at most one link
//! - First come wins: duplicates and conflicts are reported, not stored
//!
//! # Examples
//!
//! ```
//! use caevo_domain::{Relation, TLink};
//! use caevo_store::LinkGraph;
//!
//! let mut graph = LinkGraph::new();
//! graph.insert(TLink::new("e1", "t0", Relation::IsIncluded));
//! assert_eq!(graph.len(), 1);
//! ```

#![warn(missing_docs)]

mod graph;

pub use graph::{InsertOutcome, LinkGraph};
