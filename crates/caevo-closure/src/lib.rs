//! Caevo Closure
//!
//! Infers the temporal links implied by transitivity.
//!
//! The engine provides:
//! - A composition table derived from interval algebra, or loaded from a
//!   rule file
//! - Fixed-point closure over a [`LinkGraph`](caevo_store::LinkGraph) with a
//!   bounded number of passes
//! - Conflict reporting for inferences that contradict stored links
//!
//! # Examples
//!
//! ```
//! use caevo_closure::{ClosureConfig, ClosureEngine};
//! use caevo_domain::{Relation, TLink};
//! use caevo_store::LinkGraph;
//!
//! let engine = ClosureEngine::new(ClosureConfig::default()).unwrap();
//! let graph = LinkGraph::from_links(vec![
//!     TLink::new("e1", "t0", Relation::IsIncluded),
//!     TLink::new("t0", "t1", Relation::Before),
//! ]);
//!
//! let report = engine.expand(&graph);
//! assert_eq!(report.links.len(), 1);
//! assert!(report.is_consistent());
//! ```

#![warn(missing_docs)]

mod algebra;
mod config;
mod engine;
mod error;
mod table;

pub use config::ClosureConfig;
pub use engine::{ClosureConflict, ClosureEngine, ClosureReport};
pub use error::ClosureError;
pub use table::CompositionTable;
