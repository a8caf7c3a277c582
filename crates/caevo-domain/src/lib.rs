//! Caevo Domain Layer
//!
//! The temporal relation vocabulary and the value types every other crate
//! builds on. No I/O and no logging happen here.
//!
//! ## Key Concepts
//!
//! - **Relation**: a qualitative temporal relation (BEFORE, INCLUDES, ...)
//!   with inversion and granularity reductions
//! - **RelationMode**: the label granularity a link set is collapsed to
//! - **TLink**: "id1 `relation` id2" plus origin, confidence and closure flag
//! - **LinkRecord**: the serialization contract for TLinks
//! - **Document**: events, time expressions, DCT and the document's TLinks
//! - **Collaborator traits**: feature extraction, classification, model I/O

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod mode;
pub mod record;
pub mod relation;
pub mod tlink;
pub mod traits;

// Re-exports for convenience
pub use document::{Aspect, Document, Event, EventClass, Tense, Timex, TimexType};
pub use mode::RelationMode;
pub use record::{links_from_records, LinkRecord, RecordError};
pub use relation::{ParseError, Relation};
pub use tlink::{EntityId, LinkKind, TLink};
pub use traits::{
    Classifier, FeatureExtractor, Features, ModelError, ModelLoader, ModelTrainer,
    TrainingExample,
};
