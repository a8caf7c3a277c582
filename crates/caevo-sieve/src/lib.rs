//! Caevo Sieve
//!
//! Builds a document's temporal link graph one sieve at a time.
//!
//! # Overview
//!
//! A sieve is a small, focused annotator: one orders time expressions by
//! their values, another places reporting verbs on the creation day, others
//! wrap trained classifiers. Sieves run in a fixed order and every link an
//! earlier sieve commits to is final. After each sieve, transitive closure
//! spreads the new links so later sieves see their consequences.
//!
//! # Architecture
//!
//! ```text
//! Document → Sieve₁ → LinkGraph → Closure → Sieve₂ → ... → Document links
//! ```
//!
//! # Key Features
//!
//! - **Rule sieves**: time/time ordering, creation-day reporting events,
//!   tense rules against the creation time, an all-VAGUE fallback
//! - **Classifier sieves**: pluggable feature extraction and models
//! - **Metrics**: per-sieve proposed, merged and rejected counts
//! - **Evaluation**: precision per sieve against gold links
//! - **Batch processing**: bounded parallel runs over a corpus
//!
//! # Example Usage
//!
//! ```
//! use caevo_domain::{Document, Event, EventClass, Tense, Aspect, Timex, TimexType};
//! use caevo_sieve::{PipelineConfig, SievePipeline, SieveRegistry};
//!
//! let mut doc = Document::new("wsj_0001", 1);
//! doc.set_dct(Timex::new("t0", 0, 0, TimexType::Date, "1998-01-08"));
//! doc.add_event(
//!     Event::new("e1", 0, 2).with_attributes(EventClass::Reporting, Tense::Past, Aspect::None),
//! );
//!
//! let config = PipelineConfig::default();
//! let pipeline = SievePipeline::from_config(&config, &SieveRegistry::new()).unwrap();
//! let metrics = pipeline.annotate(&mut doc).unwrap();
//!
//! assert_eq!(doc.tlinks().len(), 1);
//! assert_eq!(metrics.sieve("EventCreationTimeSieve").map(|s| s.added), Some(1));
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod evaluate;
mod pipeline;
mod registry;
mod sieve;
mod sieves;
mod stats;
mod timex;


pub use batch::{BatchFailure, BatchResult, BatchRunner};
pub use config::{ErrorPolicy, PipelineConfig, RepCreationDayConfig};
pub use error::{PipelineError, SieveError};
pub use evaluate::{evaluate, EvaluationReport, OriginScore, UNKNOWN_ORIGIN};
pub use pipeline::{train_sieves, DocumentOutcome, SievePipeline};
pub use registry::SieveRegistry;
pub use sieve::Sieve;
pub use sieves::{
    best_label, AllVagueSieve, ClassifierSieve, EventCreationTimeSieve, PairScope,
    RepCreationDaySieve, TimeTimeSieve,
};
pub use stats::{PipelineMetrics, SieveStats};
pub use timex::{creation_day, TimeInterval};
