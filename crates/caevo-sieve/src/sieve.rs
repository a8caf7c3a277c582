//! The sieve contract

use crate::SieveError;
use caevo_domain::{Document, TLink};
use caevo_store::LinkGraph;

/// One pass of the pipeline
///
/// A sieve reads the document and the links accepted so far and proposes new
/// links. It never mutates the graph; the pipeline decides what is merged.
pub trait Sieve: Send + Sync {
    /// Name recorded as the origin of every link this sieve adds
    fn name(&self) -> &str;

    /// Propose links for one document
    fn annotate(&self, doc: &Document, graph: &LinkGraph) -> Result<Vec<TLink>, SieveError>;

    /// Learn from gold-annotated documents
    ///
    /// Rule sieves have nothing to learn.
    fn train(&mut self, _docs: &[Document]) -> Result<(), SieveError> {
        Ok(())
    }
}
