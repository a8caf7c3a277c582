//! Error types for the sieve pipeline

use caevo_closure::ClosureError;
use caevo_domain::ModelError;
use thiserror::Error;

/// Errors a single sieve can report for one document
#[derive(Error, Debug)]
pub enum SieveError {
    /// The sieve needs a model it does not have
    #[error("Sieve {0} has no model loaded")]
    ModelUnavailable(String),

    /// Model collaborator failure
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The document lacks something the sieve requires
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Errors that stop a pipeline or batch
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No sieve registered under this name
    #[error("Unknown sieve: {0}")]
    UnknownSieve(String),

    /// Closure engine could not be built
    #[error("Closure error: {0}")]
    Closure(#[from] ClosureError),

    /// A document failed under the abort-all policy
    #[error("Document {document} failed: {reason}")]
    Document {
        /// Document name
        document: String,
        /// What went wrong
        reason: String,
    },

    /// A sieve failed to train
    #[error("Training {sieve} failed: {source}")]
    Training {
        /// Sieve name
        sieve: String,
        /// Underlying failure
        source: SieveError,
    },

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Worker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
