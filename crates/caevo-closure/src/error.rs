//! Closure error types

use caevo_domain::ParseError;
use thiserror::Error;

/// Errors that can occur while setting up closure
///
/// Running closure itself never fails: undecidable compositions infer
/// nothing and clashes are reported as [`ClosureConflict`](crate::ClosureConflict)s.
#[derive(Error, Debug)]
pub enum ClosureError {
    /// A rule line does not hold exactly three relations
    #[error("Malformed closure rule at line {line}: {text:?}")]
    MalformedRule {
        /// One-based line number
        line: usize,
        /// The offending line
        text: String,
    },

    /// A rule line names an unknown relation
    #[error("Unknown relation in closure rule at line {line}: {source}")]
    UnknownRelation {
        /// One-based line number
        line: usize,
        /// Underlying parse failure
        source: ParseError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
