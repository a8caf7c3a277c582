//! Trait definitions for external collaborators
//!
//! Feature extraction, classification and model training live outside the
//! core. The sieves only talk to them through these traits.

use crate::document::Document;
use crate::relation::Relation;
use crate::tlink::EntityId;
use std::collections::BTreeMap;
use thiserror::Error;

/// Sparse named feature vector
pub type Features = BTreeMap<String, f64>;

/// Errors reported by model collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No model stored under the requested name
    #[error("Model not found: {0}")]
    NotFound(String),

    /// Model exists but could not be read
    #[error("Failed to load model: {0}")]
    Load(String),

    /// Training failed or had nothing to learn from
    #[error("Training failed: {0}")]
    Training(String),
}

/// Turns an entity pair into features
///
/// Implemented by the NLP layer, which owns parse trees and lexical resources.
pub trait FeatureExtractor: Send + Sync {
    /// Features for the ordered pair `(id1, id2)` in `doc`
    fn features(&self, doc: &Document, id1: &EntityId, id2: &EntityId) -> Features;
}

/// A trained relation classifier
pub trait Classifier: Send + Sync {
    /// Best label for the features
    fn classify(&self, features: &Features) -> Relation;

    /// Unnormalized log scores per label
    fn scores(&self, features: &Features) -> Vec<(Relation, f64)>;
}

/// Loads serialized classifiers by name
pub trait ModelLoader: Send + Sync {
    /// Load the model stored under `name`
    fn load(&self, name: &str) -> Result<Box<dyn Classifier>, ModelError>;
}

/// One gold-labelled pair gathered for training
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    /// Features of the pair
    pub features: Features,

    /// Gold relation
    pub label: Relation,
}

/// Trains classifiers from labelled examples
pub trait ModelTrainer: Send + Sync {
    /// Train a model named `name` from `examples`
    fn train(&self, name: &str, examples: &[TrainingExample])
        -> Result<Box<dyn Classifier>, ModelError>;
}
