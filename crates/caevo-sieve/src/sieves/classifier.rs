//! Classifier-backed sieves

use crate::{Sieve, SieveError};
use caevo_domain::{
    Classifier, Document, EntityId, FeatureExtractor, ModelTrainer, Relation, TLink,
    TrainingExample,
};
use caevo_store::LinkGraph;
use std::fmt;
use std::sync::Arc;

/// Which entity pairs a classifier sieve labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairScope {
    /// Every event against the document creation time
    EventDct,
    /// Events and timexes sharing a sentence
    EventTimeSameSentence,
    /// Event pairs inside one sentence, in textual order
    EventEventSameSentence,
    /// Events in one sentence against events in the next
    EventEventAdjacentSentence,
}

impl PairScope {
    /// Every scope
    pub const ALL: [PairScope; 4] = [
        PairScope::EventDct,
        PairScope::EventTimeSameSentence,
        PairScope::EventEventSameSentence,
        PairScope::EventEventAdjacentSentence,
    ];

    /// Registry name of the sieve covering this scope
    pub fn sieve_name(&self) -> &'static str {
        match self {
            PairScope::EventDct => "MLEventDCT",
            PairScope::EventTimeSameSentence => "MLEventTimeSameSent",
            PairScope::EventEventSameSentence => "MLEventEventSameSent",
            PairScope::EventEventAdjacentSentence => "MLEventEventAdjacentSent",
        }
    }

    /// Scope for a registry name
    pub fn from_sieve_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scope| scope.sieve_name() == name)
    }

    /// Ordered pairs this scope covers in `doc`
    pub fn pairs(&self, doc: &Document) -> Vec<(EntityId, EntityId)> {
        let events = doc.events_by_sentence();
        let mut pairs = Vec::new();
        match self {
            PairScope::EventDct => {
                if let Some(dct) = &doc.dct {
                    pairs.extend(doc.events.iter().map(|e| (e.eiid.clone(), dct.tid.clone())));
                }
            }
            PairScope::EventTimeSameSentence => {
                let timexes = doc.timexes_by_sentence();
                for (sentence_events, sentence_timexes) in events.iter().zip(&timexes) {
                    for event in sentence_events {
                        for timex in sentence_timexes {
                            pairs.push((event.eiid.clone(), timex.tid.clone()));
                        }
                    }
                }
            }
            PairScope::EventEventSameSentence => {
                for sentence_events in &events {
                    for (i, first) in sentence_events.iter().enumerate() {
                        for second in &sentence_events[i + 1..] {
                            pairs.push((first.eiid.clone(), second.eiid.clone()));
                        }
                    }
                }
            }
            PairScope::EventEventAdjacentSentence => {
                for window in events.windows(2) {
                    for first in &window[0] {
                        for second in &window[1] {
                            pairs.push((first.eiid.clone(), second.eiid.clone()));
                        }
                    }
                }
            }
        }
        pairs
    }
}

impl fmt::Display for PairScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sieve_name())
    }
}

/// Label and probability after normalizing log scores
///
/// NaN and negative infinity are ignored. A positive infinite score is
/// certain: the first such label wins with probability 1. Returns `None`
/// when no usable score remains.
pub fn best_label(scores: &[(Relation, f64)]) -> Option<(Relation, f64)> {
    let usable: Vec<(Relation, f64)> = scores
        .iter()
        .copied()
        .filter(|(_, s)| !s.is_nan() && *s != f64::NEG_INFINITY)
        .collect();

    if let Some((label, _)) = usable.iter().find(|(_, s)| *s == f64::INFINITY) {
        return Some((*label, 1.0));
    }

    let max = usable.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = usable.iter().map(|(_, s)| (s - max).exp()).sum();
    // First label wins ties.
    usable
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .map(|(label, s)| (label, (s - max).exp() / total))
}

/// A sieve that labels a scope of pairs with a trained classifier
pub struct ClassifierSieve {
    name: String,
    scope: PairScope,
    extractor: Arc<dyn FeatureExtractor>,
    model: Option<Box<dyn Classifier>>,
    trainer: Option<Arc<dyn ModelTrainer>>,
    min_probability: f64,
}

impl ClassifierSieve {
    /// Create an untrained sieve for `scope`
    pub fn new(scope: PairScope, extractor: Arc<dyn FeatureExtractor>) -> Self {
        Self {
            name: scope.sieve_name().to_string(),
            scope,
            extractor,
            model: None,
            trainer: None,
            min_probability: 0.0,
        }
    }

    /// Use an already loaded model
    pub fn with_model(mut self, model: Box<dyn Classifier>) -> Self {
        self.model = Some(model);
        self
    }

    /// Collaborator used by [`Sieve::train`]
    pub fn with_trainer(mut self, trainer: Arc<dyn ModelTrainer>) -> Self {
        self.trainer = Some(trainer);
        self
    }

    /// Drop links whose label probability is below `threshold`
    pub fn with_min_probability(mut self, threshold: f64) -> Self {
        self.min_probability = threshold;
        self
    }

    /// The pairs this sieve labels
    pub fn scope(&self) -> PairScope {
        self.scope
    }

    /// True once a model is available
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Gold-labelled examples for this scope
    ///
    /// A pair counts when the document holds a gold link for it in either
    /// direction; the label is read in the pair's direction. When gold holds
    /// two links for one pair the first is used.
    pub fn training_examples(&self, docs: &[Document]) -> Vec<TrainingExample> {
        let mut examples = Vec::new();
        for doc in docs {
            let gold = LinkGraph::from_links(doc.tlinks().iter().cloned());
            for (id1, id2) in self.scope.pairs(doc) {
                if let Some(label) = gold.relation_between(&id1, &id2) {
                    examples.push(TrainingExample {
                        features: self.extractor.features(doc, &id1, &id2),
                        label,
                    });
                }
            }
        }
        examples
    }
}

impl fmt::Debug for ClassifierSieve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierSieve")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("ready", &self.is_ready())
            .field("min_probability", &self.min_probability)
            .finish()
    }
}

impl Sieve for ClassifierSieve {
    fn name(&self) -> &str {
        &self.name
    }

    fn annotate(&self, doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| SieveError::ModelUnavailable(self.name.clone()))?;

        let mut proposed = Vec::new();
        let mut trimmed = 0usize;
        for (id1, id2) in self.scope.pairs(doc) {
            let features = self.extractor.features(doc, &id1, &id2);
            let (label, probability) = match best_label(&model.scores(&features)) {
                Some(best) => best,
                None => (model.classify(&features), 0.0),
            };
            if probability < self.min_probability {
                trimmed += 1;
                continue;
            }
            proposed.push(TLink::new(id1, id2, label).with_confidence(probability));
        }

        if trimmed > 0 {
            tracing::debug!(sieve = %self.name, trimmed, "Dropped low-probability labels");
        }
        Ok(proposed)
    }

    fn train(&mut self, docs: &[Document]) -> Result<(), SieveError> {
        let trainer = self
            .trainer
            .clone()
            .ok_or_else(|| SieveError::ModelUnavailable(self.name.clone()))?;
        let examples = self.training_examples(docs);
        tracing::info!(sieve = %self.name, examples = examples.len(), "Training classifier");
        self.model = Some(trainer.train(&self.name, &examples)?);
        Ok(())
    }
}
