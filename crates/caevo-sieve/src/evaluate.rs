//! Precision of proposed links against gold annotations

use caevo_domain::{Document, Relation, RelationMode, TLink};
use caevo_store::LinkGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Origin used for links that carry none
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// Agreement counts for one origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OriginScore {
    /// Same relation as gold
    pub correct: usize,

    /// Gold labels the pair differently
    pub incorrect: usize,

    /// Incorrect where gold is not VAGUE
    pub incorrect_non_vague: usize,

    /// Gold has no link for the pair
    pub no_gold: usize,
}

impl OriginScore {
    /// correct / (correct + incorrect); 0 with nothing judged
    pub fn precision(&self) -> f64 {
        ratio(self.correct, self.correct + self.incorrect)
    }

    /// Precision ignoring disagreements with VAGUE gold links
    pub fn non_vague_precision(&self) -> f64 {
        ratio(self.correct, self.correct + self.incorrect_non_vague)
    }

    fn absorb(&mut self, other: &OriginScore) {
        self.correct += other.correct;
        self.incorrect += other.incorrect;
        self.incorrect_non_vague += other.incorrect_non_vague;
        self.no_gold += other.no_gold;
    }
}

/// Scores per origin plus the gold total
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Scores keyed by link origin
    pub by_origin: BTreeMap<String, OriginScore>,

    /// Gold links seen
    pub gold_total: usize,
}

impl EvaluationReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Score one document's guessed links against its gold links
    ///
    /// Both sides are reduced to `mode` first. Relations are compared after
    /// orienting each pair the same way.
    pub fn add_document(&mut self, guess: &[TLink], gold: &[TLink], mode: RelationMode) {
        let gold_graph = LinkGraph::from_links(gold.iter().map(|l| reduced(l, mode)));
        self.gold_total += gold_graph.len();

        for link in guess.iter().map(|l| reduced(l, mode)) {
            let origin = link.origin.clone().unwrap_or_else(|| UNKNOWN_ORIGIN.to_string());
            let score = self.by_origin.entry(origin).or_default();
            match gold_graph.relation_between(&link.id1, &link.id2) {
                None => score.no_gold += 1,
                Some(expected) if expected == link.relation => score.correct += 1,
                Some(expected) => {
                    score.incorrect += 1;
                    if expected != Relation::Vague {
                        score.incorrect_non_vague += 1;
                    }
                }
            }
        }
    }

    /// Score a corpus, pairing documents by name
    ///
    /// Guessed documents without a gold counterpart are skipped.
    pub fn add_corpus(&mut self, guess: &[Document], gold: &[Document], mode: RelationMode) {
        let gold_by_name: BTreeMap<&str, &Document> =
            gold.iter().map(|d| (d.name.as_str(), d)).collect();
        for doc in guess {
            match gold_by_name.get(doc.name.as_str()) {
                Some(gold_doc) => self.add_document(doc.tlinks(), gold_doc.tlinks(), mode),
                None => tracing::warn!(document = %doc.name, "No gold document to evaluate against"),
            }
        }
    }

    /// Score for one origin
    pub fn score(&self, origin: &str) -> Option<&OriginScore> {
        self.by_origin.get(origin)
    }

    /// All origins summed
    pub fn overall(&self) -> OriginScore {
        let mut total = OriginScore::default();
        for score in self.by_origin.values() {
            total.absorb(score);
        }
        total
    }

    /// Correct links over gold links
    pub fn recall(&self) -> f64 {
        ratio(self.overall().correct, self.gold_total)
    }

    /// One line per origin, then the overall line
    pub fn summary(&self) -> String {
        let line = |name: &str, s: &OriginScore| {
            format!(
                "{:<28} p={:.2}  {} of {}  Non-VAGUE: p={:.2}  {} of {}  no gold {}",
                name,
                s.precision(),
                s.correct,
                s.correct + s.incorrect,
                s.non_vague_precision(),
                s.correct,
                s.correct + s.incorrect_non_vague,
                s.no_gold
            )
        };

        let mut lines: Vec<String> = self
            .by_origin
            .iter()
            .map(|(name, score)| line(name, score))
            .collect();
        lines.push(line("Overall", &self.overall()));
        lines.push(format!("Recall: {:.2} of {} gold links", self.recall(), self.gold_total));
        lines.join("\n")
    }
}

/// Score a single document
pub fn evaluate(guess: &[TLink], gold: &[TLink], mode: RelationMode) -> EvaluationReport {
    let mut report = EvaluationReport::new();
    report.add_document(guess, gold, mode);
    report
}

fn reduced(link: &TLink, mode: RelationMode) -> TLink {
    let mut link = link.clone();
    link.reduce(mode);
    link
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
