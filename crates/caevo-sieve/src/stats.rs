//! Per-sieve counters collected while the pipeline runs

use caevo_store::InsertOutcome;
use serde::Serialize;

/// What one sieve contributed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SieveStats {
    /// Sieve name
    pub name: String,

    /// Links the sieve proposed
    pub proposed: usize,

    /// Proposals merged into the graph
    pub added: usize,

    /// Proposals repeating a link already held
    pub duplicates: usize,

    /// Proposals contradicting a link already held
    pub conflicts: usize,

    /// Proposals with an empty id or a self-loop
    pub invalid: usize,

    /// Links closure inferred after this sieve
    pub closure_added: usize,

    /// Inferences closure rejected after this sieve
    pub closure_conflicts: usize,

    /// Documents the sieve failed on
    pub failures: usize,
}

impl SieveStats {
    /// Empty counters for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Count one merge result
    pub fn record_outcome(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Added => self.added += 1,
            InsertOutcome::RejectedDuplicate => self.duplicates += 1,
            InsertOutcome::RejectedConflict => self.conflicts += 1,
            InsertOutcome::RejectedInvalid => self.invalid += 1,
        }
    }

    /// Proposals that were not merged
    pub fn removed(&self) -> usize {
        self.duplicates + self.conflicts + self.invalid
    }

    /// Add another run's counters for the same sieve
    pub fn absorb(&mut self, other: &SieveStats) {
        self.proposed += other.proposed;
        self.added += other.added;
        self.duplicates += other.duplicates;
        self.conflicts += other.conflicts;
        self.invalid += other.invalid;
        self.closure_added += other.closure_added;
        self.closure_conflicts += other.closure_conflicts;
        self.failures += other.failures;
    }
}

/// Counters for a whole pipeline run, sieves in pipeline order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineMetrics {
    /// One entry per sieve
    pub sieves: Vec<SieveStats>,

    /// Documents completed
    pub documents: usize,

    /// Documents that failed outright
    pub failed_documents: usize,
}

impl PipelineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `name`, created on first use
    pub fn sieve_mut(&mut self, name: &str) -> &mut SieveStats {
        let position = match self.sieves.iter().position(|s| s.name == name) {
            Some(position) => position,
            None => {
                self.sieves.push(SieveStats::new(name));
                self.sieves.len() - 1
            }
        };
        &mut self.sieves[position]
    }

    /// Counters for `name`, if it ran
    pub fn sieve(&self, name: &str) -> Option<&SieveStats> {
        self.sieves.iter().find(|s| s.name == name)
    }

    /// Record a finished document
    pub fn record_document(&mut self) {
        self.documents += 1;
    }

    /// Record a failed document
    pub fn record_failure(&mut self) {
        self.failed_documents += 1;
    }

    /// Fold another run into this one
    pub fn merge(&mut self, other: &PipelineMetrics) {
        for stats in &other.sieves {
            self.sieve_mut(&stats.name).absorb(stats);
        }
        self.documents += other.documents;
        self.failed_documents += other.failed_documents;
    }

    /// Links merged across all sieves, closure included
    pub fn total_added(&self) -> usize {
        self.sieves.iter().map(|s| s.added + s.closure_added).sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.sieves.clear();
        self.documents = 0;
        self.failed_documents = 0;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Pipeline Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Documents: {}", self.documents),
            format!("Failed documents: {}", self.failed_documents),
            format!("Links added: {}", self.total_added()),
            String::new(),
        ];

        for stats in &self.sieves {
            lines.push(format!("{}:", stats.name));
            lines.push(format!(
                "  proposed {}  added {}  removed {} (duplicate {}, conflict {}, invalid {})",
                stats.proposed,
                stats.added,
                stats.removed(),
                stats.duplicates,
                stats.conflicts,
                stats.invalid
            ));
            lines.push(format!(
                "  closure added {}  closure conflicts {}",
                stats.closure_added, stats.closure_conflicts
            ));
            if stats.failures > 0 {
                lines.push(format!("  failed on {} documents", stats.failures));
            }
        }

        lines.join("\n")
    }
}
