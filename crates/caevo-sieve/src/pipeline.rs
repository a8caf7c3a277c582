//! Runs sieves in order over one document's link graph

use crate::registry::SieveRegistry;
use crate::stats::PipelineMetrics;
use crate::{PipelineConfig, PipelineError, Sieve};
use caevo_closure::{ClosureConflict, ClosureEngine};
use caevo_domain::{Document, EntityId, RelationMode};
use caevo_store::LinkGraph;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything one document's run produced
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    /// Document name
    pub document: String,

    /// Final links, reduced to the configured mode
    pub graph: LinkGraph,

    /// Counters for this document only
    pub metrics: PipelineMetrics,

    /// Distinct closure inferences that clashed with accepted links
    pub conflicts: Vec<ClosureConflict>,
}

/// An ordered list of sieves sharing one link graph per document
///
/// Each sieve sees the links accepted so far, closure included. Earlier
/// sieves win: a later proposal for a pair that already has a link is
/// rejected and counted, never merged.
pub struct SievePipeline {
    sieves: Vec<Arc<dyn Sieve>>,
    closure: Option<ClosureEngine>,
    mode: RelationMode,
}

impl SievePipeline {
    /// Pipeline over prepared sieves
    pub fn new(sieves: Vec<Arc<dyn Sieve>>, config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        let closure = if config.use_closure {
            Some(ClosureEngine::new(config.closure.clone())?)
        } else {
            None
        };
        Ok(Self {
            sieves,
            closure,
            mode: config.mode,
        })
    }

    /// Pipeline whose sieves are resolved through `registry`
    pub fn from_config(config: &PipelineConfig, registry: &SieveRegistry) -> Result<Self, PipelineError> {
        let sieves = registry.build(config)?;
        if sieves.is_empty() {
            return Err(PipelineError::Config("no configured sieve could be enabled".to_string()));
        }
        Self::new(sieves, config)
    }

    /// Names of the sieves in run order
    pub fn sieve_names(&self) -> Vec<&str> {
        self.sieves.iter().map(|s| s.name()).collect()
    }

    /// Run every sieve over `doc` without touching its link store
    ///
    /// # Errors
    ///
    /// Fails when the document has blank or repeated entity ids. A failing
    /// sieve only loses its own contribution.
    pub fn run(&self, doc: &Document) -> Result<DocumentOutcome, PipelineError> {
        check_document(doc)?;
        info!(document = %doc.name, sieves = self.sieves.len(), "Processing document");

        let mut graph = LinkGraph::new();
        let mut metrics = PipelineMetrics::new();
        let mut conflicts = BTreeSet::new();

        for sieve in &self.sieves {
            let name = sieve.name();
            let stats = metrics.sieve_mut(name);

            let mut proposed = match sieve.annotate(doc, &graph) {
                Ok(proposed) => proposed,
                Err(e) => {
                    warn!(document = %doc.name, sieve = name, error = %e, "Sieve failed, skipping");
                    stats.failures += 1;
                    continue;
                }
            };
            stats.proposed += proposed.len();

            // Stable, so equal confidences keep the sieve's own order.
            proposed.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
            let mut added = 0;
            for mut link in proposed {
                link.origin = Some(name.to_string());
                let shown = link.to_string();
                let outcome = graph.insert(link);
                if outcome.is_added() {
                    added += 1;
                } else {
                    debug!(sieve = name, link = %shown, ?outcome, "Proposal rejected");
                }
                stats.record_outcome(outcome);
            }

            if added > 0 {
                if let Some(engine) = &self.closure {
                    let report = engine.expand(&graph);
                    for link in report.links {
                        if graph.insert(link.with_origin(name)).is_added() {
                            stats.closure_added += 1;
                        }
                    }
                    for conflict in report.conflicts {
                        if conflicts.insert(conflict) {
                            stats.closure_conflicts += 1;
                        }
                    }
                }
            }

            debug!(
                document = %doc.name,
                sieve = name,
                added,
                closed = stats.closure_added,
                total = graph.len(),
                "Sieve finished"
            );
        }

        if self.mode != RelationMode::Full {
            graph.apply_mode(self.mode);
        }
        metrics.record_document();

        Ok(DocumentOutcome {
            document: doc.name.clone(),
            graph,
            metrics,
            conflicts: conflicts.into_iter().collect(),
        })
    }

    /// Run the pipeline and replace the document's links with the result
    pub fn annotate(&self, doc: &mut Document) -> Result<PipelineMetrics, PipelineError> {
        let outcome = self.run(doc)?;
        doc.replace_tlinks(outcome.graph.into_links());
        Ok(outcome.metrics)
    }
}

impl std::fmt::Debug for SievePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SievePipeline")
            .field("sieves", &self.sieve_names())
            .field("closure", &self.closure.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Train each sieve on gold documents, then share them
pub fn train_sieves(
    sieves: Vec<Box<dyn Sieve>>,
    docs: &[Document],
) -> Result<Vec<Arc<dyn Sieve>>, PipelineError> {
    let mut trained = Vec::with_capacity(sieves.len());
    for mut sieve in sieves {
        info!(sieve = sieve.name(), documents = docs.len(), "Training sieve");
        sieve.train(docs).map_err(|source| PipelineError::Training {
            sieve: sieve.name().to_string(),
            source,
        })?;
        trained.push(Arc::from(sieve));
    }
    Ok(trained)
}

fn check_document(doc: &Document) -> Result<(), PipelineError> {
    let ids = doc
        .events
        .iter()
        .map(|e| &e.eiid)
        .chain(doc.timexes.iter().map(|t| &t.tid));

    let mut seen: HashSet<&EntityId> = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(PipelineError::Document {
                document: doc.name.clone(),
                reason: "blank entity id".to_string(),
            });
        }
        if !seen.insert(id) {
            return Err(PipelineError::Document {
                document: doc.name.clone(),
                reason: format!("entity id {id} used twice"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SieveError;
    use caevo_domain::{Relation, TLink};

    /// Proposes a fixed list of links
    struct Scripted {
        name: &'static str,
        links: Vec<TLink>,
    }

    impl Sieve for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn annotate(&self, _doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
            Ok(self.links.clone())
        }
    }

    struct Failing;

    impl Sieve for Failing {
        fn name(&self) -> &str {
            "Failing"
        }

        fn annotate(&self, _doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
            Err(SieveError::InvalidDocument("no parse".to_string()))
        }
    }

    /// Reports how many links it saw when it ran
    struct Observer;

    impl Sieve for Observer {
        fn name(&self) -> &str {
            "Observer"
        }

        fn annotate(&self, _doc: &Document, graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
            Ok(vec![TLink::new("seen", format!("n{}", graph.len()), Relation::Vague)])
        }
    }

    fn scripted(name: &'static str, links: Vec<TLink>) -> Arc<dyn Sieve> {
        Arc::new(Scripted { name, links })
    }

    fn pipeline(sieves: Vec<Arc<dyn Sieve>>, use_closure: bool) -> SievePipeline {
        let config = PipelineConfig {
            use_closure,
            ..Default::default()
        };
        SievePipeline::new(sieves, &config).unwrap()
    }

    #[test]
    fn test_earlier_sieve_wins() {
        let p = pipeline(
            vec![
                scripted("first", vec![TLink::new("e1", "e2", Relation::Before)]),
                scripted("second", vec![TLink::new("e1", "e2", Relation::After)]),
            ],
            false,
        );
        let outcome = p.run(&Document::new("d", 1)).unwrap();
        let link = outcome.graph.lookup(&EntityId::new("e1"), &EntityId::new("e2")).unwrap();
        assert_eq!(link.relation, Relation::Before);
        assert_eq!(link.origin.as_deref(), Some("first"));
        assert_eq!(outcome.metrics.sieve("second").map(|s| s.conflicts), Some(1));
    }

    #[test]
    fn test_confident_proposal_goes_first() {
        let p = pipeline(
            vec![scripted(
                "only",
                vec![
                    TLink::new("e1", "e2", Relation::Before).with_confidence(0.4),
                    TLink::new("e2", "e1", Relation::Before).with_confidence(0.9),
                    TLink::new("e3", "e3", Relation::Before),
                ],
            )],
            false,
        );
        let outcome = p.run(&Document::new("d", 1)).unwrap();
        assert_eq!(
            outcome.graph.relation_between(&EntityId::new("e2"), &EntityId::new("e1")),
            Some(Relation::Before)
        );
        let stats = outcome.metrics.sieve("only").unwrap();
        assert_eq!((stats.proposed, stats.added, stats.conflicts, stats.invalid), (3, 1, 1, 1));
    }

    #[test]
    fn test_closure_runs_between_sieves() {
        let p = pipeline(
            vec![
                scripted(
                    "rules",
                    vec![
                        TLink::new("e1", "e2", Relation::Before),
                        TLink::new("e2", "e3", Relation::Before),
                    ],
                ),
                Arc::new(Observer),
            ],
            true,
        );
        let outcome = p.run(&Document::new("d", 1)).unwrap();
        let inferred = outcome.graph.lookup(&EntityId::new("e1"), &EntityId::new("e3")).unwrap();
        assert!(inferred.closed);
        assert_eq!(inferred.origin.as_deref(), Some("rules"));
        assert_eq!(outcome.metrics.sieve("rules").map(|s| s.closure_added), Some(1));
        // The observer saw both explicit links and the inferred one.
        assert!(outcome.graph.lookup(&EntityId::new("seen"), &EntityId::new("n3")).is_some());
    }

    #[test]
    fn test_failing_sieve_is_skipped() {
        let p = pipeline(
            vec![
                Arc::new(Failing),
                scripted("after", vec![TLink::new("e1", "e2", Relation::Before)]),
            ],
            true,
        );
        let outcome = p.run(&Document::new("d", 1)).unwrap();
        assert_eq!(outcome.graph.len(), 1);
        assert_eq!(outcome.metrics.sieve("Failing").map(|s| s.failures), Some(1));
    }

    #[test]
    fn test_mode_applied_to_output() {
        let config = PipelineConfig {
            use_closure: false,
            mode: RelationMode::Tempeval,
            ..Default::default()
        };
        let p = SievePipeline::new(
            vec![scripted("s", vec![TLink::new("e1", "e2", Relation::IBefore)])],
            &config,
        )
        .unwrap();
        let mut doc = Document::new("d", 1);
        doc.insert_tlink(TLink::new("x", "y", Relation::Before));
        p.annotate(&mut doc).unwrap();
        assert_eq!(doc.tlinks().len(), 1);
        assert_eq!(doc.tlinks()[0].relation, Relation::Before);
    }

    #[test]
    fn test_repeated_ids_rejected() {
        let mut doc = Document::new("d", 1);
        doc.add_event(caevo_domain::Event::new("e1", 0, 0));
        doc.add_event(caevo_domain::Event::new("e1", 0, 3));
        let p = pipeline(vec![Arc::new(Observer)], false);
        assert!(matches!(p.run(&doc), Err(PipelineError::Document { .. })));
    }

    #[test]
    fn test_invalid_config() {
        let config = PipelineConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(
            SievePipeline::new(vec![Arc::new(Observer)], &config),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_train_sieves() {
        let sieves: Vec<Box<dyn Sieve>> = vec![Box::new(Observer)];
        let trained = train_sieves(sieves, &[]).unwrap();
        assert_eq!(trained[0].name(), "Observer");
    }
}
