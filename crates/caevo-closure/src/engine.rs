//! Fixed-point closure over a link graph

use crate::algebra::subsumes_either;
use crate::{ClosureConfig, ClosureError, CompositionTable};
use caevo_domain::{EntityId, Relation, TLink};
use caevo_store::LinkGraph;
use std::collections::{BTreeMap, BTreeSet};

/// An inference that disagreed with a link already in the graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClosureConflict {
    /// Lexicographically smaller endpoint
    pub id1: EntityId,
    /// Larger endpoint
    pub id2: EntityId,
    /// Relation already stored, read id1 → id2
    pub existing: Relation,
    /// Relation closure wanted to add, read id1 → id2
    pub inferred: Relation,
}

/// Everything one closure run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosureReport {
    /// New links, all marked closed
    pub links: Vec<TLink>,
    /// Distinct clashes with existing links
    pub conflicts: Vec<ClosureConflict>,
    /// Passes run
    pub passes: usize,
    /// True when the pass cap stopped the run before a fixed point
    pub capped: bool,
}

impl ClosureReport {
    /// True when no inference clashed with the graph
    pub fn is_consistent(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Both orientations of every edge
type Adjacency = BTreeMap<EntityId, BTreeMap<EntityId, Relation>>;

/// Computes the transitive closure of a document's links
///
/// # Examples
///
/// ```
/// use caevo_closure::ClosureEngine;
/// use caevo_domain::{Relation, TLink};
/// use caevo_store::LinkGraph;
///
/// let graph = LinkGraph::from_links(vec![
///     TLink::new("e1", "e2", Relation::Before),
///     TLink::new("e2", "e3", Relation::Before),
/// ]);
/// let closed = ClosureEngine::default().compute_closure(&graph);
/// assert_eq!(closed.len(), 1);
/// assert_eq!(closed[0].ordered_relation(), Relation::Before);
/// assert!(closed[0].closed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClosureEngine {
    table: CompositionTable,
    config: ClosureConfig,
}

impl ClosureEngine {
    /// Create an engine over the derived composition table
    pub fn new(config: ClosureConfig) -> Result<Self, ClosureError> {
        Self::with_table(CompositionTable::derived(), config)
    }

    /// Create an engine over a custom composition table
    pub fn with_table(table: CompositionTable, config: ClosureConfig) -> Result<Self, ClosureError> {
        config.validate().map_err(ClosureError::Config)?;
        Ok(Self { table, config })
    }

    /// The composition table in use
    pub fn table(&self) -> &CompositionTable {
        &self.table
    }

    /// The configuration in use
    pub fn config(&self) -> &ClosureConfig {
        &self.config
    }

    /// New links implied by the graph
    pub fn compute_closure(&self, graph: &LinkGraph) -> Vec<TLink> {
        self.expand(graph).links
    }

    /// Run closure to a fixed point and report what happened
    pub fn expand(&self, graph: &LinkGraph) -> ClosureReport {
        let mut adjacency = Adjacency::new();
        for link in graph.iter() {
            connect(&mut adjacency, &link.id1, &link.id2, link.relation);
        }

        let limit = self.config.pass_limit(adjacency.len());
        let mut report = ClosureReport::default();
        let mut conflicts = BTreeSet::new();

        loop {
            if report.passes >= limit {
                report.capped = true;
                tracing::warn!(
                    passes = report.passes,
                    inferred = report.links.len(),
                    "Closure stopped at pass cap before reaching a fixed point"
                );
                break;
            }
            report.passes += 1;

            let added = self.pass(&mut adjacency, &mut report.links, &mut conflicts);
            tracing::debug!(pass = report.passes, added, "Closure pass finished");
            if added == 0 {
                break;
            }
        }

        report.conflicts = conflicts.into_iter().collect();
        if !report.conflicts.is_empty() {
            tracing::debug!(conflicts = report.conflicts.len(), "Closure found conflicting inferences");
        }
        report
    }

    /// One sweep over every pivot; returns how many links were added
    fn pass(
        &self,
        adjacency: &mut Adjacency,
        links: &mut Vec<TLink>,
        conflicts: &mut BTreeSet<ClosureConflict>,
    ) -> usize {
        let mut added = 0;
        let pivots: Vec<EntityId> = adjacency.keys().cloned().collect();

        for pivot in pivots {
            let neighbours: Vec<(EntityId, Relation)> = match adjacency.get(&pivot) {
                Some(edges) => edges.iter().map(|(id, r)| (id.clone(), *r)).collect(),
                None => continue,
            };

            for (a, pivot_to_a) in &neighbours {
                let a_to_pivot = pivot_to_a.invert();
                for (c, pivot_to_c) in &neighbours {
                    if a == c {
                        continue;
                    }
                    let Some(inferred) = self.table.compose(a_to_pivot, *pivot_to_c) else {
                        continue;
                    };

                    let existing = adjacency.get(a).and_then(|edges| edges.get(c)).copied();
                    match existing {
                        None => {
                            connect(adjacency, a, c, inferred);
                            links.push(TLink::inferred(a.clone(), c.clone(), inferred));
                            added += 1;
                        }
                        Some(existing) if !self.agrees(existing, inferred) => {
                            conflicts.insert(conflict(a, c, existing, inferred));
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        added
    }

    fn agrees(&self, existing: Relation, inferred: Relation) -> bool {
        existing == inferred || (self.config.tolerate_subsumed && subsumes_either(existing, inferred))
    }

    /// False when adding `link` would contradict the graph or its closure
    ///
    /// Runs closure twice, so it is expensive on large graphs.
    pub fn is_consistent(&self, graph: &LinkGraph, link: &TLink) -> bool {
        if let Some(existing) = graph.relation_between(&link.id1, &link.id2) {
            return self.agrees(existing, link.relation);
        }

        let baseline = self.expand(graph);
        if let Some(closed) = baseline.links.iter().find(|l| l.covers_same_pair(link)) {
            let closed_relation = if closed.id1 == link.id1 {
                closed.relation
            } else {
                closed.relation.invert()
            };
            if !self.agrees(closed_relation, link.relation) {
                return false;
            }
        }

        let mut trial = graph.clone();
        if !trial.insert(link.clone()).is_added() {
            return false;
        }
        let with_link = self.expand(&trial);
        with_link.conflicts.len() <= baseline.conflicts.len()
    }
}

fn connect(adjacency: &mut Adjacency, a: &EntityId, b: &EntityId, relation: Relation) {
    adjacency
        .entry(a.clone())
        .or_default()
        .insert(b.clone(), relation);
    adjacency
        .entry(b.clone())
        .or_default()
        .insert(a.clone(), relation.invert());
}

fn conflict(a: &EntityId, c: &EntityId, existing: Relation, inferred: Relation) -> ClosureConflict {
    if a <= c {
        ClosureConflict {
            id1: a.clone(),
            id2: c.clone(),
            existing,
            inferred,
        }
    } else {
        ClosureConflict {
            id1: c.clone(),
            id2: a.clone(),
            existing: existing.invert(),
            inferred: inferred.invert(),
        }
    }
}
