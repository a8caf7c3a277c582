//! Per-document link graph

use caevo_domain::{EntityId, Relation, RelationMode, TLink};
use std::collections::{BTreeSet, HashMap};

/// Result of offering a link to the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertOutcome {
    /// The pair was new and the link was stored
    Added,
    /// The pair already holds the same relation
    RejectedDuplicate,
    /// The pair already holds a different relation, which is kept
    RejectedConflict,
    /// Empty id or a link from an entity to itself
    RejectedInvalid,
}

impl InsertOutcome {
    /// True only for [`InsertOutcome::Added`]
    pub fn is_added(&self) -> bool {
        matches!(self, InsertOutcome::Added)
    }
}

type PairKey = (EntityId, EntityId);

fn pair_key(a: &EntityId, b: &EntityId) -> PairKey {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// At most one link per unordered entity pair
///
/// Links keep the orientation they were inserted with and iterate in
/// insertion order. The first link stored for a pair wins: later proposals
/// for the same pair are rejected, never merged.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    links: Vec<TLink>,
    index: HashMap<PairKey, usize>,
}

impl LinkGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from links, silently keeping the first link per pair
    pub fn from_links(links: impl IntoIterator<Item = TLink>) -> Self {
        let mut graph = Self::new();
        for link in links {
            graph.insert(link);
        }
        graph
    }

    /// Offer a link to the graph
    ///
    /// # Examples
    ///
    /// ```
    /// use caevo_domain::{Relation, TLink};
    /// use caevo_store::{InsertOutcome, LinkGraph};
    ///
    /// let mut graph = LinkGraph::new();
    /// assert_eq!(graph.insert(TLink::new("e1", "e2", Relation::Before)), InsertOutcome::Added);
    /// assert_eq!(
    ///     graph.insert(TLink::new("e2", "e1", Relation::After)),
    ///     InsertOutcome::RejectedDuplicate
    /// );
    /// assert_eq!(
    ///     graph.insert(TLink::new("e1", "e2", Relation::After)),
    ///     InsertOutcome::RejectedConflict
    /// );
    /// ```
    pub fn insert(&mut self, link: TLink) -> InsertOutcome {
        if link.id1.is_empty() || link.id2.is_empty() || link.id1 == link.id2 {
            return InsertOutcome::RejectedInvalid;
        }

        let key = pair_key(&link.id1, &link.id2);
        if let Some(&slot) = self.index.get(&key) {
            return if self.links[slot].compare_to_tlink(&link) {
                InsertOutcome::RejectedDuplicate
            } else {
                InsertOutcome::RejectedConflict
            };
        }

        self.index.insert(key, self.links.len());
        self.links.push(link);
        InsertOutcome::Added
    }

    /// The stored link for `{a, b}`, in its stored orientation
    pub fn lookup(&self, a: &EntityId, b: &EntityId) -> Option<&TLink> {
        self.index.get(&pair_key(a, b)).map(|&slot| &self.links[slot])
    }

    /// True when `{a, b}` holds a link
    pub fn contains_pair(&self, a: &EntityId, b: &EntityId) -> bool {
        self.index.contains_key(&pair_key(a, b))
    }

    /// The relation read from `a` to `b`
    pub fn relation_between(&self, a: &EntityId, b: &EntityId) -> Option<Relation> {
        self.lookup(a, b).map(|link| {
            if &link.id1 == a {
                link.relation
            } else {
                link.relation.invert()
            }
        })
    }

    /// Canonical relation of a link, read in lexicographic id order
    pub fn ordered_relation(link: &TLink) -> Relation {
        link.ordered_relation()
    }

    /// Drop every link
    pub fn remove_all(&mut self) {
        self.links.clear();
        self.index.clear();
    }

    /// Links in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TLink> {
        self.links.iter()
    }

    /// Links not produced by closure
    pub fn explicit_links(&self) -> impl Iterator<Item = &TLink> {
        self.links.iter().filter(|l| !l.closed)
    }

    /// Links produced by closure
    pub fn closed_links(&self) -> impl Iterator<Item = &TLink> {
        self.links.iter().filter(|l| l.closed)
    }

    /// Number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no link is stored
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Every entity that appears in some link
    pub fn entities(&self) -> BTreeSet<&EntityId> {
        self.links
            .iter()
            .flat_map(|l| [&l.id1, &l.id2])
            .collect()
    }

    /// Collapse every stored relation to `mode`
    ///
    /// Pair keys are unordered, so the endpoint swap of the reduced mode
    /// leaves the index valid.
    pub fn apply_mode(&mut self, mode: RelationMode) {
        for link in &mut self.links {
            link.reduce(mode);
        }
    }

    /// Consume the graph, yielding links in insertion order
    pub fn into_links(self) -> Vec<TLink> {
        self.links
    }
}

impl<'a> IntoIterator for &'a LinkGraph {
    type Item = &'a TLink;
    type IntoIter = std::slice::Iter<'a, TLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl Extend<TLink> for LinkGraph {
    fn extend<I: IntoIterator<Item = TLink>>(&mut self, iter: I) {
        for link in iter {
            self.insert(link);
        }
    }
}
