//! Majority-class baseline

use crate::{Sieve, SieveError};
use caevo_domain::{Document, EntityId, Event, Relation, TLink, Timex};
use caevo_store::LinkGraph;

/// Labels every nearby pair VAGUE
///
/// Covers event/event, event/time and time/time pairs inside one sentence and
/// across adjacent sentences. Meant to run last, filling whatever the other
/// sieves left open.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllVagueSieve;

impl AllVagueSieve {
    /// Registry name
    pub const NAME: &'static str = "AllVagueSieve";
}

impl Sieve for AllVagueSieve {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn annotate(&self, doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
        let events = doc.events_by_sentence();
        let timexes = doc.timexes_by_sentence();
        let mut proposed = Vec::new();

        for sid in 0..events.len() {
            let next_events = events.get(sid + 1).map(Vec::as_slice).unwrap_or_default();
            let next_timexes = timexes.get(sid + 1).map(Vec::as_slice).unwrap_or_default();
            sentence_pairs(
                &events[sid],
                &timexes[sid],
                next_events,
                next_timexes,
                &mut proposed,
            );
        }
        Ok(proposed)
    }
}

fn sentence_pairs(
    events: &[&Event],
    timexes: &[&Timex],
    next_events: &[&Event],
    next_timexes: &[&Timex],
    proposed: &mut Vec<TLink>,
) {
    let vague = |a: &EntityId, b: &EntityId| TLink::new(a.clone(), b.clone(), Relation::Vague);

    for (i, event) in events.iter().enumerate() {
        for other in &events[i + 1..] {
            proposed.push(vague(&event.eiid, &other.eiid));
        }
        // Same-sentence event/time links follow textual order.
        for timex in timexes {
            if event.index < timex.offset {
                proposed.push(vague(&event.eiid, &timex.tid));
            } else {
                proposed.push(vague(&timex.tid, &event.eiid));
            }
        }
        for next in next_events {
            proposed.push(vague(&event.eiid, &next.eiid));
        }
        for next in next_timexes {
            proposed.push(vague(&event.eiid, &next.tid));
        }
    }

    for (i, timex) in timexes.iter().enumerate() {
        for other in &timexes[i + 1..] {
            proposed.push(vague(&timex.tid, &other.tid));
        }
        for next in next_timexes {
            proposed.push(vague(&timex.tid, &next.tid));
        }
        for next in next_events {
            proposed.push(vague(&timex.tid, &next.eiid));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caevo_domain::TimexType;

    fn doc() -> Document {
        let mut doc = Document::new("d", 3);
        doc.add_event(Event::new("e1", 0, 1));
        doc.add_event(Event::new("e2", 0, 5));
        doc.add_timex(Timex::new("t1", 0, 3, TimexType::Date, "1998"));
        doc.add_event(Event::new("e3", 1, 0));
        doc.add_timex(Timex::new("t2", 2, 0, TimexType::Date, "1999"));
        doc
    }

    fn has(links: &[TLink], a: &str, b: &str) -> bool {
        links
            .iter()
            .any(|l| l.id1 == EntityId::new(a) && l.id2 == EntityId::new(b))
    }

    #[test]
    fn test_pairs() {
        let links = AllVagueSieve.annotate(&doc(), &LinkGraph::new()).unwrap();
        assert!(links.iter().all(|l| l.relation == Relation::Vague));

        // Sentence 0 internal pairs, event/time ordered by position.
        assert!(has(&links, "e1", "e2"));
        assert!(has(&links, "e1", "t1"));
        assert!(has(&links, "t1", "e2"));
        // Sentence 0 to sentence 1.
        assert!(has(&links, "e1", "e3"));
        assert!(has(&links, "e2", "e3"));
        assert!(has(&links, "t1", "e3"));
        // Sentence 1 to sentence 2.
        assert!(has(&links, "e3", "t2"));
        // Sentences 0 and 2 are not adjacent.
        assert!(!has(&links, "t1", "t2"));
        assert!(!has(&links, "e1", "t2"));

        assert_eq!(links.len(), 7);
    }

    #[test]
    fn test_empty_document() {
        let links = AllVagueSieve
            .annotate(&Document::new("empty", 0), &LinkGraph::new())
            .unwrap();
        assert!(links.is_empty());
    }
}
