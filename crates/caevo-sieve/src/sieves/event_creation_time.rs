//! Tense and aspect rules for event to creation time links

use crate::{Sieve, SieveError};
use caevo_domain::{Aspect, Document, Event, EventClass, Relation, TLink, Tense};
use caevo_store::LinkGraph;

/// Orders each event against the document creation time
#[derive(Debug, Clone, Copy, Default)]
pub struct EventCreationTimeSieve;

impl EventCreationTimeSieve {
    /// Registry name
    pub const NAME: &'static str = "EventCreationTimeSieve";

    /// Relation from the event to the creation time, if a rule fires
    pub fn rule(event: &Event) -> Option<Relation> {
        match (event.class, event.tense, event.aspect) {
            (EventClass::Reporting, Tense::Past, _) => Some(Relation::IsIncluded),
            (_, Tense::Past, _) => Some(Relation::Before),
            (_, Tense::Present, Aspect::Perfective) => Some(Relation::Before),
            _ => None,
        }
    }
}

impl Sieve for EventCreationTimeSieve {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn annotate(&self, doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
        let Some(dct) = &doc.dct else {
            return Ok(Vec::new());
        };
        Ok(doc
            .events
            .iter()
            .filter_map(|event| {
                Self::rule(event).map(|r| TLink::new(event.eiid.clone(), dct.tid.clone(), r))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caevo_domain::{Timex, TimexType};

    fn event(class: EventClass, tense: Tense, aspect: Aspect) -> Event {
        Event::new("e1", 0, 0).with_attributes(class, tense, aspect)
    }

    #[test]
    fn test_rules() {
        use Aspect::{None as NoAspect, Perfective, Progressive};
        use EventClass::{Occurrence, Reporting, State};

        assert_eq!(EventCreationTimeSieve::rule(&event(Reporting, Tense::Past, Perfective)), Some(Relation::IsIncluded));
        assert_eq!(EventCreationTimeSieve::rule(&event(Reporting, Tense::Past, NoAspect)), Some(Relation::IsIncluded));
        assert_eq!(EventCreationTimeSieve::rule(&event(Occurrence, Tense::Past, Progressive)), Some(Relation::Before));
        assert_eq!(EventCreationTimeSieve::rule(&event(State, Tense::Present, Perfective)), Some(Relation::Before));
        assert_eq!(EventCreationTimeSieve::rule(&event(Reporting, Tense::Present, Perfective)), Some(Relation::Before));
        assert_eq!(EventCreationTimeSieve::rule(&event(Occurrence, Tense::Present, NoAspect)), None);
        assert_eq!(EventCreationTimeSieve::rule(&event(Occurrence, Tense::Future, NoAspect)), None);
    }

    #[test]
    fn test_links_point_at_dct() {
        let mut doc = Document::new("d", 1);
        doc.set_dct(Timex::new("t0", 0, 0, TimexType::Date, "1998-01-08"));
        doc.add_event(Event::new("e1", 0, 0).with_attributes(EventClass::Occurrence, Tense::Past, Aspect::None));
        doc.add_event(Event::new("e2", 0, 3));

        let links = EventCreationTimeSieve.annotate(&doc, &LinkGraph::new()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id2.as_str(), "t0");
        assert_eq!(links[0].relation, Relation::Before);
    }

    #[test]
    fn test_no_dct() {
        let mut doc = Document::new("d", 1);
        doc.add_event(Event::new("e1", 0, 0).with_attributes(EventClass::Occurrence, Tense::Past, Aspect::None));
        assert!(EventCreationTimeSieve.annotate(&doc, &LinkGraph::new()).unwrap().is_empty());
    }
}
