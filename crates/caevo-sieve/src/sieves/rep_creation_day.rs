//! Reporting events happen on the day the document was written

use crate::config::RepCreationDayConfig;
use crate::timex::creation_day;
use crate::{Sieve, SieveError};
use caevo_domain::{Aspect, Document, Event, EventClass, Relation, TLink, Tense, Timex};
use caevo_store::LinkGraph;

/// Links reporting events to timexes that name the creation day
///
/// A news story saying "officials said Tuesday", where Tuesday is the
/// publication date, places the reporting event inside that day.
#[derive(Debug, Clone, Default)]
pub struct RepCreationDaySieve {
    config: RepCreationDayConfig,
}

impl RepCreationDaySieve {
    /// Registry name
    pub const NAME: &'static str = "RepCreationDay";

    /// Create the sieve with explicit parameters
    pub fn new(config: RepCreationDayConfig) -> Self {
        Self { config }
    }

    fn timex_matches(&self, timex: &Timex, day: &str) -> bool {
        timex.value == day || (self.config.include_present_ref && timex.is_present_ref())
    }

    fn event_matches(&self, event: &Event) -> bool {
        if event.class != EventClass::Reporting {
            return false;
        }
        !(self.config.consider_tense_aspect
            && event.tense == Tense::Past
            && event.aspect == Aspect::Perfective)
    }
}

impl Sieve for RepCreationDaySieve {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn annotate(&self, doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
        let Some(day) = doc
            .dct
            .as_ref()
            .and_then(|dct| creation_day(&dct.value))
            .map(|d| d.format("%Y-%m-%d").to_string())
        else {
            return Ok(Vec::new());
        };

        let events = doc.events_by_sentence();
        let timexes = doc.timexes_by_sentence();
        let mut proposed = Vec::new();

        for (sid, sentence_timexes) in timexes.iter().enumerate() {
            for timex in sentence_timexes.iter().filter(|t| self.timex_matches(t, &day)) {
                let first = sid.saturating_sub(self.config.left_window);
                let last = sid
                    .saturating_add(self.config.right_window)
                    .min(events.len().saturating_sub(1));
                for sentence_events in events.iter().take(last + 1).skip(first) {
                    for event in sentence_events.iter().filter(|e| self.event_matches(e)) {
                        proposed.push(TLink::new(
                            event.eiid.clone(),
                            timex.tid.clone(),
                            Relation::IsIncluded,
                        ));
                    }
                }
            }
        }
        Ok(proposed)
    }
}
