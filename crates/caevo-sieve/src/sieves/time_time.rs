//! Orders time expressions by their normalized values

use crate::timex::{creation_day, TimeInterval};
use crate::{Sieve, SieveError};
use caevo_domain::{Document, TLink, Timex};
use caevo_store::LinkGraph;
use std::collections::HashSet;

/// Compares the calendar intervals of timexes in the same or adjacent sentences
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeTimeSieve;

impl TimeTimeSieve {
    /// Registry name
    pub const NAME: &'static str = "TimeTimeSieve";

    fn order(first: &Timex, second: &Timex, dct: Option<chrono::NaiveDate>) -> Option<TLink> {
        let a = TimeInterval::of_timex(first, dct)?;
        let b = TimeInterval::of_timex(second, dct)?;
        let relation = a.relation_to(&b)?;
        Some(TLink::new(first.tid.clone(), second.tid.clone(), relation))
    }
}

impl Sieve for TimeTimeSieve {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn annotate(&self, doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, SieveError> {
        let dct = doc.dct.as_ref().and_then(|t| creation_day(&t.value));
        let by_sentence = doc.timexes_by_sentence();

        let windows: Vec<Vec<&Timex>> = if by_sentence.len() == 1 {
            by_sentence
        } else {
            by_sentence
                .windows(2)
                .map(|pair| pair.concat())
                .collect()
        };

        let mut seen = HashSet::new();
        let mut proposed = Vec::new();
        for window in &windows {
            for (i, first) in window.iter().enumerate() {
                for second in &window[i + 1..] {
                    if !seen.insert((&first.tid, &second.tid)) {
                        continue;
                    }
                    if let Some(link) = Self::order(first, second, dct) {
                        proposed.push(link);
                    }
                }
            }
        }

        tracing::debug!(document = %doc.name, proposed = proposed.len(), "Ordered timex pairs");
        Ok(proposed)
    }
}
