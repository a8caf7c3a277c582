//! Document model consumed by the sieves
//!
//! A [`Document`] is the external collaborator's view of one text: its
//! sentence count, the events and time expressions found in it, the document
//! creation time (DCT), and the document's own TLink store. Parse trees and
//! dependencies are deliberately absent; feature extractors bring their own.

use crate::tlink::{EntityId, TLink};
use serde::{Deserialize, Serialize};

/// TimeML tense of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Tense {
    Present,
    Prespart,
    Past,
    Pastpart,
    Infinitive,
    Future,
    Passive,
    #[default]
    None,
}

/// TimeML aspect of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Aspect {
    Progressive,
    Perfective,
    Imperfective,
    PerfectiveProgressive,
    ImperfectiveProgressive,
    #[default]
    None,
}

/// TimeML event class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum EventClass {
    #[default]
    Occurrence,
    Aspectual,
    State,
    IAction,
    IState,
    Reporting,
    Perception,
    None,
}

/// TimeML timex type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum TimexType {
    #[default]
    Date,
    Time,
    Duration,
    Set,
}

/// An event mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event instance id
    pub eiid: EntityId,

    /// Sentence index, zero based
    pub sentence: usize,

    /// Token index of the event head within its sentence
    pub index: usize,

    /// Surface text
    #[serde(default)]
    pub text: String,

    /// Event class
    #[serde(default)]
    pub class: EventClass,

    /// Grammatical tense
    #[serde(default)]
    pub tense: Tense,

    /// Grammatical aspect
    #[serde(default)]
    pub aspect: Aspect,
}

impl Event {
    /// Create an event with default grammatical attributes
    pub fn new(eiid: impl Into<EntityId>, sentence: usize, index: usize) -> Self {
        Self {
            eiid: eiid.into(),
            sentence,
            index,
            text: String::new(),
            class: EventClass::default(),
            tense: Tense::default(),
            aspect: Aspect::default(),
        }
    }

    /// Set class, tense and aspect
    pub fn with_attributes(mut self, class: EventClass, tense: Tense, aspect: Aspect) -> Self {
        self.class = class;
        self.tense = tense;
        self.aspect = aspect;
        self
    }
}

/// A time expression mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timex {
    /// Timex id
    pub tid: EntityId,

    /// Sentence index, zero based (ignored for the DCT)
    #[serde(default)]
    pub sentence: usize,

    /// Token offset of the timex within its sentence
    #[serde(default)]
    pub offset: usize,

    /// Surface text
    #[serde(default)]
    pub text: String,

    /// Timex type
    #[serde(default, rename = "type")]
    pub timex_type: TimexType,

    /// Normalized value such as `1998-01-08` or `PRESENT_REF`
    pub value: String,
}

impl Timex {
    /// Create a timex with a normalized value
    pub fn new(
        tid: impl Into<EntityId>,
        sentence: usize,
        offset: usize,
        timex_type: TimexType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            tid: tid.into(),
            sentence,
            offset,
            text: String::new(),
            timex_type,
            value: value.into(),
        }
    }

    /// True for the `PRESENT_REF` value
    pub fn is_present_ref(&self) -> bool {
        self.value.eq_ignore_ascii_case("PRESENT_REF")
    }

    /// True for `PAST_REF`, `PRESENT_REF` or `FUTURE_REF`
    pub fn is_reference(&self) -> bool {
        ["PAST_REF", "PRESENT_REF", "FUTURE_REF"]
            .iter()
            .any(|r| self.value.eq_ignore_ascii_case(r))
    }
}

/// One document with its mentions and TLink store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document name
    pub name: String,

    /// Declared number of sentences; see [`Document::sentences`]
    pub sentence_count: usize,

    /// Event mentions in textual order
    #[serde(default)]
    pub events: Vec<Event>,

    /// Time expression mentions in textual order
    #[serde(default)]
    pub timexes: Vec<Timex>,

    /// Document creation time
    #[serde(default)]
    pub dct: Option<Timex>,

    /// TLink store
    #[serde(default)]
    pub tlinks: Vec<TLink>,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>, sentence_count: usize) -> Self {
        Self {
            name: name.into(),
            sentence_count,
            ..Default::default()
        }
    }

    /// Add an event, growing the sentence count if needed
    pub fn add_event(&mut self, event: Event) {
        self.sentence_count = self.sentence_count.max(event.sentence.saturating_add(1));
        self.events.push(event);
    }

    /// Add a timex, growing the sentence count if needed
    pub fn add_timex(&mut self, timex: Timex) {
        self.sentence_count = self.sentence_count.max(timex.sentence.saturating_add(1));
        self.timexes.push(timex);
    }

    /// Set the document creation time
    pub fn set_dct(&mut self, dct: Timex) {
        self.dct = Some(dct);
    }

    /// Number of sentences, counting every sentence a mention sits in
    ///
    /// Documents read from JSON may declare fewer sentences than their
    /// mentions use; those mentions still count.
    pub fn sentences(&self) -> usize {
        self.events
            .iter()
            .map(|e| e.sentence)
            .chain(self.timexes.iter().map(|t| t.sentence))
            .map(|sentence| sentence.saturating_add(1))
            .fold(self.sentence_count, usize::max)
    }

    /// Events grouped per sentence, one (possibly empty) list per sentence
    pub fn events_by_sentence(&self) -> Vec<Vec<&Event>> {
        let mut grouped = vec![Vec::new(); self.sentences()];
        for event in &self.events {
            if let Some(bucket) = grouped.get_mut(event.sentence) {
                bucket.push(event);
            }
        }
        grouped
    }

    /// Timexes grouped per sentence, one (possibly empty) list per sentence
    pub fn timexes_by_sentence(&self) -> Vec<Vec<&Timex>> {
        let mut grouped = vec![Vec::new(); self.sentences()];
        for timex in &self.timexes {
            if let Some(bucket) = grouped.get_mut(timex.sentence) {
                bucket.push(timex);
            }
        }
        grouped
    }

    /// Look up an event by instance id
    pub fn event(&self, eiid: &EntityId) -> Option<&Event> {
        self.events.iter().find(|e| &e.eiid == eiid)
    }

    /// Look up a timex by id, including the DCT
    pub fn timex(&self, tid: &EntityId) -> Option<&Timex> {
        self.timexes
            .iter()
            .chain(self.dct.iter())
            .find(|t| &t.tid == tid)
    }

    /// Current TLinks
    pub fn tlinks(&self) -> &[TLink] {
        &self.tlinks
    }

    /// Append a TLink
    pub fn insert_tlink(&mut self, link: TLink) {
        self.tlinks.push(link);
    }

    /// Drop every TLink
    pub fn remove_all_tlinks(&mut self) {
        self.tlinks.clear();
    }

    /// Replace the TLink store wholesale
    pub fn replace_tlinks(&mut self, links: Vec<TLink>) {
        self.tlinks = links;
    }
}
