//! Built-in sieves

mod all_vague;
mod classifier;
mod event_creation_time;
mod rep_creation_day;
mod time_time;

pub use all_vague::AllVagueSieve;
pub use classifier::{best_label, ClassifierSieve, PairScope};
pub use event_creation_time::EventCreationTimeSieve;
pub use rep_creation_day::RepCreationDaySieve;
pub use time_time::TimeTimeSieve;
