//! Configuration for the sieve pipeline

use caevo_closure::ClosureConfig;
use caevo_domain::RelationMode;
use serde::{Deserialize, Serialize};

/// What a batch does when one document fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Log the failure and keep going
    #[default]
    SkipDocument,
    /// Stop the batch at the first failure
    AbortAll,
}

/// Parameters of the reporting-event / creation-day sieve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepCreationDayConfig {
    /// Sentences before the timex to search for events
    pub left_window: usize,

    /// Sentences after the timex to search for events
    pub right_window: usize,

    /// Skip past perfective reporting events
    pub consider_tense_aspect: bool,

    /// Also accept `PRESENT_REF` timexes
    pub include_present_ref: bool,
}

impl Default for RepCreationDayConfig {
    fn default() -> Self {
        Self {
            left_window: 0,
            right_window: 0,
            consider_tense_aspect: true,
            include_present_ref: false,
        }
    }
}

/// Configuration for the sieve pipeline
///
/// # Examples
///
/// ```
/// use caevo_sieve::PipelineConfig;
///
/// let config = PipelineConfig::from_toml(r#"
///     sieves = ["TimeTimeSieve", "AllVagueSieve"]
///     use_closure = false
/// "#).unwrap();
/// assert_eq!(config.sieves.len(), 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sieve names in the order they run
    pub sieves: Vec<String>,

    /// Run closure after every sieve that added links
    pub use_closure: bool,

    /// Granularity the final links are reduced to
    pub mode: RelationMode,

    /// Classifier links below this probability are dropped
    pub min_probability: f64,

    /// Documents processed at once by the batch runner
    pub concurrency: usize,

    /// Batch behaviour on a failed document
    pub error_policy: ErrorPolicy,

    // Tables last so the TOML form stays valid.
    /// Closure engine settings
    pub closure: ClosureConfig,

    /// Reporting-event sieve parameters
    pub rep_creation_day: RepCreationDayConfig,
}

impl Default for PipelineConfig {
    /// Rule sieves only, closure on
    fn default() -> Self {
        Self {
            sieves: vec![
                "TimeTimeSieve".to_string(),
                "RepCreationDay".to_string(),
                "EventCreationTimeSieve".to_string(),
            ],
            use_closure: true,
            closure: ClosureConfig::default(),
            mode: RelationMode::Full,
            min_probability: 0.0,
            rep_creation_day: RepCreationDayConfig::default(),
            concurrency: 4,
            error_policy: ErrorPolicy::SkipDocument,
        }
    }
}

impl PipelineConfig {
    /// Precise preset: strict closure, confident classifier links only
    pub fn precise() -> Self {
        Self {
            sieves: vec![
                "TimeTimeSieve".to_string(),
                "RepCreationDay".to_string(),
                "EventCreationTimeSieve".to_string(),
                "MLEventDCT".to_string(),
                "MLEventTimeSameSent".to_string(),
            ],
            closure: ClosureConfig::strict(),
            min_probability: 0.7,
            ..Self::default()
        }
    }

    /// Exhaustive preset: every sieve, ending with the vague fallback
    pub fn exhaustive() -> Self {
        Self {
            sieves: vec![
                "TimeTimeSieve".to_string(),
                "RepCreationDay".to_string(),
                "EventCreationTimeSieve".to_string(),
                "MLEventDCT".to_string(),
                "MLEventTimeSameSent".to_string(),
                "MLEventEventSameSent".to_string(),
                "MLEventEventAdjacentSent".to_string(),
                "AllVagueSieve".to_string(),
            ],
            rep_creation_day: RepCreationDayConfig {
                include_present_ref: true,
                ..RepCreationDayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sieves.is_empty() {
            return Err("at least one sieve must be configured".to_string());
        }
        if let Some(blank) = self.sieves.iter().find(|s| s.trim().is_empty()) {
            return Err(format!("sieve names cannot be blank: {blank:?}"));
        }
        if !(0.0..=1.0).contains(&self.min_probability) {
            return Err("min_probability must be between 0 and 1".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        self.closure.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
