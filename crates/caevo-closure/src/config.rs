//! Closure configuration

use serde::{Deserialize, Serialize};

/// Configuration for the closure engine
///
/// # Examples
///
/// ```
/// use caevo_closure::ClosureConfig;
///
/// let config = ClosureConfig::default();
/// assert_eq!(config.pass_limit(10), 40);
///
/// let strict = ClosureConfig::strict();
/// assert!(!strict.tolerate_subsumed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureConfig {
    /// Passes allowed per graph node before giving up
    /// Default: 4
    pub pass_factor: usize,

    /// Treat an inference as agreeing with an existing link when one
    /// relation's meaning contains the other's (BEFORE vs IBEFORE,
    /// INCLUDES vs BEGUN_BY)
    /// Default: true
    #[serde(default = "default_tolerate_subsumed")]
    pub tolerate_subsumed: bool,
}

fn default_tolerate_subsumed() -> bool {
    true
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            pass_factor: 4,
            tolerate_subsumed: true,
        }
    }
}

impl ClosureConfig {
    /// Every relation mismatch is a conflict
    pub fn strict() -> Self {
        Self {
            pass_factor: 4,
            tolerate_subsumed: false,
        }
    }

    /// Pass cap for a graph with `nodes` entities
    pub fn pass_limit(&self, nodes: usize) -> usize {
        nodes.max(1).saturating_mul(self.pass_factor)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.pass_factor == 0 {
            return Err("pass_factor must be greater than 0".to_string());
        }
        Ok(())
    }
}
