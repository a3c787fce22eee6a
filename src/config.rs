//! Generator configuration.
//!
//! All knobs that change which combinations are accepted live here so a
//! run can be reproduced from its config alone. Loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::DEFAULT_LAB_SUFFIX;

/// How slot codes missing from the slot mapping index are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCodePolicy {
    /// The code occupies no cell and therefore always fits.
    ///
    /// Can overstate feasibility when the catalog contains typos.
    #[default]
    Ignore,
    /// The offering is rejected with
    /// [`TimetableError::UnknownSlotCode`](crate::error::TimetableError::UnknownSlotCode).
    Reject,
}

/// Configuration for [`Generator`](crate::generator::Generator).
///
/// # Example
/// ```
/// use u_timetable::config::{GeneratorConfig, UnknownCodePolicy};
///
/// let config = GeneratorConfig::from_json(r#"{ "unknown_code_policy": "reject" }"#).unwrap();
/// assert_eq!(config.unknown_code_policy, UnknownCodePolicy::Reject);
/// assert_eq!(config.lab_suffix, "L");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Treatment of unmapped slot codes.
    pub unknown_code_policy: UnknownCodePolicy,
    /// Suffix that marks lab course codes and lab slot codes.
    pub lab_suffix: String,
    /// Skip offerings containing a slot code that ends with `lab_suffix`.
    pub theory_only: bool,
    /// Drop global-pairing results whose course→footprint sets coincide.
    pub dedupe_results: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            unknown_code_policy: UnknownCodePolicy::Ignore,
            lab_suffix: DEFAULT_LAB_SUFFIX.to_string(),
            theory_only: false,
            dedupe_results: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the unknown-code policy.
    pub fn with_unknown_code_policy(mut self, policy: UnknownCodePolicy) -> Self {
        self.unknown_code_policy = policy;
        self
    }

    /// Sets the lab suffix.
    pub fn with_lab_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.lab_suffix = suffix.into();
        self
    }

    /// Restricts offerings to theory slots.
    pub fn with_theory_only(mut self, theory_only: bool) -> Self {
        self.theory_only = theory_only;
        self
    }

    /// Enables or disables result deduplication in global pairing.
    pub fn with_dedupe_results(mut self, dedupe: bool) -> Self {
        self.dedupe_results = dedupe;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GeneratorConfig::default();
        assert_eq!(c.unknown_code_policy, UnknownCodePolicy::Ignore);
        assert_eq!(c.lab_suffix, "L");
        assert!(!c.theory_only);
        assert!(c.dedupe_results);
    }

    #[test]
    fn test_builder() {
        let c = GeneratorConfig::new()
            .with_unknown_code_policy(UnknownCodePolicy::Reject)
            .with_lab_suffix("LAB")
            .with_theory_only(true)
            .with_dedupe_results(false);
        assert_eq!(c.unknown_code_policy, UnknownCodePolicy::Reject);
        assert_eq!(c.lab_suffix, "LAB");
        assert!(c.theory_only);
        assert!(!c.dedupe_results);
    }

    #[test]
    fn test_json_round_trip() {
        let c = GeneratorConfig::new().with_theory_only(true);
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"unknown_code_policy\":\"ignore\""));
        assert_eq!(GeneratorConfig::from_json(&json).unwrap(), c);
    }

    #[test]
    fn test_invalid_policy() {
        assert!(GeneratorConfig::from_json(r#"{ "unknown_code_policy": "maybe" }"#).is_err());
    }
}
