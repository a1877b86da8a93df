//! Forecast configurations and the weather variables they expose.

use serde::{Deserialize, Serialize};

/// A single downloadable weather variable, e.g. `TMP` ("1시간기온").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Short variable code used in download requests (e.g. "TMP", "WSD").
    pub code: String,
    /// Human-readable variable name.
    pub name: String,
}

/// A forecast product offered by the portal, with its variable catalog.
///
/// The portal serves a fixed set of configs such as 단기예보 (short-term
/// forecast) or 초단기실황 (ultra-short-term observations); each carries
/// the list of variables that can be requested for it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Config name, the key sent back in download requests.
    pub name: String,
    /// Short description of the product (coverage and interval).
    pub description: String,
    /// Variables available for this product.
    pub variables: Vec<Variable>,
}

impl ForecastConfig {
    /// Looks up a variable of this config by its code.
    pub fn variable(&self, code: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.code == code)
    }

    /// Resolves a set of chosen variable codes against this config.
    ///
    /// Returns the matching [`Variable`]s in catalog order; codes that do
    /// not belong to this config are silently dropped, so the result is
    /// always a valid payload for a download request.
    pub fn select_variables(&self, codes: &[&str]) -> Vec<Variable> {
        self.variables
            .iter()
            .filter(|v| codes.contains(&v.code.as_str()))
            .cloned()
            .collect()
    }
}
