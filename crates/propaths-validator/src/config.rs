//! Validator configuration

use serde::{Deserialize, Serialize};

/// Which repairs the validator applies
///
/// Detection always runs; a disabled rule reports its findings as unfixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Default missing function arrows/directions and refresh the interactor arrow
    #[serde(default = "enabled")]
    pub fix_arrows: bool,

    /// Complete indirect chains and enforce depth
    #[serde(default = "enabled")]
    pub fix_chains: bool,

    /// Refresh the interactor direction from function evidence
    #[serde(default = "enabled")]
    pub fix_directions: bool,

    /// Reset interactors whose upstream is one of their own two proteins
    #[serde(default = "enabled")]
    pub fix_corruption: bool,

    /// Coerce invalid function arrows/directions and fill placeholder text
    #[serde(default)]
    pub fix_function_fields: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fix_arrows: true,
            fix_chains: true,
            fix_directions: true,
            fix_corruption: true,
            fix_function_fields: false,
        }
    }
}

impl ValidatorConfig {
    /// Create a lenient configuration (report only, repair corruption)
    pub fn lenient() -> Self {
        Self {
            fix_arrows: false,
            fix_chains: false,
            fix_directions: false,
            fix_corruption: true,
            fix_function_fields: false,
        }
    }

    /// Create a strict configuration (every repair enabled)
    pub fn strict() -> Self {
        Self {
            fix_function_fields: true,
            ..Self::default()
        }
    }
}
