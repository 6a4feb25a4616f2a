//! Configuration for merge operations

use serde::{Deserialize, Serialize};

/// Configuration for the merge engine
///
/// # Examples
///
/// ```
/// use propaths_merge::MergeConfig;
///
/// let config = MergeConfig::default();
/// assert!(!config.replace_functions);
/// assert!(config.dedup_functions);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Replace an interactor's functions wholesale instead of appending
    ///
    /// Only schema re-aggregation should turn this on.
    #[serde(default)]
    pub replace_functions: bool,

    /// Drop repeated functions after appending, keyed by
    /// (function, arrow, cellular_process)
    #[serde(default = "default_dedup_functions")]
    pub dedup_functions: bool,

    /// Fragments buffered by the coordinator before senders wait
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_dedup_functions() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            replace_functions: false,
            dedup_functions: default_dedup_functions(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl MergeConfig {
    /// Configuration for schema re-aggregation: functions are replaced
    pub fn replacing() -> Self {
        Self {
            replace_functions: true,
            ..Self::default()
        }
    }
}
