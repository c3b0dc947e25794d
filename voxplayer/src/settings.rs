//! Orchestrator tunables.

use std::time::Duration;

/// Playback heuristics and pacing, normally sourced from `voxconfig`.
#[derive(Debug, Clone)]
pub struct PlayerSettings {
    /// Elapsed/announced duration ratio at or above which a completion
    /// with an empty queue counts as a normal end. A heuristic, not a
    /// guarantee: upstream duration metadata can be absent or wrong,
    /// and either value missing classifies the end as abnormal.
    pub normal_end_ratio: f64,
    /// Debounce between a transport stop and completion evaluation,
    /// letting transport teardown settle.
    pub settle_delay: Duration,
    /// Top-N width of a search prompt.
    pub search_width: usize,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            normal_end_ratio: 0.8,
            settle_delay: Duration::from_millis(500),
            search_width: 5,
        }
    }
}

impl PlayerSettings {
    /// Reads the tunables from the global configuration.
    pub fn from_config() -> Self {
        let config = voxconfig::get_config();
        Self {
            normal_end_ratio: config.normal_end_ratio(),
            settle_delay: config.completion_settle_delay(),
            search_width: config.search_width(),
        }
    }
}
