//! Tracker tuning knobs.

use std::time::Duration;

/// Well-known key of the persisted snapshot slot.
pub const DEFAULT_STORAGE_KEY: &str = "worldbuildingRoadmap";

/// Runtime configuration for a `Tracker`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Key of the single durable slot holding the snapshot.
    pub storage_key: String,
    /// Quiet period before a requested save is written.
    pub save_debounce: Duration,
    /// How long a task stays highlighted after its status changes.
    pub pulse_duration: Duration,
    /// Delay before an expanded stage re-measures its content height.
    pub stage_remeasure_delay: Duration,
    /// Max height given to expanded stages when state is applied at load.
    pub expanded_on_load_max_height_px: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            save_debounce: Duration::from_millis(500),
            pulse_duration: Duration::from_millis(150),
            stage_remeasure_delay: Duration::from_millis(300),
            expanded_on_load_max_height_px: 1000,
        }
    }
}
