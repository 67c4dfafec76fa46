use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BoardConfig {
    /// Number of distinct tile kinds the refill policy may synthesize.
    #[serde(default = "default_n_kinds")]
    pub n_kinds: u8,

    /// Minimum run length that qualifies as a match.
    #[serde(default = "default_min_matches")]
    pub min_matches_to_explode: usize,

    /// Permutation retries before a shuffle gives up.
    #[serde(default = "default_shuffle_attempts")]
    pub max_shuffle_attempts: u32,

    /// Cap on explode/shuffle steps within one resolve cycle; exceeding it
    /// means the board logic is stuck and surfaces `BoardInconsistent`.
    #[serde(default = "default_cascade_steps")]
    pub max_cascade_steps: u32,
}

// Helper functions for default values
fn default_n_kinds() -> u8 {
    5
}
fn default_min_matches() -> usize {
    3
}
fn default_shuffle_attempts() -> u32 {
    50
}
fn default_cascade_steps() -> u32 {
    1000
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            n_kinds: default_n_kinds(),
            min_matches_to_explode: default_min_matches(),
            max_shuffle_attempts: default_shuffle_attempts(),
            max_cascade_steps: default_cascade_steps(),
        }
    }
}

impl BoardConfig {
    pub fn with_kinds(n_kinds: u8) -> Self {
        BoardConfig {
            n_kinds,
            ..Default::default()
        }
    }
}
