//! State kept between runs.

use serde::{Deserialize, Serialize};

/// Session state remembered between runs.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Last joined topic ID.
    #[serde(default)]
    pub last_topic_id: Option<u64>,
}
