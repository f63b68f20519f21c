//! History log entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,

    pub action: String,

    #[serde(default)]
    pub changed_by: Option<String>,

    #[serde(default)]
    pub changes: Option<String>,

    pub timestamp: DateTime<Utc>,
}
