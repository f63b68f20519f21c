//! Document entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,

    pub title: String,

    #[serde(default)]
    pub document_type: Option<String>,

    /// Download URL of the stored file
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub expires_on: Option<NaiveDate>,

    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}
