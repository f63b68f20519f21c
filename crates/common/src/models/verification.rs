//! Verification entity: compliance checks recorded against a subcontractor

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub id: i64,

    pub verification_type: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub verified_on: Option<NaiveDate>,

    #[serde(default)]
    pub verified_by: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}
