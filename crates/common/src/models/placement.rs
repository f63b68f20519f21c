//! Placement entity: an employee assigned to a client site

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: i64,

    #[serde(default)]
    pub client: Option<i64>,

    #[serde(default)]
    pub employee: Option<i64>,

    /// Work location id on the client side
    #[serde(default)]
    pub location: Option<i64>,

    pub role: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub is_active: bool,
}
