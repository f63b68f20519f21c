//! Client entity

use super::{Contact, Document, HistoryEntry, Location, Placement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub industry: Option<String>,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub locations: Vec<Location>,

    #[serde(default)]
    pub contacts: Vec<Contact>,

    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub placements: Vec<Placement>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}
