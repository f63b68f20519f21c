//! Parent entity seam
//!
//! Everything the list page and the tabbed editor need to know about a
//! top-level entity: where it lives, how it is listed and filtered, how its
//! own create/edit form works, and which child kinds its editor carries.

use crate::editor::EditorConfig;
use crate::forms::Draft;
use crate::table::{Cell, Column};
use serde::de::DeserializeOwned;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::{HistoryEntry, Location};
use staffdesk_common::{FieldErrors, Result};
use std::fmt;

/// A searchable column on the list page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Backend field, sent as `<field>__icontains`
    pub field: &'static str,
    pub label: &'static str,
}

impl FilterField {
    pub const fn new(field: &'static str, label: &'static str) -> Self {
        Self { field, label }
    }
}

pub trait ParentEntity: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Create/edit form of the entity itself
    type Draft: Draft;

    const RESOURCE: Resource;

    /// Singular display name, e.g. `Client`
    const LABEL: &'static str;

    fn id(&self) -> i64;

    fn display_name(&self) -> String;

    /// Work locations other records may point at
    fn locations(&self) -> &[Location] {
        &[]
    }

    fn history(&self) -> &[HistoryEntry];

    /// Label/value pairs for the Details tab
    fn details(&self) -> Vec<(&'static str, Cell)>;

    /// List page columns
    fn columns() -> Vec<Column<Self>>;

    fn filters() -> Vec<FilterField>;

    fn draft_from(&self) -> Self::Draft;

    fn validate(draft: &Self::Draft) -> FieldErrors;

    fn payload(draft: &Self::Draft) -> Result<Payload>;

    fn editor_config() -> EditorConfig<Self>;
}
