use super::{json_body, merge_validation, opt_string};
use crate::editor::{ChildKind, ChildSpec};
use crate::entity::ParentEntity;
use crate::forms::{unknown_field, Draft, FieldValue, FieldView};
use crate::table::{Cell, Column};
use serde::Serialize;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::Location;
use staffdesk_common::validation::check_required;
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct LocationDraft {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[validate(length(max = 10, message = "Zip code must be at most 10 characters"))]
    pub zip_code: String,
    pub is_primary: bool,
}

impl From<&Location> for LocationDraft {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            address: opt_string(&location.address),
            city: opt_string(&location.city),
            state: opt_string(&location.state),
            zip_code: opt_string(&location.zip_code),
            is_primary: location.is_primary,
        }
    }
}

impl Draft for LocationDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "address" => self.address = value.into_text(field)?,
            "city" => self.city = value.into_text(field)?,
            "state" => self.state = value.into_text(field)?,
            "zip_code" => self.zip_code = value.into_text(field)?,
            "is_primary" => self.is_primary = value.into_bool(field)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::text("name", "Location Name", &self.name),
            FieldView::text("address", "Address", &self.address),
            FieldView::text("city", "City", &self.city),
            FieldView::text("state", "State", &self.state),
            FieldView::text("zip_code", "Zip Code", &self.zip_code),
            FieldView::checkbox("is_primary", "Primary Location", self.is_primary),
        ]
    }
}

/// Work locations of a client or subcontractor
pub struct LocationSpec<P> {
    resource: Resource,
    parent_field: &'static str,
    records: fn(&P) -> &[Location],
}

impl<P> LocationSpec<P> {
    pub fn new(resource: Resource, parent_field: &'static str, records: fn(&P) -> &[Location]) -> Self {
        Self { resource, parent_field, records }
    }
}

impl<P: ParentEntity> ChildSpec<P> for LocationSpec<P> {
    type Record = Location;
    type Draft = LocationDraft;

    fn kind(&self) -> ChildKind {
        ChildKind::Location
    }

    fn resource(&self) -> Resource {
        self.resource
    }

    fn records<'a>(&self, parent: &'a P) -> &'a [Location] {
        (self.records)(parent)
    }

    fn record_id(&self, record: &Location) -> i64 {
        record.id
    }

    fn draft_from(&self, record: &Location) -> LocationDraft {
        LocationDraft::from(record)
    }

    fn validate(&self, _parent: &P, draft: &LocationDraft, _editing: Option<i64>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "name", &draft.name, "Location name is required");
        merge_validation(draft, errors)
    }

    fn payload(&self, parent_id: i64, draft: &LocationDraft) -> Result<Payload> {
        json_body(draft, Some((self.parent_field, parent_id)))
    }

    fn columns(&self, _parent: &P) -> Vec<Column<Location>> {
        vec![
            Column::new("Name", |l: &Location| Cell::from(l.name.as_str())),
            Column::new("Address", |l: &Location| Cell::from(&l.address)),
            Column::new("City", |l: &Location| Cell::from(&l.city)),
            Column::new("State", |l: &Location| Cell::from(&l.state)),
            Column::new("Zip Code", |l: &Location| Cell::from(&l.zip_code)),
            Column::new("Primary", |l: &Location| Cell::from(l.is_primary)),
        ]
    }

    fn empty_message(&self) -> &'static str {
        "No locations added yet."
    }
}
