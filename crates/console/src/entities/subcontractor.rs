use super::{json_body, merge_validation, opt_string, ContactSpec, DocumentSpec, LocationSpec, VerificationSpec};
use crate::editor::EditorConfig;
use crate::entity::{FilterField, ParentEntity};
use crate::forms::{unknown_field, Draft, FieldValue, FieldView, InputKind};
use crate::table::{Cell, Column};
use serde::Serialize;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::{Contact, Document, HistoryEntry, Location, Subcontractor, Verification};
use staffdesk_common::validation::{check_optional_email, check_required};
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct SubcontractorDraft {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: String,
    pub city: String,
    pub contract_name: String,
    pub is_active: bool,
}

impl Default for SubcontractorDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            city: String::new(),
            contract_name: String::new(),
            is_active: true,
        }
    }
}

impl Draft for SubcontractorDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "email" => self.email = value.into_text(field)?,
            "phone" => self.phone = value.into_text(field)?,
            "city" => self.city = value.into_text(field)?,
            "contract_name" => self.contract_name = value.into_text(field)?,
            "is_active" => self.is_active = value.into_bool(field)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::text("name", "Subcontractor Name", &self.name),
            FieldView::new("email", "Email", InputKind::Email, self.email.as_str()),
            FieldView::new("phone", "Phone", InputKind::Phone, self.phone.as_str()),
            FieldView::text("city", "City", &self.city),
            FieldView::text("contract_name", "Contract Name", &self.contract_name),
            FieldView::checkbox("is_active", "Active", self.is_active),
        ]
    }
}

fn subcontractor_locations(sub: &Subcontractor) -> &[Location] {
    &sub.locations
}

fn subcontractor_contacts(sub: &Subcontractor) -> &[Contact] {
    &sub.contacts
}

fn subcontractor_documents(sub: &Subcontractor) -> &[Document] {
    &sub.documents
}

fn subcontractor_verifications(sub: &Subcontractor) -> &[Verification] {
    &sub.verifications
}

impl ParentEntity for Subcontractor {
    type Draft = SubcontractorDraft;

    const RESOURCE: Resource = Resource::SUBCONTRACTORS;
    const LABEL: &'static str = "Subcontractor";

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn locations(&self) -> &[Location] {
        &self.locations
    }

    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    fn details(&self) -> Vec<(&'static str, Cell)> {
        vec![
            ("Name", Cell::from(self.name.as_str())),
            ("Email", Cell::from(&self.email)),
            ("Phone", Cell::from(&self.phone)),
            ("City", Cell::from(&self.city)),
            ("Contract Name", Cell::from(&self.contract_name)),
            ("Active", Cell::from(self.is_active)),
            ("Created", Cell::timestamp(self.created_at)),
        ]
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("Name", |s: &Subcontractor| Cell::from(s.name.as_str())).sortable("name"),
            Column::new("Email", |s: &Subcontractor| Cell::from(&s.email)).sortable("email"),
            Column::new("Phone", |s: &Subcontractor| Cell::from(&s.phone)),
            Column::new("City", |s: &Subcontractor| Cell::from(&s.city)).sortable("city"),
            Column::new("Contract", |s: &Subcontractor| Cell::from(&s.contract_name)).sortable("contract_name"),
            Column::new("Active", |s: &Subcontractor| Cell::from(s.is_active)).sortable("is_active"),
            Column::new("Created", |s: &Subcontractor| Cell::timestamp(s.created_at)).sortable("created_at"),
        ]
    }

    fn filters() -> Vec<FilterField> {
        vec![
            FilterField::new("name", "Name"),
            FilterField::new("email", "Email"),
            FilterField::new("city", "City"),
            FilterField::new("contract_name", "Contract"),
        ]
    }

    fn draft_from(&self) -> SubcontractorDraft {
        SubcontractorDraft {
            name: self.name.clone(),
            email: opt_string(&self.email),
            phone: opt_string(&self.phone),
            city: opt_string(&self.city),
            contract_name: opt_string(&self.contract_name),
            is_active: self.is_active,
        }
    }

    fn validate(draft: &SubcontractorDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "name", &draft.name, "Subcontractor name is required");
        check_optional_email(&mut errors, "email", &draft.email);
        merge_validation(draft, errors)
    }

    fn payload(draft: &SubcontractorDraft) -> Result<Payload> {
        json_body(draft, None)
    }

    fn editor_config() -> EditorConfig<Self> {
        EditorConfig::new()
            .child(LocationSpec::new(Resource::SUBCONTRACTOR_LOCATIONS, "subcontractor", subcontractor_locations))
            .child(ContactSpec::new(Resource::SUBCONTRACTOR_CONTACTS, "subcontractor", subcontractor_contacts))
            .child(DocumentSpec::new(Resource::SUBCONTRACTOR_DOCUMENTS, "subcontractor", subcontractor_documents))
            .child(VerificationSpec::new(subcontractor_verifications))
            .with_history()
    }
}
