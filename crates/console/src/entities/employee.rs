use super::{json_body, merge_validation, opt_string, DocumentSpec, PlacementSpec};
use crate::editor::EditorConfig;
use crate::entity::{FilterField, ParentEntity};
use crate::forms::{unknown_field, Draft, FieldValue, FieldView, InputKind};
use crate::table::{Cell, Column};
use serde::Serialize;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::{Document, Employee, HistoryEntry, Placement};
use staffdesk_common::validation::{check_optional_email, check_required};
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct EmployeeDraft {
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: String,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: String,
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: String,
    pub city: String,
    pub position: String,
    pub is_active: bool,
}

impl Default for EmployeeDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            city: String::new(),
            position: String::new(),
            is_active: true,
        }
    }
}

impl Draft for EmployeeDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "first_name" => self.first_name = value.into_text(field)?,
            "last_name" => self.last_name = value.into_text(field)?,
            "email" => self.email = value.into_text(field)?,
            "phone" => self.phone = value.into_text(field)?,
            "city" => self.city = value.into_text(field)?,
            "position" => self.position = value.into_text(field)?,
            "is_active" => self.is_active = value.into_bool(field)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::text("first_name", "First Name", &self.first_name),
            FieldView::text("last_name", "Last Name", &self.last_name),
            FieldView::new("email", "Email", InputKind::Email, self.email.as_str()),
            FieldView::new("phone", "Phone", InputKind::Phone, self.phone.as_str()),
            FieldView::text("city", "City", &self.city),
            FieldView::text("position", "Position", &self.position),
            FieldView::checkbox("is_active", "Active", self.is_active),
        ]
    }
}

fn employee_documents(employee: &Employee) -> &[Document] {
    &employee.documents
}

fn employee_placements(employee: &Employee) -> &[Placement] {
    &employee.placements
}

/// Employees carry documents and placements only; they own no locations.
impl ParentEntity for Employee {
    type Draft = EmployeeDraft;

    const RESOURCE: Resource = Resource::EMPLOYEES;
    const LABEL: &'static str = "Employee";

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    fn details(&self) -> Vec<(&'static str, Cell)> {
        vec![
            ("Name", Cell::text(self.full_name())),
            ("Email", Cell::from(&self.email)),
            ("Phone", Cell::from(&self.phone)),
            ("City", Cell::from(&self.city)),
            ("Position", Cell::from(&self.position)),
            ("Active", Cell::from(self.is_active)),
            ("Created", Cell::timestamp(self.created_at)),
        ]
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("Name", |e: &Employee| Cell::text(e.full_name())).sortable("last_name"),
            Column::new("Email", |e: &Employee| Cell::from(&e.email)).sortable("email"),
            Column::new("Phone", |e: &Employee| Cell::from(&e.phone)),
            Column::new("City", |e: &Employee| Cell::from(&e.city)).sortable("city"),
            Column::new("Position", |e: &Employee| Cell::from(&e.position)).sortable("position"),
            Column::new("Active", |e: &Employee| Cell::from(e.is_active)).sortable("is_active"),
        ]
    }

    fn filters() -> Vec<FilterField> {
        vec![
            FilterField::new("first_name", "First Name"),
            FilterField::new("last_name", "Last Name"),
            FilterField::new("email", "Email"),
            FilterField::new("city", "City"),
            FilterField::new("position", "Position"),
        ]
    }

    fn draft_from(&self) -> EmployeeDraft {
        EmployeeDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: opt_string(&self.email),
            phone: opt_string(&self.phone),
            city: opt_string(&self.city),
            position: opt_string(&self.position),
            is_active: self.is_active,
        }
    }

    fn validate(draft: &EmployeeDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "first_name", &draft.first_name, "First name is required");
        check_required(&mut errors, "last_name", &draft.last_name, "Last name is required");
        check_optional_email(&mut errors, "email", &draft.email);
        merge_validation(draft, errors)
    }

    fn payload(draft: &EmployeeDraft) -> Result<Payload> {
        json_body(draft, None)
    }

    fn editor_config() -> EditorConfig<Self> {
        EditorConfig::new()
            .child(DocumentSpec::new(Resource::EMPLOYEE_DOCUMENTS, "employee", employee_documents))
            .child(PlacementSpec::new("employee", employee_placements))
            .with_history()
    }
}
