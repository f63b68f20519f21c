use super::{json_body, merge_validation, opt_string, ContactSpec, DocumentSpec, LocationSpec, PlacementSpec};
use crate::editor::EditorConfig;
use crate::entity::{FilterField, ParentEntity};
use crate::forms::{unknown_field, Draft, FieldValue, FieldView, InputKind};
use crate::table::{Cell, Column};
use serde::Serialize;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::{Client, Contact, Document, HistoryEntry, Location, Placement};
use staffdesk_common::validation::{check_optional_email, check_required};
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ClientDraft {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: String,
    pub city: String,
    pub industry: String,
    pub is_active: bool,
}

impl Default for ClientDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            city: String::new(),
            industry: String::new(),
            is_active: true,
        }
    }
}

impl Draft for ClientDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "email" => self.email = value.into_text(field)?,
            "phone" => self.phone = value.into_text(field)?,
            "city" => self.city = value.into_text(field)?,
            "industry" => self.industry = value.into_text(field)?,
            "is_active" => self.is_active = value.into_bool(field)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::text("name", "Client Name", &self.name),
            FieldView::new("email", "Email", InputKind::Email, self.email.as_str()),
            FieldView::new("phone", "Phone", InputKind::Phone, self.phone.as_str()),
            FieldView::text("city", "City", &self.city),
            FieldView::text("industry", "Industry", &self.industry),
            FieldView::checkbox("is_active", "Active", self.is_active),
        ]
    }
}

fn client_locations(client: &Client) -> &[Location] {
    &client.locations
}

fn client_contacts(client: &Client) -> &[Contact] {
    &client.contacts
}

fn client_documents(client: &Client) -> &[Document] {
    &client.documents
}

fn client_placements(client: &Client) -> &[Placement] {
    &client.placements
}

impl ParentEntity for Client {
    type Draft = ClientDraft;

    const RESOURCE: Resource = Resource::CLIENTS;
    const LABEL: &'static str = "Client";

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
            ("Industry", Cell::from(&self.industry)),
            ("Active", Cell::from(self.is_active)),
            ("Created", Cell::timestamp(self.created_at)),
        ]
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("Name", |c: &Client| Cell::from(c.name.as_str())).sortable("name"),
            Column::new("Email", |c: &Client| Cell::from(&c.email)).sortable("email"),
            Column::new("Phone", |c: &Client| Cell::from(&c.phone)),
            Column::new("City", |c: &Client| Cell::from(&c.city)).sortable("city"),
            Column::new("Industry", |c: &Client| Cell::from(&c.industry)).sortable("industry"),
            Column::new("Active", |c: &Client| Cell::from(c.is_active)).sortable("is_active"),
            Column::new("Created", |c: &Client| Cell::timestamp(c.created_at)).sortable("created_at"),
        ]
    }

    fn filters() -> Vec<FilterField> {
        vec![
            FilterField::new("name", "Name"),
            FilterField::new("email", "Email"),
            FilterField::new("city", "City"),
            FilterField::new("industry", "Industry"),
        ]
    }

    fn draft_from(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.clone(),
            email: opt_string(&self.email),
            phone: opt_string(&self.phone),
            city: opt_string(&self.city),
            industry: opt_string(&self.industry),
            is_active: self.is_active,
        }
    }

    fn validate(draft: &ClientDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "name", &draft.name, "Client name is required");
        check_optional_email(&mut errors, "email", &draft.email);
        merge_validation(draft, errors)
    }

    fn payload(draft: &ClientDraft) -> Result<Payload> {
        json_body(draft, None)
    }

    fn editor_config() -> EditorConfig<Self> {
        EditorConfig::new()
            .child(LocationSpec::new(Resource::CLIENT_LOCATIONS, "client", client_locations))
            .child(ContactSpec::new(Resource::CLIENT_CONTACTS, "client", client_contacts))
            .child(DocumentSpec::new(Resource::CLIENT_DOCUMENTS, "client", client_documents))
            .child(PlacementSpec::new("client", client_placements))
            .with_history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{ChildKind, Tab, TabbedEditor};
    use crate::table::CellView;
    use crate::testing;
    use staffdesk_common::api::MockTransport;
    use staffdesk_common::AppError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_client_editor_tabs_and_views() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;

        assert_eq!(
            editor.tabs(),
            &[Tab::Details, Tab::Locations, Tab::Contacts, Tab::Documents, Tab::Placements, Tab::History]
        );
        assert_eq!(editor.active_tab(), Tab::Details);
        assert!(matches!(editor.switch_tab(Tab::Verification), Err(AppError::TabUnavailable { .. })));
        assert!(matches!(editor.open_create(ChildKind::Verification), Err(AppError::TabUnavailable { .. })));

        let details = editor.details();
        assert_eq!(details[0], ("Name", CellView::Text("Acme Builders".into())));
        assert_eq!(details[4].1, CellView::Placeholder);

        let history = editor.history_table().unwrap();
        assert_eq!(history.column_text("Action"), vec!["created".to_string()]);
        assert_eq!(history.headers.len(), 4);

        let dropdown = editor.location_dropdown(Some(1));
        assert_eq!(dropdown.selected_label(), "Austin HQ");
        assert_eq!(dropdown.options().len(), 1);
    }

    #[tokio::test]
    async fn test_one_modal_at_a_time() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;

        editor.open_create(ChildKind::Location).unwrap();
        editor.open_edit(ChildKind::Contact, 5).unwrap();

        assert_eq!(editor.open_kind(), Some(ChildKind::Contact));
        assert!(editor.draft::<crate::entities::LocationDraft>(ChildKind::Location).is_none());
    }

    #[test]
    fn test_client_draft_validation() {
        let mut draft = ClientDraft::default();
        draft.email = "nope".into();
        let errors = Client::validate(&draft);
        assert_eq!(errors.get("name"), Some("Client name is required"));
        assert_eq!(errors.get("email"), Some(staffdesk_common::validation::EMAIL_INVALID));

        draft.name = "Acme".into();
        draft.email = String::new();
        assert!(Client::validate(&draft).is_empty());
    }
}
