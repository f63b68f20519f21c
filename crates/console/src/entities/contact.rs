use super::{json_body, merge_validation, opt_string};
use crate::editor::{ChildKind, ChildSpec};
use crate::entity::ParentEntity;
use crate::forms::{unknown_field, Draft, FieldValue, FieldView, InputKind};
use crate::table::{Cell, Column};
use serde::Serialize;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::{resolve_location_label, Contact};
use staffdesk_common::validation::{check_required, check_required_email, email_taken, EMAIL_TAKEN};
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ContactDraft {
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: String,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: String,
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: String,
    pub title: String,
    /// Work location id
    pub location: Option<i64>,
    pub is_primary: bool,
}

impl From<&Contact> for ContactDraft {
    fn from(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: opt_string(&contact.email),
            phone: opt_string(&contact.phone),
            title: opt_string(&contact.title),
            location: contact.location,
            is_primary: contact.is_primary,
        }
    }
}

impl Draft for ContactDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "first_name" => self.first_name = value.into_text(field)?,
            "last_name" => self.last_name = value.into_text(field)?,
            "email" => self.email = value.into_text(field)?,
            "phone" => self.phone = value.into_text(field)?,
            "title" => self.title = value.into_text(field)?,
            "location" => self.location = value.into_ref(field)?,
            "is_primary" => self.is_primary = value.into_bool(field)?,
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
            FieldView::text("title", "Title", &self.title),
            FieldView::select("location", "Work Location", self.location),
            FieldView::checkbox("is_primary", "Primary Contact", self.is_primary),
        ]
    }
}

/// Contacts of a client or subcontractor
pub struct ContactSpec<P> {
    resource: Resource,
    parent_field: &'static str,
    records: fn(&P) -> &[Contact],
}

impl<P> ContactSpec<P> {
    pub fn new(resource: Resource, parent_field: &'static str, records: fn(&P) -> &[Contact]) -> Self {
        Self { resource, parent_field, records }
    }
}

impl<P: ParentEntity> ChildSpec<P> for ContactSpec<P> {
    type Record = Contact;
    type Draft = ContactDraft;

    fn kind(&self) -> ChildKind {
        ChildKind::Contact
    }

    fn resource(&self) -> Resource {
        self.resource
    }

    fn records<'a>(&self, parent: &'a P) -> &'a [Contact] {
        (self.records)(parent)
    }

    fn record_id(&self, record: &Contact) -> i64 {
        record.id
    }

    fn draft_from(&self, record: &Contact) -> ContactDraft {
        ContactDraft::from(record)
    }

    fn validate(&self, parent: &P, draft: &ContactDraft, editing: Option<i64>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "first_name", &draft.first_name, "First name is required");
        check_required_email(&mut errors, "email", &draft.email);

        let siblings = (self.records)(parent)
            .iter()
            .filter_map(|c| c.email.as_deref().map(|email| (c.id, email)));
        if email_taken(&draft.email, siblings, editing) {
            errors.insert("email", EMAIL_TAKEN);
        }

        merge_validation(draft, errors)
    }

    fn payload(&self, parent_id: i64, draft: &ContactDraft) -> Result<Payload> {
        json_body(draft, Some((self.parent_field, parent_id)))
    }

    fn columns(&self, parent: &P) -> Vec<Column<Contact>> {
        let locations = parent.locations().to_vec();
        vec![
            Column::new("Name", |c: &Contact| Cell::text(c.full_name())),
            Column::new("Email", |c: &Contact| Cell::from(&c.email)),
            Column::new("Phone", |c: &Contact| Cell::from(&c.phone)),
            Column::new("Title", |c: &Contact| Cell::from(&c.title)),
            Column::new("Work Location", move |c: &Contact| {
                Cell::text(resolve_location_label(&locations, c.location))
            }),
            Column::new("Primary", |c: &Contact| Cell::from(c.is_primary)),
        ]
    }

    fn empty_message(&self) -> &'static str {
        "No contacts added yet."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorEvent, Phase, Tab, TabbedEditor};
    use crate::testing;
    use staffdesk_common::api::{Method, MockReply, MockTransport};
    use staffdesk_common::models::{Client, Subcontractor};
    use staffdesk_common::validation::{EMAIL_INVALID, EMAIL_REQUIRED};
    use staffdesk_common::AppError;
    use serde_json::json;
    use std::sync::Arc;

    fn fill(editor: &mut TabbedEditor<Client>, email: &str) {
        editor.set_field(ChildKind::Contact, "first_name", "Cy").unwrap();
        editor.set_field(ChildKind::Contact, "email", email).unwrap();
    }

    #[tokio::test]
    async fn test_missing_or_malformed_email_sends_nothing() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;
        mock.clear_requests();

        editor.open_create(ChildKind::Contact).unwrap();
        fill(&mut editor, "");
        assert!(matches!(editor.submit(ChildKind::Contact).await, Err(AppError::Validation { .. })));
        assert_eq!(editor.field_errors(ChildKind::Contact).and_then(|e| e.get("email")), Some(EMAIL_REQUIRED));

        fill(&mut editor, "cy@acme");
        assert!(editor.submit(ChildKind::Contact).await.is_err());
        assert_eq!(editor.field_errors(ChildKind::Contact).and_then(|e| e.get("email")), Some(EMAIL_INVALID));

        assert!(mock.requests().is_empty());
        assert_eq!(editor.phase(ChildKind::Contact), Phase::Create);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_except_for_self() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;
        mock.clear_requests();

        editor.open_create(ChildKind::Contact).unwrap();
        fill(&mut editor, "ANA@acme.io");
        assert!(editor.submit(ChildKind::Contact).await.is_err());
        assert_eq!(editor.field_errors(ChildKind::Contact).and_then(|e| e.get("email")), Some(EMAIL_TAKEN));
        assert!(mock.requests().is_empty());

        // editing contact 5 keeps its own address
        editor.open_edit(ChildKind::Contact, 5).unwrap();
        editor.set_field(ChildKind::Contact, "title", "Director").unwrap();
        mock.reply_once(Method::PUT, "/client-contacts/5/", MockReply::ok(json!({"id": 5})));
        editor.submit(ChildKind::Contact).await.unwrap();

        let puts = mock.requests_with(&Method::PUT);
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].payload.as_json().map(|b| b["email"].clone()), Some(json!("ana@acme.io")));
        assert_eq!(puts[0].payload.as_json().map(|b| b["client"].clone()), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_edit_draft_round_trips() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;

        editor.open_edit(ChildKind::Contact, 5).unwrap();
        let first = editor.draft::<ContactDraft>(ChildKind::Contact).cloned().unwrap();
        assert_eq!(first.first_name, "Ana");
        assert_eq!(first.email, "ana@acme.io");
        assert_eq!(first.location, Some(1));
        assert_eq!(editor.editing().map(|s| (s.kind, s.id)), Some((ChildKind::Contact, 5)));

        editor.set_field(ChildKind::Contact, "phone", "555-0000").unwrap();
        editor.close(ChildKind::Contact);
        assert_eq!(editor.editing(), None);

        editor.open_edit(ChildKind::Contact, 5).unwrap();
        assert_eq!(editor.draft::<ContactDraft>(ChildKind::Contact), Some(&first));
    }

    #[tokio::test]
    async fn test_unknown_record_leaves_modal_closed() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;

        let err = editor.open_edit(ChildKind::Contact, 99).unwrap_err();
        assert!(matches!(err, AppError::RecordNotFound { id: 99, .. }));
        assert_eq!(editor.phase(ChildKind::Contact), Phase::Closed);
    }

    #[tokio::test]
    async fn test_tab_switch_discards_open_add_contact() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;
        editor.switch_tab(Tab::Contacts).unwrap();
        editor.open_create(ChildKind::Contact).unwrap();
        fill(&mut editor, "cy@acme.io");
        mock.clear_requests();
        editor.take_events();

        editor.switch_tab(Tab::Documents).unwrap();

        assert!(mock.requests().is_empty());
        assert_eq!(editor.phase(ChildKind::Contact), Phase::Closed);
        assert_eq!(editor.draft::<ContactDraft>(ChildKind::Contact), None);
        assert_eq!(editor.editing(), None);
        assert_eq!(
            editor.take_events(),
            vec![
                EditorEvent::DraftReset(ChildKind::Contact),
                EditorEvent::ModalClosed(ChildKind::Contact),
                EditorEvent::TabSwitched(Tab::Documents),
            ]
        );

        editor.open_create(ChildKind::Contact).unwrap();
        assert_eq!(editor.draft::<ContactDraft>(ChildKind::Contact), Some(&ContactDraft::default()));
    }

    #[tokio::test]
    async fn test_work_location_resolves_or_falls_back() {
        let mock = Arc::new(MockTransport::new());
        let editor: TabbedEditor<Client> = testing::client_editor(&mock).await;

        let table = editor.table(ChildKind::Contact).unwrap();
        assert_eq!(table.column_text("Work Location"), vec!["Austin HQ".to_string(), "N/A".to_string()]);
    }

    #[tokio::test]
    async fn test_subcontractor_contacts_use_their_own_resource() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Subcontractor> = testing::subcontractor_editor(&mock).await;
        mock.clear_requests();

        editor.open_create(ChildKind::Contact).unwrap();
        editor.set_field(ChildKind::Contact, "first_name", "Lee").unwrap();
        editor.set_field(ChildKind::Contact, "email", "lee@bolt.io").unwrap();
        mock.reply_once(Method::POST, "/subcontractor-contacts/", MockReply::created(json!({"id": 40})));
        editor.submit(ChildKind::Contact).await.unwrap();

        let posts = mock.requests_with(&Method::POST);
        assert_eq!(posts[0].path, "/subcontractor-contacts/");
        assert_eq!(posts[0].payload.as_json().map(|b| b["subcontractor"].clone()), Some(json!(2)));
    }
}
