//! Shared fixtures for the console tests

use crate::context::{AppContext, AutoConfirm, Confirm};
use crate::editor::TabbedEditor;
use crate::entity::ParentEntity;
use crate::notify::ToastLevel;
use serde_json::{json, Value};
use staffdesk_common::api::{Method, MockReply, MockTransport};
use staffdesk_common::config::UiConfig;
use staffdesk_common::models::{Client, Employee, Subcontractor};
use std::sync::Arc;

pub fn context(mock: &Arc<MockTransport>, confirm: Arc<dyn Confirm>) -> AppContext {
    AppContext::with_transport(mock.clone(), confirm, UiConfig::default())
}

pub fn client_json() -> Value {
    json!({
        "id": 1,
        "name": "Acme Builders",
        "email": "office@acme.io",
        "phone": "512-555-0100",
        "city": "Austin",
        "industry": null,
        "is_active": true,
        "created_at": "2024-01-15T09:30:00Z",
        "locations": [
            {"id": 1, "name": "Austin HQ", "address": "100 Congress Ave", "city": "Austin", "state": "TX", "zip_code": "78701", "is_primary": true}
        ],
        "contacts": [
            {"id": 5, "first_name": "Ana", "last_name": "Ruiz", "email": "ana@acme.io", "phone": "512-555-0101", "title": "Site Manager", "location": 1, "is_primary": true},
            {"id": 6, "first_name": "Bo", "last_name": "Chen", "email": "bo@acme.io", "location": null}
        ],
        "documents": [
            {"id": 8, "title": "W-9", "document_type": "Tax", "file": "https://files.example.com/w9.pdf", "expires_on": null}
        ],
        "placements": [
            {"id": 40, "client": 1, "employee": 3, "location": 1, "role": "Rigger", "start_date": "2024-02-01", "end_date": null, "is_active": true}
        ],
        "history": [
            {"id": 100, "action": "created", "changed_by": "admin", "changes": null, "timestamp": "2024-01-15T09:30:00Z"}
        ]
    })
}

pub fn subcontractor_json() -> Value {
    json!({
        "id": 2,
        "name": "Bolt Electric",
        "email": "jobs@bolt.io",
        "city": "Dallas",
        "contract_name": "Site Wiring 2024",
        "is_active": true,
        "locations": [
            {"id": 21, "name": "Dallas Yard", "city": "Dallas"}
        ],
        "contacts": [
            {"id": 22, "first_name": "Dee", "last_name": "Park", "email": "dee@bolt.io", "location": 21}
        ],
        "documents": [],
        "verifications": [
            {"id": 12, "verification_type": "License", "status": "verified", "verified_on": "2024-03-01", "verified_by": "admin"}
        ],
        "history": []
    })
}

pub fn employee_json() -> Value {
    json!({
        "id": 3,
        "first_name": "Sam",
        "last_name": "Ortiz",
        "email": "sam@staffdesk.io",
        "position": "Rigger",
        "is_active": true,
        "documents": [
            {"id": 31, "title": "I-9", "file": "https://files.example.com/i9.pdf"}
        ],
        "placements": [
            {"id": 61, "client": 1, "employee": 3, "location": 1, "role": "Rigger", "start_date": "2024-02-01", "is_active": true}
        ],
        "history": []
    })
}

async fn editor_for<P: ParentEntity>(
    mock: &Arc<MockTransport>,
    confirm: Arc<dyn Confirm>,
    id: i64,
    body: Value,
) -> TabbedEditor<P> {
    mock.reply(Method::GET, &P::RESOURCE.item_path(id), MockReply::ok(body));
    let mut editor = TabbedEditor::new(context(mock, confirm));
    editor.load(id).await.unwrap();
    editor
}

/// Editor over client 1 that accepts every confirmation
pub async fn client_editor(mock: &Arc<MockTransport>) -> TabbedEditor<Client> {
    client_editor_with(mock, Arc::new(AutoConfirm::accept())).await
}

pub async fn client_editor_with(mock: &Arc<MockTransport>, confirm: Arc<AutoConfirm>) -> TabbedEditor<Client> {
    editor_for(mock, confirm, 1, client_json()).await
}

pub async fn subcontractor_editor(mock: &Arc<MockTransport>) -> TabbedEditor<Subcontractor> {
    editor_for(mock, Arc::new(AutoConfirm::accept()), 2, subcontractor_json()).await
}

pub async fn employee_editor(mock: &Arc<MockTransport>) -> TabbedEditor<Employee> {
    editor_for(mock, Arc::new(AutoConfirm::accept()), 3, employee_json()).await
}

pub fn latest_toast<P: ParentEntity>(editor: &TabbedEditor<P>) -> Option<(ToastLevel, String)> {
    editor.context().notifier.latest().map(|t| (t.level, t.text))
}
