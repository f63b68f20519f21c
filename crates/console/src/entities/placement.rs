use super::{json_body, merge_validation};
use crate::editor::{ChildKind, ChildSpec};
use crate::entity::ParentEntity;
use crate::forms::{date_text, unknown_field, Draft, FieldValue, FieldView};
use crate::table::{Cell, Column};
use chrono::NaiveDate;
use serde::Serialize;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::{resolve_location_label, Placement};
use staffdesk_common::validation::check_required;
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

pub const START_DATE_REQUIRED: &str = "Start date is required";
pub const END_BEFORE_START: &str = "End date cannot be before the start date";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct PlacementDraft {
    #[validate(length(max = 100, message = "Role must be at most 100 characters"))]
    pub role: String,
    pub client: Option<i64>,
    pub employee: Option<i64>,
    pub location: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl From<&Placement> for PlacementDraft {
    fn from(placement: &Placement) -> Self {
        Self {
            role: placement.role.clone(),
            client: placement.client,
            employee: placement.employee,
            location: placement.location,
            start_date: placement.start_date,
            end_date: placement.end_date,
            is_active: placement.is_active,
        }
    }
}

impl Draft for PlacementDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "role" => self.role = value.into_text(field)?,
            "client" => self.client = value.into_ref(field)?,
            "employee" => self.employee = value.into_ref(field)?,
            "location" => self.location = value.into_ref(field)?,
            "start_date" => self.start_date = value.into_date(field)?,
            "end_date" => self.end_date = value.into_date(field)?,
            "is_active" => self.is_active = value.into_bool(field)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::text("role", "Role", &self.role),
            FieldView::select("client", "Client", self.client),
            FieldView::select("employee", "Employee", self.employee),
            FieldView::select("location", "Work Location", self.location),
            FieldView::date("start_date", "Start Date", self.start_date),
            FieldView::date("end_date", "End Date", self.end_date),
            FieldView::checkbox("is_active", "Active", self.is_active),
        ]
    }
}

/// Placements of employees at clients, seen from either side
pub struct PlacementSpec<P> {
    parent_field: &'static str,
    records: fn(&P) -> &[Placement],
}

impl<P> PlacementSpec<P> {
    /// `parent_field` is `client` or `employee`
    pub fn new(parent_field: &'static str, records: fn(&P) -> &[Placement]) -> Self {
        Self { parent_field, records }
    }
}

impl<P: ParentEntity> ChildSpec<P> for PlacementSpec<P> {
    type Record = Placement;
    type Draft = PlacementDraft;

    fn kind(&self) -> ChildKind {
        ChildKind::Placement
    }

    fn resource(&self) -> Resource {
        Resource::PLACEMENTS
    }

    fn records<'a>(&self, parent: &'a P) -> &'a [Placement] {
        (self.records)(parent)
    }

    fn record_id(&self, record: &Placement) -> i64 {
        record.id
    }

    /// New placements start active
    fn blank(&self, _parent: &P) -> PlacementDraft {
        PlacementDraft {
            is_active: true,
            ..PlacementDraft::default()
        }
    }

    fn draft_from(&self, record: &Placement) -> PlacementDraft {
        PlacementDraft::from(record)
    }

    fn validate(&self, _parent: &P, draft: &PlacementDraft, _editing: Option<i64>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "role", &draft.role, "Role is required");
        match (draft.start_date, draft.end_date) {
            (None, _) => errors.insert("start_date", START_DATE_REQUIRED),
            (Some(start), Some(end)) if end < start => errors.insert("end_date", END_BEFORE_START),
            _ => {}
        }
        merge_validation(draft, errors)
    }

    fn payload(&self, parent_id: i64, draft: &PlacementDraft) -> Result<Payload> {
        json_body(draft, Some((self.parent_field, parent_id)))
    }

    /// Work Location only shows for parents that own locations
    fn columns(&self, parent: &P) -> Vec<Column<Placement>> {
        let mut columns = vec![Column::new("Role", |p: &Placement| Cell::from(p.role.as_str()))];
        if !parent.locations().is_empty() {
            let locations = parent.locations().to_vec();
            columns.push(Column::new("Work Location", move |p: &Placement| {
                Cell::text(resolve_location_label(&locations, p.location))
            }));
        }
        columns.extend([
            Column::new("Start Date", |p: &Placement| Cell::text(date_text(p.start_date))),
            Column::new("End Date", |p: &Placement| Cell::text(date_text(p.end_date))),
            Column::new("Active", |p: &Placement| Cell::from(p.is_active)),
        ]);
        columns
    }

    fn empty_message(&self) -> &'static str {
        "No placements yet."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorEvent, Phase, SubmitTicket, TabbedEditor};
    use crate::testing;
    use serde_json::json;
    use staffdesk_common::api::{ApiResponse, Method, MockReply, MockTransport};
    use staffdesk_common::models::{Client, Employee};
    use staffdesk_common::AppError;
    use std::sync::Arc;

    async fn open_filled(mock: &Arc<MockTransport>) -> TabbedEditor<Client> {
        let mut editor: TabbedEditor<Client> = testing::client_editor(mock).await;
        editor.open_create(ChildKind::Placement).unwrap();
        editor.set_field(ChildKind::Placement, "role", "Foreman").unwrap();
        editor.set_field(ChildKind::Placement, "employee", 3_i64).unwrap();
        editor.set_field(ChildKind::Placement, "location", "1").unwrap();
        editor.set_field(ChildKind::Placement, "start_date", "2024-02-01").unwrap();
        mock.clear_requests();
        editor
    }

    #[tokio::test]
    async fn test_required_role_and_dates() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Client> = testing::client_editor(&mock).await;
        mock.clear_requests();

        editor.open_create(ChildKind::Placement).unwrap();
        assert_eq!(editor.draft::<PlacementDraft>(ChildKind::Placement).map(|d| d.is_active), Some(true));
        assert!(editor.submit(ChildKind::Placement).await.is_err());
        let errors = editor.field_errors(ChildKind::Placement).cloned().unwrap();
        assert_eq!(errors.get("role"), Some("Role is required"));
        assert_eq!(errors.get("start_date"), Some(START_DATE_REQUIRED));

        editor.set_field(ChildKind::Placement, "role", "Foreman").unwrap();
        editor.set_field(ChildKind::Placement, "start_date", "2024-05-01").unwrap();
        editor.set_field(ChildKind::Placement, "end_date", "2024-04-01").unwrap();
        assert!(editor.submit(ChildKind::Placement).await.is_err());
        assert_eq!(editor.field_errors(ChildKind::Placement).and_then(|e| e.get("end_date")), Some(END_BEFORE_START));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_rejected() {
        let mock = Arc::new(MockTransport::new());
        let mut editor = open_filled(&mock).await;

        let ticket = editor.begin_submit(ChildKind::Placement).unwrap();
        assert_eq!(editor.phase(ChildKind::Placement), Phase::Submitting);

        let err = editor.submit(ChildKind::Placement).await.unwrap_err();
        assert!(matches!(err, AppError::SubmitInFlight { .. }));
        assert!(mock.requests().is_empty());

        // the draft is frozen until the outcome lands
        let err = editor.set_field(ChildKind::Placement, "role", "Crane Operator").unwrap_err();
        assert!(matches!(err, AppError::SubmitInFlight { .. }));
        assert_eq!(editor.draft::<PlacementDraft>(ChildKind::Placement).map(|d| d.role.as_str()), Some("Foreman"));

        let body = ticket.request.payload.as_json().cloned().unwrap();
        assert_eq!(body["client"], json!(1));
        assert_eq!(body["employee"], json!(3));
        assert_eq!(body["location"], json!(1));
        assert_eq!(body["start_date"], json!("2024-02-01"));
        assert_eq!(body["end_date"], json!(null));

        editor
            .complete_submit(ticket, Ok(ApiResponse::new(201, json!({"id": 50}))))
            .await
            .unwrap();
        assert_eq!(editor.phase(ChildKind::Placement), Phase::Closed);
    }

    #[tokio::test]
    async fn test_failure_returns_to_editable_state() {
        let mock = Arc::new(MockTransport::new());
        let mut editor = open_filled(&mock).await;
        mock.reply_once(Method::POST, "/placements/", MockReply::Timeout { timeout_ms: 30_000 });

        assert!(matches!(editor.submit(ChildKind::Placement).await, Err(AppError::Timeout { .. })));
        assert_eq!(editor.phase(ChildKind::Placement), Phase::Create);
        assert_eq!(
            testing::latest_toast(&editor).map(|(_, text)| text),
            Some("Failed to add placement".to_string())
        );

        // the draft survived and can be resubmitted
        mock.reply_once(Method::POST, "/placements/", MockReply::created(json!({"id": 51})));
        editor.submit(ChildKind::Placement).await.unwrap();
        assert_eq!(mock.requests_with(&Method::POST).len(), 2);
    }

    #[tokio::test]
    async fn test_empty_response_counts_as_failure() {
        let mock = Arc::new(MockTransport::new());
        let mut editor = open_filled(&mock).await;
        mock.reply_once(Method::POST, "/placements/", MockReply::no_content());

        let err = editor.submit(ChildKind::Placement).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse { .. }));
        assert_eq!(editor.phase(ChildKind::Placement), Phase::Create);
        // no refetch on failure
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_closing_cancels_ticket_but_late_success_refetches() {
        let mock = Arc::new(MockTransport::new());
        let mut editor = open_filled(&mock).await;

        let ticket: SubmitTicket = editor.begin_submit(ChildKind::Placement).unwrap();
        let ticket_id = ticket.id;
        assert!(editor.close(ChildKind::Placement));
        editor.take_events();
        let toasts_before = editor.context().notifier.toasts().len();

        editor
            .complete_submit(ticket, Ok(ApiResponse::new(201, json!({"id": 52}))))
            .await
            .unwrap();

        assert_eq!(editor.phase(ChildKind::Placement), Phase::Closed);
        assert_eq!(editor.context().notifier.toasts().len(), toasts_before);
        assert_eq!(
            editor.take_events(),
            vec![
                EditorEvent::ParentRefetched { id: 1 },
                EditorEvent::LateOutcome { kind: ChildKind::Placement, ticket: ticket_id, succeeded: true },
            ]
        );
        assert_eq!(mock.requests_with(&Method::GET).len(), 1);
    }

    #[tokio::test]
    async fn test_employee_placements_reference_employee() {
        let mock = Arc::new(MockTransport::new());
        let mut editor: TabbedEditor<Employee> = testing::employee_editor(&mock).await;
        mock.clear_requests();

        editor.open_create(ChildKind::Placement).unwrap();
        editor.set_field(ChildKind::Placement, "role", "Welder").unwrap();
        editor.set_field(ChildKind::Placement, "client", 1_i64).unwrap();
        editor.set_field(ChildKind::Placement, "start_date", "2024-03-04").unwrap();
        mock.reply_once(Method::POST, "/placements/", MockReply::created(json!({"id": 60})));
        editor.submit(ChildKind::Placement).await.unwrap();

        let body = mock.requests_with(&Method::POST)[0].payload.as_json().cloned().unwrap();
        assert_eq!(body["employee"], json!(3));
        assert_eq!(body["client"], json!(1));

        let table = editor.table(ChildKind::Placement).unwrap();
        let labels: Vec<&str> = table.headers.iter().map(|h| h.label.as_str()).collect();
        assert!(!labels.contains(&"Work Location"));
        assert_eq!(table.column_text("Role"), vec!["Rigger".to_string()]);
    }

    #[tokio::test]
    async fn test_client_placements_show_work_location() {
        let mock = Arc::new(MockTransport::new());
        let editor: TabbedEditor<Client> = testing::client_editor(&mock).await;

        let table = editor.table(ChildKind::Placement).unwrap();
        assert_eq!(table.column_text("Work Location"), vec!["Austin HQ".to_string()]);
    }
}
