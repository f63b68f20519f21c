//! Tabbed detail editor
//!
//! One editor type serves every parent entity. A parent supplies an
//! `EditorConfig` listing its tabs and one `ChildSpec` per child-record kind;
//! the editor owns the cached parent, the per-kind modal state, and the
//! submit/delete flows:
//! - every successful mutation re-fetches the parent (no optimistic patching)
//! - at most one child modal is open at a time
//! - a second submit while one is in flight is rejected
//! - closing a modal cancels its in-flight ticket

pub mod slot;

pub use slot::{ChildSpec, UpdateMethod};

use crate::context::AppContext;
use crate::entity::ParentEntity;
use crate::forms::{Draft, Dropdown, DropdownOption, FieldValue, FieldView};
use crate::notify::ToastLevel;
use crate::table::{self, Cell, CellView, Column, TableOptions, TableView};
use slot::{KindSlot, Slot};
use staffdesk_common::api::{ApiRequest, ApiResponse};
use staffdesk_common::models::HistoryEntry;
use staffdesk_common::{AppError, FieldErrors, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Details,
    Locations,
    Contacts,
    Documents,
    Placements,
    Verification,
    History,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Details => "Details",
            Tab::Locations => "Locations",
            Tab::Contacts => "Contacts",
            Tab::Documents => "Documents",
            Tab::Placements => "Placements",
            Tab::Verification => "Verification",
            Tab::History => "History",
        }
    }

    /// Child kind listed on this tab
    pub fn kind(&self) -> Option<ChildKind> {
        match self {
            Tab::Locations => Some(ChildKind::Location),
            Tab::Contacts => Some(ChildKind::Contact),
            Tab::Documents => Some(ChildKind::Document),
            Tab::Placements => Some(ChildKind::Placement),
            Tab::Verification => Some(ChildKind::Verification),
            Tab::Details | Tab::History => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Location,
    Contact,
    Document,
    Placement,
    Verification,
}

impl ChildKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChildKind::Location => "Location",
            ChildKind::Contact => "Contact",
            ChildKind::Document => "Document",
            ChildKind::Placement => "Placement",
            ChildKind::Verification => "Verification",
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            ChildKind::Location => "location",
            ChildKind::Contact => "contact",
            ChildKind::Document => "document",
            ChildKind::Placement => "placement",
            ChildKind::Verification => "verification",
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            ChildKind::Location => Tab::Locations,
            ChildKind::Contact => Tab::Contacts,
            ChildKind::Document => Tab::Documents,
            ChildKind::Placement => Tab::Placements,
            ChildKind::Verification => Tab::Verification,
        }
    }
}

/// Mutation outcome wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Delete,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    pub fn past(&self) -> &'static str {
        match self {
            Action::Add => "added",
            Action::Update => "updated",
            Action::Delete => "deleted",
        }
    }

    /// `"<Label> added successfully!"`
    pub fn success_text(&self, label: &str) -> String {
        format!("{} {} successfully!", label, self.past())
    }

    /// `"Failed to add <noun>"`
    pub fn failure_text(&self, noun: &str) -> String {
        format!("Failed to {} {}", self.verb(), noun)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(i64),
}

impl Mode {
    pub fn action(&self) -> Action {
        match self {
            Mode::Create => Action::Add,
            Mode::Edit(_) => Action::Update,
        }
    }
}

/// Modal state of one child kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Create,
    Edit(i64),
    Submitting,
}

/// The record being edited; absent in create mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditingSelector {
    pub kind: ChildKind,
    pub id: i64,
}

/// Observable editor steps, oldest first
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ParentLoaded { id: i64 },
    ParentRefetched { id: i64 },
    RefetchFailed { id: i64 },
    TabSwitched(Tab),
    ModalOpened { kind: ChildKind, mode: Mode },
    DraftReset(ChildKind),
    ModalClosed(ChildKind),
    RequestSent { kind: ChildKind, method: String, path: String },
    /// Outcome of a submission whose modal was closed meanwhile
    LateOutcome { kind: ChildKind, ticket: u64, succeeded: bool },
    DeleteDeclined { kind: ChildKind, id: i64 },
    Notified { level: ToastLevel, text: String },
}

/// One child submission in flight
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub id: u64,
    pub kind: ChildKind,
    pub mode: Mode,
    pub request: ApiRequest,
}

/// Tabs and child kinds of one parent entity
pub struct EditorConfig<P: ParentEntity> {
    tabs: Vec<Tab>,
    slots: Vec<Box<dyn KindSlot<P>>>,
}

impl<P: ParentEntity> EditorConfig<P> {
    /// Starts with the Details tab
    pub fn new() -> Self {
        Self {
            tabs: vec![Tab::Details],
            slots: Vec::new(),
        }
    }

    /// Add a child kind and its tab
    pub fn child<S: ChildSpec<P>>(mut self, spec: S) -> Self {
        self.tabs.push(spec.kind().tab());
        self.slots.push(Box::new(Slot::new(spec)));
        self
    }

    /// Add the read-only History tab
    pub fn with_history(mut self) -> Self {
        self.tabs.push(Tab::History);
        self
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }
}

impl<P: ParentEntity> Default for EditorConfig<P> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TabbedEditor<P: ParentEntity> {
    ctx: AppContext,
    tabs: Vec<Tab>,
    slots: Vec<Box<dyn KindSlot<P>>>,
    active: Tab,
    parent: Option<P>,
    next_ticket: u64,
    events: Vec<EditorEvent>,
}

fn find_slot<P>(slots: &[Box<dyn KindSlot<P>>], kind: ChildKind) -> Option<&dyn KindSlot<P>> {
    slots.iter().find(|s| s.kind() == kind).map(|s| s.as_ref())
}

fn find_slot_mut<P>(slots: &mut [Box<dyn KindSlot<P>>], kind: ChildKind) -> Option<&mut Box<dyn KindSlot<P>>> {
    slots.iter_mut().find(|s| s.kind() == kind)
}

impl<P: ParentEntity> TabbedEditor<P> {
    pub fn new(ctx: AppContext) -> Self {
        let config = P::editor_config();
        Self {
            ctx,
            active: config.tabs.first().copied().unwrap_or(Tab::Details),
            tabs: config.tabs,
            slots: config.slots,
            parent: None,
            next_ticket: 1,
            events: Vec::new(),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn parent(&self) -> Option<&P> {
        self.parent.as_ref()
    }

    fn unavailable(&self, kind: ChildKind) -> AppError {
        AppError::TabUnavailable {
            tab: kind.tab().label().to_string(),
            entity: P::LABEL.to_string(),
        }
    }

    fn notify(&mut self, level: ToastLevel, text: String) {
        self.ctx.notifier.push(level, text.clone());
        self.events.push(EditorEvent::Notified { level, text });
    }

    fn close_all(&mut self) {
        for slot in &mut self.slots {
            if slot.close() {
                self.events.push(EditorEvent::DraftReset(slot.kind()));
                self.events.push(EditorEvent::ModalClosed(slot.kind()));
            }
        }
    }

    /// Fetch the parent by id, replacing any cached one
    pub async fn load(&mut self, id: i64) -> Result<()> {
        match self.ctx.service.get::<P>(P::RESOURCE, id).await {
            Ok(parent) => {
                tracing::debug!(entity = P::LABEL, id, "Parent loaded");
                self.close_all();
                self.active = self.tabs.first().copied().unwrap_or(Tab::Details);
                self.parent = Some(parent);
                self.events.push(EditorEvent::ParentLoaded { id });
                Ok(())
            }
            Err(e) => {
                let text = e.toast_text(&format!("Failed to load {}", P::LABEL.to_lowercase()));
                self.notify(ToastLevel::Error, text);
                Err(e)
            }
        }
    }

    /// Re-fetch the cached parent. Failures keep the stale copy.
    pub async fn refresh(&mut self) -> Result<()> {
        let id = self.parent.as_ref().map(P::id).ok_or(AppError::NoParentLoaded)?;

        match self.ctx.service.get::<P>(P::RESOURCE, id).await {
            Ok(parent) => {
                self.parent = Some(parent);
                self.events.push(EditorEvent::ParentRefetched { id });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(entity = P::LABEL, id, error = %e, "Parent refetch failed");
                self.events.push(EditorEvent::RefetchFailed { id });
                let text = e.toast_text(&format!("Failed to refresh {}", P::LABEL.to_lowercase()));
                self.notify(ToastLevel::Error, text);
                Err(e)
            }
        }
    }

    /// Drop the cached parent and every draft
    pub fn dismiss(&mut self) {
        self.close_all();
        self.parent = None;
    }

    /// Switch tabs; closes any open modal and clears every draft without a call
    pub fn switch_tab(&mut self, tab: Tab) -> Result<()> {
        if !self.tabs.contains(&tab) {
            return Err(AppError::TabUnavailable {
                tab: tab.label().to_string(),
                entity: P::LABEL.to_string(),
            });
        }
        self.close_all();
        self.active = tab;
        self.events.push(EditorEvent::TabSwitched(tab));
        Ok(())
    }

    /// Open the Add form with a blank draft
    pub fn open_create(&mut self, kind: ChildKind) -> Result<()> {
        if find_slot(&self.slots, kind).is_none() {
            return Err(self.unavailable(kind));
        }
        if self.parent.is_none() {
            return Err(AppError::NoParentLoaded);
        }
        self.close_all();

        if let (Some(slot), Some(parent)) = (find_slot_mut(&mut self.slots, kind), self.parent.as_ref()) {
            slot.open_create(parent);
        }
        self.events.push(EditorEvent::ModalOpened { kind, mode: Mode::Create });
        Ok(())
    }

    /// Open the Edit form with a draft copied from record `id`.
    ///
    /// An unknown id leaves every modal as it was.
    pub fn open_edit(&mut self, kind: ChildKind, id: i64) -> Result<()> {
        let slot = find_slot(&self.slots, kind).ok_or_else(|| self.unavailable(kind))?;
        let parent = self.parent.as_ref().ok_or(AppError::NoParentLoaded)?;
        if !slot.contains(parent, id) {
            return Err(AppError::RecordNotFound {
                kind: kind.noun().to_string(),
                id,
            });
        }
        self.close_all();

        if let (Some(slot), Some(parent)) = (find_slot_mut(&mut self.slots, kind), self.parent.as_ref()) {
            slot.open_edit(parent, id)?;
        }
        self.events.push(EditorEvent::ModalOpened { kind, mode: Mode::Edit(id) });
        Ok(())
    }

    /// Cancel: close the modal and discard the draft.
    ///
    /// A submission in flight is cancelled; its late outcome raises nothing.
    pub fn close(&mut self, kind: ChildKind) -> bool {
        let closed = find_slot_mut(&mut self.slots, kind).is_some_and(|s| s.close());
        if closed {
            self.events.push(EditorEvent::DraftReset(kind));
            self.events.push(EditorEvent::ModalClosed(kind));
        }
        closed
    }

    pub fn set_field(&mut self, kind: ChildKind, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        let unavailable = self.unavailable(kind);
        let slot = find_slot_mut(&mut self.slots, kind).ok_or(unavailable)?;
        slot.set_field(field, value.into())
    }

    /// Typed draft of the open form
    pub fn draft<D: Draft>(&self, kind: ChildKind) -> Option<&D> {
        find_slot(&self.slots, kind)
            .and_then(|s| s.draft_any())
            .and_then(|d| d.downcast_ref::<D>())
    }

    /// Inputs of the open form with their inline errors
    pub fn form(&self, kind: ChildKind) -> Option<Vec<FieldView>> {
        find_slot(&self.slots, kind).and_then(|s| s.fields())
    }

    pub fn field_errors(&self, kind: ChildKind) -> Option<&FieldErrors> {
        find_slot(&self.slots, kind).and_then(|s| s.errors())
    }

    pub fn phase(&self, kind: ChildKind) -> Phase {
        find_slot(&self.slots, kind).map_or(Phase::Closed, |s| s.phase())
    }

    /// Kind whose modal is open, if any
    pub fn open_kind(&self) -> Option<ChildKind> {
        self.slots.iter().find(|s| s.mode().is_some()).map(|s| s.kind())
    }

    pub fn editing(&self) -> Option<EditingSelector> {
        self.slots.iter().find_map(|s| match s.mode() {
            Some(Mode::Edit(id)) => Some(EditingSelector { kind: s.kind(), id }),
            _ => None,
        })
    }

    /// Validate the open form and build its request.
    ///
    /// Validation failures are recorded on the form and nothing is sent.
    pub fn begin_submit(&mut self, kind: ChildKind) -> Result<SubmitTicket> {
        let unavailable = self.unavailable(kind);
        let parent = self.parent.as_ref().ok_or(AppError::NoParentLoaded)?;
        let slot = find_slot_mut(&mut self.slots, kind).ok_or(unavailable)?;
        let mode = slot.mode().ok_or_else(|| AppError::ModalClosed {
            kind: kind.noun().to_string(),
        })?;

        let id = self.next_ticket;
        let request = slot.begin_submit(parent, id)?;
        self.next_ticket += 1;

        tracing::debug!(kind = kind.noun(), ticket = id, method = %request.method, path = %request.path, "Submitting");
        self.events.push(EditorEvent::RequestSent {
            kind,
            method: request.method.to_string(),
            path: request.path.clone(),
        });

        Ok(SubmitTicket { id, kind, mode, request })
    }

    /// Apply the outcome of a submission.
    ///
    /// Success re-fetches the parent, then resets the draft, closes the
    /// modal, and raises the success toast. Failure returns the form to its
    /// editable state with the draft intact and raises an error toast. A
    /// response without data counts as failure.
    pub async fn complete_submit(&mut self, ticket: SubmitTicket, outcome: Result<ApiResponse>) -> Result<()> {
        let kind = ticket.kind;
        let action = ticket.mode.action();
        let outcome = outcome.and_then(|response| {
            if response.has_data() {
                Ok(response)
            } else {
                Err(AppError::EmptyResponse {
                    resource: ticket.request.resource.to_string(),
                })
            }
        });
        let current = find_slot(&self.slots, kind).is_some_and(|s| s.holds(ticket.id));

        match outcome {
            Ok(_) => {
                tracing::info!(kind = kind.noun(), action = action.verb(), "Child record saved");
                // a failed refetch already raised its own toast
                let _ = self.refresh().await;

                if !current {
                    self.events.push(EditorEvent::LateOutcome { kind, ticket: ticket.id, succeeded: true });
                    return Ok(());
                }
                if let Some(slot) = find_slot_mut(&mut self.slots, kind) {
                    slot.close();
                }
                self.events.push(EditorEvent::DraftReset(kind));
                self.events.push(EditorEvent::ModalClosed(kind));
                self.notify(ToastLevel::Success, action.success_text(kind.label()));
                Ok(())
            }
            Err(e) => {
                if !current {
                    self.events.push(EditorEvent::LateOutcome { kind, ticket: ticket.id, succeeded: false });
                    return Err(e);
                }
                if let Some(slot) = find_slot_mut(&mut self.slots, kind) {
                    slot.release(ticket.id);
                }
                self.notify(ToastLevel::Error, e.toast_text(&action.failure_text(kind.noun())));
                Err(e)
            }
        }
    }

    /// Validate, send, and apply the outcome of the open form
    pub async fn submit(&mut self, kind: ChildKind) -> Result<()> {
        let ticket = self.begin_submit(kind)?;
        let outcome = self.ctx.service.execute(ticket.request.clone()).await;
        self.complete_submit(ticket, outcome).await
    }

    /// Delete a child record after confirmation.
    ///
    /// Returns `Ok(false)` when the user declines; nothing is sent then.
    pub async fn delete(&mut self, kind: ChildKind, id: i64) -> Result<bool> {
        let slot = find_slot(&self.slots, kind).ok_or_else(|| self.unavailable(kind))?;
        let parent = self.parent.as_ref().ok_or(AppError::NoParentLoaded)?;
        if !slot.deletable() {
            return Err(AppError::ActionUnavailable {
                action: Action::Delete.verb().to_string(),
                kind: kind.noun().to_string(),
            });
        }
        if !slot.contains(parent, id) {
            return Err(AppError::RecordNotFound {
                kind: kind.noun().to_string(),
                id,
            });
        }
        let resource = slot.resource();

        let prompt = format!("Are you sure you want to delete this {}?", kind.noun());
        if !self.ctx.confirm.confirm(&prompt) {
            tracing::debug!(kind = kind.noun(), id, "Delete declined");
            self.events.push(EditorEvent::DeleteDeclined { kind, id });
            return Ok(false);
        }

        self.events.push(EditorEvent::RequestSent {
            kind,
            method: "DELETE".to_string(),
            path: resource.item_path(id),
        });
        match self.ctx.service.delete(resource, id).await {
            Ok(()) => {
                tracing::info!(kind = kind.noun(), id, "Child record deleted");
                let editing_deleted =
                    find_slot(&self.slots, kind).is_some_and(|s| s.mode() == Some(Mode::Edit(id)));
                if editing_deleted {
                    self.close(kind);
                }
                let _ = self.refresh().await;
                self.notify(ToastLevel::Success, Action::Delete.success_text(kind.label()));
                Ok(true)
            }
            Err(e) => {
                self.notify(ToastLevel::Error, e.toast_text(&Action::Delete.failure_text(kind.noun())));
                Err(e)
            }
        }
    }

    /// Table of one child collection
    pub fn table(&self, kind: ChildKind) -> Option<TableView> {
        let parent = self.parent.as_ref()?;
        find_slot(&self.slots, kind).map(|s| s.table(parent))
    }

    /// Read-only history log
    pub fn history_table(&self) -> Option<TableView> {
        let parent = self.parent.as_ref()?;
        let columns: Vec<Column<HistoryEntry>> = vec![
            Column::new("Action", |h: &HistoryEntry| Cell::from(h.action.as_str())),
            Column::new("Changed By", |h: &HistoryEntry| Cell::from(&h.changed_by)),
            Column::new("Changes", |h: &HistoryEntry| Cell::from(&h.changes)),
            Column::new("Date", |h: &HistoryEntry| Cell::timestamp(Some(h.timestamp))),
        ];
        let options = TableOptions {
            actions: &[],
            empty_message: "No history available.",
            ..TableOptions::default()
        };
        Some(table::render(&columns, parent.history(), |h| h.id, &options))
    }

    /// Details tab: label/value pairs of the parent's scalar fields
    pub fn details(&self) -> Vec<(&'static str, CellView)> {
        self.parent
            .as_ref()
            .map(|p| p.details().into_iter().map(|(label, cell)| (label, CellView::from(cell))).collect())
            .unwrap_or_default()
    }

    /// Work-location picker over the parent's locations
    pub fn location_dropdown(&self, selected: Option<i64>) -> Dropdown<i64> {
        let options: Vec<DropdownOption<i64>> = self
            .parent
            .as_ref()
            .map(|p| {
                p.locations()
                    .iter()
                    .map(|l| DropdownOption { value: l.id, label: l.name.clone() })
                    .collect()
            })
            .unwrap_or_default();
        Dropdown::new("Select a location", options).with_selected(selected.as_ref())
    }

    /// Drain the event feed
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }
}
