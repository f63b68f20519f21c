//! Per-kind modal state
//!
//! A `ChildSpec` describes one child-record kind of a parent: where its
//! records live on the parent, which resource it is saved to, how a draft is
//! built, validated, and serialized. `Slot` wraps a spec with the modal state
//! machine and is erased behind `KindSlot` so one editor can hold every kind
//! of its parent in a single table.

use super::{ChildKind, Mode, Phase};
use crate::entity::ParentEntity;
use crate::forms::{with_errors, Draft, FieldValue, FieldView};
use crate::table::{self, Column, RowAction, TableOptions, TableView};
use staffdesk_common::api::{ApiRequest, Payload, Resource};
use staffdesk_common::{AppError, FieldErrors, Result};
use std::any::Any;
use std::marker::PhantomData;

/// How an edit is sent back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    /// `PUT`, full replace
    Replace,
    /// `PATCH`, partial update
    Patch,
}

/// Configuration for one child-record kind of parent `P`
pub trait ChildSpec<P: ParentEntity>: Send + Sync + 'static {
    type Record: Clone + Send + Sync + 'static;
    type Draft: Draft;

    fn kind(&self) -> ChildKind;

    fn resource(&self) -> Resource;

    /// The parent's collection of this kind
    fn records<'a>(&self, parent: &'a P) -> &'a [Self::Record];

    fn record_id(&self, record: &Self::Record) -> i64;

    /// Draft for the Add form
    fn blank(&self, _parent: &P) -> Self::Draft {
        Self::Draft::default()
    }

    /// Draft for the Edit form, copied from `record`
    fn draft_from(&self, record: &Self::Record) -> Self::Draft;

    /// Client-side checks; `editing` is the id of the record being edited
    fn validate(&self, parent: &P, draft: &Self::Draft, editing: Option<i64>) -> FieldErrors;

    /// Request body for create and update, carrying the parent reference
    fn payload(&self, parent_id: i64, draft: &Self::Draft) -> Result<Payload>;

    fn update_method(&self) -> UpdateMethod {
        UpdateMethod::Replace
    }

    fn deletable(&self) -> bool {
        true
    }

    fn columns(&self, parent: &P) -> Vec<Column<Self::Record>>;

    fn empty_message(&self) -> &'static str;
}

struct OpenForm<D> {
    mode: Mode,
    draft: D,
    errors: FieldErrors,
    /// Ticket of the submission in flight, if any
    in_flight: Option<u64>,
}

enum SlotState<D> {
    Closed,
    Open(OpenForm<D>),
}

/// Object-safe view of a `Slot`, keyed by kind inside the editor
pub(crate) trait KindSlot<P>: Send + Sync {
    fn kind(&self) -> ChildKind;
    fn resource(&self) -> Resource;
    fn phase(&self) -> Phase;
    fn mode(&self) -> Option<Mode>;
    fn deletable(&self) -> bool;

    fn open_create(&mut self, parent: &P);
    fn open_edit(&mut self, parent: &P, id: i64) -> Result<()>;
    /// Close and discard the draft; true if a form was open
    fn close(&mut self) -> bool;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()>;
    fn draft_any(&self) -> Option<&dyn Any>;
    fn fields(&self) -> Option<Vec<FieldView>>;
    fn errors(&self) -> Option<&FieldErrors>;

    /// Validate and build the request, marking `ticket` in flight
    fn begin_submit(&mut self, parent: &P, ticket: u64) -> Result<ApiRequest>;
    /// True while `ticket` is the submission in flight
    fn holds(&self, ticket: u64) -> bool;
    /// Return to the editable state after a failed submission
    fn release(&mut self, ticket: u64);

    fn contains(&self, parent: &P, id: i64) -> bool;
    fn table(&self, parent: &P) -> TableView;
}

pub(crate) struct Slot<P, S: ChildSpec<P>>
where
    P: ParentEntity,
{
    spec: S,
    state: SlotState<S::Draft>,
    _parent: PhantomData<fn(&P)>,
}

impl<P: ParentEntity, S: ChildSpec<P>> Slot<P, S> {
    pub(crate) fn new(spec: S) -> Self {
        Self {
            spec,
            state: SlotState::Closed,
            _parent: PhantomData,
        }
    }

    fn form_mut(&mut self) -> Result<&mut OpenForm<S::Draft>> {
        let kind = self.spec.kind();
        match &mut self.state {
            SlotState::Open(form) => Ok(form),
            SlotState::Closed => Err(AppError::ModalClosed {
                kind: kind.noun().to_string(),
            }),
        }
    }

    fn form(&self) -> Option<&OpenForm<S::Draft>> {
        match &self.state {
            SlotState::Open(form) => Some(form),
            SlotState::Closed => None,
        }
    }
}

impl<P: ParentEntity, S: ChildSpec<P>> KindSlot<P> for Slot<P, S> {
    fn kind(&self) -> ChildKind {
        self.spec.kind()
    }

    fn resource(&self) -> Resource {
        self.spec.resource()
    }

    fn phase(&self) -> Phase {
        match self.form() {
            None => Phase::Closed,
            Some(form) if form.in_flight.is_some() => Phase::Submitting,
            Some(OpenForm { mode: Mode::Create, .. }) => Phase::Create,
            Some(OpenForm { mode: Mode::Edit(id), .. }) => Phase::Edit(*id),
        }
    }

    fn mode(&self) -> Option<Mode> {
        self.form().map(|f| f.mode)
    }

    fn deletable(&self) -> bool {
        self.spec.deletable()
    }

    fn open_create(&mut self, parent: &P) {
        self.state = SlotState::Open(OpenForm {
            mode: Mode::Create,
            draft: self.spec.blank(parent),
            errors: FieldErrors::new(),
            in_flight: None,
        });
    }

    fn open_edit(&mut self, parent: &P, id: i64) -> Result<()> {
        let record = self
            .spec
            .records(parent)
            .iter()
            .find(|r| self.spec.record_id(r) == id)
            .ok_or_else(|| AppError::RecordNotFound {
                kind: self.spec.kind().noun().to_string(),
                id,
            })?;

        self.state = SlotState::Open(OpenForm {
            mode: Mode::Edit(id),
            draft: self.spec.draft_from(record),
            errors: FieldErrors::new(),
            in_flight: None,
        });
        Ok(())
    }

    fn close(&mut self) -> bool {
        let was_open = matches!(self.state, SlotState::Open(_));
        self.state = SlotState::Closed;
        was_open
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        let kind = self.spec.kind();
        let form = self.form_mut()?;
        if form.in_flight.is_some() {
            return Err(AppError::SubmitInFlight {
                kind: kind.noun().to_string(),
            });
        }
        form.draft.set_field(field, value)
    }

    fn draft_any(&self) -> Option<&dyn Any> {
        self.form().map(|f| &f.draft as &dyn Any)
    }

    fn fields(&self) -> Option<Vec<FieldView>> {
        self.form().map(|f| with_errors(f.draft.fields(), &f.errors))
    }

    fn errors(&self) -> Option<&FieldErrors> {
        self.form().map(|f| &f.errors)
    }

    fn begin_submit(&mut self, parent: &P, ticket: u64) -> Result<ApiRequest> {
        let kind = self.spec.kind();
        let form = match &mut self.state {
            SlotState::Open(form) => form,
            SlotState::Closed => {
                return Err(AppError::ModalClosed {
                    kind: kind.noun().to_string(),
                })
            }
        };

        if form.in_flight.is_some() {
            return Err(AppError::SubmitInFlight {
                kind: kind.noun().to_string(),
            });
        }

        let editing = match form.mode {
            Mode::Edit(id) => Some(id),
            Mode::Create => None,
        };
        let errors = self.spec.validate(parent, &form.draft, editing);
        if !errors.is_empty() {
            form.errors = errors.clone();
            return Err(AppError::Validation { errors });
        }
        form.errors = FieldErrors::new();

        let resource = self.spec.resource();
        let payload = self.spec.payload(parent.id(), &form.draft)?;
        let request = match form.mode {
            Mode::Create => ApiRequest::create(resource, payload),
            Mode::Edit(id) => match self.spec.update_method() {
                UpdateMethod::Replace => ApiRequest::update(resource, id, payload),
                UpdateMethod::Patch => ApiRequest::partial_update(resource, id, payload),
            },
        };

        form.in_flight = Some(ticket);
        Ok(request)
    }

    fn holds(&self, ticket: u64) -> bool {
        self.form().is_some_and(|f| f.in_flight == Some(ticket))
    }

    fn release(&mut self, ticket: u64) {
        if let SlotState::Open(form) = &mut self.state {
            if form.in_flight == Some(ticket) {
                form.in_flight = None;
            }
        }
    }

    fn contains(&self, parent: &P, id: i64) -> bool {
        self.spec.records(parent).iter().any(|r| self.spec.record_id(r) == id)
    }

    fn table(&self, parent: &P) -> TableView {
        let columns = self.spec.columns(parent);
        let actions: &[RowAction] = if self.spec.deletable() {
            &[RowAction::Edit, RowAction::Delete]
        } else {
            &[RowAction::Edit]
        };
        let options = TableOptions {
            actions,
            empty_message: self.spec.empty_message(),
            ..TableOptions::default()
        };
        table::render(&columns, self.spec.records(parent), |r| self.spec.record_id(r), &options)
    }
}
