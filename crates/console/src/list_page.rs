//! List/search page of one parent entity
//!
//! Owns the substring filters, sort column, current page, and the three
//! parent-level modals (create, edit, details). Every filter, sort, or page
//! change issues one fresh list request with the combined query.

use crate::context::AppContext;
use crate::editor::{Action, TabbedEditor};
use crate::entity::{FilterField, ParentEntity};
use crate::forms::{with_errors, Draft, FieldValue, FieldView};
use crate::notify::ToastLevel;
use crate::table::{self, RowAction, TableOptions, TableView};
use staffdesk_common::api::{ListQuery, Ordering, Page};
use staffdesk_common::{AppError, FieldErrors, Result};

/// Draft of the parent's own create/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct ParentForm<D> {
    pub draft: D,
    pub errors: FieldErrors,
}

impl<D: Draft> ParentForm<D> {
    fn new(draft: D) -> Self {
        Self { draft, errors: FieldErrors::new() }
    }
}

pub enum ParentModal<E: ParentEntity> {
    Closed,
    Create(ParentForm<E::Draft>),
    Edit { id: i64, form: ParentForm<E::Draft> },
    Details(Box<TabbedEditor<E>>),
}

impl<E: ParentEntity> ParentModal<E> {
    fn form_mut(&mut self) -> Option<&mut ParentForm<E::Draft>> {
        match self {
            ParentModal::Create(form) | ParentModal::Edit { form, .. } => Some(form),
            _ => None,
        }
    }

    fn form(&self) -> Option<&ParentForm<E::Draft>> {
        match self {
            ParentModal::Create(form) | ParentModal::Edit { form, .. } => Some(form),
            _ => None,
        }
    }
}

pub struct ListPage<E: ParentEntity> {
    ctx: AppContext,
    filters: Vec<(FilterField, String)>,
    ordering: Option<Ordering>,
    page: u32,
    rows: Page<E>,
    loading: bool,
    /// Parent fetched for the edit modal
    current: Option<E>,
    modal: ParentModal<E>,
}

impl<E: ParentEntity> ListPage<E> {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            filters: E::filters().into_iter().map(|f| (f, String::new())).collect(),
            ordering: None,
            page: 1,
            rows: Page::default(),
            loading: true,
            current: None,
            modal: ParentModal::Closed,
        }
    }

    /// Start from an ordering other than the backend default
    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn ordering(&self) -> Option<&Ordering> {
        self.ordering.as_ref()
    }

    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(f, _)| f.field == field)
            .map(|(_, needle)| needle.as_str())
    }

    pub fn rows(&self) -> &[E] {
        &self.rows.results
    }

    pub fn count(&self) -> u64 {
        self.rows.count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of pages at the configured page size; at least one
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.ctx.ui.page_size.max(1));
        let pages = self.rows.count.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    fn query_for(&self, page: u32) -> ListQuery {
        let mut query = ListQuery::page(page);
        if let Some(ordering) = &self.ordering {
            query = query.with_ordering(ordering.clone());
        }
        for (filter, needle) in &self.filters {
            query = query.with_filter(filter.field, needle.clone());
        }
        query
    }

    /// Combined query of the current state
    pub fn query(&self) -> ListQuery {
        self.query_for(self.page)
    }

    /// Fetch `page`. On failure the previous rows and page stay.
    async fn load_page(&mut self, page: u32) -> Result<()> {
        let query = self.query_for(page);
        self.loading = true;
        let result = self.ctx.service.list::<E>(E::RESOURCE, &query).await;
        self.loading = false;

        match result {
            Ok(rows) => {
                tracing::debug!(entity = E::LABEL, page, count = rows.count, "List loaded");
                self.page = page.max(1);
                self.rows = rows;
                Ok(())
            }
            Err(e) => {
                let fallback = format!("Failed to load {}", E::RESOURCE.name());
                self.ctx.notifier.push(ToastLevel::Error, e.toast_text(&fallback));
                Err(e)
            }
        }
    }

    /// Re-issue the list request for the current state
    pub async fn refresh(&mut self) -> Result<()> {
        self.load_page(self.page).await
    }

    /// Set one column's substring filter and go back to page 1
    pub async fn set_filter(&mut self, field: &str, needle: &str) -> Result<()> {
        let slot = self
            .filters
            .iter_mut()
            .find(|(f, _)| f.field == field)
            .ok_or_else(|| AppError::UnknownField { field: field.to_string() })?;
        slot.1 = needle.to_string();
        // The page follows the filter even when the fetch fails
        self.page = 1;
        self.load_page(1).await
    }

    pub async fn clear_filters(&mut self) -> Result<()> {
        for (_, needle) in &mut self.filters {
            needle.clear();
        }
        self.page = 1;
        self.load_page(1).await
    }

    /// Header click: toggles the sorted column, or sorts a new one ascending
    pub async fn sort_by(&mut self, field: &str) -> Result<()> {
        let sortable = E::columns().iter().any(|c| c.sort_key == Some(field));
        if !sortable {
            return Err(AppError::UnknownField { field: field.to_string() });
        }
        self.ordering = Some(Ordering::after_click(self.ordering.as_ref(), field));
        self.load_page(self.page).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<()> {
        self.load_page(page.max(1)).await
    }

    /// Returns `false` without a request on the last page
    pub async fn next_page(&mut self) -> Result<bool> {
        if !self.rows.has_next() {
            return Ok(false);
        }
        self.load_page(self.page + 1).await?;
        Ok(true)
    }

    /// Returns `false` without a request on page 1
    pub async fn previous_page(&mut self) -> Result<bool> {
        if self.page <= 1 {
            return Ok(false);
        }
        self.load_page(self.page - 1).await?;
        Ok(true)
    }

    /// Rows with edit/delete actions; a row click opens the details view
    pub fn table(&self) -> TableView {
        let empty_message = format!("No {} found.", E::RESOURCE.name());
        let options = TableOptions {
            actions: &[RowAction::Edit, RowAction::Delete],
            row_click: true,
            empty_message: &empty_message,
            loading: self.loading,
            ordering: self.ordering.as_ref(),
        };
        table::render(&E::columns(), &self.rows.results, E::id, &options)
    }

    pub fn modal(&self) -> &ParentModal<E> {
        &self.modal
    }

    fn close_modal_quietly(&mut self) {
        if let ParentModal::Details(editor) = &mut self.modal {
            editor.dismiss();
        }
        self.modal = ParentModal::Closed;
        self.current = None;
    }

    pub fn open_create(&mut self) {
        self.close_modal_quietly();
        self.modal = ParentModal::Create(ParentForm::new(E::Draft::default()));
    }

    /// Fetch the parent and open its edit form
    pub async fn open_edit(&mut self, id: i64) -> Result<()> {
        let parent = match self.ctx.service.get::<E>(E::RESOURCE, id).await {
            Ok(parent) => parent,
            Err(e) => {
                let fallback = format!("Failed to load {}", E::LABEL.to_lowercase());
                self.ctx.notifier.push(ToastLevel::Error, e.toast_text(&fallback));
                return Err(e);
            }
        };
        self.close_modal_quietly();
        self.modal = ParentModal::Edit { id, form: ParentForm::new(parent.draft_from()) };
        self.current = Some(parent);
        Ok(())
    }

    /// Open the tabbed editor on one parent
    pub async fn open_details(&mut self, id: i64) -> Result<()> {
        let mut editor = TabbedEditor::new(self.ctx.clone());
        editor.load(id).await?;
        self.close_modal_quietly();
        self.modal = ParentModal::Details(Box::new(editor));
        Ok(())
    }

    pub fn details(&self) -> Option<&TabbedEditor<E>> {
        match &self.modal {
            ParentModal::Details(editor) => Some(editor),
            _ => None,
        }
    }

    pub fn details_mut(&mut self) -> Option<&mut TabbedEditor<E>> {
        match &mut self.modal {
            ParentModal::Details(editor) => Some(editor),
            _ => None,
        }
    }

    /// Parent fetched for the open edit form
    pub fn current(&self) -> Option<&E> {
        self.current.as_ref()
    }

    /// Close whichever modal is open, discarding its draft
    pub fn close_modal(&mut self) -> bool {
        let was_open = !matches!(self.modal, ParentModal::Closed);
        self.close_modal_quietly();
        was_open
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        let form = self.modal.form_mut().ok_or_else(|| AppError::ModalClosed {
            kind: E::LABEL.to_lowercase(),
        })?;
        form.draft.set_field(field, value.into())
    }

    pub fn draft(&self) -> Option<&E::Draft> {
        self.modal.form().map(|f| &f.draft)
    }

    /// Inputs of the open create/edit form with their inline errors
    pub fn form(&self) -> Option<Vec<FieldView>> {
        self.modal.form().map(|f| with_errors(f.draft.fields(), &f.errors))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.modal.form().map(|f| &f.errors)
    }

    /// Validate and send the open create/edit form.
    ///
    /// Success closes the form, reloads the list, and toasts. Failure keeps
    /// the form open with its draft.
    pub async fn submit(&mut self) -> Result<()> {
        let (edit_id, action) = match &self.modal {
            ParentModal::Create(_) => (None, Action::Add),
            ParentModal::Edit { id, .. } => (Some(*id), Action::Update),
            _ => {
                return Err(AppError::ModalClosed {
                    kind: E::LABEL.to_lowercase(),
                })
            }
        };
        let form = self.modal.form_mut().ok_or_else(|| AppError::ModalClosed {
            kind: E::LABEL.to_lowercase(),
        })?;

        let errors = E::validate(&form.draft);
        if !errors.is_empty() {
            form.errors = errors.clone();
            return Err(AppError::Validation { errors });
        }
        form.errors = FieldErrors::new();
        let payload = E::payload(&form.draft)?;

        let outcome = match edit_id {
            None => self.ctx.service.create(E::RESOURCE, payload).await,
            Some(id) => self.ctx.service.update(E::RESOURCE, id, payload).await,
        }
        .and_then(|response| {
            if response.has_data() {
                Ok(response)
            } else {
                Err(AppError::EmptyResponse { resource: E::RESOURCE.to_string() })
            }
        });

        match outcome {
            Ok(_) => {
                tracing::info!(entity = E::LABEL, action = action.verb(), "Parent record saved");
                self.close_modal_quietly();
                // a failed reload already raised its own toast
                let _ = self.refresh().await;
                self.ctx.notifier.push(ToastLevel::Success, action.success_text(E::LABEL));
                Ok(())
            }
            Err(e) => {
                let fallback = action.failure_text(&E::LABEL.to_lowercase());
                self.ctx.notifier.push(ToastLevel::Error, e.toast_text(&fallback));
                Err(e)
            }
        }
    }

    /// Delete a parent after confirmation; `Ok(false)` when declined
    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let noun = E::LABEL.to_lowercase();
        let prompt = format!("Are you sure you want to delete this {}?", noun);
        if !self.ctx.confirm.confirm(&prompt) {
            tracing::debug!(entity = E::LABEL, id, "Delete declined");
            return Ok(false);
        }

        match self.ctx.service.delete(E::RESOURCE, id).await {
            Ok(()) => {
                tracing::info!(entity = E::LABEL, id, "Parent record deleted");
                let _ = self.refresh().await;
                self.ctx.notifier.push(ToastLevel::Success, Action::Delete.success_text(E::LABEL));
                Ok(true)
            }
            Err(e) => {
                self.ctx
                    .notifier
                    .push(ToastLevel::Error, e.toast_text(&Action::Delete.failure_text(&noun)));
                Err(e)
            }
        }
    }
}
