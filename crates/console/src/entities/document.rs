use super::{merge_validation, opt_string};
use crate::editor::{ChildKind, ChildSpec, UpdateMethod};
use crate::entity::ParentEntity;
use crate::forms::{date_text, unknown_field, Draft, FieldValue, FieldView, InputKind, DATE_FORMAT};
use crate::table::{Cell, Column};
use chrono::NaiveDate;
use staffdesk_common::api::{FilePart, MultipartForm, Payload, Resource};
use staffdesk_common::models::Document;
use staffdesk_common::validation::check_required;
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

pub const FILE_REQUIRED: &str = "Please choose a file to upload";

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct DocumentDraft {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,
    pub document_type: String,
    pub expires_on: Option<NaiveDate>,
    /// Newly chosen file; absent on edit keeps the stored one
    pub file: Option<FilePart>,
    /// URL of the stored file, shown on edit
    pub current_file: Option<String>,
}

impl From<&Document> for DocumentDraft {
    fn from(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            document_type: opt_string(&document.document_type),
            expires_on: document.expires_on,
            file: None,
            current_file: document.file.clone(),
        }
    }
}

impl Draft for DocumentDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "title" => self.title = value.into_text(field)?,
            "document_type" => self.document_type = value.into_text(field)?,
            "expires_on" => self.expires_on = value.into_date(field)?,
            "file" => self.file = value.into_file(field)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldView> {
        let file = match (&self.file, &self.current_file) {
            (Some(part), _) => part.file_name.clone(),
            (None, Some(url)) => url.clone(),
            (None, None) => String::new(),
        };
        vec![
            FieldView::text("title", "Title", &self.title),
            FieldView::text("document_type", "Document Type", &self.document_type),
            FieldView::date("expires_on", "Expires On", self.expires_on),
            FieldView::new("file", "File", InputKind::File, file),
        ]
    }
}

/// Uploaded documents of any parent kind
pub struct DocumentSpec<P> {
    resource: Resource,
    parent_field: &'static str,
    records: fn(&P) -> &[Document],
}

impl<P> DocumentSpec<P> {
    pub fn new(resource: Resource, parent_field: &'static str, records: fn(&P) -> &[Document]) -> Self {
        Self { resource, parent_field, records }
    }
}

impl<P: ParentEntity> ChildSpec<P> for DocumentSpec<P> {
    type Record = Document;
    type Draft = DocumentDraft;

    fn kind(&self) -> ChildKind {
        ChildKind::Document
    }

    fn resource(&self) -> Resource {
        self.resource
    }

    fn records<'a>(&self, parent: &'a P) -> &'a [Document] {
        (self.records)(parent)
    }

    fn record_id(&self, record: &Document) -> i64 {
        record.id
    }

    fn draft_from(&self, record: &Document) -> DocumentDraft {
        DocumentDraft::from(record)
    }

    fn validate(&self, _parent: &P, draft: &DocumentDraft, editing: Option<i64>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "title", &draft.title, "Title is required");
        if editing.is_none() && draft.file.is_none() {
            errors.insert("file", FILE_REQUIRED);
        }
        merge_validation(draft, errors)
    }

    /// Always multipart; the file part is only attached when one was chosen.
    /// Optional text fields are always sent; a blank one clears the stored value.
    fn payload(&self, parent_id: i64, draft: &DocumentDraft) -> Result<Payload> {
        let expires_on = draft.expires_on.map(|d| d.format(DATE_FORMAT).to_string());
        let mut form = MultipartForm::new()
            .text("title", draft.title.trim())
            .text(self.parent_field, parent_id.to_string())
            .text("document_type", draft.document_type.trim())
            .text("expires_on", expires_on.unwrap_or_default());
        if let Some(file) = &draft.file {
            form = form.file(file.clone());
        }
        Ok(Payload::Multipart(form))
    }

    fn update_method(&self) -> UpdateMethod {
        UpdateMethod::Patch
    }

    fn columns(&self, _parent: &P) -> Vec<Column<Document>> {
        vec![
            Column::new("Title", |d: &Document| Cell::from(d.title.as_str())),
            Column::new("Type", |d: &Document| Cell::from(&d.document_type)),
            Column::new("Expires On", |d: &Document| Cell::text(date_text(d.expires_on))),
            Column::new("Uploaded", |d: &Document| Cell::timestamp(d.uploaded_at)),
            Column::new("File", |d: &Document| Cell::from(&d.file)),
        ]
    }

    fn empty_message(&self) -> &'static str {
        "No documents uploaded yet."
    }
}
