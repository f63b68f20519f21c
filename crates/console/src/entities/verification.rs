use super::{json_body, merge_validation, opt_string};
use crate::editor::{ChildKind, ChildSpec};
use crate::entity::ParentEntity;
use crate::forms::{date_text, unknown_field, Draft, FieldValue, FieldView, InputKind};
use crate::table::{Cell, Column};
use chrono::NaiveDate;
use serde::Serialize;
use staffdesk_common::api::{Payload, Resource};
use staffdesk_common::models::Verification;
use staffdesk_common::validation::check_required;
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct VerificationDraft {
    #[validate(length(max = 100, message = "Type must be at most 100 characters"))]
    pub verification_type: String,
    pub status: String,
    pub verified_on: Option<NaiveDate>,
    pub verified_by: String,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: String,
}

impl From<&Verification> for VerificationDraft {
    fn from(verification: &Verification) -> Self {
        Self {
            verification_type: verification.verification_type.clone(),
            status: opt_string(&verification.status),
            verified_on: verification.verified_on,
            verified_by: opt_string(&verification.verified_by),
            notes: opt_string(&verification.notes),
        }
    }
}

impl Draft for VerificationDraft {
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
        match field {
            "verification_type" => self.verification_type = value.into_text(field)?,
            "status" => self.status = value.into_text(field)?,
            "verified_on" => self.verified_on = value.into_date(field)?,
            "verified_by" => self.verified_by = value.into_text(field)?,
            "notes" => self.notes = value.into_text(field)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::text("verification_type", "Verification Type", &self.verification_type),
            FieldView::text("status", "Status", &self.status),
            FieldView::date("verified_on", "Verified On", self.verified_on),
            FieldView::text("verified_by", "Verified By", &self.verified_by),
            FieldView::new("notes", "Notes", InputKind::TextArea, self.notes.as_str()),
        ]
    }
}

/// Compliance checks on a subcontractor. Kept for audit, so never deleted.
pub struct VerificationSpec<P> {
    records: fn(&P) -> &[Verification],
}

impl<P> VerificationSpec<P> {
    pub fn new(records: fn(&P) -> &[Verification]) -> Self {
        Self { records }
    }
}

impl<P: ParentEntity> ChildSpec<P> for VerificationSpec<P> {
    type Record = Verification;
    type Draft = VerificationDraft;

    fn kind(&self) -> ChildKind {
        ChildKind::Verification
    }

    fn resource(&self) -> Resource {
        Resource::VERIFICATIONS
    }

    fn records<'a>(&self, parent: &'a P) -> &'a [Verification] {
        (self.records)(parent)
    }

    fn record_id(&self, record: &Verification) -> i64 {
        record.id
    }

    fn draft_from(&self, record: &Verification) -> VerificationDraft {
        VerificationDraft::from(record)
    }

    fn validate(&self, _parent: &P, draft: &VerificationDraft, _editing: Option<i64>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "verification_type", &draft.verification_type, "Verification type is required");
        merge_validation(draft, errors)
    }

    fn payload(&self, parent_id: i64, draft: &VerificationDraft) -> Result<Payload> {
        json_body(draft, Some(("subcontractor", parent_id)))
    }

    fn deletable(&self) -> bool {
        false
    }

    fn columns(&self, _parent: &P) -> Vec<Column<Verification>> {
        vec![
            Column::new("Type", |v: &Verification| Cell::from(v.verification_type.as_str())),
            Column::new("Status", |v: &Verification| Cell::from(&v.status)),
            Column::new("Verified On", |v: &Verification| Cell::text(date_text(v.verified_on))),
            Column::new("Verified By", |v: &Verification| Cell::from(&v.verified_by)),
            Column::new("Notes", |v: &Verification| Cell::from(&v.notes)),
        ]
    }

    fn empty_message(&self) -> &'static str {
        "No verifications recorded."
    }
}
