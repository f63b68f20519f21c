//! Concrete parent entities and their child-record kinds
//!
//! Child specs are generic over the parent and take plain `fn` accessors, so
//! the same location/contact/document spec serves clients and
//! subcontractors alike.

pub mod client;
pub mod contact;
pub mod document;
pub mod employee;
pub mod location;
pub mod placement;
pub mod subcontractor;
pub mod verification;

pub use client::ClientDraft;
pub use contact::{ContactDraft, ContactSpec};
pub use document::{DocumentDraft, DocumentSpec};
pub use employee::EmployeeDraft;
pub use location::{LocationDraft, LocationSpec};
pub use placement::{PlacementDraft, PlacementSpec};
pub use subcontractor::SubcontractorDraft;
pub use verification::{VerificationDraft, VerificationSpec};

use serde::Serialize;
use serde_json::Value;
use staffdesk_common::api::Payload;
use staffdesk_common::{FieldErrors, Result};
use validator::Validate;

/// Merge derive-based checks in after the hand-written ones
pub(crate) fn merge_validation<T: Validate>(draft: &T, mut errors: FieldErrors) -> FieldErrors {
    if let Err(e) = draft.validate() {
        errors.extend(FieldErrors::from(e));
    }
    errors
}

/// JSON body of a draft: blank strings go out as `null`, and the parent
/// reference is added when given
pub(crate) fn json_body<T: Serialize>(draft: &T, parent: Option<(&str, i64)>) -> Result<Payload> {
    let mut body = serde_json::to_value(draft)?;
    if let Value::Object(map) = &mut body {
        for value in map.values_mut() {
            if value.as_str().is_some_and(|s| s.trim().is_empty()) {
                *value = Value::Null;
            }
        }
        if let Some((field, id)) = parent {
            map.insert(field.to_string(), Value::from(id));
        }
    }
    Ok(Payload::Json(body))
}

pub(crate) fn opt_string(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
