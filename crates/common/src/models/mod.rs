//! Entity models mirrored from the REST backend
//!
//! Parent entities (clients, subcontractors, employees) arrive with their
//! child collections nested on the detail endpoint; list endpoints may omit
//! them, so every collection defaults to empty.

pub mod client;
pub mod contact;
pub mod document;
pub mod employee;
pub mod history;
pub mod location;
pub mod placement;
pub mod subcontractor;
pub mod verification;

pub use client::Client;
pub use contact::Contact;
pub use document::Document;
pub use employee::Employee;
pub use history::HistoryEntry;
pub use location::{resolve_location_label, Location, UNKNOWN_LOCATION};
pub use placement::Placement;
pub use subcontractor::Subcontractor;
pub use verification::Verification;
