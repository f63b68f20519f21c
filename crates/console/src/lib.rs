//! StaffDesk Console
//!
//! Front-end state for the StaffDesk back office:
//! - List/search pages with filters, sorting, and pagination
//! - Tabbed detail editors over a parent and its child records
//! - Table rendering, form fields, and toast notifications
//!
//! Every page and editor receives an explicit `AppContext` holding the
//! remote service, the notifier, and the confirmation strategy.

pub mod context;
pub mod editor;
pub mod entities;
pub mod entity;
pub mod forms;
pub mod list_page;
pub mod notify;
pub mod table;

#[cfg(test)]
mod testing;

pub use context::{AppContext, AutoConfirm, Confirm, TerminalConfirm};
pub use editor::{ChildKind, EditorConfig, EditorEvent, Phase, Tab, TabbedEditor};
pub use entity::{FilterField, ParentEntity};
pub use list_page::{ListPage, ParentModal};
pub use notify::{Notifier, Toast, ToastLevel};
pub use table::{TableView, ACTIONS_HEADER, PLACEHOLDER};
