//! Form field primitives
//!
//! Drafts are typed structs edited by name through `Draft::set_field` and
//! rendered as `FieldView`s (label, current value, input kind, inline error).
//! `Dropdown` models a select that closes on outside clicks.

use chrono::NaiveDate;
use staffdesk_common::{api::FilePart, AppError, FieldErrors, Result};
use std::fmt;

/// Date format used by every date input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value typed into one input
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Ref(Option<i64>),
    File(FilePart),
}

impl FieldValue {
    /// File input value; the part is sent under the `file` form field
    pub fn file(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        FieldValue::File(FilePart {
            field: "file".to_string(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        })
    }

    pub fn into_text(self, field: &str) -> Result<String> {
        match self {
            FieldValue::Text(text) => Ok(text),
            other => Err(mismatch(field, "text", &other)),
        }
    }

    /// Checkbox value; `"true"`/`"on"` text counts as checked
    pub fn into_bool(self, field: &str) -> Result<bool> {
        match self {
            FieldValue::Bool(value) => Ok(value),
            FieldValue::Text(text) => Ok(matches!(text.trim(), "true" | "on" | "1")),
            other => Err(mismatch(field, "a checkbox", &other)),
        }
    }

    /// Reference to another record; blank text clears it
    pub fn into_ref(self, field: &str) -> Result<Option<i64>> {
        match self {
            FieldValue::Ref(id) => Ok(id),
            FieldValue::Text(text) if text.trim().is_empty() => Ok(None),
            FieldValue::Text(text) => text.trim().parse().map(Some).map_err(|_| AppError::InvalidFieldValue {
                field: field.to_string(),
                message: format!("'{}' is not a record id", text),
            }),
            other => Err(mismatch(field, "a record id", &other)),
        }
    }

    /// `YYYY-MM-DD` date; blank text clears it
    pub fn into_date(self, field: &str) -> Result<Option<NaiveDate>> {
        let text = self.into_text(field)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| AppError::InvalidFieldValue {
                field: field.to_string(),
                message: format!("'{}' is not a date (YYYY-MM-DD)", text),
            })
    }

    pub fn into_file(self, field: &str) -> Result<Option<FilePart>> {
        match self {
            FieldValue::File(part) => Ok(Some(part)),
            FieldValue::Text(text) if text.is_empty() => Ok(None),
            other => Err(mismatch(field, "a file", &other)),
        }
    }
}

fn mismatch(field: &str, expected: &str, got: &FieldValue) -> AppError {
    let got = match got {
        FieldValue::Text(_) => "text",
        FieldValue::Bool(_) => "a checkbox value",
        FieldValue::Ref(_) => "a record id",
        FieldValue::File(_) => "a file",
    };
    AppError::InvalidFieldValue {
        field: field.to_string(),
        message: format!("expected {}, got {}", expected, got),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Ref(Some(value))
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        FieldValue::Ref(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Phone,
    Date,
    Checkbox,
    Select,
    File,
    TextArea,
}

/// One labelled input with its inline error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub value: String,
    pub error: Option<String>,
}

impl FieldView {
    pub fn new(name: &'static str, label: &'static str, kind: InputKind, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            kind,
            value: value.into(),
            error: None,
        }
    }

    pub fn text(name: &'static str, label: &'static str, value: &str) -> Self {
        Self::new(name, label, InputKind::Text, value)
    }

    pub fn date(name: &'static str, label: &'static str, value: Option<NaiveDate>) -> Self {
        Self::new(name, label, InputKind::Date, date_text(value))
    }

    pub fn checkbox(name: &'static str, label: &'static str, value: bool) -> Self {
        Self::new(name, label, InputKind::Checkbox, value.to_string())
    }

    pub fn select(name: &'static str, label: &'static str, value: Option<i64>) -> Self {
        Self::new(name, label, InputKind::Select, value.map(|v| v.to_string()).unwrap_or_default())
    }
}

pub fn date_text(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

/// Attach inline errors to their fields
pub fn with_errors(mut fields: Vec<FieldView>, errors: &FieldErrors) -> Vec<FieldView> {
    for field in &mut fields {
        field.error = errors.get(field.name).map(str::to_string);
    }
    fields
}

/// Staging state for one form
pub trait Draft: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Set one field by name
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()>;

    /// Inputs in display order
    fn fields(&self) -> Vec<FieldView>;
}

pub(crate) fn unknown_field(field: &str) -> AppError {
    AppError::UnknownField {
        field: field.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption<T> {
    pub value: T,
    pub label: String,
}

/// Where a click landed relative to an open dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Trigger,
    Option(usize),
    /// Inside the menu but not on an option
    Menu,
    Outside,
}

/// Select with a toggleable menu that closes on outside clicks
#[derive(Debug, Clone, PartialEq)]
pub struct Dropdown<T> {
    placeholder: String,
    options: Vec<DropdownOption<T>>,
    selected: Option<usize>,
    open: bool,
}

impl<T: Clone + PartialEq> Dropdown<T> {
    pub fn new(placeholder: impl Into<String>, options: Vec<DropdownOption<T>>) -> Self {
        Self {
            placeholder: placeholder.into(),
            options,
            selected: None,
            open: false,
        }
    }

    /// Preselect the option holding `value`; unknown values select nothing
    pub fn with_selected(mut self, value: Option<&T>) -> Self {
        self.selected = value.and_then(|v| self.options.iter().position(|o| &o.value == v));
        self
    }

    pub fn options(&self) -> &[DropdownOption<T>] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Pick an option and close the menu
    pub fn select(&mut self, index: usize) -> Option<&T> {
        if index >= self.options.len() {
            return None;
        }
        self.selected = Some(index);
        self.open = false;
        self.options.get(index).map(|o| &o.value)
    }

    pub fn selected_value(&self) -> Option<&T> {
        self.selected.and_then(|i| self.options.get(i)).map(|o| &o.value)
    }

    pub fn selected_label(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map_or(self.placeholder.as_str(), |o| o.label.as_str())
    }

    /// Route a click; returns the newly selected value, if any
    pub fn handle_click(&mut self, target: ClickTarget) -> Option<T> {
        match target {
            ClickTarget::Trigger => {
                self.toggle();
                None
            }
            ClickTarget::Option(index) if self.open => self.select(index).cloned(),
            ClickTarget::Option(_) | ClickTarget::Menu => None,
            ClickTarget::Outside => {
                self.close();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropdown() -> Dropdown<i64> {
        Dropdown::new(
            "Select a location",
            vec![
                DropdownOption { value: 1, label: "Austin HQ".into() },
                DropdownOption { value: 2, label: "Dallas Yard".into() },
            ],
        )
    }

    #[test]
    fn test_dropdown_outside_click_closes() {
        let mut dd = dropdown();
        assert_eq!(dd.handle_click(ClickTarget::Trigger), None);
        assert!(dd.is_open());

        assert_eq!(dd.handle_click(ClickTarget::Menu), None);
        assert!(dd.is_open());

        dd.handle_click(ClickTarget::Outside);
        assert!(!dd.is_open());
        assert_eq!(dd.selected_label(), "Select a location");
    }

    #[test]
    fn test_dropdown_select_closes_and_reports() {
        let mut dd = dropdown().with_selected(Some(&1));
        assert_eq!(dd.selected_label(), "Austin HQ");

        // options are not clickable while closed
        assert_eq!(dd.handle_click(ClickTarget::Option(1)), None);

        dd.handle_click(ClickTarget::Trigger);
        assert_eq!(dd.handle_click(ClickTarget::Option(1)), Some(2));
        assert!(!dd.is_open());
        assert_eq!(dd.selected_value(), Some(&2));
        assert_eq!(dropdown().with_selected(Some(&9)).selected_value(), None);
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from("").into_ref("location").unwrap(), None);
        assert_eq!(FieldValue::from(" 7 ").into_ref("location").unwrap(), Some(7));
        assert!(FieldValue::from("abc").into_ref("location").is_err());

        let date = FieldValue::from("2024-03-01").into_date("start_date").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(FieldValue::from("").into_date("start_date").unwrap(), None);
        assert!(matches!(
            FieldValue::from("03/01/2024").into_date("start_date"),
            Err(AppError::InvalidFieldValue { .. })
        ));

        assert!(FieldValue::from("on").into_bool("is_primary").unwrap());
        assert!(FieldValue::from(true).into_text("name").is_err());
    }

    #[test]
    fn test_with_errors_attaches_messages() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Enter a valid email address");
        let fields = with_errors(
            vec![FieldView::text("name", "Name", "Ana"), FieldView::new("email", "Email", InputKind::Email, "x")],
            &errors,
        );
        assert_eq!(fields[0].error, None);
        assert_eq!(fields[1].error.as_deref(), Some("Enter a valid email address"));
    }
}
