//! Tabular list renderer
//!
//! Turns rows plus ordered `(label, extractor)` columns into a `TableView`
//! that any front end can draw. Presentation only: no state, no network.

use chrono::{DateTime, NaiveDate, Utc};
use staffdesk_common::api::Ordering;
use std::fmt;

/// Muted glyph shown for empty values
pub const PLACEHOLDER: &str = "—";

/// Header of the trailing row-action column
pub const ACTIONS_HEADER: &str = "Actions";

/// Raw value pulled out of a row by a column extractor
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Flag(bool),
    Empty,
}

impl Cell {
    /// Text cell; blank text becomes `Empty`
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map_or(Cell::Empty, |d| Cell::Text(d.format("%Y-%m-%d").to_string()))
    }

    pub fn timestamp(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Cell::Empty, |t| Cell::Text(t.format("%Y-%m-%d %H:%M").to_string()))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl From<&Option<String>> for Cell {
    fn from(value: &Option<String>) -> Self {
        value.as_deref().map_or(Cell::Empty, Cell::text)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Flag(value)
    }
}

type Extractor<T> = Box<dyn Fn(&T) -> Cell + Send + Sync>;

/// One table column: a header label and how to pull its cell from a row
pub struct Column<T> {
    pub label: &'static str,
    /// Backend field this column sorts by, if sortable
    pub sort_key: Option<&'static str>,
    extract: Extractor<T>,
}

impl<T> Column<T> {
    pub fn new<F>(label: &'static str, extract: F) -> Self
    where
        F: Fn(&T) -> Cell + Send + Sync + 'static,
    {
        Self {
            label,
            sort_key: None,
            extract: Box::new(extract),
        }
    }

    pub fn sortable(mut self, field: &'static str) -> Self {
        self.sort_key = Some(field);
        self
    }

    pub fn cell(&self, row: &T) -> Cell {
        (self.extract)(row)
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("sort_key", &self.sort_key)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
}

/// Cell as drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Text(String),
    Badge { label: &'static str, tone: Tone },
    Placeholder,
}

impl CellView {
    pub fn as_text(&self) -> &str {
        match self {
            CellView::Text(text) => text,
            CellView::Badge { label, .. } => label,
            CellView::Placeholder => PLACEHOLDER,
        }
    }
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Text(text) => CellView::Text(text),
            Cell::Flag(true) => CellView::Badge { label: "Yes", tone: Tone::Success },
            Cell::Flag(false) => CellView::Badge { label: "No", tone: Tone::Danger },
            Cell::Empty => CellView::Placeholder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Row click
    View,
    Edit,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::View => "View",
            RowAction::Edit => "Edit",
            RowAction::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub label: String,
    pub sort_key: Option<&'static str>,
    pub sorted: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: i64,
    pub cells: Vec<CellView>,
    pub actions: Vec<RowAction>,
    /// Row click opens the `View` action
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Loading,
    /// One full-width row carrying the message
    Empty { message: String },
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub body: TableBody,
}

/// Rendering switches for one table
#[derive(Debug, Clone, Copy)]
pub struct TableOptions<'a> {
    pub actions: &'a [RowAction],
    pub row_click: bool,
    pub empty_message: &'a str,
    pub loading: bool,
    pub ordering: Option<&'a Ordering>,
}

impl Default for TableOptions<'_> {
    fn default() -> Self {
        Self {
            actions: &[RowAction::Edit, RowAction::Delete],
            row_click: false,
            empty_message: "No records found.",
            loading: false,
            ordering: None,
        }
    }
}

/// Render rows through columns.
///
/// The Actions column is appended whenever `options.actions` is non-empty.
pub fn render<T>(
    columns: &[Column<T>],
    rows: &[T],
    id_of: impl Fn(&T) -> i64,
    options: &TableOptions<'_>,
) -> TableView {
    let mut headers: Vec<HeaderView> = columns
        .iter()
        .map(|column| HeaderView {
            label: column.label.to_string(),
            sort_key: column.sort_key,
            sorted: match (column.sort_key, options.ordering) {
                (Some(key), Some(ordering)) if ordering.field == key => Some(if ordering.descending {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                }),
                _ => None,
            },
        })
        .collect();

    if !options.actions.is_empty() {
        headers.push(HeaderView {
            label: ACTIONS_HEADER.to_string(),
            sort_key: None,
            sorted: None,
        });
    }

    let body = if options.loading {
        TableBody::Loading
    } else if rows.is_empty() {
        TableBody::Empty {
            message: options.empty_message.to_string(),
        }
    } else {
        TableBody::Rows(
            rows.iter()
                .map(|row| RowView {
                    id: id_of(row),
                    cells: columns.iter().map(|c| CellView::from(c.cell(row))).collect(),
                    actions: options.actions.to_vec(),
                    clickable: options.row_click,
                })
                .collect(),
        )
    };

    TableView { headers, body }
}

impl TableView {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn rows(&self) -> &[RowView] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn row(&self, id: i64) -> Option<&RowView> {
        self.rows().iter().find(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Cell texts of one column, top to bottom
    pub fn column_text(&self, label: &str) -> Vec<String> {
        match self.headers.iter().position(|h| h.label == label) {
            Some(index) => self
                .rows()
                .iter()
                .filter_map(|r| r.cells.get(index))
                .map(|c| c.as_text().to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Aligned plain-text grid
    pub fn to_text(&self) -> String {
        let header_texts: Vec<String> = self
            .headers
            .iter()
            .map(|h| match h.sorted {
                Some(SortDirection::Ascending) => format!("{} ^", h.label),
                Some(SortDirection::Descending) => format!("{} v", h.label),
                None => h.label.clone(),
            })
            .collect();

        let lines: Vec<Vec<String>> = self
            .rows()
            .iter()
            .map(|row| {
                let mut line: Vec<String> = row.cells.iter().map(|c| c.as_text().to_string()).collect();
                if !row.actions.is_empty() {
                    line.push(
                        row.actions
                            .iter()
                            .filter(|a| **a != RowAction::View)
                            .map(RowAction::label)
                            .collect::<Vec<_>>()
                            .join(" / "),
                    );
                }
                line
            })
            .collect();

        let mut widths: Vec<usize> = header_texts.iter().map(|h| h.chars().count()).collect();
        for line in &lines {
            for (i, text) in line.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(text.chars().count());
                }
            }
        }

        let format_line = |cells: &[String]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    let width = widths.get(i).copied().unwrap_or(0);
                    let pad = width.saturating_sub(text.chars().count());
                    format!("{}{}", text, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![format_line(&header_texts)];
        let rule_width = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        out.push("-".repeat(rule_width));

        match &self.body {
            TableBody::Loading => out.push("Loading...".to_string()),
            TableBody::Empty { message } => out.push(message.clone()),
            TableBody::Rows(_) => out.extend(lines.iter().map(|l| format_line(l))),
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: i64,
        name: &'static str,
        city: Option<String>,
        active: bool,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("Name", |r: &Row| Cell::from(r.name)).sortable("name"),
            Column::new("City", |r: &Row| Cell::from(&r.city)),
            Column::new("Active", |r: &Row| Cell::from(r.active)),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "Acme", city: Some("Austin".into()), active: true },
            Row { id: 2, name: "Globex", city: None, active: false },
        ]
    }

    #[test]
    fn test_rows_badges_and_placeholders() {
        let view = render(&columns(), &rows(), |r| r.id, &TableOptions::default());

        assert_eq!(view.column_count(), 4);
        assert_eq!(view.headers.last().map(|h| h.label.as_str()), Some(ACTIONS_HEADER));

        let second = view.row(2).unwrap();
        assert_eq!(second.cells[1], CellView::Placeholder);
        assert_eq!(second.cells[2], CellView::Badge { label: "No", tone: Tone::Danger });
        assert_eq!(second.actions, vec![RowAction::Edit, RowAction::Delete]);

        assert_eq!(view.row(1).unwrap().cells[2], CellView::Badge { label: "Yes", tone: Tone::Success });
    }

    #[test]
    fn test_empty_and_loading_states() {
        let options = TableOptions {
            empty_message: "No contacts yet.",
            ..TableOptions::default()
        };
        let view = render(&columns(), &[], |r| r.id, &options);
        assert_eq!(view.body, TableBody::Empty { message: "No contacts yet.".into() });
        assert!(view.to_text().ends_with("No contacts yet."));

        let options = TableOptions { loading: true, ..TableOptions::default() };
        let view = render(&columns(), &rows(), |r| r.id, &options);
        assert_eq!(view.body, TableBody::Loading);
        assert!(view.is_empty());
    }

    #[test]
    fn test_sort_indicator_and_row_click() {
        let ordering = Ordering::descending("name");
        let options = TableOptions {
            actions: &[RowAction::View, RowAction::Edit, RowAction::Delete],
            row_click: true,
            ordering: Some(&ordering),
            ..TableOptions::default()
        };
        let view = render(&columns(), &rows(), |r| r.id, &options);

        assert_eq!(view.headers[0].sorted, Some(SortDirection::Descending));
        assert_eq!(view.headers[1].sorted, None);
        assert!(view.rows().iter().all(|r| r.clickable));

        let text = view.to_text();
        assert!(text.starts_with("Name v"));
        assert!(text.contains("Edit / Delete"));
        assert!(!text.contains("View"));
    }

    #[test]
    fn test_no_actions_column_without_actions() {
        let options = TableOptions { actions: &[], ..TableOptions::default() };
        let view = render(&columns(), &rows(), |r| r.id, &options);
        assert_eq!(view.column_count(), 3);
        assert_eq!(view.column_text("City"), vec!["Austin".to_string(), PLACEHOLDER.to_string()]);
    }
}
