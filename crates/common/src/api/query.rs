//! List query parameters: page, ordering, and substring filters

use serde::{Deserialize, Serialize};

/// Sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: false }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: true }
    }

    /// Value of the `ordering` query parameter: `field` or `-field`
    pub fn param(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.clone()
        }
    }

    /// Parse an `ordering` parameter back into a column and direction
    pub fn parse(param: &str) -> Option<Self> {
        let param = param.trim();
        match param.strip_prefix('-') {
            Some(field) if !field.is_empty() => Some(Self::descending(field)),
            Some(_) => None,
            None if param.is_empty() => None,
            None => Some(Self::ascending(param)),
        }
    }

    /// Ordering after a click on `field`'s header.
    ///
    /// Clicking the current column flips its direction; any other column
    /// starts ascending.
    pub fn after_click(current: Option<&Ordering>, field: &str) -> Ordering {
        match current {
            Some(current) if current.field == field => Ordering {
                field: current.field.clone(),
                descending: !current.descending,
            },
            _ => Ordering::ascending(field),
        }
    }
}

/// Combined list request: page number, ordering, and per-field filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub ordering: Option<Ordering>,
    /// `(field, needle)` pairs, sent as `field__icontains=needle`
    pub filters: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            ordering: None,
            filters: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self { page: page.max(1), ..Self::default() }
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.filters.push((field.into(), needle.into()));
        self
    }

    /// Query string pairs in a stable order: page, ordering, then filters.
    /// Blank filters are left out.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("page".to_string(), self.page.max(1).to_string())];

        if let Some(ordering) = &self.ordering {
            params.push(("ordering".to_string(), ordering.param()));
        }

        for (field, needle) in &self.filters {
            let needle = needle.trim();
            if !needle.is_empty() {
                params.push((format!("{}__icontains", field), needle.to_string()));
            }
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_param_roundtrip() {
        assert_eq!(Ordering::descending("created_at").param(), "-created_at");
        assert_eq!(Ordering::parse("-created_at"), Some(Ordering::descending("created_at")));
        assert_eq!(Ordering::parse("name"), Some(Ordering::ascending("name")));
        assert_eq!(Ordering::parse(""), None);
        assert_eq!(Ordering::parse("-"), None);
    }

    #[test]
    fn test_click_same_column_toggles() {
        let current = Ordering::ascending("name");
        assert_eq!(Ordering::after_click(Some(&current), "name"), Ordering::descending("name"));

        let current = Ordering::descending("name");
        assert_eq!(Ordering::after_click(Some(&current), "name"), Ordering::ascending("name"));
    }

    #[test]
    fn test_click_other_column_starts_ascending() {
        for current in [None, Some(Ordering::ascending("name")), Some(Ordering::descending("name"))] {
            assert_eq!(
                Ordering::after_click(current.as_ref(), "city"),
                Ordering::ascending("city")
            );
        }
    }

    #[test]
    fn test_params_skip_blank_filters() {
        let query = ListQuery::page(2)
            .with_ordering(Ordering::descending("created_at"))
            .with_filter("city", "Austin")
            .with_filter("name", "   ");

        assert_eq!(
            query.to_params(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("ordering".to_string(), "-created_at".to_string()),
                ("city__icontains".to_string(), "Austin".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_zero_is_clamped() {
        assert_eq!(ListQuery::page(0).page, 1);
    }
}
