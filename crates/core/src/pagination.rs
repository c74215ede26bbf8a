//! Page-based pagination helpers.
//!
//! List endpoints accept a 1-based `page` and a `per_page` size; the
//! repository layer works in `LIMIT`/`OFFSET`.

/// Default number of rows per page.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Maximum number of rows per page.
pub const MAX_PER_PAGE: i64 = 100;

/// Clamp a user-provided page size to `1..=max`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
}

impl PageWindow {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            per_page: clamp_limit(per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Escape `%`, `_` and `\` so `text` matches literally inside a `LIKE`
/// pattern using the default backslash escape.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let w = PageWindow::new(None, None);
        assert_eq!(w.page, 1);
        assert_eq!(w.per_page, DEFAULT_PER_PAGE);
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let w = PageWindow::new(Some(-3), Some(10_000));
        assert_eq!(w.page, 1);
        assert_eq!(w.per_page, MAX_PER_PAGE);

        let w = PageWindow::new(Some(3), Some(0));
        assert_eq!(w.per_page, 1);
        assert_eq!(w.offset(), 2);
    }

    #[test]
    fn offset_follows_page() {
        let w = PageWindow::new(Some(4), Some(25));
        assert_eq!(w.offset(), 75);
        assert_eq!(w.limit(), 25);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like(r"c:\dl"), r"c:\\dl");
        assert_eq!(escape_like("Dépôt légal"), "Dépôt légal");
    }
}
