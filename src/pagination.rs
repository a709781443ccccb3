use serde::{Deserialize, Serialize};

const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// ILIKE pattern matching the search term anywhere; "%%" when no term.
    /// Metacharacters in the term are escaped so they match literally.
    pub fn like_pattern(&self) -> String {
        let escaped = self
            .search
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, query: &ListQuery) -> Self {
        let limit = query.limit();
        Self {
            data,
            total,
            page: query.page(),
            pages: (total + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: i64, limit: i64, search: &str) -> ListQuery {
        ListQuery {
            page,
            limit,
            search: search.into(),
        }
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(query(1, 0, "").limit(), 1);
        assert_eq!(query(1, 5000, "").limit(), MAX_LIMIT);
        assert_eq!(query(1, 10, "").limit(), 10);
    }

    #[test]
    fn offset_follows_page() {
        assert_eq!(query(1, 10, "").offset(), 0);
        assert_eq!(query(3, 10, "").offset(), 20);
        // Page below one is treated as the first page.
        assert_eq!(query(-2, 10, "").offset(), 0);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(Page::new(Vec::<u8>::new(), 21, &query(1, 10, "")).pages, 3);
        assert_eq!(Page::new(Vec::<u8>::new(), 20, &query(1, 10, "")).pages, 2);
        assert_eq!(Page::new(Vec::<u8>::new(), 0, &query(1, 10, "")).pages, 0);
    }

    #[test]
    fn empty_search_matches_everything() {
        assert_eq!(query(1, 10, "").like_pattern(), "%%");
        assert_eq!(query(1, 10, "  chair ").like_pattern(), "%chair%");
    }

    #[test]
    fn search_metacharacters_match_literally() {
        // "100%" must not degenerate into a match-all pattern.
        assert_eq!(query(1, 10, "100%").like_pattern(), "%100\\%%");
        assert_eq!(query(1, 10, "a_b").like_pattern(), "%a\\_b%");
        assert_eq!(query(1, 10, r"c:\tmp").like_pattern(), "%c:\\\\tmp%");
    }
}
