//! Page envelope returned by cursor listings.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::request::CURSOR_PARAM;

/// One page of an ordered listing.
///
/// ## Invariants
/// - `next_cursor` is present only when at least one row follows the last
///   item under the listing's ordering.
/// - `total_count` is the size of the filtered set when the page was read. It
///   is informational and plays no part in deciding whether a next page
///   exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
    total_count: usize,
}

impl<T> Paginated<T> {
    /// Assemble a page.
    #[must_use]
    pub const fn new(items: Vec<T>, next_cursor: Option<String>, total_count: usize) -> Self {
        Self {
            items,
            next_cursor,
            total_count,
        }
    }

    /// An empty, final page.
    #[must_use]
    pub const fn empty(total_count: usize) -> Self {
        Self::new(Vec::new(), None, total_count)
    }

    /// Items on this page, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the envelope and return the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Token for the following page, absent on the last page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Size of the filtered set at read time.
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    /// Whether a further page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Transform every item while keeping the cursor and count.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            total_count: self.total_count,
        }
    }

    /// Link to the following page derived from `base`.
    ///
    /// Any existing `cursor` parameter on `base` is replaced; other
    /// parameters are preserved in order.
    ///
    /// # Examples
    /// ```
    /// use pagination::Paginated;
    /// use url::Url;
    ///
    /// let page = Paginated::new(vec![1, 2], Some("abc".to_owned()), 5);
    /// let base = Url::parse("https://api.test/items?limit=2").expect("url");
    /// let next = page.next_link(&base).expect("next page exists");
    /// assert_eq!(next.as_str(), "https://api.test/items?limit=2&cursor=abc");
    /// ```
    #[must_use]
    pub fn next_link(&self, base: &Url) -> Option<Url> {
        let cursor = self.next_cursor.as_deref()?;
        let retained: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(name, _)| name != CURSOR_PARAM)
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        let mut link = base.clone();
        link.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(CURSOR_PARAM, cursor);
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn final_page_has_no_link() {
        let page = Paginated::new(vec![1], None, 1);
        let base = Url::parse("https://api.test/items").expect("url");
        assert!(page.next_link(&base).is_none());
        assert!(!page.has_next());
    }

    #[rstest]
    fn existing_cursor_is_replaced() {
        let page = Paginated::new(vec![1], Some("next".to_owned()), 3);
        let base = Url::parse("https://api.test/items?cursor=old&limit=1").expect("url");
        let link = page.next_link(&base).expect("link");
        assert_eq!(link.as_str(), "https://api.test/items?limit=1&cursor=next");
    }

    #[rstest]
    fn serialises_in_camel_case() {
        let page = Paginated::new(vec!["a"], Some("c".to_owned()), 4);
        let value = serde_json::to_value(&page).expect("serialise");
        assert_eq!(
            value,
            json!({ "items": ["a"], "nextCursor": "c", "totalCount": 4 })
        );
    }

    #[rstest]
    fn map_preserves_cursor_and_count() {
        let page = Paginated::new(vec![1, 2], Some("c".to_owned()), 9).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.next_cursor(), Some("c"));
        assert_eq!(page.total_count(), 9);
    }
}
