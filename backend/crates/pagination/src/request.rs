//! Page request parsing from URL query strings.

use thiserror::Error;
use url::Url;

use crate::limit::{PageLimit, PageLimitError};

/// Query parameter carrying the opaque cursor.
pub const CURSOR_PARAM: &str = "cursor";

/// Query parameter carrying the requested page size.
pub const LIMIT_PARAM: &str = "limit";

/// Errors raised while reading page parameters from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The `limit` parameter is not an unsigned integer.
    #[error("limit must be a positive integer, got '{value}'")]
    InvalidLimit {
        /// Raw parameter value.
        value: String,
    },
    /// The `limit` parameter is zero.
    #[error(transparent)]
    Limit(#[from] PageLimitError),
}

/// Caller-supplied position and size for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    cursor: Option<String>,
    limit: Option<PageLimit>,
}

impl PageRequest {
    /// Build a request from already validated parts.
    #[must_use]
    pub const fn new(cursor: Option<String>, limit: PageLimit) -> Self {
        Self {
            cursor,
            limit: Some(limit),
        }
    }

    /// Read `cursor` and `limit` from `url`'s query string.
    ///
    /// A missing `cursor` means the first page. A missing `limit` is left for
    /// the caller to resolve with [`PageRequest::limit_or`]. Empty `cursor`
    /// values are treated as absent.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://api.test/users?limit=5").expect("url");
    /// let request = PageRequest::from_url(&url).expect("valid query");
    /// assert_eq!(request.limit().get(), 5);
    /// assert!(request.cursor().is_none());
    /// ```
    pub fn from_url(url: &Url) -> Result<Self, PageRequestError> {
        let mut cursor = None;
        let mut limit = None;

        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                CURSOR_PARAM if !value.trim().is_empty() => cursor = Some(value.into_owned()),
                LIMIT_PARAM => {
                    let parsed =
                        value
                            .parse::<usize>()
                            .map_err(|_| PageRequestError::InvalidLimit {
                                value: value.clone().into_owned(),
                            })?;
                    limit = Some(PageLimit::new(parsed)?);
                }
                _ => {}
            }
        }

        Ok(Self { cursor, limit })
    }

    /// The opaque resume token, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// The requested page size, or [`DEFAULT_LIMIT`](crate::DEFAULT_LIMIT)
    /// when none was given.
    #[must_use]
    pub fn limit(&self) -> PageLimit {
        self.limit.unwrap_or_default()
    }

    /// The requested page size, or `fallback` when none was given.
    #[must_use]
    pub fn limit_or(&self, fallback: PageLimit) -> PageLimit {
        self.limit.unwrap_or(fallback)
    }

    /// Whether the caller asked for a specific page size.
    #[must_use]
    pub const fn has_explicit_limit(&self) -> bool {
        self.limit.is_some()
    }
}
