//! Validated page sizes.

use thiserror::Error;

/// Page size applied when a caller does not request one.
pub const DEFAULT_LIMIT: usize = 20;

/// Upper bound applied when no tighter bound is configured.
pub const MAX_LIMIT: usize = 100;

/// Errors raised when validating a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageLimitError {
    /// A page must hold at least one row.
    #[error("page size must be at least 1")]
    Zero,
}

/// Number of rows requested for one page.
///
/// ## Invariants
/// - The value is at least one.
///
/// # Examples
/// ```
/// use pagination::PageLimit;
///
/// let limit = PageLimit::new(250).expect("non-zero").clamped(100);
/// assert_eq!(limit.get(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageLimit(usize);

impl PageLimit {
    /// Validate a requested page size.
    pub const fn new(requested: usize) -> Result<Self, PageLimitError> {
        if requested == 0 {
            return Err(PageLimitError::Zero);
        }
        Ok(Self(requested))
    }

    /// Cap the limit at `max`, treating a zero bound as one.
    #[must_use]
    pub fn clamped(self, max: usize) -> Self {
        Self(self.0.min(max.max(1)))
    }

    /// Rows to fetch so the store reveals whether a further page exists.
    #[must_use]
    pub const fn fetch_size(self) -> usize {
        self.0.saturating_add(1)
    }

    /// The validated size.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

impl TryFrom<usize> for PageLimit {
    type Error = PageLimitError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn zero_is_rejected() {
        assert_eq!(PageLimit::new(0), Err(PageLimitError::Zero));
    }

    #[rstest]
    #[case(5, 10, 5)]
    #[case(50, 10, 10)]
    #[case(3, 0, 1)]
    fn clamping_respects_bound(#[case] requested: usize, #[case] max: usize, #[case] want: usize) {
        let limit = PageLimit::new(requested).expect("non-zero").clamped(max);
        assert_eq!(limit.get(), want);
    }

    #[rstest]
    fn fetch_size_over_fetches_by_one() {
        let limit = PageLimit::new(3).expect("non-zero");
        assert_eq!(limit.fetch_size(), 4);
    }
}
