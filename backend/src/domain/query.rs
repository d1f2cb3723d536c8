//! Store-agnostic query description passed across the data-store port.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::entity::{TenantId, TenantScoped};

type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;
type Comparator<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

/// Shareable row predicate.
///
/// # Example
///
/// ```
/// use tenant_backend::domain::Filter;
///
/// let even = Filter::new(|n: &u32| n % 2 == 0);
/// let small_even = even.and(Filter::new(|n: &u32| *n < 10));
/// assert!(small_even.matches(&4));
/// assert!(!small_even.matches(&12));
/// assert!(Filter::<u32>::all().matches(&7));
/// ```
pub struct Filter<E> {
    predicate: Option<Predicate<E>>,
}

impl<E> Filter<E> {
    /// Match every row.
    pub fn all() -> Self {
        Self { predicate: None }
    }

    /// Match rows for which `predicate` holds.
    pub fn new(predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Arc::new(predicate)),
        }
    }

    /// Rows matching both filters.
    pub fn and(self, other: Self) -> Self
    where
        E: 'static,
    {
        match (self.predicate, other.predicate) {
            (None, rhs) => Self { predicate: rhs },
            (lhs, None) => Self { predicate: lhs },
            (Some(lhs), Some(rhs)) => Self::new(move |row: &E| lhs(row) && rhs(row)),
        }
    }

    /// Whether `row` matches.
    pub fn matches(&self, row: &E) -> bool {
        self.predicate.as_ref().is_none_or(|predicate| predicate(row))
    }
}

impl<E: TenantScoped + 'static> Filter<E> {
    /// Rows owned by `tenant`.
    pub fn for_tenant(tenant: TenantId) -> Self {
        Self::new(move |row: &E| row.tenant_id() == tenant)
    }
}

impl<E> Clone for Filter<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
        }
    }
}

impl<E> Default for Filter<E> {
    fn default() -> Self {
        Self::all()
    }
}

impl<E> fmt::Debug for Filter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("restricted", &self.predicate.is_some())
            .finish()
    }
}

/// Filtered, ordered, windowed read.
pub struct StoreQuery<E> {
    filter: Filter<E>,
    order: Option<Comparator<E>>,
    offset: usize,
    limit: Option<usize>,
}

impl<E> StoreQuery<E> {
    /// Unordered, unbounded read of the rows matching `filter`.
    pub fn new(filter: Filter<E>) -> Self {
        Self {
            filter,
            order: None,
            offset: 0,
            limit: None,
        }
    }

    /// Order rows with `compare`.
    #[must_use]
    pub fn order_by(mut self, compare: impl Fn(&E, &E) -> Ordering + Send + Sync + 'static) -> Self {
        self.order = Some(Arc::new(compare));
        self
    }

    /// Order rows ascending by `key`.
    #[must_use]
    pub fn order_by_key<K: Ord>(self, key: impl Fn(&E) -> K + Send + Sync + 'static) -> Self {
        self.order_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// Skip the first `offset` ordered rows.
    #[must_use]
    pub fn skip(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Return at most `limit` rows.
    #[must_use]
    pub fn take(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Row filter.
    pub fn filter(&self) -> &Filter<E> {
        &self.filter
    }

    /// Number of rows skipped.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Row cap, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Evaluate the query over `rows`.
    pub fn apply(&self, rows: impl IntoIterator<Item = E>) -> Vec<E> {
        let mut matched: Vec<E> = rows
            .into_iter()
            .filter(|row| self.filter.matches(row))
            .collect();
        if let Some(compare) = &self.order {
            matched.sort_by(|a, b| compare(a, b));
        }
        matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

impl<E> fmt::Debug for StoreQuery<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreQuery")
            .field("filter", &self.filter)
            .field("ordered", &self.order.is_some())
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn queries_filter_order_and_window() {
        let query = StoreQuery::new(Filter::new(|n: &i32| *n > 0))
            .order_by_key(|n: &i32| -*n)
            .skip(1)
            .take(2);
        assert_eq!(query.apply(vec![3, -1, 5, 1, 4]), vec![4, 3]);
    }

    #[rstest]
    fn unbounded_queries_return_every_match() {
        let query = StoreQuery::new(Filter::<i32>::all());
        assert_eq!(query.apply(vec![2, 1]), vec![2, 1]);
        assert_eq!(query.limit(), None);
    }

    #[rstest]
    fn and_with_all_keeps_the_other_predicate() {
        let filter = Filter::all().and(Filter::new(|n: &i32| *n == 1));
        assert!(filter.matches(&1));
        assert!(!filter.matches(&2));
    }
}
