//! Keyset pagination over a filtered, totally ordered store query.
//!
//! Pages are ordered by [`CursorOrdered::cursor_key`], which ends in the
//! entity id and is therefore injective. The engine fetches one row more
//! than the page size: a surplus row proves a further page exists without a
//! second count. The cursor handed back encodes the key of the last row
//! returned, and the next call resumes strictly after it.

use std::marker::PhantomData;
use std::sync::Arc;

use pagination::{Cursor, DEFAULT_LIMIT, PageLimit, PageRequest, Paginated};
use tracing::debug;

use crate::domain::entity::CursorOrdered;
use crate::domain::error_strategy::{BusinessStrategy, ErrorStrategy};
use crate::domain::failure::Failure;
use crate::domain::operation::Operation;
use crate::domain::ports::EntityStore;
use crate::domain::query::{Filter, StoreQuery};
use crate::settings::RepositorySettings;

use super::store_failure;

/// Page-size bounds applied by a [`CursorPager`].
///
/// ## Invariants
/// - `1 <= default <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    default: PageLimit,
    max: usize,
}

impl PageSizes {
    /// Bounds with `default` clamped into `1..=max`; a zero `max` is one.
    #[must_use]
    pub fn new(default: usize, max: usize) -> Self {
        let bound = max.max(1);
        Self {
            default: PageLimit::new(default).unwrap_or_default().clamped(bound),
            max: bound,
        }
    }

    /// Bounds read from repository settings.
    #[must_use]
    pub fn from_settings(settings: &RepositorySettings) -> Self {
        Self::new(settings.default_page_size(), settings.max_page_size())
    }

    /// Size used when a request names none.
    #[must_use]
    pub const fn default_limit(self) -> PageLimit {
        self.default
    }

    /// Upper bound on any returned page.
    #[must_use]
    pub const fn max(self) -> usize {
        self.max
    }
}

impl From<usize> for PageSizes {
    fn from(max: usize) -> Self {
        Self::new(DEFAULT_LIMIT, max)
    }
}

/// Cursor pagination engine for one entity type.
pub struct CursorPager<E, S> {
    store: Arc<S>,
    strategy: Arc<dyn ErrorStrategy>,
    sizes: PageSizes,
    _entity: PhantomData<fn() -> E>,
}

fn invalid<T>(detail: String) -> Operation<T> {
    Operation::fail(
        &Failure::invalid_data(detail),
        &BusinessStrategy::invalid_data(),
    )
}

impl<E, S> CursorPager<E, S> {
    /// Pager over `store`. A bare `usize` is taken as the maximum page
    /// size; requested sizes above it are clamped.
    pub fn new(
        store: Arc<S>,
        strategy: Arc<dyn ErrorStrategy>,
        sizes: impl Into<PageSizes>,
    ) -> Self {
        Self {
            store,
            strategy,
            sizes: sizes.into(),
            _entity: PhantomData,
        }
    }

    /// Largest page the pager will return.
    pub const fn max_page_size(&self) -> usize {
        self.sizes.max()
    }

    /// Page size used when a request does not name one.
    #[must_use]
    pub const fn default_page_size(&self) -> usize {
        self.sizes.default_limit().get()
    }
}

impl<E, S> CursorPager<E, S>
where
    E: CursorOrdered,
    S: EntityStore<E>,
{
    /// Fetch the page after `cursor` (or the first page when absent).
    ///
    /// A zero page size or an undecodable cursor fails with `InvalidData`
    /// before the store is queried.
    pub async fn get_page(
        &self,
        filter: Filter<E>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Operation<Paginated<E>> {
        let limit = match PageLimit::new(page_size) {
            Ok(limit) => limit.clamped(self.sizes.max()),
            Err(error) => return invalid(error.to_string()),
        };
        let resume_after = match cursor.map(Cursor::<E::Key>::decode).transpose() {
            Ok(decoded) => decoded.map(Cursor::into_key),
            Err(error) => return invalid(format!("invalid cursor: {error}")),
        };

        let total_count = match self.store.count(&filter).await {
            Ok(count) => count,
            Err(error) => return store_failure(self.strategy.as_ref(), "page count", &error),
        };

        let window = match resume_after {
            Some(key) => filter.and(Filter::new(move |row: &E| row.cursor_key() > key)),
            None => filter,
        };
        let query = StoreQuery::new(window)
            .order_by_key(|row: &E| row.cursor_key())
            .take(limit.fetch_size());
        let mut rows = match self.store.fetch(&query).await {
            Ok(rows) => rows,
            Err(error) => return store_failure(self.strategy.as_ref(), "page fetch", &error),
        };

        let has_next = rows.len() > limit.get();
        rows.truncate(limit.get());
        let next_cursor = if has_next {
            let encoded = rows
                .last()
                .map(|last| Cursor::new(last.cursor_key()).encode())
                .transpose();
            match encoded {
                Ok(token) => token,
                Err(error) => return invalid(format!("cursor could not be encoded: {error}")),
            }
        } else {
            None
        };

        debug!(
            entity = E::NAME,
            returned = rows.len(),
            total_count,
            has_next,
            "page fetched"
        );
        Operation::success(Paginated::new(rows, next_cursor, total_count))
    }

    /// [`CursorPager::get_page`] driven by a parsed [`PageRequest`].
    ///
    /// Requests without a `limit` use the pager's default page size.
    pub async fn get_requested_page(
        &self,
        filter: Filter<E>,
        request: &PageRequest,
    ) -> Operation<Paginated<E>> {
        let limit = request.limit_or(self.sizes.default_limit());
        self.get_page(filter, request.cursor(), limit.get()).await
    }
}
