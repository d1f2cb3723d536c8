//! Opaque cursor and page envelope primitives shared by repository listings.
//!
//! The crate is transport neutral. It knows how to:
//!
//! - encode the sort key of the last row on a page into an opaque token and
//!   decode it again ([`Cursor`]);
//! - validate and clamp page sizes ([`PageLimit`]);
//! - read `cursor`/`limit` parameters from a URL query ([`PageRequest`]);
//! - carry one page of results together with the next-page token and the
//!   filtered total ([`Paginated`]).
//!
//! # Example
//!
//! ```
//! use pagination::{Cursor, PageLimit, Paginated};
//!
//! let rows = vec![(1_u32, "a"), (2, "b"), (3, "c")];
//! let limit = PageLimit::new(2).expect("non-zero");
//!
//! let mut fetched: Vec<_> = rows.iter().take(limit.fetch_size()).cloned().collect();
//! let has_more = fetched.len() > limit.get();
//! fetched.truncate(limit.get());
//! let next = if has_more {
//!     fetched
//!         .last()
//!         .map(|(key, _)| Cursor::new(*key).encode().expect("encodes"))
//! } else {
//!     None
//! };
//!
//! let page = Paginated::new(fetched, next, rows.len());
//! assert_eq!(page.items().len(), 2);
//! assert!(page.has_next());
//! ```

mod cursor;
mod envelope;
mod limit;
mod request;

pub use cursor::{CURSOR_VERSION, Cursor, CursorError};
pub use envelope::Paginated;
pub use limit::{DEFAULT_LIMIT, MAX_LIMIT, PageLimit, PageLimitError};
pub use request::{CURSOR_PARAM, LIMIT_PARAM, PageRequest, PageRequestError};
