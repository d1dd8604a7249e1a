//! Search entry points.
//!
//! # Responsibility
//! - Scan the unified record index with phrase, type and tag filters.
//! - Debounce interactive queries so only the latest one is delivered.
//! - Define the result shape written into `searchResults`.

mod debounce;
mod index;
mod result;

pub use debounce::{DebouncedSearch, SearchDelivery, DEFAULT_DEBOUNCE};
pub use index::{
    RecordKind, SearchFilter, SearchIndex, SearchRecord, SearchRequest, DEFAULT_SEARCH_LIMIT,
};
pub use result::{ResultEntry, ResultKind};
