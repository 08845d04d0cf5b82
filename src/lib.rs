//! In-memory index of installed desktop applications.
//!
//! The index discovers `.desktop` files under the XDG application
//! directories, parses them on a worker pool, deduplicates and sorts the
//! result, and serves substring or fuzzy queries against a cached snapshot
//! that is refreshed in the background once it goes stale.

pub mod desktop;
pub mod index;
pub mod matcher;
pub mod model;
pub mod scan;
pub mod sort;

pub use index::{Index, IndexConfig, Snapshot};
pub use matcher::{FuzzyMatcher, Matcher, SubstringMatcher};
pub use model::AppEntry;
pub use sort::SortPolicy;
