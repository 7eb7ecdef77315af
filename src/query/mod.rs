//! The dynamic query-construction engine
//!
//! Three stages, each pure and independently testable:
//!
//! 1. [`options`] — normalize the query string into [`options::ListOptions`];
//! 2. [`filter`] — parse the untyped filter payload into typed clauses,
//!    validating every identifier against the record's allow-lists;
//! 3. [`compose`] — fold clauses and options into one [`compose::SelectQuery`]
//!    value for the storage handle to execute.

pub mod compose;
pub mod filter;
pub mod options;

pub use compose::{SelectQuery, Sort, SortDirection, compose, resolve_relations};
pub use filter::{FilterClause, Operator};
pub use options::{ListOptions, Page};
