//! Data quality rule suggestion.
//!
//! Rules are derived purely from a [`DatasetProfile`](crate::types::DatasetProfile);
//! the underlying table is never consulted again.

mod rules;

pub use rules::synthesize_rules;
