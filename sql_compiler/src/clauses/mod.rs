//! Clause builders
//!
//! Field list, GROUP BY inference, ORDER BY and WHERE/HAVING assembly.

pub mod fields;
pub mod filter;
pub mod grouping;
pub mod ordering;

pub use fields::{build_field_list, AggregateFunction};
pub use filter::{build_filter_clause, build_filter_condition, using_conditions, FilterTarget};
pub use grouping::build_group_by_clause;
pub use ordering::{build_order_clause, order_items, set_order_items, SortOrder};
