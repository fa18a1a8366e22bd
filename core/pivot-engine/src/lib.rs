//! FILENAME: core/pivot-engine/src/lib.rs
//! Grouped aggregation (pivot) engine.
//!
//! Buckets a flat collection of records by row fields and reduces value
//! fields per bucket, optionally cross-tabulated by column fields. Depends on
//! `dataset` only for the shared record type and value conversions.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the aggregation IS)
//! - `cache`: Key interning and accumulators (HOW we compute)
//! - `view`: The summary table handed back to callers (WHAT we return)
//! - `engine`: Calculation engine (HOW we calculate)

pub mod definition;
pub mod cache;
pub mod view;
pub mod engine;

pub use definition::*;
pub use cache::{AggregateAccumulator, KeyCache};
pub use view::*;
pub use engine::{aggregate, PivotCalculator};
