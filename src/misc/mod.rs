//! Miscellaneous data structures shared by the automaton model.
//!
//! # Key Components
//! - [`IntervalSet`] - Symbol sets stored as merged, inclusive [`Interval`]s

mod interval_set;

pub use interval_set::{Interval, IntervalSet};
