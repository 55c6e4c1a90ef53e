//! Supporting containers used by generated recognizers.
//!
//! # Key Components
//! - [`AnyValue`] - A type-erased container for exactly one value of any type
//! - [`Holder`] / [`ValueHolder`] - The holder hierarchy rooted at [`HolderBase`]
//! - [`cast_holder`] - Identity casts over holders, including to [`HolderBase`]

mod any;

pub use any::{cast_holder, cast_holder_mut, AnyValue, Holder, HolderBase, ValueHolder};
