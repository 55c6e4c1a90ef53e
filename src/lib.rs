// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # parsecore
//!
//! The memory and type substrate underneath a generated-parser runtime. `parsecore` provides the
//! pieces a lexer/parser runtime builds on, without the recognition algorithms themselves:
//!
//! - **Allocators** - a fixed-size pool with an intrusive free list, a bump arena for byte spans
//!   and a typed arena with stable, epoch-checked handles
//! - **Runtime type identity** - cheap "is this an X" queries and ancestor casts over open
//!   hierarchies, including ownership-preserving casts of `Arc` handles
//! - **Exception taxonomy** - the error kinds raised by a parser runtime, caught by ancestor kind
//! - **Type-erased values** - a container for one value of any type with explicit copy support
//! - **Automaton transitions** - the typed edges of the recognition automaton and their factory
//! - **Parse-tree walking** - node types, listeners and depth-first walkers
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! parsecore = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use parsecore::prelude::*;
//!
//! let mut factory = TransitionFactory::with_config(&AllocatorConfig::compact())?;
//! let id = factory.create(Transition::range(StateId(2), 'a' as i32, 'z' as i32))?;
//! assert!(factory.get(id).unwrap().matches('q' as i32, 0, 0x10FFFF));
//! # Ok::<(), parsecore::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`memory`] - Pool and arena allocators, configuration and statistics
//! - [`rtti`] - Runtime type identity and casts
//! - [`exceptions`] - The exception hierarchy and catch-by-ancestor
//! - [`support`] - The type-erased value container
//! - [`misc`] - Interval sets of input symbols
//! - [`atn`] - Automaton transitions and the transition factory
//! - [`tree`] - Parse trees, listeners, walkers and tree-pattern chunks
//! - [`Error`] and [`Result`] - Crate-wide error handling
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Contract violations carry a
//! [`exceptions::Raised`] exception that can be caught by any of its ancestor kinds:
//!
//! ```rust
//! use parsecore::{exceptions::IllegalArgument, tree::TextChunk, Error};
//!
//! match TextChunk::new("") {
//!     Err(Error::Exception(raised)) if raised.is::<IllegalArgument>() => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The allocators report block acquisition and purges as [`tracing`] events at `debug` level.
//! No subscriber is installed by this crate.
//!
//! ## Concurrency
//!
//! Allocators are not internally synchronized and take `&mut self` for every mutation. Built
//! transition graphs and parse trees are `Send + Sync` and can be read from several threads.
//! An [`support::AnyValue`] is only as thread-safe as its payload allows and is not `Send`.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use parsecore::prelude::*;
///
/// let mut value = AnyValue::new(7_u32);
/// *value.as_mut::<u32>()? += 1;
/// assert_eq!(*value.as_ref::<u32>()?, 8);
/// # Ok::<(), parsecore::Error>(())
/// ```
pub mod prelude;

/// Pool and arena allocators.
///
/// # Key Types
///
/// - [`memory::FixedAllocator`] - Fixed-size chunks with reuse through an intrusive free list
/// - [`memory::LinearAllocator`] - Bump-allocated byte spans, released as a whole
/// - [`memory::Arena`] - Typed bump allocation with stable [`memory::ArenaId`] handles
/// - [`memory::AllocatorConfig`] - Block sizing with `compact` and `throughput` presets
pub mod memory;

/// Runtime type identity for polymorphic hierarchies.
///
/// See [`impl_rtti!`] for declaring participating types.
pub mod rtti;

/// The exception taxonomy raised by parser runtimes.
pub mod exceptions;

/// Supporting containers.
pub mod support;

/// Miscellaneous shared data structures.
pub mod misc;

/// Automaton transition model.
pub mod atn;

/// Parse trees, listeners and walkers.
pub mod tree;

/// `parsecore` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `parsecore` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use parsecore::{support::AnyValue, Error};
///
/// let value = AnyValue::new(1_i64);
/// match value.as_ref::<String>() {
///     Err(Error::TypeMismatch { expected, found }) => {
///         assert!(expected.ends_with("String"));
///         assert_eq!(found, "i64");
///     }
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub use error::Error;

/// Default allocator configuration.
///
/// See [`memory::AllocatorConfig`] for the available knobs and presets.
pub use memory::AllocatorConfig;
