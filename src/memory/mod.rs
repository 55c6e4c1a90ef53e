//! Pool and arena allocators for objects of bounded lifetime.
//!
//! Parser runtimes create large numbers of small, short-lived objects (configurations,
//! transitions, tree nodes) whose lifetime ends together. The allocators in this module trade
//! per-object release for cheap allocation and a single bulk release.
//!
//! # Key Components
//! - [`FixedAllocator`] - Fixed-size chunks from an intrusive free list, with reuse
//! - [`LinearAllocator`] - Bump allocation of byte spans, released only as a whole
//! - [`Arena`] - Typed bump allocation with epoch-checked [`ArenaId`] handles
//! - [`AllocatorConfig`] - Block sizing shared by all of the above
//! - [`AllocationStats`] - Counters for block acquisition and release
//!
//! Handles ([`ChunkRef`], [`ArenaSpan`], [`ArenaId`]) address storage by block and offset, so
//! growing an allocator never moves memory that has already been handed out.
//!
//! # Example
//! ```rust
//! use parsecore::memory::{AllocatorConfig, FixedAllocator};
//!
//! let mut pool = FixedAllocator::with_config(24, &AllocatorConfig::compact())?;
//! let chunk = pool.allocate()?;
//! pool.chunk_mut(chunk).unwrap()[0] = 0xAA;
//! pool.free(chunk);
//! assert_eq!(pool.allocate()?, chunk);
//! # Ok::<(), parsecore::Error>(())
//! ```

mod arena;
mod config;
mod pool;
mod stats;

pub use arena::{Arena, ArenaId, ArenaSpan, LinearAllocator};
pub use config::{round_up, AllocatorConfig, DEFAULT_ALIGNMENT};
pub use pool::{ChunkRef, FixedAllocator};
pub use stats::AllocationStats;
