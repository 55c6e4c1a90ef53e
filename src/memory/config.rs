//! Allocator configuration
//!
//! This module provides the sizing knobs shared by the pool and arena allocators and by the
//! transition factory that sits on top of them.

use crate::Result;

/// Alignment every chunk and span size is rounded up to by default.
pub const DEFAULT_ALIGNMENT: usize = 8;

/// Configuration for the allocators
///
/// All sizes are in bytes except the `*_count` / `*_capacity` fields, which count objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Alignment that allocation sizes are rounded up to (power of two)
    pub alignment: usize,

    /// Number of chunks carved from each pool block
    pub pool_chunk_count: usize,

    /// Usable bytes in each arena block; larger requests get a dedicated block
    pub arena_block_size: usize,

    /// Number of objects stored in each typed arena block
    pub typed_block_capacity: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            pool_chunk_count: 256,
            arena_block_size: 64 * 1024,
            typed_block_capacity: 1024,
        }
    }
}

impl AllocatorConfig {
    /// Creates a configuration with small blocks, for short-lived automata and tests
    ///
    /// Keeps the memory held by a barely used allocator low at the price of more block
    /// acquisitions.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            pool_chunk_count: 32,
            arena_block_size: 4 * 1024,
            typed_block_capacity: 64,
        }
    }

    /// Creates a configuration with large blocks, for big grammars built once and kept alive
    #[must_use]
    pub fn throughput() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            pool_chunk_count: 4096,
            arena_block_size: 1024 * 1024,
            typed_block_capacity: 16 * 1024,
        }
    }

    /// Checks the invariants the allocators rely on
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if the alignment is not a power of two or if any count or
    /// block size is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.alignment.is_power_of_two() {
            return Err(illegal_argument!("alignment {} is not a power of two", self.alignment).into());
        }

        if self.pool_chunk_count == 0 {
            return Err(illegal_argument!("pool blocks need at least one chunk").into());
        }

        if self.arena_block_size == 0 {
            return Err(illegal_argument!("arena block size must not be zero").into());
        }

        if self.typed_block_capacity == 0 {
            return Err(illegal_argument!("typed arena blocks need room for one object").into());
        }

        Ok(())
    }
}

/// Rounds `size` up to the next multiple of `alignment`
///
/// `alignment` must be a power of two. Returns `None` if the result would overflow.
#[must_use]
pub fn round_up(size: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    Some(size.checked_add(alignment - 1)? & !(alignment - 1))
}
