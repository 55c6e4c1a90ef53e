//! Linear (bump) allocation with block growth and bulk release.
//!
//! Two allocators share the same block discipline:
//!
//! - [`LinearAllocator`] hands out rounded byte spans from the head block and starts a new block
//!   exactly when the head block cannot fit the request.
//! - [`Arena`] does the same for values of one type; it backs the transition factory.
//!
//! Neither supports freeing an individual allocation. Memory comes back only through `purge`
//! (or drop), which releases the whole block chain at once. Blocks are kept most-recent-first:
//! the head block is the only one that is ever bumped.
//!
//! Handles ([`ArenaSpan`], [`ArenaId`]) address allocations by block and offset, so adding
//! blocks never invalidates earlier allocations. Both handle types also carry the epoch they
//! were issued in; after a purge they resolve to `None`.

use std::{fmt, hash, marker::PhantomData};

use tracing::debug;

use crate::{
    memory::{round_up, AllocationStats, AllocatorConfig},
    Error, Result,
};

/// Handle to a span of bytes in a [`LinearAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArenaSpan {
    block: u32,
    offset: u32,
    len: u32,
    epoch: u32,
}

impl ArenaSpan {
    /// Rounded length of the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` for a zero-sized span.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of the span inside its block.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset as usize
    }
}

#[derive(Debug)]
struct ArenaBlock {
    data: Box<[u8]>,
    cursor: usize,
}

impl ArenaBlock {
    fn available(&self) -> usize {
        self.data.len() - self.cursor
    }
}

/// Bump allocator for byte spans.
///
/// Not internally synchronized; confine it to one thread while allocating.
///
/// # Example
///
/// ```rust
/// use parsecore::memory::LinearAllocator;
///
/// let mut arena = LinearAllocator::new(256)?;
/// let span = arena.alloc_bytes(b"token text")?;
/// assert_eq!(span.len(), 16);
/// assert_eq!(&arena.bytes(span).unwrap()[..10], b"token text");
///
/// arena.purge();
/// assert_eq!(arena.stats().bytes_retained(), 0);
/// # Ok::<(), parsecore::Error>(())
/// ```
#[derive(Debug)]
pub struct LinearAllocator {
    /// Blocks in acquisition order; the last one is the head
    blocks: Vec<ArenaBlock>,
    block_size: usize,
    alignment: usize,
    epoch: u32,
    stats: AllocationStats,
}

impl LinearAllocator {
    /// Creates an arena whose blocks hold `block_size` bytes (rounded up).
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `block_size` is zero or not addressable.
    pub fn new(block_size: usize) -> Result<Self> {
        let config = AllocatorConfig {
            arena_block_size: block_size,
            ..AllocatorConfig::default()
        };

        Self::with_config(&config)
    }

    /// Creates an arena from `config`.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `config` is invalid or its block size is not addressable.
    pub fn with_config(config: &AllocatorConfig) -> Result<Self> {
        config.validate()?;

        let block_size = round_up(config.arena_block_size, config.alignment)
            .filter(|&bytes| u32::try_from(bytes).is_ok())
            .ok_or_else(|| {
                illegal_argument!("arena block size {} is too large", config.arena_block_size)
            })?;

        Ok(LinearAllocator {
            blocks: Vec::new(),
            block_size,
            alignment: config.alignment,
            epoch: 0,
            stats: AllocationStats::default(),
        })
    }

    /// Hands out `size` bytes, rounded up to the alignment.
    ///
    /// A new block is started exactly when the head block has fewer bytes left than the rounded
    /// request. Requests larger than the block size get a block of their own.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailed`] if a new block could not be acquired.
    pub fn allocate(&mut self, size: usize) -> Result<ArenaSpan> {
        let rounded = round_up(size, self.alignment)
            .filter(|&bytes| u32::try_from(bytes).is_ok())
            .ok_or(Error::AllocationFailed { requested: size })?;

        let needs_block = self
            .blocks
            .last()
            .map_or(true, |head| head.available() < rounded);
        if needs_block {
            self.add_block(rounded.max(self.block_size))?;
        }

        let block = self.blocks.len() - 1;
        let head = self
            .blocks
            .last_mut()
            .ok_or(Error::AllocationFailed { requested: rounded })?;

        let offset = head.cursor;
        head.cursor += rounded;
        self.stats.handed_out += rounded;

        #[allow(clippy::cast_possible_truncation)] // Block sizes are checked against u32
        Ok(ArenaSpan {
            block: block as u32,
            offset: offset as u32,
            len: rounded as u32,
            epoch: self.epoch,
        })
    }

    /// Allocates a span and copies `data` into its start.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailed`] if a new block could not be acquired.
    pub fn alloc_bytes(&mut self, data: &[u8]) -> Result<ArenaSpan> {
        let span = self.allocate(data.len())?;
        if let Some(target) = self.bytes_mut(span) {
            target[..data.len()].copy_from_slice(data);
        }

        Ok(span)
    }

    /// The bytes of `span`, or `None` if `span` predates the last purge.
    #[must_use]
    pub fn bytes(&self, span: ArenaSpan) -> Option<&[u8]> {
        if span.epoch != self.epoch {
            return None;
        }

        self.blocks
            .get(span.block as usize)?
            .data
            .get(span.offset()..span.offset() + span.len())
    }

    /// The bytes of `span`, mutably.
    pub fn bytes_mut(&mut self, span: ArenaSpan) -> Option<&mut [u8]> {
        if span.epoch != self.epoch {
            return None;
        }

        self.blocks
            .get_mut(span.block as usize)?
            .data
            .get_mut(span.offset()..span.offset() + span.len())
    }

    /// Hands every block back to the system allocator.
    ///
    /// Outstanding spans resolve to `None` afterwards.
    pub fn purge(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if self.blocks.is_empty() {
            return;
        }

        debug!("linear allocator: purging {} blocks", self.blocks.len());

        while let Some(block) = self.blocks.pop() {
            self.stats.released(block.data.len());
        }
    }

    /// Bytes left in the head block.
    #[must_use]
    pub fn available(&self) -> usize {
        self.blocks.last().map_or(0, ArenaBlock::available)
    }

    /// Configured (rounded) block size.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Blocks currently held.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Capacities of the held blocks, most recent first.
    pub fn block_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.iter().rev().map(|block| block.data.len())
    }

    /// Allocation counters.
    #[must_use]
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    fn add_block(&mut self, bytes: usize) -> Result<()> {
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| Error::AllocationFailed { requested: bytes })?;
        data.resize(bytes, 0_u8);

        debug!(
            "linear allocator: acquired block {} ({} bytes)",
            self.blocks.len(),
            bytes
        );

        self.blocks.push(ArenaBlock {
            data: data.into_boxed_slice(),
            cursor: 0,
        });
        self.stats.acquired(bytes);
        Ok(())
    }
}

/// Handle to a value stored in an [`Arena`].
pub struct ArenaId<T> {
    block: u32,
    slot: u32,
    epoch: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> ArenaId<T> {
    /// Position of the value in allocation order, stable until the next purge.
    #[must_use]
    pub fn index(&self, block_capacity: usize) -> usize {
        self.block as usize * block_capacity + self.slot as usize
    }
}

impl<T> Clone for ArenaId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaId<T> {}

impl<T> PartialEq for ArenaId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.block == other.block && self.slot == other.slot && self.epoch == other.epoch
    }
}

impl<T> Eq for ArenaId<T> {}

impl<T> hash::Hash for ArenaId<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.block.hash(state);
        self.slot.hash(state);
        self.epoch.hash(state);
    }
}

impl<T> fmt::Debug for ArenaId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaId({}:{}@{})", self.block, self.slot, self.epoch)
    }
}

/// Typed bump arena with stable handles.
///
/// Values are moved into fixed-capacity blocks that never reallocate, so a handle stays valid
/// until [`Arena::purge`]. Values are dropped only when the arena is purged or dropped.
#[derive(Debug)]
pub struct Arena<T> {
    /// Blocks in acquisition order; the last one is the head
    blocks: Vec<Vec<T>>,
    block_capacity: usize,
    epoch: u32,
    stats: AllocationStats,
}

impl<T> Arena<T> {
    /// Creates an arena storing `block_capacity` values per block.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `block_capacity` is zero or not addressable.
    pub fn new(block_capacity: usize) -> Result<Self> {
        if block_capacity == 0 || u32::try_from(block_capacity).is_err() {
            return Err(illegal_argument!("invalid arena block capacity {}", block_capacity).into());
        }

        Ok(Arena {
            blocks: Vec::new(),
            block_capacity,
            epoch: 0,
            stats: AllocationStats::default(),
        })
    }

    /// Creates an arena sized by `config.typed_block_capacity`.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `config` is invalid.
    pub fn with_config(config: &AllocatorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.typed_block_capacity)
    }

    /// Moves `value` into the arena.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailed`] if a new block could not be acquired; `value` is
    /// dropped in that case.
    pub fn alloc(&mut self, value: T) -> Result<ArenaId<T>> {
        let needs_block = self
            .blocks
            .last()
            .map_or(true, |head| head.len() >= self.block_capacity);
        if needs_block {
            self.add_block()?;
        }

        let block = self.blocks.len() - 1;
        let head = self.blocks.last_mut().ok_or(Error::AllocationFailed {
            requested: std::mem::size_of::<T>(),
        })?;

        let slot = head.len();
        head.push(value);
        self.stats.handed_out += 1;

        #[allow(clippy::cast_possible_truncation)] // Block count and capacity fit u32
        Ok(ArenaId {
            block: block as u32,
            slot: slot as u32,
            epoch: self.epoch,
            marker: PhantomData,
        })
    }

    /// The value behind `id`, or `None` if `id` predates the last purge.
    #[must_use]
    pub fn get(&self, id: ArenaId<T>) -> Option<&T> {
        if id.epoch != self.epoch {
            return None;
        }

        self.blocks.get(id.block as usize)?.get(id.slot as usize)
    }

    /// Mutable access to the value behind `id`.
    pub fn get_mut(&mut self, id: ArenaId<T>) -> Option<&mut T> {
        if id.epoch != self.epoch {
            return None;
        }

        self.blocks
            .get_mut(id.block as usize)?
            .get_mut(id.slot as usize)
    }

    /// Number of values stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    /// Returns `true` if the arena holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Vec::is_empty)
    }

    /// Values in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.blocks.iter().flatten()
    }

    /// Values per block.
    #[must_use]
    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    /// Blocks currently held.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Allocation counters; `handed_out` counts values.
    #[must_use]
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    /// Drops every value and releases every block, invalidating all handles.
    pub fn purge(&mut self) {
        if !self.blocks.is_empty() {
            debug!("arena: purging {} blocks", self.blocks.len());
        }

        let block_bytes = self.block_bytes();
        while self.blocks.pop().is_some() {
            self.stats.released(block_bytes);
        }
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn block_bytes(&self) -> usize {
        self.block_capacity
            .saturating_mul(std::mem::size_of::<T>())
    }

    fn add_block(&mut self) -> Result<()> {
        let bytes = self.block_bytes();
        if u32::try_from(self.blocks.len()).is_err() {
            return Err(Error::AllocationFailed { requested: bytes });
        }

        let mut block = Vec::new();
        block
            .try_reserve_exact(self.block_capacity)
            .map_err(|_| Error::AllocationFailed { requested: bytes })?;

        debug!("arena: acquired block {} ({} bytes)", self.blocks.len(), bytes);

        self.blocks.push(block);
        self.stats.acquired(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_are_rounded() {
        let mut arena = LinearAllocator::new(64).unwrap();
        assert_eq!(arena.allocate(1).unwrap().len(), 8);
        assert_eq!(arena.allocate(8).unwrap().len(), 8);
        assert_eq!(arena.allocate(17).unwrap().len(), 24);
        assert_eq!(arena.available(), 64 - 40);
    }

    #[test]
    fn new_block_exactly_when_short() {
        let mut arena = LinearAllocator::new(32).unwrap();
        arena.allocate(16).unwrap();
        arena.allocate(16).unwrap();
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.available(), 0);

        let span = arena.allocate(8).unwrap();
        assert_eq!(arena.block_count(), 2);
        assert_eq!(span.offset(), 0);
    }

    #[test]
    fn remaining_space_is_not_reused_across_blocks() {
        let mut arena = LinearAllocator::new(32).unwrap();
        arena.allocate(24).unwrap();
        arena.allocate(16).unwrap();
        assert_eq!(arena.block_count(), 2);
        assert_eq!(arena.available(), 16);
    }

    #[test]
    fn oversized_requests_get_their_own_block() {
        let mut arena = LinearAllocator::new(32).unwrap();
        arena.allocate(8).unwrap();
        let big = arena.allocate(100).unwrap();
        assert_eq!(big.len(), 104);
        assert_eq!(arena.bytes(big).unwrap().len(), 104);
        assert_eq!(arena.block_sizes().collect::<Vec<_>>(), vec![104, 32]);
    }

    #[test]
    fn spans_do_not_overlap() {
        let mut arena = LinearAllocator::new(64).unwrap();
        let a = arena.alloc_bytes(b"first").unwrap();
        let b = arena.alloc_bytes(b"second").unwrap();
        let c = arena.alloc_bytes(&[7; 60]).unwrap();

        assert_eq!(&arena.bytes(a).unwrap()[..5], b"first");
        assert_eq!(&arena.bytes(b).unwrap()[..6], b"second");
        assert!(arena.bytes(c).unwrap()[..60].iter().all(|&v| v == 7));
    }

    #[test]
    fn zero_sized_request() {
        let mut arena = LinearAllocator::new(16).unwrap();
        let span = arena.allocate(0).unwrap();
        assert!(span.is_empty());
        assert_eq!(arena.block_count(), 1);
    }

    #[test]
    fn purge_retains_nothing() {
        let mut arena = LinearAllocator::new(48).unwrap();
        for size in [3, 40, 7, 90, 1, 48, 16] {
            arena.allocate(size).unwrap();
        }
        assert!(arena.stats().bytes_retained() > 0);

        arena.purge();
        assert_eq!(arena.block_count(), 0);
        assert_eq!(arena.stats().bytes_retained(), 0);
        assert_eq!(arena.stats().blocks_live(), 0);
    }

    #[test]
    fn purge_invalidates_spans() {
        let mut arena = LinearAllocator::new(64).unwrap();
        let old = arena.alloc_bytes(b"old data").unwrap();

        arena.purge();
        assert_eq!(arena.bytes(old), None);

        let new = arena.alloc_bytes(b"NEWDATA!").unwrap();
        assert_eq!(new.offset(), old.offset());
        assert_ne!(new, old);
        assert_eq!(arena.bytes(old), None);
        assert_eq!(arena.bytes_mut(old), None);
        assert_eq!(arena.bytes(new).unwrap(), b"NEWDATA!");
    }

    #[test]
    fn typed_arena_roundtrip() {
        let mut arena = Arena::new(2).unwrap();
        let ids: Vec<_> = (0..5).map(|v| arena.alloc(v * 10).unwrap()).collect();

        assert_eq!(arena.block_count(), 3);
        assert_eq!(arena.len(), 5);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(arena.get(*id), Some(&(i * 10)));
            assert_eq!(id.index(arena.block_capacity()), i);
        }
        assert_eq!(arena.iter().copied().collect::<Vec<_>>(), vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn typed_arena_purge_invalidates() {
        let mut arena = Arena::new(4).unwrap();
        let old = arena.alloc(String::from("old")).unwrap();
        arena.purge();

        assert!(arena.is_empty());
        assert_eq!(arena.get(old), None);

        let new = arena.alloc(String::from("new")).unwrap();
        assert_ne!(old, new);
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new).map(String::as_str), Some("new"));
    }

    #[test]
    fn typed_arena_rejects_zero_capacity() {
        assert!(Arena::<u8>::new(0).is_err());
    }
}
