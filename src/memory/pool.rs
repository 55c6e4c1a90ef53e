//! Fixed-size chunk pool with an intrusive free list.
//!
//! [`FixedAllocator`] hands out equally sized chunks carved from larger blocks. Free chunks are
//! threaded into a singly linked list whose links live inside the free chunks themselves: the
//! first eight bytes of a free chunk encode the handle of the next free chunk. A chunk that is
//! handed out belongs entirely to the caller, link bytes included.
//!
//! When the free list runs dry one new block of `chunk_size * chunk_count` bytes is acquired,
//! every chunk in it is stitched into the list and the block is pushed onto the block chain.
//! Blocks are only ever handed back to the system as a whole, by [`FixedAllocator::purge`] or
//! when the pool is dropped.
//!
//! Chunks are addressed through [`ChunkRef`] handles instead of raw pointers, so growing the
//! block chain never invalidates an outstanding chunk. Handles carry the epoch they were issued
//! in, and a purge starts a new epoch, so chunks from before a purge resolve to `None`.

use tracing::{debug, trace};

use crate::{
    memory::{round_up, AllocationStats, AllocatorConfig},
    Error, Result,
};

/// Bytes of a free chunk used to store the free-list link.
const LINK_SIZE: usize = std::mem::size_of::<u64>();

/// Encoded terminator of the free list.
const NIL: u64 = u64::MAX;

/// Handle to one chunk of a [`FixedAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkRef {
    block: u32,
    offset: u32,
    epoch: u32,
}

impl ChunkRef {
    /// Index of the block the chunk lives in.
    #[must_use]
    pub fn block(&self) -> usize {
        self.block as usize
    }

    /// Byte offset of the chunk inside its block.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    // Links only ever connect chunks of the current epoch, so the epoch is not stored
    fn encode(self) -> u64 {
        (u64::from(self.block) << 32) | u64::from(self.offset)
    }

    #[allow(clippy::cast_possible_truncation)] // Both halves were produced from u32 values
    fn decode(raw: u64, epoch: u32) -> Option<Self> {
        if raw == NIL {
            None
        } else {
            Some(ChunkRef {
                block: (raw >> 32) as u32,
                offset: raw as u32,
                epoch,
            })
        }
    }
}

/// Pool allocator for fixed-size chunks.
///
/// The pool is not internally synchronized; confine it to one thread or lock it externally.
///
/// # Example
///
/// ```rust
/// use parsecore::memory::FixedAllocator;
///
/// let mut pool = FixedAllocator::new(24, 4)?;
/// let chunk = pool.allocate()?;
/// pool.chunk_mut(chunk).unwrap()[..3].copy_from_slice(b"abc");
/// assert_eq!(&pool.chunk(chunk).unwrap()[..3], b"abc");
///
/// pool.free(chunk);
/// assert_eq!(pool.allocate()?, chunk);
/// # Ok::<(), parsecore::Error>(())
/// ```
#[derive(Debug)]
pub struct FixedAllocator {
    /// Block chain, oldest first; the index is part of every [`ChunkRef`]
    blocks: Vec<Box<[u8]>>,
    /// Head of the intrusive free list
    free_head: Option<ChunkRef>,
    /// Rounded chunk size, never smaller than the link
    chunk_size: usize,
    /// Chunks per block
    chunk_count: usize,
    /// Bumped by every purge
    epoch: u32,
    stats: AllocationStats,
}

impl FixedAllocator {
    /// Creates a pool for chunks of at least `size` bytes, `count` chunks per block.
    ///
    /// No memory is acquired until the first allocation.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `count` is zero or a block would not be addressable.
    pub fn new(size: usize, count: usize) -> Result<Self> {
        let config = AllocatorConfig {
            pool_chunk_count: count,
            ..AllocatorConfig::default()
        };

        Self::with_config(size, &config)
    }

    /// Creates a pool for chunks of at least `size` bytes using `config` for alignment and
    /// chunks per block.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `config` is invalid or a block would not be addressable.
    pub fn with_config(size: usize, config: &AllocatorConfig) -> Result<Self> {
        config.validate()?;

        let chunk_size = round_up(size.max(LINK_SIZE), config.alignment)
            .ok_or_else(|| illegal_argument!("chunk size {} overflows", size))?;

        let block_size = chunk_size
            .checked_mul(config.pool_chunk_count)
            .filter(|&bytes| u32::try_from(bytes).is_ok())
            .ok_or_else(|| {
                illegal_argument!(
                    "{} chunks of {} bytes do not fit into one block",
                    config.pool_chunk_count,
                    chunk_size
                )
            })?;

        trace!(
            "fixed allocator: {} byte chunks, {} per block ({} bytes)",
            chunk_size,
            config.pool_chunk_count,
            block_size
        );

        Ok(FixedAllocator {
            blocks: Vec::new(),
            free_head: None,
            chunk_size,
            chunk_count: config.pool_chunk_count,
            epoch: 0,
            stats: AllocationStats::default(),
        })
    }

    /// Hands out one chunk.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailed`] if the free list is empty and a new block could not be
    /// acquired. The pool is left unchanged in that case.
    pub fn allocate(&mut self) -> Result<ChunkRef> {
        if self.free_head.is_none() {
            self.add_block()?;
        }

        let chunk = self.free_head.ok_or(Error::AllocationFailed {
            requested: self.chunk_size,
        })?;

        self.free_head = ChunkRef::decode(self.read_link(chunk), self.epoch);
        self.stats.handed_out += self.chunk_size;
        Ok(chunk)
    }

    /// Returns `chunk` to the free list.
    ///
    /// The chunk must have been handed out by this pool and must not be freed twice; neither is
    /// checked outside of debug builds.
    pub fn free(&mut self, chunk: ChunkRef) {
        debug_assert!(self.owns(chunk), "chunk does not belong to this pool");

        let next = self.free_head.map_or(NIL, ChunkRef::encode);
        self.write_link(chunk, next);
        self.free_head = Some(chunk);
    }

    /// Hands every block back to the system allocator.
    ///
    /// All outstanding [`ChunkRef`]s are invalidated and resolve to `None` from then on, even
    /// once new blocks have been acquired.
    pub fn purge(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if self.blocks.is_empty() {
            return;
        }

        debug!(
            "fixed allocator: purging {} blocks ({} bytes)",
            self.blocks.len(),
            self.blocks.len() * self.block_size()
        );

        for block in self.blocks.drain(..) {
            self.stats.released(block.len());
        }
        self.free_head = None;
    }

    /// The bytes of an allocated chunk, or `None` if `chunk` predates the last purge.
    #[must_use]
    pub fn chunk(&self, chunk: ChunkRef) -> Option<&[u8]> {
        if chunk.epoch != self.epoch {
            return None;
        }

        self.blocks
            .get(chunk.block())?
            .get(chunk.offset()..chunk.offset() + self.chunk_size)
    }

    /// The bytes of an allocated chunk, mutably.
    pub fn chunk_mut(&mut self, chunk: ChunkRef) -> Option<&mut [u8]> {
        if chunk.epoch != self.epoch {
            return None;
        }

        let size = self.chunk_size;
        self.blocks
            .get_mut(chunk.block())?
            .get_mut(chunk.offset()..chunk.offset() + size)
    }

    /// Rounded size of every chunk.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunks carved from each block.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Bytes acquired per block.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.chunk_size * self.chunk_count
    }

    /// Blocks currently held.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of chunks reachable from the free-list head.
    #[must_use]
    pub fn free_count(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.free_head;
        while let Some(chunk) = cursor {
            count += 1;
            cursor = ChunkRef::decode(self.read_link(chunk), self.epoch);
        }

        count
    }

    /// Allocation counters.
    #[must_use]
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    fn owns(&self, chunk: ChunkRef) -> bool {
        chunk.epoch == self.epoch
            && chunk.block() < self.blocks.len()
            && chunk.offset() < self.block_size()
            && chunk.offset() % self.chunk_size == 0
    }

    fn add_block(&mut self) -> Result<()> {
        let bytes = self.block_size();
        let block = u32::try_from(self.blocks.len())
            .map_err(|_| Error::AllocationFailed { requested: bytes })?;

        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| Error::AllocationFailed { requested: bytes })?;
        data.resize(bytes, 0_u8);

        for index in 0..self.chunk_count {
            let offset = index * self.chunk_size;
            let next = if index + 1 < self.chunk_count {
                #[allow(clippy::cast_possible_truncation)] // Block size was checked against u32
                ChunkRef {
                    block,
                    offset: (offset + self.chunk_size) as u32,
                    epoch: self.epoch,
                }
                .encode()
            } else {
                NIL
            };

            data[offset..offset + LINK_SIZE].copy_from_slice(&next.to_le_bytes());
        }

        debug!(
            "fixed allocator: acquired block {} ({} bytes)",
            block,
            bytes
        );

        self.blocks.push(data.into_boxed_slice());
        self.free_head = Some(ChunkRef {
            block,
            offset: 0,
            epoch: self.epoch,
        });
        self.stats.acquired(bytes);
        Ok(())
    }

    fn read_link(&self, chunk: ChunkRef) -> u64 {
        self.blocks
            .get(chunk.block())
            .and_then(|block| block.get(chunk.offset()..chunk.offset() + LINK_SIZE))
            .and_then(|bytes| <[u8; LINK_SIZE]>::try_from(bytes).ok())
            .map_or(NIL, u64::from_le_bytes)
    }

    fn write_link(&mut self, chunk: ChunkRef, link: u64) {
        if let Some(bytes) = self
            .blocks
            .get_mut(chunk.block())
            .and_then(|block| block.get_mut(chunk.offset()..chunk.offset() + LINK_SIZE))
        {
            bytes.copy_from_slice(&link.to_le_bytes());
        }
    }
}
