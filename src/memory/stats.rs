//! Allocation accounting shared by the allocators.

/// Counters describing how an allocator has used the system allocator.
///
/// Every block acquisition and release goes through these counters, which makes them usable as
/// an instrumented allocation counter in tests and benchmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationStats {
    /// Blocks acquired from the system allocator since creation
    pub blocks_acquired: usize,
    /// Blocks handed back to the system allocator since creation
    pub blocks_released: usize,
    /// Bytes acquired from the system allocator since creation
    pub bytes_acquired: usize,
    /// Bytes handed back to the system allocator since creation
    pub bytes_released: usize,
    /// Rounded bytes (or objects, for typed arenas) handed out to callers since creation
    pub handed_out: usize,
}

impl AllocationStats {
    /// Blocks currently held.
    #[must_use]
    pub fn blocks_live(&self) -> usize {
        self.blocks_acquired - self.blocks_released
    }

    /// Bytes currently held from the system allocator.
    #[must_use]
    pub fn bytes_retained(&self) -> usize {
        self.bytes_acquired - self.bytes_released
    }

    pub(crate) fn acquired(&mut self, bytes: usize) {
        self.blocks_acquired += 1;
        self.bytes_acquired += bytes;
    }

    pub(crate) fn released(&mut self, bytes: usize) {
        self.blocks_released += 1;
        self.bytes_released += bytes;
    }
}
