#![no_main]

use libfuzzer_sys::fuzz_target;
use parsecore::memory::{ChunkRef, FixedAllocator, LinearAllocator};

// Each input byte is one operation; chunk contents are tagged to detect overlap
fuzz_target!(|data: &[u8]| {
    let Ok(mut pool) = FixedAllocator::new(24, 5) else {
        return;
    };
    let Ok(mut arena) = LinearAllocator::new(64) else {
        return;
    };
    let mut live: Vec<(ChunkRef, u8)> = Vec::new();

    for (step, op) in data.iter().enumerate() {
        match op % 4 {
            0 | 1 => {
                let Ok(chunk) = pool.allocate() else {
                    return;
                };
                let tag = step as u8;
                if let Some(bytes) = pool.chunk_mut(chunk) {
                    bytes.fill(tag);
                }
                live.push((chunk, tag));
            }
            2 if !live.is_empty() => {
                let (chunk, _) = live.swap_remove(usize::from(*op) % live.len());
                pool.free(chunk);
            }
            _ => {
                let Ok(span) = arena.allocate(usize::from(*op)) else {
                    return;
                };
                assert!(span.len() >= usize::from(*op));
            }
        }
    }

    for (chunk, tag) in &live {
        let bytes = pool.chunk(*chunk).expect("live chunk");
        assert!(bytes.iter().all(|b| b == tag));
    }

    arena.purge();
    pool.purge();
    assert_eq!(arena.stats().bytes_retained(), 0);
    assert_eq!(pool.stats().bytes_retained(), 0);

    if pool.allocate().is_ok() {
        assert!(live.iter().all(|(chunk, _)| pool.chunk(*chunk).is_none()));
    }
});
