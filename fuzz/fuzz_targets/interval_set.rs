#![no_main]

use libfuzzer_sys::fuzz_target;
use parsecore::misc::IntervalSet;
use std::collections::BTreeSet;

// Compares the merged representation against a plain set of small symbols
fuzz_target!(|data: &[u8]| {
    let mut set = IntervalSet::new();
    let mut reference = BTreeSet::new();

    for pair in data.chunks_exact(2) {
        let (a, b) = (i32::from(pair[0] % 64), i32::from(pair[1] % 64));
        set.add_range(a, b);
        reference.extend(a..=b);
    }

    assert_eq!(set.len(), reference.len());
    assert!(set.iter().eq(reference.iter().copied()));
    for window in set.intervals().windows(2) {
        assert!(window[0].b + 1 < window[1].a);
    }
});
