//! Sets of input symbols stored as sorted, disjoint intervals.
//!
//! Token types and code points cluster into contiguous runs, so a set of symbols is kept as a
//! list of inclusive intervals. Adjacent and overlapping intervals are merged on insertion,
//! which keeps the list sorted and minimal at all times.
//!
//! # Example
//!
//! ```rust
//! use parsecore::misc::IntervalSet;
//!
//! let mut set = IntervalSet::of(1, 3);
//! set.add(7);
//! set.add(4);
//!
//! assert!(set.contains(4));
//! assert!(!set.contains(5));
//! assert_eq!(set.to_string(), "{1..4, 7}");
//! ```

use std::fmt;

/// An inclusive range of symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    /// First symbol of the range
    pub a: i32,
    /// Last symbol of the range
    pub b: i32,
}

impl Interval {
    /// Creates the interval `a..=b`.
    #[must_use]
    pub const fn new(a: i32, b: i32) -> Self {
        Interval { a, b }
    }

    /// Number of symbols in the interval, zero if `b < a`.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.b < self.a {
            0
        } else {
            usize::try_from(i64::from(self.b) - i64::from(self.a) + 1).unwrap_or(usize::MAX)
        }
    }

    /// Returns `true` if the interval contains no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.b < self.a
    }

    /// Returns `true` if `symbol` lies inside the interval.
    #[must_use]
    pub fn contains(&self, symbol: i32) -> bool {
        self.a <= symbol && symbol <= self.b
    }

    /// Returns `true` if the two intervals overlap or touch.
    fn adjacent_or_overlapping(&self, other: &Interval) -> bool {
        i64::from(self.a) <= i64::from(other.b) + 1 && i64::from(other.a) <= i64::from(self.b) + 1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == self.b {
            write!(f, "{}", self.a)
        } else {
            write!(f, "{}..{}", self.a, self.b)
        }
    }
}

/// A set of symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    /// Sorted, disjoint, non-adjacent intervals
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        IntervalSet {
            intervals: Vec::new(),
        }
    }

    /// Creates the set `{symbol}`.
    #[must_use]
    pub fn of_one(symbol: i32) -> Self {
        Self::of(symbol, symbol)
    }

    /// Creates the set `{a..=b}`; empty if `b < a`.
    #[must_use]
    pub fn of(a: i32, b: i32) -> Self {
        let mut set = Self::new();
        set.add_range(a, b);
        set
    }

    /// Adds `symbol` to the set.
    pub fn add(&mut self, symbol: i32) {
        self.add_range(symbol, symbol);
    }

    /// Adds `a..=b` to the set. Does nothing if `b < a`.
    pub fn add_range(&mut self, a: i32, b: i32) {
        let mut added = Interval::new(a, b);
        if added.is_empty() {
            return;
        }

        // First interval that could touch the new one
        let start = self
            .intervals
            .partition_point(|existing| i64::from(existing.b) + 1 < i64::from(added.a));

        let mut end = start;
        while end < self.intervals.len() && self.intervals[end].adjacent_or_overlapping(&added) {
            added.a = added.a.min(self.intervals[end].a);
            added.b = added.b.max(self.intervals[end].b);
            end += 1;
        }

        self.intervals.drain(start..end);
        self.intervals.insert(start, added);
    }

    /// Adds every symbol of `other` to the set.
    pub fn add_set(&mut self, other: &IntervalSet) {
        for interval in &other.intervals {
            self.add_range(interval.a, interval.b);
        }
    }

    /// Returns `true` if `symbol` is a member.
    #[must_use]
    pub fn contains(&self, symbol: i32) -> bool {
        let index = self.intervals.partition_point(|interval| interval.b < symbol);
        self.intervals
            .get(index)
            .is_some_and(|interval| interval.contains(symbol))
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of symbols in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Smallest member.
    #[must_use]
    pub fn min(&self) -> Option<i32> {
        self.intervals.first().map(|interval| interval.a)
    }

    /// Largest member.
    #[must_use]
    pub fn max(&self) -> Option<i32> {
        self.intervals.last().map(|interval| interval.b)
    }

    /// The merged intervals, in ascending order.
    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.intervals.iter().flat_map(|interval| interval.a..=interval.b)
    }
}

impl FromIterator<i32> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for symbol in iter {
            set.add(symbol);
        }
        set
    }
}

impl fmt::Display for IntervalSet {
    /// Formats as `{1..3, 7}`; a set with one member prints bare, an empty set as `{}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }

        let braces = self.len() > 1;
        if braces {
            f.write_str("{")?;
        }
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{interval}")?;
        }
        if braces {
            f.write_str("}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_overlapping_and_adjacent() {
        let mut set = IntervalSet::new();
        set.add_range(10, 12);
        set.add_range(1, 3);
        set.add_range(4, 5);
        set.add_range(11, 20);
        assert_eq!(set.intervals(), &[Interval::new(1, 5), Interval::new(10, 20)]);

        set.add_range(6, 9);
        assert_eq!(set.intervals(), &[Interval::new(1, 20)]);
        assert_eq!(set.len(), 20);
    }

    #[test]
    fn bridging_range_swallows_several() {
        let mut set: IntervalSet = [1, 3, 5, 7, 20].into_iter().collect();
        set.add_range(2, 8);
        assert_eq!(set.intervals(), &[Interval::new(1, 8), Interval::new(20, 20)]);
    }

    #[test]
    fn membership() {
        let set: IntervalSet = [-1, 0, 1, 5].into_iter().collect();
        assert!(set.contains(-1));
        assert!(set.contains(1));
        assert!(!set.contains(2));
        assert!(set.contains(5));
        assert!(!set.contains(6));
        assert_eq!(set.min(), Some(-1));
        assert_eq!(set.max(), Some(5));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![-1, 0, 1, 5]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let set = IntervalSet::of(5, 4);
        assert!(set.is_empty());
        assert_eq!(set.min(), None);
    }

    #[test]
    fn extreme_bounds() {
        let mut set = IntervalSet::of(i32::MAX - 1, i32::MAX);
        set.add(i32::MIN);
        assert!(set.contains(i32::MAX));
        assert!(set.contains(i32::MIN));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn display() {
        assert_eq!(IntervalSet::new().to_string(), "{}");
        assert_eq!(IntervalSet::of_one(7).to_string(), "7");
        assert_eq!(IntervalSet::of(1, 3).to_string(), "{1..3}");

        let mut set = IntervalSet::of(1, 3);
        set.add(7);
        assert_eq!(set.to_string(), "{1..3, 7}");
    }

    #[test]
    fn union() {
        let mut set = IntervalSet::of(1, 2);
        set.add_set(&IntervalSet::of(3, 4));
        assert_eq!(set, IntervalSet::of(1, 4));
    }
}
