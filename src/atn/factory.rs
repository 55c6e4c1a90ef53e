//! Arena-backed construction of transitions.

use tracing::trace;

use crate::{
    atn::Transition,
    memory::{AllocationStats, AllocatorConfig, Arena, ArenaId},
    Result,
};

/// Handle to a transition owned by a [`TransitionFactory`].
pub type TransitionId = ArenaId<Transition>;

/// Creates transitions inside an arena owned by the factory.
///
/// Transitions live until the factory is purged or dropped; [`TransitionFactory::destroy`] does
/// not release anything on its own. Once built, a factory can be shared across threads for
/// read-only lookups.
///
/// # Example
///
/// ```rust
/// use parsecore::atn::{StateId, Transition, TransitionFactory};
///
/// let mut factory = TransitionFactory::new(64)?;
/// let id = factory.create(Transition::atom(StateId(1), 42))?;
/// assert!(factory.get(id).unwrap().matches(42, 1, 100));
///
/// factory.purge();
/// assert!(factory.get(id).is_none());
/// # Ok::<(), parsecore::Error>(())
/// ```
#[derive(Debug)]
pub struct TransitionFactory {
    arena: Arena<Transition>,
}

impl TransitionFactory {
    /// Creates a factory storing `block_capacity` transitions per arena block.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `block_capacity` is zero.
    pub fn new(block_capacity: usize) -> Result<Self> {
        Ok(TransitionFactory {
            arena: Arena::new(block_capacity)?,
        })
    }

    /// Creates a factory sized by `config`.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `config` is invalid.
    pub fn with_config(config: &AllocatorConfig) -> Result<Self> {
        Ok(TransitionFactory {
            arena: Arena::with_config(config)?,
        })
    }

    /// Places `transition` into arena storage.
    ///
    /// # Errors
    /// Returns [`crate::Error::AllocationFailed`] if the arena cannot grow.
    pub fn create(&mut self, transition: Transition) -> Result<TransitionId> {
        self.arena.alloc(transition)
    }

    /// The transition behind `id`, or `None` if the factory was purged since.
    #[must_use]
    pub fn get(&self, id: TransitionId) -> Option<&Transition> {
        self.arena.get(id)
    }

    /// Releases a single transition, which arena storage does not support.
    ///
    /// The transition stays reachable until [`TransitionFactory::purge`].
    pub fn destroy(&mut self, id: TransitionId) {
        trace!("transition factory: destroy of {id:?} deferred to purge");
    }

    /// Drops every transition and invalidates all handles.
    pub fn purge(&mut self) {
        self.arena.purge();
    }

    /// Number of transitions created since the last purge.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if no transition is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Transitions in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.arena.iter()
    }

    /// Allocation counters of the underlying arena.
    #[must_use]
    pub fn stats(&self) -> &AllocationStats {
        self.arena.stats()
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use super::*;
    use crate::{atn::StateId, misc::IntervalSet};

    #[test]
    fn create_and_lookup() {
        let mut factory = TransitionFactory::new(4).unwrap();
        let ids: Vec<_> = (0..10)
            .map(|i| factory.create(Transition::atom(StateId(i), i as i32)).unwrap())
            .collect();

        assert_eq!(factory.len(), 10);
        for (i, id) in ids.iter().enumerate() {
            let transition = factory.get(*id).unwrap();
            assert_eq!(transition.target(), StateId(i));
            assert!(transition.matches(i as i32, 0, 100));
        }
    }

    #[test]
    fn destroy_is_deferred() {
        let mut factory = TransitionFactory::new(4).unwrap();
        let id = factory.create(Transition::wildcard(StateId(0))).unwrap();

        factory.destroy(id);
        assert!(factory.get(id).is_some());
        assert_eq!(factory.len(), 1);

        factory.purge();
        assert!(factory.get(id).is_none());
        assert!(factory.is_empty());
        assert_eq!(factory.stats().bytes_retained(), 0);
    }

    #[test]
    fn concurrent_read_only_matching() {
        let mut factory = TransitionFactory::with_config(&AllocatorConfig::compact()).unwrap();
        let ids: Vec<_> = (0..500)
            .map(|i| {
                let transition = match i % 3 {
                    0 => Transition::atom(StateId(i), 7),
                    1 => Transition::set(StateId(i), IntervalSet::of(5, 9)),
                    _ => Transition::not_set(StateId(i), IntervalSet::of(5, 9)),
                };
                factory.create(transition).unwrap()
            })
            .collect();

        let factory = &factory;
        let matched = ids
            .par_iter()
            .filter(|id| factory.get(**id).is_some_and(|t| t.matches(7, 0, 20)))
            .count();

        // Atoms and sets match 7, negated sets do not
        let expected = (0..500).filter(|i| i % 3 != 2).count();
        assert_eq!(matched, expected);
    }
}
