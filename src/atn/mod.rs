//! Edge representation of the recognition automaton (ATN).
//!
//! Only the transition model lives here: the typed edges a generated recognizer walks, their
//! classification and serialization tags, and the arena-backed factory that owns them. States are
//! referenced by [`StateId`] and are not owned by the transitions pointing at them.
//!
//! # Key Types
//! - [`Transition`] - An immutable edge with a target state
//! - [`TransitionKind`] - The closed set of edge variants and their payloads
//! - [`TransitionClass`] - Category bitmask used for `is_type` tests
//! - [`SerializationType`] - Fixed serialization tags (1 = epsilon .. 10 = precedence)
//! - [`TransitionFactory`] - Arena-backed creation returning [`TransitionId`] handles

mod factory;
mod transition;

use std::fmt;

pub use factory::{TransitionFactory, TransitionId};
pub use transition::{SerializationType, Transition, TransitionClass, TransitionKind};

/// Non-owning reference to an automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}
