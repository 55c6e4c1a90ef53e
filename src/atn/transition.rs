//! Edges of the recognition automaton.
//!
//! A [`Transition`] is a one-way link from a state to its `target`. The variants form a closed
//! family, so they are a sealed [`TransitionKind`] enum rather than a trait hierarchy. Two
//! independent descriptions are attached to every edge:
//!
//! - [`SerializationType`] - a fixed tag per variant, as found in serialized automata
//! - [`TransitionClass`] - a bitmask of the categories the edge belongs to. Category tests are
//!   membership tests, because one category can span several variants: both semantic predicate
//!   edges and precedence predicate edges are abstract predicates.
//!
//! Edges are immutable once constructed.

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumCount, EnumIter, FromRepr};

use crate::{atn::StateId, misc::IntervalSet};

/// Serialization tag of a transition variant.
///
/// The numeric values are part of the serialized automaton format and never change.
///
/// ```rust
/// use parsecore::atn::SerializationType;
///
/// assert_eq!(SerializationType::from_repr(8), Some(SerializationType::NotSet));
/// assert_eq!(SerializationType::NotSet.to_string(), "NOT_SET");
/// assert_eq!(SerializationType::from_repr(0), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, FromRepr, Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SerializationType {
    /// Traversed without consuming input
    Epsilon = 1,
    /// Matches a contiguous symbol range
    Range = 2,
    /// Invokes a rule sub-automaton
    Rule = 3,
    /// Guarded by a semantic predicate
    Predicate = 4,
    /// Matches a single symbol
    Atom = 5,
    /// Executes an embedded action
    Action = 6,
    /// Matches a symbol set
    Set = 7,
    /// Matches any vocabulary symbol outside a set
    NotSet = 8,
    /// Matches any vocabulary symbol
    Wildcard = 9,
    /// Guarded by an operator precedence check
    Precedence = 10,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Category membership of a transition
    pub struct TransitionClass: u32 {
        /// Every transition
        const TRANSITION = 1;
        /// Semantic and precedence predicates
        const ABSTRACT_PREDICATE = 2;
        /// Action edges
        const ACTION = 4;
        /// Single-symbol edges
        const ATOM = 8;
        /// Plain epsilon edges
        const EPSILON = 16;
        /// Symbol range edges
        const RANGE = 32;
        /// Rule invocation edges
        const RULE = 64;
        /// Set edges, including negated sets
        const SET = 128;
        /// Wildcard edges
        const WILDCARD = 256;
        /// Negated set edges
        const NOT_SET = 512;
        /// Semantic predicate edges
        const PREDICATE = 1024;
    }
}

/// Variant-specific payload of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    /// Epsilon edge; `outermost_precedence_return` names the rule whose precedence-return
    /// sequence this edge ends, if any
    Epsilon {
        /// Rule index of the left-recursive rule being returned from
        outermost_precedence_return: Option<usize>,
    },
    /// Symbols `from..=to`
    Range {
        /// First matched symbol
        from: i32,
        /// Last matched symbol
        to: i32,
    },
    /// Rule invocation; the target is the start state of the invoked rule
    Rule {
        /// Invoked rule
        rule_index: usize,
        /// Precedence the rule is invoked with
        precedence: i32,
        /// State to continue in when the rule returns
        follow_state: StateId,
    },
    /// Semantic predicate
    Predicate {
        /// Rule containing the predicate
        rule_index: usize,
        /// Predicate index within the rule
        pred_index: usize,
        /// Whether the predicate reads the rule context
        is_ctx_dependent: bool,
    },
    /// A single symbol
    Atom {
        /// The matched symbol
        label: i32,
    },
    /// Embedded action
    Action {
        /// Rule containing the action
        rule_index: usize,
        /// Action index within the rule, `None` for actions without one
        action_index: Option<usize>,
        /// Whether the action reads the rule context
        is_ctx_dependent: bool,
    },
    /// Any symbol in `set`
    Set {
        /// The matched symbols
        set: IntervalSet,
    },
    /// Any vocabulary symbol not in `set`
    NotSet {
        /// The excluded symbols
        set: IntervalSet,
    },
    /// Any vocabulary symbol
    Wildcard,
    /// Precedence predicate `precedence >= _p`
    Precedence {
        /// Minimum precedence for the edge to be viable
        precedence: i32,
    },
}

/// An edge of the recognition automaton.
///
/// # Example
///
/// ```rust
/// use parsecore::atn::{StateId, Transition, TransitionClass};
///
/// let atom = Transition::atom(StateId(3), 5);
/// assert!(atom.matches(5, 1, 10));
/// assert!(!atom.matches(6, 1, 10));
/// assert!(atom.is_type(TransitionClass::ATOM));
///
/// let pred = Transition::precedence(StateId(4), 2);
/// assert!(pred.is_epsilon());
/// assert!(pred.is_type(TransitionClass::ABSTRACT_PREDICATE));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    target: StateId,
    class: TransitionClass,
    kind: TransitionKind,
}

impl Transition {
    fn with_class(target: StateId, class: TransitionClass, kind: TransitionKind) -> Self {
        Transition {
            target,
            class: TransitionClass::TRANSITION | class,
            kind,
        }
    }

    /// Epsilon edge to `target`.
    #[must_use]
    pub fn epsilon(target: StateId) -> Self {
        Self::epsilon_returning(target, None)
    }

    /// Epsilon edge that ends the precedence-return sequence of `outermost_precedence_return`.
    #[must_use]
    pub fn epsilon_returning(target: StateId, outermost_precedence_return: Option<usize>) -> Self {
        Self::with_class(
            target,
            TransitionClass::EPSILON,
            TransitionKind::Epsilon {
                outermost_precedence_return,
            },
        )
    }

    /// Edge matching `from..=to`.
    #[must_use]
    pub fn range(target: StateId, from: i32, to: i32) -> Self {
        Self::with_class(target, TransitionClass::RANGE, TransitionKind::Range { from, to })
    }

    /// Invocation of the rule starting at `rule_start`, continuing at `follow_state`.
    #[must_use]
    pub fn rule(
        rule_start: StateId,
        rule_index: usize,
        precedence: i32,
        follow_state: StateId,
    ) -> Self {
        Self::with_class(
            rule_start,
            TransitionClass::RULE,
            TransitionKind::Rule {
                rule_index,
                precedence,
                follow_state,
            },
        )
    }

    /// Edge guarded by predicate `pred_index` of rule `rule_index`.
    #[must_use]
    pub fn predicate(
        target: StateId,
        rule_index: usize,
        pred_index: usize,
        is_ctx_dependent: bool,
    ) -> Self {
        Self::with_class(
            target,
            TransitionClass::ABSTRACT_PREDICATE | TransitionClass::PREDICATE,
            TransitionKind::Predicate {
                rule_index,
                pred_index,
                is_ctx_dependent,
            },
        )
    }

    /// Edge matching exactly `label`.
    #[must_use]
    pub fn atom(target: StateId, label: i32) -> Self {
        Self::with_class(target, TransitionClass::ATOM, TransitionKind::Atom { label })
    }

    /// Edge executing action `action_index` of rule `rule_index`.
    #[must_use]
    pub fn action(
        target: StateId,
        rule_index: usize,
        action_index: Option<usize>,
        is_ctx_dependent: bool,
    ) -> Self {
        Self::with_class(
            target,
            TransitionClass::ACTION,
            TransitionKind::Action {
                rule_index,
                action_index,
                is_ctx_dependent,
            },
        )
    }

    /// Edge matching any symbol of `set`.
    #[must_use]
    pub fn set(target: StateId, set: IntervalSet) -> Self {
        Self::with_class(target, TransitionClass::SET, TransitionKind::Set { set })
    }

    /// Edge matching any vocabulary symbol outside `set`.
    #[must_use]
    pub fn not_set(target: StateId, set: IntervalSet) -> Self {
        Self::with_class(
            target,
            TransitionClass::SET | TransitionClass::NOT_SET,
            TransitionKind::NotSet { set },
        )
    }

    /// Edge matching any vocabulary symbol.
    #[must_use]
    pub fn wildcard(target: StateId) -> Self {
        Self::with_class(target, TransitionClass::WILDCARD, TransitionKind::Wildcard)
    }

    /// Edge viable only while the current precedence is at most `precedence`.
    #[must_use]
    pub fn precedence(target: StateId, precedence: i32) -> Self {
        Self::with_class(
            target,
            TransitionClass::ABSTRACT_PREDICATE,
            TransitionKind::Precedence { precedence },
        )
    }

    /// The state this edge leads to.
    #[must_use]
    pub fn target(&self) -> StateId {
        self.target
    }

    /// Categories this edge belongs to.
    #[must_use]
    pub fn class(&self) -> TransitionClass {
        self.class
    }

    /// Variant payload.
    #[must_use]
    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    /// Returns `true` if the edge belongs to any category in `class`.
    #[must_use]
    pub fn is_type(&self, class: TransitionClass) -> bool {
        self.class.intersects(class)
    }

    /// Serialization tag of the variant.
    #[must_use]
    pub fn serialization_type(&self) -> SerializationType {
        match self.kind {
            TransitionKind::Epsilon { .. } => SerializationType::Epsilon,
            TransitionKind::Range { .. } => SerializationType::Range,
            TransitionKind::Rule { .. } => SerializationType::Rule,
            TransitionKind::Predicate { .. } => SerializationType::Predicate,
            TransitionKind::Atom { .. } => SerializationType::Atom,
            TransitionKind::Action { .. } => SerializationType::Action,
            TransitionKind::Set { .. } => SerializationType::Set,
            TransitionKind::NotSet { .. } => SerializationType::NotSet,
            TransitionKind::Wildcard => SerializationType::Wildcard,
            TransitionKind::Precedence { .. } => SerializationType::Precedence,
        }
    }

    /// Returns `true` if traversing the edge consumes no input symbol.
    #[must_use]
    pub fn is_epsilon(&self) -> bool {
        matches!(
            self.kind,
            TransitionKind::Epsilon { .. }
                | TransitionKind::Rule { .. }
                | TransitionKind::Predicate { .. }
                | TransitionKind::Action { .. }
                | TransitionKind::Precedence { .. }
        )
    }

    /// Returns `true` if the edge can be traversed on `symbol`, given the vocabulary
    /// `min_vocab..=max_vocab`.
    ///
    /// Epsilon-class edges never match a symbol.
    #[must_use]
    pub fn matches(&self, symbol: i32, min_vocab: i32, max_vocab: i32) -> bool {
        let in_vocabulary = min_vocab <= symbol && symbol <= max_vocab;

        match &self.kind {
            TransitionKind::Atom { label } => *label == symbol,
            TransitionKind::Range { from, to } => *from <= symbol && symbol <= *to,
            TransitionKind::Set { set } => set.contains(symbol),
            TransitionKind::NotSet { set } => in_vocabulary && !set.contains(symbol),
            TransitionKind::Wildcard => in_vocabulary,
            TransitionKind::Epsilon { .. }
            | TransitionKind::Rule { .. }
            | TransitionKind::Predicate { .. }
            | TransitionKind::Action { .. }
            | TransitionKind::Precedence { .. } => false,
        }
    }

    /// The symbols labelling the edge.
    ///
    /// Defined for atom, range, set and not-set edges; for a not-set edge this is the excluded
    /// set. Other edges carry no label.
    #[must_use]
    pub fn label(&self) -> Option<IntervalSet> {
        match &self.kind {
            TransitionKind::Atom { label } => Some(IntervalSet::of_one(*label)),
            TransitionKind::Range { from, to } => Some(IntervalSet::of(*from, *to)),
            TransitionKind::Set { set } | TransitionKind::NotSet { set } => Some(set.clone()),
            _ => None,
        }
    }
}

/// Renders `symbol` as a quoted character when it is a printable code point.
fn quoted(f: &mut fmt::Formatter<'_>, symbol: i32) -> fmt::Result {
    match u32::try_from(symbol).ok().and_then(char::from_u32) {
        Some(c) if !c.is_control() => write!(f, "'{c}'"),
        _ => write!(f, "{symbol}"),
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TransitionKind::Epsilon { .. } => f.write_str("epsilon"),
            TransitionKind::Range { from, to } => {
                quoted(f, *from)?;
                f.write_str("..")?;
                quoted(f, *to)
            }
            TransitionKind::Rule { rule_index, .. } => write!(f, "rule_{rule_index}"),
            TransitionKind::Predicate {
                rule_index,
                pred_index,
                ..
            } => write!(f, "pred_{rule_index}:{pred_index}"),
            TransitionKind::Atom { label } => write!(f, "{label}"),
            TransitionKind::Action {
                rule_index,
                action_index,
                ..
            } => match action_index {
                Some(index) => write!(f, "action_{rule_index}:{index}"),
                None => write!(f, "action_{rule_index}"),
            },
            TransitionKind::Set { set } => write!(f, "{set}"),
            TransitionKind::NotSet { set } => write!(f, "~{set}"),
            TransitionKind::Wildcard => f.write_str("."),
            TransitionKind::Precedence { precedence } => write!(f, "{precedence} >= _p"),
        }
    }
}
