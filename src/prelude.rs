//! # parsecore Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the parsecore library. Import it to get quick access to the allocators, the type
//! identity helpers and the tree-walking API.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all parsecore operations
pub use crate::Error;

/// The result type used throughout parsecore
pub use crate::Result;

/// Raised exceptions and catch-by-ancestor
pub use crate::exceptions::{Catch, Exception, Raised};

// ================================================================================================
// Memory
// ================================================================================================

/// Allocators and their handles
pub use crate::memory::{
    AllocationStats, AllocatorConfig, Arena, ArenaId, ArenaSpan, ChunkRef, FixedAllocator,
    LinearAllocator,
};

// ================================================================================================
// Type Identity and Values
// ================================================================================================

/// Runtime type identity
pub use crate::rtti::{cast, cast_arc, is_a, Rtti, TypeKey};

/// The type-erased value container
pub use crate::support::AnyValue;

// ================================================================================================
// Automaton Transitions
// ================================================================================================

/// Transition model and factory
pub use crate::atn::{
    SerializationType, StateId, Transition, TransitionClass, TransitionFactory, TransitionId,
    TransitionKind,
};

/// Symbol sets
pub use crate::misc::IntervalSet;

// ================================================================================================
// Parse Trees
// ================================================================================================

/// Nodes, listeners and walkers
pub use crate::tree::{
    default_walker, ErrorNode, ParseTree, ParseTreeListener, ParserRuleContext, TerminalNode,
    Token, TreeWalker,
};
