//! Listener callbacks dispatched by the tree walkers.
//!
//! [`ParseTreeListener`] carries the four generic callbacks. Grammar-specific callbacks are
//! reached by downcasting the listener from a rule context's hooks.

use std::any::Any;

use crate::tree::{ErrorNode, ParseTree, TerminalNode};

/// Callbacks invoked by a tree walker.
///
/// All methods default to doing nothing. Rule-specific callbacks live on grammar-specific
/// listener types; rule contexts reach them from their `enter_rule` / `exit_rule` hooks through
/// [`downcast_mut`](ParseTreeListener::downcast_mut).
///
/// Downcasting needs [`Any`], so listeners must be `'static`. A listener cannot borrow its
/// output; let it own the collected results and move them out after the walk.
pub trait ParseTreeListener: Any {
    /// Called for every terminal leaf that is not an error node.
    fn visit_terminal(&mut self, _node: &TerminalNode) {}

    /// Called for every error leaf.
    fn visit_error_node(&mut self, _node: &ErrorNode) {}

    /// Called before the rule-specific enter hook of every rule node.
    fn enter_every_rule(&mut self, _ctx: &dyn ParseTree) {}

    /// Called after the rule-specific exit hook of every rule node.
    fn exit_every_rule(&mut self, _ctx: &dyn ParseTree) {}
}

impl dyn ParseTreeListener {
    /// Views the listener as the concrete type `L`.
    pub fn downcast_mut<L: ParseTreeListener>(&mut self) -> Option<&mut L> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<L>()
    }

    /// Returns `true` if the listener is exactly an `L`.
    #[must_use]
    pub fn is<L: ParseTreeListener>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<L>()
    }
}
