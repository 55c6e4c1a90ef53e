//! Parse trees and listener-driven traversal.
//!
//! This module provides the node types a generated parser builds, the listener interface, and
//! the walkers that connect them. Node kinds are decided at runtime through [`crate::rtti`], so
//! grammar-specific rule contexts only need to embed [`ParserRuleContext`].
//!
//! # Key Components
//! - [`ParseTree`] - The node trait: children, text and rule-specific listener hooks
//! - [`TerminalNode`] / [`ErrorNode`] / [`ParserRuleContext`] - Concrete node types
//! - [`ParseTreeListener`] - Generic walker callbacks
//! - [`ParseTreeWalker`] / [`IterativeParseTreeWalker`] - Recursive and stack-based walkers
//! - [`TextChunk`] / [`TagChunk`] - Pieces of a tree pattern
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use parsecore::tree::{
//!     default_walker, ParseTreeListener, ParserRuleContext, TerminalNode, Token, TreeWalker,
//! };
//!
//! #[derive(Default)]
//! struct TokenCounter(usize);
//!
//! impl ParseTreeListener for TokenCounter {
//!     fn visit_terminal(&mut self, _node: &TerminalNode) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut inner = ParserRuleContext::new(1);
//! inner.add_token(Token::new(4, "x"));
//! let mut root = ParserRuleContext::new(0);
//! root.add_child(Arc::new(inner));
//! root.add_token(Token::new(5, ";"));
//!
//! let mut counter = TokenCounter::default();
//! default_walker().walk(&mut counter, &root);
//! assert_eq!(counter.0, 2);
//! ```

mod listener;
mod node;
mod pattern;
mod token;
mod walker;

pub use listener::ParseTreeListener;
pub use node::{ErrorNode, NodeKind, ParseTree, ParseTreeRc, ParserRuleContext, TerminalNode};
pub use pattern::{Chunk, TagChunk, TextChunk};
pub use token::{Token, EOF};
pub use walker::{default_walker, IterativeParseTreeWalker, ParseTreeWalker, TreeWalker};
