//! Parse-tree node types.
//!
//! Nodes are open for extension: a generated rule context embeds [`ParserRuleContext`] as its
//! base, declares it with [`crate::impl_rtti!`] and overrides the `enter_rule` / `exit_rule` hooks
//! to call its grammar-specific listener methods. Terminal and error nodes are concrete types;
//! [`ErrorNode`] extends [`TerminalNode`], so anything that handles terminals by ancestry also
//! handles error nodes.

use std::{fmt, sync::Arc};

use crate::{
    rtti::{self, Rtti},
    tree::{ParseTreeListener, Token},
};

/// Shared handle to a node of a parse tree.
pub type ParseTreeRc = Arc<dyn ParseTree>;

/// A node of a parse tree.
pub trait ParseTree: Rtti + fmt::Debug {
    /// Children in source order; empty for leaves.
    fn children(&self) -> &[ParseTreeRc] {
        &[]
    }

    /// Text covered by the node, the concatenation of its leaves.
    fn text(&self) -> String;

    /// Rule-specific hook run by walkers after `enter_every_rule`.
    fn enter_rule(&self, _listener: &mut dyn ParseTreeListener) {}

    /// Rule-specific hook run by walkers before `exit_every_rule`.
    fn exit_rule(&self, _listener: &mut dyn ParseTreeListener) {}
}

/// What a walker does with a node, decided by its runtime type.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    /// An error node; checked first because error nodes are also terminals
    Error(&'a ErrorNode),
    /// A terminal (token) node
    Terminal(&'a TerminalNode),
    /// Any other node, treated as a rule node
    Rule(&'a dyn ParseTree),
}

impl<'a> NodeKind<'a> {
    /// Classifies `node`.
    #[must_use]
    pub fn of(node: &'a dyn ParseTree) -> Self {
        if let Some(error) = rtti::cast::<ErrorNode, dyn ParseTree>(node) {
            NodeKind::Error(error)
        } else if let Some(terminal) = rtti::cast::<TerminalNode, dyn ParseTree>(node) {
            NodeKind::Terminal(terminal)
        } else {
            NodeKind::Rule(node)
        }
    }
}

/// Leaf holding a matched token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalNode {
    symbol: Token,
}

impl TerminalNode {
    /// Creates a leaf for `symbol`.
    #[must_use]
    pub fn new(symbol: Token) -> Self {
        TerminalNode { symbol }
    }

    /// The token of the leaf.
    #[must_use]
    pub fn symbol(&self) -> &Token {
        &self.symbol
    }
}

impl ParseTree for TerminalNode {
    fn text(&self) -> String {
        self.symbol.text.clone()
    }
}

impl fmt::Display for TerminalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_eof() {
            f.write_str("<EOF>")
        } else {
            f.write_str(&self.symbol.text)
        }
    }
}

impl_rtti!(TerminalNode);

/// Leaf for a token consumed or conjured during error recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    base: TerminalNode,
}

impl ErrorNode {
    /// Creates an error leaf for `symbol`.
    #[must_use]
    pub fn new(symbol: Token) -> Self {
        ErrorNode {
            base: TerminalNode::new(symbol),
        }
    }

    /// The token of the leaf.
    #[must_use]
    pub fn symbol(&self) -> &Token {
        self.base.symbol()
    }
}

impl ParseTree for ErrorNode {
    fn text(&self) -> String {
        self.base.text()
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.base, f)
    }
}

impl_rtti!(ErrorNode => base);

/// Interior node produced by a rule invocation.
#[derive(Debug, Clone, Default)]
pub struct ParserRuleContext {
    rule_index: usize,
    children: Vec<ParseTreeRc>,
}

impl ParserRuleContext {
    /// Creates a childless context for rule `rule_index`.
    #[must_use]
    pub fn new(rule_index: usize) -> Self {
        ParserRuleContext {
            rule_index,
            children: Vec::new(),
        }
    }

    /// The rule this context was created for.
    #[must_use]
    pub fn rule_index(&self) -> usize {
        self.rule_index
    }

    /// Appends `child`.
    pub fn add_child(&mut self, child: ParseTreeRc) {
        self.children.push(child);
    }

    /// Appends a terminal leaf for `symbol`.
    pub fn add_token(&mut self, symbol: Token) {
        self.add_child(Arc::new(TerminalNode::new(symbol)));
    }

    /// Appends an error leaf for `symbol`.
    pub fn add_error(&mut self, symbol: Token) {
        self.add_child(Arc::new(ErrorNode::new(symbol)));
    }

    /// Builder form of [`ParserRuleContext::add_child`].
    #[must_use]
    pub fn with_child(mut self, child: ParseTreeRc) -> Self {
        self.add_child(child);
        self
    }

    /// The child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&ParseTreeRc> {
        self.children.get(index)
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Children that are exactly or extend `T`, in order.
    pub fn children_of<T: ParseTree>(&self) -> impl Iterator<Item = &T> + '_ {
        self.children
            .iter()
            .filter_map(|child| rtti::cast::<T, dyn ParseTree>(child.as_ref()))
    }
}

impl ParseTree for ParserRuleContext {
    fn children(&self) -> &[ParseTreeRc] {
        &self.children
    }

    fn text(&self) -> String {
        self.children.iter().map(|child| child.text()).collect()
    }
}

impl_rtti!(ParserRuleContext);

// Detaches grandchildren before each child is released, so dropping a deep tree does not recurse
// once per level. Derived contexts are reached through their embedded `ParserRuleContext`.
impl Drop for ParserRuleContext {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            if let Some(rule) = Arc::get_mut(&mut child)
                .and_then(rtti::cast_mut::<ParserRuleContext, dyn ParseTree>)
            {
                pending.append(&mut rule.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_prefers_error() {
        let error = ErrorNode::new(Token::new(3, "?"));
        assert!(matches!(NodeKind::of(&error), NodeKind::Error(_)));
        assert!(rtti::is_a::<TerminalNode, _>(&error));

        let terminal = TerminalNode::new(Token::new(3, "x"));
        assert!(matches!(NodeKind::of(&terminal), NodeKind::Terminal(_)));

        let rule = ParserRuleContext::new(0);
        assert!(matches!(NodeKind::of(&rule), NodeKind::Rule(_)));
    }

    #[test]
    fn text_concatenates_leaves() {
        let mut inner = ParserRuleContext::new(1);
        inner.add_token(Token::new(1, "b"));
        inner.add_error(Token::new(2, "c"));

        let mut root = ParserRuleContext::new(0);
        root.add_token(Token::new(1, "a"));
        root.add_child(Arc::new(inner));
        root.add_token(Token::new(1, "d"));

        assert_eq!(root.text(), "abcd");
        assert_eq!(root.child_count(), 3);
        assert_eq!(root.children_of::<TerminalNode>().count(), 2);
        assert_eq!(root.children_of::<ParserRuleContext>().count(), 1);
    }

    #[test]
    fn eof_display() {
        assert_eq!(TerminalNode::new(Token::eof()).to_string(), "<EOF>");
        assert_eq!(ErrorNode::new(Token::new(4, "x")).to_string(), "x");
    }
}
