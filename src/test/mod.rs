//! Fixtures shared by the unit tests: a listener that records every callback and builders for
//! small parse trees.

use std::sync::Arc;

use crate::{
    rtti,
    tree::{
        ErrorNode, ParseTree, ParseTreeListener, ParseTreeRc, ParserRuleContext, TerminalNode,
        Token,
    },
};

/// Rule context carrying a display name, used to make recorded events readable.
#[derive(Debug)]
pub struct NamedRule {
    base: ParserRuleContext,
    pub name: &'static str,
}

impl_rtti!(NamedRule => base);

impl ParseTree for NamedRule {
    fn children(&self) -> &[ParseTreeRc] {
        self.base.children()
    }

    fn text(&self) -> String {
        self.base.text()
    }

    fn enter_rule(&self, listener: &mut dyn ParseTreeListener) {
        if let Some(recorder) = listener.downcast_mut::<RecordingListener>() {
            recorder.events.push(format!("enter({})", self.name));
        }
    }

    fn exit_rule(&self, listener: &mut dyn ParseTreeListener) {
        if let Some(recorder) = listener.downcast_mut::<RecordingListener>() {
            recorder.events.push(format!("exit({})", self.name));
        }
    }
}

/// Records every walker callback as a short string.
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub events: Vec<String>,
}

fn rule_name(ctx: &dyn ParseTree) -> &'static str {
    rtti::cast::<NamedRule, dyn ParseTree>(ctx).map_or("?", |rule| rule.name)
}

impl ParseTreeListener for RecordingListener {
    fn visit_terminal(&mut self, node: &TerminalNode) {
        self.events.push(format!("terminal({})", node.symbol().text));
    }

    fn visit_error_node(&mut self, node: &ErrorNode) {
        self.events.push(format!("error({})", node.symbol().text));
    }

    fn enter_every_rule(&mut self, ctx: &dyn ParseTree) {
        self.events.push(format!("enter_every({})", rule_name(ctx)));
    }

    fn exit_every_rule(&mut self, ctx: &dyn ParseTree) {
        self.events.push(format!("exit_every({})", rule_name(ctx)));
    }
}

// Helper function to create a terminal leaf
pub fn terminal(text: &str) -> ParseTreeRc {
    Arc::new(TerminalNode::new(Token::new(1, text)))
}

// Helper function to create an error leaf
pub fn error(text: &str) -> ParseTreeRc {
    Arc::new(ErrorNode::new(Token::new(0, text)))
}

// Helper function to create a named rule node
pub fn rule(name: &'static str, children: Vec<ParseTreeRc>) -> ParseTreeRc {
    let mut base = ParserRuleContext::new(0);
    for child in children {
        base.add_child(child);
    }

    Arc::new(NamedRule { base, name })
}
