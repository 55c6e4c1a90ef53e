//! Depth-first listener dispatch over parse trees.
//!
//! Both walkers produce the same callback sequence for a node:
//!
//! 1. error node: `visit_error_node`, children are not visited
//! 2. terminal node: `visit_terminal`
//! 3. any other node: `enter_every_rule`, the node's `enter_rule` hook, every child left to
//!    right, the node's `exit_rule` hook, `exit_every_rule`
//!
//! [`ParseTreeWalker`] recurses, [`IterativeParseTreeWalker`] keeps an explicit stack and is
//! safe for arbitrarily deep trees. Dropping such trees is iterative as well, see
//! [`ParserRuleContext`](crate::tree::ParserRuleContext).

use crate::tree::{NodeKind, ParseTree, ParseTreeListener};

/// Dispatches listener callbacks over a tree.
pub trait TreeWalker {
    /// Walks `tree` depth-first, invoking `listener` for every node exactly once.
    fn walk(&self, listener: &mut dyn ParseTreeListener, tree: &dyn ParseTree);
}

/// Recursive walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseTreeWalker;

/// Walker with an explicit stack; see [`default_walker`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IterativeParseTreeWalker;

static DEFAULT_WALKER: IterativeParseTreeWalker = IterativeParseTreeWalker;

/// The walker to use when there is no reason to pick one.
#[must_use]
pub fn default_walker() -> &'static IterativeParseTreeWalker {
    &DEFAULT_WALKER
}

/// Runs the leaf callback or the enter half of a rule node.
///
/// Returns `true` if `node` is a rule node whose children still need walking.
fn enter(listener: &mut dyn ParseTreeListener, node: &dyn ParseTree) -> bool {
    match NodeKind::of(node) {
        NodeKind::Error(error) => {
            listener.visit_error_node(error);
            false
        }
        NodeKind::Terminal(terminal) => {
            listener.visit_terminal(terminal);
            false
        }
        NodeKind::Rule(rule) => {
            listener.enter_every_rule(rule);
            rule.enter_rule(listener);
            true
        }
    }
}

fn exit(listener: &mut dyn ParseTreeListener, rule: &dyn ParseTree) {
    rule.exit_rule(listener);
    listener.exit_every_rule(rule);
}

impl TreeWalker for ParseTreeWalker {
    fn walk(&self, listener: &mut dyn ParseTreeListener, tree: &dyn ParseTree) {
        if !enter(listener, tree) {
            return;
        }

        for child in tree.children() {
            self.walk(listener, child.as_ref());
        }

        exit(listener, tree);
    }
}

impl TreeWalker for IterativeParseTreeWalker {
    fn walk(&self, listener: &mut dyn ParseTreeListener, tree: &dyn ParseTree) {
        if !enter(listener, tree) {
            return;
        }

        // Rule nodes being walked, with the index of the next child to visit
        let mut stack: Vec<(&dyn ParseTree, usize)> = vec![(tree, 0)];

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            top.1 += 1;

            match node.children().get(next) {
                Some(child) => {
                    let child = child.as_ref();
                    if enter(listener, child) {
                        stack.push((child, 0));
                    }
                }
                None => {
                    stack.pop();
                    exit(listener, node);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test::{error, rule, terminal, RecordingListener};

    fn sample() -> Arc<dyn ParseTree> {
        rule(
            "root",
            vec![
                terminal("A"),
                rule("B", vec![terminal("b")]),
                error("C"),
            ],
        )
    }

    const EXPECTED: &[&str] = &[
        "enter_every(root)",
        "enter(root)",
        "terminal(A)",
        "enter_every(B)",
        "enter(B)",
        "terminal(b)",
        "exit(B)",
        "exit_every(B)",
        "error(C)",
        "exit(root)",
        "exit_every(root)",
    ];

    #[test]
    fn recursive_order() {
        let tree = sample();
        let mut listener = RecordingListener::default();
        ParseTreeWalker.walk(&mut listener, tree.as_ref());
        assert_eq!(listener.events, EXPECTED);
    }

    #[test]
    fn iterative_order() {
        let tree = sample();
        let mut listener = RecordingListener::default();
        default_walker().walk(&mut listener, tree.as_ref());
        assert_eq!(listener.events, EXPECTED);
    }

    #[test]
    fn leaf_roots() {
        for walker in [&ParseTreeWalker as &dyn TreeWalker, default_walker()] {
            let mut listener = RecordingListener::default();
            walker.walk(&mut listener, error("E").as_ref());
            walker.walk(&mut listener, terminal("T").as_ref());
            assert_eq!(listener.events, vec!["error(E)", "terminal(T)"]);
        }
    }

    #[test]
    fn empty_rule() {
        let tree = rule("empty", Vec::new());
        let mut listener = RecordingListener::default();
        default_walker().walk(&mut listener, tree.as_ref());
        assert_eq!(
            listener.events,
            vec!["enter_every(empty)", "enter(empty)", "exit(empty)", "exit_every(empty)"]
        );
    }

    #[test]
    fn deep_tree_iterative() {
        let mut tree = terminal("leaf");
        for depth in 0..100_000 {
            tree = rule(if depth % 2 == 0 { "even" } else { "odd" }, vec![tree]);
        }

        let mut listener = RecordingListener::default();
        default_walker().walk(&mut listener, tree.as_ref());
        assert_eq!(listener.events.len(), 100_000 * 4 + 1);
        assert_eq!(listener.events[100_000 * 2], "terminal(leaf)");
    }

    #[test]
    fn deep_tree_drops_without_recursion() {
        let leaf = terminal("leaf");
        let mut tree = Arc::clone(&leaf);
        for _ in 0..200_000 {
            tree = rule("nested", vec![tree]);
        }
        assert_eq!(Arc::strong_count(&leaf), 2);

        drop(tree);
        assert_eq!(Arc::strong_count(&leaf), 1);
    }

    #[test]
    fn shared_subtrees_survive_drop() {
        let shared = rule("shared", vec![terminal("x")]);
        let outer = rule("outer", vec![Arc::clone(&shared), terminal("y")]);

        drop(outer);
        assert_eq!(Arc::strong_count(&shared), 1);
        assert_eq!(shared.text(), "x");
    }
}
