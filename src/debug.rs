//! Construction-time debugging and token tree inspection.
//!
//! A [`DebugHook`] installed on a definition observes every node as it is
//! allocated, which is enough to reconstruct the grammar's shape without
//! instrumenting the hot matching path. [`TraceHook`] forwards the events
//! to `tracing` at trace level.
//!
//! [`print_tree`] renders a produced token tree with rule names and source
//! excerpts, one line per token, indented by depth.

use std::fmt::Write as _;

use crate::base::ScopeId;
use crate::definition::SyntaxDefinition;
use crate::node::{NodeId, NodeTag};
use crate::token::{TokenId, TokenTree};

/// Observer for grammar construction events.
pub trait DebugHook: Send + Sync {
    /// Called once per allocated node, in allocation order.
    fn node_added(&self, scope: ScopeId, id: NodeId, tag: NodeTag);
}

/// A [`DebugHook`] that logs every allocated node via `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceHook;

impl DebugHook for TraceHook {
    fn node_added(&self, scope: ScopeId, id: NodeId, tag: NodeTag) {
        tracing::trace!(scope = scope.value(), node = ?id, kind = ?tag, "node added");
    }
}

/// Render a token tree over its source text, one token per line.
///
/// Rule names are resolved against `definition`; tokens produced by an
/// invoked sub-grammar carry a foreign scope and are shown by raw rule
/// index instead.
pub fn print_tree(definition: &SyntaxDefinition, tree: &TokenTree, text: &str) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        print_token(definition, tree, text, root, 0, &mut out);
    }
    out
}

fn print_token(
    definition: &SyntaxDefinition,
    tree: &TokenTree,
    text: &str,
    token: TokenId,
    depth: usize,
    out: &mut String,
) {
    let range = tree.range(token);
    let excerpt: String = text
        .get(range.clone())
        .unwrap_or("")
        .chars()
        .take(32)
        .map(|c| if c.is_control() { '.' } else { c })
        .collect();

    for _ in 0..depth {
        out.push_str("  ");
    }
    if tree.scope(token) == definition.scope() {
        match definition.rule_name(tree.rule(token)) {
            Some(name) => {
                let _ = write!(out, "{name}");
            }
            None => {
                let _ = write!(out, "rule#{}", tree.rule(token).index());
            }
        }
    } else {
        let _ = write!(out, "scope{}:rule#{}", tree.scope(token).value(), tree.rule(token).index());
    }
    let _ = writeln!(out, " [{}, {}) {excerpt:?}", range.start, range.end);

    for child in tree.children(token) {
        print_token(definition, tree, text, *child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_tree_nested() {
        let mut def = SyntaxDefinition::new("pair");
        let digit = def.range(b'0', b'9');
        let digits = def.at_least(1, digit);
        def.rule("number", digits).unwrap();
        let first = def.reference("number");
        let comma = def.chr(b',');
        let second = def.reference("number");
        let body = def.glue(&[first, comma, second]);
        def.rule("pair", body).unwrap();
        def.entry("pair").unwrap();
        def.link().unwrap();

        let text = "12,345";
        let result = def.match_at(text, 0).unwrap().expect("match");
        let rendered = print_tree(&def, result.tree(), text);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("pair [0, 6)"));
        assert!(lines[1].starts_with("  number [0, 2)"));
        assert!(lines[2].starts_with("  number [3, 6)"));
    }
}
