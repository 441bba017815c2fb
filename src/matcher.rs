//! The matching engine.
//!
//! Matching walks the node graph recursively: each node first matches its
//! own construct at the current position, then hands the resulting position
//! to its `next` continuation. A position is `Some(end)` on success and
//! `None` on failure; there is no partial-failure state.
//!
//! Backtracking discipline:
//! - a failing node restores the token tree before returning, by rolling
//!   the current parent's child list back to a checkpoint taken on entry;
//! - greedy repetition is possessive (it never gives back entries once the
//!   loop has finished), lazy repetition is the only construct that retries
//!   its own continuation;
//! - ordered choice commits to the first alternative whose own match
//!   succeeds; a later continuation failure does not reopen it.
//!
//! Match state changes are deliberately *not* rolled back: flags, chars and
//! strings written inside a failing branch stay written.

use tracing::trace;

use crate::base::RuleId;
use crate::buffer::Buffer;
use crate::definition::SyntaxDefinition;
use crate::node::{NodeId, NodeKind, RefMode};
use crate::state::MatchState;
use crate::token::{Checkpoint, TokenId, TokenTree};

/// Saved child-list length of the current parent, if there is one.
fn mark(tree: &TokenTree, parent: Option<TokenId>) -> Option<Checkpoint> {
    parent.map(|p| tree.checkpoint(p))
}

fn restore(tree: &mut TokenTree, parent: Option<TokenId>, saved: Option<Checkpoint>) {
    if let (Some(p), Some(m)) = (parent, saved) {
        tree.rollback(p, m);
    }
}

impl SyntaxDefinition {
    /// Match one named rule at position `i`.
    ///
    /// With `produce` set, a token is appended under `parent` before the
    /// body runs, finalized on success and unlinked on failure. Void rules
    /// additionally dissolve: the wrapper is unlinked and its children are
    /// spliced into `parent`.
    pub(crate) fn match_rule(
        &self,
        rule: RuleId,
        media: &Buffer<'_>,
        i: usize,
        tree: &mut TokenTree,
        produce: bool,
        parent: Option<TokenId>,
        state: &mut Option<&mut MatchState>,
    ) -> Option<usize> {
        let entry = self.rules[rule.index()].entry;
        let token = if produce { Some(tree.produce(self.scope, rule, i, parent)) } else { None };
        let body_parent = if produce { token } else { parent };

        match self.match_next(media, i, entry, tree, produce, body_parent, state) {
            Some(end) => {
                if let Some(token) = token {
                    tree.set_range(token, i, end);
                    if self.rules[rule.index()].is_void {
                        if let Some(parent) = parent {
                            tree.unlink(token);
                            tree.splice_children(token, parent);
                        }
                    }
                }
                Some(end)
            }
            None => {
                if let Some(token) = token {
                    tree.unlink(token);
                }
                trace!(
                    rule = self.rule_name(rule).unwrap_or("?"),
                    at = i,
                    "rule failed"
                );
                None
            }
        }
    }

    /// Hand a successful position to the node's continuation, or return it
    /// unchanged when the chain ends here.
    fn continue_from(
        &self,
        media: &Buffer<'_>,
        i: usize,
        node: NodeId,
        tree: &mut TokenTree,
        produce: bool,
        parent: Option<TokenId>,
        state: &mut Option<&mut MatchState>,
    ) -> Option<usize> {
        match self.node(node).next {
            Some(next) => self.match_next(media, i, next, tree, produce, parent, state),
            None => Some(i),
        }
    }

    /// Match the node `node` (and its whole continuation chain) at `i`.
    pub(crate) fn match_next(
        &self,
        media: &Buffer<'_>,
        i: usize,
        node: NodeId,
        tree: &mut TokenTree,
        produce: bool,
        parent: Option<TokenId>,
        state: &mut Option<&mut MatchState>,
    ) -> Option<usize> {
        match &self.node(node).kind {
            NodeKind::Char { ch, invert } => match media.get(i) {
                Some(byte) if (byte == *ch) != *invert => {
                    self.continue_from(media, i + 1, node, tree, produce, parent, state)
                }
                _ => None,
            },

            NodeKind::Any => match media.get(i) {
                Some(_) => self.continue_from(media, i + 1, node, tree, produce, parent, state),
                None => None,
            },

            NodeKind::Range { lo, hi, invert } => match media.get(i) {
                Some(byte) if (*lo <= byte && byte <= *hi) != *invert => {
                    self.continue_from(media, i + 1, node, tree, produce, parent, state)
                }
                _ => None,
            },

            NodeKind::Set { chars, invert } => match media.get(i) {
                Some(byte) if chars.contains(&byte) != *invert => {
                    self.continue_from(media, i + 1, node, tree, produce, parent, state)
                }
                _ => None,
            },

            NodeKind::Literal { text } => {
                let end = i + text.len();
                if end <= media.len() && media.slice(i, end) == &text[..] {
                    self.continue_from(media, end, node, tree, produce, parent, state)
                } else {
                    None
                }
            }

            NodeKind::Keyword { trie } => match trie.lookup(media, i) {
                Some((end, token_type)) => {
                    if produce {
                        if let Some(parent) = parent {
                            tree.set_token_type(parent, token_type);
                        }
                    }
                    self.continue_from(media, end, node, tree, produce, parent, state)
                }
                None => None,
            },

            NodeKind::Repeat { min, max, entry } => {
                let outer = mark(tree, parent);
                let mut at = i;
                let mut count = 0usize;
                while count < *max {
                    let step = mark(tree, parent);
                    match self.match_next(media, at, *entry, tree, produce, parent, state) {
                        Some(end) => {
                            // A zero-width entry repeats without progress;
                            // it satisfies any remaining count at once.
                            if end == at {
                                count = *max;
                                break;
                            }
                            at = end;
                            count += 1;
                        }
                        None => {
                            restore(tree, parent, step);
                            break;
                        }
                    }
                }
                let result = if count >= *min {
                    self.continue_from(media, at, node, tree, produce, parent, state)
                } else {
                    None
                };
                if result.is_none() {
                    restore(tree, parent, outer);
                }
                result
            }

            NodeKind::LazyRepeat { min, entry } => {
                let outer = mark(tree, parent);
                let mut at = i;
                let mut count = 0usize;
                loop {
                    if count >= *min {
                        let attempt = mark(tree, parent);
                        if let Some(end) =
                            self.continue_from(media, at, node, tree, produce, parent, state)
                        {
                            return Some(end);
                        }
                        restore(tree, parent, attempt);
                    }
                    let step = mark(tree, parent);
                    match self.match_next(media, at, *entry, tree, produce, parent, state) {
                        Some(end) if end > at => {
                            at = end;
                            count += 1;
                        }
                        _ => {
                            restore(tree, parent, step);
                            restore(tree, parent, outer);
                            return None;
                        }
                    }
                }
            }

            NodeKind::Length { min, max, entry } => {
                let outer = mark(tree, parent);
                let result = match self.match_next(media, i, *entry, tree, produce, parent, state)
                {
                    Some(end) if *min <= end - i && end - i <= *max => {
                        self.continue_from(media, end, node, tree, produce, parent, state)
                    }
                    _ => None,
                };
                if result.is_none() {
                    restore(tree, parent, outer);
                }
                result
            }

            NodeKind::Choice { alternatives } => {
                let outer = mark(tree, parent);
                let mut hit = None;
                for alternative in alternatives.iter() {
                    let attempt = mark(tree, parent);
                    match self.match_next(media, i, *alternative, tree, produce, parent, state) {
                        Some(end) => {
                            hit = Some(end);
                            break;
                        }
                        None => restore(tree, parent, attempt),
                    }
                }
                let result = match hit {
                    Some(end) => {
                        self.continue_from(media, end, node, tree, produce, parent, state)
                    }
                    None => None,
                };
                if result.is_none() {
                    restore(tree, parent, outer);
                }
                result
            }

            NodeKind::Ahead { entry, invert } => {
                let found =
                    self.match_next(media, i, *entry, tree, false, parent, state).is_some();
                if found != *invert {
                    self.continue_from(media, i, node, tree, produce, parent, state)
                } else {
                    None
                }
            }

            NodeKind::Behind { entry, invert } => {
                let window = media.truncated(i);
                let mut found = false;
                for j in (0..=i).rev() {
                    if self.match_next(&window, j, *entry, tree, false, parent, state) == Some(i) {
                        found = true;
                        break;
                    }
                }
                if found != *invert {
                    self.continue_from(media, i, node, tree, produce, parent, state)
                } else {
                    None
                }
            }

            NodeKind::Boi => {
                if i == 0 {
                    self.continue_from(media, i, node, tree, produce, parent, state)
                } else {
                    None
                }
            }

            NodeKind::Eoi => {
                if i == media.len() {
                    self.continue_from(media, i, node, tree, produce, parent, state)
                } else {
                    None
                }
            }

            NodeKind::Pass => self.continue_from(media, i, node, tree, produce, parent, state),

            NodeKind::Never => None,

            NodeKind::Find { entry } => {
                let outer = mark(tree, parent);
                let mut hit = None;
                // Inclusive upper bound: a zero-width entry may still match
                // at end of input.
                for j in i..=media.len() {
                    let attempt = mark(tree, parent);
                    match self.match_next(media, j, *entry, tree, produce, parent, state) {
                        Some(end) => {
                            hit = Some(end);
                            break;
                        }
                        None => restore(tree, parent, attempt),
                    }
                }
                let result = match hit {
                    Some(end) => {
                        self.continue_from(media, end, node, tree, produce, parent, state)
                    }
                    None => None,
                };
                if result.is_none() {
                    restore(tree, parent, outer);
                }
                result
            }

            NodeKind::LinkRef { mode: RefMode::Normal, target, .. } => {
                let Some(rule) = *target else { return None };
                let outer = mark(tree, parent);
                let result = match self.match_rule(rule, media, i, tree, produce, parent, state) {
                    Some(end) => {
                        self.continue_from(media, end, node, tree, produce, parent, state)
                    }
                    None => None,
                };
                if result.is_none() {
                    restore(tree, parent, outer);
                }
                result
            }

            NodeKind::LinkRef { mode: RefMode::Inline, target, .. } => {
                let Some(rule) = *target else { return None };
                let entry = self.rules[rule.index()].entry;
                let outer = mark(tree, parent);
                let result = match self.match_next(media, i, entry, tree, produce, parent, state)
                {
                    Some(end) => {
                        self.continue_from(media, end, node, tree, produce, parent, state)
                    }
                    None => None,
                };
                if result.is_none() {
                    restore(tree, parent, outer);
                }
                result
            }

            NodeKind::LinkRef { mode: RefMode::Before, target, .. } => {
                let Some(rule) = *target else { return None };
                // The assertion is about the token of the rule currently
                // being matched: its previous sibling in the enclosing
                // parent must come from the referenced rule.
                let previous = parent.and_then(|p| tree.prev_sibling(p));
                match previous {
                    Some(prev)
                        if tree.rule(prev) == rule && tree.scope(prev) == self.scope =>
                    {
                        self.continue_from(media, i, node, tree, produce, parent, state)
                    }
                    _ => None,
                }
            }

            NodeKind::Call { index } => {
                match (self.calls[*index])(media, i, state.as_deref_mut()) {
                    Some(end) => {
                        self.continue_from(media, end, node, tree, produce, parent, state)
                    }
                    None => None,
                }
            }

            NodeKind::SetFlag { flag, value } => {
                if let Some(st) = state.as_deref_mut() {
                    st.set_flag(*flag, *value);
                }
                self.continue_from(media, i, node, tree, produce, parent, state)
            }

            NodeKind::If { flag, then_branch, else_branch } => {
                let value = match state.as_deref() {
                    Some(st) => st.flag(*flag),
                    None => self.flag_default(*flag),
                };
                let branch = if value { *then_branch } else { *else_branch };
                match branch {
                    Some(branch) => {
                        let outer = mark(tree, parent);
                        let result = match self
                            .match_next(media, i, branch, tree, produce, parent, state)
                        {
                            Some(end) => {
                                self.continue_from(media, end, node, tree, produce, parent, state)
                            }
                            None => None,
                        };
                        if result.is_none() {
                            restore(tree, parent, outer);
                        }
                        result
                    }
                    None => self.continue_from(media, i, node, tree, produce, parent, state),
                }
            }

            NodeKind::GetChar { slot } => match media.get(i) {
                Some(byte) => {
                    if let Some(st) = state.as_deref_mut() {
                        st.set_char(*slot, byte);
                    }
                    self.continue_from(media, i + 1, node, tree, produce, parent, state)
                }
                None => None,
            },

            NodeKind::SetChar { slot, value } => {
                if let Some(st) = state.as_deref_mut() {
                    st.set_char(*slot, *value);
                }
                self.continue_from(media, i, node, tree, produce, parent, state)
            }

            NodeKind::VarChar { slot, invert } => {
                let expected = match state.as_deref() {
                    Some(st) => st.char(*slot),
                    None => self.char_default(*slot),
                };
                match media.get(i) {
                    Some(byte) if (byte == expected) != *invert => {
                        self.continue_from(media, i + 1, node, tree, produce, parent, state)
                    }
                    _ => None,
                }
            }

            NodeKind::GetString { slot, termination } => {
                let mut end = media.len();
                for j in i..media.len() {
                    if self
                        .match_next(media, j, *termination, tree, false, parent, state)
                        .is_some()
                    {
                        end = j;
                        break;
                    }
                }
                let captured = media.slice(i, end).to_vec();
                if let Some(st) = state.as_deref_mut() {
                    st.set_string(*slot, captured);
                }
                // The termination itself is left for the continuation.
                self.continue_from(media, end, node, tree, produce, parent, state)
            }

            NodeKind::VarString { slot } => {
                let expected: Vec<u8> = match state.as_deref() {
                    Some(st) => st.string(*slot).to_vec(),
                    None => self.string_default(*slot).to_vec(),
                };
                let end = i + expected.len();
                if end <= media.len() && media.slice(i, end) == expected.as_slice() {
                    self.continue_from(media, end, node, tree, produce, parent, state)
                } else {
                    None
                }
            }

            NodeKind::Invoke { definition, termination } => {
                let Some(sub_entry) = definition.entry else { return None };

                let limit = match termination {
                    Some(termination) => {
                        let mut stop = media.len();
                        for j in i..media.len() {
                            if self
                                .match_next(media, j, *termination, tree, false, parent, state)
                                .is_some()
                            {
                                stop = j;
                                break;
                            }
                        }
                        stop
                    }
                    None => media.len(),
                };
                let window = media.truncated(limit);

                let mut child = if definition.has_state() {
                    let reused = state
                        .as_deref_mut()
                        .and_then(|st| st.take_child(definition.scope));
                    Some(reused.unwrap_or_else(|| Box::new(definition.new_state())))
                } else {
                    None
                };
                let mut child_ref = child.as_deref_mut();

                let outer = mark(tree, parent);
                let result = definition
                    .match_rule(sub_entry, &window, i, tree, produce, parent, &mut child_ref);

                if let Some(child) = child {
                    if let Some(st) = state.as_deref_mut() {
                        st.adopt_child(child);
                    }
                }

                let result = match result {
                    Some(end) => {
                        self.continue_from(media, end, node, tree, produce, parent, state)
                    }
                    None => None,
                };
                if result.is_none() {
                    restore(tree, parent, outer);
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::definition::SyntaxDefinition;

    fn linked(build: impl FnOnce(&mut SyntaxDefinition)) -> SyntaxDefinition {
        let mut def = SyntaxDefinition::new("test");
        build(&mut def);
        def.link().expect("link");
        def
    }

    #[test]
    fn test_sequence_and_choice() {
        let def = linked(|def| {
            let a = def.string("ab");
            let b = def.string("ac");
            let either = def.choice(&[a, b]);
            let bang = def.chr(b'!');
            let body = def.glue(&[either, bang]);
            def.rule("word", body).unwrap();
            def.entry("word").unwrap();
        });
        assert!(def.matches("ab!").unwrap());
        assert!(def.matches("ac!").unwrap());
        assert!(!def.matches("ad!").unwrap());
    }

    #[test]
    fn test_greedy_repeat_is_possessive() {
        // many(any) consumes everything; the trailing byte can never match.
        let def = linked(|def| {
            let any = def.any();
            let all = def.many(any);
            let tail = def.chr(b'x');
            let body = def.glue(&[all, tail]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        assert!(!def.matches("aaax").unwrap());
    }

    #[test]
    fn test_lazy_repeat_yields_to_continuation() {
        let def = linked(|def| {
            let any = def.any();
            let some = def.lazy_repeat(0, any);
            let tail = def.chr(b'x');
            let body = def.glue(&[some, tail]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        let result = def.match_at("aaax", 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..4);
        // Stops at the first continuation success.
        let result = def.match_at("xx", 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..1);
    }

    #[test]
    fn test_lookahead_consumes_nothing() {
        let def = linked(|def| {
            let probe = def.string("ab");
            let ahead = def.ahead(probe);
            let a = def.chr(b'a');
            let body = def.glue(&[ahead, a]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        let result = def.match_at("ab", 0).unwrap().expect("match");
        assert_eq!(result.end(), 1);
        assert!(!def.matches("ac").unwrap());
    }

    #[test]
    fn test_lookbehind() {
        let def = linked(|def| {
            let a = def.chr(b'a');
            let behind = def.behind(a);
            let b = def.chr(b'b');
            let any = def.any();
            let body = def.glue(&[any, behind, b]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        assert!(def.matches("ab").unwrap());
        assert!(!def.matches("cb").unwrap());
    }

    #[test]
    fn test_find_scans_forward() {
        let def = linked(|def| {
            let open = def.string("/*");
            let close = def.string("*/");
            let scan = def.find(close);
            let body = def.glue(&[open, scan]);
            def.rule("comment", body).unwrap();
            def.entry("comment").unwrap();
        });
        let result = def.match_at("/* hello */", 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..11);
        assert!(def.match_at("/* open", 0).unwrap().is_none());
    }

    #[test]
    fn test_find_reaches_end_of_input() {
        // find(EOI) must be allowed to probe at the buffer length itself.
        let def = linked(|def| {
            let text = def.string("ab");
            let eoi = def.eoi();
            let scan = def.find(eoi);
            let body = def.glue(&[text, scan]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        let result = def.match_at("ab", 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..2);
    }

    #[test]
    fn test_repeat_of_zero_width_entry_meets_minimum() {
        // A non-consuming entry cannot advance; one pass over it counts
        // as the full quota instead of looping forever or under-counting.
        let def = linked(|def| {
            let nothing = def.pass();
            let run = def.repeat(3, 5, nothing);
            let a = def.chr(b'a');
            let body = def.glue(&[run, a]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        let result = def.match_at("a", 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..1);
    }

    #[test]
    fn test_boundaries() {
        let def = linked(|def| {
            let boi = def.boi();
            let a = def.chr(b'a');
            let eoi = def.eoi();
            let body = def.glue(&[boi, a, eoi]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        assert!(def.matches("a").unwrap());
        assert!(!def.matches("ab").unwrap());
        assert!(def.match_at("xa", 1).unwrap().is_none());
    }

    #[test]
    fn test_length_bounds() {
        let def = linked(|def| {
            let digit = def.range(b'0', b'9');
            let digits = def.at_least(1, digit);
            let bounded = def.length(2, 3, digits);
            def.rule("num", bounded).unwrap();
            def.entry("num").unwrap();
        });
        assert!(!def.matches("1").unwrap());
        assert!(def.matches("12").unwrap());
        assert!(def.matches("123").unwrap());
        // Greedy digits consume all four, overshooting the bound.
        assert!(!def.matches("1234").unwrap());
    }

    #[test]
    fn test_native_call() {
        let def = linked(|def| {
            let even = def.call(|media, i, _state| ((media.len() - i) % 2 == 0).then_some(i));
            let any = def.any();
            let rest = def.many(any);
            let body = def.glue(&[even, rest]);
            def.rule("r", body).unwrap();
            def.entry("r").unwrap();
        });
        assert!(def.matches("ab").unwrap());
        assert!(!def.matches("abc").unwrap());
    }
}
