//! Token tree: tagged spans built incrementally during a match.
//!
//! Tokens live in an arena owned by the [`TokenTree`]; [`TokenId`] handles
//! index into it. Children are owned (ordered id list), the parent link is
//! a non-owning back-reference used for navigation only.
//!
//! The tree supports the rollback contract of the matching engine: a token
//! is appended when a named rule begins matching, finalized (its span set)
//! when the rule succeeds, and unlinked when it fails. Any matcher node
//! that fails after tokens were appended restores its parent's child list
//! to a saved checkpoint, so no partial parse fragment is ever observable
//! in the final tree.

use crate::base::{RuleId, ScopeId, TokenTypeId};

/// Handle to a token inside a [`TokenTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(u32);

impl TokenId {
    fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        TokenId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct TokenData {
    scope: ScopeId,
    rule: RuleId,
    token_type: Option<TokenTypeId>,
    start: usize,
    /// Open (equal to `start`) until the owning rule succeeds.
    end: usize,
    parent: Option<TokenId>,
    children: Vec<TokenId>,
    attached: bool,
}

/// Checkpoint into a parent's child list, used for rollback.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint(usize);

/// An arena of tokens produced by one match attempt.
#[derive(Debug, Clone, Default)]
pub struct TokenTree {
    tokens: Vec<TokenData>,
    root: Option<TokenId>,
}

impl TokenTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root token, if the match produced (and kept) one.
    pub fn root(&self) -> Option<TokenId> {
        self.root.filter(|id| self.data(*id).attached)
    }

    /// Total number of tokens ever produced, including unlinked ones.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token was ever produced.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn data(&self, id: TokenId) -> &TokenData {
        &self.tokens[id.index()]
    }

    fn data_mut(&mut self, id: TokenId) -> &mut TokenData {
        &mut self.tokens[id.index()]
    }

    // =========================================================================
    // Construction (crate-internal, driven by the matching engine)
    // =========================================================================

    /// Allocate a token for a rule starting at `start` and append it as the
    /// last child of `parent`. The first parentless token becomes the root.
    pub(crate) fn produce(
        &mut self,
        scope: ScopeId,
        rule: RuleId,
        start: usize,
        parent: Option<TokenId>,
    ) -> TokenId {
        let id = TokenId::new(self.tokens.len());
        self.tokens.push(TokenData {
            scope,
            rule,
            token_type: None,
            start,
            end: start,
            parent,
            children: Vec::new(),
            attached: true,
        });
        match parent {
            Some(p) => self.data_mut(p).children.push(id),
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        id
    }

    /// Finalize a token's span once its rule subtree succeeded.
    pub(crate) fn set_range(&mut self, id: TokenId, start: usize, end: usize) {
        let data = self.data_mut(id);
        data.start = start;
        data.end = end;
    }

    /// Tag a token with a keyword token type.
    pub(crate) fn set_token_type(&mut self, id: TokenId, token_type: TokenTypeId) {
        self.data_mut(id).token_type = Some(token_type);
    }

    /// Detach a token from its parent's child list. The token and its
    /// subtree stay in the arena but are unreachable from the root.
    pub(crate) fn unlink(&mut self, id: TokenId) {
        if let Some(parent) = self.data(id).parent {
            let children = &mut self.data_mut(parent).children;
            if let Some(pos) = children.iter().rposition(|c| *c == id) {
                children.remove(pos);
            }
        }
        let data = self.data_mut(id);
        data.parent = None;
        data.attached = false;
    }

    /// Move all children of `from` to the end of `into`'s child list.
    ///
    /// Used by void rules: the wrapper token is unlinked first, then its
    /// children are spliced into the former parent at the position the
    /// wrapper occupied.
    pub(crate) fn splice_children(&mut self, from: TokenId, into: TokenId) {
        let moved = std::mem::take(&mut self.data_mut(from).children);
        for child in &moved {
            self.data_mut(*child).parent = Some(into);
        }
        self.data_mut(into).children.extend(moved);
    }

    /// Remember how many children `parent` has right now.
    pub(crate) fn checkpoint(&self, parent: TokenId) -> Checkpoint {
        Checkpoint(self.data(parent).children.len())
    }

    /// Unlink, in reverse order, every child appended after `mark`.
    pub(crate) fn rollback(&mut self, parent: TokenId, mark: Checkpoint) {
        while self.data(parent).children.len() > mark.0 {
            let last = *self.data(parent).children.last().expect("non-empty");
            self.unlink(last);
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// The scope of the definition that produced this token.
    pub fn scope(&self, id: TokenId) -> ScopeId {
        self.data(id).scope
    }

    /// The rule that produced this token.
    pub fn rule(&self, id: TokenId) -> RuleId {
        self.data(id).rule
    }

    /// The keyword token type, if a keyword node tagged this token.
    pub fn token_type(&self, id: TokenId) -> Option<TokenTypeId> {
        self.data(id).token_type
    }

    /// Start offset of the token's span.
    pub fn start(&self, id: TokenId) -> usize {
        self.data(id).start
    }

    /// End offset (exclusive) of the token's span.
    pub fn end(&self, id: TokenId) -> usize {
        self.data(id).end
    }

    /// The token's span as a range.
    pub fn range(&self, id: TokenId) -> std::ops::Range<usize> {
        let data = self.data(id);
        data.start..data.end
    }

    /// The parent token, or `None` for the root.
    pub fn parent(&self, id: TokenId) -> Option<TokenId> {
        self.data(id).parent
    }

    /// Ordered child tokens.
    pub fn children(&self, id: TokenId) -> &[TokenId] {
        &self.data(id).children
    }

    /// First child, if any.
    pub fn first_child(&self, id: TokenId) -> Option<TokenId> {
        self.data(id).children.first().copied()
    }

    /// Last child, if any.
    pub fn last_child(&self, id: TokenId) -> Option<TokenId> {
        self.data(id).children.last().copied()
    }

    /// The sibling immediately before `id` in its parent's child list.
    pub fn prev_sibling(&self, id: TokenId) -> Option<TokenId> {
        let parent = self.data(id).parent?;
        let children = &self.data(parent).children;
        let pos = children.iter().position(|c| *c == id)?;
        pos.checked_sub(1).map(|p| children[p])
    }

    /// The sibling immediately after `id` in its parent's child list.
    pub fn next_sibling(&self, id: TokenId) -> Option<TokenId> {
        let parent = self.data(id).parent?;
        let children = &self.data(parent).children;
        let pos = children.iter().position(|c| *c == id)?;
        children.get(pos + 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (ScopeId, RuleId) {
        (ScopeId::next(), RuleId::new(0))
    }

    #[test]
    fn test_first_parentless_token_is_root() {
        let (scope, rule) = ids();
        let mut tree = TokenTree::new();
        let root = tree.produce(scope, rule, 0, None);
        assert_eq!(tree.root(), Some(root));
    }

    #[test]
    fn test_unlink_removes_from_parent_and_root() {
        let (scope, rule) = ids();
        let mut tree = TokenTree::new();
        let root = tree.produce(scope, rule, 0, None);
        let child = tree.produce(scope, rule, 0, Some(root));
        assert_eq!(tree.children(root), &[child]);

        tree.unlink(child);
        assert!(tree.children(root).is_empty());

        tree.unlink(root);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_rollback_restores_child_list() {
        let (scope, rule) = ids();
        let mut tree = TokenTree::new();
        let root = tree.produce(scope, rule, 0, None);
        let keep = tree.produce(scope, rule, 0, Some(root));
        let mark = tree.checkpoint(root);
        tree.produce(scope, rule, 1, Some(root));
        tree.produce(scope, rule, 2, Some(root));

        tree.rollback(root, mark);
        assert_eq!(tree.children(root), &[keep]);
    }

    #[test]
    fn test_void_splice_preserves_order_and_parents() {
        let (scope, rule) = ids();
        let mut tree = TokenTree::new();
        let root = tree.produce(scope, rule, 0, None);
        let before = tree.produce(scope, rule, 0, Some(root));
        let void = tree.produce(scope, rule, 1, Some(root));
        let a = tree.produce(scope, rule, 1, Some(void));
        let b = tree.produce(scope, rule, 2, Some(void));

        tree.unlink(void);
        tree.splice_children(void, root);

        assert_eq!(tree.children(root), &[before, a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(b), Some(root));
    }

    #[test]
    fn test_sibling_navigation() {
        let (scope, rule) = ids();
        let mut tree = TokenTree::new();
        let root = tree.produce(scope, rule, 0, None);
        let a = tree.produce(scope, rule, 0, Some(root));
        let b = tree.produce(scope, rule, 1, Some(root));
        let c = tree.produce(scope, rule, 2, Some(root));

        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.next_sibling(b), Some(c));
        assert_eq!(tree.prev_sibling(a), None);
        assert_eq!(tree.next_sibling(c), None);
        assert_eq!(tree.first_child(root), Some(a));
        assert_eq!(tree.last_child(root), Some(c));
    }
}
