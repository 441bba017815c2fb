//! Grammar builder and registry.
//!
//! A [`SyntaxDefinition`] owns the matcher node arena plus four tables:
//! named rules, keyword token types, and the three named state-slot tables
//! (flags, chars, strings). Grammars are built in two phases:
//!
//! 1. **Build**: combinator methods allocate nodes; rule references are
//!    recorded as unresolved link placeholders on a pending list.
//! 2. **Link**: [`link`](SyntaxDefinition::link) resolves every placeholder
//!    to its rule id (idempotent; unresolved names are a hard error).
//!
//! Once linked, a definition is immutable and can be shared read-only
//! across threads; the entry points ([`match_at`](SyntaxDefinition::match_at),
//! [`find_at`](SyntaxDefinition::find_at), [`split`](SyntaxDefinition::split))
//! take `&self` and refuse to run before linking rather than linking
//! implicitly.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::base::{CharId, FlagId, RuleId, ScopeId, StringId, TokenTypeId};
use crate::buffer::Buffer;
use crate::debug::DebugHook;
use crate::error::SyntaxError;
use crate::keyword::KeywordTrie;
use crate::node::{Node, NodeId, NodeKind, RefMode};
use crate::state::MatchState;
use crate::token::{TokenId, TokenTree};

/// Native callback signature for the `call` escape hatch: inspect the
/// buffer at a position (and optionally the match state) and return the new
/// position, or `None` for failure.
pub type CallFn =
    dyn Fn(&Buffer<'_>, usize, Option<&mut MatchState>) -> Option<usize> + Send + Sync;

#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub(crate) name: SmolStr,
    pub(crate) entry: NodeId,
    pub(crate) is_void: bool,
}

/// A named, linkable grammar compiled into a matcher node graph.
pub struct SyntaxDefinition {
    pub(crate) scope: ScopeId,
    name: SmolStr,
    pub(crate) nodes: Vec<Node>,
    pub(crate) rules: Vec<Rule>,
    rule_by_name: FxHashMap<SmolStr, RuleId>,
    pub(crate) entry: Option<RuleId>,
    token_types: IndexMap<SmolStr, TokenTypeId>,
    pending_links: Vec<NodeId>,
    flag_slots: Vec<(SmolStr, bool)>,
    char_slots: Vec<(SmolStr, u8)>,
    string_slots: Vec<(SmolStr, Vec<u8>)>,
    flag_by_name: FxHashMap<SmolStr, FlagId>,
    char_by_name: FxHashMap<SmolStr, CharId>,
    string_by_name: FxHashMap<SmolStr, StringId>,
    pub(crate) calls: Vec<Box<CallFn>>,
    linked: bool,
    debug: Option<Arc<dyn DebugHook>>,
}

impl fmt::Debug for SyntaxDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxDefinition")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("nodes", &self.nodes.len())
            .field("rules", &self.rules.len())
            .field("linked", &self.linked)
            .finish()
    }
}

impl SyntaxDefinition {
    /// Create an empty definition. The name shows up in diagnostics and
    /// debug output; the scope id is freshly allocated.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            scope: ScopeId::next(),
            name: name.into(),
            nodes: Vec::new(),
            rules: Vec::new(),
            rule_by_name: FxHashMap::default(),
            entry: None,
            token_types: IndexMap::new(),
            pending_links: Vec::new(),
            flag_slots: Vec::new(),
            char_slots: Vec::new(),
            string_slots: Vec::new(),
            flag_by_name: FxHashMap::default(),
            char_by_name: FxHashMap::default(),
            string_by_name: FxHashMap::default(),
            calls: Vec::new(),
            linked: false,
            debug: None,
        }
    }

    /// Install a construction-time debug hook. Must be set before nodes are
    /// allocated to observe all of them.
    pub fn set_debug(&mut self, hook: Arc<dyn DebugHook>) {
        self.debug = Some(hook);
    }

    /// The definition's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition's scope id.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Whether the link pass has completed.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    fn add(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        if let Some(hook) = &self.debug {
            hook.node_added(self.scope, id, kind.tag());
        }
        self.nodes.push(Node { kind, next: None });
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    // =========================================================================
    // Stateless combinators
    // =========================================================================

    /// Match the byte `ch`.
    pub fn chr(&mut self, ch: u8) -> NodeId {
        self.add(NodeKind::Char { ch, invert: false })
    }

    /// Match any byte except `ch`.
    pub fn other(&mut self, ch: u8) -> NodeId {
        self.add(NodeKind::Char { ch, invert: true })
    }

    /// Match any single byte.
    pub fn any(&mut self) -> NodeId {
        self.add(NodeKind::Any)
    }

    /// Match one byte in `[lo, hi]`.
    pub fn range(&mut self, lo: u8, hi: u8) -> NodeId {
        self.add(NodeKind::Range { lo, hi, invert: false })
    }

    /// Match one byte outside `[lo, hi]`.
    pub fn except_range(&mut self, lo: u8, hi: u8) -> NodeId {
        self.add(NodeKind::Range { lo, hi, invert: true })
    }

    /// Match one byte contained in `chars`.
    pub fn one_of(&mut self, chars: impl AsRef<[u8]>) -> NodeId {
        self.add(NodeKind::Set { chars: chars.as_ref().into(), invert: false })
    }

    /// Match one byte not contained in `chars`.
    pub fn none_of(&mut self, chars: impl AsRef<[u8]>) -> NodeId {
        self.add(NodeKind::Set { chars: chars.as_ref().into(), invert: true })
    }

    /// Match the literal byte string.
    pub fn string(&mut self, text: impl AsRef<[u8]>) -> NodeId {
        self.add(NodeKind::Literal { text: text.as_ref().into() })
    }

    /// Greedy repetition of `entry`, between `min` and `max` times.
    pub fn repeat(&mut self, min: usize, max: usize, entry: NodeId) -> NodeId {
        self.add(NodeKind::Repeat { min, max, entry })
    }

    /// Zero or more repetitions of `entry` (greedy).
    pub fn many(&mut self, entry: NodeId) -> NodeId {
        self.repeat(0, usize::MAX, entry)
    }

    /// At least `min` repetitions of `entry` (greedy, unbounded above).
    pub fn at_least(&mut self, min: usize, entry: NodeId) -> NodeId {
        self.repeat(min, usize::MAX, entry)
    }

    /// Zero or one occurrence of `entry`.
    pub fn optional(&mut self, entry: NodeId) -> NodeId {
        self.repeat(0, 1, entry)
    }

    /// Lazy repetition: after `min` occurrences, try the continuation and
    /// grow only when it fails.
    pub fn lazy_repeat(&mut self, min: usize, entry: NodeId) -> NodeId {
        self.add(NodeKind::LazyRepeat { min, entry })
    }

    /// Require the span consumed by `entry` to be `min..=max` bytes long.
    pub fn length(&mut self, min: usize, max: usize, entry: NodeId) -> NodeId {
        self.add(NodeKind::Length { min, max, entry })
    }

    /// Sequence: chain `parts` so each feeds its continuation into the
    /// next. Returns the head of the chain. Every node handle must be used
    /// in at most one place; reusing one would alias its continuation link.
    pub fn glue(&mut self, parts: &[NodeId]) -> NodeId {
        assert!(!parts.is_empty(), "glue of zero parts");
        for pair in parts.windows(2) {
            let tail = self.tail(pair[0]);
            self.nodes[tail.index()].next = Some(pair[1]);
        }
        parts[0]
    }

    fn tail(&self, head: NodeId) -> NodeId {
        let mut at = head;
        while let Some(next) = self.nodes[at.index()].next {
            at = next;
        }
        at
    }

    /// Ordered choice: alternatives are tried in declaration order and the
    /// first success wins.
    pub fn choice(&mut self, alternatives: &[NodeId]) -> NodeId {
        assert!(!alternatives.is_empty(), "choice of zero alternatives");
        self.add(NodeKind::Choice { alternatives: alternatives.into() })
    }

    /// Zero-width positive lookahead.
    pub fn ahead(&mut self, entry: NodeId) -> NodeId {
        self.add(NodeKind::Ahead { entry, invert: false })
    }

    /// Zero-width negative lookahead.
    pub fn not_ahead(&mut self, entry: NodeId) -> NodeId {
        self.add(NodeKind::Ahead { entry, invert: true })
    }

    /// Zero-width positive lookbehind: `entry` matches some span ending at
    /// the current position.
    pub fn behind(&mut self, entry: NodeId) -> NodeId {
        self.add(NodeKind::Behind { entry, invert: false })
    }

    /// Zero-width negative lookbehind.
    pub fn not_behind(&mut self, entry: NodeId) -> NodeId {
        self.add(NodeKind::Behind { entry, invert: true })
    }

    /// Zero-width assertion on the beginning of input.
    pub fn boi(&mut self) -> NodeId {
        self.add(NodeKind::Boi)
    }

    /// Zero-width assertion on the end of input.
    pub fn eoi(&mut self) -> NodeId {
        self.add(NodeKind::Eoi)
    }

    /// Always succeeds, consumes nothing.
    pub fn pass(&mut self) -> NodeId {
        self.add(NodeKind::Pass)
    }

    /// Always fails.
    pub fn never(&mut self) -> NodeId {
        self.add(NodeKind::Never)
    }

    /// Scan forward position by position until `entry` matches; consumes
    /// through the first successful match.
    pub fn find(&mut self, entry: NodeId) -> NodeId {
        self.add(NodeKind::Find { entry })
    }

    /// Native callback node.
    pub fn call<F>(&mut self, callback: F) -> NodeId
    where
        F: Fn(&Buffer<'_>, usize, Option<&mut MatchState>) -> Option<usize>
            + Send
            + Sync
            + 'static,
    {
        let index = self.calls.len();
        self.calls.push(Box::new(callback));
        self.add(NodeKind::Call { index })
    }

    // =========================================================================
    // Keywords
    // =========================================================================

    /// Build a keyword node from a whitespace-separated list. Each new word
    /// is assigned the next sequential token type id; repeated words keep
    /// their first id.
    pub fn keyword(&mut self, words: &str) -> NodeId {
        let mut trie = KeywordTrie::new();
        for word in words.split_whitespace() {
            let token_type = match self.token_types.get(word) {
                Some(existing) => *existing,
                None => {
                    let id = TokenTypeId::new(self.token_types.len());
                    self.token_types.insert(SmolStr::new(word), id);
                    id
                }
            };
            trie.insert(word.as_bytes(), token_type);
        }
        self.add(NodeKind::Keyword { trie: Box::new(trie) })
    }

    /// Look up the token type assigned to a keyword.
    pub fn token_type(&self, name: &str) -> Result<TokenTypeId, SyntaxError> {
        self.token_types
            .get(name)
            .copied()
            .ok_or_else(|| SyntaxError::UndefinedTokenType(name.to_string()))
    }

    // =========================================================================
    // Rules and references
    // =========================================================================

    /// Register a named rule and assign it the next sequential rule id.
    pub fn rule(&mut self, name: &str, entry: NodeId) -> Result<RuleId, SyntaxError> {
        self.define(name, entry, false)
    }

    /// Like [`rule`](Self::rule), but the rule is tree-transparent: on
    /// success its token wrapper is discarded and the children are spliced
    /// into the parent.
    pub fn void_rule(&mut self, name: &str, entry: NodeId) -> Result<RuleId, SyntaxError> {
        self.define(name, entry, true)
    }

    fn define(&mut self, name: &str, entry: NodeId, is_void: bool) -> Result<RuleId, SyntaxError> {
        if self.rule_by_name.contains_key(name) {
            return Err(SyntaxError::DuplicateRule(name.to_string()));
        }
        let id = RuleId::new(self.rules.len());
        self.rules.push(Rule { name: SmolStr::new(name), entry, is_void });
        self.rule_by_name.insert(SmolStr::new(name), id);
        Ok(id)
    }

    /// Designate the grammar's start symbol. The rule must already be
    /// defined.
    pub fn entry(&mut self, name: &str) -> Result<(), SyntaxError> {
        let id = self.rule_id(name)?;
        self.entry = Some(id);
        Ok(())
    }

    /// The rule id registered under `name`.
    pub fn rule_id(&self, name: &str) -> Result<RuleId, SyntaxError> {
        self.rule_by_name
            .get(name)
            .copied()
            .ok_or_else(|| SyntaxError::UndefinedRule(name.to_string()))
    }

    /// The name a rule was registered under.
    pub fn rule_name(&self, id: RuleId) -> Option<&str> {
        self.rules.get(id.index()).map(|r| r.name.as_str())
    }

    /// Forward reference to a named rule, resolved by the link pass.
    pub fn reference(&mut self, name: &str) -> NodeId {
        self.link_node(name, RefMode::Normal)
    }

    /// Forward reference that forwards directly to the rule's body,
    /// bypassing token creation (grammar composition without a tree level).
    pub fn inline(&mut self, name: &str) -> NodeId {
        self.link_node(name, RefMode::Inline)
    }

    /// Zero-width assertion that the token of the rule currently being
    /// matched immediately follows a token of the named rule. Typically
    /// placed at the start of a rule body to mean "this rule may only
    /// follow that one".
    pub fn before(&mut self, name: &str) -> NodeId {
        self.link_node(name, RefMode::Before)
    }

    fn link_node(&mut self, name: &str, mode: RefMode) -> NodeId {
        let id = self.add(NodeKind::LinkRef { name: SmolStr::new(name), mode, target: None });
        self.pending_links.push(id);
        id
    }

    /// Resolve every pending rule reference. Idempotent; an unresolved name
    /// is a fatal construction error, and the definition stays unlinked.
    pub fn link(&mut self) -> Result<(), SyntaxError> {
        while let Some(id) = self.pending_links.pop() {
            let name = match &self.nodes[id.index()].kind {
                NodeKind::LinkRef { name, .. } => name.clone(),
                _ => unreachable!("pending link is not a link node"),
            };
            let Some(rule) = self.rule_by_name.get(&name).copied() else {
                self.pending_links.push(id);
                return Err(SyntaxError::UndefinedRule(name.to_string()));
            };
            if let NodeKind::LinkRef { target, .. } = &mut self.nodes[id.index()].kind {
                *target = Some(rule);
            }
        }
        self.linked = true;
        trace!(
            name = %self.name,
            rules = self.rules.len(),
            nodes = self.nodes.len(),
            "definition linked"
        );
        Ok(())
    }

    // =========================================================================
    // State declarations and stateful combinators
    // =========================================================================

    /// Declare a named boolean state flag with a default value.
    pub fn state_flag(&mut self, name: &str, default: bool) -> Result<FlagId, SyntaxError> {
        if self.flag_by_name.contains_key(name) {
            return Err(SyntaxError::DuplicateState { kind: "flag", name: name.to_string() });
        }
        let id = FlagId::new(self.flag_slots.len());
        self.flag_slots.push((SmolStr::new(name), default));
        self.flag_by_name.insert(SmolStr::new(name), id);
        Ok(id)
    }

    /// Declare a named state character slot with a default value.
    pub fn state_char(&mut self, name: &str, default: u8) -> Result<CharId, SyntaxError> {
        if self.char_by_name.contains_key(name) {
            return Err(SyntaxError::DuplicateState { kind: "char", name: name.to_string() });
        }
        let id = CharId::new(self.char_slots.len());
        self.char_slots.push((SmolStr::new(name), default));
        self.char_by_name.insert(SmolStr::new(name), id);
        Ok(id)
    }

    /// Declare a named state string slot with a default value.
    pub fn state_string(
        &mut self,
        name: &str,
        default: impl AsRef<[u8]>,
    ) -> Result<StringId, SyntaxError> {
        if self.string_by_name.contains_key(name) {
            return Err(SyntaxError::DuplicateState { kind: "string", name: name.to_string() });
        }
        let id = StringId::new(self.string_slots.len());
        self.string_slots.push((SmolStr::new(name), default.as_ref().to_vec()));
        self.string_by_name.insert(SmolStr::new(name), id);
        Ok(id)
    }

    pub(crate) fn flag_default(&self, id: FlagId) -> bool {
        self.flag_slots[id.index()].1
    }

    pub(crate) fn char_default(&self, id: CharId) -> u8 {
        self.char_slots[id.index()].1
    }

    pub(crate) fn string_default(&self, id: StringId) -> &[u8] {
        &self.string_slots[id.index()].1
    }

    fn flag_id(&self, name: &str) -> Result<FlagId, SyntaxError> {
        self.flag_by_name.get(name).copied().ok_or_else(|| SyntaxError::no_flag(name))
    }

    fn char_id(&self, name: &str) -> Result<CharId, SyntaxError> {
        self.char_by_name.get(name).copied().ok_or_else(|| SyntaxError::no_char(name))
    }

    fn string_id(&self, name: &str) -> Result<StringId, SyntaxError> {
        self.string_by_name.get(name).copied().ok_or_else(|| SyntaxError::no_string(name))
    }

    /// Write a declared flag (zero-width).
    pub fn set(&mut self, name: &str, value: bool) -> Result<NodeId, SyntaxError> {
        let flag = self.flag_id(name)?;
        Ok(self.add(NodeKind::SetFlag { flag, value }))
    }

    /// Branch on a declared flag. A missing branch passes.
    pub fn if_flag(
        &mut self,
        name: &str,
        then_branch: Option<NodeId>,
        else_branch: Option<NodeId>,
    ) -> Result<NodeId, SyntaxError> {
        let flag = self.flag_id(name)?;
        Ok(self.add(NodeKind::If { flag, then_branch, else_branch }))
    }

    /// Consume one byte and store it in a declared char slot.
    pub fn get_char(&mut self, name: &str) -> Result<NodeId, SyntaxError> {
        let slot = self.char_id(name)?;
        Ok(self.add(NodeKind::GetChar { slot }))
    }

    /// Write a declared char slot (zero-width).
    pub fn set_char(&mut self, name: &str, value: u8) -> Result<NodeId, SyntaxError> {
        let slot = self.char_id(name)?;
        Ok(self.add(NodeKind::SetChar { slot, value }))
    }

    /// Consume one byte equal to a declared char slot (back-reference).
    pub fn var_char(&mut self, name: &str) -> Result<NodeId, SyntaxError> {
        let slot = self.char_id(name)?;
        Ok(self.add(NodeKind::VarChar { slot, invert: false }))
    }

    /// Consume one byte different from a declared char slot.
    pub fn var_other(&mut self, name: &str) -> Result<NodeId, SyntaxError> {
        let slot = self.char_id(name)?;
        Ok(self.add(NodeKind::VarChar { slot, invert: true }))
    }

    /// Scan ahead to where `termination` first matches (or end of input)
    /// and capture the skipped span into a declared string slot. The
    /// termination itself is not consumed.
    pub fn get_string(&mut self, name: &str, termination: NodeId) -> Result<NodeId, SyntaxError> {
        let slot = self.string_id(name)?;
        Ok(self.add(NodeKind::GetString { slot, termination }))
    }

    /// Consume bytes equal to a declared string slot (back-reference).
    pub fn var_string(&mut self, name: &str) -> Result<NodeId, SyntaxError> {
        let slot = self.string_id(name)?;
        Ok(self.add(NodeKind::VarString { slot }))
    }

    // =========================================================================
    // Sub-grammar invocation
    // =========================================================================

    /// Switch to another (linked) definition's grammar at the current
    /// position, optionally bounding its input window by a termination
    /// probe built in *this* definition.
    pub fn invoke(
        &mut self,
        definition: &Arc<SyntaxDefinition>,
        termination: Option<NodeId>,
    ) -> Result<NodeId, SyntaxError> {
        if !definition.is_linked() {
            return Err(SyntaxError::InvalidInvoke(definition.name.to_string(), "not linked"));
        }
        if definition.entry.is_none() {
            return Err(SyntaxError::InvalidInvoke(definition.name.to_string(), "no entry rule"));
        }
        Ok(self.add(NodeKind::Invoke { definition: Arc::clone(definition), termination }))
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Whether the grammar declared any state slots.
    pub fn has_state(&self) -> bool {
        !self.flag_slots.is_empty()
            || !self.char_slots.is_empty()
            || !self.string_slots.is_empty()
    }

    /// A fresh match state with all slots reset to their declared defaults.
    pub fn new_state(&self) -> MatchState {
        MatchState::new(
            self.scope,
            self.flag_slots.iter().map(|(_, default)| *default).collect(),
            self.char_slots.iter().map(|(_, default)| *default).collect(),
            self.string_slots.iter().map(|(_, default)| default.clone()).collect(),
        )
    }

    fn require_ready(&self) -> Result<RuleId, SyntaxError> {
        if !self.linked {
            return Err(SyntaxError::NotLinked);
        }
        self.entry.ok_or(SyntaxError::MissingEntry)
    }

    /// Attempt the entry rule exactly once at position `i`.
    ///
    /// Returns `Ok(None)` when the grammar does not match there; a fresh
    /// match state is created implicitly when the grammar declared state
    /// slots.
    pub fn match_at(
        &self,
        text: impl AsRef<[u8]>,
        i: usize,
    ) -> Result<Option<MatchResult>, SyntaxError> {
        let entry = self.require_ready()?;
        let media = Buffer::new(text.as_ref());
        let mut owned = self.has_state().then(|| self.new_state());
        let mut state = owned.as_mut();
        self.run_entry(entry, &media, i, &mut state)
    }

    /// Like [`match_at`](Self::match_at), with a caller-supplied state.
    pub fn match_with_state(
        &self,
        text: impl AsRef<[u8]>,
        i: usize,
        state: &mut MatchState,
    ) -> Result<Option<MatchResult>, SyntaxError> {
        let entry = self.require_ready()?;
        let media = Buffer::new(text.as_ref());
        let mut state = Some(state);
        self.run_entry(entry, &media, i, &mut state)
    }

    fn run_entry(
        &self,
        entry: RuleId,
        media: &Buffer<'_>,
        i: usize,
        state: &mut Option<&mut MatchState>,
    ) -> Result<Option<MatchResult>, SyntaxError> {
        let mut tree = TokenTree::new();
        let result = self.match_rule(entry, media, i, &mut tree, true, None, state);
        trace!(name = %self.name, at = i, matched = result.is_some(), "match attempt");
        Ok(result.map(|end| MatchResult { start: i, end, tree }))
    }

    /// Scan left to right from `i`, attempting a full match at each
    /// position; the first matching position wins.
    pub fn find_at(
        &self,
        text: impl AsRef<[u8]>,
        i: usize,
    ) -> Result<Option<MatchResult>, SyntaxError> {
        let entry = self.require_ready()?;
        let media = Buffer::new(text.as_ref());
        let mut at = i;
        while at < media.len() {
            let mut owned = self.has_state().then(|| self.new_state());
            let mut state = owned.as_mut();
            if let Some(found) = self.run_entry(entry, &media, at, &mut state)? {
                return Ok(Some(found));
            }
            at += 1;
        }
        Ok(None)
    }

    /// Convenience: does the entry rule match at the start of `text`?
    pub fn matches(&self, text: impl AsRef<[u8]>) -> Result<bool, SyntaxError> {
        Ok(self.match_at(text, 0)?.is_some())
    }

    /// Split `text` into the spans *between* matches of the grammar.
    pub fn split(&self, text: impl AsRef<[u8]>) -> Result<Vec<Range<usize>>, SyntaxError> {
        let bytes = text.as_ref();
        let n = bytes.len();
        let mut parts = Vec::new();
        let mut pos = 0usize;
        while pos <= n {
            match self.find_at(bytes, pos)? {
                Some(found) => {
                    parts.push(pos..found.start());
                    // An empty match must not stall the scan.
                    pos = if found.end() > found.start() { found.end() } else { found.end() + 1 };
                }
                None => {
                    parts.push(pos..n);
                    break;
                }
            }
        }
        debug!(name = %self.name, parts = parts.len(), "split");
        Ok(parts)
    }
}

/// A successful match: where it started and ended, and the token tree it
/// produced.
#[derive(Debug, Clone)]
pub struct MatchResult {
    start: usize,
    end: usize,
    tree: TokenTree,
}

impl MatchResult {
    /// Position where the entry rule matched.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Position just past the matched span.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Matched span length.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the match consumed nothing.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// The matched span as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Root token of the produced tree.
    pub fn root(&self) -> Option<TokenId> {
        self.tree.root()
    }

    /// The produced token tree.
    pub fn tree(&self) -> &TokenTree {
        &self.tree
    }

    /// Consume the result, keeping only the tree.
    pub fn into_tree(self) -> TokenTree {
        self.tree
    }
}
