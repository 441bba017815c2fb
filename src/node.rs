//! Matcher node graph.
//!
//! A compiled grammar is a directed graph of typed matcher nodes stored in
//! an arena owned by the [`SyntaxDefinition`]. Every node carries an
//! optional `next` continuation: a singly linked chain built once at
//! grammar-definition time and never mutated during matching. Sequencing
//! (`glue`) is expressed by chaining continuations; child/entry edges are
//! arena indices; rule references resolve to [`RuleId`] indices into the
//! rule table, which is what lets recursive grammars form cycles without
//! ownership cycles.
//!
//! The matching contract for every kind lives in the `matcher` module.
//!
//! [`SyntaxDefinition`]: crate::definition::SyntaxDefinition

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{CharId, FlagId, RuleId, StringId};
use crate::definition::SyntaxDefinition;
use crate::keyword::KeywordTrie;

/// Handle to a node inside a definition's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        NodeId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a rule reference forwards to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefMode {
    /// Match the rule normally (token production + rollback on failure).
    Normal,
    /// Forward directly to the rule's body, bypassing token creation.
    Inline,
    /// Zero-width assertion: the token of the rule currently being matched
    /// immediately follows a token of the referenced rule.
    Before,
}

/// A node plus its continuation link.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) next: Option<NodeId>,
}

/// Closed variant over all matcher node kinds.
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    /// Consume one byte equal (or, inverted, unequal) to `ch`.
    Char { ch: u8, invert: bool },
    /// Consume any one byte.
    Any,
    /// Consume one byte inside (or, inverted, outside) `[lo, hi]`.
    Range { lo: u8, hi: u8, invert: bool },
    /// Consume one byte contained (or, inverted, not contained) in `chars`.
    Set { chars: Box<[u8]>, invert: bool },
    /// Consume the literal byte string.
    Literal { text: Box<[u8]> },
    /// Longest keyword-table match; tags the enclosing token with the
    /// entry's token type.
    Keyword { trie: Box<KeywordTrie> },
    /// Greedy repetition of `entry`, `min..=max` times.
    Repeat { min: usize, max: usize, entry: NodeId },
    /// Lazy repetition: after `min` entries, prefer the continuation and
    /// grow only when it fails.
    LazyRepeat { min: usize, entry: NodeId },
    /// Structural success of `entry` whose consumed length must lie in
    /// `min..=max`.
    Length { min: usize, max: usize, entry: NodeId },
    /// Ordered alternatives; first success wins.
    Choice { alternatives: Box<[NodeId]> },
    /// Zero-width probe of `entry` (no token production, no advancement);
    /// inverted form is negative lookahead.
    Ahead { entry: NodeId, invert: bool },
    /// Zero-width probe that `entry` matches some span ending exactly at
    /// the current position; inverted form is negative lookbehind.
    Behind { entry: NodeId, invert: bool },
    /// Zero-width assertion on absolute position 0.
    Boi,
    /// Zero-width assertion on the buffer length.
    Eoi,
    /// Always succeeds without consuming.
    Pass,
    /// Always fails.
    Never,
    /// Scan forward position by position until `entry` matches.
    Find { entry: NodeId },
    /// Named rule reference; `target` is filled in by the link pass.
    LinkRef {
        name: SmolStr,
        mode: RefMode,
        target: Option<RuleId>,
    },
    /// Native callback escape hatch, by index into the definition's
    /// callback table.
    Call { index: usize },
    /// Write a flag slot.
    SetFlag { flag: FlagId, value: bool },
    /// Branch on a flag slot.
    If {
        flag: FlagId,
        then_branch: Option<NodeId>,
        else_branch: Option<NodeId>,
    },
    /// Consume one byte and store it in a char slot.
    GetChar { slot: CharId },
    /// Write a char slot without consuming.
    SetChar { slot: CharId, value: u8 },
    /// Consume one byte equal (or, inverted, unequal) to a char slot.
    VarChar { slot: CharId, invert: bool },
    /// Scan ahead to where `termination` first matches and capture the
    /// skipped span into a string slot.
    GetString { slot: StringId, termination: NodeId },
    /// Consume bytes equal to a previously captured string slot.
    VarString { slot: StringId },
    /// Switch to another definition's graph, reusing or creating a child
    /// state scope; optionally bounded by a termination probe.
    Invoke {
        definition: Arc<SyntaxDefinition>,
        termination: Option<NodeId>,
    },
}

/// Public discriminant of a node kind, used by construction-time debug
/// hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Char,
    Any,
    Range,
    Set,
    Literal,
    Keyword,
    Repeat,
    LazyRepeat,
    Length,
    Choice,
    Ahead,
    Behind,
    Boi,
    Eoi,
    Pass,
    Never,
    Find,
    Ref,
    Inline,
    Before,
    Call,
    SetFlag,
    If,
    GetChar,
    SetChar,
    VarChar,
    GetString,
    VarString,
    Invoke,
}

impl NodeKind {
    pub(crate) fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Char { .. } => NodeTag::Char,
            NodeKind::Any => NodeTag::Any,
            NodeKind::Range { .. } => NodeTag::Range,
            NodeKind::Set { .. } => NodeTag::Set,
            NodeKind::Literal { .. } => NodeTag::Literal,
            NodeKind::Keyword { .. } => NodeTag::Keyword,
            NodeKind::Repeat { .. } => NodeTag::Repeat,
            NodeKind::LazyRepeat { .. } => NodeTag::LazyRepeat,
            NodeKind::Length { .. } => NodeTag::Length,
            NodeKind::Choice { .. } => NodeTag::Choice,
            NodeKind::Ahead { .. } => NodeTag::Ahead,
            NodeKind::Behind { .. } => NodeTag::Behind,
            NodeKind::Boi => NodeTag::Boi,
            NodeKind::Eoi => NodeTag::Eoi,
            NodeKind::Pass => NodeTag::Pass,
            NodeKind::Never => NodeTag::Never,
            NodeKind::Find { .. } => NodeTag::Find,
            NodeKind::LinkRef { mode: RefMode::Normal, .. } => NodeTag::Ref,
            NodeKind::LinkRef { mode: RefMode::Inline, .. } => NodeTag::Inline,
            NodeKind::LinkRef { mode: RefMode::Before, .. } => NodeTag::Before,
            NodeKind::Call { .. } => NodeTag::Call,
            NodeKind::SetFlag { .. } => NodeTag::SetFlag,
            NodeKind::If { .. } => NodeTag::If,
            NodeKind::GetChar { .. } => NodeTag::GetChar,
            NodeKind::SetChar { .. } => NodeTag::SetChar,
            NodeKind::VarChar { .. } => NodeTag::VarChar,
            NodeKind::GetString { .. } => NodeTag::GetString,
            NodeKind::VarString { .. } => NodeTag::VarString,
            NodeKind::Invoke { .. } => NodeTag::Invoke,
        }
    }
}
