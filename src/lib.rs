//! # syndef
//!
//! Declarative syntax definitions: build backtracking grammars from
//! combinators, match them over byte buffers, and get token trees back.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! grammars  → Bundled grammars (comments, recipes, regexp compiler)
//!   ↓
//! definition → Grammar builder, link pass, match entry points
//!   ↓
//! matcher   → Recursive matching engine with rollback
//!   ↓
//! node      → Matcher node graph (kinds + continuation chains)
//!   ↓
//! token / state / keyword / buffer
//!   ↓
//! base      → Primitives (ScopeId, RuleId, state slot ids)
//! ```
//!
//! ## Quick start
//!
//! ```
//! use syndef::SyntaxDefinition;
//!
//! let mut def = SyntaxDefinition::new("greeting");
//! let hello = def.string("hello");
//! let space = def.chr(b' ');
//! let letter = def.range(b'a', b'z');
//! let name = def.at_least(1, letter);
//! let body = def.glue(&[hello, space, name]);
//! def.rule("greeting", body).unwrap();
//! def.entry("greeting").unwrap();
//! def.link().unwrap();
//!
//! let result = def.match_at("hello world", 0).unwrap().unwrap();
//! assert_eq!(result.range(), 0..11);
//! ```

// ============================================================================
// MODULES (dependency order: base → buffer/state/token/keyword → node →
// matcher → definition → debug → grammars)
// ============================================================================

/// Foundation types: ScopeId, RuleId, TokenTypeId, state slot ids
pub mod base;

/// Input window over a byte slice, with truncation for sub-grammars
pub mod buffer;

/// Per-match mutable state: named flags, chars and strings
pub mod state;

/// Token tree arena with checkpoint/rollback
pub mod token;

/// Keyword prefix tree
mod keyword;

/// Matcher node graph: kinds and continuation chains
pub mod node;

/// The recursive matching engine
mod matcher;

/// Grammar builder, link pass, match entry points
pub mod definition;

/// Construction-time error types
pub mod error;

/// Debug hooks and token tree printing
pub mod debug;

/// Bundled grammars: comments, recipes, regular expressions
pub mod grammars;

// Re-export the primary surface
pub use base::{CharId, FlagId, RuleId, ScopeId, StringId, TokenTypeId};
pub use buffer::Buffer;
pub use debug::{DebugHook, TraceHook, print_tree};
pub use definition::{CallFn, MatchResult, SyntaxDefinition};
pub use error::SyntaxError;
pub use node::{NodeId, NodeTag};
pub use state::MatchState;
pub use token::{TokenId, TokenTree};
