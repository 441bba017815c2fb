//! Foundation types for the syndef engine.
//!
//! Small copyable identifiers used across the crate:
//! - [`ScopeId`] - identifies a grammar (one per [`SyntaxDefinition`])
//! - [`RuleId`] - index into a definition's rule table
//! - [`TokenTypeId`] - keyword token type, assigned in declaration order
//! - [`FlagId`], [`CharId`], [`StringId`] - state slot indices
//!
//! Rule and slot ids are plain indices assigned at grammar-definition time;
//! they are stable for the lifetime of the owning definition and break the
//! ownership cycles that recursive rule references would otherwise create.
//!
//! This module has NO dependencies on other syndef modules.
//!
//! [`SyntaxDefinition`]: crate::definition::SyntaxDefinition

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies a grammar. Every [`SyntaxDefinition`] gets a unique scope id
/// from a process-wide counter; tokens and match states carry the scope of
/// the definition that produced them.
///
/// [`SyntaxDefinition`]: crate::definition::SyntaxDefinition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

static NEXT_SCOPE: AtomicU32 = AtomicU32::new(0);

impl ScopeId {
    /// Allocate the next scope id.
    pub(crate) fn next() -> Self {
        ScopeId(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

macro_rules! index_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize);
                $name(index as u32)
            }

            /// The raw table index.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_id! {
    /// Index into a definition's rule table, assigned sequentially by
    /// [`SyntaxDefinition::rule`](crate::definition::SyntaxDefinition::rule).
    RuleId
}

index_id! {
    /// Token type assigned to a keyword, sequential per definition in
    /// keyword declaration order.
    TokenTypeId
}

index_id! {
    /// Index of a named boolean state flag.
    FlagId
}

index_id! {
    /// Index of a named state character slot.
    CharId
}

index_id! {
    /// Index of a named state string slot.
    StringId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_ids_are_unique() {
        let a = ScopeId::next();
        let b = ScopeId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_index_ids_round_trip() {
        assert_eq!(RuleId::new(7).index(), 7);
        assert_eq!(FlagId::new(0).index(), 0);
        assert_eq!(TokenTypeId::new(3).to_string(), "3");
    }
}
