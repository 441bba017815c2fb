//! Match state: named flags, characters and strings, scoped per grammar
//! invocation.
//!
//! Stateful grammar constructs (`set`/`if_flag`, `get_char`/`var_char`,
//! `get_string`/`var_string`) read and write slots in the current state.
//! Slot indices are assigned at grammar-definition time and the state's
//! arrays are sized exactly to the declaring definition's slot counts.
//!
//! States form a tree: invoking a sub-grammar lazily creates a child state
//! which is kept and reused across nested invocations of the same scope
//! within one match. A state is never shared between concurrent matches.

use crate::base::{CharId, FlagId, ScopeId, StringId};

/// Mutable per-match storage for one grammar scope.
#[derive(Debug, Clone)]
pub struct MatchState {
    scope: ScopeId,
    flags: Vec<bool>,
    chars: Vec<u8>,
    strings: Vec<Vec<u8>>,
    child: Option<Box<MatchState>>,
}

impl MatchState {
    /// Create a state with the given slot contents. Callers normally go
    /// through [`SyntaxDefinition::new_state`], which applies the declared
    /// defaults.
    ///
    /// [`SyntaxDefinition::new_state`]: crate::definition::SyntaxDefinition::new_state
    pub(crate) fn new(
        scope: ScopeId,
        flags: Vec<bool>,
        chars: Vec<u8>,
        strings: Vec<Vec<u8>>,
    ) -> Self {
        Self { scope, flags, chars, strings, child: None }
    }

    /// The scope of the definition this state belongs to.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Read a flag slot.
    pub fn flag(&self, id: FlagId) -> bool {
        self.flags[id.index()]
    }

    /// Write a flag slot.
    pub fn set_flag(&mut self, id: FlagId, value: bool) {
        self.flags[id.index()] = value;
    }

    /// Read a character slot.
    pub fn char(&self, id: CharId) -> u8 {
        self.chars[id.index()]
    }

    /// Write a character slot.
    pub fn set_char(&mut self, id: CharId, value: u8) {
        self.chars[id.index()] = value;
    }

    /// Read a string slot.
    pub fn string(&self, id: StringId) -> &[u8] {
        &self.strings[id.index()]
    }

    /// Write a string slot.
    pub fn set_string(&mut self, id: StringId, value: Vec<u8>) {
        self.strings[id.index()] = value;
    }

    /// Take the child state if it exists and belongs to `scope`.
    ///
    /// Sub-grammar invocation reuses a compatible child scope and replaces
    /// an incompatible one; the caller puts the child back with
    /// [`adopt_child`](Self::adopt_child) once the sub-match returns.
    pub(crate) fn take_child(&mut self, scope: ScopeId) -> Option<Box<MatchState>> {
        match self.child.take() {
            Some(child) if child.scope == scope => Some(child),
            _ => None,
        }
    }

    /// Store `child` for reuse by the next invocation of the same scope.
    pub(crate) fn adopt_child(&mut self, child: Box<MatchState>) {
        self.child = Some(child);
    }

    /// The current child scope, if any (primarily for inspection in tests).
    pub fn child(&self) -> Option<&MatchState> {
        self.child.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(scope: ScopeId) -> MatchState {
        MatchState::new(scope, vec![false, true], vec![0, b'x'], vec![b"abc".to_vec()])
    }

    #[test]
    fn test_slot_access() {
        let mut st = state(ScopeId::next());
        assert!(!st.flag(FlagId::new(0)));
        assert!(st.flag(FlagId::new(1)));
        st.set_flag(FlagId::new(0), true);
        assert!(st.flag(FlagId::new(0)));

        assert_eq!(st.char(CharId::new(1)), b'x');
        st.set_char(CharId::new(0), b'q');
        assert_eq!(st.char(CharId::new(0)), b'q');

        assert_eq!(st.string(StringId::new(0)), b"abc");
        st.set_string(StringId::new(0), b"de".to_vec());
        assert_eq!(st.string(StringId::new(0)), b"de");
    }

    #[test]
    fn test_child_reuse_is_scope_keyed() {
        let outer_scope = ScopeId::next();
        let inner_scope = ScopeId::next();
        let mut outer = state(outer_scope);

        let mut inner = Box::new(state(inner_scope));
        inner.set_flag(FlagId::new(0), true);
        outer.adopt_child(inner);

        // Wrong scope: the stored child is discarded, not returned.
        assert!(outer.take_child(outer_scope).is_none());

        let mut inner = Box::new(state(inner_scope));
        inner.set_flag(FlagId::new(0), true);
        outer.adopt_child(inner);

        // Matching scope: same state comes back, mutations preserved.
        let got = outer.take_child(inner_scope).expect("child retained");
        assert!(got.flag(FlagId::new(0)));
    }
}
