//! Builder and lifecycle behavior: rule registration, the link pass, and
//! the match entry points' preconditions.

use std::sync::Arc;

use syndef::{SyntaxDefinition, SyntaxError};

fn delimiter(ch: u8) -> SyntaxDefinition {
    let mut def = SyntaxDefinition::new("delimiter");
    let node = def.chr(ch);
    def.rule("delimiter", node).expect("rule");
    def.entry("delimiter").expect("entry");
    def.link().expect("link");
    def
}

#[test]
fn test_duplicate_rule_is_rejected() {
    let mut def = SyntaxDefinition::new("dup");
    let a = def.chr(b'a');
    let b = def.chr(b'b');
    def.rule("r", a).unwrap();
    assert_eq!(def.rule("r", b), Err(SyntaxError::DuplicateRule("r".into())));
}

#[test]
fn test_link_fails_on_unresolved_reference() {
    let mut def = SyntaxDefinition::new("dangling");
    let r = def.reference("ghost");
    def.rule("top", r).unwrap();
    def.entry("top").unwrap();
    assert_eq!(def.link(), Err(SyntaxError::UndefinedRule("ghost".into())));
    assert!(!def.is_linked());
}

#[test]
fn test_match_requires_link() {
    let mut def = SyntaxDefinition::new("unlinked");
    let a = def.chr(b'a');
    def.rule("r", a).unwrap();
    def.entry("r").unwrap();
    assert_eq!(def.match_at("a", 0).unwrap_err(), SyntaxError::NotLinked);
}

#[test]
fn test_match_requires_entry() {
    let mut def = SyntaxDefinition::new("no-entry");
    let a = def.chr(b'a');
    def.rule("r", a).unwrap();
    def.link().unwrap();
    assert_eq!(def.match_at("a", 0).unwrap_err(), SyntaxError::MissingEntry);
}

#[test]
fn test_entry_must_name_existing_rule() {
    let mut def = SyntaxDefinition::new("bad-entry");
    assert_eq!(def.entry("nope"), Err(SyntaxError::UndefinedRule("nope".into())));
}

#[test]
fn test_link_is_idempotent() {
    let mut def = delimiter(b',');
    def.link().unwrap();
    assert!(def.is_linked());
    assert!(def.matches(",").unwrap());
}

#[test]
fn test_state_declarations_are_checked() {
    let mut def = SyntaxDefinition::new("state");
    def.state_flag("seen", false).unwrap();
    assert_eq!(
        def.state_flag("seen", true),
        Err(SyntaxError::DuplicateState { kind: "flag", name: "seen".into() })
    );
    assert_eq!(
        def.set("missing", true),
        Err(SyntaxError::UndefinedState { kind: "flag", name: "missing".into() })
    );
    assert!(def.var_char("q").is_err());
    assert!(def.var_string("s").is_err());
}

#[test]
fn test_invoke_requires_ready_definition() {
    let mut unlinked = SyntaxDefinition::new("sub");
    let a = unlinked.chr(b'a');
    unlinked.rule("r", a).unwrap();
    let sub = Arc::new(unlinked);

    let mut outer = SyntaxDefinition::new("outer");
    assert!(matches!(outer.invoke(&sub, None), Err(SyntaxError::InvalidInvoke(..))));
}

#[test]
fn test_token_type_lookup() {
    let mut def = SyntaxDefinition::new("keywords");
    let kw = def.keyword("red green blue");
    def.rule("color", kw).unwrap();
    def.entry("color").unwrap();
    def.link().unwrap();

    // Sequential ids in declaration order.
    assert_eq!(def.token_type("red").unwrap().index(), 0);
    assert_eq!(def.token_type("blue").unwrap().index(), 2);
    assert_eq!(
        def.token_type("mauve"),
        Err(SyntaxError::UndefinedTokenType("mauve".into()))
    );
}

#[test]
fn test_find_at_scans_forward() {
    let def = delimiter(b',');
    let found = def.find_at("abc,def", 0).unwrap().expect("found");
    assert_eq!(found.range(), 3..4);
    assert!(def.find_at("abcdef", 0).unwrap().is_none());
}

#[test]
fn test_split_on_delimiter() {
    let def = delimiter(b',');
    let parts = def.split("a,b,,c").unwrap();
    assert_eq!(parts, vec![0..1, 2..3, 4..4, 5..6]);
}

#[test]
fn test_split_without_match_is_whole_input() {
    let def = delimiter(b',');
    assert_eq!(def.split("abc").unwrap(), vec![0..3]);
}

#[test]
fn test_match_result_accessors() {
    let def = delimiter(b'x');
    let result = def.match_at("x", 0).unwrap().expect("match");
    assert_eq!(result.start(), 0);
    assert_eq!(result.end(), 1);
    assert_eq!(result.len(), 1);
    assert!(!result.is_empty());
    let root = result.root().expect("root");
    assert_eq!(def.rule_name(result.tree().rule(root)), Some("delimiter"));
}
