//! End-to-end coverage of the bundled grammars.

use once_cell::sync::Lazy;
use rstest::rstest;
use syndef::grammars::{Regex, comment_syntax, header_syntax, recipe_syntax};
use syndef::{SyntaxDefinition, SyntaxError, print_tree};

static COMMENT: Lazy<SyntaxDefinition> = Lazy::new(|| comment_syntax().expect("comment grammar"));
static RECIPE: Lazy<SyntaxDefinition> = Lazy::new(|| recipe_syntax().expect("recipe grammar"));

#[rstest]
#[case("/* block */", Some(0..11))]
#[case("/* a */ /* b */", Some(0..7))]
#[case("// line\ncode", Some(0..7))]
#[case("//", Some(0..2))]
#[case("/* unterminated", None)]
#[case("code", None)]
fn test_comment_matching(#[case] text: &str, #[case] expected: Option<std::ops::Range<usize>>) {
    let result = COMMENT.match_at(text, 0).unwrap();
    assert_eq!(result.map(|m| m.range()), expected);
}

#[test]
fn test_comment_find_skips_code() {
    let found = COMMENT.find_at("int x; // trailing", 0).unwrap().expect("found");
    assert_eq!(found.range(), 7..18);
}

#[test]
fn test_header_requires_leading_comment() {
    let header = header_syntax().unwrap();
    assert!(header.matches("/* (c) 2026 */\n").unwrap());
    assert!(header.matches("  \n// banner\n\n").unwrap());
    assert!(!header.matches("int x; /* late */").unwrap());
}

#[rstest]
#[case("app hello", true)]
#[case("clean", true)]
#[case("lib a\ntool b_2\r\ninstall c", true)]
#[case("appx hello", false)]
#[case("ship it", false)]
fn test_recipe_matching(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(RECIPE.matches(text).unwrap(), expected);
}

#[test]
fn test_recipe_tree_rendering() {
    let text = "test fast\nclean";
    let result = RECIPE.match_at(text, 0).unwrap().expect("match");
    let rendered = print_tree(&RECIPE, result.tree(), text);
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines[0].starts_with("recipe [0, 15)"));
    assert!(lines.iter().any(|l| l.trim_start().starts_with("stage [0, 4)")));
    assert!(lines.iter().any(|l| l.trim_start().starts_with("word [5, 9)")));
}

#[rstest]
#[case("abc", "abc", true)]
#[case("abc", "abd", false)]
#[case("a|b", "b", true)]
#[case("(ab)+c", "ababc", true)]
#[case("(ab)+c", "c", false)]
#[case("[0-9a-f]+", "deadf00d", true)]
#[case("[^;]*;", "stmt;", true)]
#[case(r"\(\d+\)", "(42)", true)]
#[case("x?y", "y", true)]
#[case("x?y", "xy", true)]
fn test_regex_matches(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
    let re = Regex::compile(pattern).expect("compile");
    assert_eq!(re.matches(text), expected, "pattern {pattern:?} on {text:?}");
}

#[test]
fn test_regex_find_reports_span() {
    let re = Regex::compile(r"[A-Z][a-z]+").unwrap();
    assert_eq!(re.find("the Quick fox"), Some(4..9));
    assert_eq!(re.find("all lower"), None);
}

#[test]
fn test_regex_lazy_versus_greedy() {
    let lazy = Regex::compile("\".*?\"").unwrap();
    let greedy = Regex::compile("\"[^\"]*\"").unwrap();
    let text = "\"a\" and \"b\"";
    assert_eq!(lazy.find(text), Some(0..3));
    assert_eq!(greedy.find(text), Some(0..3));
}

#[test]
fn test_regex_compile_errors_carry_offsets() {
    match Regex::compile("ab[z-a]") {
        Err(SyntaxError::InvalidPattern { offset, .. }) => assert_eq!(offset, 3),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn test_regex_pattern_accessor() {
    let re = Regex::compile("a+").unwrap();
    assert_eq!(re.pattern(), "a+");
    assert!(re.syntax().is_linked());
}
