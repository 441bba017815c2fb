//! Build-recipe grammar: keyword-introduced stage lines.
//!
//! A recipe is a sequence of lines, each starting with a stage keyword
//! (`app`, `lib`, `tool`, `test`, `clean`, `install`) followed by
//! whitespace-separated arguments. Keywords only count at a word boundary;
//! `testx` is an argument-shaped word, not the `test` stage.

use crate::definition::SyntaxDefinition;
use crate::error::SyntaxError;

pub fn recipe_syntax() -> Result<SyntaxDefinition, SyntaxError> {
    let mut def = SyntaxDefinition::new("recipe");

    // stage: keyword that must not continue as an identifier
    let stage_word = def.keyword("app lib tool test clean install");
    let lower = def.range(b'a', b'z');
    let upper = def.range(b'A', b'Z');
    let digit = def.range(b'0', b'9');
    let underscore = def.chr(b'_');
    let ident_char = def.choice(&[lower, upper, digit, underscore]);
    let boundary = def.not_ahead(ident_char);
    let stage_body = def.glue(&[stage_word, boundary]);
    def.rule("stage", stage_body)?;

    // word: one or more identifier characters
    let lower = def.range(b'a', b'z');
    let upper = def.range(b'A', b'Z');
    let digit = def.range(b'0', b'9');
    let underscore = def.chr(b'_');
    let ident_char = def.choice(&[lower, upper, digit, underscore]);
    let word_body = def.at_least(1, ident_char);
    def.rule("word", word_body)?;

    // line: stage, then zero or more space-separated words
    let stage = def.reference("stage");
    let space = def.one_of(" \t");
    let spaces = def.at_least(1, space);
    let word = def.reference("word");
    let argument = def.glue(&[spaces, word]);
    let arguments = def.many(argument);
    let line_body = def.glue(&[stage, arguments]);
    def.rule("line", line_body)?;

    // line separators dissolve in the tree
    let newline = def.one_of("\r\n");
    let newlines = def.at_least(1, newline);
    def.void_rule("sep", newlines)?;

    let first = def.reference("line");
    let sep = def.reference("sep");
    let next = def.reference("line");
    let more = def.glue(&[sep, next]);
    let rest = def.many(more);
    let recipe_body = def.glue(&[first, rest]);
    def.rule("recipe", recipe_body)?;
    def.entry("recipe")?;
    def.link()?;
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let def = recipe_syntax().unwrap();
        let text = "app hello world";
        let result = def.match_at(text, 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..text.len());
    }

    #[test]
    fn test_keyword_tags_stage_token() {
        let def = recipe_syntax().unwrap();
        let text = "install bin";
        let result = def.match_at(text, 0).unwrap().expect("match");
        let tree = result.tree();
        let recipe = tree.root().unwrap();
        let line = tree.first_child(recipe).unwrap();
        let stage = tree.first_child(line).unwrap();
        assert_eq!(tree.token_type(stage), Some(def.token_type("install").unwrap()));
    }

    #[test]
    fn test_keyword_requires_word_boundary() {
        let def = recipe_syntax().unwrap();
        assert!(def.match_at("testx y", 0).unwrap().is_none());
        assert!(def.match_at("test x", 0).unwrap().is_some());
    }

    #[test]
    fn test_separator_is_transparent() {
        let def = recipe_syntax().unwrap();
        let text = "lib core\ntest core";
        let result = def.match_at(text, 0).unwrap().expect("match");
        let tree = result.tree();
        let recipe = tree.root().unwrap();
        // Two line tokens, no separator token in between.
        let lines = tree.children(recipe);
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert_eq!(def.rule_name(tree.rule(*line)), Some("line"));
        }
    }
}
