//! C-style comment and file-header grammars.

use std::sync::Arc;

use crate::definition::SyntaxDefinition;
use crate::error::SyntaxError;

/// A single C-style comment: either a `/* ... */` block (closed by the
/// nearest terminator) or a `//` line comment running to end of line.
pub fn comment_syntax() -> Result<SyntaxDefinition, SyntaxError> {
    let mut def = SyntaxDefinition::new("comment");

    let open = def.string("/*");
    let close = def.string("*/");
    let to_close = def.find(close);
    let block = def.glue(&[open, to_close]);

    let slashes = def.string("//");
    let not_newline = def.other(b'\n');
    let rest = def.many(not_newline);
    let line = def.glue(&[slashes, rest]);

    let body = def.choice(&[block, line]);
    def.rule("comment", body)?;
    def.entry("comment")?;
    def.link()?;
    Ok(def)
}

/// A leading file header: optional whitespace, one comment, trailing
/// whitespace. Anchored to the beginning of input; the comment grammar is
/// pulled in as a sub-grammar.
pub fn header_syntax() -> Result<SyntaxDefinition, SyntaxError> {
    let comment = Arc::new(comment_syntax()?);

    let mut def = SyntaxDefinition::new("header");
    let boi = def.boi();
    let leading = def.one_of(" \t\r\n");
    let leading_ws = def.many(leading);
    let body = def.invoke(&comment, None)?;
    let trailing = def.one_of(" \t\r\n");
    let trailing_ws = def.many(trailing);
    let chain = def.glue(&[boi, leading_ws, body, trailing_ws]);
    def.rule("header", chain)?;
    def.entry("header")?;
    def.link()?;
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_comment_nearest_close() {
        let def = comment_syntax().unwrap();
        let result = def.match_at("/* a */ b */", 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..7);
    }

    #[test]
    fn test_line_comment_stops_at_newline() {
        let def = comment_syntax().unwrap();
        let result = def.match_at("// hello\nrest", 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..8);
    }

    #[test]
    fn test_unterminated_block_fails() {
        let def = comment_syntax().unwrap();
        assert!(def.match_at("/* open", 0).unwrap().is_none());
    }

    #[test]
    fn test_header_anchored() {
        let def = header_syntax().unwrap();
        let text = "\n/* copyright */\n\nint main;";
        let result = def.match_at(text, 0).unwrap().expect("match");
        assert_eq!(result.range(), 0..18);
        assert!(def.match_at(text, 1).unwrap().is_none());
    }
}
