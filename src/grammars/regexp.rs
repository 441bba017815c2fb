//! A small regular expression engine, bootstrapped on the grammar builder.
//!
//! The pattern language itself is parsed by a syntax definition; compiling
//! a pattern walks the resulting token tree and emits matcher nodes into a
//! fresh definition. Supported syntax:
//!
//! - literals and `\` escapes (`\n \t \r \f \v \0`, `\d \s \w`, and any
//!   escaped metacharacter)
//! - `.` (any byte except newline), `^` (beginning of input), `$` (end of
//!   input)
//! - character classes `[...]` / `[^...]` with ranges and escapes
//! - greedy quantifiers `*`, `+`, `?`, `{n}`, `{n,}`, `{n,m}` and the lazy
//!   forms `*?`, `+?`, `{n,}?`
//! - alternation `|` and grouping `(...)`
//!
//! Quantified repetition is possessive (no backtracking into a finished
//! greedy loop), which keeps matching linear but rejects patterns that
//! would need to give bytes back.

use std::ops::Range;

use tracing::debug;

use crate::base::RuleId;
use crate::definition::SyntaxDefinition;
use crate::error::SyntaxError;
use crate::node::NodeId;
use crate::token::{TokenId, TokenTree};

/// Rule ids of the bootstrap pattern grammar, kept for tree walking.
struct PatternSyntax {
    def: SyntaxDefinition,
    alternation: RuleId,
    sequence: RuleId,
    quantifier: RuleId,
    group: RuleId,
    class: RuleId,
    class_range: RuleId,
    class_char: RuleId,
    dot: RuleId,
    caret: RuleId,
    dollar: RuleId,
    escape: RuleId,
    literal: RuleId,
}

fn pattern_syntax() -> Result<PatternSyntax, SyntaxError> {
    let mut def = SyntaxDefinition::new("regexp-pattern");

    let plain = def.none_of(r"\|()[]{}*+?.^$");
    def.rule("literal", plain)?;

    let backslash = def.chr(b'\\');
    let escaped = def.any();
    let escape_body = def.glue(&[backslash, escaped]);
    def.rule("escape", escape_body)?;

    let dot_char = def.chr(b'.');
    def.rule("dot", dot_char)?;
    let caret_char = def.chr(b'^');
    def.rule("caret", caret_char)?;
    let dollar_char = def.chr(b'$');
    def.rule("dollar", dollar_char)?;

    let in_class_escape = def.reference("escape");
    let in_class_plain = def.other(b']');
    let class_char_body = def.choice(&[in_class_escape, in_class_plain]);
    def.rule("class_char", class_char_body)?;

    let range_lo = def.reference("class_char");
    let dash = def.chr(b'-');
    let range_hi = def.reference("class_char");
    let class_range_body = def.glue(&[range_lo, dash, range_hi]);
    def.rule("class_range", class_range_body)?;

    let class_open = def.chr(b'[');
    let negate = def.chr(b'^');
    let negate_opt = def.optional(negate);
    let item_range = def.reference("class_range");
    let item_char = def.reference("class_char");
    let item = def.choice(&[item_range, item_char]);
    let items = def.at_least(1, item);
    let class_close = def.chr(b']');
    let class_body = def.glue(&[class_open, negate_opt, items, class_close]);
    def.rule("class", class_body)?;

    let group_open = def.chr(b'(');
    let group_inner = def.reference("alternation");
    let group_close = def.chr(b')');
    let group_body = def.glue(&[group_open, group_inner, group_close]);
    def.rule("group", group_body)?;

    let symbol = def.one_of("*+?");
    let brace_open = def.chr(b'{');
    let digit = def.range(b'0', b'9');
    let min_digits = def.at_least(1, digit);
    let comma = def.chr(b',');
    let digit = def.range(b'0', b'9');
    let max_digits = def.at_least(1, digit);
    let max_opt = def.optional(max_digits);
    let upper = def.glue(&[comma, max_opt]);
    let upper_opt = def.optional(upper);
    let brace_close = def.chr(b'}');
    let braced = def.glue(&[brace_open, min_digits, upper_opt, brace_close]);
    let quantifier_head = def.choice(&[symbol, braced]);
    let lazy_marker = def.chr(b'?');
    let lazy_opt = def.optional(lazy_marker);
    let quantifier_body = def.glue(&[quantifier_head, lazy_opt]);
    def.rule("quantifier", quantifier_body)?;

    let atom_group = def.reference("group");
    let atom_class = def.reference("class");
    let atom_dot = def.reference("dot");
    let atom_caret = def.reference("caret");
    let atom_dollar = def.reference("dollar");
    let atom_escape = def.reference("escape");
    let atom_literal = def.reference("literal");
    let atom = def.choice(&[
        atom_group,
        atom_class,
        atom_dot,
        atom_caret,
        atom_dollar,
        atom_escape,
        atom_literal,
    ]);
    let quantifier_ref = def.reference("quantifier");
    let quantifier_opt = def.optional(quantifier_ref);
    let factor_body = def.glue(&[atom, quantifier_opt]);
    def.rule("factor", factor_body)?;

    let factor_ref = def.reference("factor");
    let sequence_body = def.many(factor_ref);
    def.rule("sequence", sequence_body)?;

    let first_sequence = def.reference("sequence");
    let pipe = def.chr(b'|');
    let next_sequence = def.reference("sequence");
    let branch = def.glue(&[pipe, next_sequence]);
    let branches = def.many(branch);
    let alternation_body = def.glue(&[first_sequence, branches]);
    def.rule("alternation", alternation_body)?;

    let top = def.reference("alternation");
    let end = def.eoi();
    let pattern_body = def.glue(&[top, end]);
    def.rule("pattern", pattern_body)?;
    def.entry("pattern")?;
    def.link()?;

    Ok(PatternSyntax {
        alternation: def.rule_id("alternation")?,
        sequence: def.rule_id("sequence")?,
        quantifier: def.rule_id("quantifier")?,
        group: def.rule_id("group")?,
        class: def.rule_id("class")?,
        class_range: def.rule_id("class_range")?,
        class_char: def.rule_id("class_char")?,
        dot: def.rule_id("dot")?,
        caret: def.rule_id("caret")?,
        dollar: def.rule_id("dollar")?,
        escape: def.rule_id("escape")?,
        literal: def.rule_id("literal")?,
        def,
    })
}

/// A compiled regular expression.
#[derive(Debug)]
pub struct Regex {
    pattern: String,
    def: SyntaxDefinition,
}

impl Regex {
    /// Compile `pattern` into a matcher graph.
    pub fn compile(pattern: &str) -> Result<Regex, SyntaxError> {
        let syntax = pattern_syntax()?;
        let parsed = syntax.def.match_at(pattern, 0)?.ok_or_else(|| {
            SyntaxError::InvalidPattern {
                offset: 0,
                reason: "malformed pattern".into(),
            }
        })?;
        let tree = parsed.tree();
        let root = tree.root().ok_or_else(|| SyntaxError::InvalidPattern {
            offset: 0,
            reason: "empty parse".into(),
        })?;

        let mut compiler = Compiler {
            pattern,
            tree,
            syntax: &syntax,
            def: SyntaxDefinition::new("regexp"),
        };
        let top = tree
            .children(root)
            .first()
            .copied()
            .ok_or_else(|| SyntaxError::InvalidPattern {
                offset: 0,
                reason: "empty parse".into(),
            })?;
        let entry = compiler.emit_alternation(top)?;
        let mut def = compiler.def;
        def.rule("match", entry)?;
        def.entry("match")?;
        def.link()?;
        debug!(pattern, "regex compiled");
        Ok(Regex { pattern: pattern.to_string(), def })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Does the pattern match at the start of `text`?
    pub fn matches(&self, text: impl AsRef<[u8]>) -> bool {
        self.def.matches(text).unwrap_or(false)
    }

    /// The first match in `text`, scanning left to right.
    pub fn find(&self, text: impl AsRef<[u8]>) -> Option<Range<usize>> {
        match self.def.find_at(text, 0) {
            Ok(found) => found.map(|m| m.range()),
            Err(_) => None,
        }
    }

    /// The underlying syntax definition.
    pub fn syntax(&self) -> &SyntaxDefinition {
        &self.def
    }
}

/// One resolved character-class item.
enum ClassAtom {
    Byte(u8),
    Range(u8, u8),
}

struct Compiler<'a> {
    pattern: &'a str,
    tree: &'a TokenTree,
    syntax: &'a PatternSyntax,
    def: SyntaxDefinition,
}

impl Compiler<'_> {
    fn byte_at(&self, i: usize) -> u8 {
        self.pattern.as_bytes()[i]
    }

    fn invalid(&self, token: TokenId, reason: &str) -> SyntaxError {
        SyntaxError::InvalidPattern {
            offset: self.tree.start(token),
            reason: reason.to_string(),
        }
    }

    fn emit_alternation(&mut self, token: TokenId) -> Result<NodeId, SyntaxError> {
        let sequences: Vec<TokenId> = self
            .tree
            .children(token)
            .iter()
            .copied()
            .filter(|t| self.tree.rule(*t) == self.syntax.sequence)
            .collect();
        if sequences.len() == 1 {
            return self.emit_sequence(sequences[0]);
        }
        let mut alternatives = Vec::with_capacity(sequences.len());
        for sequence in sequences {
            alternatives.push(self.emit_sequence(sequence)?);
        }
        Ok(self.def.choice(&alternatives))
    }

    fn emit_sequence(&mut self, token: TokenId) -> Result<NodeId, SyntaxError> {
        let factors: Vec<TokenId> = self.tree.children(token).to_vec();
        if factors.is_empty() {
            return Ok(self.def.pass());
        }
        let mut parts = Vec::with_capacity(factors.len());
        for factor in factors {
            parts.push(self.emit_factor(factor)?);
        }
        Ok(self.def.glue(&parts))
    }

    fn emit_factor(&mut self, token: TokenId) -> Result<NodeId, SyntaxError> {
        let children = self.tree.children(token);
        let atom_token = children[0];
        let quantifier = children
            .get(1)
            .copied()
            .filter(|t| self.tree.rule(*t) == self.syntax.quantifier);
        let atom = self.emit_atom(atom_token)?;
        match quantifier {
            Some(quantifier) => self.apply_quantifier(atom, quantifier),
            None => Ok(atom),
        }
    }

    fn apply_quantifier(
        &mut self,
        entry: NodeId,
        token: TokenId,
    ) -> Result<NodeId, SyntaxError> {
        let range = self.tree.range(token);
        let text = &self.pattern[range];
        let (body, lazy) = match text.strip_suffix('?') {
            // A bare "?" is the {0,1} quantifier, not a lazy marker.
            Some(body) if !body.is_empty() => (body, true),
            _ => (text, false),
        };
        let (min, max) = match body {
            "*" => (0, usize::MAX),
            "+" => (1, usize::MAX),
            "?" => (0, 1),
            braced => self.parse_braced(token, braced)?,
        };
        if lazy {
            if max != usize::MAX {
                return Err(self.invalid(token, "lazy quantifier requires an open upper bound"));
            }
            Ok(self.def.lazy_repeat(min, entry))
        } else {
            Ok(self.def.repeat(min, max, entry))
        }
    }

    fn parse_braced(&self, token: TokenId, text: &str) -> Result<(usize, usize), SyntaxError> {
        let inner = text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .ok_or_else(|| self.invalid(token, "malformed quantifier"))?;
        let parse = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|_| self.invalid(token, "repetition count out of range"))
        };
        match inner.split_once(',') {
            None => {
                let n = parse(inner)?;
                Ok((n, n))
            }
            Some((min, "")) => Ok((parse(min)?, usize::MAX)),
            Some((min, max)) => {
                let (min, max) = (parse(min)?, parse(max)?);
                if min > max {
                    return Err(self.invalid(token, "repetition bounds are inverted"));
                }
                Ok((min, max))
            }
        }
    }

    fn emit_atom(&mut self, token: TokenId) -> Result<NodeId, SyntaxError> {
        let rule = self.tree.rule(token);
        if rule == self.syntax.literal {
            Ok(self.def.chr(self.byte_at(self.tree.start(token))))
        } else if rule == self.syntax.escape {
            self.emit_escape(token)
        } else if rule == self.syntax.dot {
            Ok(self.def.other(b'\n'))
        } else if rule == self.syntax.caret {
            Ok(self.def.boi())
        } else if rule == self.syntax.dollar {
            Ok(self.def.eoi())
        } else if rule == self.syntax.group {
            let inner = self
                .tree
                .first_child(token)
                .filter(|t| self.tree.rule(*t) == self.syntax.alternation)
                .ok_or_else(|| self.invalid(token, "empty group"))?;
            self.emit_alternation(inner)
        } else if rule == self.syntax.class {
            self.emit_class(token)
        } else {
            Err(self.invalid(token, "unsupported construct"))
        }
    }

    fn emit_escape(&mut self, token: TokenId) -> Result<NodeId, SyntaxError> {
        let atoms = self.escape_atoms(self.byte_at(self.tree.start(token) + 1));
        Ok(self.atoms_to_node(&atoms, false))
    }

    /// Expansion of an escape character, shared between top-level escapes
    /// and class members.
    fn escape_atoms(&self, escaped: u8) -> Vec<ClassAtom> {
        match escaped {
            b'n' => vec![ClassAtom::Byte(b'\n')],
            b't' => vec![ClassAtom::Byte(b'\t')],
            b'r' => vec![ClassAtom::Byte(b'\r')],
            b'f' => vec![ClassAtom::Byte(0x0c)],
            b'v' => vec![ClassAtom::Byte(0x0b)],
            b'0' => vec![ClassAtom::Byte(0)],
            b'd' => vec![ClassAtom::Range(b'0', b'9')],
            b's' => " \t\r\n\x0b\x0c".bytes().map(ClassAtom::Byte).collect(),
            b'w' => vec![
                ClassAtom::Range(b'a', b'z'),
                ClassAtom::Range(b'A', b'Z'),
                ClassAtom::Range(b'0', b'9'),
                ClassAtom::Byte(b'_'),
            ],
            other => vec![ClassAtom::Byte(other)],
        }
    }

    /// Resolve one class-range endpoint to a single byte.
    fn class_byte(&self, token: TokenId) -> Result<u8, SyntaxError> {
        match self.tree.first_child(token) {
            Some(escape) => {
                let atoms = self.escape_atoms(self.byte_at(self.tree.start(escape) + 1));
                match atoms.as_slice() {
                    [ClassAtom::Byte(b)] => Ok(*b),
                    _ => Err(self.invalid(token, "multi-character escape in class range")),
                }
            }
            None => Ok(self.byte_at(self.tree.start(token))),
        }
    }

    fn emit_class(&mut self, token: TokenId) -> Result<NodeId, SyntaxError> {
        let negated = self.byte_at(self.tree.start(token) + 1) == b'^';
        let mut atoms = Vec::new();
        for item in self.tree.children(token).to_vec() {
            let rule = self.tree.rule(item);
            if rule == self.syntax.class_range {
                let children = self.tree.children(item);
                let (lo, hi) = (children[0], children[1]);
                let lo = self.class_byte(lo)?;
                let hi = self.class_byte(hi)?;
                if lo > hi {
                    return Err(self.invalid(item, "class range is inverted"));
                }
                atoms.push(ClassAtom::Range(lo, hi));
            } else if rule == self.syntax.class_char {
                match self.tree.first_child(item) {
                    Some(escape) => {
                        atoms.extend(self.escape_atoms(self.byte_at(self.tree.start(escape) + 1)));
                    }
                    None => atoms.push(ClassAtom::Byte(self.byte_at(self.tree.start(item)))),
                }
            }
        }
        Ok(self.atoms_to_node(&atoms, negated))
    }

    /// Lower a set of class atoms to a single-byte matcher node, negated or
    /// not. Pure byte sets and single ranges map to dedicated node kinds;
    /// mixtures compose via choice (negated: negative lookahead plus any).
    fn atoms_to_node(&mut self, atoms: &[ClassAtom], negated: bool) -> NodeId {
        let bytes: Vec<u8> = atoms
            .iter()
            .filter_map(|a| match a {
                ClassAtom::Byte(b) => Some(*b),
                ClassAtom::Range(..) => None,
            })
            .collect();

        if bytes.len() == atoms.len() {
            return if negated { self.def.none_of(&bytes) } else { self.def.one_of(&bytes) };
        }
        if atoms.len() == 1 {
            if let ClassAtom::Range(lo, hi) = atoms[0] {
                return if negated {
                    self.def.except_range(lo, hi)
                } else {
                    self.def.range(lo, hi)
                };
            }
        }

        let mut alternatives = Vec::with_capacity(atoms.len());
        for atom in atoms {
            let node = match atom {
                ClassAtom::Byte(b) => self.def.chr(*b),
                ClassAtom::Range(lo, hi) => self.def.range(*lo, *hi),
            };
            alternatives.push(node);
        }
        let union = self.def.choice(&alternatives);
        if negated {
            let probe = self.def.not_ahead(union);
            let consume = self.def.any();
            self.def.glue(&[probe, consume])
        } else {
            union
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_alternation() {
        let re = Regex::compile("cat|dog").unwrap();
        assert!(re.matches("cat"));
        assert!(re.matches("dogma"));
        assert!(!re.matches("cow"));
    }

    #[test]
    fn test_classes_and_quantifiers() {
        let re = Regex::compile(r"[a-z]+[0-9]{2,3}").unwrap();
        assert!(re.matches("abc12"));
        assert!(re.matches("x123"));
        assert!(!re.matches("abc1"));
        assert!(!re.matches("123"));
    }

    #[test]
    fn test_negated_class() {
        let re = Regex::compile("[^abc]").unwrap();
        assert!(re.matches("x"));
        assert!(!re.matches("b"));
    }

    #[test]
    fn test_lazy_repeat() {
        let re = Regex::compile(r"<.*?>").unwrap();
        assert_eq!(re.find("<a><b>"), Some(0..3));
    }

    #[test]
    fn test_anchors() {
        let re = Regex::compile("^ab$").unwrap();
        assert!(re.matches("ab"));
        assert!(!re.matches("abc"));
    }

    #[test]
    fn test_find_scans() {
        let re = Regex::compile(r"\d+").unwrap();
        assert_eq!(re.find("order 4213 shipped"), Some(6..10));
    }

    #[test]
    fn test_escape_classes() {
        let re = Regex::compile(r"\w+\s\w+").unwrap();
        assert!(re.matches("hello world"));
        assert!(!re.matches("hello"));
    }

    #[test]
    fn test_malformed_pattern() {
        assert!(matches!(
            Regex::compile("a("),
            Err(SyntaxError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Regex::compile("[z-a]"),
            Err(SyntaxError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_lazy_needs_open_bound() {
        assert!(matches!(
            Regex::compile("a{1,3}?"),
            Err(SyntaxError::InvalidPattern { .. })
        ));
    }
}
