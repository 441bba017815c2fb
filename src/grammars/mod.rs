//! Ready-made grammars built on the definition combinators.
//!
//! These serve both as usable utilities and as worked examples of the
//! builder API: comment/header scanning, a keyword-driven recipe format,
//! and a small regular expression compiler that bootstraps its pattern
//! parser from a syntax definition.

mod comment;
mod recipe;
mod regexp;

pub use comment::{comment_syntax, header_syntax};
pub use recipe::recipe_syntax;
pub use regexp::Regex;
