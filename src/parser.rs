//! The parsing service: full-text parse into a fresh tree-sitter tree.
//!
//! The mutation core never patches trees incrementally; it hands the parsing
//! service the complete post-edit text and installs whatever comes back. The
//! service must be deterministic: the same text always yields a structurally
//! equivalent tree.

use crate::errors::ParseError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// An opaque full-text parsing service.
///
/// Implementations must be deterministic. Malformed text is not an error:
/// tree-sitter-style services report it through ERROR nodes in the returned
/// tree rather than refusing to parse.
pub trait ParseService {
    fn parse(&mut self, text: &str) -> Result<Tree, ParseError>;
}

/// Tree-sitter parser for any grammar shipped by ast-grep-language.
pub struct GrammarParser {
    parser: Parser,
    lang: SupportLang,
}

impl GrammarParser {
    /// Create a parser for the given language.
    pub fn new(lang: SupportLang) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = lang.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet)?;

        Ok(Self { parser, lang })
    }

    /// Create a parser for Rust source.
    pub fn rust() -> Result<Self, ParseError> {
        Self::new(SupportLang::Rust)
    }

    /// Get the configured language.
    pub fn language(&self) -> SupportLang {
        self.lang
    }
}

impl ParseService for GrammarParser {
    fn parse(&mut self, text: &str) -> Result<Tree, ParseError> {
        self.parser.parse(text, None).ok_or(ParseError::ParseFailed)
    }
}

impl Default for GrammarParser {
    fn default() -> Self {
        Self::rust().expect("failed to create default GrammarParser")
    }
}
