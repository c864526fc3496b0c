use thiserror::Error;

/// Errors raised by the text-mutation pipeline.
///
/// Every variant is raised synchronously to the immediate caller and none of
/// them leaves partial state behind: a failed call keeps the unit's text,
/// tree, and all outstanding handles exactly as they were.
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("position {value} is outside the editable range [{lower}, {upper}]")]
    OutOfRange {
        value: usize,
        lower: usize,
        upper: usize,
    },

    #[error("start position {pos} is greater than end position {end}")]
    InvalidOrder { pos: usize, end: usize },

    #[error("position {value} is not a UTF-8 character boundary")]
    NotCharBoundary { value: usize },

    #[error("node kind `{kind}` has no editable child span")]
    NoEditableSpan { kind: String },

    #[error("stale node handle: minted at generation {minted}, unit is at generation {current}")]
    StaleHandle { minted: u64, current: u64 },

    #[error("node `{kind}` could not be re-resolved at [{start}, {end}) after the edit")]
    ReResolution {
        kind: String,
        start: usize,
        end: usize,
    },

    #[error("parse service error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised by the parsing service.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source text")]
    ParseFailed,
}
