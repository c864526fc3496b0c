use serde::{Deserialize, Serialize};

/// Indentation text written by a [`CodeWriter`](crate::writer::CodeWriter)
/// at the start of each indented line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndentationText {
    Tab,
    TwoSpaces,
    #[default]
    FourSpaces,
    EightSpaces,
}

impl IndentationText {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndentationText::Tab => "\t",
            IndentationText::TwoSpaces => "  ",
            IndentationText::FourSpaces => "    ",
            IndentationText::EightSpaces => "        ",
        }
    }
}

/// Newline sequence emitted by generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NewlineKind {
    #[default]
    LineFeed,
    CarriageReturnLineFeed,
}

impl NewlineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewlineKind::LineFeed => "\n",
            NewlineKind::CarriageReturnLineFeed => "\r\n",
        }
    }
}

/// Preferred quote character for generated string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuoteKind {
    Single,
    #[default]
    Double,
}

impl QuoteKind {
    pub fn char(&self) -> char {
        match self {
            QuoteKind::Single => '\'',
            QuoteKind::Double => '"',
        }
    }
}

/// Conventions for programmatically generated text.
///
/// Held by the owning [`SourceUnit`](crate::unit::SourceUnit) and passed by
/// reference into the text generator; read-only for the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManipulationSettings {
    #[serde(default)]
    pub indentation: IndentationText,
    #[serde(default)]
    pub newline: NewlineKind,
    #[serde(default)]
    pub quotes: QuoteKind,
}
