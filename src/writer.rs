//! Replacement-text generation.
//!
//! Callers supply replacement text either as a literal string or as a writer
//! callback that composes it incrementally against the unit's
//! [`ManipulationSettings`]. The two paths meet in [`TextInput`], so the rest
//! of the pipeline never cares which one was used.

use crate::settings::ManipulationSettings;
use std::fmt;

/// Replacement text for a splice: a literal string or a writer callback.
///
/// A literal passes through byte-for-byte with no implicit reformatting. A
/// writer callback is invoked exactly once against a fresh [`CodeWriter`]
/// seeded with the unit's settings, and only after the edit range has been
/// validated.
pub enum TextInput {
    Literal(String),
    Writer(Box<dyn FnOnce(&mut CodeWriter)>),
}

impl TextInput {
    /// Build a writer-backed input from a callback.
    pub fn with_writer(write: impl FnOnce(&mut CodeWriter) + 'static) -> Self {
        TextInput::Writer(Box::new(write))
    }

    /// Produce the exact replacement text.
    pub(crate) fn resolve(self, settings: &ManipulationSettings) -> String {
        match self {
            TextInput::Literal(text) => text,
            TextInput::Writer(write) => {
                let mut writer = CodeWriter::new(settings);
                write(&mut writer);
                writer.finish()
            }
        }
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Literal(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Literal(text)
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextInput::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            TextInput::Writer(_) => f.debug_tuple("Writer").field(&"<callback>").finish(),
        }
    }
}

/// Indentation- and newline-aware text buffer handed to writer callbacks.
///
/// Indentation is applied lazily at the start of each non-empty line, and
/// embedded `\n` characters are normalized to the configured newline
/// sequence.
pub struct CodeWriter<'s> {
    settings: &'s ManipulationSettings,
    buffer: String,
    indent_level: usize,
}

impl<'s> CodeWriter<'s> {
    pub fn new(settings: &'s ManipulationSettings) -> Self {
        Self {
            settings,
            buffer: String::new(),
            indent_level: 0,
        }
    }

    /// Write text, normalizing embedded newlines.
    pub fn write(&mut self, text: &str) -> &mut Self {
        let mut first = true;
        for segment in text.split('\n') {
            if !first {
                self.push_newline();
            }
            first = false;
            if !segment.is_empty() {
                self.push_indent_if_line_start();
                self.buffer.push_str(segment);
            }
        }
        self
    }

    /// Write text followed by a newline.
    pub fn write_line(&mut self, text: &str) -> &mut Self {
        self.write(text);
        self.push_newline();
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.push_newline();
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Run a callback with the indentation level raised by one.
    pub fn indented(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.indent();
        f(self);
        self.dedent();
        self
    }

    /// Write text wrapped in the preferred quote character, escaping the
    /// quote character and backslashes.
    pub fn quoted(&mut self, text: &str) -> &mut Self {
        let quote = self.settings.quotes.char();
        self.push_indent_if_line_start();
        self.buffer.push(quote);
        for ch in text.chars() {
            if ch == quote || ch == '\\' {
                self.buffer.push('\\');
            }
            self.buffer.push(ch);
        }
        self.buffer.push(quote);
        self
    }

    pub fn is_at_line_start(&self) -> bool {
        self.buffer.is_empty() || self.buffer.ends_with('\n')
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    fn push_newline(&mut self) {
        self.buffer.push_str(self.settings.newline.as_str());
    }

    fn push_indent_if_line_start(&mut self) {
        if self.is_at_line_start() {
            for _ in 0..self.indent_level {
                self.buffer.push_str(self.settings.indentation.as_str());
            }
        }
    }
}
