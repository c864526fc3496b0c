//! Treesplice: source-text mutation with full-tree resynchronization
//!
//! A bounded text-mutation core for syntax trees: insert, replace, or remove
//! a span of source text at arbitrary byte positions while keeping the tree
//! a faithful, fully re-derived structural model of the edited text.
//!
//! # Architecture
//!
//! All mutation operations compile down to a single primitive: a validated
//! byte-span replacement followed by a full re-parse. Each call on a
//! [`TextEditable`] node runs a fixed pipeline - validate the range against
//! the node's child-list attachment point, generate the replacement text,
//! splice, re-parse through the [`ParseService`], and swap the unit's
//! (text, tree) pair in a single visible step. Intelligence lives in span
//! acquisition and handle re-validation, not in the application logic.
//!
//! # Safety
//!
//! - A failed call leaves text, tree, and all handles byte-for-byte unchanged
//! - Node handles are invalidated, never silently reused: a [`NodeHandle`]
//!   referencing a superseded tree generation fails fast at the point of use
//! - Handles to ancestors of an edit survive and re-root against the new tree
//! - Byte offsets are validated against UTF-8 character boundaries up front
//!
//! # Example
//!
//! ```no_run
//! use treesplice::{SourceUnit, TextEditable};
//!
//! # fn main() -> Result<(), treesplice::SpliceError> {
//! let unit = SourceUnit::parse("struct Point { }")?;
//!
//! // Edits anchored to the root validate against the whole buffer.
//! let brace = unit.text().find('}').unwrap();
//! unit.insert_text(brace, "x: i32, y: i32 ")?;
//! assert_eq!(unit.text(), "struct Point { x: i32, y: i32 }");
//! # Ok(())
//! # }
//! ```

mod bounds;
mod splice;

pub mod editable;
pub mod errors;
pub mod handle;
pub mod parser;
pub mod settings;
pub mod unit;
pub mod writer;

// Re-exports
pub use editable::TextEditable;
pub use errors::{ParseError, SpliceError};
pub use handle::NodeHandle;
pub use parser::{GrammarParser, ParseService};
pub use settings::{IndentationText, ManipulationSettings, NewlineKind, QuoteKind};
pub use unit::SourceUnit;
pub use writer::{CodeWriter, TextInput};

// Implementors of ParseService need the tree-sitter types.
pub use tree_sitter;
