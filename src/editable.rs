//! The mutation facade: insert, replace, and remove text on a node.
//!
//! All three operations funnel into one internal range-replace primitive.
//! Intelligence lives in span acquisition and handle re-validation; the
//! application itself is a single text splice followed by a full re-parse.
//!
//! Each call runs the fixed pipeline to completion as one unit of work:
//! resolve the anchor, validate the range, generate the replacement text,
//! splice, re-parse, swap the (text, tree) pair, and re-resolve the anchor in
//! the new tree. A failure at any stage leaves the unit byte-for-byte
//! unchanged. Writer callbacks may read the unit while generating text, but a
//! re-entrant edit from inside a callback panics rather than interleaving.

use crate::bounds;
use crate::errors::SpliceError;
use crate::handle::{node_at_path, NodeHandle};
use crate::splice::{shift, splice};
use crate::unit::{EditRecord, SourceUnit};
use crate::writer::TextInput;

/// Capability interface for nodes whose text content can be edited.
///
/// Implemented by any wrapper that can supply a child-list attachment point.
/// Every operation re-parses the whole unit and invalidates handles to the
/// edited span's contents; the returned handle is a fresh view of the node
/// the call was made on, enabling fluent chaining.
pub trait TextEditable {
    /// Replace `[pos, end)` within the node's editable span with new text.
    fn replace_text(
        &self,
        range: (usize, usize),
        text: impl Into<TextInput>,
    ) -> Result<NodeHandle, SpliceError>;

    /// Insert text at a position within the node's editable span.
    fn insert_text(
        &self,
        pos: usize,
        text: impl Into<TextInput>,
    ) -> Result<NodeHandle, SpliceError> {
        self.replace_text((pos, pos), text)
    }

    /// Remove `[pos, end)` from the node's editable span.
    fn remove_text(&self, pos: usize, end: usize) -> Result<NodeHandle, SpliceError> {
        self.replace_text((pos, end), "")
    }
}

impl TextEditable for NodeHandle {
    fn replace_text(
        &self,
        (pos, end): (usize, usize),
        text: impl Into<TextInput>,
    ) -> Result<NodeHandle, SpliceError> {
        replace_range(self, pos, end, text.into())
    }
}

impl TextEditable for SourceUnit {
    fn replace_text(
        &self,
        range: (usize, usize),
        text: impl Into<TextInput>,
    ) -> Result<NodeHandle, SpliceError> {
        self.root().replace_text(range, text)
    }
}

/// Expected identity of the anchor node after the swap.
struct Anchor {
    path: Vec<usize>,
    kind: &'static str,
    start: usize,
    end: usize,
}

/// The internal range-replace primitive every facade operation compiles to.
fn replace_range(
    anchor: &NodeHandle,
    pos: usize,
    end: usize,
    input: TextInput,
) -> Result<NodeHandle, SpliceError> {
    let unit = anchor.unit_rc().clone();

    // Validate, generate, and splice against the current generation. The
    // borrow is held across the writer callback so a re-entrant edit cannot
    // interleave with a half-computed splice.
    let (new_text, record, expected) = {
        let inner = unit.borrow();
        let node = anchor.resolve(&inner)?;
        let authoritative = bounds::authoritative_span(node, anchor.is_root())?;
        bounds::verify_range(pos, end, authoritative, &inner.text)?;

        let replacement = input.resolve(&inner.settings);
        let result = splice(&inner.text, pos, end, &replacement);
        let record = EditRecord {
            start: authoritative.0,
            old_end: authoritative.1,
            delta: result.delta,
        };
        let expected = Anchor {
            path: anchor.path().to_vec(),
            kind: anchor.kind(),
            start: node.start_byte(),
            end: shift(node.end_byte(), result.delta),
        };
        (result.new_text, record, expected)
    };

    // Re-parse the full text, then install the new (text, tree) pair as a
    // single visible swap. A parse failure aborts with zero state change.
    {
        let mut inner = unit.borrow_mut();
        let tree = inner.service.parse(&new_text)?;
        inner.text = new_text;
        inner.tree = tree;
        inner.generation += 1;
        inner.records.push(record);
    }

    // Re-resolve the anchor in the new tree. The edit's range was confined
    // to the anchor's child list, so a missing or reshaped anchor means the
    // edit swallowed its own attachment point; report it, never substitute a
    // different node.
    let inner = unit.borrow();
    let resolved = node_at_path(inner.tree.root_node(), &expected.path).filter(|node| {
        node.kind() == expected.kind
            && node.start_byte() == expected.start
            && node.end_byte() == expected.end
    });
    let Some(node) = resolved else {
        return Err(SpliceError::ReResolution {
            kind: expected.kind.to_string(),
            start: expected.start,
            end: expected.end,
        });
    };
    let handle = NodeHandle::mint(
        unit.clone(),
        expected.path,
        expected.kind,
        (node.start_byte(), node.end_byte()),
        inner.generation,
    );
    drop(inner);
    Ok(handle)
}
