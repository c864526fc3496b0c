//! The splice engine: pure text-level range replacement.
//!
//! Everything the mutation facade does compiles down to this one primitive.
//! Intelligence lives in span acquisition and resynchronization, not here.

/// Result of splicing replacement text into a source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Splice {
    /// The full new source text.
    pub(crate) new_text: String,
    /// Signed shift for every position at or after the replaced range's end.
    pub(crate) delta: isize,
}

/// Replace `source[pos..end]` with `replacement`.
///
/// Callers must have validated that `pos <= end`, both offsets are in bounds,
/// and both fall on character boundaries.
pub(crate) fn splice(source: &str, pos: usize, end: usize, replacement: &str) -> Splice {
    let mut new_text =
        String::with_capacity(source.len() - (end - pos) + replacement.len());
    new_text.push_str(&source[..pos]);
    new_text.push_str(replacement);
    new_text.push_str(&source[end..]);

    Splice {
        new_text,
        delta: replacement.len() as isize - (end - pos) as isize,
    }
}

/// Apply a signed shift to a position at or after a replaced range.
pub(crate) fn shift(position: usize, delta: isize) -> usize {
    debug_assert!(delta >= 0 || position >= delta.unsigned_abs());
    (position as isize + delta) as usize
}
