//! Bounds validation for proposed edit ranges.
//!
//! Edits are anchored to a child-list attachment point: the interior between
//! a node's delimiter tokens, where inserted text has a well-defined slot to
//! land in. Only the unit root validates against its own full span.

use crate::errors::SpliceError;
use tree_sitter::Node;

/// The span a proposed range is validated against and the invalidation scope
/// for the resynchronizer.
///
/// For the unit root this is the whole buffer; for any other node it is the
/// interior of the node's child syntax list. A non-root node without one is
/// not text-editable.
pub(crate) fn authoritative_span(
    node: Node<'_>,
    is_root: bool,
) -> Result<(usize, usize), SpliceError> {
    if is_root {
        return Ok((node.start_byte(), node.end_byte()));
    }
    child_list_span(node).ok_or_else(|| SpliceError::NoEditableSpan {
        kind: node.kind().to_string(),
    })
}

/// The interior between a node's delimiter tokens, descending through `body`
/// fields when the delimiters live one level down (`fn` -> `block`,
/// `struct` -> `field_declaration_list`).
pub(crate) fn child_list_span(node: Node<'_>) -> Option<(usize, usize)> {
    if let Some(span) = delimited_interior(node) {
        return Some(span);
    }
    child_list_span(node.child_by_field_name("body")?)
}

fn delimited_interior(node: Node<'_>) -> Option<(usize, usize)> {
    let mut open: Option<Node> = None;
    let mut close: Option<Node> = None;

    for i in 0..node.child_count() {
        let child = node.child(i)?;
        if child.is_named() {
            continue;
        }
        match child.kind() {
            "{" | "(" | "[" if open.is_none() => open = Some(child),
            "}" | ")" | "]" => close = Some(child),
            _ => {}
        }
    }

    match (open, close) {
        (Some(open), Some(close)) if open.end_byte() <= close.start_byte() => {
            Some((open.end_byte(), close.start_byte()))
        }
        _ => None,
    }
}

/// Run the ordered validation checks for a proposed `[pos, end)` range.
///
/// Containment is checked first (both endpoints inclusive), then character
/// boundaries, then ordering. No effects occur before these checks pass; in
/// particular a writer callback is never invoked for a range that fails here.
pub(crate) fn verify_range(
    pos: usize,
    end: usize,
    authoritative: (usize, usize),
    text: &str,
) -> Result<(), SpliceError> {
    verify_position(pos, authoritative)?;
    verify_position(end, authoritative)?;
    verify_char_boundary(pos, text)?;
    verify_char_boundary(end, text)?;

    if pos > end {
        return Err(SpliceError::InvalidOrder { pos, end });
    }
    Ok(())
}

fn verify_position(value: usize, (lower, upper): (usize, usize)) -> Result<(), SpliceError> {
    if value >= lower && value <= upper {
        return Ok(());
    }
    Err(SpliceError::OutOfRange {
        value,
        lower,
        upper,
    })
}

fn verify_char_boundary(value: usize, text: &str) -> Result<(), SpliceError> {
    if text.is_char_boundary(value) {
        return Ok(());
    }
    Err(SpliceError::NotCharBoundary { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{GrammarParser, ParseService};

    fn parse(source: &str) -> tree_sitter::Tree {
        GrammarParser::rust().unwrap().parse(source).unwrap()
    }

    #[test]
    fn struct_body_interior() {
        let source = "struct C { }";
        let tree = parse(source);
        let item = tree.root_node().child(0).unwrap();
        assert_eq!(item.kind(), "struct_item");

        // Interior of "{ }" excludes both braces.
        let open = source.find('{').unwrap();
        let close = source.find('}').unwrap();
        assert_eq!(child_list_span(item), Some((open + 1, close)));
    }

    #[test]
    fn function_body_descends_through_body_field() {
        let source = "fn main() { let x = 1; }";
        let tree = parse(source);
        let item = tree.root_node().child(0).unwrap();
        assert_eq!(item.kind(), "function_item");

        let open = source.find('{').unwrap();
        let close = source.rfind('}').unwrap();
        assert_eq!(child_list_span(item), Some((open + 1, close)));
    }

    #[test]
    fn leaf_node_has_no_child_list() {
        let source = "fn main() { }";
        let tree = parse(source);
        let item = tree.root_node().child(0).unwrap();
        let name = item.child_by_field_name("name").unwrap();
        assert_eq!(name.kind(), "identifier");
        assert_eq!(child_list_span(name), None);
    }

    #[test]
    fn root_validates_against_own_span() {
        let source = "fn main() { }";
        let tree = parse(source);
        let span = authoritative_span(tree.root_node(), true).unwrap();
        assert_eq!(span, (0, source.len()));
    }

    #[test]
    fn non_root_without_child_list_is_rejected() {
        let source = "fn main() { }";
        let tree = parse(source);
        let item = tree.root_node().child(0).unwrap();
        let name = item.child_by_field_name("name").unwrap();
        let err = authoritative_span(name, false).unwrap_err();
        assert!(matches!(err, SpliceError::NoEditableSpan { .. }));
    }

    #[test]
    fn containment_is_inclusive_of_both_endpoints() {
        assert!(verify_range(3, 7, (3, 7), "0123456789").is_ok());
    }

    #[test]
    fn out_of_range_carries_interval_and_value() {
        let err = verify_range(2, 5, (3, 7), "0123456789").unwrap_err();
        match err {
            SpliceError::OutOfRange {
                value,
                lower,
                upper,
            } => {
                assert_eq!((value, lower, upper), (2, 3, 7));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn order_is_checked_after_containment() {
        let err = verify_range(6, 4, (3, 7), "0123456789").unwrap_err();
        assert!(matches!(err, SpliceError::InvalidOrder { pos: 6, end: 4 }));
    }

    #[test]
    fn interior_of_multibyte_scalar_is_rejected() {
        // "é" is two bytes; offset 1 falls inside it.
        let err = verify_range(1, 2, (0, 2), "é").unwrap_err();
        assert!(matches!(err, SpliceError::NotCharBoundary { value: 1 }));
    }
}
