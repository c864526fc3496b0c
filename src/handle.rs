//! Caller-visible node handles with generation-based staleness.
//!
//! A handle stores the generation it was minted under plus a root-relative
//! child-index path and the node's kind and byte span. Dereferencing replays
//! the unit's edit records: handles entirely before an edit survive
//! unchanged, proper ancestors of the edited span survive with their end
//! shifted, and everything else fails with [`SpliceError::StaleHandle`].
//! Survivors are re-rooted against the current tree and must still yield a
//! node of the recorded kind at the expected span. Staleness is discovered
//! lazily at the point of use; handles are never scanned at edit time.

use crate::errors::SpliceError;
use crate::splice::shift;
use crate::unit::UnitInner;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tree_sitter::Node;

/// A reference to a node within some generation of a unit's syntax tree.
#[derive(Clone)]
pub struct NodeHandle {
    unit: Rc<RefCell<UnitInner>>,
    path: Vec<usize>,
    kind: &'static str,
    generation: Cell<u64>,
    span: Cell<(usize, usize)>,
}

impl NodeHandle {
    pub(crate) fn mint(
        unit: Rc<RefCell<UnitInner>>,
        path: Vec<usize>,
        kind: &'static str,
        span: (usize, usize),
        generation: u64,
    ) -> Self {
        Self {
            unit,
            path,
            kind,
            generation: Cell::new(generation),
            span: Cell::new(span),
        }
    }

    /// The node kind this handle was minted with. Available even on a stale
    /// handle; everything that touches the tree is checked.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Whether the handle can still be dereferenced against the current
    /// tree. Never fails; probes instead of erroring.
    pub fn is_valid(&self) -> bool {
        let inner = self.unit.borrow();
        self.resolve(&inner).is_ok()
    }

    /// The node's `[pos, end)` byte span in the current text.
    pub fn span(&self) -> Result<(usize, usize), SpliceError> {
        let inner = self.unit.borrow();
        let node = self.resolve(&inner)?;
        Ok((node.start_byte(), node.end_byte()))
    }

    pub fn start(&self) -> Result<usize, SpliceError> {
        Ok(self.span()?.0)
    }

    pub fn end(&self) -> Result<usize, SpliceError> {
        Ok(self.span()?.1)
    }

    /// The node's text in the current source.
    pub fn text(&self) -> Result<String, SpliceError> {
        let inner = self.unit.borrow();
        let node = self.resolve(&inner)?;
        Ok(inner.text[node.byte_range()].to_string())
    }

    pub fn child_count(&self) -> Result<usize, SpliceError> {
        let inner = self.unit.borrow();
        let node = self.resolve(&inner)?;
        Ok(node.child_count())
    }

    /// A handle to the i-th child (named and anonymous alike).
    pub fn child(&self, i: usize) -> Result<Option<NodeHandle>, SpliceError> {
        let inner = self.unit.borrow();
        let node = self.resolve(&inner)?;
        let Some(child) = node.child(i) else {
            return Ok(None);
        };
        let mut path = self.path.clone();
        path.push(i);
        Ok(Some(NodeHandle::mint(
            self.unit.clone(),
            path,
            child.kind(),
            (child.start_byte(), child.end_byte()),
            inner.generation,
        )))
    }

    pub fn children(&self) -> Result<Vec<NodeHandle>, SpliceError> {
        let inner = self.unit.borrow();
        let node = self.resolve(&inner)?;
        let mut children = Vec::with_capacity(node.child_count());
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                let mut path = self.path.clone();
                path.push(i);
                children.push(NodeHandle::mint(
                    self.unit.clone(),
                    path,
                    child.kind(),
                    (child.start_byte(), child.end_byte()),
                    inner.generation,
                ));
            }
        }
        Ok(children)
    }

    pub fn parent(&self) -> Result<Option<NodeHandle>, SpliceError> {
        let inner = self.unit.borrow();
        self.resolve(&inner)?;
        let Some((_, parent_path)) = self.path.split_last() else {
            return Ok(None);
        };
        let parent = node_at_path(inner.tree.root_node(), parent_path)
            .ok_or_else(|| self.stale_error(&inner))?;
        Ok(Some(NodeHandle::mint(
            self.unit.clone(),
            parent_path.to_vec(),
            parent.kind(),
            (parent.start_byte(), parent.end_byte()),
            inner.generation,
        )))
    }

    /// The smallest descendant spanning the given byte range.
    pub fn descendant_for_span(
        &self,
        start: usize,
        end: usize,
    ) -> Result<Option<NodeHandle>, SpliceError> {
        let inner = self.unit.borrow();
        let node = self.resolve(&inner)?;
        let Some(found) = node.descendant_for_byte_range(start, end) else {
            return Ok(None);
        };
        Ok(Some(self.mint_for(found, &inner)))
    }

    /// The first descendant of the given kind, in document order,
    /// excluding this node itself.
    pub fn descendant_of_kind(&self, kind: &str) -> Result<Option<NodeHandle>, SpliceError> {
        let inner = self.unit.borrow();
        let node = self.resolve(&inner)?;
        let Some(found) = find_descendant_of_kind(node, kind) else {
            return Ok(None);
        };
        Ok(Some(self.mint_for(found, &inner)))
    }

    pub(crate) fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub(crate) fn path(&self) -> &[usize] {
        &self.path
    }

    pub(crate) fn unit_rc(&self) -> &Rc<RefCell<UnitInner>> {
        &self.unit
    }

    /// Re-validate against the current generation and resolve to a node in
    /// the current tree. Updates the cached generation and span on success.
    pub(crate) fn resolve<'a>(&self, inner: &'a UnitInner) -> Result<Node<'a>, SpliceError> {
        let minted = self.generation.get();
        let current = inner.generation;

        let (start, end) = if minted == current {
            self.span.get()
        } else if self.path.is_empty() {
            // The root is the unit; it always re-roots to the whole buffer.
            (0, inner.text.len())
        } else {
            let (start, mut end) = self.span.get();
            for record in inner.records_since(minted) {
                if end <= record.start {
                    // Entirely before the invalidation span.
                    continue;
                }
                let strictly_around = start <= record.start
                    && end >= record.old_end
                    && (start < record.start || end > record.old_end);
                if strictly_around {
                    end = shift(end, record.delta);
                    continue;
                }
                // Inside, equal to, straddling, or after the edited span.
                return Err(SpliceError::StaleHandle { minted, current });
            }
            (start, end)
        };

        let node = node_at_path(inner.tree.root_node(), &self.path)
            .ok_or(SpliceError::StaleHandle { minted, current })?;
        if node.kind() != self.kind || node.start_byte() != start || node.end_byte() != end {
            return Err(SpliceError::StaleHandle { minted, current });
        }

        self.span.set((start, end));
        self.generation.set(current);
        Ok(node)
    }

    fn mint_for(&self, node: Node<'_>, inner: &UnitInner) -> NodeHandle {
        NodeHandle::mint(
            self.unit.clone(),
            path_from_root(node),
            node.kind(),
            (node.start_byte(), node.end_byte()),
            inner.generation,
        )
    }

    fn stale_error(&self, inner: &UnitInner) -> SpliceError {
        SpliceError::StaleHandle {
            minted: self.generation.get(),
            current: inner.generation,
        }
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHandle")
            .field("kind", &self.kind)
            .field("span", &self.span.get())
            .field("generation", &self.generation.get())
            .field("path", &self.path)
            .finish()
    }
}

/// Walk a root-relative child-index path down the current tree.
pub(crate) fn node_at_path<'t>(root: Node<'t>, path: &[usize]) -> Option<Node<'t>> {
    let mut node = root;
    for &index in path {
        node = node.child(index)?;
    }
    Some(node)
}

/// Compute a node's root-relative child-index path by climbing its parents.
pub(crate) fn path_from_root(node: Node<'_>) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(parent) = current.parent() {
        for i in 0..parent.child_count() {
            if parent.child(i).map(|c| c.id()) == Some(current.id()) {
                path.push(i);
                break;
            }
        }
        current = parent;
    }
    path.reverse();
    path
}

fn find_descendant_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    for i in 0..node.child_count() {
        let child = node.child(i)?;
        if child.kind() == kind {
            return Some(child);
        }
        if let Some(found) = find_descendant_of_kind(child, kind) {
            return Some(found);
        }
    }
    None
}
