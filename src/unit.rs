//! Compilation units: one source text plus its current parsed tree.
//!
//! A unit always holds exactly one (text, tree) pair, derived together by the
//! parsing service and replaced together on every successful mutation. The
//! generation counter identifies each pair; node handles carry the generation
//! they were minted under and are re-validated lazily against it.

use crate::errors::SpliceError;
use crate::handle::NodeHandle;
use crate::parser::{GrammarParser, ParseService};
use crate::settings::ManipulationSettings;
use std::cell::RefCell;
use std::rc::Rc;
use tree_sitter::Tree;

/// One generation bump: the invalidation span in pre-edit coordinates plus
/// the signed length delta the edit applied.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EditRecord {
    pub(crate) start: usize,
    pub(crate) old_end: usize,
    pub(crate) delta: isize,
}

pub(crate) struct UnitInner {
    pub(crate) text: String,
    pub(crate) tree: Tree,
    pub(crate) generation: u64,
    pub(crate) records: Vec<EditRecord>,
    pub(crate) settings: ManipulationSettings,
    pub(crate) service: Box<dyn ParseService>,
}

impl UnitInner {
    /// Edit records applied after the given generation, in order.
    pub(crate) fn records_since(&self, generation: u64) -> &[EditRecord] {
        &self.records[generation as usize..]
    }
}

/// A compilation unit: current source text, current syntax tree, and the
/// mutable state shared with every [`NodeHandle`] minted from it.
///
/// Single-threaded by construction; the mutation pipeline runs to completion
/// as one unit of work and swaps the (text, tree) pair in a single visible
/// step.
pub struct SourceUnit {
    inner: Rc<RefCell<UnitInner>>,
}

impl SourceUnit {
    /// Load a unit with an explicit parsing service and settings.
    pub fn new(
        mut service: Box<dyn ParseService>,
        settings: ManipulationSettings,
        text: impl Into<String>,
    ) -> Result<Self, SpliceError> {
        let text = text.into();
        let tree = service.parse(&text)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(UnitInner {
                text,
                tree,
                generation: 0,
                records: Vec::new(),
                settings,
                service,
            })),
        })
    }

    /// Load Rust source with default settings.
    pub fn parse(text: impl Into<String>) -> Result<Self, SpliceError> {
        Self::new(
            Box::new(GrammarParser::rust()?),
            ManipulationSettings::default(),
            text,
        )
    }

    /// Load Rust source with explicit manipulation settings.
    pub fn with_settings(
        text: impl Into<String>,
        settings: ManipulationSettings,
    ) -> Result<Self, SpliceError> {
        Self::new(Box::new(GrammarParser::rust()?), settings, text)
    }

    /// A copy of the current full source text.
    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    /// Length of the current source text in bytes.
    pub fn len(&self) -> usize {
        self.inner.borrow().text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The generation of the current (text, tree) pair. Starts at zero and
    /// increments once per successful mutation.
    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    pub fn settings(&self) -> ManipulationSettings {
        self.inner.borrow().settings
    }

    /// A handle to the root node of the current tree.
    ///
    /// The root handle survives every edit: it re-roots to the whole buffer
    /// of whatever generation is current when it is next dereferenced.
    pub fn root(&self) -> NodeHandle {
        let inner = self.inner.borrow();
        let root = inner.tree.root_node();
        NodeHandle::mint(
            self.inner.clone(),
            Vec::new(),
            root.kind(),
            (root.start_byte(), root.end_byte()),
            inner.generation,
        )
    }

    /// Whether the current tree contains ERROR or missing nodes.
    pub fn has_parse_errors(&self) -> bool {
        self.inner.borrow().tree.root_node().has_error()
    }

    /// Byte spans of all ERROR and missing nodes in the current tree.
    pub fn parse_error_spans(&self) -> Vec<(usize, usize)> {
        let inner = self.inner.borrow();
        let mut spans = Vec::new();
        collect_error_spans(inner.tree.root_node(), &mut spans);
        spans
    }
}

fn collect_error_spans(node: tree_sitter::Node<'_>, spans: &mut Vec<(usize, usize)>) {
    if node.is_error() || node.is_missing() {
        spans.push((node.start_byte(), node.end_byte()));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_spans(child, spans);
    }
}
