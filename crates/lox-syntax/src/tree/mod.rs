//! # Tree - Arena Syntax Tree and Query Surface
//!
//! A parse produces a [`SyntaxTree`]: every node lives in one arena
//! (`Vec<NodeData>`) and is addressed by a [`NodeId`]. Consumers never see
//! the arena directly; they walk the tree through [`Node`] handles, which are
//! `Copy` and cheap to pass around.
//!
//! ## Ownership
//!
//! The tree borrows the source it was parsed from (`SyntaxTree<'s>`). Token
//! text is never copied, so `Node::text` is a slice of the caller's buffer
//! and the buffer has to outlive the tree.
//!
//! ## Ranges and Padding
//!
//! Whitespace is not stored as tokens. Each node instead records the
//! whitespace in front of it as `padding`:
//!
//! ```text
//! source:   "1 +  2;"
//! number    [0..1]          padding 0
//! "+"       [2..3]          padding 1   padded [1..3]
//! number    [5..6]          padding 2   padded [3..6]
//! ```
//!
//! The padded ranges of a node's children tile the node exactly, and the
//! root always spans the whole input, trailing whitespace included. Joining
//! the padded text of every leaf in order plus the root's trailing
//! whitespace reproduces the source byte for byte.
//!
//! ## Fields
//!
//! Field names are an index over the children, resolved once when a node is
//! reduced. Looking up `left` returns the same [`Node`] as positional access
//! to child 0 of a binary expression, every time.
//!
//! ```
//! let tree = lox_syntax::parse("print 1 + 2;");
//! let print = tree.root().child(0).unwrap();
//! let sum = print.child_by_field_name("expression").unwrap();
//! assert_eq!(sum.kind(), "binary_expression");
//! assert_eq!(sum.child_by_field_name("right").unwrap().text(), "2");
//! ```

use std::fmt;
use std::ops::Range;

use crate::error::SyntaxError;
use crate::language::{FieldId, Language, ProductionId, Symbol, SymbolMetadata};
use crate::syntax_kind::SyntaxKind;

/// Index of a node in its tree's arena.
///
/// Ids are plain `usize` indices, so any arena `Vec` can hold is addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A zero-based row and byte column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Arena storage for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub(crate) symbol: Symbol,
    /// Text range, padding excluded.
    pub(crate) range: Range<usize>,
    pub(crate) padding: usize,
    pub(crate) children: Vec<NodeId>,
    /// `(field, child index)` pairs.
    pub(crate) fields: Vec<(FieldId, usize)>,
    pub(crate) parent: Option<NodeId>,
    /// `None` for leaves and error nodes.
    pub(crate) production: Option<ProductionId>,
    pub(crate) has_error: bool,
}

impl NodeData {
    pub(crate) fn padded_start(&self) -> usize {
        self.range.start - self.padding
    }
}

/// The result of a parse.
pub struct SyntaxTree<'s> {
    source: &'s str,
    language: &'static Language,
    nodes: Vec<NodeData>,
    root: NodeId,
    errors: Vec<SyntaxError>,
    line_starts: Vec<usize>,
}

impl<'s> SyntaxTree<'s> {
    pub(crate) fn new(
        source: &'s str,
        language: &'static Language,
        nodes: Vec<NodeData>,
        root: NodeId,
        errors: Vec<SyntaxError>,
    ) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self {
            source,
            language,
            nodes,
            root,
            errors,
            line_starts,
        }
    }

    pub fn root(&self) -> Node<'_, 's> {
        Node {
            tree: self,
            id: self.root,
            data: &self.nodes[self.root.index()],
        }
    }

    /// Handle for an arena id, if it belongs to this tree.
    pub fn node(&self, id: NodeId) -> Option<Node<'_, 's>> {
        self.nodes.get(id.index()).map(|data| Node {
            tree: self,
            id,
            data,
        })
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn language(&self) -> &'static Language {
        self.language
    }

    /// Diagnostics recorded by error recovery, in input order.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.root().has_error()
    }

    /// Leaf nodes (tokens and unlexable bytes) in source order.
    pub fn leaves(&self) -> impl Iterator<Item = Node<'_, 's>> {
        self.root().descendants().filter(|node| node.is_leaf())
    }

    /// Row and column of a byte offset. Offsets past the end clamp to it.
    pub fn point_for_byte(&self, offset: usize) -> Point {
        let offset = offset.min(self.source.len());
        let row = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(row).copied().unwrap_or(0);
        Point {
            row,
            column: offset - line_start,
        }
    }

    /// The tree as a tree-sitter style S-expression.
    pub fn to_sexp(&self) -> String {
        self.root().to_sexp()
    }
}

impl fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.language.name)
            .field("nodes", &self.nodes.len())
            .field("errors", &self.errors)
            .finish()
    }
}

/// Indented dump: one line per node, `kind@start..end`, leaves with text.
impl fmt::Display for SyntaxTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self.root(), None, 0)
    }
}

fn write_tree(
    f: &mut fmt::Formatter<'_>,
    node: Node<'_, '_>,
    field: Option<&str>,
    depth: usize,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let field = field.map(|name| format!("{name}: ")).unwrap_or_default();
    let range = node.byte_range();
    if node.is_leaf() {
        writeln!(
            f,
            "{indent}{field}{}@{}..{} {:?}",
            node.kind(),
            range.start,
            range.end,
            node.text()
        )?;
        return Ok(());
    }
    writeln!(f, "{indent}{field}{}@{}..{}", node.kind(), range.start, range.end)?;
    for (index, child) in node.children().enumerate() {
        write_tree(f, child, node.field_name_for_child(index), depth + 1)?;
    }
    Ok(())
}

/// A node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct Node<'t, 's> {
    tree: &'t SyntaxTree<'s>,
    id: NodeId,
    data: &'t NodeData,
}

impl<'t, 's> Node<'t, 's> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree<'s> {
        self.tree
    }

    pub fn symbol(&self) -> Symbol {
        self.data.symbol
    }

    /// The Lox kind, when the tree was parsed with the Lox grammar.
    pub fn syntax_kind(&self) -> Option<SyntaxKind> {
        SyntaxKind::from_symbol(self.data.symbol)
    }

    /// Display name of the node's symbol.
    pub fn kind(&self) -> &'static str {
        self.tree.language.symbol_name(self.data.symbol)
    }

    fn metadata(&self) -> SymbolMetadata {
        self.tree.language.symbol_metadata(self.data.symbol)
    }

    pub fn is_named(&self) -> bool {
        self.metadata().named
    }

    pub fn is_visible(&self) -> bool {
        self.metadata().visible
    }

    pub fn is_error(&self) -> bool {
        self.data.symbol == Symbol::ERROR
    }

    /// True if this node is or contains an error node.
    pub fn has_error(&self) -> bool {
        self.data.has_error
    }

    /// True for tokens and unlexable bytes.
    pub fn is_leaf(&self) -> bool {
        self.data.production.is_none() && self.data.children.is_empty()
    }

    pub fn production(&self) -> Option<ProductionId> {
        self.data.production
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.data.range.clone()
    }

    /// Byte range including leading whitespace.
    pub fn padded_range(&self) -> Range<usize> {
        self.data.padded_start()..self.data.range.end
    }

    pub fn start_byte(&self) -> usize {
        self.data.range.start
    }

    pub fn end_byte(&self) -> usize {
        self.data.range.end
    }

    pub fn start_position(&self) -> Point {
        self.tree.point_for_byte(self.data.range.start)
    }

    pub fn end_position(&self) -> Point {
        self.tree.point_for_byte(self.data.range.end)
    }

    pub fn text(&self) -> &'s str {
        self.tree.source.get(self.data.range.clone()).unwrap_or("")
    }

    pub fn child_count(&self) -> usize {
        self.data.children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t, 's>> {
        let id = *self.data.children.get(index)?;
        self.tree.node(id)
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t, 's>> + use<'t, 's> {
        let tree = self.tree;
        self.data.children.iter().filter_map(move |id| tree.node(*id))
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node<'t, 's>> + use<'t, 's> {
        self.children().filter(|child| child.is_named())
    }

    pub fn child_by_field_id(&self, field: FieldId) -> Option<Node<'t, 's>> {
        self.data
            .fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .and_then(|(_, index)| self.child(*index))
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node<'t, 's>> {
        let field = self.tree.language.field_id_for_name(name)?;
        self.child_by_field_id(field)
    }

    /// Every child carrying the field, in child order.
    pub fn children_by_field_name(&self, name: &str) -> Vec<Node<'t, 's>> {
        let Some(field) = self.tree.language.field_id_for_name(name) else {
            return Vec::new();
        };
        let mut indices: Vec<usize> = self
            .data
            .fields
            .iter()
            .filter(|(candidate, _)| *candidate == field)
            .map(|(_, index)| *index)
            .collect();
        indices.sort_unstable();
        indices.into_iter().filter_map(|index| self.child(index)).collect()
    }

    pub fn field_name_for_child(&self, index: usize) -> Option<&'static str> {
        self.data
            .fields
            .iter()
            .find(|(_, child)| *child == index)
            .and_then(|(field, _)| self.tree.language.field_name(*field))
    }

    pub fn parent(&self) -> Option<Node<'t, 's>> {
        self.tree.node(self.data.parent?)
    }

    /// This node and everything below it, in pre-order.
    pub fn descendants(&self) -> Descendants<'t, 's> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// S-expression of the named nodes below and including this one.
    ///
    /// Anonymous tokens are omitted, fields are written as `name: (...)` and
    /// unlexable bytes as `(UNEXPECTED "...")`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(&mut out, *self, None);
        out
    }
}

fn write_sexp(out: &mut String, node: Node<'_, '_>, field: Option<&str>) {
    if let Some(field) = field {
        out.push_str(field);
        out.push_str(": ");
    }
    if node.is_error() && node.is_leaf() {
        out.push_str(&format!("(UNEXPECTED {:?})", node.text()));
        return;
    }
    out.push('(');
    out.push_str(node.kind());
    for (index, child) in node.children().enumerate() {
        if child.is_named() {
            out.push(' ');
            write_sexp(out, child, node.field_name_for_child(index));
        }
    }
    out.push(')');
}

impl PartialEq for Node<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_, '_> {}

impl fmt::Debug for Node<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.byte_range();
        write!(f, "{}@{}..{}", self.kind(), range.start, range.end)
    }
}

/// Pre-order walk returned by [`Node::descendants`].
pub struct Descendants<'t, 's> {
    tree: &'t SyntaxTree<'s>,
    stack: Vec<NodeId>,
}

impl<'t, 's> Iterator for Descendants<'t, 's> {
    type Item = Node<'t, 's>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.node(self.stack.pop()?)?;
        self.stack.extend(node.data.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_spans_whole_input() {
        let tree = parse("  1;  \n");
        let root = tree.root();
        assert_eq!(root.kind(), "program");
        assert_eq!(root.byte_range(), 0..7);
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn empty_program() {
        let tree = parse("");
        assert_eq!(tree.root().child_count(), 0);
        assert_eq!(tree.to_sexp(), "(program)");
        assert!(!tree.has_errors());
    }

    #[test]
    fn whitespace_only_program() {
        let tree = parse(" \n\t ");
        assert_eq!(tree.root().byte_range(), 0..4);
        assert_eq!(tree.root().child_count(), 0);
    }

    #[test]
    fn leaves_keep_their_text() {
        let tree = parse("print \"hi\" ;");
        let texts: Vec<_> = tree.leaves().map(|leaf| leaf.text()).collect();
        assert_eq!(texts, vec!["print", "\"hi\"", ";"]);
    }

    #[test]
    fn padded_ranges() {
        let tree = parse("1 +  2;");
        let leaves: Vec<_> = tree.leaves().collect();
        assert_eq!(leaves[1].byte_range(), 2..3);
        assert_eq!(leaves[1].padded_range(), 1..3);
        assert_eq!(leaves[2].padded_range(), 3..6);
    }

    #[test]
    fn positions() {
        let tree = parse("1;\n  print 2;");
        let print = tree.root().child(1).unwrap();
        assert_eq!(print.kind(), "print_statement");
        assert_eq!(print.start_position().row, 1);
        assert_eq!(print.start_position().column, 2);
        assert_eq!(print.end_position().to_string(), "1:10");
        assert_eq!(tree.point_for_byte(100).row, 1);
    }

    #[test]
    fn parents_point_back() {
        let tree = parse("print -(1);");
        for node in tree.root().descendants() {
            for child in node.children() {
                assert_eq!(child.parent(), Some(node));
            }
        }
    }

    #[test]
    fn named_children_skip_punctuation() {
        let tree = parse("(1 + 2);");
        let group = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(group.kind(), "group_expression");
        assert_eq!(group.child_count(), 3);
        assert_eq!(group.named_child_count(), 1);
        assert!(!group.child(0).unwrap().is_named());
    }

    #[test]
    fn field_names_for_children() {
        let tree = parse("true ? 1 : 2;");
        let ternary = tree.root().child(0).unwrap().child(0).unwrap();
        let names: Vec<_> = (0..ternary.child_count())
            .map(|index| ternary.field_name_for_child(index))
            .collect();
        assert_eq!(
            names,
            vec![Some("condition"), None, Some("then"), None, Some("else")]
        );
        assert_eq!(ternary.children_by_field_name("then").len(), 1);
        assert!(ternary.children_by_field_name("left").is_empty());
        assert!(ternary.child_by_field_name("nonsense").is_none());
    }

    #[test]
    fn boolean_wraps_keyword() {
        let tree = parse("false;");
        let boolean = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(boolean.kind(), "boolean");
        assert!(boolean.is_named());
        assert!(!boolean.is_leaf());
        assert_eq!(boolean.text(), "false");
        assert!(!boolean.child(0).unwrap().is_named());
    }

    #[test]
    fn display_dump() {
        let tree = parse("print 1;");
        assert_eq!(
            tree.to_string(),
            "program@0..8\n  print_statement@0..8\n    print@0..5 \"print\"\n    expression: number@6..7 \"1\"\n    ;@7..8 \";\"\n"
        );
    }

    #[test]
    fn sexp_shows_fields() {
        let tree = parse("-1 * 2;");
        assert_eq!(
            tree.to_sexp(),
            "(program (expression_statement expression: (binary_expression left: (unary_expression right: (number)) right: (number))))"
        );
    }

    #[test]
    fn node_ids_resolve() {
        let tree = parse("1;");
        let statement = tree.root().child(0).unwrap();
        assert_eq!(tree.node(statement.id()), Some(statement));
        assert!(tree.node(super::NodeId(9999)).is_none());
    }

    #[test]
    fn node_ids_use_the_full_index_range() {
        let index = usize::MAX;
        assert_eq!(super::NodeId(index).index(), index);
        assert!(parse("1;").node(super::NodeId(index)).is_none());
    }
}
