//! Builder that turns shifts and reductions into arena nodes.

use crate::error::SyntaxError;
use crate::language::{FieldId, FieldMapEntry, Language, Production, ProductionId, Symbol};
use crate::lexer::{LexError, Token};
use crate::tree::{NodeData, NodeId, SyntaxTree};

/// Accumulates the nodes of one parse.
pub(crate) struct TreeBuilder<'s> {
    source: &'s str,
    language: &'static Language,
    nodes: Vec<NodeData>,
}

impl<'s> TreeBuilder<'s> {
    pub(crate) fn new(source: &'s str, language: &'static Language) -> Self {
        Self {
            source,
            language,
            nodes: Vec::new(),
        }
    }

    /// A leaf for a shifted token.
    pub(crate) fn leaf(&mut self, token: &Token<'_>) -> NodeId {
        self.push(NodeData {
            symbol: token.symbol,
            range: token.range.clone(),
            padding: token.padding,
            children: Vec::new(),
            fields: Vec::new(),
            parent: None,
            production: None,
            has_error: false,
        })
    }

    /// An `ERROR` leaf for bytes the tokenizer could not match.
    pub(crate) fn error_leaf(&mut self, error: &LexError) -> NodeId {
        self.push(NodeData {
            symbol: Symbol::ERROR,
            range: error.range.clone(),
            padding: error.padding,
            children: Vec::new(),
            fields: Vec::new(),
            parent: None,
            production: None,
            has_error: true,
        })
    }

    /// The node for a reduction. `children` are the popped stack nodes in
    /// source order; `empty_at` positions a node that has none.
    pub(crate) fn reduce(
        &mut self,
        id: ProductionId,
        production: &Production,
        children: Vec<NodeId>,
        empty_at: usize,
    ) -> NodeId {
        self.node(
            production.symbol,
            Some(id),
            children,
            production.fields,
            empty_at,
        )
    }

    /// An `ERROR` node wrapping whatever recovery skipped.
    pub(crate) fn error_node(&mut self, children: Vec<NodeId>, empty_at: usize) -> NodeId {
        self.node(Symbol::ERROR, None, children, &[], empty_at)
    }

    /// A root assembled from a stack that never reached acceptance.
    pub(crate) fn partial_root(&mut self, children: Vec<NodeId>) -> NodeId {
        let symbol = self.language.root_symbol;
        self.node(symbol, None, children, &[], 0)
    }

    pub(crate) fn finish(mut self, root: NodeId, errors: Vec<SyntaxError>) -> SyntaxTree<'s> {
        // The root owns leading and trailing whitespace too.
        if let Some(data) = self.nodes.get_mut(root.index()) {
            data.range = 0..self.source.len();
            data.padding = 0;
        }
        SyntaxTree::new(self.source, self.language, self.nodes, root, errors)
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = self.next_id();
        self.nodes.push(data);
        id
    }

    /// Invisible nonterminals are spliced into their parent.
    fn is_hidden(&self, data: &NodeData) -> bool {
        data.symbol != Symbol::ERROR
            && !self.language.is_terminal(data.symbol)
            && !self.language.symbol_metadata(data.symbol).visible
    }

    fn node(
        &mut self,
        symbol: Symbol,
        production: Option<ProductionId>,
        children: Vec<NodeId>,
        field_map: &[FieldMapEntry],
        empty_at: usize,
    ) -> NodeId {
        let mut flat: Vec<NodeId> = Vec::with_capacity(children.len());
        let mut fields: Vec<(FieldId, usize)> = Vec::new();

        for (position, child) in children.into_iter().enumerate() {
            let Some(data) = self.nodes.get(child.index()) else {
                continue;
            };
            let start = flat.len();
            if self.is_hidden(data) {
                fields.extend(data.fields.iter().map(|(field, index)| (*field, start + index)));
                flat.extend_from_slice(&data.children);
            } else {
                flat.push(child);
            }
            // A field on a spliced child labels everything it contributed.
            for entry in field_map
                .iter()
                .filter(|entry| usize::from(entry.child_index) == position)
            {
                fields.extend((start..flat.len()).map(|index| (entry.field, index)));
            }
        }

        let first = flat.first().and_then(|id| self.nodes.get(id.index()));
        let last = flat.last().and_then(|id| self.nodes.get(id.index()));
        let (range, padding) = match (first, last) {
            (Some(first), Some(last)) => (first.range.start..last.range.end, first.padding),
            _ => (empty_at..empty_at, 0),
        };
        let has_error = symbol == Symbol::ERROR
            || flat
                .iter()
                .filter_map(|id| self.nodes.get(id.index()))
                .any(|data| data.has_error);

        let id = self.next_id();
        for child in &flat {
            if let Some(data) = self.nodes.get_mut(child.index()) {
                data.parent = Some(id);
            }
        }
        self.push(NodeData {
            symbol,
            range,
            padding,
            children: flat,
            fields,
            parent: None,
            production,
            has_error,
        })
    }
}
