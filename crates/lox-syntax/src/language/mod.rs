//! # Language - The Compiled Grammar Table
//!
//! A [`Language`] is everything the engine needs to know about a grammar,
//! expressed as read-only data:
//!
//! - symbol names and their visible / named flags
//! - productions with their child counts and field maps
//! - a shift/reduce/goto table indexed by `(state, symbol)`
//! - the lexical mode each state asks the tokenizer for
//! - the tokenizer itself, as a plain function pointer
//!
//! Compiling a grammar into this form is not our job. The one grammar we
//! ship lives in [`lox`] and was transcribed from a generated LR(1) table.
//!
//! ## Two-Tier Action Table
//!
//! The first `large_state_count` states are stored as full rows, one cell per
//! symbol. These are the busy states near the start of the automaton. Every
//! other state is stored in `small_parse_table` as a list of groups:
//!
//! ```text
//! group_count,
//!   value, symbol_count, symbol, symbol, ...
//!   value, symbol_count, symbol, ...
//! ```
//!
//! `small_parse_table_map` gives the offset of each such state's group list.
//! A missing entry reads as zero in both tiers, so lookups behave exactly as
//! they would against one full table.
//!
//! For terminals a cell holds an index into `parse_actions`; for nonterminals
//! it holds the goto state directly. Zero means "no entry" in both cases
//! (action list 0 is empty and state 0 is never a goto target).

pub mod lox;

use crate::lexer::{LexError, Token};

/// A terminal or nonterminal id from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub u16);

impl Symbol {
    /// The end-of-input terminal.
    pub const END: Symbol = Symbol(0);
    /// Builtin symbol for error nodes and unlexable bytes; outside every table.
    pub const ERROR: Symbol = Symbol(u16::MAX);
}

/// A parser state id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u16);

impl StateId {
    /// The error state: lexes in [`LexMode::Any`] and recovers on everything.
    pub const ERROR: StateId = StateId(0);
}

/// A field name id. Ids start at 1; `field_names[0]` is a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub u16);

/// Index into [`Language::productions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductionId(pub u16);

/// Display flags for a symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolMetadata {
    /// Appears in the tree. Invisible nonterminals are spliced into their parent.
    pub visible: bool,
    /// Addressable by consumers, as opposed to punctuation and keywords.
    pub named: bool,
}

/// One `field name -> child position` pair of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapEntry {
    pub field: FieldId,
    pub child_index: u8,
}

/// A grammar rule the engine can reduce by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    /// The nonterminal this production reduces to.
    pub symbol: Symbol,
    /// Number of stack entries popped by the reduction.
    pub child_count: u8,
    pub fields: &'static [FieldMapEntry],
}

/// An entry of the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAction {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
    /// Explicit error entry; handled exactly like a missing one.
    Recover,
}

/// Which entry point of the tokenizer DFA a state lexes with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LexMode {
    /// Every token of the language. Used by the error state and when
    /// recovery scans for a synchronization point.
    #[default]
    Any,
    /// Start of a statement: keywords, literals, prefix operators, `(`.
    StatementStart,
    /// Start of an operand: like [`LexMode::StatementStart`] without `print`.
    Operand,
    /// After a complete operand: infix operators, `;`, `,`, `)`.
    Operator,
}

/// Tokenizer entry point: scan from a byte offset under a lexical mode.
pub type LexFn = for<'s> fn(&'s str, usize, LexMode) -> Result<Token<'s>, LexError>;

/// A compiled grammar.
///
/// All data is `'static` and immutable, so one `Language` can back any
/// number of concurrent parses on different threads.
#[derive(Debug)]
pub struct Language {
    pub name: &'static str,
    /// Number of terminal symbols; terminal ids are `0..token_count`.
    pub token_count: usize,
    pub symbol_names: &'static [&'static str],
    pub symbol_metadata: &'static [SymbolMetadata],
    pub field_names: &'static [&'static str],
    pub productions: &'static [Production],
    pub large_state_count: usize,
    pub parse_table: &'static [&'static [u16]],
    pub small_parse_table: &'static [u16],
    pub small_parse_table_map: &'static [u32],
    pub parse_actions: &'static [&'static [ParseAction]],
    /// Lexical mode per state; its length is the state count.
    pub lex_modes: &'static [LexMode],
    pub lex_fn: LexFn,
    pub start_state: StateId,
    /// The nonterminal an accepted parse reduces to.
    pub root_symbol: Symbol,
    /// Nonterminal whose goto receives error nodes during recovery.
    pub recovery_symbol: Symbol,
    /// Terminals that end a recovery scan and are consumed by it.
    pub sync_symbols: &'static [Symbol],
}

impl Language {
    /// Number of symbols in the table, `ERROR` excluded.
    pub fn symbol_count(&self) -> usize {
        self.symbol_names.len()
    }

    pub fn state_count(&self) -> usize {
        self.lex_modes.len()
    }

    pub fn field_count(&self) -> usize {
        self.field_names.len().saturating_sub(1)
    }

    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        usize::from(symbol.0) < self.token_count
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &'static str {
        if symbol == Symbol::ERROR {
            return "ERROR";
        }
        self.symbol_names
            .get(usize::from(symbol.0))
            .copied()
            .unwrap_or("")
    }

    pub fn symbol_metadata(&self, symbol: Symbol) -> SymbolMetadata {
        if symbol == Symbol::ERROR {
            return SymbolMetadata {
                visible: true,
                named: true,
            };
        }
        self.symbol_metadata
            .get(usize::from(symbol.0))
            .copied()
            .unwrap_or_default()
    }

    /// Look a symbol up by its display name.
    ///
    /// Names are not unique on their own: `"nil"` could be a keyword token
    /// in another grammar and a named node here, so the caller says which.
    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        if named && name == "ERROR" {
            return Some(Symbol::ERROR);
        }
        self.symbol_names
            .iter()
            .zip(self.symbol_metadata)
            .position(|(candidate, metadata)| {
                *candidate == name && metadata.named == named && metadata.visible
            })
            .and_then(|index| u16::try_from(index).ok())
            .map(Symbol)
    }

    pub fn field_name(&self, field: FieldId) -> Option<&'static str> {
        if field.0 == 0 {
            return None;
        }
        self.field_names.get(usize::from(field.0)).copied()
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<FieldId> {
        self.field_names
            .iter()
            .skip(1)
            .position(|candidate| *candidate == name)
            .and_then(|index| u16::try_from(index + 1).ok())
            .map(FieldId)
    }

    pub fn production(&self, id: ProductionId) -> Option<&'static Production> {
        let productions: &'static [Production] = self.productions;
        productions.get(usize::from(id.0))
    }

    pub fn lex_mode(&self, state: StateId) -> LexMode {
        self.lex_modes
            .get(usize::from(state.0))
            .copied()
            .unwrap_or_default()
    }

    /// Run the tokenizer.
    pub fn lex<'s>(
        &self,
        source: &'s str,
        offset: usize,
        mode: LexMode,
    ) -> Result<Token<'s>, LexError> {
        (self.lex_fn)(source, offset, mode)
    }

    /// All actions for a terminal in a state. Empty means a syntax error.
    pub fn actions(&self, state: StateId, symbol: Symbol) -> &'static [ParseAction] {
        if !self.is_terminal(symbol) {
            return &[];
        }
        let index = self.lookup(state, symbol);
        let actions: &'static [&'static [ParseAction]] = self.parse_actions;
        actions
            .get(usize::from(index))
            .copied()
            .unwrap_or(&[])
    }

    /// The action the engine takes: the first one of the slot.
    pub fn action(&self, state: StateId, symbol: Symbol) -> Option<ParseAction> {
        self.actions(state, symbol).first().copied()
    }

    /// State to enter after reducing to `symbol` on top of `state`.
    pub fn goto(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        if self.is_terminal(symbol) || symbol == Symbol::ERROR {
            return None;
        }
        match self.lookup(state, symbol) {
            0 => None,
            next => Some(StateId(next)),
        }
    }

    /// Terminals the state has a real action for, in symbol order.
    pub fn expected_symbols(&self, state: StateId) -> Vec<Symbol> {
        let mut expected: Vec<Symbol> = self
            .cells(state)
            .into_iter()
            .filter(|(symbol, _)| self.is_terminal(*symbol))
            .filter(|(symbol, _)| {
                self.actions(state, *symbol)
                    .iter()
                    .any(|action| !matches!(action, ParseAction::Recover))
            })
            .map(|(symbol, _)| symbol)
            .collect();
        expected.sort();
        expected.dedup();
        expected
    }

    /// The reduction a state performs on every terminal it accepts, if it
    /// has exactly one.
    ///
    /// Such a state has already seen a complete right-hand side, so the
    /// reduction is safe to run on any lookahead. Zero-length productions
    /// never qualify, so applying one always pops the stack.
    pub fn default_reduction(&self, state: StateId) -> Option<ProductionId> {
        let mut found = None;
        for (symbol, _) in self.cells(state) {
            if !self.is_terminal(symbol) {
                continue;
            }
            for action in self.actions(state, symbol) {
                match (action, found) {
                    (ParseAction::Recover, _) => {}
                    (ParseAction::Reduce(id), None) => found = Some(*id),
                    (ParseAction::Reduce(id), Some(current)) if *id == current => {}
                    _ => return None,
                }
            }
        }
        let id = found?;
        self.production(id)
            .filter(|production| production.child_count > 0)
            .map(|_| id)
    }

    pub fn is_sync_symbol(&self, symbol: Symbol) -> bool {
        self.sync_symbols.contains(&symbol)
    }

    fn lookup(&self, state: StateId, symbol: Symbol) -> u16 {
        let state = usize::from(state.0);
        if state < self.large_state_count {
            return self
                .parse_table
                .get(state)
                .and_then(|row| row.get(usize::from(symbol.0)))
                .copied()
                .unwrap_or(0);
        }
        self.small_row(state)
            .into_iter()
            .flatten()
            .find(|(_, symbols)| symbols.contains(&symbol.0))
            .map_or(0, |(value, _)| value)
    }

    /// Every non-zero `(symbol, value)` cell of a state.
    fn cells(&self, state: StateId) -> Vec<(Symbol, u16)> {
        let index = usize::from(state.0);
        if index < self.large_state_count {
            return self
                .parse_table
                .get(index)
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .filter(|(_, value)| **value != 0)
                        .filter_map(|(symbol, value)| {
                            u16::try_from(symbol).ok().map(|s| (Symbol(s), *value))
                        })
                        .collect()
                })
                .unwrap_or_default();
        }
        self.small_row(index)
            .into_iter()
            .flatten()
            .flat_map(|(value, symbols)| symbols.iter().map(move |s| (Symbol(*s), value)))
            .collect()
    }

    fn small_row(&self, state: usize) -> Option<SmallRow> {
        let index = state.checked_sub(self.large_state_count)?;
        let offset = usize::try_from(*self.small_parse_table_map.get(index)?).ok()?;
        let table: &'static [u16] = self.small_parse_table;
        let (&group_count, data) = table.get(offset..)?.split_first()?;
        Some(SmallRow {
            data,
            remaining: group_count,
        })
    }
}

/// Iterator over the `(value, symbols)` groups of one small-table state.
struct SmallRow {
    data: &'static [u16],
    remaining: u16,
}

impl Iterator for SmallRow {
    type Item = (u16, &'static [u16]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let (&value, rest) = self.data.split_first()?;
        let (&count, rest) = rest.split_first()?;
        let count = usize::from(count);
        let symbols = rest.get(..count)?;
        self.data = rest.get(count..)?;
        Some((value, symbols))
    }
}
