//! # Parser - Table-Driven Shift/Reduce Engine
//!
//! This module runs a compiled [`Language`] over a source string. The engine
//! knows nothing about Lox: precedence, associativity and the shape of every
//! node come from the table. Regenerating the table never requires touching
//! this code.
//!
//! ## The Loop
//!
//! The engine keeps a stack of `(state, node)` entries, starting from the
//! language's start state with no node. Each step:
//!
//! 1. Lex the lookahead with the lexical mode of the top state.
//! 2. Look up the action for `(top state, lookahead symbol)`.
//! 3. **Shift**: push a leaf for the token and move past it.
//! 4. **Reduce**: pop `child_count` entries, build the node, push it with
//!    the goto state. The lookahead is kept and looked up again.
//! 5. **Accept**: the node on top is the root.
//! 6. **No action**: if the state has a default reduction, run it and look
//!    the same lookahead up again. A statement whose `;` has been shifted
//!    is finished before anything after it can fail. Otherwise hand over
//!    to error [`recovery`].
//!
//! ```text
//! input "1 + 2;"      stack (state:node)
//! shift number        1  26:number
//! shift +             1  26:number  16:+
//! shift number        1  26:number  16:+  11:number
//! reduce binary       1  26:binary_expression
//! shift ;             1  26:binary_expression  28:;
//! reduce statement    1  2:expression_statement
//! reduce program      1  29:program
//! accept
//! ```
//!
//! ## Lookahead and Modes
//!
//! The lookahead is cached together with the mode it was lexed in. After a
//! reduction it is reused as long as the new top state asks for the same
//! mode, and lexed again otherwise, so a token is always valid for the state
//! that consumes it.
//!
//! ## Public API
//!
//! ```
//! use lox_syntax::{Parser, ParserOptions};
//!
//! let parser = Parser::with_options(ParserOptions {
//!     max_input_bytes: Some(1024),
//!     ..ParserOptions::default()
//! });
//! let tree = parser.parse("print 1;").unwrap();
//! assert!(!tree.has_errors());
//!
//! // The free function never fails.
//! let tree = lox_syntax::parse("print ;");
//! assert!(tree.has_errors());
//! ```

mod builder;
mod recovery;

use log::{error, trace};

use crate::error::{ParseError, SyntaxError};
use crate::language::{Language, LexMode, ParseAction, ProductionId, StateId, lox};
use crate::lexer::{LexError, Token};
use crate::tree::{NodeId, SyntaxTree};
use builder::TreeBuilder;
use recovery::Failure;

/// Limits applied to a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Inputs longer than this are rejected before parsing starts.
    pub max_input_bytes: Option<usize>,
    /// Diagnostics kept per tree. Recovery still runs past the limit.
    pub max_diagnostics: usize,
}

impl ParserOptions {
    pub const DEFAULT_MAX_DIAGNOSTICS: usize = 64;
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: None,
            max_diagnostics: Self::DEFAULT_MAX_DIAGNOSTICS,
        }
    }
}

/// A reusable parser for one language.
///
/// `Parser` holds no per-parse state, so one instance can be shared across
/// threads and called concurrently.
#[derive(Debug, Clone)]
pub struct Parser {
    language: &'static Language,
    options: ParserOptions,
}

impl Parser {
    /// A Lox parser with default options.
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            language: lox::language(),
            options,
        }
    }

    /// A parser for another compiled table.
    pub fn with_language(language: &'static Language) -> Self {
        Self {
            language,
            options: ParserOptions::default(),
        }
    }

    pub fn language(&self) -> &'static Language {
        self.language
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse `source`.
    ///
    /// Syntax errors do not fail the parse; they show up as `ERROR` nodes
    /// and in [`SyntaxTree::errors`]. The only error is an input over
    /// [`ParserOptions::max_input_bytes`].
    pub fn parse<'s>(&self, source: &'s str) -> Result<SyntaxTree<'s>, ParseError> {
        if let Some(limit) = self.options.max_input_bytes {
            if source.len() > limit {
                return Err(ParseError::InputTooLarge {
                    len: source.len(),
                    limit,
                });
            }
        }
        Ok(self.run(source))
    }

    fn run<'s>(&self, source: &'s str) -> SyntaxTree<'s> {
        Engine::new(self.language, &self.options, source).run()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse Lox source with default options.
pub fn parse(source: &str) -> SyntaxTree<'_> {
    Parser::new().run(source)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StackEntry {
    state: StateId,
    /// `None` only for the start entry.
    node: Option<NodeId>,
}

type Lookahead<'s> = Result<Token<'s>, LexError>;

/// State of one parse.
struct Engine<'s, 'p> {
    language: &'static Language,
    options: &'p ParserOptions,
    source: &'s str,
    builder: TreeBuilder<'s>,
    stack: Vec<StackEntry>,
    /// End of the last consumed token.
    position: usize,
    lookahead: Option<(LexMode, Lookahead<'s>)>,
    errors: Vec<SyntaxError>,
    /// Position after the most recent recovery.
    last_recovery: Option<usize>,
}

impl<'s, 'p> Engine<'s, 'p> {
    fn new(language: &'static Language, options: &'p ParserOptions, source: &'s str) -> Self {
        Self {
            language,
            options,
            source,
            builder: TreeBuilder::new(source, language),
            stack: vec![StackEntry {
                state: language.start_state,
                node: None,
            }],
            position: 0,
            lookahead: None,
            errors: Vec::new(),
            last_recovery: None,
        }
    }

    fn top_state(&self) -> StateId {
        self.stack
            .last()
            .map_or(self.language.start_state, |entry| entry.state)
    }

    fn run(mut self) -> SyntaxTree<'s> {
        loop {
            let state = self.top_state();
            let mode = self.language.lex_mode(state);
            let lookahead = match self.lookahead.take() {
                Some((cached, lookahead)) if cached == mode => lookahead,
                _ => self.language.lex(self.source, self.position, mode),
            };

            let token = match lookahead {
                Ok(token) => token,
                Err(error) => {
                    if let Some(id) = self.language.default_reduction(state) {
                        self.lookahead = Some((mode, Err(error)));
                        self.reduce(id);
                        continue;
                    }
                    let failure = self.classify(mode, error);
                    if !self.recover(state, failure) {
                        return self.finish_partial();
                    }
                    continue;
                }
            };

            match self.language.action(state, token.symbol) {
                Some(ParseAction::Shift(next)) => self.shift(next, &token),
                Some(ParseAction::Reduce(id)) => {
                    self.lookahead = Some((mode, Ok(token)));
                    self.reduce(id);
                }
                Some(ParseAction::Accept) => return self.accept(),
                Some(ParseAction::Recover) | None => {
                    if let Some(id) = self.language.default_reduction(state) {
                        self.lookahead = Some((mode, Ok(token)));
                        self.reduce(id);
                        continue;
                    }
                    if !self.recover(state, Failure::Token(token)) {
                        return self.finish_partial();
                    }
                }
            }
        }
    }

    /// A lex failure under a restricted mode is usually a real token in the
    /// wrong place, and is reported as such.
    fn classify(&self, mode: LexMode, error: LexError) -> Failure<'s> {
        if mode == LexMode::Any {
            return Failure::Lex(error);
        }
        match self.language.lex(self.source, self.position, LexMode::Any) {
            Ok(token) if !token.is_end() => Failure::Token(token),
            _ => Failure::Lex(error),
        }
    }

    fn shift(&mut self, next: StateId, token: &Token<'s>) {
        trace!(
            "shift {:?} at {}..{} -> state {}",
            self.language.symbol_name(token.symbol),
            token.range.start,
            token.range.end,
            next.0
        );
        let leaf = self.builder.leaf(token);
        self.position = token.range.end;
        self.stack.push(StackEntry {
            state: next,
            node: Some(leaf),
        });
    }

    fn reduce(&mut self, id: ProductionId) {
        let Some(production) = self.language.production(id) else {
            error!("action table references missing production {}", id.0);
            self.stack.push(StackEntry {
                state: StateId::ERROR,
                node: None,
            });
            return;
        };

        let count = usize::from(production.child_count);
        // The start entry is never popped.
        let split = self.stack.len().saturating_sub(count).max(1);
        let children: Vec<NodeId> = self
            .stack
            .drain(split..)
            .filter_map(|entry| entry.node)
            .collect();
        let node = self.builder.reduce(id, production, children, self.position);

        let state = self.top_state();
        let name = self.language.symbol_name(production.symbol);
        match self.language.goto(state, production.symbol) {
            Some(next) => {
                trace!("reduce {name} ({count} children) -> state {}", next.0);
                self.stack.push(StackEntry {
                    state: next,
                    node: Some(node),
                });
            }
            None => {
                error!("no goto for {name} from state {}", state.0);
                self.stack.push(StackEntry {
                    state: StateId::ERROR,
                    node: Some(node),
                });
            }
        }
    }

    fn accept(mut self) -> SyntaxTree<'s> {
        match self.stack.pop() {
            Some(StackEntry {
                node: Some(root), ..
            }) => {
                trace!("accept with {} diagnostics", self.errors.len());
                self.builder.finish(root, self.errors)
            }
            entry => {
                self.stack.extend(entry);
                self.finish_partial()
            }
        }
    }
}
