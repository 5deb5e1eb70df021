//! Statement-level error recovery.
//!
//! When the table has no action and the state has no default reduction
//! to fall back on, the engine:
//!
//! 1. records a [`SyntaxError`] for the failing state,
//! 2. pops the stack down to the nearest state with a goto on the
//!    language's recovery symbol (a statement boundary),
//! 3. skips input in [`LexMode::Any`] up to and including the next
//!    synchronization token (`;`), or up to end of input,
//! 4. wraps the popped nodes and the skipped tokens in one `ERROR` node and
//!    pushes it through that goto, as if a statement had been parsed.
//!
//! Bytes the tokenizer cannot match while skipping become `ERROR` leaves, so
//! no input is ever dropped from the tree.
//!
//! Every recovery either consumes input or pops at least one node. If one
//! ever does neither, or stalls twice at the same offset, the engine stops
//! and wraps what it has into the root.

use log::debug;

use super::{Engine, StackEntry};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::language::{LexMode, StateId};
use crate::lexer::{LexError, Token};
use crate::tree::{NodeId, SyntaxTree};

/// What the engine could not handle.
pub(super) enum Failure<'s> {
    /// A token with no action in the current state.
    Token(Token<'s>),
    /// Input no token pattern matches.
    Lex(LexError),
}

impl<'s> Engine<'s, '_> {
    /// Returns `false` when recovery cannot make progress.
    pub(super) fn recover(&mut self, state: StateId, failure: Failure<'s>) -> bool {
        self.record(state, &failure);

        let Some((keep, target)) = self.recovery_point() else {
            debug!("no state accepts a recovered statement");
            return false;
        };
        let mut children: Vec<NodeId> = self
            .stack
            .drain(keep + 1..)
            .filter_map(|entry| entry.node)
            .collect();
        let popped = children.len();
        let end = self.skip(&mut children, true);

        if children.is_empty() {
            return false;
        }
        let stalled = end == self.position && self.last_recovery == Some(end);
        let error = self.builder.error_node(children, self.position);
        debug!(
            "recovered {}..{}: {popped} nodes popped, state {} -> {}",
            self.position, end, state.0, target.0
        );

        self.stack.push(StackEntry {
            state: if stalled { StateId::ERROR } else { target },
            node: Some(error),
        });
        if stalled {
            return false;
        }
        self.position = end;
        self.last_recovery = Some(end);
        true
    }

    /// Wrap everything into a root when parsing cannot continue.
    pub(super) fn finish_partial(mut self) -> SyntaxTree<'s> {
        debug!("finishing partial tree at byte {}", self.position);
        let mut children: Vec<NodeId> = self
            .stack
            .drain(..)
            .filter_map(|entry| entry.node)
            .collect();

        let mut rest = Vec::new();
        self.skip(&mut rest, false);
        if !rest.is_empty() {
            children.push(self.builder.error_node(rest, self.position));
        }

        let root = self.builder.partial_root(children);
        self.builder.finish(root, self.errors)
    }

    fn record(&mut self, state: StateId, failure: &Failure<'s>) {
        let expected = self
            .language
            .expected_symbols(state)
            .into_iter()
            .map(|symbol| self.language.symbol_name(symbol))
            .collect();
        let error = match failure {
            Failure::Lex(error) => SyntaxError {
                kind: SyntaxErrorKind::LexError(error.kind),
                range: error.range.clone(),
                found: None,
                expected,
            },
            Failure::Token(token) if token.is_end() => SyntaxError {
                kind: SyntaxErrorKind::UnexpectedEndOfInput,
                range: token.range.clone(),
                found: None,
                expected,
            },
            Failure::Token(token) => SyntaxError {
                kind: SyntaxErrorKind::UnexpectedToken,
                range: token.range.clone(),
                found: Some(self.language.symbol_name(token.symbol)),
                expected,
            },
        };
        debug!("{error}");
        if self.errors.len() < self.options.max_diagnostics {
            self.errors.push(error);
        }
    }

    /// Deepest stack index whose state has a goto on the recovery symbol.
    fn recovery_point(&self) -> Option<(usize, StateId)> {
        let symbol = self.language.recovery_symbol;
        self.stack
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, entry)| {
                self.language
                    .goto(entry.state, symbol)
                    .map(|target| (index, target))
            })
    }

    /// Turn input from the current position into leaves, stopping after a
    /// sync token when `stop_at_sync`, otherwise at end of input. Returns
    /// the offset reached.
    fn skip(&mut self, leaves: &mut Vec<NodeId>, stop_at_sync: bool) -> usize {
        let mut offset = self.position;
        loop {
            match self.language.lex(self.source, offset, LexMode::Any) {
                Ok(token) if token.is_end() => break,
                Ok(token) => {
                    leaves.push(self.builder.leaf(&token));
                    offset = token.range.end;
                    if stop_at_sync && self.language.is_sync_symbol(token.symbol) {
                        break;
                    }
                }
                Err(error) => {
                    leaves.push(self.builder.error_leaf(&error));
                    let resume = error.resume();
                    if resume <= offset {
                        break;
                    }
                    offset = resume;
                }
            }
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use pretty_assertions::assert_eq;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn missing_operand_becomes_error_statement() {
        init_logging();
        let tree = parse("print ;");
        assert_eq!(tree.to_sexp(), "(program (ERROR))");
        let error = tree.root().child(0).unwrap();
        assert!(error.is_error());
        let texts: Vec<_> = error.children().map(|node| node.text()).collect();
        assert_eq!(texts, vec!["print", ";"]);
    }

    #[test]
    fn parsing_resumes_after_semicolon() {
        init_logging();
        let tree = parse("print ; print 1;");
        assert_eq!(
            tree.to_sexp(),
            "(program (ERROR) (print_statement expression: (number)))"
        );
        assert_eq!(tree.errors().len(), 1);
    }

    #[test]
    fn earlier_statements_survive() {
        let tree = parse("1; 2 +; 3;");
        assert_eq!(
            tree.to_sexp(),
            "(program (expression_statement expression: (number)) (ERROR (number)) (expression_statement expression: (number)))"
        );
    }

    #[test]
    fn error_at_end_of_input_keeps_tokens() {
        let tree = parse("print 1 +");
        assert_eq!(tree.to_sexp(), "(program (ERROR (number)))");
        assert_eq!(tree.root().child(0).unwrap().byte_range(), 0..9);
        assert_eq!(tree.errors().len(), 1);
    }

    #[test]
    fn unlexable_bytes_become_error_leaves() {
        let tree = parse("1 @ 2; 3;");
        assert_eq!(
            tree.to_sexp(),
            "(program (ERROR (number) (UNEXPECTED \"@\") (number)) (expression_statement expression: (number)))"
        );
    }

    #[test]
    fn stray_closing_paren_at_statement_start() {
        let tree = parse(") 1;");
        assert_eq!(tree.to_sexp(), "(program (ERROR (number)))");
        assert_eq!(tree.errors()[0].found, Some(")"));
    }

    #[test]
    fn recovery_covers_every_byte() {
        let source = "print (1 + ; @@ \"open";
        let tree = parse(source);
        let mut rebuilt = String::new();
        for leaf in tree.leaves() {
            rebuilt.push_str(&source[leaf.padded_range()]);
        }
        let last = tree.leaves().last().map_or(0, |leaf| leaf.end_byte());
        rebuilt.push_str(&source[last..]);
        assert_eq!(rebuilt, source);
        assert!(tree.has_errors());
    }
}
