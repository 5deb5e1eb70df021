//! # Lexer - Mode-Dependent Tokenizing
//!
//! This module is the tokenizer half of the engine. It is built on the
//! [Logos] lexer generator, which compiles our token patterns into a DFA at
//! build time.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Lexical Modes
//!
//! The parser never asks for "the next token". It asks for the next token
//! *that could be valid here*, by passing a [`LexMode`] taken from its
//! current state:
//!
//! ```text
//! StatementStart   print true false nil number string - ! (   end
//! Operand          true false nil number string - ! (         end
//! Operator         == != < <= > >= + - * / ? : ; , )          end
//! Any              all of the above (error recovery only)
//! ```
//!
//! Each mode is its own `#[derive(Logos)]` enum, so each gets its own DFA
//! entry point. This is what makes `-` after an operand an infix minus and
//! `-` at the start of an operand a prefix minus without any lookahead, and
//! why `!=` is only ever produced where an infix operator can appear.
//!
//! ```
//! use lox_syntax::language::LexMode;
//! use lox_syntax::lexer::next_token;
//! use lox_syntax::SyntaxKind;
//!
//! let token = next_token("  <= 2", 0, LexMode::Operator).unwrap();
//! assert_eq!(token.kind(), Some(SyntaxKind::LT_EQ));
//! assert_eq!(token.padding, 2);
//!
//! // An operator is not a valid operand.
//! assert!(next_token("<= 2", 0, LexMode::Operand).is_err());
//! ```
//!
//! ## Whitespace and Padding
//!
//! Whitespace is never a token. Instead, every [`Token`] records how many
//! bytes of whitespace were skipped in front of it (`padding`), which lets
//! the tree account for every byte of the input without storing trivia
//! tokens.
//!
//! ## Errors
//!
//! A character no pattern of the current mode accepts is a
//! [`LexErrorKind::UnexpectedCharacter`] covering just that character, so
//! scanning can resume right after it. A string with no closing quote is a
//! [`LexErrorKind::UnterminatedString`] reported at end of input.

use std::ops::Range;

use logos::{Lexer, Logos};
use thiserror::Error;

use crate::language::{LexMode, Symbol};
use crate::syntax_kind::SyntaxKind;

/// Why the tokenizer could not produce a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string")]
    UnterminatedString,
}

/// A tokenizer failure and the bytes it covers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {}..{}", .range.start, .range.end)]
pub struct LexError {
    pub kind: LexErrorKind,
    /// The offending bytes. Scanning resumes at `range.end`.
    pub range: Range<usize>,
    /// Whitespace skipped before `range.start`.
    pub padding: usize,
}

impl LexError {
    /// The offset the error is reported at.
    ///
    /// An unterminated string is only detected once the input runs out, so
    /// it is reported at end of input rather than at its opening quote.
    pub fn offset(&self) -> usize {
        match self.kind {
            LexErrorKind::UnexpectedCharacter => self.range.start,
            LexErrorKind::UnterminatedString => self.range.end,
        }
    }

    /// Where scanning continues after this error.
    pub fn resume(&self) -> usize {
        self.range.end
    }
}

/// A token and the source slice it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'s> {
    pub symbol: Symbol,
    pub text: &'s str,
    pub range: Range<usize>,
    /// Whitespace skipped before `range.start`.
    pub padding: usize,
}

impl Token<'_> {
    /// The Lox kind of this token.
    pub fn kind(&self) -> Option<SyntaxKind> {
        SyntaxKind::from_symbol(self.symbol)
    }

    pub fn is_end(&self) -> bool {
        self.symbol == Symbol::END
    }

    /// Start of the token including its leading whitespace.
    pub fn padded_start(&self) -> usize {
        self.range.start - self.padding
    }
}

/// Extends a digit run with a fractional part, but only when a digit follows
/// the dot: `1.5` is one number, `1.` is a number followed by a stray `.`.
fn fraction<'s, T>(lex: &mut Lexer<'s, T>)
where
    T: Logos<'s, Source = str>,
{
    let rest = lex.remainder().as_bytes();
    if rest.first() == Some(&b'.') && rest.get(1).is_some_and(u8::is_ascii_digit) {
        let digits = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        lex.bump(1 + digits);
    }
}

/// Consumes a string body after its opening quote. There are no escapes.
fn string_body<'s, T>(lex: &mut Lexer<'s, T>) -> Result<(), LexErrorKind>
where
    T: Logos<'s, Source = str>,
{
    let rest = lex.remainder();
    match rest.find('"') {
        Some(close) => {
            lex.bump(close + 1);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedString)
        }
    }
}

/// Tokens valid at the start of a statement.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n]+")]
enum StatementStartToken {
    #[token("print")]
    Print,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
    #[regex(r"[0-9]+", fraction)]
    Number,
    #[token("\"", string_body)]
    String,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("(")]
    LParen,
}

/// Tokens valid where a new operand is expected.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n]+")]
enum OperandToken {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
    #[regex(r"[0-9]+", fraction)]
    Number,
    #[token("\"", string_body)]
    String,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("(")]
    LParen,
}

/// Tokens valid right after a complete operand.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n]+")]
enum OperatorToken {
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(")")]
    RParen,
}

/// Every token of the language.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n]+")]
enum AnyToken {
    #[token(";")]
    Semi,
    #[token("print")]
    Print,
    #[token(",")]
    Comma,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("!")]
    Bang,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[0-9]+", fraction)]
    Number,
    #[token("\"", string_body)]
    String,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
}

/// Maps a mode-specific Logos token onto the shared [`SyntaxKind`].
trait ModeToken {
    fn to_syntax_kind(self) -> SyntaxKind;
}

impl ModeToken for StatementStartToken {
    fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            Self::Print => SyntaxKind::PRINT_KW,
            Self::True => SyntaxKind::TRUE_KW,
            Self::False => SyntaxKind::FALSE_KW,
            Self::Nil => SyntaxKind::NIL,
            Self::Number => SyntaxKind::NUMBER,
            Self::String => SyntaxKind::STRING,
            Self::Minus => SyntaxKind::MINUS,
            Self::Bang => SyntaxKind::BANG,
            Self::LParen => SyntaxKind::L_PAREN,
        }
    }
}

impl ModeToken for OperandToken {
    fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            Self::True => SyntaxKind::TRUE_KW,
            Self::False => SyntaxKind::FALSE_KW,
            Self::Nil => SyntaxKind::NIL,
            Self::Number => SyntaxKind::NUMBER,
            Self::String => SyntaxKind::STRING,
            Self::Minus => SyntaxKind::MINUS,
            Self::Bang => SyntaxKind::BANG,
            Self::LParen => SyntaxKind::L_PAREN,
        }
    }
}

impl ModeToken for OperatorToken {
    fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            Self::EqEq => SyntaxKind::EQ_EQ,
            Self::BangEq => SyntaxKind::BANG_EQ,
            Self::Lt => SyntaxKind::LT,
            Self::LtEq => SyntaxKind::LT_EQ,
            Self::Gt => SyntaxKind::GT,
            Self::GtEq => SyntaxKind::GT_EQ,
            Self::Plus => SyntaxKind::PLUS,
            Self::Minus => SyntaxKind::MINUS,
            Self::Star => SyntaxKind::STAR,
            Self::Slash => SyntaxKind::SLASH,
            Self::Question => SyntaxKind::QUESTION,
            Self::Colon => SyntaxKind::COLON,
            Self::Semi => SyntaxKind::SEMI,
            Self::Comma => SyntaxKind::COMMA,
            Self::RParen => SyntaxKind::R_PAREN,
        }
    }
}

impl ModeToken for AnyToken {
    fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            Self::Semi => SyntaxKind::SEMI,
            Self::Print => SyntaxKind::PRINT_KW,
            Self::Comma => SyntaxKind::COMMA,
            Self::EqEq => SyntaxKind::EQ_EQ,
            Self::BangEq => SyntaxKind::BANG_EQ,
            Self::Lt => SyntaxKind::LT,
            Self::LtEq => SyntaxKind::LT_EQ,
            Self::Gt => SyntaxKind::GT,
            Self::GtEq => SyntaxKind::GT_EQ,
            Self::Plus => SyntaxKind::PLUS,
            Self::Minus => SyntaxKind::MINUS,
            Self::Star => SyntaxKind::STAR,
            Self::Slash => SyntaxKind::SLASH,
            Self::Question => SyntaxKind::QUESTION,
            Self::Colon => SyntaxKind::COLON,
            Self::Bang => SyntaxKind::BANG,
            Self::LParen => SyntaxKind::L_PAREN,
            Self::RParen => SyntaxKind::R_PAREN,
            Self::Number => SyntaxKind::NUMBER,
            Self::String => SyntaxKind::STRING,
            Self::True => SyntaxKind::TRUE_KW,
            Self::False => SyntaxKind::FALSE_KW,
            Self::Nil => SyntaxKind::NIL,
        }
    }
}

/// Scan the next token at `offset` using the DFA entry point for `mode`.
///
/// Leading whitespace is skipped and recorded as padding. At end of input
/// the result is an `END` token of zero width.
pub fn next_token(source: &str, offset: usize, mode: LexMode) -> Result<Token<'_>, LexError> {
    match mode {
        LexMode::Any => scan::<AnyToken>(source, offset),
        LexMode::StatementStart => scan::<StatementStartToken>(source, offset),
        LexMode::Operand => scan::<OperandToken>(source, offset),
        LexMode::Operator => scan::<OperatorToken>(source, offset),
    }
}

fn scan<'s, T>(source: &'s str, offset: usize) -> Result<Token<'s>, LexError>
where
    T: Logos<'s, Source = str, Error = LexErrorKind> + ModeToken,
    T::Extras: Default,
{
    let offset = offset.min(source.len());
    let Some(rest) = source.get(offset..) else {
        // Not on a char boundary: report the partial character.
        return Err(LexError {
            kind: LexErrorKind::UnexpectedCharacter,
            range: offset..next_char_boundary(source, offset),
            padding: 0,
        });
    };

    let mut lexer = T::lexer(rest);
    match lexer.next() {
        None => Ok(Token {
            symbol: Symbol::END,
            text: "",
            range: source.len()..source.len(),
            padding: rest.len(),
        }),
        Some(Ok(token)) => {
            let span = lexer.span();
            Ok(Token {
                symbol: token.to_syntax_kind().symbol(),
                text: lexer.slice(),
                range: offset + span.start..offset + span.end,
                padding: span.start,
            })
        }
        Some(Err(kind)) => {
            let span = lexer.span();
            let start = offset + span.start;
            let end = match kind {
                LexErrorKind::UnterminatedString => source.len(),
                LexErrorKind::UnexpectedCharacter => next_char_boundary(source, start),
            };
            Err(LexError {
                kind,
                range: start..end,
                padding: span.start,
            })
        }
    }
}

/// The first char boundary strictly after `offset`, clamped to the input.
fn next_char_boundary(source: &str, offset: usize) -> usize {
    (offset + 1..=source.len())
        .find(|index| source.is_char_boundary(*index))
        .unwrap_or(source.len())
}

/// Tokenize the whole input in [`LexMode::Any`].
///
/// Errors are returned in place and scanning continues after them. The
/// final `END` token is not included.
pub fn lex(source: &str) -> Vec<Result<Token<'_>, LexError>> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    loop {
        match next_token(source, offset, LexMode::Any) {
            Ok(token) if token.is_end() => break,
            Ok(token) => {
                offset = token.range.end;
                tokens.push(Ok(token));
            }
            Err(error) => {
                offset = error.resume();
                tokens.push(Err(error));
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(source: &str) -> Vec<Option<SyntaxKind>> {
        lex(source)
            .into_iter()
            .map(|result| result.ok().and_then(|token| token.kind()))
            .collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
        let end = next_token("", 0, LexMode::StatementStart).unwrap();
        assert!(end.is_end());
        assert_eq!(end.range, 0..0);
    }

    #[test]
    fn end_token_carries_trailing_whitespace() {
        let end = next_token("1;  \n", 2, LexMode::StatementStart).unwrap();
        assert!(end.is_end());
        assert_eq!(end.range, 5..5);
        assert_eq!(end.padding, 3);
        assert_eq!(end.padded_start(), 2);
    }

    #[test]
    fn whitespace_is_padding() {
        let token = next_token(" \t\r\n42", 0, LexMode::Operand).unwrap();
        assert_eq!(token.kind(), Some(SyntaxKind::NUMBER));
        assert_eq!(token.text, "42");
        assert_eq!(token.range, 4..6);
        assert_eq!(token.padding, 4);
    }

    #[rstest]
    #[case("<=", SyntaxKind::LT_EQ)]
    #[case("<", SyntaxKind::LT)]
    #[case(">=", SyntaxKind::GT_EQ)]
    #[case(">", SyntaxKind::GT)]
    #[case("==", SyntaxKind::EQ_EQ)]
    #[case("!=", SyntaxKind::BANG_EQ)]
    #[case("-", SyntaxKind::MINUS)]
    #[case("?", SyntaxKind::QUESTION)]
    #[case(";", SyntaxKind::SEMI)]
    #[case(",", SyntaxKind::COMMA)]
    #[case(")", SyntaxKind::R_PAREN)]
    fn operator_mode_uses_maximal_munch(#[case] source: &str, #[case] expected: SyntaxKind) {
        let token = next_token(source, 0, LexMode::Operator).unwrap();
        assert_eq!(token.kind(), Some(expected));
        assert_eq!(token.text, source);
    }

    #[rstest]
    #[case(LexMode::StatementStart, "print", Some(SyntaxKind::PRINT_KW))]
    #[case(LexMode::Operand, "print", None)]
    #[case(LexMode::Operator, "print", None)]
    #[case(LexMode::Operand, "nil", Some(SyntaxKind::NIL))]
    #[case(LexMode::Operator, "nil", None)]
    #[case(LexMode::Operand, "!=", Some(SyntaxKind::BANG))]
    #[case(LexMode::Operator, "!", None)]
    #[case(LexMode::StatementStart, "+", None)]
    #[case(LexMode::StatementStart, ";", None)]
    #[case(LexMode::Operator, "(", None)]
    #[case(LexMode::Any, "!=", Some(SyntaxKind::BANG_EQ))]
    fn modes_restrict_the_token_set(
        #[case] mode: LexMode,
        #[case] source: &str,
        #[case] expected: Option<SyntaxKind>,
    ) {
        let kind = next_token(source, 0, mode).ok().and_then(|t| t.kind());
        assert_eq!(kind, expected);
    }

    #[test]
    fn minus_depends_on_mode_not_on_lookahead() {
        let infix = next_token("-1", 0, LexMode::Operator).unwrap();
        let prefix = next_token("-1", 0, LexMode::Operand).unwrap();
        assert_eq!(infix.kind(), Some(SyntaxKind::MINUS));
        assert_eq!(prefix.kind(), Some(SyntaxKind::MINUS));
        assert_eq!(infix.range, 0..1);
        assert_eq!(prefix.range, 0..1);
    }

    #[rstest]
    #[case("123", "123")]
    #[case("1.5", "1.5")]
    #[case("10.25;", "10.25")]
    #[case("1.", "1")]
    #[case("1.x", "1")]
    #[case("7..2", "7")]
    fn number_fraction_needs_a_digit(#[case] source: &str, #[case] text: &str) {
        let token = next_token(source, 0, LexMode::Operand).unwrap();
        assert_eq!(token.kind(), Some(SyntaxKind::NUMBER));
        assert_eq!(token.text, text);
    }

    #[test]
    fn trailing_dot_is_not_a_token() {
        let error = next_token("1.;", 1, LexMode::Operator).unwrap_err();
        assert_eq!(error.kind, LexErrorKind::UnexpectedCharacter);
        assert_eq!(error.range, 1..2);
    }

    #[test]
    fn strings_have_no_escapes() {
        let token = next_token(r#""a\" b"#, 0, LexMode::Operand).unwrap();
        assert_eq!(token.kind(), Some(SyntaxKind::STRING));
        assert_eq!(token.text, r#""a\""#);
    }

    #[test]
    fn strings_may_span_lines() {
        let token = next_token("\"a\nb\"", 0, LexMode::Operand).unwrap();
        assert_eq!(token.text, "\"a\nb\"");
    }

    #[test]
    fn unterminated_string_is_reported_at_end_of_input() {
        let error = next_token("print \"abc", 5, LexMode::Operand).unwrap_err();
        assert_eq!(error.kind, LexErrorKind::UnterminatedString);
        assert_eq!(error.range, 6..10);
        assert_eq!(error.padding, 1);
        assert_eq!(error.offset(), 10);
        assert_eq!(error.resume(), 10);
    }

    #[test]
    fn unexpected_character_covers_one_char() {
        let error = next_token("  @@", 0, LexMode::Any).unwrap_err();
        assert_eq!(error.kind, LexErrorKind::UnexpectedCharacter);
        assert_eq!(error.range, 2..3);
        assert_eq!(error.padding, 2);
        assert_eq!(error.offset(), 2);
    }

    #[test]
    fn unexpected_multibyte_character_is_skipped_whole() {
        let error = next_token("é;", 0, LexMode::Any).unwrap_err();
        assert_eq!(error.range, 0..2);
        let next = next_token("é;", error.resume(), LexMode::Any).unwrap();
        assert_eq!(next.kind(), Some(SyntaxKind::SEMI));
    }

    #[test]
    fn error_display() {
        let error = next_token("#", 0, LexMode::Any).unwrap_err();
        assert_eq!(error.to_string(), "unexpected character at 0..1");
    }

    #[test]
    fn lex_statement() {
        assert_eq!(
            kinds("print 1 + 2.5;"),
            vec![
                Some(SyntaxKind::PRINT_KW),
                Some(SyntaxKind::NUMBER),
                Some(SyntaxKind::PLUS),
                Some(SyntaxKind::NUMBER),
                Some(SyntaxKind::SEMI),
            ]
        );
    }

    #[test]
    fn lex_keeps_going_after_errors() {
        assert_eq!(
            kinds("1 @ 2"),
            vec![Some(SyntaxKind::NUMBER), None, Some(SyntaxKind::NUMBER)]
        );
    }

    #[test]
    fn keywords_are_matched_as_prefixes() {
        // There are no identifiers, so `nilly` is `nil` followed by junk.
        let tokens = lex("nilly");
        assert_eq!(tokens[0].as_ref().unwrap().kind(), Some(SyntaxKind::NIL));
        assert!(tokens[1].is_err());
    }

    #[test]
    fn all_bytes_accounted_for() {
        let input = "print (1 + 2) * \"x\" ;\n  true ? nil : -3 @";
        let mut reconstructed = String::new();
        let mut cursor = 0;
        for result in lex(input) {
            let (padded_start, range) = match &result {
                Ok(token) => (token.padded_start(), token.range.clone()),
                Err(error) => (error.range.start - error.padding, error.range.clone()),
            };
            assert_eq!(padded_start, cursor);
            reconstructed.push_str(&input[padded_start..range.end]);
            cursor = range.end;
        }
        reconstructed.push_str(&input[cursor..]);
        assert_eq!(input, reconstructed);
    }
}
