//! SyntaxKind enum for every symbol of the compiled Lox grammar.
//!
//! The engine itself only deals in raw [`Symbol`] ids read from the parse
//! table. This enum gives those ids names for the one grammar we ship, and
//! its discriminants are the table's symbol numbers.

use crate::language::Symbol;

/// All symbols of the Lox grammar: terminals, nonterminals and `ERROR`.
///
/// The `repr(u16)` discriminants match the compiled table exactly, so a
/// `SyntaxKind` converts to a [`Symbol`] with a plain cast.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Terminals (tokenizer output) ===
    /// End of input
    END = 0,
    /// `;`
    SEMI,
    /// `print`
    PRINT_KW,
    /// `,`
    COMMA,
    /// `==`
    EQ_EQ,
    /// `!=`
    BANG_EQ,
    /// `<`
    LT,
    /// `<=`
    LT_EQ,
    /// `>`
    GT,
    /// `>=`
    GT_EQ,
    /// `+`
    PLUS,
    /// `-`, both infix and prefix
    MINUS,
    /// `*`
    STAR,
    /// `/`
    SLASH,
    /// `?`
    QUESTION,
    /// `:`
    COLON,
    /// `!`
    BANG,
    /// `(`
    L_PAREN,
    /// `)`
    R_PAREN,
    /// Digits with an optional fractional part
    NUMBER,
    /// `"`-delimited text, no escapes
    STRING,
    /// `true`
    TRUE_KW,
    /// `false`
    FALSE_KW,
    /// `nil`
    NIL,

    // === Nonterminals (parser output) ===
    /// Root node
    PROGRAM,
    /// Hidden supertype of the two statement kinds
    STATEMENT,
    /// `expression ;`
    EXPRESSION_STATEMENT,
    /// `print expression ;`
    PRINT_STATEMENT,
    /// Hidden supertype of all expressions
    EXPRESSION,
    /// `left op right`
    BINARY_EXPRESSION,
    /// `condition ? then : else`
    TERNARY_EXPRESSION,
    /// `-right` or `!right`
    UNARY_EXPRESSION,
    /// `( expression )`
    GROUP_EXPRESSION,
    /// Hidden supertype of the literal forms
    LITERAL_EXPRESSION,
    /// `true` or `false`
    BOOLEAN,
    /// Auxiliary left-recursive repetition of statements, never in the tree
    PROGRAM_REPEAT,

    /// Error recovery node
    ERROR = u16::MAX,
}

/// Kinds with a table symbol id, in id order.
const TABLE_KINDS: [SyntaxKind; 36] = [
    SyntaxKind::END,
    SyntaxKind::SEMI,
    SyntaxKind::PRINT_KW,
    SyntaxKind::COMMA,
    SyntaxKind::EQ_EQ,
    SyntaxKind::BANG_EQ,
    SyntaxKind::LT,
    SyntaxKind::LT_EQ,
    SyntaxKind::GT,
    SyntaxKind::GT_EQ,
    SyntaxKind::PLUS,
    SyntaxKind::MINUS,
    SyntaxKind::STAR,
    SyntaxKind::SLASH,
    SyntaxKind::QUESTION,
    SyntaxKind::COLON,
    SyntaxKind::BANG,
    SyntaxKind::L_PAREN,
    SyntaxKind::R_PAREN,
    SyntaxKind::NUMBER,
    SyntaxKind::STRING,
    SyntaxKind::TRUE_KW,
    SyntaxKind::FALSE_KW,
    SyntaxKind::NIL,
    SyntaxKind::PROGRAM,
    SyntaxKind::STATEMENT,
    SyntaxKind::EXPRESSION_STATEMENT,
    SyntaxKind::PRINT_STATEMENT,
    SyntaxKind::EXPRESSION,
    SyntaxKind::BINARY_EXPRESSION,
    SyntaxKind::TERNARY_EXPRESSION,
    SyntaxKind::UNARY_EXPRESSION,
    SyntaxKind::GROUP_EXPRESSION,
    SyntaxKind::LITERAL_EXPRESSION,
    SyntaxKind::BOOLEAN,
    SyntaxKind::PROGRAM_REPEAT,
];

impl SyntaxKind {
    /// Number of symbols in the compiled table (`ERROR` is not one of them).
    pub const SYMBOL_COUNT: usize = TABLE_KINDS.len();

    /// Number of terminal symbols, `END` included.
    pub const TOKEN_COUNT: usize = SyntaxKind::PROGRAM as usize;

    /// Returns true if this kind represents a token (tokenizer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::NIL as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true for the reserved words of the language.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::PRINT_KW | Self::TRUE_KW | Self::FALSE_KW | Self::NIL
        )
    }

    /// The table symbol for this kind.
    pub fn symbol(self) -> Symbol {
        Symbol(self as u16)
    }

    /// Map a raw table symbol back to its kind.
    pub fn from_symbol(symbol: Symbol) -> Option<Self> {
        if symbol == Symbol::ERROR {
            return Some(Self::ERROR);
        }
        TABLE_KINDS.get(symbol.0 as usize).copied()
    }
}

impl From<SyntaxKind> for Symbol {
    fn from(kind: SyntaxKind) -> Self {
        kind.symbol()
    }
}
