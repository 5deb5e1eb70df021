//! The compiled Lox grammar.
//!
//! ```text
//! program              = statement*
//! statement            = expression_statement | print_statement
//! expression_statement = expression ";"
//! print_statement      = "print" expression ";"
//! expression           = binary | ternary | unary | group | literal
//! ternary              = expression "?" expression ":" expression
//! unary                = ("-" | "!") expression
//! group                = "(" expression ")"
//! literal              = number | string | boolean | "nil"
//! ```
//!
//! Binary operators, loosest first, all left-associative: `,` then `==` `!=`
//! then `<` `<=` `>` `>=` then `+` `-` then `*` `/`. The ternary binds
//! looser than `==` and tighter than `,`, and associates to the right.
//! Prefix operators bind tightest.
//!
//! The tables below are transcribed from a generated LR(1) automaton. Unit
//! reductions through the hidden supertypes have been eliminated, so a lone
//! literal is shifted straight into the state that follows a whole
//! expression.

use super::LexMode::{Any, Operand, Operator, StatementStart};
use super::{
    FieldId, FieldMapEntry, Language, LexMode, ParseAction, Production, ProductionId, StateId,
    Symbol, SymbolMetadata,
};
use crate::lexer::next_token;
use crate::syntax_kind::SyntaxKind as K;

const SYMBOL_COUNT: usize = K::SYMBOL_COUNT;
const STATE_COUNT: usize = 30;
const LARGE_STATE_COUNT: usize = 4;

static SYMBOL_NAMES: [&str; SYMBOL_COUNT] = [
    "end",
    ";",
    "print",
    ",",
    "==",
    "!=",
    "<",
    "<=",
    ">",
    ">=",
    "+",
    "-",
    "*",
    "/",
    "?",
    ":",
    "!",
    "(",
    ")",
    "number",
    "string",
    "true",
    "false",
    "nil",
    "program",
    "_statement",
    "expression_statement",
    "print_statement",
    "_expression",
    "binary_expression",
    "ternary_expression",
    "unary_expression",
    "group_expression",
    "_literal_expression",
    "boolean",
    "program_repeat1",
];

const fn meta(visible: bool, named: bool) -> SymbolMetadata {
    SymbolMetadata { visible, named }
}

/// Punctuation and keywords.
const ANON: SymbolMetadata = meta(true, false);
const NAMED: SymbolMetadata = meta(true, true);
const HIDDEN: SymbolMetadata = meta(false, true);

static SYMBOL_METADATA: [SymbolMetadata; SYMBOL_COUNT] = [
    HIDDEN, // end
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    ANON,
    NAMED, // number
    NAMED, // string
    ANON,  // true
    ANON,  // false
    NAMED, // nil
    NAMED, // program
    HIDDEN,
    NAMED,
    NAMED,
    HIDDEN,
    NAMED,
    NAMED,
    NAMED,
    NAMED,
    HIDDEN,
    NAMED,
    meta(false, false), // program_repeat1
];

const FIELD_CONDITION: FieldId = FieldId(1);
const FIELD_ELSE: FieldId = FieldId(2);
const FIELD_EXPRESSION: FieldId = FieldId(3);
const FIELD_LEFT: FieldId = FieldId(4);
const FIELD_RIGHT: FieldId = FieldId(5);
const FIELD_THEN: FieldId = FieldId(6);

static FIELD_NAMES: [&str; 7] = ["", "condition", "else", "expression", "left", "right", "then"];

const fn field(field: FieldId, child_index: u8) -> FieldMapEntry {
    FieldMapEntry { field, child_index }
}

static PRODUCTIONS: [Production; 10] = [
    Production {
        symbol: Symbol(K::PROGRAM as u16),
        child_count: 0,
        fields: &[],
    },
    Production {
        symbol: Symbol(K::PROGRAM as u16),
        child_count: 1,
        fields: &[],
    },
    Production {
        symbol: Symbol(K::PROGRAM_REPEAT as u16),
        child_count: 2,
        fields: &[],
    },
    Production {
        symbol: Symbol(K::GROUP_EXPRESSION as u16),
        child_count: 3,
        fields: &[field(FIELD_EXPRESSION, 1)],
    },
    Production {
        symbol: Symbol(K::BINARY_EXPRESSION as u16),
        child_count: 3,
        fields: &[field(FIELD_LEFT, 0), field(FIELD_RIGHT, 2)],
    },
    Production {
        symbol: Symbol(K::BOOLEAN as u16),
        child_count: 1,
        fields: &[],
    },
    Production {
        symbol: Symbol(K::TERNARY_EXPRESSION as u16),
        child_count: 5,
        fields: &[
            field(FIELD_CONDITION, 0),
            field(FIELD_THEN, 2),
            field(FIELD_ELSE, 4),
        ],
    },
    Production {
        symbol: Symbol(K::UNARY_EXPRESSION as u16),
        child_count: 2,
        fields: &[field(FIELD_RIGHT, 1)],
    },
    Production {
        symbol: Symbol(K::PRINT_STATEMENT as u16),
        child_count: 3,
        fields: &[field(FIELD_EXPRESSION, 1)],
    },
    Production {
        symbol: Symbol(K::EXPRESSION_STATEMENT as u16),
        child_count: 2,
        fields: &[field(FIELD_EXPRESSION, 0)],
    },
];

const fn shift(state: u16) -> ParseAction {
    ParseAction::Shift(StateId(state))
}

const fn reduce(production: u16) -> ParseAction {
    ParseAction::Reduce(ProductionId(production))
}

/// Action lists referenced by terminal cells. Index 0 is the empty list.
static PARSE_ACTIONS: [&[ParseAction]; 38] = [
    &[],
    &[ParseAction::Recover],
    &[reduce(0)],
    &[shift(19)],
    &[shift(21)],
    &[shift(20)],
    &[shift(26)],
    &[shift(6)],
    &[reduce(1)],
    &[reduce(2)],
    &[reduce(3)],
    &[reduce(4)],
    &[shift(15)],
    &[shift(16)],
    &[shift(17)],
    &[reduce(5)],
    &[reduce(6)],
    &[shift(14)],
    &[shift(18)],
    &[shift(7)],
    &[reduce(7)],
    &[shift(22)],
    &[shift(5)],
    &[shift(12)],
    &[shift(11)],
    &[shift(9)],
    &[shift(25)],
    &[shift(24)],
    &[shift(23)],
    &[shift(10)],
    &[shift(13)],
    &[shift(4)],
    &[shift(27)],
    &[shift(8)],
    &[shift(28)],
    &[reduce(8)],
    &[reduce(9)],
    &[ParseAction::Accept],
];

/// Expand sparse `(symbol, value)` pairs into a full table row.
const fn row(entries: &[(K, u16)]) -> [u16; SYMBOL_COUNT] {
    let mut cells = [0; SYMBOL_COUNT];
    let mut index = 0;
    while index < entries.len() {
        let (kind, value) = entries[index];
        cells[kind as usize] = value;
        index += 1;
    }
    cells
}

static ROW_0: [u16; SYMBOL_COUNT] = row(&[
    (K::END, 1),
    (K::SEMI, 1),
    (K::PRINT_KW, 1),
    (K::COMMA, 1),
    (K::EQ_EQ, 1),
    (K::BANG_EQ, 1),
    (K::LT, 1),
    (K::LT_EQ, 1),
    (K::GT, 1),
    (K::GT_EQ, 1),
    (K::PLUS, 1),
    (K::MINUS, 1),
    (K::STAR, 1),
    (K::SLASH, 1),
    (K::QUESTION, 1),
    (K::COLON, 1),
    (K::BANG, 1),
    (K::L_PAREN, 1),
    (K::R_PAREN, 1),
    (K::NUMBER, 1),
    (K::STRING, 1),
    (K::TRUE_KW, 1),
    (K::FALSE_KW, 1),
    (K::NIL, 1),
]);

static ROW_1: [u16; SYMBOL_COUNT] = row(&[
    (K::PROGRAM, 29),
    (K::STATEMENT, 2),
    (K::EXPRESSION_STATEMENT, 2),
    (K::PRINT_STATEMENT, 2),
    (K::EXPRESSION, 26),
    (K::BINARY_EXPRESSION, 26),
    (K::TERNARY_EXPRESSION, 26),
    (K::UNARY_EXPRESSION, 26),
    (K::GROUP_EXPRESSION, 26),
    (K::LITERAL_EXPRESSION, 26),
    (K::BOOLEAN, 26),
    (K::PROGRAM_REPEAT, 2),
    (K::END, 2),
    (K::PRINT_KW, 3),
    (K::MINUS, 4),
    (K::BANG, 4),
    (K::L_PAREN, 5),
    (K::NUMBER, 6),
    (K::STRING, 6),
    (K::TRUE_KW, 7),
    (K::FALSE_KW, 7),
    (K::NIL, 6),
]);

static ROW_2: [u16; SYMBOL_COUNT] = row(&[
    (K::STATEMENT, 3),
    (K::EXPRESSION_STATEMENT, 3),
    (K::PRINT_STATEMENT, 3),
    (K::EXPRESSION, 26),
    (K::BINARY_EXPRESSION, 26),
    (K::TERNARY_EXPRESSION, 26),
    (K::UNARY_EXPRESSION, 26),
    (K::GROUP_EXPRESSION, 26),
    (K::LITERAL_EXPRESSION, 26),
    (K::BOOLEAN, 26),
    (K::PROGRAM_REPEAT, 3),
    (K::END, 8),
    (K::PRINT_KW, 3),
    (K::MINUS, 4),
    (K::BANG, 4),
    (K::L_PAREN, 5),
    (K::NUMBER, 6),
    (K::STRING, 6),
    (K::TRUE_KW, 7),
    (K::FALSE_KW, 7),
    (K::NIL, 6),
]);

static ROW_3: [u16; SYMBOL_COUNT] = row(&[
    (K::STATEMENT, 3),
    (K::EXPRESSION_STATEMENT, 3),
    (K::PRINT_STATEMENT, 3),
    (K::EXPRESSION, 26),
    (K::BINARY_EXPRESSION, 26),
    (K::TERNARY_EXPRESSION, 26),
    (K::UNARY_EXPRESSION, 26),
    (K::GROUP_EXPRESSION, 26),
    (K::LITERAL_EXPRESSION, 26),
    (K::BOOLEAN, 26),
    (K::PROGRAM_REPEAT, 3),
    (K::END, 9),
    (K::PRINT_KW, 9),
    (K::MINUS, 9),
    (K::BANG, 9),
    (K::L_PAREN, 9),
    (K::NUMBER, 9),
    (K::STRING, 9),
    (K::TRUE_KW, 9),
    (K::FALSE_KW, 9),
    (K::NIL, 9),
]);

static PARSE_TABLE: [&[u16]; LARGE_STATE_COUNT] = [&ROW_0, &ROW_1, &ROW_2, &ROW_3];

#[rustfmt::skip]
static SMALL_PARSE_TABLE: &[u16] = &[
    // state 4
    2,
    10, 2, K::LT as u16, K::GT as u16,
    10, 13,
        K::SEMI as u16, K::COMMA as u16, K::EQ_EQ as u16, K::BANG_EQ as u16,
        K::LT_EQ as u16, K::GT_EQ as u16, K::PLUS as u16, K::MINUS as u16,
        K::STAR as u16, K::SLASH as u16, K::QUESTION as u16, K::COLON as u16,
        K::R_PAREN as u16,
    // state 5
    5,
    12, 2, K::LT as u16, K::GT as u16,
    12, 2, K::LT_EQ as u16, K::GT_EQ as u16,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    11, 7,
        K::SEMI as u16, K::COMMA as u16, K::EQ_EQ as u16, K::BANG_EQ as u16,
        K::QUESTION as u16, K::COLON as u16, K::R_PAREN as u16,
    // state 6
    2,
    15, 2, K::LT as u16, K::GT as u16,
    15, 13,
        K::SEMI as u16, K::COMMA as u16, K::EQ_EQ as u16, K::BANG_EQ as u16,
        K::LT_EQ as u16, K::GT_EQ as u16, K::PLUS as u16, K::MINUS as u16,
        K::STAR as u16, K::SLASH as u16, K::QUESTION as u16, K::COLON as u16,
        K::R_PAREN as u16,
    // state 7
    7,
    18, 1, K::QUESTION as u16,
    12, 2, K::LT as u16, K::GT as u16,
    12, 2, K::LT_EQ as u16, K::GT_EQ as u16,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    17, 2, K::EQ_EQ as u16, K::BANG_EQ as u16,
    16, 4,
        K::SEMI as u16, K::COMMA as u16, K::COLON as u16, K::R_PAREN as u16,
    // state 8
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    19, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    7, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 9
    2,
    11, 2, K::LT as u16, K::GT as u16,
    11, 13,
        K::SEMI as u16, K::COMMA as u16, K::EQ_EQ as u16, K::BANG_EQ as u16,
        K::LT_EQ as u16, K::GT_EQ as u16, K::PLUS as u16, K::MINUS as u16,
        K::STAR as u16, K::SLASH as u16, K::QUESTION as u16, K::COLON as u16,
        K::R_PAREN as u16,
    // state 10
    2,
    20, 2, K::LT as u16, K::GT as u16,
    20, 13,
        K::SEMI as u16, K::COMMA as u16, K::EQ_EQ as u16, K::BANG_EQ as u16,
        K::LT_EQ as u16, K::GT_EQ as u16, K::PLUS as u16, K::MINUS as u16,
        K::STAR as u16, K::SLASH as u16, K::QUESTION as u16, K::COLON as u16,
        K::R_PAREN as u16,
    // state 11
    3,
    14, 2, K::STAR as u16, K::SLASH as u16,
    11, 2, K::LT as u16, K::GT as u16,
    11, 11,
        K::SEMI as u16, K::COMMA as u16, K::EQ_EQ as u16, K::BANG_EQ as u16,
        K::LT_EQ as u16, K::GT_EQ as u16, K::PLUS as u16, K::MINUS as u16,
        K::QUESTION as u16, K::COLON as u16, K::R_PAREN as u16,
    // state 12
    4,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    11, 2, K::LT as u16, K::GT as u16,
    11, 9,
        K::SEMI as u16, K::COMMA as u16, K::EQ_EQ as u16, K::BANG_EQ as u16,
        K::LT_EQ as u16, K::GT_EQ as u16, K::QUESTION as u16, K::COLON as u16,
        K::R_PAREN as u16,
    // state 13
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    21, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    22, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 14
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    22, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    5, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 15
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    23, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    12, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 16
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    24, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    11, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 17
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    25, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    9, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 18
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    26, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    25, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 19
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    27, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    24, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 20
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    28, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    23, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 21
    5,
    5, 1, K::L_PAREN as u16,
    4, 2, K::MINUS as u16, K::BANG as u16,
    7, 2, K::TRUE_KW as u16, K::FALSE_KW as u16,
    29, 3, K::NUMBER as u16, K::STRING as u16, K::NIL as u16,
    10, 7,
        K::EXPRESSION as u16, K::BINARY_EXPRESSION as u16, K::TERNARY_EXPRESSION as u16, K::UNARY_EXPRESSION as u16,
        K::GROUP_EXPRESSION as u16, K::LITERAL_EXPRESSION as u16, K::BOOLEAN as u16,
    // state 22
    7,
    18, 1, K::QUESTION as u16,
    12, 2, K::LT as u16, K::GT as u16,
    12, 2, K::LT_EQ as u16, K::GT_EQ as u16,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    17, 2, K::EQ_EQ as u16, K::BANG_EQ as u16,
    11, 4,
        K::SEMI as u16, K::COMMA as u16, K::COLON as u16, K::R_PAREN as u16,
    // state 23
    8,
    18, 1, K::QUESTION as u16,
    30, 1, K::COMMA as u16,
    31, 1, K::R_PAREN as u16,
    12, 2, K::LT as u16, K::GT as u16,
    12, 2, K::LT_EQ as u16, K::GT_EQ as u16,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    17, 2, K::EQ_EQ as u16, K::BANG_EQ as u16,
    // state 24
    8,
    18, 1, K::QUESTION as u16,
    30, 1, K::COMMA as u16,
    32, 1, K::SEMI as u16,
    12, 2, K::LT as u16, K::GT as u16,
    12, 2, K::LT_EQ as u16, K::GT_EQ as u16,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    17, 2, K::EQ_EQ as u16, K::BANG_EQ as u16,
    // state 25
    8,
    18, 1, K::QUESTION as u16,
    30, 1, K::COMMA as u16,
    33, 1, K::COLON as u16,
    12, 2, K::LT as u16, K::GT as u16,
    12, 2, K::LT_EQ as u16, K::GT_EQ as u16,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    17, 2, K::EQ_EQ as u16, K::BANG_EQ as u16,
    // state 26
    8,
    18, 1, K::QUESTION as u16,
    30, 1, K::COMMA as u16,
    34, 1, K::SEMI as u16,
    12, 2, K::LT as u16, K::GT as u16,
    12, 2, K::LT_EQ as u16, K::GT_EQ as u16,
    13, 2, K::PLUS as u16, K::MINUS as u16,
    14, 2, K::STAR as u16, K::SLASH as u16,
    17, 2, K::EQ_EQ as u16, K::BANG_EQ as u16,
    // state 27
    1,
    35, 10,
        K::END as u16, K::PRINT_KW as u16, K::MINUS as u16, K::BANG as u16,
        K::L_PAREN as u16, K::NUMBER as u16, K::STRING as u16, K::TRUE_KW as u16,
        K::FALSE_KW as u16, K::NIL as u16,
    // state 28
    1,
    36, 10,
        K::END as u16, K::PRINT_KW as u16, K::MINUS as u16, K::BANG as u16,
        K::L_PAREN as u16, K::NUMBER as u16, K::STRING as u16, K::TRUE_KW as u16,
        K::FALSE_KW as u16, K::NIL as u16,
    // state 29
    1,
    37, 1, K::END as u16,
];

static SMALL_PARSE_TABLE_MAP: [u32; STATE_COUNT - LARGE_STATE_COUNT] = [
    0, 20, 46, 66, 96, 122, 142, 162, 184, 208, 234, 260, 286, 312, 338, 364, 390, 416, 442, 472,
    502, 532, 562, 592, 605, 618,
];

static LEX_MODES: [LexMode; STATE_COUNT] = [
    Any,
    StatementStart,
    StatementStart,
    StatementStart,
    Operator,
    Operator,
    Operator,
    Operator,
    Operand,
    Operator,
    Operator,
    Operator,
    Operator,
    Operand,
    Operand,
    Operand,
    Operand,
    Operand,
    Operand,
    Operand,
    Operand,
    Operand,
    Operator,
    Operator,
    Operator,
    Operator,
    Operator,
    StatementStart,
    StatementStart,
    Any,
];

static RECOVERY_SYNC: [Symbol; 1] = [Symbol(K::SEMI as u16)];

static LOX: Language = Language {
    name: "lox",
    token_count: K::TOKEN_COUNT,
    symbol_names: &SYMBOL_NAMES,
    symbol_metadata: &SYMBOL_METADATA,
    field_names: &FIELD_NAMES,
    productions: &PRODUCTIONS,
    large_state_count: LARGE_STATE_COUNT,
    parse_table: &PARSE_TABLE,
    small_parse_table: SMALL_PARSE_TABLE,
    small_parse_table_map: &SMALL_PARSE_TABLE_MAP,
    parse_actions: &PARSE_ACTIONS,
    lex_modes: &LEX_MODES,
    lex_fn: next_token,
    start_state: StateId(1),
    root_symbol: Symbol(K::PROGRAM as u16),
    recovery_symbol: Symbol(K::STATEMENT as u16),
    sync_symbols: &RECOVERY_SYNC,
};

/// The Lox grammar.
pub fn language() -> &'static Language {
    &LOX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_names_line_up_with_kinds() {
        assert_eq!(SYMBOL_NAMES[K::PRINT_KW as usize], "print");
        assert_eq!(SYMBOL_NAMES[K::NIL as usize], "nil");
        assert_eq!(SYMBOL_NAMES[K::BOOLEAN as usize], "boolean");
        assert_eq!(SYMBOL_NAMES[K::PROGRAM_REPEAT as usize], "program_repeat1");
    }

    #[test]
    fn every_action_target_is_a_state() {
        for actions in PARSE_ACTIONS {
            for action in actions {
                match action {
                    ParseAction::Shift(state) => assert!(usize::from(state.0) < STATE_COUNT),
                    ParseAction::Reduce(id) => assert!(usize::from(id.0) < PRODUCTIONS.len()),
                    ParseAction::Accept | ParseAction::Recover => {}
                }
            }
        }
    }

    #[test]
    fn small_table_map_ends_inside_table() {
        let last = SMALL_PARSE_TABLE_MAP[SMALL_PARSE_TABLE_MAP.len() - 1] as usize;
        assert!(last < SMALL_PARSE_TABLE.len());
    }

    #[test]
    fn only_the_final_state_accepts() {
        let lang = language();
        for state in 0..STATE_COUNT as u16 {
            let accepts = lang.action(StateId(state), Symbol::END) == Some(ParseAction::Accept);
            assert_eq!(accepts, state == 29, "state {state}");
        }
    }

    #[test]
    fn operand_states_lex_operands() {
        let lang = language();
        // A state that shifts `(` must not be lexing operators.
        for state in 1..STATE_COUNT as u16 {
            let state = StateId(state);
            if lang.action(state, Symbol(K::L_PAREN as u16)).is_some() {
                assert_ne!(lang.lex_mode(state), LexMode::Operator);
            }
            if lang.action(state, Symbol(K::STAR as u16)).is_some() {
                assert_eq!(lang.lex_mode(state), LexMode::Operator);
            }
        }
    }
}
