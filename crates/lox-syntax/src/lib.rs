//! # lox-syntax
//!
//! Syntax trees for a small Lox expression language, produced by a
//! table-driven LR shift/reduce engine with a mode-aware [Logos] tokenizer.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## What Gets Parsed
//!
//! Programs are sequences of statements, each terminated by `;`:
//!
//! ```text
//! print 1 + 2 * 3;
//! (1 + 2) * 3 == 9 ? "yes" : "no";
//! !true;
//! ```
//!
//! There are no variables, functions or control flow. Expressions are
//! literals (`number`, `string`, `true`, `false`, `nil`), prefix `-` and
//! `!`, the binary operators `== != < <= > >= + - * /` and `,`, the ternary
//! `?:` and parentheses.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Token → Engine → TreeBuilder → SyntaxTree
//!               (Logos,          (action    (fields,
//!                per mode)        table)     splicing)
//! ```
//!
//! ### 1. Language ([`language`] module)
//!
//! A compiled grammar as static data: symbols, productions with field maps,
//! and a two-tier action table. The engine is an interpreter over this
//! data and never hardcodes anything about Lox.
//!
//! ### 2. Lexer ([`lexer`] module)
//!
//! Each parser state names a lexical mode, and the lexer only recognizes
//! the tokens valid in that mode. This is what tells an infix `-` from a
//! prefix `-` with a single token of lookahead.
//!
//! ### 3. Parser ([`parser`] module)
//!
//! The shift/reduce loop. Reductions build nodes immediately; there is no
//! intermediate event list. When no action exists, statement-level recovery
//! wraps the broken statement in an `ERROR` node and carries on.
//!
//! ### 4. Tree ([`tree`] module)
//!
//! An arena of nodes with byte ranges, named fields and parent links,
//! queried through `Copy` [`Node`] handles. Every byte of the input is
//! accounted for, broken input included.
//!
//! ## Module Structure
//!
//! ```text
//! lox-syntax/
//! ├── lib.rs           # This file - public API and end-to-end tests
//! ├── syntax_kind.rs   # SyntaxKind enum for the Lox table's symbols
//! ├── error.rs         # SyntaxError diagnostics, ParseError
//! ├── lexer.rs         # Logos tokenizer, one DFA per lexical mode
//! ├── language/
//! │   ├── mod.rs       # Grammar table types and lookups
//! │   └── lox.rs       # The compiled Lox table
//! ├── parser/
//! │   ├── mod.rs       # Parser, ParserOptions, the engine loop
//! │   ├── builder.rs   # Node construction, field attachment
//! │   └── recovery.rs  # Statement-level error recovery
//! └── tree/
//!     └── mod.rs       # SyntaxTree, Node, S-expressions
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use lox_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("print 1 + 2 * 3;");
//! assert_eq!(
//!     tree.to_sexp(),
//!     "(program (print_statement expression: (binary_expression \
//!      left: (number) right: (binary_expression left: (number) right: (number)))))"
//! );
//!
//! let print = tree.root().child(0).unwrap();
//! assert_eq!(print.syntax_kind(), Some(SyntaxKind::PRINT_STATEMENT));
//! let product = print
//!     .child_by_field_name("expression")
//!     .and_then(|sum| sum.child_by_field_name("right"))
//!     .unwrap();
//! assert_eq!(product.text(), "2 * 3");
//! ```
//!
//! ## Errors Are Part of the Tree
//!
//! Parsing never fails on bad syntax. Malformed statements become `ERROR`
//! nodes, and the diagnostics are available from [`SyntaxTree::errors`]:
//!
//! ```
//! let tree = lox_syntax::parse("print ; print 2;");
//! assert_eq!(tree.to_sexp(), "(program (ERROR) (print_statement expression: (number)))");
//! assert_eq!(
//!     tree.errors()[0].to_string(),
//!     "unexpected token `;` at 6..7, expected one of `-` `!` `(` `number` `string` `true` `false` `nil`"
//! );
//! ```

pub mod error;
pub mod language;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;
pub mod tree;

pub use error::{ParseError, SyntaxError, SyntaxErrorKind};
pub use language::{Language, Symbol};
pub use parser::{Parser, ParserOptions, parse};
pub use syntax_kind::SyntaxKind;
pub use tree::{Node, NodeId, Point, SyntaxTree};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Compact rendering for precedence tests: `(op left right)`, with
    /// literals as their text.
    fn shape(node: Node<'_, '_>) -> String {
        match node.syntax_kind() {
            Some(SyntaxKind::PROGRAM) => node.named_children().map(shape).collect::<Vec<_>>().join(" "),
            Some(SyntaxKind::EXPRESSION_STATEMENT | SyntaxKind::PRINT_STATEMENT) => node
                .child_by_field_name("expression")
                .map(shape)
                .unwrap_or_default(),
            Some(SyntaxKind::BINARY_EXPRESSION) => format!(
                "({} {} {})",
                node.child(1).map(|op| op.text()).unwrap_or_default(),
                node.child_by_field_name("left").map(shape).unwrap_or_default(),
                node.child_by_field_name("right").map(shape).unwrap_or_default(),
            ),
            Some(SyntaxKind::UNARY_EXPRESSION) => format!(
                "({} {})",
                node.child(0).map(|op| op.text()).unwrap_or_default(),
                node.child_by_field_name("right").map(shape).unwrap_or_default(),
            ),
            Some(SyntaxKind::TERNARY_EXPRESSION) => format!(
                "(? {} {} {})",
                node.child_by_field_name("condition").map(shape).unwrap_or_default(),
                node.child_by_field_name("then").map(shape).unwrap_or_default(),
                node.child_by_field_name("else").map(shape).unwrap_or_default(),
            ),
            Some(SyntaxKind::GROUP_EXPRESSION) => format!(
                "[{}]",
                node.child_by_field_name("expression").map(shape).unwrap_or_default()
            ),
            _ => node.text().to_string(),
        }
    }

    fn parse_shape(source: &str) -> String {
        let _ = env_logger::builder().is_test(true).try_init();
        let tree = parse(source);
        assert!(!tree.has_errors(), "{source:?} has errors: {:?}", tree.errors());
        shape(tree.root())
    }

    #[rstest]
    #[case::product_binds_tighter("1 + 2 * 3;", "(+ 1 (* 2 3))")]
    #[case::product_first("1 * 2 + 3;", "(+ (* 1 2) 3)")]
    #[case::sum_binds_tighter_than_comparison("1 < 2 + 3;", "(< 1 (+ 2 3))")]
    #[case::comparison_binds_tighter_than_equality("1 == 2 < 3;", "(== 1 (< 2 3))")]
    #[case::equality_binds_tighter_than_ternary("1 == 2 ? 3 : 4;", "(? (== 1 2) 3 4)")]
    #[case::unary_binds_tighter("-1 + 2;", "(+ (- 1) 2)")]
    #[case::unary_before_product("!true * 2;", "(* (! true) 2)")]
    #[case::grouping_overrides("(1 + 2) * 3;", "(* [(+ 1 2)] 3)")]
    #[case::comma_is_loosest("1 ? 2 : 3, 4;", "(, (? 1 2 3) 4)")]
    #[case::ternary_then_is_unrestricted("1 ? 2 ? 3 : 4 : 5;", "(? 1 (? 2 3 4) 5)")]
    #[case::comma_inside_group("(1, 2);", "[(, 1 2)]")]
    fn precedence(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(parse_shape(source), expected);
    }

    #[rstest]
    #[case::subtraction("1 - 2 - 3;", "(- (- 1 2) 3)")]
    #[case::division("8 / 4 / 2;", "(/ (/ 8 4) 2)")]
    #[case::equality("1 == 2 != 3;", "(!= (== 1 2) 3)")]
    #[case::comparison("1 < 2 <= 3;", "(<= (< 1 2) 3)")]
    #[case::comma("1, 2, 3;", "(, (, 1 2) 3)")]
    #[case::ternary_is_right_associative("true ? 1 : false ? 2 : 3;", "(? true 1 (? false 2 3))")]
    #[case::unary_nests_right("-!-1;", "(- (! (- 1)))")]
    fn associativity(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(parse_shape(source), expected);
    }

    #[test]
    fn print_statement_has_expression_field() {
        let tree = parse("print 1;");
        let print = tree.root().child(0).unwrap();
        assert_eq!(print.kind(), "print_statement");
        let expression = print.child_by_field_name("expression").unwrap();
        assert_eq!(expression.kind(), "number");
        assert_eq!(expression.text(), "1");
        assert_eq!(Some(expression), print.child(1));
    }

    #[test]
    fn field_lookup_is_idempotent() {
        let tree = parse("print (1 + 2) * -3 == 4 ? \"a\" : nil;");
        for node in tree.root().descendants() {
            for index in 0..node.child_count() {
                let Some(name) = node.field_name_for_child(index) else {
                    continue;
                };
                let first = node.child_by_field_name(name);
                let second = node.child_by_field_name(name);
                assert_eq!(first, second);
                assert_eq!(first, node.child(index));
            }
        }
    }

    #[test]
    fn recovery_yields_statement_level_error() {
        let tree = parse("print ;\nprint 2 * 3;");
        let statements: Vec<_> = tree.root().children().collect();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].is_error());
        assert_eq!(statements[0].text(), "print ;");
        assert_eq!(shape(statements[1]), "(* 2 3)");
        assert_eq!(statements[1].start_position(), Point { row: 1, column: 0 });
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "",
            "   ",
            "1;",
            "print 1 + 2;\n",
            "  (1) ;  \n\n",
            "\"multi\nline\";",
            "print ;",
            "1 +",
            ") ) ;",
            "1 @ 2;",
            "print \"unterminated",
            "true ? 1 : 2 : 3;",
            "print 1.5 / 0.25 >= 6;\r\n",
        ];

        for input in inputs {
            let tree = parse(input);
            let mut rebuilt = String::new();
            let mut cursor = 0;
            for leaf in tree.leaves() {
                let range = leaf.padded_range();
                assert_eq!(range.start, cursor, "gap before {leaf:?} in {input:?}");
                assert!(input[range.clone()].trim().len() <= leaf.text().len());
                rebuilt.push_str(&input[range.clone()]);
                cursor = range.end;
            }
            assert!(input[cursor..].trim().is_empty(), "unparsed tail in {input:?}");
            rebuilt.push_str(&input[cursor..]);
            assert_eq!(rebuilt, input, "roundtrip failed for {input:?}");
            assert_eq!(tree.root().byte_range(), 0..input.len());
        }
    }
}
