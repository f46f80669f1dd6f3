//! Edge case tests for things-lex

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};

    fn lex_all(source: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push((token.kind, token.literal));
        }
        tokens
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_whitespace_only() {
        assert!(lex_all(" \t\r\n  \n").is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        let t = lex_all("x");
        assert_eq!(t[0], (TokenKind::Ident, "x".to_string()));
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10_000);
        let t = lex_all(&name);
        assert_eq!(t[0], (TokenKind::Ident, name));
    }

    #[test]
    fn test_edge_keywords_not_idents() {
        let t = lex_all("func var if");
        assert_eq!(t[0].0, TokenKind::Func);
        assert_eq!(t[1].0, TokenKind::Var);
        assert_eq!(t[2].0, TokenKind::If);
    }

    #[test]
    fn test_edge_case_sensitivity() {
        let t = lex_all("Func func");
        assert_eq!(t[0].0, TokenKind::Ident);
        assert_eq!(t[1].0, TokenKind::Func);
    }

    #[test]
    fn test_edge_hex_without_digits() {
        // "0x" lexes as one INT literal; the parser reports the conversion
        // failure.
        let t = lex_all("0x");
        assert_eq!(t[0], (TokenKind::Int, "0x".to_string()));
    }

    #[test]
    fn test_edge_zero() {
        let t = lex_all("0");
        assert_eq!(t[0], (TokenKind::Int, "0".to_string()));
    }

    #[test]
    fn test_edge_zero_dot() {
        let t = lex_all("0.5");
        assert_eq!(t[0], (TokenKind::Float, "0.5".to_string()));
    }

    #[test]
    fn test_edge_trailing_dot_float() {
        let t = lex_all("5.");
        assert_eq!(t[0], (TokenKind::Float, "5.".to_string()));
    }

    #[test]
    fn test_edge_nested_delimiters() {
        let t = lex_all("((()))");
        assert_eq!(
            t.iter().filter(|(k, _)| *k == TokenKind::LParen).count(),
            3
        );
        assert_eq!(
            t.iter().filter(|(k, _)| *k == TokenKind::RParen).count(),
            3
        );
    }

    #[test]
    fn test_edge_empty_block_comment() {
        let t = lex_all("/**/");
        assert_eq!(t[0], (TokenKind::Comment, String::new()));
    }

    #[test]
    fn test_edge_unterminated_block_comment() {
        let t = lex_all("1 /* never closed");
        assert_eq!(t[0].0, TokenKind::Int);
        assert_eq!(t[1].0, TokenKind::Comment);
    }

    #[test]
    fn test_edge_comment_at_eof_without_newline() {
        let t = lex_all("// last line");
        assert_eq!(t[0], (TokenKind::Comment, " last line".to_string()));
    }

    #[test]
    fn test_edge_consecutive_semicolons() {
        let t = lex_all(";;;");
        assert_eq!(t.len(), 3);
        assert!(t.iter().all(|(k, _)| *k == TokenKind::Semicolon));
    }

    #[test]
    fn test_edge_adjacent_operators_do_not_merge() {
        // "= =" is two ASSIGN tokens, not EQ.
        let t = lex_all("= =");
        assert_eq!(t[0].0, TokenKind::Assign);
        assert_eq!(t[1].0, TokenKind::Assign);
    }

    #[test]
    fn test_edge_multibyte_string_content() {
        let t = lex_all("\"héllo wörld\"");
        assert_eq!(t[0], (TokenKind::Str, "héllo wörld".to_string()));
    }

    #[test]
    fn test_edge_underscore_identifier() {
        let t = lex_all("_private");
        assert_eq!(t[0], (TokenKind::Ident, "_private".to_string()));
    }

    // ==================== PROPERTIES ====================

    use proptest::prelude::*;

    proptest! {
        /// The lexer never panics and always terminates, whatever the input.
        #[test]
        fn prop_lexer_total(source in "\\PC*") {
            let mut lexer = Lexer::new(&source);
            let mut fuel = source.len() + 8;
            loop {
                let token = lexer.next_token();
                if token.kind == TokenKind::Eof {
                    break;
                }
                fuel = fuel.checked_sub(1).expect("lexer must consume input");
            }
        }

        /// Decimal integer literals round-trip through the token literal.
        #[test]
        fn prop_decimal_literal_preserved(n in 1u64..=u64::MAX / 2) {
            let source = n.to_string();
            let mut lexer = Lexer::new(&source);
            let token = lexer.next_token();
            prop_assert_eq!(token.kind, TokenKind::Int);
            prop_assert_eq!(token.literal, source);
        }

        /// Every token (except EOF) reports a position inside the source.
        #[test]
        fn prop_positions_monotonic(source in "[a-z +\\n]{0,64}") {
            let mut lexer = Lexer::new(&source);
            let mut prev = (0u32, 0u32);
            loop {
                let token = lexer.next_token();
                if token.kind == TokenKind::Eof {
                    break;
                }
                let cur = (token.position.line, token.position.column);
                prop_assert!(cur >= prev, "positions must not go backwards");
                prev = cur;
            }
        }
    }
}
