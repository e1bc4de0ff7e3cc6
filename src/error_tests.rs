//! Tests for error handling and diagnostics
//!
//! This module checks that every phase reports failures with the right
//! variant, an accurate position and a readable message.

#[cfg(test)]
mod tests {
    use crate::config::ConfigFactory;
    use crate::error::{
        CoercionError, HoconError, ParseError, Position, ResolveError, SerdeError, TokenizeError,
        snippet_at,
    };
    use crate::parser::{Parser, ParserConfig};

    fn parse_err(input: &str) -> HoconError {
        match ConfigFactory::parse(input) {
            Err(e) => e,
            Ok(config) => panic!("Expected an error for {:?}, parsed {}", input, config),
        }
    }

    #[test]
    fn test_position_tracking_accuracy() {
        let mut pos = Position::new();

        pos.advance('a');
        assert_eq!((pos.line, pos.column, pos.offset), (1, 2, 1));

        pos.advance('\n');
        assert_eq!((pos.line, pos.column, pos.offset), (2, 1, 2));

        pos.advance('\r');
        assert_eq!((pos.line, pos.column, pos.offset), (2, 1, 3));

        // 'ü' is 2 bytes in UTF-8
        pos.advance('ü');
        assert_eq!((pos.line, pos.column, pos.offset), (2, 2, 5));
    }

    #[test]
    fn test_position_at_offset() {
        let source = "a = 1\nbb = 2\n";
        let pos = Position::at_offset(source, 8);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.to_string(), "2:3");

        // Offsets past the end clamp to the end of input
        assert_eq!(Position::at_offset(source, 100).line, 3);
    }

    #[test]
    fn test_snippet_is_single_line_and_truncated() {
        assert_eq!(snippet_at("abc\ndef", 0), "abc\\ndef");
        assert_eq!(
            snippet_at("0123456789abcdefghijXYZ", 0),
            "0123456789abcdefghij..."
        );
        assert_eq!(snippet_at("short", 10), "");
    }

    #[test]
    fn test_unterminated_string_position() {
        match parse_err("a = 1\nb = \"open") {
            HoconError::Tokenize(TokenizeError::UnterminatedString { position }) => {
                assert_eq!(position.line, 2);
                assert_eq!(position.column, 5);
            }
            other => panic!("Expected UnterminatedString, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_triple_quoted_message() {
        let err = parse_err("a = \"\"\"never closed");
        assert!(matches!(
            err,
            HoconError::Tokenize(TokenizeError::UnterminatedTripleQuotedString { .. })
        ));
        assert_eq!(
            err.to_string(),
            "Tokenizer error: Expected end of triple quoted string at 1:5"
        );
    }

    #[test]
    fn test_invalid_escape_message() {
        let err = parse_err(r#"a = "bad \q escape""#);
        assert_eq!(
            err.to_string(),
            "Tokenizer error: Unknown escape code `\\q` at 1:10"
        );
    }

    #[test]
    fn test_unknown_token_in_key_position() {
        match parse_err("a = 1\n@weird = 2") {
            HoconError::Tokenize(TokenizeError::UnknownToken { snippet, position }) => {
                assert_eq!(snippet, "@weird = 2");
                assert_eq!(position.line, 2);
                assert_eq!(position.column, 1);
            }
            other => panic!("Expected UnknownToken, got {:?}", other),
        }
    }

    #[test]
    fn test_tokenize_error_position_accessor() {
        match parse_err("a = ${unclosed") {
            HoconError::Tokenize(e) => {
                assert!(matches!(e, TokenizeError::UnterminatedSubstitution { .. }));
                assert_eq!(e.position().column, 5);
            }
            other => panic!("Expected tokenizer error, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_token_message_includes_trace() {
        let err = parse_err("server {\n  port = 80\n  host\n}");
        match &err {
            HoconError::Parse(ParseError::UnexpectedToken {
                token,
                expected,
                position,
                trace,
            }) => {
                assert_eq!(token, "'}'");
                assert_eq!(expected, "'=', ':', '{' or '.'");
                assert_eq!((position.line, position.column), (4, 1));
                assert_eq!(trace, "Current path: {server = {host = ");
            }
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
        assert!(err.to_string().starts_with("Parse error: Unexpected '}' at 4:1"));
    }

    #[test]
    fn test_unexpected_eof_message() {
        let err = parse_err("a {");
        assert_eq!(
            err.to_string(),
            "Parse error: Expected key, include or '}' but found EoF. Current path: {a = {"
        );
    }

    #[test]
    fn test_empty_value_message() {
        let err = parse_err("a = ]");
        assert!(err.to_string().starts_with("Parse error: Hocon syntax error at 1:5: `]`"));
    }

    #[test]
    fn test_max_depth_message() {
        let config = crate::parser::ParserConfig::new().with_max_depth(1);
        let err = Parser::with_config("a { b { } }", config).parse().unwrap_err();
        assert!(err.to_string().contains("Maximum nesting depth of 1 exceeded"));
    }

    #[test]
    fn test_resolve_error_messages() {
        assert_eq!(
            parse_err("a = ${nope}").to_string(),
            "Resolution error: Unresolved substitution: nope"
        );
        assert_eq!(
            parse_err("a = ${a}").to_string(),
            "Resolution error: Cyclic substitution of 'a': a -> a"
        );

        let config = ParserConfig::new().with_max_depth(1);
        assert_eq!(
            ConfigFactory::parse_with_config("a = ${b}\nb = ${c}\nc = 1", None, config)
                .unwrap_err()
                .to_string(),
            "Resolution error: Substitution chain through 'c' exceeds the maximum depth of 1"
        );
    }

    #[test]
    fn test_resolve_errors_compare() {
        match parse_err("x = ${y}\ny = ${z}\nz = ${x}") {
            HoconError::Resolve(e) => assert!(matches!(e, ResolveError::Cyclic { .. })),
            other => panic!("Expected resolve error, got {:?}", other),
        }
    }

    #[test]
    fn test_coercion_error_messages() {
        let config = ConfigFactory::parse("flag = maybe\nn = 1.5\nobj { a = 1 }").unwrap();

        assert_eq!(
            config.get_bool("flag").unwrap_err().to_string(),
            "Type error: Unknown boolean format: maybe"
        );
        assert_eq!(
            config.get_int("n").unwrap_err().to_string(),
            "Type error: Invalid int format for: 1.5"
        );
        match config.get_string("obj") {
            Err(HoconError::Coercion(CoercionError::WrongType { expected, found })) => {
                assert_eq!(expected, "string");
                assert_eq!(found, "object");
            }
            other => panic!("Expected WrongType, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_custom_error() {
        let err = <HoconError as serde::de::Error>::custom("boom");
        assert!(matches!(err, HoconError::Serde(SerdeError::Custom(ref m)) if m == "boom"));
        assert_eq!(err.to_string(), "Serde error: boom");
    }

    #[test]
    fn test_include_failure_wraps_source() {
        let handler = crate::include::MapIncludeHandler::new();
        let err = ConfigFactory::parse_with("include \"missing\"", Some(&handler), false).unwrap_err();
        match &err {
            HoconError::Parse(ParseError::IncludeFailed { path, source }) => {
                assert_eq!(path, "missing");
                assert!(matches!(**source, HoconError::Io(_)));
            }
            other => panic!("Expected IncludeFailed, got {:?}", other),
        }
        assert!(std::error::Error::source(&err).is_some());
    }
}
