//! HOCON tokenizer
//!
//! The tokenizer is a cursor over the source text. It does not produce a
//! token stream up front: the parser asks for a structural token with
//! [`Tokenizer::pull_next`] or for a value with [`Tokenizer::pull_value`],
//! because the same characters mean different things in key and value
//! position. A checkpoint stack lets the parser look ahead and rewind.

use crate::error::{Position, TokenizeError, snippet_at};
use crate::value::HoconLiteral;

/// Characters that end an unquoted value
pub const NOT_IN_UNQUOTED_TEXT: &str = "$\"{}[]:=,#`^?!@*&\\";

/// Characters that end an unquoted key
pub const NOT_IN_UNQUOTED_KEY: &str = "$\"{}[]:=,#`^?!@*&\\.";

/// Kinds of tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    Key,
    LiteralValue,
    Assign,
    ObjectStart,
    ObjectEnd,
    Dot,
    EoF,
    ArrayStart,
    ArrayEnd,
    Comma,
    Substitute,
    Include,
}

impl TokenKind {
    /// Returns a human-readable name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Key => "key",
            TokenKind::LiteralValue => "literal value",
            TokenKind::Assign => "'=' or ':'",
            TokenKind::ObjectStart => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::Dot => "'.'",
            TokenKind::EoF => "end of file",
            TokenKind::ArrayStart => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::Comma => "','",
            TokenKind::Substitute => "substitution",
            TokenKind::Include => "include",
        }
    }
}

/// A lexical token
///
/// `offset` and `length` are byte positions in the source. Keys, includes,
/// substitutions and literals carry their text in `value`; literals also
/// carry the typed scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub length: usize,
    pub value: Option<HoconLiteral>,
}

impl Token {
    fn new(kind: TokenKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
            value: None,
        }
    }

    fn with_value(kind: TokenKind, offset: usize, length: usize, value: HoconLiteral) -> Self {
        Self {
            kind,
            offset,
            length,
            value: Some(value),
        }
    }

    /// Returns the token text, or an empty string for punctuation
    pub fn text(&self) -> &str {
        self.value.as_ref().map(|v| v.text.as_str()).unwrap_or("")
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// Cursor-based tokenizer with checkpoint/restore
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    text: &'a str,
    index: usize,
    checkpoints: Vec<usize>,
    native: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer; `native` enables typed conversion of unquoted literals
    pub fn new(text: &'a str, native: bool) -> Self {
        Self {
            text,
            index: 0,
            checkpoints: Vec::new(),
            native,
        }
    }

    pub fn source(&self) -> &'a str {
        self.text
    }

    /// Current byte offset of the cursor
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_eof(&self) -> bool {
        self.index >= self.text.len()
    }

    /// Saves the cursor on the checkpoint stack
    pub fn push(&mut self) {
        self.checkpoints.push(self.index);
    }

    /// Drops the last checkpoint and keeps the cursor where it is
    pub fn pop(&mut self) {
        self.checkpoints.pop();
    }

    /// Drops the last checkpoint and moves the cursor back to it
    pub fn restore(&mut self) {
        if let Some(index) = self.checkpoints.pop() {
            self.index = index;
        }
    }

    /// Line/column of a byte offset, for error messages
    pub fn position_at(&self, offset: usize) -> Position {
        Position::at_offset(self.text, offset)
    }

    /// Up to 20 characters of source starting at `offset`
    pub fn help_text_at(&self, offset: usize) -> String {
        snippet_at(self.text, offset)
    }

    fn rest(&self) -> &'a str {
        &self.text[self.index.min(self.text.len())..]
    }

    fn matches(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn take_one(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += c.len_utf8();
        Some(c)
    }

    /// Advances over an ASCII pattern already known to match
    fn skip(&mut self, pattern: &str) {
        self.index += pattern.len();
    }

    fn is_whitespace_char(c: char) -> bool {
        c.is_whitespace() || c == '\u{feff}'
    }

    fn is_space_or_tab_char(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\u{0b}')
    }

    fn is_start_of_comment(&self) -> bool {
        self.matches("#") || self.matches("//")
    }

    fn is_whitespace(&self) -> bool {
        self.peek().is_some_and(Self::is_whitespace_char)
    }

    pub fn is_space_or_tab(&self) -> bool {
        self.peek().is_some_and(Self::is_space_or_tab_char)
    }

    pub fn is_comma(&self) -> bool {
        self.matches(",")
    }

    pub fn is_array_end(&self) -> bool {
        self.matches("]")
    }

    pub fn is_object_start(&self) -> bool {
        self.matches("{")
    }

    fn is_unquoted_char(&self, c: char, forbidden: &str) -> bool {
        !Self::is_whitespace_char(c) && !forbidden.contains(c)
    }

    fn is_unquoted_text(&self) -> bool {
        match self.peek() {
            Some(c) => !self.is_start_of_comment() && self.is_unquoted_char(c, NOT_IN_UNQUOTED_TEXT),
            None => false,
        }
    }

    fn is_unquoted_key_start(&self) -> bool {
        match self.peek() {
            Some(c) => !self.is_start_of_comment() && self.is_unquoted_char(c, NOT_IN_UNQUOTED_KEY),
            None => false,
        }
    }

    /// True when the cursor is at something that can start a value
    pub fn is_value(&self) -> bool {
        self.matches("[")
            || self.matches("{")
            || self.matches("\"")
            || self.matches("${")
            || self.is_unquoted_text()
    }

    /// True when the cursor is at `include` followed by a quoted path
    ///
    /// The cursor is left untouched either way.
    pub fn is_include(&mut self) -> bool {
        if !self.matches("include") {
            return false;
        }
        self.push();
        self.skip("include");
        let separated = self.is_whitespace() || self.is_start_of_comment();
        self.pull_whitespace_and_comments();
        let result = separated && self.matches("\"") && !self.matches("\"\"\"");
        self.restore();
        result
    }

    /// Skips whitespace, including line breaks
    pub fn pull_whitespace(&mut self) {
        while self.is_whitespace() {
            self.take_one();
        }
    }

    /// Consumes a comment up to and including the end of the line
    pub fn pull_comment(&mut self) -> Token {
        let start = self.index;
        while let Some(c) = self.take_one() {
            if c == '\n' {
                break;
            }
        }
        let body = self.text[start..self.index].trim_end_matches(['\r', '\n']);
        Token::with_value(TokenKind::Comment, start, self.index - start, HoconLiteral::new(body))
    }

    /// Skips whitespace and comments
    pub fn pull_whitespace_and_comments(&mut self) {
        loop {
            self.pull_whitespace();
            if self.is_start_of_comment() {
                self.pull_comment();
            } else {
                break;
            }
        }
    }

    /// Consumes spaces and tabs and returns them as a literal
    pub fn pull_space_or_tab(&mut self) -> Token {
        let start = self.index;
        while self.is_space_or_tab() {
            self.take_one();
        }
        let text = &self.text[start..self.index];
        Token::with_value(TokenKind::LiteralValue, start, text.len(), HoconLiteral::new(text))
    }

    pub fn pull_comma(&mut self) -> Token {
        let start = self.index;
        self.skip(",");
        Token::new(TokenKind::Comma, start, 1)
    }

    pub fn pull_array_end(&mut self) -> Result<Token, TokenizeError> {
        let start = self.index;
        if !self.is_array_end() {
            return Err(TokenizeError::ExpectedArrayEnd {
                snippet: self.help_text_at(start),
                position: self.position_at(start),
            });
        }
        self.skip("]");
        Ok(Token::new(TokenKind::ArrayEnd, start, 1))
    }

    /// Returns the next structural token in key position
    pub fn pull_next(&mut self) -> Result<Token, TokenizeError> {
        self.pull_whitespace_and_comments();
        let start = self.index;

        if self.is_eof() {
            return Ok(Token::new(TokenKind::EoF, start, 0));
        }
        if self.matches(".") {
            self.skip(".");
            return Ok(Token::new(TokenKind::Dot, start, 1));
        }
        if self.matches("{") {
            self.skip("{");
            return Ok(Token::new(TokenKind::ObjectStart, start, 1));
        }
        if self.matches("}") {
            self.skip("}");
            return Ok(Token::new(TokenKind::ObjectEnd, start, 1));
        }
        if self.matches("=") || self.matches(":") {
            self.take_one();
            return Ok(Token::new(TokenKind::Assign, start, 1));
        }
        if self.matches(",") {
            return Ok(self.pull_comma());
        }
        if self.is_include() {
            return self.pull_include();
        }
        if self.matches("\"") {
            let text = self.pull_quoted_text()?;
            return Ok(Token::with_value(
                TokenKind::Key,
                start,
                self.index - start,
                HoconLiteral::new(text),
            ));
        }
        if self.is_unquoted_key_start() {
            return Ok(self.pull_unquoted_key());
        }
        if self.matches("[") {
            self.skip("[");
            return Ok(Token::new(TokenKind::ArrayStart, start, 1));
        }
        if self.matches("]") {
            self.skip("]");
            return Ok(Token::new(TokenKind::ArrayEnd, start, 1));
        }

        Err(TokenizeError::UnknownToken {
            snippet: self.help_text_at(start),
            position: self.position_at(start),
        })
    }

    fn pull_include(&mut self) -> Result<Token, TokenizeError> {
        let start = self.index;
        self.skip("include");
        self.pull_whitespace_and_comments();
        let path = self.pull_quoted_text()?;
        Ok(Token::with_value(
            TokenKind::Include,
            start,
            self.index - start,
            HoconLiteral::new(path),
        ))
    }

    /// Unquoted keys may contain inner spaces and tabs but never a line break
    fn pull_unquoted_key(&mut self) -> Token {
        let start = self.index;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' || self.is_start_of_comment() {
                break;
            }
            if !Self::is_space_or_tab_char(c) && !self.is_unquoted_char(c, NOT_IN_UNQUOTED_KEY) {
                break;
            }
            self.take_one();
        }
        let raw = &self.text[start..self.index];
        let key = raw.trim_end_matches(Self::is_space_or_tab_char);
        Token::with_value(TokenKind::Key, start, key.len(), HoconLiteral::new(key))
    }

    /// Returns the next token in value position
    pub fn pull_value(&mut self) -> Result<Token, TokenizeError> {
        let start = self.index;

        if self.matches("{") {
            self.skip("{");
            return Ok(Token::new(TokenKind::ObjectStart, start, 1));
        }
        if self.matches("\"\"\"") {
            let text = self.pull_triple_quoted_text()?;
            return Ok(Token::with_value(
                TokenKind::LiteralValue,
                start,
                self.index - start,
                HoconLiteral::new(text),
            ));
        }
        if self.matches("\"") {
            let text = self.pull_quoted_text()?;
            return Ok(Token::with_value(
                TokenKind::LiteralValue,
                start,
                self.index - start,
                HoconLiteral::new(text),
            ));
        }
        if self.is_unquoted_text() {
            return Ok(self.pull_unquoted_text());
        }
        if self.matches("[") {
            self.skip("[");
            return Ok(Token::new(TokenKind::ArrayStart, start, 1));
        }
        if self.matches("]") {
            self.skip("]");
            return Ok(Token::new(TokenKind::ArrayEnd, start, 1));
        }
        if self.matches("${") {
            return self.pull_substitution();
        }

        Err(TokenizeError::ExpectedValue {
            snippet: self.help_text_at(start),
            position: self.position_at(start),
        })
    }

    fn pull_unquoted_text(&mut self) -> Token {
        let start = self.index;
        while self.is_unquoted_text() {
            self.take_one();
        }
        let text = &self.text[start..self.index];
        let literal = if self.native {
            HoconLiteral::native(text)
        } else {
            HoconLiteral::new(text)
        };
        Token::with_value(TokenKind::LiteralValue, start, text.len(), literal)
    }

    fn pull_substitution(&mut self) -> Result<Token, TokenizeError> {
        let start = self.index;
        self.skip("${");
        let body_start = self.index;

        let Some(close) = self.rest().find(['}', '\n']).filter(|&i| self.rest()[i..].starts_with('}'))
        else {
            return Err(TokenizeError::UnterminatedSubstitution {
                snippet: self.help_text_at(start),
                position: self.position_at(start),
            });
        };

        let path = self.text[body_start..body_start + close].trim();
        self.index = body_start + close + 1;
        Ok(Token::with_value(
            TokenKind::Substitute,
            start,
            self.index - start,
            HoconLiteral::new(path),
        ))
    }

    /// Reads a `"..."` string and processes escapes
    fn pull_quoted_text(&mut self) -> Result<String, TokenizeError> {
        let start = self.index;
        self.skip("\"");
        let mut text = String::new();

        loop {
            match self.take_one() {
                None | Some('\n') => {
                    return Err(TokenizeError::UnterminatedString {
                        position: self.position_at(start),
                    });
                }
                Some('"') => return Ok(text),
                Some('\\') => text.push(self.pull_escape_sequence()?),
                Some(c) => text.push(c),
            }
        }
    }

    fn pull_escape_sequence(&mut self) -> Result<char, TokenizeError> {
        let escape_start = self.index - 1;
        let Some(c) = self.take_one() else {
            return Err(TokenizeError::UnterminatedString {
                position: self.position_at(escape_start),
            });
        };

        match c {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{08}'),
            'f' => Ok('\u{0c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.pull_unicode_escape(escape_start),
            other => Err(TokenizeError::InvalidEscape {
                sequence: other.to_string(),
                position: self.position_at(escape_start),
            }),
        }
    }

    fn pull_hex4(&mut self, escape_start: usize) -> Result<u32, TokenizeError> {
        let digits: String = self.rest().chars().take(4).collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TokenizeError::InvalidUnicodeEscape {
                sequence: digits,
                position: self.position_at(escape_start),
            });
        }
        self.index += 4;
        u32::from_str_radix(&digits, 16).map_err(|_| TokenizeError::InvalidUnicodeEscape {
            sequence: digits,
            position: self.position_at(escape_start),
        })
    }

    /// `\uXXXX`, combining a surrogate pair when one follows
    fn pull_unicode_escape(&mut self, escape_start: usize) -> Result<char, TokenizeError> {
        let high = self.pull_hex4(escape_start)?;

        let code = if (0xD800..0xDC00).contains(&high) && self.matches("\\u") {
            self.skip("\\u");
            let low = self.pull_hex4(escape_start)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(TokenizeError::InvalidUnicodeEscape {
                    sequence: format!("{high:04X}\\u{low:04X}"),
                    position: self.position_at(escape_start),
                });
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code).ok_or_else(|| TokenizeError::InvalidUnicodeEscape {
            sequence: format!("{code:04X}"),
            position: self.position_at(escape_start),
        })
    }

    /// Reads a raw `"""..."""` string; quotes right before the closing
    /// delimiter belong to the content
    fn pull_triple_quoted_text(&mut self) -> Result<String, TokenizeError> {
        let start = self.index;
        self.skip("\"\"\"");
        let body_start = self.index;

        let Some(mut end) = self.rest().find("\"\"\"").map(|i| body_start + i) else {
            return Err(TokenizeError::UnterminatedTripleQuotedString {
                position: self.position_at(start),
            });
        };
        while self.text[end + 3..].starts_with('"') {
            end += 1;
        }

        let text = self.text[body_start..end].to_string();
        self.index = end + 3;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut tokenizer = Tokenizer::new(input, false);
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.pull_next().unwrap();
            kinds.push(token.kind);
            if token.kind == TokenKind::EoF {
                return kinds;
            }
        }
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            kinds("{ } . = : , [ ]"),
            vec![
                TokenKind::ObjectStart,
                TokenKind::ObjectEnd,
                TokenKind::Dot,
                TokenKind::Assign,
                TokenKind::Assign,
                TokenKind::Comma,
                TokenKind::ArrayStart,
                TokenKind::ArrayEnd,
                TokenKind::EoF,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut tokenizer = Tokenizer::new("# hash\n// slashes\n  key", false);
        let token = tokenizer.pull_next().unwrap();
        assert_eq!(token.kind, TokenKind::Key);
        assert_eq!(token.text(), "key");
        assert_eq!(tokenizer.pull_next().unwrap().kind, TokenKind::EoF);
    }

    #[test]
    fn test_unquoted_key_stops_at_dot() {
        let mut tokenizer = Tokenizer::new("a.b = 1", false);
        assert_eq!(tokenizer.pull_next().unwrap().text(), "a");
        assert_eq!(tokenizer.pull_next().unwrap().kind, TokenKind::Dot);
        assert_eq!(tokenizer.pull_next().unwrap().text(), "b");
        assert_eq!(tokenizer.pull_next().unwrap().kind, TokenKind::Assign);
    }

    #[test]
    fn test_unquoted_key_keeps_inner_spaces() {
        let mut tokenizer = Tokenizer::new("my key \t= 1", false);
        let token = tokenizer.pull_next().unwrap();
        assert_eq!(token.text(), "my key");
        assert_eq!(token.length, "my key".len());
        assert_eq!(tokenizer.pull_next().unwrap().kind, TokenKind::Assign);
    }

    #[test]
    fn test_quoted_key_is_not_split() {
        let mut tokenizer = Tokenizer::new("\"a.b\" = 1", false);
        let token = tokenizer.pull_next().unwrap();
        assert_eq!(token.kind, TokenKind::Key);
        assert_eq!(token.text(), "a.b");
    }

    #[test]
    fn test_include_detection() {
        let mut tokenizer = Tokenizer::new("include \"other.conf\"", false);
        let token = tokenizer.pull_next().unwrap();
        assert_eq!(token.kind, TokenKind::Include);
        assert_eq!(token.text(), "other.conf");

        let mut tokenizer = Tokenizer::new("include = 5", false);
        let token = tokenizer.pull_next().unwrap();
        assert_eq!(token.kind, TokenKind::Key);
        assert_eq!(token.text(), "include");
        assert_eq!(tokenizer.index(), "include ".len());

        let mut tokenizer = Tokenizer::new("includes { }", false);
        assert_eq!(tokenizer.pull_next().unwrap().text(), "includes");
    }

    #[test]
    fn test_quoted_escapes() {
        let mut tokenizer = Tokenizer::new(r#""a\"b\\c\/d\n\t\u0041""#, false);
        let token = tokenizer.pull_value().unwrap();
        assert_eq!(token.text(), "a\"b\\c/d\n\tA");
        assert!(tokenizer.is_eof());
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let mut tokenizer = Tokenizer::new(r#""\uD83D\uDE00""#, false);
        assert_eq!(tokenizer.pull_value().unwrap().text(), "\u{1F600}");
    }

    #[test]
    fn test_invalid_escape() {
        let mut tokenizer = Tokenizer::new(r#""bad \q""#, false);
        match tokenizer.pull_value() {
            Err(TokenizeError::InvalidEscape { sequence, position }) => {
                assert_eq!(sequence, "q");
                assert_eq!(position.column, 6);
            }
            other => panic!("Expected InvalidEscape, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::new("\"never closed", false);
        assert!(matches!(
            tokenizer.pull_value(),
            Err(TokenizeError::UnterminatedString { .. })
        ));

        let mut tokenizer = Tokenizer::new("\"line\nbreak\"", false);
        assert!(matches!(
            tokenizer.pull_value(),
            Err(TokenizeError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_triple_quoted_is_raw() {
        let mut tokenizer = Tokenizer::new("\"\"\"C:\\path\n\"quoted\"\"\"\"", false);
        let token = tokenizer.pull_value().unwrap();
        assert_eq!(token.text(), "C:\\path\n\"quoted\"");
        assert!(tokenizer.is_eof());
    }

    #[test]
    fn test_unterminated_triple_quoted() {
        let mut tokenizer = Tokenizer::new("\"\"\"open", false);
        assert!(matches!(
            tokenizer.pull_value(),
            Err(TokenizeError::UnterminatedTripleQuotedString { .. })
        ));
    }

    #[test]
    fn test_substitution_token() {
        let mut tokenizer = Tokenizer::new("${ a.b.c }", false);
        let token = tokenizer.pull_value().unwrap();
        assert_eq!(token.kind, TokenKind::Substitute);
        assert_eq!(token.text(), "a.b.c");
        assert_eq!(token.length, 10);

        let mut tokenizer = Tokenizer::new("${a.b\n}", false);
        assert!(matches!(
            tokenizer.pull_value(),
            Err(TokenizeError::UnterminatedSubstitution { .. })
        ));
    }

    #[test]
    fn test_unquoted_value_stops_at_comment() {
        let mut tokenizer = Tokenizer::new("value// trailing", false);
        assert_eq!(tokenizer.pull_value().unwrap().text(), "value");
    }

    #[test]
    fn test_native_conversion() {
        let cases = [
            ("42", Scalar::Integer(42)),
            ("-7", Scalar::Integer(-7)),
            ("2.5", Scalar::Float(2.5)),
            ("on", Scalar::Boolean(true)),
            ("off", Scalar::Boolean(false)),
            ("1.2.3", Scalar::String("1.2.3".to_string())),
        ];

        for (input, expected) in cases {
            let mut tokenizer = Tokenizer::new(input, true);
            let token = tokenizer.pull_value().unwrap();
            let literal = token.value.unwrap();
            assert_eq!(literal.value, expected, "input: {}", input);
            assert_eq!(literal.text, input);
        }

        // Quoted text is never converted
        let mut tokenizer = Tokenizer::new("\"42\"", true);
        let literal = tokenizer.pull_value().unwrap().value.unwrap();
        assert_eq!(literal.value, Scalar::String("42".to_string()));
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut tokenizer = Tokenizer::new("a b", false);
        tokenizer.push();
        tokenizer.pull_next().unwrap();
        assert_eq!(tokenizer.index(), 3);
        tokenizer.restore();
        assert_eq!(tokenizer.index(), 0);

        tokenizer.push();
        tokenizer.pull_value().unwrap();
        tokenizer.pop();
        assert_eq!(tokenizer.index(), 1);
    }

    #[test]
    fn test_space_or_tab_literal() {
        let mut tokenizer = Tokenizer::new(" \t x", false);
        assert!(tokenizer.is_space_or_tab());
        let token = tokenizer.pull_space_or_tab();
        assert_eq!(token.text(), " \t ");
        assert!(tokenizer.is_value());
    }

    #[test]
    fn test_unknown_token_reports_snippet() {
        let mut tokenizer = Tokenizer::new("\n  ?oops", false);
        match tokenizer.pull_next() {
            Err(TokenizeError::UnknownToken { snippet, position }) => {
                assert_eq!(snippet, "?oops");
                assert_eq!(position.line, 2);
                assert_eq!(position.column, 3);
            }
            other => panic!("Expected UnknownToken, got {:?}", other),
        }
    }

    #[test]
    fn test_expected_value_error() {
        let mut tokenizer = Tokenizer::new("= nope", false);
        assert!(matches!(
            tokenizer.pull_value(),
            Err(TokenizeError::ExpectedValue { .. })
        ));
    }

    #[test]
    fn test_token_type_names() {
        assert_eq!(TokenKind::ObjectStart.type_name(), "'{'");
        assert_eq!(TokenKind::EoF.type_name(), "end of file");
        assert_eq!(TokenKind::Substitute.type_name(), "substitution");
    }
}
