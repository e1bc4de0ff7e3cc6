//! HOCON parser
//!
//! A recursive-descent parser that pulls tokens from the [`Tokenizer`] on
//! demand and builds a [`HoconValue`] tree. Substitutions are not resolved
//! here: the parser records every `${path}` it meets and the
//! [`resolve`](crate::resolve) pass fills them in once the tree is complete.

use crate::error::{HoconError, ParseError};
use crate::include::IncludeHandler;
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use crate::value::{
    ConfigRoot, HoconArray, HoconElement, HoconLiteral, HoconObject, HoconSubstitution, HoconValue,
};
use tracing::{debug, trace};

/// Configuration options for the parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Convert unquoted numbers and booleans to typed scalars
    pub native_values: bool,
    /// Maximum nesting depth of objects and arrays
    pub max_depth: usize,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether unquoted literals are converted to native scalars
    pub fn with_native_values(mut self, native_values: bool) -> Self {
        self.native_values = native_values;
        self
    }

    /// Sets the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            native_values: false,
            max_depth: 128,
        }
    }
}

/// What ends the object currently being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Top level of a document, ends at EoF
    Document,
    /// Inside `{ ... }`, ends at `}`
    Braced,
    /// Continuation of a dotted key, ends after one field
    Path,
}

/// HOCON parser
pub struct Parser<'a, 'h> {
    tokenizer: Tokenizer<'a>,
    config: ParserConfig,
    include_handler: Option<&'h dyn IncludeHandler>,
    substitutions: Vec<HoconSubstitution>,
    diagnostics: Vec<String>,
    depth: usize,
}

impl<'a, 'h> Parser<'a, 'h> {
    /// Creates a new parser with default configuration
    pub fn new(text: &'a str) -> Self {
        Self::with_config(text, ParserConfig::default())
    }

    /// Creates a parser with custom configuration
    pub fn with_config(text: &'a str, config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(text, config.native_values),
            config,
            include_handler: None,
            substitutions: Vec::new(),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    /// Sets the handler consulted for `include` directives
    pub fn with_include_handler(mut self, handler: &'h dyn IncludeHandler) -> Self {
        self.include_handler = Some(handler);
        self
    }

    /// Parses the whole document
    ///
    /// The returned root still holds unresolved substitutions.
    pub fn parse(mut self) -> Result<ConfigRoot, HoconError> {
        debug!(
            bytes = self.tokenizer.source().len(),
            native = self.config.native_values,
            "parsing HOCON document"
        );

        let mut root = HoconValue::from_element(HoconElement::Object(HoconObject::new()));

        self.tokenizer.pull_whitespace_and_comments();
        if self.tokenizer.is_object_start() {
            // A JSON-style document wrapped in one pair of braces
            self.tokenizer.pull_next()?;
            self.parse_object(&mut root, Scope::Braced, "")?;
            let token = self.tokenizer.pull_next()?;
            if token.kind != TokenKind::EoF {
                return Err(self.unexpected(&token, "end of file"));
            }
        } else {
            self.parse_object(&mut root, Scope::Document, "")?;
        }

        debug!(
            substitutions = self.substitutions.len(),
            "finished parsing HOCON document"
        );
        Ok(ConfigRoot::new(root, self.substitutions))
    }

    fn trace(&self) -> String {
        format!("Current path: {}", self.diagnostics.concat())
    }

    fn describe(token: &Token) -> String {
        match token.kind {
            TokenKind::Key => format!("key '{}'", token.text()),
            TokenKind::Include => format!("include '{}'", token.text()),
            TokenKind::Substitute => format!("substitution '${{{}}}'", token.text()),
            TokenKind::LiteralValue => format!("value '{}'", token.text()),
            kind => kind.type_name().to_string(),
        }
    }

    fn unexpected(&self, token: &Token, expected: &str) -> HoconError {
        if token.kind == TokenKind::EoF {
            return self.unexpected_eof(expected);
        }
        ParseError::UnexpectedToken {
            token: Self::describe(token),
            expected: expected.to_string(),
            position: self.tokenizer.position_at(token.offset),
            trace: self.trace(),
        }
        .into()
    }

    fn unexpected_eof(&self, expected: &str) -> HoconError {
        ParseError::UnexpectedEof {
            expected: expected.to_string(),
            trace: self.trace(),
        }
        .into()
    }

    fn enter(&mut self) -> Result<(), HoconError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(ParseError::MaxDepthExceeded {
                max_depth: self.config.max_depth,
                position: self.tokenizer.position_at(self.tokenizer.index()),
            }
            .into());
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_object(
        &mut self,
        value: &mut HoconValue,
        scope: Scope,
        current_path: &str,
    ) -> Result<(), HoconError> {
        self.enter()?;
        self.diagnostics.push("{".to_string());
        self.parse_object_fields(value, scope, current_path)?;
        self.diagnostics.pop();
        self.leave();
        Ok(())
    }

    fn parse_object_fields(
        &mut self,
        value: &mut HoconValue,
        scope: Scope,
        current_path: &str,
    ) -> Result<(), HoconError> {
        // Existing objects are merged into, anything else is replaced
        value.object_mut_or_insert();

        loop {
            let token = self.tokenizer.pull_next()?;
            match token.kind {
                TokenKind::Key => {
                    let key = token.text();
                    let next_path = if current_path.is_empty() {
                        key.to_string()
                    } else {
                        format!("{}.{}", current_path, key)
                    };
                    let child = value.object_mut_or_insert().get_or_create_key(key);
                    self.parse_key_content(child, &next_path)?;
                    if scope == Scope::Path {
                        return Ok(());
                    }
                }
                TokenKind::Include if scope != Scope::Path => {
                    self.parse_include(value, &token, current_path)?;
                }
                TokenKind::Comma if scope != Scope::Path => {}
                TokenKind::ObjectEnd if scope == Scope::Braced => return Ok(()),
                TokenKind::EoF if scope == Scope::Document => return Ok(()),
                _ => {
                    let expected = match scope {
                        Scope::Document => "key or include",
                        Scope::Braced => "key, include or '}'",
                        Scope::Path => "key",
                    };
                    return Err(self.unexpected(&token, expected));
                }
            }
        }
    }

    fn parse_key_content(
        &mut self,
        value: &mut HoconValue,
        current_path: &str,
    ) -> Result<(), HoconError> {
        let last = current_path.rsplit('.').next().unwrap_or(current_path);
        self.diagnostics.push(format!("{} = ", last));

        let token = self.tokenizer.pull_next()?;
        match token.kind {
            TokenKind::Dot => self.parse_object(value, Scope::Path, current_path)?,
            TokenKind::Assign => {
                value.clear();
                self.parse_value(value, current_path)?;
            }
            TokenKind::ObjectStart => {
                value.clear();
                self.parse_object(value, Scope::Braced, current_path)?;
            }
            _ => return Err(self.unexpected(&token, "'=', ':', '{' or '.'")),
        }

        self.diagnostics.pop();
        Ok(())
    }

    /// Parses one value position, which may hold several juxtaposed elements
    ///
    /// Returns whether a trailing comma was consumed.
    fn parse_value(
        &mut self,
        value: &mut HoconValue,
        current_path: &str,
    ) -> Result<bool, HoconError> {
        self.tokenizer.pull_whitespace_and_comments();
        if self.tokenizer.is_eof() {
            return Err(self.unexpected_eof("value"));
        }

        let start = self.tokenizer.index();
        let mut pending_space: Option<HoconLiteral> = None;

        while self.tokenizer.is_value() {
            let token = self.tokenizer.pull_value()?;
            match token.kind {
                TokenKind::LiteralValue => {
                    if value.is_object() {
                        value.clear();
                    }
                    Self::append_concatenated(value, pending_space.take());
                    if let Some(literal) = token.value {
                        value.append_value(HoconElement::Literal(literal));
                    }
                }
                TokenKind::Substitute => {
                    Self::append_concatenated(value, pending_space.take());
                    let substitution = HoconSubstitution::new(token.text());
                    self.substitutions.push(substitution.clone());
                    value.append_value(HoconElement::Substitution(substitution));
                }
                TokenKind::ObjectStart => {
                    pending_space = None;
                    self.parse_object(value, Scope::Braced, current_path)?;
                }
                TokenKind::ArrayStart => {
                    pending_space = None;
                    let array = self.parse_array(current_path)?;
                    value.append_value(HoconElement::Array(array));
                }
                _ => return Err(self.unexpected(&token, "value")),
            }

            // Inline whitespace only counts when another value follows on the same line
            if self.tokenizer.is_space_or_tab() {
                self.tokenizer.push();
                let space = self.tokenizer.pull_space_or_tab();
                if self.tokenizer.is_value() {
                    self.tokenizer.pop();
                    pending_space = space.value;
                } else {
                    self.tokenizer.restore();
                }
            }
        }

        if self.tokenizer.index() == start {
            return Err(ParseError::EmptyValue {
                snippet: self.tokenizer.help_text_at(start),
                position: self.tokenizer.position_at(start),
                trace: self.trace(),
            }
            .into());
        }

        let separated = self.tokenizer.is_comma();
        if separated {
            self.tokenizer.pull_comma();
        }
        Ok(separated)
    }

    /// Keeps the whitespace between two string pieces
    fn append_concatenated(value: &mut HoconValue, space: Option<HoconLiteral>) {
        let joins_string = matches!(
            value.elements().last(),
            Some(HoconElement::Literal(_) | HoconElement::Substitution(_))
        );
        if let (true, Some(space)) = (joins_string, space) {
            value.append_value(HoconElement::Literal(space));
        }
    }

    fn parse_array(&mut self, current_path: &str) -> Result<HoconArray, HoconError> {
        self.enter()?;
        self.diagnostics.push("|".to_string());

        let mut array = HoconArray::new();
        let mut separated = true;
        loop {
            self.tokenizer.pull_whitespace_and_comments();
            if self.tokenizer.is_eof() {
                return Err(self.unexpected_eof("']'"));
            }
            if self.tokenizer.is_array_end() {
                break;
            }
            // A separator may sit on its own, e.g. `[1 , 2]` or a leading-comma layout
            if !separated && self.tokenizer.is_comma() {
                self.tokenizer.pull_comma();
                separated = true;
                continue;
            }
            let mut item = HoconValue::new();
            separated = self.parse_value(&mut item, current_path)?;
            array.push(item);
        }
        self.tokenizer.pull_array_end()?;

        self.diagnostics.pop();
        self.leave();
        Ok(array)
    }

    fn parse_include(
        &mut self,
        value: &mut HoconValue,
        token: &Token,
        current_path: &str,
    ) -> Result<(), HoconError> {
        let name = token.text();
        let handler = self
            .include_handler
            .ok_or_else(|| ParseError::IncludeUnavailable {
                path: name.to_string(),
            })?;

        trace!(include = name, path = current_path, "resolving include");
        let included = handler.resolve_include(name).map_err(|e| match e {
            HoconError::Parse(ParseError::IncludeCycle { .. }) => e,
            other => ParseError::IncludeFailed {
                path: name.to_string(),
                source: Box::new(other),
            }
            .into(),
        })?;

        let mut included_value = included.value;
        self.reparent_substitutions(&mut included_value, current_path);
        if let Some(other) = included_value.take_object() {
            value.object_mut_or_insert().merge(other);
        }
        Ok(())
    }

    /// Makes substitution paths of an included tree relative to `prefix`
    /// and registers them for resolution
    fn reparent_substitutions(&mut self, value: &mut HoconValue, prefix: &str) {
        for element in value.elements_mut() {
            match element {
                HoconElement::Substitution(substitution) => {
                    if !prefix.is_empty() {
                        substitution.path = format!("{}.{}", prefix, substitution.path);
                    }
                    substitution.resolved = None;
                    self.substitutions.push(substitution.clone());
                }
                HoconElement::Array(items) => {
                    for item in items {
                        self.reparent_substitutions(item, prefix);
                    }
                }
                HoconElement::Object(obj) => {
                    for child in obj.values_mut() {
                        self.reparent_substitutions(child, prefix);
                    }
                }
                HoconElement::Literal(_) => {}
            }
        }
    }
}
