//! Typed accessor facade
//!
//! [`ConfigFactory`] turns text, files or JSON into a resolved [`Config`].
//! A `Config` is read-only: it answers dotted-path queries with typed
//! getters, a plain-data view ([`NativeValue`]) or serde deserialization.

use crate::deserializer::HoconDeserializer;
use crate::error::{CoercionError, HoconError, SerdeError};
use crate::include::{FileIncludeHandler, IncludeHandler};
use crate::native::{NativeMap, NativeValue};
use crate::parser::{Parser, ParserConfig};
use crate::resolve::resolve_substitutions;
use crate::select::SelectConfig;
use crate::value::{ConfigRoot, HoconElement, HoconObject, HoconSubstitution, HoconValue};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A parsed, resolved configuration
///
/// Lookups that miss are retried against the fallback chain, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    root: ConfigRoot,
    native: bool,
    fallback: Option<Box<Config>>,
}

impl Config {
    /// Wraps an already resolved root
    pub fn new(root: ConfigRoot, native: bool) -> Self {
        Self {
            root,
            native,
            fallback: None,
        }
    }

    /// True when the document was parsed with native value conversion
    pub fn is_native(&self) -> bool {
        self.native
    }

    /// The root node of the document
    pub fn root(&self) -> &HoconValue {
        &self.root.value
    }

    /// Every substitution the document declared, with its resolved target
    pub fn substitutions(&self) -> &[HoconSubstitution] {
        &self.root.substitutions
    }

    pub fn fallback(&self) -> Option<&Config> {
        self.fallback.as_deref()
    }

    /// Returns the node at a dotted `path`
    pub fn get_node(&self, path: &str) -> Option<&HoconValue> {
        let found = path
            .split('.')
            .try_fold(&self.root.value, |node, key| node.get_child_object(key));
        match found {
            Some(node) => Some(node),
            None => self.fallback.as_ref()?.get_node(path),
        }
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.get_node(path).is_some()
    }

    fn get_with<T>(
        &self,
        path: &str,
        getter: impl FnOnce(&HoconValue) -> Result<T, CoercionError>,
    ) -> Result<Option<T>, HoconError> {
        match self.get_node(path) {
            Some(node) => Ok(Some(getter(node)?)),
            None => Ok(None),
        }
    }

    pub fn get_string(&self, path: &str) -> Result<Option<String>, HoconError> {
        self.get_with(path, HoconValue::get_string)
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> Result<String, HoconError> {
        Ok(self.get_string(path)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn get_bool(&self, path: &str) -> Result<Option<bool>, HoconError> {
        self.get_with(path, HoconValue::get_bool)
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> Result<bool, HoconError> {
        Ok(self.get_bool(path)?.unwrap_or(default))
    }

    pub fn get_int(&self, path: &str) -> Result<Option<i64>, HoconError> {
        self.get_with(path, HoconValue::get_int)
    }

    pub fn get_int_or(&self, path: &str, default: i64) -> Result<i64, HoconError> {
        Ok(self.get_int(path)?.unwrap_or(default))
    }

    pub fn get_float(&self, path: &str) -> Result<Option<f64>, HoconError> {
        self.get_with(path, HoconValue::get_float)
    }

    pub fn get_float_or(&self, path: &str, default: f64) -> Result<f64, HoconError> {
        Ok(self.get_float(path)?.unwrap_or(default))
    }

    pub fn get_string_list(&self, path: &str) -> Result<Option<Vec<String>>, HoconError> {
        self.get_with(path, HoconValue::get_string_list)
    }

    pub fn get_bool_list(&self, path: &str) -> Result<Option<Vec<bool>>, HoconError> {
        self.get_with(path, HoconValue::get_bool_list)
    }

    pub fn get_int_list(&self, path: &str) -> Result<Option<Vec<i64>>, HoconError> {
        self.get_with(path, HoconValue::get_int_list)
    }

    pub fn get_float_list(&self, path: &str) -> Result<Option<Vec<f64>>, HoconError> {
        self.get_with(path, HoconValue::get_float_list)
    }

    /// Returns the plain-data form of the node at `path`
    ///
    /// In native mode scalars come back typed; otherwise they are strings.
    pub fn get(&self, path: &str) -> Option<NativeValue> {
        self.get_node(path).map(HoconValue::to_native)
    }

    pub fn get_or(&self, path: &str, default: NativeValue) -> NativeValue {
        self.get(path).unwrap_or(default)
    }

    /// The whole document as an ordered map
    ///
    /// Fallback configurations are not included.
    pub fn to_dict(&self) -> NativeMap {
        match self.root.value.to_native() {
            NativeValue::Map(map) => map,
            _ => NativeMap::new(),
        }
    }

    /// Copies the document into an independent, mutable [`SelectConfig`]
    pub fn to_select_config(&self) -> SelectConfig {
        SelectConfig::from_map(self.to_dict())
    }

    /// Appends `fallback` to the end of the fallback chain
    pub fn with_fallback(mut self, fallback: Config) -> Self {
        self.append_fallback(fallback);
        self
    }

    fn append_fallback(&mut self, fallback: Config) {
        match &mut self.fallback {
            Some(next) => next.append_fallback(fallback),
            None => self.fallback = Some(Box::new(fallback)),
        }
    }

    /// Deserializes the whole document
    pub fn deserialize<T>(&self) -> Result<T, HoconError>
    where
        T: DeserializeOwned,
    {
        T::deserialize(HoconDeserializer::from_node(&self.root.value))
    }

    /// Deserializes the node at `path`
    pub fn deserialize_path<T>(&self, path: &str) -> Result<T, HoconError>
    where
        T: DeserializeOwned,
    {
        let node = self.get_node(path).ok_or_else(|| {
            HoconError::Serde(SerdeError::Custom(format!("No value at path '{}'", path)))
        })?;
        T::deserialize(HoconDeserializer::from_node(node))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.value)
    }
}

impl HoconValue {
    /// Wraps this node under `key` as a standalone configuration
    pub fn at_key(&self, key: &str) -> Config {
        let mut obj = HoconObject::new();
        obj.insert(key, self.clone());
        let root = HoconValue::from_element(HoconElement::Object(obj));
        Config::new(ConfigRoot::new(root, Vec::new()), false)
    }
}

/// Entry points for building a [`Config`]
pub struct ConfigFactory;

impl ConfigFactory {
    /// An empty configuration
    pub fn empty() -> Config {
        let root = HoconValue::from_element(HoconElement::Object(HoconObject::new()));
        Config::new(ConfigRoot::new(root, Vec::new()), false)
    }

    /// Parses text without include support or native conversion
    pub fn parse(text: &str) -> Result<Config, HoconError> {
        Self::parse_with(text, None, false)
    }

    /// Parses text with an optional include handler
    pub fn parse_with(
        text: &str,
        include_handler: Option<&dyn IncludeHandler>,
        native: bool,
    ) -> Result<Config, HoconError> {
        let config = ParserConfig::new().with_native_values(native);
        Self::parse_with_config(text, include_handler, config)
    }

    /// Parses text with full control over parser settings
    pub fn parse_with_config(
        text: &str,
        include_handler: Option<&dyn IncludeHandler>,
        config: ParserConfig,
    ) -> Result<Config, HoconError> {
        let native = config.native_values;
        let max_depth = config.max_depth;
        let mut parser = Parser::with_config(text, config);
        if let Some(handler) = include_handler {
            parser = parser.with_include_handler(handler);
        }
        let mut root = parser.parse()?;
        resolve_substitutions(&mut root, max_depth)?;
        Ok(Config::new(root, native))
    }

    /// Parses a UTF-8 file; includes are resolved relative to its directory
    pub fn parse_file(path: impl AsRef<Path>, native: bool) -> Result<Config, HoconError> {
        let file = fs::canonicalize(path.as_ref())?;
        debug!(file = %file.display(), native, "parsing configuration file");

        let base_dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let config = ParserConfig::new().with_native_values(native);
        let max_depth = config.max_depth;
        let handler = FileIncludeHandler::new(base_dir).with_config(config);
        let mut root = handler.load(&file)?;
        resolve_substitutions(&mut root, max_depth)?;
        Ok(Config::new(root, native))
    }

    /// Builds a configuration from JSON data
    pub fn from_json(value: &serde_json::Value, native: bool) -> Result<Config, HoconError> {
        let text = serde_json::to_string(value)?;
        Self::parse_with(&text, None, native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        server {
            host = localhost
            port = 8080
            ratio = 0.75
            debug = off
            tags = [web, api]
        }
        name = "demo app"
    "#;

    #[test]
    fn test_get_node_walks_paths() {
        let config = ConfigFactory::parse(SAMPLE).unwrap();
        assert!(config.has_path("server.port"));
        assert!(!config.has_path("server.missing"));
        assert!(!config.has_path("server.port.deeper"));
        assert_eq!(config.get_node("server.host").unwrap().get_string().unwrap(), "localhost");
    }

    #[test]
    fn test_typed_getters() {
        let config = ConfigFactory::parse(SAMPLE).unwrap();
        assert_eq!(config.get_int("server.port").unwrap(), Some(8080));
        assert_eq!(config.get_float("server.ratio").unwrap(), Some(0.75));
        assert_eq!(config.get_bool("server.debug").unwrap(), Some(false));
        assert_eq!(config.get_string("name").unwrap(), Some("demo app".to_string()));
        assert_eq!(
            config.get_string_list("server.tags").unwrap(),
            Some(vec!["web".to_string(), "api".to_string()])
        );
    }

    #[test]
    fn test_defaults_for_missing_paths() {
        let config = ConfigFactory::parse(SAMPLE).unwrap();
        assert_eq!(config.get_int("nope").unwrap(), None);
        assert_eq!(config.get_int_or("nope", 3).unwrap(), 3);
        assert!(config.get_bool_or("nope", true).unwrap());
        assert_eq!(config.get_string_or("nope", "x").unwrap(), "x");
        assert_eq!(config.get_float_or("nope", 1.5).unwrap(), 1.5);
        assert_eq!(config.get_or("nope", NativeValue::Integer(1)), NativeValue::Integer(1));
    }

    #[test]
    fn test_coercion_failures_are_errors() {
        let config = ConfigFactory::parse(SAMPLE).unwrap();
        match config.get_int("server.host") {
            Err(HoconError::Coercion(CoercionError::InvalidNumber { target, value })) => {
                assert_eq!(target, "int");
                assert_eq!(value, "localhost");
            }
            other => panic!("Expected InvalidNumber, got {:?}", other),
        }
        assert!(config.get_bool("server.port").is_err());
        assert!(config.get_string("server").is_err());
    }

    #[test]
    fn test_native_get() {
        let config = ConfigFactory::parse_with(SAMPLE, None, true).unwrap();
        assert!(config.is_native());
        let server = config.get("server").unwrap();
        let server = server.as_map().unwrap();
        assert_eq!(server["port"], NativeValue::Integer(8080));
        assert_eq!(server["ratio"], NativeValue::Float(0.75));
        assert_eq!(server["debug"], NativeValue::Boolean(false));
        assert_eq!(config.get("name"), Some(NativeValue::from("demo app")));
    }

    #[test]
    fn test_non_native_get_returns_strings() {
        let config = ConfigFactory::parse(SAMPLE).unwrap();
        assert_eq!(config.get("server.port"), Some(NativeValue::from("8080")));
    }

    #[test]
    fn test_fallback_chain() {
        let primary = ConfigFactory::parse("a = 1").unwrap();
        let secondary = ConfigFactory::parse("b = 2").unwrap();
        let tertiary = ConfigFactory::parse("c = 3\na = 9").unwrap();

        let config = primary.with_fallback(secondary).with_fallback(tertiary);
        assert_eq!(config.get_int("a").unwrap(), Some(1));
        assert_eq!(config.get_int("b").unwrap(), Some(2));
        assert_eq!(config.get_int("c").unwrap(), Some(3));
        assert!(config.fallback().unwrap().fallback().is_some());
    }

    #[test]
    fn test_at_key() {
        let config = ConfigFactory::parse("port = 80").unwrap();
        let wrapped = config.get_node("port").unwrap().at_key("http");
        assert_eq!(wrapped.get_int("http").unwrap(), Some(80));
    }

    #[test]
    fn test_empty_config() {
        let config = ConfigFactory::empty();
        assert!(config.to_dict().is_empty());
        assert!(!config.has_path("anything"));
        assert_eq!(config.to_string(), "{}");
    }

    #[test]
    fn test_display_renders_json() {
        let config = ConfigFactory::parse_with("a { b = 1 }", None, true).unwrap();
        assert_eq!(config.to_string(), r#"{"a":{"b":1}}"#);
    }

    #[test]
    fn test_config_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Config>();
    }
}
