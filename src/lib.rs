//! # HOCON Parser
//!
//! A HOCON-style configuration parser with substitutions, includes and
//! serde integration.
//!
//! ## Overview
//!
//! Text is tokenized, parsed into an owned document tree, and every
//! `${path}` substitution is resolved against the finished document. The
//! result is a read-only [`Config`] answering dotted-path queries.
//!
//! ## Key Features
//!
//! - **Relaxed syntax**: unquoted keys and values, optional commas, `=`, `:`
//!   or nothing between a key and an object
//! - **Dotted keys**: `a.b.c = 1` builds nested objects and merges into
//!   existing ones
//! - **Substitutions**: `${path}` references to any other value, including
//!   forward references and string concatenation
//! - **Includes**: `include "name"` through a pluggable [`IncludeHandler`]
//! - **Native mode**: scalars typed as integers, floats and booleans at parse
//!   time instead of kept as text
//! - **Serde Integration**: `#[derive(Deserialize)]` straight from a document
//!
//! ## Basic Usage
//!
//! ```rust
//! use hocon_parser::ConfigFactory;
//!
//! let text = r#"
//!     server {
//!         host = localhost
//!         port = 8080
//!     }
//!     url = "http://"${server.host}":"${server.port}
//! "#;
//!
//! let config = ConfigFactory::parse(text)?;
//! assert_eq!(config.get_int("server.port")?, Some(8080));
//! assert_eq!(config.get_string("url")?.as_deref(), Some("http://localhost:8080"));
//! # Ok::<(), hocon_parser::HoconError>(())
//! ```
//!
//! ## Native Values
//!
//! ```rust
//! use hocon_parser::{ConfigFactory, NativeValue};
//!
//! let config = ConfigFactory::parse_with("debug = on\nratio = 0.5", None, true)?;
//! assert_eq!(config.get("debug"), Some(NativeValue::Boolean(true)));
//! assert_eq!(config.get("ratio"), Some(NativeValue::Float(0.5)));
//! # Ok::<(), hocon_parser::HoconError>(())
//! ```
//!
//! ## Serde
//!
//! ```rust
//! use serde::Deserialize;
//! use hocon_parser::from_str;
//!
//! #[derive(Debug, Deserialize)]
//! struct ServerConfig {
//!     name: String,
//!     port: u16,
//!     debug: bool,
//! }
//!
//! let config: ServerConfig = from_str("name = my-server\nport = 8080\ndebug = off")?;
//! assert_eq!(config.port, 8080);
//! # Ok::<(), hocon_parser::HoconError>(())
//! ```
//!
//! ## Includes
//!
//! ```rust
//! use hocon_parser::{ConfigFactory, MapIncludeHandler};
//!
//! let handler = MapIncludeHandler::new().with_document("defaults", "timeout = 30");
//! let config = ConfigFactory::parse_with("http { include \"defaults\" }", Some(&handler), false)?;
//! assert_eq!(config.get_int("http.timeout")?, Some(30));
//! # Ok::<(), hocon_parser::HoconError>(())
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`HoconError`] carrying the phase that raised it:
//!
//! ```rust
//! use hocon_parser::{ConfigFactory, HoconError, ResolveError};
//!
//! match ConfigFactory::parse("a = ${b}\nb = ${a}") {
//!     Err(HoconError::Resolve(ResolveError::Cyclic { chain, .. })) => {
//!         println!("cycle: {}", chain);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

pub mod config;
pub mod deserializer;
pub mod error;
pub mod include;
pub mod native;
pub mod parser;
pub mod resolve;
pub mod select;
pub mod tokenizer;
pub mod value;

#[cfg(test)]
mod error_tests;

// Re-export main types and functions
pub use config::{Config, ConfigFactory};
pub use deserializer::{HoconDeserializer, from_str, from_value};
pub use error::{
    CoercionError, HoconError, ParseError, Position, ResolveError, SerdeError, TokenizeError,
};
pub use include::{FileIncludeHandler, IncludeHandler, MapIncludeHandler};
pub use native::{NativeMap, NativeValue};
pub use parser::{Parser, ParserConfig};
pub use resolve::resolve_substitutions;
pub use select::SelectConfig;
pub use tokenizer::{Token, TokenKind, Tokenizer};
pub use value::{
    ConfigRoot, HoconElement, HoconLiteral, HoconObject, HoconSubstitution, HoconValue, Scalar,
};
