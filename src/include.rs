//! Include handling
//!
//! `include "name"` hands `name` to an [`IncludeHandler`], which returns the
//! parsed (unresolved) document. The parser then merges it into the current
//! object, filling only the keys that are not already set.

use crate::error::{HoconError, ParseError};
use crate::parser::{Parser, ParserConfig};
use crate::value::ConfigRoot;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Trait for resolving `include` directives
pub trait IncludeHandler {
    /// Loads and parses the document named by `path`
    fn resolve_include(&self, path: &str) -> Result<ConfigRoot, HoconError>;
}

impl<F> IncludeHandler for F
where
    F: Fn(&str) -> Result<ConfigRoot, HoconError>,
{
    fn resolve_include(&self, path: &str) -> Result<ConfigRoot, HoconError> {
        self(path)
    }
}

fn cycle_error(chain: &[String], next: &str) -> HoconError {
    let mut names: Vec<&str> = chain.iter().map(String::as_str).collect();
    names.push(next);
    ParseError::IncludeCycle {
        chain: names.join(" -> "),
    }
    .into()
}

/// In-memory include handler
///
/// Documents are looked up by their exact include name. Nested includes are
/// served from the same map.
#[derive(Debug, Clone, Default)]
pub struct MapIncludeHandler {
    documents: Arc<HashMap<String, String>>,
    config: ParserConfig,
    chain: Vec<String>,
}

impl MapIncludeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(documents: HashMap<String, String>) -> Self {
        Self {
            documents: Arc::new(documents),
            ..Self::default()
        }
    }

    /// Adds a document; returns the handler for chaining
    pub fn with_document(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.documents).insert(name.into(), text.into());
        self
    }

    /// Parser settings used for included documents
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn documents(&self) -> &HashMap<String, String> {
        &self.documents
    }
}

impl IncludeHandler for MapIncludeHandler {
    fn resolve_include(&self, path: &str) -> Result<ConfigRoot, HoconError> {
        if self.chain.iter().any(|name| name == path) {
            return Err(cycle_error(&self.chain, path));
        }

        let text = self.documents.get(path).ok_or_else(|| {
            HoconError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no document named '{}'", path),
            ))
        })?;

        trace!(include = path, "parsing in-memory include");
        let mut nested = self.clone();
        nested.chain.push(path.to_string());
        Parser::with_config(text, self.config.clone())
            .with_include_handler(&nested)
            .parse()
    }
}

/// Filesystem include handler
///
/// Include names are paths relative to the directory of the including
/// file. Including a file that is already being parsed is an error.
#[derive(Debug, Clone)]
pub struct FileIncludeHandler {
    base_dir: PathBuf,
    config: ParserConfig,
    chain: Vec<PathBuf>,
}

impl FileIncludeHandler {
    /// Creates a handler resolving names relative to `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            config: ParserConfig::default(),
            chain: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the handler to use while parsing `file`
    ///
    /// `file` must already be canonical; it becomes the base for nested
    /// includes and is recorded for cycle detection.
    pub(crate) fn descend(&self, file: &Path) -> Result<Self, HoconError> {
        if self.chain.iter().any(|entry| entry == file) {
            let chain: Vec<String> = self
                .chain
                .iter()
                .map(|entry| entry.display().to_string())
                .collect();
            return Err(cycle_error(&chain, &file.display().to_string()));
        }

        let mut chain = self.chain.clone();
        chain.push(file.to_path_buf());
        Ok(Self {
            base_dir: file.parent().map(Path::to_path_buf).unwrap_or_default(),
            config: self.config.clone(),
            chain,
        })
    }

    /// Reads and parses a file without resolving substitutions
    pub(crate) fn load(&self, file: &Path) -> Result<ConfigRoot, HoconError> {
        let file = fs::canonicalize(file)?;
        let nested = self.descend(&file)?;

        trace!(file = %file.display(), "reading configuration file");
        let text = fs::read_to_string(&file)?;
        Parser::with_config(&text, self.config.clone())
            .with_include_handler(&nested)
            .parse()
    }
}

impl IncludeHandler for FileIncludeHandler {
    fn resolve_include(&self, path: &str) -> Result<ConfigRoot, HoconError> {
        self.load(&self.base_dir.join(path))
    }
}
