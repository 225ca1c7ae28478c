/*!
 * Parser registry.
 *
 * Maps dialect tags to parser constructors. The registry is a plain value
 * passed to the pipeline; `SharedRegistry` adds a read-write lock for callers
 * that register parsers while other threads are parsing.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use super::standard::StandardParser;
use super::{FormatTag, ScriptParser};
use crate::errors::UnsupportedFormatError;

/// Zero-argument factory producing a fresh parser
pub type ParserConstructor = Arc<dyn Fn() -> Box<dyn ScriptParser> + Send + Sync>;

/// Mapping from dialect tag to parser constructor
#[derive(Clone, Default)]
pub struct ParserRegistry {
    constructors: HashMap<FormatTag, ParserConstructor>,
}

impl ParserRegistry {
    /// Registry without any parser
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in dialects
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register_parser(FormatTag::standard(), || {
            Box::new(StandardParser::default()) as Box<dyn ScriptParser>
        });
        registry
    }

    /// Install or replace the constructor for `tag`; the last registration wins
    pub fn register_parser<F>(&mut self, tag: impl Into<FormatTag>, constructor: F)
    where
        F: Fn() -> Box<dyn ScriptParser> + Send + Sync + 'static,
    {
        let tag = tag.into();
        if self.constructors.contains_key(&tag) {
            debug!("Replacing parser registered for '{}'", tag);
        } else {
            debug!("Registering parser for '{}'", tag);
        }
        self.constructors.insert(tag, Arc::new(constructor));
    }

    /// Build a fresh parser for `tag`
    pub fn get_parser(&self, tag: &FormatTag) -> Result<Box<dyn ScriptParser>, UnsupportedFormatError> {
        self.constructors
            .get(tag)
            .map(|constructor| constructor())
            .ok_or_else(|| UnsupportedFormatError { tag: tag.clone() })
    }

    pub fn supports(&self, tag: &FormatTag) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn formats(&self) -> Vec<FormatTag> {
        let mut tags: Vec<FormatTag> = self.constructors.keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

/// Registry that can be shared across threads and mutated safely
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<ParserRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: ParserRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ParserRegistry::with_defaults())
    }

    pub fn register_parser<F>(&self, tag: impl Into<FormatTag>, constructor: F)
    where
        F: Fn() -> Box<dyn ScriptParser> + Send + Sync + 'static,
    {
        self.inner.write().register_parser(tag, constructor);
    }

    pub fn get_parser(&self, tag: &FormatTag) -> Result<Box<dyn ScriptParser>, UnsupportedFormatError> {
        self.inner.read().get_parser(tag)
    }

    /// Run `f` with shared read access to the registry
    pub fn with_registry<R>(&self, f: impl FnOnce(&ParserRegistry) -> R) -> R {
        f(&self.inner.read())
    }

    /// Copy of the current registry contents
    pub fn snapshot(&self) -> ParserRegistry {
        self.inner.read().clone()
    }
}
