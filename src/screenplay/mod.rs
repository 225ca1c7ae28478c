/*!
 * Screenplay parsing core.
 *
 * - `detector`: classifies raw text into a dialect tag
 * - `registry`: maps dialect tags to parser constructors
 * - `standard`: parser for the standard screenplay dialect
 * - `model`: structured result of a parse and its mapping conversion
 */

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

pub use self::detector::{FormatDetector, detect};
pub use self::model::{
    Character, DialogueInteractions, ParsedScript, Scene, SceneElement, SceneType, TimeOfDay,
};
pub use self::registry::{ParserConstructor, ParserRegistry, SharedRegistry};
pub use self::standard::StandardParser;

pub mod detector;
pub mod model;
pub mod registry;
pub mod standard;

/// Identifier of a screenplay dialect, used as the registry key.
///
/// Tags are trimmed and lowercased on construction so `"Standard"` and
/// `"standard"` resolve to the same parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatTag(String);

impl FormatTag {
    /// Tag of the standard dialect
    pub const STANDARD: &'static str = "standard";

    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_lowercase())
    }

    pub fn standard() -> Self {
        Self(Self::STANDARD.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FormatTag {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormatTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for FormatTag {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

/// Common trait for all dialect parsers
///
/// Implementations must be deterministic: the same `content` and `title`
/// always produce the same `ParsedScript`.
pub trait ScriptParser: Send + Sync + Debug {
    /// Dialect handled by this parser
    fn format(&self) -> FormatTag;

    /// Parse raw screenplay text
    ///
    /// # Arguments
    /// * `content` - Full screenplay text, may be empty
    /// * `title` - Label copied into the result, never parsed
    ///
    /// # Returns
    /// * `Result<ParsedScript, ParseError>` - The structured screenplay or a diagnostic
    fn parse(&self, content: &str, title: &str) -> Result<ParsedScript, ParseError>;
}
