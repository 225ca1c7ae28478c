/*!
 * Screenplay dialect detection.
 *
 * Detection is a list of rules evaluated in order; the first rule that
 * recognizes the text decides the tag. Text that no rule recognizes falls
 * back to the standard dialect, so detection never fails.
 */

use std::fmt;

use log::debug;

use super::FormatTag;
use super::standard::is_scene_heading;

/// A detection rule returns a tag when it recognizes the text
pub type DetectionRule = Box<dyn Fn(&str) -> Option<FormatTag> + Send + Sync>;

/// How many leading non-blank lines rules are expected to look at
const SAMPLE_LINES: usize = 200;

/// Ordered set of dialect detection rules
pub struct FormatDetector {
    rules: Vec<(String, DetectionRule)>,
}

impl FormatDetector {
    /// Detector with no rules; everything is classified as standard
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule after the existing ones
    pub fn with_rule<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&str) -> Option<FormatTag> + Send + Sync + 'static,
    {
        self.rules.push((name.into(), Box::new(rule)));
        self
    }

    /// Classify `content`, falling back to the standard dialect
    pub fn detect(&self, content: &str) -> FormatTag {
        for (name, rule) in &self.rules {
            if let Some(tag) = rule(content) {
                debug!("Format rule '{}' matched: {}", name, tag);
                return tag;
            }
        }
        debug!("No format rule matched, using fallback '{}'", FormatTag::STANDARD);
        FormatTag::standard()
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::empty().with_rule("standard-headings", standard_headings_rule)
    }
}

impl fmt::Debug for FormatDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("FormatDetector").field("rules", &names).finish()
    }
}

/// Recognize standard INT./EXT. scene headings near the top of the script
fn standard_headings_rule(content: &str) -> Option<FormatTag> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(SAMPLE_LINES)
        .any(is_scene_heading)
        .then(FormatTag::standard)
}

/// Classify `content` with the default rule set
pub fn detect(content: &str) -> FormatTag {
    FormatDetector::default().detect(content)
}
