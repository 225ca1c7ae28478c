/*!
 * Parsing pipeline: detect the dialect, resolve its parser, parse, convert.
 *
 * Failures are logged here and returned unchanged; the pipeline adds no
 * error kinds of its own.
 */

use log::{debug, error};
use serde_json::Value;

use crate::errors::ScriptError;
use crate::screenplay::{FormatDetector, ParsedScript, ParserRegistry};

/// Parse `script` with the parsers in `registry` and return the plain mapping
pub fn parse_screenplay(
    registry: &ParserRegistry,
    script: &str,
    title: &str,
) -> Result<Value, ScriptError> {
    parse_screenplay_with(&FormatDetector::default(), registry, script, title)
}

/// Same as `parse_screenplay`, using the built-in registry
pub fn parse_screenplay_with_defaults(script: &str, title: &str) -> Result<Value, ScriptError> {
    parse_screenplay(&ParserRegistry::with_defaults(), script, title)
}

/// Parse with an explicit detector and registry
pub fn parse_screenplay_with(
    detector: &FormatDetector,
    registry: &ParserRegistry,
    script: &str,
    title: &str,
) -> Result<Value, ScriptError> {
    let parsed = parse_to_script(detector, registry, script, title)?;
    Ok(parsed.to_mapping())
}

/// Run the pipeline up to the structured result, without the mapping conversion
pub fn parse_to_script(
    detector: &FormatDetector,
    registry: &ParserRegistry,
    script: &str,
    title: &str,
) -> Result<ParsedScript, ScriptError> {
    let tag = detector.detect(script);
    debug!("Detected format '{}' for '{}'", tag, title);

    let parser = registry.get_parser(&tag).map_err(|e| {
        error!("No parser for '{}': {}", title, e);
        ScriptError::from(e)
    })?;

    parser.parse(script, title).map_err(|e| {
        error!("Failed to parse '{}': {}", title, e);
        ScriptError::from(e)
    })
}
