/*!
 * End-to-end tests for the parsing pipeline
 */

use scriptparse::errors::{ParseError, ScriptError};
use scriptparse::persistence::to_pretty_json;
use scriptparse::pipeline::{parse_screenplay, parse_screenplay_with, parse_screenplay_with_defaults};
use scriptparse::screenplay::{FormatDetector, FormatTag, ParsedScript, ParserRegistry, ScriptParser};
use serde_json::json;
use crate::common::{self, SAMPLE_SCRIPT};

const TWO_SCENES: &str = "INT. OFFICE - DAY\n\nJOHN\nHello.\n\nEXT. STREET - NIGHT\n\nMARY\nGoodbye.\n";

/// Parser that always rejects its input
#[derive(Debug)]
struct RejectingParser;

impl ScriptParser for RejectingParser {
    fn format(&self) -> FormatTag {
        FormatTag::new("strict")
    }

    fn parse(&self, _content: &str, _title: &str) -> Result<ParsedScript, ParseError> {
        Err(ParseError::Malformed {
            format: self.format(),
            message: "no scenes found".to_string(),
        })
    }
}

#[test]
fn test_parseScreenplay_withTwoScenes_shouldMapScenesAndCharacters() {
    common::init_logger();
    let mapping = parse_screenplay_with_defaults(TWO_SCENES, "Test Script").unwrap();
    let screenplay = &mapping["screenplay"];

    assert_eq!(screenplay["title"], "Test Script");
    assert_eq!(screenplay["format_type"], "standard");

    let scenes = screenplay["scenes"].as_array().unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0]["scene_number"], 1);
    assert_eq!(scenes[0]["title"], "Scene 1");
    assert_eq!(scenes[0]["heading"], "INT. OFFICE - DAY");
    assert_eq!(scenes[0]["type"], "INT");
    assert_eq!(scenes[0]["location"], "OFFICE");
    assert_eq!(scenes[0]["time_of_day"], "DAY");
    assert_eq!(scenes[0]["characters"], json!(["JOHN"]));
    assert_eq!(
        scenes[0]["elements"],
        json!([{ "type": "dialogue", "character": "JOHN", "lines": ["Hello."], "parentheticals": [] }])
    );

    assert_eq!(scenes[1]["type"], "EXT");
    assert_eq!(scenes[1]["location"], "STREET");
    assert_eq!(scenes[1]["time_of_day"], "NIGHT");
    assert_eq!(scenes[1]["characters"], json!(["MARY"]));

    let characters = screenplay["characters"].as_array().unwrap();
    assert_eq!(characters.len(), 2);
    assert_eq!(characters[0]["name"], "JOHN");
    assert_eq!(characters[0]["scene_appearances"], json!([1]));
    assert_eq!(characters[1]["name"], "MARY");
    assert_eq!(screenplay["dialogue_interactions"], json!({}));
}

#[test]
fn test_parseScreenplay_withSampleScript_shouldFillStatistics() {
    let mapping = parse_screenplay_with_defaults(SAMPLE_SCRIPT, "Big Fish").unwrap();
    let statistics = &mapping["statistics"];

    assert_eq!(statistics["total_scenes"], 2);
    assert_eq!(statistics["total_characters"], 2);
    assert_eq!(statistics["total_pages"], 0.33);
    assert_eq!(statistics["total_dialogue_lines"], 5);
    assert_eq!(statistics["character_scene_count"], json!({ "ANNA": 2, "BEN": 1 }));
    assert_eq!(
        mapping["screenplay"]["dialogue_interactions"],
        json!({ "ANNA": { "BEN": 1 }, "BEN": { "ANNA": 1 } })
    );
}

#[test]
fn test_parseScreenplay_withEmptyInput_shouldReturnEmptyResult() {
    let mapping = parse_screenplay_with_defaults("", "Untitled").unwrap();
    assert_eq!(mapping["screenplay"]["title"], "Untitled");
    assert_eq!(mapping["screenplay"]["scenes"], json!([]));
    assert_eq!(mapping["screenplay"]["characters"], json!([]));
    assert_eq!(mapping["statistics"]["total_scenes"], 0);
}

#[test]
fn test_parseScreenplay_calledTwice_shouldProduceIdenticalJson() {
    let registry = ParserRegistry::with_defaults();
    let first = parse_screenplay(&registry, SAMPLE_SCRIPT, "Big Fish").unwrap();
    let second = parse_screenplay(&registry, SAMPLE_SCRIPT, "Big Fish").unwrap();
    assert_eq!(to_pretty_json(&first).unwrap(), to_pretty_json(&second).unwrap());
}

#[test]
fn test_parseScreenplay_withUnregisteredTag_shouldReturnUnsupportedFormat() {
    let detector = FormatDetector::empty().with_rule("always-fdx", |_| Some(FormatTag::new("fdx")));
    let registry = ParserRegistry::with_defaults();

    let error = parse_screenplay_with(&detector, &registry, TWO_SCENES, "t").unwrap_err();
    match error {
        ScriptError::UnsupportedFormat(e) => assert_eq!(e.tag, FormatTag::new("fdx")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parseScreenplay_withEmptyRegistry_shouldNotFallBack() {
    let error = parse_screenplay(&ParserRegistry::empty(), TWO_SCENES, "t").unwrap_err();
    assert!(matches!(error, ScriptError::UnsupportedFormat(_)));
}

#[test]
fn test_parseScreenplay_withFailingParser_shouldPropagateParseError() {
    let detector = FormatDetector::empty().with_rule("strict", |_| Some(FormatTag::new("strict")));
    let mut registry = ParserRegistry::empty();
    registry.register_parser("strict", || Box::new(RejectingParser) as Box<dyn ScriptParser>);

    let error = parse_screenplay_with(&detector, &registry, TWO_SCENES, "t").unwrap_err();
    assert_eq!(
        error,
        ScriptError::Parse(ParseError::Malformed {
            format: FormatTag::new("strict"),
            message: "no scenes found".to_string(),
        })
    );
}

#[test]
fn test_parseScreenplay_withBinaryInput_shouldReturnParseError() {
    let error = parse_screenplay_with_defaults("INT. LAB - DAY\n\0\u{1}", "t").unwrap_err();
    assert!(matches!(error, ScriptError::Parse(_)));
}
