/*!
 * Tests for the parser registry
 */

use scriptparse::errors::ParseError;
use scriptparse::screenplay::{
    FormatTag, ParsedScript, ParserRegistry, ScriptParser, SharedRegistry,
};

/// Parser that labels its output so tests can tell constructors apart
#[derive(Debug)]
struct LabelParser {
    label: &'static str,
}

impl ScriptParser for LabelParser {
    fn format(&self) -> FormatTag {
        FormatTag::new("label")
    }

    fn parse(&self, _content: &str, title: &str) -> Result<ParsedScript, ParseError> {
        Ok(ParsedScript::new(format!("{}:{}", self.label, title), self.format()))
    }
}

fn label_parser(label: &'static str) -> impl Fn() -> Box<dyn ScriptParser> + Send + Sync + 'static {
    move || Box::new(LabelParser { label }) as Box<dyn ScriptParser>
}

#[test]
fn test_withDefaults_shouldProvideStandardParser() {
    let registry = ParserRegistry::with_defaults();
    let parser = registry.get_parser(&FormatTag::standard()).unwrap();
    assert_eq!(parser.format(), FormatTag::standard());
    assert_eq!(registry.formats(), vec![FormatTag::standard()]);
}

#[test]
fn test_getParser_withUnknownTag_shouldFailWithTag() {
    let registry = ParserRegistry::with_defaults();
    let error = registry.get_parser(&FormatTag::new("nonexistent-tag")).unwrap_err();
    assert_eq!(error.tag, FormatTag::new("nonexistent-tag"));
    assert!(error.to_string().contains("nonexistent-tag"));
}

#[test]
fn test_getParser_onEmptyRegistry_shouldNotFallBack() {
    let registry = ParserRegistry::empty();
    assert!(registry.get_parser(&FormatTag::standard()).is_err());
    assert!(!registry.supports(&FormatTag::standard()));
}

#[test]
fn test_registerParser_twice_shouldUseLastConstructor() {
    let mut registry = ParserRegistry::empty();
    registry.register_parser("label", label_parser("first"));
    registry.register_parser("label", label_parser("second"));

    for _ in 0..3 {
        let parser = registry.get_parser(&FormatTag::new("label")).unwrap();
        let parsed = parser.parse("", "t").unwrap();
        assert_eq!(parsed.title, "second:t");
    }
    assert_eq!(registry.formats().len(), 1);
}

#[test]
fn test_registerParser_shouldNormalizeTagCase() {
    let mut registry = ParserRegistry::empty();
    registry.register_parser(" Label ", label_parser("x"));
    assert!(registry.supports(&FormatTag::new("LABEL")));
}

#[test]
fn test_formats_shouldBeSorted() {
    let mut registry = ParserRegistry::with_defaults();
    registry.register_parser("fountain", label_parser("f"));
    registry.register_parser("fdx", label_parser("x"));
    let names: Vec<String> = registry.formats().iter().map(|t| t.to_string()).collect();
    assert_eq!(names, vec!["fdx", "fountain", "standard"]);
}

#[test]
fn test_sharedRegistry_concurrentReads_shouldResolveParsers() {
    let shared = SharedRegistry::with_defaults();
    shared.register_parser("label", label_parser("shared"));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let shared = shared.clone();
            scope.spawn(move || {
                for _ in 0..25 {
                    let parser = shared.get_parser(&FormatTag::new("label")).unwrap();
                    assert_eq!(parser.parse("", "t").unwrap().title, "shared:t");
                }
            });
        }
    });

    assert_eq!(shared.snapshot().formats().len(), 2);
    assert!(shared.with_registry(|registry| registry.supports(&FormatTag::standard())));
}
