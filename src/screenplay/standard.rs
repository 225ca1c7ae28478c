/*!
 * Parser for the standard screenplay dialect.
 *
 * The text is scanned line by line:
 * - Scene headings (`INT.`, `EXT.`, `INT./EXT.`, `I/E`, `EST.`) start a new scene.
 *   The first heading-like line wins; there is no backtracking.
 * - Uppercase speaker labels open a dialogue block that runs until a blank line,
 *   a heading, a transition or the next speaker label.
 * - Everything else inside a scene is action, grouped into paragraphs by blank lines.
 * - Lines before the first heading (title page) are ignored.
 */

use std::collections::HashSet;

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{ParsedScript, Scene, SceneType, TimeOfDay};
use super::{FormatTag, ScriptParser};
use crate::app_config::ParserConfig;
use crate::errors::ParseError;

// @const: Scene heading prefix, with an optional leading scene number
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:\d+[A-Z]?\.?\s+)?(INT\.?\s*/\s*EXT|EXT\.?\s*/\s*INT|I\s*/\s*E|INT|EXT|EST)(?:\.|\s|$)",
    )
    .expect("Invalid heading regex")
});

// @const: Scene number repeated at the end of a heading
static TRAILING_SCENE_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\d+[A-Z]?\.?$").expect("Invalid scene number regex"));

// @const: Dash separating heading segments; needs whitespace on at least one side
static SEGMENT_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+[-–—]+\s*|\s*[-–—]+\s+").expect("Invalid segment separator regex")
});

// @const: Parenthetical group, e.g. (V.O.) or (NIGHT)
static PARENTHETICAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)?").expect("Invalid parenthetical regex"));

static TRANSITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z][A-Z .'’/-]*TO:|FADE IN[.:]?|FADE OUT[.:]?|FADE TO BLACK[.:]?|CUT TO BLACK[.:]?|THE END[.:]?)$")
        .expect("Invalid transition regex")
});

// @const: Page numbers and continuation markers left over from PDF pages
static PAGE_ARTIFACT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\d+\.?|\(?(?:MORE|CONTINUED|CONT'D|CONT’D)\)?:?)$")
        .expect("Invalid page artifact regex")
});

/// Words that never appear in a speaker label
const BLOCKED_WORDS: &[&str] = &[
    "INT", "EXT", "CUT", "FADE", "DISSOLVE", "VOICE", "ANGLE", "TITLE", "TITLES", "OVER", "BY",
    "END", "SCENE", "CONTINUED", "TRANSITION", "CREDITS", "CREDIT", "SCRIPT", "SUPER", "INSERT",
    "MONTAGE", "INTERCUT", "FLASHBACK", "POV", "SMASH",
];

/// Characters stripped from both ends of a speaker label
const LABEL_PUNCTUATION: &[char] = &[
    '?', '!', ':', '.', ',', '(', ')', '\'', '"', '‘', '’', '“', '”', '-',
];

/// Whether `line` starts a new scene in the standard dialect
pub fn is_scene_heading(line: &str) -> bool {
    HEADING_REGEX.is_match(line.trim())
}

/// Parser for the standard screenplay dialect
#[derive(Debug, Clone)]
pub struct StandardParser {
    config: ParserConfig,
    blocked_words: HashSet<String>,
}

impl Default for StandardParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl StandardParser {
    pub fn new(config: ParserConfig) -> Self {
        let blocked_words = BLOCKED_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.extra_blocked_words.iter().map(|w| w.trim().to_uppercase()))
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            config,
            blocked_words,
        }
    }

    /// Reject input that cannot be screenplay text
    fn check_integrity(&self, content: &str) -> Result<(), ParseError> {
        if content.starts_with("%PDF-") {
            return Err(self.malformed("input is a raw PDF document; extract its text first"));
        }
        if let Some(offset) = content.find('\0') {
            return Err(self.malformed(format!(
                "NUL character at byte {}; binary data is not screenplay text",
                offset
            )));
        }
        Ok(())
    }

    fn malformed(&self, message: impl Into<String>) -> ParseError {
        ParseError::Malformed {
            format: FormatTag::standard(),
            message: message.into(),
        }
    }

    /// Return the cleaned character name when `line` is a speaker label
    fn speaker_label(&self, line: &str) -> Option<String> {
        // Transitions and slug-style labels such as "SUPER:" end with a colon;
        // exclamations and questions are shouted dialogue, not names
        if line.ends_with(':') || line.ends_with('!') || line.ends_with('?') {
            return None;
        }

        let without_extensions = PARENTHETICAL_REGEX.replace_all(line, " ");
        let name = without_extensions
            .trim()
            .trim_matches(|c: char| LABEL_PUNCTUATION.contains(&c) || c.is_whitespace());
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if name.is_empty() || name.chars().count() > self.config.max_character_name_len {
            return None;
        }

        let word_count = name.split(' ').count();
        if word_count > self.config.max_character_name_words {
            return None;
        }

        let uppercase = name.chars().filter(|c| c.is_uppercase()).count();
        if uppercase < 2 || name.chars().any(char::is_lowercase) {
            return None;
        }

        let blocked = name
            .split(|c: char| c.is_whitespace() || c == '/')
            .map(|w| w.trim_matches(LABEL_PUNCTUATION))
            .any(|w| self.blocked_words.contains(w));
        if blocked {
            debug!("Rejected speaker label with blocked word: {}", line);
            return None;
        }

        Some(name)
    }

    fn page_metrics(&self, builder: &SceneBuilder) -> f64 {
        let dialogue_pages = builder.dialogue_lines as f64 / self.config.dialogue_lines_per_page;
        let action_pages = builder.action_lines as f64 / self.config.action_lines_per_page;
        round2(dialogue_pages + action_pages)
    }

    /// Close the open scene, compute its page range and append it to the script
    fn finish_scene(&self, mut builder: SceneBuilder, script: &mut ParsedScript, page_cursor: &mut f64) {
        builder.close_block(script);

        let page_count = self.page_metrics(&builder);
        let mut scene = builder.scene;
        scene.line_count = builder.line_count;
        scene.page_count = page_count;
        scene.start_page = round2(*page_cursor);
        scene.end_page = round2(*page_cursor + page_count);
        scene.estimated_duration_minutes =
            round2((page_count * self.config.minutes_per_page).max(self.config.min_scene_minutes));
        *page_cursor = scene.end_page;

        debug!(
            "Scene {} '{}': {} lines, {} characters, {} pages",
            scene.number,
            scene.location,
            scene.line_count,
            scene.characters.len(),
            scene.page_count
        );
        script.scenes.push(scene);
    }
}

impl ScriptParser for StandardParser {
    fn format(&self) -> FormatTag {
        FormatTag::standard()
    }

    fn parse(&self, content: &str, title: &str) -> Result<ParsedScript, ParseError> {
        self.check_integrity(content)?;

        let mut script = ParsedScript::new(title, self.format());
        let mut current: Option<SceneBuilder> = None;
        let mut page_cursor = 0.0;

        for raw_line in content.split('\n') {
            let line = raw_line.trim();

            if line.is_empty() {
                if let Some(builder) = current.as_mut() {
                    builder.close_block(&mut script);
                }
                continue;
            }

            // A bare number or "More" right under a label is that character's speech
            let awaiting_speech = current.as_ref().is_some_and(SceneBuilder::awaiting_first_line);
            if !awaiting_speech && PAGE_ARTIFACT_REGEX.is_match(line) {
                continue;
            }

            if let Some(heading) = parse_heading(line) {
                if let Some(builder) = current.take() {
                    self.finish_scene(builder, &mut script, &mut page_cursor);
                }
                let mut scene = Scene::new(script.scenes.len() + 1, line);
                scene.scene_type = heading.scene_type;
                scene.location = heading.location;
                scene.time_of_day = heading.time_of_day;
                current = Some(SceneBuilder::new(scene));
                continue;
            }

            let Some(builder) = current.as_mut() else {
                // Title page and other text before the first heading
                continue;
            };
            builder.line_count += 1;

            if TRANSITION_REGEX.is_match(line) {
                builder.close_block(&mut script);
                builder.scene.push_transition(line.to_string());
                builder.action_lines += 1;
                continue;
            }

            // The first line under a label is always speech, even when shouted in caps
            if builder.awaiting_first_line() {
                builder.push_line(line);
                continue;
            }

            if let Some(name) = self.speaker_label(line) {
                builder.close_block(&mut script);
                debug!("Recognized character '{}' from line: {}", name, line);
                builder.open_dialogue(name, line);
                continue;
            }

            builder.push_line(line);
        }

        if let Some(builder) = current.take() {
            self.finish_scene(builder, &mut script, &mut page_cursor);
        }
        script.total_pages = round2(page_cursor);

        info!(
            "Parsed '{}': {} scenes, {} characters",
            script.title,
            script.scenes.len(),
            script.characters.len()
        );
        Ok(script)
    }
}

/// Dialogue block waiting for its lines
struct PendingDialogue {
    character: String,
    label_line: String,
    lines: Vec<String>,
    parentheticals: Vec<String>,
}

/// Mutable state for the scene being scanned
struct SceneBuilder {
    scene: Scene,
    action: Vec<String>,
    dialogue: Option<PendingDialogue>,
    line_count: usize,
    dialogue_lines: usize,
    action_lines: usize,
}

impl SceneBuilder {
    fn new(scene: Scene) -> Self {
        Self {
            scene,
            action: Vec::new(),
            dialogue: None,
            // The heading itself
            line_count: 1,
            dialogue_lines: 0,
            action_lines: 1,
        }
    }

    fn open_dialogue(&mut self, character: String, label_line: &str) {
        self.dialogue = Some(PendingDialogue {
            character,
            label_line: label_line.to_string(),
            lines: Vec::new(),
            parentheticals: Vec::new(),
        });
    }

    fn awaiting_first_line(&self) -> bool {
        self.dialogue
            .as_ref()
            .is_some_and(|pending| pending.lines.is_empty())
    }

    fn push_line(&mut self, line: &str) {
        match self.dialogue.as_mut() {
            Some(pending) if line.starts_with('(') && line.ends_with(')') => {
                pending.parentheticals.push(line.to_string());
            }
            Some(pending) => pending.lines.push(line.to_string()),
            None => {
                self.action.push(line.to_string());
                self.action_lines += 1;
            }
        }
    }

    /// Commit the open dialogue block or action paragraph
    fn close_block(&mut self, script: &mut ParsedScript) {
        if let Some(pending) = self.dialogue.take() {
            if pending.lines.is_empty() && pending.parentheticals.is_empty() {
                // A label nobody speaks after is an uppercase action line
                debug!("Speaker label without dialogue treated as action: {}", pending.label_line);
                self.action.push(pending.label_line);
                self.action_lines += 1;
            } else {
                self.dialogue_lines += 1 + pending.lines.len() + pending.parentheticals.len();
                script.credit_dialogue(&pending.character, self.scene.number, pending.lines.len());
                let listeners = self.scene.push_dialogue(
                    pending.character.clone(),
                    pending.lines,
                    pending.parentheticals,
                );
                script.record_interactions(&pending.character, &listeners);
            }
        }

        if !self.action.is_empty() {
            let text = std::mem::take(&mut self.action).join("\n");
            self.scene.push_action(text);
        }
    }
}

/// Metadata carried by a scene heading
#[derive(Debug, Clone, PartialEq)]
struct Heading {
    scene_type: SceneType,
    location: String,
    time_of_day: TimeOfDay,
}

fn parse_heading(line: &str) -> Option<Heading> {
    let captures = HEADING_REGEX.captures(line)?;
    let prefix = captures.get(1)?.as_str();
    let rest = &line[captures.get(0)?.end()..];

    let scene_type = match normalize_prefix(prefix).as_str() {
        "INT/EXT" | "EXT/INT" | "I/E" => SceneType::InteriorExterior,
        "INT" => SceneType::Interior,
        "EXT" | "EST" => SceneType::Exterior,
        _ => SceneType::Unknown,
    };

    let rest = rest.trim().trim_start_matches(['.', ' ']);
    let rest = TRAILING_SCENE_NUMBER_REGEX.replace(rest, "");
    let (location, time_of_day) = split_location_and_time(rest.trim());

    Some(Heading {
        scene_type,
        location,
        time_of_day,
    })
}

fn normalize_prefix(prefix: &str) -> String {
    prefix
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_uppercase()
}

/// Split `HOUSE - KITCHEN - NIGHT` into the location and the time of day.
/// The time comes from the last dash segment, or from a parenthetical.
fn split_location_and_time(rest: &str) -> (String, TimeOfDay) {
    let mut text = rest.to_string();
    let mut time_of_day = TimeOfDay::Unknown;

    if let Some(group) = PARENTHETICAL_REGEX.find_iter(rest).last() {
        let inner = group.as_str().trim_matches(['(', ')']);
        let parsed = parse_time_of_day(inner);
        if parsed != TimeOfDay::Unknown {
            time_of_day = parsed;
            text = format!("{}{}", &rest[..group.start()], &rest[group.end()..]);
        }
    }

    let segments: Vec<&str> = SEGMENT_SEPARATOR_REGEX
        .split(text.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let location_segments = match segments.split_last() {
        Some((last, init)) if !init.is_empty() => {
            let parsed = parse_time_of_day(last);
            if parsed != TimeOfDay::Unknown {
                if time_of_day == TimeOfDay::Unknown {
                    time_of_day = parsed;
                }
                init.to_vec()
            } else {
                segments.clone()
            }
        }
        _ => segments.clone(),
    };

    let location = location_segments
        .join(" - ")
        .trim_matches(|c: char| c == '.' || c == ',' || c.is_whitespace())
        .to_string();

    (location, time_of_day)
}

fn parse_time_of_day(segment: &str) -> TimeOfDay {
    let upper = PARENTHETICAL_REGEX
        .replace_all(segment, "")
        .trim()
        .trim_end_matches('.')
        .to_uppercase();

    match upper.as_str() {
        "MORNING" => return TimeOfDay::Morning,
        "DAY" | "DAYTIME" => return TimeOfDay::Day,
        "AFTERNOON" => return TimeOfDay::Afternoon,
        "EVENING" => return TimeOfDay::Evening,
        "NIGHT" | "NIGHTTIME" => return TimeOfDay::Night,
        "DAWN" | "SUNRISE" | "DAYBREAK" => return TimeOfDay::Dawn,
        "DUSK" | "SUNSET" | "TWILIGHT" => return TimeOfDay::Dusk,
        "CONTINUOUS" => return TimeOfDay::Continuous,
        "LATER" => return TimeOfDay::Later,
        "MOMENTS LATER" => return TimeOfDay::MomentsLater,
        "SAME TIME" => return TimeOfDay::SameTime,
        _ => {}
    }

    if upper.contains("CONT") {
        TimeOfDay::Continuous
    } else if upper.contains("LATER") {
        if upper.contains("MOMENT") {
            TimeOfDay::MomentsLater
        } else {
            TimeOfDay::Later
        }
    } else if upper.contains("SAME") && upper.contains("TIME") {
        TimeOfDay::SameTime
    } else {
        TimeOfDay::Unknown
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
