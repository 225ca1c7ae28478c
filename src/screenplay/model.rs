/*!
 * Structured screenplay model.
 *
 * A `ParsedScript` is produced by one parser invocation and converted once into a
 * plain JSON mapping with `to_mapping`. Key order in the mapping is fixed so that
 * identical input always yields byte-identical output.
 */

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value, json};

use super::FormatTag;

/// Interior/exterior classification of a scene heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneType {
    Interior,
    Exterior,
    InteriorExterior,
    #[default]
    Unknown,
}

impl SceneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interior => "INT",
            Self::Exterior => "EXT",
            Self::InteriorExterior => "INT/EXT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time of day taken from a scene heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOfDay {
    Morning,
    Day,
    Afternoon,
    Evening,
    Night,
    Dawn,
    Dusk,
    Continuous,
    Later,
    MomentsLater,
    SameTime,
    #[default]
    Unknown,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "MORNING",
            Self::Day => "DAY",
            Self::Afternoon => "AFTERNOON",
            Self::Evening => "EVENING",
            Self::Night => "NIGHT",
            Self::Dawn => "DAWN",
            Self::Dusk => "DUSK",
            Self::Continuous => "CONTINUOUS",
            Self::Later => "LATER",
            Self::MomentsLater => "MOMENTS_LATER",
            Self::SameTime => "SAME_TIME",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block of content inside a scene, in reading order
#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    /// Narrative description
    Action { text: String },

    /// Speech attributed to a character
    Dialogue {
        character: String,
        lines: Vec<String>,
        parentheticals: Vec<String>,
    },

    /// Editing instruction such as `CUT TO:`
    Transition { text: String },
}

impl SceneElement {
    fn to_mapping(&self) -> Value {
        match self {
            Self::Action { text } => json!({ "type": "action", "text": text }),
            Self::Dialogue {
                character,
                lines,
                parentheticals,
            } => json!({
                "type": "dialogue",
                "character": character,
                "lines": lines,
                "parentheticals": parentheticals,
            }),
            Self::Transition { text } => json!({ "type": "transition", "text": text }),
        }
    }
}

/// A single scene, from one heading to the next
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// 1-based position in the script
    pub number: usize,

    /// Heading line as it appeared in the text
    pub heading: String,

    pub scene_type: SceneType,
    pub location: String,
    pub time_of_day: TimeOfDay,

    /// Content blocks in reading order
    pub elements: Vec<SceneElement>,

    /// Speaking characters, in order of first line, without duplicates
    pub characters: Vec<String>,

    /// Non-blank lines in the scene including the heading
    pub line_count: usize,

    pub page_count: f64,
    pub start_page: f64,
    pub end_page: f64,
    pub estimated_duration_minutes: f64,
}

impl Scene {
    pub fn new(number: usize, heading: impl Into<String>) -> Self {
        Self {
            number,
            heading: heading.into(),
            scene_type: SceneType::Unknown,
            location: String::new(),
            time_of_day: TimeOfDay::Unknown,
            elements: Vec::new(),
            characters: Vec::new(),
            line_count: 0,
            page_count: 0.0,
            start_page: 0.0,
            end_page: 0.0,
            estimated_duration_minutes: 0.0,
        }
    }

    /// Display title, `Scene <n>`
    pub fn title(&self) -> String {
        format!("Scene {}", self.number)
    }

    pub fn has_character(&self, name: &str) -> bool {
        self.characters.iter().any(|c| c == name)
    }

    /// Append a dialogue element, registering the speaker in the character set.
    ///
    /// Returns the characters that were already present in the scene before
    /// this line, excluding the speaker.
    pub fn push_dialogue(
        &mut self,
        character: String,
        lines: Vec<String>,
        parentheticals: Vec<String>,
    ) -> Vec<String> {
        let listeners: Vec<String> = self
            .characters
            .iter()
            .filter(|c| **c != character)
            .cloned()
            .collect();

        if !self.has_character(&character) {
            self.characters.push(character.clone());
        }

        self.elements.push(SceneElement::Dialogue {
            character,
            lines,
            parentheticals,
        });

        listeners
    }

    pub fn push_action(&mut self, text: String) {
        self.elements.push(SceneElement::Action { text });
    }

    pub fn push_transition(&mut self, text: String) {
        self.elements.push(SceneElement::Transition { text });
    }

    /// Iterate over `(character, lines)` of every dialogue element
    pub fn dialogue(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.elements.iter().filter_map(|element| match element {
            SceneElement::Dialogue {
                character, lines, ..
            } => Some((character.as_str(), lines.as_slice())),
            _ => None,
        })
    }

    /// Whether every speaker of this scene is listed in its character set
    pub fn speakers_are_listed(&self) -> bool {
        self.dialogue()
            .all(|(character, _)| self.has_character(character))
    }

    fn to_mapping(&self) -> Value {
        json!({
            "scene_number": self.number,
            "title": self.title(),
            "heading": self.heading,
            "type": self.scene_type.as_str(),
            "location": self.location,
            "time_of_day": self.time_of_day.as_str(),
            "characters": self.characters,
            "elements": self.elements.iter().map(SceneElement::to_mapping).collect::<Vec<_>>(),
            "line_count": self.line_count,
            "page_count": self.page_count,
            "start_page": self.start_page,
            "end_page": self.end_page,
            "estimated_duration_minutes": self.estimated_duration_minutes,
        })
    }
}

/// Script-wide information about one speaking character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,

    /// Dialogue lines spoken, parentheticals excluded
    pub total_lines: usize,

    /// Number of dialogue elements
    pub dialogue_count: usize,

    /// Scene numbers the character speaks in, ascending
    pub scene_appearances: Vec<usize>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_lines: 0,
            dialogue_count: 0,
            scene_appearances: Vec::new(),
        }
    }

    fn to_mapping(&self) -> Value {
        json!({
            "name": self.name,
            "total_lines": self.total_lines,
            "dialogue_count": self.dialogue_count,
            "scene_appearances": self.scene_appearances,
        })
    }
}

/// Speaker -> listener -> number of dialogue elements addressed while both were in the scene
pub type DialogueInteractions = BTreeMap<String, BTreeMap<String, usize>>;

/// Structured result of parsing one screenplay
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedScript {
    pub title: String,
    pub format_type: FormatTag,
    pub scenes: Vec<Scene>,

    /// Characters in order of first dialogue
    pub characters: Vec<Character>,

    pub dialogue_interactions: DialogueInteractions,
    pub total_pages: f64,
}

impl ParsedScript {
    pub fn new(title: impl Into<String>, format_type: FormatTag) -> Self {
        Self {
            title: title.into(),
            format_type,
            scenes: Vec::new(),
            characters: Vec::new(),
            dialogue_interactions: DialogueInteractions::new(),
            total_pages: 0.0,
        }
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Credit a dialogue element to `name` in scene `scene_number`
    pub fn credit_dialogue(&mut self, name: &str, scene_number: usize, line_count: usize) {
        let index = match self.characters.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.characters.push(Character::new(name));
                self.characters.len() - 1
            }
        };

        let character = &mut self.characters[index];
        character.total_lines += line_count;
        character.dialogue_count += 1;
        if character.scene_appearances.last() != Some(&scene_number) {
            character.scene_appearances.push(scene_number);
        }
    }

    /// Count one exchange from `speaker` to each of `listeners`
    pub fn record_interactions(&mut self, speaker: &str, listeners: &[String]) {
        if listeners.is_empty() {
            return;
        }
        let row = self
            .dialogue_interactions
            .entry(speaker.to_string())
            .or_default();
        for listener in listeners {
            *row.entry(listener.clone()).or_insert(0) += 1;
        }
    }

    pub fn total_dialogue_lines(&self) -> usize {
        self.characters.iter().map(|c| c.total_lines).sum()
    }

    /// Convert into the plain mapping handed to callers and persisted as JSON
    pub fn to_mapping(&self) -> Value {
        let mut character_scene_count = Map::new();
        for character in &self.characters {
            character_scene_count.insert(
                character.name.clone(),
                Value::from(character.scene_appearances.len()),
            );
        }

        json!({
            "screenplay": {
                "title": self.title,
                "format_type": self.format_type.as_str(),
                "total_pages": self.total_pages,
                "scenes": self.scenes.iter().map(Scene::to_mapping).collect::<Vec<_>>(),
                "characters": self.characters.iter().map(Character::to_mapping).collect::<Vec<_>>(),
                "dialogue_interactions": self.dialogue_interactions,
            },
            "statistics": {
                "total_scenes": self.scenes.len(),
                "total_characters": self.characters.len(),
                "total_pages": self.total_pages,
                "total_dialogue_lines": self.total_dialogue_lines(),
                "character_scene_count": character_scene_count,
            },
        })
    }
}
