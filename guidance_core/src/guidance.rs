// Guidance generation: haptics carry "how close", speech carries "which way".
// Direction is discretized into a 3x3 grid with a dead zone around the frame center.

use serde::{Deserialize, Serialize};

use crate::types::{GuidanceSettings, NormalizedPoint, SearchMode};

/// Intensity at the maximum meaningful offset (half a frame from center).
const MIN_FELT_INTENSITY: f32 = 0.15;

/// Built-in phrase languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Russian,
}

/// Spoken phrases used by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSet {
    pub left: String,
    pub right: String,
    pub lower: String,
    pub higher: String,
    pub object_centered: String,
    pub text_centered: String,
    /// Joins the horizontal and vertical phrases into one utterance.
    pub separator: String,
    /// Prefix of the announcement spoken when a search starts.
    pub searching_for: String,
    /// Prompt asking the user to name the item to search for.
    pub name_the_item: String,
}

impl PhraseSet {
    pub fn english() -> Self {
        PhraseSet {
            left: "move left".to_string(),
            right: "move right".to_string(),
            lower: "lower".to_string(),
            higher: "higher".to_string(),
            object_centered: "object is centered".to_string(),
            text_centered: "text is centered".to_string(),
            separator: ", ".to_string(),
            searching_for: "searching for".to_string(),
            name_the_item: "name the item".to_string(),
        }
    }

    pub fn russian() -> Self {
        PhraseSet {
            left: "левее".to_string(),
            right: "правее".to_string(),
            lower: "ниже".to_string(),
            higher: "выше".to_string(),
            object_centered: "Предмет в центре".to_string(),
            text_centered: "Текст в центре".to_string(),
            separator: ", ... ".to_string(),
            searching_for: "Ищу предмет, ...".to_string(),
            name_the_item: "Назовите предмет".to_string(),
        }
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => PhraseSet::english(),
            Language::Russian => PhraseSet::russian(),
        }
    }

    /// Utterance confirming that a search for `item` has started.
    pub fn announce_search(&self, item: &str) -> String {
        format!("{} {}", self.searching_for, item)
    }
}

impl Default for PhraseSet {
    fn default() -> Self {
        PhraseSet::english()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalCue {
    Left,
    Neutral,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalCue {
    Lower,
    Neutral,
    Higher,
}

/// Suggested actuation for the presentation layer, which owns the actual policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HapticPattern {
    None,
    Single,
    Repeating,
}

/// One frame of guidance output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    /// Empty when there is no cue this frame.
    pub speech_text: String,
    /// In `[0, 1]`; zero means no feedback.
    pub feedback_intensity: f32,
    pub haptic: HapticPattern,
    pub horizontal: Option<HorizontalCue>,
    pub vertical: Option<VerticalCue>,
}

impl Guidance {
    pub fn silent() -> Self {
        Guidance {
            speech_text: String::new(),
            feedback_intensity: 0.0,
            haptic: HapticPattern::None,
            horizontal: None,
            vertical: None,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.speech_text.is_empty() && self.feedback_intensity == 0.0
    }
}

impl Default for Guidance {
    fn default() -> Self {
        Guidance::silent()
    }
}

/// Maps tracked position and lock state into speech and haptic intensity.
#[derive(Debug, Clone)]
pub struct GuidanceGenerator {
    settings: GuidanceSettings,
    phrases: PhraseSet,
}

impl GuidanceGenerator {
    pub fn new(settings: GuidanceSettings, phrases: PhraseSet) -> Self {
        GuidanceGenerator { settings, phrases }
    }

    pub fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    pub fn generate(
        &self,
        position: Option<NormalizedPoint>,
        locked: bool,
        mode: SearchMode,
    ) -> Guidance {
        let position = match position {
            Some(p) if locked => p,
            _ => return Guidance::silent(),
        };

        let feedback_intensity = self.intensity_for(position);
        let horizontal = self.horizontal_cue(position.x);
        let vertical = self.vertical_cue(position.y);

        let speech_text = if horizontal == HorizontalCue::Neutral && vertical == VerticalCue::Neutral {
            match mode {
                SearchMode::ObjectSearch => self.phrases.object_centered.clone(),
                SearchMode::TextSearch => self.phrases.text_centered.clone(),
            }
        } else {
            let mut parts: Vec<&str> = Vec::with_capacity(2);
            match horizontal {
                HorizontalCue::Left => parts.push(&self.phrases.left),
                HorizontalCue::Right => parts.push(&self.phrases.right),
                HorizontalCue::Neutral => {}
            }
            match vertical {
                VerticalCue::Lower => parts.push(&self.phrases.lower),
                VerticalCue::Higher => parts.push(&self.phrases.higher),
                VerticalCue::Neutral => {}
            }
            parts.join(self.phrases.separator.as_str())
        };

        Guidance {
            speech_text,
            feedback_intensity,
            haptic: self.haptic_for(feedback_intensity),
            horizontal: Some(horizontal),
            vertical: Some(vertical),
        }
    }

    /// Linear map from distance to center: 0 -> 1.0, 0.5 -> 0.15.
    pub fn intensity_for(&self, position: NormalizedPoint) -> f32 {
        let distance = position.distance_to(NormalizedPoint::center());
        let intensity = MIN_FELT_INTENSITY + (1.0 - MIN_FELT_INTENSITY) * (1.0 - 2.0 * distance);
        intensity.clamp(0.0, 1.0)
    }

    fn haptic_for(&self, intensity: f32) -> HapticPattern {
        if intensity <= 0.0 {
            HapticPattern::None
        } else if intensity > self.settings.repeat_threshold {
            HapticPattern::Repeating
        } else {
            HapticPattern::Single
        }
    }

    fn horizontal_cue(&self, x: f32) -> HorizontalCue {
        match band(x, self.settings.center_radius) {
            Band::Below => HorizontalCue::Left,
            Band::Inside => HorizontalCue::Neutral,
            Band::Above => HorizontalCue::Right,
        }
    }

    fn vertical_cue(&self, y: f32) -> VerticalCue {
        match band(y, self.settings.center_radius) {
            Band::Below => VerticalCue::Lower,
            Band::Inside => VerticalCue::Neutral,
            Band::Above => VerticalCue::Higher,
        }
    }
}

enum Band {
    Below,
    Inside,
    Above,
}

// Half-open dead zone [0.5 - r, 0.5 + r).
fn band(value: f32, radius: f32) -> Band {
    if value < 0.5 - radius {
        Band::Below
    } else if value < 0.5 + radius {
        Band::Inside
    } else {
        Band::Above
    }
}
