// guidance_core: detection-to-guidance engine for sound-and-touch navigation.
// Detection, recognition, speech, and haptics live outside; this crate only interprets results.

mod assistant;
mod candidates;
mod error;
mod guidance;
mod reader;
mod search;
mod smoother;
mod tracker;
mod types;
mod vocabulary;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use assistant::{Assistant, AssistantSnapshot, FrameInput, FrameOutcome, StartedSearch};
pub use candidates::{
    discard_malformed, extract_objects, extract_text, filter_false_positives, nearest_to_center,
    select_target, Candidate,
};
pub use error::EngineError;
pub use guidance::{
    Guidance, GuidanceGenerator, HapticPattern, HorizontalCue, Language, PhraseSet, VerticalCue,
};
pub use reader::{clean_block_text, BlockNavigator, BlockStep, PAUSE_MARKER};
pub use search::{check_search_value, SearchSession};
pub use smoother::PositionSmoother;
pub use tracker::{ConfirmationTracker, TrackerPhase};
pub use types::*;
pub use vocabulary::{LabelVocabulary, ResolvedItem, VocabularyEntry, VocabularyKind};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Main engine interface exposed to JavaScript.
/// One call per delivered frame; callers serialize delivery.
#[wasm_bindgen]
pub struct Engine {
    assistant: Assistant,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Engine, JsValue> {
        let config: EngineConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        let assistant = Assistant::new(&config).map_err(to_js)?;

        Ok(Engine { assistant })
    }

    /// Start a search from `{ "mode": "object_search" | "text_search", "value": "..." }`.
    /// Returns the epoch that frames for this search should carry.
    pub fn start_search(&mut self, command_json: &str) -> Result<u64, JsValue> {
        let command: SearchCommand = serde_json::from_str(command_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid search command: {}", e)))?;
        self.assistant
            .start_search(&command)
            .map(|epoch| epoch.as_u64())
            .map_err(to_js)
    }

    /// Start an object search from a transcribed spoken request.
    /// Returns JSON with { epoch, label, announcement }.
    pub fn start_search_by_utterance(&mut self, utterance: &str) -> Result<String, JsValue> {
        let started = self
            .assistant
            .start_search_by_utterance(utterance)
            .map_err(to_js)?;
        to_json(&started)
    }

    pub fn name_item_prompt(&self) -> String {
        self.assistant.name_item_prompt().to_string()
    }

    /// Process one frame of detections and return guidance JSON.
    /// This is the main entry point, designed as a batch call to reduce JS↔WASM overhead.
    pub fn process_frame(&mut self, frame_json: &str) -> Result<String, JsValue> {
        let frame: FrameInput = serde_json::from_str(frame_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid frame: {}", e)))?;
        to_json(&self.assistant.process_frame(&frame))
    }

    pub fn start_reading(&mut self) {
        self.assistant.start_reading();
    }

    /// Offer recognized text blocks as a JSON array of strings.
    pub fn load_blocks(&mut self, blocks_json: &str) -> Result<bool, JsValue> {
        let blocks: Vec<String> = serde_json::from_str(blocks_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid blocks: {}", e)))?;
        self.assistant.load_blocks(blocks).map_err(to_js)
    }

    /// Returns JSON `{ "type": "Text", "text": "..." }` or `{ "type": "EndOfText" }`.
    pub fn next_block(&mut self) -> Result<String, JsValue> {
        let step = self.assistant.next_block().map_err(to_js)?;
        to_json(&step)
    }

    pub fn prev_block(&mut self) -> Result<(), JsValue> {
        self.assistant.prev_block().map_err(to_js)
    }

    pub fn step_back(&mut self) -> Result<String, JsValue> {
        let step = self.assistant.step_back().map_err(to_js)?;
        to_json(&step)
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.assistant.set_autoplay(autoplay);
    }

    /// Stop the current task. Returns the new epoch.
    pub fn reset(&mut self) -> u64 {
        self.assistant.reset().as_u64()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(&self.assistant.snapshot())
    }
}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
