// Read-aloud pagination over recognized text blocks.
// Playback advances with next_block() after each utterance; prev_block() only repositions.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::types::ReadState;

/// Spoken pause inserted in place of sentence periods.
pub const PAUSE_MARKER: &str = " ... ";

/// Result of advancing the navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text")]
pub enum BlockStep {
    Text(String),
    /// Past the last block; the caller should stop the session.
    EndOfText,
}

/// Normalize punctuation for speech: guillemets become spaces, periods become pauses.
pub fn clean_block_text(raw: &str) -> String {
    raw.replace(['«', '»'], " ").replace('.', PAUSE_MARKER)
}

#[derive(Debug, Clone)]
pub struct BlockNavigator {
    blocks: Vec<String>,
    pointer: i32,
    autoplay: bool,
    current_text: String,
}

impl BlockNavigator {
    pub fn new() -> Self {
        BlockNavigator {
            blocks: Vec::new(),
            pointer: -1,
            autoplay: true,
            current_text: String::new(),
        }
    }

    /// Replace the block list with fresh recognition results.
    /// Ignored mid-playback; returns whether the blocks were taken.
    pub fn load_blocks(&mut self, blocks: Vec<String>) -> bool {
        if !self.is_idle() {
            debug!("ignoring {} new blocks during playback", blocks.len());
            return false;
        }
        self.blocks = blocks;
        self.current_text.clear();
        true
    }

    pub fn next_block(&mut self) -> BlockStep {
        let end = i32::try_from(self.blocks.len()).unwrap_or(i32::MAX);
        self.pointer = (self.pointer + 1).clamp(0, end);
        match usize::try_from(self.pointer).ok().and_then(|i| self.blocks.get(i)) {
            Some(raw) => {
                self.current_text = clean_block_text(raw);
                BlockStep::Text(self.current_text.clone())
            }
            None => {
                self.current_text.clear();
                BlockStep::EndOfText
            }
        }
    }

    /// Rewind so that the following `next_block()` lands one block behind the current one.
    pub fn prev_block(&mut self) {
        self.pointer = (self.pointer - 2).max(-1);
    }

    /// Rewind and immediately produce the previous block, for callers without autoplay.
    pub fn step_back(&mut self) -> BlockStep {
        self.prev_block();
        self.next_block()
    }

    pub fn reset(&mut self) {
        self.blocks.clear();
        self.pointer = -1;
        self.current_text.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.pointer == -1
    }

    pub fn pointer(&self) -> i32 {
        self.pointer
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn state(&self) -> ReadState {
        ReadState {
            blocks: self.blocks.clone(),
            pointer: self.pointer,
            autoplay: self.autoplay,
            current_text: self.current_text.clone(),
        }
    }
}

impl Default for BlockNavigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator(count: usize) -> BlockNavigator {
        let mut nav = BlockNavigator::new();
        nav.load_blocks((0..count).map(|i| format!("block {}", i)).collect());
        nav
    }

    #[test]
    fn cleans_punctuation() {
        assert_eq!(clean_block_text("«Hi». Bye"), " Hi  ...  Bye");
    }

    #[test]
    fn walks_blocks_then_ends() {
        let mut nav = navigator(2);
        assert_eq!(nav.next_block(), BlockStep::Text("block 0".to_string()));
        assert_eq!(nav.next_block(), BlockStep::Text("block 1".to_string()));
        assert_eq!(nav.next_block(), BlockStep::EndOfText);
        assert_eq!(nav.current_text(), "");
    }

    #[test]
    fn prev_then_next_lands_one_behind() {
        let mut nav = navigator(5);
        for _ in 0..4 {
            nav.next_block();
        }
        assert_eq!(nav.pointer(), 3);
        nav.prev_block();
        assert_eq!(nav.pointer(), 1);
        assert_eq!(nav.next_block(), BlockStep::Text("block 2".to_string()));
        assert_eq!(nav.pointer(), 2);
    }

    #[test]
    fn prev_floors_at_start() {
        let mut nav = navigator(3);
        nav.next_block();
        nav.prev_block();
        assert_eq!(nav.pointer(), -1);
        assert_eq!(nav.next_block(), BlockStep::Text("block 0".to_string()));
    }

    #[test]
    fn step_back_replays_previous_block() {
        let mut nav = navigator(3);
        nav.next_block();
        nav.next_block();
        assert_eq!(nav.step_back(), BlockStep::Text("block 0".to_string()));
    }

    #[test]
    fn blocks_are_kept_during_playback() {
        let mut nav = navigator(3);
        nav.next_block();
        assert!(!nav.load_blocks(vec!["other".to_string()]));
        assert_eq!(nav.state().blocks.len(), 3);
        nav.reset();
        assert!(nav.load_blocks(vec!["other".to_string()]));
        assert_eq!(nav.next_block(), BlockStep::Text("other".to_string()));
    }

    #[test]
    fn empty_list_ends_immediately() {
        let mut nav = BlockNavigator::new();
        assert_eq!(nav.next_block(), BlockStep::EndOfText);
        assert_eq!(nav.pointer(), 0);
    }
}
