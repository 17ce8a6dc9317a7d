// Foreground task switch owning the search and read-aloud sessions.
// Exactly one task is active; starting any task resets the others.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::guidance::Guidance;
use crate::reader::{BlockNavigator, BlockStep};
use crate::search::{check_search_value, SearchSession};
use crate::types::*;
use crate::vocabulary::LabelVocabulary;

/// One frame delivered by the inference pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameInput {
    /// Epoch the batch was requested for. Untagged batches are accepted as current.
    #[serde(default)]
    pub epoch: Option<Epoch>,
    pub batch: DetectionBatch,
}

/// Result of processing one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameOutcome {
    /// False when the batch was stale or arrived while no search was running.
    pub accepted: bool,
    pub guidance: Guidance,
    pub state: SearchState,
}

/// A search started from a spoken request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedSearch {
    pub epoch: Epoch,
    pub label: String,
    pub announcement: String,
}

/// Full snapshot for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSnapshot {
    pub task: ActiveTask,
    pub search: SearchState,
    pub read: ReadState,
}

#[derive(Debug, Clone)]
pub struct Assistant {
    task: ActiveTask,
    search: SearchSession,
    reader: BlockNavigator,
    vocabulary: LabelVocabulary,
}

impl Assistant {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Assistant {
            task: ActiveTask::Idle,
            search: SearchSession::new(config),
            reader: BlockNavigator::new(),
            vocabulary: config.vocabulary.build(),
        })
    }

    pub fn with_vocabulary(mut self, vocabulary: LabelVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn task(&self) -> ActiveTask {
        self.task
    }

    /// Stop whatever is running.
    pub fn reset(&mut self) -> Epoch {
        if self.task != ActiveTask::Idle {
            info!("task {:?} stopped", self.task);
        }
        self.task = ActiveTask::Idle;
        self.reader.reset();
        self.search.reset()
    }

    /// A rejected command leaves the running task untouched.
    pub fn start_search(&mut self, command: &SearchCommand) -> Result<Epoch, EngineError> {
        check_search_value(command.mode, &command.value)?;
        self.reset();
        let epoch = self.search.initiate_search(command.mode, &command.value)?;
        self.task = match command.mode {
            SearchMode::ObjectSearch => ActiveTask::SearchObject,
            SearchMode::TextSearch => ActiveTask::SearchText,
        };
        Ok(epoch)
    }

    /// Resolve a transcribed request against the vocabulary and start an object search.
    pub fn start_search_by_utterance(&mut self, utterance: &str) -> Result<StartedSearch, EngineError> {
        let item = self
            .vocabulary
            .resolve(utterance)
            .ok_or_else(|| EngineError::UnknownItem(utterance.to_string()))?;

        let epoch = self.start_search(&SearchCommand {
            mode: SearchMode::ObjectSearch,
            value: item.label.clone(),
        })?;
        let announcement = self.search.generator().phrases().announce_search(&item.phrase);
        Ok(StartedSearch {
            epoch,
            label: item.label,
            announcement,
        })
    }

    /// Prompt spoken before listening for the item name.
    pub fn name_item_prompt(&self) -> &str {
        &self.search.generator().phrases().name_the_item
    }

    pub fn process_frame(&mut self, frame: &FrameInput) -> FrameOutcome {
        let epoch = frame.epoch.unwrap_or_else(|| self.search.epoch());
        let guidance = match self.task {
            ActiveTask::SearchObject | ActiveTask::SearchText => {
                self.search.process_tagged(epoch, &frame.batch)
            }
            ActiveTask::Idle | ActiveTask::ReadText => None,
        };

        FrameOutcome {
            accepted: guidance.is_some(),
            guidance: guidance.unwrap_or_default(),
            state: self.search.state(),
        }
    }

    pub fn start_reading(&mut self) {
        self.reset();
        self.task = ActiveTask::ReadText;
    }

    /// Offer freshly recognized blocks. Taken only before playback begins.
    pub fn load_blocks(&mut self, blocks: Vec<String>) -> Result<bool, EngineError> {
        self.require(ActiveTask::ReadText)?;
        Ok(self.reader.load_blocks(blocks))
    }

    /// Advance playback. Reaching the end stops the read-aloud task.
    pub fn next_block(&mut self) -> Result<BlockStep, EngineError> {
        self.require(ActiveTask::ReadText)?;
        let step = self.reader.next_block();
        if step == BlockStep::EndOfText {
            info!("end of text reached");
            self.reset();
        }
        Ok(step)
    }

    pub fn prev_block(&mut self) -> Result<(), EngineError> {
        self.require(ActiveTask::ReadText)?;
        self.reader.prev_block();
        Ok(())
    }

    /// Go back one block and return it right away, for callers without autoplay.
    pub fn step_back(&mut self) -> Result<BlockStep, EngineError> {
        self.require(ActiveTask::ReadText)?;
        Ok(self.reader.step_back())
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.reader.set_autoplay(autoplay);
    }

    pub fn snapshot(&self) -> AssistantSnapshot {
        AssistantSnapshot {
            task: self.task,
            search: self.search.state(),
            read: self.reader.state(),
        }
    }

    fn require(&self, expected: ActiveTask) -> Result<(), EngineError> {
        if self.task == expected {
            Ok(())
        } else {
            Err(EngineError::TaskMismatch {
                expected,
                actual: self.task,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant() -> Assistant {
        Assistant::new(&EngineConfig::default()).unwrap()
    }

    fn keys_frame(epoch: Option<Epoch>) -> FrameInput {
        FrameInput {
            epoch,
            batch: DetectionBatch::Objects(vec![ObjectDetection::new(
                "Keys",
                0.9,
                NormalizedRect::new(0.45, 0.45, 0.1, 0.1),
            )]),
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.smoothing.alpha = 1.5;
        assert!(matches!(
            Assistant::new(&config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn utterance_starts_object_search() {
        let mut a = assistant();
        let started = a.start_search_by_utterance("Найди мои ключи").unwrap();
        assert_eq!(started.label, "Keys");
        assert_eq!(started.announcement, "searching for ключи");
        assert_eq!(a.task(), ActiveTask::SearchObject);
        assert_eq!(a.snapshot().search.search_value, "Keys");
    }

    #[test]
    fn custom_vocabulary_replaces_builtin() {
        let mut a = assistant().with_vocabulary(LabelVocabulary::from_pairs([("mug", "cup")]));
        assert_eq!(a.start_search_by_utterance("where is my mug").unwrap().label, "cup");
        assert!(a.start_search_by_utterance("ключи").is_err());
    }

    #[test]
    fn unknown_utterance_keeps_idle() {
        let mut a = assistant();
        let err = a.start_search_by_utterance("hello there").unwrap_err();
        assert!(matches!(err, EngineError::UnknownItem(_)));
        assert_eq!(a.task(), ActiveTask::Idle);
    }

    #[test]
    fn frames_drive_guidance_for_current_epoch_only() {
        let mut a = assistant();
        let old = a
            .start_search(&SearchCommand {
                mode: SearchMode::ObjectSearch,
                value: "keys".to_string(),
            })
            .unwrap();
        let current = a
            .start_search(&SearchCommand {
                mode: SearchMode::ObjectSearch,
                value: "keys".to_string(),
            })
            .unwrap();

        assert!(!a.process_frame(&keys_frame(Some(old))).accepted);
        let first = a.process_frame(&keys_frame(Some(current)));
        assert!(first.accepted);
        assert!(first.guidance.is_silent());
        let second = a.process_frame(&keys_frame(None));
        assert_eq!(second.guidance.speech_text, "object is centered");
        assert_eq!(second.state.health, 8);
    }

    #[test]
    fn frames_are_ignored_when_idle() {
        let mut a = assistant();
        let outcome = a.process_frame(&keys_frame(None));
        assert!(!outcome.accepted);
        assert!(outcome.guidance.is_silent());
    }

    #[test]
    fn read_aloud_flow_ends_task() {
        let mut a = assistant();
        assert!(matches!(
            a.next_block(),
            Err(EngineError::TaskMismatch { .. })
        ));

        a.start_reading();
        assert!(a
            .load_blocks(vec!["First. Second".to_string(), "«Third»".to_string()])
            .unwrap());
        assert_eq!(
            a.next_block().unwrap(),
            BlockStep::Text("First ...  Second".to_string())
        );
        assert!(!a.load_blocks(vec!["late".to_string()]).unwrap());
        assert_eq!(a.next_block().unwrap(), BlockStep::Text(" Third ".to_string()));
        a.prev_block().unwrap();
        assert_eq!(
            a.next_block().unwrap(),
            BlockStep::Text("First ...  Second".to_string())
        );
        a.next_block().unwrap();
        assert_eq!(a.next_block().unwrap(), BlockStep::EndOfText);
        assert_eq!(a.task(), ActiveTask::Idle);
    }

    #[test]
    fn blank_search_keeps_current_task() {
        let mut a = assistant();
        a.start_reading();
        a.load_blocks(vec!["one".to_string(), "two".to_string()]).unwrap();
        a.next_block().unwrap();

        let err = a
            .start_search(&SearchCommand {
                mode: SearchMode::ObjectSearch,
                value: "  ".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSearch { .. }));
        assert_eq!(a.task(), ActiveTask::ReadText);
        assert_eq!(a.snapshot().read.pointer, 0);
        assert_eq!(a.next_block().unwrap(), BlockStep::Text("two".to_string()));
    }

    #[test]
    fn starting_search_abandons_reading() {
        let mut a = assistant();
        a.start_reading();
        a.load_blocks(vec!["text".to_string()]).unwrap();
        a.next_block().unwrap();
        a.start_search(&SearchCommand {
            mode: SearchMode::TextSearch,
            value: "exit".to_string(),
        })
        .unwrap();
        let snapshot = a.snapshot();
        assert_eq!(snapshot.task, ActiveTask::SearchText);
        assert_eq!(snapshot.read.pointer, -1);
        assert!(snapshot.read.blocks.is_empty());
    }
}
