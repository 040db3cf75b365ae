use std::sync::Arc;
use ra_core::SpeechSynthesizer;
use ra_reader::{ActionReconciler, FeedAssembler};

pub struct AppState {
    pub feed: FeedAssembler,
    pub actions: ActionReconciler,
    /// `None` when no TTS key is provisioned; clients then use browser speech.
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
}
