/// In-memory `ToolRunner` for unit tests.
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use vidfetch_shared::errors::{ToolOperation, VidfetchError, VidfetchResult};

use crate::runner::ToolRunner;

/// Replays canned results in order and records every call.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<VidfetchResult<String>>>,
    calls: Mutex<Vec<(ToolOperation, Vec<String>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, stdout: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(stdout.to_string()));
        self
    }

    pub fn fail(self, err: VidfetchError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<(ToolOperation, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    fn program(&self) -> &str {
        "yt-dlp"
    }

    async fn run(&self, operation: ToolOperation, args: &[String]) -> VidfetchResult<String> {
        self.calls.lock().unwrap().push((operation, args.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedRunner ran out of replies")
    }
}
