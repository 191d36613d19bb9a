//! Mock prompt gateway for integration testing.
//!
//! Provides a deterministic `PromptGateway` implementation that replays
//! scripted completions and records the prompts it was given — all
//! in-memory with no external dependencies.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use kisan_mitra::llm::PromptGateway;

/// A scripted gateway: responses are popped in order, and every call's
/// prompts are recorded for assertion.
pub struct MockGateway {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, String)>>,
    /// If set, all operations will return this error.
    force_error: Mutex<Option<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            force_error: Mutex::new(None),
        }
    }

    /// Queue a completion to be returned by the next call.
    pub fn push_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(text.to_string());
    }

    /// Force all subsequent operations to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// All (system, user) prompt pairs seen so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PromptGateway for MockGateway {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));

        if let Some(msg) = self.force_error.lock().unwrap().as_ref() {
            return Err(anyhow!("{msg}"));
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("mock gateway: no scripted response left"))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
