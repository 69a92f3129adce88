//! Scripted generative model

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::flow::{GenerationError, GenerationRequest, GenerativeModel};

/// Model that returns a fixed response and records every prompt
pub struct ScriptedModel {
    response: Result<Option<Value>, GenerationError>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedModel {
    /// Model answering with [`sample_output`](crate::testing::sample_output)
    pub fn new() -> Self {
        Self {
            response: Ok(Some(crate::testing::sample_output())),
            delay: None,
            prompts: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn with_output(mut self, output: Value) -> Self {
        self.response = Ok(Some(output));
        self
    }

    pub fn with_empty_output(mut self) -> Self {
        self.response = Ok(None);
        self
    }

    pub fn with_error(mut self, error: GenerationError) -> Self {
        self.response = Err(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<Value>, GenerationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.response.clone()
    }
}
