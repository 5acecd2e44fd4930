//! In-memory provider replaying canned replies per stage.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use super::Provider;
use crate::planner::Stage;
use crate::wire::LlmRequest;

#[derive(Default)]
struct Script {
    replies: HashMap<Stage, VecDeque<Result<Value, String>>>,
    calls: Vec<LlmRequest>,
}

/// Cloning shares the script, so a test can keep a handle for inspection
/// after boxing the provider.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    inner: Arc<Mutex<Script>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, stage: Stage, value: Value) -> Self {
        self.inner.lock().replies.entry(stage).or_default().push_back(Ok(value));
        self
    }

    pub fn fail(self, stage: Stage, message: &str) -> Self {
        self.inner
            .lock()
            .replies
            .entry(stage)
            .or_default()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<LlmRequest> {
        self.inner.lock().calls.clone()
    }

    pub fn called_stages(&self) -> Vec<Stage> {
        self.inner.lock().calls.iter().map(|c| c.stage).collect()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn send(&self, req: &LlmRequest) -> Result<Value> {
        let mut script = self.inner.lock();
        script.calls.push(req.clone());
        match script.replies.get_mut(&req.stage).and_then(|q| q.pop_front()) {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("no scripted reply for stage {}", req.stage)),
        }
    }
}
