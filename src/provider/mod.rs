use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::wire::LlmRequest;

pub mod anthropic;
pub mod ollama;
pub mod openai;

#[cfg(test)]
pub(crate) mod canned;
#[cfg(test)]
pub mod scripted;

/// A hosted model that answers one request with one JSON object.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn send(&self, req: &LlmRequest) -> Result<Value>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    match cfg.provider {
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::from_config(cfg)?)),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic::from_config(cfg)?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::from_config(cfg)?)),
    }
}

/// Parse the model's text as a JSON object, falling back to the first
/// balanced `{...}` embedded in prose or code fences.
pub(crate) fn json_from_content(content: &str) -> Result<Value> {
    if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(content.trim()) {
        return Ok(v);
    }
    if let Some(obj) = extract_first_json_object(content) {
        if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(obj) {
            return Ok(v);
        }
    }
    Err(anyhow!(
        "model did not return a JSON object.\n--- content start ---\n{}\n--- content end ---",
        content
    ))
}

/// Extracts the first top-level JSON object substring from a string.
/// Braces inside string literals are ignored.
fn extract_first_json_object(s: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' if start.is_some() => in_string = true,
            b'{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|st| &s[st..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
