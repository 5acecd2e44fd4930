use fs_err as fs;
use serde_json::{to_string_pretty, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::Config;
use crate::wire::LlmRequest;

/// Where (and whether) request/response pairs are written for debugging.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub dir: PathBuf,
    pub save_request: bool,
    pub save_response: bool,
}

#[derive(Debug, Default)]
pub struct SavedPaths {
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

impl Transcript {
    pub fn from_config(cfg: &Config, tx: Uuid) -> Option<Self> {
        if !cfg.save_request && !cfg.save_response {
            return None;
        }
        Some(Self {
            dir: tx_dir(Path::new(&cfg.out_dir), tx),
            save_request: cfg.save_request,
            save_response: cfg.save_response,
        })
    }

    pub fn save_stage(&self, req: &LlmRequest, resp: Option<&Value>) -> anyhow::Result<SavedPaths> {
        fs::create_dir_all(&self.dir)?;
        let stage = req.stage.as_str();
        let mut saved = SavedPaths::default();

        if self.save_request {
            let p = self.dir.join(format!("{stage}.request.json"));
            fs::write(&p, to_string_pretty(req)?)?;
            saved.request = Some(p);
        }

        if let (true, Some(resp)) = (self.save_response, resp) {
            let p = self.dir.join(format!("{stage}.response.json"));
            fs::write(&p, to_string_pretty(resp)?)?;
            saved.response = Some(p);
        }

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Stage;
    use crate::wire::{Instruction, Tx};
    use chrono::Utc;
    use serde_json::json;

    fn request(tx: Uuid) -> LlmRequest {
        LlmRequest {
            schema_version: "v1".into(),
            stage: Stage::Optimizing,
            transaction: Tx { id: tx, timestamp: Utc::now() },
            instruction: Instruction { system: "sys".into(), user: "usr".into() },
            input: json!({ "budgetLimit": 1000000.0 }),
            output_schema: json!({}),
        }
    }

    #[test]
    fn disabled_flags_mean_no_transcript() {
        assert!(Transcript::from_config(&Config::default(), Uuid::new_v4()).is_none());
    }

    #[test]
    fn writes_request_and_response_under_tx_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config {
            out_dir: tmp.path().to_string_lossy().to_string(),
            save_request: true,
            save_response: true,
            ..Config::default()
        };
        let tx = Uuid::new_v4();
        let t = Transcript::from_config(&cfg, tx).unwrap();

        let saved = t.save_stage(&request(tx), Some(&json!({ "explanation": "x" }))).unwrap();
        let req_path = saved.request.unwrap();
        let resp_path = saved.response.unwrap();
        assert_eq!(req_path, tmp.path().join("tx").join(tx.to_string()).join("optimizing.request.json"));
        let body = std::fs::read_to_string(resp_path).unwrap();
        assert!(body.contains("\"explanation\""));
    }

    #[test]
    fn failed_call_saves_request_only() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config {
            out_dir: tmp.path().to_string_lossy().to_string(),
            save_request: true,
            save_response: true,
            ..Config::default()
        };
        let tx = Uuid::new_v4();
        let saved = Transcript::from_config(&cfg, tx)
            .unwrap()
            .save_stage(&request(tx), None)
            .unwrap();
        assert!(saved.request.is_some());
        assert!(saved.response.is_none());
    }
}
