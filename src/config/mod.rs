use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ProviderKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub openai_base: String,
    pub anthropic_base: String,
    pub anthropic_version: String,
    pub ollama_url: String,
    /// Root for request/response transcripts.
    pub out_dir: String,
    pub save_request: bool,
    pub save_response: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: "gpt-4.1-mini".into(),
            timeout_secs: 600,
            max_tokens: 4096,
            openai_base: "https://api.openai.com".into(),
            anthropic_base: "https://api.anthropic.com".into(),
            anthropic_version: "2023-06-01".into(),
            ollama_url: "http://localhost:11434".into(),
            out_dir: ".city".into(),
            save_request: false,
            save_response: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))
    }

    /// File values (or defaults) with any explicitly passed flags on top.
    pub fn load(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::from_file(Path::new(p))?,
            None => Self::default(),
        };
        if let Some(p) = &args.provider {
            cfg.provider = p.clone();
        }
        if let Some(m) = &args.model {
            cfg.model = m.clone();
        }
        if let Some(t) = args.timeout_secs {
            cfg.timeout_secs = t;
        }
        if let Some(o) = &args.out_dir {
            cfg.out_dir = o.clone();
        }
        cfg.save_request |= args.save_request;
        cfg.save_response |= args.save_response;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "provider = \"ollama\"\nmodel = \"llama3.1\"\nsave_response = true").unwrap();

        let cfg = Config::from_file(f.path()).unwrap();
        assert!(matches!(cfg.provider, ProviderKind::Ollama));
        assert_eq!(cfg.model, "llama3.1");
        assert!(cfg.save_response);
        assert!(!cfg.save_request);
        assert_eq!(cfg.timeout_secs, 600);
        assert_eq!(cfg.ollama_url, "http://localhost:11434");
    }

    #[test]
    fn unknown_keys_are_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "budget_limit = 5").unwrap();
        assert!(Config::from_file(f.path()).is_err());
    }

    #[test]
    fn flags_override_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "provider = \"anthropic\"\nmodel = \"from-file\"\ntimeout_secs = 30").unwrap();
        let path = f.path().to_string_lossy().to_string();

        let args = Args::parse_from([
            "city_blueprint",
            "--config",
            &path,
            "--model",
            "from-flag",
            "--save-request",
        ]);
        let cfg = Config::load(&args).unwrap();
        assert!(matches!(cfg.provider, ProviderKind::Anthropic));
        assert_eq!(cfg.model, "from-flag");
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.save_request);
    }
}
