use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::description::Feature;

#[derive(ValueEnum, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

#[derive(Parser, Debug)]
#[command(
    name = "city_blueprint",
    version,
    about = "Turn a city description into materials, costing, an environmental report and an ASCII blueprint"
)]
pub struct Args {
    /// Free-text description of the city (at least 50 characters).
    #[arg(long, conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Read the description from a file instead.
    #[arg(long)]
    pub description_file: Option<String>,

    /// Special features to include; repeat or comma-separate.
    #[arg(long = "feature", value_enum, value_delimiter = ',')]
    pub features: Vec<Feature>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// TOML file with provider settings.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub out_dir: Option<String>,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    /// Print the final run state as JSON instead of the report.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
