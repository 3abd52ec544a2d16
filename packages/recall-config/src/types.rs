use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub corpus: Corpus,
	pub providers: Providers,
	pub search: Search,
	pub bridge: Bridge,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
	/// JSON corpus file. Relative paths resolve against the config file's directory.
	pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: ProviderConfig,
	pub generation: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	/// Must equal the corpus embedding width.
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	/// Optional. Prepended to the query as `"<instruction>\n\n<query>"` before embedding.
	#[serde(default)]
	pub instruction: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Candidates kept from cosine similarity search.
	pub top_n: u32,
	/// Optional. Upper bound on rerank results; unbounded when absent.
	#[serde(default)]
	pub rerank_max_results: Option<u32>,
	#[serde(default = "default_id_width")]
	pub id_width: usize,
	pub in_prompt_number: u32,
	/// May contain the `{in_prompt_number}` placeholder.
	pub prompt_header: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bridge {
	/// Executable that speaks the bridge stdin/stdout protocol.
	pub command: String,
	#[serde(default)]
	pub args: Vec<String>,
}

fn default_id_width() -> usize {
	13
}
