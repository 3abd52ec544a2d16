mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Bridge, Config, Corpus, EmbeddingProviderConfig, LlmProviderConfig, ProviderConfig, Providers,
	Search, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg, path.parent());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.corpus.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "corpus.path must be non-empty.".to_string() });
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.generation.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.generation.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&cfg.providers.generation.temperature) {
		return Err(Error::Validation {
			message: "providers.generation.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("rerank", &cfg.providers.rerank.api_key),
		("generation", &cfg.providers.generation.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	for (label, timeout_ms) in [
		("embedding", cfg.providers.embedding.timeout_ms),
		("rerank", cfg.providers.rerank.timeout_ms),
		("generation", cfg.providers.generation.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.search.top_n == 0 {
		return Err(Error::Validation {
			message: "search.top_n must be greater than zero.".to_string(),
		});
	}

	if let Some(max) = cfg.search.rerank_max_results
		&& max == 0
	{
		return Err(Error::Validation {
			message: "search.rerank_max_results must be greater than zero.".to_string(),
		});
	}

	if cfg.search.id_width == 0 {
		return Err(Error::Validation {
			message: "search.id_width must be greater than zero.".to_string(),
		});
	}
	if cfg.search.in_prompt_number == 0 {
		return Err(Error::Validation {
			message: "search.in_prompt_number must be greater than zero.".to_string(),
		});
	}
	if cfg.search.prompt_header.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.prompt_header must be non-empty.".to_string(),
		});
	}
	if cfg.bridge.command.trim().is_empty() {
		return Err(Error::Validation {
			message: "bridge.command must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config, base_dir: Option<&Path>) {
	if cfg
		.providers
		.embedding
		.instruction
		.as_deref()
		.map(|instruction| instruction.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.embedding.instruction = None;
	}
	if let Some(base_dir) = base_dir
		&& cfg.corpus.path.is_relative()
		&& !cfg.corpus.path.as_os_str().is_empty()
	{
		cfg.corpus.path = base_dir.join(&cfg.corpus.path);
	}
}
