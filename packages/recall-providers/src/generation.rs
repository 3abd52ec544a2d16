use std::time::{Duration, Instant};

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Sends `prompt` as a single user message to an OpenAI-compatible chat completions endpoint
/// and returns the first choice's text. No retries.
pub async fn generate(cfg: &recall_config::LlmProviderConfig, prompt: &str) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let started = Instant::now();
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	tracing::info!(
		provider_id = %cfg.provider_id,
		elapsed_ms = started.elapsed().as_millis() as u64,
		"Generation provider answered."
	);

	parse_generation_text(json)
}

fn parse_generation_text(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Generation response is missing message content."))
}
