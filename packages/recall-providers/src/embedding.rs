use std::time::{Duration, Instant};

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Embeds a single query with an OpenAI-compatible embeddings endpoint.
pub async fn embed_query(
	cfg: &recall_config::EmbeddingProviderConfig,
	query: &str,
) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let input = embedding_input(cfg.instruction.as_deref(), query);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": [input],
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
		"Embedding provider answered."
	);

	parse_embedding_response(json)?
		.into_iter()
		.next()
		.ok_or_else(|| eyre::eyre!("Embedding provider returned no vectors."))
}

pub fn embedding_input(instruction: Option<&str>, query: &str) -> String {
	match instruction {
		Some(instruction) => format!("{instruction}\n\n{query}"),
		None => query.to_string(),
	}
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing data array."))?;

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());
	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| eyre::eyre!("Embedding item missing embedding array."))?;
		let mut vec = Vec::with_capacity(embedding.len());
		for value in embedding {
			let number =
				value.as_f64().ok_or_else(|| eyre::eyre!("Embedding value must be numeric."))?;
			vec.push(number as f32);
		}
		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
