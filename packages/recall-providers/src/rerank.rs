// std
use std::time::{Duration as StdDuration, Instant};

// crates.io
use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One rerank result: the position of the document in the request and its relevance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerankHit {
	pub index: usize,
	pub relevance_score: f32,
}

/// Calls a Cohere-style rerank endpoint. Hits come back in provider order, most relevant first.
pub async fn rerank(
	cfg: &recall_config::ProviderConfig,
	query: &str,
	docs: &[String],
	top_n: Option<u32>,
) -> Result<Vec<RerankHit>> {
	let client = Client::builder().timeout(StdDuration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let mut body = serde_json::json!({ "model": cfg.model, "query": query, "documents": docs });

	if let Some(top_n) = top_n {
		body["top_n"] = Value::from(top_n);
	}

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
		documents = docs.len(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"Rerank provider answered."
	);

	parse_rerank_response(json)
}

fn parse_rerank_response(json: Value) -> Result<Vec<RerankHit>> {
	let results = json
		.get("results")
		.or_else(|| json.get("data"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Rerank response is missing results array."))?;

	let mut hits = Vec::with_capacity(results.len());
	for item in results {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.ok_or_else(|| eyre::eyre!("Rerank result missing index."))? as usize;
		let relevance_score = item
			.get("relevance_score")
			.or_else(|| item.get("score"))
			.and_then(|v| v.as_f64())
			.ok_or_else(|| eyre::eyre!("Rerank result missing score."))? as f32;
		hits.push(RerankHit { index, relevance_score });
	}

	Ok(hits)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_provider_order() {
		let json = serde_json::json!({
			"results": [
				{ "index": 1, "relevance_score": 0.9 },
				{ "index": 0, "relevance_score": 0.2 }
			]
		});
		let hits = parse_rerank_response(json).expect("parse failed");
		assert_eq!(
			hits,
			vec![
				RerankHit { index: 1, relevance_score: 0.9 },
				RerankHit { index: 0, relevance_score: 0.2 },
			]
		);
	}

	#[test]
	fn accepts_score_alias_under_data() {
		let json = serde_json::json!({ "data": [{ "index": 3, "score": 0.5 }] });
		let hits = parse_rerank_response(json).expect("parse failed");

		assert_eq!(hits, vec![RerankHit { index: 3, relevance_score: 0.5 }]);
	}

	#[test]
	fn requires_index() {
		let json = serde_json::json!({ "results": [{ "relevance_score": 0.5 }] });

		assert!(parse_rerank_response(json).is_err());
	}
}
