pub mod ranking;
pub mod rerank;

use std::time::Instant;

use recall_domain::{
	BridgeReport, GenerativeRankedCard, RelevanceRankedCard, SimilarityRankedCard,
	format_identifier_query, prompt, ranks_are_dense,
};

use crate::{Error, RecallService, Result, SearchEvent, SearchListener};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	/// Overrides `search.top_n`.
	pub top_n: Option<u32>,
	/// Overrides `search.rerank_max_results`.
	pub rerank_max_results: Option<u32>,
}

/// Counts of provider output that could not be mapped back onto candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchDiagnostics {
	pub unknown_rerank_indexes: usize,
	pub unresolved_llm_ids: usize,
}

/// Everything one search produced, stage by stage.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
	pub search_id: uuid::Uuid,
	pub query: String,
	pub similarity_ranked_cards: Vec<SimilarityRankedCard>,
	pub relevance_ranked_cards: Vec<RelevanceRankedCard>,
	pub llm_prompt: String,
	pub llm_response: String,
	pub extracted_ids: Vec<String>,
	pub llm_ranked_cards: Vec<GenerativeRankedCard>,
	pub identifier_query: String,
	pub bridge: BridgeReport,
	pub diagnostics: SearchDiagnostics,
}

impl SearchRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: query.into(), top_n: None, rerank_max_results: None }
	}
}

impl RecallService {
	/// Runs the full pipeline for one query.
	///
	/// Provider failures abort the search. Bridge problems never do; they are reported in
	/// [`SearchResult::bridge`].
	pub async fn search(
		&self,
		req: SearchRequest,
		listener: &dyn SearchListener,
	) -> Result<SearchResult> {
		let search_id = uuid::Uuid::new_v4();
		let started = Instant::now();

		listener.on_event(&SearchEvent::Started { search_id });

		match self.run_search(search_id, req, listener).await {
			Ok(result) => {
				tracing::info!(
					%search_id,
					llm_ranked = result.llm_ranked_cards.len(),
					bridge_status = %result.bridge.status,
					elapsed_ms = started.elapsed().as_millis() as u64,
					"Search finished."
				);
				listener.on_event(&SearchEvent::Finished { search_id });

				Ok(result)
			},
			Err(err) => {
				tracing::error!(%search_id, error = %err, "Search failed.");
				listener.on_event(&SearchEvent::Failed { search_id, message: err.to_string() });

				Err(err)
			},
		}
	}

	async fn run_search(
		&self,
		search_id: uuid::Uuid,
		req: SearchRequest,
		listener: &dyn SearchListener,
	) -> Result<SearchResult> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let top_n = req.top_n.unwrap_or(self.cfg.search.top_n);

		if top_n == 0 {
			return Err(Error::InvalidRequest {
				message: "top_n must be greater than zero.".to_string(),
			});
		}

		let max_results = req.rerank_max_results.or(self.cfg.search.rerank_max_results);

		if max_results == Some(0) {
			return Err(Error::InvalidRequest {
				message: "rerank_max_results must be greater than zero.".to_string(),
			});
		}

		let embedding = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, query)
			.await
			.map_err(|err| Error::Provider { message: format!("Embedding failed: {err}") })?;

		listener.on_event(&SearchEvent::QueryEmbedded { dimensions: embedding.len() });

		let similarity_ranked_cards = self.similarity_rank(&embedding, top_n as usize)?;

		listener.on_event(&SearchEvent::SimilarityRanked {
			candidates: similarity_ranked_cards.len(),
		});

		let reranked = rerank::rerank_cards(
			self.providers.rerank.as_ref(),
			&self.cfg.providers.rerank,
			query,
			&similarity_ranked_cards,
			max_results,
		)
		.await?;

		listener.on_event(&SearchEvent::Reranked {
			kept: reranked.cards.len(),
			dropped: reranked.unknown_indexes,
		});

		let header =
			prompt::render_header(&self.cfg.search.prompt_header, self.cfg.search.in_prompt_number);
		let llm_prompt = prompt::assemble(&header, query, &reranked.cards);

		listener.on_event(&SearchEvent::PromptAssembled { chars: llm_prompt.chars().count() });

		let llm_response = self
			.providers
			.generation
			.generate(&self.cfg.providers.generation, &llm_prompt)
			.await
			.map_err(|err| Error::Provider { message: format!("Generation failed: {err}") })?;

		listener.on_event(&SearchEvent::Generated { chars: llm_response.chars().count() });

		let extracted_ids = self.extractor.extract(&llm_response);
		let llm_ranking = ranking::reconcile_llm_ranks(&reranked.cards, &extracted_ids);

		debug_assert!(ranks_are_dense(llm_ranking.cards.iter().map(|card| card.llm_rank)));

		listener.on_event(&SearchEvent::LlmRanked {
			extracted: extracted_ids.len(),
			ranked: llm_ranking.cards.len(),
			unresolved: llm_ranking.unresolved,
		});

		let identifier_query = format_identifier_query(&extracted_ids);
		let bridge = self.bridge.sync(&identifier_query);

		listener.on_event(&SearchEvent::BridgeSynced {
			status: bridge.status,
			succeeded: bridge.succeeded,
		});

		Ok(SearchResult {
			search_id,
			query: query.to_string(),
			similarity_ranked_cards,
			relevance_ranked_cards: reranked.cards,
			llm_prompt,
			llm_response,
			extracted_ids,
			llm_ranked_cards: llm_ranking.cards,
			identifier_query,
			bridge,
			diagnostics: SearchDiagnostics {
				unknown_rerank_indexes: reranked.unknown_indexes,
				unresolved_llm_ids: llm_ranking.unresolved,
			},
		})
	}

	fn similarity_rank(
		&self,
		embedding: &[f32],
		top_n: usize,
	) -> Result<Vec<SimilarityRankedCard>> {
		let scored = self.corpus.vectors().top_n(embedding, top_n)?;
		let mut out = Vec::with_capacity(scored.len());

		for (position, hit) in scored.into_iter().enumerate() {
			let card = self.corpus.card(hit.index).ok_or_else(|| Error::Storage {
				message: format!("Vector row {} has no card.", hit.index),
			})?;

			out.push(SimilarityRankedCard {
				card: card.clone(),
				similarity_rank: position as u32 + 1,
				similarity_score: hit.score,
			});
		}

		debug_assert!(ranks_are_dense(out.iter().map(|card| card.similarity_rank)));

		Ok(out)
	}
}
