use recall_config::ProviderConfig;
use recall_domain::{RelevanceRankedCard, SimilarityRankedCard};
use recall_providers::RerankHit;

use crate::{Error, RerankProvider, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RerankOutcome {
	/// Ordered by `relevance_rank`, which runs `1..=cards.len()`.
	pub cards: Vec<RelevanceRankedCard>,
	/// Provider results whose index did not point at a candidate.
	pub unknown_indexes: usize,
}

/// Reranks similarity candidates. An empty candidate list returns immediately without calling
/// the provider; a provider failure is fatal to the search.
pub async fn rerank_cards(
	provider: &dyn RerankProvider,
	cfg: &ProviderConfig,
	query: &str,
	cards: &[SimilarityRankedCard],
	max_results: Option<u32>,
) -> Result<RerankOutcome> {
	if cards.is_empty() {
		tracing::warn!("No cards provided for reranking.");

		return Ok(RerankOutcome::default());
	}

	let docs: Vec<String> = cards.iter().map(|card| card.content().to_string()).collect();
	let hits = provider
		.rerank(cfg, query, &docs, max_results)
		.await
		.map_err(|err| Error::Provider { message: format!("Rerank failed: {err}") })?;

	Ok(reconcile_rerank(cards, &hits))
}

/// Maps provider hits back onto the candidates they index, in provider order.
pub fn reconcile_rerank(cards: &[SimilarityRankedCard], hits: &[RerankHit]) -> RerankOutcome {
	let mut out = Vec::with_capacity(hits.len());
	let mut unknown_indexes = 0;

	for (position, hit) in hits.iter().enumerate() {
		let Some(source) = cards.get(hit.index) else {
			tracing::warn!(
				index = hit.index,
				position,
				candidates = cards.len(),
				"Rerank result references an unknown candidate."
			);

			unknown_indexes += 1;

			continue;
		};

		out.push(RelevanceRankedCard {
			similarity: source.clone(),
			relevance_rank: out.len() as u32 + 1,
			relevance_score: hit.relevance_score,
		});
	}

	out.sort_by_key(|card| card.relevance_rank);

	debug_assert!(recall_domain::ranks_are_dense(out.iter().map(|card| card.relevance_rank)));

	RerankOutcome { cards: out, unknown_indexes }
}

#[cfg(test)]
mod tests {
	use recall_domain::Flashcard;

	use super::*;

	fn candidate(id: &str, rank: u32) -> SimilarityRankedCard {
		SimilarityRankedCard {
			card: Flashcard { id: id.to_string(), content: format!("body {id}") },
			similarity_rank: rank,
			similarity_score: 1.0 - rank as f32 / 10.0,
		}
	}

	#[test]
	fn follows_provider_order() {
		let cards = vec![candidate("a", 1), candidate("b", 2), candidate("c", 3)];
		let hits = vec![
			RerankHit { index: 2, relevance_score: 0.9 },
			RerankHit { index: 0, relevance_score: 0.4 },
		];
		let outcome = reconcile_rerank(&cards, &hits);
		let ids: Vec<&str> = outcome.cards.iter().map(|card| card.id()).collect();

		assert_eq!(ids, vec!["c", "a"]);
		assert_eq!(outcome.cards[0].relevance_rank, 1);
		assert_eq!(outcome.cards[0].similarity.similarity_rank, 3);
		assert_eq!(outcome.cards[1].relevance_score, 0.4);
		assert_eq!(outcome.unknown_indexes, 0);
	}

	#[test]
	fn drops_unknown_indexes_without_gaps() {
		let cards = vec![candidate("a", 1), candidate("b", 2)];
		let hits = vec![
			RerankHit { index: 1, relevance_score: 0.9 },
			RerankHit { index: 7, relevance_score: 0.8 },
			RerankHit { index: 0, relevance_score: 0.1 },
		];
		let outcome = reconcile_rerank(&cards, &hits);
		let ranks: Vec<u32> = outcome.cards.iter().map(|card| card.relevance_rank).collect();

		assert_eq!(ranks, vec![1, 2]);
		assert_eq!(outcome.unknown_indexes, 1);
	}
}
