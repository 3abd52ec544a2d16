use std::collections::HashMap;

use recall_domain::{GenerativeRankedCard, RelevanceRankedCard};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRanking {
	/// Ordered by `llm_rank`, which runs `1..=cards.len()`.
	pub cards: Vec<GenerativeRankedCard>,
	/// Extracted identifiers that matched no candidate.
	pub unresolved: usize,
}

/// Orders candidates by the identifiers the model cited.
///
/// Every resolvable identifier, repeats included, takes the next rank. Unknown identifiers are
/// skipped and counted. Candidates the model never cited are left out.
pub fn reconcile_llm_ranks(cards: &[RelevanceRankedCard], extracted_ids: &[String]) -> LlmRanking {
	// Later duplicates overwrite earlier ones.
	let by_id: HashMap<&str, &RelevanceRankedCard> =
		cards.iter().map(|card| (card.id(), card)).collect();
	let mut out = Vec::new();
	let mut unresolved = 0;

	for id in extracted_ids {
		let Some(card) = by_id.get(id.as_str()) else {
			unresolved += 1;

			continue;
		};

		let llm_rank = out.len() as u32 + 1;

		out.push(GenerativeRankedCard { relevance: (*card).clone(), llm_rank });
	}

	if unresolved > 0 {
		tracing::debug!(unresolved, "Generated text cited identifiers outside the candidate set.");
	}

	LlmRanking { cards: out, unresolved }
}
