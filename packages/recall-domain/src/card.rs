use serde::{Deserialize, Serialize};

/// A corpus record. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
	pub id: String,
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRankedCard {
	#[serde(flatten)]
	pub card: Flashcard,
	/// 1-based position in the cosine similarity ordering.
	pub similarity_rank: u32,
	pub similarity_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceRankedCard {
	#[serde(flatten)]
	pub similarity: SimilarityRankedCard,
	/// 1-based position in the rerank ordering.
	pub relevance_rank: u32,
	pub relevance_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeRankedCard {
	#[serde(flatten)]
	pub relevance: RelevanceRankedCard,
	/// 1-based position among the resolvable identifiers the model cited.
	pub llm_rank: u32,
}

impl SimilarityRankedCard {
	pub fn id(&self) -> &str {
		&self.card.id
	}

	pub fn content(&self) -> &str {
		&self.card.content
	}
}

impl RelevanceRankedCard {
	pub fn id(&self) -> &str {
		self.similarity.id()
	}

	pub fn content(&self) -> &str {
		self.similarity.content()
	}
}

impl GenerativeRankedCard {
	pub fn id(&self) -> &str {
		self.relevance.id()
	}

	pub fn content(&self) -> &str {
		self.relevance.content()
	}
}

/// Returns true when `ranks`, read in list order, are exactly `1..=n`.
pub fn ranks_are_dense(ranks: impl IntoIterator<Item = u32>) -> bool {
	ranks.into_iter().enumerate().all(|(idx, rank)| rank as usize == idx + 1)
}
