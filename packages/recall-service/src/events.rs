//! Progress events emitted by the search pipeline, one per completed stage.

use uuid::Uuid;

use recall_domain::BridgeStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
	Started { search_id: Uuid },
	QueryEmbedded { dimensions: usize },
	SimilarityRanked { candidates: usize },
	Reranked { kept: usize, dropped: usize },
	PromptAssembled { chars: usize },
	Generated { chars: usize },
	LlmRanked { extracted: usize, ranked: usize, unresolved: usize },
	BridgeSynced { status: BridgeStatus, succeeded: bool },
	Finished { search_id: Uuid },
	Failed { search_id: Uuid, message: String },
}

pub trait SearchListener
where
	Self: Send + Sync,
{
	fn on_event(&self, event: &SearchEvent);
}

pub struct NoopListener;

impl SearchEvent {
	/// Short human-readable label for progress displays.
	pub fn label(&self) -> String {
		match self {
			Self::Started { .. } => "Search started".to_string(),
			Self::QueryEmbedded { dimensions } => format!("Embedded query ({dimensions} dims)"),
			Self::SimilarityRanked { candidates } =>
				format!("Similarity search kept {candidates} candidates"),
			Self::Reranked { kept, dropped: 0 } => format!("Reranked {kept} cards"),
			Self::Reranked { kept, dropped } =>
				format!("Reranked {kept} cards ({dropped} unknown results dropped)"),
			Self::PromptAssembled { chars } => format!("Assembled prompt ({chars} chars)"),
			Self::Generated { chars } => format!("Model answered ({chars} chars)"),
			Self::LlmRanked { extracted, ranked, .. } =>
				format!("Model selected {ranked} of {extracted} cited cards"),
			Self::BridgeSynced { status, succeeded } =>
				format!("Anki bridge: {status} (success: {succeeded})"),
			Self::Finished { .. } => "Search finished".to_string(),
			Self::Failed { message, .. } => format!("Search failed: {message}"),
		}
	}
}

impl<F> SearchListener for F
where
	F: Fn(&SearchEvent) + Send + Sync,
{
	fn on_event(&self, event: &SearchEvent) {
		self(event)
	}
}

impl SearchListener for NoopListener {
	fn on_event(&self, _event: &SearchEvent) {}
}
