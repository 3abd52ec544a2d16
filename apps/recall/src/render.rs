//! Terminal output for the interactive CLI. Progress goes to stderr, results to stdout.

use std::time::Instant;

use recall_service::{SearchEvent, SearchListener, SearchResult};

const CONTENT_WIDTH: usize = 72;

/// Prints one line per pipeline stage with the time since the printer was created.
pub struct ProgressPrinter {
	enabled: bool,
	started: Instant,
}
impl ProgressPrinter {
	pub fn new(enabled: bool) -> Self {
		Self { enabled, started: Instant::now() }
	}
}

impl SearchListener for ProgressPrinter {
	fn on_event(&self, event: &SearchEvent) {
		if self.enabled {
			eprintln!("[{:>7.2}s] {}", self.started.elapsed().as_secs_f64(), event.label());
		}
	}
}

pub fn render_result(result: &SearchResult) -> String {
	let mut out = similarity_summary(result);

	out.push_str(&format!("\nReranked cards ({})\n", result.relevance_ranked_cards.len()));
	out.push_str(&format!("{:>5}  {:>8}  {:<13}  content\n", "rank", "score", "id"));

	for card in &result.relevance_ranked_cards {
		out.push_str(&format!(
			"{:>5}  {:>8.4}  {:<13}  {}\n",
			card.relevance_rank,
			card.relevance_score,
			card.id(),
			truncate(card.content(), CONTENT_WIDTH)
		));
	}

	out.push_str(&format!("\nModel selection ({})\n", result.llm_ranked_cards.len()));

	if result.llm_ranked_cards.is_empty() {
		out.push_str("  The model cited no known cards.\n");
	} else {
		out.push_str(&format!("{:>5}  {:>7}  {:<13}  content\n", "rank", "rerank", "id"));

		for card in &result.llm_ranked_cards {
			out.push_str(&format!(
				"{:>5}  {:>7}  {:<13}  {}\n",
				card.llm_rank,
				card.relevance.relevance_rank,
				card.id(),
				truncate(card.content(), CONTENT_WIDTH)
			));
		}
	}

	let diagnostics = &result.diagnostics;

	if diagnostics.unknown_rerank_indexes > 0 || diagnostics.unresolved_llm_ids > 0 {
		out.push_str(&format!(
			"\nDropped {} unknown rerank results and {} unresolved cited ids.\n",
			diagnostics.unknown_rerank_indexes, diagnostics.unresolved_llm_ids
		));
	}

	out.push_str(&format!(
		"\nAnki: {} (success: {})",
		result.bridge.status, result.bridge.succeeded
	));

	if !result.bridge.message.is_empty() {
		out.push(' ');
		out.push_str(&result.bridge.message);
	}

	out.push('\n');

	if !result.identifier_query.is_empty() {
		out.push_str(&format!("Browser query: {}\n", result.identifier_query));
	}

	out
}

fn similarity_summary(result: &SearchResult) -> String {
	let cards = &result.similarity_ranked_cards;
	let mut out = format!("Similarity search: {} candidates", cards.len());

	if let (Some(first), Some(last)) = (cards.first(), cards.last()) {
		out.push_str(&format!(
			", scores {:.4} to {:.4}",
			first.similarity_score, last.similarity_score
		));
	}

	out.push('\n');

	out
}

fn truncate(text: &str, max_chars: usize) -> String {
	let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");

	if flat.chars().count() <= max_chars {
		return flat;
	}

	let mut cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();

	cut.push_str("...");

	cut
}
