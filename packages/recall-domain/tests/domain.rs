use recall_domain::{
	DEFAULT_ID_WIDTH, Flashcard, IdExtractor, RelevanceRankedCard, SimilarityRankedCard,
	format_identifier_query, prompt,
};

fn relevance_card(id: &str, content: &str, relevance_rank: u32) -> RelevanceRankedCard {
	RelevanceRankedCard {
		similarity: SimilarityRankedCard {
			card: Flashcard { id: id.to_string(), content: content.to_string() },
			similarity_rank: relevance_rank,
			similarity_score: 0.5,
		},
		relevance_rank,
		relevance_score: 1.0 / relevance_rank as f32,
	}
}

#[test]
fn prompt_pool_lines_are_extractable_in_pool_order() {
	let cards = vec![
		relevance_card("1700000000002", "Kerley B lines suggest interstitial edema.", 1),
		relevance_card("1700000000001", "Air bronchograms suggest consolidation.", 2),
	];
	let header = prompt::render_header("Return at most {in_prompt_number} cards.", 3);
	let text = prompt::assemble(&header, "pneumonia findings", &cards);
	let extractor = IdExtractor::new(DEFAULT_ID_WIDTH).expect("Pattern must compile.");
	let ids = extractor.extract(&text);

	assert!(text.starts_with("# Prompt\nReturn at most 3 cards.\n\n## Query\npneumonia findings"));
	assert_eq!(ids, vec!["1700000000002".to_string(), "1700000000001".to_string()]);
	assert_eq!(format_identifier_query(&ids), "id:1700000000002,1700000000001");
}

#[test]
fn narrower_extractor_reads_short_corpora() {
	let extractor = IdExtractor::new(3).expect("Pattern must compile.");

	assert_eq!(extractor.extract("[id:123] [id:1234567890123]"), vec!["123".to_string()]);
}
