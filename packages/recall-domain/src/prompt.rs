use crate::card::RelevanceRankedCard;

pub const IN_PROMPT_NUMBER_PLACEHOLDER: &str = "{in_prompt_number}";

/// Fills the `{in_prompt_number}` placeholder of a configured prompt header.
pub fn render_header(template: &str, in_prompt_number: u32) -> String {
	template.replace(IN_PROMPT_NUMBER_PLACEHOLDER, &in_prompt_number.to_string())
}

/// Renders the generation prompt. Cards are listed in the given order; the model's answer order
/// is later read back as a relevance judgment, so callers must pass them in relevance order.
pub fn assemble(header: &str, query: &str, cards: &[RelevanceRankedCard]) -> String {
	let mut out = String::new();

	out.push_str("# Prompt\n");
	out.push_str(header);
	out.push_str("\n\n## Query\n");
	out.push_str(query);
	out.push_str("\n\n## Flashcard Pool\n");

	for card in cards {
		out.push_str(&format!("- [id:{}] {}\n", card.id(), card.content()));
	}

	out
}
