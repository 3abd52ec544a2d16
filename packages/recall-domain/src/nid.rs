use regex::Regex;

/// Width of the numeric note identifiers used by the corpus.
pub const DEFAULT_ID_WIDTH: usize = 13;

const IDENTIFIER_QUERY_PREFIX: &str = "id:";

/// Finds `[id:<digits>]` tokens of a fixed width in free text.
#[derive(Debug, Clone)]
pub struct IdExtractor {
	pattern: Regex,
}
impl IdExtractor {
	pub fn new(width: usize) -> Result<Self, regex::Error> {
		// ASCII digits only; `\d` would also accept other Unicode decimal digits.
		let pattern = Regex::new(&format!(r"\[id:([0-9]{{{width}}})\]"))?;

		Ok(Self { pattern })
	}

	/// Returns every identifier in order of appearance, repeats included.
	pub fn extract(&self, text: &str) -> Vec<String> {
		self.pattern
			.captures_iter(text)
			.filter_map(|caps| caps.get(1))
			.map(|m| m.as_str().to_string())
			.collect()
	}
}

/// Builds the connector browse query, e.g. `id:111,222`. An empty list yields an empty string.
pub fn format_identifier_query(ids: &[String]) -> String {
	if ids.is_empty() {
		return String::new();
	}

	format!("{IDENTIFIER_QUERY_PREFIX}{}", ids.join(","))
}

pub fn is_identifier_query(query: &str) -> bool {
	query.starts_with(IDENTIFIER_QUERY_PREFIX) && query.chars().any(|ch| ch.is_ascii_digit())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn extractor() -> IdExtractor {
		IdExtractor::new(DEFAULT_ID_WIDTH).expect("pattern must compile")
	}

	#[test]
	fn extracts_in_order_of_appearance() {
		let ids = extractor().extract("[id:1234567890123] foo [id:9999999999999]");

		assert_eq!(ids, vec!["1234567890123".to_string(), "9999999999999".to_string()]);
	}

	#[test]
	fn rejects_other_widths() {
		let ids = extractor().extract("[id:123456789012] and [id:12345678901234] and [id:]");

		assert!(ids.is_empty());
	}

	#[test]
	fn keeps_repeats() {
		let ids = extractor().extract("[id:1111111111111], again [id:1111111111111]");

		assert_eq!(ids.len(), 2);
	}

	#[test]
	fn ignores_non_ascii_digits() {
		// Thirteen Arabic-Indic digits.
		let text = format!("[id:{}]", "\u{0661}".repeat(13));
		let ids = extractor().extract(&text);

		assert!(ids.is_empty());
	}

	#[test]
	fn formats_identifier_query() {
		assert_eq!(format_identifier_query(&[]), "");
		assert_eq!(
			format_identifier_query(&["111".to_string(), "222".to_string()]),
			"id:111,222"
		);
	}

	#[test]
	fn validates_identifier_query() {
		assert!(is_identifier_query("id:111,222"));
		assert!(!is_identifier_query("id:"));
		assert!(!is_identifier_query("nid:111"));
		assert!(!is_identifier_query(""));
	}
}
