use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;

use recall_domain::Flashcard;

use crate::{Error, Result, vector::VectorStore};

/// The flashcard table and its embedding matrix. Row `i` of the matrix embeds card `i`.
#[derive(Debug, Clone)]
pub struct Corpus {
	cards: Vec<Flashcard>,
	vectors: VectorStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusStats {
	pub flashcards: usize,
	pub embeddings: usize,
	pub dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct CorpusFile {
	cards: Vec<Flashcard>,
	embeddings: Vec<Vec<f32>>,
}

impl Corpus {
	/// Loads `{ "cards": [{ "id", "content" }], "embeddings": [[f32]] }`.
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|err| Error::ReadCorpus { path: path.to_path_buf(), source: err })?;
		let file: CorpusFile = serde_json::from_str(&raw)
			.map_err(|err| Error::ParseCorpus { path: path.to_path_buf(), source: err })?;
		let corpus = Self::from_parts(file.cards, file.embeddings)?;
		let stats = corpus.stats();

		tracing::info!(
			path = %path.display(),
			flashcards = stats.flashcards,
			dimensions = stats.dimensions,
			"Loaded flashcard corpus."
		);

		Ok(corpus)
	}

	pub fn from_parts(cards: Vec<Flashcard>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
		if cards.is_empty() {
			return Err(Error::InvalidCorpus("corpus has no cards".to_string()));
		}
		if cards.len() != embeddings.len() {
			return Err(Error::InvalidCorpus(format!(
				"{} cards but {} embeddings",
				cards.len(),
				embeddings.len()
			)));
		}

		let mut seen = HashSet::with_capacity(cards.len());

		for card in &cards {
			if card.id.trim().is_empty() {
				return Err(Error::InvalidCorpus("card id must be non-empty".to_string()));
			}
			if !seen.insert(card.id.as_str()) {
				tracing::warn!(id = %card.id, "Duplicate card id in corpus.");
			}
		}

		let vectors = VectorStore::new(embeddings)?;

		if vectors.dimensions() == 0 {
			return Err(Error::InvalidCorpus(
				"embeddings must have at least one dimension".to_string(),
			));
		}

		Ok(Self { cards, vectors })
	}

	pub fn card(&self, index: usize) -> Option<&Flashcard> {
		self.cards.get(index)
	}

	pub fn vectors(&self) -> &VectorStore {
		&self.vectors
	}

	pub fn dimensions(&self) -> usize {
		self.vectors.dimensions()
	}

	pub fn len(&self) -> usize {
		self.cards.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cards.is_empty()
	}

	pub fn stats(&self) -> CorpusStats {
		CorpusStats {
			flashcards: self.cards.len(),
			embeddings: self.vectors.len(),
			dimensions: self.vectors.dimensions(),
		}
	}
}
