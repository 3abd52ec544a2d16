#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read corpus file at {path:?}.")]
	ReadCorpus { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse corpus file at {path:?}.")]
	ParseCorpus { path: std::path::PathBuf, source: serde_json::Error },
	#[error("Invalid corpus: {0}")]
	InvalidCorpus(String),
	#[error("Embedding dimension mismatch: expected {expected}, got {actual}.")]
	DimensionMismatch { expected: usize, actual: usize },
}
