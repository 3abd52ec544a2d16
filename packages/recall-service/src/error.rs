pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Embedding dimension mismatch: expected {expected}, got {actual}.")]
	DimensionMismatch { expected: usize, actual: usize },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<recall_storage::Error> for Error {
	fn from(err: recall_storage::Error) -> Self {
		match err {
			recall_storage::Error::DimensionMismatch { expected, actual } =>
				Self::DimensionMismatch { expected, actual },
			other => Self::Storage { message: other.to_string() },
		}
	}
}
