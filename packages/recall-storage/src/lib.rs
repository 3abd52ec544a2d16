pub mod corpus;
pub mod vector;

mod error;

pub use corpus::{Corpus, CorpusStats};
pub use error::Error;
pub use vector::{ScoredIndex, VectorStore};

pub type Result<T, E = Error> = std::result::Result<T, E>;
