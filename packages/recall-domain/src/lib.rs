pub mod bridge;
pub mod card;
pub mod nid;
pub mod prompt;

pub use bridge::{BridgeReport, BridgeRequest, BridgeResponse, BridgeStatus};
pub use card::{
	Flashcard, GenerativeRankedCard, RelevanceRankedCard, SimilarityRankedCard, ranks_are_dense,
};
pub use nid::{DEFAULT_ID_WIDTH, IdExtractor, format_identifier_query, is_identifier_query};
