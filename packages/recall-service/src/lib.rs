pub mod bridge;
pub mod events;
pub mod search;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use bridge::{ExternalToolBridge, ProcessBridge};
pub use error::{Error, Result};
pub use events::{NoopListener, SearchEvent, SearchListener};
pub use search::{
	SearchDiagnostics, SearchRequest, SearchResult,
	ranking::{LlmRanking, reconcile_llm_ranks},
	rerank::{RerankOutcome, reconcile_rerank, rerank_cards},
};

use recall_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, ProviderConfig};
use recall_domain::IdExtractor;
use recall_providers::{RerankHit, embedding, generation, rerank};
use recall_storage::Corpus;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

pub trait RerankProvider
where
	Self: Send + Sync,
{
	/// Returns hits ordered by descending relevance. `top_n` of `None` means unbounded.
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
		top_n: Option<u32>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RerankHit>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}

/// The search pipeline over one loaded corpus. Corpus and config are read-only; every search
/// builds its own result.
pub struct RecallService {
	pub cfg: Config,
	pub corpus: Corpus,
	pub providers: Providers,
	pub bridge: Arc<dyn ExternalToolBridge>,
	extractor: IdExtractor,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(embedding::embed_query(cfg, query))
	}
}

impl RerankProvider for DefaultProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
		top_n: Option<u32>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RerankHit>>> {
		Box::pin(rerank::rerank(cfg, query, docs, top_n))
	}
}

impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(generation::generate(cfg, prompt))
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		rerank: Arc<dyn RerankProvider>,
		generation: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { embedding, rerank, generation }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), rerank: provider.clone(), generation: provider }
	}
}

impl RecallService {
	/// HTTP providers and the configured bridge command.
	pub fn new(cfg: Config, corpus: Corpus) -> Result<Self> {
		let bridge = Arc::new(ProcessBridge::from_config(&cfg.bridge));

		Self::with_parts(cfg, corpus, Providers::default(), bridge)
	}

	pub fn with_parts(
		cfg: Config,
		corpus: Corpus,
		providers: Providers,
		bridge: Arc<dyn ExternalToolBridge>,
	) -> Result<Self> {
		let expected = cfg.providers.embedding.dimensions as usize;

		if corpus.dimensions() != expected {
			return Err(Error::DimensionMismatch { expected, actual: corpus.dimensions() });
		}

		let extractor = IdExtractor::new(cfg.search.id_width).map_err(|err| {
			Error::InvalidRequest { message: format!("Invalid search.id_width: {err}") }
		})?;

		Ok(Self { cfg, corpus, providers, bridge, extractor })
	}
}
