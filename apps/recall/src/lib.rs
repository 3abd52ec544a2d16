pub mod render;

use std::{
	io::{self, Write},
	path::PathBuf,
};

use clap::Parser;

use recall_service::{RecallService, SearchRequest};
use recall_storage::Corpus;

use crate::render::ProgressPrinter;

#[derive(Debug, Parser)]
#[command(
	version = recall_cli::VERSION,
	rename_all = "kebab",
	styles = recall_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Runs one search and exits. Without it, queries are read from stdin until `exit`.
	#[arg(long, short = 'q', value_name = "TEXT")]
	pub query: Option<String>,
	/// Prints the full search result as JSON instead of tables.
	#[arg(long)]
	pub json: bool,
	/// Overrides `service.log_level`.
	#[arg(long, value_name = "DIRECTIVES")]
	pub log_level: Option<String>,
	/// Overrides `search.top_n`.
	#[arg(long, value_name = "N")]
	pub top_n: Option<u32>,
	/// Overrides `search.rerank_max_results`.
	#[arg(long, value_name = "N")]
	pub rerank_max_results: Option<u32>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = recall_config::load(&args.config)?;

	recall_cli::init_tracing(args.log_level.as_deref().unwrap_or(&config.service.log_level));

	let corpus = Corpus::load(&config.corpus.path)?;
	let service = RecallService::new(config, corpus)?;

	match args.query.as_deref() {
		Some(query) => search_once(&service, &args, query).await,
		None => interactive(&service, &args).await,
	}
}

async fn search_once(service: &RecallService, args: &Args, query: &str) -> color_eyre::Result<()> {
	let req = SearchRequest {
		query: query.to_string(),
		top_n: args.top_n,
		rerank_max_results: args.rerank_max_results,
	};
	let progress = ProgressPrinter::new(!args.json);
	let result = service.search(req, &progress).await?;

	if args.json {
		let json = serde_json::to_string_pretty(&result)?;

		println!("{json}");
	} else {
		print!("{}", render::render_result(&result));
	}

	Ok(())
}

async fn interactive(service: &RecallService, args: &Args) -> color_eyre::Result<()> {
	let mut line = String::new();

	loop {
		print!("query> ");
		io::stdout().flush()?;
		line.clear();

		if io::stdin().read_line(&mut line)? == 0 {
			break;
		}

		let query = line.trim();

		if is_exit_command(query) {
			break;
		}
		if query.is_empty() {
			continue;
		}

		// A failed search should not end the session.
		if let Err(err) = search_once(service, args, query).await {
			eprintln!("Error: {err}");
		}
	}

	Ok(())
}

fn is_exit_command(input: &str) -> bool {
	matches!(input.to_ascii_lowercase().as_str(), "exit" | "quit")
}
