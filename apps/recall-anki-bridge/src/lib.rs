//! The process the search side spawns to hand its identifier query to Anki.
//!
//! Reads one `{"formatted_nids": "..."}` object from stdin and always prints exactly one
//! `{"anki_status", "success", "message"}` object to stdout. Logs go to stderr.

pub mod host;

use std::{io, time::Duration};

use clap::Parser;

use recall_domain::{BridgeRequest, BridgeResponse, BridgeStatus, is_identifier_query};
use recall_providers::{
	Connector,
	connector::{DEFAULT_CONNECTOR_URL, DEFAULT_CONNECTOR_VERSION},
};

use crate::host::{Host, Platform, SystemHost};

#[derive(Debug, Parser)]
#[command(
	version = recall_cli::VERSION,
	rename_all = "kebab",
	styles = recall_cli::styles(),
)]
pub struct Args {
	#[arg(long, value_name = "URL", default_value = DEFAULT_CONNECTOR_URL)]
	pub connector_url: String,
	#[arg(long, value_name = "N", default_value_t = DEFAULT_CONNECTOR_VERSION)]
	pub connector_version: u32,
	#[arg(long, value_name = "MS", default_value_t = 5_000)]
	pub probe_timeout_ms: u64,
	/// Process name looked up by `pgrep -x` or `tasklist`.
	#[arg(long, value_name = "NAME", default_value = "anki")]
	pub program_name: String,
	#[arg(long, value_name = "DIRECTIVES", default_value = "error")]
	pub log_level: String,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	recall_cli::init_tracing(&args.log_level);

	let raw = io::read_to_string(io::stdin()).unwrap_or_else(|err| {
		tracing::error!(error = %err, "Failed to read stdin.");

		String::new()
	});
	let request = parse_request(&raw);
	let response = match Connector::new(args.connector_url, args.connector_version) {
		Ok(connector) => {
			let host = SystemHost::new(
				args.program_name,
				connector,
				Duration::from_millis(args.probe_timeout_ms),
			);

			sync(&host, &request).await
		},
		Err(err) => {
			tracing::error!(error = %err, "Failed to build AnkiConnect client.");

			BridgeResponse::new(
				BridgeStatus::ConnectorUnreachable,
				false,
				format!("Failed to build AnkiConnect client: {err}"),
			)
		},
	};

	println!("{}", serde_json::to_string(&response)?);

	Ok(())
}

/// Absent or malformed input degrades to an empty query.
pub fn parse_request(raw: &str) -> BridgeRequest {
	if raw.trim().is_empty() {
		tracing::error!("No input received on stdin.");

		return BridgeRequest::default();
	}

	match serde_json::from_str(raw) {
		Ok(request) => request,
		Err(err) => {
			tracing::error!(error = %err, "Failed to parse bridge request.");

			BridgeRequest::default()
		},
	}
}

/// Platform check, process check, connector probe, window focus, then browse.
pub async fn sync(host: &dyn Host, request: &BridgeRequest) -> BridgeResponse {
	let query = request.formatted_nids.trim();

	tracing::info!(query, "Received identifier query.");

	if let Platform::Unsupported(os) = host.platform() {
		return BridgeResponse::new(
			BridgeStatus::UnsupportedPlatform,
			false,
			format!("Unsupported operating system: {os}."),
		);
	}
	if !host.is_running() {
		return BridgeResponse::new(BridgeStatus::NotRunning, false, "Anki is not running.");
	}

	match host.probe().await {
		Ok(version) => tracing::info!(%version, "AnkiConnect is reachable."),
		Err(err) => {
			tracing::error!(error = %err, "Failed to contact AnkiConnect.");

			return BridgeResponse::new(
				BridgeStatus::ConnectorUnreachable,
				false,
				format!("Failed to contact AnkiConnect: {err}"),
			);
		},
	}

	if host.focus() && browse(host, query).await {
		BridgeResponse::new(BridgeStatus::Running, true, "Opened Anki browser with query.")
	} else {
		BridgeResponse::new(BridgeStatus::Running, false, "Failed to focus or populate Anki.")
	}
}

async fn browse(host: &dyn Host, query: &str) -> bool {
	if !is_identifier_query(query) {
		tracing::warn!(query, "Refusing to browse without an identifier query.");

		return false;
	}

	match host.browse(query).await {
		Ok(_) => true,
		Err(err) => {
			tracing::error!(error = %err, "Failed to populate Anki browser.");

			false
		},
	}
}
