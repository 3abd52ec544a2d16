use std::{
	io::Write,
	process::{Command, Stdio},
};

use recall_domain::{BridgeReport, BridgeRequest};

/// Hands the final identifier query to the desktop application.
///
/// Implementations never fail: every problem is folded into the returned report.
///
/// `sync` is synchronous and may block the calling thread until the desktop side answers.
/// [`RecallService::search`](crate::RecallService::search) calls it directly from async code, so
/// a search holds its runtime worker for the duration of the hand-off.
pub trait ExternalToolBridge
where
	Self: Send + Sync,
{
	fn sync(&self, identifier_query: &str) -> BridgeReport;
}

/// Runs the bridge executable once per call, blocking until it exits.
#[derive(Debug, Clone)]
pub struct ProcessBridge {
	command: String,
	args: Vec<String>,
}
impl ProcessBridge {
	pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
		Self { command: command.into(), args }
	}

	pub fn from_config(cfg: &recall_config::Bridge) -> Self {
		Self::new(cfg.command.clone(), cfg.args.clone())
	}
}

impl ExternalToolBridge for ProcessBridge {
	fn sync(&self, identifier_query: &str) -> BridgeReport {
		let request = BridgeRequest { formatted_nids: identifier_query.to_string() };
		let payload = match serde_json::to_vec(&request) {
			Ok(payload) => payload,
			Err(err) => return BridgeReport::unknown(format!("Failed to encode request: {err}.")),
		};

		tracing::debug!(command = %self.command, identifier_query, "Invoking Anki bridge.");

		let mut child = match Command::new(&self.command)
			.args(&self.args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
		{
			Ok(child) => child,
			Err(err) => {
				tracing::error!(
					command = %self.command,
					error = %err,
					"Failed to start Anki bridge."
				);

				return BridgeReport::unknown(format!("Failed to start bridge command: {err}."));
			},
		};

		// Dropping stdin closes the pipe so the bridge sees end of input.
		if let Some(mut stdin) = child.stdin.take()
			&& let Err(err) = stdin.write_all(&payload)
		{
			tracing::warn!(error = %err, "Failed to write Anki bridge request.");
		}

		let output = match child.wait_with_output() {
			Ok(output) => output,
			Err(err) => {
				tracing::error!(error = %err, "Failed to wait for Anki bridge.");

				return BridgeReport::unknown(format!("Failed to wait for bridge command: {err}."));
			},
		};

		if !output.stderr.is_empty() {
			tracing::debug!(
				stderr = %String::from_utf8_lossy(&output.stderr).trim(),
				"Anki bridge wrote to stderr."
			);
		}

		let stdout = String::from_utf8_lossy(&output.stdout);
		let report = BridgeReport::from_stdout(&stdout);

		if report.status == recall_domain::BridgeStatus::Unknown {
			tracing::warn!(stdout = %stdout.trim(), "Unrecognized Anki bridge response.");
		}

		report
	}
}
