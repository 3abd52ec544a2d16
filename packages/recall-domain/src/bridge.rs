//! Wire types for the Anki bridge process.
//!
//! The search side writes one [`BridgeRequest`] to the process's stdin and reads one
//! [`BridgeResponse`] from its stdout. The exit code carries no meaning.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
	#[serde(default)]
	pub formatted_nids: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
	pub anki_status: String,
	pub success: bool,
	#[serde(default)]
	pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeStatus {
	Running,
	NotRunning,
	ConnectorUnreachable,
	UnsupportedPlatform,
	Unknown,
}

/// Outcome of one bridge invocation as seen by the search pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeReport {
	pub status: BridgeStatus,
	pub succeeded: bool,
	pub message: String,
}

impl BridgeStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Running => "running",
			Self::NotRunning => "not_running",
			Self::ConnectorUnreachable => "connector_unreachable",
			Self::UnsupportedPlatform => "unsupported_platform",
			Self::Unknown => "unknown",
		}
	}

	/// Maps a wire status string; anything unrecognized is [`BridgeStatus::Unknown`].
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"running" => Self::Running,
			"not_running" => Self::NotRunning,
			"connector_unreachable" => Self::ConnectorUnreachable,
			"unsupported_platform" => Self::UnsupportedPlatform,
			_ => Self::Unknown,
		}
	}
}

impl std::fmt::Display for BridgeStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl BridgeResponse {
	pub fn new(status: BridgeStatus, success: bool, message: impl Into<String>) -> Self {
		Self { anki_status: status.as_str().to_string(), success, message: message.into() }
	}
}

impl BridgeReport {
	pub fn unknown(message: impl Into<String>) -> Self {
		Self { status: BridgeStatus::Unknown, succeeded: false, message: message.into() }
	}

	/// Classifies raw bridge stdout. Empty or malformed output never errors; it degrades to an
	/// unknown, unsuccessful report.
	pub fn from_stdout(stdout: &str) -> Self {
		let trimmed = stdout.trim();

		if trimmed.is_empty() {
			return Self::unknown("Bridge produced no output.");
		}

		match serde_json::from_str::<BridgeResponse>(trimmed) {
			Ok(response) => response.into(),
			Err(err) => Self::unknown(format!("Bridge output is not a valid response: {err}.")),
		}
	}
}

impl From<BridgeResponse> for BridgeReport {
	fn from(response: BridgeResponse) -> Self {
		let status = BridgeStatus::parse(&response.anki_status);
		// An unclassifiable status cannot count as success.
		let succeeded = response.success && status != BridgeStatus::Unknown;

		Self { status, succeeded, message: response.message }
	}
}
