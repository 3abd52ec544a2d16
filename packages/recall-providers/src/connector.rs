//! Client for the AnkiConnect loopback HTTP interface.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_CONNECTOR_URL: &str = "http://localhost:8765";
pub const DEFAULT_CONNECTOR_VERSION: u32 = 6;

const ACTION_VERSION: &str = "version";
const ACTION_GUI_BROWSE: &str = "guiBrowse";

#[derive(Debug, Clone)]
pub struct Connector {
	client: Client,
	url: String,
	version: u32,
}
impl Connector {
	pub fn new(url: impl Into<String>, version: u32) -> Result<Self> {
		let client = Client::builder().build()?;

		Ok(Self { client, url: url.into(), version })
	}

	/// Version handshake. `timeout` bounds the whole request so an absent connector fails fast.
	pub async fn probe_version(&self, timeout: Duration) -> Result<Value> {
		self.invoke(ACTION_VERSION, None, Some(timeout)).await
	}

	/// Opens the card browser filtered by `query`.
	pub async fn gui_browse(&self, query: &str) -> Result<Value> {
		let params = serde_json::json!({ "query": query });

		self.invoke(ACTION_GUI_BROWSE, Some(params), None).await
	}

	async fn invoke(
		&self,
		action: &str,
		params: Option<Value>,
		timeout: Option<Duration>,
	) -> Result<Value> {
		let body = request_body(action, self.version, params);
		let mut req = self.client.post(&self.url).json(&body);

		if let Some(timeout) = timeout {
			req = req.timeout(timeout);
		}

		tracing::debug!(action, url = %self.url, "Calling connector.");

		let json: Value = req.send().await?.error_for_status()?.json().await?;

		parse_connector_response(json)
	}
}

fn request_body(action: &str, version: u32, params: Option<Value>) -> Value {
	let mut body = serde_json::json!({ "action": action, "version": version });

	if let Some(params) = params {
		body["params"] = params;
	}

	body
}

/// Returns the `result` field, or an error when the response carries a non-empty `error`.
fn parse_connector_response(json: Value) -> Result<Value> {
	match json.get("error") {
		None | Some(Value::Null) => {},
		Some(Value::String(message)) if message.is_empty() => {},
		Some(Value::String(message)) => {
			return Err(eyre::eyre!("Connector returned error: {message}"));
		},
		Some(other) => return Err(eyre::eyre!("Connector returned error: {other}")),
	}

	Ok(json.get("result").cloned().unwrap_or(Value::Null))
}
