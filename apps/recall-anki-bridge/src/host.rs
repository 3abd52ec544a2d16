//! Everything the bridge needs from the machine it runs on.

use std::{future::Future, pin::Pin, process::Command, time::Duration};

use serde_json::Value;

use recall_providers::Connector;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const APP_NAME: &str = "Anki";
const WINDOWS_FOCUS_SCRIPT: &str = r#"
Add-Type @"
	using System;
	using System.Runtime.InteropServices;
	public class Win32 {
		[DllImport("user32.dll")]
		public static extern bool SetForegroundWindow(IntPtr hWnd);
		[DllImport("user32.dll")]
		public static extern IntPtr FindWindow(string lpClassName, string lpWindowName);
	}
"@
$hwnd = [Win32]::FindWindow($null, "Anki")
[Win32]::SetForegroundWindow($hwnd)
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
	MacOs,
	Windows,
	Unsupported(String),
}
impl Platform {
	pub fn current() -> Self {
		Self::from_os(std::env::consts::OS)
	}

	pub fn from_os(os: &str) -> Self {
		match os {
			"macos" => Self::MacOs,
			"windows" => Self::Windows,
			other => Self::Unsupported(other.to_string()),
		}
	}
}

pub trait Host
where
	Self: Send + Sync,
{
	fn platform(&self) -> Platform;

	fn is_running(&self) -> bool;

	fn focus(&self) -> bool;

	/// Connector version handshake. Errors mean the connector is unreachable.
	fn probe(&self) -> BoxFuture<'_, color_eyre::Result<Value>>;

	fn browse<'a>(&'a self, query: &'a str) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

/// The real desktop: process listing and window focus through OS tools, AnkiConnect over HTTP.
pub struct SystemHost {
	program_name: String,
	connector: Connector,
	probe_timeout: Duration,
}
impl SystemHost {
	pub fn new(
		program_name: impl Into<String>,
		connector: Connector,
		probe_timeout: Duration,
	) -> Self {
		Self { program_name: program_name.into(), connector, probe_timeout }
	}
}

impl Host for SystemHost {
	fn platform(&self) -> Platform {
		Platform::current()
	}

	fn is_running(&self) -> bool {
		let listed = match self.platform() {
			Platform::MacOs => Command::new("pgrep")
				.arg("-x")
				.arg(&self.program_name)
				.output()
				.map(|output| output.status.success()),
			Platform::Windows => {
				let image = format!("{}.exe", self.program_name);

				Command::new("tasklist")
					.arg("/FI")
					.arg(format!("IMAGENAME eq {image}"))
					.output()
					.map(|output| {
						tasklist_contains(&String::from_utf8_lossy(&output.stdout), &image)
					})
			},
			Platform::Unsupported(_) => return false,
		};

		listed.unwrap_or_else(|err| {
			tracing::error!(
				program = %self.program_name,
				error = %err,
				"Failed to list processes."
			);

			false
		})
	}

	fn focus(&self) -> bool {
		let output = match self.platform() {
			Platform::MacOs => Command::new("osascript")
				.arg("-e")
				.arg(format!("tell application \"{APP_NAME}\" to activate"))
				.output(),
			Platform::Windows => Command::new("powershell").arg(WINDOWS_FOCUS_SCRIPT).output(),
			Platform::Unsupported(_) => return false,
		};

		match output {
			Ok(output) => output.status.success(),
			Err(err) => {
				tracing::error!(error = %err, "Failed to bring Anki to the front.");

				false
			},
		}
	}

	fn probe(&self) -> BoxFuture<'_, color_eyre::Result<Value>> {
		Box::pin(self.connector.probe_version(self.probe_timeout))
	}

	fn browse<'a>(&'a self, query: &'a str) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(self.connector.gui_browse(query))
	}
}

/// `tasklist` prints an informational line instead of a table when nothing matches the filter.
fn tasklist_contains(stdout: &str, image: &str) -> bool {
	stdout.to_ascii_lowercase().contains(&image.to_ascii_lowercase())
}
