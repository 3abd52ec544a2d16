use std::{
	io::Write,
	process::{Command, Output, Stdio},
};

use recall_domain::{BridgeReport, BridgeStatus};

fn run_bridge(stdin: &str) -> Output {
	let mut child = Command::new(env!("CARGO_BIN_EXE_recall-anki-bridge"))
		.arg("--probe-timeout-ms")
		.arg("500")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("Failed to start bridge binary.");

	{
		let mut pipe = child.stdin.take().expect("Missing bridge stdin.");

		pipe.write_all(stdin.as_bytes()).expect("Failed to write bridge stdin.");
	}

	child.wait_with_output().expect("Failed to wait for bridge binary.")
}

fn single_report(output: &Output) -> BridgeReport {
	let stdout = String::from_utf8(output.stdout.clone()).expect("Bridge stdout must be UTF-8.");

	assert!(output.status.success(), "bridge exited with {:?}", output.status);
	assert!(stdout.ends_with('\n'));
	assert_eq!(stdout.lines().count(), 1, "unexpected stdout: {stdout:?}");

	let json: serde_json::Value =
		serde_json::from_str(stdout.trim()).expect("Bridge stdout must be one JSON object.");
	let object = json.as_object().expect("Bridge stdout must be a JSON object.");

	assert_eq!(object.len(), 3);
	assert!(object["anki_status"].is_string());
	assert!(object["success"].is_boolean());
	assert!(object["message"].is_string());

	let report = BridgeReport::from_stdout(&stdout);

	assert_ne!(report.status, BridgeStatus::Unknown, "unclassified stdout: {stdout:?}");

	report
}

fn assert_platform_outcome(report: &BridgeReport) {
	if cfg!(target_os = "linux") {
		assert_eq!(report.status, BridgeStatus::UnsupportedPlatform);
		assert!(!report.succeeded);
		assert_eq!(report.message, "Unsupported operating system: linux.");
	}
}

#[test]
fn identifier_request_yields_one_response_line() {
	let output = run_bridge(r#"{"formatted_nids":"id:1234567890123"}"#);
	let report = single_report(&output);

	assert_platform_outcome(&report);
}

#[test]
fn empty_stdin_still_yields_one_response_line() {
	let output = run_bridge("");
	let report = single_report(&output);
	let stderr = String::from_utf8_lossy(&output.stderr);

	assert!(stderr.contains("No input received on stdin."));

	assert_platform_outcome(&report);
}

#[test]
fn malformed_stdin_logs_to_stderr_only() {
	let output = run_bridge("garbage");
	let report = single_report(&output);
	let stdout = String::from_utf8_lossy(&output.stdout);
	let stderr = String::from_utf8_lossy(&output.stderr);

	assert!(stderr.contains("Failed to parse bridge request."));
	assert!(!stdout.contains("Failed to parse bridge request."));

	assert_platform_outcome(&report);
}
