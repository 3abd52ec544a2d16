use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use recall_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn sample_toml_with(edit: impl FnOnce(&mut toml::Table)) -> String {
	let mut value = sample_value();
	let root = value.as_table_mut().expect("Template config must be a table.");

	edit(root);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn section<'a>(root: &'a mut toml::Table, path: &[&str]) -> &'a mut toml::Table {
	let mut table = root;

	for key in path {
		table = table
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	table
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("recall_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> recall_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = recall_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

#[test]
fn sample_config_is_valid() {
	let cfg =
		load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string()).expect("Expected valid config.");

	assert_eq!(cfg.search.top_n, 200);
	assert_eq!(cfg.search.rerank_max_results, Some(40));
	assert_eq!(cfg.search.id_width, 13);
	assert_eq!(cfg.providers.embedding.dimensions, 4096);
	assert_eq!(
		cfg.providers.rerank.default_headers.get("X-Client-Name").and_then(|v| v.as_str()),
		Some("flashcard-search")
	);
}

#[test]
fn relative_corpus_path_resolves_against_config_dir() {
	let cfg =
		load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string()).expect("Expected valid config.");

	assert_eq!(cfg.corpus.path, env::temp_dir().join("corpus.json"));
}

#[test]
fn absolute_corpus_path_is_kept() {
	let absolute = env::temp_dir().join("elsewhere").join("cards.json");
	let payload = sample_toml_with(|root| {
		section(root, &["corpus"]).insert(
			"path".to_string(),
			Value::String(absolute.to_string_lossy().into_owned()),
		);
	});
	let cfg = load_payload(payload).expect("Expected valid config.");

	assert_eq!(cfg.corpus.path, absolute);
}

#[test]
fn blank_instruction_is_normalized_away() {
	let payload = sample_toml_with(|root| {
		section(root, &["providers", "embedding"])
			.insert("instruction".to_string(), Value::String("   ".to_string()));
	});
	let cfg = load_payload(payload).expect("Expected valid config.");

	assert!(cfg.providers.embedding.instruction.is_none());
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("recall_config_test_missing.toml");
	let err = recall_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn invalid_toml_reports_parse_error() {
	let err = load_payload("[service\n".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn top_n_must_be_positive() {
	let payload = sample_toml_with(|root| {
		section(root, &["search"]).insert("top_n".to_string(), Value::Integer(0));
	});
	let err = load_payload(payload).expect_err("Expected top_n validation error.");

	assert!(
		err.to_string().contains("search.top_n must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn rerank_max_results_is_optional_but_positive() {
	let mut cfg = base_config();

	cfg.search.rerank_max_results = None;

	assert!(recall_config::validate(&cfg).is_ok());

	cfg.search.rerank_max_results = Some(0);

	let err = recall_config::validate(&cfg).expect_err("Expected rerank_max_results error.");

	assert!(
		err.to_string().contains("search.rerank_max_results must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn api_keys_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.providers.generation.api_key = "  ".to_string();

	let err = recall_config::validate(&cfg).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider generation api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn temperature_must_be_in_range() {
	let mut cfg = base_config();

	cfg.providers.generation.temperature = f32::NAN;

	assert!(recall_config::validate(&cfg).is_err());

	cfg.providers.generation.temperature = 2.5;

	let err = recall_config::validate(&cfg).expect_err("Expected temperature validation error.");

	assert!(
		err.to_string().contains("providers.generation.temperature must be in the range 0.0-2.0."),
		"Unexpected error: {err}"
	);
}

#[test]
fn bridge_command_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.bridge.command = String::new();

	let err = recall_config::validate(&cfg).expect_err("Expected bridge validation error.");

	assert!(
		err.to_string().contains("bridge.command must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn prompt_header_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.search.prompt_header = "\n".to_string();

	assert!(recall_config::validate(&cfg).is_err());
}
