mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use uuid::Uuid;

use recall_domain::Flashcard;

/// Scratch directory under the system temp dir, removed on drop.
pub struct TestDir {
	path: PathBuf,
}
impl TestDir {
	pub fn new(prefix: &str) -> Result<Self> {
		let path = env::temp_dir().join(format!("{prefix}_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&path)?;

		Ok(Self { path })
	}

	pub fn join(&self, name: &str) -> PathBuf {
		self.path.join(name)
	}
}
impl Drop for TestDir {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.path);
	}
}

/// A bridge command that records its stdin and prints canned stdout.
pub struct ScriptedBridge {
	pub command: String,
	pub args: Vec<String>,
	stdin_path: PathBuf,
}
impl ScriptedBridge {
	/// Writes `stdout` to a file inside `dir` and returns a `sh -c` command that saves its stdin
	/// next to it and then prints the file.
	pub fn new(dir: &TestDir, stdout: &str) -> Result<Self> {
		let stdout_path = dir.join(&format!("bridge_stdout_{}.txt", Uuid::new_v4().simple()));
		let stdin_path = dir.join(&format!("bridge_stdin_{}.json", Uuid::new_v4().simple()));

		fs::write(&stdout_path, stdout)?;

		let script = format!(
			"cat > {}; cat {}",
			shell_quote(&stdin_path)?,
			shell_quote(&stdout_path)?
		);

		Ok(Self { command: "sh".to_string(), args: vec!["-c".to_string(), script], stdin_path })
	}

	/// The request the bridge command received, once it has run.
	pub fn received_stdin(&self) -> Result<String> {
		Ok(fs::read_to_string(&self.stdin_path)?)
	}
}

/// Three cards with 13-digit ids and 3-dimensional embeddings.
///
/// Against the query `[1.0, 0.0, 0.0]` the cosine similarities are 1.0, about 0.707, and 0.0.
pub fn sample_corpus() -> (Vec<Flashcard>, Vec<Vec<f32>>) {
	let cards = vec![
		card("1700000000001", "Air bronchograms suggest alveolar consolidation."),
		card("1700000000002", "Kerley B lines suggest interstitial edema."),
		card("1700000000003", "A deep sulcus sign suggests pneumothorax on a supine film."),
	];
	let embeddings = vec![vec![1.0, 0.0, 0.0], vec![1.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];

	(cards, embeddings)
}

pub fn card(id: &str, content: &str) -> Flashcard {
	Flashcard { id: id.to_string(), content: content.to_string() }
}

/// Writes a corpus file in the format read by the storage loader.
pub fn write_corpus(
	dir: &TestDir,
	name: &str,
	cards: &[Flashcard],
	embeddings: &[Vec<f32>],
) -> Result<PathBuf> {
	let path = dir.join(name);
	let payload = serde_json::json!({ "cards": cards, "embeddings": embeddings });

	fs::write(&path, serde_json::to_vec_pretty(&payload)?)?;

	Ok(path)
}

fn shell_quote(path: &Path) -> Result<String> {
	let raw = path
		.to_str()
		.ok_or_else(|| Error::Message(format!("Path {path:?} is not valid UTF-8.")))?;

	if raw.contains('\'') {
		return Err(Error::Message(format!("Path {raw} contains a single quote.")));
	}

	Ok(format!("'{raw}'"))
}
