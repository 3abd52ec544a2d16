use std::cmp::Ordering;

use crate::{Error, Result};

/// A corpus row index paired with its cosine similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIndex {
	pub index: usize,
	pub score: f32,
}

/// Exhaustive cosine similarity search over a read-only embedding matrix.
#[derive(Debug, Clone)]
pub struct VectorStore {
	rows: Vec<Vec<f32>>,
	// Row L2 norms, with zero norms replaced by 1.0.
	norms: Vec<f32>,
	dimensions: usize,
}
impl VectorStore {
	pub fn new(rows: Vec<Vec<f32>>) -> Result<Self> {
		let dimensions = rows.first().map(Vec::len).unwrap_or(0);

		for row in &rows {
			if row.len() != dimensions {
				return Err(Error::DimensionMismatch { expected: dimensions, actual: row.len() });
			}
		}

		let norms = rows
			.iter()
			.map(|row| {
				let norm = l2_norm(row);

				if norm == 0.0 { 1.0 } else { norm }
			})
			.collect();

		Ok(Self { rows, norms, dimensions })
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	/// Returns up to `n` rows by descending cosine similarity, ties by ascending row index.
	///
	/// A zero query is compared unnormalized, which scores every row at 0.0.
	pub fn top_n(&self, query: &[f32], n: usize) -> Result<Vec<ScoredIndex>> {
		if query.len() != self.dimensions {
			return Err(Error::DimensionMismatch {
				expected: self.dimensions,
				actual: query.len(),
			});
		}

		let query_norm = l2_norm(query);
		let query_scale = if query_norm == 0.0 { 1.0 } else { query_norm };
		let mut scored: Vec<ScoredIndex> = self
			.rows
			.iter()
			.zip(&self.norms)
			.enumerate()
			.map(|(index, (row, norm))| ScoredIndex {
				index,
				score: dot(row, query) / (norm * query_scale),
			})
			.collect();
		let n = n.min(scored.len());

		if n == 0 {
			return Ok(Vec::new());
		}
		if n < scored.len() {
			scored.select_nth_unstable_by(n - 1, cmp_scored);
			scored.truncate(n);
		}

		scored.sort_unstable_by(cmp_scored);

		Ok(scored)
	}
}

fn cmp_scored(a: &ScoredIndex, b: &ScoredIndex) -> Ordering {
	cmp_f32_desc(a.score, b.score).then_with(|| a.index.cmp(&b.index))
}

// NaN sorts after every number.
fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn l2_norm(values: &[f32]) -> f32 {
	values.iter().map(|v| v * v).sum::<f32>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn store(rows: &[&[f32]]) -> VectorStore {
		VectorStore::new(rows.iter().map(|row| row.to_vec()).collect()).expect("valid matrix")
	}

	fn indexes(hits: &[ScoredIndex]) -> Vec<usize> {
		hits.iter().map(|hit| hit.index).collect()
	}

	#[test]
	fn ranks_by_cosine_similarity() {
		let store = store(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
		let hits = store.top_n(&[2.0, 0.0], 2).expect("search failed");

		assert_eq!(indexes(&hits), vec![0, 2]);
		assert!((hits[0].score - 1.0).abs() < 1e-6);
		assert!((hits[1].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
	}

	#[test]
	fn magnitude_does_not_change_ranking() {
		let store = store(&[&[10.0, 0.0], &[0.6, 0.8]]);
		let hits = store.top_n(&[0.6, 0.8], 2).expect("search failed");

		assert_eq!(indexes(&hits), vec![1, 0]);
	}

	#[test]
	fn ties_keep_corpus_order() {
		let store = store(&[&[0.0, 1.0], &[1.0, 0.0], &[2.0, 0.0], &[3.0, 0.0], &[0.5, 0.0]]);
		let hits = store.top_n(&[1.0, 0.0], 3).expect("search failed");

		assert_eq!(indexes(&hits), vec![1, 2, 3]);
	}

	#[test]
	fn zero_rows_and_zero_query_do_not_divide_by_zero() {
		let store = store(&[&[0.0, 0.0], &[1.0, 0.0]]);
		let hits = store.top_n(&[1.0, 0.0], 2).expect("search failed");

		assert_eq!(indexes(&hits), vec![1, 0]);
		assert_eq!(hits[1].score, 0.0);

		let hits = store.top_n(&[0.0, 0.0], 2).expect("search failed");

		assert!(hits.iter().all(|hit| hit.score == 0.0));
		assert_eq!(indexes(&hits), vec![0, 1]);
	}

	#[test]
	fn n_is_clamped_to_corpus_size() {
		let store = store(&[&[1.0], &[-1.0]]);

		assert_eq!(store.top_n(&[1.0], 10).expect("search failed").len(), 2);
		assert!(store.top_n(&[1.0], 0).expect("search failed").is_empty());
	}

	#[test]
	fn rejects_query_of_wrong_width() {
		let store = store(&[&[1.0, 0.0, 0.0]]);
		let err = store.top_n(&[1.0, 0.0], 1).expect_err("expected mismatch");

		assert!(matches!(err, Error::DimensionMismatch { expected: 3, actual: 2 }));
	}

	#[test]
	fn rejects_ragged_matrix() {
		let err = VectorStore::new(vec![vec![1.0, 0.0], vec![1.0]]).expect_err("expected error");

		assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 1 }));
	}

	#[test]
	fn nan_scores_sort_last() {
		let store = store(&[&[f32::NAN, 0.0], &[-1.0, 0.0], &[1.0, 0.0]]);
		let hits = store.top_n(&[1.0, 0.0], 3).expect("search failed");

		assert_eq!(indexes(&hits), vec![2, 1, 0]);
	}
}
