//! Cosine-similarity ranking over stored embeddings. Full linear scan; the
//! contract (top-k, stable ties) leaves room for an ANN index later.

use std::cmp::Ordering;

/// Index into the candidate set plus its similarity score, best first.
pub type Ranked = Vec<(usize, f32)>;

/// Ranks `candidates` against `query` and returns the `min(k, n)` best as
/// (candidate index, score), scores non-increasing.
///
/// Equal scores keep the candidates' original order (stable sort), so results
/// are deterministic. Zero-norm vectors score -1 instead of dividing by zero.
pub fn rank(query: &[f32], candidates: &[Vec<f32>], k: usize) -> Ranked {
    if k == 0 || candidates.is_empty() {
        return Vec::new();
    }
    let mut scored: Ranked = candidates
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_similarity(query, v)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Cosine similarity in [-1, 1]. A zero-norm side yields -1 (minimal
/// similarity) so degenerate embeddings never rank above real ones.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for i in 0..n {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }
    norm_a += a[n..].iter().map(|x| x * x).sum::<f32>();
    norm_b += b[n..].iter().map(|x| x * x).sum::<f32>();
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return -1.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}
