//! Similarity signals between a normalized query and a knowledge-base entry.
//!
//! Two signals feed the combined score:
//! - question similarity: binary cosine between the query tokens and the
//!   entry's normalized question
//! - keyword score: share of distinct query tokens found among the entry's
//!   stemmed keywords
//!
//! All scores are in `[0, 1]`.

use std::collections::HashSet;

use crate::knowledge::Entry;

// ============================================================================
// Scoring Weights
// ============================================================================

/// Weights for the two similarity signals
struct ScoreWeights {
    /// Cosine similarity against the canonical question
    question: f64,
    /// Overlap with curated keywords
    keyword: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            question: 0.4,
            keyword: 0.6,
        }
    }
}

// ============================================================================
// Signals
// ============================================================================

/// Cosine similarity over token presence. Repeated tokens count once.
///
/// Returns 0 when either side has no tokens.
pub fn question_similarity(query_tokens: &[String], question_tokens: &[String]) -> f64 {
    let query: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let question: HashSet<&str> = question_tokens.iter().map(String::as_str).collect();

    if query.is_empty() || question.is_empty() {
        return 0.0;
    }

    let dot = query.intersection(&question).count() as f64;
    // sqrt of the product, not product of sqrts: identical sets give exactly 1
    let magnitude = ((query.len() * question.len()) as f64).sqrt();

    dot / magnitude
}

/// Fraction of distinct query tokens that appear among the entry's stemmed
/// keywords. Keywords absent from the query do not lower the score.
pub fn keyword_score(query_tokens: &[String], entry: &Entry) -> f64 {
    let query: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let keywords = entry.keyword_stems();

    let matches = query.iter().filter(|token| keywords.contains(**token)).count();

    matches as f64 / query.len().max(1) as f64
}

/// `0.4 * question_similarity + 0.6 * keyword_score`
pub fn combined_score(query_tokens: &[String], entry: &Entry) -> f64 {
    let weights = ScoreWeights::default();

    question_similarity(query_tokens, entry.question_tokens()) * weights.question
        + keyword_score(query_tokens, entry) * weights.keyword
}

// ============================================================================
// Tests
// ============================================================================
