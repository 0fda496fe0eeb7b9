//! Best-match selection, confidence tiers, category suggestions and
//! greeting detection.
//!
//! A [`Matcher`] borrows an immutable [`KnowledgeBase`] and holds no other
//! state, so any number of queries may run against it concurrently.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::knowledge::{Entry, KnowledgeBase};
use crate::normalize::Normalizer;
use crate::scoring::combined_score;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of entries returned by a category lookup
pub const MAX_SUGGESTIONS: usize = 3;

/// Greetings are only recognized in messages shorter than this, counted in
/// UTF-16 code units so an emoji counts as two
const GREETING_MAX_LEN: usize = 30;

const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "howdy",
    "greetings",
];

// ============================================================================
// Confidence
// ============================================================================

/// Score boundaries for each confidence tier
struct ConfidenceThresholds {
    /// Score >= this is HIGH confidence
    high: f64,
    /// Score >= this (but < high) is MEDIUM confidence
    medium: f64,
    /// Score >= this (but < medium) is LOW confidence
    low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.5,
            medium: 0.3,
            low: 0.15,
        }
    }
}

/// Confidence tier of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Score < 0.15: too weak to answer with
    None,
    /// Score 0.15-0.3: answer with a caveat
    Low,
    /// Score 0.3-0.5
    Medium,
    /// Score >= 0.5
    High,
}

impl Confidence {
    /// Classify a combined score
    pub fn from_score(score: f64) -> Self {
        let thresholds = ConfidenceThresholds::default();

        if score >= thresholds.high {
            Confidence::High
        } else if score >= thresholds.medium {
            Confidence::Medium
        } else if score >= thresholds.low {
            Confidence::Low
        } else {
            Confidence::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::None => "none",
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// The winning entry for a query
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub entry: &'a Entry,
    pub score: f64,
    pub confidence: Confidence,
}

/// Serializable match result handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub entry_id: String,
    pub answer_text: String,
    pub category: String,
    pub score: f64,
    pub confidence_tier: Confidence,
}

impl From<MatchResult<'_>> for MatchOutcome {
    fn from(result: MatchResult<'_>) -> Self {
        Self {
            entry_id: result.entry.id.clone(),
            answer_text: result.entry.answer.clone(),
            category: result.entry.category.clone(),
            score: result.score,
            confidence_tier: result.confidence,
        }
    }
}

/// A suggested question from a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub entry_id: String,
    pub question_text: String,
}

// ============================================================================
// Matcher
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    kb: &'a KnowledgeBase,
    normalizer: Normalizer,
}

impl<'a> Matcher<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self {
            kb,
            normalizer: Normalizer::new(),
        }
    }

    pub fn knowledge_base(&self) -> &'a KnowledgeBase {
        self.kb
    }

    /// Find the highest-scoring entry for `query`.
    ///
    /// Returns `None` when the query has no tokens after normalization, when
    /// the knowledge base is empty, or when every entry scores exactly 0.
    /// Entries are scanned in knowledge-base order and only a strictly higher
    /// score replaces the current best, so the earliest entry wins ties. The
    /// winner is returned even when its tier is [`Confidence::None`].
    pub fn find_best_match(&self, query: &str) -> Option<MatchResult<'a>> {
        let query_tokens = self.normalizer.normalize(query);

        if query_tokens.is_empty() {
            debug!("Query has no content tokens");
            return None;
        }

        debug!("Query tokens: {:?}", query_tokens);

        let mut best: Option<&'a Entry> = None;
        let mut highest_score = 0.0;

        for entry in self.kb.entries() {
            let score = combined_score(&query_tokens, entry);
            if score > highest_score {
                highest_score = score;
                best = Some(entry);
            }
        }

        let result = best.map(|entry| MatchResult {
            entry,
            score: highest_score,
            confidence: Confidence::from_score(highest_score),
        });

        match &result {
            Some(r) => info!(
                "Matched entry {} (score: {:.3}, confidence: {})",
                r.entry.id,
                r.score,
                r.confidence.as_str()
            ),
            None => debug!("No entry scored above zero"),
        }

        result
    }

    /// [`find_best_match`](Self::find_best_match) as an owned, serializable outcome
    pub fn match_query(&self, query: &str) -> Option<MatchOutcome> {
        self.find_best_match(query).map(MatchOutcome::from)
    }

    /// Match many queries in parallel. Output order follows input order.
    pub fn match_batch<S>(&self, queries: &[S]) -> Vec<Option<MatchOutcome>>
    where
        S: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|q| self.match_query(q.as_ref()))
            .collect()
    }

    /// Up to [`MAX_SUGGESTIONS`] entries whose category equals `category`
    /// exactly, in knowledge-base order.
    pub fn suggestions_by_category(&self, category: &str) -> Vec<&'a Entry> {
        self.kb
            .entries()
            .iter()
            .filter(|e| e.category == category)
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    pub fn suggestions_for_category(&self, category: &str) -> Vec<Suggestion> {
        self.suggestions_by_category(category)
            .into_iter()
            .map(|e| Suggestion {
                entry_id: e.id.clone(),
                question_text: e.question.clone(),
            })
            .collect()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> &'a [String] {
        self.kb.categories()
    }

    pub fn is_greeting(&self, text: &str) -> bool {
        is_greeting(text)
    }
}

/// True if the message is short and contains a greeting phrase.
///
/// Matching is by substring on the lower-cased, trimmed text, so "this" also
/// counts as containing "hi". The length limit applies to the untrimmed text.
pub fn is_greeting(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    GREETINGS.iter().any(|g| lower.contains(g))
        && text.encode_utf16().count() < GREETING_MAX_LEN
}

// ============================================================================
// Tests
// ============================================================================
