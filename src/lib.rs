//! FAQ intent matcher - maps free-text questions to the best entry of a fixed
//! question/answer knowledge base.
//!
//! # Pipeline
//! 1. [`Normalizer`] lower-cases, strips punctuation, drops stop words and
//!    stems each token with a single suffix-stripping pass
//! 2. [`scoring`] compares the query tokens with every entry: binary cosine
//!    against the entry's question (weight 0.4) and overlap with its curated
//!    keywords (weight 0.6)
//! 3. [`Matcher`] keeps the highest score, earliest entry winning ties, and
//!    classifies it into a [`Confidence`] tier
//!
//! # Example
//! ```
//! use faq_matcher::{Confidence, KnowledgeBase, Matcher};
//!
//! let kb = KnowledgeBase::sample();
//! let matcher = Matcher::new(&kb);
//! let result = matcher.find_best_match("How long does shipping take?").unwrap();
//! assert_eq!(result.entry.id, "1");
//! assert_eq!(result.confidence, Confidence::High);
//! ```

pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod normalize;
pub mod reply;
pub mod scoring;

pub use error::MatcherError;
pub use knowledge::{Entry, EntryRecord, KnowledgeBase};
pub use matcher::{is_greeting, Confidence, MatchOutcome, MatchResult, Matcher, Suggestion};
pub use normalize::Normalizer;
pub use reply::{category_overview, compose_reply, Reply};
