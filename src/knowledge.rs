//! The knowledge base: an ordered, immutable table of FAQ entries.
//!
//! Entries are validated and pre-normalized once when the table is built.
//! Nothing is added, edited or removed afterwards, so a `&KnowledgeBase` can
//! be shared freely between threads.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::MatcherError;
use crate::normalize::Normalizer;

// ============================================================================
// Constants
// ============================================================================

/// Default knowledge-base file name
const KB_FILE: &str = "knowledge-base.json";

/// Directory name under the platform config dir
const CONFIG_DIR: &str = "faq-matcher";

// ============================================================================
// Record Types (knowledge-base file format)
// ============================================================================

/// A raw record as supplied by a loader, before validation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,

    /// Curated keywords, lower-case by convention
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// On-disk knowledge-base file
#[derive(Debug, Deserialize)]
pub struct KnowledgeFile {
    /// File format version
    #[serde(default)]
    pub version: String,

    pub entries: Vec<EntryRecord>,
}

// ============================================================================
// Entry
// ============================================================================

/// One validated knowledge-base record.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub keywords: Vec<String>,

    /// Normalized question text
    question_tokens: Vec<String>,
    /// Lower-cased then stemmed keywords
    keyword_stems: HashSet<String>,
}

impl Entry {
    fn from_record(record: EntryRecord, normalizer: &Normalizer) -> Self {
        let question_tokens = normalizer.normalize(&record.question);
        let keyword_stems = record
            .keywords
            .iter()
            .map(|k| normalizer.stem(&k.to_lowercase()))
            .collect();

        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
            category: record.category,
            keywords: record.keywords,
            question_tokens,
            keyword_stems,
        }
    }

    pub fn question_tokens(&self) -> &[String] {
        &self.question_tokens
    }

    pub fn keyword_stems(&self) -> &HashSet<String> {
        &self.keyword_stems
    }
}

// ============================================================================
// Knowledge Base
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<Entry>,
    /// Distinct categories in first-seen order
    categories: Vec<String>,
}

impl KnowledgeBase {
    /// Validate records and build the table, keeping record order.
    ///
    /// Fails on an empty id, question, answer or category, and on duplicate
    /// ids. An empty record list is accepted.
    pub fn from_records(records: Vec<EntryRecord>) -> Result<Self, MatcherError> {
        let normalizer = Normalizer::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut entries = Vec::with_capacity(records.len());
        let mut categories: Vec<String> = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            validate_record(index, &record)?;

            if !seen_ids.insert(record.id.clone()) {
                return Err(MatcherError::DuplicateId(record.id));
            }
            if !categories.contains(&record.category) {
                categories.push(record.category.clone());
            }

            entries.push(Entry::from_record(record, &normalizer));
        }

        if entries.is_empty() {
            warn!("Knowledge base has no entries; every query will return no match");
        }

        Ok(Self {
            entries,
            categories,
        })
    }

    /// Load a knowledge-base JSON file
    pub fn load(path: &Path) -> Result<Self, MatcherError> {
        if !path.exists() {
            return Err(MatcherError::KnowledgeBaseNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| MatcherError::KnowledgeBaseRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: KnowledgeFile = serde_json::from_str(&content)
            .map_err(|e| MatcherError::KnowledgeBaseParse(e.to_string()))?;

        debug!(
            "Parsed knowledge base version {:?} with {} records",
            file.version,
            file.entries.len()
        );

        let kb = Self::from_records(file.entries)?;
        info!("Loaded {} entries from {}", kb.len(), path.display());
        Ok(kb)
    }

    /// Pick the knowledge base for this process.
    ///
    /// An explicit path must exist. Without one, the file under the platform
    /// config dir is used when present, otherwise the built-in sample table.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, MatcherError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_path() {
            Ok(path) if path.exists() => Self::load(&path),
            Ok(path) => {
                debug!("No knowledge base at {:?}, using built-in sample", path);
                Ok(Self::sample())
            }
            Err(e) => {
                debug!("{}, using built-in sample", e);
                Ok(Self::sample())
            }
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in 15-entry customer-service table.
    pub fn sample() -> Self {
        let records = SAMPLE
            .iter()
            .map(|(id, question, answer, category, keywords)| EntryRecord {
                id: id.to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
                category: category.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();

        match Self::from_records(records) {
            Ok(kb) => kb,
            Err(e) => {
                warn!("Built-in sample table is invalid ({}), using an empty knowledge base", e);
                Self::default()
            }
        }
    }
}

/// `<config dir>/faq-matcher/knowledge-base.json`
pub fn default_path() -> Result<PathBuf, MatcherError> {
    let config = dirs::config_dir().ok_or(MatcherError::NoConfigDir)?;
    Ok(config.join(CONFIG_DIR).join(KB_FILE))
}

fn validate_record(index: usize, record: &EntryRecord) -> Result<(), MatcherError> {
    let fields = [
        ("id", &record.id),
        ("question", &record.question),
        ("answer", &record.answer),
        ("category", &record.category),
    ];

    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(MatcherError::InvalidEntry { index, field });
        }
    }
    Ok(())
}

// ============================================================================
// Sample Table
// ============================================================================

type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static str],
);

const SAMPLE: &[SampleRow] = &[
    // Shipping & Delivery
    (
        "1",
        "How long does shipping take?",
        "Standard shipping typically takes 5-7 business days. Express shipping is available for 2-3 business day delivery. International orders may take 10-14 business days depending on the destination.",
        "Shipping",
        &["shipping", "delivery", "time", "long", "days", "arrive", "ship", "when"],
    ),
    (
        "2",
        "Do you offer free shipping?",
        "Yes! We offer free standard shipping on all orders over $50. For orders under $50, standard shipping is $5.99 and express shipping is $12.99.",
        "Shipping",
        &["free", "shipping", "cost", "price", "charge", "delivery"],
    ),
    (
        "3",
        "Can I track my order?",
        "Absolutely! Once your order ships, you'll receive an email with a tracking number. You can use this to track your package on our website or the carrier's site.",
        "Shipping",
        &["track", "tracking", "order", "status", "where", "package", "shipped"],
    ),
    // Returns & Refunds
    (
        "4",
        "What is your return policy?",
        "We offer a 30-day return policy for all unused items in their original packaging. Simply initiate a return through your account or contact our support team for assistance.",
        "Returns",
        &["return", "policy", "refund", "send back", "exchange", "days"],
    ),
    (
        "5",
        "How do I return an item?",
        "To return an item: 1) Log into your account, 2) Go to your orders, 3) Select the item to return, 4) Print the prepaid shipping label, 5) Pack the item securely and drop it off at any carrier location.",
        "Returns",
        &["return", "how", "item", "send back", "process", "steps"],
    ),
    (
        "6",
        "How long do refunds take?",
        "Once we receive your return, refunds are processed within 3-5 business days. The refund will appear on your original payment method within 5-10 business days after processing.",
        "Returns",
        &["refund", "time", "long", "money", "back", "payment", "when"],
    ),
    // Account & Orders
    (
        "7",
        "How do I create an account?",
        "Click the 'Sign Up' button in the top right corner of our website. Enter your email, create a password, and fill in your details. You'll receive a confirmation email to verify your account.",
        "Account",
        &["create", "account", "sign up", "register", "new", "join"],
    ),
    (
        "8",
        "I forgot my password. How do I reset it?",
        "Click 'Forgot Password' on the login page. Enter your email address and we'll send you a password reset link. The link expires in 24 hours for security.",
        "Account",
        &["forgot", "password", "reset", "login", "access", "cant", "remember"],
    ),
    (
        "9",
        "How do I change my account information?",
        "Log into your account and go to 'Account Settings'. From there, you can update your name, email, password, shipping address, and payment methods.",
        "Account",
        &["change", "update", "account", "information", "details", "edit", "modify"],
    ),
    // Products
    (
        "10",
        "Are your products eco-friendly?",
        "Yes! We're committed to sustainability. Our products are made from recycled materials where possible, and our packaging is 100% recyclable and plastic-free.",
        "Products",
        &["eco", "friendly", "sustainable", "environment", "green", "recycle", "packaging"],
    ),
    (
        "11",
        "What sizes do you offer?",
        "We offer sizes XS through 3XL for most items. Check our size guide on each product page for detailed measurements. If you're between sizes, we recommend sizing up for a comfortable fit.",
        "Products",
        &["size", "sizes", "small", "large", "medium", "fit", "measurements"],
    ),
    (
        "12",
        "Do you have a warranty?",
        "Yes, all our products come with a 1-year warranty against manufacturing defects. If you experience any issues, contact our support team with your order number and photos of the defect.",
        "Products",
        &["warranty", "guarantee", "defect", "broken", "damaged", "quality"],
    ),
    // Payment
    (
        "13",
        "What payment methods do you accept?",
        "We accept all major credit cards (Visa, Mastercard, American Express), PayPal, Apple Pay, Google Pay, and Shop Pay. We also offer Buy Now, Pay Later options through Klarna and Afterpay.",
        "Payment",
        &["payment", "pay", "credit", "card", "paypal", "methods", "accept"],
    ),
    (
        "14",
        "Is my payment information secure?",
        "Absolutely! We use industry-standard SSL encryption to protect your data. We're PCI-DSS compliant and never store your full credit card details on our servers.",
        "Payment",
        &["secure", "security", "safe", "payment", "information", "privacy", "protect"],
    ),
    // Contact & Support
    (
        "15",
        "How can I contact customer support?",
        "You can reach us via: Email: support@example.com (24-48hr response), Live Chat: Available Mon-Fri 9am-6pm EST, Phone: 1-800-EXAMPLE (Mon-Fri 9am-6pm EST).",
        "Support",
        &["contact", "support", "help", "email", "phone", "chat", "reach", "customer service"],
    ),
];

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: &str) -> EntryRecord {
        EntryRecord {
            id: id.to_string(),
            question: format!("Question {id}?"),
            answer: format!("Answer {id}."),
            category: category.to_string(),
            keywords: vec![],
        }
    }

    #[test]
    fn test_sample_has_fifteen_entries_in_order() {
        let kb = KnowledgeBase::sample();
        assert_eq!(kb.len(), 15);
        let ids: Vec<&str> = kb.entries().iter().map(|e| e.id.as_str()).collect();
        let expected: Vec<String> = (1..=15).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let kb = KnowledgeBase::sample();
        assert_eq!(
            kb.categories(),
            ["Shipping", "Returns", "Account", "Products", "Payment", "Support"]
        );
    }

    #[test]
    fn test_categories_are_distinct_when_interleaved() {
        let kb = KnowledgeBase::from_records(vec![
            record("a", "Beta"),
            record("b", "Alpha"),
            record("c", "Beta"),
        ])
        .unwrap();
        assert_eq!(kb.categories(), ["Beta", "Alpha"]);
    }

    #[test]
    fn test_entry_is_pre_normalized() {
        let kb = KnowledgeBase::sample();
        let entry = kb.get("1").unwrap();
        assert_eq!(entry.question_tokens(), ["how", "long", "shipp", "take"]);
        assert!(entry.keyword_stems().contains("shipp"));
        assert!(entry.keyword_stems().contains("long"));
        // multi-word keywords stay intact and can never equal a single token
        let returns = kb.get("4").unwrap();
        assert!(returns.keyword_stems().contains("send back"));
    }

    #[test]
    fn test_keywords_are_lowercased_before_stemming() {
        let mut r = record("x", "Misc");
        r.keywords = vec!["Tracking".to_string()];
        let kb = KnowledgeBase::from_records(vec![r]).unwrap();
        assert!(kb.get("x").unwrap().keyword_stems().contains("track"));
    }

    #[test]
    fn test_rejects_empty_fields() {
        let mut r = record("1", "Shipping");
        r.answer = "   ".to_string();
        let err = KnowledgeBase::from_records(vec![record("0", "Misc"), r]).unwrap_err();
        assert!(matches!(
            err,
            MatcherError::InvalidEntry {
                index: 1,
                field: "answer"
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err =
            KnowledgeBase::from_records(vec![record("7", "A"), record("7", "B")]).unwrap_err();
        assert!(matches!(err, MatcherError::DuplicateId(id) if id == "7"));
    }

    #[test]
    fn test_empty_knowledge_base_is_valid() {
        let kb = KnowledgeBase::from_records(vec![]).unwrap();
        assert!(kb.is_empty());
        assert!(kb.categories().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(KB_FILE);
        fs::write(
            &path,
            r#"{
                "version": "1.0",
                "entries": [
                    {"id": "a", "question": "Where is my parcel?", "answer": "On its way.",
                     "category": "Shipping", "keywords": ["parcel", "where"]},
                    {"id": "b", "question": "Do you sell gift cards?", "answer": "Yes.",
                     "category": "Products"}
                ]
            }"#,
        )
        .unwrap();

        let kb = KnowledgeBase::load(&path).unwrap();
        assert_eq!(kb.len(), 2);
        assert!(kb.get("b").unwrap().keywords.is_empty());
        assert_eq!(kb.categories(), ["Shipping", "Products"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        let err = KnowledgeBase::load(&path).unwrap_err();
        assert!(matches!(err, MatcherError::KnowledgeBaseNotFound(p) if p == path));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(KB_FILE);
        fs::write(&path, r#"{"entries": [{"id": "a"}]}"#).unwrap();
        let err = KnowledgeBase::load(&path).unwrap_err();
        assert!(matches!(err, MatcherError::KnowledgeBaseParse(_)));
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(KB_FILE);
        fs::write(&path, r#"{"entries": []}"#).unwrap();
        let kb = KnowledgeBase::resolve(Some(&path)).unwrap();
        assert!(kb.is_empty());
    }
}
