//! Turning a match into the text a chat front end shows.
//!
//! No rendering happens here; callers get plain text plus the tier and a hint
//! whether the category list should be offered again.

use serde::Serialize;

use crate::matcher::{is_greeting, Confidence, Matcher};

/// Number of questions listed by [`category_overview`]
const OVERVIEW_QUESTIONS: usize = 4;

const GREETING_REPLY: &str = "Hello! How can I help you today? Feel free to ask any question \
about our services, or pick one of the topics below to explore.";

/// A reply ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub text: String,

    /// Tier of the answer, absent for greetings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,

    /// Whether the caller should offer the category list again
    pub show_categories: bool,

    /// Entry the answer came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
}

/// Compose the reply for a user message.
pub fn compose_reply(matcher: &Matcher<'_>, message: &str) -> Reply {
    if is_greeting(message) {
        return Reply {
            text: GREETING_REPLY.to_string(),
            confidence: None,
            show_categories: true,
            entry_id: None,
        };
    }

    match matcher.find_best_match(message) {
        Some(result) if result.confidence != Confidence::None => {
            let text = if result.confidence == Confidence::Low {
                format!(
                    "I found a related answer that might help:\n\n{}\n\nIf this doesn't answer \
                     your question, try rephrasing or contact our support team!",
                    result.entry.answer
                )
            } else {
                result.entry.answer.clone()
            };

            Reply {
                text,
                confidence: Some(result.confidence),
                show_categories: false,
                entry_id: Some(result.entry.id.clone()),
            }
        }
        _ => fallback_reply(matcher),
    }
}

fn fallback_reply(matcher: &Matcher<'_>) -> Reply {
    let mut text = String::from(
        "I'm not sure I understand your question. Could you try rephrasing it? \
         Here are some topics I can help with:\n",
    );
    for category in matcher.categories() {
        text.push_str("\n• ");
        text.push_str(category);
    }

    Reply {
        text,
        confidence: Some(Confidence::None),
        show_categories: true,
        entry_id: None,
    }
}

/// List the first few questions of a category, numbered from 1.
pub fn category_overview(matcher: &Matcher<'_>, category: &str) -> String {
    let questions: Vec<String> = matcher
        .knowledge_base()
        .entries()
        .iter()
        .filter(|e| e.category == category)
        .take(OVERVIEW_QUESTIONS)
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i + 1, e.question))
        .collect();

    format!(
        "Here are common questions about {}:\n\n{}\n\nJust ask any of these questions, or type \
         your own question about {}!",
        category,
        questions.join("\n"),
        category.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{EntryRecord, KnowledgeBase};

    #[test]
    fn test_greeting_reply() {
        let kb = KnowledgeBase::sample();
        let reply = compose_reply(&Matcher::new(&kb), "hello!");
        assert_eq!(reply.text, GREETING_REPLY);
        assert_eq!(reply.confidence, None);
        assert!(reply.show_categories);
    }

    #[test]
    fn test_short_message_containing_hi_is_a_greeting() {
        // "shipping" contains "hi" and the message is under the length limit
        let kb = KnowledgeBase::sample();
        let reply = compose_reply(&Matcher::new(&kb), "How long does shipping take?");
        assert_eq!(reply.text, GREETING_REPLY);
    }

    #[test]
    fn test_confident_answer_is_verbatim() {
        let kb = KnowledgeBase::sample();
        let reply = compose_reply(&Matcher::new(&kb), "How long does shipping usually take?");
        assert_eq!(reply.text, kb.get("1").unwrap().answer);
        assert_eq!(reply.confidence, Some(Confidence::High));
        assert_eq!(reply.entry_id.as_deref(), Some("1"));
        assert!(!reply.show_categories);
    }

    #[test]
    fn test_low_confidence_answer_is_wrapped() {
        let kb = KnowledgeBase::from_records(vec![EntryRecord {
            id: "w".to_string(),
            question: "Unrelated".to_string(),
            answer: "Widgets ship weekly.".to_string(),
            category: "Misc".to_string(),
            keywords: vec!["widget".to_string()],
        }])
        .unwrap();
        // one of three tokens hits a keyword: 0.6 / 3 = 0.2
        let reply = compose_reply(&Matcher::new(&kb), "widget alpha bravo");
        assert_eq!(reply.confidence, Some(Confidence::Low));
        assert!(reply.text.starts_with("I found a related answer that might help:"));
        assert!(reply.text.contains("Widgets ship weekly."));
    }

    #[test]
    fn test_fallback_lists_categories() {
        let kb = KnowledgeBase::sample();
        let reply = compose_reply(&Matcher::new(&kb), "xylophone zebra");
        assert_eq!(reply.confidence, Some(Confidence::None));
        assert!(reply.show_categories);
        assert!(reply.entry_id.is_none());
        assert!(reply.text.contains("\n• Shipping\n• Returns"));
        assert!(reply.text.ends_with("• Support"));
    }

    #[test]
    fn test_category_overview() {
        let kb = KnowledgeBase::sample();
        let text = category_overview(&Matcher::new(&kb), "Account");
        assert!(text.starts_with("Here are common questions about Account:"));
        assert!(text.contains("1. How do I create an account?"));
        assert!(text.contains("3. How do I change my account information?"));
        assert!(!text.contains("4."));
        assert!(text.ends_with("type your own question about account!"));
    }
}
