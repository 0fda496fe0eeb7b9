//! faqm - command-line front end for the FAQ intent matcher
//!
//! # Knowledge base
//! `--kb <PATH>` if given, else `<config dir>/faq-matcher/knowledge-base.json`
//! when it exists, else the built-in sample table.
//!
//! # Output
//! Human-readable text on stdout, or JSON with `--json`. `batch` always
//! prints one JSON value per input line (`null` for no match).
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see query tokens and scores.

use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use faq_matcher::{
    category_overview, compose_reply, Confidence, KnowledgeBase, MatchResult, Matcher,
    MatcherError,
};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, error, info};

// ============================================================================
// CLI
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "faqm", version, about = "Match questions against an FAQ knowledge base")]
struct Cli {
    /// Knowledge-base JSON file
    #[arg(long, global = true, value_name = "PATH")]
    kb: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the best-matching entry for a question
    Match {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compose the chat reply for a message
    Reply {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Suggest up to three questions from a category
    Suggest {
        category: String,

        #[arg(long)]
        json: bool,
    },

    /// Describe a category with its common questions
    Overview { category: String },

    /// List categories in knowledge-base order
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Match one query per stdin line, printing JSON lines in input order
    Batch,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), MatcherError> {
    let kb = KnowledgeBase::resolve(cli.kb.as_deref())?;
    info!(
        "Using knowledge base with {} entries in {} categories",
        kb.len(),
        kb.categories().len()
    );

    let matcher = Matcher::new(&kb);

    match cli.command {
        Command::Match { query, json } => {
            let query = query.join(" ");
            debug!("Matching query: {}", query);

            if json {
                println!("{}", serde_json::to_string(&matcher.match_query(&query))?);
            } else {
                match matcher.find_best_match(&query) {
                    Some(result) => print_match(&result),
                    None => println!("{}", "No match".dimmed()),
                }
            }
        }

        Command::Reply { message, json } => {
            let reply = compose_reply(&matcher, &message.join(" "));

            if json {
                println!("{}", serde_json::to_string(&reply)?);
            } else {
                if let Some(confidence) = reply.confidence {
                    println!("{}", paint(confidence));
                }
                println!("{}", reply.text);
            }
        }

        Command::Suggest { category, json } => {
            let suggestions = matcher.suggestions_for_category(&category);

            if json {
                println!("{}", serde_json::to_string(&suggestions)?);
            } else if suggestions.is_empty() {
                println!("{}", format!("No entries in category {:?}", category).dimmed());
            } else {
                for s in &suggestions {
                    println!("[{}] {}", s.entry_id.bold(), s.question_text);
                }
            }
        }

        Command::Overview { category } => {
            println!("{}", category_overview(&matcher, &category));
        }

        Command::Categories { json } => {
            if json {
                println!("{}", serde_json::to_string(matcher.categories())?);
            } else {
                for category in matcher.categories() {
                    println!("{}", category);
                }
            }
        }

        Command::Batch => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;

            let queries: Vec<&str> = input.lines().collect();
            info!("Matching {} queries", queries.len());

            for outcome in matcher.match_batch(&queries) {
                println!("{}", serde_json::to_string(&outcome)?);
            }
        }
    }

    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn paint(confidence: Confidence) -> ColoredString {
    let label = confidence.as_str().to_uppercase();
    match confidence {
        Confidence::High => label.green(),
        Confidence::Medium => label.yellow(),
        Confidence::Low => label.red(),
        Confidence::None => label.dimmed(),
    }
}

fn print_match(result: &MatchResult<'_>) {
    println!(
        "{} [{}] {} (score: {:.3})",
        paint(result.confidence),
        result.entry.id.bold(),
        result.entry.category,
        result.score
    );
    println!("Q: {}", result.entry.question);
    println!("A: {}", result.entry.answer);
}
