//! triage-cli — terminal front end for the clinician Q&A triage API
//!
//! Talks to a running triage-server over HTTP. Intended for quick reviews
//! from a shell when the dashboard is not open.
//!
//! # Subcommands
//! - `unanswered [--json]`                 — questions awaiting an answer
//! - `answer <question> --answer <text>`   — submit an answer
//! - `add --question <q> --answer <a>`     — manually add a Q&A pair
//! - `queries [-n <limit>] [--json]`       — recent user interactions
//! - `status`                              — show server health

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8780";
const DEFAULT_QUERY_LIMIT: usize = 50;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "triage-cli",
    version,
    about = "Clinician Q&A triage — review unanswered questions and curate the knowledge base"
)]
struct Cli {
    /// Triage HTTP server URL (overrides TRIAGE_HTTP_URL env var)
    #[arg(long, env = "TRIAGE_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List questions with no recorded answer
    Unanswered {
        /// Output the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Submit an answer for a question
    Answer {
        /// The question text, exactly as listed by `unanswered`
        question: String,

        /// The answer text
        #[arg(short = 'a', long)]
        answer: String,
    },

    /// Manually add a Q&A pair to the knowledge base
    Add {
        /// Question text
        #[arg(short = 'q', long)]
        question: String,

        /// Answer text
        #[arg(short = 'a', long)]
        answer: String,
    },

    /// Show recent user interactions from the chat log
    Queries {
        /// Maximum number of interactions to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_QUERY_LIMIT)]
        limit: usize,

        /// Output the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show triage server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UnansweredResponse {
    pub questions: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct QueryEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub ts: String,
}

#[derive(Debug, Deserialize)]
pub struct QueriesResponse {
    pub queries: Vec<QueryEntry>,
    pub count: usize,
}

// ============================================================================
// Output formatting
// ============================================================================

/// First non-empty line of `text`, capped at `max` characters.
pub fn preview(text: &str, max: usize) -> String {
    text.lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .chars()
        .take(max)
        .collect()
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn make_client() -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

fn fail_on_http_error(resp: reqwest::blocking::Response) -> reqwest::blocking::Response {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("triage-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }
    resp
}

/// List unanswered questions.
fn do_unanswered(server: &str, json_output: bool) -> anyhow::Result<()> {
    let client = make_client()?;
    let url = format!("{}/unanswered", server);

    let resp = match client.get(&url).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("triage-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };
    let resp = fail_on_http_error(resp);

    if json_output {
        let body: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let parsed: UnansweredResponse = match resp.json() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("triage-cli: failed to parse response: {}", e);
            std::process::exit(1);
        }
    };

    if parsed.questions.is_empty() {
        println!("No pending unanswered questions.");
        return Ok(());
    }

    println!("{} unanswered question(s):\n", parsed.count);
    for (i, q) in parsed.questions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, q);
    }

    Ok(())
}

/// Submit an answer for a question.
fn do_answer(server: &str, question: &str, answer: &str) -> anyhow::Result<()> {
    let client = make_client()?;
    let url = format!("{}/answers", server);
    let body = serde_json::json!({
        "question": question,
        "answer": answer,
    });

    let resp = match client.post(&url).json(&body).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("triage-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };
    fail_on_http_error(resp);

    println!("Answer saved.");
    println!("Question: {}", question);
    println!("Answer:   {}", answer);

    Ok(())
}

/// Manually add a Q&A pair.
fn do_add(server: &str, question: &str, answer: &str) -> anyhow::Result<()> {
    let client = make_client()?;
    let url = format!("{}/knowledge", server);
    let body = serde_json::json!({
        "question": question,
        "answer": answer,
    });

    let resp = match client.post(&url).json(&body).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("triage-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };
    let resp = fail_on_http_error(resp);

    let parsed: serde_json::Value = resp.json().unwrap_or_default();
    println!(
        "Question and answer saved (id {}).",
        parsed["id"].as_str().unwrap_or("?")
    );

    Ok(())
}

/// Show recent user interactions.
fn do_queries(server: &str, limit: usize, json_output: bool) -> anyhow::Result<()> {
    let client = make_client()?;
    let url = format!("{}/queries?limit={}", server, limit);

    let resp = match client.get(&url).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("triage-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };
    let resp = fail_on_http_error(resp);

    if json_output {
        let body: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let parsed: QueriesResponse = match resp.json() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("triage-cli: failed to parse response: {}", e);
            std::process::exit(1);
        }
    };

    if parsed.queries.is_empty() {
        println!("No user queries found.");
        return Ok(());
    }

    println!("{} recent user queries:\n", parsed.count);
    for entry in &parsed.queries {
        println!("[{}] {}", entry.ts, preview(&entry.question, 60));
        println!("    {}\n", preview(&entry.answer, 100));
    }

    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server);
    let resp = client.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Triage server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:       {}", body["version"].as_str().unwrap_or("?"));
            println!("PostgreSQL:    {}", body["postgresql"].as_str().unwrap_or("?"));
            println!("pgvector:      {}", body["pgvector"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            let status = r.status();
            eprintln!("triage-cli: server unhealthy (HTTP {})", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("triage-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Unanswered { json } => do_unanswered(&server, json),
        Commands::Answer { question, answer } => do_answer(&server, &question, &answer),
        Commands::Add { question, answer } => do_add(&server, &question, &answer),
        Commands::Queries { limit, json } => do_queries(&server, limit, json),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("triage-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
