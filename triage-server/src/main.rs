use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};
use triage_core::embeddings::{EmbeddingBackend, EmbeddingConfig, OpenAiEmbeddingClient};
use triage_core::store::{PgBoardStore, PgKnowledgeStore, PgQueryLog};
use triage_core::TriageConfig;

use triage_server::http::{self, HttpState};
use triage_server::workflows::knowledge::KnowledgeRecorder;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "triage.toml")]
    config: String,

    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match TriageConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging — RUST_LOG wins, config log level otherwise
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    // Connect to DB
    let pool = match triage_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if args.health {
        match triage_core::db::health_check(&pool).await {
            Ok(v) => println!("PostgreSQL connected: {}", v),
            Err(e) => {
                println!("PostgreSQL connection failed: {}", e);
                std::process::exit(1);
            }
        }

        match triage_core::db::check_pgvector(&pool).await {
            Ok(v) => println!("pgvector version: {}", v),
            Err(e) => {
                println!("pgvector check failed: {}", e);
                std::process::exit(1);
            }
        }

        println!("Triage DB health check passed");
        return Ok(());
    }

    // Wire up service clients; workflows only see the trait seams
    let embedder: Arc<dyn EmbeddingBackend> = Arc::new(OpenAiEmbeddingClient::new(
        EmbeddingConfig::new(
            None,
            config.embedding.model.clone(),
            config.embedding.dimensions as usize,
        ),
    )?);

    let board = Arc::new(PgBoardStore::new(
        pool.clone(),
        config.board.clinic_id.clone(),
    ));
    let knowledge = Arc::new(PgKnowledgeStore::new(pool.clone()));
    let query_log = Arc::new(PgQueryLog::new(pool.clone()));
    let recorder = Arc::new(KnowledgeRecorder::new(embedder, knowledge));

    // Shutdown signal
    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let state = Arc::new(HttpState {
        pool,
        board,
        recorder,
        query_log,
        config,
    });

    http::start_http_server(state, tx.subscribe()).await?;

    Ok(())
}
