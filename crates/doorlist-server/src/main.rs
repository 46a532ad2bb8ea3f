mod cli;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use doorlist_api::handlers;
use doorlist_api::state::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DOORLIST_LOG")
                .unwrap_or_else(|_| "doorlist=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("DOORLIST_DB_PATH").unwrap_or_else(|_| "doorlist.db".into());
    let host = std::env::var("DOORLIST_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("DOORLIST_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = doorlist_db::Database::open(&PathBuf::from(&db_path))?;

    // Operator subcommands run against the same store and exit.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(command) = args.first() {
        if command != "serve" {
            return cli::run(&db, command, &args[1..]);
        }
    }

    // Shared state
    let app_state: AppState = Arc::new(AppStateInner { db });

    // The scanner frontend talks to a single action-dispatched endpoint,
    // with GET and POST treated identically.
    let app = Router::new()
        .route("/", get(handlers::dispatch).post(handlers::dispatch))
        .route("/api", get(handlers::dispatch).post(handlers::dispatch))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Doorlist server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
