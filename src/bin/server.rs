use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use relnotify::VERSION;
use relnotify::analysis::AnalysisClient;
use relnotify::config::ServerConfig;
use relnotify::db;
use relnotify::fetcher::Fetcher;
use relnotify::monitor::{CheckContext, MonitorScheduler};
use relnotify::notifications::EmailApiSender;
use relnotify::speech::SpeechClient;
use relnotify::web::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override the SQLite database path from the environment.
    #[arg(short, long)]
    database: Option<String>,

    /// Override the listen address from the environment.
    #[arg(short, long)]
    listen: Option<String>,
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "relnotify.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    init_logging();

    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    let pool = db::init_pool(Path::new(&config.database_path)).await?;
    db::run_migrations(&pool).await?;

    let ctx = Arc::new(CheckContext {
        pool: pool.clone(),
        fetcher: Fetcher::new(),
        analyzer: AnalysisClient::new(
            config.ai_api_base.clone(),
            config.ai_api_key.clone(),
            config.ai_model.clone(),
        ),
        speech: SpeechClient::new(
            config.ai_api_base.clone(),
            config.ai_api_key.clone(),
            config.tts_model.clone(),
        ),
        mailer: Arc::new(EmailApiSender::new(
            config.mail_api_base.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        )),
        notify_email: config.mail_to.clone(),
    });

    let scheduler = MonitorScheduler::new(ctx);
    scheduler.restore_from_settings().await?;

    let state = Arc::new(AppState {
        pool,
        scheduler: Arc::clone(&scheduler),
    });
    let app = web::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, version = VERSION, "relnotify listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop().await;
    info!("relnotify shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
