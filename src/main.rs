use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payment_simulator::adapters::{
    InMemoryResponseCache, InMemoryTransactionRepository, PostgresTransactionRepository,
};
use payment_simulator::cli::{self, Cli, Commands, DbCommands};
use payment_simulator::config::{Config, LogFormat};
use payment_simulator::domain::CardValidator;
use payment_simulator::ports::TransactionRepository;
use payment_simulator::services::PaymentService;
use payment_simulator::simulation::{RandomSimulator, SystemClock};
use payment_simulator::{create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let repository: Arc<dyn TransactionRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool, Path::new(db::MIGRATIONS_DIR)).await?;
            tracing::info!("Using Postgres transaction store");
            Arc::new(PostgresTransactionRepository::new(pool))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory transaction store");
            Arc::new(InMemoryTransactionRepository::new())
        }
    };

    let validator = CardValidator::new(config.test_cards.clone());
    tracing::info!("Loaded {} test card numbers", validator.allowed_count());

    let payments = PaymentService::new(
        repository,
        Arc::new(InMemoryResponseCache::new()),
        validator,
        Arc::new(RandomSimulator::new(config.latency)),
        Arc::new(SystemClock),
    );

    let app_state = AppState {
        admin_credentials: config.admin_credentials.clone(),
        cors_allowed_origins: config.cors_allowed_origins.clone(),
        log_request_body: config.log_request_body,
        ..AppState::new(payments.clone())
    };
    let app = create_app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(payments))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(payments: PaymentService) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown requested, interrupting simulated delays");
    payments.interrupt_delays();
}
