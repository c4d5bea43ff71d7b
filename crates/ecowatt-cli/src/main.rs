//! ecowatt - terminal front-end for the household energy service.
//!
//! Every command names the view it belongs to. The router's guard runs before
//! anything is fetched, so an expired session is caught locally and the user
//! is asked to sign in again instead of hitting the server with a stale token.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ecowatt_core::models::EnergyType;
use ecowatt_core::{ApiClient, ApiError, Config, Notifier, Router, SessionStore};

use commands::Command;

/// Set to `1` to also write logs to a daily file in the cache directory
const LOG_FILE_ENV: &str = "ECOWATT_LOG_FILE";

/// Initialize the tracing subscriber for logging
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file_dir(config) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "ecowatt.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn log_file_dir(config: &Config) -> Option<std::path::PathBuf> {
    if std::env::var(LOG_FILE_ENV).ok().as_deref() != Some("1") {
        return None;
    }
    let dir = config.cache_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Prints request failures for the user. Logging still goes through tracing.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// Everything a command needs, wired once at startup.
pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub router: Arc<Router>,
    pub client: ApiClient,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let session = SessionStore::open(config.session_storage()?);
        let router = Arc::new(Router::with_default_routes(session.clone()));
        let client = ApiClient::new(
            &config.client_config()?,
            session.clone(),
            Arc::new(StderrNotifier),
            router.clone(),
        )?;

        Ok(Self {
            config,
            session,
            router,
            client,
        })
    }
}

fn usage() -> String {
    let types = EnergyType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join("|");
    format!(
        "Usage: ecowatt <command>\n\n\
         Commands:\n  \
         login                 Sign in and store the session\n  \
         logout                Forget the stored session\n  \
         status                Show the stored session\n  \
         dashboard             Household overview\n  \
         bills [type]          List bills\n  \
         devices [type]        List devices\n  \
         family                Show the household profile\n  \
         suggestions [type]    List energy-saving suggestions\n  \
         trend <type>          Usage analysis for one utility\n\n\
         Types: {}",
        types
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(Some(command)) => command,
        Ok(None) => {
            println!("{}", usage());
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, usage());
            std::process::exit(2);
        }
    };

    let config = Config::load()?;
    let _log_guard = init_tracing(&config);
    info!(?command, "ecowatt starting");

    let mut app = App::new(config)?;
    if let Err(e) = commands::run(&mut app, command).await {
        // Request failures were already shown by the notifier.
        match e.downcast_ref::<ApiError>() {
            Some(ApiError::Request(_)) | Some(ApiError::Unauthorized(_)) => {}
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}
