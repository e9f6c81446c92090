//! sessiongate - command-line front end for the session token gateway.
//!
//! Reads the stored session token for the configured origin, sends the
//! client to the login page when there is none, and seeds a development
//! token for local testing.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sessiongate_core::{
    AppConfig, FileStorage, GatewayConfig, KeyringStorage, Outcome, SessionTokenGateway,
    StdoutNavigator, StoreKind, TokenStorage,
};

/// Directory for an additional log file, if set
const ENV_LOG_DIR: &str = "SESSIONGATE_LOG_DIR";

/// Log file name prefix inside `SESSIONGATE_LOG_DIR`
const LOG_FILE_PREFIX: &str = "sessiongate.log";

/// Exit code when the client was sent to the login page
const EXIT_REDIRECTED: u8 = 2;

const USAGE: &str = "\
Usage: sessiongate <command>

Commands:
  token      Print the stored access token, or redirect to login
  header     Print the Authorization header value, or redirect to login
  status     Report whether a token is stored, without redirecting
  login      Redirect to the login page
  seed-dev   Store the configured development access token
  help       Show this message

Environment:
  SESSIONGATE_LOGIN_REDIRECT     Login page URL (required)
  SESSIONGATE_DEV_ACCESS_TOKEN   Token written by seed-dev
  SESSIONGATE_STORE              file | keyring
  SESSIONGATE_ORIGIN             Origin the token slot is scoped to
  SESSIONGATE_LOG_DIR            Also write logs to this directory
";

enum Command {
    Token,
    Header,
    Status,
    Login,
    SeedDev,
    Help,
}

impl Command {
    fn parse(arg: Option<&str>) -> Option<Self> {
        match arg {
            Some("token") => Some(Self::Token),
            Some("header") => Some(Self::Header),
            Some("status") => Some(Self::Status),
            Some("login") => Some(Self::Login),
            Some("seed-dev") => Some(Self::SeedDev),
            Some("help") | Some("--help") | Some("-h") | None => Some(Self::Help),
            Some(_) => None,
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn open_storage(app_config: &AppConfig) -> Result<Box<dyn TokenStorage>> {
    let storage: Box<dyn TokenStorage> = match app_config.store {
        StoreKind::File => {
            let dir = app_config
                .cache_dir()
                .context("Failed to locate cache directory")?;
            Box::new(FileStorage::new(dir))
        }
        StoreKind::Keyring => Box::new(KeyringStorage::new(app_config.origin.as_deref())),
    };
    Ok(storage)
}

fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = Command::parse(args.get(1).map(String::as_str)) else {
        eprint!("Unknown command '{}'\n\n{}", args[1], USAGE);
        return Ok(ExitCode::FAILURE);
    };
    if matches!(command, Command::Help) {
        print!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let app_config = AppConfig::load()
        .context("Failed to load config")?
        .with_env_overrides();
    let gateway_config = GatewayConfig::from_env().context("Failed to read gateway settings")?;
    let storage = open_storage(&app_config)?;
    info!(store = ?app_config.store, origin = ?app_config.origin, "sessiongate starting");

    let gateway = SessionTokenGateway::new(gateway_config, storage, StdoutNavigator::stdout());

    match command {
        Command::Token | Command::Header => {
            match gateway.access_token().context("Failed to read access token")? {
                Outcome::Token(token) => {
                    if matches!(command, Command::Header) {
                        println!("{}", token.authorization_header());
                    } else {
                        println!("{}", token);
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Outcome::Redirect(_) => Ok(ExitCode::from(EXIT_REDIRECTED)),
            }
        }
        Command::Status => {
            let outcome = gateway.resolve().context("Failed to read access token")?;
            if outcome.is_redirect() {
                println!("absent");
                Ok(ExitCode::from(EXIT_REDIRECTED))
            } else {
                println!("present");
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Login => {
            gateway
                .redirect_to_login()
                .context("Failed to redirect to login")?;
            Ok(ExitCode::from(EXIT_REDIRECTED))
        }
        Command::SeedDev => {
            let token = gateway
                .set_dev_token()
                .context("Failed to store development token")?;
            eprintln!("Stored development token {}", token.redacted());
            Ok(ExitCode::SUCCESS)
        }
        Command::Help => Ok(ExitCode::SUCCESS),
    }
}
