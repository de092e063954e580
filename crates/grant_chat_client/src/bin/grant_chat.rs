//! grant-chat: terminal chat front-end for the grant-writing query service.
//! Greets, shows recent history, answers the question given as argument or
//! one question per stdin line, then clears the server-side history.

use clap::Parser;
use grant_chat_client::{config, Client, Session, TerminalSurface};
use std::io;
use std::path::PathBuf;
use std::process;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "grant-chat", version, about)]
struct Args {
    /// Config file (default: $GRANT_CHAT_CONFIG, then ~/.grant-chat/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Keep the server-side history when the session ends
    #[arg(long)]
    no_clear: bool,

    /// Ask a single question instead of reading questions from stdin
    question: Option<String>,
}

/// Explicit path (flag or env var) must exist; the default path may be absent.
fn resolve_config(args: &Args) -> Result<config::Config, String> {
    // 1. --config <path> flag, 2. GRANT_CHAT_CONFIG env var
    let explicit = args
        .config
        .clone()
        .or_else(|| std::env::var_os("GRANT_CHAT_CONFIG").map(PathBuf::from));
    if let Some(path) = explicit {
        return config::load(&path)
            .map_err(|e| format!("failed to load config from {}: {}", path.display(), e));
    }
    // 3. Default path (~/.grant-chat/config.yaml)
    match config::default_config_path() {
        Some(path) => config::load_or_default(&path)
            .map_err(|e| format!("failed to load config from {}: {}", path.display(), e)),
        None => Ok(config::Config::default()),
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    let cfg = resolve_config(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let settings = cfg.resolve();

    let client = Client::new(settings.endpoints).unwrap_or_else(|e| {
        eprintln!("Error: failed to create HTTP client: {}", e);
        process::exit(1);
    });
    let session = Session::new(client, settings.display);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    rt.block_on(async {
        let mut surface = TerminalSurface::new(io::stdout());
        session.on_chat_start(&mut surface).await;

        if let Some(question) = args.question.as_deref() {
            session.on_message(&mut surface, question).await;
        } else {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let query = line.trim();
                        if !query.is_empty() {
                            session.on_message(&mut surface, query).await;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read stdin");
                        break;
                    }
                }
            }
        }

        surface.finish();
        if !args.no_clear {
            session.on_chat_end().await;
        }
    });
}
