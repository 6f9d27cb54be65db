//! candlewatch CLI - Binance futures kline mirror and MACD crossover alerter.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod display;

use context::Settings;

#[derive(Parser)]
#[command(name = "candlewatch")]
#[command(about = "Binance futures kline mirror with a MACD crossover alerter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// SQLite database path
    #[arg(long, env = "CANDLEWATCH_DB", default_value = "klines.db", global = true)]
    database: PathBuf,

    /// JSON file holding the symbol list
    #[arg(long, env = "CANDLEWATCH_SYMBOLS", default_value = "symbols.json", global = true)]
    symbols: PathBuf,

    /// Exchange REST base URL
    #[arg(long, env = "CANDLEWATCH_FEED_URL", global = true, hide = true)]
    feed_url: Option<String>,

    /// Telegram bot token for alerts
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", global = true, hide_env_values = true)]
    telegram_token: Option<String>,

    /// Telegram chat id for alerts
    #[arg(long, env = "TELEGRAM_CHAT_ID", global = true)]
    telegram_chat_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the query server and all scheduled loops
    Run {
        /// Address for the HTTP server
        #[arg(long, env = "CANDLEWATCH_BIND", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,

        /// Seconds between sync passes
        #[arg(long, default_value = "60")]
        sync_every: u64,

        /// Seconds between detection passes
        #[arg(long, default_value = "300")]
        detect_every: u64,

        /// Delete candles older than this many days (0 keeps everything)
        #[arg(long, default_value = "30")]
        retention_days: u32,

        /// Maximum symbols synchronized concurrently
        #[arg(long, default_value = "3")]
        concurrency: usize,
    },

    /// Run one sync pass and print a summary
    Sync {
        /// Maximum symbols synchronized concurrently
        #[arg(long, default_value = "3")]
        concurrency: usize,
    },

    /// Run one detection pass
    Detect {
        /// Evaluate without recording or sending alerts
        #[arg(long)]
        dry_run: bool,

        /// Print the per-symbol gate evaluation
        #[arg(long)]
        explain: bool,
    },

    /// Print resampled candles for a symbol as JSON
    Query {
        /// Trading symbol (e.g., BTCUSDT)
        symbol: String,

        /// Bucket interval (5m, 15m, 1h, 4h, 1d)
        #[arg(short, long, default_value = "5m")]
        interval: String,

        /// Number of buckets
        #[arg(short, long, default_value = "200")]
        limit: u32,
    },

    /// Show configured and stored symbols
    Symbols,
}

/// Installs the global subscriber. `RUST_LOG` wins over the CLI flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let settings = Settings {
        database: cli.database,
        symbols: cli.symbols,
        feed_url: cli.feed_url,
        telegram_token: cli.telegram_token,
        telegram_chat_id: cli.telegram_chat_id,
    };

    match cli.command {
        Commands::Run {
            bind,
            sync_every,
            detect_every,
            retention_days,
            concurrency,
        } => {
            let options = commands::run::RunOptions {
                bind,
                sync_every,
                detect_every,
                retention_days,
                concurrency,
            };
            commands::run::run(&settings, options).await
        }
        Commands::Sync { concurrency } => commands::sync::sync_once(&settings, concurrency).await,
        Commands::Detect { dry_run, explain } => {
            commands::detect::detect_once(&settings, dry_run, explain).await
        }
        Commands::Query {
            symbol,
            interval,
            limit,
        } => commands::query::query(&settings, &symbol, &interval, limit).await,
        Commands::Symbols => commands::symbols::list_symbols(&settings).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["candlewatch", "run"]).unwrap();
        let Commands::Run {
            bind,
            sync_every,
            detect_every,
            retention_days,
            concurrency,
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(bind.port(), 3000);
        assert_eq!(sync_every, 60);
        assert_eq!(detect_every, 300);
        assert_eq!(retention_days, 30);
        assert_eq!(concurrency, 3);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "candlewatch",
            "query",
            "btcusdt",
            "--interval",
            "1h",
            "--database",
            "/tmp/x.db",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.database, PathBuf::from("/tmp/x.db"));
        assert!(matches!(cli.command, Commands::Query { ref interval, .. } if interval == "1h"));
    }
}
