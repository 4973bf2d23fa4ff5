//! Swap Cycler CLI
//!
//! Command-line interface for running batch swap cycles.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swap_cycler::amounts::{compute_swap_amounts, min_amount_out};
use swap_cycler::audit::SubmissionJournal;
use swap_cycler::contracts::ContractAbis;
use swap_cycler::logging::setup_logging;
use swap_cycler::proxy::load_proxies;
use swap_cycler::wallet::load_wallets;
use swap_cycler::{
    AlloyClientFactory, BatchRunner, BinanceOracle, Config, PriceOracle, Result,
    StaticPriceOracle, SwapExecutor,
};

#[derive(Parser)]
#[command(name = "swap-cycler")]
#[command(about = "Batch swap-cycle runner for EVM wallets behind per-wallet proxies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the swap cycle for every wallet/proxy pair
    Run {
        /// Private key file (one hex key per line)
        #[arg(short, long)]
        wallets: Option<PathBuf>,

        /// Proxy file (one ip:port:user:password per line)
        #[arg(short, long)]
        proxies: Option<PathBuf>,

        /// Number of passes over the wallet list
        #[arg(short, long)]
        loops: Option<u32>,

        /// Dry run - sign transactions but never submit them
        #[arg(long)]
        dry_run: bool,

        /// Use a fixed price instead of querying the ticker
        #[arg(long)]
        fixed_price: Option<f64>,
    },

    /// Fetch the current price from the ticker
    Price {
        /// Ticker symbol (defaults to the configured one)
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// Show the swap-in amounts for a USD notional
    Quote {
        /// USD notional (defaults to the configured swap size)
        #[arg(long)]
        usd: Option<f64>,

        /// Use a fixed price instead of querying the ticker
        #[arg(long)]
        fixed_price: Option<f64>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.log_json);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .with_env_overrides();

    match cli.command {
        Commands::Run {
            wallets,
            proxies,
            loops,
            dry_run,
            fixed_price,
        } => {
            let mut config = config;
            if let Some(path) = wallets {
                config.files.wallets = path;
            }
            if let Some(path) = proxies {
                config.files.proxies = path;
            }
            if let Some(loops) = loops {
                config.loops = loops;
            }
            config.dry_run |= dry_run;
            config.validate()?;

            match fixed_price {
                Some(price) => run_batch(config, StaticPriceOracle(price)).await?,
                None => {
                    let oracle = BinanceOracle::new(config.price_api_url.clone());
                    run_batch(config, oracle).await?
                }
            }
        }
        Commands::Price { symbol } => {
            let symbol = symbol.unwrap_or_else(|| config.price_symbol.clone());
            let price = BinanceOracle::new(config.price_api_url.clone())
                .fetch_price(&symbol)
                .await?;
            println!("{} {}", symbol, price);
        }
        Commands::Quote { usd, fixed_price } => {
            config.validate()?;
            let usd = usd.unwrap_or(config.swap_amount_usd);
            let price = match fixed_price {
                Some(price) => price,
                None => {
                    BinanceOracle::new(config.price_api_url.clone())
                        .fetch_price(&config.price_symbol)
                        .await?
                }
            };
            let quote = compute_swap_amounts(usd, price)?;
            let output = serde_json::json!({
                "symbol": config.price_symbol,
                "price": price,
                "usd": usd,
                "input_wei": quote.input_wei.to_string(),
                "output_wei": quote.output_wei.to_string(),
                "amount_out_min": min_amount_out(quote.output_wei, config.slippage_bps).to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn run_batch<O: PriceOracle>(config: Config, oracle: O) -> Result<()> {
    ContractAbis::load(&config.files.router_abi, &config.files.token_abi)?;
    let wallets = load_wallets(&config.files.wallets)?;
    let proxies = load_proxies(&config.files.proxies)?;

    tracing::info!(
        wallets = wallets.len(),
        proxies = proxies.len(),
        loops = config.loops,
        router = %config.contracts.router,
        dry_run = config.dry_run,
        "Starting swap cycler"
    );

    let rpc_url = config.rpc_url.clone();
    let sleep_between_wallets = config.sleep_between_wallets;
    let loops = config.loops;
    let journal = config.audit_log_path.clone().map(SubmissionJournal::new);

    let mut executor = SwapExecutor::new(config, oracle, AlloyClientFactory);
    if let Some(journal) = journal {
        executor = executor.with_journal(journal);
    }

    let runner = BatchRunner::new(executor, rpc_url, sleep_between_wallets);
    let summary = runner.run(&wallets, &proxies, loops).await;

    println!(
        "Run {}: {} attempted, {} succeeded, {} failed",
        summary.run_id, summary.attempted, summary.succeeded, summary.failed
    );
    Ok(())
}
