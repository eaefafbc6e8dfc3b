//! Economy Dashboard CLI
//!
//! Terminal client for the economy API:
//! - Server stats
//! - Player listing and lookup
//! - Transaction history and hourly money flow
//! - Route resolution and config generation

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use econ_dashboard::config::{generate_default_config, MAX_DAY_RANGE};
use econ_dashboard::logging::init_tracing;
use econ_dashboard::views::markup::{format_money, format_timestamp};
use econ_dashboard::views::{player::currencies, route_names};
use econ_dashboard::{
    money_flow_per_hour, ApiClient, Config, DateRange, PageStrategy, PageTurn, PagedList,
    ReqwestTransport, Transaction,
};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "econ-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for the economy dashboard API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which view a dashboard path renders
    Resolve {
        /// Location path, e.g. /player/abc-123
        path: String,
    },

    /// Show server-wide balance and online players
    Stats,

    /// List players
    Players {
        /// Page number (1-indexed)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Load every player and page locally
        #[arg(long)]
        all: bool,
        /// Only show names containing this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a player's balances
    Player {
        /// UUID or player name
        id: String,
    },

    /// Show a player's transactions
    Transactions {
        /// UUID or player name
        id: String,
        /// Currency (default: first balance currency)
        #[arg(long)]
        currency: Option<String>,
        /// Only the last N days
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAY_RANGE)))]
        days: Option<u32>,
        /// Page number (1-indexed)
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show a player's net money flow per hour
    Flow {
        /// UUID or player name
        id: String,
        /// Currency (default: first balance currency)
        #[arg(long)]
        currency: Option<String>,
        /// Only the last N days
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAY_RANGE)))]
        days: Option<u32>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config.logging);

    let base_url = match cli.api_url.as_deref() {
        Some(url) => url.to_string(),
        None if !config.api.base_url.is_empty() => config.api.base_url.clone(),
        None => DEFAULT_API_URL.to_string(),
    };
    let transport = ReqwestTransport::new(Duration::from_secs(config.api.request_timeout_secs))?;
    let client = ApiClient::new(&base_url, transport);
    let page_size = config.pagination.page_size;

    match cli.command {
        Commands::Resolve { path } => {
            let table = route_names()?;
            let resolved = table.resolve(&path);
            match cli.format {
                OutputFormat::Json => {
                    let params: serde_json::Map<String, serde_json::Value> = resolved
                        .params
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.into()))
                        .collect();
                    let out = serde_json::json!({
                        "view": resolved.entry,
                        "pattern": resolved.pattern,
                        "params": params,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                OutputFormat::Table => {
                    println!("View:    {}", resolved.entry);
                    println!("Pattern: {}", resolved.pattern.unwrap_or("(fallback)"));
                    for (name, value) in resolved.params.iter() {
                        println!("  {} = {}", name, value);
                    }
                }
            }
        }

        Commands::Stats => {
            let stats = client
                .stats()
                .await
                .with_context(|| format!("Cannot fetch stats from {}", base_url))?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => {
                    println!("Total balance:  {}", format_money(stats.balance));
                    println!("Players online: {}", stats.online);
                }
            }
        }

        Commands::Players { page, all, search } => {
            let strategy = if all {
                PageStrategy::ClientPaged
            } else {
                config.pagination.players
            };
            let mut list = PagedList::new(strategy, page_size);

            match strategy {
                PageStrategy::ClientPaged => {
                    list.set_full_list(client.players(None).await?);
                    if let Some(query) = &search {
                        list.filter(query);
                    }
                    list.go_to(page);
                }
                PageStrategy::ServerPaged => {
                    if let Some(query) = &search {
                        list.filter(query);
                    }
                    let fetch = match list.go_to(page) {
                        PageTurn::Fetch(p) => p,
                        _ => 1,
                    };
                    let page = u32::try_from(fetch).context("Page number too large")?;
                    list.load_page(client.players(Some(page)).await?);
                }
            }

            let players = list.current_slice();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&players)?),
                OutputFormat::Table => {
                    if players.is_empty() {
                        println!("No players found");
                    } else {
                        println!("{:<38} {}", "UUID", "Name");
                        println!("{}", "-".repeat(60));
                        for player in &players {
                            println!(
                                "{:<38} {}",
                                player.uuid.to_string(),
                                player.name.as_deref().unwrap_or("-")
                            );
                        }
                    }
                    println!();
                    match strategy {
                        PageStrategy::ClientPaged => {
                            println!("Page {} / {}", list.current_page(), list.page_count())
                        }
                        PageStrategy::ServerPaged if list.has_next() => println!(
                            "Page {} (next: --page {})",
                            list.current_page(),
                            list.current_page() + 1
                        ),
                        PageStrategy::ServerPaged => println!("Page {}", list.current_page()),
                    }
                }
            }
        }

        Commands::Player { id } => {
            let Some(player) = client.player(&id).await? else {
                bail!("Player not found: {}", id);
            };
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&player)?),
                OutputFormat::Table => {
                    println!("{} ({})", player.display_name(), player.uuid);
                    if let Some(rank) = player.rank {
                        println!("Rank: {}", rank);
                    }
                    println!();
                    println!("{:<20} {:>16}", "Currency", "Amount");
                    println!("{}", "-".repeat(37));
                    for (currency, amount) in &player.balances {
                        println!("{:<20} {:>16}", currency, format_money(*amount));
                    }
                }
            }
        }

        Commands::Transactions {
            id,
            currency,
            days,
            page,
        } => {
            let (currency, transactions) = load_history(&client, &id, currency).await?;
            let range = days.map_or(DateRange::All, DateRange::LastDays);

            let mut list = PagedList::new(PageStrategy::ClientPaged, page_size);
            list.set_full_list(transactions);
            list.filter_with(in_window(currency.clone(), range));
            list.go_to(page);

            let rows = list.current_slice();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Table => {
                    println!("{} - {}", currency, range.label());
                    println!();
                    println!(
                        "{:<19} {:<9} {:>16}  {}",
                        "Date (UTC)", "Type", "Amount", "Reason"
                    );
                    println!("{}", "-".repeat(60));
                    for tx in &rows {
                        let sign = if tx.signed_amount().is_some_and(|a| a < 0.0) { "-" } else { "+" };
                        println!(
                            "{:<19} {:<9} {:>16}  {}",
                            format_timestamp(&tx.timestamp),
                            tx.kind.to_string(),
                            format!("{}{}", sign, format_money(tx.amount)),
                            tx.reason.as_deref().unwrap_or("")
                        );
                    }
                    println!();
                    println!("Page {} / {}", list.current_page(), list.page_count());
                }
            }
        }

        Commands::Flow { id, currency, days } => {
            let (currency, transactions) = load_history(&client, &id, currency).await?;
            let range = days.map_or(DateRange::All, DateRange::LastDays);
            let keep = in_window(currency.clone(), range);
            let series = money_flow_per_hour(transactions.iter().filter(|&tx| keep(tx)), &currency);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&series)?),
                OutputFormat::Table => {
                    if series.is_empty() {
                        println!("No processed deposits or withdrawals for {}", currency);
                    } else {
                        println!("{:<17} {:>16}", "Hour (UTC)", "Net flow");
                        println!("{}", "-".repeat(34));
                        for point in &series.points {
                            println!(
                                "{:<17} {:>16}",
                                point.hour.format("%Y-%m-%d %H:%M"),
                                format_money(point.value)
                            );
                        }
                        println!("{}", "-".repeat(34));
                        println!("{:<17} {:>16}", "Total", format_money(series.total()));
                    }
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();
            if let Some(path) = output {
                std::fs::write(&path, config)?;
                println!("Config written to {:?}", path);
            } else {
                println!("{}", config);
            }
        }
    }

    Ok(())
}

/// Resolve the player, fetch transactions by UUID, and settle the currency
async fn load_history(
    client: &ApiClient<ReqwestTransport>,
    id: &str,
    currency: Option<String>,
) -> anyhow::Result<(String, Vec<Transaction>)> {
    let Some(player) = client.player(id).await? else {
        bail!("Player not found: {}", id);
    };
    let transactions = client.transactions(&player.uuid.to_string()).await?;

    let currency = match currency {
        Some(c) => c,
        None => currencies(&player, &transactions)
            .into_iter()
            .next()
            .context("Player has no balances or transactions")?,
    };
    Ok((currency, transactions))
}

fn in_window(currency: String, range: DateRange) -> impl Fn(&Transaction) -> bool + 'static {
    let now = Utc::now();
    move |tx| tx.currency == currency && range.contains(tx.timestamp, now)
}
