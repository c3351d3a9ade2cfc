use anyhow::Result;
use chrono::Duration;
use clap::{Parser, Subcommand};
use colored::Colorize;

use magpie::agent::cli::CliDecider;
use magpie::config::Config;
use magpie::enrich::Enricher;
use magpie::ledger::ProcessedLedger;
use magpie::routing::destinations::WebhookDestination;
use magpie::routing::Gateway;
use magpie::source::cli::CliBookmarkSource;
use magpie::{pipeline, status};

/// Magpie: bookmark triage for X/Twitter.
///
/// Pulls saved bookmarks, enriches each with linked articles, transcripts,
/// and thread context, asks a decision agent to pick an action, and routes
/// it to the right destination.
#[derive(Parser)]
#[command(name = "magpie", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and triage unprocessed bookmarks
    Run {
        /// Max bookmarks to fetch (default: 10)
        #[arg(long, default_value = "10")]
        limit: u32,

        /// Validate and describe without dispatching to destinations
        #[arg(long)]
        dry_run: bool,
    },

    /// Re-run the pipeline for one already-processed bookmark
    Reprocess {
        /// Recency index (0 = most recent) or a raw bookmark id
        target: String,

        /// Validate and describe without dispatching to destinations
        #[arg(long)]
        dry_run: bool,
    },

    /// List recent ledger entries
    List {
        /// How many entries to show (default: 20)
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Remove ledger entries older than the age threshold
    Prune {
        /// Age threshold in days (default: MAGPIE_PRUNE_DAYS or 90)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Show ledger stats and last-run info
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("magpie=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Run { limit, dry_run } => {
            config.require_source()?;
            config.require_agent()?;

            let source = CliBookmarkSource::new(&config.source_command);
            let enricher = Enricher::from_config(&config)?;
            let decider = CliDecider::new(&config.agent_command);
            let gateway = build_gateway(&config, dry_run);
            let mut ledger = ProcessedLedger::load(&config.ledger_path);

            if dry_run {
                println!("{}", "Dry run: nothing will be dispatched.".dimmed());
            }
            println!("Fetching up to {limit} bookmarks...");

            let (summary, outcomes) = pipeline::run::run(
                &source,
                &enricher,
                &decider,
                &gateway,
                &mut ledger,
                limit as usize,
            )
            .await?;

            for outcome in &outcomes {
                let marker = if outcome.success {
                    "ok".green()
                } else {
                    "err".red()
                };
                println!(
                    "  [{marker}] {} by @{}: {}",
                    outcome.id, outcome.author, outcome.message
                );
            }

            println!("\n{}", "Run complete.".bold());
            println!("  Fetched: {}", summary.fetched);
            println!("  Already processed: {}", summary.already_processed);
            println!("  Succeeded: {}", summary.succeeded);
            if summary.failed > 0 {
                println!("  {} {}", "Failed:".red(), summary.failed);
            }
        }

        Commands::Reprocess { target, dry_run } => {
            config.require_source()?;
            config.require_agent()?;

            let source = CliBookmarkSource::new(&config.source_command);
            let enricher = Enricher::from_config(&config)?;
            let decider = CliDecider::new(&config.agent_command);
            let gateway = build_gateway(&config, dry_run);
            let mut ledger = ProcessedLedger::load(&config.ledger_path);

            let outcome = pipeline::run::reprocess(
                &source,
                &enricher,
                &decider,
                &gateway,
                &mut ledger,
                &target,
            )
            .await?;

            let marker = if outcome.success {
                "ok".green()
            } else {
                "err".red()
            };
            println!(
                "[{marker}] {} by @{}: {}",
                outcome.id, outcome.author, outcome.message
            );
        }

        Commands::List { limit } => {
            let ledger = ProcessedLedger::load(&config.ledger_path);
            let entries = ledger.recent_entries(limit as usize);
            if entries.is_empty() {
                println!("No ledger entries yet.");
            } else {
                for (i, entry) in entries.iter().enumerate() {
                    let outcome = match (&entry.error, &entry.action) {
                        (Some(e), _) => format!("error: {e}").red().to_string(),
                        (None, Some(action)) => action.clone(),
                        (None, None) => "processed".to_string(),
                    };
                    println!(
                        "  [{i}] {} by @{} ({}) {}",
                        entry.id,
                        entry.author.as_deref().unwrap_or("unknown"),
                        entry.processed_at.format("%Y-%m-%d %H:%M"),
                        outcome
                    );
                }
            }
        }

        Commands::Prune { days } => {
            let mut ledger = ProcessedLedger::load(&config.ledger_path);
            let days = days.unwrap_or(config.prune_max_age_days);
            let removed = ledger.prune(Duration::days(days));
            ledger.save()?;
            println!("Pruned {removed} entries older than {days} days.");
        }

        Commands::Status => {
            let ledger = ProcessedLedger::load(&config.ledger_path);
            status::show(&ledger);
        }
    }

    Ok(())
}

/// Wire the routing gateway with the three webhook destinations.
fn build_gateway(config: &Config, dry_run: bool) -> Gateway {
    Gateway::new(dry_run)
        .register(
            "create_task",
            Box::new(WebhookDestination::new(
                "tasks",
                config.tasks_webhook_url.clone(),
                config.fetch_timeout_ms,
            )),
        )
        .register(
            "save_for_later",
            Box::new(WebhookDestination::new(
                "readlater",
                config.readlater_webhook_url.clone(),
                config.fetch_timeout_ms,
            )),
        )
        .register(
            "save_reference",
            Box::new(WebhookDestination::new(
                "reference",
                config.reference_webhook_url.clone(),
                config.fetch_timeout_ms,
            )),
        )
}
