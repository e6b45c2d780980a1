use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

use leaddesk::api::{ApiClient, ApiError, CacheConfig, RecordKind};
use leaddesk::clock::{Clock, FixedClock, SystemClock};
use leaddesk::priority::{
    BusinessType, CustomerHistory, PriorityConfig, PriorityFactors, ServiceComplexity, Urgency,
};
use leaddesk::records::{LeadStatus, RecordId, ServiceStatus};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// KPIs, the monthly chart and recent inquiries (default if no subcommand)
    Dashboard,
    /// KPIs only
    Stats,
    /// Monthly inquiries / clients / completed series
    Chart {
        /// Real counts, without the display jitter
        #[arg(long)]
        raw: bool,
        /// Seed the jitter for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Leads ranked by computed priority
    Leads {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
        /// Show at most N rows
        #[arg(long)]
        limit: Option<usize>,
        #[command(subcommand)]
        action: Option<LeadsAction>,
    },
    /// Customers ranked by computed priority
    Customers {
        #[arg(long)]
        tsv: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Score one ad-hoc record and show the breakdown
    Score {
        /// Estimated value in currency units
        #[arg(long, required_unless_present = "service", conflicts_with = "service")]
        value: Option<f64>,
        /// Service name, looked up in the value table
        #[arg(long)]
        service: Option<String>,
        /// Inquiry date (YYYY-MM-DD or full timestamp)
        #[arg(long)]
        date: Option<String>,
        /// Business type, e.g. "Enterprise"
        #[arg(long)]
        business: Option<String>,
        /// urgent, normal or low
        #[arg(long)]
        urgency: Option<String>,
        /// new, returning or vip
        #[arg(long)]
        history: Option<String>,
        /// high, medium or low
        #[arg(long)]
        complexity: Option<String>,
    },
    /// Service workflow updates
    Services {
        #[command(subcommand)]
        action: ServicesAction,
    },
    /// Find records whose stored priority tag is out of date
    Reprioritize {
        /// Work on customers instead of leads
        #[arg(long)]
        customers: bool,
        /// Write the computed tags back to the backend
        #[arg(long)]
        apply: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Subcommand, Debug)]
enum LeadsAction {
    /// Mark a lead as new or contacted
    SetStatus {
        id: RecordId,
        /// new or contacted
        status: LeadStatus,
    },
}

#[derive(Subcommand, Debug)]
enum ServicesAction {
    /// Move a service to another workflow stage
    SetStatus {
        id: RecordId,
        /// "not started", "in progress", "under review" or completed
        status: ServiceStatus,
    },
}

#[derive(Parser, Debug)]
#[command(name = "leaddesk")]
#[command(about = "Lead prioritization and dashboard statistics for the admin backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/leaddesk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Backend base URL (overrides config and LEADDESK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Disable the response fallback cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Remove cached responses before running
    #[arg(long, global = true)]
    clear_cache: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Pretend the current time is this (YYYY-MM-DD[THH:MM:SS])
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings every command shares once startup is done.
struct Ctx {
    verbose: bool,
    json: bool,
    use_colors: bool,
    clock: Box<dyn Clock>,
    priority: PriorityConfig,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+). Fails only if
    // one is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let Cli {
        verbose,
        config,
        api_url,
        no_cache,
        clear_cache,
        json,
        now,
        command,
    } = Cli::parse();
    let command = command.unwrap_or(Commands::Dashboard);
    let start_time = Instant::now();
    let config_path = config.map(PathBuf::from);

    if clear_cache {
        match leaddesk::api::clear_cache() {
            Ok(()) if verbose => eprintln!("Response cache cleared"),
            Ok(()) => {}
            Err(e) => eprintln!("Warning: {:#}", e),
        }
    }

    if let Commands::Init = command {
        if let Err(e) = leaddesk::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            exit(EXIT_CONFIG);
        }
        exit(EXIT_SUCCESS);
    }

    let clock: Box<dyn Clock> = match now.as_deref() {
        None => Box::new(SystemClock),
        Some(raw) => match leaddesk::records::parse_timestamp(raw) {
            Some(t) => Box::new(FixedClock(t)),
            None => {
                eprintln!("Invalid --now value '{}': expected YYYY-MM-DD[THH:MM:SS]", raw);
                exit(EXIT_CONFIG);
            }
        },
    };

    // Load config
    let config = match leaddesk::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            exit(EXIT_CONFIG);
        }
    };

    // Validate priority config at startup
    let priority = config.priority.clone().unwrap_or_default();
    if let Err(errors) = leaddesk::priority::validate_priority_config(&priority) {
        eprintln!("Priority config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        exit(EXIT_CONFIG);
    }

    let ctx = Ctx {
        verbose,
        json,
        use_colors: leaddesk::output::should_use_colors(),
        clock,
        priority,
    };

    // Scoring an ad-hoc record needs no backend.
    if let Commands::Score {
        value,
        service,
        date,
        business,
        urgency,
        history,
        complexity,
    } = command
    {
        let args = ScoreArgs {
            value,
            service,
            date,
            business,
            urgency,
            history,
            complexity,
        };
        match score_factors(&args, &ctx.priority) {
            Ok(factors) => {
                let result = leaddesk::priority::calculate_priority(&factors, ctx.clock.as_ref());
                if ctx.json {
                    print_json(&result);
                } else {
                    println!(
                        "{}",
                        leaddesk::output::format_breakdown(&result, ctx.use_colors)
                    );
                }
                exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("{}", e);
                exit(EXIT_CONFIG);
            }
        }
    }

    let env_url = std::env::var(leaddesk::config::ENV_API_URL).ok();
    let base_url =
        match leaddesk::config::resolve_api_url(api_url.as_deref(), env_url.as_deref(), &config) {
            Ok(u) => u,
            Err(e) => {
                eprintln!("Config error: {}", e);
                exit(EXIT_CONFIG);
            }
        };
    let timeout = match leaddesk::config::request_timeout(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            exit(EXIT_CONFIG);
        }
    };

    let cache_config = CacheConfig { enabled: !no_cache };
    let client = match leaddesk::api::create_client(&base_url, timeout, &cache_config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            exit(EXIT_CONFIG);
        }
    };

    if verbose {
        eprintln!(
            "Using backend {} (timeout {}, cache {})",
            client.base_url(),
            humantime::format_duration(timeout),
            if no_cache { "off" } else { "on" }
        );
    }

    // Hold warnings until the output has been written.
    leaddesk::stderr_buffer::activate();
    let code = run(command, &client, &ctx).await;
    leaddesk::stderr_buffer::flush();

    if verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }
    exit(code);
}

async fn run(command: Commands, client: &ApiClient, ctx: &Ctx) -> i32 {
    let now = ctx.clock.now();

    match command {
        Commands::Dashboard | Commands::Stats | Commands::Chart { .. } => {
            let data = match leaddesk::fetch::fetch_dataset(client, ctx.verbose).await {
                Ok(d) => d,
                Err(e) => return fetch_failed(&e),
            };

            match command {
                Commands::Stats => {
                    let stats =
                        leaddesk::stats::calculate_dashboard_stats(&data, ctx.clock.as_ref());
                    if ctx.json {
                        print_json(&stats);
                    } else {
                        println!("{}", leaddesk::output::format_kpis(&stats, ctx.use_colors));
                    }
                }
                Commands::Chart { raw, seed } => {
                    let points = chart_points(&data, ctx.clock.as_ref(), raw, seed);
                    if ctx.json {
                        print_json(&points);
                    } else {
                        println!(
                            "{}",
                            leaddesk::output::format_chart_table(&points, ctx.use_colors)
                        );
                    }
                }
                _ => {
                    let stats =
                        leaddesk::stats::calculate_dashboard_stats(&data, ctx.clock.as_ref());
                    let points = chart_points(&data, ctx.clock.as_ref(), false, None);
                    let recent = leaddesk::stats::recent_inquiries(&data.leads);
                    if ctx.json {
                        print_json(&serde_json::json!({
                            "stats": stats,
                            "chart": points,
                            "recentInquiries": recent,
                        }));
                    } else {
                        println!("{}", leaddesk::output::format_kpis(&stats, ctx.use_colors));
                        println!();
                        println!(
                            "{}",
                            leaddesk::output::format_chart_table(&points, ctx.use_colors)
                        );
                        println!();
                        println!(
                            "{}",
                            leaddesk::output::format_recent_inquiries(&recent, now, ctx.use_colors)
                        );
                    }
                }
            }
            EXIT_SUCCESS
        }
        Commands::Leads {
            action: Some(LeadsAction::SetStatus { id, status }),
            ..
        } => {
            let result = leaddesk::api::update_lead_status(client, &id, status).await;
            write_finished(result, ctx, format!("Lead {} marked {}", id, status))
        }
        Commands::Services {
            action: ServicesAction::SetStatus { id, status },
        } => {
            let result = leaddesk::api::update_service_status(client, &id, status).await;
            write_finished(result, ctx, format!("Service {} moved to {}", id, status))
        }
        Commands::Leads {
            tsv,
            limit,
            action: None,
        } => {
            let leads = match leaddesk::api::fetch_leads(client).await {
                Ok(l) => l,
                Err(e) => return fetch_failed(&e),
            };
            let mut ranked =
                leaddesk::fetch::rank_leads(leads, &ctx.priority, ctx.clock.as_ref());
            if ctx.verbose {
                log_distribution(ranked.iter().map(|s| Some(s.result.priority)));
            }
            if let Some(limit) = limit {
                ranked.truncate(limit);
            }

            if ctx.json {
                print_json(&ranked);
            } else {
                let rows = leaddesk::output::lead_rows(&ranked);
                print_rows(&rows, tsv, now, ctx.use_colors);
            }
            EXIT_SUCCESS
        }
        Commands::Customers { tsv, limit } => {
            let customers = match leaddesk::api::fetch_customers(client).await {
                Ok(c) => c,
                Err(e) => return fetch_failed(&e),
            };
            let mut ranked =
                leaddesk::fetch::rank_customers(customers, &ctx.priority, ctx.clock.as_ref());
            if ctx.verbose {
                log_distribution(ranked.iter().map(|s| Some(s.result.priority)));
            }
            if let Some(limit) = limit {
                ranked.truncate(limit);
            }

            if ctx.json {
                print_json(&ranked);
            } else {
                let rows = leaddesk::output::customer_rows(&ranked);
                print_rows(&rows, tsv, now, ctx.use_colors);
            }
            EXIT_SUCCESS
        }
        Commands::Reprioritize { customers, apply } => {
            let (kind, changes, stored) = if customers {
                let records = match leaddesk::api::fetch_customers(client).await {
                    Ok(c) => c,
                    Err(e) => return fetch_failed(&e),
                };
                let stored = leaddesk::priority::priority_distribution(
                    records.iter().map(|c| c.priority),
                );
                let ranked =
                    leaddesk::fetch::rank_customers(records, &ctx.priority, ctx.clock.as_ref());
                (
                    RecordKind::Customer,
                    leaddesk::reprioritize::plan_changes(&ranked),
                    stored,
                )
            } else {
                let records = match leaddesk::api::fetch_leads(client).await {
                    Ok(l) => l,
                    Err(e) => return fetch_failed(&e),
                };
                let stored =
                    leaddesk::priority::priority_distribution(records.iter().map(|l| l.priority));
                let ranked =
                    leaddesk::fetch::rank_leads(records, &ctx.priority, ctx.clock.as_ref());
                (
                    RecordKind::Lead,
                    leaddesk::reprioritize::plan_changes(&ranked),
                    stored,
                )
            };

            let report = if apply && !changes.is_empty() {
                Some(leaddesk::reprioritize::apply_changes(client, kind, &changes, ctx.verbose).await)
            } else {
                None
            };

            if ctx.json {
                print_json(&serde_json::json!({
                    "collection": kind.collection(),
                    "stored": stored,
                    "changes": changes,
                    "report": report,
                }));
            } else {
                println!(
                    "Stored {}: {}",
                    kind.collection(),
                    leaddesk::output::format_distribution(&stored, ctx.use_colors)
                );
                println!();
                println!(
                    "{}",
                    leaddesk::output::format_changes(&changes, ctx.use_colors)
                );
                if let Some(report) = &report {
                    println!();
                    println!("{}", leaddesk::output::format_apply_report(report));
                } else if !changes.is_empty() {
                    eprintln!();
                    eprintln!("Dry run. Pass --apply to update {} record(s).", changes.len());
                }
            }

            match report {
                Some(r) if !r.is_success() => EXIT_NETWORK,
                _ => EXIT_SUCCESS,
            }
        }
        // Handled before the client is built.
        Commands::Score { .. } | Commands::Init => EXIT_SUCCESS,
    }
}

/// Report a single status write. A rejected or failed PATCH exits 2.
fn write_finished(result: Result<(), ApiError>, ctx: &Ctx, done: String) -> i32 {
    match result {
        Ok(()) => {
            if ctx.json {
                print_json(&serde_json::json!({ "updated": true, "message": done }));
            } else {
                println!("{}", done);
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            if ctx.json {
                print_json(&serde_json::json!({ "updated": false, "error": e.to_string() }));
            }
            eprintln!("Update failed: {}", e);
            EXIT_NETWORK
        }
    }
}

struct ScoreArgs {
    value: Option<f64>,
    service: Option<String>,
    date: Option<String>,
    business: Option<String>,
    urgency: Option<String>,
    history: Option<String>,
    complexity: Option<String>,
}

/// Turn `score` arguments into factors. Unset options take the config
/// defaults; values that do not parse are rejected.
fn score_factors(args: &ScoreArgs, config: &PriorityConfig) -> anyhow::Result<PriorityFactors> {
    let service_value = match (&args.value, &args.service) {
        (Some(v), _) if v.is_finite() && *v >= 0.0 => *v,
        (Some(v), _) => anyhow::bail!("--value must be a non-negative number, got {}", v),
        (None, Some(name)) => {
            leaddesk::priority::service_value(name, config.service_values.as_ref())
        }
        (None, None) => anyhow::bail!("Pass --value or --service"),
    };

    let inquiry_date = match args.date.as_deref() {
        None => None,
        Some(raw) => Some(
            leaddesk::records::parse_timestamp(raw)
                .ok_or_else(|| anyhow::anyhow!("--date: cannot parse '{}'", raw))?,
        ),
    };

    fn parsed<T>(
        flag: &str,
        raw: Option<&str>,
        parse: fn(&str) -> Option<T>,
        default: T,
    ) -> anyhow::Result<T> {
        match raw {
            None => Ok(default),
            Some(s) => parse(s).ok_or_else(|| anyhow::anyhow!("{}: unknown value '{}'", flag, s)),
        }
    }

    Ok(PriorityFactors {
        service_value,
        inquiry_date,
        business_type: args
            .business
            .as_deref()
            .map(BusinessType::parse)
            .unwrap_or_else(|| config.default_business_type()),
        response_urgency: parsed(
            "--urgency",
            args.urgency.as_deref(),
            Urgency::try_parse,
            config.default_urgency(),
        )?,
        customer_history: parsed(
            "--history",
            args.history.as_deref(),
            CustomerHistory::try_parse,
            config.default_history(),
        )?,
        service_complexity: parsed(
            "--complexity",
            args.complexity.as_deref(),
            ServiceComplexity::try_parse,
            config.default_complexity(),
        )?,
    })
}

fn chart_points(
    data: &leaddesk::records::Dataset,
    clock: &dyn Clock,
    raw: bool,
    seed: Option<u64>,
) -> Vec<leaddesk::stats::MonthlyPoint> {
    if raw {
        return leaddesk::stats::raw_chart_data(data);
    }
    match seed {
        Some(seed) => {
            leaddesk::stats::generate_chart_data(data, clock, &mut StdRng::seed_from_u64(seed))
        }
        None => leaddesk::stats::generate_chart_data(data, clock, &mut rand::thread_rng()),
    }
}

fn print_rows(
    rows: &[leaddesk::output::RankedRow],
    tsv: bool,
    now: chrono::NaiveDateTime,
    use_colors: bool,
) {
    let output = if tsv {
        leaddesk::output::format_ranked_tsv(rows)
    } else {
        leaddesk::output::format_ranked_table(rows, now, use_colors)
    };
    if !output.is_empty() {
        println!("{}", output);
    }
}

fn log_distribution(tags: impl Iterator<Item = Option<leaddesk::priority::Priority>>) {
    let counts = leaddesk::priority::priority_distribution(tags);
    eprintln!(
        "Computed: {}",
        leaddesk::output::format_distribution(&counts, false)
    );
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => leaddesk::buffered_eprintln!("Failed to serialize output: {}", e),
    }
}

fn fetch_failed(e: &anyhow::Error) -> i32 {
    eprintln!("Error: {:#}", e);
    match e.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized(_)) => {
            eprintln!("The backend rejected the request. Check that the API URL points at the admin backend.");
        }
        Some(ApiError::Network(_)) => {
            eprintln!("Could not reach the backend. Is it running?");
        }
        _ => {}
    }
    EXIT_NETWORK
}
