//! InstaAI CLI - a command-line client for InstaAI Studio.
//!
//! Signs in (password or Google/Facebook/Apple), links Instagram accounts,
//! and manages generated content and the posting schedule against the
//! InstaAI backend. Records are printed as JSON on stdout; progress and
//! logs go to stderr.

mod commands;
mod prompt;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use instaai_core::models::ContentStatus;
use instaai_core::{ApiClient, ApiError, Config, OAuthProvider};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Printed when the backend ends the session
const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// Log file name prefix inside `INSTAAI_LOG_DIR`
const LOG_FILE_PREFIX: &str = "instaai.log";

#[derive(Parser)]
#[command(name = "instaai")]
#[command(about = "InstaAI Studio from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        email: String,
        /// Full name shown on the profile
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign in with email and password
    Login { email: String },
    /// Sign out and forget the stored session
    Logout,
    /// Fetch the signed-in profile and refresh the cached copy
    Whoami,
    /// Show local session and configuration state
    Status,
    /// Sign in with an external provider (google, facebook, apple)
    Oauth { provider: OAuthProvider },
    /// List linked Instagram accounts
    Accounts,
    /// Link an Instagram account. Without a code, prints the authorization URL
    /// and reads the code from stdin.
    Connect { code: Option<String> },
    /// Unlink an Instagram account
    Disconnect { account_id: i64 },
    /// Analytics and AI recommendations for an account
    Insights {
        account_id: i64,
        /// Ignore the backend's cached snapshot
        #[arg(long)]
        refresh: bool,
    },
    /// Goal-driven recommendations for an account
    Analyze {
        account_id: i64,
        /// Goal type, e.g. "sales" or "awareness"
        #[arg(long)]
        goal: String,
        #[arg(long)]
        product: Option<String>,
        #[arg(long, requires = "product")]
        price: Option<f64>,
        #[arg(long)]
        audience: Option<String>,
        #[arg(long)]
        budget: Option<f64>,
    },
    /// List the content library
    Content {
        #[arg(long, value_parser = parse_content_status)]
        status: Option<ContentStatus>,
    },
    /// Generate a new post for an account
    Generate { account_id: i64 },
    /// Approve generated content for publishing
    Approve { content_id: i64 },
    /// Delete generated content
    DeleteContent { content_id: i64 },
    /// Posting schedule
    Schedule {
        #[command(subcommand)]
        cmd: ScheduleCommands,
    },
    /// Accounts, content and upcoming posts at a glance
    Dashboard,
    /// First-run onboarding flag
    Onboarding { action: OnboardingAction },
}

#[derive(Subcommand)]
pub(crate) enum ScheduleCommands {
    /// List scheduled posts for an account
    List {
        account_id: i64,
        #[arg(long)]
        status: Option<String>,
    },
    /// Schedule content for publishing
    Add {
        content_id: i64,
        account_id: i64,
        /// Publish time, RFC 3339 (e.g. 2025-03-01T18:00:00Z)
        #[arg(value_parser = parse_time)]
        time: DateTime<Utc>,
        #[arg(long)]
        caption: Option<String>,
    },
    /// Cancel a scheduled post
    Cancel { schedule_id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum OnboardingAction {
    Show,
    Done,
    Reset,
}

fn parse_content_status(s: &str) -> Result<ContentStatus, String> {
    ContentStatus::parse(s).ok_or_else(|| format!("Unknown content status: {}", s))
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("Invalid time '{}': {}", s, e))
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` controls the level (default `warn`). When `INSTAAI_LOG_DIR` is
/// set, logs are also written to a daily file there; the returned guard must
/// live until exit so buffered lines are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var("INSTAAI_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
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

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_unauthorized) {
                eprintln!("{}", SESSION_EXPIRED);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()
        .context("Failed to load config")?
        .with_env_overrides();
    let store = Arc::new(
        config
            .credential_store()
            .context("Failed to open credential store")?,
    );
    let api = ApiClient::new(&config.api_config(), store).context("Failed to create API client")?;
    info!(base_url = api.base_url(), platform = %config.platform, "InstaAI CLI starting");

    match cli.command {
        Commands::Register { email, name } => commands::register(&api, &email, name).await,
        Commands::Login { email } => commands::login(&api, &email).await,
        Commands::Logout => commands::logout(&api).await,
        Commands::Whoami => commands::whoami(&api).await,
        Commands::Status => commands::status(&api, &config),
        Commands::Oauth { provider } => commands::oauth(&api, &config, provider).await,
        Commands::Accounts => commands::print_json(&api.instagram_accounts().await?),
        Commands::Connect { code } => commands::connect(&api, code).await,
        Commands::Disconnect { account_id } => {
            api.disconnect_instagram(account_id).await?;
            eprintln!("Disconnected account {}", account_id);
            Ok(())
        }
        Commands::Insights {
            account_id,
            refresh,
        } => commands::print_json(&api.insights(account_id, refresh).await?),
        Commands::Analyze {
            account_id,
            goal,
            product,
            price,
            audience,
            budget,
        } => {
            let mut goal = instaai_core::models::AnalysisGoal::new(goal);
            if let Some(product) = product {
                goal = goal.with_product(product, price);
            }
            if let Some(audience) = audience {
                goal = goal.with_target_audience(audience);
            }
            if let Some(budget) = budget {
                goal = goal.with_budget(budget);
            }
            commands::print_json(&api.analyze_with_goal(account_id, &goal).await?)
        }
        Commands::Content { status } => commands::print_json(&api.content(status).await?),
        Commands::Generate { account_id } => {
            commands::print_json(&api.generate_content(account_id).await?)
        }
        Commands::Approve { content_id } => {
            api.approve_content(content_id).await?;
            eprintln!("Approved content {}", content_id);
            Ok(())
        }
        Commands::DeleteContent { content_id } => {
            api.delete_content(content_id).await?;
            eprintln!("Deleted content {}", content_id);
            Ok(())
        }
        Commands::Schedule { cmd } => commands::schedule(&api, cmd).await,
        Commands::Dashboard => commands::dashboard(&api).await,
        Commands::Onboarding { action } => commands::onboarding(&api, action),
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
    fn test_parse_oauth_provider() {
        let cli = Cli::try_parse_from(["instaai", "oauth", "Google"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Oauth {
                provider: OAuthProvider::Google
            }
        ));
        assert!(Cli::try_parse_from(["instaai", "oauth", "myspace"]).is_err());
    }

    #[test]
    fn test_parse_schedule_add() {
        let cli = Cli::try_parse_from([
            "instaai",
            "schedule",
            "add",
            "7",
            "3",
            "2025-03-01T18:00:00+01:00",
            "--caption",
            "Spring drop",
        ])
        .unwrap();
        match cli.command {
            Commands::Schedule {
                cmd:
                    ScheduleCommands::Add {
                        content_id,
                        account_id,
                        time,
                        caption,
                    },
            } => {
                assert_eq!((content_id, account_id), (7, 3));
                assert_eq!(time.to_rfc3339(), "2025-03-01T17:00:00+00:00");
                assert_eq!(caption.as_deref(), Some("Spring drop"));
            }
            _ => panic!("expected schedule add"),
        }
    }

    #[test]
    fn test_parse_content_status() {
        assert_eq!(parse_content_status("Ready"), Ok(ContentStatus::Ready));
        assert!(parse_content_status("archived").is_err());
        assert!(parse_time("tomorrow").is_err());
    }
}
