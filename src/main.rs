use std::env;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jira_pr_link::cmd::inspect::{self, InspectArgs};
use jira_pr_link::cmd::sync::{self, SyncStatus};
use jira_pr_link::config::{AppConfig, ExtractionSettings};
use jira_pr_link::context::AppContext;
use jira_pr_link::error::AppResult;
use jira_pr_link::infra::actions::{StepOutputs, WorkflowEvent, error_annotation};
use jira_pr_link::infra::github::GitHubClient;
use jira_pr_link::infra::jira::{JiraClient, JiraCredentials};

#[derive(Parser)]
#[command(
    name = "jira-pr-link",
    author,
    version,
    about = "Adds Jira issue details to GitHub pull request descriptions"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Link the pull request of the current workflow event (default).
    Sync,
    /// Show which issue key a title and branch would resolve to.
    Inspect(InspectCliArgs),
}

#[derive(Args)]
struct InspectCliArgs {
    /// Pull request title to search.
    #[arg(short, long, default_value = "")]
    title: String,
    /// Source branch name to search.
    #[arg(short, long, default_value = "")]
    branch: String,
}

#[tokio::main]
async fn main() {
    init_tracing();

    match run().await {
        Ok(SyncStatus::Success) => {}
        Ok(SyncStatus::Failure) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            error_annotation(&error.to_string());
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> AppResult<SyncStatus> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => run_sync().await,
        Commands::Inspect(args) => {
            let settings = ExtractionSettings::from_lookup(|key| env::var(key).ok())?;
            let report = inspect::run(
                &settings,
                InspectArgs {
                    title: args.title,
                    branch: args.branch,
                },
            );
            println!("{report}");
            Ok(SyncStatus::Success)
        }
    }
}

async fn run_sync() -> AppResult<SyncStatus> {
    let config = AppConfig::from_env()?;
    let event = WorkflowEvent::load(|key| env::var(key).ok())?;
    let outputs = StepOutputs::from_lookup(|key| env::var(key).ok());

    let credentials = JiraCredentials::from_config(&config)?;
    let issue_tracker = Arc::new(JiraClient::new(config.jira_base_url.clone(), credentials)?);
    let pull_requests = Arc::new(GitHubClient::new(
        config.github_api_url.clone(),
        config.github_token.clone(),
    ));

    let context = AppContext::new(config, pull_requests, issue_tracker);

    sync::run(&context, &event, &outputs).await
}
