use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use runsweep::config::Config;
use runsweep::filter::LocationFilter;
use runsweep::gitlab::client::GitLabClient;
use runsweep::gitlab::runners::RunnerDetails;
use runsweep::sweep::Sweeper;
use tracing::Level;

const LONG_ABOUT: &str = "\
Finds all offline runners the given token can administer. Without the
'--approve' flag the tool only reports the offline runners with some
additional information. With '--approve' every offline runner that
survives the filters is deleted.

Variables:
  GITLAB_TOKEN   - the GitLab token used to access the GitLab instance
  GITLAB_HOST    - the GitLab host to talk to [default: https://gitlab.com]
  LOG_LEVEL      - log verbosity when --log-level is not given [default: info]

Examples:
  runsweep                      report all stale runners the token can administer
  runsweep --approve            delete all stale runners the token can administer
  runsweep --exclude 1234       report stale runners, leaving out those scoped to group/project 1234
  runsweep --include '^prefix'  report stale runners scoped to a group/project matching ^prefix";

/// Find and purge stale GitLab CI runners
#[derive(Parser, Debug)]
#[command(name = "runsweep", version, about, long_about = LONG_ABOUT)]
struct Args {
    /// Acknowledge purging all stale runners instead of only reporting them
    #[arg(short, long)]
    approve: bool,

    /// Filter out runners scoped to the given group/project, by name or id.
    /// Exclude takes precedence over include
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Regular expression include filter matched against group and project
    /// names. A runner scoped to one matching group or project is included
    #[arg(short, long)]
    include: Option<String>,

    /// Log level, overriding LOG_LEVEL from environment or config file
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }

    fn from_name(name: &str) -> Self {
        <Self as ValueEnum>::from_str(name, true).unwrap_or_else(|_| {
            eprintln!("Unknown log level {name:?}, falling back to info");
            LogLevel::Info
        })
    }
}

fn setup_logging(level: LogLevel) {
    let Some(tracing_level) = level.to_tracing_level() else {
        return;
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load();

    let log_level = args
        .log_level
        .unwrap_or_else(|| LogLevel::from_name(&config.effective_log_level()));
    setup_logging(log_level);

    let Some(token) = config.effective_token() else {
        bail!("GITLAB_TOKEN env var not set");
    };
    let host = config.effective_host();

    let exclude = if args.exclude.is_empty() {
        config.exclude.clone().unwrap_or_default()
    } else {
        args.exclude.clone()
    };
    let include = args.include.clone().or_else(|| config.include.clone());
    let filter = LocationFilter::new(exclude, include.as_deref())?;

    let client = GitLabClient::new(&host, &token)?;
    tracing::info!("Using host: {host}");

    let sweeper = Sweeper::new(&client, filter);
    let found = sweeper.collect_offline_runners().await?;
    let stale = sweeper.stale_runner_details(&found).await;

    if args.approve {
        sweeper.cleanup_runners(&stale).await;
    } else {
        print_stale_runners(&stale);
    }

    Ok(())
}

fn print_stale_runners(stale: &[RunnerDetails]) {
    if stale.is_empty() {
        println!("No stale runners found!");
        return;
    }

    println!();
    for runner in stale {
        let groups: Vec<&str> = runner.groups.iter().map(|g| g.name.as_str()).collect();
        let projects: Vec<&str> = runner.projects.iter().map(|p| p.name.as_str()).collect();
        println!(
            "{} - {} - {} - {} - {:?} - {:?}",
            runner.id, runner.runner_type, runner.description, runner.online, groups, projects
        );
    }
}
