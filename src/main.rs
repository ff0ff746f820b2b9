use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use saml_pat_report::report::default_output_path;
use saml_pat_report::{Config, GitHubClient, SamlAudit, TerminalProgress};

#[derive(Parser, Debug)]
#[command(name = "saml-pat-report")]
#[command(version)]
#[command(about = "Get SAML authorizations for PATs in one or multiple GitHub org(s)")]
struct Args {
    /// Specific GitHub org(s) to check (defaults to every org visible to the token)
    #[arg(short, long, num_args = 0..)]
    orgs: Vec<String>,

    /// Output results to a JSON file (pass an empty value to skip writing)
    #[arg(short, long)]
    json: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("saml_pat_report=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    tokio::select! {
        result = run(args, config) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nKeyboard interrupt detected, exiting...");
            std::process::exit(1);
        }
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let output = match args.json {
        Some(path) if path.is_empty() => None,
        Some(path) => Some(PathBuf::from(path)),
        None => Some(default_output_path(Local::now())),
    };

    let github = GitHubClient::new(&config)?.with_progress(Arc::new(TerminalProgress::new()));
    tracing::debug!("Using GitHub API at {}", github.base_url());

    let audit = SamlAudit::new(&github);
    let orgs = audit.resolve_orgs(&args.orgs).await?;
    println!("Checking SAML authorizations in orgs: {}\n", orgs.join(", "));

    let report = audit.run(&orgs).await?;

    tracing::info!(
        "Found {} SAML authorizations for PATs across {} org(s)",
        report.total_authorizations(),
        report.len()
    );

    if let Some(path) = output.filter(|_| !report.is_empty()) {
        report.write_json(&path)?;
    }

    Ok(())
}
