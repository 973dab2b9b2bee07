//! Fetches the GitHub Actions artifact of the most recent commit that has one.

use std::{io::Write as _, path::PathBuf, process::ExitCode};

use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, Subcommand};
use latest_artifact::{
    Error,
    api::{
        Credential, GitHubClient, RepositoryRef, ReqwestTransport,
        contents::{fetch_file, fetch_file_content},
    },
    transactions::{install_artifacts, latest_run_page},
};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Exit code of the conditions an operator has to act on: credentials, quota, missing artifacts.
const EXIT_OPERATIONAL: u8 = 1;
/// Exit code of any other failure.
const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download and extract the GDS artifact of the most recent commit that has one
    Install {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
        /// Directory to extract the artifact to
        dir: PathBuf,
    },
    /// Print the page of the most recent gds workflow run
    LatestRun {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
    },
    /// Print a file of the repository's default branch
    Cat {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
        /// Path of the file inside the repository
        path: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download a URL to a file without authentication
    Fetch {
        /// URL to download
        url: String,
        /// File to write
        file: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            match err.downcast_ref::<Error>() {
                Some(err) if err.is_operational() => ExitCode::from(EXIT_OPERATIONAL),
                _ => ExitCode::from(EXIT_FAILURE),
            }
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Install { url, dir } => {
            let client = GitHubClient::new(ReqwestTransport::new(), Credential::from_env());
            install_artifacts(&client, &url, &dir).await?;
        }
        Command::LatestRun { url } => {
            let client = GitHubClient::new(ReqwestTransport::new(), Credential::from_env());
            match latest_run_page(&client, &url).await? {
                Some(page) => println!("{page}"),
                None => warn!("no gds run found for {url}"),
            }
        }
        Command::Cat { url, path, output } => {
            let repo = RepositoryRef::parse(&url).map_err(Error::from)?;
            let client = GitHubClient::new(ReqwestTransport::new(), Credential::from_env());
            let content = fetch_file_content(&client, &repo, &path)
                .await?
                .ok_or_else(|| anyhow!("{path} not found in {repo}"))?;

            match output {
                Some(output) => tokio::fs::write(&output, &content)
                    .await
                    .with_context(|| format!("failed to write {}", output.display()))?,
                None => std::io::stdout().write_all(&content)?,
            }
        }
        Command::Fetch { url, file } => {
            fetch_file(&ReqwestTransport::new(), &url, &file).await?;
        }
    }
    Ok(())
}
