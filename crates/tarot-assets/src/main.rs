//! tarot-assets CLI

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tarot_assets::{
    AssetSync, GithubContentsClient, RepoConfig, SyncMode, SyncOptions, UrlRewriter, cards,
    contents,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Point every card's imageUrl in a source file at the image host
    Rewrite {
        /// Source file holding the card definitions
        file: PathBuf,

        /// Base URL the card image paths are appended to
        #[arg(long, default_value = cards::DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// List the remote image folders and download them or write a manifest
    Sync {
        #[arg(long, value_enum, default_value_t = Mode::Download)]
        mode: Mode,

        /// Local directory mirroring the remote folders (download mode)
        #[arg(long, default_value = "public/tarot-cards/result")]
        target: PathBuf,

        /// Manifest file (manifest mode)
        #[arg(long, default_value = "tarot-image-urls.json")]
        output: PathBuf,

        /// Remote folder to process; repeat for several
        #[arg(long = "folder", default_values_t = ["Major".to_string(), "Minor".to_string()])]
        folders: Vec<String>,

        /// Remote directory holding the folders
        #[arg(long, default_value = "result")]
        root: String,

        #[arg(long, default_value = contents::DEFAULT_OWNER)]
        owner: String,

        #[arg(long, default_value = contents::DEFAULT_REPO)]
        repo: String,

        #[arg(long = "ref", default_value = contents::DEFAULT_REF)]
        reference: String,

        #[arg(long, default_value = contents::DEFAULT_API_BASE)]
        api_base: String,

        /// Pause between downloads in milliseconds
        #[arg(long, default_value_t = 200)]
        pause_ms: u64,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Download,
    Manifest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Rewrite { file, base_url } => {
            let rewriter = UrlRewriter::new(base_url);
            let report = rewriter
                .rewrite_file(&file, cards::all())
                .with_context(|| format!("rewriting {}", file.display()))?;

            tracing::info!(
                base_url = rewriter.base_url(),
                updated = report.updated.len(),
                unchanged = report.unchanged.len(),
                missing = report.missing.len(),
                "Rewrite finished"
            );
        }

        Command::Sync {
            mode,
            target,
            output,
            folders,
            root,
            owner,
            repo,
            reference,
            api_base,
            pause_ms,
        } => {
            if folders.is_empty() {
                bail!("at least one --folder is required");
            }

            let client = GithubContentsClient::new(RepoConfig {
                api_base,
                owner,
                repo,
                reference,
                ..Default::default()
            })?;

            let mode = match mode {
                Mode::Download => SyncMode::Download {
                    target_dir: target,
                    pause: Duration::from_millis(pause_ms),
                },
                Mode::Manifest => SyncMode::Manifest { output },
            };

            let report = AssetSync::new(client, SyncOptions { root, folders })
                .run(&mode)
                .await?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
