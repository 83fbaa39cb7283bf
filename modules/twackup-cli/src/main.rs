//! `twackup USER DIR` -- back up a public Twitter timeline into DIR,
//! one JSON file per tweet. Safe to re-run; each run resumes from what is
//! already on disk.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use twackup_archive::{load_default_config, sync, ArchiveDir};
use twitter_client::TwitterClient;

struct Args {
    user: String,
    dir: PathBuf,
}

/// Exactly two positionals; a USER starting with `-` is taken as a flag
/// attempt and rejected. DIR may be any path, UTF-8 or not.
fn parse_args(args: &[OsString]) -> Option<Args> {
    let [_, user, dir] = args else {
        return None;
    };
    let user = user.to_str()?;
    if user.is_empty() || user.starts_with('-') {
        return None;
    }
    Some(Args {
        user: user.to_string(),
        dir: PathBuf::from(dir),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let prog = argv
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "twackup".to_string());

    let Some(args) = parse_args(&argv) else {
        eprintln!("{prog}: usage: {prog} USER DIR");
        return ExitCode::from(2);
    };

    if let Err(e) = init_tracing() {
        eprintln!("{prog}: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{prog}: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("twackup=info".parse()?)
                .add_directive("twitter_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let (config_path, config) = load_default_config()?;
    config.log_redacted(&config_path);

    let client = TwitterClient::connect(&config.credentials())
        .await
        .context("Failed to authenticate with Twitter")?;

    let store = ArchiveDir::for_process(&args.dir);
    let report = sync(&client, &store, &args.user)
        .await
        .with_context(|| format!("Archiving @{} into {}", args.user, args.dir.display()))?;

    info!(
        user = args.user.as_str(),
        newer = report.newer_saved,
        older = report.older_saved,
        "Archive up to date"
    );
    Ok(())
}
