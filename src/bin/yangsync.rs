//! Command-line front end.
//!
//! `yangsync --list` fetches the catalog and marks new modules for download;
//! `--download` fetches whatever is marked. Both may be given in one
//! invocation, in that order. Any failure, including a single module's
//! download failure, makes the process exit non-zero after the summary.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yangsync::{
    CommandSession, SchemaStore, SessionConfig, config, download_marked, fetch_catalog, reconcile,
    schema_fetcher,
};

#[derive(Debug, Parser)]
#[command(
    name = "yangsync",
    about = "Synchronize YANG schemas from a NETCONF peer into a local directory"
)]
struct Cli {
    /// NETCONF server hostname.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// NETCONF server port.
    #[arg(long, default_value_t = 830)]
    port: u16,

    /// Username for the session.
    #[arg(short = 'u', long, default_value = "root")]
    username: String,

    /// Password for the session.
    #[arg(short = 'p', long, default_value = "")]
    password: String,

    /// Fetch the schema catalog and mark new modules for download.
    #[arg(short = 'l', long)]
    list: bool,

    /// Download every marked module.
    #[arg(long)]
    download: bool,

    /// Schema store directory (or set YANGSYNC_DIR).
    #[arg(short = 'd', long)]
    dir: Option<PathBuf>,

    /// External connector command (or set YANGSYNC_SESSION_CMD).
    #[arg(long)]
    session_cmd: Option<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.list && !cli.download {
        bail!("nothing to do: pass --list, --download, or both");
    }

    let store = SchemaStore::new(config::resolve_store_dir(cli.dir));
    let mut session = CommandSession::new(SessionConfig {
        host: cli.host,
        port: cli.port,
        username: cli.username,
        password: cli.password,
        command: config::resolve_session_command(cli.session_cmd),
    });

    if cli.list {
        let catalog = fetch_catalog(&mut session)?;
        let outcome = reconcile(&store, &catalog)?;
        println!(
            "Marked {} modules for download, skipped {}",
            outcome.marked, outcome.skipped
        );
    }

    if cli.download {
        let report = download_marked(&store, schema_fetcher(&mut session))?;
        for line in &report.messages {
            println!("{line}");
        }
        println!("{}", report.summary());
        if report.failed > 0 {
            bail!("{} module(s) failed to download", report.failed);
        }
    }

    Ok(())
}
