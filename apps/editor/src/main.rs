//! # Quill Editor
//!
//! Command-line authoring client. Drafts posts through a running API server
//! and publishes them there.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quill_infra::HttpBlogClient;

mod cli;
mod commands;

use cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    init_logging(args.verbose);

    let client = HttpBlogClient::new(&args.server);
    tracing::debug!(server = %args.server, "Using Quill server");

    match args.command {
        Command::Generate { topic, out } => {
            let html = commands::generate(&client, &topic).await?;
            emit(&html, out.as_deref())?;
        }
        Command::Publish { title, file } => {
            let html = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading document from stdin")?;
                    buf
                }
            };
            println!("{}", commands::publish(&client, &title, html).await?);
        }
        Command::Compose(compose) => {
            let (html, report) = commands::compose(&client, &compose).await?;
            emit(&html, compose.out.as_deref())?;
            if let Some(report) = report {
                eprintln!("{report}");
            }
        }
    }

    Ok(())
}

/// Uses `RUST_LOG` if set, otherwise `info` or `debug` for `--verbose`.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so the document on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(html: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "Document written");
        }
        None => println!("{html}"),
    }
    Ok(())
}
