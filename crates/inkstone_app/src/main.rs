mod commands;
mod config;
mod render;
mod shell;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use inkstone_engine::{FileDraftStore, ReqwestApiClient};
use inkstone_logging::{ink_info, ink_warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::commands::parse_command;
use crate::config::{load_config, ConfigSource, CONFIG_FILENAME};
use crate::shell::{Flow, Shell};

const LOG_FILENAME: &str = "inkstone.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);
    let (config, source) = load_config(config_path);
    let (destination, level) = config.log_target();
    let logging = inkstone_logging::initialize(destination, level, Path::new(LOG_FILENAME));
    if !logging {
        eprintln!("inkstone: logging unavailable");
    }
    report_config(config_path, &source, logging);
    ink_info!("Starting inkstone against {}", config.api_base);

    let api = ReqwestApiClient::new(config.api_settings())
        .with_context(|| format!("invalid api_base {:?}", config.api_base))?;
    let store = FileDraftStore::new(&config.drafts_dir);
    let mut shell = Shell::new(Arc::new(store), Arc::new(api), config.author.clone());

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let first = shell.start().await;
    write_block(&mut stdout, &first).await?;

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            write_block(&mut stdout, "").await?;
            continue;
        }
        let output = match parse_command(&line) {
            Ok(command) => {
                let (flow, output) = shell.handle(command).await;
                if flow == Flow::Quit {
                    break;
                }
                output
            }
            Err(err) => err,
        };
        write_block(&mut stdout, &output).await?;
    }

    ink_info!("Shutting down");
    Ok(())
}

fn report_config(path: &Path, source: &ConfigSource, logging: bool) {
    let problem = match source {
        ConfigSource::File => {
            ink_info!("Loaded config from {:?}", path);
            return;
        }
        ConfigSource::Missing => {
            ink_info!("No config at {:?}, using defaults", path);
            return;
        }
        ConfigSource::Unreadable(err) => format!("failed to read config from {path:?}: {err}"),
        ConfigSource::Invalid(err) => format!("failed to parse config from {path:?}: {err}"),
    };
    if logging {
        ink_warn!("{problem}, using defaults");
    } else {
        eprintln!("inkstone: {problem}, using defaults");
    }
}

async fn write_block(stdout: &mut tokio::io::Stdout, text: &str) -> anyhow::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    if !text.is_empty() && !text.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.write_all(b"inkstone> ").await?;
    stdout.flush().await?;
    Ok(())
}
