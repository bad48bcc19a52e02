use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use tracing::info;

use crate::logging::{init_logging, LogConfig};
use crate::pipeline::{OptionsPipe, PreflightRequest};
use crate::runtime_config::RuntimeConfig;
use crate::server::{HttpServer, PreflightService, ServerHandle};
use crate::settings::Settings;
use crate::site::{SiteIdentity, DEFAULT_PARTITION};

/// Command-line interface for the preflight service
#[derive(Debug, Parser)]
#[command(name = "edge-preflight")]
#[command(about = "Answers CORS preflight requests from per-site configuration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Settings file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Listen address, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Answer one request and print the response as JSON
    Resolve {
        /// Settings file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        #[arg(long)]
        owner: String,

        #[arg(long)]
        repo: String,

        #[arg(long = "ref")]
        git_ref: String,

        #[arg(long, default_value = DEFAULT_PARTITION)]
        partition: String,

        /// Request path, e.g. `/blog/post` or `/_rum-challenge`
        #[arg(long)]
        path: String,

        #[arg(long, default_value = "OPTIONS")]
        method: String,

        /// Request header as `name:value` (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
}

/// Parse a `name:value` header argument
pub fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected name:value, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{}'", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { config, bind } => {
            let _logging = init_logging(&LogConfig::from_env())?;
            RuntimeConfig::from_env().apply();

            let settings = Settings::load(&config)?;
            let bind = bind.unwrap_or_else(|| settings.server.bind.clone());
            let handle = start_service(&settings, &bind)?;
            wait_for_shutdown(handle)
        }
        Commands::Resolve {
            config,
            owner,
            repo,
            git_ref,
            partition,
            path,
            method,
            headers,
        } => {
            let settings = Settings::load(&config)?;
            let pipe = OptionsPipe::new(settings.build_loader()?, settings.buckets());
            let site = SiteIdentity::new(owner, repo, git_ref, partition);

            let method = Method::from_bytes(method.as_bytes())
                .map_err(|_| anyhow!("Invalid HTTP method '{}'", method))?;
            let mut req = PreflightRequest::new(method, path);
            for (name, value) in headers {
                req = req.with_header(&name, value);
            }

            let res = pipe.respond(&site, &req);
            println!("{}", serde_json::to_string_pretty(&res.to_json())?);
            Ok(())
        }
    }
}

/// Build the service from settings and bind it
pub fn start_service(settings: &Settings, bind: &str) -> Result<ServerHandle> {
    let pipe = OptionsPipe::new(settings.build_loader()?, settings.buckets());
    let service = PreflightService::new(pipe).with_default_site(settings.site.clone());
    let handle = HttpServer(service)
        .start(bind)
        .with_context(|| format!("Failed to bind {}", bind))?;
    handle.wait_ready().context("Server did not become ready")?;
    info!(
        addr = %handle.addr(),
        default_site = settings.site.is_some(),
        "Preflight service ready"
    );
    Ok(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    if handle.join().is_err() {
        anyhow::bail!("Server coroutine panicked");
    }
    Ok(())
}
