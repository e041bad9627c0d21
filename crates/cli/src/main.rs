//! Netprobe CLI - Command-line client for the diagnostics server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::process::ExitCode;
use tabled::{Table, Tabled};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "netprobe")]
#[command(about = "Run network diagnostics through a Netprobe server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server base URL
    #[arg(long, env = "NETPROBE_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Print the raw JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL with headers (curl)
    Curl {
        /// Target URL
        url: String,
    },

    /// Ping a host; a leading http:// or https:// is stripped server-side
    Ping {
        /// Target host or URL
        target: String,
    },

    /// Trace the route to a host
    Tracert {
        /// Target host or URL
        target: String,
    },

    /// Run a shell template with {url} replaced by the target
    Custom {
        /// Command template, e.g. "dig +short {url}"
        #[arg(short, long)]
        template: String,

        /// Target substituted into the template
        url: String,
    },

    /// Check that the server is up
    Health,
}

#[derive(Serialize)]
struct TestRequest<'a> {
    command: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom: Option<&'a str>,
}

#[derive(Deserialize)]
struct TestResponse {
    success: bool,
    command: String,
    output: String,
    error: Option<String>,
    duration: String,
    connection: ConnectionInfo,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct ConnectionInfo {
    target: String,
    timestamp: String,
    os: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
    time: String,
}

#[derive(Tabled)]
struct Summary<'a> {
    command: &'a str,
    target: &'a str,
    duration: &'a str,
    timestamp: &'a str,
    os: &'a str,
}

async fn run_test(base_url: &str, request: &TestRequest<'_>) -> Result<serde_json::Value> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/test", base_url.trim_end_matches('/')))
        .json(request)
        .send()
        .await
        .context("Failed to connect to server")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Server returned {}: {}", status, body.trim());
    }

    response.json().await.context("Failed to parse response")
}

async fn fetch_health(base_url: &str) -> Result<serde_json::Value> {
    reqwest::get(format!("{}/api/health", base_url.trim_end_matches('/')))
        .await
        .context("Failed to connect to server")?
        .error_for_status()?
        .json()
        .await
        .context("Failed to parse response")
}

fn print_result(result: &TestResponse) {
    if result.success {
        println!("{}", format!("✓ {} succeeded", result.command).green().bold());
    } else {
        println!("{}", format!("✗ {} failed", result.command).red().bold());
    }
    println!();

    let summary = Summary {
        command: &result.command,
        target: &result.connection.target,
        duration: &result.duration,
        timestamp: &result.connection.timestamp,
        os: &result.connection.os,
    };
    println!("{}", Table::new(vec![summary]));

    if let Some(error) = &result.error {
        println!();
        println!("  {} {}", "Error:".bold(), error.red());
    }

    if !result.metadata.is_empty() {
        println!();
        for (key, value) in &result.metadata {
            println!("  {} {}", format!("{}:", key).bold(), value);
        }
    }

    println!();
    if result.output.is_empty() {
        println!("{}", "(no output)".yellow());
    } else {
        println!("{}", "Output:".cyan().bold());
        println!("{}", result.output);
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let (command, url, custom) = match &cli.command {
        Commands::Health => {
            let health = fetch_health(&cli.server).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                let health: HealthResponse = serde_json::from_value(health)?;
                println!("  {} {}", "Server:".bold(), cli.server);
                println!("  {} {}", "Status:".bold(), health.status.to_uppercase().green());
                println!("  {} {}", "Time:".bold(), health.time);
            }
            return Ok(true);
        }
        Commands::Curl { url } => ("curl", url.as_str(), None),
        Commands::Ping { target } => ("ping", target.as_str(), None),
        Commands::Tracert { target } => ("tracert", target.as_str(), None),
        Commands::Custom { template, url } => ("custom", url.as_str(), Some(template.as_str())),
    };

    let request = TestRequest {
        command,
        url,
        custom,
    };
    let value = run_test(&cli.server, &request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(value["success"].as_bool().unwrap_or(false));
    }

    let result: TestResponse = serde_json::from_value(value)?;
    print_result(&result);
    Ok(result.success)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
