//! drainq CLI - Command-line client for the drainq daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9528";

#[derive(Parser)]
#[command(name = "drainq-cli")]
#[command(about = "drainq queue store CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "DRAINQ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Push an item into a queue
    Submit {
        /// Queue name (created on first write)
        #[arg(short, long)]
        queue: String,

        /// Item content; parsed as JSON when possible, otherwise sent as text
        #[arg(short, long)]
        content: String,

        /// Always send content as a plain string
        #[arg(long)]
        raw: bool,
    },

    /// Show every queue with its length and purge count
    Status,

    /// Show store-wide totals
    Stats,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    name: String,
    length: usize,
    purge_count: u64,
}

#[derive(Deserialize)]
struct SnapshotResult {
    queues: Vec<QueueRow>,
    total_queues: usize,
}

/// Item content as sent over the wire
fn content_value(content: &str, raw: bool) -> serde_json::Value {
    if raw {
        return serde_json::Value::String(content.to_string());
    }
    serde_json::from_str(content).unwrap_or_else(|_| serde_json::Value::String(content.to_string()))
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            queue,
            content,
            raw,
        } => {
            let params = json!({
                "queue": queue,
                "content": content_value(&content, raw),
            });

            match call_rpc(&cli.rpc_url, "queue.submit.v1", params).await {
                Ok(result) => {
                    println!("{}", "✓ Item accepted".green().bold());
                    println!("  {} {}", "Queue:".bold(), queue);
                    println!("  {} {}", "Length:".bold(), result["length"]);
                }
                Err(e) => {
                    println!("{} {}", "✗ Item rejected:".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Status => {
            let result = call_rpc(&cli.rpc_url, "queue.snapshot.v1", json!({})).await?;
            let snapshot: SnapshotResult = serde_json::from_value(result)?;

            println!("{}", "Queue Status".cyan().bold());
            println!();

            if snapshot.queues.is_empty() {
                println!("{}", "No queues yet".yellow());
            } else {
                println!("{}", Table::new(snapshot.queues));
            }
            println!();
            println!("  {} {}", "Total Queues:".bold(), snapshot.total_queues);
        }

        Commands::Stats => {
            println!("{}", "System Stats".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Queues:".bold(), stats["total_queues"]);
                    println!("  {} {}", "Items held:".bold(), stats["total_items"]);
                    println!("  {} {}", "Purges:".bold(), stats["total_purges"]);
                    println!("  {} {}", "Capacity:".bold(), stats["default_capacity"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
