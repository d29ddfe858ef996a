use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use barista_assist::config::AgentConfig;
use barista_assist::context::SessionContext;
use barista_assist::store::{JsonFileStore, OrderStore};
use barista_assist::task::OrderTask;
use barista_assist::tools::ToolRegistry;
use barista_assist::tools::record::register_order_tools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = AgentConfig::default();
    if let Ok(path) = std::env::var("BARISTA_ORDER_PATH") {
        config.order_path = path.into();
    }
    if let Ok(ms) = std::env::var("BARISTA_PERSIST_TIMEOUT_MS") {
        config.persist_timeout = Duration::from_millis(ms.parse().unwrap_or(2000));
    }
    if let Ok(retries) = std::env::var("BARISTA_PERSIST_RETRIES") {
        config.persist_retries = retries.parse().unwrap_or(config.persist_retries);
    }
    let room = std::env::var("BARISTA_ROOM").unwrap_or_else(|_| "cli".to_string());

    eprintln!("☕ Barista Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Order file: {}", config.order_path.display());
    eprintln!("   Commands: <tool> <value>, e.g. `record_drink_type latte`");
    eprintln!("   Extras take a comma-separated list. /quit to exit.\n");

    let store: Arc<dyn OrderStore> = Arc::new(JsonFileStore::new(config.order_path.clone()));
    let (task, mut completion) = OrderTask::shared(store, &config);

    let registry = ToolRegistry::new();
    register_order_tools(&registry, task).await;

    let ctx = SessionContext::new(room);
    tracing::info!(session = %ctx.session_id, room = %ctx.room, "Session started");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    eprint!("> ");

    loop {
        tokio::select! {
            biased;

            order = &mut completion => {
                if let Ok(order) = order {
                    println!("\n{}\n", order.summary());
                }
                break;
            }

            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        if line == "/quit" {
                            break;
                        }
                        let (name, args) = line.split_once(' ').unwrap_or((line, ""));
                        let Some(tool) = registry.get(name).await else {
                            println!(
                                "\nUnknown tool: {name}. Available: {}\n",
                                registry.list().await.join(", ")
                            );
                            eprint!("> ");
                            continue;
                        };
                        match tool.execute(cli_params(name, args), &ctx).await {
                            Ok(out) => println!("\n{}\n", out.content),
                            Err(e) => tracing::error!("Tool {} failed: {}", name, e),
                        }
                        eprint!("> ");
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Map a CLI line to the named tool's JSON parameters.
fn cli_params(tool: &str, args: &str) -> serde_json::Value {
    match tool {
        "record_drink_type" => json!({"drink_type": args}),
        "record_size" => json!({"size": args}),
        "record_milk" => json!({"milk": args}),
        "record_name" => json!({"name": args}),
        "record_extras" => {
            let extras: Vec<&str> = args
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            json!({"extras": extras})
        }
        _ => json!({}),
    }
}
