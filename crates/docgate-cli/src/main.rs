//! docgate CLI
//!
//! Command-line access to a tenant-scoped document store.
//!
//! # Commands
//!
//! - `list` - Print every document in a collection
//! - `get` - Print one document, or `null` if absent
//! - `save` - Create or update a document read from an argument or stdin
//! - `remove` - Delete a document
//! - `refresh` - Emit a refresh notification for a collection

use std::io::Read;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docgate_client::{DocumentGateway, GatewayConfig, SaveMode, DEFAULT_TENANT_HEADER};

/// Tenant-scoped document store client.
#[derive(Parser)]
#[command(name = "docgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(global = true, long, env = "DOCGATE_BASE_URL")]
    base_url: Option<String>,

    /// Tenant identifier
    #[arg(global = true, long, env = "DOCGATE_TENANT_ID")]
    tenant: Option<String>,

    /// Application namespace
    #[arg(global = true, long, env = "DOCGATE_NAMESPACE")]
    namespace: Option<String>,

    /// Header carrying the tenant identifier
    #[arg(global = true, long, env = "DOCGATE_TENANT_HEADER", default_value = DEFAULT_TENANT_HEADER)]
    tenant_header: String,

    /// What `save` does when an update target does not exist
    #[arg(global = true, long, env = "DOCGATE_SAVE_MODE", value_enum, ignore_case = true, default_value_t = Mode::Upsert)]
    mode: Mode,

    /// Connect timeout in seconds
    #[arg(global = true, long, env = "DOCGATE_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    connect_timeout_secs: u64,

    /// Enable debug logging
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Create the document when the update target is missing
    Upsert,
    /// Fail when the update target is missing
    Direct,
}

impl From<Mode> for SaveMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Upsert => SaveMode::Upsert,
            Mode::Direct => SaveMode::Direct,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every document in a collection
    List { collection: String },

    /// Print one document
    Get { collection: String, id: String },

    /// Create or update a document
    Save {
        collection: String,

        /// JSON object; read from stdin when omitted
        document: Option<String>,
    },

    /// Delete a document
    Remove { collection: String, id: String },

    /// Ask listeners to re-read a collection
    Refresh { collection: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    run(cli).await
}

fn init_tracing(verbose: bool) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries documents.
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<GatewayConfig> {
    let base_url = cli
        .base_url
        .clone()
        .context("--base-url or DOCGATE_BASE_URL is required")?;
    let tenant = cli
        .tenant
        .clone()
        .context("--tenant or DOCGATE_TENANT_ID is required")?;
    let namespace = cli
        .namespace
        .clone()
        .context("--namespace or DOCGATE_NAMESPACE is required")?;

    Ok(GatewayConfig::new(base_url, tenant, namespace)
        .with_tenant_header(cli.tenant_header.clone())
        .with_save_mode(cli.mode.into())
        .with_connect_timeout(Duration::from_secs(cli.connect_timeout_secs)))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let gateway = DocumentGateway::new(build_config(&cli)?)?;
    info!(
        tenant = %gateway.tenant().tenant_id(),
        namespace = %gateway.tenant().namespace(),
        mode = %gateway.save_mode(),
        "Using backend {}",
        gateway.tenant().base_url()
    );

    let _subscription = gateway.on_change(|event| {
        info!(collection = %event.collection, kind = %event.kind, "Collection changed");
    });

    let output = match cli.command {
        Commands::List { collection } => {
            let docs: Vec<Value> = gateway.list(&collection).await?;
            Value::Array(docs)
        }
        Commands::Get { collection, id } => {
            let doc: Option<Value> = gateway.get(&collection, &id).await?;
            doc.unwrap_or(Value::Null)
        }
        Commands::Save {
            collection,
            document,
        } => {
            let raw = match document {
                Some(raw) => raw,
                None => read_stdin()?,
            };
            let doc = parse_document(&raw)?;
            gateway.save(&collection, &doc).await?
        }
        Commands::Remove { collection, id } => gateway.remove(&collection, &id).await?,
        Commands::Refresh { collection } => {
            gateway.refresh(&collection)?;
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read document from stdin")?;
    Ok(buf)
}

fn parse_document(raw: &str) -> anyhow::Result<Value> {
    let doc: Value = serde_json::from_str(raw).context("document is not valid JSON")?;
    if !doc.is_object() {
        bail!("document must be a JSON object");
    }
    Ok(doc)
}
