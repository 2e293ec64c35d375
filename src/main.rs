mod cli;

use menagerie::{config, records::RecordService, server};
use menagerie_store::MetadataStore;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Menagerie server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(
        "Metadata file {:?}, uploads in {:?}",
        config.storage.metadata_path(),
        config.storage.upload_path()
    );

    // A corrupt metadata file aborts startup rather than being overwritten
    let records = RecordService::open(&config.storage).context("Failed to open record storage")?;
    tracing::info!("Loaded {} records", records.metadata().len());

    let server_result = server::start_server(config, records).await;

    tracing::info!("Shutting down...");
    server_result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "menagerie=trace,menagerie_store=trace,tower_http=debug".to_string()
        } else {
            "menagerie=debug,menagerie_store=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::List { json } => list_records(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("menagerie {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn list_records(config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let metadata_path = config.storage.metadata_path();

    // Listing never creates the store; a missing file means no records yet
    let all = if metadata_path.exists() {
        MetadataStore::load_all(&metadata_path)
            .context("Failed to open record storage")?
            .list()
    } else {
        tracing::debug!("No metadata file at {:?}", metadata_path);
        Vec::new()
    };

    if json {
        let json_str = serde_json::to_string_pretty(&all)?;
        println!("{}", json_str);
        return Ok(());
    }

    if all.is_empty() {
        println!("No records.");
        return Ok(());
    }

    for record in &all {
        println!(
            "{}  {} ({} / {})  {}",
            record.id, record.name, record.kind, record.category, record.file_path
        );
    }
    println!("\n{} record(s)", all.len());

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Metadata file: {:?}", config.storage.metadata_path());
            println!("  Upload dir: {:?}", config.storage.upload_path());
            println!("  Public prefix: {}", config.storage.public_prefix);
            println!("  Max upload: {} bytes", config.storage.max_upload_bytes);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
