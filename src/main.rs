mod cli;

use clipforged::{
    clip::{ClipOrchestrator, ClipRequest, ClipSettings},
    config, server,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

async fn start_server(host: String, port: u16, config_path: Option<&Path>) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting clipforged server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipforged=trace,clipforged_av=trace,clipforged_common=debug,tower_http=debug"
                .to_string()
        } else {
            "clipforged=debug,clipforged_av=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Clip {
            url,
            start,
            end,
            title,
            output_dir,
        } => {
            let mut request = ClipRequest::new(url, start, end);
            if let Some(title) = title {
                request = request.with_title(title);
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(clip_once(request, &output_dir, cli.config.as_deref()))
        }
        Commands::CheckTools => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_tools(cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("clipforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn clip_once(
    request: ClipRequest,
    output_dir: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let orchestrator = ClipOrchestrator::new(ClipSettings::from_config(&config));

    let output = orchestrator.extract(request).await.map_err(|e| match &e.details {
        Some(details) => anyhow::anyhow!("{}\n{}", e, details),
        None => anyhow::Error::new(e),
    })?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    let destination: PathBuf = output_dir.join(&output.filename);
    std::fs::write(&destination, &output.bytes)
        .with_context(|| format!("Failed to write clip to {:?}", destination))?;

    println!(
        "Saved {} ({} bytes, {})",
        destination.display(),
        output.byte_size(),
        output.content_type
    );

    Ok(())
}

async fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let orchestrator = ClipOrchestrator::new(ClipSettings::from_config(&config));
    let tool = orchestrator.check_tool().await;

    let status = if tool.available { "✓" } else { "✗" };
    print!("{} {}", status, tool.name);
    if let Some(ref version) = tool.version {
        print!(" ({})", version.lines().next().unwrap_or(""));
    }
    println!(" - {}", tool.path.display());
    if let Some(ref error) = tool.error {
        println!("    {}", error);
    }

    println!();
    if tool.available {
        println!("All required tools are available!");
    } else {
        println!("yt-dlp is missing. Install it or set tools.ytdlp_path in the config.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let settings = ClipSettings::from_config(&config);
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  CORS enabled: {}", config.server.cors);
    println!("  yt-dlp: {}", settings.tool_path.display());
    println!("  Temp dir: {}", settings.temp_dir.display());
    println!("  Container: {}", settings.section.output_container);
    println!("  Timeout: {}s", settings.timeout.as_secs());
    println!("  Max concurrent jobs: {}", settings.max_concurrent_jobs);

    Ok(())
}
