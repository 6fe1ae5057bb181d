//! Pipelens CLI - relationship graph explorer for the content pipeline.

use clap::Parser;
use pipelens::cli::{Cli, Commands, ConfigCommands, flag_pair};
use pipelens::commands::{self, Output};
use pipelens::config::{self, ConfigOverrides, OutputFormat, ResolvedConfig};
use pipelens::source;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `pipelens=trace`).
const LOG_ENV: &str = "PLENS_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let overrides = build_overrides(&cli);
    let resolved = match config::load_config(&overrides) {
        Ok(resolved) => resolved,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };

    let human = resolved.is_human();
    match run_command(cli, resolved) {
        Ok(text) => println!("{}", text),
        Err(e) => exit_with_error(&e, human),
    }
}

fn exit_with_error(e: &pipelens::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_overrides(cli: &Cli) -> ConfigOverrides {
    let mut overrides = ConfigOverrides::new();
    if let Some(url) = &cli.api_url {
        overrides = overrides.with_api_url(url.clone());
    }
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    match &cli.command {
        Commands::Catalog {
            include_orphaned,
            exclude_orphaned,
            ..
        } => {
            if let Some(include) = flag_pair(*include_orphaned, *exclude_orphaned) {
                overrides = overrides.with_include_orphaned(include);
            }
        }
        Commands::Graph {
            radius,
            include_orphaned,
            exclude_orphaned,
            ..
        } => {
            if let Some(include) = flag_pair(*include_orphaned, *exclude_orphaned) {
                overrides = overrides.with_include_orphaned(include);
            }
            if let Some(radius) = radius {
                overrides = overrides.with_base_radius(*radius);
            }
        }
        Commands::Layout {
            radius: Some(radius),
            ..
        } => {
            overrides = overrides.with_base_radius(*radius);
        }
        Commands::Layout { .. } | Commands::Config { .. } => {}
    }
    overrides
}

fn render<T: Output>(result: &T, human: bool) -> String {
    if human {
        result.to_human()
    } else {
        result.to_json()
    }
}

fn run_command(cli: Cli, resolved: ResolvedConfig) -> Result<String, pipelens::Error> {
    let human = resolved.is_human();
    let explorer_config = resolved.explorer_config();

    match cli.command {
        Commands::Catalog { kind, search, .. } => {
            let source = source::open(cli.data.as_deref(), resolved.api_url())?;
            let result = block_on(commands::catalog(
                source,
                explorer_config,
                kind,
                search.as_deref(),
            ))??;
            Ok(render(&result, human))
        }
        Commands::Graph { node_id, .. } => {
            let source = source::open(cli.data.as_deref(), resolved.api_url())?;
            let result = block_on(commands::graph(source, explorer_config, &node_id))??;
            Ok(render(&result, human))
        }
        Commands::Layout { count, .. } => {
            let result = commands::layout(count, explorer_config.layout)?;
            Ok(render(&result, human))
        }
        Commands::Config { command } => {
            let dir = config::config_dir();
            match command {
                ConfigCommands::Show => {
                    let result = commands::config_show(resolved, dir.as_deref());
                    Ok(render(&result, human))
                }
                ConfigCommands::Set { key, value } => {
                    let dir = dir.ok_or_else(no_config_dir)?;
                    let result = commands::config_set(&dir, &key, &value)?;
                    Ok(render(&result, human))
                }
                ConfigCommands::Path => {
                    let dir = dir.ok_or_else(no_config_dir)?;
                    Ok(render(&commands::config_path(&dir), human))
                }
            }
        }
    }
}

fn no_config_dir() -> pipelens::Error {
    pipelens::Error::Other(format!(
        "Could not determine config directory; set {}",
        config::CONFIG_DIR_ENV
    ))
}

/// Drive a future on a single-threaded runtime.
fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, pipelens::Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
