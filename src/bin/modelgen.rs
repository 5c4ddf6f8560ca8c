//! modelgen CLI - generate models, controllers and routes from live database schemas
//!
//! Per-connection failures are reported but do not change the exit code;
//! only configuration errors and a failed route flush exit non-zero.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use modelgen::{GeneratorConfig, GenerationReport};

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(version, about = "Generate models and controllers based on database tables and connections", long_about = None)]
struct Cli {
    /// Path to modelgen.yaml
    #[arg(short, long, global = true, default_value = "modelgen.yaml")]
    config: PathBuf,

    /// Override paths.base from the config file
    #[arg(short, long, global = true)]
    base_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate models, controllers and routes for one or all connections
    #[command(alias = "make:models")]
    MakeModels {
        /// Connection to process (default: every configured connection)
        connection: Option<String>,
    },

    /// List configured connections
    Connections,
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = load_config(&cli.config, cli.base_path).and_then(|config| match cli.command {
        Commands::MakeModels { connection } => make_models(config, connection),
        Commands::Connections => {
            list_connections(&config);
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: &Path, base_path: Option<PathBuf>) -> Result<GeneratorConfig, String> {
    let mut config = GeneratorConfig::from_file(path).map_err(|e| e.to_string())?;
    if let Some(base) = base_path {
        config.paths.base = base;
    }
    Ok(config)
}

fn list_connections(config: &GeneratorConfig) {
    for name in config.connection_names() {
        println!("{}", name);
    }
}

#[cfg(feature = "mysql")]
fn make_models(config: GeneratorConfig, connection: Option<String>) -> Result<(), String> {
    use modelgen::{Generator, LumenTemplate, MysqlSchemaReader};

    println!("🔧 Generating from {} connection(s)...", match &connection {
        Some(name) => format!("'{}'", name),
        None => format!("{} configured", config.connections.len()),
    });

    let reader = MysqlSchemaReader::new(config.connections.clone(), config.pool.clone());
    let target = LumenTemplate::new(&config.target);
    let mut generator = Generator::new(config, reader, target);

    let report = generator.run(connection.as_deref()).map_err(|e| e.to_string())?;
    print_summary(&report);

    Ok(())
}

#[cfg(not(feature = "mysql"))]
fn make_models(_config: GeneratorConfig, _connection: Option<String>) -> Result<(), String> {
    Err("modelgen was built without database support (enable the `mysql` feature)".to_string())
}

#[cfg_attr(not(feature = "mysql"), allow(dead_code))]
fn print_summary(report: &GenerationReport) {
    println!();
    for connection in &report.connections {
        match &connection.error {
            None => println!("  ✓ {}: {} table(s)", connection.connection, connection.tables.len()),
            Some(e) => println!(
                "  ✗ {}: {} table(s) before error: {}",
                connection.connection,
                connection.tables.len(),
                e
            ),
        }
    }
    println!("  ✓ Appended {} route block(s)", report.routes_appended);
    println!("✨ Generation complete!");
}
