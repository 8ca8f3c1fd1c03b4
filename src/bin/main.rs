//! stargen CLI - Compile star-schema reports to SQL
//!
//! Usage:
//!   stargen compile <schema> [-d <dimension>]... [-m <measure>]...
//!   stargen describe <schema>
//!   stargen serve [--schema <schema>] [--port <port>]
//!
//! Examples:
//!   stargen compile models/sales.toml -d "Store Name" -m "Products Sold"
//!   stargen compile models/sales.toml -m "Products Sold" --case-sensitive --check
//!   stargen describe models/sales.json

use clap::{Parser, Subcommand};
use stargen::binding::{bind_report, describe_star, BindingOptions, ReportRequest};
use stargen::config::Settings;
use stargen::loader::load_schema;
use stargen::sql::validate_sql;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stargen")]
#[command(about = "stargen - Compile star-schema report selections into aggregate SQL")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to STARGEN_CONFIG, ./stargen.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a selection of dimensions and measures to SQL
    Compile {
        /// Path to the schema document (.toml or .json)
        schema: Option<PathBuf>,

        /// Dimension to group by (repeatable, in output order)
        #[arg(short, long = "dimension")]
        dimensions: Vec<String>,

        /// Measure to aggregate (repeatable, in output order)
        #[arg(short, long = "measure")]
        measures: Vec<String>,

        /// Quote table and column identifiers
        #[arg(long)]
        case_sensitive: bool,

        /// Log the compiled query
        #[arg(long)]
        log_query: bool,

        /// Parse the generated SQL before printing it
        #[arg(long)]
        check: bool,
    },

    /// List the dimensions and measures of a schema as JSON
    Describe {
        /// Path to the schema document (.toml or .json)
        schema: Option<PathBuf>,
    },

    /// Serve metadata and report compilation over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Path to the schema document (.toml or .json)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compile {
            schema,
            dimensions,
            measures,
            case_sensitive,
            log_query,
            check,
        } => {
            let options = BindingOptions::from(settings.report)
                .with_case_sensitive(case_sensitive || settings.report.case_sensitive)
                .with_log_query(log_query || settings.report.log_query);
            let request = ReportRequest {
                dimensions,
                measures,
            };
            cmd_compile(schema, &settings, request, options, check)
        }
        Commands::Describe { schema } => cmd_describe(schema, &settings),
        #[cfg(feature = "server")]
        Commands::Serve { schema, host, port } => cmd_serve(schema, host, port, &settings),
    }
}

/// The schema given on the command line, else the one in settings.
fn schema_path(arg: Option<PathBuf>, settings: &Settings) -> Option<PathBuf> {
    if arg.is_some() {
        return arg;
    }

    match settings.schema.resolved_path() {
        Ok(path) => {
            if path.is_none() {
                eprintln!("No schema given and none configured under [schema] path");
            }
            path
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            None
        }
    }
}

fn cmd_compile(
    schema: Option<PathBuf>,
    settings: &Settings,
    request: ReportRequest,
    options: BindingOptions,
    check: bool,
) -> ExitCode {
    let Some(path) = schema_path(schema, settings) else {
        return ExitCode::FAILURE;
    };

    let schema = match load_schema(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading schema '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match bind_report(&schema.star, &request, options) {
        Ok(Some(sql)) => {
            if check {
                if let Err(e) = validate_sql(&sql) {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
            println!("{}", sql);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_describe(schema: Option<PathBuf>, settings: &Settings) -> ExitCode {
    let Some(path) = schema_path(schema, settings) else {
        return ExitCode::FAILURE;
    };

    let schema = match load_schema(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading schema '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&describe_star(&schema.star)) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing metadata: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "server")]
fn cmd_serve(
    schema: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    settings: &Settings,
) -> ExitCode {
    let Some(path) = schema_path(schema, settings) else {
        return ExitCode::FAILURE;
    };
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = BindingOptions::from(settings.report);
    match runtime.block_on(stargen::web::serve(path, options, &host, port)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
