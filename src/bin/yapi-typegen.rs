//! YApi TypeScript Generator CLI
//!
//! Command-line interface for turning YApi JSON Schemas into TypeScript
//! declarations.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;
use yapi_typegen::{
    load_schema, load_schema_str, GenerateError, Generator, LoadError, Schema, TypeMapping,
};

#[derive(Parser)]
#[command(name = "yapi-typegen")]
#[command(about = "Generate TypeScript declarations from YApi JSON Schemas")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a declaration from a JSON Schema document
    Generate {
        /// Schema file, or - for stdin
        schema: String,

        /// Name of the generated type
        #[arg(long, short)]
        name: String,

        #[command(flatten)]
        mapping: MappingArgs,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the normalized JSON Schema
    Normalize {
        /// Schema file, or - for stdin
        schema: String,

        #[command(flatten)]
        mapping: MappingArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate request and response declarations for one interface
    Interface {
        /// Saved interface response file, interface page URL, or interface id
        source: String,

        /// Platform base URL, used when SOURCE is an id
        #[arg(long, env = "YAPI_BASE_URL")]
        base_url: Option<String>,

        /// Session cookie sent with the request
        #[arg(long, env = "YAPI_COOKIE", hide_env_values = true)]
        cookie: Option<String>,

        /// Base type name (default: derived from the interface path)
        #[arg(long, short)]
        name: Option<String>,

        #[command(flatten)]
        mapping: MappingArgs,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct MappingArgs {
    /// Map a source type name to a JSON Schema type (repeatable)
    #[arg(long = "map", value_name = "SRC=DST", value_parser = parse_mapping_entry)]
    entries: Vec<(String, String)>,

    /// JSON file holding an object of type-name mappings
    #[arg(long)]
    mapping_file: Option<PathBuf>,
}

fn parse_mapping_entry(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            Ok((from.trim().to_string(), to.trim().to_string()))
        }
        _ => Err(format!("expected SRC=DST, got \"{}\"", s)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            schema,
            name,
            mapping,
            output,
        } => run_generate(&schema, &name, &mapping, output),

        Commands::Normalize {
            schema,
            mapping,
            pretty,
            output,
        } => run_normalize(&schema, &mapping, pretty, output),

        Commands::Interface {
            source,
            base_url,
            cookie,
            name,
            mapping,
            output,
        } => run_interface(InterfaceArgs {
            source,
            base_url,
            cookie,
            name,
            mapping,
            output,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_generate(
    schema_source: &str,
    name: &str,
    mapping: &MappingArgs,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let generator = Generator::new().with_mapping(load_mapping(mapping)?);
    let schema = read_schema(schema_source)?;

    let declaration = generator
        .generate_schema(schema, name)
        .map_err(report_generate_error)?;

    write_output(output.as_deref(), &declaration)
}

fn run_normalize(
    schema_source: &str,
    mapping: &MappingArgs,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let mapping = load_mapping(mapping)?;
    let normalized = yapi_typegen::normalize(read_schema(schema_source)?, &mapping);

    let json_output = if pretty {
        serde_json::to_string_pretty(&normalized)
    } else {
        serde_json::to_string(&normalized)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    write_output(output.as_deref(), &json_output)
}

struct InterfaceArgs {
    source: String,
    base_url: Option<String>,
    cookie: Option<String>,
    name: Option<String>,
    mapping: MappingArgs,
    output: Option<PathBuf>,
}

fn run_interface(args: InterfaceArgs) -> Result<(), u8> {
    let InterfaceArgs {
        source,
        base_url,
        cookie,
        name,
        mapping,
        output,
    } = args;

    let generator = Generator::new().with_mapping(load_mapping(&mapping)?);

    #[cfg(feature = "remote")]
    let data = yapi_typegen::load_interface_auto(&source, base_url.as_deref(), cookie.as_deref());
    #[cfg(not(feature = "remote"))]
    let data = {
        let _ = (&base_url, &cookie);
        yapi_typegen::load_interface(Path::new(&source))
    };
    let data = data.map_err(report_load_error)?;

    let types = generator
        .generate_interface(&data, name.as_deref())
        .map_err(report_generate_error)?;

    write_output(output.as_deref(), &types.to_source())
}

/// Read a schema from a file, or from stdin when the source is `-`.
fn read_schema(source: &str) -> Result<Schema, u8> {
    let loaded = if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| LoadError::ReadError {
                path: PathBuf::from("<stdin>"),
                source,
            })
            .and_then(|_| load_schema_str(&text))
    } else {
        load_schema(Path::new(source))
    };
    loaded.map_err(report_load_error)
}

/// Build the type mapping: mapping file first, then `--map` entries.
fn load_mapping(args: &MappingArgs) -> Result<TypeMapping, u8> {
    let mut entries: Vec<(String, String)> = Vec::new();

    if let Some(path) = &args.mapping_file {
        let text = std::fs::read_to_string(path).map_err(|source| {
            report_load_error(LoadError::ReadError {
                path: path.clone(),
                source,
            })
        })?;
        let file_entries: IndexMap<String, String> = serde_json::from_str(&text)
            .map_err(|source| report_load_error(LoadError::InvalidJson { source }))?;
        entries.extend(file_entries);
    }
    entries.extend(args.entries.iter().cloned());

    Ok(TypeMapping::with_overrides(entries))
}

fn report_load_error(e: LoadError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}

fn report_generate_error(e: GenerateError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), u8> {
    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", text);
        }
    }
    Ok(())
}
