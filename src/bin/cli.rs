//! VariantKV CLI
//!
//! Command-line interface for inspecting and editing a VariantKV file store.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use num_bigint::BigInt;
use tracing_subscriber::{fmt, EnvFilter};
use variantkv::value::Date;
use variantkv::{framing, Config, KeyValueStore, Value, VariantStorage};

/// VariantKV CLI
#[derive(Parser, Debug)]
#[command(name = "variantkv-cli")]
#[command(about = "CLI for VariantKV typed key-value storage")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./variantkv_data")]
    data_dir: String,

    /// Store quota in KB (0 for unbounded)
    #[arg(short, long, default_value = "5120")]
    quota_kb: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set (ignored for null/undefined)
        #[arg(default_value = "")]
        value: String,

        /// How to interpret the value
        #[arg(short = 't', long = "as", value_enum, default_value = "string")]
        kind: Kind,
    },

    /// Show the raw stored text and its envelope
    Inspect {
        /// The key to inspect
        key: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Remove every key
    Clear,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    String,
    Number,
    Bigint,
    Bool,
    Null,
    Undefined,
    /// Milliseconds since the Unix epoch
    Date,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,variantkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut builder = Config::builder().data_dir(&args.data_dir);
    builder = if args.quota_kb == 0 {
        builder.unbounded()
    } else {
        builder.quota_bytes(args.quota_kb * 1024)
    };
    let config = builder.build();

    let storage = VariantStorage::open(config).map_err(|e| format!("Failed to open store: {}", e))?;

    match args.command {
        Commands::Get { key } => match storage.get(&key).map_err(|e| e.to_string())? {
            Some(value) => println!("{}", value),
            None => println!("(not found)"),
        },
        Commands::Set { key, value, kind } => {
            let value = parse_value(&value, kind)?;
            storage.set(&key, &value).map_err(|e| e.to_string())?;
            println!("OK");
        }
        Commands::Inspect { key } => match storage.storage().get(&key) {
            Some(raw) => {
                println!("raw:     {}", raw);
                match framing::tag_version(&raw) {
                    Some(version) => {
                        println!("format:  v{}", version);
                        match framing::unframe(&raw) {
                            Ok(bytes) => println!("payload: {} bytes", bytes.len()),
                            Err(e) => println!("payload: {}", e),
                        }
                    }
                    None => println!("format:  plain string"),
                }
            }
            None => println!("(not found)"),
        },
        Commands::Del { key } => {
            storage.remove(&key).map_err(|e| e.to_string())?;
            println!("OK");
        }
        Commands::Clear => {
            storage.storage().clear().map_err(|e| e.to_string())?;
            println!("OK");
        }
    }

    Ok(())
}

fn parse_value(text: &str, kind: Kind) -> Result<Value, String> {
    let value = match kind {
        Kind::String => Value::from(text),
        Kind::Number => Value::Number(parse_number(text)?),
        Kind::Bigint => Value::BigInt(
            text.parse::<BigInt>()
                .map_err(|e| format!("Invalid bigint '{}': {}", text, e))?,
        ),
        Kind::Bool => Value::Bool(
            text.parse::<bool>()
                .map_err(|e| format!("Invalid bool '{}': {}", text, e))?,
        ),
        Kind::Null => Value::Null,
        Kind::Undefined => Value::Undefined,
        Kind::Date => {
            let millis = text
                .parse::<i64>()
                .map_err(|e| format!("Invalid date '{}': {}", text, e))?;
            Value::Date(
                Date::from_millis(millis)
                    .ok_or_else(|| format!("Date {} out of range", millis))?,
            )
        }
    };
    Ok(value)
}

/// Accepts the spellings the value preview prints, plus anything `f64` parses
fn parse_number(text: &str) -> Result<f64, String> {
    match text {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => text
            .parse::<f64>()
            .map_err(|e| format!("Invalid number '{}': {}", text, e)),
    }
}
