//! sparkwire CLI
//!
//! Encode and decode controller commands and object payloads, and
//! inspect the block metadata store.

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value as Json};
use tracing_subscriber::{fmt, EnvFilter};

use sparkwire::datastore::{DataStore, FileDataStore, ObjectRecord};
use sparkwire::payload::{self, ObjectType};
use sparkwire::protocol::values_to_json;
use sparkwire::{identify, pretty_raw, Command, CommandIndex, Config, Result, SparkError};

/// sparkwire CLI
#[derive(Parser, Debug)]
#[command(name = "sparkwire-cli")]
#[command(about = "Controller command protocol and block metadata tools")]
#[command(version)]
struct Args {
    /// Block metadata store file
    #[arg(short, long, default_value = "./sparkwire_blocks.db")]
    store: String,

    /// Never write the store file
    #[arg(long)]
    read_only: bool,

    /// Store action timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all known commands and their layouts
    Commands,

    /// Encode a request from JSON fields
    Encode {
        /// Command name, e.g. WRITE_VALUE
        name: String,

        /// Request fields as a JSON object
        fields: String,
    },

    /// Decode raw request and/or response frames
    Decode {
        /// Command name, e.g. READ_VALUE
        name: String,

        /// Request frame as hex
        #[arg(long)]
        request: Option<String>,

        /// Response frame as hex
        #[arg(long)]
        response: Option<String>,
    },

    /// Encode an object payload from JSON
    PayloadEncode {
        /// Object type tag
        obj_type: ObjectType,

        /// Object fields as a JSON object
        object: String,
    },

    /// Decode an object payload from hex
    PayloadDecode {
        /// Object type tag
        obj_type: ObjectType,

        /// Encoded payload as hex
        encoded: String,
    },

    /// Store a block record, unique by service id
    StoreInsert {
        service_id: String,

        /// Object type tag
        obj_type: ObjectType,

        /// Object fields as a JSON object
        object: String,
    },

    /// Find stored documents where KEY equals VALUE
    StoreFind {
        key: String,

        /// JSON value to match (bare words are taken as strings)
        value: String,
    },
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sparkwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .store_path(&args.store)
        .read_only(args.read_only)
        .action_timeout_ms(args.timeout_ms)
        .build();

    if let Err(e) = run(args.command, config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Commands => {
            for spec in CommandIndex::global()?.iter() {
                println!(
                    "0x{:02x} {:<20} request={:?} response={:?}",
                    spec.opcode_byte(),
                    spec.name,
                    spec.request.fields.iter().map(|f| f.name).collect::<Vec<_>>(),
                    spec.response.fields.iter().map(|f| f.name).collect::<Vec<_>>(),
                );
            }
        }

        Commands::Encode { name, fields } => {
            let spec = identify(&name)?;
            let args = spec.request.values_from_json(&parse_object(&fields)?)?;
            let command = Command::from_args(spec, args)?;
            println!("{}", pretty_raw(command.encoded_request()?).unwrap_or_default());
        }

        Commands::Decode {
            name,
            request,
            response,
        } => {
            let spec = identify(&name)?;
            let command = Command::from_encoded(
                spec,
                request.as_deref().map(parse_hex).transpose()?.map(Into::into),
                response.as_deref().map(parse_hex).transpose()?.map(Into::into),
            );
            let output = json!({
                "command": command.name(),
                "request": command.decoded_request()?.map(values_to_json),
                "response": command.decoded_response()?.map(values_to_json),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::PayloadEncode { obj_type, object } => {
            let encoded = payload::encode(obj_type, &parse_object(&object)?)?;
            println!("{}", hex::encode(encoded));
        }

        Commands::PayloadDecode { obj_type, encoded } => {
            let decoded = payload::decode(obj_type, &parse_hex(&encoded)?)?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }

        Commands::StoreInsert {
            service_id,
            obj_type,
            object,
        } => {
            let record = ObjectRecord::new(service_id, obj_type, parse_object(&object)?);
            // Reject objects the controller could not decode
            record.encode_payload()?;

            let store = FileDataStore::open(config)?;
            store.insert_unique("service_id", record.to_document()?)?;
            tracing::info!("stored {} in {}", record.service_id, store);
        }

        Commands::StoreFind { key, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Json::String(value));
            let store = FileDataStore::open(config)?;
            for doc in store.find_by_key(&key, value)? {
                println!("{}", doc);
            }
        }
    }

    Ok(())
}

fn parse_object(raw: &str) -> Result<Map<String, Json>> {
    match serde_json::from_str(raw)? {
        Json::Object(map) => Ok(map),
        other => Err(SparkError::Config(format!("expected a JSON object, got {}", other))),
    }
}

fn parse_hex(raw: &str) -> Result<Vec<u8>> {
    hex::decode(raw.trim()).map_err(|e| SparkError::Config(format!("invalid hex '{}': {}", raw, e)))
}
