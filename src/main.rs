//! rowtrie CLI - Command line interface for a rowtrie store
//!
//! Keys are JSON arrays of strings and integers (`'["users",7]'`), values
//! are any JSON. Every command prints a JSON object on stdout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rowtrie::{codec, Config, JsonFileStore, KeyPath, Kvs, OutputFormat, RowStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rowtrie")]
#[command(about = "A composite-key trie mirrored onto a row store")]
#[command(version)]
struct Cli {
    /// Path to the store file (overrides config and ROWTRIE_STORE)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Sheet id inside the store file (defaults to the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Output format (overrides the config file)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store file and write its header
    Init,

    /// Get the value stored under a key
    Get {
        /// Key as a JSON array
        key: String,
    },

    /// List values whose key starts with a prefix
    Range {
        /// Prefix as a JSON array (empty matches everything)
        #[arg(default_value = "[]")]
        prefix: String,
        /// Include each value's key
        #[arg(short, long)]
        keys: bool,
    },

    /// Insert or update a value
    Put {
        /// Key as a JSON array
        key: String,
        /// Value as JSON
        value: String,
    },

    /// Delete a key
    Delete {
        /// Key as a JSON array
        key: String,
    },

    /// Dump the raw rows of the sheet
    Rows,

    /// Show the effective configuration
    Config {
        /// Write it to the default config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(store) = &cli.store {
        config.store = store.clone();
    }
    if let Some(sheet) = &cli.sheet {
        config.sheet = Some(sheet.clone());
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Init => {
            let store = JsonFileStore::open_or_create(&config.store, config.sheet.as_deref())?;
            let kvs: Kvs<_> = Kvs::open(store)?;
            warn_header_rewritten(&kvs, &config);
            output(
                config.format,
                &serde_json::json!({
                    "status": "ok",
                    "message": format!("Initialized store at {}", config.store.display()),
                    "sheet": kvs.store().sheet_id(),
                    "count": kvs.len()
                }),
            );
        }

        Commands::Get { key } => {
            let key = parse_key(&key)?;
            let kvs = open_kvs(&config)?;
            match kvs.get(&key)? {
                Some(value) => {
                    output(
                        config.format,
                        &serde_json::json!({
                            "key": key,
                            "value": value
                        }),
                    );
                }
                None => {
                    output(
                        config.format,
                        &serde_json::json!({
                            "status": "error",
                            "message": format!("Key not found: {}", rowtrie::format_path(&key))
                        }),
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Range { prefix, keys } => {
            let prefix = parse_key(&prefix)?;
            let kvs = open_kvs(&config)?;
            let items: Vec<serde_json::Value> = if keys {
                kvs.entries(&prefix)
                    .into_iter()
                    .map(|(key, value)| serde_json::json!({ "key": key, "value": value }))
                    .collect()
            } else {
                kvs.get_range(&prefix).into_iter().cloned().collect()
            };
            output(
                config.format,
                &serde_json::json!({
                    "count": items.len(),
                    "values": items
                }),
            );
        }

        Commands::Put { key, value } => {
            let key = parse_key(&key)?;
            let value: serde_json::Value = serde_json::from_str(&value)
                .with_context(|| format!("Value is not valid JSON: {}", value))?;
            let mut kvs = open_kvs(&config)?;
            kvs.put(&key, value)?;
            output(
                config.format,
                &serde_json::json!({
                    "status": "ok",
                    "key": key
                }),
            );
        }

        Commands::Delete { key } => {
            let key = parse_key(&key)?;
            let mut kvs = open_kvs(&config)?;
            let deleted = kvs.delete(&key)?;
            if deleted && kvs.get(&key)?.is_some() {
                eprintln!(
                    "warning: {} is a prefix of other keys; its row was removed but it stays readable until the store is reopened",
                    rowtrie::format_path(&key)
                );
            }
            output(
                config.format,
                &serde_json::json!({
                    "status": "ok",
                    "key": key,
                    "deleted": deleted
                }),
            );
        }

        Commands::Rows => {
            let store = JsonFileStore::open(&config.store, config.sheet.as_deref())
                .with_context(|| format!("Failed to open {}", config.store.display()))?;
            let rows = store.rows()?;
            output(
                config.format,
                &serde_json::json!({
                    "sheet": store.sheet_id(),
                    "header": store.header()?,
                    "count": rows.len(),
                    "rows": rows
                }),
            );
        }

        Commands::Config { save } => {
            let path = Config::default_path()?;
            if save {
                config.save_to(&path)?;
            }
            output(
                config.format,
                &serde_json::json!({
                    "path": path.display().to_string(),
                    "saved": save,
                    "store": config.store.display().to_string(),
                    "sheet": config.sheet,
                    "format": config.format
                }),
            );
        }
    }

    Ok(())
}

fn parse_key(text: &str) -> anyhow::Result<KeyPath> {
    codec::decode_key(text).with_context(|| format!("Invalid key: {}", text))
}

fn open_kvs(config: &Config) -> anyhow::Result<Kvs<JsonFileStore>> {
    let store = JsonFileStore::open(&config.store, config.sheet.as_deref()).with_context(|| {
        format!(
            "Failed to open {} (run `rowtrie init` first)",
            config.store.display()
        )
    })?;
    let kvs = Kvs::open(store)?;
    warn_header_rewritten(&kvs, config);
    Ok(kvs)
}

fn warn_header_rewritten(kvs: &Kvs<JsonFileStore>, config: &Config) {
    if kvs.header_rewritten() {
        eprintln!(
            "warning: header of {} was missing or unexpected and has been rewritten as {:?}",
            config.store.display(),
            rowtrie::HEADER
        );
    }
}

fn output(format: OutputFormat, value: &serde_json::Value) {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match text {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: failed to render output: {}", e),
    }
}
