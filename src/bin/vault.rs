// src/bin/vault.rs
//! Operator CLI: insert, search and demo-load against the configured vault

use anyhow::{bail, Context, Result};
use encrypted_record_vault::{demo, load_config, open_vault, Record};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

const ID_FIELD: &str = "acc_no";

const USAGE: &str = "usage:
  vault init
  vault insert <acc_no> <name> [field=value ...]
  vault search <term>
  vault load-demo
  vault count
  vault verify";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = load_config().context("failed to load config: check ERV_CONFIG")?;
    let engine = open_vault(&config).context("failed to open vault")?;

    match command.as_str() {
        "init" => {
            info!(key_dir = %config.paths.key_dir.display(), "vault initialized");
            println!("Vault ready at {}", config.paths.database.display());
        }
        "insert" => {
            let (Some(acc_no), Some(name)) = (args.get(1), args.get(2)) else {
                bail!("insert needs an account number and a name\n{USAGE}");
            };

            let mut record = Record::new(ID_FIELD, acc_no.as_str())
                .with_field("name", name.as_str())
                .with_searchable(config.index.searchable_fields.iter().cloned());
            for pair in &args[3..] {
                let (field, value) = pair
                    .split_once('=')
                    .with_context(|| format!("expected field=value, got `{pair}`"))?;
                record = record.with_field(field, value);
            }

            let id = engine.insert(&record)?;
            println!("Stored record {id}");
        }
        "search" => {
            let Some(term) = args.get(1) else {
                bail!("search needs a term\n{USAGE}");
            };

            let results = engine.search(term)?;
            if results.is_empty() {
                println!("No matches found.");
            }
            for record in &results {
                println!("{}", serde_json::to_string_pretty(&Value::Object(record.to_map()))?);
            }
            println!("{} match(es)", results.len());
        }
        "load-demo" => {
            let summary = demo::preload(&engine)?;
            println!(
                "Inserted {} demo record(s), skipped {} already present",
                summary.inserted, summary.skipped
            );
        }
        "count" => println!("{}", engine.record_count()?),
        "verify" => {
            let verified = engine.verify_index()?;
            println!("{verified} posting(s) verified");
        }
        other => bail!("unknown command `{other}`\n{USAGE}"),
    }

    Ok(())
}
