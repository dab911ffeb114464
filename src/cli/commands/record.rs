//! Record commands.

use chrono::NaiveDate;
use console::style;

use pageshell::config::Config;
use pageshell::{FileStore, RecordStore};

use crate::cli::icons::{dim_arrow, success};

fn open_store(config: &Config) -> RecordStore<FileStore> {
    RecordStore::with_prefix(FileStore::new(config.store_file()), &config.record_prefix)
}

/// Append a record of `kind`.
pub fn cmd_record_add(
    config: &Config,
    kind: &str,
    date: NaiveDate,
    minutes: u32,
    note: &str,
) -> anyhow::Result<()> {
    let mut store = open_store(config);
    store.add(kind, pageshell::Record::new(date, minutes, note))?;

    println!(
        "{} Added {} record for {} ({} min)",
        success(),
        style(kind).cyan(),
        date,
        minutes
    );
    println!("  {} {}", dim_arrow(), store.store().path().display());
    Ok(())
}

/// List records of `kind`, oldest first.
pub fn cmd_record_list(config: &Config, kind: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(config);
    let records = store.try_get(kind)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{} No {} records", dim_arrow(), kind);
        return Ok(());
    }

    println!("{:<12} {:>8}  {}", "DATE", "MINUTES", "NOTE");
    for record in &records {
        println!("{:<12} {:>8}  {}", record.date, record.duration, record.note);
    }
    let total: u64 = records.iter().map(|r| u64::from(r.duration)).sum();
    println!(
        "{} {} record(s), {} min total",
        style("Σ").dim(),
        records.len(),
        total
    );
    Ok(())
}
