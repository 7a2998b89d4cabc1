// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use serde_json::json;

use crate::config::Config;

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshots", sub)) => export_snapshots(config, sub),
        Some(("events", sub)) => export_events(config, sub),
        _ => Ok(()),
    }
}

fn target(sub: &clap::ArgMatches) -> Result<(String, String)> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let out = sub.get_one::<String>("out").unwrap().trim().to_string();
    Ok((fmt, out))
}

fn write_out(
    fmt: &str,
    out: &str,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    items: Vec<serde_json::Value>,
) -> Result<()> {
    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(headers)?;
        for row in rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    Ok(())
}

fn export_snapshots(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub)?;
    let snaps = config.snapshot_store().load_all()?;
    let mut rows = Vec::with_capacity(snaps.len());
    let mut items = Vec::with_capacity(snaps.len());
    for s in &snaps {
        let bal = format!("{:.2}", s.balance.round_dp(2));
        rows.push(vec![
            s.year.to_string(),
            s.month.to_string(),
            s.category.clone(),
            bal.clone(),
        ]);
        items.push(json!({
            "year": s.year, "month": s.month, "category": s.category, "balance": bal
        }));
    }
    write_out(&fmt, &out, &["year", "month", "category", "balance"], rows, items)?;
    println!("Exported {} snapshot row(s) to {}", snaps.len(), out);
    Ok(())
}

fn export_events(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub)?;
    let events = config.event_store().load_all()?;
    let mut rows = Vec::with_capacity(events.len());
    let mut items = Vec::with_capacity(events.len());
    for e in &events {
        let amt = format!("{:.2}", e.amount.round_dp(2));
        rows.push(vec![
            e.date.to_string(),
            e.category.clone(),
            amt.clone(),
            e.kind.to_string(),
            e.note.clone().unwrap_or_default(),
        ]);
        items.push(json!({
            "date": e.date.to_string(), "category": e.category, "amount": amt,
            "type": e.kind.as_str(), "note": e.note
        }));
    }
    write_out(
        &fmt,
        &out,
        &["date", "category", "amount", "type", "note"],
        rows,
        items,
    )?;
    println!("Exported {} event(s) to {}", events.len(), out);
    Ok(())
}
