// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::Config;
use crate::models::{AGGREGATE_KEY, Snapshot, YearMonth, is_reserved};
use crate::utils::{maybe_print_json, parse_assignment, parse_month, pretty_table};

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(config, sub)?,
        Some(("latest", sub)) => latest(config, sub)?,
        Some(("seed", sub)) => seed(config, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct SnapshotRow {
    period: String,
    category: String,
    balance: String,
}

fn to_row(s: &Snapshot) -> SnapshotRow {
    SnapshotRow {
        period: s.period().to_string(),
        category: s.category.clone(),
        balance: format!("{:.2}", s.balance.round_dp(2)),
    }
}

fn print_rows(sub: &clap::ArgMatches, rows: Vec<SnapshotRow>) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .into_iter()
            .map(|r| vec![r.period, r.category, r.balance])
            .collect();
        println!("{}", pretty_table(&["Period", "Category", "Balance"], data));
    }
    Ok(())
}

fn list(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let filter = sub.get_one::<String>("category").map(|s| s.trim());
    let rows = config
        .snapshot_store()
        .load_all()?
        .iter()
        .filter(|s| filter.is_none_or(|c| s.category == c))
        .map(to_row)
        .collect();
    print_rows(sub, rows)
}

fn latest(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let latest = config.snapshot_store().latest_per_category()?;
    let total: Decimal = latest.values().map(|s| s.balance).sum();
    let mut rows: Vec<SnapshotRow> = latest.values().map(to_row).collect();
    rows.push(SnapshotRow {
        period: String::new(),
        category: AGGREGATE_KEY.to_string(),
        balance: format!("{:.2}", total.round_dp(2)),
    });
    print_rows(sub, rows)
}

/// Opening balances for `period`, rounded to cents, written as one row per
/// category plus the aggregate row.
pub fn seed_rows(period: YearMonth, balances: &[(String, Decimal)]) -> Result<Vec<Snapshot>> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(balances.len() + 1);
    for (name, bal) in balances {
        if is_reserved(name) {
            return Err(anyhow!("Category name '{}' uses the reserved '__' prefix", name));
        }
        if !seen.insert(name.as_str()) {
            return Err(anyhow!("Category '{}' given more than once", name));
        }
        rows.push(Snapshot::new(period, name, bal.round_dp(2)));
    }
    let total: Decimal = rows.iter().map(|r| r.balance).sum();
    rows.push(Snapshot::new(period, AGGREGATE_KEY, total));
    Ok(rows)
}

fn seed(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let period = parse_month(sub.get_one::<String>("month").unwrap())?;
    let balances = sub
        .get_many::<String>("balance")
        .into_iter()
        .flatten()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>>>()?;
    let rows = seed_rows(period, &balances)?;
    config.snapshot_store().append(&rows)?;
    println!(
        "Opening snapshot for {} written ({} categories).",
        period,
        balances.len()
    );
    Ok(())
}
