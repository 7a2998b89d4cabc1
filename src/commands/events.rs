// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::Config;
use crate::models::{Event, EventKind};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(config, sub)?,
        Some(("list", sub)) => list(config, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if category.is_empty() {
        return Err(anyhow!("Category name must not be empty"));
    }
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let kind = sub
        .get_one::<String>("kind")
        .unwrap()
        .parse::<EventKind>()
        .map_err(|e| anyhow!(e))?;
    if (kind == EventKind::Withdraw && amount > Decimal::ZERO)
        || (kind == EventKind::Deposit && amount < Decimal::ZERO)
    {
        warn!("{} event with amount {} is applied as-is", kind, amount);
    }
    let mut event = Event::new(date, &category, amount, kind);
    event.note = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    config.event_store().add(&event)?;
    println!("Event logged: {} {} {} on {}", kind, category, amount, date);
    Ok(())
}

#[derive(Serialize)]
pub struct EventRow {
    pub date: String,
    pub category: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub note: String,
}

pub fn query_rows(config: &Config, sub: &clap::ArgMatches) -> Result<Vec<Event>> {
    let store = config.event_store();
    let mut events = match (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        (None, None) => store.load_all()?,
        (from, to) => {
            let from = match from {
                Some(s) => parse_date(s)?,
                None => chrono::NaiveDate::MIN,
            };
            let to = match to {
                Some(s) => parse_date(s)?,
                None => chrono::NaiveDate::MAX,
            };
            store.between(from, to)?
        }
    };
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat = cat.trim();
        events.retain(|e| e.category == cat);
    }
    Ok(events)
}

fn list(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let rows: Vec<EventRow> = query_rows(config, sub)?
        .into_iter()
        .map(|e| EventRow {
            date: e.date.to_string(),
            category: e.category,
            amount: format!("{:.2}", e.amount.round_dp(2)),
            kind: e.kind.to_string(),
            note: e.note.unwrap_or_default(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .into_iter()
            .map(|r| vec![r.date, r.category, r.amount, r.kind, r.note])
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Amount", "Type", "Note"], data)
        );
    }
    Ok(())
}
