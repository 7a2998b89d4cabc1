// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};

use crate::config::Config;
use crate::models::{Cadence, RecurringRule};
use crate::scheduler;
use crate::utils::{parse_date, parse_decimal, pretty_table, today};

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("run", sub)) => {
            let written = run(config, sub)?;
            println!("Scheduler finished: {} event(s) written.", written);
        }
        Some(("list", _)) => list(config)?,
        Some(("add", sub)) => add(config, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn run(config: &Config, sub: &clap::ArgMatches) -> Result<usize> {
    let today = match sub.get_one::<String>("today") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let rules = config.rule_store();
    scheduler::run(&rules, &config.event_store(), today)
        .with_context(|| format!("Scheduler run over {} failed", rules.path().display()))
}

fn list(config: &Config) -> Result<()> {
    let rules = config.rule_store().load()?;
    let data = rules
        .into_iter()
        .map(|r| {
            vec![
                r.category,
                format!("{:.2}", r.amount.round_dp(2)),
                r.every.to_string(),
                r.next_due.to_string(),
                r.note.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Amount", "Every", "Next Due", "Note"], data)
    );
    Ok(())
}

fn add(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let every_raw = sub.get_one::<String>("every").unwrap().trim();
    let every = Cadence::parse(every_raw)
        .ok_or_else(|| anyhow!("Unsupported cadence '{}' (use '<N>d' or 'monthly')", every_raw))?;
    let next_due = parse_date(sub.get_one::<String>("next_due").unwrap())?;
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    config.rule_store().add(RecurringRule {
        category: category.clone(),
        amount,
        every,
        next_due,
        note,
    })?;
    println!(
        "Added rule: {} {} every {} from {}",
        category, amount, every, next_due
    );
    Ok(())
}
