// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::models::{Event, EventKind};
use crate::plan::Plan;
use crate::utils::{fmt_money, parse_date, today};

pub const PAYCHECK_NOTE: &str = "Paycheck deposit";

#[derive(Debug, Clone, PartialEq)]
pub struct PaydayOutlook {
    pub date: NaiveDate,
    pub transfer: Decimal,
    pub current_total: Decimal,
    pub projected_total: Decimal,
    /// One deposit per nonzero paycheck entry.
    pub deposits: Vec<Event>,
}

pub fn outlook(config: &Config, plan: &Plan, date: NaiveDate) -> Result<PaydayOutlook> {
    let transfer = plan.paycheck_total();
    let current_total: Decimal = config
        .snapshot_store()
        .latest_balances()?
        .values()
        .copied()
        .sum();
    let deposits = plan
        .paycheck
        .iter()
        .filter(|(_, amt)| !amt.is_zero())
        .map(|(cat, amt)| Event::new(date, cat, *amt, EventKind::Deposit).with_note(PAYCHECK_NOTE))
        .collect();
    Ok(PaydayOutlook {
        date,
        transfer,
        current_total,
        projected_total: current_total + transfer,
        deposits,
    })
}

pub fn handle(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let plan_path = sub.get_one::<String>("plan").unwrap().trim();
    let plan = Plan::load(Path::new(plan_path))
        .with_context(|| format!("Failed to load plan {}", plan_path))?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let o = outlook(config, &plan, date)?;

    println!("Transfer {} from checking to savings on {}.", fmt_money(&o.transfer), o.date);
    println!("  Current sinking-fund total:  {}", fmt_money(&o.current_total));
    println!("  Projected total after pay:   {}", fmt_money(&o.projected_total));

    if sub.get_flag("log") {
        config.event_store().append(&o.deposits)?;
        println!(
            "{} event(s) written to {}",
            o.deposits.len(),
            config.events_path().display()
        );
    }
    Ok(())
}
