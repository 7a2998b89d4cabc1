// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::models::YearMonth;
use crate::plan::Plan;
use crate::report;
use crate::simulation::{MonthSummary, SimulationOptions, simulate};
use crate::utils::{maybe_print_json, parse_month, today};

pub fn handle(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let summaries = run(config, sub)?;
    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &report::rows(&summaries),
    )? {
        return Ok(());
    }
    if sub.get_flag("table") {
        for m in &summaries {
            println!("{}", m.period());
            println!("{}", report::month_table(m));
        }
    } else {
        print!("{}", report::render_text(&summaries));
    }
    if sub.get_flag("record") {
        println!(
            "Recorded {} month(s) to {}",
            summaries.len(),
            config.snapshots_path().display()
        );
    }
    Ok(())
}

pub fn run(config: &Config, sub: &clap::ArgMatches) -> Result<Vec<MonthSummary>> {
    let plan_path = sub.get_one::<String>("plan").unwrap().trim();
    let plan = Plan::load(Path::new(plan_path))
        .with_context(|| format!("Failed to load plan {}", plan_path))?;
    let start = match sub.get_one::<String>("start") {
        Some(s) => parse_month(s)?,
        None => YearMonth::of(today()),
    };
    let opts = SimulationOptions {
        start,
        num_months: *sub.get_one::<u32>("months").unwrap_or(&12),
        monthly_interest: !sub.get_flag("no_interest"),
        resume: !sub.get_flag("no_resume"),
        use_events: !sub.get_flag("no_events"),
        record: sub.get_flag("record"),
        snapshots: Some(config.snapshot_store()),
        events: Some(config.event_store()),
    };
    let summaries = simulate(&plan.categories, &plan.overrides, &opts)
        .with_context(|| format!("Simulation from {} failed", start))?;
    Ok(summaries)
}
