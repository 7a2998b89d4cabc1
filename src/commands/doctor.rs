// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::models::{Event, EventKind, RecurringRule, Snapshot, YearMonth};
use crate::utils::pretty_table;

/// One finding: an issue code and a human-readable detail.
pub type Finding = (String, String);

/// Periods that go backwards for the same category in file order.
pub fn check_snapshots(rows: &[Snapshot]) -> Vec<Finding> {
    let mut last: HashMap<&str, YearMonth> = HashMap::new();
    let mut out = Vec::new();
    for (i, r) in rows.iter().enumerate() {
        let p = r.period();
        if let Some(prev) = last.get(r.category.as_str()) {
            if p < *prev {
                out.push((
                    "snapshot_out_of_order".into(),
                    format!("line {}: {} {} after {}", i + 1, r.category, p, prev),
                ));
            }
        }
        last.insert(r.category.as_str(), p);
    }
    out
}

pub fn check_events(events: &[Event]) -> Vec<Finding> {
    let mut out = Vec::new();
    let mut prev: Option<NaiveDate> = None;
    for (i, e) in events.iter().enumerate() {
        if prev.is_some_and(|d| e.date < d) {
            out.push((
                "event_out_of_order".into(),
                format!("line {}: {} {}", i + 1, e.date, e.category),
            ));
        }
        prev = Some(prev.map_or(e.date, |d| d.max(e.date)));

        let suspicious = match e.kind {
            EventKind::Withdraw => e.amount > Decimal::ZERO,
            EventKind::Deposit => e.amount < Decimal::ZERO,
            _ => false,
        };
        if suspicious {
            out.push((
                format!("{}_sign", e.kind),
                format!("line {}: {} {} {}", i + 1, e.date, e.category, e.amount),
            ));
        }
    }
    out
}

pub fn check_rules(rules: &[RecurringRule], today: NaiveDate) -> Vec<Finding> {
    rules
        .iter()
        .filter(|r| r.next_due < today)
        .map(|r| {
            (
                "rule_overdue".into(),
                format!("{} due {} (every {})", r.category, r.next_due, r.every),
            )
        })
        .collect()
}

pub fn handle(config: &Config) -> Result<()> {
    let mut findings: Vec<Finding> = Vec::new();
    let mut unreadable = 0;

    // A store that fails to decode is itself the finding.
    match config.snapshot_store().load_all() {
        Ok(snaps) => findings.extend(check_snapshots(&snaps)),
        Err(e) => {
            unreadable += 1;
            findings.push(("snapshot_store_unreadable".into(), e.to_string()));
        }
    }
    match config.event_store().load_all() {
        Ok(events) => findings.extend(check_events(&events)),
        Err(e) => {
            unreadable += 1;
            findings.push(("event_store_unreadable".into(), e.to_string()));
        }
    }
    match config.rule_store().load() {
        Ok(rules) => findings.extend(check_rules(&rules, crate::utils::today())),
        Err(e) => {
            unreadable += 1;
            findings.push(("rules_unreadable".into(), e.to_string()));
        }
    }

    if findings.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = findings.into_iter().map(|(c, d)| vec![c, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    if unreadable > 0 {
        bail!("{} store(s) could not be read", unreadable);
    }
    Ok(())
}
