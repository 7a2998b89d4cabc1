// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use log::{debug, info};

use crate::error::LedgerResult;
use crate::models::{Event, EventKind, RecurringRule};
use crate::store::{EventStore, RuleStore};

pub const DEFAULT_NOTE: &str = "Auto-scheduled";

/// Emit one deposit event per period that `rule` is due on or before
/// `today`, advancing `next_due` past `today`. Missed periods each get
/// their own event at their own historical date.
pub fn catch_up(rule: &mut RecurringRule, today: NaiveDate) -> LedgerResult<Vec<Event>> {
    let mut out = Vec::new();
    while rule.next_due <= today {
        let note = rule
            .note
            .clone()
            .unwrap_or_else(|| DEFAULT_NOTE.to_string());
        out.push(
            Event::new(rule.next_due, &rule.category, rule.amount, EventKind::Deposit)
                .with_note(note),
        );
        rule.next_due = rule.every.advance(rule.next_due)?;
    }
    Ok(out)
}

/// Evaluate every rule due on or before `today`, append the resulting
/// deposit events, then rewrite the rules with their bumped due dates.
///
/// Returns the number of events written. Rules are fully parsed before
/// anything is emitted, so a malformed rule aborts the run with both
/// stores untouched.
pub fn run(rules: &RuleStore, events: &EventStore, today: NaiveDate) -> LedgerResult<usize> {
    let mut defs = rules.load()?;
    let mut pending = Vec::new();
    for rule in defs.iter_mut() {
        let due = catch_up(rule, today)?;
        if !due.is_empty() {
            debug!(
                "rule {} ({}): {} event(s), next due {}",
                rule.category,
                rule.every,
                due.len(),
                rule.next_due
            );
        }
        pending.extend(due);
    }

    events.append(&pending)?;
    rules.save(&defs)?;
    info!("scheduler wrote {} event(s) for {}", pending.len(), today);
    Ok(pending.len())
}
