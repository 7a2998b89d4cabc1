// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sinkfund::LedgerError;
use sinkfund::models::{Cadence, EventKind, RecurringRule};
use sinkfund::scheduler::{self, DEFAULT_NOTE};
use sinkfund::store::{EventStore, RuleStore};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rule(category: &str, amount: i64, every: Cadence, next_due: NaiveDate) -> RecurringRule {
    RecurringRule {
        category: category.into(),
        amount: Decimal::from(amount),
        every,
        next_due,
        note: None,
    }
}

#[test]
fn due_today_emits_one_event_and_bumps() {
    let dir = tempdir().unwrap();
    let rules = RuleStore::new(dir.path().join("recurring.yaml"));
    let events = EventStore::new(dir.path().join("events.jsonl"));
    rules
        .save(&[rule("Savings", 150, Cadence::Days(14), date(2025, 7, 12))])
        .unwrap();

    let n = scheduler::run(&rules, &events, date(2025, 7, 12)).unwrap();
    assert_eq!(n, 1);

    let written = events.load_all().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].date, date(2025, 7, 12));
    assert_eq!(written[0].category, "Savings");
    assert_eq!(written[0].amount, Decimal::from(150));
    assert_eq!(written[0].kind, EventKind::Deposit);
    assert_eq!(written[0].note.as_deref(), Some(DEFAULT_NOTE));

    assert_eq!(rules.load().unwrap()[0].next_due, date(2025, 7, 26));
}

#[test]
fn overdue_rule_catches_up_each_missed_period() {
    let dir = tempdir().unwrap();
    let rules = RuleStore::new(dir.path().join("recurring.yaml"));
    let events = EventStore::new(dir.path().join("events.jsonl"));
    rules
        .save(&[rule("Savings", 150, Cadence::Days(14), date(2025, 6, 28))])
        .unwrap();

    let n = scheduler::run(&rules, &events, date(2025, 7, 20)).unwrap();
    assert_eq!(n, 2);
    let dates: Vec<NaiveDate> = events.load_all().unwrap().iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![date(2025, 6, 28), date(2025, 7, 12)]);
    assert_eq!(rules.load().unwrap()[0].next_due, date(2025, 7, 26));
}

#[test]
fn nothing_due_writes_no_events() {
    let dir = tempdir().unwrap();
    let rules = RuleStore::new(dir.path().join("recurring.yaml"));
    let events = EventStore::new(dir.path().join("events.jsonl"));
    let defs = vec![rule("Car", 50, Cadence::Monthly, date(2025, 8, 1))];
    rules.save(&defs).unwrap();

    assert_eq!(scheduler::run(&rules, &events, date(2025, 7, 31)).unwrap(), 0);
    assert!(events.load_all().unwrap().is_empty());
    assert_eq!(rules.load().unwrap(), defs);
}

#[test]
fn rule_note_is_carried_onto_events() {
    let mut r = rule("Condo", 100, Cadence::Monthly, date(2025, 1, 31));
    r.note = Some("HOA".into());
    let evs = scheduler::catch_up(&mut r, date(2025, 3, 31)).unwrap();
    let dates: Vec<NaiveDate> = evs.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 28)]);
    assert!(evs.iter().all(|e| e.note.as_deref() == Some("HOA")));
    assert_eq!(r.next_due, date(2025, 4, 28));
}

#[test]
fn bad_cadence_aborts_with_stores_untouched() {
    let dir = tempdir().unwrap();
    let rules_path = dir.path().join("recurring.yaml");
    let text = "- category: Savings\n  amount: 150\n  every: 14d\n  next_due: 2025-07-12\n\
                - category: Car\n  amount: 40\n  every: fortnightly\n  next_due: 2025-07-01\n";
    fs::write(&rules_path, text).unwrap();
    let rules = RuleStore::new(&rules_path);
    let events = EventStore::new(dir.path().join("events.jsonl"));

    let err = scheduler::run(&rules, &events, date(2025, 7, 12)).unwrap_err();
    assert!(matches!(err, LedgerError::UnsupportedCadence { ref category, .. } if category == "Car"));
    assert!(!events.path().exists());
    assert_eq!(fs::read_to_string(&rules_path).unwrap(), text);
}

#[test]
fn multiple_rules_keep_file_order() {
    let dir = tempdir().unwrap();
    let rules = RuleStore::new(dir.path().join("recurring.yaml"));
    let events = EventStore::new(dir.path().join("events.jsonl"));
    rules
        .save(&[
            rule("Tools", 20, Cadence::Days(7), date(2025, 7, 1)),
            rule("Savings", 150, Cadence::Days(14), date(2025, 7, 1)),
        ])
        .unwrap();
    rules
        .add(rule("Car", 40, Cadence::Monthly, date(2025, 9, 1)))
        .unwrap();

    scheduler::run(&rules, &events, date(2025, 7, 1)).unwrap();
    let cats: Vec<String> = events.load_all().unwrap().into_iter().map(|e| e.category).collect();
    assert_eq!(cats, vec!["Tools", "Savings"]);

    let after: Vec<String> = rules.load().unwrap().into_iter().map(|r| r.category).collect();
    assert_eq!(after, vec!["Tools", "Savings", "Car"]);
}
