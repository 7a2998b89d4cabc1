// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-by-month sinking-fund projection.
//!
//! Each simulated month runs these steps, in this order:
//!   1. opening balances (first month only): snapshots, then pre-window events
//!   2. permanent contribution changes
//!   3. interest on the prior closing balance
//!   4. scheduled deposit plus one-off payment adjustment, floored at zero
//!   5. events dated inside the month, in storage order
//!   6. lump sums
//!   7. rounding, aggregate total, snapshot rows
//!
//! Balances accumulate unrounded; rounding happens only in step 7 output.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AGGREGATE_KEY, Category, Event, MonthlyOverrides, Overrides, Snapshot, YearMonth, is_reserved,
    lookup,
};
use crate::store::{EventStore, SnapshotStore, events_between};

pub fn round_cents(d: Decimal) -> Decimal {
    d.round_dp(2)
}

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub start: YearMonth,
    pub num_months: u32,
    pub monthly_interest: bool,
    /// Take opening balances from the latest snapshots when available.
    pub resume: bool,
    /// Fold and apply ledger events from `events`.
    pub use_events: bool,
    /// Write one row per category per month, plus the aggregate row, to
    /// `snapshots`.
    pub record: bool,
    pub snapshots: Option<SnapshotStore>,
    pub events: Option<EventStore>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            start: YearMonth {
                year: 2025,
                month: 1,
            },
            num_months: 12,
            monthly_interest: true,
            resume: true,
            use_events: true,
            record: false,
            snapshots: None,
            events: None,
        }
    }
}

/// One category's result for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMonth {
    pub name: String,
    pub apr: Decimal,
    /// Closing balance, rounded to cents.
    pub balance: Decimal,
    pub amount_deposited: Decimal,
    /// Signed one-off delta applied to this month's deposit.
    pub payment_adjustment: Option<Decimal>,
    pub lump_sum: Option<Decimal>,
    /// Signed change of the baseline contribution taking effect this month.
    pub contribution_change: Option<Decimal>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub categories: Vec<CategoryMonth>,
}

impl MonthSummary {
    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryMonth> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Sum of the rounded closing balances.
    pub fn total(&self) -> Decimal {
        self.categories.iter().map(|c| c.balance).sum()
    }
}

#[derive(Debug, Default)]
struct Marks {
    contribution_change: Option<Decimal>,
    payment_adjustment: Option<Decimal>,
    lump_sum: Option<Decimal>,
    events: Vec<Event>,
}

#[derive(Debug)]
struct Slot {
    name: String,
    apr: Decimal,
    contribution: Decimal,
    balance: Decimal,
    /// Defined by the caller; ad-hoc slots only receive events.
    defined: bool,
    deposited: Decimal,
    marks: Marks,
}

fn overflow(name: &str, period: YearMonth) -> LedgerError {
    LedgerError::Overflow {
        category: name.to_string(),
        period,
    }
}

struct Ledger {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
    latest: BTreeMap<String, Snapshot>,
}

impl Ledger {
    fn open(categories: &[Category], latest: BTreeMap<String, Snapshot>) -> LedgerResult<Self> {
        let mut ledger = Ledger {
            slots: Vec::with_capacity(categories.len()),
            index: HashMap::new(),
            latest,
        };
        for c in categories {
            if is_reserved(&c.name) {
                return Err(LedgerError::ReservedCategory(c.name.clone()));
            }
            if ledger.index.contains_key(&c.name) {
                return Err(LedgerError::DuplicateCategory(c.name.clone()));
            }
            let balance = ledger
                .latest
                .get(&c.name)
                .map(|s| s.balance)
                .unwrap_or(c.balance);
            ledger.push(Slot {
                name: c.name.clone(),
                apr: c.apr,
                contribution: c.monthly_contribution,
                balance,
                defined: true,
                deposited: Decimal::ZERO,
                marks: Marks::default(),
            });
        }
        Ok(ledger)
    }

    fn push(&mut self, slot: Slot) -> usize {
        let idx = self.slots.len();
        self.index.insert(slot.name.clone(), idx);
        self.slots.push(slot);
        idx
    }

    /// Slot for `name`, creating an ad-hoc one if the name is new.
    fn slot_for(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let balance = self
            .latest
            .get(name)
            .map(|s| s.balance)
            .unwrap_or(Decimal::ZERO);
        debug!("event creates ad-hoc category '{}' at {}", name, balance);
        self.push(Slot {
            name: name.to_string(),
            apr: Decimal::ZERO,
            contribution: Decimal::ZERO,
            balance,
            defined: false,
            deposited: Decimal::ZERO,
            marks: Marks::default(),
        })
    }

    /// Fold events dated before the window into opening balances. Events
    /// already reflected in a category's latest snapshot are skipped.
    fn fold_pre_window(&mut self, events: &[Event], start: YearMonth) -> LedgerResult<()> {
        let window_start = start.first_day();
        for ev in events.iter().filter(|e| e.date < window_start) {
            let covered = self
                .latest
                .get(&ev.category)
                .is_some_and(|s| ev.date < s.period().end_exclusive());
            if covered {
                continue;
            }
            let idx = self.slot_for(&ev.category);
            let s = &mut self.slots[idx];
            s.balance = s
                .balance
                .checked_add(ev.amount)
                .ok_or_else(|| overflow(&s.name, YearMonth::of(ev.date)))?;
        }
        Ok(())
    }

    fn defined(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.slots.iter_mut().filter(|s| s.defined)
    }

    fn step(
        &mut self,
        period: YearMonth,
        overrides: &Overrides,
        interest: bool,
        events: &[Event],
    ) -> LedgerResult<()> {
        for s in self.slots.iter_mut() {
            s.deposited = Decimal::ZERO;
            s.marks = Marks::default();
        }

        for s in self.defined() {
            if let Some(new) = lookup(&overrides.contribution_changes, &s.name, period) {
                let diff = new
                    .checked_sub(s.contribution)
                    .ok_or_else(|| overflow(&s.name, period))?;
                s.contribution = new;
                if !diff.is_zero() {
                    s.marks.contribution_change = Some(diff);
                }
            }
        }

        if interest {
            let months = Decimal::from(12);
            for s in self.defined() {
                if s.apr > Decimal::ZERO && s.balance > Decimal::ZERO {
                    s.balance = s
                        .balance
                        .checked_mul(s.apr / months)
                        .and_then(|i| s.balance.checked_add(i))
                        .ok_or_else(|| overflow(&s.name, period))?;
                }
            }
        }

        for s in self.defined() {
            let adj = lookup(&overrides.payment_adjustments, &s.name, period)
                .unwrap_or(Decimal::ZERO);
            let deposit = s
                .contribution
                .checked_add(adj)
                .ok_or_else(|| overflow(&s.name, period))?
                .max(Decimal::ZERO);
            s.balance = s
                .balance
                .checked_add(deposit)
                .ok_or_else(|| overflow(&s.name, period))?;
            s.deposited = deposit;
            if !adj.is_zero() {
                s.marks.payment_adjustment = Some(adj);
            }
        }

        for ev in events_between(events, period.first_day(), period.end_exclusive()) {
            let idx = self.slot_for(&ev.category);
            let s = &mut self.slots[idx];
            s.balance = s
                .balance
                .checked_add(ev.amount)
                .ok_or_else(|| overflow(&s.name, period))?;
            s.marks.events.push(ev.clone());
        }

        for s in self.defined() {
            if let Some(lump) = lookup(&overrides.lump_sums, &s.name, period) {
                if !lump.is_zero() {
                    s.balance = s
                        .balance
                        .checked_add(lump)
                        .ok_or_else(|| overflow(&s.name, period))?;
                    s.marks.lump_sum = Some(lump);
                }
            }
        }
        Ok(())
    }

    fn summarize(&mut self, period: YearMonth) -> MonthSummary {
        let categories = self
            .slots
            .iter_mut()
            .map(|s| {
                let marks = std::mem::take(&mut s.marks);
                CategoryMonth {
                    name: s.name.clone(),
                    apr: s.apr,
                    balance: round_cents(s.balance),
                    amount_deposited: round_cents(s.deposited),
                    payment_adjustment: marks.payment_adjustment,
                    lump_sum: marks.lump_sum,
                    contribution_change: marks.contribution_change,
                    events: marks.events,
                }
            })
            .collect();
        MonthSummary {
            year: period.year,
            month: period.month,
            categories,
        }
    }
}

/// Sum of the rounded balances, or `Overflow` on the aggregate key.
fn checked_total(summary: &MonthSummary) -> LedgerResult<Decimal> {
    summary
        .categories
        .iter()
        .try_fold(Decimal::ZERO, |acc, c| acc.checked_add(c.balance))
        .ok_or_else(|| overflow(AGGREGATE_KEY, summary.period()))
}

fn snapshot_rows(summary: &MonthSummary, total: Decimal) -> Vec<Snapshot> {
    let period = summary.period();
    let mut rows: Vec<Snapshot> = summary
        .categories
        .iter()
        .map(|c| Snapshot::new(period, &c.name, c.balance))
        .collect();
    rows.push(Snapshot::new(period, AGGREGATE_KEY, total));
    rows
}

/// Resuming or recording from a snapshot at or after `start` would apply
/// in-window events twice and write periods out of order.
fn check_window(stored: &BTreeMap<String, Snapshot>, start: YearMonth) -> LedgerResult<()> {
    match stored.values().find(|s| s.period() >= start) {
        Some(s) => Err(LedgerError::SnapshotAhead {
            category: s.category.clone(),
            period: s.period(),
            start,
        }),
        None => Ok(()),
    }
}

fn warn_unknown(channel: &str, map: &MonthlyOverrides, known: &HashSet<&str>) {
    for name in map.keys().filter(|n| !known.contains(n.as_str())) {
        warn!("{} for undefined category '{}' ignored", channel, name);
    }
}

/// Run the projection. `categories` is never modified; the run works on
/// its own copy.
pub fn simulate(
    categories: &[Category],
    overrides: &Overrides,
    opts: &SimulationOptions,
) -> LedgerResult<Vec<MonthSummary>> {
    let known: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    warn_unknown("lump sum", &overrides.lump_sums, &known);
    warn_unknown("payment adjustment", &overrides.payment_adjustments, &known);
    warn_unknown("contribution change", &overrides.contribution_changes, &known);

    let stored = match &opts.snapshots {
        Some(store) if opts.resume || opts.record => {
            let stored = store.latest_per_category()?;
            check_window(&stored, opts.start)?;
            stored
        }
        _ => BTreeMap::new(),
    };
    let latest = if opts.resume { stored } else { BTreeMap::new() };
    let mut ledger = Ledger::open(categories, latest)?;

    let events = match (&opts.events, opts.use_events) {
        (Some(store), true) => store.load_all()?,
        _ => Vec::new(),
    };
    ledger.fold_pre_window(&events, opts.start)?;

    let mut out = Vec::with_capacity(opts.num_months as usize);
    for i in 0..opts.num_months {
        let period = opts.start.plus(i);
        ledger.step(period, overrides, opts.monthly_interest, &events)?;
        let summary = ledger.summarize(period);
        let total = checked_total(&summary)?;
        debug!("{} closed at total {}", period, total);

        if opts.record {
            if let Some(store) = &opts.snapshots {
                store.append(&snapshot_rows(&summary, total))?;
            }
        }
        out.push(summary);
    }

    if let (true, Some(store)) = (opts.record, &opts.snapshots) {
        info!(
            "recorded {} month(s) starting {} to {}",
            out.len(),
            opts.start,
            store.path().display()
        );
    }
    Ok(out)
}
